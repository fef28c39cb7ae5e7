//! # Context Normalizer
//!
//! The single mapping from a host property store, identity and outcome to a
//! [`TestRecord`]. Recognized keys go through one explicit table (the `match`
//! in [`extract_attributes`]); every other key lands in the custom property
//! bucket so author-supplied metadata is never dropped.
//!
//! Normalization is total apart from one case: an outcome status outside the
//! mapped set is a contract violation and aborts with
//! [`VerdictError::UnrecognizedStatus`](crate::VerdictError::UnrecognizedStatus).

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::diagnostics::Result;
use crate::record::{
    safe_file_name, CustomProperty, HostOutcome, ResultStatus, TestAttributes, TestContext,
    TestIdentity, TestRecord, Timeout, DEFAULT_SAFE_CHAR,
};
use crate::store::{keys, PropertyStore, PropertyValue};
use crate::taxonomy::{merge_labels, parse_priority, Category};

/// Separator for list values declared as one comma-separated string,
/// e.g. `Category = "Integration, Smoke, Web"`.
static LIST_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());

/// Normalizes with the default safe-name substitute.
pub fn normalize<S>(store: &S, identity: &TestIdentity, outcome: &HostOutcome) -> Result<TestRecord>
where
    S: PropertyStore + ?Sized,
{
    Normalizer::default().normalize(store, identity, outcome)
}

/// Builds [`TestRecord`]s. Holds only immutable settings.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    safe_char: char,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            safe_char: DEFAULT_SAFE_CHAR,
        }
    }
}

impl Normalizer {
    pub fn new(safe_char: char) -> Self {
        Self { safe_char }
    }

    pub fn safe_char(&self) -> char {
        self.safe_char
    }

    pub fn normalize<S>(
        &self,
        store: &S,
        identity: &TestIdentity,
        outcome: &HostOutcome,
    ) -> Result<TestRecord>
    where
        S: PropertyStore + ?Sized,
    {
        let result = ResultStatus::from_host_status(&outcome.status)?;
        let context = self.build_context(identity, outcome, result);
        let attributes = extract_attributes(store);

        debug!(
            test_id = %context.id,
            test_name = %context.test_name,
            result = %result,
            custom_properties = attributes.properties.len(),
            "normalized test record"
        );

        Ok(TestRecord {
            attributes,
            context,
        })
    }

    fn build_context(
        &self,
        identity: &TestIdentity,
        outcome: &HostOutcome,
        result: ResultStatus,
    ) -> TestContext {
        TestContext {
            id: identity.id.clone(),
            test_name: identity.name.clone(),
            safe_test_name: safe_file_name(&identity.name, self.safe_char),
            method_name: identity.method_name.clone(),
            class_name: identity.class_name.clone(),
            full_name: identity.full_name.clone(),
            result,
            message: outcome.message.clone().unwrap_or_default(),
            binaries_directory: identity.test_directory.clone(),
            current_directory: identity.current_directory.clone(),
            log_directory: identity.work_directory.clone(),
        }
    }
}

/// Maps the property store onto declared metadata, defaulting anything
/// missing or malformed.
pub fn extract_attributes<S>(store: &S) -> TestAttributes
where
    S: PropertyStore + ?Sized,
{
    let mut attrs = TestAttributes::default();
    let mut author = None;
    let mut owner = None;

    for key in store.keys() {
        let values = store.get(key);
        match key {
            keys::DESCRIPTION => attrs.description = first_text(values),
            keys::AUTHOR => author = first_text(values),
            keys::OWNER => owner = first_text(values),
            keys::PRIORITY => {
                attrs.priority = values.first().map(parse_priority).unwrap_or_default();
            }
            keys::TIMEOUT => {
                attrs.timeout = values
                    .first()
                    .and_then(PropertyValue::as_int)
                    .map(Timeout::from_millis)
                    .unwrap_or_default();
            }
            keys::CATEGORY => {
                merge_labels(
                    &mut attrs.categories,
                    split_values(values).map(canonical_category),
                );
            }
            keys::WORK_ITEM => merge_labels(&mut attrs.work_items, split_values(values)),
            keys::ISSUE_LINKS => {
                merge_labels(
                    &mut attrs.issue_links,
                    split_values(values).map(|link| normalize_issue_link(&link)),
                );
            }
            _ => attrs
                .properties
                .extend(values.iter().map(|value| CustomProperty {
                    key: key.to_string(),
                    value: value.to_string(),
                })),
        }
    }

    attrs.owner = author.or(owner);
    attrs
}

/// Canonical form of an issue link: trimmed and upper-cased.
pub fn normalize_issue_link(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Known category labels are rewritten to their canonical spelling; anything
/// else is kept as declared.
fn canonical_category(label: String) -> String {
    match Category::parse(&label) {
        Some(category) => category.as_str().to_string(),
        None => label,
    }
}

fn first_text(values: &[PropertyValue]) -> Option<String> {
    values
        .first()
        .map(|v| v.to_string().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Stringifies every value, splits comma-separated lists and drops blanks.
fn split_values(values: &[PropertyValue]) -> impl Iterator<Item = String> + '_ {
    values.iter().flat_map(|value| {
        let text = value.to_string();
        LIST_SEPARATOR
            .split(text.trim())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    })
}
