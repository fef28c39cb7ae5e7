//! # Normalized Test Record
//!
//! The typed model produced once per test at teardown. A [`TestRecord`]
//! groups the identity/outcome half ([`TestContext`]) and the declared
//! metadata half ([`TestAttributes`]). Records are immutable: the
//! normalizer builds them and the reporter only reads them.
//!
//! The serde attributes on these types implement the structured report's
//! default suppression. Any field still holding its default is skipped.

use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::diagnostics::VerdictError;
use crate::taxonomy::Priority;

/// Sentinel text for unset string and list fields in tabular output.
pub const NOT_SET: &str = "not set";

/// Sentinel text for an unbounded timeout in tabular output.
pub const INFINITE: &str = "Infinite";

/// Default substitute for characters that are illegal in file names.
pub const DEFAULT_SAFE_CHAR: char = 'X';

// ============================================================================
// HOST INPUTS
// ============================================================================

/// Identity fields copied verbatim from the host framework's test object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestIdentity {
    pub id: String,
    pub name: String,
    pub method_name: String,
    pub class_name: String,
    pub full_name: String,
    pub current_directory: String,
    pub test_directory: String,
    pub work_directory: String,
}

/// The host framework's raw outcome for a finished test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostOutcome {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HostOutcome {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

// ============================================================================
// RESULT STATUS
// ============================================================================

/// Framework-agnostic test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    Pass,
    Fail,
    InProgress,
    NotExecuted,
    Blocked,
}

impl ResultStatus {
    /// Maps a host status onto the framework-agnostic set.
    ///
    /// `Passed`, `Failed`, `Skipped`, `Warning` and `Inconclusive` are the only
    /// accepted inputs (ASCII case-insensitive). Anything else means the host's
    /// result model has diverged and is reported as a contract violation.
    pub fn from_host_status(raw: &str) -> Result<ResultStatus, VerdictError> {
        const MAPPING: [(&str, ResultStatus); 5] = [
            ("Passed", ResultStatus::Pass),
            ("Failed", ResultStatus::Fail),
            ("Skipped", ResultStatus::NotExecuted),
            ("Warning", ResultStatus::Blocked),
            ("Inconclusive", ResultStatus::Blocked),
        ];
        let trimmed = raw.trim();
        MAPPING
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, status)| *status)
            .ok_or_else(|| VerdictError::UnrecognizedStatus {
                status: raw.to_string(),
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Pass => "Pass",
            ResultStatus::Fail => "Fail",
            ResultStatus::InProgress => "InProgress",
            ResultStatus::NotExecuted => "NotExecuted",
            ResultStatus::Blocked => "Blocked",
        }
    }

    pub fn is_pass(&self) -> bool {
        *self == ResultStatus::Pass
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TIMEOUT
// ============================================================================

/// Declared time limit of a test, in whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    #[default]
    Infinite,
    Finite(Duration),
}

impl Timeout {
    /// Interprets a declared millisecond count. Non-positive values and the
    /// 32-bit or 64-bit maximum mean "no limit".
    pub fn from_millis(ms: i64) -> Timeout {
        if ms <= 0 || ms == i64::from(i32::MAX) || ms == i64::MAX {
            Timeout::Infinite
        } else {
            Timeout::Finite(Duration::from_millis(ms as u64))
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Timeout::Infinite)
    }

    pub fn as_millis(&self) -> Option<u128> {
        match self {
            Timeout::Infinite => None,
            Timeout::Finite(d) => Some(d.as_millis()),
        }
    }
}

impl std::fmt::Display for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeout::Infinite => f.write_str(INFINITE),
            Timeout::Finite(d) => {
                let ms = d.as_millis();
                if ms % 1000 != 0 {
                    write!(f, "{} (milliseconds)", ms)
                } else if ms == 1000 {
                    f.write_str("1 (second)")
                } else {
                    write!(f, "{} (seconds)", ms / 1000)
                }
            }
        }
    }
}

fn serialize_timeout<S: Serializer>(timeout: &Timeout, serializer: S) -> Result<S::Ok, S::Error> {
    match timeout.as_millis() {
        Some(ms) => serializer.serialize_u64(u64::try_from(ms).unwrap_or(u64::MAX)),
        None => serializer.serialize_none(),
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// A custom property preserved verbatim from an unrecognized key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomProperty {
    pub key: String,
    pub value: String,
}

impl std::fmt::Display for CustomProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Identity and outcome half of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestContext {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub test_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub safe_test_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    pub result: ResultStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub binaries_directory: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub current_directory: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_directory: String,
}

/// Declared metadata half of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TestAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "timeout_ms",
        skip_serializing_if = "Timeout::is_infinite",
        serialize_with = "serialize_timeout"
    )]
    pub timeout: Timeout,
    #[serde(skip_serializing_if = "Priority::is_unspecified")]
    pub priority: Priority,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub work_items: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issue_links: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<CustomProperty>,
}

impl TestAttributes {
    pub fn owner_or_sentinel(&self) -> &str {
        self.owner.as_deref().unwrap_or(NOT_SET)
    }

    pub fn description_or_sentinel(&self) -> &str {
        self.description.as_deref().unwrap_or(NOT_SET)
    }
}

/// The normalized, immutable record for one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    pub attributes: TestAttributes,
    pub context: TestContext,
}

impl TestRecord {
    pub fn status(&self) -> ResultStatus {
        self.context.result
    }
}

// ============================================================================
// SAFE FILE NAMES
// ============================================================================

/// True for characters that cannot appear in a file name on common platforms.
pub fn is_illegal_file_name_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_ascii_control()
}

/// Replaces every illegal file-name character with `safe_char`, one for one.
///
/// The character count is preserved and, as long as `safe_char` is itself
/// legal, applying the transform twice equals applying it once.
pub fn safe_file_name(name: &str, safe_char: char) -> String {
    name.chars()
        .map(|c| {
            if is_illegal_file_name_char(c) {
                safe_char
            } else {
                c
            }
        })
        .collect()
}
