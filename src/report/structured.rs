//! Structured rendering: a JSON object mirroring the record.
//!
//! Fields still holding their default are left out entirely (see the serde
//! attributes in [`crate::record`]), and so is a section with nothing left in
//! it. Enums render as labels.
//!
//! Serialization failures never escape. Whatever sections serialized are
//! written, followed by a `!! report truncated: <reason>` marker line.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::record::TestRecord;
use crate::report::output::{LineKind, ReportBlock};

pub const TRUNCATED_MARKER: &str = "!! report truncated";

/// Pretty multi-line JSON or one compact line per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    Pretty,
    Compact,
}

/// Renders a record as a JSON object with `attributes` and `context` keys.
pub fn render(record: &TestRecord, layout: JsonLayout) -> ReportBlock {
    render_sections(
        [
            ("attributes", to_section(&record.attributes)),
            ("context", to_section(&record.context)),
        ],
        layout,
    )
}

fn to_section<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Assembles already-serialized sections, stopping at the first failure.
pub(crate) fn render_sections<I>(sections: I, layout: JsonLayout) -> ReportBlock
where
    I: IntoIterator<Item = (&'static str, Result<Value, serde_json::Error>)>,
{
    let mut object = Map::new();
    let mut failure = None;

    for (name, section) in sections {
        match section {
            Ok(Value::Object(fields)) if fields.is_empty() => {}
            Ok(value) => {
                object.insert(name.to_string(), value);
            }
            Err(e) => {
                failure = Some(format!("{} section: {}", name, e));
                break;
            }
        }
    }

    let object = Value::Object(object);
    let encoded = match layout {
        JsonLayout::Pretty => serde_json::to_string_pretty(&object),
        JsonLayout::Compact => serde_json::to_string(&object),
    };

    let mut block = ReportBlock::new();
    match encoded {
        Ok(text) => {
            for line in text.lines() {
                block.push(LineKind::Raw, line);
            }
        }
        Err(e) => {
            failure.get_or_insert_with(|| e.to_string());
        }
    }
    if let Some(reason) = failure {
        block.push(LineKind::Marker, format!("{}: {}", TRUNCATED_MARKER, reason));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ResultStatus, TestAttributes, TestContext, Timeout};
    use crate::taxonomy::Priority;

    fn record() -> TestRecord {
        TestRecord {
            attributes: TestAttributes::default(),
            context: TestContext {
                id: "0-1001".into(),
                test_name: "Pass_WithTestAttributes".into(),
                safe_test_name: "Pass_WithTestAttributes".into(),
                method_name: String::new(),
                class_name: String::new(),
                full_name: String::new(),
                result: ResultStatus::Pass,
                message: String::new(),
                binaries_directory: String::new(),
                current_directory: String::new(),
                log_directory: String::new(),
            },
        }
    }

    fn parse(block: &ReportBlock) -> Value {
        serde_json::from_str(&block.to_text()).unwrap()
    }

    #[test]
    fn test_defaults_are_suppressed() {
        let value = parse(&render(&record(), JsonLayout::Pretty));
        assert!(value.get("attributes").is_none());
        let context = value["context"].as_object().unwrap();
        assert_eq!(context["result"], "Pass");
        assert_eq!(context["id"], "0-1001");
        assert!(!context.contains_key("message"));
        assert!(!context.contains_key("class_name"));
    }

    #[test]
    fn test_non_default_attributes_present() {
        let mut rec = record();
        rec.attributes.priority = Priority::High;
        rec.attributes.timeout = Timeout::from_millis(60_000);
        rec.attributes.issue_links = vec!["JRA-123".into()];
        let value = parse(&render(&rec, JsonLayout::Compact));
        let attrs = &value["attributes"];
        assert_eq!(attrs["priority"], "High");
        assert_eq!(attrs["timeout_ms"], 60_000);
        assert_eq!(attrs["issue_links"][0], "JRA-123");
        assert!(attrs.get("owner").is_none());
        assert!(attrs.get("categories").is_none());
    }

    #[test]
    fn test_compact_is_single_line() {
        let block = render(&record(), JsonLayout::Compact);
        assert_eq!(block.lines().len(), 1);
    }

    #[test]
    fn test_failure_writes_partial_then_marker() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("broken field"))
            }
        }

        let block = render_sections(
            [
                ("attributes", Ok(serde_json::json!({ "owner": "me" }))),
                ("context", to_section(&Broken)),
            ],
            JsonLayout::Compact,
        );
        let lines = block.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, r#"{"attributes":{"owner":"me"}}"#);
        assert_eq!(lines[1].kind, LineKind::Marker);
        assert!(lines[1].text.starts_with(TRUNCATED_MARKER));
        assert!(lines[1].text.contains("broken field"));
    }
}
