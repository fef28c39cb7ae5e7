//! Tabular rendering: two aligned columns grouped into named sections.
//!
//! ```text
//! TEST ATTRIBUTES
//! Owner                    	not set
//! Timeout                  	Infinite
//! ...
//! ================================================================================
//! TEST CONTEXT
//! Unique ID                	0-1001
//! ...
//! ================================================================================
//! ```
//!
//! Every field is always printed, as exactly one `label<TAB>value` line.
//! Control characters in values are escaped (`\n`, `\t`, `\u{1b}`), and
//! defaults show up as sentinel text so a maintainer scanning logs sees the
//! full picture.

use std::borrow::Cow;

use unicode_width::UnicodeWidthStr;

use crate::config::ReporterConfig;
use crate::record::{TestAttributes, TestContext, TestRecord, NOT_SET};
use crate::report::output::{LineKind, ReportBlock};

pub const ATTRIBUTES_SECTION: &str = "Test Attributes";
pub const CONTEXT_SECTION: &str = "Test Context";

/// Renders both sections of a record.
pub fn render(record: &TestRecord, config: &ReporterConfig) -> ReportBlock {
    let mut block = ReportBlock::new();
    write_section(
        &mut block,
        ATTRIBUTES_SECTION,
        &attribute_fields(&record.attributes),
        config,
    );
    write_section(
        &mut block,
        CONTEXT_SECTION,
        &context_fields(&record.context),
        config,
    );
    block
}

fn attribute_fields(attrs: &TestAttributes) -> Vec<(&'static str, String)> {
    vec![
        ("Owner", attrs.owner_or_sentinel().to_string()),
        ("Description", attrs.description_or_sentinel().to_string()),
        ("Timeout", attrs.timeout.to_string()),
        ("Priority", attrs.priority.to_string()),
        ("Categories", join_or_sentinel(&attrs.categories)),
        ("Work Items", join_or_sentinel(&attrs.work_items)),
        ("Issue Links", join_or_sentinel(&attrs.issue_links)),
        ("Properties", join_or_sentinel(&attrs.properties)),
    ]
}

fn context_fields(ctx: &TestContext) -> Vec<(&'static str, String)> {
    vec![
        ("Unique ID", text_or_sentinel(&ctx.id)),
        ("Test Name", text_or_sentinel(&ctx.test_name)),
        ("Safe Test Name", text_or_sentinel(&ctx.safe_test_name)),
        ("Method Name", text_or_sentinel(&ctx.method_name)),
        ("Class Name", text_or_sentinel(&ctx.class_name)),
        ("Full Name", text_or_sentinel(&ctx.full_name)),
        ("Result", ctx.result.to_string()),
        ("Message", text_or_sentinel(&ctx.message)),
        ("Binaries Dir", text_or_sentinel(&ctx.binaries_directory)),
        ("Current Dir", text_or_sentinel(&ctx.current_directory)),
        ("Logs Dir", text_or_sentinel(&ctx.log_directory)),
    ]
}

/// Appends one section: upper-cased header, aligned fields, separator.
pub fn write_section(
    block: &mut ReportBlock,
    name: &str,
    fields: &[(&str, String)],
    config: &ReporterConfig,
) {
    block.push(LineKind::Header, name.to_uppercase());
    for (label, value) in fields {
        block.push(
            LineKind::Field,
            format!(
                "{}\t{}",
                pad_label(label, config.label_width),
                escape_value(value)
            ),
        );
    }
    block.push(
        LineKind::Separator,
        config.separator.to_string().repeat(config.separator_width),
    );
}

/// Keeps a value on one line in one column: control characters (newlines,
/// tabs, carriage returns and the rest) are written as escape sequences.
fn escape_value(value: &str) -> Cow<'_, str> {
    if !value.chars().any(char::is_control) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// Left-aligns `label` in a column `width` display cells wide.
fn pad_label(label: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(label);
    let mut padded = String::with_capacity(label.len() + width.saturating_sub(used));
    padded.push_str(label);
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    padded
}

fn text_or_sentinel(text: &str) -> String {
    if text.trim().is_empty() {
        NOT_SET.to_string()
    } else {
        text.to_string()
    }
}

fn join_or_sentinel<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        NOT_SET.to_string()
    } else {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CustomProperty, ResultStatus, Timeout};
    use crate::taxonomy::Priority;

    fn record() -> TestRecord {
        TestRecord {
            attributes: TestAttributes::default(),
            context: TestContext {
                id: "0-1001".into(),
                test_name: "Fail_NoTestAttributes".into(),
                safe_test_name: "Fail_NoTestAttributes".into(),
                method_name: "Fail_NoTestAttributes".into(),
                class_name: "UnitTest1".into(),
                full_name: "Project.UnitTest1.Fail_NoTestAttributes".into(),
                result: ResultStatus::Fail,
                message: String::new(),
                binaries_directory: "/bin".into(),
                current_directory: "/cwd".into(),
                log_directory: "/logs".into(),
            },
        }
    }

    fn config() -> ReporterConfig {
        ReporterConfig::default().with_colors(false)
    }

    #[test]
    fn test_layout() {
        let block = render(&record(), &config());
        let text = block.to_text();
        let lines: Vec<&str> = text.lines().collect();
        // header + 8 attribute fields + separator + header + 11 context fields + separator
        assert_eq!(lines.len(), 1 + 8 + 1 + 1 + 11 + 1);
        assert_eq!(lines[0], "TEST ATTRIBUTES");
        assert_eq!(lines[9], "=".repeat(80));
        assert_eq!(lines[10], "TEST CONTEXT");
        assert_eq!(lines[1], format!("{:<25}\t{}", "Owner", NOT_SET));
    }

    #[test]
    fn test_defaults_render_as_sentinels() {
        let text = render(&record(), &config()).to_text();
        assert!(text.contains(&format!("{:<25}\tInfinite", "Timeout")));
        assert!(text.contains(&format!("{:<25}\tUnknown", "Priority")));
        assert!(text.contains(&format!("{:<25}\tnot set", "Categories")));
        assert!(text.contains(&format!("{:<25}\tnot set", "Message")));
    }

    #[test]
    fn test_values_are_joined() {
        let mut rec = record();
        rec.attributes.priority = Priority::High;
        rec.attributes.timeout = Timeout::from_millis(60_000);
        rec.attributes.categories = vec!["Integration".into(), "Smoke".into()];
        rec.attributes.properties = vec![
            CustomProperty {
                key: "Bug".into(),
                value: "FOO-42".into(),
            },
            CustomProperty {
                key: "ID".into(),
                value: "BAR-42".into(),
            },
        ];
        let text = render(&rec, &config()).to_text();
        assert!(text.contains("\tIntegration, Smoke\n"));
        assert!(text.contains("\tBug=FOO-42, ID=BAR-42\n"));
        assert!(text.contains("\t60 (seconds)\n"));
        assert!(text.contains("\tHigh\n"));
    }

    #[test]
    fn test_custom_widths() {
        let mut cfg = config();
        cfg.label_width = 12;
        cfg.separator = '-';
        cfg.separator_width = 10;
        let text = render(&record(), &cfg).to_text();
        assert!(text.contains("Owner       \tnot set\n"));
        assert!(text.contains("\n----------\n"));
    }

    #[test]
    fn test_control_characters_stay_on_one_line() {
        let mut rec = record();
        rec.context.message = "Expected: 2\r\n  But was:  3\nat Foo.Bar()".into();
        rec.attributes.properties = vec![CustomProperty {
            key: "Note".into(),
            value: "a\tb".into(),
        }];
        let text = render(&rec, &config()).to_text();
        for line in text.lines() {
            assert!(line.matches('\t').count() <= 1, "extra column in {:?}", line);
        }
        assert_eq!(text.lines().count(), 1 + 8 + 1 + 1 + 11 + 1);
        assert!(text.contains("\tExpected: 2\\r\\n  But was:  3\\nat Foo.Bar()\n"));
        assert!(text.contains("\tNote=a\\tb\n"));
    }

    #[test]
    fn test_escape_value_leaves_plain_text_alone() {
        assert!(matches!(escape_value("C:\\bin\\tests"), Cow::Borrowed(_)));
        assert_eq!(escape_value("bell\u{7}"), "bell\\u{7}");
    }

    #[test]
    fn test_pad_label_uses_display_width() {
        assert_eq!(pad_label("日本", 6), "日本  ");
        assert_eq!(pad_label("very long label", 4), "very long label");
    }
}
