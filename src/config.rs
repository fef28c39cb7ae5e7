//! Reporter configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults, an
//! optional YAML file, and `VERDICT_*` environment variables.
//!
//! ```yaml
//! format: json-lines      # tabular | json | json-lines
//! policy: always          # always | non-passing
//! safe_char: "_"
//! label_width: 25
//! separator: "="
//! separator_width: 80
//! use_colors: false
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Result, VerdictError};
use crate::err_msg;
use crate::record::{is_illegal_file_name_char, ResultStatus, DEFAULT_SAFE_CHAR};

pub const ENV_FORMAT: &str = "VERDICT_FORMAT";
pub const ENV_POLICY: &str = "VERDICT_POLICY";
pub const ENV_SAFE_CHAR: &str = "VERDICT_SAFE_CHAR";

const DEFAULT_LABEL_WIDTH: usize = 25;
const DEFAULT_SEPARATOR_WIDTH: usize = 80;

/// How a record is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Aligned `label<TAB>value` lines grouped in sections.
    #[default]
    Tabular,
    /// Pretty-printed JSON object, defaults suppressed.
    Json,
    /// One compact JSON object per line, defaults suppressed.
    JsonLines,
}

impl FromStr for ReportFormat {
    type Err = VerdictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tabular" | "table" => Ok(ReportFormat::Tabular),
            "json" => Ok(ReportFormat::Json),
            "json-lines" | "jsonl" => Ok(ReportFormat::JsonLines),
            other => Err(err_msg!(Config, "unknown report format '{}'", other)),
        }
    }
}

/// Which outcomes get reported at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportPolicy {
    /// Report every test.
    Always,
    /// Report only tests whose outcome is not `Pass`.
    #[default]
    NonPassing,
}

impl ReportPolicy {
    pub fn should_report(&self, status: ResultStatus) -> bool {
        match self {
            ReportPolicy::Always => true,
            ReportPolicy::NonPassing => !status.is_pass(),
        }
    }
}

impl FromStr for ReportPolicy {
    type Err = VerdictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" | "all" => Ok(ReportPolicy::Always),
            "non-passing" | "failures" => Ok(ReportPolicy::NonPassing),
            other => Err(err_msg!(Config, "unknown report policy '{}'", other)),
        }
    }
}

/// Settings shared by the normalizer, reporter and teardown hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    pub format: ReportFormat,
    pub policy: ReportPolicy,
    pub safe_char: char,
    pub label_width: usize,
    pub separator: char,
    pub separator_width: usize,
    pub use_colors: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            policy: ReportPolicy::default(),
            safe_char: DEFAULT_SAFE_CHAR,
            label_width: DEFAULT_LABEL_WIDTH,
            separator: '=',
            separator_width: DEFAULT_SEPARATOR_WIDTH,
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl ReporterConfig {
    /// Parses and validates a YAML document. Missing fields take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ReporterConfig = serde_yaml::from_str(yaml)
            .map_err(|e| err_msg!(Config, "invalid configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            err_msg!(Config, "failed to read '{}': {}", path.display(), e)
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Applies `VERDICT_FORMAT`, `VERDICT_POLICY` and `VERDICT_SAFE_CHAR`.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup(ENV_FORMAT) {
            self.format = format.parse()?;
        }
        if let Some(policy) = lookup(ENV_POLICY) {
            self.policy = policy.parse()?;
        }
        if let Some(raw) = lookup(ENV_SAFE_CHAR) {
            let mut chars = raw.chars();
            self.safe_char = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(err_msg!(
                        Config,
                        "{} must be a single character, got '{}'",
                        ENV_SAFE_CHAR,
                        raw
                    ))
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if is_illegal_file_name_char(self.safe_char) {
            return Err(err_msg!(
                Config,
                "safe_char '{}' is itself illegal in file names",
                self.safe_char.escape_default()
            ));
        }
        if self.label_width == 0 {
            return Err(err_msg!(Config, "label_width must be positive"));
        }
        if self.separator_width == 0 {
            return Err(err_msg!(Config, "separator_width must be positive"));
        }
        Ok(())
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_policy(mut self, policy: ReportPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    #[test]
    fn test_defaults() {
        let config = ReporterConfig::default();
        assert_eq!(config.format, ReportFormat::Tabular);
        assert_eq!(config.policy, ReportPolicy::NonPassing);
        assert_eq!(config.safe_char, 'X');
        assert_eq!(config.label_width, 25);
        assert_eq!(config.separator_width, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_document() {
        let config = ReporterConfig::from_yaml_str("format: json-lines\npolicy: always\n").unwrap();
        assert_eq!(config.format, ReportFormat::JsonLines);
        assert_eq!(config.policy, ReportPolicy::Always);
        assert_eq!(config.label_width, 25);
    }

    #[test]
    fn test_yaml_rejects_illegal_safe_char() {
        let err = ReporterConfig::from_yaml_str("safe_char: \"/\"\n").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[test]
    fn test_yaml_rejects_unknown_format() {
        assert!(ReporterConfig::from_yaml_str("format: xml\n").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ReporterConfig::default()
            .with_overrides(|name| match name {
                ENV_FORMAT => Some("json".into()),
                ENV_POLICY => Some("always".into()),
                ENV_SAFE_CHAR => Some("_".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.policy, ReportPolicy::Always);
        assert_eq!(config.safe_char, '_');
    }

    #[test]
    fn test_override_safe_char_must_be_single() {
        let result = ReporterConfig::default().with_overrides(|name| {
            (name == ENV_SAFE_CHAR).then(|| "ab".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_policy() {
        assert!(ReportPolicy::Always.should_report(ResultStatus::Pass));
        assert!(!ReportPolicy::NonPassing.should_report(ResultStatus::Pass));
        assert!(ReportPolicy::NonPassing.should_report(ResultStatus::Blocked));
    }
}
