use serde::Deserialize;

use crate::error::ReconError;

pub const DEFAULT_TOLERANCE_ARCSEC: f64 = 0.2;
pub const DEFAULT_OBSERVATORY_CODE: &str = "568";
pub const DEFAULT_NAME_PATTERN: &str = r".*\.ast";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Report-building configuration, usually read from a `.toml` file. Every
/// section is optional; command-line flags override what is set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub header: HeaderConfig,
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

/// Angular separation below which two records are the same measurement.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceConfig {
    #[serde(default = "default_arcsec")]
    pub arcsec: f64,
}

fn default_arcsec() -> f64 {
    DEFAULT_TOLERANCE_ARCSEC
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            arcsec: DEFAULT_TOLERANCE_ARCSEC,
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// Regex a file name must match to be loaded from the existing corpus.
    #[serde(default = "default_pattern")]
    pub existing_pattern: String,
    /// Regex a file name must match to be loaded from the new corpus.
    #[serde(default = "default_pattern")]
    pub new_pattern: String,
    /// Alias-index file. Relative paths resolve against the config file.
    #[serde(default)]
    pub alias_index: Option<String>,
}

fn default_pattern() -> String {
    DEFAULT_NAME_PATTERN.into()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            existing_pattern: default_pattern(),
            new_pattern: default_pattern(),
            alias_index: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Report header block contents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderConfig {
    #[serde(default = "default_observatory_code")]
    pub observatory_code: String,
    #[serde(default = "default_observers")]
    pub observers: Vec<String>,
    #[serde(default)]
    pub measurers: Vec<String>,
    #[serde(default)]
    pub telescope: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub acknowledge: Option<String>,
}

fn default_observatory_code() -> String {
    DEFAULT_OBSERVATORY_CODE.into()
}

fn default_observers() -> Vec<String> {
    vec!["M. T. Bannister".into(), "J. J. Kavelaars".into()]
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            observatory_code: default_observatory_code(),
            observers: default_observers(),
            measurers: Vec::new(),
            telescope: None,
            network: None,
            acknowledge: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReportConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReportConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.tolerance.validate()?;
        self.header.validate()?;

        for (name, pattern) in [
            ("existing_pattern", &self.sources.existing_pattern),
            ("new_pattern", &self.sources.new_pattern),
        ] {
            if pattern.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "sources.{name} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

impl ToleranceConfig {
    pub fn validate(&self) -> Result<(), ReconError> {
        if !self.arcsec.is_finite() || self.arcsec <= 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance must be a positive number of arc-seconds, got {}",
                self.arcsec
            )));
        }
        Ok(())
    }
}

impl HeaderConfig {
    pub fn validate(&self) -> Result<(), ReconError> {
        if self.observatory_code.chars().count() != 3 {
            return Err(ReconError::ConfigValidation(format!(
                "observatory code must be 3 characters, got \"{}\"",
                self.observatory_code
            )));
        }
        if self.observers.iter().any(|o| o.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(
                "observer names must not be blank".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[tolerance]
arcsec = 0.5

[sources]
existing_pattern = '.*\.mpc'
new_pattern = '.*\.ast'
alias_index = "idx/file.idx"

[header]
observatory_code = "T05"
observers = ["A. Observer"]
measurers = ["B. Measurer"]
telescope = "3.6-m f/4 reflector + CCD"
"#;

    #[test]
    fn parse_full() {
        let config = ReportConfig::from_toml(FULL).unwrap();
        assert_eq!(config.tolerance.arcsec, 0.5);
        assert_eq!(config.sources.existing_pattern, r".*\.mpc");
        assert_eq!(config.sources.alias_index.as_deref(), Some("idx/file.idx"));
        assert_eq!(config.header.observatory_code, "T05");
        assert_eq!(config.header.observers, vec!["A. Observer"]);
        assert_eq!(config.header.measurers, vec!["B. Measurer"]);
        assert!(config.header.network.is_none());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ReportConfig::from_toml("").unwrap();
        assert_eq!(config.tolerance.arcsec, DEFAULT_TOLERANCE_ARCSEC);
        assert_eq!(config.sources.new_pattern, DEFAULT_NAME_PATTERN);
        assert_eq!(config.header.observatory_code, "568");
        assert_eq!(config.header.observers.len(), 2);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = ReportConfig::from_toml("[header]\nobservatory_code = \"309\"\n").unwrap();
        assert_eq!(config.header.observatory_code, "309");
        assert_eq!(config.header.observers, default_observers());
    }

    #[test]
    fn reject_non_positive_tolerance() {
        let err = ReportConfig::from_toml("[tolerance]\narcsec = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("tolerance"), "{err}");
    }

    #[test]
    fn reject_bad_observatory_code() {
        let err = ReportConfig::from_toml("[header]\nobservatory_code = \"5680\"\n").unwrap_err();
        assert!(err.to_string().contains("observatory code"), "{err}");
    }

    #[test]
    fn reject_unknown_field() {
        let err = ReportConfig::from_toml("[tolerance]\ndegrees = 1.0\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
