//! Configuration for schema inference and the row codec
//!
//! Options can be built in code with the `with_*` builders or loaded from a
//! YAML/JSON file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default name of the column that preserves unparseable records
pub const DEFAULT_CORRUPT_RECORD_COLUMN: &str = "_corrupt_record";

/// Ratios above this threshold process every record
pub const SAMPLING_DISABLED_ABOVE: f64 = 0.99;

/// Options shared by inference, decode and encode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Fraction of records used for inference, in (0, 1]
    pub sampling_ratio: f64,

    /// Seed for the record sampler
    pub sampling_seed: u64,

    /// Column that receives the raw text of unparseable records
    pub corrupt_record_column: Option<String>,

    /// Reject `nan`/`inf` string literals for float and double columns
    pub number_format_strict: bool,

    /// Treat empty strings as potential nulls
    pub empty_string_as_null: bool,

    /// Infer fractional literals as decimals when they fit
    pub prefers_decimal: bool,

    /// Infer ISO date-time strings as timestamps and ISO dates as dates
    pub infer_timestamps: bool,

    /// Field names differing only in case are distinct
    pub case_sensitive: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            sampling_ratio: 1.0,
            sampling_seed: 1,
            corrupt_record_column: Some(DEFAULT_CORRUPT_RECORD_COLUMN.to_string()),
            number_format_strict: false,
            empty_string_as_null: true,
            prefers_decimal: false,
            infer_timestamps: false,
            case_sensitive: true,
        }
    }
}

impl CodecOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling ratio
    #[must_use]
    pub fn with_sampling_ratio(mut self, ratio: f64) -> Self {
        self.sampling_ratio = ratio;
        self
    }

    /// Set the sampling seed
    #[must_use]
    pub fn with_sampling_seed(mut self, seed: u64) -> Self {
        self.sampling_seed = seed;
        self
    }

    /// Set the corrupt record column
    #[must_use]
    pub fn with_corrupt_record_column(mut self, name: impl Into<String>) -> Self {
        self.corrupt_record_column = Some(name.into());
        self
    }

    /// Drop corrupt records instead of preserving them
    #[must_use]
    pub fn without_corrupt_record_column(mut self) -> Self {
        self.corrupt_record_column = None;
        self
    }

    /// Enable/disable strict number format
    #[must_use]
    pub fn with_number_format_strict(mut self, strict: bool) -> Self {
        self.number_format_strict = strict;
        self
    }

    /// Enable/disable the empty-string-as-null heuristic
    #[must_use]
    pub fn with_empty_string_as_null(mut self, enabled: bool) -> Self {
        self.empty_string_as_null = enabled;
        self
    }

    /// Enable/disable decimal inference for fractional literals
    #[must_use]
    pub fn with_prefers_decimal(mut self, enabled: bool) -> Self {
        self.prefers_decimal = enabled;
        self
    }

    /// Enable/disable timestamp inference
    #[must_use]
    pub fn with_timestamp_inference(mut self, enabled: bool) -> Self {
        self.infer_timestamps = enabled;
        self
    }

    /// Enable/disable case-sensitive field names
    #[must_use]
    pub fn with_case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    /// Check whether sampling is in effect
    pub fn is_sampling(&self) -> bool {
        self.sampling_ratio <= SAMPLING_DISABLED_ABOVE
    }

    /// Validate the options before any record is read
    pub fn validate(&self) -> Result<()> {
        // NaN fails this comparison too
        if !(self.sampling_ratio > 0.0) {
            return Err(Error::InvalidSamplingRatio {
                ratio: self.sampling_ratio,
            });
        }
        if self.sampling_ratio > 1.0 {
            return Err(Error::invalid_value(
                "sampling_ratio",
                format!("must be at most 1.0, got {}", self.sampling_ratio),
            ));
        }
        if matches!(&self.corrupt_record_column, Some(name) if name.is_empty()) {
            return Err(Error::invalid_value(
                "corrupt_record_column",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Parse options from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            other => Err(Error::config(format!(
                "Unsupported options file extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CodecOptions::default();
        assert!((options.sampling_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            options.corrupt_record_column.as_deref(),
            Some("_corrupt_record")
        );
        assert!(!options.number_format_strict);
        assert!(options.empty_string_as_null);
        assert!(options.case_sensitive);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_sampling_threshold() {
        assert!(!CodecOptions::new().with_sampling_ratio(0.999).is_sampling());
        assert!(!CodecOptions::new().with_sampling_ratio(1.0).is_sampling());
        assert!(CodecOptions::new().with_sampling_ratio(0.99).is_sampling());
        assert!(CodecOptions::new().with_sampling_ratio(0.5).is_sampling());
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        for ratio in [0.0, -0.5, f64::NAN] {
            let result = CodecOptions::new().with_sampling_ratio(ratio).validate();
            assert!(matches!(result, Err(Error::InvalidSamplingRatio { .. })));
        }

        let result = CodecOptions::new().with_sampling_ratio(1.5).validate();
        assert!(matches!(result, Err(Error::InvalidConfigValue { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_corrupt_column() {
        let result = CodecOptions::new()
            .with_corrupt_record_column("")
            .validate();
        assert!(matches!(
            result,
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "corrupt_record_column"
        ));
    }

    #[test]
    fn test_parse_yaml_options() {
        let yaml = r#"
sampling_ratio: 0.25
corrupt_record_column: "_bad"
number_format_strict: true
"#;

        let options = CodecOptions::from_yaml_str(yaml).unwrap();
        assert!((options.sampling_ratio - 0.25).abs() < f64::EPSILON);
        assert_eq!(options.corrupt_record_column.as_deref(), Some("_bad"));
        assert!(options.number_format_strict);
        // Unset fields keep their defaults
        assert!(options.empty_string_as_null);
        assert_eq!(options.sampling_seed, 1);
    }

    #[test]
    fn test_parse_json_options_without_corrupt_column() {
        let options =
            CodecOptions::from_json_str(r#"{"corrupt_record_column": null}"#).unwrap();
        assert!(options.corrupt_record_column.is_none());
    }

    #[test]
    fn test_parse_rejects_zero_ratio() {
        let result = CodecOptions::from_yaml_str("sampling_ratio: 0");
        assert!(matches!(result, Err(Error::InvalidSamplingRatio { .. })));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.yaml");
        std::fs::write(&path, "prefers_decimal: true\n").unwrap();

        let options = CodecOptions::from_file(&path).unwrap();
        assert!(options.prefers_decimal);

        let missing = CodecOptions::from_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));
    }
}
