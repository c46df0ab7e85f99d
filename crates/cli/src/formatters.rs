//! Output formatters for CLI commands.
//!
//! Provides two output formats: plain text and JSON.
//!
//! Invariants:
//! - Values of sensitive keys are masked unless the caller asks to reveal them.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use stratum_config::Resolved;
use stratum_config::constants::REDACTED;
use stratum_config::redact::is_sensitive_key;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format: {s}. Valid options: text, json"
            )),
        }
    }
}

/// Resolved key output structure.
#[derive(Debug, Clone, Serialize)]
pub struct ValueOutput {
    pub key: String,
    pub value: serde_json::Value,
    pub source: String,
    pub redacted: bool,
}

impl ValueOutput {
    pub fn new(key: &str, resolved: &Resolved, reveal: bool) -> Result<Self> {
        let redacted = !reveal && is_sensitive_key(key);
        let value = if redacted {
            serde_json::Value::String(REDACTED.to_string())
        } else {
            serde_json::to_value(&resolved.value)?
        };
        Ok(Self {
            key: key.to_string(),
            value,
            source: resolved.source.to_string(),
            redacted,
        })
    }

    fn text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other)
                .map(|yaml| yaml.trim_end().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Environment variable name output structure.
#[derive(Debug, Clone, Serialize)]
pub struct EnvNameOutput {
    pub key: String,
    pub env_name: String,
}

pub fn format_keys(format: OutputFormat, keys: &[String]) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(keys)?),
        OutputFormat::Text => Ok(keys.join("\n")),
    }
}

pub fn format_value(format: OutputFormat, value: &ValueOutput) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(format!("{}\t({})", value.text(), value.source)),
    }
}

pub fn format_env_name(format: OutputFormat, output: &EnvNameOutput) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Text => Ok(output.env_name.clone()),
    }
}

pub fn format_files(format: OutputFormat, files: &[PathBuf]) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(files)?),
        OutputFormat::Text => Ok(files
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use stratum_config::Source;

    fn resolved(value: Value) -> Resolved {
        Resolved {
            value,
            source: Source::File,
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_sensitive_value_masked_unless_revealed() {
        let secret = resolved(Value::from("hunter2"));

        let masked = ValueOutput::new("db.password", &secret, false).unwrap();
        assert!(masked.redacted);
        let text = format_value(OutputFormat::Text, &masked).unwrap();
        assert!(!text.contains("hunter2"));
        let json = format_value(OutputFormat::Json, &masked).unwrap();
        assert!(!json.contains("hunter2"));

        let revealed = ValueOutput::new("db.password", &secret, true).unwrap();
        assert!(!revealed.redacted);
        assert_eq!(format_value(OutputFormat::Text, &revealed).unwrap(), "hunter2\t(file)");
    }

    #[test]
    fn test_json_keeps_value_types() {
        let port = ValueOutput::new("server.port", &resolved(Value::from(8080)), false).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_value(OutputFormat::Json, &port).unwrap()).unwrap();
        assert_eq!(json["value"], 8080);
        assert_eq!(json["source"], "file");
        assert_eq!(json["redacted"], false);
    }

    #[test]
    fn test_text_lists() {
        let keys = vec!["a.b".to_string(), "c".to_string()];
        assert_eq!(format_keys(OutputFormat::Text, &keys).unwrap(), "a.b\nc");
        let files = vec![PathBuf::from("/etc/base.yaml")];
        assert_eq!(format_files(OutputFormat::Text, &files).unwrap(), "/etc/base.yaml");
    }
}
