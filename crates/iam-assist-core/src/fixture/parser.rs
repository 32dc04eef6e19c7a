//! Fixture parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_fixture_schema;

/// Errors that can occur when loading fixtures.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Fixture failed schema validation: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Metadata attached to a service account record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetadata {
    #[serde(default)]
    pub ticket_id: Option<String>,

    #[serde(default)]
    pub last_activity_days: Option<u32>,

    #[serde(default)]
    pub account_type: Option<String>,
}

/// A service account record as the data provider returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub account_id: String,

    /// Owning application
    #[serde(default)]
    pub application: Option<String>,

    /// Accountable human owner
    #[serde(default)]
    pub owner: Option<String>,

    /// Date of last use (as displayed, e.g. "2025-01-10")
    #[serde(default)]
    pub last_used: Option<String>,

    /// Names of supporting evidence documents
    #[serde(default)]
    pub evidence: Vec<String>,

    #[serde(default)]
    pub metadata: Option<AccountMetadata>,
}

/// Validation summary for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Compliance status (e.g. "Partially Compliant")
    #[serde(default)]
    pub compliance: Option<String>,

    #[serde(default)]
    pub score: Option<String>,

    #[serde(default)]
    pub violations: Vec<String>,

    #[serde(default)]
    pub recommendation: Option<String>,

    #[serde(default)]
    pub explanation: Option<String>,
}

/// One account with its optional validation summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub account: ServiceAccount,

    #[serde(default)]
    pub validation: Option<ValidationSummary>,
}

impl Fixture {
    /// Parse a fixture from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let json = serde_json::to_value(value)?;
        Self::from_value(json)
    }

    /// Parse a fixture from JSON string.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a fixture from a file, choosing the format by extension.
    ///
    /// `.json` files are read as JSON; everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, FixtureError> {
        validate_fixture_schema(&value).map_err(FixtureError::SchemaError)?;
        let fixture: Fixture = serde_json::from_value(value)?;
        fixture.validate()?;
        Ok(fixture)
    }

    /// Checks the schema cannot express.
    fn validate(&self) -> Result<(), FixtureError> {
        if self.account.account_id.trim().is_empty() {
            return Err(FixtureError::MissingField("account.account_id".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_FIXTURE: &str = r#"
account:
  account_id: "svc-usr123"
  application: "CustomerDataPipeline"
  owner: "John Doe"
  last_used: "2025-01-10"
  evidence:
    - "JIRA-1182"
    - "Email Approval Screenshot"
  metadata:
    ticket_id: "JIRA-1182"
    last_activity_days: 125
    account_type: "Privileged Service Account"
validation:
  compliance: "Partially Compliant"
  score: "78%"
  violations:
    - "Inactive > 90 days"
  recommendation: "Get owner reconfirmation for inactive account"
"#;

    #[test]
    fn test_parse_valid_fixture() {
        let fixture = Fixture::from_yaml(VALID_FIXTURE).unwrap();
        assert_eq!(fixture.account.account_id, "svc-usr123");
        assert_eq!(fixture.account.evidence.len(), 2);
        assert_eq!(
            fixture.account.metadata.as_ref().unwrap().last_activity_days,
            Some(125)
        );
        assert_eq!(
            fixture.validation.as_ref().unwrap().violations,
            vec!["Inactive > 90 days".to_string()]
        );
    }

    #[test]
    fn test_parse_json_fixture() {
        let json = r#"{"account": {"account_id": "svc-json"}}"#;
        let fixture = Fixture::from_json(json).unwrap();
        assert_eq!(fixture.account.account_id, "svc-json");
        assert!(fixture.validation.is_none());
    }

    #[test]
    fn test_missing_account_fails_schema() {
        let yaml = r#"
validation:
  score: "10%"
"#;
        let result = Fixture::from_yaml(yaml);
        assert!(matches!(result, Err(FixtureError::SchemaError(_))));
    }

    #[test]
    fn test_negative_activity_days_fails_schema() {
        let yaml = r#"
account:
  account_id: "svc-1"
  metadata:
    last_activity_days: -4
"#;
        let result = Fixture::from_yaml(yaml);
        assert!(matches!(result, Err(FixtureError::SchemaError(_))));
    }

    #[test]
    fn test_blank_account_id_rejected() {
        let yaml = r#"
account:
  account_id: "   "
"#;
        let result = Fixture::from_yaml(yaml);
        assert!(matches!(result, Err(FixtureError::MissingField(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = Fixture::from_yaml("account: [unclosed");
        assert!(matches!(result, Err(FixtureError::YamlError(_))));
    }
}
