//! Account and validation context supplied to the responder.
//!
//! A [`Context`] is the flattened view of one service account and its
//! validation summary. Every field is optional: the responder degrades to
//! generic answers for whatever is missing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fixture::{Fixture, ServiceAccount, ValidationSummary};

/// Structured account/validation summary used to personalize replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,

    /// Violations in the order the validator reported them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,

    /// Compliance score as displayed (e.g. "78%")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    /// Account classification (e.g. "Privileged Service Account")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

/// A context field a rule can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    AccountId,
    Owner,
    ApplicationName,
    LastActivityDays,
    TicketId,
    Violations,
    ComplianceScore,
    Recommendation,
    AccountType,
}

impl Field {
    /// The key this field uses in serialized contexts.
    pub fn key(&self) -> &'static str {
        match self {
            Field::AccountId => "accountId",
            Field::Owner => "owner",
            Field::ApplicationName => "applicationName",
            Field::LastActivityDays => "lastActivityDays",
            Field::TicketId => "ticketId",
            Field::Violations => "violations",
            Field::ComplianceScore => "complianceScore",
            Field::Recommendation => "recommendation",
            Field::AccountType => "accountType",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Context {
    /// Start building a context.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Shape an account record and its validation summary into a context.
    pub fn from_records(account: &ServiceAccount, validation: Option<&ValidationSummary>) -> Self {
        let metadata = account.metadata.as_ref();

        Self {
            account_id: Some(account.account_id.clone()),
            owner: account.owner.clone(),
            application_name: account.application.clone(),
            last_activity_days: metadata.and_then(|m| m.last_activity_days),
            ticket_id: metadata.and_then(|m| m.ticket_id.clone()),
            violations: validation.map(|v| v.violations.clone()),
            compliance_score: validation.and_then(|v| v.score.clone()),
            recommendation: validation.and_then(|v| v.recommendation.clone()),
            account_type: metadata.and_then(|m| m.account_type.clone()),
        }
    }

    /// Value of a text field. Blank strings count as absent.
    ///
    /// `lastActivityDays` and `violations` are not text and always yield `None`.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::AccountId => &self.account_id,
            Field::Owner => &self.owner,
            Field::ApplicationName => &self.application_name,
            Field::TicketId => &self.ticket_id,
            Field::ComplianceScore => &self.compliance_score,
            Field::Recommendation => &self.recommendation,
            Field::AccountType => &self.account_type,
            Field::LastActivityDays | Field::Violations => return None,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Whether the given field carries a usable value.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::LastActivityDays => self.last_activity_days.is_some(),
            Field::Violations => self.violations.is_some(),
            text => self.get(text).is_some(),
        }
    }

    /// True when no field is set; such a context is treated as absent.
    pub fn is_empty(&self) -> bool {
        ALL_FIELDS.iter().all(|f| !self.has(*f))
    }
}

const ALL_FIELDS: [Field; 9] = [
    Field::AccountId,
    Field::Owner,
    Field::ApplicationName,
    Field::LastActivityDays,
    Field::TicketId,
    Field::Violations,
    Field::ComplianceScore,
    Field::Recommendation,
    Field::AccountType,
];

impl From<&Fixture> for Context {
    fn from(fixture: &Fixture) -> Self {
        Context::from_records(&fixture.account, fixture.validation.as_ref())
    }
}

/// Builder for [`Context`] with a fluent API.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    context: Context,
}

impl ContextBuilder {
    pub fn account_id(mut self, value: impl Into<String>) -> Self {
        self.context.account_id = Some(value.into());
        self
    }

    pub fn owner(mut self, value: impl Into<String>) -> Self {
        self.context.owner = Some(value.into());
        self
    }

    pub fn application_name(mut self, value: impl Into<String>) -> Self {
        self.context.application_name = Some(value.into());
        self
    }

    pub fn last_activity_days(mut self, days: u32) -> Self {
        self.context.last_activity_days = Some(days);
        self
    }

    pub fn ticket_id(mut self, value: impl Into<String>) -> Self {
        self.context.ticket_id = Some(value.into());
        self
    }

    /// Set the violations, keeping their order.
    pub fn violations<I, S>(mut self, violations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context.violations = Some(violations.into_iter().map(Into::into).collect());
        self
    }

    pub fn compliance_score(mut self, value: impl Into<String>) -> Self {
        self.context.compliance_score = Some(value.into());
        self
    }

    pub fn recommendation(mut self, value: impl Into<String>) -> Self {
        self.context.recommendation = Some(value.into());
        self
    }

    pub fn account_type(mut self, value: impl Into<String>) -> Self {
        self.context.account_type = Some(value.into());
        self
    }

    pub fn build(self) -> Context {
        self.context
    }
}

/// Read-only lookup that supplies contexts by account id.
pub trait ContextProvider: Send + Sync {
    /// Look up the context for an account, if the provider knows it.
    fn lookup(&self, account_id: &str) -> Option<Context>;
}

/// In-memory provider backed by loaded fixtures.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    contexts: BTreeMap<String, Context>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from fixtures; later fixtures replace earlier ones
    /// with the same account id.
    pub fn from_fixtures<'a>(fixtures: impl IntoIterator<Item = &'a Fixture>) -> Self {
        let mut provider = Self::new();
        for fixture in fixtures {
            provider.insert(Context::from(fixture));
        }
        provider
    }

    /// Insert a context keyed by its account id. Contexts without an
    /// account id are ignored.
    pub fn insert(&mut self, context: Context) {
        if let Some(id) = context.account_id.clone() {
            self.contexts.insert(id, context);
        }
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Known account ids in sorted order.
    pub fn account_ids(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }
}

impl ContextProvider for FixtureProvider {
    fn lookup(&self, account_id: &str) -> Option<Context> {
        self.contexts.get(account_id.trim()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::AccountMetadata;

    fn sample_account() -> ServiceAccount {
        ServiceAccount {
            account_id: "svc-usr123".to_string(),
            application: Some("CustomerDataPipeline".to_string()),
            owner: Some("John Doe".to_string()),
            last_used: Some("2025-01-10".to_string()),
            evidence: vec!["JIRA-1182".to_string()],
            metadata: Some(AccountMetadata {
                ticket_id: Some("JIRA-1182".to_string()),
                last_activity_days: Some(125),
                account_type: Some("Privileged Service Account".to_string()),
            }),
        }
    }

    fn sample_validation() -> ValidationSummary {
        ValidationSummary {
            compliance: Some("Partially Compliant".to_string()),
            score: Some("78%".to_string()),
            violations: vec!["Inactive > 90 days".to_string(), "Stale approval".to_string()],
            recommendation: Some("Get owner reconfirmation".to_string()),
            explanation: None,
        }
    }

    #[test]
    fn test_from_records_maps_all_fields() {
        let context = Context::from_records(&sample_account(), Some(&sample_validation()));

        assert_eq!(context.account_id.as_deref(), Some("svc-usr123"));
        assert_eq!(context.owner.as_deref(), Some("John Doe"));
        assert_eq!(context.application_name.as_deref(), Some("CustomerDataPipeline"));
        assert_eq!(context.last_activity_days, Some(125));
        assert_eq!(context.ticket_id.as_deref(), Some("JIRA-1182"));
        assert_eq!(context.compliance_score.as_deref(), Some("78%"));
        assert_eq!(context.account_type.as_deref(), Some("Privileged Service Account"));
        assert_eq!(
            context.violations,
            Some(vec!["Inactive > 90 days".to_string(), "Stale approval".to_string()])
        );
    }

    #[test]
    fn test_from_records_without_validation() {
        let context = Context::from_records(&sample_account(), None);
        assert!(context.violations.is_none());
        assert!(!context.has(Field::Violations));
        assert!(context.has(Field::Owner));
    }

    #[test]
    fn test_blank_strings_are_absent() {
        let context = Context::builder().owner("   ").build();
        assert!(!context.has(Field::Owner));
        assert!(context.is_empty());
    }

    #[test]
    fn test_get_filters_blank_text() {
        let context = Context::builder()
            .account_id("svc-1")
            .recommendation("")
            .account_type("  ")
            .last_activity_days(5)
            .build();
        assert_eq!(context.get(Field::AccountId), Some("svc-1"));
        assert_eq!(context.get(Field::Recommendation), None);
        assert_eq!(context.get(Field::AccountType), None);
        assert_eq!(context.get(Field::LastActivityDays), None);
        assert!(context.has(Field::LastActivityDays));
    }

    #[test]
    fn test_empty_violation_list_is_present() {
        let context = Context::builder().violations(Vec::<String>::new()).build();
        assert!(context.has(Field::Violations));
        assert!(!context.is_empty());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let context = Context::builder()
            .account_id("svc-1")
            .last_activity_days(12)
            .build();
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["accountId"], "svc-1");
        assert_eq!(json["lastActivityDays"], 12);
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn test_provider_lookup() {
        let mut provider = FixtureProvider::new();
        provider.insert(Context::builder().account_id("svc-a").owner("Ana").build());
        provider.insert(Context::builder().owner("nobody").build());

        assert_eq!(provider.len(), 1);
        let found = provider.lookup(" svc-a ").unwrap();
        assert_eq!(found.owner.as_deref(), Some("Ana"));
        assert!(provider.lookup("svc-b").is_none());
    }
}
