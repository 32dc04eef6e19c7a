//! # iam-assist-core
//!
//! Deterministic, keyword-driven assistant for service-account compliance
//! questions.
//!
//! Given a free-text message and an optional [`Context`] (one account and its
//! validation summary), the [`ResponseGenerator`] walks an ordered rule table
//! and renders the first applicable template.
//!
//! ## Key Guarantees
//!
//! 1. **Pure**: same message, context and rule table always produce the same reply
//! 2. **Total**: every input resolves to a non-empty reply, never an error
//! 3. **Ordered**: exactly one rule fires, the first applicable one
//! 4. **Shareable**: the rule table is read-only after first use
//!
//! ## Example
//!
//! ```rust
//! use iam_assist_core::{respond, Context};
//!
//! let context = Context::builder()
//!     .account_id("svc-usr123")
//!     .owner("John Doe")
//!     .ticket_id("JIRA-1182")
//!     .build();
//!
//! let reply = respond("How do I fix this?", Some(&context));
//! assert!(reply.contains("John Doe"));
//! assert!(reply.contains("JIRA-1182"));
//! ```

pub mod context;
pub mod fixture;
pub mod responder;
pub mod rules;

// Re-export main types at crate root
pub use context::{Context, ContextBuilder, ContextProvider, Field, FixtureProvider};
pub use fixture::{AccountMetadata, Fixture, FixtureError, ServiceAccount, ValidationSummary};
pub use responder::{Reply, Responder, ResponseGenerator};
pub use rules::{KeywordExpr, Rule, RuleId, DEFAULT_RULES, FALLBACK_RESPONSE};

/// Answer a message with the default rule table.
///
/// This is the main entry point for one-off calls.
pub fn respond(message: &str, context: Option<&Context>) -> String {
    ResponseGenerator::new().respond(message, context)
}

/// Answer a message with the default rule table, reporting the rule that fired.
pub fn respond_detailed(message: &str, context: Option<&Context>) -> Reply {
    ResponseGenerator::new().respond_detailed(message, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_to_reply() {
        let fixture = Fixture::from_yaml(
            r#"
account:
  account_id: "svc-usr123"
  owner: "John Doe"
  metadata:
    ticket_id: "JIRA-1182"
    last_activity_days: 125
validation:
  score: "78%"
  violations:
    - "Inactive > 90 days"
"#,
        )
        .unwrap();

        let context = Context::from(&fixture);
        let reply = respond_detailed("Why is this account out of compliance?", Some(&context));

        assert_eq!(reply.rule, RuleId::ViolationExplanation);
        assert!(reply.text.contains("svc-usr123"));
        assert!(reply.text.contains("1. Inactive > 90 days"));
    }

    #[test]
    fn test_provider_lookup_feeds_responder() {
        let fixture = Fixture::from_json(
            r#"{"account": {"account_id": "svc-a", "application": "Ledger"}}"#,
        )
        .unwrap();
        let provider = FixtureProvider::from_fixtures([&fixture]);

        let context = provider.lookup("svc-a");
        let reply = respond_detailed("tell me about this service", context.as_ref());
        assert_eq!(reply.rule, RuleId::AccountSummary);
        assert!(reply.text.contains("Ledger"));
    }
}
