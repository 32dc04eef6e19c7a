//! The ordered rule table.
//!
//! Rules are checked top to bottom and only the first applicable rule fires.
//! Contextual rules sit first so the broader generic keywords further down
//! cannot shadow them.
//!
//! | # | Rule | Requires |
//! |---|------|----------|
//! | 1 | `violation-explanation` | violations |
//! | 2 | `violation-summary` | violations |
//! | 3 | `remediation-plan` | accountId, owner, ticketId |
//! | 4 | `risk-assessment` | accountId, complianceScore |
//! | 5 | `account-summary` | accountId |
//! | 6 | `greeting` | |
//! | 7 | `iam-definition` | |
//! | 8 | `validation-process` | |
//! | 9 | `compliance-definition` | |
//! | 10 | `inactive-accounts` | |
//! | 11 | `evidence` | |
//! | 12 | `remediation-guidance` | |
//! | 13 | `permissions` | |
//! | 14 | `architecture` | |
//! | 15 | `validate-howto` | |
//! | 16 | `capabilities` | |

mod keywords;
mod templates;

use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::context::{Context, Field};

pub use keywords::{normalize, KeywordExpr};
pub use templates::{numbered_list, FALLBACK_RESPONSE, INACTIVITY_THRESHOLD_DAYS};

/// Renders a reply, given the context the caller supplied.
pub type Template = fn(Option<&Context>) -> String;

/// Identifier of a rule in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    ViolationExplanation,
    ViolationSummary,
    RemediationPlan,
    RiskAssessment,
    AccountSummary,
    Greeting,
    IamDefinition,
    ValidationProcess,
    ComplianceDefinition,
    InactiveAccounts,
    Evidence,
    RemediationGuidance,
    Permissions,
    Architecture,
    ValidateHowto,
    Capabilities,
    /// No rule matched
    Fallback,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ViolationExplanation => "violation-explanation",
            RuleId::ViolationSummary => "violation-summary",
            RuleId::RemediationPlan => "remediation-plan",
            RuleId::RiskAssessment => "risk-assessment",
            RuleId::AccountSummary => "account-summary",
            RuleId::Greeting => "greeting",
            RuleId::IamDefinition => "iam-definition",
            RuleId::ValidationProcess => "validation-process",
            RuleId::ComplianceDefinition => "compliance-definition",
            RuleId::InactiveAccounts => "inactive-accounts",
            RuleId::Evidence => "evidence",
            RuleId::RemediationGuidance => "remediation-guidance",
            RuleId::Permissions => "permissions",
            RuleId::Architecture => "architecture",
            RuleId::ValidateHowto => "validate-howto",
            RuleId::Capabilities => "capabilities",
            RuleId::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One keyword rule: a predicate, the context it needs, and its template.
#[derive(Clone)]
pub struct Rule {
    pub id: RuleId,

    /// Short human-readable description
    pub description: &'static str,

    pub predicate: KeywordExpr,

    /// Context fields that must be present for the rule to fire
    pub requires: &'static [Field],

    template: Template,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("predicate", &self.predicate.to_string())
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

impl Rule {
    pub fn new(
        id: RuleId,
        description: &'static str,
        predicate: KeywordExpr,
        requires: &'static [Field],
        template: Template,
    ) -> Self {
        Self {
            id,
            description,
            predicate,
            requires,
            template,
        }
    }

    /// Whether this rule needs context at all.
    pub fn is_contextual(&self) -> bool {
        !self.requires.is_empty()
    }

    /// Whether every required field is present in the context.
    pub fn context_satisfied(&self, context: Option<&Context>) -> bool {
        if self.requires.is_empty() {
            return true;
        }
        context.is_some_and(|c| self.requires.iter().all(|f| c.has(*f)))
    }

    pub fn render(&self, context: Option<&Context>) -> String {
        (self.template)(context)
    }
}

lazy_static! {
    /// The default rule table, in priority order.
    pub static ref DEFAULT_RULES: Vec<Rule> = default_rules();
}

fn default_rules() -> Vec<Rule> {
    use KeywordExpr as K;

    vec![
        Rule::new(
            RuleId::ViolationExplanation,
            "Explain the account's violations",
            K::contains("why").and(K::any_of(&["violation", "compliance"])),
            &[Field::Violations],
            templates::violation_explanation,
        ),
        Rule::new(
            RuleId::ViolationSummary,
            "Count the account's violations and name the main ones",
            K::any_of(&["violation", "issue"]),
            &[Field::Violations],
            templates::violation_summary,
        ),
        Rule::new(
            RuleId::RemediationPlan,
            "Remediation plan naming the owner and approval ticket",
            K::any_of(&["fix", "remediate", "solution"]),
            &[Field::AccountId, Field::Owner, Field::TicketId],
            templates::remediation_plan,
        ),
        Rule::new(
            RuleId::RiskAssessment,
            "Risk factors and impact for the account",
            K::any_of(&["risk", "score"]),
            &[Field::AccountId, Field::ComplianceScore],
            templates::risk_assessment,
        ),
        Rule::new(
            RuleId::AccountSummary,
            "Summary of the account under review",
            K::any_of(&["account", "service"]),
            &[Field::AccountId],
            templates::account_summary,
        ),
        Rule::new(
            RuleId::Greeting,
            "Greeting",
            K::any_word(&["hello", "hi", "hey"]),
            &[],
            templates::greeting,
        ),
        Rule::new(
            RuleId::IamDefinition,
            "What IAM is",
            K::contains("what").and(K::contains("iam")),
            &[],
            templates::iam_definition,
        ),
        Rule::new(
            RuleId::ValidationProcess,
            "How validation works",
            K::contains("validation").and(K::contains("process")),
            &[],
            templates::validation_process,
        ),
        Rule::new(
            RuleId::ComplianceDefinition,
            "Service account compliance requirements",
            K::any_of(&["compliance", "compliant"]),
            &[],
            templates::compliance_definition,
        ),
        Rule::new(
            RuleId::InactiveAccounts,
            "Inactive account policy",
            K::contains("inactive"),
            &[],
            templates::inactive_accounts,
        ),
        Rule::new(
            RuleId::Evidence,
            "Supporting evidence",
            K::contains("evidence"),
            &[],
            templates::evidence,
        ),
        Rule::new(
            RuleId::RemediationGuidance,
            "Generic remediation steps",
            K::any_of(&["fix", "remediate"]),
            &[],
            templates::remediation_guidance,
        ),
        Rule::new(
            RuleId::Permissions,
            "Least-privilege guidance",
            K::any_of(&["permission", "access"]),
            &[],
            templates::permissions,
        ),
        Rule::new(
            RuleId::Architecture,
            "How the assistant works",
            K::any_of(&["architecture", "how it works"]),
            &[],
            templates::architecture,
        ),
        Rule::new(
            RuleId::ValidateHowto,
            "How to validate an account",
            K::any_of(&["check", "validate"]),
            &[],
            templates::validate_howto,
        ),
        Rule::new(
            RuleId::Capabilities,
            "What the assistant can help with",
            K::contains("help"),
            &[],
            templates::capabilities,
        ),
    ]
}
