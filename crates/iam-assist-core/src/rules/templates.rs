//! Reply templates.
//!
//! Contextual templates only run once their rule's required fields are
//! present, but every lookup still degrades to neutral wording so that a
//! template is total on its own.

use crate::context::{Context, Field};

/// Days without activity after which an account is out of compliance.
pub const INACTIVITY_THRESHOLD_DAYS: u32 = 90;

/// Reply used when no rule matches.
pub const FALLBACK_RESPONSE: &str = "I'm your IAM assistant for service account validation. \
Could you be more specific? I can help you with:\n\
\n\
**Topics:**\n\
• Service account compliance and validation\n\
• Security risk assessment and mitigation\n\
• Remediation planning for violations\n\
• IAM best practices and access reviews\n\
• Evidence and approval documentation\n\
\n\
Try asking why an account has violations, how to fix them, or what the risks are.";

fn field(context: Option<&Context>, field: Field) -> Option<&str> {
    context.and_then(|c| c.get(field))
}

fn account_id(context: Option<&Context>) -> &str {
    field(context, Field::AccountId).unwrap_or("this account")
}

fn violations(context: Option<&Context>) -> &[String] {
    context
        .and_then(|c| c.violations.as_deref())
        .unwrap_or_default()
}

/// Render violations as a numbered list, preserving order.
pub fn numbered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn violation_explanation(context: Option<&Context>) -> String {
    let account = account_id(context);
    let violations = violations(context);

    if violations.is_empty() {
        return format!(
            "Good news! No compliance violations were recorded for account {}. \
             It currently meets the service account policy checks.",
            account
        );
    }

    let mut paragraphs = vec![
        format!("Based on my analysis of account {}, here are the specific violations:", account),
        numbered_list(violations),
    ];

    if let Some(days) = context.and_then(|c| c.last_activity_days) {
        if days > INACTIVITY_THRESHOLD_DAYS {
            paragraphs.push(format!(
                "The primary issue is that this account hasn't been active for {} days, \
                 exceeding the {}-day compliance threshold.",
                days, INACTIVITY_THRESHOLD_DAYS
            ));
        } else {
            paragraphs.push(format!(
                "The account was last active {} days ago, within the {}-day activity threshold.",
                days, INACTIVITY_THRESHOLD_DAYS
            ));
        }
    }

    if let Some(ticket) = field(context, Field::TicketId) {
        paragraphs.push(format!(
            "The approval documentation ({}) should be reviewed and renewed if it is stale.",
            ticket
        ));
    }

    paragraphs.join("\n\n")
}

pub(crate) fn violation_summary(context: Option<&Context>) -> String {
    let violations = violations(context);

    match violations {
        [] => "Great news! No compliance violations were found for this account.".to_string(),
        [only] => format!(
            "I found 1 compliance violation for this account: {}. \
             Would you like details on how to resolve it?",
            only
        ),
        _ => format!(
            "I found {} compliance violations for this account. The main issues are: {}. \
             Would you like details on how to resolve these?",
            violations.len(),
            violations[..2].join(", ")
        ),
    }
}

pub(crate) fn remediation_plan(context: Option<&Context>) -> String {
    let account = account_id(context);
    let owner = field(context, Field::Owner).unwrap_or("the account owner");
    let ticket = field(context, Field::TicketId).unwrap_or("the original approval");

    format!(
        "Here's a remediation plan for {account}:\n\
         \n\
         **Immediate Actions:**\n\
         1. Contact the owner ({owner}) to verify the account is still needed\n\
         2. Update or create a new approval ticket to replace {ticket}\n\
         3. Review current permissions and apply the principle of least privilege\n\
         \n\
         **Compliance Steps:**\n\
         1. Document the business justification for continued access\n\
         2. Set up automated monitoring for future activity\n\
         3. Establish a regular review schedule (quarterly)\n\
         \n\
         **Risk Mitigation:**\n\
         If the account is unused, deactivate it to reduce security exposure."
    )
}

pub(crate) fn risk_assessment(context: Option<&Context>) -> String {
    let account = account_id(context);
    let mut reply = format!("The security risks for account {} include:\n\n**Risk Factors:**\n", account);

    match context.and_then(|c| c.last_activity_days) {
        Some(days) if days > INACTIVITY_THRESHOLD_DAYS => {
            reply.push_str(&format!("• Dormant account ({} days inactive)\n", days));
        }
        Some(days) => {
            reply.push_str(&format!("• Last activity {} days ago\n", days));
        }
        None => {}
    }
    reply.push_str("• Stale approvals increase unauthorized access risk\n");
    reply.push_str("• Potential for privilege creep over time\n");

    reply.push_str("\n**Impact Assessment:**\n");
    if let Some(kind) = field(context, Field::AccountType) {
        reply.push_str(&format!("• Account type: {}\n", kind));
    }
    if let Some(app) = field(context, Field::ApplicationName) {
        reply.push_str(&format!("• Application: {}\n", app));
    }
    let score = field(context, Field::ComplianceScore).unwrap_or("unknown");
    reply.push_str(&format!("• Current compliance score: {}", score));

    if let Some(recommendation) = field(context, Field::Recommendation) {
        reply.push_str(&format!("\n\nRecommendation: {}", recommendation));
    }

    reply
}

pub(crate) fn account_summary(context: Option<&Context>) -> String {
    let account = account_id(context);
    let mut reply = format!("I can see you're working with service account \"{}\"", account);

    if let Some(app) = field(context, Field::ApplicationName) {
        reply.push_str(&format!(" for {}", app));
    }
    reply.push('.');

    if let Some(score) = field(context, Field::ComplianceScore) {
        reply.push_str(&format!(" The validation shows a compliance score of {}", score));
        match context.and_then(|c| c.violations.as_ref()).map(Vec::len) {
            Some(0) | None => reply.push('.'),
            Some(1) => reply.push_str(" with 1 open violation."),
            Some(n) => reply.push_str(&format!(" with {} open violations.", n)),
        }
    }

    reply.push_str(" Would you like me to explain any specific findings?");
    reply
}

pub(crate) fn greeting(_context: Option<&Context>) -> String {
    "Hello! I'm your IAM validation assistant. I can explain compliance findings, \
     assess service account risk, and walk you through remediation. What would you like to know?"
        .to_string()
}

pub(crate) fn iam_definition(_context: Option<&Context>) -> String {
    "IAM (Identity and Access Management) is the security framework that ensures the right \
     identities have appropriate access to technology resources. Key components include:\n\
     \n\
     **Core Principles:**\n\
     • Identity verification and authentication\n\
     • Authorization and access control\n\
     • Principle of least privilege\n\
     • Regular access reviews\n\
     \n\
     **For Service Accounts:**\n\
     • Automated credential management\n\
     • Activity monitoring and compliance\n\
     • Regular validation and cleanup\n\
     • Proper documentation and approval workflows"
        .to_string()
}

pub(crate) fn validation_process(_context: Option<&Context>) -> String {
    "The validation process checks service accounts against compliance rules. It verifies \
     last usage, ownership, approval documentation, and proper permissions."
        .to_string()
}

pub(crate) fn compliance_definition(_context: Option<&Context>) -> String {
    format!(
        "Compliance for service accounts requires: 1) Activity within {} days, 2) Valid ownership, \
         3) Current approval documentation, and 4) Proper access controls. Accounts not meeting \
         these are flagged for remediation.",
        INACTIVITY_THRESHOLD_DAYS
    )
}

pub(crate) fn inactive_accounts(_context: Option<&Context>) -> String {
    format!(
        "Inactive accounts (no usage for over {} days) pose a security risk and should be reviewed. \
         The owner should either confirm the account is still needed or it should be decommissioned.",
        INACTIVITY_THRESHOLD_DAYS
    )
}

pub(crate) fn evidence(_context: Option<&Context>) -> String {
    "Evidence for service accounts includes ticketing records, email approvals, access request \
     forms, and usage logs. These are used to validate the account's purpose and authorization."
        .to_string()
}

pub(crate) fn remediation_guidance(_context: Option<&Context>) -> String {
    "To remediate compliance issues: 1) Update approval documentation, 2) Confirm with the owner \
     that the account is still needed, 3) Review and adjust permissions if necessary, or \
     4) Decommission the account if it is no longer required."
        .to_string()
}

pub(crate) fn permissions(_context: Option<&Context>) -> String {
    "Service account permissions should follow the principle of least privilege. Regular access \
     reviews help ensure accounts only hold the permissions they need."
        .to_string()
}

pub(crate) fn architecture(_context: Option<&Context>) -> String {
    "The assistant uses a single agent with tool use: it collects account metadata and evidence, \
     then applies compliance rules to evaluate each service account."
        .to_string()
}

pub(crate) fn validate_howto(_context: Option<&Context>) -> String {
    "To validate an account, enter the service account ID and run the validation. You'll get the \
     compliance result, the violations found, and a recommendation."
        .to_string()
}

pub(crate) fn capabilities(_context: Option<&Context>) -> String {
    "I can help you with IAM validation, explain compliance issues, provide guidance on fixing \
     violations, and answer questions about service account security best practices."
        .to_string()
}
