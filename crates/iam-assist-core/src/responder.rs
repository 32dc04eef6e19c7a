//! The response generator.
//!
//! `respond` is a pure function of (message, context, rule table): no I/O,
//! no hidden state, no randomness. Every input resolves to a non-empty reply.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::rules::{normalize, Rule, RuleId, DEFAULT_RULES, FALLBACK_RESPONSE};

/// A reply together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub rule: RuleId,
    pub text: String,
}

/// Anything that can answer a message synchronously.
pub trait Responder: Send + Sync {
    fn reply(&self, message: &str, context: Option<&Context>) -> Reply;
}

/// Keyword-driven response generator over an ordered rule table.
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    rules: Cow<'static, [Rule]>,
}

impl ResponseGenerator {
    /// Generator over the default rule table.
    pub fn new() -> Self {
        Self {
            rules: Cow::Borrowed(DEFAULT_RULES.as_slice()),
        }
    }

    /// Generator over a custom table, checked in the given order.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self {
            rules: Cow::Owned(rules),
        }
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Answer a message, returning only the text.
    pub fn respond(&self, message: &str, context: Option<&Context>) -> String {
        self.respond_detailed(message, context).text
    }

    /// Answer a message, reporting which rule fired.
    pub fn respond_detailed(&self, message: &str, context: Option<&Context>) -> Reply {
        let normalized = normalize(message);
        // An empty context carries nothing a contextual rule could use.
        let context = context.filter(|c| !c.is_empty());

        match self.select(&normalized, context) {
            Some(rule) => {
                tracing::debug!(rule = %rule.id, contextual = context.is_some(), "Rule matched");
                Reply {
                    rule: rule.id,
                    text: rule.render(context),
                }
            }
            None => {
                tracing::debug!(rule = %RuleId::Fallback, "No rule matched");
                Reply {
                    rule: RuleId::Fallback,
                    text: FALLBACK_RESPONSE.to_string(),
                }
            }
        }
    }

    /// First rule whose predicate matches and whose context needs are met.
    fn select(&self, normalized: &str, context: Option<&Context>) -> Option<&Rule> {
        self.rules.iter().find(|rule| {
            if !rule.predicate.matches(normalized) {
                return false;
            }
            if !rule.context_satisfied(context) {
                tracing::trace!(rule = %rule.id, "Skipping rule: required context missing");
                return false;
            }
            true
        })
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder for ResponseGenerator {
    fn reply(&self, message: &str, context: Option<&Context>) -> Reply {
        self.respond_detailed(message, context)
    }
}
