//! Keyword predicates evaluated against normalized messages.
//!
//! Messages are lowercased and trimmed once before matching, so every keyword
//! here is written in lowercase.

use std::fmt;

use regex::Regex;

/// A boolean expression over keyword hits.
#[derive(Debug, Clone)]
pub enum KeywordExpr {
    /// Plain substring containment
    Contains(&'static str),

    /// Whole-word match, for short tokens that would otherwise fire inside
    /// longer words ("hi" in "this")
    Word { keyword: &'static str, pattern: Regex },

    /// At least one sub-expression matches
    Any(Vec<KeywordExpr>),

    /// Every sub-expression matches
    All(Vec<KeywordExpr>),
}

impl KeywordExpr {
    pub fn contains(keyword: &'static str) -> Self {
        KeywordExpr::Contains(keyword)
    }

    pub fn word(keyword: &'static str) -> Self {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
            .expect("escaped keyword is always a valid pattern");
        KeywordExpr::Word { keyword, pattern }
    }

    /// Substring match on any of the keywords.
    pub fn any_of(keywords: &[&'static str]) -> Self {
        KeywordExpr::Any(keywords.iter().copied().map(KeywordExpr::Contains).collect())
    }

    /// Whole-word match on any of the keywords.
    pub fn any_word(keywords: &[&'static str]) -> Self {
        KeywordExpr::Any(keywords.iter().copied().map(KeywordExpr::word).collect())
    }

    pub fn and(self, other: KeywordExpr) -> Self {
        match self {
            KeywordExpr::All(mut parts) => {
                parts.push(other);
                KeywordExpr::All(parts)
            }
            first => KeywordExpr::All(vec![first, other]),
        }
    }

    /// Evaluate against an already-normalized message.
    pub fn matches(&self, message: &str) -> bool {
        match self {
            KeywordExpr::Contains(keyword) => message.contains(keyword),
            KeywordExpr::Word { pattern, .. } => pattern.is_match(message),
            KeywordExpr::Any(parts) => parts.iter().any(|p| p.matches(message)),
            KeywordExpr::All(parts) => parts.iter().all(|p| p.matches(message)),
        }
    }
}

impl fmt::Display for KeywordExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, parts: &[KeywordExpr], op: &str) -> fmt::Result {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                match part {
                    KeywordExpr::Any(inner) | KeywordExpr::All(inner) if inner.len() > 1 => {
                        write!(f, "({})", part)?
                    }
                    _ => write!(f, "{}", part)?,
                }
            }
            Ok(())
        }

        match self {
            KeywordExpr::Contains(keyword) => write!(f, "\"{}\"", keyword),
            KeywordExpr::Word { keyword, .. } => write!(f, "word \"{}\"", keyword),
            KeywordExpr::Any(parts) => join(f, parts, "OR"),
            KeywordExpr::All(parts) => join(f, parts, "AND"),
        }
    }
}

/// Normalize raw user input for matching.
pub fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_substring() {
        let expr = KeywordExpr::contains("violation");
        assert!(expr.matches("why are there violations"));
        assert!(!expr.matches("no issues"));
    }

    #[test]
    fn test_word_respects_boundaries() {
        let expr = KeywordExpr::word("hi");
        assert!(expr.matches("hi"));
        assert!(expr.matches("hi there"));
        assert!(expr.matches("oh, hi!"));
        assert!(!expr.matches("how do i fix this"));
        assert!(!expr.matches("which account"));
    }

    #[test]
    fn test_and_or_composition() {
        let expr = KeywordExpr::contains("why").and(KeywordExpr::any_of(&["violation", "compliance"]));
        assert!(expr.matches("why is compliance failing"));
        assert!(expr.matches("why violations"));
        assert!(!expr.matches("show violations"));
        assert!(!expr.matches("why"));
    }

    #[test]
    fn test_and_flattens() {
        let expr = KeywordExpr::contains("a")
            .and(KeywordExpr::contains("b"))
            .and(KeywordExpr::contains("c"));
        match &expr {
            KeywordExpr::All(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected All, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let expr = KeywordExpr::contains("why").and(KeywordExpr::any_of(&["violation", "compliance"]));
        assert_eq!(expr.to_string(), r#""why" AND ("violation" OR "compliance")"#);

        let greeting = KeywordExpr::any_word(&["hello", "hi"]);
        assert_eq!(greeting.to_string(), r#"word "hello" OR word "hi""#);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Why ARE there Violations?\n"), "why are there violations?");
        assert_eq!(normalize(""), "");
    }
}
