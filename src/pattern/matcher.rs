//! Single-token matching: test one input token against one pattern and
//! extract its captures.

use std::sync::Arc;

use super::ast::{Slot, TokenMatcher, TokenPattern, WordMatcher};
use super::char_class::fold;

/// The captures one pattern extracted from one input token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    slots: Arc<[Slot]>,
    values: Vec<String>,
}

impl Capture {
    /// Captured strings, one per slot, in slot order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The key and value of a two-slot capture.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match self.values.as_slice() {
            [key, value] => Some((key.as_str(), value.as_str())),
            _ => None,
        }
    }

    /// Values bound to `name` by a declared slot.
    pub fn named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.slots
            .iter()
            .zip(&self.values)
            .filter(move |(slot, _)| slot.name() == Some(name))
            .map(|(_, value)| value.as_str())
    }
}

impl TokenPattern {
    /// Match `token` against this pattern's matcher, ignoring the quantifier.
    pub fn capture(&self, token: &str) -> Option<Capture> {
        let values = self.matcher.captures(token)?;
        Some(Capture {
            slots: Arc::clone(&self.slots),
            values,
        })
    }

    pub fn is_match(&self, token: &str) -> bool {
        self.matcher.captures(token).is_some()
    }
}

impl TokenMatcher {
    /// Match the whole token, returning one string per capture slot.
    pub fn captures(&self, token: &str) -> Option<Vec<String>> {
        match self {
            TokenMatcher::Word(word) => word.matches(token).then(|| vec![token.to_string()]),
            TokenMatcher::Pair { key, value } => {
                let (left, right) = token.split_once(':')?;
                (key.matches(left) && value.matches(right))
                    .then(|| vec![left.to_string(), right.to_string()])
            }
            TokenMatcher::Regex(re) => {
                let caps = re.captures(token)?;
                let whole = caps.get(0)?;
                if whole.start() != 0 || whole.end() != token.len() {
                    return None;
                }
                if caps.len() == 1 {
                    return Some(vec![token.to_string()]);
                }
                Some(
                    caps.iter()
                        .skip(1)
                        .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                        .collect(),
                )
            }
        }
    }
}

impl WordMatcher {
    /// Test a whole token (or one side of a colon pair).
    pub fn matches(&self, text: &str) -> bool {
        match self {
            WordMatcher::Literal(literal) => fold(text) == *literal,
            WordMatcher::Filter(choices) | WordMatcher::FilteredArg { choices, .. } => {
                let folded = fold(text);
                choices.iter().any(|c| *c == folded)
            }
            WordMatcher::Arg(_) => !text.is_empty() && !text.contains(':'),
        }
    }

    pub(crate) fn slot(&self) -> Slot {
        match self {
            WordMatcher::Literal(_) | WordMatcher::Filter(_) => Slot::Unnamed,
            WordMatcher::Arg(name) | WordMatcher::FilteredArg { name, .. } => {
                Slot::Named(name.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pattern::ast::{Quantifier, TokenPattern};
    use crate::pattern::compiler::compile;

    fn values(rule: &str, token: &str) -> Option<Vec<String>> {
        compile(rule)
            .unwrap()
            .capture(token)
            .map(|c| c.values().to_vec())
    }

    #[test]
    fn literal_is_case_insensitive() {
        assert_eq!(values("settings", "SETTINGS"), Some(vec!["SETTINGS".into()]));
        assert_eq!(values("settings", "setting"), None);
    }

    #[test]
    fn literal_dot_is_not_a_wildcard() {
        assert_eq!(values("jira.board", "jiraxboard"), None);
        assert!(values("jira.board", "Jira.Board").is_some());
    }

    #[test]
    fn filter_captures_alternative_as_typed() {
        assert_eq!(values("(set|get)", "Get"), Some(vec!["Get".into()]));
        assert_eq!(values("(set|get)", "delete"), None);
    }

    #[test]
    fn named_arg_rejects_colon_and_empty() {
        assert!(values("<rid>", "123").is_some());
        assert_eq!(values("<rid>", "a:b"), None);
        assert_eq!(values("<rid>", ""), None);
    }

    #[test]
    fn named_arg_accepts_spaces_from_quoting() {
        assert_eq!(values("<title>", "jira title"), Some(vec!["jira title".into()]));
    }

    #[test]
    fn pair_splits_on_first_colon() {
        assert_eq!(
            values("<option>:<value>", "jira.board:tools"),
            Some(vec!["jira.board".into(), "tools".into()])
        );
        assert_eq!(values("<option>:<value>", "a:b:c"), None);
        assert_eq!(values("<option>:<value>", "novalue"), None);
    }

    #[test]
    fn pair_with_literal_key() {
        assert!(values("jira.project:<p>", "JIRA.PROJECT:TEST-PROJ").is_some());
        assert_eq!(values("jira.project:<p>", "jira.board:TEST"), None);
    }

    #[test]
    fn named_lookup_follows_slots() {
        let pat = compile("<option(summary|project)>:<value>").unwrap();
        let cap = pat.capture("summary:hello").unwrap();
        assert_eq!(cap.named("option").collect::<Vec<_>>(), vec!["summary"]);
        assert_eq!(cap.named("value").collect::<Vec<_>>(), vec!["hello"]);
        assert_eq!(cap.pair(), Some(("summary", "hello")));
    }

    #[test]
    fn regex_without_groups_captures_token() {
        let pat = TokenPattern::regex("a+", Quantifier::Once).unwrap();
        assert_eq!(pat.capture("aaa").unwrap().values(), ["aaa"]);
        assert!(!pat.is_match("aab"));
    }

    #[test]
    fn regex_missing_group_captures_empty() {
        let pat = TokenPattern::regex("(x)?(?P<tail>y)", Quantifier::Once).unwrap();
        assert_eq!(pat.capture("y").unwrap().values(), ["", "y"]);
    }
}
