//! The outcome of matching one command against one route.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::MatchError;
use crate::pattern::Capture;
use crate::route::TargetId;

/// Captured value(s) for one input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positional<'a> {
    /// The token's capture is absent.
    Empty,
    Single(&'a str),
    /// A key/value pair from a colon-pair token.
    Pair(&'a str, &'a str),
}

/// Values aggregated for a name across every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Named<'a> {
    Absent,
    One(&'a str),
    Many(Vec<&'a str>),
}

impl<'a> Named<'a> {
    /// All values, whichever shape they were returned in.
    pub fn into_vec(self) -> Vec<&'a str> {
        match self {
            Named::Absent => vec![],
            Named::One(value) => vec![value],
            Named::Many(values) => values,
        }
    }
}

/// Per-token captures produced by [`Route::match_tokens`](crate::Route::match_tokens).
#[derive(Debug, Clone)]
pub struct MatchResult {
    matched: bool,
    slots: Vec<Option<Capture>>,
    target: TargetId,
    grammar: Arc<str>,
}

impl MatchResult {
    pub(crate) fn new(
        matched: bool,
        slots: Vec<Option<Capture>>,
        target: TargetId,
        grammar: Arc<str>,
    ) -> Self {
        Self {
            matched,
            slots,
            target,
            grammar,
        }
    }

    /// True when every token was consumed and the grammar was satisfied.
    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// Number of input tokens.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    /// The raw capture recorded for token `idx`.
    pub fn capture(&self, idx: usize) -> Result<Option<&Capture>, MatchError> {
        self.slots
            .get(idx)
            .map(Option::as_ref)
            .ok_or(MatchError::OutOfRange {
                index: idx,
                len: self.slots.len(),
            })
    }

    /// Captured value(s) for token `idx`.
    ///
    /// Given grammar `<sb> [<verb>:<sub>]+` and command `alice play:chess`,
    /// position 0 is `Single("alice")` and position 1 is
    /// `Pair("play", "chess")`.
    pub fn positional(&self, idx: usize) -> Result<Positional<'_>, MatchError> {
        let Some(capture) = self.capture(idx)? else {
            return Ok(Positional::Empty);
        };
        Ok(match capture.values() {
            [value] => Positional::Single(value),
            [key, value] => Positional::Pair(key, value),
            _ => Positional::Empty,
        })
    }

    /// Values captured for `name`, in token order.
    ///
    /// A name is bound either by a declared slot (`<name>`) or dynamically by
    /// the key of a colon pair, in which case the pair's value is collected.
    /// Dynamic bindings win when both exist. Given `[<verb>:<sub>]+` over
    /// `play:chess go:shopping`, `verb` yields `Many(["play", "go"])` and
    /// `play` yields `One("chess")`.
    ///
    /// With `flat`, a single value is returned as [`Named::One`]. With
    /// `required`, finding nothing is an error instead of [`Named::Absent`].
    pub fn named(&self, name: &str, flat: bool, required: bool) -> Result<Named<'_>, MatchError> {
        let mut dynamic = Vec::new();
        let mut declared = Vec::new();
        for capture in self.slots.iter().flatten() {
            declared.extend(capture.named(name));
            if let Some((key, value)) = capture.pair()
                && key == name
            {
                dynamic.push(value);
            }
        }
        let values = if dynamic.is_empty() { declared } else { dynamic };
        match values.len() {
            0 if required => Err(MatchError::MissingName(name.to_string())),
            0 => Ok(Named::Absent),
            1 if flat => Ok(Named::One(values[0])),
            _ => Ok(Named::Many(values)),
        }
    }

    /// Shorthand for `named(name, true, false)`.
    pub fn get(&self, name: &str) -> Named<'_> {
        self.named(name, true, false).unwrap_or(Named::Absent)
    }

    /// Every name [`named`](Self::named) can resolve: declared slot names
    /// plus every colon-pair key seen.
    pub fn names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for capture in self.slots.iter().flatten() {
            names.extend(capture.slots().iter().filter_map(|slot| slot.name()));
            if let Some((key, _)) = capture.pair() {
                names.insert(key);
            }
        }
        names
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched {
            write!(f, "<Match:{} --> {}>", self.grammar, self.target)
        } else {
            f.write_str("No match")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Route;

    fn matched(grammar: &str, command: &str) -> MatchResult {
        let m = Route::from_grammar(grammar, TargetId(1))
            .unwrap()
            .match_command(command)
            .unwrap();
        assert!(m.is_match(), "'{grammar}' should match '{command}'");
        m
    }

    #[test]
    fn positional_pair() {
        let m = matched("jira <jira_id> set <option>:<value>", "jira none-123 set jira.board:tools");
        assert_eq!(m.positional(0), Ok(Positional::Single("jira")));
        assert_eq!(m.positional(1), Ok(Positional::Single("none-123")));
        assert_eq!(m.positional(3), Ok(Positional::Pair("jira.board", "tools")));
        assert_eq!(m.get("option"), Named::One("jira.board"));
        assert_eq!(m.get("value"), Named::One("tools"));
        assert_eq!(m.get("jira.board"), Named::One("tools"));
    }

    #[test]
    fn positional_out_of_range() {
        let m = matched("a b", "a b");
        assert_eq!(
            m.positional(2),
            Err(MatchError::OutOfRange { index: 2, len: 2 })
        );
        assert!(m.capture(5).is_err());
    }

    #[test]
    fn dynamic_keys_aggregate() {
        let m = matched(
            "[<filter_name>:<filter_value>]+",
            "+path:x -fork:y +path:z",
        );
        assert_eq!(
            m.get("filter_name"),
            Named::Many(vec!["+path", "-fork", "+path"])
        );
        assert_eq!(m.named("+path", false, false), Ok(Named::Many(vec!["x", "z"])));
        assert_eq!(m.get("+path"), Named::Many(vec!["x", "z"]));
        assert_eq!(m.get("-fork"), Named::One("y"));
        assert_eq!(m.named("-fork", false, false), Ok(Named::Many(vec!["y"])));
    }

    #[test]
    fn dynamic_binding_overrides_declared() {
        let m = matched("<value> [<k>:<v>]*", "plain value:dyn");
        assert_eq!(m.get("value"), Named::One("dyn"));
        assert_eq!(m.get("v"), Named::One("dyn"));
    }

    #[test]
    fn missing_name() {
        let m = matched("list [<k>:<v>]*", "list");
        assert_eq!(m.get("k"), Named::Absent);
        assert_eq!(
            m.named("k", true, true),
            Err(MatchError::MissingName("k".into()))
        );
    }

    #[test]
    fn names_union() {
        let m = matched(
            "list [<options(author|statusCode)>:<value>]*",
            "list author:abc statusCode:BEACHED",
        );
        let names: Vec<_> = m.names().into_iter().collect();
        assert_eq!(names, ["author", "options", "statusCode", "value"]);
    }

    #[test]
    fn literal_pair_key_is_dynamic() {
        let m = matched(
            "settings (set|get|delete) jira.project:<jira_project>",
            "settings set jira.project:TEST-PROJ",
        );
        assert_eq!(m.get("jira_project"), Named::One("TEST-PROJ"));
        assert_eq!(m.get("jira.project"), Named::One("TEST-PROJ"));
        assert!(m.names().contains("jira.project"));
    }

    #[test]
    fn display() {
        let m = matched("a", "a");
        assert_eq!(m.to_string(), "<Match:a --> target#1>");
        let miss = Route::from_grammar("a", TargetId(1))
            .unwrap()
            .match_tokens(&["b"]);
        assert_eq!(miss.to_string(), "No match");
    }

    #[test]
    fn into_vec() {
        assert!(Named::Absent.into_vec().is_empty());
        assert_eq!(Named::One("x").into_vec(), ["x"]);
    }
}
