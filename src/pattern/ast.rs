//! Types produced by the grammar compiler.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// How many input tokens a pattern position may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantifier {
    /// Exactly one token.
    #[default]
    Once,
    /// `?` — zero or one token.
    Optional,
    /// `*` — zero or more tokens.
    ZeroOrMore,
    /// `+` — one or more tokens.
    OneOrMore,
}

impl Quantifier {
    /// Parse a quantifier suffix: `""`, `"?"`, `"*"` or `"+"`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Quantifier::Once),
            "?" => Some(Quantifier::Optional),
            "*" => Some(Quantifier::ZeroOrMore),
            "+" => Some(Quantifier::OneOrMore),
            _ => None,
        }
    }

    /// The pattern may contribute zero tokens.
    pub fn may_skip(self) -> bool {
        matches!(self, Quantifier::Optional | Quantifier::ZeroOrMore)
    }

    /// The pattern may consume more than one token.
    pub fn may_repeat(self) -> bool {
        matches!(self, Quantifier::ZeroOrMore | Quantifier::OneOrMore)
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Quantifier::Once => "",
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Metadata for one capture produced by a matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Positional only.
    Unnamed,
    /// Bound to a declared name.
    Named(String),
}

impl Slot {
    pub fn name(&self) -> Option<&str> {
        match self {
            Slot::Unnamed => None,
            Slot::Named(name) => Some(name.as_str()),
        }
    }
}

/// A matcher for one side of a colon pair, or a whole grammar token.
///
/// Alternatives and literals are stored lowercased; comparisons fold the
/// input token the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordMatcher {
    /// `settings`, `jira.board`, `+label`
    Literal(String),
    /// `(set|get|delete)`
    Filter(Vec<String>),
    /// `<name>`
    Arg(String),
    /// `<name(set|get)>`
    FilteredArg { name: String, choices: Vec<String> },
}

/// A single-token matcher.
#[derive(Debug, Clone)]
pub enum TokenMatcher {
    Word(WordMatcher),
    /// `key:value`; the key's captured text names the value at read time.
    Pair { key: WordMatcher, value: WordMatcher },
    /// Hand-written expression anchored to the whole token.
    Regex(Regex),
}

/// One compiled grammar token: a matcher plus its quantifier.
///
/// Capture-slot metadata is fixed when the pattern is built. A pattern with
/// exactly two slots is a dynamic key/value pair.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    pub(crate) matcher: TokenMatcher,
    pub(crate) quantifier: Quantifier,
    pub(crate) slots: Arc<[Slot]>,
}

impl TokenPattern {
    /// Build a pattern from a hand-made matcher, bypassing the DSL.
    pub fn new(matcher: TokenMatcher, quantifier: Quantifier) -> Self {
        let slots: Arc<[Slot]> = match &matcher {
            TokenMatcher::Word(word) => Arc::from([word.slot()]),
            TokenMatcher::Pair { key, value } => Arc::from([key.slot(), value.slot()]),
            TokenMatcher::Regex(re) => regex_slots(re).into(),
        };
        Self {
            matcher,
            quantifier,
            slots,
        }
    }

    pub fn matcher(&self) -> &TokenMatcher {
        &self.matcher
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// True when the two capture slots form a key/value pair.
    pub fn is_pair(&self) -> bool {
        self.slots.len() == 2
    }
}

/// Slots for a raw expression: the whole token when it has no groups,
/// otherwise one slot per group.
fn regex_slots(re: &Regex) -> Vec<Slot> {
    if re.captures_len() == 1 {
        return vec![Slot::Unnamed];
    }
    re.capture_names()
        .skip(1)
        .map(|name| name.map_or(Slot::Unnamed, |n| Slot::Named(n.to_string())))
        .collect()
}

impl fmt::Display for WordMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordMatcher::Literal(text) => f.write_str(text),
            WordMatcher::Filter(choices) => write!(f, "({})", choices.join("|")),
            WordMatcher::Arg(name) => write!(f, "<{name}>"),
            WordMatcher::FilteredArg { name, choices } => {
                write!(f, "<{name}({})>", choices.join("|"))
            }
        }
    }
}

impl fmt::Display for TokenMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenMatcher::Word(word) => write!(f, "{word}"),
            TokenMatcher::Pair { key, value } => write!(f, "{key}:{value}"),
            TokenMatcher::Regex(re) => f.write_str(re.as_str()),
        }
    }
}

/// Renders as `matcher` or `matcher/quantifier`.
impl fmt::Display for TokenPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quantifier {
            Quantifier::Once => write!(f, "{}", self.matcher),
            q => write!(f, "{}/{q}", self.matcher),
        }
    }
}
