//! Error types for grammar compilation, router setup and command resolution.

use thiserror::Error;

/// A grammar token that cannot be compiled into a [`TokenPattern`](crate::TokenPattern).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The token matches none of the recognised forms.
    #[error("illegal routing syntax: {0}")]
    UnknownForm(String),
    /// An optional wrapper around a token that already carries a quantifier.
    #[error("illegal routing syntax, {token}: '{inner}' is not allowed inside an optional option")]
    NestedOptional { token: String, inner: String },
    /// One side of a colon pair carries a quantifier.
    #[error("illegal routing syntax: {0}: nested options are not allowed")]
    NestedPair(String),
    #[error("invalid raw pattern {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },
    #[error("raw pattern {pattern:?} has {groups} capture groups, at most 2 are supported")]
    TooManyGroups { pattern: String, groups: usize },
}

/// A defect in how the router was configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("grammar is required to build a route")]
    MissingGrammar,
    #[error("patterns are required to build a route")]
    MissingPatterns,
    /// The grammar string itself is not well-formed shell words.
    #[error("grammar {grammar:?} cannot be split into tokens: {source}")]
    InvalidGrammar { grammar: String, source: ParseError },
    #[error("command '{command}' matches multiple targets: {}", .grammars.join(", "))]
    Ambiguous {
        command: String,
        grammars: Vec<String>,
    },
}

/// The command could not be resolved to a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no route found for {command}")]
    NoRoute { command: String },
    #[error("no closing quotation for {quote}")]
    UnclosedQuote { quote: char },
    #[error("no escaped character after trailing backslash")]
    DanglingEscape,
}

/// Failure reading a capture out of a [`MatchResult`](crate::MatchResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("out of boundary, 0<=idx<{len} is required, got {index}")]
    OutOfRange { index: usize, len: usize },
    #[error("matching result not found for {0}")]
    MissingName(String),
}

/// Any error surfaced by the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// True when no route recognised the command.
    pub fn is_no_route(&self) -> bool {
        matches!(self, Error::Parse(ParseError::NoRoute { .. }))
    }
}
