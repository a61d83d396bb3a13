//! A compiled grammar bound to a target, and the token-sequence matcher.
//!
//! Matching aligns N input tokens against P quantified patterns with an
//! `(N + 1) x (P + 1)` table, the way a regular expression with `?`, `*` and
//! `+` is matched character by character. Cell `(si, pi)` records whether the
//! first `si` tokens can be consumed by the first `pi` patterns.
//!
//! The table keeps one path per cell. When several alignments are legal, a
//! later transition overwrites the capture recorded for a token instead of
//! exploring both, so ambiguous grammars report whichever alignment the
//! transition order produces last.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use crate::error::{Error, SetupError};
use crate::match_result::MatchResult;
use crate::pattern::{Capture, TokenPattern, compile_grammar};
use crate::tokenizer::tokenize;

/// Identifies the handler a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetId(pub usize);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// An ordered list of patterns bound to one target.
#[derive(Debug, Clone)]
pub struct Route {
    patterns: Vec<TokenPattern>,
    target: TargetId,
    grammar: Arc<str>,
}

/// One cell of the alignment table.
#[derive(Debug, Clone)]
enum Cell {
    Unreachable,
    /// Reached with the latest patterns contributing no token.
    ZeroWidth,
    /// Reached by a pattern consuming the token before this cell.
    Matched(Capture),
}

impl Cell {
    fn is_reachable(&self) -> bool {
        !matches!(self, Cell::Unreachable)
    }

    fn is_zero_width(&self) -> bool {
        matches!(self, Cell::ZeroWidth)
    }

    fn is_matched(&self) -> bool {
        matches!(self, Cell::Matched(_))
    }
}

impl Route {
    /// Compile a grammar string into a route.
    pub fn from_grammar(grammar: &str, target: TargetId) -> Result<Self, Error> {
        let rules = tokenize(grammar).map_err(|source| SetupError::InvalidGrammar {
            grammar: grammar.to_string(),
            source,
        })?;
        if rules.is_empty() {
            return Err(SetupError::MissingGrammar.into());
        }
        Ok(Self {
            patterns: compile_grammar(&rules)?,
            target,
            grammar: Arc::from(grammar),
        })
    }

    /// Build a route from pre-built patterns, bypassing the DSL.
    pub fn from_patterns(patterns: Vec<TokenPattern>, target: TargetId) -> Result<Self, Error> {
        if patterns.is_empty() {
            return Err(SetupError::MissingPatterns.into());
        }
        let grammar = patterns.iter().join(" ");
        Ok(Self {
            patterns,
            target,
            grammar: Arc::from(grammar),
        })
    }

    pub fn patterns(&self) -> &[TokenPattern] {
        &self.patterns
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    /// Tokenize `command` and match it.
    pub fn match_command(&self, command: &str) -> Result<MatchResult, Error> {
        Ok(self.match_tokens(&tokenize(command)?))
    }

    /// Align `tokens` against this route's patterns.
    pub fn match_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> MatchResult {
        let (ns, np) = (tokens.len(), self.patterns.len());
        let mut slots: Vec<Option<Capture>> = vec![None; ns];
        let mut dp = vec![vec![Cell::Unreachable; np + 1]; ns + 1];

        dp[0][0] = Cell::ZeroWidth;
        for (pi, pattern) in self.patterns.iter().enumerate() {
            if dp[0][pi].is_zero_width() && pattern.quantifier().may_skip() {
                dp[0][pi + 1] = Cell::ZeroWidth;
            }
        }

        for (si, token) in tokens.iter().enumerate() {
            for (pi, pattern) in self.patterns.iter().enumerate() {
                let q = pattern.quantifier();
                match pattern.capture(token.as_ref()) {
                    Some(capture) => {
                        // diagonal: consume one token with this pattern
                        let diagonal = dp[si][pi].is_reachable();
                        // top down: enter an optional pattern after a zero-width row
                        let enter = dp[si][pi + 1].is_zero_width() && q.may_skip();
                        // top down: repeat a pattern that already consumed a token
                        let repeat = dp[si][pi + 1].is_matched() && q.may_repeat();
                        // left right: claim a token an earlier optional declined
                        let shift = dp[si + 1][pi].is_zero_width() && q.may_skip();
                        if diagonal || enter || repeat || shift {
                            slots[si] = Some(capture.clone());
                            dp[si + 1][pi + 1] = Cell::Matched(capture);
                        }
                    }
                    None => {
                        if dp[si + 1][pi].is_reachable() && q.may_skip() {
                            if let Cell::Matched(previous) = &dp[si + 1][pi] {
                                slots[si] = Some(previous.clone());
                            }
                            dp[si + 1][pi + 1] = Cell::ZeroWidth;
                        }
                    }
                }
            }
        }

        let matched = dp[ns][np].is_reachable() && slots.iter().all(Option::is_some);
        tracing::trace!(grammar = %self.grammar, tokens = ns, matched, "route evaluated");
        MatchResult::new(matched, slots, self.target, Arc::clone(&self.grammar))
    }
}
