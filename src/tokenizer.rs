//! Shell-style splitting of command and grammar strings.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::ParseError;

/// Split `input` into words using POSIX shell quoting rules.
///
/// - Whitespace separates words.
/// - `'...'` preserves its contents literally.
/// - `"..."` preserves whitespace; `\` escapes only `"` and `\`.
/// - Outside quotes `\` escapes the next character.
/// - Adjacent quoted and unquoted parts join into one word.
pub fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    Tokenizer {
        chars: input.chars().peekable(),
    }
    .words()
}

struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Tokenizer<'_> {
    fn words(&mut self) -> Result<Vec<String>, ParseError> {
        let mut words = Vec::new();
        while self.skip_space() {
            words.push(self.word()?);
        }
        Ok(words)
    }

    /// Read one word; the caller has already skipped leading whitespace.
    fn word(&mut self) -> Result<String, ParseError> {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            self.chars.next();
            match ch {
                '\'' => self.single_quoted(&mut word)?,
                '"' => self.double_quoted(&mut word)?,
                '\\' => word.push(self.chars.next().ok_or(ParseError::DanglingEscape)?),
                _ => word.push(ch),
            }
        }
        Ok(word)
    }

    fn single_quoted(&mut self, word: &mut String) -> Result<(), ParseError> {
        loop {
            match self.chars.next() {
                Some('\'') => return Ok(()),
                Some(ch) => word.push(ch),
                None => return Err(ParseError::UnclosedQuote { quote: '\'' }),
            }
        }
    }

    fn double_quoted(&mut self, word: &mut String) -> Result<(), ParseError> {
        loop {
            match self.chars.next() {
                Some('"') => return Ok(()),
                Some('\\') => match self.chars.peek() {
                    Some(&next @ ('"' | '\\')) => {
                        self.chars.next();
                        word.push(next);
                    }
                    _ => word.push('\\'),
                },
                Some(ch) => word.push(ch),
                None => return Err(ParseError::UnclosedQuote { quote: '"' }),
            }
        }
    }

    /// Skip whitespace; returns false at end of input.
    fn skip_space(&mut self) -> bool {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
        self.chars.peek().is_some()
    }
}
