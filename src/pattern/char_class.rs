//! Character classes used by the grammar DSL.

/// A `\w` character: alphanumeric or underscore.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// A character allowed in a literal grammar token.
pub fn is_literal_char(ch: char) -> bool {
    is_word_char(ch) || matches!(ch, '.' | '+' | '-')
}

/// A character allowed inside a `(a|b|c)` alternation.
pub fn is_choice_char(ch: char) -> bool {
    is_word_char(ch) || ch == '|'
}

/// Case-fold text for case-insensitive comparison.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}
