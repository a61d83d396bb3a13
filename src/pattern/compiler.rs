//! Compiler from grammar tokens to [`TokenPattern`]s.
//!
//! Forms are tried in a fixed order: literal, anonymous filter, named
//! argument, filtered named argument, optional wrapper, colon pair.

use regex::Regex;

use crate::error::GrammarError;

use super::ast::*;
use super::char_class::{fold, is_choice_char, is_literal_char, is_word_char};

/// Compile one whitespace-free grammar token.
pub fn compile(rule: &str) -> Result<TokenPattern, GrammarError> {
    if let Some(word) = compile_word(rule) {
        return Ok(TokenPattern::new(TokenMatcher::Word(word), Quantifier::Once));
    }

    if let Some((inner, quantifier)) = split_wrapper(rule) {
        let sub = compile(inner)?;
        if sub.quantifier != Quantifier::Once {
            return Err(GrammarError::NestedOptional {
                token: rule.to_string(),
                inner: inner.to_string(),
            });
        }
        return Ok(TokenPattern { quantifier, ..sub });
    }

    let (left, right) =
        split_pair(rule).ok_or_else(|| GrammarError::UnknownForm(rule.to_string()))?;
    let (key, value) = (compile(left)?, compile(right)?);
    if key.quantifier != Quantifier::Once || value.quantifier != Quantifier::Once {
        return Err(GrammarError::NestedPair(rule.to_string()));
    }
    match (key.matcher, value.matcher) {
        (TokenMatcher::Word(key), TokenMatcher::Word(value)) => Ok(TokenPattern::new(
            TokenMatcher::Pair { key, value },
            Quantifier::Once,
        )),
        _ => Err(GrammarError::NestedPair(rule.to_string())),
    }
}

/// Compile every whitespace-separated token of a grammar string.
pub fn compile_grammar<S: AsRef<str>>(rules: &[S]) -> Result<Vec<TokenPattern>, GrammarError> {
    rules.iter().map(|rule| compile(rule.as_ref())).collect()
}

impl TokenPattern {
    /// Build a pattern from a raw regular expression anchored to the whole
    /// token. At most two capture groups are allowed.
    pub fn regex(pattern: &str, quantifier: Quantifier) -> Result<Self, GrammarError> {
        let re = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
            GrammarError::InvalidRegex {
                pattern: pattern.to_string(),
                message: err.to_string(),
            }
        })?;
        let groups = re.captures_len() - 1;
        if groups > 2 {
            return Err(GrammarError::TooManyGroups {
                pattern: pattern.to_string(),
                groups,
            });
        }
        Ok(TokenPattern::new(TokenMatcher::Regex(re), quantifier))
    }
}

/// Forms 1-4: the single-slot matchers that may also appear in a colon pair.
fn compile_word(rule: &str) -> Option<WordMatcher> {
    // settings, create-jira, foo.bar, +label
    if !rule.is_empty() && rule.chars().all(is_literal_char) {
        return Some(WordMatcher::Literal(fold(rule)));
    }
    // (set|get|delete)
    if let Some(body) = strip_parens(rule) {
        return Some(WordMatcher::Filter(split_choices(body)));
    }
    let inner = rule.strip_prefix('<')?.strip_suffix('>')?;
    // <rid>
    if is_name(inner) {
        return Some(WordMatcher::Arg(inner.to_string()));
    }
    // <verb(set|get|delete)>
    let (name, rest) = inner.split_once('(')?;
    let body = strip_parens(&format!("({rest}"))?.to_string();
    is_name(name).then(|| WordMatcher::FilteredArg {
        name: name.to_string(),
        choices: split_choices(&body),
    })
}

/// `[inner]`, `[inner]*` or `[inner]+`.
fn split_wrapper(rule: &str) -> Option<(&str, Quantifier)> {
    let (body, quantifier) = if let Some(body) = rule.strip_suffix('*') {
        (body, Quantifier::ZeroOrMore)
    } else if let Some(body) = rule.strip_suffix('+') {
        (body, Quantifier::OneOrMore)
    } else {
        (rule, Quantifier::Optional)
    };
    let inner = body.strip_prefix('[')?.strip_suffix(']')?;
    (!inner.is_empty() && is_balanced(inner)).then_some((inner, quantifier))
}

/// The outer `[` closes only at the final `]`.
fn is_balanced(inner: &str) -> bool {
    let mut depth = 0usize;
    for ch in inner.chars() {
        match ch {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Split on the one and only `:`.
fn split_pair(rule: &str) -> Option<(&str, &str)> {
    if rule.matches(':').count() != 1 {
        return None;
    }
    rule.split_once(':')
}

fn strip_parens(rule: &str) -> Option<&str> {
    let body = rule.strip_prefix('(')?.strip_suffix(')')?;
    (!body.is_empty() && body.chars().all(is_choice_char)).then_some(body)
}

fn split_choices(body: &str) -> Vec<String> {
    body.split('|').map(fold).collect()
}

fn is_name(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_ok(rule: &str) -> TokenPattern {
        compile(rule).expect("compile should succeed")
    }

    fn compile_err(rule: &str) -> GrammarError {
        compile(rule).expect_err("compile should fail")
    }

    fn word(pattern: &TokenPattern) -> &WordMatcher {
        match pattern.matcher() {
            TokenMatcher::Word(word) => word,
            other => panic!("expected word matcher, got {other:?}"),
        }
    }

    // --- Forms ---

    #[test]
    fn test_literal() {
        let p = compile_ok("Create-Jira");
        assert_eq!(word(&p), &WordMatcher::Literal("create-jira".into()));
        assert_eq!(p.quantifier(), Quantifier::Once);
        assert_eq!(p.slots(), [Slot::Unnamed]);
    }

    #[test]
    fn test_literal_with_dot_and_plus() {
        assert!(matches!(word(&compile_ok("jira.board")), WordMatcher::Literal(_)));
        assert!(matches!(word(&compile_ok("+label")), WordMatcher::Literal(_)));
    }

    #[test]
    fn test_anonymous_filter() {
        let p = compile_ok("(set|GET|delete)");
        assert_eq!(
            word(&p),
            &WordMatcher::Filter(vec!["set".into(), "get".into(), "delete".into()])
        );
        assert_eq!(p.slots(), [Slot::Unnamed]);
    }

    #[test]
    fn test_named_arg() {
        let p = compile_ok("<jira_id>");
        assert_eq!(word(&p), &WordMatcher::Arg("jira_id".into()));
        assert_eq!(p.slots(), [Slot::Named("jira_id".into())]);
    }

    #[test]
    fn test_named_arg_with_filter() {
        let p = compile_ok("<verb(set|get)>");
        assert_eq!(
            word(&p),
            &WordMatcher::FilteredArg {
                name: "verb".into(),
                choices: vec!["set".into(), "get".into()],
            }
        );
    }

    // --- Wrappers ---

    #[test]
    fn test_optional_default() {
        let p = compile_ok("[<rid>]");
        assert_eq!(p.quantifier(), Quantifier::Optional);
        assert_eq!(word(&p), &WordMatcher::Arg("rid".into()));
    }

    #[test]
    fn test_zero_or_more() {
        assert_eq!(compile_ok("[a]*").quantifier(), Quantifier::ZeroOrMore);
    }

    #[test]
    fn test_one_or_more_pair() {
        let p = compile_ok("[<filter_name>:<filter_value>]+");
        assert_eq!(p.quantifier(), Quantifier::OneOrMore);
        assert!(p.is_pair());
        assert_eq!(
            p.slots(),
            [
                Slot::Named("filter_name".into()),
                Slot::Named("filter_value".into())
            ]
        );
    }

    // --- Pairs ---

    #[test]
    fn test_pair_literal_key() {
        let p = compile_ok("jira.project:<jira_project>");
        assert!(matches!(
            p.matcher(),
            TokenMatcher::Pair {
                key: WordMatcher::Literal(_),
                value: WordMatcher::Arg(_)
            }
        ));
        assert_eq!(p.slots(), [Slot::Unnamed, Slot::Named("jira_project".into())]);
    }

    // --- Raw patterns ---

    #[test]
    fn test_regex_named_groups() {
        let p = TokenPattern::regex(
            r"(?P<filter_name>[+-]path|[+-]fork):(?P<filter_value>[^:]+)",
            Quantifier::OneOrMore,
        )
        .unwrap();
        assert!(p.is_pair());
        assert_eq!(p.slots()[0], Slot::Named("filter_name".into()));
    }

    #[test]
    fn test_regex_without_groups_has_one_slot() {
        let p = TokenPattern::regex("a", Quantifier::ZeroOrMore).unwrap();
        assert_eq!(p.slots(), [Slot::Unnamed]);
        assert_eq!(p.to_string(), "^(?:a)$/*");
    }

    #[test]
    fn test_regex_too_many_groups() {
        assert!(matches!(
            TokenPattern::regex("(a)(b)(c)", Quantifier::Once),
            Err(GrammarError::TooManyGroups { groups: 3, .. })
        ));
    }

    #[test]
    fn test_regex_invalid() {
        assert!(matches!(
            TokenPattern::regex("(a", Quantifier::Once),
            Err(GrammarError::InvalidRegex { .. })
        ));
    }

    // --- Errors ---

    #[test]
    fn test_nested_optional() {
        assert_eq!(
            compile_err("[[a]]"),
            GrammarError::NestedOptional {
                token: "[[a]]".into(),
                inner: "[a]".into()
            }
        );
        assert!(matches!(compile_err("[[a]*]+"), GrammarError::NestedOptional { .. }));
    }

    #[test]
    fn test_pair_side_with_quantifier() {
        assert_eq!(
            compile_err("[a]:<v>"),
            GrammarError::NestedPair("[a]:<v>".into())
        );
        assert!(matches!(compile_err("<k>:[<v>]*"), GrammarError::NestedPair(_)));
        assert_eq!(
            compile_err("[a]:[b]"),
            GrammarError::NestedPair("[a]:[b]".into())
        );
        assert_eq!(
            compile_err("[<k>]*:[<v>]+"),
            GrammarError::NestedPair("[<k>]*:[<v>]+".into())
        );
    }

    #[test]
    fn test_unknown_forms() {
        for rule in ["a:b:c", "<x", "a/b", "", "()", "[]", "<x(a|b)"] {
            assert!(
                matches!(compile(rule), Err(GrammarError::UnknownForm(_))),
                "expected unknown form: {rule:?}"
            );
        }
    }

    #[test]
    fn test_unknown_side_of_pair() {
        assert_eq!(compile_err("a:b/c"), GrammarError::UnknownForm("b/c".into()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            compile_err("a:b:c").to_string(),
            "illegal routing syntax: a:b:c"
        );
        assert_eq!(
            compile_err("[a]:b").to_string(),
            "illegal routing syntax: [a]:b: nested options are not allowed"
        );
    }

    #[test]
    fn test_compile_grammar() {
        let patterns = compile_grammar(&["settings", "(set|get)", "[<k>:<v>]*"]).unwrap();
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[2].quantifier(), Quantifier::ZeroOrMore);
    }
}
