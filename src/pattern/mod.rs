//! Grammar DSL: one grammar token compiles to one [`TokenPattern`].
//!
//! A grammar is a whitespace-separated list of grammar tokens. Each token
//! matches exactly one input token, possibly repeated by its quantifier.
//!
//! # Grammar syntax
//!
//! | Token                 | Meaning                                           |
//! |-----------------------|---------------------------------------------------|
//! | `settings`            | Literal (word chars, `.`, `+`, `-`), case-folded   |
//! | `(set\|get)`          | One of the alternatives, case-folded              |
//! | `<name>`              | Any token without `:`, captured as `name`         |
//! | `<name(set\|get)>`    | One of the alternatives, captured as `name`       |
//! | `[X]`                 | Zero or one `X`                                   |
//! | `[X]*`                | Zero or more `X`                                  |
//! | `[X]+`                | One or more `X`                                   |
//! | `K:V`                 | `key:value` token; `K` and `V` are forms above    |
//!
//! A colon pair produces two captures. The key's captured text doubles as a
//! lookup name for the value, so `[<opt>:<val>]+` over `author:abc` makes
//! `author` resolve to `abc`.

pub mod ast;
pub mod char_class;
pub mod compiler;
pub mod matcher;

pub use ast::{Quantifier, Slot, TokenMatcher, TokenPattern, WordMatcher};
pub use compiler::{compile, compile_grammar};
pub use matcher::Capture;
