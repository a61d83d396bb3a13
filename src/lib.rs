//! Resolve free-text commands to handlers with a small grammar DSL.
//!
//! # Example
//!
//! ```rust
//! use rerouter::{Handler, Named, Positional, Router};
//!
//! let mut router: Router<(), Vec<String>> = Router::new();
//! router
//!     .register(
//!         "unsubscribe <feature> [<filter_name>:<filter_value>]+",
//!         Handler::immediate(|m, ()| {
//!             m.get("+path").into_vec().into_iter().map(String::from).collect()
//!         }),
//!     )
//!     .unwrap();
//!
//! let m = router.match_command("unsubscribe reviews +path:a -fork:b +path:c").unwrap();
//! assert_eq!(m.positional(1).unwrap(), Positional::Single("reviews"));
//! assert_eq!(m.get("-fork"), Named::One("b"));
//!
//! let paths = router.dispatch("unsubscribe reviews +path:a +path:c", ()).unwrap();
//! assert_eq!(paths, ["a", "c"]);
//! ```

mod error;
mod handler;
mod match_result;
pub mod pattern;
mod route;
mod router;
pub mod tokenizer;

pub use error::{Error, GrammarError, MatchError, ParseError, SetupError};
pub use handler::Handler;
pub use match_result::{MatchResult, Named, Positional};
pub use pattern::{Capture, Quantifier, Slot, TokenPattern, compile};
pub use route::{Route, TargetId};
pub use router::Router;
pub use tokenizer::tokenize;
