//! An append-only table of routes resolving commands to a unique target.

use itertools::Itertools;

use crate::error::{Error, ParseError, SetupError};
use crate::handler::Handler;
use crate::match_result::MatchResult;
use crate::pattern::TokenPattern;
use crate::route::{Route, TargetId};
use crate::tokenizer::tokenize;

/// Routes commands to handlers.
///
/// Populate with [`register`](Self::register) during setup, then resolve
/// with [`match_command`](Self::match_command) or
/// [`dispatch`](Self::dispatch). Resolution takes `&self`, so a built router
/// can be shared between threads.
///
/// ```rust
/// use rerouter::{Handler, Router};
///
/// let mut router: Router<(), String> = Router::new();
/// router
///     .register(
///         "jira <jira_id> set <option>:<value>",
///         Handler::immediate(|m, ()| format!("{:?}", m.get("jira.board"))),
///     )
///     .unwrap();
///
/// let out = router.dispatch("jira X-1 set jira.board:tools", ()).unwrap();
/// assert_eq!(out, r#"One("tools")"#);
/// ```
#[derive(Debug)]
pub struct Router<A = (), R = ()> {
    routes: Vec<Route>,
    targets: Vec<Handler<A, R>>,
}

impl<A, R> Default for Router<A, R> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl<A, R> Router<A, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `grammar` and bind it to `handler`.
    pub fn register(&mut self, grammar: &str, handler: Handler<A, R>) -> Result<TargetId, Error> {
        let target = self.target_for(&handler);
        let route = Route::from_grammar(grammar, target)?;
        self.push(route, handler);
        Ok(target)
    }

    /// Bind pre-built patterns to `handler`, bypassing the DSL.
    pub fn register_raw(
        &mut self,
        patterns: Vec<TokenPattern>,
        handler: Handler<A, R>,
    ) -> Result<TargetId, Error> {
        let target = self.target_for(&handler);
        let route = Route::from_patterns(patterns, target)?;
        self.push(route, handler);
        Ok(target)
    }

    /// Resolve `command` to exactly one route.
    ///
    /// Several routes bound to the same target count once; the first
    /// successful one is returned.
    pub fn match_command(&self, command: &str) -> Result<MatchResult, Error> {
        let tokens = tokenize(command)?;
        let mut matched: Vec<MatchResult> = Vec::new();
        for route in &self.routes {
            let m = route.match_tokens(&tokens);
            if m.is_match() && !matched.iter().any(|x| x.target() == m.target()) {
                matched.push(m);
            }
        }
        match matched.len() {
            0 => Err(ParseError::NoRoute {
                command: command.to_string(),
            }
            .into()),
            1 => {
                let m = matched.remove(0);
                tracing::debug!(command, grammar = m.grammar(), target = %m.target(), "route resolved");
                Ok(m)
            }
            _ => Err(SetupError::Ambiguous {
                command: command.to_string(),
                grammars: matched.iter().map(|m| m.grammar().to_string()).collect(),
            }
            .into()),
        }
    }

    /// Resolve `command` and run its handler with `args`.
    ///
    /// Suspending handlers are driven to completion before this returns.
    pub fn dispatch(&self, command: &str, args: A) -> Result<R, Error> {
        let m = self.match_command(command)?;
        let handler = &self.targets[m.target().0];
        tracing::debug!(suspending = handler.is_suspending(), "dispatching");
        Ok(handler.invoke(m, args))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn handler(&self, target: TargetId) -> Option<&Handler<A, R>> {
        self.targets.get(target.0)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The id of an already-registered clone of `handler`, or the next free id.
    fn target_for(&self, handler: &Handler<A, R>) -> TargetId {
        self.targets
            .iter()
            .find_position(|h| h.same_target(handler))
            .map_or(TargetId(self.targets.len()), |(idx, _)| TargetId(idx))
    }

    fn push(&mut self, route: Route, handler: Handler<A, R>) {
        if route.target().0 == self.targets.len() {
            self.targets.push(handler);
        }
        tracing::debug!(
            grammar = route.grammar(),
            patterns = route.patterns().len(),
            target = %route.target(),
            "route registered"
        );
        self.routes.push(route);
    }
}
