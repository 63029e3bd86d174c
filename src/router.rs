//! Radix-tree request router.
//!
//! One tree per HTTP method plus one tree for routes that accept any method.
//! A lookup either finds a handler, finds the path under some other method
//! (405), or finds nothing (404).
//!
//! # Lookup order
//!
//! 1. The tree for the request's method, when the method token is one this
//!    server knows.
//! 2. The any-method tree. Unknown method tokens only ever reach this one.
//! 3. Every other per-method tree, only to tell 405 from 404. A path that
//!    matches there is registered, just not for this method.
//!
//! Keeping one tree per method instead of one tree with a method table per
//! path lets `matchit` do all path matching, and a route may have different
//! handlers per method without any per-path bookkeeping here.
//!
//! `matchit` catch-alls (`{*name}`) need at least one character. `/echo/{*s}`
//! therefore does not match `/echo/`; register `/echo/` separately when the
//! empty remainder should route.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// Outcome of routing a method and path.
pub(crate) enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

/// The application router.
///
/// Build it once at startup and hand it to [`Server::serve`](crate::Server::serve).
/// Registration methods return `self` so calls chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    any: MatchitRouter<BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), any: MatchitRouter::new() }
    }

    /// Registers a handler for one method and path.
    ///
    /// Path parameters use `{name}` syntax and catch-alls `{*name}`;
    /// `req.param("name")` retrieves them. A catch-all never matches an empty
    /// remainder, so register the bare prefix as well when that should route.
    ///
    /// # Panics
    ///
    /// Panics if the path is invalid or conflicts with one already registered
    /// for the same method.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        insert(self.routes.entry(method).or_default(), path, handler);
        self
    }

    /// Registers a handler that serves every method, including method tokens
    /// this server does not recognise.
    pub fn any(mut self, path: &str, handler: impl Handler) -> Self {
        insert(&mut self.any, path, handler);
        self
    }

    pub(crate) fn lookup(&self, method: &str, path: &str) -> Lookup {
        let by_method = method.parse::<Method>().ok().and_then(|m| self.routes.get(&m));
        if let Some(found) = by_method.and_then(|tree| find(tree, path)) {
            return found;
        }
        if let Some(found) = find(&self.any, path) {
            return found;
        }
        // The request's own tree already missed, so a hit here belongs to
        // another method.
        if self.routes.values().any(|tree| tree.at(path).is_ok()) {
            Lookup::MethodNotAllowed
        } else {
            Lookup::NotFound
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn insert(tree: &mut MatchitRouter<BoxedHandler>, path: &str, handler: impl Handler) {
    tree.insert(path, handler.into_boxed_handler())
        .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
}

fn find(tree: &MatchitRouter<BoxedHandler>, path: &str) -> Option<Lookup> {
    let matched = tree.at(path).ok()?;
    let handler = Arc::clone(matched.value);
    let params = matched.params.iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    Some(Lookup::Found(handler, params))
}
