//! Route handlers and their type-erased storage.
//!
//! Any `Fn(Request) -> impl Future<Output = Response>` is a [`Handler`].
//!
//! # How handlers are stored
//!
//! Every `async fn` and closure has its own anonymous type, yet the router
//! keeps all of them in the same `matchit` trees. A tree holds one value type,
//! so each handler is wrapped and hidden behind the `ErasedHandler` trait
//! object:
//!
//! ```text
//! async fn echo(req: Request) -> Response { … }   ← route handler
//!        ↓ Router::any("/echo/{*suffix}", echo)
//! echo.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(echo))                       ← one allocation, at startup
//!        ↓ stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req)                               ← per request, virtual call
//!        ↓
//! Box::pin(echo(req))                             ← BoxFuture
//! ```
//!
//! Per request that costs one `Arc` clone when the route is looked up, one
//! virtual call and one boxed future.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

/// Boxed future produced by a stored handler.
///
/// The concrete future type differs per handler, so it is boxed. `Send +
/// 'static` lets it run inside a spawned connection task.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A handler shared by every connection task.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every function or closure usable as a route handler:
///
/// ```text
/// async fn name(req: Request) -> Response
/// move |req| some_async_fn(shared.clone(), req)
/// ```
///
/// Sealed; only the blanket impl below satisfies it. That keeps
/// `into_boxed_handler` free to change without breaking callers.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Gives a concrete handler type a home behind `dyn ErasedHandler`.
struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        Box::pin((self.0)(req))
    }
}
