//! # shoal
//!
//! A minimal HTTP/1.1 server written straight on top of tokio TCP sockets.
//! No hyper, no keep-alive, no chunked bodies: one connection carries one
//! request and one response, then closes.
//!
//! - Request decoding from a single bounded read ([`Request::parse`])
//! - Response encoding with a computed `Content-Length` ([`Response::to_bytes`])
//! - Radix-tree routing per method via [`matchit`], with 404/405 fallbacks
//! - A semaphore-bounded task per connection and graceful shutdown
//!
//! The binary serves a fixed set of routes (see [`routes`]):
//!
//! ```rust,no_run
//! use shoal::{routes, FileStore, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = routes::app(Some(FileStore::new("/tmp/files")));
//!     Server::bind(([0, 0, 0, 0], 4221).into())
//!         .serve(app)
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! Routers can also be assembled by hand:
//!
//! ```rust
//! use shoal::{Method, Request, Response, Router, Status};
//!
//! async fn hello(_req: Request) -> Response {
//!     Response::text("hello")
//! }
//!
//! async fn created(_req: Request) -> Response {
//!     Response::status(Status::Created)
//! }
//!
//! let app = Router::new()
//!     .any("/hello", hello)
//!     .on(Method::Post, "/things", created);
//! ```

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod routes;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::{Request, MAX_REQUEST_SIZE};
pub use response::{ContentType, Response, ResponseBuilder, HTTP_VERSION};
pub use router::Router;
pub use server::{Server, DEFAULT_MAX_CONNECTIONS};
pub use status::Status;
pub use store::FileStore;
