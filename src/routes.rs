//! The server's fixed routing table.
//!
//! | Path | Method | Response |
//! |---|---|---|
//! | `/` | any | `200`, empty body |
//! | `/echo/{suffix}` | any | `200`, the literal suffix as `text/plain` |
//! | `/user-agent` | any | `200`, the `User-Agent` header as `text/plain` |
//! | `/files/{name}` | `GET` | `200` with the file, `404` if missing, `500` on other faults |
//! | `/files/{name}` | `POST` | `201` after writing the body, `500` on faults |
//! | `/files/{name}` | other | `405` |
//!
//! Everything else is `404`. Without a storage root, `/files/` reads and
//! writes answer `404`, and so does a file name that would escape the root.
//! A write the filesystem refuses, including one into a directory that does
//! not exist, is a `500`.

use std::io;
use std::sync::Arc;

use tracing::error;

use crate::method::Method;
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::FileStore;

/// Builds the router, serving `/files/` from `store` when one is given.
pub fn app(store: Option<FileStore>) -> Router {
    let store = store.map(Arc::new);

    let get_store = store.clone();
    let get = move |req| read_file(get_store.clone(), req);
    let post = move |req| write_file(store.clone(), req);

    Router::new()
        .any("/", root)
        .any("/echo/", echo)
        .any("/echo/{*suffix}", echo)
        .any("/user-agent", user_agent)
        .on(Method::Get, "/files/", get.clone())
        .on(Method::Get, "/files/{*name}", get)
        .on(Method::Post, "/files/", post.clone())
        .on(Method::Post, "/files/{*name}", post)
}

async fn root(_req: Request) -> Response {
    Response::status(Status::Ok)
}

async fn echo(req: Request) -> Response {
    Response::text(req.param("suffix").unwrap_or_default())
}

async fn user_agent(req: Request) -> Response {
    Response::text(req.header("User-Agent").unwrap_or_default())
}

async fn read_file(store: Option<Arc<FileStore>>, req: Request) -> Response {
    let Some(store) = store else {
        return Response::status(Status::NotFound);
    };
    let name = req.param("name").unwrap_or_default();

    match store.read(name).await {
        Ok(contents) => Response::builder()
            .status(Status::Ok)
            .bytes(ContentType::OctetStream, contents),
        Err(e) => fault_response(name, FileOp::Read, e),
    }
}

async fn write_file(store: Option<Arc<FileStore>>, req: Request) -> Response {
    let Some(store) = store else {
        return Response::status(Status::NotFound);
    };
    let name = req.param("name").unwrap_or_default();

    match store.write(name, req.body()).await {
        Ok(()) => Response::builder()
            .status(Status::Created)
            .bytes(ContentType::OctetStream, Vec::new()),
        Err(e) => fault_response(name, FileOp::Write, e),
    }
}

#[derive(Clone, Copy, Debug)]
enum FileOp {
    Read,
    Write,
}

fn fault_response(name: &str, op: FileOp, e: io::Error) -> Response {
    match (op, e.kind()) {
        // Rejected by the store before reaching the filesystem.
        (_, io::ErrorKind::InvalidInput) => Response::status(Status::NotFound),
        (FileOp::Read, io::ErrorKind::NotFound) => Response::status(Status::NotFound),
        _ => {
            error!(file = name, ?op, "file store error: {e}");
            Response::status(Status::InternalServerError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::dispatch;

    async fn call(router: &Router, raw: &[u8]) -> Response {
        dispatch(router, Request::parse(raw).unwrap()).await
    }

    #[tokio::test]
    async fn root_ignores_method() {
        let app = app(None);
        let cases: [&[u8]; 2] = [b"GET / HTTP/1.1\r\n\r\n", b"DELETE / HTTP/1.1\r\n\r\n"];
        for raw in cases {
            let res = call(&app, raw).await;
            assert_eq!(res.code(), 200);
            assert!(res.body().is_empty());
            assert_eq!(res.header("Content-Type"), None);
        }
    }

    #[tokio::test]
    async fn echo_returns_literal_suffix() {
        let app = app(None);

        let res = call(&app, b"GET /echo/abc HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 200);
        assert_eq!(res.body(), b"abc");
        assert_eq!(res.header("Content-Type"), Some("text/plain"));

        let res = call(&app, b"POST /echo/a%20b/c HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.body(), b"a%20b/c");

        let res = call(&app, b"GET /echo/ HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 200);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn user_agent_echoes_header_or_empty() {
        let app = app(None);

        let res = call(&app, b"GET /user-agent HTTP/1.1\r\nUser-Agent: curl/7\r\n\r\n").await;
        assert_eq!(res.body(), b"curl/7");

        let res = call(&app, b"GET /user-agent HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 200);
        assert!(res.body().is_empty());
        assert_eq!(res.header("Content-Type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let app = app(None);
        let cases: [&[u8]; 3] = [
            b"GET /nope HTTP/1.1\r\n\r\n",
            b"GET /echo HTTP/1.1\r\n\r\n",
            b"GET /user-agent/x HTTP/1.1\r\n\r\n",
        ];
        for raw in cases {
            let res = call(&app, raw).await;
            assert_eq!(res.code(), 404);
            assert!(res.body().is_empty());
        }
    }

    #[tokio::test]
    async fn post_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(Some(FileStore::new(dir.path())));

        let res = call(&app, b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").await;
        assert_eq!(res.code(), 201);
        assert!(res.body().is_empty());
        assert_eq!(res.header("Content-Type"), Some("application/octet-stream"));

        let res = call(&app, b"GET /files/a.txt HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 200);
        assert_eq!(res.body(), b"hello");
        assert_eq!(res.header("Content-Type"), Some("application/octet-stream"));
    }

    #[tokio::test]
    async fn get_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(Some(FileStore::new(dir.path())));

        let res = call(&app, b"GET /files/missing.txt HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 404);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn other_methods_on_files_are_not_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(Some(FileStore::new(dir.path())));

        for method in ["DELETE", "PUT", "HEAD", "BREW"] {
            let raw = format!("{method} /files/a.txt HTTP/1.1\r\n\r\n");
            let res = call(&app, raw.as_bytes()).await;
            assert_eq!(res.code(), 405, "{method}");
            assert!(res.body().is_empty());
        }
    }

    #[tokio::test]
    async fn traversal_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(Some(FileStore::new(dir.path())));

        let res = call(&app, b"GET /files/../etc/passwd HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 404);

        let res = call(&app, b"POST /files/../escaped HTTP/1.1\r\n\r\nx").await;
        assert_eq!(res.code(), 404);
    }

    #[tokio::test]
    async fn filesystem_fault_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let app = app(Some(FileStore::new(dir.path())));

        let res = call(&app, b"GET /files/sub HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 500);
        assert!(res.body().is_empty());

        let res = call(&app, b"POST /files/sub HTTP/1.1\r\n\r\nx").await;
        assert_eq!(res.code(), 500);
    }

    #[tokio::test]
    async fn post_into_missing_directory_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(Some(FileStore::new(dir.path())));

        let res = call(&app, b"POST /files/nodir/a.txt HTTP/1.1\r\n\r\nhello").await;
        assert_eq!(res.code(), 500);
        assert!(res.body().is_empty());
        assert!(!dir.path().join("nodir").exists());
    }

    #[tokio::test]
    async fn files_without_storage_root_are_not_found() {
        let app = app(None);

        let res = call(&app, b"GET /files/a.txt HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 404);

        let res = call(&app, b"POST /files/a.txt HTTP/1.1\r\n\r\nhello").await;
        assert_eq!(res.code(), 404);

        let res = call(&app, b"DELETE /files/a.txt HTTP/1.1\r\n\r\n").await;
        assert_eq!(res.code(), 405);
    }
}
