//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for body-size
//! limits, route matching, dispatching, and access logging.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use super::endpoints;
use crate::config::AppState;
use crate::http;
use crate::logger;

/// Main entry point for HTTP request handling
///
/// Generic over the body type so tests can drive it with `Full<Bytes>`
/// while the server feeds it `hyper::body::Incoming`.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_str(req.version());

    let mut response = match check_body_size(&req, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => dispatch(req, &method, &path, query.as_deref(), &state).await,
    };

    // Every response carries the configured server name
    if let Ok(server_name) = state.config.http.server_name.parse() {
        response.headers_mut().insert("Server", server_name);
    }

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = logger::AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            path,
        );
        entry.query = query;
        entry.http_version = http_version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(
            response.body().size_hint().exact().unwrap_or(0),
        )
        .unwrap_or(usize::MAX);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch to the endpoint matching method and path
async fn dispatch<B>(
    req: Request<B>,
    method: &Method,
    path: &str,
    query: Option<&str>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    match (method, path) {
        (&Method::GET, "/hello") => endpoints::hello_world(),
        (&Method::GET, "/json") => endpoints::json_sample(),
        (&Method::GET, "/ping") => endpoints::ping(),
        (&Method::GET, "/incremental") => endpoints::incremental(state),
        (&Method::POST, "/post") => endpoints::echo_json(&collect_body(req).await),
        (&Method::POST, "/add") => endpoints::add(&collect_body(req).await),
        (&Method::POST, "/fizzbuzz") => {
            endpoints::fizzbuzz(query.and_then(|q| query_param(q, "count")))
        }
        (&Method::POST, p) => match p.strip_prefix("/hello/") {
            Some(name) if !name.is_empty() => endpoints::hello_name(name),
            // Empty name segment: `unmatched` would answer 405 with
            // "Allow: POST" to a request that already used POST, so this
            // is a plain 404
            Some(_) => http::build_404_response(),
            None => unmatched(method, p),
        },
        _ => unmatched(method, path),
    }
}

/// 405 for a known path hit with the wrong method, otherwise 404
fn unmatched(method: &Method, path: &str) -> Response<Full<Bytes>> {
    let allow = match path {
        "/hello" | "/json" | "/ping" | "/incremental" => Some("GET"),
        "/post" | "/add" | "/fizzbuzz" => Some("POST"),
        p if p.starts_with("/hello/") => Some("POST"),
        _ => None,
    };

    match allow {
        Some(allow) => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response(allow)
        }
        None => http::build_404_response(),
    }
}

/// Collect the request body; a read failure degrades to an empty body,
/// which the JSON endpoints then reject as a parse error
async fn collect_body<B>(req: Request<B>) -> Bytes
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Bytes::new()
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Extract a query parameter value by key (no percent-decoding)
fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        let cfg = Config::load_from("nonexistent-config").expect("defaults should load");
        Arc::new(AppState::new(&cfg))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:9999".parse().expect("valid address")
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("valid request")
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("body is utf-8")
    }

    #[tokio::test]
    async fn test_route_get_hello() {
        let resp = handle_request(request(Method::GET, "/hello", ""), peer(), test_state())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "Hello,world.\n");
    }

    #[tokio::test]
    async fn test_route_hello_name_path_segment() {
        let resp = handle_request(
            request(Method::POST, "/hello/Alice", ""),
            peer(),
            test_state(),
        )
        .await
        .expect("infallible");
        assert_eq!(body_string(resp).await, "Hello, Alice.\n");
    }

    #[tokio::test]
    async fn test_route_add_via_body() {
        let resp = handle_request(
            request(Method::POST, "/add", r#"{"left":2,"right":3}"#),
            peer(),
            test_state(),
        )
        .await
        .expect("infallible");
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, r#"{"answer":5}"#);
    }

    #[tokio::test]
    async fn test_route_fizzbuzz_query() {
        let resp = handle_request(
            request(Method::POST, "/fizzbuzz?count=3", ""),
            peer(),
            test_state(),
        )
        .await
        .expect("infallible");
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "1\n2\nFizz\n");
    }

    #[tokio::test]
    async fn test_route_fizzbuzz_missing_count_is_400() {
        let resp = handle_request(
            request(Method::POST, "/fizzbuzz", ""),
            peer(),
            test_state(),
        )
        .await
        .expect("infallible");
        assert_eq!(resp.status(), 400);
        assert_eq!(body_string(resp).await, "BadRequest");
    }

    #[tokio::test]
    async fn test_route_incremental_sequence() {
        let state = test_state();
        for expected in 1..=3 {
            let resp = handle_request(
                request(Method::GET, "/incremental", ""),
                peer(),
                Arc::clone(&state),
            )
            .await
            .expect("infallible");
            assert_eq!(body_string(resp).await, expected.to_string());
        }
    }

    #[tokio::test]
    async fn test_server_header_on_every_response() {
        let state = test_state();
        let server_name = state.config.http.server_name.clone();

        for (method, uri) in [
            (Method::GET, "/ping"),
            (Method::POST, "/fizzbuzz?count=0"),
            (Method::GET, "/nope"),
        ] {
            let resp = handle_request(request(method, uri, ""), peer(), Arc::clone(&state))
                .await
                .expect("infallible");
            assert_eq!(
                resp.headers()["Server"],
                server_name.as_str(),
                "missing Server header on {uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let resp = handle_request(request(Method::GET, "/nope", ""), peer(), test_state())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let resp = handle_request(request(Method::POST, "/ping", ""), peer(), test_state())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET");

        let resp = handle_request(request(Method::GET, "/fizzbuzz?count=3", ""), peer(), test_state())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "POST");
    }

    #[tokio::test]
    async fn test_oversized_content_length_is_413() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/post")
            .header("content-length", "999999999")
            .body(Full::new(Bytes::new()))
            .expect("valid request");
        let resp = handle_request(req, peer(), state).await.expect("infallible");
        assert_eq!(resp.status(), 413);
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("count=15", "count"), Some("15"));
        assert_eq!(query_param("a=1&count=12abc&b=2", "count"), Some("12abc"));
        assert_eq!(query_param("count", "count"), None);
        assert_eq!(query_param("other=1", "count"), None);
    }
}
