//! Endpoint handlers
//!
//! Each handler takes its already-extracted inputs (path segment, collected
//! body bytes, query parameter) and builds the response, leaving transport
//! concerns to the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::fizzbuzz;
use super::types::{AddRequest, AddResponse, JsonData};
use crate::config::AppState;
use crate::http;
use crate::logger;

/// `GET /hello`
pub fn hello_world() -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, "Hello,world.\n".to_string())
}

/// `POST /hello/{name}` - name is taken verbatim from the path segment
pub fn hello_name(name: &str) -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, format!("Hello, {name}.\n"))
}

/// `GET /json` - fixed sample payload; false bool is omitted
pub fn json_sample() -> Response<Full<Bytes>> {
    let sample = JsonData {
        number: 10,
        string: "hoge".to_string(),
        flag: false,
    };
    http::build_json_response(StatusCode::OK, &sample)
}

/// `POST /post` - echo the posted `JsonData` back
///
/// A body that fails to parse gets a 400 carrying the zero-valued struct,
/// which serializes as `{}` under the omit-empty rules.
pub fn echo_json(body: &Bytes) -> Response<Full<Bytes>> {
    match serde_json::from_slice::<JsonData>(body) {
        Ok(data) => http::build_json_response(StatusCode::OK, &data),
        Err(e) => {
            logger::log_warning(&format!("Rejected /post body: {e}"));
            http::build_json_response(StatusCode::BAD_REQUEST, &JsonData::default())
        }
    }
}

/// `POST /add` - answer = left + right, no range validation
pub fn add(body: &Bytes) -> Response<Full<Bytes>> {
    let request: AddRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            logger::log_warning(&format!("Rejected /add body: {e}"));
            return http::build_json_response(StatusCode::BAD_REQUEST, &AddRequest::default());
        }
    };

    let answer = AddResponse {
        answer: request.left.wrapping_add(request.right),
    };
    http::build_json_response(StatusCode::OK, &answer)
}

/// `GET /ping`
pub fn ping() -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, "pong".to_string())
}

/// `GET /incremental` - bump the shared counter and return the new value
pub fn incremental(state: &AppState) -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, state.next_count().to_string())
}

/// `POST /fizzbuzz?count=N`
pub fn fizzbuzz(count_param: Option<&str>) -> Response<Full<Bytes>> {
    match count_param.and_then(fizzbuzz::validate_count) {
        Some(count) => http::build_text_response(StatusCode::OK, fizzbuzz::sequence(count)),
        None => http::build_400_response(),
    }
}
