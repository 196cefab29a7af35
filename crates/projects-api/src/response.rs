use lambda_http::http::header::{CONTENT_TYPE, HeaderValue};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};
use serde::Serialize;

/// Body shape for successful operations.
#[derive(Serialize)]
struct SuccessBody<T: Serialize> {
    status: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// Body shape for failed operations.
#[derive(Serialize)]
struct FailureBody {
    status: bool,
    message: String,
    error: String,
}

/// Build a success envelope. `data: None` omits the field entirely.
pub fn success<T: Serialize>(
    code: StatusCode,
    message: impl Into<String>,
    data: Option<T>,
) -> Response<Body> {
    json_response(
        code,
        &SuccessBody {
            status: true,
            message: message.into(),
            data,
        },
    )
}

/// Build a failure envelope with an opaque error detail.
pub fn failure(
    code: StatusCode,
    message: impl Into<String>,
    error: impl Into<String>,
) -> Response<Body> {
    json_response(
        code,
        &FailureBody {
            status: false,
            message: message.into(),
            error: error.into(),
        },
    )
}

/// Build a response with an empty JSON object body (unmatched routes).
pub fn empty(code: StatusCode) -> Response<Body> {
    json_response(code, &serde_json::json!({}))
}

fn json_response(code: StatusCode, payload: &impl Serialize) -> Response<Body> {
    let body = serde_json::to_string(payload).unwrap_or_else(|err| {
        tracing::error!("response serialization failed: {err}");
        r#"{"status":false,"message":"Internal server error."}"#.to_owned()
    });

    let mut response = Response::new(Body::Text(body));
    *response.status_mut() = code;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
