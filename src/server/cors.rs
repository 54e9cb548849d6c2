use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    VARY,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::warn;

pub const ALLOW_METHODS: &str = "GET,POST";
pub const ALLOW_HEADERS: &str = "Origin,Content-Type";
/// 12時間
pub const MAX_AGE_SECONDS: &str = "43200";

/// 全ルートの手前で適用するオリジン許可リスト
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Arc<[String]>,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::<String>::into).collect(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

/// `Origin` ヘッダのないリクエストはそのまま通す。
/// 許可されていないオリジンはハンドラに届く前に403で拒否する。
pub async fn enforce(State(policy): State<CorsPolicy>, request: Request, next: Next) -> Response {
    let origin = match request.headers().get(ORIGIN) {
        Some(origin) => origin.clone(),
        None => return next.run(request).await,
    };

    if !origin.to_str().map_or(false, |value| policy.allows(value)) {
        warn!(origin = ?origin, path = %request.uri().path(), "rejected cross-origin request");
        return StatusCode::FORBIDDEN.into_response();
    }

    let preflight = request.method() == Method::OPTIONS
        && request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD);

    let mut response = if preflight {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE_SECONDS),
        );
        response
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));
    response
}
