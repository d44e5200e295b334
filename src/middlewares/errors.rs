use crate::errors::ApiError;
use axum::{
    body::{Bytes, to_bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sentry::{
    Breadcrumb, Level,
    protocol::{Event, Exception},
};
use std::convert::Infallible;

pub async fn error_middleware(request: Request, next: Next) -> Result<Response, Infallible> {
    let request_path = request.uri().path().to_string();
    let request_uri = request.uri().to_string();
    let response = next.run(request).await;
    let status_code = response.status();

    if status_code == StatusCode::METHOD_NOT_ALLOWED {
        tracing::warn!(
            path = %request_path,
            uri = %request_uri,
            "Method not allowed"
        );
        return Ok(ApiError::method_not_allowed().into_response());
    }

    // Upstream diagnostics stay in the logs, users get a generic message
    if status_code.is_server_error() {
        handle_server_error(response, &request_path, &request_uri, status_code).await
    } else if status_code.is_client_error() {
        log_client_error(response, &request_path, &request_uri, status_code).await
    } else {
        Ok(response)
    }
}

async fn handle_server_error(
    response: Response,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) -> Result<Response, Infallible> {
    let (kind, detail) = match to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => describe_server_error(&bytes),
        Err(e) => (ServerErrorKind::UnreadableBody, format!("{e:?}")),
    };

    tracing::error!(
        path = %request_path,
        uri = %request_uri,
        status = %status_code,
        kind = kind.as_str(),
        "Server error: {detail}",
    );
    report_to_sentry(kind, &detail, request_path, request_uri, status_code);

    Ok(ApiError::internal_server_error_user().into_response())
}

async fn log_client_error(
    response: Response,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) -> Result<Response, Infallible> {
    let (parts, body) = response.into_parts();

    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let error_detail = match serde_json::from_slice::<ApiError>(&bytes) {
                Ok(api_error) => format!("{} - {}", api_error.error, api_error.message),
                Err(_) => String::from_utf8_lossy(&bytes).to_string(),
            };

            tracing::warn!(
                path = %request_path,
                uri = %request_uri,
                status = %status_code,
                "Client error: {}",
                error_detail,
            );

            // Reconstruct the response with the original body
            Ok(Response::from_parts(parts, axum::body::Body::from(bytes)))
        },
        Err(_) => Ok(ApiError::internal_server_error_user().into_response()),
    }
}

/// What a masked 5xx response carried before its body was replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ServerErrorKind {
    /// An `ApiError` body, i.e. the catalog failed or answered garbage
    CatalogFailure,
    /// A 5xx body that is not an `ApiError`
    UnparseableBody,
    UnreadableBody,
}

impl ServerErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ServerErrorKind::CatalogFailure => "catalog_failure",
            ServerErrorKind::UnparseableBody => "unparseable_body",
            ServerErrorKind::UnreadableBody => "unreadable_body",
        }
    }
}

fn describe_server_error(bytes: &Bytes) -> (ServerErrorKind, String) {
    match serde_json::from_slice::<ApiError>(bytes) {
        Ok(api_error) => (
            ServerErrorKind::CatalogFailure,
            format!("{} - {}", api_error.error, api_error.message),
        ),
        Err(e) => (
            ServerErrorKind::UnparseableBody,
            format!("{e} in body: {}", String::from_utf8_lossy(bytes)),
        ),
    }
}

/// Sends the unmasked diagnostic to Sentry. Without a configured DSN the
/// hub has no client and this does nothing.
fn report_to_sentry(
    kind: ServerErrorKind,
    detail: &str,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) {
    sentry::add_breadcrumb(Breadcrumb {
        category: Some("set-gate.request".into()),
        message: Some(format!("Lookup at {request_path}")),
        level: Level::Info,
        ..Default::default()
    });

    sentry::capture_event(Event {
        message: Some(format!("{status_code} from {request_uri}")),
        level: Level::Error,
        exception: vec![Exception {
            ty: kind.as_str().to_string(),
            value: Some(detail.to_string()),
            ..Default::default()
        }]
        .into(),
        ..Default::default()
    });
}
