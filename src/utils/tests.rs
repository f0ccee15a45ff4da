use super::RelayError;
use super::logging;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[test]
fn logging_init_accepts_levels() {
    // try_init makes repeated calls harmless
    logging::init("info");
    logging::init("debug");
    logging::init("warn");
}

#[test]
fn parse_level_falls_back_to_info() {
    assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
    assert_eq!(logging::parse_level(" trace "), tracing::Level::TRACE);
    assert_eq!(logging::parse_level("verbose"), tracing::Level::INFO);
}

#[test]
fn method_not_allowed_maps_to_405() {
    let response = RelayError::MethodNotAllowed.into_response();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn storage_failure_maps_to_server_fault() {
    let err = RelayError::StorageUnavailable("connection refused".to_string());
    assert_eq!(err.to_string(), "storage unavailable: connection refused");
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn sled_errors_become_storage_unavailable() {
    let err: RelayError = sled::Error::Unsupported("read only".to_string()).into();
    assert!(matches!(err, RelayError::StorageUnavailable(_)));
}
