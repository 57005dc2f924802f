use uuid::Uuid;

use super::*;

#[test]
fn error_codes_are_stable() {
    assert_eq!(EditorError::NoHistory.error_code(), "E_NO_HISTORY");
    assert_eq!(EditorError::NotFound(Uuid::nil()).error_code(), "E_NOT_FOUND");
    assert_eq!(EditorError::ExternalOpFailed("x".into()).error_code(), "E_EXTERNAL_OP_FAILED");
    assert_eq!(EditorError::InvalidGeometry.error_code(), "E_INVALID_GEOMETRY");
    assert_eq!(EditorError::Busy.error_code(), "E_BUSY");
    assert_eq!(EditorError::WrongKind { expected: "an image" }.error_code(), "E_WRONG_KIND");
}

#[test]
fn snapshot_error_converts_from_serde() {
    let err = serde_json::from_str::<u32>("nope").unwrap_err();
    let e: EditorError = err.into();
    assert_eq!(e.error_code(), "E_SNAPSHOT");
    assert!(!e.retryable());
}

#[test]
fn retryable_errors() {
    assert!(EditorError::Busy.retryable());
    assert!(EditorError::ExternalOpFailed("timeout".into()).retryable());
    assert!(!EditorError::NoHistory.retryable());
    assert!(!EditorError::InvalidGeometry.retryable());
}

#[test]
fn silent_errors() {
    assert!(EditorError::NoHistory.is_silent());
    assert!(EditorError::NotFound(Uuid::nil()).is_silent());
    assert!(EditorError::InvalidGeometry.is_silent());
    assert!(!EditorError::Busy.is_silent());
    assert!(!EditorError::ExternalOpFailed("x".into()).is_silent());
}

#[test]
fn messages_name_the_problem() {
    assert_eq!(EditorError::WrongKind { expected: "an image" }.to_string(), "operation requires an image");
    assert!(EditorError::ExternalOpFailed("quota".into()).to_string().contains("quota"));
}
