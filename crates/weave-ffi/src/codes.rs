//! Integer status codes returned by every ABI function.

use std::ffi::{c_char, c_int};

use weave_common::WeaveError;

pub const WEBVIEW_ERROR_OK: c_int = 0;
pub const WEBVIEW_ERROR_INVALID_INSTANCE: c_int = -1;
pub const WEBVIEW_ERROR_NOT_BOUND: c_int = -2;
pub const WEBVIEW_ERROR_UNKNOWN_REQUEST: c_int = -3;
pub const WEBVIEW_ERROR_NAVIGATION: c_int = -4;
pub const WEBVIEW_ERROR_MALFORMED_ARGUMENTS: c_int = -5;
pub const WEBVIEW_ERROR_WRONG_THREAD: c_int = -6;
pub const WEBVIEW_ERROR_INVALID_STATE: c_int = -7;
pub const WEBVIEW_ERROR_INVALID_ARGUMENT: c_int = -8;
pub const WEBVIEW_ERROR_PLATFORM: c_int = -9;
pub const WEBVIEW_ERROR_UNSPECIFIED: c_int = -10;

pub fn error_code(err: &WeaveError) -> c_int {
    match err {
        WeaveError::InvalidInstance(_) => WEBVIEW_ERROR_INVALID_INSTANCE,
        WeaveError::NotBound(_) => WEBVIEW_ERROR_NOT_BOUND,
        WeaveError::UnknownRequest(_) => WEBVIEW_ERROR_UNKNOWN_REQUEST,
        WeaveError::NavigationFailure { .. } => WEBVIEW_ERROR_NAVIGATION,
        WeaveError::MalformedArguments(_) => WEBVIEW_ERROR_MALFORMED_ARGUMENTS,
        WeaveError::WrongThread => WEBVIEW_ERROR_WRONG_THREAD,
        WeaveError::InvalidState(_) => WEBVIEW_ERROR_INVALID_STATE,
        WeaveError::InvalidArgument(_) => WEBVIEW_ERROR_INVALID_ARGUMENT,
        WeaveError::Platform(_) => WEBVIEW_ERROR_PLATFORM,
        WeaveError::Config(_) | WeaveError::Io(_) => WEBVIEW_ERROR_UNSPECIFIED,
    }
}

/// Static, NUL-terminated description of a status code.
pub fn describe(code: c_int) -> &'static [u8] {
    match code {
        WEBVIEW_ERROR_OK => b"ok\0",
        WEBVIEW_ERROR_INVALID_INSTANCE => b"invalid instance\0",
        WEBVIEW_ERROR_NOT_BOUND => b"function not bound\0",
        WEBVIEW_ERROR_UNKNOWN_REQUEST => b"unknown request\0",
        WEBVIEW_ERROR_NAVIGATION => b"navigation failed\0",
        WEBVIEW_ERROR_MALFORMED_ARGUMENTS => b"malformed arguments\0",
        WEBVIEW_ERROR_WRONG_THREAD => b"called from the wrong thread\0",
        WEBVIEW_ERROR_INVALID_STATE => b"invalid state\0",
        WEBVIEW_ERROR_INVALID_ARGUMENT => b"invalid argument\0",
        WEBVIEW_ERROR_PLATFORM => b"platform error\0",
        _ => b"unspecified error\0",
    }
}

pub(crate) fn describe_ptr(code: c_int) -> *const c_char {
    describe(code).as_ptr().cast()
}

pub(crate) fn status<T>(result: Result<T, WeaveError>) -> c_int {
    match result {
        Ok(_) => WEBVIEW_ERROR_OK,
        Err(e) => error_code(&e),
    }
}
