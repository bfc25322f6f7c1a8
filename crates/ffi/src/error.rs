use fire_spread_core::FireError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FireSpreadError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FireSpreadErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FireSpreadError` for FFI error scenarios.
///
/// Wraps a `FireSpreadErrorCode` with a message; core errors convert into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultFireSpreadError {
    code: FireSpreadErrorCode,
    msg: String,
}

impl DefaultFireSpreadError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireSpreadErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"RwLock"`, `"Mutex"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: FireSpreadErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: FireSpreadErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for an out-of-range `FireSize` code.
    pub fn invalid_fire_size(value: u8) -> Self {
        Self::invalid_parameter(format!("Fire size must be 0 (Big), 1 (Medium) or 2 (Small), got {value}"))
    }
}

impl FireSpreadError for DefaultFireSpreadError {
    fn code(&self) -> FireSpreadErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<FireError> for DefaultFireSpreadError {
    fn from(error: FireError) -> Self {
        let code = match &error {
            FireError::UnknownEntity(_) => FireSpreadErrorCode::UnknownEntity,
            FireError::NotFlammable(_) => FireSpreadErrorCode::NotFlammable,
            FireError::MissingConfiguration(_) => FireSpreadErrorCode::MissingConfiguration,
            FireError::InvalidParameter { .. } => FireSpreadErrorCode::InvalidParameter,
            FireError::Query(_) => FireSpreadErrorCode::QueryFailed,
            FireError::Config(_) => FireSpreadErrorCode::InvalidConfiguration,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by fire spread functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireSpreadErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid parameter passed to function.
    InvalidParameter = 3,

    /// No entity is registered under the given handle.
    UnknownEntity = 4,

    /// The entity exists but cannot burn.
    NotFlammable = 5,

    /// No effect profile is configured for the requested fire size.
    MissingConfiguration = 6,

    /// The spatial query failed.
    QueryFailed = 7,

    /// Configuration was rejected (out of range or unparsable).
    InvalidConfiguration = 8,
}

impl From<DefaultFireSpreadError> for FireSpreadErrorCode {
    fn from(error: DefaultFireSpreadError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, FireSpreadErrorCode)> = const { RefCell::new((None, FireSpreadErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireSpreadErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireSpreadErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// bool ignited = false;
/// if (fire_spread_ignite(sim, handle, &ignited) != Ok) {
///     const char* error = fire_spread_get_last_error();
///     if (error) {
///         printf("Ignite failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_spread_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `FireSpreadErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn fire_spread_get_last_error_code() -> FireSpreadErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
