use crate::error::{
    with_last_error_mut, DefaultFireSpreadError, FireSpreadError, FireSpreadErrorCode,
};
use crate::instance::FireSpreadInstance;
use fire_spread_core::{FireSimulation, FireSize};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `FireSpreadError` trait.
pub(crate) fn set_last_error(error: &impl FireSpreadError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FireSpreadError) -> FireSpreadErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, passing successes through.
pub(crate) fn track_result<T, E: FireSpreadError>(result: Result<T, E>) -> Result<T, FireSpreadErrorCode> {
    result.map_err(|e| track_error(&e))
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireSpreadErrorCode::Ok;
    });
}

/// Run an FFI body, translating its result into an error code and keeping
/// the thread-local error state in sync.
pub(crate) fn handle_ffi_result_error<F, E>(f: F) -> FireSpreadErrorCode
where
    F: FnOnce() -> Result<(), E>,
    E: FireSpreadError,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            FireSpreadErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow the instance behind a pointer handed out by `fire_spread_new`.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const FireSpreadInstance,
) -> Result<&'a FireSpreadInstance, DefaultFireSpreadError> {
    // SAFETY: non-null pointers come from `Box::into_raw` in `fire_spread_new`
    // and stay valid until `fire_spread_destroy`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFireSpreadError::null_pointer("ptr"))
}

/// Run `f` with a read lock on the simulation.
pub(crate) fn with_fire_sim<F, R>(instance: &FireSpreadInstance, f: F) -> Result<R, DefaultFireSpreadError>
where
    F: FnOnce(&FireSimulation) -> R,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultFireSpreadError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` with the write lock on the simulation.
pub(crate) fn with_fire_sim_mut<F, R>(
    instance: &FireSpreadInstance,
    f: F,
) -> Result<R, DefaultFireSpreadError>
where
    F: FnOnce(&mut FireSimulation) -> R,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultFireSpreadError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}

/// Decode a `FireSize` passed as `u8`.
pub(crate) fn fire_size_from_u8(value: u8) -> Result<FireSize, DefaultFireSpreadError> {
    FireSize::from_u8(value).ok_or_else(|| DefaultFireSpreadError::invalid_fire_size(value))
}

/// Write `value` through an optional out-pointer.
///
/// # Safety
/// `out` must be null or valid for writes.
pub(crate) unsafe fn write_optional<T>(out: *mut T, value: T) {
    if !out.is_null() {
        unsafe {
            *out = value;
        }
    }
}
