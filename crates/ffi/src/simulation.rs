use crate::error::DefaultFireSpreadError;
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_fire_sim_mut};
use crate::instance::FireSpreadInstance;

/// Advance the simulation by `dt` seconds.
///
/// Runs every ignition and spread attempt that came due, then advances fire
/// growth and suppression decay.
///
/// Thread-safe: acquires `RwLock` write lock for simulation update.
///
/// Safety:
/// - `ptr` must be a valid pointer returned by `fire_spread_new`.
/// - If `ptr` is null or `dt` is non-finite or negative this function is a no-op.
#[no_mangle]
pub extern "C" fn fire_spread_update(ptr: *const FireSpreadInstance, dt: f32) {
    if !dt.is_finite() || dt < 0.0 {
        return;
    }

    // Silently ignore errors for void-returning function
    let _ = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;

        with_fire_sim_mut(instance, |sim| {
            sim.update(dt);
        })?;

        Ok::<(), DefaultFireSpreadError>(())
    });
}
