use fire_spread_core::{FireError, FireSimulation, SimulationConfig};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{clear_last_error, track_error, track_result};
use crate::events::FireEventRecord;
use crate::queries::EffectStats;

/// Initial capacity of the burning effects snapshot
const SNAPSHOT_CAPACITY: usize = 64;

/// The main fire spread context.
/// Holds the simulation and the buffers handed out to callers.
///
/// # Thread Safety
/// `FireSpreadInstance` is fully thread-safe and can be shared across engine threads.
///
/// The internal simulation is protected by an `RwLock`, allowing:
/// - **Multiple concurrent readers** (queries, state inspections): `.read()` lock
/// - **Exclusive writer** (updates, ignition, suppression): `.write()` lock
///
/// ## Unreal Engine Example
/// ```cpp
/// FireSpreadInstance* Fire = nullptr;
///
/// void AFireActor::BeginPlay() {
///     // null config = built-in defaults
///     if (fire_spread_new(nullptr, &Fire) != Ok) {
///         UE_LOG(LogTemp, Error, TEXT("%hs"), fire_spread_get_last_error());
///     }
/// }
///
/// void AFireActor::Tick(float DeltaTime) {
///     fire_spread_update(Fire, DeltaTime);
/// }
///
/// void AFireActor::EndPlay(const EEndPlayReason::Type) {
///     fire_spread_destroy(Fire);
///     Fire = nullptr;
/// }
/// ```
pub struct FireSpreadInstance {
    pub(crate) sim: RwLock<FireSimulation>,
    /// Cached snapshot of burning effects to avoid per-frame allocations.
    /// Reused across calls to `fire_spread_get_burning_effects`.
    pub(crate) burning_snapshot: Mutex<Vec<EffectStats>>,
    /// Events handed out by the last `fire_spread_drain_events` call.
    pub(crate) events_buffer: Mutex<Vec<FireEventRecord>>,
}

impl FireSpreadInstance {
    /// Creates a new instance from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `FireSpreadErrorCode::InvalidConfiguration` if the configuration is rejected.
    pub(crate) fn new(config: SimulationConfig) -> Result<Box<Self>, DefaultFireSpreadError> {
        let sim = FireSimulation::new(config)?;
        Ok(Box::new(Self {
            sim: RwLock::new(sim),
            burning_snapshot: Mutex::new(Vec::with_capacity(SNAPSHOT_CAPACITY)),
            events_buffer: Mutex::new(Vec::with_capacity(SNAPSHOT_CAPACITY)),
        }))
    }

    /// Parse an optional JSON configuration.
    fn config_from_json(config_json: *const c_char) -> Result<SimulationConfig, DefaultFireSpreadError> {
        if config_json.is_null() {
            return Ok(SimulationConfig::default());
        }
        // SAFETY: caller guarantees a valid null-terminated string
        let text = unsafe { CStr::from_ptr(config_json) }
            .to_str()
            .map_err(|e| DefaultFireSpreadError::invalid_parameter(format!("config_json is not UTF-8: {e}")))?;
        SimulationConfig::from_json_str(text)
            .map_err(|e| DefaultFireSpreadError::from(FireError::Config(e)))
    }
}

/// Create a new `FireSpread` instance and return it via out-parameter.
///
/// Parameters
/// - `config_json`: JSON `SimulationConfig`, or null for the built-in defaults.
///   Missing fields take their default values.
/// - `out_instance`: Pointer to receive the created instance. Must be non-null.
///   - On success: set to valid `FireSpreadInstance` pointer
///   - On failure: set to null
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success
/// - `FireSpreadErrorCode::NullPointer` if `out_instance` is null
/// - `FireSpreadErrorCode::InvalidParameter` if `config_json` is not UTF-8
/// - `FireSpreadErrorCode::InvalidConfiguration` if the JSON is malformed or values are out of range
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - `config_json` must be null or a valid null-terminated string.
/// - The caller takes ownership of the returned instance and MUST call `fire_spread_destroy`
///   exactly once to avoid memory leaks.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_new(
    config_json: *const c_char,
    out_instance: *mut *mut FireSpreadInstance,
) -> FireSpreadErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_instance"));
    }

    let created = FireSpreadInstance::config_from_json(config_json).and_then(FireSpreadInstance::new);
    match track_result(created) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            clear_last_error();
            FireSpreadErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `fire_spread_new`.
///
/// - If `ptr` is null, this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `fire_spread_new` and not freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_destroy(ptr: *mut FireSpreadInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `fire_spread_new`
    // and has not been freed. Recreating the Box drops the instance.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
