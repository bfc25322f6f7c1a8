use fire_spread_core::{EffectId, FireEvent, FireEventKind, FireSimulation};
use std::ptr;

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_fire_sim_mut};
use crate::instance::FireSpreadInstance;

/// Event kind codes carried by `FireEventRecord::kind`.
pub const FIRE_EVENT_IGNITION_STARTED: u8 = 0;
pub const FIRE_EVENT_BURNING: u8 = 1;
pub const FIRE_EVENT_SUPPRESSION_STARTED: u8 = 2;
pub const FIRE_EVENT_EXTINGUISHED: u8 = 3;
pub const FIRE_EVENT_SPREAD_ATTEMPTED: u8 = 4;
pub const FIRE_EVENT_SPREAD_EXHAUSTED: u8 = 5;
pub const FIRE_EVENT_IGNITION_ABORTED: u8 = 6;
pub const FIRE_EVENT_QUERY_FAILED: u8 = 7;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
/// FFI-friendly lifecycle event.
/// Fields that do not apply to `kind` are zero.
pub struct FireEventRecord {
    /// Simulation time of the transition (s).
    pub time: f64,

    /// Entity the event concerns.
    pub entity: u32,

    /// One of the `FIRE_EVENT_*` codes.
    pub kind: u8,

    /// Fire size for `IgnitionStarted` / `IgnitionAborted` (0 = Big, 1 = Medium, 2 = Small).
    pub fire_size: u8,

    /// Effect id for `Burning` / `Extinguished` (0 = none).
    pub effect_id: u32,

    /// Generation for `SpreadAttempted` / `SpreadExhausted`.
    pub generation: u32,

    /// Entities newly ignited by a `SpreadAttempted`.
    pub ignited_count: u32,
}

impl From<&FireEvent> for FireEventRecord {
    fn from(event: &FireEvent) -> Self {
        let mut record = Self {
            time: event.time.value(),
            entity: event.entity.raw(),
            kind: 0,
            fire_size: 0,
            effect_id: 0,
            generation: 0,
            ignited_count: 0,
        };
        match &event.kind {
            FireEventKind::IgnitionStarted { size, .. } => {
                record.kind = FIRE_EVENT_IGNITION_STARTED;
                record.fire_size = size.as_u8();
            }
            FireEventKind::Burning { effect } => {
                record.kind = FIRE_EVENT_BURNING;
                record.effect_id = effect.raw();
            }
            FireEventKind::SuppressionStarted => record.kind = FIRE_EVENT_SUPPRESSION_STARTED,
            FireEventKind::Extinguished { effect } => {
                record.kind = FIRE_EVENT_EXTINGUISHED;
                record.effect_id = effect.map_or(0, EffectId::raw);
            }
            FireEventKind::SpreadAttempted {
                ignited,
                generation,
            } => {
                record.kind = FIRE_EVENT_SPREAD_ATTEMPTED;
                record.generation = *generation;
                record.ignited_count = ignited.len() as u32;
            }
            FireEventKind::SpreadExhausted { generation } => {
                record.kind = FIRE_EVENT_SPREAD_EXHAUSTED;
                record.generation = *generation;
            }
            FireEventKind::IgnitionAborted { size } => {
                record.kind = FIRE_EVENT_IGNITION_ABORTED;
                record.fire_size = size.as_u8();
            }
            FireEventKind::QueryFailed { .. } => record.kind = FIRE_EVENT_QUERY_FAILED,
        }
        record
    }
}

#[no_mangle]
/// Take every lifecycle event recorded since the previous drain.
///
/// Hosts should call this once per frame; undrained events beyond the
/// configured `max_pending_events` are dropped oldest first.
///
/// The returned pointer is valid until the next call to this function or
/// `fire_spread_destroy`. **DO NOT FREE THIS POINTER**.
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success with the array in `out_array` and count in `out_len`
/// - `FireSpreadErrorCode::NullPointer` if `ptr`, `out_len`, or `out_array` is null
/// - `FireSpreadErrorCode::LockPoisoned` if an internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_len` must be a valid, non-null pointer to a `usize`.
/// - `out_array` must be a valid, non-null pointer to a `*const FireEventRecord`.
pub unsafe extern "C" fn fire_spread_drain_events(
    ptr: *const FireSpreadInstance,
    out_len: *mut usize,
    out_array: *mut *const FireEventRecord,
) -> FireSpreadErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_len"));
    }

    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultFireSpreadError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut buffer = instance
            .events_buffer
            .lock()
            .map_err(|_| DefaultFireSpreadError::lock_poisoned("Mutex"))?;
        buffer.clear();

        let drained = with_fire_sim_mut(instance, FireSimulation::drain_events)?;
        buffer.extend(drained.iter().map(FireEventRecord::from));

        unsafe {
            *out_len = buffer.len();
            *out_array = buffer.as_ptr();
        }

        Ok::<(), DefaultFireSpreadError>(())
    });

    if result != FireSpreadErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}
