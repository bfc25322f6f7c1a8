use fire_spread_core::{EntityHandle, FireEffect, FireState, FireSimulation};
use std::ptr;

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_fire_sim, write_optional};
use crate::instance::FireSpreadInstance;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
/// FFI-friendly snapshot of a live fire effect.
/// Keep this layout stable for C/C++/C# consumers.
pub struct EffectStats {
    /// Owning entity handle.
    pub entity: u32,

    /// Effect id, usable with `fire_spread_contact`.
    pub effect_id: u32,

    /// Fire size the effect was created with (0 = Big, 1 = Medium, 2 = Small).
    pub fire_size: u8,

    /// Owner state (2 = Burning, 3 = Extinguishing).
    pub state: u8,

    /// World position of the flames (m).
    pub x: f32,
    pub y: f32,
    pub z: f32,

    /// Intensity in `[min_intensity, 1]`.
    pub intensity: f32,

    /// Transform scale (growth × intensity).
    pub scale_x: f32,
    pub scale_y: f32,
    pub scale_z: f32,

    /// Half extents of the suppression contact volume (m).
    pub contact_half_x: f32,
    pub contact_half_y: f32,
    pub contact_half_z: f32,
}

impl From<(EntityHandle, &FireEffect, FireState)> for EffectStats {
    fn from((entity, effect, state): (EntityHandle, &FireEffect, FireState)) -> Self {
        let position = effect.position();
        let scale = effect.scale();
        let half = effect.contact().half_extents;
        Self {
            entity: entity.raw(),
            effect_id: effect.id().raw(),
            fire_size: effect.profile().as_u8(),
            state: state.as_u8(),
            x: position.x,
            y: position.y,
            z: position.z,
            intensity: effect.intensity(),
            scale_x: scale.x,
            scale_y: scale.y,
            scale_z: scale.z,
            contact_half_x: half.x,
            contact_half_y: half.y,
            contact_half_z: half.z,
        }
    }
}

/// Simulation-wide counters.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FireSpreadStats {
    /// Elapsed simulation time (s).
    pub simulation_time: f64,
    pub registered: u32,
    pub idle: u32,
    pub igniting: u32,
    pub burning: u32,
    pub extinguishing: u32,
    pub extinguished: u32,
    pub active_coordinators: u32,
    pub total_ignitions: u64,
    pub total_extinguished: u64,
    /// Lifecycle events dropped because the host did not drain them.
    pub dropped_events: u64,
}

impl From<&FireSimulation> for FireSpreadStats {
    fn from(sim: &FireSimulation) -> Self {
        let stats = sim.stats();
        Self {
            simulation_time: stats.simulation_time.value(),
            registered: stats.registered as u32,
            idle: stats.idle as u32,
            igniting: stats.igniting as u32,
            burning: stats.burning as u32,
            extinguishing: stats.extinguishing as u32,
            extinguished: stats.extinguished as u32,
            active_coordinators: stats.active_coordinators as u32,
            total_ignitions: stats.totals.ignitions,
            total_extinguished: stats.totals.extinguished,
            dropped_events: stats.dropped_events,
        }
    }
}

#[no_mangle]
/// Return a borrowed pointer to a cached snapshot of all live fire effects.
///
/// The returned pointer is valid until the next call to this function,
/// `fire_spread_clear_snapshot` or `fire_spread_destroy`.
/// **DO NOT FREE THIS POINTER**.
///
/// Thread-safe: Acquires Mutex lock on snapshot cache and `RwLock` read lock on simulation state.
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
/// - `out_array` must be a valid, non-null pointer to a `*const EffectStats`.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// const EffectStats* effects = nullptr;
/// if (fire_spread_get_burning_effects(sim, &len, &effects) == Ok) {
///     for (uintptr_t i = 0; i < len; i++) {
///         UpdateFireVisual(effects[i]);
///     }
/// }
/// ```
pub unsafe extern "C" fn fire_spread_get_burning_effects(
    ptr: *const FireSpreadInstance,
    out_len: *mut usize,
    out_array: *mut *const EffectStats,
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
        let mut snapshot = instance
            .burning_snapshot
            .lock()
            .map_err(|_| DefaultFireSpreadError::lock_poisoned("Mutex"))?;
        snapshot.clear(); // O(1) - keeps capacity

        with_fire_sim(instance, |sim| {
            snapshot.extend(sim.live_effects().into_iter().filter_map(|(handle, effect)| {
                let state = sim.state_of(handle)?;
                Some(EffectStats::from((handle, effect, state)))
            }));
        })?;

        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }

        Ok::<(), DefaultFireSpreadError>(())
    });

    // Set to null on error (per documentation contract)
    if result != FireSpreadErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}

#[no_mangle]
/// Clear the cached burning effects snapshot and free unused memory.
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success
/// - `FireSpreadErrorCode::NullPointer` if `ptr` is null
pub extern "C" fn fire_spread_clear_snapshot(ptr: *const FireSpreadInstance) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut snapshot = instance
            .burning_snapshot
            .lock()
            .map_err(|_| DefaultFireSpreadError::lock_poisoned("Mutex"))?;
        snapshot.clear();
        snapshot.shrink_to_fit();
        Ok::<(), DefaultFireSpreadError>(())
    })
}

#[no_mangle]
/// Query the lifecycle state of an entity.
///
/// - `out_state` receives 0 = Idle, 1 = Igniting, 2 = Burning, 3 = Extinguishing,
///   4 = Extinguished. Left untouched when the entity is not flammable.
/// - `out_found` (optional) receives whether a flammable entity exists under `handle`.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_state` must be a valid, non-null pointer to a `u8`.
/// - `out_found` if non-null, must be a valid pointer to a `bool`.
pub unsafe extern "C" fn fire_spread_get_entity_state(
    ptr: *const FireSpreadInstance,
    handle: u32,
    out_state: *mut u8,
    out_found: *mut bool,
) -> FireSpreadErrorCode {
    if out_state.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_state"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let state = with_fire_sim(instance, |sim| sim.state_of(EntityHandle::new(handle)))?;
        unsafe {
            if let Some(state) = state {
                *out_state = state.as_u8();
            }
            write_optional(out_found, state.is_some());
        }
        Ok::<(), DefaultFireSpreadError>(())
    })
}

#[no_mangle]
/// Fill `out_stats` with simulation-wide counters.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_stats` must be a valid, non-null pointer to a `FireSpreadStats`.
pub unsafe extern "C" fn fire_spread_get_stats(
    ptr: *const FireSpreadInstance,
    out_stats: *mut FireSpreadStats,
) -> FireSpreadErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let stats = with_fire_sim(instance, |sim| FireSpreadStats::from(sim))?;
        unsafe {
            *out_stats = stats;
        }
        Ok::<(), DefaultFireSpreadError>(())
    })
}
