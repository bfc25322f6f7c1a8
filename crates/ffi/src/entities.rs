use fire_spread_core::{
    EffectId, EntityHandle, FlammableConfig, IgnitionSource, IgnitionSourceConfig,
    SuppressionOutcome, Vec3,
};

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{
    fire_size_from_u8, handle_ffi_result_error, instance_from_ptr, track_error, with_fire_sim_mut,
    write_optional,
};
use crate::instance::FireSpreadInstance;

/// Per-entity fire parameters.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlammableParams {
    /// Delay between ignition and the fire appearing (s).
    pub ignition_delay: f32,
    /// Offset from the entity position where the fire appears (m).
    pub fire_offset_x: f32,
    pub fire_offset_y: f32,
    pub fire_offset_z: f32,
    /// Time to grow the fire to its target scale (s).
    pub fire_growth_duration: f32,
    /// Target fire scale before the profile multiplier.
    pub target_scale_x: f32,
    pub target_scale_y: f32,
    pub target_scale_z: f32,
    /// Passive decay time once suppressed (s). Negative disables passive decay.
    pub extinguish_duration: f32,
    /// Intensity at which the fire goes out, in `[0, 1)`.
    pub min_intensity: f32,
    /// Default fire size: 0 = Big, 1 = Medium, 2 = Small.
    pub fire_size: u8,
}

impl From<&FlammableConfig> for FlammableParams {
    fn from(config: &FlammableConfig) -> Self {
        Self {
            ignition_delay: config.ignition_delay,
            fire_offset_x: config.fire_offset.x,
            fire_offset_y: config.fire_offset.y,
            fire_offset_z: config.fire_offset.z,
            fire_growth_duration: config.fire_growth_duration,
            target_scale_x: config.target_fire_scale.x,
            target_scale_y: config.target_fire_scale.y,
            target_scale_z: config.target_fire_scale.z,
            extinguish_duration: config.extinguish_duration.unwrap_or(-1.0),
            min_intensity: config.min_intensity,
            fire_size: config.fire_size.as_u8(),
        }
    }
}

impl TryFrom<&FlammableParams> for FlammableConfig {
    type Error = DefaultFireSpreadError;

    fn try_from(params: &FlammableParams) -> Result<Self, Self::Error> {
        Ok(Self {
            ignition_delay: params.ignition_delay,
            fire_offset: Vec3::new(params.fire_offset_x, params.fire_offset_y, params.fire_offset_z),
            fire_growth_duration: params.fire_growth_duration,
            target_fire_scale: Vec3::new(
                params.target_scale_x,
                params.target_scale_y,
                params.target_scale_z,
            ),
            extinguish_duration: (params.extinguish_duration >= 0.0).then_some(params.extinguish_duration),
            min_intensity: params.min_intensity,
            fire_size: fire_size_from_u8(params.fire_size)?,
        })
    }
}

/// Result of a suppression call.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuppressionResult {
    /// 0 = ignored (nothing burning), 1 = reduced, 2 = extinguished.
    pub outcome: u8,
    /// Intensity after the call; 0 when extinguished or ignored.
    pub intensity: f32,
}

impl From<SuppressionOutcome> for SuppressionResult {
    fn from(outcome: SuppressionOutcome) -> Self {
        match outcome {
            SuppressionOutcome::Ignored => Self {
                outcome: 0,
                intensity: 0.0,
            },
            SuppressionOutcome::Reduced { intensity } => Self {
                outcome: 1,
                intensity,
            },
            SuppressionOutcome::Extinguished => Self {
                outcome: 2,
                intensity: 0.0,
            },
        }
    }
}

/// Default flammable parameters, for callers that only want to tweak a few.
#[no_mangle]
pub extern "C" fn fire_spread_flammable_params_default() -> FlammableParams {
    FlammableParams::from(&FlammableConfig::default())
}

/// Register a combustible object.
///
/// - `params`: fire parameters, or null for the simulation's default parameters.
/// - `out_handle`: receives the new entity handle.
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success
/// - `FireSpreadErrorCode::NullPointer` if `ptr` or `out_handle` is null
/// - `FireSpreadErrorCode::InvalidParameter` for an unknown fire size
/// - `FireSpreadErrorCode::InvalidConfiguration` if a parameter is out of range
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `params` must be null or point to a valid `FlammableParams`.
/// - `out_handle` must be a valid pointer to a `u32`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_add_flammable(
    ptr: *const FireSpreadInstance,
    x: f32,
    y: f32,
    z: f32,
    params: *const FlammableParams,
    out_handle: *mut u32,
) -> FireSpreadErrorCode {
    if out_handle.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_handle"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        // SAFETY: caller guarantees `params` is null or valid
        let config = match unsafe { params.as_ref() } {
            Some(params) => Some(FlammableConfig::try_from(params)?),
            None => None,
        };
        let position = Vec3::new(x, y, z);

        let handle = with_fire_sim_mut(instance, |sim| match config {
            Some(config) => sim.add_flammable(position, config),
            None => Ok(sim.add_default_flammable(position)),
        })??;

        unsafe {
            *out_handle = handle.raw();
        }
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Register an object that cannot burn.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_handle` must be a valid pointer to a `u32`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_add_inert(
    ptr: *const FireSpreadInstance,
    x: f32,
    y: f32,
    z: f32,
    out_handle: *mut u32,
) -> FireSpreadErrorCode {
    if out_handle.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_handle"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let handle = with_fire_sim_mut(instance, |sim| sim.add_inert(Vec3::new(x, y, z)))?;
        unsafe {
            *out_handle = handle.raw();
        }
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Remove an object, cancelling its timers and destroying its fire.
///
/// Returns `FireSpreadErrorCode::UnknownEntity` if nothing is registered under `handle`.
#[no_mangle]
pub extern "C" fn fire_spread_remove_entity(
    ptr: *const FireSpreadInstance,
    handle: u32,
) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_fire_sim_mut(instance, |sim| sim.remove_entity(EntityHandle::new(handle)))??;
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Put an entity out immediately.
///
/// `out_stopped` (optional) receives `false` if it was already extinguished.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_stopped` must be null or a valid pointer to a `bool`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_stop_entity(
    ptr: *const FireSpreadInstance,
    handle: u32,
    out_stopped: *mut bool,
) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let stopped = with_fire_sim_mut(instance, |sim| sim.stop_entity(EntityHandle::new(handle)))??;
        unsafe { write_optional(out_stopped, stopped) };
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Ignite an entity with its own fire size.
///
/// `out_ignited` (optional) receives `false` when the entity was not idle.
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success, including the not-idle case
/// - `FireSpreadErrorCode::UnknownEntity` / `NotFlammable` for bad handles
/// - `FireSpreadErrorCode::MissingConfiguration` if no profile is bound for the size
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_ignited` must be null or a valid pointer to a `bool`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_ignite(
    ptr: *const FireSpreadInstance,
    handle: u32,
    out_ignited: *mut bool,
) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let ignited = with_fire_sim_mut(instance, |sim| sim.ignite(EntityHandle::new(handle)))??;
        unsafe { write_optional(out_ignited, ignited) };
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Ignite an entity using the profile for `fire_size` (0 = Big, 1 = Medium, 2 = Small).
///
/// # Safety
///
/// As `fire_spread_ignite`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_ignite_with_size(
    ptr: *const FireSpreadInstance,
    handle: u32,
    fire_size: u8,
    out_ignited: *mut bool,
) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let size = fire_size_from_u8(fire_size)?;
        let ignited =
            with_fire_sim_mut(instance, |sim| sim.ignite_with(EntityHandle::new(handle), size))??;
        unsafe { write_optional(out_ignited, ignited) };
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Reduce the intensity of an entity's fire by `amount`.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_result` must be null or a valid pointer to a `SuppressionResult`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_apply_suppression(
    ptr: *const FireSpreadInstance,
    handle: u32,
    amount: f32,
    out_result: *mut SuppressionResult,
) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let outcome = with_fire_sim_mut(instance, |sim| {
            sim.apply_suppression(EntityHandle::new(handle), amount)
        })??;
        unsafe { write_optional(out_result, outcome.into()) };
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Suppression addressed by effect id, for hosts that detect contacts
/// against the effect's volume themselves. Unknown ids are ignored.
///
/// # Safety
///
/// As `fire_spread_apply_suppression`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_contact(
    ptr: *const FireSpreadInstance,
    effect_id: u32,
    amount: f32,
    out_result: *mut SuppressionResult,
) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let outcome =
            with_fire_sim_mut(instance, |sim| sim.contact(EffectId::new(effect_id), amount))??;
        unsafe { write_optional(out_result, outcome.into()) };
        Ok::<(), DefaultFireSpreadError>(())
    })
}

/// Fire a one-shot ignition source at a position.
///
/// Every flammable within `start_radius` is ignited with the `fire_size`
/// profile. `out_count` (optional) receives the number of entities ignited.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fire_spread_new` or null.
/// - `out_count` must be null or a valid pointer to a `u32`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_activate_ignition_source(
    ptr: *const FireSpreadInstance,
    x: f32,
    y: f32,
    z: f32,
    start_radius: f32,
    fire_size: u8,
    out_count: *mut u32,
) -> FireSpreadErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        if !start_radius.is_finite() || start_radius < 0.0 {
            return Err(DefaultFireSpreadError::invalid_parameter(format!(
                "start_radius must be finite and non-negative, got {start_radius}"
            )));
        }
        let mut source = IgnitionSource::new(
            Vec3::new(x, y, z),
            IgnitionSourceConfig {
                start_radius,
                fire_size: fire_size_from_u8(fire_size)?,
            },
        );

        let ignited = with_fire_sim_mut(instance, |sim| source.activate(sim))??;
        unsafe { write_optional(out_count, ignited.len() as u32) };
        Ok(())
    })
}
