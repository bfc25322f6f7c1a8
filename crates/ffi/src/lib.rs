//! C ABI for the fire spread core.
//!
//! Every function returns a [`FireSpreadErrorCode`] (0 = success) and writes
//! results through out-pointers. On failure the message is available from
//! [`fire_spread_get_last_error`] on the calling thread.

mod entities;
mod error;
mod events;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use entities::{
    fire_spread_activate_ignition_source, fire_spread_add_flammable, fire_spread_add_inert,
    fire_spread_apply_suppression, fire_spread_contact, fire_spread_flammable_params_default,
    fire_spread_ignite, fire_spread_ignite_with_size, fire_spread_remove_entity,
    fire_spread_stop_entity, FlammableParams, SuppressionResult,
};
pub use events::{
    fire_spread_drain_events, FireEventRecord, FIRE_EVENT_BURNING, FIRE_EVENT_EXTINGUISHED,
    FIRE_EVENT_IGNITION_ABORTED, FIRE_EVENT_IGNITION_STARTED, FIRE_EVENT_QUERY_FAILED,
    FIRE_EVENT_SPREAD_ATTEMPTED, FIRE_EVENT_SPREAD_EXHAUSTED, FIRE_EVENT_SUPPRESSION_STARTED,
};
pub use error::{fire_spread_get_last_error, fire_spread_get_last_error_code, FireSpreadErrorCode};
pub use instance::{fire_spread_destroy, fire_spread_new, FireSpreadInstance};
pub use queries::{
    fire_spread_clear_snapshot, fire_spread_get_burning_effects, fire_spread_get_entity_state,
    fire_spread_get_stats, EffectStats, FireSpreadStats,
};
pub use simulation::fire_spread_update;
