//! Observable lifecycle events
//!
//! The simulation records every state transition it performs. Hosts drain the
//! pending events once per frame (audio cues, UI, replication); a bounded
//! history is kept for late inspection. Pending events are bounded too: a host
//! that never drains loses the oldest ones, and the loss is counted.

use crate::config::FireSize;
use crate::core_types::entity::{EffectId, EntityHandle};
use crate::core_types::units::Seconds;
use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// A lifecycle transition or notable occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FireEventKind {
    /// `Idle -> Igniting`
    IgnitionStarted {
        /// Effect profile the fire will use
        size: FireSize,
        /// When it will start burning
        ignite_at: Seconds,
    },
    /// `Igniting -> Burning`
    Burning {
        /// Newly created effect
        effect: EffectId,
    },
    /// `Burning -> Extinguishing`
    SuppressionStarted,
    /// Entity reached its terminal state
    Extinguished {
        /// Effect that was destroyed, if one existed
        effect: Option<EffectId>,
    },
    /// A spread coordinator ran an attempt
    SpreadAttempted {
        /// Entities newly ignited by the attempt
        ignited: Vec<EntityHandle>,
        /// Generation after the attempt
        generation: u32,
    },
    /// A spread coordinator reached its generation cap
    SpreadExhausted {
        /// Final generation
        generation: u32,
    },
    /// An ignition could not proceed because its profile is not configured
    IgnitionAborted {
        /// Size whose profile was missing
        size: FireSize,
    },
    /// A spread attempt was skipped because the spatial query failed
    QueryFailed {
        /// Failure reported by the query service
        error: QueryError,
    },
}

/// Event with its subject and simulation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireEvent {
    /// Simulation time of the transition
    pub time: Seconds,
    /// Entity the event concerns
    pub entity: EntityHandle,
    /// What happened
    pub kind: FireEventKind,
}

/// Pending events plus a bounded history
#[derive(Debug)]
pub struct EventLog {
    /// Events not yet drained by the host, oldest first
    pending: VecDeque<FireEvent>,
    /// Maximum undrained events (oldest are dropped, at least 1)
    max_pending: usize,
    /// Undrained events dropped since creation
    dropped: u64,
    /// Most recent events, oldest first
    history: VecDeque<FireEvent>,
    /// Maximum history size (oldest events are removed)
    max_history: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(10_000, 10_000)
    }
}

impl EventLog {
    /// Create an event log with the specified history and pending limits
    pub fn new(max_history: usize, max_pending: usize) -> Self {
        let max_pending = max_pending.max(1);
        Self {
            pending: VecDeque::with_capacity(max_pending.min(32)),
            max_pending,
            dropped: 0,
            history: VecDeque::with_capacity(max_history.min(1024)),
            max_history,
        }
    }

    /// Record an event
    pub fn push(&mut self, time: Seconds, entity: EntityHandle, kind: FireEventKind) {
        let event = FireEvent { time, entity, kind };
        if self.max_history > 0 {
            if self.history.len() == self.max_history {
                self.history.pop_front();
            }
            self.history.push_back(event.clone());
        }
        if self.pending.len() == self.max_pending {
            self.pending.pop_front();
            if self.dropped == 0 {
                warn!(limit = self.max_pending, "Pending events are not being drained, dropping the oldest");
            }
            self.dropped += 1;
        }
        self.pending.push_back(event);
    }

    /// Events recorded since the last drain, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &FireEvent> {
        self.pending.iter()
    }

    /// Number of undrained events
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Undrained events dropped because the pending limit was reached
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Take all pending events
    pub fn drain(&mut self) -> Vec<FireEvent> {
        self.pending.drain(..).collect()
    }

    /// Retained history, oldest first
    pub fn history(&self) -> impl Iterator<Item = &FireEvent> {
        self.history.iter()
    }

    /// Get history length
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Clear all state (for simulation reset)
    pub fn clear(&mut self) {
        self.pending.clear();
        self.history.clear();
    }
}
