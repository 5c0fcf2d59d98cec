//! Host-side table adapter.
//!
//! [`Table`] owns the latest snapshot and wraps the transition function and
//! wire codec for the two roles a host plays: the table owner ticks and
//! publishes frames, observers apply frames as they arrive. Either side can
//! take over the other role at any time since the snapshot is the whole
//! state.

use log::warn;

use crate::game::calculate_transition;
use crate::game::entities::{GameSnapshot, TableConfig, TableInputs};
use crate::wire;

#[derive(Clone, Debug, Default)]
pub struct Table {
    config: TableConfig,
    snapshot: GameSnapshot,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            snapshot: GameSnapshot::default(),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    /// Runs one owner tick. Returns whether a new snapshot was produced;
    /// when it was, the caller should publish [`Table::encode_frame`].
    pub fn tick(&mut self, inputs: &TableInputs) -> bool {
        match calculate_transition(&self.snapshot, &self.config, inputs) {
            Some(next) => {
                self.snapshot = next;
                true
            }
            None => false,
        }
    }

    /// The current snapshot as a wire frame.
    pub fn encode_frame(&self) -> String {
        wire::encode(&self.snapshot)
    }

    /// Replaces the snapshot with a received frame. Malformed frames are
    /// dropped and the current snapshot stays in place.
    pub fn apply_frame(&mut self, frame: &str) -> bool {
        match wire::decode(frame) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                true
            }
            Err(err) => {
                warn!("discarding frame: {err}");
                false
            }
        }
    }

    /// Drops all table state, as when the owner migrates to a fresh host.
    pub fn reset(&mut self) {
        self.snapshot = GameSnapshot::default();
    }
}
