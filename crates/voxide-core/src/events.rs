//! Typed notification channel from the mesh manager to the shell.

use std::collections::VecDeque;

/// Notifications the mesh manager emits for the shell to consume.
///
/// Each logical change produces exactly one event, and events are observed
/// in emission order. [`MeshEvent::ImportCompleted`] is only emitted after
/// the whole import mutation has been applied, so any count event from the
/// same import is observed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshEvent {
    /// The number of solid voxels changed.
    VoxelCountChanged(usize),
    /// An imported document fully replaced the editing state.
    ImportCompleted,
}

/// FIFO queue of pending [`MeshEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<MeshEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: MeshEvent) {
        self.events.push_back(event);
    }

    /// Pop the oldest pending event.
    pub fn poll(&mut self) -> Option<MeshEvent> {
        self.events.pop_front()
    }

    /// Drain all pending events in emission order.
    pub fn drain(&mut self) -> impl Iterator<Item = MeshEvent> + '_ {
        self.events.drain(..)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
