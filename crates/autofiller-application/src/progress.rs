// SPDX-License-Identifier: GPL-3.0-or-later
use std::sync::{Arc, Mutex, MutexGuard};

use autofiller_domain::TrackReference;

/// Per-track notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// The title had special characters, so only the title was searched.
    TitleOnlySearch { track: TrackReference },
    /// The catalog returned no usable match.
    NotFound { track: TrackReference },
    /// A catalog request failed outright.
    LookupFailed { track: TrackReference, error: String },
    /// Metadata was resolved but could not be written.
    WriteFailed { track: TrackReference, error: String },
    /// Tags were written and saved.
    Tagged { track: TrackReference },
}

/// Receives batch events as they happen.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, event: &BatchEvent);
}

/// Stores published events in memory.
#[derive(Clone, Default)]
pub struct InMemoryProgress {
    inner: Arc<Mutex<Vec<BatchEvent>>>,
}

impl InMemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<BatchEvent>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve and clear all captured events
    pub fn drain(&self) -> Vec<BatchEvent> {
        std::mem::take(&mut *self.events())
    }
}

impl ProgressSink for InMemoryProgress {
    fn publish(&self, event: &BatchEvent) {
        self.events().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autofiller_domain::AudioFormat;

    fn track() -> TrackReference {
        TrackReference::new("Björk", "Jóga", "music/Björk - Jóga.flac", AudioFormat::Flac)
    }

    #[test]
    fn test_publish_and_drain_events() {
        let progress = InMemoryProgress::new();
        assert!(progress.is_empty());

        progress.publish(&BatchEvent::TitleOnlySearch { track: track() });
        progress.publish(&BatchEvent::Tagged { track: track() });
        assert_eq!(progress.len(), 2);

        let drained = progress.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[1], BatchEvent::Tagged { .. }));
        assert_eq!(drained[0], BatchEvent::TitleOnlySearch { track: track() });
        assert!(progress.is_empty());
    }
}
