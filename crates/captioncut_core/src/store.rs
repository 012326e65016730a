use crate::editing;
use crate::error::{CoreError, Result};
use crate::types::*;
use std::collections::HashSet;

/// Caller-owned editor state that commands read from and write to.
///
/// Setters either apply the whole new value or reject it; a rejected value
/// leaves the previous one in place.
pub trait EditorPort {
    fn clips(&self) -> &[Clip];
    fn set_clips(&mut self, clips: Vec<Clip>) -> Result<()>;
    fn speakers(&self) -> &[String];
    fn set_speakers(&mut self, speakers: Vec<String>) -> Result<()>;
    fn clipboard(&self) -> &[Clip];
    fn set_clipboard(&mut self, clips: Vec<Clip>) -> Result<()>;
}

/// What changed in a [`ClipStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ClipsChanged,
    SpeakersChanged,
    ClipboardChanged,
}

type Listener = Box<dyn FnMut(StoreEvent, u64) + Send>;

/// In-memory clip/speaker/clipboard state.
#[derive(Default)]
pub struct ClipStore {
    clips: Vec<Clip>,
    speakers: Vec<String>,
    clipboard: Vec<Clip>,
    revision: u64,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for ClipStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipStore")
            .field("clips", &self.clips.len())
            .field("speakers", &self.speakers)
            .field("clipboard", &self.clipboard.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl ClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing state, validating both sequences.
    pub fn with_state(clips: Vec<Clip>, speakers: Vec<String>) -> Result<Self> {
        let mut store = Self::new();
        store.set_speakers(speakers)?;
        store.set_clips(clips)?;
        store.revision = 0;
        Ok(store)
    }

    /// Incremented on every accepted change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback run after every accepted change.
    pub fn subscribe(&mut self, listener: impl FnMut(StoreEvent, u64) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        editing::find_clip(&self.clips, clip_id)
    }

    /// Apply a reorder request: compute the new order, renumber, notify.
    pub fn reorder(&mut self, source: &str, target: &str, selected: &[String]) -> Result<()> {
        let reordered = editing::reorder_clips(&self.clips, source, target, selected);
        self.set_clips(reordered)
    }

    fn notify(&mut self, event: StoreEvent) {
        self.revision += 1;
        tracing::debug!(?event, revision = self.revision, "store changed");
        let revision = self.revision;
        for listener in &mut self.listeners {
            listener(event, revision);
        }
    }
}

impl EditorPort for ClipStore {
    fn clips(&self) -> &[Clip] {
        &self.clips
    }

    fn set_clips(&mut self, clips: Vec<Clip>) -> Result<()> {
        if let Some(dup) = editing::first_duplicate_id(&clips) {
            return Err(CoreError::DuplicateClipId(dup.to_string()));
        }
        self.clips = clips;
        self.notify(StoreEvent::ClipsChanged);
        Ok(())
    }

    fn speakers(&self) -> &[String] {
        &self.speakers
    }

    fn set_speakers(&mut self, speakers: Vec<String>) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = speakers.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(CoreError::DuplicateSpeaker(dup.clone()));
        }
        self.speakers = speakers;
        self.notify(StoreEvent::SpeakersChanged);
        Ok(())
    }

    fn clipboard(&self) -> &[Clip] {
        &self.clipboard
    }

    fn set_clipboard(&mut self, clips: Vec<Clip>) -> Result<()> {
        self.clipboard = clips;
        self.notify(StoreEvent::ClipboardChanged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn clip(id: &str) -> Clip {
        Clip::from_words(id, "", vec![])
    }

    #[test]
    fn set_clips_rejects_duplicate_ids() {
        let mut store = ClipStore::new();
        store.set_clips(vec![clip("a")]).unwrap();

        let err = store.set_clips(vec![clip("b"), clip("b")]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateClipId(id) if id == "b"));
        assert_eq!(store.clips().len(), 1);
        assert_eq!(store.clips()[0].id, "a");
    }

    #[test]
    fn set_speakers_rejects_duplicates() {
        let mut store = ClipStore::new();
        let err = store
            .set_speakers(vec!["Alice".into(), "Alice".into()])
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateSpeaker(_)));
        assert!(store.speakers().is_empty());
    }

    #[test]
    fn with_state_validates_and_starts_at_revision_zero() {
        let store = ClipStore::with_state(vec![clip("a")], vec!["Bob".into()]).unwrap();
        assert_eq!(store.revision(), 0);
        assert!(ClipStore::with_state(vec![clip("a"), clip("a")], vec![]).is_err());
    }

    #[test]
    fn subscribers_see_each_accepted_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut store = ClipStore::new();
        store.subscribe(move |event, rev| sink.lock().unwrap().push((event, rev)));

        store.set_clips(vec![clip("a")]).unwrap();
        store.set_clipboard(vec![]).unwrap();
        let _ = store.set_clips(vec![clip("x"), clip("x")]);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (StoreEvent::ClipsChanged, 1),
                (StoreEvent::ClipboardChanged, 2)
            ]
        );
    }

    #[test]
    fn reorder_moves_and_renumbers() {
        let mut clips = vec![clip("a"), clip("b"), clip("c")];
        editing::renumber(&mut clips);
        let mut store = ClipStore::with_state(clips, vec![]).unwrap();

        store.reorder("c", "a", &["c".to_string()]).unwrap();
        let ids: Vec<_> = store.clips().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(store.clips()[0].timeline, "1");
        assert_eq!(store.clips()[2].timeline, "3");
    }
}
