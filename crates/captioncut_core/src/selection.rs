use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free set of selected clip ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single clip.
    pub fn select_only(&mut self, clip_id: &str) {
        self.ids.clear();
        self.ids.push(clip_id.to_string());
    }

    /// Click handling: with `multi` the clip is toggled, otherwise it becomes
    /// the only selected clip.
    pub fn toggle(&mut self, clip_id: &str, multi: bool) {
        if !multi {
            self.select_only(clip_id);
        } else if self.contains(clip_id) {
            self.remove(clip_id);
        } else {
            self.ids.push(clip_id.to_string());
        }
    }

    pub fn add_all<'a>(&mut self, clip_ids: impl IntoIterator<Item = &'a str>) {
        for id in clip_ids {
            if !self.contains(id) {
                self.ids.push(id.to_string());
            }
        }
    }

    pub fn remove(&mut self, clip_id: &str) {
        self.ids.retain(|id| id != clip_id);
    }

    /// Drop ids that no longer name a clip.
    pub fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        self.ids.retain(|id| exists(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, clip_id: &str) -> bool {
        self.ids.iter().any(|id| id == clip_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
