//! Undo/Redo history management
//!
//! A linear history of committed objects. Entries up to the cursor are in the
//! scene; later entries hold their detached object until redone or discarded.

use forma_scene::{ObjectId, Scene, SceneObject, SceneResult};

/// One committed object
#[derive(Debug)]
pub struct HistoryEntry {
    /// Object inserted by the commit
    pub object_id: ObjectId,
    /// Position of the entry when it was committed
    pub index: usize,
    /// Description of the action
    pub description: String,
    /// The object while it is undone
    detached: Option<SceneObject>,
}

impl HistoryEntry {
    /// Check if the entry's object is currently held by the history
    pub fn is_detached(&self) -> bool {
        self.detached.is_some()
    }
}

/// Undo/redo history manager
#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    /// Number of entries currently applied to the scene
    applied: usize,
    /// Maximum number of history entries (0 = unbounded)
    max_entries: usize,
}

impl HistoryStack {
    /// Create a new history with the specified maximum entries
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            applied: 0,
            max_entries,
        }
    }

    /// Insert an object into the scene and record the insertion.
    ///
    /// Entries beyond the cursor are discarded first.
    pub fn commit(&mut self, scene: &mut Scene, object: SceneObject) -> SceneResult<ObjectId> {
        let description = format!("Add {}", object.name);
        let id = scene.insert(object)?;

        let discarded = self.entries.len() - self.applied;
        if discarded > 0 {
            self.entries.truncate(self.applied);
            tracing::debug!("Discarded {} redo entries", discarded);
        }

        self.entries.push(HistoryEntry {
            object_id: id,
            index: self.entries.len(),
            description,
            detached: None,
        });
        self.applied = self.entries.len();

        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let dropped = self.entries.remove(0);
            self.applied -= 1;
            for (index, entry) in self.entries.iter_mut().enumerate() {
                entry.index = index;
            }
            tracing::debug!("History full, dropped entry for {}", dropped.object_id);
        }

        tracing::info!("Committed {} (history {}/{})", id, self.applied, self.entries.len());
        Ok(id)
    }

    /// Remove the object at the cursor from the scene and step back.
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if self.applied == 0 {
            return false;
        }

        self.applied -= 1;
        let entry = &mut self.entries[self.applied];
        match scene.remove(entry.object_id) {
            Some(object) => entry.detached = Some(object),
            None => tracing::warn!(
                "Undo: object {} is no longer in the scene",
                entry.object_id
            ),
        }
        tracing::info!("Undo: {}", entry.description);
        true
    }

    /// Re-insert the next undone object and step forward.
    ///
    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        if self.applied >= self.entries.len() {
            return false;
        }

        let entry = &mut self.entries[self.applied];
        self.applied += 1;
        match entry.detached.take() {
            Some(object) => {
                if let Err(e) = scene.insert(object) {
                    tracing::warn!("Redo: {}", e);
                }
            }
            None => tracing::warn!("Redo: object {} was not detached", entry.object_id),
        }
        tracing::info!("Redo: {}", entry.description);
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Number of entries, applied or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the last applied entry, None before the first
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Clear all history. Objects in the scene stay where they are.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }
}
