//! Toggle groups and the current edit selection.
//!
//! Groups are authored and stored by the UI; the preview pipeline only reads
//! the options that shape the capture.

use std::collections::BTreeMap;

/// Identifier of a toggle group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

/// A user-defined set of shader-matching criteria plus preview options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleGroup {
    pub id: GroupId,
    pub name: String,
    /// Route the capture through the shader copy so the preview alpha can be
    /// controlled, where the device supports it.
    pub clear_preview_alpha: bool,
    /// Run the flip effect over the captured image.
    pub flip_buffer: bool,
    /// Run the SDR tone-map effect over the captured image.
    pub tone_map: bool,
}

impl ToggleGroup {
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            clear_preview_alpha: false,
            flip_buffer: false,
            tone_map: false,
        }
    }
}

/// All known groups plus the one currently selected for shader editing.
#[derive(Debug, Clone, Default)]
pub struct ToggleGroups {
    groups: BTreeMap<GroupId, ToggleGroup>,
    editing: Option<GroupId>,
}

impl ToggleGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: ToggleGroup) {
        self.groups.insert(group.id, group);
    }

    pub fn remove(&mut self, id: GroupId) -> Option<ToggleGroup> {
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.groups.remove(&id)
    }

    pub fn get(&self, id: GroupId) -> Option<&ToggleGroup> {
        self.groups.get(&id)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut ToggleGroup> {
        self.groups.get_mut(&id)
    }

    /// Select a group for editing. Unknown ids clear the selection.
    pub fn set_editing(&mut self, id: Option<GroupId>) {
        self.editing = id.filter(|id| self.groups.contains_key(id));
    }

    pub fn editing_id(&self) -> Option<GroupId> {
        self.editing
    }

    /// The group currently being edited, if any.
    pub fn editing(&self) -> Option<&ToggleGroup> {
        self.editing.and_then(|id| self.groups.get(&id))
    }
}
