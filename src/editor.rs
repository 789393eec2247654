use log::{info, warn};

use crate::note::{DEFAULT_TITLE, Note};
use crate::prompt::PromptOutcome;
use crate::store::{NoteStore, StoreError};

mod mutate;
mod range;
mod region;
mod selection;

pub use mutate::{HEADLINE_PLACEHOLDER, HEADLINE_TAG};
pub use range::TextRange;
pub use region::{Region, Selection};
pub use selection::{SelectionHost, StyleClass, UnknownStyleClass};

pub use mutate::{add_side_note, insert_headline, wrap_selection};

/// The document being edited: title, editable region and side notes.
#[derive(Clone, Debug)]
pub struct NoteEditor {
    title: String,
    region: Region,
    side_notes: Vec<String>,
    note_id: Option<String>,
}

impl Default for NoteEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteEditor {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            region: Region::new(),
            side_notes: Vec::new(),
            note_id: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    pub fn side_notes(&self) -> &[String] {
        &self.side_notes
    }

    /// Id of the open document, once it has been loaded or saved.
    pub fn note_id(&self) -> Option<&str> {
        self.note_id.as_deref()
    }

    pub fn insert_headline(&mut self) {
        insert_headline(&mut self.region);
    }

    pub fn wrap_selection(&mut self, class: StyleClass) -> bool {
        wrap_selection(&mut self.region, class)
    }

    pub fn add_side_note(&mut self, input: PromptOutcome) -> bool {
        add_side_note(&mut self.side_notes, input)
    }

    pub fn serialize_document(&self) -> Note {
        let title = if self.title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            self.title.clone()
        };
        Note {
            id: self.note_id.clone(),
            title,
            content: self.region.to_markup(),
            side_notes: self.side_notes.clone(),
        }
    }

    /// Replaces the whole document, side notes included.
    pub fn open(&mut self, note: Note) {
        self.title = note.title;
        self.region.set_markup(&note.content);
        self.side_notes = note.side_notes;
        self.note_id = note.id;
    }

    /// Opens the first of `notes`. Returns `false` and keeps the current
    /// state when the list is empty.
    pub fn apply_loaded(&mut self, notes: Vec<Note>) -> bool {
        match notes.into_iter().next() {
            Some(note) => {
                self.open(note);
                true
            }
            None => false,
        }
    }

    pub fn apply_save_outcome(&mut self, outcome: &SaveOutcome) {
        if let SaveOutcome::Saved(id) = outcome {
            self.note_id = Some(id.clone());
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(String),
    Failed,
}

impl SaveOutcome {
    /// What the user is told about the save.
    pub fn notice(&self) -> String {
        match self {
            SaveOutcome::Saved(id) => format!("Saved: {id}"),
            SaveOutcome::Failed => "Save failed".to_string(),
        }
    }
}

pub fn save_note(store: &dyn NoteStore, note: &Note) -> SaveOutcome {
    match store.save(note) {
        Ok(id) => SaveOutcome::Saved(id),
        Err(err) => {
            warn!("save failed: {err}");
            SaveOutcome::Failed
        }
    }
}

/// Fetches the note to open: the one with `id` if given, else every note so
/// the caller can take the first.
pub fn load_notes(store: &dyn NoteStore, id: Option<&str>) -> Result<Vec<Note>, StoreError> {
    let notes = match id {
        Some(id) => store.get(id)?.into_iter().collect(),
        None => store.list()?,
    };
    info!("loaded {} note(s)", notes.len());
    Ok(notes)
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;


#[cfg(test)]
#[path = "editor/mutate_tests.rs"]
mod mutate_tests;
