use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled";

/// A note as exchanged with the notes endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_id"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    /// Serialized markup of the editable region.
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub side_notes: Vec<String>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            side_notes: Vec::new(),
        }
    }

    pub fn with_side_notes(mut self, side_notes: Vec<String>) -> Self {
        self.side_notes = side_notes;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// What the endpoint answers to a save.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SavedNote {
    #[serde(deserialize_with = "id")]
    pub id: String,
}

/// Endpoints hand out ids as strings or as plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_payload_without_missing_id() {
        let note = Note::new("T", "<p>hi</p>")
            .with_side_notes(vec!["a".to_string(), "b".to_string()]);
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(
            json,
            r#"{"title":"T","content":"<p>hi</p>","side_notes":["a","b"]}"#
        );
    }

    #[test]
    fn serializes_known_id() {
        let note = Note::new("T", "").with_id("abc");
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, r#"{"id":"abc","title":"T","content":"","side_notes":[]}"#);
    }

    #[test]
    fn missing_or_null_side_notes_read_as_empty() {
        let missing: Note = serde_json::from_str(r#"{"title":"T","content":"x"}"#).unwrap();
        assert!(missing.side_notes.is_empty());
        let null: Note =
            serde_json::from_str(r#"{"id":"1","title":"T","content":"x","side_notes":null}"#)
                .unwrap();
        assert!(null.side_notes.is_empty());
        assert_eq!(null.id.as_deref(), Some("1"));
    }

    #[test]
    fn saved_note_ignores_extra_fields() {
        let saved: SavedNote =
            serde_json::from_str(r#"{"id":"42","title":"T","content":"","side_notes":[]}"#)
                .unwrap();
        assert_eq!(saved.id, "42");
    }

    #[test]
    fn numeric_ids_read_as_strings() {
        let saved: SavedNote = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(saved.id, "7");

        let notes: Vec<Note> = serde_json::from_str(
            r#"[{"id":12,"title":"T","content":""},{"id":null,"title":"U","content":""}]"#,
        )
        .unwrap();
        assert_eq!(notes[0].id.as_deref(), Some("12"));
        assert_eq!(notes[1].id, None);
    }
}
