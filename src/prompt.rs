//! Single-line input capture used for side notes and the title.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::markup::char_to_byte_idx;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    Submitted(String),
    Cancelled,
}

impl PromptOutcome {
    /// The entered text, or `None` if the prompt was cancelled or left empty.
    pub fn into_text(self) -> Option<String> {
        match self {
            PromptOutcome::Submitted(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Prompt {
    label: String,
    buffer: String,
    cursor: usize,
}

impl Prompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_text(label, "")
    }

    pub fn with_text(label: impl Into<String>, text: &str) -> Self {
        Self {
            label: label.into(),
            buffer: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feeds one key to the prompt. Returns the outcome once the user
    /// submits or cancels.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PromptOutcome> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => Some(PromptOutcome::Submitted(self.buffer.clone())),
            (KeyCode::Esc, _) => Some(PromptOutcome::Cancelled),
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                Some(PromptOutcome::Cancelled)
            }
            (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.buffer.clear();
                self.cursor = 0;
                None
            }
            (KeyCode::Char(ch), m)
                if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
            {
                let idx = char_to_byte_idx(&self.buffer, self.cursor);
                self.buffer.insert(idx, ch);
                self.cursor += 1;
                None
            }
            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_char_at(self.cursor);
                }
                None
            }
            (KeyCode::Delete, _) => {
                self.remove_char_at(self.cursor);
                None
            }
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
                None
            }
            (KeyCode::Home, _) => {
                self.cursor = 0;
                None
            }
            (KeyCode::End, _) => {
                self.cursor = self.buffer.chars().count();
                None
            }
            _ => None,
        }
    }

    fn remove_char_at(&mut self, offset: usize) {
        if offset >= self.buffer.chars().count() {
            return;
        }
        let start = char_to_byte_idx(&self.buffer, offset);
        let end = char_to_byte_idx(&self.buffer, offset + 1);
        self.buffer.drain(start..end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(prompt: &mut Prompt, text: &str) {
        for ch in text.chars() {
            assert_eq!(prompt.handle_key(press(KeyCode::Char(ch))), None);
        }
    }

    #[test]
    fn enter_submits_typed_text() {
        let mut prompt = Prompt::new("Write a quick side note:");
        type_text(&mut prompt, "Remember milk");
        assert_eq!(
            prompt.handle_key(press(KeyCode::Enter)),
            Some(PromptOutcome::Submitted("Remember milk".to_string()))
        );
    }

    #[test]
    fn escape_cancels() {
        let mut prompt = Prompt::new("Write a quick side note:");
        type_text(&mut prompt, "draft");
        assert_eq!(
            prompt.handle_key(press(KeyCode::Esc)),
            Some(PromptOutcome::Cancelled)
        );
    }

    #[test]
    fn editing_keys_work_on_characters() {
        let mut prompt = Prompt::with_text("Title:", "héllo");
        prompt.handle_key(press(KeyCode::Left));
        prompt.handle_key(press(KeyCode::Backspace));
        assert_eq!(prompt.text(), "hélo");
        prompt.handle_key(press(KeyCode::Home));
        prompt.handle_key(press(KeyCode::Delete));
        assert_eq!(prompt.text(), "élo");
        assert_eq!(prompt.cursor(), 0);
        prompt.handle_key(press(KeyCode::End));
        type_text(&mut prompt, "!");
        assert_eq!(prompt.text(), "élo!");
    }

    #[test]
    fn empty_or_cancelled_outcomes_have_no_text() {
        assert_eq!(PromptOutcome::Cancelled.into_text(), None);
        assert_eq!(PromptOutcome::Submitted(String::new()).into_text(), None);
        assert_eq!(
            PromptOutcome::Submitted(" ".to_string()).into_text(),
            Some(" ".to_string())
        );
    }
}
