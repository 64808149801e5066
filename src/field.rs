//! Numeric input field for the minutes and seconds of a countdown.
//!
//! A field keeps the raw text the user typed; interpreting it is left to
//! [`crate::countdown::normalize_duration`]. Like a form field, it reports a
//! change only when an edit is committed (with enter, or when focus leaves a
//! modified field), not on every keystroke.

use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;

/// Outcome of feeding a key to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// The key edited the text but nothing was committed yet.
    Edited,
    /// A modified value was committed.
    Changed,
}

/// A single-line numeric field.
#[derive(Debug, Clone)]
pub struct DurationField {
    label: String,
    value: String,
    focused: bool,
    dirty: bool,
    /// Style of the value while the field has focus.
    pub focused_style: Style,
    /// Style of the value while the field is blurred.
    pub blurred_style: Style,
}

impl DurationField {
    /// Creates a blurred field with a label and initial text.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            focused: false,
            dirty: false,
            focused_style: Style::new()
                .foreground(lipgloss::Color::from("#3E8A98"))
                .bold(true),
            blurred_style: Style::new(),
        }
    }

    /// Label shown before the value.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current raw text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the text without reporting a change.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.dirty = false;
    }

    /// Whether the text was edited since the last commit.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Commits pending edits, reporting [`FieldEvent::Changed`] if there were any.
    pub fn commit(&mut self) -> Option<FieldEvent> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(FieldEvent::Changed)
    }

    /// Handles a key press while focused.
    ///
    /// Returns `None` for keys the field does not use, so the caller can treat
    /// them as shortcuts.
    pub fn update(&mut self, msg: &KeyMsg) -> Option<FieldEvent> {
        if !self.focused
            || msg.modifiers.contains(KeyModifiers::CONTROL)
            || msg.modifiers.contains(KeyModifiers::ALT)
        {
            return None;
        }

        match msg.key {
            KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '.' || ch == '-' => {
                self.value.push(ch);
                self.dirty = true;
                Some(FieldEvent::Edited)
            }
            KeyCode::Backspace => {
                if self.value.pop().is_some() {
                    self.dirty = true;
                }
                Some(FieldEvent::Edited)
            }
            KeyCode::Enter => Some(self.commit().unwrap_or(FieldEvent::Edited)),
            _ => None,
        }
    }

    /// Renders `label [value]`, highlighted while focused.
    pub fn view(&self) -> String {
        let value = format!("[{:>2}]", self.value);
        let style = if self.focused {
            &self.focused_style
        } else {
            &self.blurred_style
        };
        format!("{} {}", self.label, style.render(&value))
    }
}

impl Component for DurationField {
    fn focus(&mut self) -> Option<Cmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn focused(value: &str) -> DurationField {
        let mut field = DurationField::new("min", value);
        let _ = field.focus();
        field
    }

    #[test]
    fn test_blurred_field_ignores_keys() {
        let mut field = DurationField::new("sec", "5");
        assert_eq!(field.update(&key(KeyCode::Char('1'))), None);
        assert_eq!(field.value(), "5");
    }

    #[test]
    fn test_typing_then_enter_commits() {
        let mut field = focused("");
        assert_eq!(field.update(&key(KeyCode::Char('9'))), Some(FieldEvent::Edited));
        assert_eq!(field.update(&key(KeyCode::Char('9'))), Some(FieldEvent::Edited));
        assert_eq!(field.value(), "99");
        assert!(field.dirty());
        assert_eq!(field.update(&key(KeyCode::Enter)), Some(FieldEvent::Changed));
        assert!(!field.dirty());
        // Nothing pending: enter is consumed but reports no change.
        assert_eq!(field.update(&key(KeyCode::Enter)), Some(FieldEvent::Edited));
    }

    #[test]
    fn test_backspace_and_non_numeric_keys() {
        let mut field = focused("12");
        field.update(&key(KeyCode::Backspace));
        assert_eq!(field.value(), "1");
        assert_eq!(field.update(&key(KeyCode::Char('r'))), None);
        assert_eq!(field.update(&key(KeyCode::Char(' '))), None);
        assert_eq!(field.value(), "1");
    }

    #[test]
    fn test_backspace_on_empty_is_not_an_edit() {
        let mut field = focused("");
        field.update(&key(KeyCode::Backspace));
        assert!(!field.dirty());
        assert_eq!(field.commit(), None);
    }

    #[test]
    fn test_control_keys_pass_through() {
        let mut field = focused("1");
        let ctrl = KeyMsg {
            key: KeyCode::Char('2'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert_eq!(field.update(&ctrl), None);
        assert_eq!(field.value(), "1");
    }

    #[test]
    fn test_set_value_clears_pending_edit() {
        let mut field = focused("1");
        field.update(&key(KeyCode::Char('5')));
        field.set_value("15");
        assert!(!field.dirty());
        assert_eq!(field.commit(), None);
    }

    #[test]
    fn test_view_shows_label_and_value() {
        let field = DurationField::new("sec", "7");
        let view = strip_ansi_escapes::strip_str(&field.view());
        assert_eq!(view, "sec [ 7]");
    }

    #[test]
    fn test_focus_state() {
        let mut field = DurationField::new("min", "1");
        assert!(!field.focused());
        let _ = field.focus();
        assert!(field.focused());
        field.blur();
        assert!(!field.focused());
    }
}
