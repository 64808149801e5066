//! Key bindings.
//!
//! A [`Binding`] groups the key presses that trigger one action together with
//! the text shown for it in help views. Components expose their bindings
//! through the [`KeyMap`] trait.
//!
//! ```rust
//! use chrono_ring::key::Binding;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let reset = Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset");
//! let msg = KeyMsg { key: KeyCode::Char('r'), modifiers: KeyModifiers::NONE };
//! assert!(reset.matches(&msg));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A key code with the modifiers that must accompany it.
pub type KeyPress = (KeyCode, KeyModifiers);

/// Help text of a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short key label, such as `"space"`.
    pub key: String,
    /// What the key does.
    pub desc: String,
}

/// Key presses bound to one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    enabled: bool,
}

impl Binding {
    /// Binds plain key codes without modifiers.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self::with_presses(keys.into_iter().map(|k| (k, KeyModifiers::NONE)).collect())
    }

    /// Binds key codes together with their modifiers.
    pub fn with_presses(keys: Vec<KeyPress>) -> Self {
        Self {
            keys,
            help: Help::default(),
            enabled: true,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Help text of this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Bound key presses.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the binding currently reacts to keys.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the key message triggers this binding.
    ///
    /// Shift is ignored so that shifted characters and back-tab match however
    /// the terminal reports them.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if !self.enabled {
            return false;
        }
        let pressed = msg.modifiers - KeyModifiers::SHIFT;
        self.keys
            .iter()
            .any(|(code, mods)| *code == msg.key && *mods - KeyModifiers::SHIFT == pressed)
    }
}

/// Components that describe their key bindings for help views.
pub trait KeyMap {
    /// Bindings shown in the one-line help.
    fn short_help(&self) -> Vec<&Binding>;

    /// All bindings, grouped into columns.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Renders bindings as `key desc • key desc`, skipping disabled ones.
pub fn short_help_line(bindings: &[&Binding]) -> String {
    bindings
        .iter()
        .filter(|b| b.enabled())
        .map(|b| format!("{} {}", b.help().key, b.help().desc))
        .collect::<Vec<_>>()
        .join(" • ")
}
