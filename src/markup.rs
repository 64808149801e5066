//! Widget markup.
//!
//! A countdown widget is declared by a container holding five elements,
//! each identified by a class:
//!
//! | Class | Element |
//! |---|---|
//! | `chrono_canvas` | drawing surface, with a pixel size |
//! | `chrono_play` | play/pause control |
//! | `chrono_reset` | reset control |
//! | `chrono_min` | minutes field |
//! | `chrono_sec` | seconds field |

use crate::error::{ChronoError, Result};
use std::fmt;

/// Class of the drawing surface.
pub const CANVAS_CLASS: &str = "chrono_canvas";
/// Class of the play/pause control.
pub const PLAY_CLASS: &str = "chrono_play";
/// Class of the reset control.
pub const RESET_CLASS: &str = "chrono_reset";
/// Class of the minutes field.
pub const MINUTES_CLASS: &str = "chrono_min";
/// Class of the seconds field.
pub const SECONDS_CLASS: &str = "chrono_sec";

/// Identifier of a widget container, unique within a deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wraps a container identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One element inside a widget container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Class used to find the element.
    pub class: String,
    /// Text value (field contents or control label).
    pub value: String,
    /// Pixel width, for drawing surfaces.
    pub width: u32,
    /// Pixel height, for drawing surfaces.
    pub height: u32,
}

impl Element {
    /// An element carrying a text value.
    pub fn with_value(class: &str, value: impl Into<String>) -> Self {
        Self {
            class: class.to_string(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// A drawing surface of the given pixel size.
    pub fn canvas(width: u32, height: u32) -> Self {
        Self {
            class: CANVAS_CLASS.to_string(),
            width,
            height,
            ..Self::default()
        }
    }
}

/// A widget container and its elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMarkup {
    /// Container identifier.
    pub id: WidgetId,
    /// Elements in document order.
    pub elements: Vec<Element>,
}

/// Controls found in a widget's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Initial minutes text.
    pub minutes: String,
    /// Initial seconds text.
    pub seconds: String,
}

impl WidgetMarkup {
    /// A container with its elements.
    pub fn new(id: impl Into<WidgetId>, elements: Vec<Element>) -> Self {
        Self {
            id: id.into(),
            elements,
        }
    }

    /// The usual five-element layout.
    pub fn standard(
        id: &str,
        width: u32,
        height: u32,
        minutes: impl Into<String>,
        seconds: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            vec![
                Element::canvas(width, height),
                Element::with_value(PLAY_CLASS, ""),
                Element::with_value(RESET_CLASS, ""),
                Element::with_value(MINUTES_CLASS, minutes),
                Element::with_value(SECONDS_CLASS, seconds),
            ],
        )
    }

    /// First element with the class, like a selector query.
    pub fn query(&self, class: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.class == class)
    }

    fn require(&self, class: &'static str) -> Result<&Element> {
        self.query(class).ok_or_else(|| ChronoError::MissingElement {
            widget: self.id.to_string(),
            class,
        })
    }

    /// Looks up every required control.
    pub fn resolve(&self) -> Result<Controls> {
        let canvas = self.require(CANVAS_CLASS)?;
        self.require(PLAY_CLASS)?;
        self.require(RESET_CLASS)?;
        let minutes = self.require(MINUTES_CLASS)?;
        let seconds = self.require(SECONDS_CLASS)?;

        if canvas.width == 0 || canvas.height == 0 {
            return Err(ChronoError::InvalidCanvas {
                widget: self.id.to_string(),
                width: canvas.width,
                height: canvas.height,
            });
        }

        Ok(Controls {
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            minutes: minutes.value.clone(),
            seconds: seconds.value.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_markup_resolves() {
        let markup = WidgetMarkup::standard("intro", 400, 300, "2", "30");
        let controls = markup.resolve().unwrap();
        assert_eq!(
            controls,
            Controls {
                canvas_width: 400,
                canvas_height: 300,
                minutes: "2".to_string(),
                seconds: "30".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_control_names_its_class() {
        let mut markup = WidgetMarkup::standard("intro", 400, 300, "2", "30");
        markup.elements.retain(|e| e.class != RESET_CLASS);
        match markup.resolve() {
            Err(ChronoError::MissingElement { widget, class }) => {
                assert_eq!(widget, "intro");
                assert_eq!(class, RESET_CLASS);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_canvas_is_rejected() {
        let markup = WidgetMarkup::standard("tiny", 0, 300, "1", "0");
        assert!(matches!(
            markup.resolve(),
            Err(ChronoError::InvalidCanvas { width: 0, height: 300, .. })
        ));
    }

    #[test]
    fn test_query_returns_first_match() {
        let markup = WidgetMarkup::new(
            "dup",
            vec![
                Element::with_value(MINUTES_CLASS, "1"),
                Element::with_value(MINUTES_CLASS, "2"),
            ],
        );
        assert_eq!(markup.query(MINUTES_CLASS).unwrap().value, "1");
        assert!(markup.query(SECONDS_CLASS).is_none());
    }

    #[test]
    fn test_widget_id_display() {
        let id = WidgetId::from("slide-3");
        assert_eq!(id.to_string(), "slide-3");
        assert_eq!(id.as_str(), "slide-3");
    }
}
