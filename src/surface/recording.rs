use super::{Arc, Rect, Stroke, Surface, Transform};
use crate::config::Font;

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// The surface was cleared.
    Clear,
    /// An arc was stroked.
    StrokeArc {
        /// Arc geometry in user space.
        arc: Arc,
        /// Stroke parameters.
        stroke: Stroke,
    },
    /// A rectangle was filled.
    FillRect {
        /// Rectangle in user space.
        rect: Rect,
        /// Fill color.
        color: String,
        /// Transform active at the time of the call.
        transform: Transform,
    },
    /// Text was drawn.
    FillText {
        /// The text.
        text: String,
        /// Anchor x.
        x: f64,
        /// Anchor y.
        y: f64,
        /// Font.
        font: Font,
        /// Fill color.
        color: String,
    },
    /// The transform was pushed.
    Save,
    /// The transform was popped.
    Restore,
    /// The origin moved.
    Translate(f64, f64),
    /// The coordinate space rotated.
    Rotate(f64),
}

/// Surface that records draw calls instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    calls: Vec<DrawCall>,
    transform: Transform,
    stack: Vec<Transform>,
}

impl RecordingSurface {
    /// Creates a recorder that reports the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            transform: Transform::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Calls of the current frame, oldest first.
    ///
    /// A clear starts a new frame and drops the calls of the previous one, so
    /// a recorder driven once per refresh stays bounded.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Forgets the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn stroke_arc(&mut self, arc: &Arc, stroke: &Stroke) {
        self.calls.push(DrawCall::StrokeArc {
            arc: *arc,
            stroke: stroke.clone(),
        });
    }

    fn fill_rect(&mut self, rect: &Rect, color: &str) {
        self.calls.push(DrawCall::FillRect {
            rect: *rect,
            color: color.to_string(),
            transform: self.transform,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: &str) {
        self.calls.push(DrawCall::FillText {
            text: text.to_string(),
            x,
            y,
            font: font.clone(),
            color: color.to_string(),
        });
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translate(dx, dy);
        self.calls.push(DrawCall::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotate(radians);
        self.calls.push(DrawCall::Rotate(radians));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.clear();
        surface.save();
        surface.translate(5.0, 5.0);
        surface.restore();
        assert_eq!(
            surface.calls(),
            &[
                DrawCall::Clear,
                DrawCall::Save,
                DrawCall::Translate(5.0, 5.0),
                DrawCall::Restore
            ]
        );
    }

    #[test]
    fn test_fill_rect_captures_transform() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.translate(2.0, 3.0);
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        };
        surface.fill_rect(&rect, "#FFFFFF");
        match surface.calls().last() {
            Some(DrawCall::FillRect { transform, .. }) => {
                assert_eq!(transform.apply(0.0, 0.0), (2.0, 3.0));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.clear();
        surface.save();
        surface.clear();
        surface.restore();
        assert_eq!(surface.calls(), &[DrawCall::Clear, DrawCall::Restore]);
        assert_eq!(surface.take_calls().len(), 2);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_repeated_frames_keep_log_bounded() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        for _ in 0..1000 {
            surface.clear();
            surface.save();
            surface.rotate(0.5);
            surface.restore();
        }
        assert_eq!(surface.calls().len(), 4);
    }
}
