//! Backend-independent drawing interface.
//!
//! Plots and axes emit all output through [`Canvas`]. Backends that can
//! serialise keyframe animations also implement [`AnimatedCanvas`]; backends
//! that run an event loop implement [`InteractiveCanvas`].
//!
//! Shapes follow the immediate-mode path model: `begin_path`, add segments or
//! shapes, then `stroke` and/or `fill` with the current colors.

mod transform;

pub use transform::Transform2D;

use crate::color::Rgba;
use crate::geometry::{BBox2, Vec2};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centred on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Top of the text at the anchor.
    Top,
    /// Middle of the text at the anchor.
    Middle,
    /// Bottom of the text at the anchor.
    Bottom,
    /// Baseline at the anchor.
    #[default]
    Baseline,
}

/// Text alignment relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Align {
    /// Horizontal component.
    pub h: HAlign,
    /// Vertical component.
    pub v: VAlign,
}

impl Align {
    /// Centred horizontally, top at the anchor.
    pub const CENTER_TOP: Self = Self::new(HAlign::Center, VAlign::Top);
    /// Centred horizontally, bottom at the anchor.
    pub const CENTER_BOTTOM: Self = Self::new(HAlign::Center, VAlign::Bottom);
    /// Centred on the anchor.
    pub const CENTER_MIDDLE: Self = Self::new(HAlign::Center, VAlign::Middle);
    /// Right end at the anchor, vertically centred.
    pub const RIGHT_MIDDLE: Self = Self::new(HAlign::Right, VAlign::Middle);
    /// Left end at the anchor, vertically centred.
    pub const LEFT_MIDDLE: Self = Self::new(HAlign::Left, VAlign::Middle);

    /// Combine horizontal and vertical alignment.
    #[must_use]
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }
}

/// Immediate-mode drawing surface.
pub trait Canvas {
    /// Start a new path, discarding the current one.
    fn begin_path(&mut self);
    /// Start a new sub-path at `p`.
    fn move_to(&mut self, p: Vec2);
    /// Add a straight segment to `p`.
    fn line_to(&mut self, p: Vec2);
    /// Close the current sub-path.
    fn close_path(&mut self);
    /// Stroke the current path.
    fn stroke(&mut self);
    /// Fill the current path.
    fn fill(&mut self);
    /// Add a circle to the current path.
    fn circle(&mut self, centre: Vec2, radius: f32);
    /// Add a rectangle to the current path.
    fn rect(&mut self, bounds: &BBox2);
    /// Add a rectangle with rounded corners to the current path.
    fn rounded_rect(&mut self, bounds: &BBox2, radius: f32);
    /// Draw text at `position` with the current font and fill color.
    fn text(&mut self, position: Vec2, text: &str, align: Align);

    /// Set the stroke color.
    fn stroke_color(&mut self, color: Rgba);
    /// Set the fill color.
    fn fill_color(&mut self, color: Rgba);
    /// Set the stroke width in pixels.
    fn stroke_width(&mut self, width: f32);
    /// Set the dash pattern in pixels, empty for a solid stroke.
    fn stroke_dash(&mut self, _pattern: &[f32]) {}
    /// Set the font size in pixels.
    fn font_size(&mut self, size: f32);
    /// Set the font face.
    fn font_face(&mut self, face: &str);

    /// Clip subsequent drawing to `bounds`.
    fn scissor(&mut self, bounds: &BBox2);
    /// Remove the clip.
    fn reset_scissor(&mut self);
    /// Translate the current transform.
    fn translate(&mut self, offset: Vec2);
    /// Rotate the current transform by `angle` radians.
    fn rotate(&mut self, angle: f32);
    /// Reset the current transform to identity.
    fn reset_transform(&mut self);

    /// True for backends with a live cursor.
    fn is_interactive(&self) -> bool {
        false
    }
    /// Cursor position in pixels.
    fn mouse_pos(&self) -> Vec2 {
        Vec2::zero()
    }
    /// True while the primary button is dragging.
    fn mouse_dragging(&self) -> bool {
        false
    }
    /// Cursor movement since the previous frame while dragging.
    fn mouse_drag_delta(&self) -> Vec2 {
        Vec2::zero()
    }
}

/// A canvas that serialises keyframe animations.
///
/// Keyframe times are absolute; the `end_*` call receives the span the
/// animation loops over. Every keyframe of one element must have the same
/// shape (same number of path points).
pub trait AnimatedCanvas: Canvas {
    /// Start an animated polyline stroked with the current stroke state.
    fn begin_animated_path(&mut self);
    /// Add one keyframe of the polyline.
    fn add_animated_path(&mut self, time: f32, points: &[Vec2]);
    /// Finish the polyline, looping over `[0, time_span]`.
    fn end_animated_path(&mut self, time_span: f32);
    /// Add one keyframe of an animated filled circle.
    fn add_animated_circle(&mut self, time: f32, centre: Vec2, radius: f32, fill: Rgba);
    /// Finish the circle.
    fn end_animated_circle(&mut self, time_span: f32);
    /// Add one keyframe of an animated filled rectangle.
    fn add_animated_rect(&mut self, time: f32, bounds: &BBox2, fill: Rgba);
    /// Finish the rectangle.
    fn end_animated_rect(&mut self, time_span: f32);
    /// Attach tooltip text to the next finished element.
    fn set_tooltip(&mut self, text: &str);
}

/// A canvas driving an event loop.
pub trait InteractiveCanvas: Canvas {
    /// Process pending input.
    fn poll_events(&mut self);
    /// True once the window asked to close.
    fn should_close(&self) -> bool;
    /// Current viewport size in pixels.
    fn viewport_size(&self) -> Vec2;
    /// Seconds since the loop started.
    fn time(&self) -> f32;
    /// Start drawing a frame of the given size.
    fn begin_frame(&mut self, size: Vec2);
    /// Present the frame.
    fn end_frame(&mut self);
}
