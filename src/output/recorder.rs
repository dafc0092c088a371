//! Recording canvas.
//!
//! [`RecordingCanvas`] is an immediate-mode backend that keeps every call as a
//! [`DrawCall`] and replays a script of [`InputEvent`]s to drive the
//! interactive loop without a window.

use crate::color::Rgba;
use crate::geometry::{BBox2, Vec2};
use crate::render::{Align, AnimatedCanvas, Canvas, InteractiveCanvas};
use std::collections::VecDeque;

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DrawCall {
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    ClosePath,
    Stroke,
    Fill,
    Circle { centre: Vec2, radius: f32 },
    Rect(BBox2),
    RoundedRect { bounds: BBox2, radius: f32 },
    Text {
        position: Vec2,
        text: String,
        align: Align,
    },
    StrokeColor(Rgba),
    FillColor(Rgba),
    StrokeWidth(f32),
    StrokeDash(Vec<f32>),
    FontSize(f32),
    FontFace(String),
    Scissor(BBox2),
    ResetScissor,
    Translate(Vec2),
    Rotate(f32),
    ResetTransform,
    BeginAnimatedPath,
    AnimatedPath { time: f32, points: Vec<Vec2> },
    EndAnimatedPath { time_span: f32 },
    AnimatedCircle {
        time: f32,
        centre: Vec2,
        radius: f32,
        fill: Rgba,
    },
    EndAnimatedCircle { time_span: f32 },
    AnimatedRect {
        time: f32,
        bounds: BBox2,
        fill: Rgba,
    },
    EndAnimatedRect { time_span: f32 },
    Tooltip(String),
    BeginFrame(Vec2),
    EndFrame,
}

/// Scripted input for [`RecordingCanvas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The viewport changed size.
    Resize(Vec2),
    /// The cursor moved to a position.
    MouseMove(Vec2),
    /// The cursor moved by a delta with the button held.
    Drag(Vec2),
    /// End of this frame's input; the clock advances by the given seconds.
    Advance(f32),
    /// The window asked to close.
    Close,
}

/// Canvas that records calls and replays scripted input.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
    events: VecDeque<InputEvent>,
    interactive: bool,
    viewport: Vec2,
    mouse: Vec2,
    dragging: bool,
    drag_delta: Vec2,
    time: f32,
    closed: bool,
    frames: usize,
}

impl RecordingCanvas {
    /// A non-interactive canvas of the given size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            calls: Vec::new(),
            events: VecDeque::new(),
            interactive: false,
            viewport: Vec2::xy(width, height),
            mouse: Vec2::zero(),
            dragging: false,
            drag_delta: Vec2::zero(),
            time: 0.0,
            closed: false,
            frames: 0,
        }
    }

    /// An interactive canvas replaying `events`. The loop closes once the
    /// script is exhausted.
    #[must_use]
    pub fn scripted(width: f32, height: f32, events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            interactive: true,
            ..Self::new(width, height)
        }
    }

    /// Place the cursor and mark the canvas interactive.
    #[must_use]
    pub fn with_mouse(mut self, position: Vec2) -> Self {
        self.interactive = true;
        self.mouse = position;
        self
    }

    /// Every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// Number of presented frames.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Text strings drawn so far, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }

    fn move_to(&mut self, p: Vec2) {
        self.calls.push(DrawCall::MoveTo(p));
    }

    fn line_to(&mut self, p: Vec2) {
        self.calls.push(DrawCall::LineTo(p));
    }

    fn close_path(&mut self) {
        self.calls.push(DrawCall::ClosePath);
    }

    fn stroke(&mut self) {
        self.calls.push(DrawCall::Stroke);
    }

    fn fill(&mut self) {
        self.calls.push(DrawCall::Fill);
    }

    fn circle(&mut self, centre: Vec2, radius: f32) {
        self.calls.push(DrawCall::Circle { centre, radius });
    }

    fn rect(&mut self, bounds: &BBox2) {
        self.calls.push(DrawCall::Rect(*bounds));
    }

    fn rounded_rect(&mut self, bounds: &BBox2, radius: f32) {
        self.calls.push(DrawCall::RoundedRect {
            bounds: *bounds,
            radius,
        });
    }

    fn text(&mut self, position: Vec2, text: &str, align: Align) {
        self.calls.push(DrawCall::Text {
            position,
            text: text.to_string(),
            align,
        });
    }

    fn stroke_color(&mut self, color: Rgba) {
        self.calls.push(DrawCall::StrokeColor(color));
    }

    fn fill_color(&mut self, color: Rgba) {
        self.calls.push(DrawCall::FillColor(color));
    }

    fn stroke_width(&mut self, width: f32) {
        self.calls.push(DrawCall::StrokeWidth(width));
    }

    fn stroke_dash(&mut self, pattern: &[f32]) {
        self.calls.push(DrawCall::StrokeDash(pattern.to_vec()));
    }

    fn font_size(&mut self, size: f32) {
        self.calls.push(DrawCall::FontSize(size));
    }

    fn font_face(&mut self, face: &str) {
        self.calls.push(DrawCall::FontFace(face.to_string()));
    }

    fn scissor(&mut self, bounds: &BBox2) {
        self.calls.push(DrawCall::Scissor(*bounds));
    }

    fn reset_scissor(&mut self) {
        self.calls.push(DrawCall::ResetScissor);
    }

    fn translate(&mut self, offset: Vec2) {
        self.calls.push(DrawCall::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.calls.push(DrawCall::Rotate(angle));
    }

    fn reset_transform(&mut self) {
        self.calls.push(DrawCall::ResetTransform);
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn mouse_pos(&self) -> Vec2 {
        self.mouse
    }

    fn mouse_dragging(&self) -> bool {
        self.dragging
    }

    fn mouse_drag_delta(&self) -> Vec2 {
        self.drag_delta
    }
}

impl AnimatedCanvas for RecordingCanvas {
    fn begin_animated_path(&mut self) {
        self.calls.push(DrawCall::BeginAnimatedPath);
    }

    fn add_animated_path(&mut self, time: f32, points: &[Vec2]) {
        self.calls.push(DrawCall::AnimatedPath {
            time,
            points: points.to_vec(),
        });
    }

    fn end_animated_path(&mut self, time_span: f32) {
        self.calls.push(DrawCall::EndAnimatedPath { time_span });
    }

    fn add_animated_circle(&mut self, time: f32, centre: Vec2, radius: f32, fill: Rgba) {
        self.calls.push(DrawCall::AnimatedCircle {
            time,
            centre,
            radius,
            fill,
        });
    }

    fn end_animated_circle(&mut self, time_span: f32) {
        self.calls.push(DrawCall::EndAnimatedCircle { time_span });
    }

    fn add_animated_rect(&mut self, time: f32, bounds: &BBox2, fill: Rgba) {
        self.calls.push(DrawCall::AnimatedRect {
            time,
            bounds: *bounds,
            fill,
        });
    }

    fn end_animated_rect(&mut self, time_span: f32) {
        self.calls.push(DrawCall::EndAnimatedRect { time_span });
    }

    fn set_tooltip(&mut self, text: &str) {
        self.calls.push(DrawCall::Tooltip(text.to_string()));
    }
}

impl InteractiveCanvas for RecordingCanvas {
    fn poll_events(&mut self) {
        self.dragging = false;
        self.drag_delta = Vec2::zero();
        if self.events.is_empty() {
            self.closed = true;
            return;
        }
        while let Some(event) = self.events.pop_front() {
            match event {
                InputEvent::Resize(size) => self.viewport = size,
                InputEvent::MouseMove(p) => self.mouse = p,
                InputEvent::Drag(delta) => {
                    self.dragging = true;
                    self.drag_delta += delta;
                    self.mouse += delta;
                }
                InputEvent::Advance(dt) => {
                    self.time += dt;
                    break;
                }
                InputEvent::Close => {
                    self.closed = true;
                    break;
                }
            }
        }
    }

    fn should_close(&self) -> bool {
        self.closed
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn time(&self) -> f32 {
        self.time
    }

    fn begin_frame(&mut self, size: Vec2) {
        self.calls.push(DrawCall::BeginFrame(size));
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        self.calls.push(DrawCall::EndFrame);
    }
}
