//! Plot geometries.
//!
//! Every plot stores an ordered list of keyframes, each a transformed
//! [`DataWithAesthetic`] whose timestamp lives on the plot's layout node.
//! Drawing resolves the keyframe pair around the requested time and blends
//! them; serialising hands every keyframe to an [`AnimatedCanvas`].

mod histogram;
mod line;
mod points;
mod rectangle;

pub use histogram::Histogram;
pub use line::Line;
pub use points::Points;
pub use rectangle::Rectangle;

use crate::axis::format_significant;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::{BBox2, Vec2};
use crate::grammar::{Aesthetic, DataWithAesthetic, Limits, Style, Transform};
use crate::layout::{FrameInfo, Layout, NodeId};
use crate::render::{Align, AnimatedCanvas, Canvas};

/// Optional aesthetics that must stay set once a frame sets them.
const OPTIONAL_AESTHETICS: [Aesthetic; 3] =
    [Aesthetic::Color, Aesthetic::Size, Aesthetic::Fill];

/// Coordinate frame a plot draws into.
#[derive(Debug, Clone, Copy)]
pub struct PlotContext {
    /// Axis limits used for the x and y slots.
    pub limits: Limits,
    /// Pixel box of the axis.
    pub pixels: BBox2,
}

/// Keyframes of one plot.
#[derive(Debug, Clone)]
pub struct FrameSet {
    node: NodeId,
    frames: Vec<DataWithAesthetic>,
    limits: Limits,
    transform: Transform,
}

impl FrameSet {
    fn new(node: NodeId, transform: Transform) -> Self {
        Self {
            node,
            frames: Vec::new(),
            limits: Limits::empty(),
            transform,
        }
    }

    /// Layout node carrying the keyframe times.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Transformed keyframes in time order.
    #[must_use]
    pub fn frames(&self) -> &[DataWithAesthetic] {
        &self.frames
    }

    /// Union of every keyframe's limits.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    fn add(&mut self, layout: &mut Layout, data: DataWithAesthetic, time: f32) -> Result<()> {
        layout.check_frame_time(self.node, time)?;
        let data = self.transform.apply(data)?;
        layout.add_frame_time(self.node, time)?;
        self.limits += *data.limits();
        tracing::debug!(
            frame = self.frames.len(),
            time,
            rows = data.rows(),
            "added frame"
        );
        self.frames.push(data);
        Ok(())
    }

    /// Check that optional aesthetics stay set and row counts agree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentAesthetic`] or [`Error::FrameRowMismatch`].
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.frames.first() else {
            return Ok(());
        };
        for aes in OPTIONAL_AESTHETICS {
            let Some(start) = self.frames.iter().position(|f| f.has(aes)) else {
                continue;
            };
            let mut later = self.frames.iter().skip(start + 1);
            if let Some(frame) = later.position(|f| !f.has(aes)) {
                return Err(Error::InconsistentAesthetic {
                    aesthetic: aes.name(),
                    frame: start + 1 + frame,
                });
            }
        }
        let expected = first.rows();
        for (frame, data) in self.frames.iter().enumerate().skip(1) {
            if data.rows() != expected {
                return Err(Error::FrameRowMismatch {
                    frame,
                    expected,
                    actual: data.rows(),
                });
            }
        }
        Ok(())
    }

    /// Limits for display conversion: x and y from the axis, the rest from
    /// this plot.
    fn merged_limits(&self, axis: &Limits) -> Limits {
        let mut limits = self.limits;
        for i in 0..2 {
            limits.bmin[i] = axis.bmin[i];
            limits.bmax[i] = axis.bmax[i];
        }
        limits
    }

    /// The keyframe pair selected by `info`: `(above, below)`.
    fn pair(&self, info: FrameInfo) -> Option<(&DataWithAesthetic, &DataWithAesthetic)> {
        let above = self.frames.get(info.frame_above)?;
        let below = info
            .frame_above
            .checked_sub(1)
            .and_then(|i| self.frames.get(i))
            .unwrap_or(above);
        Some((above, below))
    }
}

/// Values of `aes` blended between two keyframes.
fn blended(
    above: &DataWithAesthetic,
    below: &DataWithAesthetic,
    aes: Aesthetic,
    info: FrameInfo,
) -> Result<Vec<f32>> {
    let a = above.values(aes)?;
    if info.is_exact() || !below.has(aes) {
        return Ok(a);
    }
    Ok(a
        .iter()
        .zip(below.column(aes)?)
        .map(|(&a, b)| info.blend(a, b))
        .collect())
}

/// Display values (`[0, 1]` for colors, pixels for sizes) of an optional
/// aesthetic, blended in display space.
fn blended_display(
    above: &DataWithAesthetic,
    below: &DataWithAesthetic,
    aes: Aesthetic,
    info: FrameInfo,
    limits: &Limits,
    pixels: &BBox2,
) -> Result<Option<Vec<f32>>> {
    if !above.has(aes) {
        return Ok(None);
    }
    let values = blended(above, below, aes, info)?;
    let display = values
        .into_iter()
        .map(|v| aes.to_display(v, limits, pixels))
        .collect();
    Ok(Some(display))
}

/// Per-row colors from a color or fill aesthetic, or the style color.
fn row_colors(display: Option<Vec<f32>>, rows: usize, style: &Style) -> Vec<Rgba> {
    match display {
        Some(t) => {
            let scale = style.palette.scale();
            t.into_iter().map(|t| scale.color(t)).collect()
        }
        None => vec![style.color; rows],
    }
}

/// Convert a data-space rectangle to an ordered pixel box.
fn pixel_box(limits: &Limits, pixels: &BBox2, x0: f32, y0: f32, x1: f32, y1: f32) -> BBox2 {
    let a = Vec2::xy(
        Aesthetic::X.to_display(x0, limits, pixels),
        Aesthetic::Y.to_display(y0, limits, pixels),
    );
    let b = Vec2::xy(
        Aesthetic::X.to_display(x1, limits, pixels),
        Aesthetic::Y.to_display(y1, limits, pixels),
    );
    BBox2::new(a.min(b), a.max(b))
}

/// Human-readable value of `aes`, using the interned label for text columns.
fn describe(data: &DataWithAesthetic, aes: Aesthetic, value: f32) -> String {
    data.label(aes, value)
        .map_or_else(|| format_significant(value, 4), str::to_string)
}

/// Draw a tooltip box with `text` next to `anchor`.
fn draw_tooltip<C: Canvas>(canvas: &mut C, anchor: Vec2, text: &str, style: &Style) {
    let width = 0.6 * style.font_size * text.chars().count() as f32 + 8.0;
    let height = style.font_size + 6.0;
    let origin = anchor + Vec2::xy(10.0, -10.0 - height);
    let bounds = BBox2::new(origin, origin + Vec2::xy(width, height));

    canvas.begin_path();
    canvas.rounded_rect(&bounds, 3.0);
    canvas.fill_color(Rgba::new(255, 255, 255, 230));
    canvas.fill();
    canvas.stroke_color(Rgba::rgb(80, 80, 80));
    canvas.stroke_width(1.0);
    canvas.stroke();

    canvas.font_face(&style.font_face);
    canvas.font_size(style.font_size);
    canvas.fill_color(Rgba::rgb(30, 30, 30));
    let baseline = Vec2::xy(origin.x() + 4.0, origin.y() + 0.5 * height);
    canvas.text(baseline, text, Align::LEFT_MIDDLE);
}

/// Index of the point nearest to `mouse` within its threshold.
fn nearest(points: &[Vec2], mouse: Vec2, threshold: impl Fn(usize) -> f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance(&mouse)))
        .filter(|&(i, d)| d <= threshold(i))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// A plot on an axis.
#[derive(Debug, Clone)]
pub enum Geometry {
    /// Connected polyline.
    Line(Line),
    /// Scatter markers.
    Points(Points),
    /// Binned counts of x.
    Histogram(Histogram),
    /// Axis-aligned rectangles.
    Rectangle(Rectangle),
}

impl Geometry {
    /// Create an empty line plot on `node`.
    #[must_use]
    pub fn line(node: NodeId, style: Style) -> Self {
        Self::Line(Line {
            frames: FrameSet::new(node, Transform::Identity),
            style,
        })
    }

    /// Create an empty scatter plot on `node`.
    #[must_use]
    pub fn points(node: NodeId, style: Style) -> Self {
        Self::Points(Points {
            frames: FrameSet::new(node, Transform::Identity),
            style,
        })
    }

    /// Create an empty histogram on `node` with the given binning.
    #[must_use]
    pub fn histogram(node: NodeId, style: Style, transform: Transform) -> Self {
        Self::Histogram(Histogram {
            frames: FrameSet::new(node, transform),
            style,
        })
    }

    /// Create an empty rectangle plot on `node`.
    #[must_use]
    pub fn rectangle(node: NodeId, style: Style) -> Self {
        Self::Rectangle(Rectangle {
            frames: FrameSet::new(node, Transform::Identity),
            style,
        })
    }

    /// Aesthetics every frame must map.
    #[must_use]
    pub const fn required(&self) -> &'static [Aesthetic] {
        match self {
            Self::Line(_) | Self::Points(_) => &[Aesthetic::X, Aesthetic::Y],
            Self::Histogram(_) => &[Aesthetic::X],
            Self::Rectangle(_) => &[
                Aesthetic::Xmin,
                Aesthetic::Ymin,
                Aesthetic::Xmax,
                Aesthetic::Ymax,
            ],
        }
    }

    /// The keyframes.
    #[must_use]
    pub const fn frames(&self) -> &FrameSet {
        match self {
            Self::Line(g) => &g.frames,
            Self::Points(g) => &g.frames,
            Self::Histogram(g) => &g.frames,
            Self::Rectangle(g) => &g.frames,
        }
    }

    fn frames_mut(&mut self) -> &mut FrameSet {
        match self {
            Self::Line(g) => &mut g.frames,
            Self::Points(g) => &mut g.frames,
            Self::Histogram(g) => &mut g.frames,
            Self::Rectangle(g) => &mut g.frames,
        }
    }

    /// Drawing style.
    #[must_use]
    pub const fn style(&self) -> &Style {
        match self {
            Self::Line(g) => &g.style,
            Self::Points(g) => &g.style,
            Self::Histogram(g) => &g.style,
            Self::Rectangle(g) => &g.style,
        }
    }

    /// Mutable drawing style.
    pub fn style_mut(&mut self) -> &mut Style {
        match self {
            Self::Line(g) => &mut g.style,
            Self::Points(g) => &mut g.style,
            Self::Histogram(g) => &mut g.style,
            Self::Rectangle(g) => &mut g.style,
        }
    }

    /// Check that `data` maps every required aesthetic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] for the first missing role.
    pub fn check_required(&self, data: &DataWithAesthetic) -> Result<()> {
        match self.required().iter().find(|aes| !data.has(**aes)) {
            Some(aes) => Err(Error::MissingAesthetic(aes.name())),
            None => Ok(()),
        }
    }

    /// Transform and append a keyframe at `time`, returning the plot's
    /// updated limits.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing required aesthetic or an invalid time;
    /// nothing is modified in that case.
    pub fn add_frame(
        &mut self,
        layout: &mut Layout,
        data: DataWithAesthetic,
        time: f32,
    ) -> Result<Limits> {
        self.check_required(&data)?;
        let frames = self.frames_mut();
        frames.add(layout, data, time)?;
        Ok(frames.limits)
    }

    /// Draw the plot at `time`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when keyframes disagree.
    pub fn draw<C: Canvas>(
        &self,
        canvas: &mut C,
        layout: &mut Layout,
        ctx: &PlotContext,
        time: f32,
    ) -> Result<()> {
        let frames = self.frames();
        frames.validate()?;
        let info = layout.update_frame_info(frames.node, time);
        let limits = frames.merged_limits(&ctx.limits);
        let Some((above, below)) = frames.pair(info) else {
            return Ok(());
        };
        let hover = (canvas.is_interactive() && info.is_exact()).then(|| canvas.mouse_pos());
        let pass = DrawPass {
            above,
            below,
            info,
            limits: &limits,
            pixels: &ctx.pixels,
            hover,
        };
        match self {
            Self::Line(g) => g.draw(canvas, &pass),
            Self::Points(g) => g.draw(canvas, &pass),
            Self::Histogram(g) => g.draw(canvas, &pass),
            Self::Rectangle(g) => g.draw(canvas, &pass),
        }
    }

    /// Emit every keyframe as looping animations over `[0, time_span]`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when keyframes disagree.
    pub fn serialise<C: AnimatedCanvas>(
        &self,
        canvas: &mut C,
        layout: &Layout,
        ctx: &PlotContext,
        time_span: f32,
    ) -> Result<()> {
        let frames = self.frames();
        frames.validate()?;
        let times = layout
            .get(frames.node)
            .map(|n| n.frame_times().to_vec())
            .unwrap_or_default();
        let limits = frames.merged_limits(&ctx.limits);
        let pass = SerialisePass {
            frames: &frames.frames,
            times: &times,
            limits: &limits,
            pixels: &ctx.pixels,
            time_span,
        };
        match self {
            Self::Line(g) => g.serialise(canvas, &pass),
            Self::Points(g) => g.serialise(canvas, &pass),
            Self::Histogram(g) => g.serialise(canvas, &pass),
            Self::Rectangle(g) => g.serialise(canvas, &pass),
        }
    }
}

/// Inputs of one snapshot draw.
struct DrawPass<'a> {
    above: &'a DataWithAesthetic,
    below: &'a DataWithAesthetic,
    info: FrameInfo,
    limits: &'a Limits,
    pixels: &'a BBox2,
    /// Cursor position when hover highlighting applies.
    hover: Option<Vec2>,
}

/// Inputs of one animated serialisation.
struct SerialisePass<'a> {
    frames: &'a [DataWithAesthetic],
    times: &'a [f32],
    limits: &'a Limits,
    pixels: &'a BBox2,
    time_span: f32,
}
