//! Axes: data limits, ticks, decorations and the plots drawn inside them.
//!
//! An [`Axis`] owns its plots. Every frame added to a plot widens the axis
//! limits by the plot limits scaled about their centre with the buffer
//! factor; [`Axis::xlim`] and [`Axis::ylim`] pin a component instead.
//!
//! Ticks follow a fixed recipe: the tick spacing is the limit width divided by
//! the tick count, rounded to a few significant digits, and the first tick is
//! the first multiple of the spacing strictly above the lower limit.

mod legend;
mod ticks;

pub use legend::LegendEntry;
pub use ticks::{format_significant, Tick};

use crate::color::Rgba;
use crate::config::FigureConfig;
use crate::error::{Error, Result};
use crate::geometry::{BBox2, Vec2};
use crate::grammar::{Aesthetic, DataWithAesthetic, Limits, Style, Theme, Transform};
use crate::layout::{Layout, NodeId};
use crate::plots::{Geometry, PlotContext};
use crate::render::{Align, AnimatedCanvas, Canvas};
use std::ops::{Deref, DerefMut};

/// A plotting area with its own limits and ticks.
#[derive(Debug, Clone)]
pub struct Axis {
    node: NodeId,
    limits: Limits,
    frozen: [bool; 2],
    n_ticks: [Option<usize>; 2],
    sig_digits: u32,
    buffer: f32,
    plots: Vec<Geometry>,
    title: Option<String>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    theme: Theme,
    style: Style,
    ticks: [Vec<Tick>; 2],
}

impl Axis {
    /// Create an axis on `node` with settings from `config`.
    #[must_use]
    pub fn new(node: NodeId, config: &FigureConfig) -> Self {
        Self {
            node,
            limits: Limits::empty(),
            frozen: [false; 2],
            n_ticks: [config.x_ticks, config.y_ticks],
            sig_digits: config.sig_digits,
            buffer: config.buffer,
            plots: Vec::new(),
            title: None,
            xlabel: None,
            ylabel: None,
            theme: config.theme.clone(),
            style: config.style.clone(),
            ticks: [Vec::new(), Vec::new()],
        }
    }

    /// Layout node of the axis.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Accumulated limits. Unset components have `bmax < bmin`.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Plots in insertion order.
    #[must_use]
    pub fn plots(&self) -> &[Geometry] {
        &self.plots
    }

    /// Ticks from the last [`Axis::update_tick_information`], x then y.
    #[must_use]
    pub fn ticks(&self) -> (&[Tick], &[Tick]) {
        (&self.ticks[0], &self.ticks[1])
    }

    /// Axis theme.
    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Pin the x range.
    pub fn xlim(&mut self, min: f32, max: f32) -> &mut Self {
        self.pin(0, min, max)
    }

    /// Pin the y range.
    pub fn ylim(&mut self, min: f32, max: f32) -> &mut Self {
        self.pin(1, min, max)
    }

    fn pin(&mut self, i: usize, min: f32, max: f32) -> &mut Self {
        self.limits.bmin[i] = min.min(max);
        self.limits.bmax[i] = min.max(max);
        self.frozen[i] = true;
        self
    }

    /// Fix the tick counts; `None` derives a count from the aspect ratio.
    pub fn nticks(&mut self, x: Option<usize>, y: Option<usize>) -> &mut Self {
        self.n_ticks = [x, y];
        self
    }

    /// Significant digits of the tick spacing.
    pub fn sig_digits(&mut self, digits: u32) -> &mut Self {
        self.sig_digits = digits.max(1);
        self
    }

    /// Set the title drawn above the panel.
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Set the x axis label.
    pub fn xlabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.xlabel = Some(label.into());
        self
    }

    /// Set the y axis label.
    pub fn ylabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.ylabel = Some(label.into());
        self
    }

    /// Show or hide the legend.
    pub fn legend(&mut self, show: bool) -> &mut Self {
        self.theme.show_legend = show;
        self
    }

    /// Replace the theme.
    pub fn set_theme(&mut self, theme: Theme) -> &mut Self {
        self.theme = theme;
        self
    }

    /// Widen the limits by `plot` scaled with the buffer factor. Pinned
    /// components are left alone.
    pub fn add_limits(&mut self, plot: &Limits) {
        let scaled = plot.scaled(self.buffer);
        for i in 0..2 {
            if self.frozen[i] || scaled.is_unset(i) {
                continue;
            }
            self.limits.bmin[i] = self.limits.bmin[i].min(scaled.bmin[i]);
            self.limits.bmax[i] = self.limits.bmax[i].max(scaled.bmax[i]);
        }
    }

    /// Limits used for drawing: unset components fall back to `[0, 1]` and
    /// zero-width ones are widened by 0.5 on each side.
    #[must_use]
    pub fn display_limits(&self) -> Limits {
        let mut limits = self.limits;
        for i in 0..2 {
            if limits.is_unset(i) {
                limits.bmin[i] = 0.0;
                limits.bmax[i] = 1.0;
            } else if limits.bmax[i] == limits.bmin[i] {
                limits.bmin[i] -= 0.5;
                limits.bmax[i] += 0.5;
            }
        }
        limits
    }

    /// Translate the limits by a drag of `drag` pixels over a panel of
    /// `pixels`. Content follows the cursor.
    pub fn pan(&mut self, drag: Vec2, pixels: &BBox2) {
        if pixels.width() <= 0.0 || pixels.height() <= 0.0 {
            return;
        }
        let display = self.display_limits();
        let delta = display.delta();
        let shift = [
            -drag.x() * delta[0] / pixels.width(),
            drag.y() * delta[1] / pixels.height(),
        ];
        for (i, d) in shift.into_iter().enumerate() {
            self.limits.bmin[i] = display.bmin[i] + d;
            self.limits.bmax[i] = display.bmax[i] + d;
        }
        tracing::debug!(dx = shift[0], dy = shift[1], "panned axis");
    }

    /// Convert a data point to pixels.
    #[must_use]
    pub fn to_pixel(&self, point: Vec2, pixels: &BBox2) -> Vec2 {
        let limits = self.display_limits();
        Vec2::xy(
            Aesthetic::X.to_display(point.x(), &limits, pixels),
            Aesthetic::Y.to_display(point.y(), &limits, pixels),
        )
    }

    /// Convert a pixel position to data space.
    #[must_use]
    pub fn from_pixel(&self, pixel: Vec2, pixels: &BBox2) -> Vec2 {
        let limits = self.display_limits();
        Vec2::xy(
            Aesthetic::X.from_display(pixel.x(), &limits, pixels),
            Aesthetic::Y.from_display(pixel.y(), &limits, pixels),
        )
    }

    /// Recompute tick values, pixel positions and labels for a panel of
    /// `pixels`.
    pub fn update_tick_information(&mut self, pixels: &BBox2) {
        let limits = self.display_limits();
        let counts = ticks::tick_counts(self.n_ticks, pixels.width() / pixels.height());
        let label_digits = self.sig_digits + 1;
        for (i, aes) in [Aesthetic::X, Aesthetic::Y].into_iter().enumerate() {
            let values =
                ticks::tick_values(limits.bmin[i], limits.bmax[i], counts[i], self.sig_digits);
            self.ticks[i] = values
                .into_iter()
                .map(|value| Tick {
                    value,
                    pixel: aes.to_display(value, &limits, pixels),
                    label: format_significant(value, label_digits),
                })
                .collect();
        }
        tracing::trace!(
            nx = self.ticks[0].len(),
            ny = self.ticks[1].len(),
            "updated ticks"
        );
    }

    fn context(&self, pixels: BBox2) -> PlotContext {
        PlotContext {
            limits: self.display_limits(),
            pixels,
        }
    }

    /// Draw the axis and every plot at `time`.
    ///
    /// # Errors
    ///
    /// Returns the first plot validation error.
    pub fn draw<C: Canvas>(
        &mut self,
        canvas: &mut C,
        layout: &mut Layout,
        time: f32,
    ) -> Result<()> {
        let pixels = layout.pixels(self.node);
        self.update_tick_information(&pixels);
        self.draw_decorations(canvas, &pixels);

        let ctx = self.context(pixels);
        canvas.scissor(&pixels);
        for plot in &self.plots {
            plot.draw(canvas, layout, &ctx, time)?;
        }
        canvas.reset_scissor();

        if self.theme.show_legend {
            legend::draw(canvas, &legend::entries(&self.plots), &pixels, &self.theme);
        }
        Ok(())
    }

    /// Serialise the axis with every plot animated over `time_span`.
    ///
    /// # Errors
    ///
    /// Returns the first plot validation error.
    pub fn serialise<C: AnimatedCanvas>(
        &mut self,
        canvas: &mut C,
        layout: &Layout,
        time_span: f32,
    ) -> Result<()> {
        let pixels = layout.pixels(self.node);
        self.update_tick_information(&pixels);
        self.draw_decorations(canvas, &pixels);

        let ctx = self.context(pixels);
        canvas.scissor(&pixels);
        for plot in &self.plots {
            plot.serialise(canvas, layout, &ctx, time_span)?;
        }
        canvas.reset_scissor();

        if self.theme.show_legend {
            legend::draw(canvas, &legend::entries(&self.plots), &pixels, &self.theme);
        }
        Ok(())
    }

    fn draw_decorations<C: Canvas>(&self, canvas: &mut C, pixels: &BBox2) {
        let theme = &self.theme;
        canvas.reset_scissor();
        canvas.reset_transform();

        canvas.begin_path();
        canvas.rect(pixels);
        canvas.fill_color(theme.panel_background);
        canvas.fill();

        if theme.show_grid {
            canvas.begin_path();
            for tick in &self.ticks[0] {
                canvas.move_to(Vec2::xy(tick.pixel, pixels.bmin.y()));
                canvas.line_to(Vec2::xy(tick.pixel, pixels.bmax.y()));
            }
            for tick in &self.ticks[1] {
                canvas.move_to(Vec2::xy(pixels.bmin.x(), tick.pixel));
                canvas.line_to(Vec2::xy(pixels.bmax.x(), tick.pixel));
            }
            canvas.stroke_color(theme.grid_color);
            canvas.stroke_width(theme.grid_width);
            canvas.stroke();
        }

        if theme.show_axis {
            canvas.begin_path();
            canvas.rect(pixels);
            canvas.stroke_color(theme.axis_color);
            canvas.stroke_width(theme.axis_width);
            canvas.stroke();
        }

        let gap = 0.5 * theme.font_size;
        canvas.font_face(&theme.font_face);
        canvas.font_size(theme.font_size);
        canvas.fill_color(theme.text_color);
        for tick in &self.ticks[0] {
            let anchor = Vec2::xy(tick.pixel, pixels.bmax.y() + gap);
            canvas.text(anchor, &tick.label, Align::CENTER_TOP);
        }
        for tick in &self.ticks[1] {
            let anchor = Vec2::xy(pixels.bmin.x() - gap, tick.pixel);
            canvas.text(anchor, &tick.label, Align::RIGHT_MIDDLE);
        }

        let centre = pixels.centre();
        if let Some(xlabel) = &self.xlabel {
            let anchor = Vec2::xy(centre.x(), pixels.bmax.y() + 2.0 * theme.font_size + gap);
            canvas.text(anchor, xlabel, Align::CENTER_TOP);
        }
        if let Some(ylabel) = &self.ylabel {
            let width = self.ticks[1]
                .iter()
                .map(|t| t.label.chars().count())
                .max()
                .unwrap_or(1) as f32;
            let offset = 0.6 * theme.font_size * width + 2.0 * gap;
            canvas.translate(Vec2::xy(pixels.bmin.x() - offset, centre.y()));
            canvas.rotate(-std::f32::consts::FRAC_PI_2);
            canvas.text(Vec2::zero(), ylabel, Align::CENTER_BOTTOM);
            canvas.reset_transform();
        }
        if let Some(title) = &self.title {
            canvas.font_size(1.2 * theme.font_size);
            let anchor = Vec2::xy(centre.x(), pixels.bmin.y() - gap);
            canvas.text(anchor, title, Align::CENTER_BOTTOM);
            canvas.font_size(theme.font_size);
        }
    }
}

/// Mutable handle to an axis together with the figure layout, used to add
/// plots.
#[derive(Debug)]
pub struct AxisMut<'a> {
    layout: &'a mut Layout,
    axis: &'a mut Axis,
}

impl<'a> AxisMut<'a> {
    pub(crate) fn new(layout: &'a mut Layout, axis: &'a mut Axis) -> Self {
        Self { layout, axis }
    }

    /// Add a line plot with `data` as its first frame at time 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] unless x and y are mapped.
    pub fn line(&mut self, data: DataWithAesthetic) -> Result<PlotMut<'_>> {
        self.add_plot(Geometry::line, data)
    }

    /// Add a scatter plot with `data` as its first frame at time 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] unless x and y are mapped.
    pub fn points(&mut self, data: DataWithAesthetic) -> Result<PlotMut<'_>> {
        self.add_plot(Geometry::points, data)
    }

    /// Add a histogram of x with estimated bins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] unless x is mapped.
    pub fn histogram(&mut self, data: DataWithAesthetic) -> Result<PlotMut<'_>> {
        self.histogram_with(data, Transform::bin_x())
    }

    /// Add a histogram with an explicit binning transform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] unless x is mapped.
    pub fn histogram_with(
        &mut self,
        data: DataWithAesthetic,
        transform: Transform,
    ) -> Result<PlotMut<'_>> {
        self.add_plot(
            |node, style| Geometry::histogram(node, style, transform.clone()),
            data,
        )
    }

    /// Add a rectangle plot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] unless all four corners are mapped.
    pub fn rectangle(&mut self, data: DataWithAesthetic) -> Result<PlotMut<'_>> {
        self.add_plot(Geometry::rectangle, data)
    }

    fn add_plot(
        &mut self,
        make: impl Fn(NodeId, Style) -> Geometry,
        data: DataWithAesthetic,
    ) -> Result<PlotMut<'_>> {
        let color = Rgba::cycle(self.axis.plots.len());
        let style = self.axis.style.clone().color(color);
        make(NodeId::default(), style.clone()).check_required(&data)?;

        let node = self.layout.insert_child(self.axis.node, BBox2::unit());
        let mut plot = make(node, style);
        let limits = plot.add_frame(self.layout, data, 0.0)?;
        self.axis.add_limits(&limits);
        self.axis.plots.push(plot);
        let index = self.axis.plots.len() - 1;
        tracing::debug!(index, "added plot");
        Ok(PlotMut {
            layout: &mut *self.layout,
            axis: &mut *self.axis,
            index,
        })
    }

    /// Handle to an existing plot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchPlot`] for an out-of-range index.
    pub fn plot(&mut self, index: usize) -> Result<PlotMut<'_>> {
        let count = self.axis.plots.len();
        if index >= count {
            return Err(Error::NoSuchPlot { index, count });
        }
        Ok(PlotMut {
            layout: &mut *self.layout,
            axis: &mut *self.axis,
            index,
        })
    }
}

impl Deref for AxisMut<'_> {
    type Target = Axis;

    fn deref(&self) -> &Axis {
        self.axis
    }
}

impl DerefMut for AxisMut<'_> {
    fn deref_mut(&mut self) -> &mut Axis {
        self.axis
    }
}

/// Mutable handle to one plot on an axis.
#[derive(Debug)]
pub struct PlotMut<'a> {
    layout: &'a mut Layout,
    axis: &'a mut Axis,
    index: usize,
}

impl PlotMut<'_> {
    /// Position of the plot on its axis.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    fn geometry(&mut self) -> &mut Geometry {
        &mut self.axis.plots[self.index]
    }

    /// Add a keyframe at `time`, which must follow every earlier keyframe.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing aesthetic or an invalid time; the plot
    /// and the axis limits are unchanged in that case.
    pub fn add_frame(&mut self, data: DataWithAesthetic, time: f32) -> Result<&mut Self> {
        let plot = &mut self.axis.plots[self.index];
        let limits = plot.add_frame(self.layout, data, time)?;
        self.axis.add_limits(&limits);
        Ok(self)
    }

    /// Replace the style.
    pub fn style(&mut self, style: Style) -> &mut Self {
        *self.geometry().style_mut() = style;
        self
    }

    /// Set the legend label.
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.geometry().style_mut().label = Some(label.into());
        self
    }

    /// Set the line width.
    pub fn line_width(&mut self, width: f32) -> &mut Self {
        self.geometry().style_mut().line_width = width;
        self
    }

    /// Set the base color.
    pub fn color(&mut self, color: Rgba) -> &mut Self {
        self.geometry().style_mut().color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::create_data;
    use crate::output::{DrawCall, RecordingCanvas};
    use approx::assert_relative_eq;

    fn setup(width: f32, height: f32) -> (Layout, Axis) {
        let mut layout = Layout::new();
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, width, height));
        let node = layout.insert_child(root, BBox2::unit());
        (layout, Axis::new(node, &FigureConfig::default()))
    }

    fn xy(x: &[f32], y: &[f32]) -> DataWithAesthetic {
        create_data().x(x).and_then(|d| d.y(y)).unwrap()
    }

    #[test]
    fn test_ticks_fixed_counts() {
        let (_, mut axis) = setup(200.0, 200.0);
        axis.xlim(0.0, 100.0)
            .ylim(0.0, 100.0)
            .nticks(Some(5), Some(5))
            .sig_digits(2);
        axis.update_tick_information(&BBox2::from_corners(0.0, 0.0, 200.0, 200.0));
        let (x, y) = axis.ticks();
        let values: Vec<f32> = x.iter().map(|t| t.value).collect();
        let pixels: Vec<f32> = x.iter().map(|t| t.pixel).collect();
        assert_eq!(values, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(pixels, vec![40.0, 80.0, 120.0, 160.0, 200.0]);
        assert_eq!(x[0].label, "20");
        assert_eq!(y.len(), 5);
        assert_relative_eq!(y[0].pixel, 160.0);
    }

    #[test]
    fn test_default_limits() {
        let (_, axis) = setup(100.0, 100.0);
        let limits = axis.display_limits();
        assert_eq!((limits.bmin[0], limits.bmax[0]), (0.0, 1.0));
        assert_eq!((limits.bmin[1], limits.bmax[1]), (0.0, 1.0));
    }

    #[test]
    fn test_zero_width_limits_widened() {
        let (mut layout, mut axis) = setup(100.0, 100.0);
        AxisMut::new(&mut layout, &mut axis)
            .points(xy(&[2.0], &[3.0]))
            .unwrap();
        let limits = axis.display_limits();
        assert_eq!((limits.bmin[0], limits.bmax[0]), (1.5, 2.5));
    }

    #[test]
    fn test_limits_buffered_union() {
        let (mut layout, mut axis) = setup(100.0, 100.0);
        {
            let mut handle = AxisMut::new(&mut layout, &mut axis);
            let mut plot = handle.line(xy(&[0.0, 10.0], &[0.0, 1.0])).unwrap();
            plot.add_frame(xy(&[0.0, 20.0], &[0.0, 1.0]), 1.0).unwrap();
        }
        let limits = axis.limits();
        assert_relative_eq!(limits.bmin[0], -0.5, epsilon = 1e-5);
        assert_relative_eq!(limits.bmax[0], 20.5, epsilon = 1e-5);
    }

    #[test]
    fn test_pinned_limits_ignore_data() {
        let (mut layout, mut axis) = setup(100.0, 100.0);
        axis.xlim(0.0, 1.0);
        AxisMut::new(&mut layout, &mut axis)
            .line(xy(&[0.0, 10.0], &[0.0, 10.0]))
            .unwrap();
        assert_eq!(axis.limits().bmax[0], 1.0);
        assert!(axis.limits().bmax[1] > 10.0);
    }

    #[test]
    fn test_failed_plot_leaves_layout() {
        let (mut layout, mut axis) = setup(100.0, 100.0);
        let before = layout.len();
        let x_only = create_data().x(&[1.0]).unwrap();
        let err = AxisMut::new(&mut layout, &mut axis)
            .line(x_only)
            .unwrap_err();
        assert!(matches!(err, Error::MissingAesthetic("y")));
        assert_eq!(layout.len(), before);
        assert!(axis.plots().is_empty());
    }

    #[test]
    fn test_plot_colors_cycle() {
        let (mut layout, mut axis) = setup(100.0, 100.0);
        let mut handle = AxisMut::new(&mut layout, &mut axis);
        handle.line(xy(&[0.0], &[0.0])).unwrap();
        handle.line(xy(&[0.0], &[0.0])).unwrap();
        assert_eq!(axis.plots()[1].style().color, Rgba::cycle(1));
    }

    #[test]
    fn test_no_such_plot() {
        let (mut layout, mut axis) = setup(100.0, 100.0);
        let err = AxisMut::new(&mut layout, &mut axis).plot(0).unwrap_err();
        assert!(matches!(err, Error::NoSuchPlot { index: 0, count: 0 }));
    }

    #[test]
    fn test_pan_follows_cursor() {
        let (_, mut axis) = setup(100.0, 100.0);
        axis.xlim(0.0, 10.0).ylim(0.0, 10.0);
        let pixels = BBox2::from_corners(0.0, 0.0, 100.0, 100.0);
        axis.pan(Vec2::xy(10.0, 10.0), &pixels);
        assert_relative_eq!(axis.limits().bmin[0], -1.0);
        assert_relative_eq!(axis.limits().bmin[1], 1.0);
    }

    #[test]
    fn test_draw_labels() {
        let (mut layout, mut axis) = setup(200.0, 200.0);
        axis.xlim(0.0, 100.0)
            .ylim(0.0, 100.0)
            .nticks(Some(5), Some(5));
        axis.title("T").xlabel("X").ylabel("Y");
        let mut canvas = RecordingCanvas::new(200.0, 200.0);
        axis.draw(&mut canvas, &mut layout, 0.0).unwrap();
        let texts = canvas.texts();
        for label in ["20", "100", "X", "Y", "T"] {
            assert!(texts.contains(&label), "missing {label}: {texts:?}");
        }
        assert!(canvas
            .calls()
            .contains(&DrawCall::Rotate(-std::f32::consts::FRAC_PI_2)));
    }
}
