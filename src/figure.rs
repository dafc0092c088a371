//! Figures: a grid of axes on one canvas.
//!
//! A [`Figure`] owns the layout arena and a sparse `(row, col)` grid of
//! [`Axis`] values. It draws snapshots to any [`Canvas`], serialises the whole
//! animation to an [`AnimatedCanvas`] and runs the interactive loop on an
//! [`InteractiveCanvas`].

use crate::axis::{Axis, AxisMut};
use crate::config::FigureConfig;
use crate::error::{Error, Result};
use crate::geometry::{BBox2, Vec2};
use crate::layout::{Layout, NodeId};
use crate::output::SvgCanvas;
use crate::render::{AnimatedCanvas, Canvas, InteractiveCanvas};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fraction of each grid cell left empty on every side.
const CELL_INSET: f32 = 0.1;

/// Area of grid cell `(row, col)` as a fraction of the figure.
fn cell_area(row: usize, col: usize, rows: usize, cols: usize) -> BBox2 {
    let w = 1.0 / cols as f32;
    let h = 1.0 / rows as f32;
    let (x0, y0) = (col as f32 * w, row as f32 * h);
    BBox2::from_corners(
        x0 + CELL_INSET * w,
        y0 + CELL_INSET * h,
        x0 + (1.0 - CELL_INSET) * w,
        y0 + (1.0 - CELL_INSET) * h,
    )
}

/// A figure with a grid of subplots.
#[derive(Debug, Clone)]
pub struct Figure {
    id: usize,
    layout: Layout,
    root: NodeId,
    axes: BTreeMap<(usize, usize), Axis>,
    cells: BTreeMap<(usize, usize), NodeId>,
    rows: usize,
    cols: usize,
    config: FigureConfig,
}

impl Figure {
    /// Create an empty figure.
    #[must_use]
    pub fn new(id: usize, config: FigureConfig) -> Self {
        let mut layout = Layout::new();
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, config.width, config.height));
        tracing::debug!(
            id,
            width = config.width,
            height = config.height,
            "created figure"
        );
        Self {
            id,
            layout,
            root,
            axes: BTreeMap::new(),
            cells: BTreeMap::new(),
            rows: 0,
            cols: 0,
            config,
        }
    }

    /// Figure id assigned by the [`Session`].
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Grid size as `(rows, cols)`.
    #[must_use]
    pub const fn grid(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.layout.pixels(self.root).delta()
    }

    /// The layout arena.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The axis at `(row, col)`, created on first use. Creating an axis
    /// outside the current grid grows the grid and re-lays every subplot.
    pub fn axis(&mut self, row: usize, col: usize) -> AxisMut<'_> {
        let Self {
            layout,
            root,
            axes,
            cells,
            rows,
            cols,
            config,
            ..
        } = self;
        let axis = match axes.entry((row, col)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let node = layout.insert_child(*root, BBox2::unit());
                cells.insert((row, col), node);
                if row >= *rows || col >= *cols {
                    *rows = (*rows).max(row + 1);
                    *cols = (*cols).max(col + 1);
                    tracing::debug!(rows = *rows, cols = *cols, "grew subplot grid");
                }
                for (&(r, c), &node) in cells.iter() {
                    layout.set_area(node, cell_area(r, c, *rows, *cols));
                }
                entry.insert(Axis::new(node, config))
            }
        };
        AxisMut::new(layout, axis)
    }

    /// The axis at `(row, col)` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchAxis`] when the cell is empty.
    pub fn axis_at(&self, row: usize, col: usize) -> Result<&Axis> {
        self.axes
            .get(&(row, col))
            .ok_or(Error::NoSuchAxis { row, col })
    }

    /// Resize the canvas and cascade the new pixel boxes to every subplot.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        let pixels = BBox2::from_corners(0.0, 0.0, width, height);
        self.layout.resize(self.root, &pixels);
        tracing::debug!(width, height, "resized figure");
    }

    /// Largest keyframe time of any plot.
    #[must_use]
    pub fn time_span(&self) -> f32 {
        self.layout.time_span(self.root)
    }

    fn draw_background<C: Canvas>(&self, canvas: &mut C) {
        canvas.reset_scissor();
        canvas.reset_transform();
        canvas.begin_path();
        canvas.rect(&self.layout.pixels(self.root));
        canvas.fill_color(self.config.theme.background);
        canvas.fill();
    }

    /// Draw every axis at `time`.
    ///
    /// # Errors
    ///
    /// Returns the first plot validation error.
    pub fn draw<C: Canvas>(&mut self, canvas: &mut C, time: f32) -> Result<()> {
        self.draw_background(canvas);
        for axis in self.axes.values_mut() {
            axis.draw(canvas, &mut self.layout, time)?;
        }
        Ok(())
    }

    /// Serialise the whole animation.
    ///
    /// # Errors
    ///
    /// Returns the first plot validation error.
    pub fn serialise<C: AnimatedCanvas>(&mut self, canvas: &mut C) -> Result<()> {
        let time_span = self.time_span();
        self.draw_background(canvas);
        for axis in self.axes.values_mut() {
            axis.serialise(canvas, &self.layout, time_span)?;
        }
        Ok(())
    }

    /// Render the animation as a standalone SVG document.
    ///
    /// # Errors
    ///
    /// Returns the first plot validation error.
    pub fn to_svg(&mut self) -> Result<String> {
        let size = self.size();
        let mut canvas = SvgCanvas::new(size.x(), size.y());
        self.serialise(&mut canvas)?;
        Ok(canvas.render())
    }

    /// Write the animation to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns a validation error or [`Error::Io`] if writing fails.
    pub fn save_svg(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let size = self.size();
        let mut canvas = SvgCanvas::new(size.x(), size.y());
        self.serialise(&mut canvas)?;
        canvas.write_to_file(path.as_ref())?;
        tracing::info!(
            id = self.id,
            path = %path.as_ref().display(),
            "saved figure"
        );
        Ok(())
    }

    fn axis_under(&self, point: Vec2) -> Option<(usize, usize)> {
        self.axes
            .iter()
            .find(|(_, axis)| self.layout.pixels(axis.node()).contains(&point))
            .map(|(&key, _)| key)
    }

    /// Run the interactive loop until the canvas asks to close.
    ///
    /// Each iteration polls input, follows viewport changes, pans the axis
    /// under a dragging cursor and draws the animation at the canvas time
    /// wrapped to the figure time span.
    ///
    /// # Errors
    ///
    /// Returns the first plot validation error.
    pub fn show<C: InteractiveCanvas>(&mut self, canvas: &mut C) -> Result<()> {
        tracing::info!(id = self.id, time_span = self.time_span(), "showing figure");
        let mut frames = 0_usize;
        loop {
            canvas.poll_events();
            if canvas.should_close() {
                break;
            }

            let viewport = canvas.viewport_size();
            if viewport != self.size() {
                self.resize(viewport.x(), viewport.y());
            }

            if canvas.mouse_dragging() {
                let drag = canvas.mouse_drag_delta();
                if let Some(key) = self.axis_under(canvas.mouse_pos()) {
                    let pixels = self.axes.get(&key).map(|a| self.layout.pixels(a.node()));
                    if let (Some(axis), Some(pixels)) = (self.axes.get_mut(&key), pixels) {
                        axis.pan(drag, &pixels);
                    }
                }
            }

            let span = self.time_span();
            let time = if span > 0.0 { canvas.time().rem_euclid(span) } else { 0.0 };
            canvas.begin_frame(viewport);
            self.draw(canvas, time)?;
            canvas.end_frame();
            frames += 1;
        }
        tracing::info!(id = self.id, frames, "closed figure");
        Ok(())
    }
}

/// Figure numbering and output naming for one plotting session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    next_figure_id: usize,
    draw_count: usize,
}

impl Session {
    /// Start a session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new figure with the default configuration.
    pub fn figure(&mut self) -> Figure {
        self.figure_with_config(FigureConfig::default())
    }

    /// A new figure with `config`.
    pub fn figure_with_config(&mut self, config: FigureConfig) -> Figure {
        let id = self.next_figure_id;
        self.next_figure_id += 1;
        Figure::new(id, config)
    }

    /// Number of figures created so far.
    #[must_use]
    pub const fn figure_count(&self) -> usize {
        self.next_figure_id
    }

    /// Next numbered output path `dir/stem_N.svg`.
    pub fn next_output_path(&mut self, dir: impl AsRef<Path>, stem: &str) -> PathBuf {
        let path = dir.as_ref().join(format!("{stem}_{}.svg", self.draw_count));
        self.draw_count += 1;
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{create_data, DataWithAesthetic};
    use crate::output::{DrawCall, InputEvent, RecordingCanvas};
    use approx::assert_relative_eq;

    fn figure() -> Figure {
        Session::new().figure_with_config(FigureConfig::new().size(200.0, 100.0))
    }

    fn diagonal() -> DataWithAesthetic {
        create_data()
            .x(&[0.0, 1.0])
            .and_then(|d| d.y(&[0.0, 1.0]))
            .unwrap()
    }

    #[test]
    fn test_single_axis_inset() {
        let mut fig = figure();
        let node = fig.axis(0, 0).node();
        let pixels = fig.layout().pixels(node);
        assert_relative_eq!(pixels.bmin.x(), 20.0);
        assert_relative_eq!(pixels.bmax.y(), 90.0);
    }

    #[test]
    fn test_grid_grows_and_relayouts() {
        let mut fig = figure();
        let first = fig.axis(0, 0).node();
        fig.axis(1, 1);
        assert_eq!(fig.grid(), (2, 2));
        let pixels = fig.layout().pixels(first);
        assert_relative_eq!(pixels.bmin.x(), 10.0);
        assert_relative_eq!(pixels.bmax.x(), 90.0);
        assert_relative_eq!(pixels.bmax.y(), 45.0);
    }

    #[test]
    fn test_axis_at_missing() {
        let mut fig = figure();
        fig.axis(0, 1);
        assert!(fig.axis_at(0, 1).is_ok());
        assert!(matches!(
            fig.axis_at(0, 0),
            Err(Error::NoSuchAxis { row: 0, col: 0 })
        ));
    }

    #[test]
    fn test_resize_cascades() {
        let mut fig = figure();
        let node = fig.axis(0, 0).node();
        fig.resize(400.0, 200.0);
        assert_relative_eq!(fig.layout().pixels(node).bmax.x(), 360.0);
    }

    #[test]
    fn test_time_span_from_plots() {
        let mut fig = figure();
        let data = diagonal();
        {
            let mut axis = fig.axis(0, 0);
            let mut line = axis.line(data.clone()).unwrap();
            line.add_frame(data, 3.0).unwrap();
        }
        assert_relative_eq!(fig.time_span(), 3.0);
    }

    #[test]
    fn test_show_loop_frames_and_resize() {
        let mut fig = figure();
        fig.axis(0, 0).line(diagonal()).unwrap();
        let resized = Vec2::xy(300.0, 150.0);
        let mut canvas = RecordingCanvas::scripted(
            200.0,
            100.0,
            [
                InputEvent::Advance(0.1),
                InputEvent::Resize(resized),
                InputEvent::Advance(0.1),
            ],
        );
        fig.show(&mut canvas).unwrap();
        assert_eq!(canvas.frames(), 2);
        assert_eq!(fig.size(), resized);
        assert!(canvas.calls().contains(&DrawCall::BeginFrame(resized)));
    }

    #[test]
    fn test_show_pans_axis_under_cursor() {
        let mut fig = figure();
        fig.axis(0, 0).xlim(0.0, 10.0).ylim(0.0, 10.0);
        let mut canvas = RecordingCanvas::scripted(
            200.0,
            100.0,
            [
                InputEvent::MouseMove(Vec2::xy(100.0, 50.0)),
                InputEvent::Drag(Vec2::xy(16.0, 0.0)),
                InputEvent::Advance(0.0),
            ],
        );
        fig.show(&mut canvas).unwrap();
        // 16 px over a 160 px panel spanning 10 units.
        let limits = fig.axis_at(0, 0).unwrap().limits();
        assert_relative_eq!(limits.bmin[0], -1.0);
        assert_relative_eq!(limits.bmax[0], 9.0);
    }

    #[test]
    fn test_session_numbering() {
        let mut session = Session::new();
        assert_eq!(session.figure().id(), 0);
        assert_eq!(session.figure().id(), 1);
        assert_eq!(session.figure_count(), 2);
        let out = Path::new("out");
        assert_eq!(session.next_output_path(out, "fig"), out.join("fig_0.svg"));
        assert_eq!(session.next_output_path(out, "fig"), out.join("fig_1.svg"));
    }

    #[test]
    fn test_save_svg() {
        let dir = tempfile::tempdir().unwrap();
        let mut fig = figure();
        fig.axis(0, 0).points(diagonal()).unwrap();
        let path = dir.path().join("fig.svg");
        fig.save_svg(&path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"), "{svg}");
        assert!(svg.contains("<circle"));
    }
}
