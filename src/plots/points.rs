//! Scatter plot.

use super::{
    blended, blended_display, describe, draw_tooltip, nearest, row_colors, DrawPass, FrameSet,
    SerialisePass,
};
use crate::error::Result;
use crate::geometry::{BBox2, Vec2};
use crate::grammar::{Aesthetic, DataWithAesthetic, Limits, Style};
use crate::layout::FrameInfo;
use crate::render::{AnimatedCanvas, Canvas};

/// Scatter plot state.
#[derive(Debug, Clone)]
pub struct Points {
    pub(super) frames: FrameSet,
    pub(super) style: Style,
}

/// One marker in pixel space.
struct Marker {
    centre: Vec2,
    radius: f32,
}

impl Points {
    fn markers(
        &self,
        above: &DataWithAesthetic,
        below: &DataWithAesthetic,
        info: FrameInfo,
        limits: &Limits,
        pixels: &BBox2,
    ) -> Result<(Vec<Marker>, Vec<f32>, Vec<f32>)> {
        let x = blended(above, below, Aesthetic::X, info)?;
        let y = blended(above, below, Aesthetic::Y, info)?;
        let sizes = blended_display(above, below, Aesthetic::Size, info, limits, pixels)?;
        let markers = x
            .iter()
            .zip(&y)
            .enumerate()
            .map(|(i, (&x, &y))| Marker {
                centre: Vec2::xy(
                    Aesthetic::X.to_display(x, limits, pixels),
                    Aesthetic::Y.to_display(y, limits, pixels),
                ),
                radius: sizes.as_ref().map_or(self.style.point_size, |s| s[i]),
            })
            .collect();
        Ok((markers, x, y))
    }

    fn tooltip_text(data: &DataWithAesthetic, x: f32, y: f32, row: usize) -> String {
        let mut text = format!(
            "{}, {}",
            describe(data, Aesthetic::X, x),
            describe(data, Aesthetic::Y, y)
        );
        for aes in [Aesthetic::Color, Aesthetic::Size] {
            if let Some(value) = data.value(aes, row).ok().flatten() {
                text.push_str(&format!(" {}={}", aes.name(), describe(data, aes, value)));
            }
        }
        text
    }

    pub(super) fn draw<C: Canvas>(&self, canvas: &mut C, pass: &DrawPass<'_>) -> Result<()> {
        let (markers, x, y) =
            self.markers(pass.above, pass.below, pass.info, pass.limits, pass.pixels)?;
        let color = blended_display(
            pass.above,
            pass.below,
            Aesthetic::Color,
            pass.info,
            pass.limits,
            pass.pixels,
        )?;
        let colors = row_colors(color, markers.len(), &self.style);

        for (marker, color) in markers.iter().zip(&colors) {
            canvas.begin_path();
            canvas.circle(marker.centre, marker.radius);
            canvas.fill_color(*color);
            canvas.fill();
        }

        if let Some(mouse) = pass.hover {
            let centres: Vec<Vec2> = markers.iter().map(|m| m.centre).collect();
            let threshold = |i: usize| markers[i].radius.max(2.0 * self.style.line_width);
            if let Some(i) = nearest(&centres, mouse, threshold) {
                canvas.begin_path();
                canvas.circle(markers[i].centre, markers[i].radius + 2.0);
                canvas.stroke_color(self.style.color.with_alpha(255));
                canvas.stroke_width(self.style.line_width);
                canvas.stroke();
                let text = Self::tooltip_text(pass.above, x[i], y[i], i);
                draw_tooltip(canvas, markers[i].centre, &text, &self.style);
            }
        }
        Ok(())
    }

    pub(super) fn serialise<C: AnimatedCanvas>(
        &self,
        canvas: &mut C,
        pass: &SerialisePass<'_>,
    ) -> Result<()> {
        let mut frames = Vec::with_capacity(pass.frames.len());
        for data in pass.frames {
            let info = FrameInfo::default();
            let (markers, x, y) = self.markers(data, data, info, pass.limits, pass.pixels)?;
            let color =
                blended_display(data, data, Aesthetic::Color, info, pass.limits, pass.pixels)?;
            let colors = row_colors(color, markers.len(), &self.style);
            frames.push((markers, colors, x, y));
        }
        let Some((first, ..)) = frames.first() else {
            return Ok(());
        };

        for row in 0..first.len() {
            let (_, _, x, y) = &frames[0];
            canvas.set_tooltip(&Self::tooltip_text(&pass.frames[0], x[row], y[row], row));
            for (time, (markers, colors, ..)) in pass.times.iter().zip(&frames) {
                if let (Some(marker), Some(color)) = (markers.get(row), colors.get(row)) {
                    canvas.add_animated_circle(*time, marker.centre, marker.radius, *color);
                }
            }
            canvas.end_animated_circle(pass.time_span);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{BBox2, Vec2};
    use crate::grammar::{create_data, Limits, Style};
    use crate::layout::Layout;
    use crate::output::{DrawCall, RecordingCanvas};
    use crate::plots::{Geometry, PlotContext};

    fn ctx() -> PlotContext {
        PlotContext {
            limits: Limits::new([0.0; 5].into(), [10.0; 5].into()),
            pixels: BBox2::from_corners(0.0, 0.0, 100.0, 100.0),
        }
    }

    fn scatter(layout: &mut Layout) -> Geometry {
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, 100.0, 100.0));
        let node = layout.insert_child(root, BBox2::unit());
        let mut g = Geometry::points(node, Style::default());
        let f0 = create_data()
            .x(&[1.0, 5.0])
            .and_then(|d| d.y(&[1.0, 5.0]))
            .unwrap();
        let f1 = create_data()
            .x(&[3.0, 5.0])
            .and_then(|d| d.y(&[1.0, 9.0]))
            .unwrap();
        g.add_frame(layout, f0, 0.0).unwrap();
        g.add_frame(layout, f1, 1.0).unwrap();
        g
    }

    #[test]
    fn test_points_draw_markers() {
        let mut layout = Layout::new();
        let g = scatter(&mut layout);
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        g.draw(&mut canvas, &mut layout, &ctx(), 0.5).unwrap();
        let marker = DrawCall::Circle {
            centre: Vec2::xy(20.0, 90.0),
            radius: 4.0,
        };
        assert!(canvas.calls().contains(&marker));
        assert_eq!(canvas.count(|c| matches!(c, DrawCall::Fill)), 2);
    }

    #[test]
    fn test_points_size_aesthetic() {
        let mut layout = Layout::new();
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, 100.0, 100.0));
        let node = layout.insert_child(root, BBox2::unit());
        let mut g = Geometry::points(node, Style::default());
        let data = create_data()
            .x(&[1.0, 2.0])
            .and_then(|d| d.y(&[1.0, 2.0]))
            .and_then(|d| d.size(&[0.0, 1.0]))
            .unwrap();
        g.add_frame(&mut layout, data, 0.0).unwrap();
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        g.draw(&mut canvas, &mut layout, &ctx(), 0.0).unwrap();
        let radii: Vec<f32> = canvas
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Circle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii.len(), 2);
        assert!(radii[0] < radii[1]);
    }

    #[test]
    fn test_points_hover() {
        let mut layout = Layout::new();
        let g = scatter(&mut layout);
        let mouse = Vec2::xy(51.0, 50.0);
        let mut canvas = RecordingCanvas::new(100.0, 100.0).with_mouse(mouse);
        g.draw(&mut canvas, &mut layout, &ctx(), 0.0).unwrap();
        assert_eq!(canvas.texts(), vec!["5, 5"]);
    }

    #[test]
    fn test_points_serialise_tooltip_per_marker() {
        let mut layout = Layout::new();
        let g = scatter(&mut layout);
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        g.serialise(&mut canvas, &layout, &ctx(), 1.0).unwrap();
        assert_eq!(canvas.count(|c| matches!(c, DrawCall::Tooltip(_))), 2);
        assert_eq!(
            canvas.count(|c| matches!(c, DrawCall::AnimatedCircle { .. })),
            4
        );
        let ends = canvas.count(|c| {
            matches!(c, DrawCall::EndAnimatedCircle { time_span } if *time_span == 1.0)
        });
        assert_eq!(ends, 2);
    }
}
