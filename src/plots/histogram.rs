//! Histogram plot.
//!
//! Frames are binned by [`Transform::BinX`](crate::grammar::Transform::BinX)
//! when they are added, so x holds bin centres and y holds counts. Every bar
//! spans its bin and rises from zero.

use super::{blended, draw_tooltip, pixel_box, DrawPass, FrameSet, SerialisePass};
use crate::axis::format_significant;
use crate::error::Result;
use crate::geometry::{BBox2, Vec2};
use crate::grammar::{Aesthetic, DataWithAesthetic, Limits, Style};
use crate::layout::FrameInfo;
use crate::render::{AnimatedCanvas, Canvas};

/// Histogram state.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub(super) frames: FrameSet,
    pub(super) style: Style,
}

/// One bar in data and pixel space.
struct Bar {
    lo: f32,
    hi: f32,
    count: f32,
    bounds: BBox2,
}

impl Bar {
    fn tooltip(&self) -> String {
        format!(
            "[{}, {}): {}",
            format_significant(self.lo, 4),
            format_significant(self.hi, 4),
            format_significant(self.count, 4)
        )
    }
}

/// Half the bin width of a binned frame.
fn half_width(data: &DataWithAesthetic) -> f32 {
    let rows = data.rows();
    if rows == 0 {
        return 0.0;
    }
    let limits = data.limits();
    0.5 * (limits.bmax[0] - limits.bmin[0]) / rows as f32
}

fn bars(
    above: &DataWithAesthetic,
    below: &DataWithAesthetic,
    info: FrameInfo,
    limits: &Limits,
    pixels: &BBox2,
) -> Result<Vec<Bar>> {
    let x = blended(above, below, Aesthetic::X, info)?;
    let y = blended(above, below, Aesthetic::Y, info)?;
    let half = info.blend(half_width(above), half_width(below));
    Ok(x
        .iter()
        .zip(&y)
        .map(|(&x, &count)| Bar {
            lo: x - half,
            hi: x + half,
            count,
            bounds: pixel_box(limits, pixels, x - half, 0.0, x + half, count),
        })
        .collect())
}

impl Histogram {
    pub(super) fn draw<C: Canvas>(&self, canvas: &mut C, pass: &DrawPass<'_>) -> Result<()> {
        let bars = bars(pass.above, pass.below, pass.info, pass.limits, pass.pixels)?;
        canvas.fill_color(self.style.color);
        for bar in &bars {
            canvas.begin_path();
            canvas.rect(&bar.bounds);
            canvas.fill();
        }

        if let Some(mouse) = pass.hover {
            if let Some(bar) = bars.iter().find(|b| b.bounds.contains(&mouse)) {
                canvas.begin_path();
                canvas.rect(&bar.bounds);
                canvas.stroke_color(self.style.color.with_alpha(255));
                canvas.stroke_width(self.style.line_width);
                canvas.stroke();
                let anchor = Vec2::xy(bar.bounds.centre().x(), bar.bounds.bmin.y());
                draw_tooltip(canvas, anchor, &bar.tooltip(), &self.style);
            }
        }
        Ok(())
    }

    pub(super) fn serialise<C: AnimatedCanvas>(
        &self,
        canvas: &mut C,
        pass: &SerialisePass<'_>,
    ) -> Result<()> {
        let frames = pass
            .frames
            .iter()
            .map(|data| {
                bars(data, data, FrameInfo::default(), pass.limits, pass.pixels)
            })
            .collect::<Result<Vec<_>>>()?;
        let Some(first) = frames.first() else {
            return Ok(());
        };

        for (i, bar) in first.iter().enumerate() {
            canvas.set_tooltip(&bar.tooltip());
            for (time, bars) in pass.times.iter().zip(&frames) {
                if let Some(bar) = bars.get(i) {
                    canvas.add_animated_rect(*time, &bar.bounds, self.style.color);
                }
            }
            canvas.end_animated_rect(pass.time_span);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{BBox2, Vec2};
    use crate::grammar::{create_data, Limits, Style, Transform};
    use crate::layout::Layout;
    use crate::output::{DrawCall, RecordingCanvas};
    use crate::plots::{Geometry, PlotContext};

    fn ctx() -> PlotContext {
        PlotContext {
            limits: Limits::new([0.0; 5].into(), [4.0; 5].into()),
            pixels: BBox2::from_corners(0.0, 0.0, 100.0, 100.0),
        }
    }

    fn histogram(layout: &mut Layout) -> Geometry {
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, 100.0, 100.0));
        let node = layout.insert_child(root, BBox2::unit());
        let transform = Transform::BinX {
            span: Some((0.0, 4.0)),
            bins: Some(2),
        };
        let mut g = Geometry::histogram(node, Style::default(), transform);
        let f0 = create_data().x(&[0.5, 1.0, 3.0]).unwrap();
        let f1 = create_data().x(&[2.5, 3.0, 3.5, 1.0]).unwrap();
        g.add_frame(layout, f0, 0.0).unwrap();
        g.add_frame(layout, f1, 1.0).unwrap();
        g
    }

    fn rects(canvas: &RecordingCanvas) -> Vec<BBox2> {
        canvas
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Rect(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_histogram_bars_span_bins() {
        let mut layout = Layout::new();
        let g = histogram(&mut layout);
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        g.draw(&mut canvas, &mut layout, &ctx(), 0.0).unwrap();
        let bars = rects(&canvas);
        assert_eq!(
            bars,
            vec![
                BBox2::from_corners(0.0, 50.0, 50.0, 100.0),
                BBox2::from_corners(50.0, 75.0, 100.0, 100.0),
            ]
        );
    }

    #[test]
    fn test_histogram_interpolates_counts() {
        let mut layout = Layout::new();
        let g = histogram(&mut layout);
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        g.draw(&mut canvas, &mut layout, &ctx(), 0.5).unwrap();
        let bars = rects(&canvas);
        // Second bin goes from 1 to 3 counts.
        assert!((bars[1].bmin.y() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_histogram_hover() {
        let mut layout = Layout::new();
        let g = histogram(&mut layout);
        let mut canvas = RecordingCanvas::new(100.0, 100.0).with_mouse(Vec2::xy(25.0, 90.0));
        g.draw(&mut canvas, &mut layout, &ctx(), 0.0).unwrap();
        assert_eq!(canvas.texts(), vec!["[0, 2): 2"]);
    }

    #[test]
    fn test_histogram_serialise() {
        let mut layout = Layout::new();
        let g = histogram(&mut layout);
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        g.serialise(&mut canvas, &layout, &ctx(), 1.0).unwrap();
        assert_eq!(
            canvas.count(|c| matches!(c, DrawCall::AnimatedRect { .. })),
            4
        );
        assert_eq!(
            canvas.count(|c| matches!(c, DrawCall::EndAnimatedRect { .. })),
            2
        );
    }
}
