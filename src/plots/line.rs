//! Polyline plot.
//!
//! Points are joined in row order. With a color aesthetic each segment takes
//! the color of its first point.

use super::{
    blended, blended_display, describe, draw_tooltip, nearest, row_colors, DrawPass, FrameSet,
    SerialisePass,
};
use crate::error::Result;
use crate::geometry::{BBox2, Vec2};
use crate::grammar::{Aesthetic, DataWithAesthetic, Limits, Style};
use crate::layout::FrameInfo;
use crate::render::{AnimatedCanvas, Canvas};

/// Line plot state.
#[derive(Debug, Clone)]
pub struct Line {
    pub(super) frames: FrameSet,
    pub(super) style: Style,
}

fn to_pixels(x: &[f32], y: &[f32], limits: &Limits, pixels: &BBox2) -> Vec<Vec2> {
    x.iter()
        .zip(y)
        .map(|(&x, &y)| {
            Vec2::xy(
                Aesthetic::X.to_display(x, limits, pixels),
                Aesthetic::Y.to_display(y, limits, pixels),
            )
        })
        .collect()
}

fn frame_pixels(data: &DataWithAesthetic, limits: &Limits, pixels: &BBox2) -> Result<Vec<Vec2>> {
    let x = data.values(Aesthetic::X)?;
    let y = data.values(Aesthetic::Y)?;
    Ok(to_pixels(&x, &y, limits, pixels))
}

impl Line {
    pub(super) fn draw<C: Canvas>(&self, canvas: &mut C, pass: &DrawPass<'_>) -> Result<()> {
        let x = blended(pass.above, pass.below, Aesthetic::X, pass.info)?;
        let y = blended(pass.above, pass.below, Aesthetic::Y, pass.info)?;
        let points = to_pixels(&x, &y, pass.limits, pass.pixels);
        if points.is_empty() {
            return Ok(());
        }

        let color = blended_display(
            pass.above,
            pass.below,
            Aesthetic::Color,
            pass.info,
            pass.limits,
            pass.pixels,
        )?;
        let colored = color.is_some();
        let colors = row_colors(color, points.len(), &self.style);

        canvas.stroke_width(self.style.line_width);
        canvas.stroke_dash(self.style.line_style.dash_pattern());
        if colored {
            for (segment, color) in points.windows(2).zip(&colors) {
                canvas.begin_path();
                canvas.move_to(segment[0]);
                canvas.line_to(segment[1]);
                canvas.stroke_color(*color);
                canvas.stroke();
            }
        } else {
            canvas.begin_path();
            canvas.move_to(points[0]);
            for p in &points[1..] {
                canvas.line_to(*p);
            }
            canvas.stroke_color(self.style.color);
            canvas.stroke();
        }
        canvas.stroke_dash(&[]);

        if let Some(mouse) = pass.hover {
            if let Some(i) = nearest(&points, mouse, |_| 2.0 * self.style.line_width) {
                canvas.begin_path();
                canvas.circle(points[i], 2.0 * self.style.line_width);
                canvas.fill_color(colors[i]);
                canvas.fill();
                let text = format!(
                    "{}, {}",
                    describe(pass.above, Aesthetic::X, x[i]),
                    describe(pass.above, Aesthetic::Y, y[i])
                );
                draw_tooltip(canvas, points[i], &text, &self.style);
            }
        }
        Ok(())
    }

    pub(super) fn serialise<C: AnimatedCanvas>(
        &self,
        canvas: &mut C,
        pass: &SerialisePass<'_>,
    ) -> Result<()> {
        if pass.frames.is_empty() {
            return Ok(());
        }
        let frames = pass
            .frames
            .iter()
            .map(|data| frame_pixels(data, pass.limits, pass.pixels))
            .collect::<Result<Vec<_>>>()?;

        canvas.stroke_width(self.style.line_width);
        canvas.stroke_dash(self.style.line_style.dash_pattern());
        // Segment colors are not animated; they come from the first keyframe
        // that maps color.
        if let Some(colored) = pass.frames.iter().find(|f| f.has(Aesthetic::Color)) {
            let display = blended_display(
                colored,
                colored,
                Aesthetic::Color,
                FrameInfo::default(),
                pass.limits,
                pass.pixels,
            )?;
            let rows = colored.rows();
            let colors = row_colors(display, rows, &self.style);
            for (segment, color) in colors.iter().enumerate().take(rows.saturating_sub(1)) {
                canvas.stroke_color(*color);
                canvas.begin_animated_path();
                for (time, points) in pass.times.iter().zip(&frames) {
                    if let Some(pair) = points.get(segment..segment + 2) {
                        canvas.add_animated_path(*time, pair);
                    }
                }
                canvas.end_animated_path(pass.time_span);
            }
        } else {
            canvas.stroke_color(self.style.color);
            canvas.begin_animated_path();
            for (time, points) in pass.times.iter().zip(&frames) {
                canvas.add_animated_path(*time, points);
            }
            canvas.end_animated_path(pass.time_span);
        }
        canvas.stroke_dash(&[]);
        Ok(())
    }
}
