//! Axis-aligned rectangles given by `xmin`, `ymin`, `xmax` and `ymax`.

use super::{
    blended, blended_display, describe, draw_tooltip, pixel_box, row_colors, DrawPass, FrameSet,
    SerialisePass,
};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{BBox2, Vec2};
use crate::grammar::{Aesthetic, DataWithAesthetic, Limits, Style};
use crate::layout::FrameInfo;
use crate::render::{AnimatedCanvas, Canvas};

/// Rectangle plot state.
#[derive(Debug, Clone)]
pub struct Rectangle {
    pub(super) frames: FrameSet,
    pub(super) style: Style,
}

const CORNERS: [Aesthetic; 4] = [
    Aesthetic::Xmin,
    Aesthetic::Ymin,
    Aesthetic::Xmax,
    Aesthetic::Ymax,
];

impl Rectangle {
    fn shapes(
        &self,
        above: &DataWithAesthetic,
        below: &DataWithAesthetic,
        info: FrameInfo,
        limits: &Limits,
        pixels: &BBox2,
    ) -> Result<(Vec<BBox2>, Vec<Rgba>)> {
        let [x0, y0, x1, y1] = CORNERS.map(|aes| blended(above, below, aes, info));
        let (x0, y0, x1, y1) = (x0?, y0?, x1?, y1?);
        let boxes: Vec<BBox2> = (0..x0.len())
            .map(|i| pixel_box(limits, pixels, x0[i], y0[i], x1[i], y1[i]))
            .collect();
        let fill = blended_display(above, below, Aesthetic::Fill, info, limits, pixels)?;
        let colors = row_colors(fill, boxes.len(), &self.style);
        Ok((boxes, colors))
    }

    fn tooltip_text(data: &DataWithAesthetic, row: usize) -> Result<String> {
        let mut parts = Vec::with_capacity(CORNERS.len());
        for aes in CORNERS.into_iter().chain([Aesthetic::Fill]) {
            if let Some(value) = data.value(aes, row)? {
                parts.push(format!("{}={}", aes.name(), describe(data, aes, value)));
            }
        }
        Ok(parts.join(" "))
    }

    pub(super) fn draw<C: Canvas>(&self, canvas: &mut C, pass: &DrawPass<'_>) -> Result<()> {
        let (boxes, colors) =
            self.shapes(pass.above, pass.below, pass.info, pass.limits, pass.pixels)?;
        for (bounds, color) in boxes.iter().zip(&colors) {
            canvas.begin_path();
            canvas.rect(bounds);
            canvas.fill_color(*color);
            canvas.fill();
        }

        if let Some(mouse) = pass.hover {
            // Later rectangles are drawn on top.
            if let Some(row) = boxes.iter().rposition(|b| b.contains(&mouse)) {
                canvas.begin_path();
                canvas.rect(&boxes[row]);
                canvas.stroke_color(self.style.color.with_alpha(255));
                canvas.stroke_width(self.style.line_width);
                canvas.stroke();
                let text = Self::tooltip_text(pass.above, row)?;
                let anchor = Vec2::xy(boxes[row].centre().x(), boxes[row].bmin.y());
                draw_tooltip(canvas, anchor, &text, &self.style);
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
                self.shapes(data, data, FrameInfo::default(), pass.limits, pass.pixels)
            })
            .collect::<Result<Vec<_>>>()?;
        let (Some((first, _)), Some(first_data)) = (frames.first(), pass.frames.first()) else {
            return Ok(());
        };

        for row in 0..first.len() {
            canvas.set_tooltip(&Self::tooltip_text(first_data, row)?);
            for (time, (boxes, colors)) in pass.times.iter().zip(&frames) {
                if let (Some(bounds), Some(color)) = (boxes.get(row), colors.get(row)) {
                    canvas.add_animated_rect(*time, bounds, *color);
                }
            }
            canvas.end_animated_rect(pass.time_span);
        }
        Ok(())
    }
}
