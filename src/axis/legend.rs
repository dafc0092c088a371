//! Legend box listing labelled plots.

use crate::color::Rgba;
use crate::geometry::{BBox2, Vec2};
use crate::grammar::Theme;
use crate::plots::Geometry;
use crate::render::{Align, Canvas};

const PADDING: f32 = 6.0;
const SWATCH: f32 = 10.0;
const MARGIN: f32 = 10.0;

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Plot label.
    pub label: String,
    /// Swatch color.
    pub color: Rgba,
}

/// Entries for every plot with a label, in plot order.
#[must_use]
pub fn entries(plots: &[Geometry]) -> Vec<LegendEntry> {
    plots
        .iter()
        .filter_map(|p| {
            let style = p.style();
            style.label.as_ref().map(|label| LegendEntry {
                label: label.clone(),
                color: style.color,
            })
        })
        .collect()
}

/// Draw the legend in the top-right corner of `panel`.
pub fn draw<C: Canvas>(canvas: &mut C, entries: &[LegendEntry], panel: &BBox2, theme: &Theme) {
    if entries.is_empty() {
        return;
    }
    let row_height = theme.font_size + 4.0;
    let longest = entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let text_width = longest as f32 * 0.6 * theme.font_size;
    let size = Vec2::xy(
        3.0 * PADDING + SWATCH + text_width,
        2.0 * PADDING + row_height * entries.len() as f32,
    );
    let origin = Vec2::xy(panel.bmax.x() - MARGIN - size.x(), panel.bmin.y() + MARGIN);
    let bounds = BBox2::new(origin, origin + size);

    canvas.begin_path();
    canvas.rect(&bounds);
    canvas.fill_color(theme.background.with_alpha(220));
    canvas.fill();
    canvas.stroke_color(theme.axis_color);
    canvas.stroke_width(theme.axis_width);
    canvas.stroke();

    canvas.font_face(&theme.font_face);
    canvas.font_size(theme.font_size);
    for (i, entry) in entries.iter().enumerate() {
        let centre_y = origin.y() + PADDING + row_height * (i as f32 + 0.5);
        let swatch_min = Vec2::xy(origin.x() + PADDING, centre_y - 0.5 * SWATCH);
        canvas.begin_path();
        canvas.rect(&BBox2::new(swatch_min, swatch_min + Vec2::splat(SWATCH)));
        canvas.fill_color(entry.color);
        canvas.fill();

        canvas.fill_color(theme.text_color);
        let anchor = Vec2::xy(origin.x() + 2.0 * PADDING + SWATCH, centre_y);
        canvas.text(anchor, &entry.label, Align::LEFT_MIDDLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Style;
    use crate::layout::NodeId;
    use crate::output::RecordingCanvas;

    #[test]
    fn test_entries_skip_unlabelled() {
        let plots = vec![
            Geometry::line(NodeId::default(), Style::default().label("a")),
            Geometry::points(NodeId::default(), Style::default()),
            Geometry::line(
                NodeId::default(),
                Style::default().color(Rgba::RED).label("c"),
            ),
        ];
        let entries = entries(&plots);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[1],
            LegendEntry {
                label: "c".to_string(),
                color: Rgba::RED
            }
        );
    }

    #[test]
    fn test_draw_legend() {
        let panel = BBox2::from_corners(0.0, 0.0, 200.0, 200.0);
        let mut canvas = RecordingCanvas::new(200.0, 200.0);
        let entries = vec![LegendEntry {
            label: "series".to_string(),
            color: Rgba::BLUE,
        }];
        draw(&mut canvas, &entries, &panel, &Theme::default());
        assert_eq!(canvas.texts(), vec!["series"]);

        let mut empty = RecordingCanvas::new(200.0, 200.0);
        draw(&mut empty, &[], &panel, &Theme::default());
        assert!(empty.calls().is_empty());
    }
}
