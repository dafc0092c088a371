//! SVG output.
//!
//! [`SvgCanvas`] records canvas calls as SVG elements. Animated elements are
//! written with `<animate>` children whose `keyTimes` are keyframe times
//! divided by the loop span, so the file plays back without any runtime
//! besides the browser. Tooltips are shown by a small embedded script.

use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{BBox2, Vec2};
use crate::render::{Align, AnimatedCanvas, Canvas, HAlign, Transform2D, VAlign};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const TOOLTIP_SCRIPT: &str = r#"<script type="text/ecmascript"><![CDATA[
(function () {
  var tip = document.getElementById('mv-tooltip');
  var label = document.getElementById('mv-tooltip-text');
  var svg = tip.ownerSVGElement;
  function show(evt) {
    var p = svg.createSVGPoint();
    p.x = evt.clientX; p.y = evt.clientY;
    p = p.matrixTransform(svg.getScreenCTM().inverse());
    label.textContent = evt.currentTarget.getAttribute('data-tooltip');
    tip.setAttribute('transform', 'translate(' + (p.x + 10) + ',' + (p.y - 10) + ')');
    tip.setAttribute('visibility', 'visible');
  }
  function hide() { tip.setAttribute('visibility', 'hidden'); }
  var els = document.querySelectorAll('[data-tooltip]');
  for (var i = 0; i < els.length; i++) {
    els[i].addEventListener('mousemove', show);
    els[i].addEventListener('mouseout', hide);
  }
})();
]]></script>"#;

#[derive(Debug, Clone)]
struct DrawState {
    stroke: Rgba,
    fill: Rgba,
    stroke_width: f32,
    dash: Vec<f32>,
    font_size: f32,
    font_face: String,
    transform: Transform2D,
    clip: Option<usize>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            stroke: Rgba::BLACK,
            fill: Rgba::BLACK,
            stroke_width: 1.0,
            dash: Vec::new(),
            font_size: 12.0,
            font_face: "sans-serif".to_string(),
            transform: Transform2D::IDENTITY,
            clip: None,
        }
    }
}

/// Keyframes of the animated element under construction.
#[derive(Debug, Clone)]
struct Keyframes<T> {
    frames: Vec<(f32, T)>,
}

impl<T> Default for Keyframes<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T> Keyframes<T> {
    fn push(&mut self, time: f32, value: T) {
        self.frames.push((time, value));
    }

    fn take(&mut self) -> Vec<(f32, T)> {
        std::mem::take(&mut self.frames)
    }
}

/// SVG backend implementing [`Canvas`] and [`AnimatedCanvas`].
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f32,
    height: f32,
    background: Option<Rgba>,
    defs: String,
    body: String,
    path: String,
    state: DrawState,
    clip_count: usize,
    tooltip: Option<String>,
    paths: Keyframes<String>,
    circles: Keyframes<(Vec2, f32, Rgba)>,
    rects: Keyframes<(BBox2, Rgba)>,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl SvgCanvas {
    /// Create a canvas of the given pixel size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            defs: String::new(),
            body: String::with_capacity(4096),
            path: String::new(),
            state: DrawState::default(),
            clip_count: 0,
            tooltip: None,
            paths: Keyframes::default(),
            circles: Keyframes::default(),
            rects: Keyframes::default(),
        }
    }

    /// Set the background color (`None` for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::xy(self.width, self.height)
    }

    /// Render the complete document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 2048);

        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        );

        if !self.defs.is_empty() {
            let _ = writeln!(svg, "  <defs>\n{}  </defs>", self.defs);
        }

        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_css()
            );
        }

        svg.push_str(&self.body);

        svg.push_str(r#"  <g id="mv-tooltip" visibility="hidden" pointer-events="none">"#);
        svg.push_str(
            "<rect x=\"-4\" y=\"-14\" width=\"120\" height=\"20\" rx=\"3\" \
             fill=\"rgba(255,255,255,0.9)\" stroke=\"rgb(80,80,80)\"/>",
        );
        svg.push_str(
            r#"<text id="mv-tooltip-text" font-size="12" font-family="sans-serif"></text></g>"#,
        );
        svg.push('\n');
        svg.push_str(TOOLTIP_SCRIPT);
        svg.push_str("\n</svg>\n");
        svg
    }

    /// Write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }

    /// Attributes shared by every element: transform, clip and tooltip.
    fn common_attrs(&mut self) -> String {
        let mut attrs = String::new();
        if !self.state.transform.is_identity() {
            let _ = write!(attrs, r#" transform="{}""#, self.state.transform.to_svg());
        }
        if let Some(clip) = self.state.clip {
            let _ = write!(attrs, r#" clip-path="url(#mv-clip{clip})""#);
        }
        if let Some(tip) = self.tooltip.take() {
            let _ = write!(attrs, r#" data-tooltip="{}""#, escape(&tip));
        }
        attrs
    }

    fn stroke_attrs(&self) -> String {
        let mut attrs = format!(
            r#" stroke="{}" stroke-width="{}""#,
            self.state.stroke.to_css(),
            self.state.stroke_width
        );
        if !self.state.dash.is_empty() {
            let dash: Vec<String> = self.state.dash.iter().map(ToString::to_string).collect();
            let _ = write!(attrs, r#" stroke-dasharray="{}""#, dash.join(","));
        }
        attrs
    }
}

/// Escape XML special characters.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Normalised `keyTimes` and matching values, padded so the list starts at 0
/// and ends at 1.
fn key_times<T: Clone>(frames: &[(f32, T)], time_span: f32) -> (String, Vec<T>) {
    let mut times: Vec<f32> = frames
        .iter()
        .map(|(t, _)| (t / time_span).clamp(0.0, 1.0))
        .collect();
    let mut values: Vec<T> = frames.iter().map(|(_, v)| v.clone()).collect();
    if times.first().is_some_and(|&t| t > 0.0) {
        times.insert(0, 0.0);
        values.insert(0, values[0].clone());
    }
    if times.last().is_some_and(|&t| t < 1.0) {
        times.push(1.0);
        values.push(values[values.len() - 1].clone());
    }
    let times: Vec<String> = times.iter().map(ToString::to_string).collect();
    (times.join(";"), values)
}

fn animate(attribute: &str, values: &[String], key_times: &str, time_span: f32) -> String {
    format!(
        "<animate attributeName=\"{attribute}\" values=\"{}\" keyTimes=\"{key_times}\" \
         dur=\"{time_span}s\" repeatCount=\"indefinite\"/>",
        values.join(";")
    )
}

fn column<T>(values: &[T], f: impl Fn(&T) -> String) -> Vec<String> {
    values.iter().map(f).collect()
}

fn is_animated<T>(frames: &[(f32, T)], time_span: f32) -> bool {
    frames.len() > 1 && time_span > 0.0
}

fn polyline_data(points: &[Vec2]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{},{} ", p.x(), p.y());
    }
    d.trim_end().to_string()
}

impl Canvas for SvgCanvas {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, p: Vec2) {
        let _ = write!(self.path, "M{},{} ", p.x(), p.y());
    }

    fn line_to(&mut self, p: Vec2) {
        let _ = write!(self.path, "L{},{} ", p.x(), p.y());
    }

    fn close_path(&mut self) {
        self.path.push_str("Z ");
    }

    fn stroke(&mut self) {
        let d = self.path.trim_end().to_string();
        let stroke = self.stroke_attrs();
        let common = self.common_attrs();
        let _ = writeln!(
            self.body,
            r#"  <path d="{d}" fill="none"{stroke}{common}/>"#
        );
    }

    fn fill(&mut self) {
        let d = self.path.trim_end().to_string();
        let fill = self.state.fill.to_css();
        let common = self.common_attrs();
        let _ = writeln!(self.body, r#"  <path d="{d}" fill="{fill}"{common}/>"#);
    }

    fn circle(&mut self, centre: Vec2, radius: f32) {
        let (x, y) = (centre.x(), centre.y());
        let _ = write!(
            self.path,
            "M{},{y} A{radius},{radius} 0 1 0 {},{y} A{radius},{radius} 0 1 0 {},{y} Z ",
            x - radius,
            x + radius,
            x - radius
        );
    }

    fn rect(&mut self, bounds: &BBox2) {
        let _ = write!(
            self.path,
            "M{},{} H{} V{} H{} Z ",
            bounds.bmin.x(),
            bounds.bmin.y(),
            bounds.bmax.x(),
            bounds.bmax.y(),
            bounds.bmin.x()
        );
    }

    fn rounded_rect(&mut self, bounds: &BBox2, radius: f32) {
        let r = radius
            .min(0.5 * bounds.width().abs())
            .min(0.5 * bounds.height().abs())
            .max(0.0);
        let (x0, y0, x1, y1) = (bounds.bmin.x(), bounds.bmin.y(), bounds.bmax.x(), bounds.bmax.y());
        let _ = write!(
            self.path,
            "M{},{y0} H{} A{r},{r} 0 0 1 {x1},{} V{} A{r},{r} 0 0 1 {},{y1} \
             H{} A{r},{r} 0 0 1 {x0},{} V{} A{r},{r} 0 0 1 {},{y0} Z ",
            x0 + r,
            x1 - r,
            y0 + r,
            y1 - r,
            x1 - r,
            x0 + r,
            y1 - r,
            y0 + r,
            x0 + r
        );
    }

    fn text(&mut self, position: Vec2, text: &str, align: Align) {
        let anchor = match align.h {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        };
        let baseline = match align.v {
            VAlign::Top => "hanging",
            VAlign::Middle => "middle",
            VAlign::Bottom => "text-after-edge",
            VAlign::Baseline => "auto",
        };
        let fill = self.state.fill.to_css();
        let size = self.state.font_size;
        let face = escape(&self.state.font_face);
        let common = self.common_attrs();
        let _ = writeln!(
            self.body,
            "  <text x=\"{}\" y=\"{}\" font-size=\"{size}\" font-family=\"{face}\" \
             fill=\"{fill}\" text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\"{common}>\
             {}</text>",
            position.x(),
            position.y(),
            escape(text)
        );
    }

    fn stroke_color(&mut self, color: Rgba) {
        self.state.stroke = color;
    }

    fn fill_color(&mut self, color: Rgba) {
        self.state.fill = color;
    }

    fn stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width;
    }

    fn stroke_dash(&mut self, pattern: &[f32]) {
        self.state.dash = pattern.to_vec();
    }

    fn font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    fn font_face(&mut self, face: &str) {
        self.state.font_face = face.to_string();
    }

    fn scissor(&mut self, bounds: &BBox2) {
        let id = self.clip_count;
        self.clip_count += 1;
        let _ = writeln!(
            self.defs,
            "    <clipPath id=\"mv-clip{id}\">\
             <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
            bounds.bmin.x(),
            bounds.bmin.y(),
            bounds.width(),
            bounds.height()
        );
        self.state.clip = Some(id);
    }

    fn reset_scissor(&mut self) {
        self.state.clip = None;
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform.then(&Transform2D::translation(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform.then(&Transform2D::rotation(angle));
    }

    fn reset_transform(&mut self) {
        self.state.transform = Transform2D::IDENTITY;
    }
}

impl AnimatedCanvas for SvgCanvas {
    fn begin_animated_path(&mut self) {
        self.paths.take();
    }

    fn add_animated_path(&mut self, time: f32, points: &[Vec2]) {
        self.paths.push(time, polyline_data(points));
    }

    fn end_animated_path(&mut self, time_span: f32) {
        let frames = self.paths.take();
        let Some((_, first)) = frames.first() else {
            return;
        };
        let stroke = self.stroke_attrs();
        let common = self.common_attrs();
        if !is_animated(&frames, time_span) {
            let _ = writeln!(
                self.body,
                r#"  <path d="{first}" fill="none"{stroke}{common}/>"#
            );
            return;
        }
        let (times, values) = key_times(&frames, time_span);
        let _ = writeln!(
            self.body,
            "  <path d=\"{first}\" fill=\"none\"{stroke}{common}>\n    {}\n  </path>",
            animate("d", &values, &times, time_span)
        );
    }

    fn add_animated_circle(&mut self, time: f32, centre: Vec2, radius: f32, fill: Rgba) {
        self.circles.push(time, (centre, radius, fill));
    }

    fn end_animated_circle(&mut self, time_span: f32) {
        let frames = self.circles.take();
        let Some(&(_, (c, r, fill))) = frames.first() else {
            return;
        };
        let common = self.common_attrs();
        let open = format!(
            r#"  <circle cx="{}" cy="{}" r="{r}" fill="{}"{common}"#,
            c.x(),
            c.y(),
            fill.to_css()
        );
        if !is_animated(&frames, time_span) {
            let _ = writeln!(self.body, "{open}/>");
            return;
        }
        let (times, values) = key_times(&frames, time_span);
        let cx = column(&values, |v| v.0.x().to_string());
        let cy = column(&values, |v| v.0.y().to_string());
        let radii = column(&values, |v| v.1.to_string());
        let fills = column(&values, |v| v.2.to_css());
        let _ = writeln!(
            self.body,
            "{open}>\n    {}\n    {}\n    {}\n    {}\n  </circle>",
            animate("cx", &cx, &times, time_span),
            animate("cy", &cy, &times, time_span),
            animate("r", &radii, &times, time_span),
            animate("fill", &fills, &times, time_span),
        );
    }

    fn add_animated_rect(&mut self, time: f32, bounds: &BBox2, fill: Rgba) {
        self.rects.push(time, (*bounds, fill));
    }

    fn end_animated_rect(&mut self, time_span: f32) {
        let frames = self.rects.take();
        let Some(&(_, (b, fill))) = frames.first() else {
            return;
        };
        let common = self.common_attrs();
        let open = format!(
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"{common}"#,
            b.bmin.x(),
            b.bmin.y(),
            b.width(),
            b.height(),
            fill.to_css()
        );
        if !is_animated(&frames, time_span) {
            let _ = writeln!(self.body, "{open}/>");
            return;
        }
        let (times, values) = key_times(&frames, time_span);
        let x = column(&values, |v| v.0.bmin.x().to_string());
        let y = column(&values, |v| v.0.bmin.y().to_string());
        let width = column(&values, |v| v.0.width().to_string());
        let height = column(&values, |v| v.0.height().to_string());
        let fills = column(&values, |v| v.1.to_css());
        let _ = writeln!(
            self.body,
            "{open}>\n    {}\n    {}\n    {}\n    {}\n    {}\n  </rect>",
            animate("x", &x, &times, time_span),
            animate("y", &y, &times, time_span),
            animate("width", &width, &times, time_span),
            animate("height", &height, &times, time_span),
            animate("fill", &fills, &times, time_span),
        );
    }

    fn set_tooltip(&mut self, text: &str) {
        self.tooltip = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_canvas_new() {
        let svg = SvgCanvas::new(200.0, 100.0).render();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="200""#));
        assert!(svg.contains(r#"height="100""#));
        assert!(svg.contains("<script"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_stroked_path() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.stroke_color(Rgba::RED);
        c.stroke_width(2.0);
        c.begin_path();
        c.move_to(Vec2::xy(0.0, 0.0));
        c.line_to(Vec2::xy(10.0, 20.0));
        c.stroke();
        let svg = c.render();
        let path = r#"<path d="M0,0 L10,20" fill="none" stroke="rgb(255,0,0)" stroke-width="2"/>"#;
        assert!(svg.contains(path));
    }

    #[test]
    fn test_svg_filled_rect() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.fill_color(Rgba::BLUE);
        c.begin_path();
        c.rect(&BBox2::from_corners(1.0, 2.0, 3.0, 4.0));
        c.fill();
        assert!(c.render().contains(r#"d="M1,2 H3 V4 H1 Z" fill="rgb(0,0,255)""#));
    }

    #[test]
    fn test_svg_text_escaping() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.text(Vec2::xy(5.0, 5.0), "a<b & \"c\"", Align::CENTER_TOP);
        let svg = c.render();
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"dominant-baseline="hanging""#));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgCanvas::new(10.0, 10.0).background(None).render();
        assert!(!svg.contains(r#"width="100%""#));
    }

    #[test]
    fn test_svg_scissor_clip_path() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.scissor(&BBox2::from_corners(0.0, 0.0, 50.0, 50.0));
        c.begin_path();
        c.circle(Vec2::xy(10.0, 10.0), 2.0);
        c.fill();
        c.reset_scissor();
        c.begin_path();
        c.circle(Vec2::xy(10.0, 10.0), 2.0);
        c.fill();
        let svg = c.render();
        assert!(svg.contains(r#"<clipPath id="mv-clip0">"#));
        assert_eq!(svg.matches(r#"clip-path="url(#mv-clip0)""#).count(), 1);
    }

    #[test]
    fn test_svg_transform_attribute() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.translate(Vec2::xy(5.0, 6.0));
        c.text(Vec2::xy(0.0, 0.0), "t", Align::default());
        c.reset_transform();
        c.text(Vec2::xy(0.0, 0.0), "u", Align::default());
        let svg = c.render();
        assert_eq!(svg.matches(r#"transform="matrix(1,0,0,1,5,6)""#).count(), 1);
    }

    #[test]
    fn test_svg_dash() {
        let mut c = SvgCanvas::new(10.0, 10.0);
        c.stroke_dash(&[4.0, 2.0]);
        c.begin_path();
        c.move_to(Vec2::xy(0.0, 0.0));
        c.line_to(Vec2::xy(1.0, 1.0));
        c.stroke();
        assert!(c.render().contains(r#"stroke-dasharray="4,2""#));
    }

    #[test]
    fn test_animated_path_key_times() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.begin_animated_path();
        c.add_animated_path(0.0, &[Vec2::xy(0.0, 0.0), Vec2::xy(1.0, 1.0)]);
        c.add_animated_path(1.0, &[Vec2::xy(0.0, 2.0), Vec2::xy(1.0, 3.0)]);
        c.add_animated_path(2.0, &[Vec2::xy(0.0, 4.0), Vec2::xy(1.0, 5.0)]);
        c.end_animated_path(2.0);
        let svg = c.render();
        assert!(svg.contains(r#"attributeName="d""#));
        assert!(svg.contains(r#"keyTimes="0;0.5;1""#));
        assert!(svg.contains(r#"values="M0,0 L1,1;M0,2 L1,3;M0,4 L1,5""#));
        assert!(svg.contains(r#"dur="2s" repeatCount="indefinite""#));
    }

    #[test]
    fn test_animated_circle_padded_to_span() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.add_animated_circle(1.0, Vec2::xy(1.0, 1.0), 2.0, Rgba::RED);
        c.add_animated_circle(2.0, Vec2::xy(3.0, 1.0), 2.0, Rgba::BLUE);
        c.end_animated_circle(4.0);
        let svg = c.render();
        assert!(svg.contains(r#"keyTimes="0;0.25;0.5;1""#));
        assert!(svg.contains(r#"values="1;1;3;3""#));
        let fills = "rgb(255,0,0);rgb(255,0,0);rgb(0,0,255);rgb(0,0,255)";
        assert!(svg.contains(&format!(r#"attributeName="fill" values="{fills}""#)));
    }

    #[test]
    fn test_single_keyframe_is_static() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.add_animated_rect(0.0, &BBox2::from_corners(0.0, 0.0, 2.0, 3.0), Rgba::RED);
        c.end_animated_rect(0.0);
        let svg = c.render();
        assert!(svg.contains(r#"<rect x="0" y="0" width="2" height="3" fill="rgb(255,0,0)"/>"#));
        assert!(!svg.contains("<animate"));
    }

    #[test]
    fn test_tooltip_attached_once() {
        let mut c = SvgCanvas::new(100.0, 100.0);
        c.set_tooltip("x: 1 & y: 2");
        c.add_animated_circle(0.0, Vec2::xy(1.0, 1.0), 2.0, Rgba::RED);
        c.end_animated_circle(0.0);
        c.add_animated_circle(0.0, Vec2::xy(2.0, 1.0), 2.0, Rgba::RED);
        c.end_animated_circle(0.0);
        let svg = c.render();
        assert_eq!(svg.matches("data-tooltip=").count(), 1);
        assert!(svg.contains(r#"data-tooltip="x: 1 &amp; y: 2""#));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");
        SvgCanvas::new(10.0, 10.0).write_to_file(&path).expect("write");
        let written = std::fs::read_to_string(&path).expect("read");
        assert!(written.contains("<svg"));
    }
}
