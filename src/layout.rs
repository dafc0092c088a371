//! Drawable layout tree.
//!
//! Every figure, axis and plot owns a node in a [`Layout`] arena. A node's
//! `area` is a fraction of its parent's pixel box; `pixels` is the absolute box
//! recomputed top-down by [`Layout::resize`]. Nodes also carry the animation
//! timeline: sorted keyframe times, the span of the subtree, and the
//! interpolation weights for the current time.

use crate::error::{Error, Result};
use crate::geometry::BBox2;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a node in a [`Layout`].
    pub struct NodeId;
}

/// Interpolation state for one node at one moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Index of the first keyframe at or after the current time.
    pub frame_above: usize,
    /// Weight of frame `frame_above`.
    pub w1: f32,
    /// Weight of frame `frame_above - 1`.
    pub w2: f32,
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self {
            frame_above: 0,
            w1: 1.0,
            w2: 0.0,
        }
    }
}

impl FrameInfo {
    /// True when the current time lands exactly on a keyframe.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.w2 == 0.0
    }

    /// Blend a value of frame `frame_above` with the same value of the
    /// previous frame.
    #[must_use]
    pub fn blend(&self, above: f32, below: f32) -> f32 {
        if self.is_exact() {
            above
        } else {
            self.w1 * above + self.w2 * below
        }
    }
}

/// A region of the drawing surface.
#[derive(Debug, Clone)]
pub struct DrawableNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    area: BBox2,
    pixels: BBox2,
    time_span: f32,
    frame_times: Vec<f32>,
    frame_info: FrameInfo,
}

impl DrawableNode {
    fn new(parent: Option<NodeId>, area: BBox2) -> Self {
        Self {
            parent,
            children: Vec::new(),
            area,
            pixels: area,
            time_span: 0.0,
            frame_times: Vec::new(),
            frame_info: FrameInfo::default(),
        }
    }

    /// Parent node, `None` for a root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Area as a fraction of the parent's pixel box.
    #[must_use]
    pub const fn area(&self) -> &BBox2 {
        &self.area
    }

    /// Absolute pixel box.
    #[must_use]
    pub const fn pixels(&self) -> &BBox2 {
        &self.pixels
    }

    /// Largest keyframe time in this subtree.
    #[must_use]
    pub const fn time_span(&self) -> f32 {
        self.time_span
    }

    /// Keyframe times, strictly increasing.
    #[must_use]
    pub fn frame_times(&self) -> &[f32] {
        &self.frame_times
    }

    /// Interpolation state from the last [`Layout::update_frame_info`].
    #[must_use]
    pub const fn frame_info(&self) -> FrameInfo {
        self.frame_info
    }
}

/// Arena of drawable nodes.
#[derive(Debug, Clone)]
pub struct Layout {
    nodes: SlotMap<NodeId, DrawableNode>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Insert a root covering `pixels`.
    pub fn insert_root(&mut self, pixels: BBox2) -> NodeId {
        let mut node = DrawableNode::new(None, BBox2::from_corners(0.0, 0.0, 1.0, 1.0));
        node.pixels = pixels;
        self.nodes.insert(node)
    }

    /// Insert a child of `parent` covering `area` of the parent's box.
    pub fn insert_child(&mut self, parent: NodeId, area: BBox2) -> NodeId {
        let parent_pixels = self.nodes.get(parent).map(|p| p.pixels);
        let id = self.nodes.insert(DrawableNode::new(Some(parent), area));
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        if let Some(pixels) = parent_pixels {
            self.resize(id, &pixels);
        }
        id
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DrawableNode> {
        self.nodes.get(id)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Absolute pixel box of a node, empty for an unknown id.
    #[must_use]
    pub fn pixels(&self, id: NodeId) -> BBox2 {
        self.nodes.get(id).map_or_else(BBox2::empty, |n| n.pixels)
    }

    /// Change a node's area and cascade the resize to its subtree.
    pub fn set_area(&mut self, id: NodeId, area: BBox2) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.area = area;
        let parent = node.parent;
        if let Some(pixels) = parent.and_then(|p| self.nodes.get(p)).map(|p| p.pixels) {
            self.resize(id, &pixels);
        }
    }

    /// Recompute `pixels = area * parent.delta() + parent.bmin` for `id` and
    /// every descendant, parents before children.
    pub fn resize(&mut self, id: NodeId, parent_pixels: &BBox2) {
        let mut stack = vec![(id, *parent_pixels)];
        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let delta = parent.delta();
            node.pixels = BBox2::new(
                node.area.bmin * delta + parent.bmin,
                node.area.bmax * delta + parent.bmin,
            );
            let pixels = node.pixels;
            stack.extend(node.children.iter().rev().map(|&c| (c, pixels)));
        }
        tracing::trace!(?id, "resized subtree");
    }

    /// Validate a keyframe time without recording it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFrameTime`] for negative or non-finite times and
    /// [`Error::NonIncreasingFrameTime`] unless `time` is after the last
    /// keyframe.
    pub fn check_frame_time(&self, id: NodeId, time: f32) -> Result<()> {
        if !time.is_finite() || time < 0.0 {
            return Err(Error::InvalidFrameTime(time));
        }
        if let Some(&previous) = self.nodes.get(id).and_then(|n| n.frame_times.last()) {
            if time <= previous {
                return Err(Error::NonIncreasingFrameTime { time, previous });
            }
        }
        Ok(())
    }

    /// Record a keyframe time and extend the time span of every ancestor.
    ///
    /// # Errors
    ///
    /// See [`Layout::check_frame_time`].
    pub fn add_frame_time(&mut self, id: NodeId, time: f32) -> Result<()> {
        self.check_frame_time(id, time)?;
        if let Some(node) = self.nodes.get_mut(id) {
            node.frame_times.push(time);
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get_mut(current) else {
                break;
            };
            node.time_span = node.time_span.max(time);
            cursor = node.parent;
        }
        Ok(())
    }

    /// Resolve the keyframe pair bracketing `time` and store it on the node.
    pub fn update_frame_info(&mut self, id: NodeId, time: f32) -> FrameInfo {
        let Some(node) = self.nodes.get_mut(id) else {
            return FrameInfo::default();
        };
        node.frame_info = interpolate(&node.frame_times, time.clamp(0.0, node.time_span.max(0.0)));
        node.frame_info
    }

    /// Interpolation state from the last update.
    #[must_use]
    pub fn frame_info(&self, id: NodeId) -> FrameInfo {
        self.nodes.get(id).map(|n| n.frame_info).unwrap_or_default()
    }

    /// Largest keyframe time under `id`.
    #[must_use]
    pub fn time_span(&self, id: NodeId) -> f32 {
        self.nodes.get(id).map_or(0.0, |n| n.time_span)
    }
}

fn interpolate(times: &[f32], time: f32) -> FrameInfo {
    if times.is_empty() {
        return FrameInfo::default();
    }
    let above = times.partition_point(|&t| t < time).min(times.len() - 1);
    if above == 0 || time >= times[above] {
        return FrameInfo {
            frame_above: above,
            w1: 1.0,
            w2: 0.0,
        };
    }
    let w1 = (time - times[above - 1]) / (times[above] - times[above - 1]);
    FrameInfo {
        frame_above: above,
        w1,
        w2: 1.0 - w1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn timed(times: &[f32]) -> (Layout, NodeId) {
        let mut layout = Layout::new();
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, 100.0, 100.0));
        let child = layout.insert_child(root, BBox2::from_corners(0.0, 0.0, 1.0, 1.0));
        for &t in times {
            layout.add_frame_time(child, t).expect("frame time");
        }
        (layout, child)
    }

    #[test]
    fn test_child_pixels_from_area() {
        let mut layout = Layout::new();
        let root = layout.insert_root(BBox2::from_corners(10.0, 20.0, 210.0, 120.0));
        let child = layout.insert_child(root, BBox2::from_corners(0.5, 0.0, 1.0, 0.5));
        assert_eq!(
            layout.pixels(child),
            BBox2::from_corners(110.0, 20.0, 210.0, 70.0)
        );
    }

    #[test]
    fn test_resize_cascades_and_is_idempotent() {
        let mut layout = Layout::new();
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, 100.0, 100.0));
        let a = layout.insert_child(root, BBox2::from_corners(0.0, 0.0, 0.5, 0.5));
        let b = layout.insert_child(a, BBox2::from_corners(0.5, 0.5, 1.0, 1.0));
        let viewport = BBox2::from_corners(0.0, 0.0, 400.0, 200.0);
        layout.resize(root, &viewport);
        let first = layout.pixels(b);
        layout.resize(root, &viewport);
        assert_eq!(layout.pixels(b), first);
        assert_eq!(first, BBox2::from_corners(100.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn test_set_area() {
        let mut layout = Layout::new();
        let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, 100.0, 100.0));
        let a = layout.insert_child(root, BBox2::from_corners(0.0, 0.0, 1.0, 1.0));
        layout.set_area(a, BBox2::from_corners(0.25, 0.25, 0.75, 0.75));
        assert_eq!(
            layout.pixels(a),
            BBox2::from_corners(25.0, 25.0, 75.0, 75.0)
        );
        assert_eq!(layout.get(root).map(|n| n.children().len()), Some(1));
    }

    #[test]
    fn test_frame_time_propagates_to_root() {
        let (layout, child) = timed(&[0.0, 1.0, 2.5]);
        let root = layout.get(child).and_then(DrawableNode::parent).expect("parent");
        assert_relative_eq!(layout.time_span(root), 2.5);
        assert_eq!(layout.get(child).map(|n| n.frame_times().len()), Some(3));
    }

    #[test]
    fn test_frame_time_must_increase() {
        let (mut layout, child) = timed(&[0.0, 1.0]);
        let err = layout.add_frame_time(child, 1.0).unwrap_err();
        assert!(matches!(err, Error::NonIncreasingFrameTime { .. }));
        for bad in [-1.0, f32::NAN] {
            let err = layout.add_frame_time(child, bad).unwrap_err();
            assert!(matches!(err, Error::InvalidFrameTime(_)));
        }
        assert_eq!(layout.get(child).map(|n| n.frame_times().len()), Some(2));
    }

    #[test]
    fn test_frame_info_first_frame() {
        let (mut layout, child) = timed(&[0.0, 1.0, 2.0]);
        let info = layout.update_frame_info(child, 0.0);
        assert_eq!(info, FrameInfo::default());
    }

    #[test]
    fn test_frame_info_midpoint() {
        let (mut layout, child) = timed(&[0.0, 1.0, 2.0]);
        let info = layout.update_frame_info(child, 0.5);
        assert_eq!(info.frame_above, 1);
        assert_relative_eq!(info.w1, 0.5);
        assert_relative_eq!(info.w2, 0.5);
        assert_eq!(layout.frame_info(child), info);
    }

    #[test]
    fn test_frame_info_exact_keyframe() {
        let (mut layout, child) = timed(&[0.0, 1.0, 2.0]);
        let info = layout.update_frame_info(child, 2.0);
        assert_eq!(info.frame_above, 2);
        assert!(info.is_exact());
    }

    #[test]
    fn test_frame_info_clamps() {
        let (mut layout, child) = timed(&[0.0, 1.0, 2.0]);
        assert_eq!(layout.update_frame_info(child, 9.0).frame_above, 2);
        assert_eq!(layout.update_frame_info(child, -3.0).frame_above, 0);
    }

    #[test]
    fn test_frame_info_no_frames() {
        let (mut layout, child) = timed(&[]);
        assert_eq!(layout.update_frame_info(child, 1.0), FrameInfo::default());
    }

    #[test]
    fn test_blend() {
        let info = FrameInfo {
            frame_above: 1,
            w1: 0.25,
            w2: 0.75,
        };
        assert_relative_eq!(info.blend(4.0, 0.0), 1.0);
        assert_relative_eq!(FrameInfo::default().blend(4.0, 0.0), 4.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        /// Invariant: weights are in [0, 1] and sum to one.
        #[test]
        fn prop_weights_normalised(
            steps in prop::collection::vec(0.01f32..5.0, 1..20),
            time in -10.0f32..200.0,
        ) {
            let mut layout = Layout::new();
            let root = layout.insert_root(BBox2::from_corners(0.0, 0.0, 1.0, 1.0));
            let mut t = 0.0;
            for step in steps {
                layout.add_frame_time(root, t).expect("increasing");
                t += step;
            }
            let info = layout.update_frame_info(root, time);
            prop_assert!((0.0..=1.0).contains(&info.w1));
            prop_assert!((0.0..=1.0).contains(&info.w2));
            prop_assert!((info.w1 + info.w2 - 1.0).abs() < 1e-5);
        }
    }
}
