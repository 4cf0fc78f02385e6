//! Flag-driven arrangement of the widget tree.
//!
//! [`WidgetTree::arrange`] recomputes the rectangles of a node and its
//! subtree from the node's current size and the layout flags. It runs four
//! passes:
//!
//! 1. **Reset**: remember every node's size, and zero the extents that
//!    arrangement recomputes from scratch (sizes copied from the parent,
//!    sequential positions, expanding children of resizing parents).
//! 2. **Arrange**: the recursive solver below.
//! 3. **Clamp**: centred nodes are kept inside the root rectangle.
//! 4. **Notify**: nodes whose size changed get [`Widget::size_changed`].
//!
//! The solver handles one node at a time, in this order:
//!
//! - mirror the height of its size reference, copy the parent's inner size
//!   for `RESIZE_TO_PARENT_*`, then apply its [`Anchor`];
//! - when resizing children, fill the off axis (or split evenly when nothing
//!   expands), zeroing collapsed children along the arrangement axis;
//! - let every child arrange itself;
//! - divide the space left by fixed children among the expanding ones
//!   (floor division; the remainder is left unused);
//! - equalize widths to the widest child;
//! - place children sequentially from the padding along the axis;
//! - finally size itself to the padded union of its children for
//!   `ARRANGE_WIDTH` / `ARRANGE_HEIGHT`, re-arranging the direct children
//!   that depend on the new size.
//!
//! [`Widget::size_changed`]: super::Widget::size_changed

use tracing::{trace, warn};
use trellis_core::logging::targets;
use trellis_core::{Axis, Int2, Rect, WidgetId};

use super::flags::{Anchor, WidgetFlags};
use super::tree::WidgetTree;

impl WidgetTree {
    /// Recompute the geometry of `id` and its subtree.
    ///
    /// Idempotent: arranging twice without changes in between yields the
    /// same rectangles. Unknown ids are ignored.
    #[tracing::instrument(skip(self), target = "trellis::widget::layout", level = "trace")]
    pub fn arrange(&mut self, id: WidgetId) {
        if !self.exists(id) {
            return;
        }
        self.reset_arrangement(id);
        self.arrange_node(id);
        self.clamp_centered_in_root(id);
        self.notify_arrangement(id);
        self.needs_redraw = true;
    }

    /// The axis children are placed along, if any.
    fn arrangement_axis(flags: WidgetFlags) -> Option<Axis> {
        if flags.contains(WidgetFlags::ARRANGE_HORIZONTAL) {
            Some(Axis::Horizontal)
        } else if flags.contains(WidgetFlags::ARRANGE_VERTICAL) {
            Some(Axis::Vertical)
        } else {
            None
        }
    }

    fn reset_arrangement(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.old_size = node.rect.size;
        let collapsed = node.is_collapsed();
        if !collapsed {
            if node.has(WidgetFlags::RESIZE_TO_PARENT_WIDTH) {
                node.rect.size.x = 0;
            }
            if node.has(WidgetFlags::RESIZE_TO_PARENT_HEIGHT) {
                node.rect.size.y = 0;
            }
        }
        let flags = node.flags;
        let children = node.children.clone();
        for child in children {
            self.reset_arrangement(child);
            if collapsed {
                continue;
            }
            let node = &mut self.nodes[child];
            if !node.is_arranged_pos() {
                continue;
            }
            if flags.contains(WidgetFlags::ARRANGE_HORIZONTAL) {
                node.rect.pos.x = 0;
            }
            if flags.contains(WidgetFlags::ARRANGE_VERTICAL) {
                node.rect.pos.y = 0;
            }
            if node.has(WidgetFlags::EXPAND) && !node.is_collapsed() {
                if flags.contains(WidgetFlags::RESIZE_WIDTH_OF_CHILDREN)
                    && !node.has(WidgetFlags::FIXED_WIDTH)
                {
                    node.rect.size.x = 0;
                }
                if flags.contains(WidgetFlags::RESIZE_HEIGHT_OF_CHILDREN)
                    && !node.has(WidgetFlags::FIXED_HEIGHT)
                {
                    node.rect.size.y = 0;
                }
            }
        }
    }

    /// Set the width within the minimum, unless fixed. Returns whether it changed.
    pub(crate) fn set_width(&mut self, id: WidgetId, width: i32) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.has(WidgetFlags::FIXED_WIDTH) {
            return false;
        }
        let width = width.max(node.min_size.x).max(0);
        if node.rect.size.x == width {
            return false;
        }
        node.rect.size.x = width;
        true
    }

    /// Set the height within the minimum, unless fixed or mirrored from a
    /// size reference. Returns whether it changed.
    pub(crate) fn set_height(&mut self, id: WidgetId, height: i32) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.size_ref.is_some() || node.has(WidgetFlags::FIXED_HEIGHT) {
            return false;
        }
        let height = height.max(node.min_size.y).max(0);
        if node.rect.size.y == height {
            return false;
        }
        node.rect.size.y = height;
        true
    }

    fn inner_size(&self, id: WidgetId) -> Int2 {
        self.node(id).map_or(Int2::ZERO, |node| node.inner_size())
    }

    /// Union of the non-collapsed children, relative to the node.
    fn bounds_of_children(&self, id: WidgetId) -> Rect {
        let mut bounds: Option<Rect> = None;
        for &child in self.children(id) {
            let Some(node) = self.node(child) else {
                continue;
            };
            if node.is_collapsed() {
                continue;
            }
            let mut rect = node.rect;
            // An ignored axis starts from the origin when nothing is accumulated yet.
            if node.has(WidgetFlags::IGNORE_FOR_PARENT_WIDTH) {
                rect.size.x = 0;
                rect.pos.x = bounds.map_or(0, |acc| acc.pos.x);
            }
            if node.has(WidgetFlags::IGNORE_FOR_PARENT_HEIGHT) {
                rect.size.y = 0;
                rect.pos.y = bounds.map_or(0, |acc| acc.pos.y);
            }
            bounds = Some(match bounds {
                Some(acc) => acc.union(&rect),
                None => rect,
            });
        }
        bounds.unwrap_or(Rect::ZERO)
    }

    fn center_horizontally(&mut self, id: WidgetId) {
        let container = match self.parent(id) {
            Some(parent) => self.inner_size(parent).x,
            None => self.root_size().x,
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect.pos.x = (container - node.rect.size.x) / 2;
        }
    }

    fn move_to_right_edge(&mut self, id: WidgetId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let inner = self.inner_size(parent);
        let node = &mut self.nodes[id];
        node.rect.pos.x = inner.x - node.rect.size.x;
    }

    /// Position from the anchor, then size from the parent.
    fn arrange_self(&mut self, id: WidgetId) {
        let node = &self.nodes[id];
        let flags = node.flags;
        let anchor = node.anchor;
        let parent = node.parent;

        if let Some(reference) = node.size_ref {
            if let Some(height) = self.node(reference).map(|r| r.rect.size.y) {
                self.nodes[id].rect.size.y = height;
                trace!(target: targets::LAYOUT, ?id, height, "mirrored referenced height");
            }
        }

        match anchor {
            Anchor::None => {}
            Anchor::LeftEdge => {
                if let Some(parent) = parent {
                    let left = self.padding(parent).left;
                    self.nodes[id].rect.pos.x = left;
                }
            }
            Anchor::RightEdge => self.move_to_right_edge(id),
            Anchor::BottomEdge => {
                if let Some(parent) = parent {
                    let inner = self.inner_size(parent);
                    let node = &mut self.nodes[id];
                    node.rect.pos.y = (inner.y - node.rect.size.y).max(0);
                }
            }
            Anchor::CenterHorizontal => self.center_horizontally(id),
        }

        if let Some(parent) = parent {
            if flags.contains(WidgetFlags::RESIZE_TO_PARENT_WIDTH | WidgetFlags::ARRANGE_WIDTH) {
                warn!(target: targets::LAYOUT, ?id, "conflicting RESIZE_TO_PARENT_WIDTH and ARRANGE_WIDTH");
            }
            let parent_inner = self.inner_size(parent);
            if flags.contains(WidgetFlags::RESIZE_TO_PARENT_WIDTH) {
                // Never narrower than what the children need.
                let needed = if self.has_flags(parent, WidgetFlags::ARRANGE_WIDTH) {
                    self.bounds_of_children(id).width()
                } else {
                    0
                };
                self.set_width(id, parent_inner.x.max(needed));
            }
            if flags.contains(WidgetFlags::RESIZE_TO_PARENT_HEIGHT) {
                self.set_height(id, parent_inner.y);
            }
        }
    }

    /// Zero collapsed children along the axis, restoring them once shown.
    fn apply_collapse(&mut self, children: &[WidgetId], resizing_axis: Option<Axis>) {
        for &child in children {
            let node = &mut self.nodes[child];
            if node.is_collapsed() {
                let Some(axis) = resizing_axis else {
                    continue;
                };
                if node.collapsed_size.is_none() {
                    node.collapsed_size = Some(node.rect.size);
                }
                node.rect.size.set_along(axis, 0);
                trace!(target: targets::LAYOUT, id = ?child, "collapsed");
            } else if let Some(size) = node.collapsed_size.take() {
                node.rect.size = size;
                trace!(target: targets::LAYOUT, id = ?child, ?size, "restored from collapse");
            }
        }
    }

    /// Inner size minus the extents of the non-expanding children.
    fn space_for_expanding(&self, id: WidgetId, children: &[WidgetId]) -> Int2 {
        let mut avail = self.inner_size(id);
        for &child in children {
            let node = &self.nodes[child];
            if node.affects_sizing() && !node.has(WidgetFlags::EXPAND) {
                avail -= node.rect.size;
            }
        }
        avail.max(Int2::ZERO)
    }

    fn arrange_node(&mut self, id: WidgetId) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.is_collapsed() {
            trace!(target: targets::LAYOUT, ?id, "collapsed, skipped");
            return;
        }
        self.arrange_self(id);

        let node = &self.nodes[id];
        let flags = node.flags;
        let children = node.children.clone();
        if children.is_empty() {
            return;
        }
        let axis = Self::arrangement_axis(flags);
        let resizes_children = flags.intersects(WidgetFlags::RESIZE_CHILDREN);

        self.apply_collapse(&children, axis.filter(|_| resizes_children));

        let sizing: Vec<WidgetId> = children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c].affects_sizing())
            .collect();
        let expanding = sizing
            .iter()
            .filter(|&&c| self.nodes[c].has(WidgetFlags::EXPAND))
            .count() as i32;
        trace!(target: targets::LAYOUT, ?id, children = children.len(), expanding, "arranging");

        if resizes_children {
            let fill_width = flags.contains(WidgetFlags::RESIZE_WIDTH_OF_CHILDREN);
            let fill_height = flags.contains(WidgetFlags::RESIZE_HEIGHT_OF_CHILDREN);
            let inner = self.inner_size(id);
            if expanding > 0 {
                // Non-expanding children keep their extent but fill the off axis.
                for &child in &children {
                    let node = &self.nodes[child];
                    if !node.is_arranged_size() || node.has(WidgetFlags::EXPAND) {
                        continue;
                    }
                    match axis {
                        Some(Axis::Horizontal) if fill_height => {
                            self.set_height(child, inner.y);
                        }
                        Some(Axis::Vertical) if fill_width => {
                            self.set_width(child, inner.x);
                        }
                        _ => {}
                    }
                }
            } else {
                let count = (sizing.len() as i32).max(1);
                let mut each = inner;
                if let Some(axis) = axis {
                    each.set_along(axis, inner.along(axis) / count);
                }
                for &child in &children {
                    if !self.nodes[child].is_arranged_size() {
                        continue;
                    }
                    if fill_width {
                        self.set_width(child, each.x);
                    }
                    if fill_height {
                        self.set_height(child, each.y);
                    }
                }
            }
        }

        for &child in &children {
            self.arrange_node(child);
        }

        if expanding > 0 {
            if let Some(axis) = axis {
                let inner = self.inner_size(id);
                let per_child = self.space_for_expanding(id, &children).along(axis) / expanding;
                trace!(target: targets::LAYOUT, ?id, per_child, "expanding children");
                for &child in &children {
                    let node = &self.nodes[child];
                    if !node.is_arranged_size() || !node.has(WidgetFlags::EXPAND) {
                        continue;
                    }
                    let changed = match axis {
                        Axis::Horizontal => {
                            self.set_width(child, per_child) | self.set_height(child, inner.y)
                        }
                        Axis::Vertical => {
                            self.set_width(child, inner.x) | self.set_height(child, per_child)
                        }
                    };
                    if changed {
                        self.arrange_node(child);
                    }
                }
            }
        }

        if flags.contains(WidgetFlags::RESIZE_CHILDREN_TO_WIDEST_CHILD) {
            let widest = sizing
                .iter()
                .map(|&c| self.nodes[c].rect.size.x)
                .max()
                .unwrap_or(0);
            for &child in &children {
                if self.nodes[child].is_arranged_size() && self.set_width(child, widest) {
                    self.arrange_node(child);
                }
            }
        }

        self.place_children(id, flags, axis, &children);

        if flags.intersects(WidgetFlags::ARRANGE_SIZE) {
            self.arrange_own_size(id, flags, &children);
        }
    }

    /// Sequential placement from the padding.
    fn place_children(&mut self, id: WidgetId, flags: WidgetFlags, axis: Option<Axis>, children: &[WidgetId]) {
        let mut pos = self.padding(id).top_left();
        for &child in children {
            let node = &mut self.nodes[child];
            if node.is_collapsed() || !node.is_arranged_pos() || node.anchor == Anchor::CenterHorizontal {
                continue;
            }
            match axis {
                Some(axis) => {
                    if matches!(node.anchor, Anchor::LeftEdge | Anchor::RightEdge) {
                        continue;
                    }
                    node.rect.pos = pos;
                    pos.set_along(axis, pos.along(axis) + node.rect.size.along(axis));
                }
                None if flags.contains(WidgetFlags::RESIZE_CHILDREN) && node.anchor != Anchor::BottomEdge => {
                    node.rect.pos = pos;
                }
                None if flags.contains(WidgetFlags::RESIZE_WIDTH_OF_CHILDREN) => {
                    node.rect.pos.x = pos.x;
                }
                None => {}
            }
        }
    }

    /// Size to the padded union of the children.
    fn arrange_own_size(&mut self, id: WidgetId, flags: WidgetFlags, children: &[WidgetId]) {
        let bounds = self.bounds_of_children(id).grown(&self.padding(id));
        trace!(target: targets::LAYOUT, ?id, ?bounds, "sizing to children");
        if flags.contains(WidgetFlags::ARRANGE_WIDTH) {
            self.set_width(id, bounds.width());
            for &child in children {
                let node = &self.nodes[child];
                if node.has(WidgetFlags::RESIZE_TO_PARENT_WIDTH) || node.anchor.follows_parent_width() {
                    self.arrange_node(child);
                }
            }
            if self.nodes[id].anchor == Anchor::RightEdge {
                self.move_to_right_edge(id);
            }
        }
        if flags.contains(WidgetFlags::ARRANGE_HEIGHT) {
            self.set_height(id, bounds.height());
            for &child in children {
                let node = &self.nodes[child];
                if node.has(WidgetFlags::RESIZE_TO_PARENT_HEIGHT) || node.anchor.follows_parent_height() {
                    self.arrange_node(child);
                }
            }
        }
        if self.nodes[id].anchor == Anchor::CenterHorizontal {
            self.center_horizontally(id);
        }
    }

    /// Keep horizontally centred nodes that fit inside the root from
    /// sticking out of it.
    fn clamp_centered_in_root(&mut self, id: WidgetId) {
        let root = self.bounds_without_visual_offset(self.root);
        for node in self.subtree(id) {
            if self.anchor(node) != Anchor::CenterHorizontal {
                continue;
            }
            let bounds = self.bounds_without_visual_offset(node);
            if bounds.width() > root.width() {
                continue;
            }
            let mut shift = 0;
            if root.left() > bounds.left() {
                shift = root.left() - bounds.left();
            } else if bounds.right() > root.right() {
                shift = root.right() - bounds.right();
            }
            if shift != 0 {
                self.nodes[node].rect.pos.x += shift;
            }
        }
    }

    /// Run size-changed hooks of live nodes whose size changed.
    fn notify_arrangement(&mut self, id: WidgetId) {
        let changed: Vec<WidgetId> = self
            .subtree(id)
            .into_iter()
            .filter(|&node| {
                self.node(node)
                    .is_some_and(|n| !n.is_destroy_pending() && n.rect.size != n.old_size)
            })
            .collect();
        for node in changed {
            trace!(target: targets::LAYOUT, id = ?node, size = ?self.size(node), "size changed");
            self.with_behavior(node, |behavior, cx| behavior.size_changed(cx));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use trellis_core::Padding;

    use super::*;
    use crate::config::TreeConfig;
    use crate::widget::{Container, Widget, WidgetContext};

    fn tree() -> WidgetTree {
        WidgetTree::new(TreeConfig::default())
    }

    fn child_of(tree: &mut WidgetTree, parent: WidgetId, size: Int2) -> WidgetId {
        let id = tree.create(Container);
        tree.set_size(id, size);
        tree.add_child(parent, id);
        id
    }

    #[test]
    fn test_vertical_arrangement_sizes_to_children() {
        let mut tree = tree();
        let root = tree.root();
        let column = tree.create(Container);
        tree.add_child(root, column);
        tree.set_flags(column, WidgetFlags::ARRANGE_VERTICAL | WidgetFlags::ARRANGE_SIZE, true);
        tree.set_padding(column, Padding::new(4, 2, 4, 2));
        let a = child_of(&mut tree, column, Int2::new(50, 20));
        let b = child_of(&mut tree, column, Int2::new(80, 10));

        tree.arrange(column);
        assert_eq!(tree.rect(a).pos, Int2::new(4, 2));
        assert_eq!(tree.rect(b).pos, Int2::new(4, 22));
        assert_eq!(tree.size(column), Int2::new(88, 34));
    }

    #[test]
    fn test_expand_floor_division() {
        let mut tree = tree();
        let root = tree.root();
        let row = tree.create(Container);
        tree.add_child(root, row);
        tree.set_flags(row, WidgetFlags::ARRANGE_HORIZONTAL, true);
        tree.set_size(row, Int2::new(100, 30));
        let fixed = child_of(&mut tree, row, Int2::new(10, 30));
        let mut expanding = Vec::new();
        for _ in 0..3 {
            let c = child_of(&mut tree, row, Int2::ZERO);
            tree.set_flags(c, WidgetFlags::EXPAND, true);
            expanding.push(c);
        }
        tree.arrange(row);
        // 90 / 3 = 30 each, no remainder
        for &c in &expanding {
            assert_eq!(tree.size(c), Int2::new(30, 30));
        }
        assert_eq!(tree.rect(fixed).pos.x, 0);
        assert_eq!(tree.rect(expanding[2]).pos.x, 70);

        tree.set_size(row, Int2::new(101, 30));
        tree.arrange(row);
        // 91 / 3 truncates to 30; the last pixel stays unused
        for &c in &expanding {
            assert_eq!(tree.size(c).x, 30);
        }
    }

    #[test]
    fn test_even_split_without_expanding_children() {
        let mut tree = tree();
        let root = tree.root();
        let row = tree.create(Container);
        tree.add_child(root, row);
        tree.set_flags(row, WidgetFlags::ARRANGE_HORIZONTAL | WidgetFlags::RESIZE_CHILDREN, true);
        tree.set_size(row, Int2::new(100, 40));
        tree.set_padding(row, Padding::uniform(5));
        let a = child_of(&mut tree, row, Int2::ZERO);
        let b = child_of(&mut tree, row, Int2::ZERO);
        let c = child_of(&mut tree, row, Int2::ZERO);

        tree.arrange(row);
        for &id in &[a, b, c] {
            assert_eq!(tree.size(id), Int2::new(30, 30));
        }
        assert_eq!(tree.rect(c).pos, Int2::new(65, 5));
    }

    #[test]
    fn test_resize_children_fills_off_axis_when_expanding() {
        let mut tree = tree();
        let root = tree.root();
        let column = tree.create(Container);
        tree.add_child(root, column);
        tree.set_flags(column, WidgetFlags::ARRANGE_VERTICAL | WidgetFlags::RESIZE_WIDTH_OF_CHILDREN, true);
        tree.set_size(column, Int2::new(120, 100));
        let header = child_of(&mut tree, column, Int2::new(10, 20));
        let body = child_of(&mut tree, column, Int2::new(10, 10));
        tree.set_flags(body, WidgetFlags::EXPAND, true);

        tree.arrange(column);
        assert_eq!(tree.size(header), Int2::new(120, 20));
        assert_eq!(tree.size(body), Int2::new(120, 80));
        assert_eq!(tree.rect(body).pos.y, 20);
    }

    #[test]
    fn test_widest_child() {
        let mut tree = tree();
        let root = tree.root();
        let menu = tree.create(Container);
        tree.add_child(root, menu);
        tree.set_flags(
            menu,
            WidgetFlags::ARRANGE_VERTICAL
                | WidgetFlags::ARRANGE_SIZE
                | WidgetFlags::RESIZE_CHILDREN_TO_WIDEST_CHILD,
            true,
        );
        let a = child_of(&mut tree, menu, Int2::new(40, 10));
        let b = child_of(&mut tree, menu, Int2::new(90, 10));
        tree.arrange(menu);
        assert_eq!(tree.size(a).x, 90);
        assert_eq!(tree.size(b).x, 90);
        assert_eq!(tree.size(menu), Int2::new(90, 20));
    }

    #[test]
    fn test_fixed_and_min_sizes_win() {
        let mut tree = tree();
        let a = tree.create(Container);
        tree.set_fixed_size(a, Int2::new(30, -1));
        assert!(!tree.set_width(a, 50));
        assert!(tree.set_height(a, 5));
        tree.set_min_size(a, Int2::new(0, 12));
        assert!(tree.set_height(a, 5));
        assert_eq!(tree.size(a), Int2::new(30, 12));
        assert!(!tree.set_height(a, 12));
    }

    #[test]
    fn test_anchors() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        tree.add_child(root, panel);
        tree.set_fixed_size(panel, Int2::new(200, 100));
        tree.set_padding(panel, Padding::uniform(10));
        let left = child_of(&mut tree, panel, Int2::new(20, 20));
        let right = child_of(&mut tree, panel, Int2::new(20, 20));
        let bottom = child_of(&mut tree, panel, Int2::new(20, 30));
        let centered = child_of(&mut tree, panel, Int2::new(40, 20));
        tree.set_anchor(left, Anchor::LeftEdge);
        tree.set_anchor(right, Anchor::RightEdge);
        tree.set_anchor(bottom, Anchor::BottomEdge);
        tree.set_anchor(centered, Anchor::CenterHorizontal);

        tree.arrange(panel);
        assert_eq!(tree.rect(left).pos.x, 10);
        assert_eq!(tree.rect(right).pos.x, 160);
        assert_eq!(tree.rect(bottom).pos.y, 50);
        assert_eq!(tree.rect(centered).pos.x, 70);
    }

    #[test]
    fn test_resize_to_parent() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        tree.add_child(root, panel);
        tree.set_fixed_size(panel, Int2::new(300, 200));
        tree.set_padding(panel, Padding::new(10, 0, 10, 0));
        let bar = child_of(&mut tree, panel, Int2::new(5, 5));
        tree.set_flags(
            bar,
            WidgetFlags::RESIZE_TO_PARENT_WIDTH | WidgetFlags::RESIZE_TO_PARENT_HEIGHT,
            true,
        );
        tree.arrange(panel);
        assert_eq!(tree.size(bar), Int2::new(280, 200));
        tree.arrange(panel);
        assert_eq!(tree.size(bar), Int2::new(280, 200));
    }

    #[test]
    fn test_anchor_applies_before_resize_to_parent() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        tree.add_child(root, panel);
        tree.set_fixed_size(panel, Int2::new(200, 100));
        tree.set_padding(panel, Padding::uniform(10));
        let strip = child_of(&mut tree, panel, Int2::new(20, 20));
        tree.set_anchor(strip, Anchor::RightEdge);
        tree.set_flags(strip, WidgetFlags::RESIZE_TO_PARENT_WIDTH, true);

        // The edge is taken from the reset width, then the width follows the parent.
        tree.arrange(panel);
        assert_eq!(tree.rect(strip).pos.x, 180);
        assert_eq!(tree.size(strip).x, 180);
        tree.arrange(panel);
        assert_eq!(tree.rect(strip).pos.x, 180);
    }

    #[test]
    fn test_standalone_node_centers_on_root() {
        let mut tree = WidgetTree::new(TreeConfig::with_root_size(Int2::new(300, 200)));
        let dialog = tree.create(Container);
        tree.set_size(dialog, Int2::new(60, 20));
        tree.set_anchor(dialog, Anchor::CenterHorizontal);
        tree.arrange(dialog);
        assert_eq!(tree.rect(dialog).pos.x, 120);
    }

    #[test]
    fn test_size_ref_mirrors_height() {
        let mut tree = tree();
        let root = tree.root();
        let source = child_of(&mut tree, root, Int2::new(10, 42));
        let mirror = child_of(&mut tree, root, Int2::new(10, 0));
        tree.set_size_ref(mirror, Some(source));
        tree.arrange(root);
        assert_eq!(tree.size(mirror).y, 42);
        assert!(!tree.set_height(mirror, 5));
    }

    #[test]
    fn test_ignore_for_parent_height() {
        let mut tree = tree();
        let root = tree.root();
        let row = tree.create(Container);
        tree.add_child(root, row);
        tree.set_flags(row, WidgetFlags::ARRANGE_HORIZONTAL | WidgetFlags::ARRANGE_SIZE, true);
        child_of(&mut tree, row, Int2::new(10, 10));
        let tall = child_of(&mut tree, row, Int2::new(10, 90));
        tree.set_flags(tall, WidgetFlags::IGNORE_FOR_PARENT_HEIGHT, true);
        tree.arrange(row);
        assert_eq!(tree.size(row), Int2::new(20, 10));
    }

    #[test]
    fn test_ignored_first_child_starts_union_at_origin() {
        let mut tree = tree();
        let root = tree.root();
        let group = tree.create(Container);
        tree.add_child(root, group);
        tree.set_flags(group, WidgetFlags::ARRANGE_SIZE, true);
        let badge = child_of(&mut tree, group, Int2::new(10, 10));
        tree.set_pos(badge, Int2::new(30, 0));
        tree.set_flags(badge, WidgetFlags::IGNORE_FOR_PARENT_WIDTH, true);
        let label = child_of(&mut tree, group, Int2::new(10, 10));
        tree.set_pos(label, Int2::new(5, 0));

        tree.arrange(group);
        assert_eq!(tree.size(group), Int2::new(15, 10));
    }

    #[test]
    fn test_collapse_in_resizing_parent_restores_size() {
        let mut tree = tree();
        let root = tree.root();
        let column = tree.create(Container);
        tree.add_child(root, column);
        tree.set_flags(
            column,
            WidgetFlags::ARRANGE_VERTICAL
                | WidgetFlags::ARRANGE_HEIGHT
                | WidgetFlags::RESIZE_WIDTH_OF_CHILDREN,
            true,
        );
        tree.set_fixed_size(column, Int2::new(50, -1));
        let a = child_of(&mut tree, column, Int2::new(0, 15));
        let b = child_of(&mut tree, column, Int2::new(0, 25));
        tree.set_flags(b, WidgetFlags::COLLAPSE | WidgetFlags::FIXED_HEIGHT, true);
        tree.arrange(column);
        assert_eq!(tree.size(column).y, 40);

        tree.show_collapsed(b, false);
        assert_eq!(tree.size(b).y, 0);
        assert_eq!(tree.size(column).y, 15);

        tree.show_collapsed(b, true);
        assert_eq!(tree.size(b), Int2::new(50, 25));
        assert_eq!(tree.size(column).y, 40);
        assert_eq!(tree.rect(b).pos.y, 15);
        let _ = a;
    }

    #[test]
    fn test_centered_clamped_into_root() {
        let mut tree = WidgetTree::new(TreeConfig::with_root_size(Int2::new(100, 100)));
        let root = tree.root();
        let holder = tree.create(Container);
        tree.add_child(root, holder);
        tree.set_pos(holder, Int2::new(80, 0));
        tree.set_fixed_size(holder, Int2::new(10, 10));
        let popup = child_of(&mut tree, holder, Int2::new(60, 20));
        tree.set_anchor(popup, Anchor::CenterHorizontal);

        tree.arrange(root);
        let bounds = tree.bounds(popup);
        assert_eq!(bounds.right(), 100);
        assert_eq!(bounds.width(), 60);
    }

    struct Wrapped {
        calls: Rc<Cell<u32>>,
    }

    impl Widget for Wrapped {
        fn size_changed(&mut self, cx: &mut WidgetContext<'_>) {
            self.calls.set(self.calls.get() + 1);
            let width = cx.rect().size.x.max(1);
            let id = cx.id();
            let tree = cx.tree_mut();
            tree.set_size(id, Int2::new(width, 2000 / width));
            cx.arrange_parent();
        }
    }

    #[test]
    fn test_size_changed_hook_reflows_parent() {
        let mut tree = tree();
        let root = tree.root();
        let column = tree.create(Container);
        tree.add_child(root, column);
        tree.set_flags(column, WidgetFlags::ARRANGE_VERTICAL | WidgetFlags::ARRANGE_HEIGHT, true);
        tree.set_fixed_size(column, Int2::new(200, -1));
        let calls = Rc::new(Cell::new(0));
        let text = tree.create(Wrapped { calls: calls.clone() });
        tree.add_child(column, text);
        tree.set_flags(text, WidgetFlags::RESIZE_TO_PARENT_WIDTH, true);

        tree.arrange(column);
        assert_eq!(tree.size(text), Int2::new(200, 10));
        assert_eq!(tree.size(column).y, 10);
        assert_eq!(calls.get(), 1);

        tree.arrange(column);
        assert_eq!(calls.get(), 1);
    }
}
