//! Frame painting.
//!
//! The tree does not draw anything itself. [`WidgetTree::paint`] walks the
//! nodes in paint order and hands each drawable one to its behavior's
//! [`Widget::paint`](super::Widget::paint), which issues primitives through a
//! [`Painter`] supplied by the renderer.
//!
//! # Paint order
//!
//! 1. The root and, recursively, every drawn child in insertion order
//!    (parents before children). Members of the on-top stack are skipped
//!    here.
//! 2. Destroyed nodes whose outgoing visual offset is still running.
//! 3. The on-top stack, bottom first.
//!
//! A hidden node is drawn only while its visual offset runs.

use trellis_core::logging::targets;
use trellis_core::{Rect, WidgetId};

use super::base::ColorId;
use super::flags::WidgetFlags;
use super::tree::WidgetTree;

/// Drawing primitives the tree needs from a renderer.
///
/// Rectangles are in window coordinates, visual offsets applied.
pub trait Painter {
    /// Fill `rect` with the palette color `color`.
    fn fill_rect(&mut self, rect: Rect, color: ColorId);

    /// Stroke the outline of `rect` with the palette color `color`.
    fn draw_frame(&mut self, rect: Rect, color: ColorId);
}

/// Access to the tree and the painter on behalf of one node.
pub struct PaintContext<'a> {
    tree: &'a WidgetTree,
    id: WidgetId,
    painter: &'a mut dyn Painter,
}

impl<'a> PaintContext<'a> {
    /// The node being painted.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn tree(&self) -> &WidgetTree {
        self.tree
    }

    /// Window rectangle of the node.
    pub fn bounds(&self) -> Rect {
        self.tree.bounds(self.id)
    }

    pub fn painter(&mut self) -> &mut dyn Painter {
        &mut *self.painter
    }

    /// Fill the background and stroke the frame, as flags and colors allow.
    pub fn paint_background(&mut self) {
        let flags = self.tree.flags(self.id);
        let bounds = self.bounds();
        if !flags.contains(WidgetFlags::NO_BACKGROUND) {
            if let Some(color) = self.tree.background_color(self.id) {
                let mut rect = bounds;
                if flags.contains(WidgetFlags::DRAW_BACKGROUND_TO_BOTTOM) {
                    let bottom = self.tree.bounds(self.tree.root()).bottom();
                    rect.size.y = rect.size.y.max(bottom - rect.top());
                }
                self.painter.fill_rect(rect, color);
            }
        }
        if !flags.contains(WidgetFlags::FRAMELESS) {
            if let Some(color) = self.tree.frame_color(self.id) {
                self.painter.draw_frame(bounds, color);
            }
        }
    }

    /// Paint the drawn children in insertion order, leaving out those the
    /// on-top stack paints.
    ///
    /// An on-top child that left the stack by being hidden is still drawn
    /// here while its visual offset runs.
    pub fn paint_children(&mut self) {
        let tree = self.tree;
        for &child in tree.children(self.id) {
            if !tree.is_drawn(child) || tree.on_top.contains(child) {
                continue;
            }
            tree.paint_node(child, &mut *self.painter);
        }
    }
}

impl WidgetTree {
    /// Paint one frame.
    pub fn paint(&self, painter: &mut dyn Painter) {
        self.paint_node(self.root, painter);
        for &id in &self.pending {
            if self.has_flags(id, WidgetFlags::VISUAL_OFFSET) && self.is_drawn(id) {
                self.paint_node(id, painter);
            }
        }
        for &id in self.on_top.entries() {
            if self.is_drawn(id) {
                self.paint_node(id, painter);
            }
        }
        tracing::trace!(target: targets::TREE, on_top = self.on_top.entries().len(), "painted frame");
    }

    /// Paint `id` through its behavior.
    pub(crate) fn paint_node(&self, id: WidgetId, painter: &mut dyn Painter) {
        let Some(behavior) = self.node(id).and_then(|node| node.behavior.as_deref()) else {
            return;
        };
        let mut cx = PaintContext {
            tree: self,
            id,
            painter,
        };
        behavior.paint(&mut cx);
    }
}
