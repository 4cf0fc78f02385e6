//! Per-node storage of the widget tree.

use std::time::Instant;

use trellis_core::{Axis, Int2, Padding, Rect, WidgetId};

use super::animation::Anim;
use super::flags::{Anchor, WidgetFlags};
use super::traits::{CommandHandler, Widget};

/// Palette index of a background or frame color.
///
/// Colors are resolved by the painter; the tree only stores the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorId(pub u16);

/// Where a node is in its life.
///
/// Reaped nodes are removed from the arena, so there is no variant for them:
/// a reaped id simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Part of the tree (or standalone, waiting to be attached).
    #[default]
    Live,
    /// Destroyed and unlinked from its parent; freed once its visual offset settles.
    Detached,
}

/// Cached rendering of a node, owned by the painter.
///
/// The tree tracks only the size and whether the contents are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBuffer {
    /// Size the buffer was last allocated for.
    pub size: Int2,
    /// Whether the buffer must be repainted before use.
    pub dirty: bool,
}

/// Rendering-only translation of a node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VisualOffset {
    pub(crate) anim: Anim,
    pub(crate) axis: Axis,
}

/// Everything the tree stores for one node.
pub(crate) struct WidgetNode {
    pub(crate) name: String,
    pub(crate) resize_id: Option<String>,
    pub(crate) flags: WidgetFlags,
    pub(crate) anchor: Anchor,
    pub(crate) rect: Rect,
    pub(crate) min_size: Int2,
    pub(crate) padding: Padding,
    pub(crate) bg_color: Option<ColorId>,
    pub(crate) frame_color: Option<ColorId>,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) size_ref: Option<WidgetId>,
    pub(crate) offset_ref: Option<WidgetId>,
    pub(crate) visual_offset: VisualOffset,
    pub(crate) draw_buffer: Option<DrawBuffer>,
    pub(crate) command_handler: Option<CommandHandler>,
    /// Taken out while one of its callbacks runs.
    pub(crate) behavior: Option<Box<dyn Widget>>,
    pub(crate) lifecycle: Lifecycle,
    /// Size before the current arrangement, for size-changed notification.
    pub(crate) old_size: Int2,
    /// Size to restore when a collapsed child of a resizing parent is shown again.
    pub(crate) collapsed_size: Option<Int2>,
}

impl WidgetNode {
    pub(crate) fn new(behavior: Box<dyn Widget>, now: Instant) -> Self {
        Self {
            name: String::new(),
            resize_id: None,
            flags: WidgetFlags::NONE,
            anchor: Anchor::None,
            rect: Rect::ZERO,
            min_size: Int2::ZERO,
            padding: Padding::ZERO,
            bg_color: None,
            frame_color: None,
            parent: None,
            children: Vec::new(),
            size_ref: None,
            offset_ref: None,
            visual_offset: VisualOffset {
                anim: Anim::new(0.0, now),
                axis: Axis::Vertical,
            },
            draw_buffer: None,
            command_handler: None,
            behavior: Some(behavior),
            lifecycle: Lifecycle::Live,
            old_size: Int2::ZERO,
            collapsed_size: None,
        }
    }

    #[inline]
    pub(crate) fn has(&self, flags: WidgetFlags) -> bool {
        self.flags.intersects(flags)
    }

    /// Hidden and flagged to take no space while hidden.
    #[inline]
    pub(crate) fn is_collapsed(&self) -> bool {
        self.flags
            .contains(WidgetFlags::HIDDEN | WidgetFlags::COLLAPSE)
    }

    /// Positioned by its parent.
    #[inline]
    pub(crate) fn is_arranged_pos(&self) -> bool {
        !self.has(WidgetFlags::FIXED_POSITION)
    }

    /// Sized by its parent.
    #[inline]
    pub(crate) fn is_arranged_size(&self) -> bool {
        !self.is_collapsed() && self.is_arranged_pos() && !self.has(WidgetFlags::PARENT_CANNOT_RESIZE)
    }

    /// Takes part in the parent's sizing and sequential placement.
    #[inline]
    pub(crate) fn affects_sizing(&self) -> bool {
        !self.is_collapsed() && self.is_arranged_pos()
    }

    /// Padding in effect for layout.
    #[inline]
    pub(crate) fn effective_padding(&self) -> Padding {
        if self.has(WidgetFlags::UNPADDED) {
            Padding::ZERO
        } else {
            self.padding
        }
    }

    /// Size of the padded interior.
    #[inline]
    pub(crate) fn inner_size(&self) -> Int2 {
        (self.rect.size - self.effective_padding().total()).max(Int2::ZERO)
    }

    pub(crate) fn is_destroy_pending(&self) -> bool {
        self.lifecycle == Lifecycle::Detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Container;

    fn node() -> WidgetNode {
        WidgetNode::new(Box::new(Container), Instant::now())
    }

    #[test]
    fn test_collapse_needs_both_flags() {
        let mut n = node();
        n.flags = WidgetFlags::COLLAPSE;
        assert!(!n.is_collapsed());
        n.flags |= WidgetFlags::HIDDEN;
        assert!(n.is_collapsed());
        assert!(!n.affects_sizing());
        assert!(!n.is_arranged_size());
    }

    #[test]
    fn test_parent_cannot_resize() {
        let mut n = node();
        n.flags = WidgetFlags::PARENT_CANNOT_RESIZE;
        assert!(n.affects_sizing());
        assert!(!n.is_arranged_size());
    }

    #[test]
    fn test_unpadded_inner_size() {
        let mut n = node();
        n.rect = Rect::new(0, 0, 100, 40);
        n.padding = Padding::new(5, 2, 5, 2);
        assert_eq!(n.inner_size(), Int2::new(90, 36));
        n.flags = WidgetFlags::UNPADDED;
        assert_eq!(n.inner_size(), Int2::new(100, 40));
    }
}
