//! Behavior and layout flags of a widget node.
//!
//! [`WidgetFlags`] is a plain 64-bit set. The four mutually exclusive
//! self-positioning rules (left edge, right edge, bottom edge, horizontal
//! centering) are not flags but the separate [`Anchor`] value, so a node
//! cannot be anchored two ways at once.
//!
//! ```
//! use trellis::widget::WidgetFlags;
//!
//! let flags = WidgetFlags::ARRANGE_HORIZONTAL | WidgetFlags::RESIZE_CHILDREN;
//! assert!(flags.contains(WidgetFlags::RESIZE_WIDTH_OF_CHILDREN));
//! assert!(flags.intersects(WidgetFlags::ARRANGE_HORIZONTAL | WidgetFlags::ARRANGE_VERTICAL));
//! ```

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Set of widget flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WidgetFlags(u64);

impl WidgetFlags {
    /// No flags.
    pub const NONE: WidgetFlags = WidgetFlags(0);

    // ========================================================================
    // Visibility and interaction
    // ========================================================================

    /// Not drawn, does not receive pointer events.
    pub const HIDDEN: WidgetFlags = WidgetFlags(1 << 0);
    /// Does not receive keyboard or pointer events.
    pub const DISABLED: WidgetFlags = WidgetFlags(1 << 1);
    /// Takes the hover slot when the pointer moves over it.
    pub const HOVER: WidgetFlags = WidgetFlags(1 << 2);
    /// Can hold keyboard focus.
    pub const FOCUSABLE: WidgetFlags = WidgetFlags(1 << 3);
    /// Boundary for tab-order cycling.
    pub const FOCUS_ROOT: WidgetFlags = WidgetFlags(1 << 4);
    /// Kept in the always-on-top stack while visible.
    pub const KEEP_ON_TOP: WidgetFlags = WidgetFlags(1 << 5);
    /// Swallows every pointer event so nothing beneath receives it.
    pub const MOUSE_MODAL: WidgetFlags = WidgetFlags(1 << 6);
    /// Posts `mouse.clicked` for presses and releases inside it.
    pub const COMMAND_ON_CLICK: WidgetFlags = WidgetFlags(1 << 7);
    /// Posts `mouse.missed` for presses outside it.
    pub const COMMAND_ON_MOUSE_MISS: WidgetFlags = WidgetFlags(1 << 8);
    /// Always a hit-test target.
    pub const HITTABLE: WidgetFlags = WidgetFlags(1 << 9);
    /// Never a hit-test target.
    pub const UNHITTABLE: WidgetFlags = WidgetFlags(1 << 10);
    /// Treated as hidden unless it or its parent is hovered.
    pub const VISIBLE_ON_PARENT_HOVER: WidgetFlags = WidgetFlags(1 << 11);
    /// Selected state, for collaborators that draw it.
    pub const SELECTED: WidgetFlags = WidgetFlags(1 << 12);
    /// Pressed state, for collaborators that draw it.
    pub const PRESSED: WidgetFlags = WidgetFlags(1 << 13);

    // ========================================================================
    // Arrangement
    // ========================================================================

    /// Place children left to right.
    pub const ARRANGE_HORIZONTAL: WidgetFlags = WidgetFlags(1 << 16);
    /// Place children top to bottom.
    pub const ARRANGE_VERTICAL: WidgetFlags = WidgetFlags(1 << 17);
    /// Take own width from the children's union.
    pub const ARRANGE_WIDTH: WidgetFlags = WidgetFlags(1 << 18);
    /// Take own height from the children's union.
    pub const ARRANGE_HEIGHT: WidgetFlags = WidgetFlags(1 << 19);
    /// Take own size from the children's union.
    pub const ARRANGE_SIZE: WidgetFlags = WidgetFlags((1 << 18) | (1 << 19));
    /// Size children's widths to fill the interior.
    pub const RESIZE_WIDTH_OF_CHILDREN: WidgetFlags = WidgetFlags(1 << 20);
    /// Size children's heights to fill the interior.
    pub const RESIZE_HEIGHT_OF_CHILDREN: WidgetFlags = WidgetFlags(1 << 21);
    /// Size children to fill the interior.
    pub const RESIZE_CHILDREN: WidgetFlags = WidgetFlags((1 << 20) | (1 << 21));
    /// Receives a share of the space left over by fixed siblings.
    pub const EXPAND: WidgetFlags = WidgetFlags(1 << 22);
    /// Width never changes by layout.
    pub const FIXED_WIDTH: WidgetFlags = WidgetFlags(1 << 23);
    /// Height never changes by layout.
    pub const FIXED_HEIGHT: WidgetFlags = WidgetFlags(1 << 24);
    /// Size never changes by layout.
    pub const FIXED_SIZE: WidgetFlags = WidgetFlags((1 << 23) | (1 << 24));
    /// Position is set explicitly and never by the parent.
    pub const FIXED_POSITION: WidgetFlags = WidgetFlags(1 << 25);
    /// Every child gets the width of the widest child.
    pub const RESIZE_CHILDREN_TO_WIDEST_CHILD: WidgetFlags = WidgetFlags(1 << 26);
    /// Width follows the parent's interior width.
    pub const RESIZE_TO_PARENT_WIDTH: WidgetFlags = WidgetFlags(1 << 27);
    /// Height follows the parent's interior height.
    pub const RESIZE_TO_PARENT_HEIGHT: WidgetFlags = WidgetFlags(1 << 28);
    /// Takes no space while hidden.
    pub const COLLAPSE: WidgetFlags = WidgetFlags(1 << 29);
    /// Excluded from the parent's width when the parent sizes itself.
    pub const IGNORE_FOR_PARENT_WIDTH: WidgetFlags = WidgetFlags(1 << 30);
    /// Excluded from the parent's height when the parent sizes itself.
    pub const IGNORE_FOR_PARENT_HEIGHT: WidgetFlags = WidgetFlags(1 << 31);
    /// The parent never changes this node's size.
    pub const PARENT_CANNOT_RESIZE: WidgetFlags = WidgetFlags(1 << 32);
    /// Padding is ignored.
    pub const UNPADDED: WidgetFlags = WidgetFlags(1 << 33);

    // ========================================================================
    // Drawing and animation
    // ========================================================================

    /// Background extends to the bottom of the root, and so does hit-testing.
    pub const DRAW_BACKGROUND_TO_BOTTOM: WidgetFlags = WidgetFlags(1 << 40);
    /// Background color is not painted.
    pub const NO_BACKGROUND: WidgetFlags = WidgetFlags(1 << 41);
    /// Frame color is not painted.
    pub const FRAMELESS: WidgetFlags = WidgetFlags(1 << 42);
    /// A visual offset is applied, or still animating.
    pub const VISUAL_OFFSET: WidgetFlags = WidgetFlags(1 << 43);

    const NAMES: &[(WidgetFlags, &'static str)] = &[
        (Self::HIDDEN, "hidden"),
        (Self::DISABLED, "disabled"),
        (Self::HOVER, "hover"),
        (Self::FOCUSABLE, "focusable"),
        (Self::FOCUS_ROOT, "focusRoot"),
        (Self::KEEP_ON_TOP, "keepOnTop"),
        (Self::MOUSE_MODAL, "mouseModal"),
        (Self::COMMAND_ON_CLICK, "commandOnClick"),
        (Self::COMMAND_ON_MOUSE_MISS, "commandOnMouseMiss"),
        (Self::HITTABLE, "hittable"),
        (Self::UNHITTABLE, "unhittable"),
        (Self::VISIBLE_ON_PARENT_HOVER, "visibleOnParentHover"),
        (Self::SELECTED, "selected"),
        (Self::PRESSED, "pressed"),
        (Self::ARRANGE_HORIZONTAL, "arrangeHorizontal"),
        (Self::ARRANGE_VERTICAL, "arrangeVertical"),
        (Self::ARRANGE_WIDTH, "arrangeWidth"),
        (Self::ARRANGE_HEIGHT, "arrangeHeight"),
        (Self::RESIZE_WIDTH_OF_CHILDREN, "resizeWidthOfChildren"),
        (Self::RESIZE_HEIGHT_OF_CHILDREN, "resizeHeightOfChildren"),
        (Self::EXPAND, "expand"),
        (Self::FIXED_WIDTH, "fixedWidth"),
        (Self::FIXED_HEIGHT, "fixedHeight"),
        (Self::FIXED_POSITION, "fixedPosition"),
        (Self::RESIZE_CHILDREN_TO_WIDEST_CHILD, "resizeChildrenToWidestChild"),
        (Self::RESIZE_TO_PARENT_WIDTH, "resizeToParentWidth"),
        (Self::RESIZE_TO_PARENT_HEIGHT, "resizeToParentHeight"),
        (Self::COLLAPSE, "collapse"),
        (Self::IGNORE_FOR_PARENT_WIDTH, "ignoreForParentWidth"),
        (Self::IGNORE_FOR_PARENT_HEIGHT, "ignoreForParentHeight"),
        (Self::PARENT_CANNOT_RESIZE, "parentCannotResize"),
        (Self::UNPADDED, "unpadded"),
        (Self::DRAW_BACKGROUND_TO_BOTTOM, "drawBackgroundToBottom"),
        (Self::NO_BACKGROUND, "noBackground"),
        (Self::FRAMELESS, "frameless"),
        (Self::VISUAL_OFFSET, "visualOffset"),
    ];

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: WidgetFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any flag in `other` is set.
    #[inline]
    pub const fn intersects(self, other: WidgetFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set or clear `other`.
    #[inline]
    pub fn set(&mut self, other: WidgetFlags, on: bool) {
        if on {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    /// Names of the set flags, for debug output.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for WidgetFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        WidgetFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WidgetFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for WidgetFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        WidgetFlags(self.0 & rhs.0)
    }
}

impl Not for WidgetFlags {
    type Output = Self;

    fn not(self) -> Self::Output {
        WidgetFlags(!self.0)
    }
}

/// Self-positioning rule applied before a node's children are arranged.
///
/// An anchored node is skipped when its parent places children in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// Positioned by the parent.
    #[default]
    None,
    /// x is the parent's left padding.
    LeftEdge,
    /// x puts the right edge at the parent's interior width.
    RightEdge,
    /// y puts the bottom edge at the parent's interior height.
    BottomEdge,
    /// Centered horizontally in the parent's interior, or in the root when unparented.
    CenterHorizontal,
}

impl Anchor {
    /// Whether this anchor depends on the parent's width.
    #[inline]
    pub fn follows_parent_width(self) -> bool {
        matches!(self, Self::LeftEdge | Self::RightEdge | Self::CenterHorizontal)
    }

    /// Whether this anchor depends on the parent's height.
    #[inline]
    pub fn follows_parent_height(self) -> bool {
        matches!(self, Self::BottomEdge)
    }
}
