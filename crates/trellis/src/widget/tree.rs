//! The widget tree: node storage, structure, flags and coordinates.
//!
//! [`WidgetTree`] is the UI context for one display surface. It owns every
//! node in an arena keyed by [`WidgetId`], together with the state that is
//! unique per surface: focus, hover, mouse grab, the on-top stack, the
//! pending-destruction set and the command queue. Nothing here is global, so
//! independent trees (and independent tests) never share state.
//!
//! Behavior lives in the other modules of this crate as further `impl
//! WidgetTree` blocks: arrangement in `layout`, event routing in
//! `dispatcher`, focus in `focus`, on-top membership in `on_top`, destruction
//! and visual offsets in `lifecycle`, and painting in `painting`.

use std::any::Any;
use std::collections::VecDeque;
use std::time::Instant;

use slotmap::SlotMap;
use tracing::{debug, trace};
use trellis_core::logging::{NodeSummary, TreeDebug, TreeSource, targets};
use trellis_core::{Int2, Padding, Periodic, Rect, WidgetId};

use super::base::{ColorId, DrawBuffer, Lifecycle, WidgetNode};
use super::flags::{Anchor, WidgetFlags};
use super::focus::FocusState;
use super::on_top::OnTopStack;
use super::traits::{CommandHandler, Container, Widget, WidgetContext};
use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};

/// Where an attached child goes in the parent's list.
#[derive(Debug, Clone, Copy)]
enum Insert {
    Back,
    Front,
    After(WidgetId),
}

/// A tree of widgets rooted at one display surface.
pub struct WidgetTree {
    pub(crate) nodes: SlotMap<WidgetId, WidgetNode>,
    pub(crate) root: WidgetId,
    pub(crate) config: TreeConfig,
    pub(crate) focus: FocusState,
    pub(crate) on_top: OnTopStack,
    /// Destroyed nodes waiting for their visual offset to finish.
    pub(crate) pending: Vec<WidgetId>,
    /// Nodes with a running visual-offset animation.
    pub(crate) tickers: Vec<WidgetId>,
    pub(crate) commands: VecDeque<String>,
    pub(crate) periodic: Periodic,
    pub(crate) now: Instant,
    pub(crate) needs_redraw: bool,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl WidgetTree {
    /// Create a tree holding only its root.
    pub fn new(config: TreeConfig) -> Self {
        let now = Instant::now();
        let mut nodes = SlotMap::with_key();
        let mut root_node = WidgetNode::new(Box::new(Container), now);
        root_node.name = config.root_id.clone();
        root_node.rect = Rect::from_pos_size(Int2::ZERO, config.root_size);
        let root = nodes.insert(root_node);
        debug!(target: targets::TREE, ?root, size = ?config.root_size, "created widget tree");
        Self {
            nodes,
            root,
            config,
            focus: FocusState::default(),
            on_top: OnTopStack::default(),
            pending: Vec::new(),
            tickers: Vec::new(),
            commands: VecDeque::new(),
            periodic: Periodic::new(),
            now,
            needs_redraw: true,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// The tree clock, advanced by [`tick`](Self::tick).
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Handle to the periodic-command registry.
    ///
    /// Clone it to feed the registry from a timer thread.
    pub fn periodic(&self) -> &Periodic {
        &self.periodic
    }

    /// Number of nodes alive in the arena, pending ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a node that has not been reaped.
    pub fn exists(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Resize the display surface and re-arrange everything.
    pub fn set_root_size(&mut self, size: Int2) {
        if let Some(root) = self.nodes.get_mut(self.root) {
            root.rect.size = size;
        }
        self.arrange(self.root);
        self.needs_redraw = true;
    }

    pub fn root_size(&self) -> Int2 {
        self.rect(self.root).size
    }

    /// Whether something changed since the last call.
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // =========================================================================
    // Nodes and behaviors
    // =========================================================================

    /// Create a standalone node with the given behavior.
    pub fn create(&mut self, behavior: impl Widget) -> WidgetId {
        let id = self.nodes.insert(WidgetNode::new(Box::new(behavior), self.now));
        trace!(target: targets::TREE, ?id, "created widget");
        id
    }

    pub(crate) fn node(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id)
    }

    /// The node's behavior, if it is of type `T`.
    pub fn behavior<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        let behavior: &dyn Widget = self.nodes.get(id)?.behavior.as_deref()?;
        (behavior as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable access to the node's behavior, if it is of type `T`.
    pub fn behavior_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        let behavior: &mut dyn Widget = self.nodes.get_mut(id)?.behavior.as_deref_mut()?;
        (behavior as &mut dyn Any).downcast_mut::<T>()
    }

    /// Run `f` with the node's behavior taken out of the arena.
    ///
    /// Returns `None` if the node does not exist or its behavior is already
    /// running further up the stack.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetContext<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.nodes.get_mut(id)?.behavior.take()?;
        let result = {
            let mut cx = WidgetContext::new(self, id);
            f(behavior.as_mut(), &mut cx)
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Some(result)
    }

    /// Set the string id used by [`find_child`](Self::find_child).
    pub fn set_id(&mut self, id: WidgetId, name: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.name = name.into();
        }
    }

    pub fn id_of(&self, id: WidgetId) -> Option<&str> {
        self.nodes.get(id).map(|node| node.name.as_str())
    }

    /// Set the human-readable id used for persisting user-resized sizes.
    pub fn set_resize_id(&mut self, id: WidgetId, resize_id: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.resize_id = Some(resize_id.into());
        }
    }

    pub fn resize_id(&self, id: WidgetId) -> Option<&str> {
        self.nodes.get(id)?.resize_id.as_deref()
    }

    pub fn set_command_handler(&mut self, id: WidgetId, handler: Option<CommandHandler>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.command_handler = handler;
        }
    }

    /// Lifecycle state, or `None` once reaped.
    pub fn lifecycle(&self, id: WidgetId) -> Option<Lifecycle> {
        self.nodes.get(id).map(|node| node.lifecycle)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Attach a standalone node as the last child of `parent`.
    pub fn try_add_child(&mut self, parent: WidgetId, child: WidgetId) -> TreeResult<()> {
        self.attach(parent, child, Insert::Back)
    }

    /// Attach a standalone node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if [`try_add_child`](Self::try_add_child) would fail.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) {
        self.try_add_child(parent, child)
            .unwrap_or_else(|err| panic!("add_child: {err}"));
    }

    /// Attach a standalone node as the first child of `parent`.
    pub fn add_child_front(&mut self, parent: WidgetId, child: WidgetId) {
        self.attach(parent, child, Insert::Front)
            .unwrap_or_else(|err| panic!("add_child_front: {err}"));
    }

    /// Attach a standalone node right after `after`, or last if `after` is
    /// not a child of `parent`.
    pub fn insert_child_after(&mut self, parent: WidgetId, child: WidgetId, after: WidgetId) {
        self.attach(parent, child, Insert::After(after))
            .unwrap_or_else(|err| panic!("insert_child_after: {err}"));
    }

    fn attach(&mut self, parent: WidgetId, child: WidgetId, at: Insert) -> TreeResult<()> {
        self.check_attachable(parent, child)?;
        let siblings = &mut self.nodes[parent].children;
        let index = match at {
            Insert::Back => siblings.len(),
            Insert::Front => 0,
            Insert::After(after) => siblings
                .iter()
                .position(|&c| c == after)
                .map_or(siblings.len(), |i| i + 1),
        };
        siblings.insert(index, child);
        self.nodes[child].parent = Some(parent);
        trace!(target: targets::TREE, ?parent, ?child, index, "attached child");
        self.sync_on_top(child);
        self.needs_redraw = true;
        Ok(())
    }

    fn check_attachable(&self, parent: WidgetId, child: WidgetId) -> TreeResult<()> {
        let parent_node = self.nodes.get(parent).ok_or(TreeError::WidgetNotFound(parent))?;
        let child_node = self.nodes.get(child).ok_or(TreeError::WidgetNotFound(child))?;
        if parent_node.is_destroy_pending() {
            return Err(TreeError::AlreadyDestroyed(parent));
        }
        if child_node.is_destroy_pending() {
            return Err(TreeError::AlreadyDestroyed(child));
        }
        if let Some(existing) = child_node.parent {
            return Err(TreeError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        // The root is an ancestor of every attached node.
        if child == parent || child == self.root || self.has_parent(parent, child) {
            return Err(TreeError::CircularParentage { child, parent });
        }
        Ok(())
    }

    /// Detach `child` from `parent`. The child becomes standalone again.
    ///
    /// Returns `false` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        match self.nodes.get(child) {
            Some(node) if node.parent == Some(parent) => {}
            _ => return false,
        }
        self.release_focus_in(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        self.nodes[child].parent = None;
        trace!(target: targets::TREE, ?parent, ?child, "removed child");
        self.sync_on_top(child);
        self.needs_redraw = true;
        true
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id)?.parent
    }

    /// Children in insertion order. Empty for unknown ids.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    pub fn child_count(&self, id: WidgetId) -> usize {
        self.children(id).len()
    }

    pub fn child(&self, parent: WidgetId, index: usize) -> Option<WidgetId> {
        self.children(parent).get(index).copied()
    }

    pub fn index_of_child(&self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Move `child` to `index` among its siblings (clamped to the last slot).
    pub fn change_child_index(&mut self, parent: WidgetId, child: WidgetId, index: usize) -> bool {
        let Some(current) = self.index_of_child(parent, child) else {
            return false;
        };
        let siblings = &mut self.nodes[parent].children;
        siblings.remove(current);
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.needs_redraw = true;
        true
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn has_parent(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// `id` itself or one of its descendants.
    pub(crate) fn is_in_subtree(&self, id: WidgetId, subtree: WidgetId) -> bool {
        id == subtree || self.has_parent(id, subtree)
    }

    /// Whether the node is live and connected to the root.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            if node.is_destroy_pending() {
                return false;
            }
            if current == self.root {
                return true;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// `id` and all its descendants, depth-first in insertion order.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        if !self.exists(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// First node in the subtree of `from` (itself included) with string id `name`.
    pub fn find_child(&self, from: WidgetId, name: &str) -> Option<WidgetId> {
        self.subtree(from)
            .into_iter()
            .find(|&id| self.id_of(id) == Some(name))
    }

    /// All nodes in the subtree of `from` (itself included) matching `pred`.
    pub fn find_children(&self, from: WidgetId, mut pred: impl FnMut(WidgetId) -> bool) -> Vec<WidgetId> {
        self.subtree(from).into_iter().filter(|&id| pred(id)).collect()
    }

    /// Nearest strict ancestor of `id` matching `pred`.
    pub fn find_parent(&self, id: WidgetId, mut pred: impl FnMut(WidgetId) -> bool) -> Option<WidgetId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if pred(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    // =========================================================================
    // Flags
    // =========================================================================

    pub fn flags(&self, id: WidgetId) -> WidgetFlags {
        self.nodes.get(id).map_or(WidgetFlags::NONE, |node| node.flags)
    }

    /// Whether any of `flags` is set on the node.
    pub fn has_flags(&self, id: WidgetId, flags: WidgetFlags) -> bool {
        self.flags(id).intersects(flags)
    }

    /// Set or clear `flags` on the node.
    ///
    /// Keeps the on-top stack in step: setting `KEEP_ON_TOP` on a node that
    /// already has it raises the node.
    pub fn set_flags(&mut self, id: WidgetId, flags: WidgetFlags, on: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let before = node.flags;
        node.flags.set(flags, on);
        let after = node.flags;
        if flags.intersects(WidgetFlags::KEEP_ON_TOP | WidgetFlags::HIDDEN) {
            self.sync_on_top(id);
            if on && before.contains(WidgetFlags::KEEP_ON_TOP) && flags.contains(WidgetFlags::KEEP_ON_TOP) {
                self.raise(id);
            }
        }
        if before != after {
            trace!(target: targets::TREE, ?id, flags = ?flags.names(), on, "flags changed");
            self.needs_redraw = true;
        }
    }

    /// [`set_flags`](Self::set_flags) on the node and its whole subtree.
    pub fn set_tree_flags(&mut self, id: WidgetId, flags: WidgetFlags, on: bool) {
        for node in self.subtree(id) {
            self.set_flags(node, flags, on);
        }
    }

    pub fn anchor(&self, id: WidgetId) -> Anchor {
        self.nodes.get(id).map_or(Anchor::None, |node| node.anchor)
    }

    pub fn set_anchor(&mut self, id: WidgetId, anchor: Anchor) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.anchor = anchor;
        }
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Hidden on its own, counting `VISIBLE_ON_PARENT_HOVER`.
    pub(crate) fn is_hidden_self(&self, id: WidgetId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return true;
        };
        if node.has(WidgetFlags::HIDDEN) {
            return true;
        }
        if node.has(WidgetFlags::VISIBLE_ON_PARENT_HOVER) {
            let hover = self.focus.hover;
            return hover.is_none() || (hover != Some(id) && hover != node.parent);
        }
        false
    }

    /// Neither the node nor any ancestor is hidden.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        if !self.exists(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_hidden_self(node) {
                return false;
            }
            current = self.parent(node);
        }
        true
    }

    /// The node or one of its ancestors is disabled.
    pub fn is_disabled(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.has_flags(node, WidgetFlags::DISABLED) {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether painting should visit the node: shown, or mid-animation.
    pub fn is_drawn(&self, id: WidgetId) -> bool {
        self.exists(id)
            && (!self.is_hidden_self(id) || self.has_flags(id, WidgetFlags::VISUAL_OFFSET))
    }

    /// Show or hide the node, then re-arrange from the root so collapsing
    /// propagates to every affected ancestor.
    pub fn show_collapsed(&mut self, id: WidgetId, show: bool) {
        if !self.exists(id) {
            return;
        }
        let shown = !self.has_flags(id, WidgetFlags::HIDDEN);
        if shown != show {
            self.set_flags(id, WidgetFlags::HIDDEN, !show);
            self.arrange(self.root);
            self.refresh(id);
        }
    }

    /// Whether a shown `KEEP_ON_TOP` node sits anywhere below `id`.
    pub fn has_visible_child_on_top(&self, id: WidgetId) -> bool {
        self.children(id).iter().any(|&child| {
            let flags = self.flags(child);
            (flags.contains(WidgetFlags::KEEP_ON_TOP) && !flags.contains(WidgetFlags::HIDDEN))
                || self.has_visible_child_on_top(child)
        })
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Rectangle relative to the parent. Empty for unknown ids.
    pub fn rect(&self, id: WidgetId) -> Rect {
        self.nodes.get(id).map_or(Rect::ZERO, |node| node.rect)
    }

    pub fn size(&self, id: WidgetId) -> Int2 {
        self.rect(id).size
    }

    /// Place the node and exempt it from positioning by its parent.
    pub fn set_pos(&mut self, id: WidgetId, pos: Int2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect.pos = pos;
        }
        self.set_flags(id, WidgetFlags::FIXED_POSITION, true);
    }

    /// Set the size without fixing it. Arrangement may change it again.
    pub fn set_size(&mut self, id: WidgetId, size: Int2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect.size = size.max(node.min_size);
        }
    }

    /// Set and fix the size. A negative component keeps the current extent
    /// and leaves that axis unfixed.
    pub fn set_fixed_size(&mut self, id: WidgetId, size: Int2) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let mut flags = WidgetFlags::FIXED_SIZE;
        let mut size = size;
        if size.x < 0 {
            size.x = node.rect.size.x;
            flags.set(WidgetFlags::FIXED_WIDTH, false);
        }
        if size.y < 0 {
            size.y = node.rect.size.y;
            flags.set(WidgetFlags::FIXED_HEIGHT, false);
        }
        node.rect.size = size;
        self.set_flags(id, flags, true);
    }

    /// Lower bound applied whenever arrangement sets the size.
    pub fn set_min_size(&mut self, id: WidgetId, min_size: Int2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.min_size = min_size;
        }
    }

    pub fn min_size(&self, id: WidgetId) -> Int2 {
        self.nodes.get(id).map_or(Int2::ZERO, |node| node.min_size)
    }

    pub fn set_padding(&mut self, id: WidgetId, padding: Padding) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.padding = padding;
        }
    }

    /// Padding in effect (zero for `UNPADDED` nodes).
    pub fn padding(&self, id: WidgetId) -> Padding {
        self.nodes.get(id).map_or(Padding::ZERO, |node| node.effective_padding())
    }

    /// Mirror the height of `target` during arrangement.
    pub fn try_set_size_ref(&mut self, id: WidgetId, target: Option<WidgetId>) -> TreeResult<()> {
        if let Some(target) = target {
            self.check_reference(id, target, |node| node.size_ref)?;
        }
        let node = self.nodes.get_mut(id).ok_or(TreeError::WidgetNotFound(id))?;
        node.size_ref = target;
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if [`try_set_size_ref`](Self::try_set_size_ref) would fail.
    pub fn set_size_ref(&mut self, id: WidgetId, target: Option<WidgetId>) {
        self.try_set_size_ref(id, target)
            .unwrap_or_else(|err| panic!("set_size_ref: {err}"));
    }

    /// Mirror the visual offset of `target` while painting and hit-testing.
    pub fn try_set_offset_ref(&mut self, id: WidgetId, target: Option<WidgetId>) -> TreeResult<()> {
        if let Some(target) = target {
            self.check_reference(id, target, |node| node.offset_ref)?;
        }
        let node = self.nodes.get_mut(id).ok_or(TreeError::WidgetNotFound(id))?;
        node.offset_ref = target;
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if [`try_set_offset_ref`](Self::try_set_offset_ref) would fail.
    pub fn set_offset_ref(&mut self, id: WidgetId, target: Option<WidgetId>) {
        self.try_set_offset_ref(id, target)
            .unwrap_or_else(|err| panic!("set_offset_ref: {err}"));
    }

    fn check_reference(
        &self,
        id: WidgetId,
        target: WidgetId,
        next: impl Fn(&WidgetNode) -> Option<WidgetId>,
    ) -> TreeResult<()> {
        if !self.exists(id) {
            return Err(TreeError::WidgetNotFound(id));
        }
        if !self.exists(target) {
            return Err(TreeError::WidgetNotFound(target));
        }
        let invalid = TreeError::InvalidReference { widget: id, target };
        if target == id || self.has_parent(id, target) {
            return Err(invalid);
        }
        // Following the chain from the target must not lead back here.
        let mut current = Some(target);
        let mut steps = 0;
        while let Some(node) = current {
            if node == id || steps > self.nodes.len() {
                return Err(invalid);
            }
            current = self.nodes.get(node).and_then(&next);
            steps += 1;
        }
        Ok(())
    }

    pub fn size_ref(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id)?.size_ref
    }

    pub fn offset_ref(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id)?.offset_ref
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Current rendering translation of the node itself.
    pub fn visual_offset(&self, id: WidgetId) -> Int2 {
        let Some(node) = self.nodes.get(id) else {
            return Int2::ZERO;
        };
        let source = if node.has(WidgetFlags::VISUAL_OFFSET) {
            node
        } else {
            match node.offset_ref.and_then(|target| self.nodes.get(target)) {
                Some(target) if target.has(WidgetFlags::VISUAL_OFFSET) => target,
                _ => return Int2::ZERO,
            }
        };
        let value = source.visual_offset.anim.value(self.now).round() as i32;
        let mut offset = Int2::ZERO;
        offset.set_along(source.visual_offset.axis, value);
        offset
    }

    /// Convert a point in the node's coordinates to window coordinates.
    pub fn local_to_window(&self, id: WidgetId, local: Int2) -> Int2 {
        let mut pos = local;
        let mut current = Some(id);
        while let Some(node) = current {
            pos += self.rect(node).pos + self.visual_offset(node);
            current = self.parent(node);
        }
        pos
    }

    /// Convert a window point to the node's coordinates.
    pub fn window_to_local(&self, id: WidgetId, window: Int2) -> Int2 {
        window - self.local_to_window(id, Int2::ZERO)
    }

    /// Rectangle in window coordinates, visual offsets included.
    pub fn bounds(&self, id: WidgetId) -> Rect {
        let Some(node) = self.nodes.get(id) else {
            return Rect::ZERO;
        };
        let origin = match node.parent {
            Some(parent) => self.local_to_window(parent, Int2::ZERO),
            None => Int2::ZERO,
        };
        node.rect.translated(origin + self.visual_offset(id))
    }

    /// Rectangle in window coordinates as computed by arrangement.
    pub fn bounds_without_visual_offset(&self, id: WidgetId) -> Rect {
        let mut rect = self.rect(id);
        let mut current = self.parent(id);
        while let Some(node) = current {
            rect = rect.translated(self.rect(node).pos);
            current = self.parent(node);
        }
        rect
    }

    /// Window bounds minus padding.
    pub fn inner_bounds(&self, id: WidgetId) -> Rect {
        let mut inner = self.bounds(id).shrunk(&self.padding(id));
        inner.size = inner.size.max(Int2::ZERO);
        inner
    }

    /// Whether the window point falls inside the node.
    ///
    /// `DRAW_BACKGROUND_TO_BOTTOM` nodes extend to the bottom of the root.
    pub fn contains(&self, id: WidgetId, window: Int2) -> bool {
        let mut bounds = self.bounds(id);
        if self.has_flags(id, WidgetFlags::DRAW_BACKGROUND_TO_BOTTOM) {
            let root_bottom = self.bounds(self.root).bottom();
            bounds.size.y = bounds.size.y.max(root_bottom - bounds.top());
        }
        bounds.contains(window)
    }

    // =========================================================================
    // Colors and draw buffers
    // =========================================================================

    pub fn set_background_color(&mut self, id: WidgetId, color: Option<ColorId>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.bg_color = color;
        }
    }

    pub fn background_color(&self, id: WidgetId) -> Option<ColorId> {
        self.nodes.get(id)?.bg_color
    }

    pub fn set_frame_color(&mut self, id: WidgetId, color: Option<ColorId>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.frame_color = color;
        }
    }

    pub fn frame_color(&self, id: WidgetId) -> Option<ColorId> {
        self.nodes.get(id)?.frame_color
    }

    /// Give the node a cached rendering, or drop it.
    pub fn set_draw_buffer(&mut self, id: WidgetId, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.draw_buffer = enabled.then_some(DrawBuffer {
                size: node.rect.size,
                dirty: true,
            });
        }
    }

    pub fn draw_buffer(&self, id: WidgetId) -> Option<DrawBuffer> {
        self.nodes.get(id)?.draw_buffer
    }

    /// Record that the painter has brought the node's buffer up to date.
    pub fn validate_draw_buffer(&mut self, id: WidgetId) {
        if let Some(node) = self.nodes.get_mut(id) {
            let size = node.rect.size;
            if let Some(buffer) = node.draw_buffer.as_mut() {
                buffer.size = size;
                buffer.dirty = false;
            }
        }
    }

    /// Mark the node for repaint, invalidating its buffer and its ancestors'.
    pub fn refresh(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get_mut(node_id) else {
                break;
            };
            if let Some(buffer) = node.draw_buffer.as_mut() {
                buffer.dirty = true;
            }
            current = node.parent;
        }
        self.needs_redraw = true;
    }

    // =========================================================================
    // Debugging
    // =========================================================================

    /// Render the whole tree as text.
    pub fn debug_tree(&self) -> String {
        TreeDebug::new().format_subtree(self, self.root)
    }

    /// Emit [`debug_tree`](Self::debug_tree) at debug level.
    pub fn log_tree(&self) {
        debug!(target: targets::TREE, "widget tree:\n{}", self.debug_tree());
    }
}

impl TreeSource for WidgetTree {
    fn describe(&self, id: WidgetId) -> Option<NodeSummary> {
        let node = self.nodes.get(id)?;
        Some(NodeSummary {
            name: node.name.clone(),
            kind: node.behavior.as_deref().map_or("?", |behavior| behavior.kind()),
            rect: node.rect,
            flags: node.flags.names(),
            children: node.children.clone(),
        })
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("pending", &self.pending.len())
            .field("focus", &self.focus)
            .field("on_top", &self.on_top)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> WidgetTree {
        WidgetTree::new(TreeConfig::default())
    }

    #[test]
    fn test_new_tree_has_sized_root() {
        let tree = tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_size(), Int2::new(800, 600));
        assert_eq!(tree.id_of(tree.root()), Some("root"));
        assert!(tree.is_attached(tree.root()));
    }

    #[test]
    fn test_attach_rejects_parented_and_cycles() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create(Container);
        let b = tree.create(Container);
        tree.add_child(root, a);
        tree.add_child(a, b);

        assert_eq!(
            tree.try_add_child(root, b),
            Err(TreeError::AlreadyParented { child: b, parent: a })
        );
        let c = tree.create(Container);
        assert_eq!(
            tree.try_add_child(c, c),
            Err(TreeError::CircularParentage { child: c, parent: c })
        );
        assert_eq!(
            tree.try_add_child(b, root),
            Err(TreeError::CircularParentage { child: root, parent: b })
        );
    }

    #[test]
    #[should_panic(expected = "already has parent")]
    fn test_add_child_panics_when_parented() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create(Container);
        let b = tree.create(Container);
        tree.add_child(root, a);
        tree.add_child(b, a);
    }

    #[test]
    fn test_insert_positions() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create(Container);
        let b = tree.create(Container);
        let c = tree.create(Container);
        let d = tree.create(Container);
        tree.add_child(root, a);
        tree.add_child_front(root, b);
        tree.insert_child_after(root, c, b);
        tree.insert_child_after(root, d, a);
        assert_eq!(tree.children(root), &[b, c, a, d]);

        assert!(tree.change_child_index(root, d, 0));
        assert_eq!(tree.index_of_child(root, d), Some(0));
        assert!(tree.change_child_index(root, d, 99));
        assert_eq!(tree.child(root, 3), Some(d));
    }

    #[test]
    fn test_remove_child_returns_ownership() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create(Container);
        tree.add_child(root, a);
        assert!(tree.remove_child(root, a));
        assert!(!tree.remove_child(root, a));
        assert_eq!(tree.parent(a), None);
        assert!(!tree.is_attached(a));
        tree.add_child(root, a);
        assert!(tree.is_attached(a));
    }

    #[test]
    fn test_find_helpers() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        let label = tree.create(Container);
        tree.set_id(panel, "panel");
        tree.set_id(label, "label");
        tree.add_child(root, panel);
        tree.add_child(panel, label);
        tree.set_flags(label, WidgetFlags::SELECTED, true);

        assert_eq!(tree.find_child(root, "label"), Some(label));
        assert_eq!(tree.find_child(panel, "panel"), Some(panel));
        assert_eq!(tree.find_child(label, "panel"), None);
        assert_eq!(
            tree.find_children(root, |id| tree.has_flags(id, WidgetFlags::SELECTED)),
            vec![label]
        );
        assert_eq!(tree.find_parent(label, |id| tree.id_of(id) == Some("root")), Some(root));
        assert!(tree.has_parent(label, root));
        assert!(!tree.has_parent(root, label));
        assert_eq!(tree.subtree(root), vec![root, panel, label]);
    }

    #[test]
    fn test_visibility_through_ancestors() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        let item = tree.create(Container);
        tree.add_child(root, panel);
        tree.add_child(panel, item);

        assert!(tree.is_visible(item));
        tree.set_flags(panel, WidgetFlags::HIDDEN, true);
        assert!(!tree.is_visible(item));
        assert!(tree.is_drawn(item));
        assert!(!tree.is_drawn(panel));

        tree.set_flags(panel, WidgetFlags::HIDDEN | WidgetFlags::DISABLED, false);
        tree.set_flags(root, WidgetFlags::DISABLED, true);
        assert!(tree.is_disabled(item));
    }

    #[test]
    fn test_visible_on_parent_hover() {
        let mut tree = tree();
        let root = tree.root();
        let row = tree.create(Container);
        let close = tree.create(Container);
        tree.add_child(root, row);
        tree.add_child(row, close);
        tree.set_flags(close, WidgetFlags::VISIBLE_ON_PARENT_HOVER, true);

        assert!(!tree.is_visible(close));
        tree.focus.hover = Some(row);
        assert!(tree.is_visible(close));
        tree.focus.hover = Some(close);
        assert!(tree.is_visible(close));
    }

    #[test]
    fn test_fixed_size_partial() {
        let mut tree = tree();
        let a = tree.create(Container);
        tree.set_size(a, Int2::new(10, 20));
        tree.set_fixed_size(a, Int2::new(-1, 40));
        assert_eq!(tree.size(a), Int2::new(10, 40));
        assert!(tree.has_flags(a, WidgetFlags::FIXED_HEIGHT));
        assert!(!tree.has_flags(a, WidgetFlags::FIXED_WIDTH));
    }

    #[test]
    fn test_coordinates_follow_parents() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        let item = tree.create(Container);
        tree.add_child(root, panel);
        tree.add_child(panel, item);
        tree.set_pos(panel, Int2::new(100, 50));
        tree.set_pos(item, Int2::new(10, 5));
        tree.set_size(item, Int2::new(20, 20));

        assert_eq!(tree.bounds(item), Rect::new(110, 55, 20, 20));
        assert_eq!(tree.local_to_window(item, Int2::new(1, 1)), Int2::new(111, 56));
        assert_eq!(tree.window_to_local(item, Int2::new(111, 56)), Int2::new(1, 1));
        assert!(tree.contains(item, Int2::new(115, 60)));
        assert!(!tree.contains(item, Int2::new(130, 60)));

        tree.set_flags(item, WidgetFlags::DRAW_BACKGROUND_TO_BOTTOM, true);
        assert!(tree.contains(item, Int2::new(115, 590)));
    }

    #[test]
    fn test_size_ref_rejects_loops() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create(Container);
        let b = tree.create(Container);
        tree.add_child(root, a);
        tree.add_child(a, b);

        assert!(tree.try_set_size_ref(a, Some(a)).is_err());
        assert_eq!(
            tree.try_set_size_ref(b, Some(a)),
            Err(TreeError::InvalidReference { widget: b, target: a })
        );
        let sibling = tree.create(Container);
        tree.add_child(root, sibling);
        tree.set_size_ref(a, Some(sibling));
        assert_eq!(tree.size_ref(a), Some(sibling));

        let c = tree.create(Container);
        let d = tree.create(Container);
        tree.set_offset_ref(c, Some(d));
        assert!(tree.try_set_offset_ref(d, Some(c)).is_err());
    }

    #[test]
    fn test_refresh_dirties_ancestor_buffers() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        let item = tree.create(Container);
        tree.add_child(root, panel);
        tree.add_child(panel, item);
        tree.set_draw_buffer(panel, true);
        tree.validate_draw_buffer(panel);
        assert_eq!(tree.draw_buffer(panel).map(|b| b.dirty), Some(false));

        tree.refresh(item);
        assert_eq!(tree.draw_buffer(panel).map(|b| b.dirty), Some(true));
        assert!(tree.take_needs_redraw());
        assert!(!tree.take_needs_redraw());
    }

    #[test]
    fn test_behavior_downcast() {
        struct Label(&'static str);
        impl Widget for Label {}

        let mut tree = tree();
        let label = tree.create(Label("hello"));
        assert_eq!(tree.behavior::<Label>(label).map(|l| l.0), Some("hello"));
        assert!(tree.behavior::<Container>(label).is_none());
        if let Some(l) = tree.behavior_mut::<Label>(label) {
            l.0 = "bye";
        }
        assert_eq!(tree.behavior::<Label>(label).map(|l| l.0), Some("bye"));
        assert_eq!(tree.describe(label).map(|s| s.kind), Some("Label"));
    }

    #[test]
    fn test_debug_tree_lists_nodes() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree.create(Container);
        tree.set_id(panel, "panel");
        tree.add_child(root, panel);
        let text = tree.debug_tree();
        assert!(text.contains("root"));
        assert!(text.contains("panel"));
    }
}
