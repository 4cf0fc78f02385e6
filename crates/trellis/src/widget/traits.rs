//! Behavior trait implemented by concrete widget types.
//!
//! The tree owns geometry, flags and relationships for every node. What a
//! node *does* (how it reacts to input, how it paints itself, what it does
//! when its size changes) lives in a [`Widget`] implementation attached to
//! the node. Concrete leaf widgets (buttons, inputs, lists) live outside this
//! crate and only implement this trait.

use std::any::Any;

use trellis_core::{Rect, WidgetId};

use super::events::InputEvent;
use super::painting::PaintContext;
use super::tree::WidgetTree;

/// Per-node behavior.
///
/// Every method has a default, so a plain layout container needs no code at
/// all (see [`Container`]).
pub trait Widget: Any {
    /// Short type name, shown by the tree debug formatter.
    fn kind(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Handle an event delivered to this node.
    ///
    /// Runs after all children declined the event. Returning `false` falls
    /// through to the base processing driven by the node's flags.
    fn process_event(&mut self, cx: &mut WidgetContext<'_>, event: &InputEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Paint the node.
    ///
    /// The default paints the background and frame, then the children.
    fn paint(&self, cx: &mut PaintContext<'_>) {
        cx.paint_background();
        cx.paint_children();
    }

    /// Called after arrangement changed the node's size.
    ///
    /// A node whose content reflows (wrapped text) may adjust its own height
    /// here and call [`WidgetContext::arrange_parent`].
    fn size_changed(&mut self, cx: &mut WidgetContext<'_>) {
        let _ = cx;
    }

    /// Whether hit-testing may return this node without an explicit
    /// `HITTABLE` flag.
    fn is_hittable(&self) -> bool {
        true
    }
}

/// Behavior of a pure layout node.
///
/// Containers are transparent to hit-testing unless flagged `HITTABLE`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Container;

impl Widget for Container {
    fn is_hittable(&self) -> bool {
        false
    }
}

/// Handler for commands that reach a node.
///
/// Returns whether the command was consumed.
pub type CommandHandler = fn(&mut WidgetContext<'_>, &str) -> bool;

/// Mutable access to the tree on behalf of one node.
///
/// Handed to behavior callbacks. The callback's own behavior is taken out of
/// the node while it runs, so it cannot be reached through the tree.
pub struct WidgetContext<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
}

impl<'a> WidgetContext<'a> {
    pub(crate) fn new(tree: &'a mut WidgetTree, id: WidgetId) -> Self {
        Self { tree, id }
    }

    /// The node this context acts for.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn tree(&self) -> &WidgetTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut *self.tree
    }

    /// Rectangle relative to the parent.
    pub fn rect(&self) -> Rect {
        self.tree.rect(self.id)
    }

    /// Post a command from this node.
    ///
    /// A leading `!` broadcasts it; otherwise it carries this node's `ptr`.
    pub fn post(&mut self, command: &str) {
        self.tree.post_command(Some(self.id), command);
    }

    /// Whether `command` is `name` and was posted by this node or one of its
    /// descendants.
    pub fn is_command(&self, command: &str, name: &str) -> bool {
        self.tree.is_command(command, self.id, name)
    }

    /// Re-arrange the parent, letting a size change propagate one level up.
    pub fn arrange_parent(&mut self) {
        if let Some(parent) = self.tree.parent(self.id) {
            self.tree.arrange(parent);
        }
    }

    /// Mark the node for repaint.
    pub fn refresh(&mut self) {
        self.tree.refresh(self.id);
    }
}
