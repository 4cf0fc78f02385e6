//! The on-top stack.
//!
//! Nodes flagged `KEEP_ON_TOP` are painted after the normal tree and are
//! offered events before it, wherever they sit in the hierarchy. The stack
//! holds exactly the shown, attached, live ones; the last entry is topmost.
//!
//! Membership is recomputed from flags whenever something that affects it
//! changes (the flag itself, `HIDDEN` on the node or an ancestor, attaching,
//! detaching, destroying), so callers never push or pop entries directly.

use tracing::trace;
use trellis_core::WidgetId;
use trellis_core::logging::targets;

use super::flags::WidgetFlags;
use super::tree::WidgetTree;

/// Ordered set of on-top nodes, bottom first.
#[derive(Debug, Default)]
pub(crate) struct OnTopStack(Vec<WidgetId>);

impl OnTopStack {
    pub(crate) fn entries(&self) -> &[WidgetId] {
        &self.0
    }

    pub(crate) fn contains(&self, id: WidgetId) -> bool {
        self.0.contains(&id)
    }

    /// Append `id` unless already present.
    pub(crate) fn push(&mut self, id: WidgetId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub(crate) fn remove(&mut self, id: WidgetId) -> bool {
        let before = self.0.len();
        self.0.retain(|&entry| entry != id);
        self.0.len() != before
    }
}

impl WidgetTree {
    /// On-top nodes, bottom first.
    pub fn on_top(&self) -> &[WidgetId] {
        self.on_top.entries()
    }

    /// Move an on-top node above the others. Does nothing for non-members.
    pub fn raise(&mut self, id: WidgetId) {
        if self.on_top.remove(id) {
            self.on_top.push(id);
            trace!(target: targets::TREE, ?id, "raised on-top widget");
            self.needs_redraw = true;
        }
    }

    /// Bring membership of `id` and its subtree in line with their flags.
    pub(crate) fn sync_on_top(&mut self, id: WidgetId) {
        for node in self.subtree(id) {
            let member = self.belongs_on_top(node);
            let changed = if member {
                self.on_top.push(node)
            } else {
                self.on_top.remove(node)
            };
            if changed {
                trace!(target: targets::TREE, id = ?node, member, "on-top membership changed");
                self.needs_redraw = true;
            }
        }
    }

    /// Drop every node of the subtree from the stack, regardless of flags.
    pub(crate) fn remove_on_top_in(&mut self, id: WidgetId) {
        for node in self.subtree(id) {
            self.on_top.remove(node);
        }
    }

    fn belongs_on_top(&self, id: WidgetId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if id == self.root || node.is_destroy_pending() || !node.has(WidgetFlags::KEEP_ON_TOP) {
            return false;
        }
        if !self.is_attached(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(ancestor) = current {
            if self.has_flags(ancestor, WidgetFlags::HIDDEN) {
                return false;
            }
            current = self.parent(ancestor);
        }
        true
    }
}
