//! Keyboard focus, hover and mouse grab.
//!
//! Each [`WidgetTree`] holds exactly one of each slot, so independent trees
//! never share focus.
//!
//! # Notifications
//!
//! Changing focus through [`WidgetTree::set_focus`] posts two commands:
//!
//! 1. `focus.lost ptr:<old>` on behalf of the widget losing focus (if any)
//! 2. `focus.gained ptr:<new>` on behalf of the widget gaining it (if any)
//!
//! Setting the focus that is already current posts nothing.
//! [`WidgetTree::set_keyboard_grab`] changes focus silently.
//!
//! # Tab Order
//!
//! Tab order is a depth-first pre-order walk of the nearest `FOCUS_ROOT`
//! ancestor (or the root), visiting children in insertion order. Hidden
//! subtrees are skipped; disabled and non-`FOCUSABLE` nodes are passed over.

use tracing::{debug, trace};
use trellis_core::WidgetId;
use trellis_core::logging::targets;

use super::flags::WidgetFlags;
use super::tree::WidgetTree;
use crate::error::{TreeError, TreeResult};

/// Command posted on behalf of the widget that lost focus.
pub const FOCUS_LOST: &str = "focus.lost";
/// Command posted on behalf of the widget that gained focus.
pub const FOCUS_GAINED: &str = "focus.gained";

/// Direction of tab-order traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    /// Tab.
    Forward,
    /// Shift+Tab.
    Backward,
}

/// The focus, hover and mouse-grab slots of one tree.
#[derive(Debug, Default)]
pub(crate) struct FocusState {
    pub(crate) focused: Option<WidgetId>,
    pub(crate) hover: Option<WidgetId>,
    pub(crate) mouse_grab: Option<WidgetId>,
}

impl WidgetTree {
    /// The widget holding keyboard focus.
    #[inline]
    pub fn focus(&self) -> Option<WidgetId> {
        self.focus.focused
    }

    #[inline]
    pub fn has_focus(&self, id: WidgetId) -> bool {
        self.focus.focused == Some(id)
    }

    /// Move keyboard focus, posting `focus.lost` and `focus.gained`.
    ///
    /// The target must exist, must not be destroyed and must be `FOCUSABLE`.
    pub fn try_set_focus(&mut self, target: Option<WidgetId>) -> TreeResult<()> {
        if let Some(id) = target {
            let node = self.node(id).ok_or(TreeError::WidgetNotFound(id))?;
            if node.is_destroy_pending() {
                return Err(TreeError::AlreadyDestroyed(id));
            }
            if !node.has(WidgetFlags::FOCUSABLE) {
                return Err(TreeError::NotFocusable(id));
            }
        }
        self.move_focus(target);
        Ok(())
    }

    /// Move focus to an already validated target, notifying both ends.
    fn move_focus(&mut self, target: Option<WidgetId>) {
        if self.focus.focused == target {
            return;
        }
        let old = std::mem::replace(&mut self.focus.focused, target);
        debug!(target: targets::FOCUS, ?old, new = ?target, "focus changed");
        if let Some(old) = old {
            self.post_command(Some(old), FOCUS_LOST);
            self.refresh(old);
        }
        if let Some(new) = target {
            self.post_command(Some(new), FOCUS_GAINED);
            self.refresh(new);
        }
    }

    /// [`try_set_focus`](Self::try_set_focus), panicking on an invalid target.
    ///
    /// # Panics
    ///
    /// Panics if the target is unknown, destroyed or not focusable.
    pub fn set_focus(&mut self, target: Option<WidgetId>) {
        if let Err(err) = self.try_set_focus(target) {
            panic!("set_focus: {err}");
        }
    }

    /// Set focus without posting notifications.
    ///
    /// Used by widgets that take the keyboard temporarily (an open menu,
    /// a capture field).
    pub fn set_keyboard_grab(&mut self, target: Option<WidgetId>) {
        let target = target.filter(|&id| self.exists(id));
        trace!(target: targets::FOCUS, ?target, "keyboard grab");
        self.focus.focused = target;
    }

    /// Move focus to the next widget in tab order.
    ///
    /// Returns `true` if focus moved.
    pub fn focus_next(&mut self) -> bool {
        self.step_focus(FocusDirection::Forward)
    }

    /// Move focus to the previous widget in tab order.
    ///
    /// Returns `true` if focus moved.
    pub fn focus_previous(&mut self) -> bool {
        self.step_focus(FocusDirection::Backward)
    }

    fn step_focus(&mut self, direction: FocusDirection) -> bool {
        let start = self.focus.focused.unwrap_or(self.root);
        match self.find_focusable(start, direction) {
            Some(next) if Some(next) != self.focus.focused => self.try_set_focus(Some(next)).is_ok(),
            _ => false,
        }
    }

    /// The focusable widget after `start` in tab order, wrapping around.
    ///
    /// If `start` is not itself in the tab order, the first candidate in
    /// `direction` is returned. Returns `None` when there is no candidate
    /// other than `start`.
    pub fn find_focusable(&self, start: WidgetId, direction: FocusDirection) -> Option<WidgetId> {
        let scope = self.focus_scope(start);
        let mut order = Vec::new();
        self.collect_tab_order(scope, &mut order);
        if direction == FocusDirection::Backward {
            order.reverse();
        }
        let next = match order.iter().position(|&id| id == start) {
            Some(pos) => order[(pos + 1) % order.len()],
            None => *order.first()?,
        };
        (next != start).then_some(next)
    }

    /// Nearest `FOCUS_ROOT` ancestor of `id` (itself included), or the root.
    fn focus_scope(&self, id: WidgetId) -> WidgetId {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.has_flags(node, WidgetFlags::FOCUS_ROOT) {
                return node;
            }
            current = self.parent(node);
        }
        self.root
    }

    fn collect_tab_order(&self, id: WidgetId, order: &mut Vec<WidgetId>) {
        let Some(node) = self.node(id) else {
            return;
        };
        if self.is_hidden_self(id) || node.is_destroy_pending() {
            return;
        }
        if node.has(WidgetFlags::FOCUSABLE) && !self.is_disabled(id) {
            order.push(id);
        }
        for &child in &node.children {
            self.collect_tab_order(child, order);
        }
    }

    // =========================================================================
    // Hover and mouse grab
    // =========================================================================

    /// The deepest `HOVER` widget under the pointer.
    #[inline]
    pub fn hover(&self) -> Option<WidgetId> {
        self.focus.hover
    }

    pub(crate) fn set_hover(&mut self, target: Option<WidgetId>) {
        if self.focus.hover != target {
            trace!(target: targets::FOCUS, old = ?self.focus.hover, new = ?target, "hover changed");
            self.focus.hover = target;
            self.needs_redraw = true;
        }
    }

    /// The widget receiving all pointer motion and releases.
    #[inline]
    pub fn mouse_grab(&self) -> Option<WidgetId> {
        self.focus.mouse_grab
    }

    /// Route pointer motion and releases to `target` until cleared.
    pub fn set_mouse_grab(&mut self, target: Option<WidgetId>) {
        let target = target.filter(|&id| self.exists(id));
        trace!(target: targets::FOCUS, ?target, "mouse grab");
        self.focus.mouse_grab = target;
    }

    /// Clear whichever slots point into the subtree of `id`.
    ///
    /// Focus is moved with notifications; hover and grab are dropped.
    pub(crate) fn release_focus_in(&mut self, id: WidgetId) {
        if self.focus.hover.is_some_and(|hover| self.is_in_subtree(hover, id)) {
            self.set_hover(None);
        }
        if self.focus.mouse_grab.is_some_and(|grab| self.is_in_subtree(grab, id)) {
            self.focus.mouse_grab = None;
        }
        if self.focus.focused.is_some_and(|focused| self.is_in_subtree(focused, id)) {
            self.move_focus(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::widget::events::{InputEvent, Key, KeyboardModifiers};
    use crate::widget::Container;
    use trellis_core::command;

    fn focusable(tree: &mut WidgetTree, parent: WidgetId) -> WidgetId {
        let id = tree.create(Container);
        tree.add_child(parent, id);
        tree.set_flags(id, WidgetFlags::FOCUSABLE, true);
        id
    }

    fn drain(tree: &mut WidgetTree) -> Vec<String> {
        std::mem::take(&mut tree.commands).into_iter().collect()
    }

    #[test]
    fn test_set_focus_posts_lost_then_gained() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let a = focusable(&mut tree, root);
        let b = focusable(&mut tree, root);

        tree.set_focus(Some(a));
        assert_eq!(drain(&mut tree), vec![command::targeted(FOCUS_GAINED, a)]);

        tree.set_focus(Some(b));
        assert_eq!(
            drain(&mut tree),
            vec![command::targeted(FOCUS_LOST, a), command::targeted(FOCUS_GAINED, b)]
        );

        tree.set_focus(Some(b));
        assert!(drain(&mut tree).is_empty());

        tree.set_focus(None);
        assert_eq!(drain(&mut tree), vec![command::targeted(FOCUS_LOST, b)]);
        assert_eq!(tree.focus(), None);
    }

    #[test]
    fn test_focus_requires_focusable() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let plain = tree.create(Container);
        tree.add_child(root, plain);

        assert_eq!(tree.try_set_focus(Some(plain)), Err(TreeError::NotFocusable(plain)));
        assert_eq!(tree.focus(), None);
        assert!(tree.queued_commands().is_empty());
    }

    #[test]
    #[should_panic(expected = "set_focus")]
    fn test_set_focus_panics_on_plain_widget() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        tree.set_focus(Some(root));
    }

    #[test]
    fn test_keyboard_grab_is_silent() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let menu = tree.create(Container);
        tree.add_child(root, menu);

        tree.set_keyboard_grab(Some(menu));
        assert_eq!(tree.focus(), Some(menu));
        assert!(tree.queued_commands().is_empty());
    }

    #[test]
    fn test_tab_order_wraps_and_skips() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let a = focusable(&mut tree, root);
        let hidden = focusable(&mut tree, root);
        let b = focusable(&mut tree, root);
        let disabled = focusable(&mut tree, root);
        tree.set_flags(hidden, WidgetFlags::HIDDEN, true);
        tree.set_flags(disabled, WidgetFlags::DISABLED, true);

        assert_eq!(tree.find_focusable(a, FocusDirection::Forward), Some(b));
        assert_eq!(tree.find_focusable(b, FocusDirection::Forward), Some(a));
        assert_eq!(tree.find_focusable(a, FocusDirection::Backward), Some(b));
        assert_eq!(tree.find_focusable(root, FocusDirection::Forward), Some(a));
        assert_eq!(tree.find_focusable(root, FocusDirection::Backward), Some(b));
    }

    #[test]
    fn test_focus_root_bounds_cycling() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let outside = focusable(&mut tree, root);
        let dialog = tree.create(Container);
        tree.add_child(root, dialog);
        tree.set_flags(dialog, WidgetFlags::FOCUS_ROOT, true);
        let ok = focusable(&mut tree, dialog);
        let cancel = focusable(&mut tree, dialog);

        assert_eq!(tree.find_focusable(ok, FocusDirection::Forward), Some(cancel));
        assert_eq!(tree.find_focusable(cancel, FocusDirection::Forward), Some(ok));
        assert_eq!(tree.find_focusable(outside, FocusDirection::Forward), Some(ok));
    }

    #[test]
    fn test_single_candidate_does_not_move() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let only = focusable(&mut tree, root);
        tree.set_focus(Some(only));

        assert_eq!(tree.find_focusable(only, FocusDirection::Forward), None);
        assert!(!tree.focus_next());
    }

    #[test]
    fn test_tab_key_moves_focus() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let a = focusable(&mut tree, root);
        let b = focusable(&mut tree, root);

        assert!(tree.process_event(&InputEvent::key_down(Key::Tab)));
        assert_eq!(tree.focus(), Some(a));
        assert!(tree.process_event(&InputEvent::key_down(Key::Tab)));
        assert_eq!(tree.focus(), Some(b));
        assert!(tree.process_event(&InputEvent::KeyDown {
            key: Key::Tab,
            modifiers: KeyboardModifiers::SHIFT,
        }));
        assert_eq!(tree.focus(), Some(a));
    }

    #[test]
    fn test_tab_navigation_can_be_disabled() {
        let config = TreeConfig {
            tab_navigation: false,
            ..TreeConfig::default()
        };
        let mut tree = WidgetTree::new(config);
        let root = tree.root();
        focusable(&mut tree, root);

        assert!(!tree.process_event(&InputEvent::key_down(Key::Tab)));
        assert_eq!(tree.focus(), None);
    }

    #[test]
    fn test_release_focus_in_subtree() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let panel = tree.create(Container);
        tree.add_child(root, panel);
        let field = focusable(&mut tree, panel);
        tree.set_focus(Some(field));
        tree.set_mouse_grab(Some(field));
        tree.set_hover(Some(panel));

        tree.release_focus_in(panel);
        assert_eq!(tree.focus(), None);
        assert_eq!(tree.mouse_grab(), None);
        assert_eq!(tree.hover(), None);
    }

    /// Counts and consumes key presses.
    struct KeySink(std::rc::Rc<std::cell::Cell<u32>>);

    impl crate::widget::Widget for KeySink {
        fn process_event(
            &mut self,
            _cx: &mut crate::widget::WidgetContext<'_>,
            event: &InputEvent,
        ) -> bool {
            if event.is_keyboard() {
                self.0.set(self.0.get() + 1);
                return true;
            }
            false
        }
    }

    #[test]
    fn test_remove_child_releases_focus_and_grab() {
        let mut tree = WidgetTree::new(TreeConfig::default());
        let root = tree.root();
        let panel = tree.create(Container);
        tree.add_child(root, panel);
        let keys = std::rc::Rc::new(std::cell::Cell::new(0));
        let field = tree.create(KeySink(keys.clone()));
        tree.add_child(panel, field);
        tree.set_flags(field, WidgetFlags::FOCUSABLE, true);
        tree.set_focus(Some(field));
        tree.set_mouse_grab(Some(field));
        drain(&mut tree);

        assert!(tree.remove_child(root, panel));
        assert_eq!(tree.focus(), None);
        assert_eq!(tree.mouse_grab(), None);
        let posted = drain(&mut tree);
        assert_eq!(posted.len(), 1);
        assert!(command::equal(&posted[0], FOCUS_LOST));
        assert_eq!(command::pointer(&posted[0]), Some(field));

        assert!(!tree.dispatch(root, &InputEvent::key_down(Key::Enter)));
        assert_eq!(keys.get(), 0);
    }
}
