//! Event routing, hit-testing and the command queue.
//!
//! # Event flow
//!
//! [`WidgetTree::process_event`] is the entry point for platform input:
//!
//! 1. While a mouse grab is set, motion and button release go straight to
//!    the grabbing widget.
//! 2. Motion clears hover; the walk below hands it to the deepest `HOVER`
//!    node under the pointer.
//! 3. [`WidgetTree::dispatch`] runs from the root.
//! 4. An unconsumed Tab / Shift+Tab moves focus.
//!
//! [`WidgetTree::dispatch`] resolves one node:
//!
//! 1. At the root, keyboard events and commands are first offered to the
//!    focused widget, then everything is offered to the on-top stack,
//!    topmost first.
//! 2. The node's filter may reject the event (disabled nodes reject input,
//!    hidden nodes reject pointer events, destroyed nodes accept only
//!    `focus.lost`).
//! 3. Children are offered the event in reverse order, so whatever is drawn
//!    last gets it first. Children already tried (the focus target, visible
//!    on-top nodes) are skipped.
//! 4. The node's own [`Widget::process_event`] runs, then the base
//!    processing driven by its flags.
//!
//! [`Widget::process_event`]: super::Widget::process_event

use std::collections::VecDeque;

use tracing::{trace, warn};
use trellis_core::command::{self, PostedCommand};
use trellis_core::logging::targets;
use trellis_core::{CoreResult, Int2, PeriodicTimer, WidgetId};

use super::events::{InputEvent, Key};
use super::flags::WidgetFlags;
use super::traits::WidgetContext;
use super::tree::WidgetTree;

/// Result of delivering an event to a single widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// The widget consumed the event.
    Accepted,
    /// The widget saw the event and declined it.
    Ignored,
    /// The widget's filter rejected the event before it was seen.
    Rejected,
    /// The target widget was not found.
    WidgetNotFound,
}

impl DispatchResult {
    /// Check if the event was consumed.
    pub fn was_handled(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl WidgetTree {
    /// Route a platform event through the tree. Returns whether it was consumed.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        if let Some(grab) = self.focus.mouse_grab {
            if matches!(event, InputEvent::MouseMotion { .. } | InputEvent::MouseButtonUp { .. }) {
                trace!(target: targets::DISPATCH, ?grab, "routing pointer event to mouse grab");
                return self.dispatch(grab, event);
            }
        }
        if matches!(event, InputEvent::MouseMotion { .. }) {
            self.set_hover(None);
        }
        let root = self.root;
        if self.dispatch(root, event) {
            return true;
        }
        if self.config.tab_navigation {
            if let InputEvent::KeyDown { key: Key::Tab, modifiers } = event {
                return if modifiers.shift {
                    self.focus_previous()
                } else {
                    self.focus_next()
                };
            }
        }
        false
    }

    /// Offer `event` to `id` and its subtree. Returns whether it was consumed.
    #[tracing::instrument(skip(self, event), target = "trellis::widget::dispatch", level = "trace")]
    pub fn dispatch(&mut self, id: WidgetId, event: &InputEvent) -> bool {
        if !self.exists(id) {
            return false;
        }
        let via_focus = event.is_keyboard() || event.as_command().is_some();
        if id == self.root {
            if via_focus {
                if let Some(focused) = self.focus.focused {
                    if focused != id && self.dispatch(focused, event) {
                        trace!(target: targets::DISPATCH, ?focused, "consumed by focus");
                        return true;
                    }
                }
            }
            let on_top: Vec<WidgetId> = self.on_top.entries().to_vec();
            for &top in on_top.iter().rev() {
                if top != id && self.is_visible(top) && self.dispatch(top, event) {
                    trace!(target: targets::DISPATCH, ?top, "consumed on top");
                    return true;
                }
            }
        } else if let InputEvent::MouseMotion { pos } = event {
            self.update_hover(id, *pos);
        }

        if !self.filter_event(id, event) {
            return false;
        }
        let focused = self.focus.focused;
        let children: Vec<WidgetId> = self.children(id).to_vec();
        for &child in children.iter().rev() {
            if via_focus && Some(child) == focused {
                continue;
            }
            if self.has_flags(child, WidgetFlags::KEEP_ON_TOP) && self.is_visible(child) {
                continue;
            }
            if self.dispatch(child, event) {
                return true;
            }
        }
        self.process_own(id, event)
    }

    /// Deliver `event` to `id` alone, without children or the focus shortcut.
    pub fn deliver(&mut self, id: WidgetId, event: &InputEvent) -> DispatchResult {
        if !self.exists(id) {
            return DispatchResult::WidgetNotFound;
        }
        if !self.filter_event(id, event) {
            return DispatchResult::Rejected;
        }
        if self.process_own(id, event) {
            DispatchResult::Accepted
        } else {
            DispatchResult::Ignored
        }
    }

    fn update_hover(&mut self, id: WidgetId, pos: Int2) {
        let hover = self.focus.hover;
        // A descendant of the current hover takes over from it.
        let may_take = hover.is_none_or(|h| self.has_parent(id, h));
        if may_take
            && self.has_flags(id, WidgetFlags::HOVER)
            && !self.has_flags(id, WidgetFlags::DISABLED)
            && !self.is_hidden_self(id)
            && self.contains(id, pos)
        {
            self.set_hover(Some(id));
        }
    }

    fn filter_event(&self, id: WidgetId, event: &InputEvent) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if node.is_destroy_pending() {
            return event
                .as_command()
                .is_some_and(|cmd| command::equal(cmd, "focus.lost"));
        }
        let is_key = event.is_keyboard();
        let is_pointer = event.is_pointer();
        if node.has(WidgetFlags::DISABLED) && (is_key || is_pointer) {
            return false;
        }
        if is_pointer && self.is_hidden_self(id) {
            return false;
        }
        true
    }

    /// The behavior's handler, then base processing.
    fn process_own(&mut self, id: WidgetId, event: &InputEvent) -> bool {
        let handled = self
            .with_behavior(id, |behavior, cx| behavior.process_event(cx, event))
            .unwrap_or(false);
        if handled {
            trace!(target: targets::DISPATCH, ?id, "consumed by behavior");
            return true;
        }
        self.base_process(id, event)
    }

    /// Processing driven by flags, shared by every widget.
    fn base_process(&mut self, id: WidgetId, event: &InputEvent) -> bool {
        let flags = self.flags(id);
        let grabbed = self.focus.mouse_grab == Some(id);
        match event {
            InputEvent::MouseButtonDown { button, pos } | InputEvent::MouseButtonUp { button, pos }
                if flags.contains(WidgetFlags::COMMAND_ON_CLICK) && (grabbed || self.contains(id, *pos)) =>
            {
                let arg = i32::from(matches!(event, InputEvent::MouseButtonDown { .. }));
                let text = format!(
                    "mouse.clicked arg:{arg} button:{} coord:{} {}",
                    button.number(),
                    pos.x,
                    pos.y
                );
                self.post_command(Some(id), &text);
                return true;
            }
            InputEvent::MouseMotion { pos } if flags.contains(WidgetFlags::COMMAND_ON_CLICK) && grabbed => {
                self.post_command(Some(id), &format!("mouse.moved coord:{} {}", pos.x, pos.y));
                return true;
            }
            InputEvent::Command(text) => {
                if command::equal(text, "theme.changed") {
                    if let Some(buffer) = self.node_mut(id).and_then(|node| node.draw_buffer.as_mut()) {
                        buffer.dirty = true;
                    }
                }
                if let Some(handler) = self.node(id).and_then(|node| node.command_handler) {
                    let mut cx = WidgetContext::new(self, id);
                    if handler(&mut cx, text) {
                        trace!(target: targets::DISPATCH, ?id, command = %text, "consumed by command handler");
                        return true;
                    }
                }
            }
            _ => {}
        }
        if flags.contains(WidgetFlags::COMMAND_ON_MOUSE_MISS) {
            if let InputEvent::MouseButtonDown { button, pos } = event {
                if !self.contains(id, *pos) {
                    let text = format!(
                        "mouse.missed arg:1 button:{} coord:{} {}",
                        button.number(),
                        pos.x,
                        pos.y
                    );
                    self.post_command(Some(id), &text);
                    return true;
                }
            }
        }
        flags.contains(WidgetFlags::MOUSE_MODAL) && event.is_pointer()
    }

    // =========================================================================
    // Hit-testing
    // =========================================================================

    /// The topmost hittable node under `pos` in the subtree of `id`.
    ///
    /// Mirrors dispatch order: the on-top stack first (from the root), then
    /// children in reverse, then the node itself.
    pub fn hit_child(&self, id: WidgetId, pos: Int2) -> Option<WidgetId> {
        let node = self.node(id)?;
        if node.is_destroy_pending() || self.is_hidden_self(id) {
            return None;
        }
        if id == self.root {
            for &top in self.on_top.entries().iter().rev() {
                if let Some(found) = self.hit_child(top, pos) {
                    return Some(found);
                }
            }
        }
        for &child in node.children.iter().rev() {
            if self.has_flags(child, WidgetFlags::KEEP_ON_TOP) {
                continue;
            }
            if let Some(found) = self.hit_child(child, pos) {
                return Some(found);
            }
        }
        let hittable = node.has(WidgetFlags::HITTABLE | WidgetFlags::MOUSE_MODAL)
            || node.behavior.as_deref().is_some_and(|behavior| behavior.is_hittable());
        (hittable && !node.has(WidgetFlags::UNHITTABLE) && self.contains(id, pos)).then_some(id)
    }

    /// [`hit_child`](Self::hit_child) from the root.
    pub fn hit_test(&self, pos: Int2) -> Option<WidgetId> {
        self.hit_child(self.root, pos)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Queue a command for delivery by [`process_commands`](Self::process_commands).
    ///
    /// A command from a widget carries its `ptr` unless prefixed with `!`.
    /// Commands without a source are broadcast. Commands from a reaped widget
    /// are dropped.
    pub fn post_command(&mut self, source: Option<WidgetId>, text: &str) {
        if let Some(source) = source {
            if !self.exists(source) {
                warn!(target: targets::COMMAND, ?source, command = %text, "dropping command from deleted widget");
                return;
            }
        }
        let posted = PostedCommand::parse(text, source).unwrap_or_else(|| PostedCommand {
            text: text.to_string(),
            global: true,
        });
        trace!(target: targets::COMMAND, command = %posted.text, global = posted.global, "posted");
        self.commands.push_back(posted.text);
    }

    /// Register a periodic command on behalf of `id`.
    ///
    /// The command is addressed like one posted by `id` and replaces any
    /// earlier registration of the same widget.
    pub fn add_periodic(&mut self, id: WidgetId, text: &str) {
        if let Some(posted) = PostedCommand::parse(text, Some(id)) {
            self.periodic.add(id, posted.text);
        }
    }

    /// Start the periodic timer at the configured interval.
    ///
    /// Stop or drop the returned guard to end it.
    pub fn start_periodic_timer(&self) -> CoreResult<PeriodicTimer> {
        self.periodic.start_timer(self.config.periodic_interval)
    }

    /// Commands waiting for delivery.
    pub fn queued_commands(&self) -> &VecDeque<String> {
        &self.commands
    }

    /// Deliver queued and due periodic commands. Returns how many were consumed.
    ///
    /// Commands posted while these are delivered wait for the next call.
    pub fn process_commands(&mut self) -> usize {
        let mut queue = std::mem::take(&mut self.commands);
        queue.extend(self.periodic.drain());
        let mut consumed = 0;
        while let Some(text) = queue.pop_front() {
            if self.dispatch_command(&text) {
                consumed += 1;
            } else {
                trace!(target: targets::COMMAND, command = %text, "not consumed");
            }
        }
        consumed
    }

    /// Deliver a command immediately. Returns whether it was consumed.
    pub fn dispatch_command(&mut self, text: &str) -> bool {
        let event = InputEvent::command(text);
        if self.process_event(&event) {
            return true;
        }
        // Destroyed widgets are out of the tree but still get their cleanup.
        if let Some(target) = command::pointer(text) {
            if self.node(target).is_some_and(|node| node.is_destroy_pending()) {
                return self.deliver(target, &event).was_handled();
            }
        }
        false
    }

    /// Whether `cmd` is `name` and was posted by `id` or one of its descendants.
    pub fn is_command(&self, cmd: &str, id: WidgetId, name: &str) -> bool {
        command::equal(cmd, name)
            && command::pointer(cmd).is_some_and(|source| self.is_in_subtree(source, id))
    }
}
