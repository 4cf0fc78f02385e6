//! Deferred destruction and visual-offset animation.
//!
//! # Destruction
//!
//! A node goes through two states before it disappears:
//!
//! ```text
//! Live --destroy--> Detached --reap_pending (offset finished)--> removed
//! ```
//!
//! [`WidgetTree::destroy`] does all the logical work synchronously: the
//! subtree loses focus, hover, mouse grab, on-top membership and periodic
//! registrations, and the node is unlinked from its parent's child list.
//! From that point nothing observes it through dispatch, hit-testing or
//! focus. The node keeps its parent back-link so its coordinates still
//! resolve while an outgoing slide plays. [`WidgetTree::reap_pending`] frees
//! it once its visual offset has settled.
//!
//! # Visual offset
//!
//! A rendering-only translation along one axis. Arrangement never sees it.
//! While it runs the node carries `VISUAL_OFFSET` and is listed as a ticker;
//! [`WidgetTree::tick`] clears both when the animation finishes.

use std::time::{Duration, Instant};

use tracing::{debug, trace};
use trellis_core::logging::targets;
use trellis_core::{Axis, WidgetId};

use super::animation::Easing;
use super::base::Lifecycle;
use super::flags::WidgetFlags;
use super::tree::WidgetTree;
use crate::error::{TreeError, TreeResult};

impl WidgetTree {
    /// Destroy `id` and its subtree.
    ///
    /// Fails for the root, for unknown ids and for nodes already destroyed
    /// (including descendants of a destroyed node).
    pub fn try_destroy(&mut self, id: WidgetId) -> TreeResult<()> {
        if id == self.root {
            return Err(TreeError::RootNotDestroyable);
        }
        let node = self.node(id).ok_or(TreeError::WidgetNotFound(id))?;
        if node.is_destroy_pending() {
            return Err(TreeError::AlreadyDestroyed(id));
        }

        let subtree = self.subtree(id);
        self.release_focus_in(id);
        self.remove_on_top_in(id);
        for &node in &subtree {
            self.periodic.remove(node);
            if let Some(node) = self.node_mut(node) {
                node.lifecycle = Lifecycle::Detached;
            }
        }

        let parent = self.parent(id);
        if let Some(parent) = parent.and_then(|parent| self.node_mut(parent)) {
            parent.children.retain(|&child| child != id);
        }
        self.pending.push(id);
        self.needs_redraw = true;
        debug!(target: targets::LIFECYCLE, ?id, ?parent, nodes = subtree.len(), "destroyed widget");
        Ok(())
    }

    /// Destroy `id` and its subtree.
    ///
    /// # Panics
    ///
    /// Panics if [`try_destroy`](Self::try_destroy) would fail.
    pub fn destroy(&mut self, id: WidgetId) {
        if let Err(err) = self.try_destroy(id) {
            panic!("destroy: {err}");
        }
    }

    /// Destroyed nodes not yet freed, in destruction order.
    pub fn pending(&self) -> &[WidgetId] {
        &self.pending
    }

    /// Whether `id` was destroyed and is waiting to be freed.
    pub fn is_destroy_pending(&self, id: WidgetId) -> bool {
        self.node(id).is_some_and(|node| node.is_destroy_pending())
    }

    /// Free every pending node whose visual offset has finished at `now`.
    ///
    /// Returns how many pending nodes were freed; their subtrees go with them.
    pub fn reap_pending(&mut self, now: Instant) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let mut reaped = 0;
        for id in pending {
            let settled = self
                .node(id)
                .map(|node| node.visual_offset.anim.is_finished(now));
            match settled {
                Some(true) => {
                    self.free_subtree(id);
                    reaped += 1;
                }
                Some(false) => self.pending.push(id),
                None => {}
            }
        }
        if reaped > 0 {
            trace!(target: targets::LIFECYCLE, reaped, remaining = self.pending.len(), "reaped widgets");
        }
        reaped
    }

    fn free_subtree(&mut self, id: WidgetId) {
        for node in self.subtree(id) {
            self.nodes.remove(node);
            self.tickers.retain(|&ticker| ticker != node);
        }
    }

    // =========================================================================
    // Visual offset
    // =========================================================================

    /// Animate the rendering translation of `id` to `value` along `axis`.
    ///
    /// A zero `duration` applies the value at once; setting 0 that way ends
    /// the offset entirely. `easing` defaults to the tree's configured easing.
    pub fn set_visual_offset(
        &mut self,
        id: WidgetId,
        value: f32,
        duration: Duration,
        easing: Option<Easing>,
        axis: Axis,
    ) {
        let now = self.now;
        let easing = easing.unwrap_or(self.config.default_easing);
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let running = node.has(WidgetFlags::VISUAL_OFFSET);
        let offset = &mut node.visual_offset;
        offset.axis = axis;
        if duration.is_zero() {
            offset.anim.set_immediate(value, now);
            self.set_flags(id, WidgetFlags::VISUAL_OFFSET, value != 0.0);
            self.tickers.retain(|&ticker| ticker != id);
        } else {
            if !running {
                // The offset was not applied, so the node is drawn at rest.
                offset.anim.set_immediate(0.0, now);
            }
            offset.anim.set_target(value, duration, easing, now);
            self.set_flags(id, WidgetFlags::VISUAL_OFFSET, true);
            if !self.tickers.contains(&id) {
                self.tickers.push(id);
            }
        }
        trace!(target: targets::LIFECYCLE, ?id, value, ?duration, ?axis, "visual offset set");
        self.refresh(id);
    }

    /// Whether `id` has a running visual-offset animation.
    pub fn is_animating(&self, id: WidgetId) -> bool {
        self.tickers.contains(&id)
    }

    /// Advance the tree clock to `now` and settle finished animations.
    ///
    /// Returns whether any animation ran, meaning the frame must be redrawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.now = now;
        if self.tickers.is_empty() {
            return false;
        }
        let tickers = std::mem::take(&mut self.tickers);
        for id in tickers {
            let finished = match self.node(id) {
                Some(node) => node.visual_offset.anim.is_finished(now),
                None => continue,
            };
            if finished {
                self.set_flags(id, WidgetFlags::VISUAL_OFFSET, false);
                trace!(target: targets::LIFECYCLE, ?id, "visual offset finished");
            } else {
                self.tickers.push(id);
            }
        }
        self.needs_redraw = true;
        true
    }
}
