//! The widget tree.
//!
//! This module provides:
//!
//! - [`WidgetTree`]: the per-surface UI context owning every node
//! - [`Widget`] trait: per-node behavior (events, painting, resize hook)
//! - [`WidgetFlags`]: layout, visibility and input flags
//! - Event dispatch, hit-testing, focus, the on-top stack, deferred
//!   destruction and visual offsets
//!
//! # Overview
//!
//! Nodes are created standalone with [`WidgetTree::create`] and attached
//! with [`WidgetTree::add_child`]. Geometry is computed by
//! [`WidgetTree::arrange`] from flags and content; input enters through
//! [`WidgetTree::process_event`]; widgets talk to each other through posted
//! command strings delivered by [`WidgetTree::process_commands`].
//!
//! ```
//! use trellis::widget::{Container, WidgetFlags, WidgetTree};
//! use trellis::config::TreeConfig;
//! use trellis::Int2;
//!
//! let mut tree = WidgetTree::new(TreeConfig::with_root_size(Int2::new(300, 40)));
//! let root = tree.root();
//! let row = tree.create(Container);
//! tree.add_child(root, row);
//! tree.set_size(row, Int2::new(300, 40));
//! tree.set_flags(row, WidgetFlags::ARRANGE_HORIZONTAL | WidgetFlags::RESIZE_CHILDREN, true);
//!
//! for _ in 0..3 {
//!     let cell = tree.create(Container);
//!     tree.add_child(row, cell);
//! }
//! tree.arrange(root);
//!
//! let widths: Vec<i32> = tree.children(row).iter().map(|&c| tree.size(c).x).collect();
//! assert_eq!(widths, vec![100, 100, 100]);
//! ```
//!
//! # Frame loop
//!
//! A host drives a tree once per frame:
//!
//! 1. Feed platform input to [`WidgetTree::process_event`]
//! 2. Deliver posted commands with [`WidgetTree::process_commands`]
//! 3. Advance animations with [`WidgetTree::tick`]
//! 4. Free finished destructions with [`WidgetTree::reap_pending`]
//! 5. Paint with [`WidgetTree::paint`] when [`WidgetTree::take_needs_redraw`]
//!    says so

pub mod animation;
mod base;
mod dispatcher;
mod events;
mod flags;
mod focus;
mod layout;
mod lifecycle;
mod on_top;
mod painting;
mod traits;
mod tree;


pub use base::{ColorId, DrawBuffer, Lifecycle};
pub use dispatcher::DispatchResult;
pub use events::{InputEvent, Key, KeyboardModifiers, MouseButton};
pub use flags::{Anchor, WidgetFlags};
pub use focus::{FOCUS_GAINED, FOCUS_LOST, FocusDirection};
pub use painting::{PaintContext, Painter};
pub use traits::{CommandHandler, Container, Widget, WidgetContext};
pub use tree::WidgetTree;
