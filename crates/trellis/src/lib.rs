//! Trellis - a retained-mode widget tree.
//!
//! This is the main crate. It re-exports the core types from
//! `trellis-core` and adds the tree itself: flag-driven arrangement,
//! hit-testing and event dispatch, focus and hover, the on-top stack,
//! visual-offset animation and deferred destruction.
//!
//! # Example
//!
//! ```
//! use trellis::config::TreeConfig;
//! use trellis::widget::{Container, WidgetFlags, WidgetTree};
//!
//! let mut tree = WidgetTree::new(TreeConfig::default());
//! let root = tree.root();
//! let field = tree.create(Container);
//! tree.add_child(root, field);
//! tree.set_flags(field, WidgetFlags::FOCUSABLE, true);
//!
//! tree.set_focus(Some(field));
//! assert_eq!(tree.focus(), Some(field));
//! assert_eq!(tree.queued_commands().len(), 1);
//! ```

pub use trellis_core::*;

pub mod config;
pub mod error;
pub mod widget;

pub use config::{TreeConfig, TreeConfigBuilder};
pub use error::{TreeError, TreeResult};
pub use widget::{Widget, WidgetFlags, WidgetTree};
