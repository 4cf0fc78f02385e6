//! Core types for Trellis.
//!
//! This crate provides the framework-independent foundations of the Trellis
//! widget tree:
//!
//! - **Widget ids**: generational arena keys that never dangle
//! - **Geometry**: integer points, sizes, rectangles and padding
//! - **Commands**: the string protocol widgets use to talk to each other
//! - **Periodic commands**: a thread-safe registry of timer-driven commands
//! - **Logging**: tracing targets and a tree debug formatter
//!
//! # Command Example
//!
//! ```
//! use trellis_core::command;
//!
//! let cmd = "tabs.changed arg:2 id:settings";
//! assert!(command::equal(cmd, "tabs.changed"));
//! assert_eq!(command::arg(cmd), 2);
//! assert_eq!(command::string_arg(cmd, "id"), Some("settings"));
//! ```

mod error;
mod id;

pub mod command;
pub mod geometry;
pub mod logging;
pub mod periodic;

pub use command::PostedCommand;
pub use error::{CoreError, CoreResult};
pub use geometry::{Axis, Int2, Padding, Rect};
pub use id::WidgetId;
pub use logging::{NodeSummary, TreeDebug, TreeFormatOptions, TreeSource, TreeStyle};
pub use periodic::{Periodic, PeriodicTimer};
