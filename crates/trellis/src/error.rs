//! Error types for tree operations.
//!
//! Structural misuse (attaching a parented node, focusing a node that cannot
//! take focus, destroying twice) is a programmer error. The `try_*` methods
//! on [`WidgetTree`](crate::widget::WidgetTree) report it as a [`TreeError`];
//! their plain counterparts panic with the same message.

use thiserror::Error;
use trellis_core::WidgetId;

/// Errors reported by the fallible tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not refer to a node in this tree.
    #[error("widget {0:?} not found")]
    WidgetNotFound(WidgetId),

    /// The child already has a parent.
    #[error("widget {child:?} already has parent {parent:?}")]
    AlreadyParented { child: WidgetId, parent: WidgetId },

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CircularParentage { child: WidgetId, parent: WidgetId },

    /// The node is not flagged focusable.
    #[error("widget {0:?} is not focusable")]
    NotFocusable(WidgetId),

    /// The node was already destroyed and is waiting to be reaped.
    #[error("widget {0:?} is already destroyed")]
    AlreadyDestroyed(WidgetId),

    /// The root of a tree lives as long as the tree.
    #[error("the root widget cannot be destroyed")]
    RootNotDestroyable,

    /// A size or offset reference would point at the node itself, one of its
    /// ancestors, or close a reference loop.
    #[error("widget {widget:?} cannot reference {target:?}")]
    InvalidReference { widget: WidgetId, target: WidgetId },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
