//! Logging and debugging facilities for Trellis.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - Debug visualization for widget trees
//!
//! # Tracing Integration
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis::widget::layout=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! Anything that implements [`TreeSource`] can be printed with [`TreeDebug`]:
//!
//! ```ignore
//! use trellis_core::logging::TreeDebug;
//!
//! println!("{}", TreeDebug::new().format_subtree(&tree, tree.root()));
//! ```

use std::fmt::Write as FmtWrite;

use crate::geometry::Rect;
use crate::id::WidgetId;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Command protocol helpers.
    pub const COMMAND: &str = "trellis_core::command";
    /// Periodic command registry and timer thread.
    pub const PERIODIC: &str = "trellis_core::periodic";
    /// Tree structure changes (attach, detach, flags).
    pub const TREE: &str = "trellis::widget::tree";
    /// Arrangement pass.
    pub const LAYOUT: &str = "trellis::widget::layout";
    /// Event and command dispatch.
    pub const DISPATCH: &str = "trellis::widget::dispatch";
    /// Focus, hover and mouse grab.
    pub const FOCUS: &str = "trellis::widget::focus";
    /// Destruction, reaping and visual-offset animation.
    pub const LIFECYCLE: &str = "trellis::widget::lifecycle";
}

/// Summary of one node, as reported by a [`TreeSource`].
#[derive(Debug, Clone, Default)]
pub struct NodeSummary {
    /// The node's string id. May be empty.
    pub name: String,
    /// Short name of the node's behavior type.
    pub kind: &'static str,
    /// Rectangle relative to the parent.
    pub rect: Rect,
    /// Names of the flags that are set.
    pub flags: Vec<&'static str>,
    /// Child ids in insertion order.
    pub children: Vec<WidgetId>,
}

/// A tree that can describe its nodes for debug output.
pub trait TreeSource {
    /// Describe `id`, or `None` if it does not exist.
    fn describe(&self, id: WidgetId) -> Option<NodeSummary>;
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show widget ids.
    pub show_ids: bool,
    /// Whether to show behavior type names.
    pub show_kinds: bool,
    /// Whether to show rectangles.
    pub show_geometry: bool,
    /// Whether to show set flags.
    pub show_flags: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_kinds: true,
            show_geometry: true,
            show_flags: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_flags: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_kinds: false,
            show_geometry: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing widget trees.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`. An unknown root formats as an empty string.
    pub fn format_subtree(&self, source: &impl TreeSource, root: WidgetId) -> String {
        let mut output = String::new();
        self.format_into(source, root, 0, true, &mut output);
        output
    }

    fn format_into(
        &self,
        source: &impl TreeSource,
        id: WidgetId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(node) = source.describe(id) else {
            return;
        };

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(if node.name.is_empty() {
            "(unnamed)"
        } else {
            &node.name
        });
        // Writing into a String cannot fail.
        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_kinds {
            let _ = write!(output, " ({})", node.kind);
        }
        if self.options.show_geometry {
            let r = node.rect;
            let _ = write!(output, " {},{} {}x{}", r.left(), r.top(), r.width(), r.height());
        }
        if self.options.show_flags && !node.flags.is_empty() {
            let _ = write!(output, " <{}>", node.flags.join(" "));
        }
        output.push('\n');

        let count = node.children.len();
        for (i, child) in node.children.into_iter().enumerate() {
            self.format_into(source, child, depth + 1, i + 1 == count, output);
        }
    }

    /// Build the prefix string for a tree node.
    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.extend(std::iter::repeat_n(' ', self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    struct FakeTree {
        nodes: SlotMap<WidgetId, NodeSummary>,
    }

    impl TreeSource for FakeTree {
        fn describe(&self, id: WidgetId) -> Option<NodeSummary> {
            self.nodes.get(id).cloned()
        }
    }

    fn fake_tree() -> (FakeTree, WidgetId) {
        let mut nodes: SlotMap<WidgetId, NodeSummary> = SlotMap::with_key();
        let a = nodes.insert(NodeSummary {
            name: "a".into(),
            kind: "Label",
            rect: Rect::new(0, 0, 10, 5),
            ..Default::default()
        });
        let b = nodes.insert(NodeSummary {
            name: String::new(),
            kind: "Button",
            rect: Rect::new(10, 0, 20, 5),
            flags: vec!["focusable"],
            ..Default::default()
        });
        let root = nodes.insert(NodeSummary {
            name: "root".into(),
            kind: "Container",
            rect: Rect::new(0, 0, 100, 50),
            children: vec![a, b],
            ..Default::default()
        });
        (FakeTree { nodes }, root)
    }

    #[test]
    fn test_format_ascii() {
        let (tree, root) = fake_tree();
        let debug = TreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        });
        let text = debug.format_subtree(&tree, root);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "root (Container) 0,0 100x50");
        assert_eq!(lines[1], "+-- a (Label) 0,0 10x5");
        assert_eq!(lines[2], "`-- (unnamed) (Button) 10,0 20x5");
    }

    #[test]
    fn test_flags_and_depth_limit() {
        let (tree, root) = fake_tree();
        let mut options = TreeFormatOptions::detailed();
        options.max_depth = Some(0);
        let text = TreeDebug::with_options(options).format_subtree(&tree, root);
        assert_eq!(text.lines().count(), 1);

        let text = TreeDebug::with_options(TreeFormatOptions {
            show_flags: true,
            ..TreeFormatOptions::minimal()
        })
        .format_subtree(&tree, root);
        assert!(text.contains("<focusable>"));
    }
}
