//! Tree configuration.

use std::time::Duration;

use trellis_core::Int2;
use trellis_core::periodic::DEFAULT_INTERVAL;

use crate::widget::animation::Easing;

/// Default size of the display surface.
pub const DEFAULT_ROOT_SIZE: Int2 = Int2 { x: 800, y: 600 };

/// Configuration for a [`WidgetTree`](crate::widget::WidgetTree).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Initial size of the root node (the display surface).
    pub root_size: Int2,
    /// Interval of the periodic-command timer.
    pub periodic_interval: Duration,
    /// Easing used when a visual offset is set without one.
    pub default_easing: Easing,
    /// Whether an unconsumed Tab / Shift+Tab moves focus.
    pub tab_navigation: bool,
    /// String id of the root node.
    pub root_id: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_size: DEFAULT_ROOT_SIZE,
            periodic_interval: DEFAULT_INTERVAL,
            default_easing: Easing::default(),
            tab_navigation: true,
            root_id: "root".to_string(),
        }
    }
}

impl TreeConfig {
    /// Create a configuration for a surface of the given size.
    pub fn with_root_size(size: Int2) -> Self {
        Self {
            root_size: size,
            ..Default::default()
        }
    }
}

/// Builder for [`TreeConfig`].
#[derive(Debug, Default)]
pub struct TreeConfigBuilder {
    config: TreeConfig,
}

impl TreeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display surface size.
    pub fn root_size(mut self, size: Int2) -> Self {
        self.config.root_size = size;
        self
    }

    /// Set the periodic-command interval.
    pub fn periodic_interval(mut self, interval: Duration) -> Self {
        self.config.periodic_interval = interval;
        self
    }

    /// Set the easing used when none is given.
    pub fn default_easing(mut self, easing: Easing) -> Self {
        self.config.default_easing = easing;
        self
    }

    /// Enable or disable Tab focus navigation.
    pub fn tab_navigation(mut self, enabled: bool) -> Self {
        self.config.tab_navigation = enabled;
        self
    }

    /// Set the root's string id.
    pub fn root_id(mut self, id: impl Into<String>) -> Self {
        self.config.root_id = id.into();
        self
    }

    pub fn build(self) -> TreeConfig {
        self.config
    }
}
