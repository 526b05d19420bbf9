//! Presentation parameters and resolver tuning.

use crate::geometry::SAME_ROW_FACTOR;

/// Presentation parameters handed to the arrow renderer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowStyle {
    pub color: String,
    pub stroke_width: f64,
    pub head_size: f64,
    pub curveness: f64,
    pub z_index: i32,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            color: "#394368".to_owned(),
            stroke_width: 2.5,
            head_size: 6.0,
            curveness: 0.55,
            z_index: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Multiplier on the shorter node height for the same-row test.
    pub same_row_factor: f64,
    /// Recompute kicks after mount, in milliseconds, to catch late layout.
    pub settle_delays_ms: [i32; 2],
    /// Register scroll and resize listeners as passive.
    pub passive_listeners: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            same_row_factor: SAME_ROW_FACTOR,
            settle_delays_ms: [0, 200],
            passive_listeners: true,
        }
    }
}
