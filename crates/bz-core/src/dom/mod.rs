//! DOM helpers
//!
//! Geometry, `<select>` and class-list helpers expressed over small traits.
//! `bz-wasm` implements the traits for `web_sys` elements; `bz-testkit`
//! implements them for in-memory mock elements.

pub mod class_list;
pub mod geometry;
pub mod select;

pub use class_list::{toggle_class, ClassList};
pub use geometry::{
    find_pos_x, find_pos_y, full_height, full_width, overlay_below, LayoutNode, OverlayPlacement,
    Position, StyleTarget, OVERLAY_Z_INDEX,
};
pub use select::{
    clear_options, create_option, option_index, populate_from_pairs, preselected_options,
    selected_options, value_selected, SelectControl, SelectOption,
};

/// Errors raised by DOM handlers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The host has no document (not running in a page)
    #[error("No document available")]
    NoDocument,

    /// A host DOM call threw
    #[error("DOM operation `{operation}` failed: {reason}")]
    Operation {
        /// The DOM call that failed
        operation: &'static str,
        /// Host-provided reason
        reason: String,
    },

    /// An option index past the end of the list
    #[error("Option index {index} out of range ({len} options)")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of options
        len: usize,
    },
}

impl DomError {
    /// Failure of the named DOM call.
    pub fn operation(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Operation {
            operation,
            reason: reason.into(),
        }
    }
}
