#![forbid(unsafe_code)]

//! Engine configuration.

use crate::tree::NodeId;

/// Axis along which container children are compared against the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Compare x-centers (row-like containers).
    Horizontal,
    /// Compare y-centers (column-like containers).
    #[default]
    Vertical,
}

/// Non-predicate knobs. Decision callbacks live on
/// [`DragBehavior`](crate::behavior::DragBehavior) instead.
#[derive(Debug, Clone)]
pub struct Options {
    /// When true, dropping a copy back onto the source container is a real
    /// reorder of the source rather than a no-op (default: false).
    pub copy_sort_source: bool,
    /// Return the item to its original position when released outside any
    /// accepting container (default: false).
    pub revert_on_spill: bool,
    /// Detach the item from the tree when released outside any accepting
    /// container (default: false).
    pub remove_on_spill: bool,
    /// Axis used for insertion-point computation (default: vertical).
    pub direction: Axis,
    /// Horizontal movement tolerance before a grab promotes to a drag
    /// (default: 0, any movement qualifies).
    pub slide_factor_x: f32,
    /// Vertical movement tolerance before a grab promotes to a drag
    /// (default: 0).
    pub slide_factor_y: f32,
    /// Do not promote a grab while the pointer is over a text-input-like
    /// element (default: true).
    pub ignore_input_text_selection: bool,
    /// Where the mirror is appended. `None` means the environment root.
    pub mirror_root: Option<NodeId>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            copy_sort_source: false,
            revert_on_spill: false,
            remove_on_spill: false,
            direction: Axis::Vertical,
            slide_factor_x: 0.0,
            slide_factor_y: 0.0,
            ignore_input_text_selection: true,
            mirror_root: None,
        }
    }
}
