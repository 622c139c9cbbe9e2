//! Errors and anomalies reported by the strip.
//!
//! Two families exist. [`StripError`] is returned when the host hands the
//! strip a configuration it cannot work with; the value is rejected and the
//! previous configuration stays in place. [`Anomaly`] is never returned as a
//! failure: it describes an inconsistency the strip repaired or an operation
//! it skipped, and is logged and forwarded to the listener.

use thiserror::Error;

/// A configuration value rejected at the setter boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StripError {
    /// The eager-load window was given a negative number of screens.
    #[error("the number of screens to eagerly load must be greater than or equal to 0, got {0}")]
    NegativeEagerLoadScreens(i32),
    /// Collapsed pages must hold at least one item.
    #[error("items per page must be at least 1, got {0}")]
    InvalidItemsPerPage(usize),
    /// The collapsed width fraction must lie in `(0, 1]`.
    #[error("collapsed width fraction must be within (0, 1], got {0}")]
    InvalidWidthFraction(f32),
    /// The display width must be positive.
    #[error("display width must be positive, got {0}")]
    InvalidDisplayWidth(i32),
    /// Heights cannot be negative.
    #[error("{which} height must not be negative, got {value}")]
    NegativeHeight {
        /// Which height was rejected ("collapsed" or "expanded").
        which: &'static str,
        /// The rejected value.
        value: i32,
    },
    /// A persisted bitmap quality ordinal does not name a known quality.
    #[error("unknown bitmap quality ordinal {0}")]
    UnknownBitmapQuality(i32),
}

/// A non-fatal inconsistency the strip detected while handling a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Anomaly {
    /// A computed snap target did not fall on a page boundary and was floored.
    #[error("target position {requested} is not a paging position, using {repaired}")]
    InvalidPagingTarget {
        /// The position the snap rules produced.
        requested: usize,
        /// The page start that was used instead.
        repaired: usize,
    },
    /// Selectable items were requested for a position that does not start a
    /// page; a single item is reported instead.
    #[error("attempted to get selectable items for invalid paging position {0}")]
    InvalidSelectionPosition(usize),
    /// A fling snap was requested without a horizontal velocity.
    #[error("a fling velocity was not specified when snapping in a fling gesture")]
    MissingFlingVelocity,
    /// The list view could not resolve its first visible item.
    #[error("the first visible item could not be resolved")]
    FirstVisibleUnresolved,
    /// An expand/collapse was requested for an item that is not realized.
    #[error("anchor item {0} is not realized, ignoring toggle")]
    AnchorNotRealized(usize),
}
