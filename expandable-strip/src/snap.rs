//! Deciding which page a drag or fling settles on.
//!
//! A fling always advances exactly one page in its direction, however fast it
//! is. A released drag moves to the adjacent page only once the first visible
//! item has travelled more than half an item width.
use tracing::{debug, error};

use crate::{error::Anomaly, geometry::Geometry, paging::PagingIndex, px::Px};

/// The gesture that ended and needs a resting page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapGesture {
    /// A drag was released or cancelled.
    Release,
    /// A fling. The velocity is in pixels per second, negative towards
    /// increasing positions.
    Fling {
        /// Horizontal velocity reported by the gesture detector.
        velocity_x: Option<f32>,
    },
}

/// Where the list view stood when the gesture ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapInput {
    /// First item with any part on screen.
    pub first_visible_position: usize,
    /// Left edge of that item relative to the viewport. Negative once it is
    /// scrolled past the left edge.
    pub current_left_offset: Px,
    /// The gesture that ended.
    pub gesture: SnapGesture,
}

/// Page chosen by a [`SnapStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapDecision {
    /// Paging position to scroll to.
    pub target_position: usize,
    /// Set when the raw target was not a paging position and got floored.
    pub repaired: Option<Anomaly>,
}

/// Picks the resting page for an ended gesture.
///
/// An `Err` aborts the snap: nothing is scrolled and the anomaly is reported.
pub trait SnapStrategy {
    /// Resolves the target paging position.
    fn resolve(
        &self,
        paging: &PagingIndex,
        geometry: &Geometry,
        input: &SnapInput,
    ) -> Result<SnapDecision, Anomaly>;
}

/// Snaps one page at a time, using half an item width as the drag threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageSnap;

impl SnapStrategy for PageSnap {
    fn resolve(
        &self,
        paging: &PagingIndex,
        geometry: &Geometry,
        input: &SnapInput,
    ) -> Result<SnapDecision, Anomaly> {
        let first = input.first_visible_position;
        let relative = paging.current_relative_position(first);
        let items_per_page = if first == 0 && paging.end_pages_centered() {
            1
        } else {
            paging.items_per_page_current()
        };

        // Drags towards the start report the previous page as first visible,
        // so "current" here is whichever page owns that item.
        let current_page = to_i64(first - relative);
        let items_per_page = to_i64(items_per_page);
        let next_page = current_page.saturating_add(items_per_page);
        let previous_page = current_page.saturating_sub(items_per_page);

        let raw_target = match input.gesture {
            SnapGesture::Fling { velocity_x: None } => {
                error!("a fling velocity was not specified when snapping in a fling gesture");
                return Err(Anomaly::MissingFlingVelocity);
            }
            SnapGesture::Fling {
                velocity_x: Some(velocity_x),
            } => {
                if velocity_x < 0.0 {
                    next_page
                } else {
                    current_page
                }
            }
            SnapGesture::Release => {
                let threshold = geometry.item_width() / 2;
                let travelled = input.current_left_offset.abs();
                if travelled <= threshold {
                    current_page
                } else if input.current_left_offset < Px::ZERO {
                    next_page
                } else {
                    previous_page
                }
            }
        };

        let last = to_i64(paging.last_position());
        let clamped = usize::try_from(raw_target.clamp(0, last)).unwrap_or_default();

        if paging.is_valid_paging_position(clamped) {
            debug!(first, target = clamped, "resolved snap target");
            return Ok(SnapDecision {
                target_position: clamped,
                repaired: None,
            });
        }

        let repaired = paging.valid_paging_position_floor(clamped);
        error!(
            requested = clamped,
            repaired, "target position set to invalid value, recalculated"
        );
        Ok(SnapDecision {
            target_position: repaired,
            repaired: Some(Anomaly::InvalidPagingTarget {
                requested: clamped,
                repaired,
            }),
        })
    }
}

/// Horizontal scroll that brings `target` to its resting place.
///
/// The first and last page rest next to the centering padding, so the padding
/// in front of them is subtracted.
pub fn scroll_distance(
    geometry: &Geometry,
    collapsed: bool,
    input: &SnapInput,
    target: usize,
) -> Px {
    let extra_padding = if target == 0 || target == geometry.last_position() {
        geometry.extra_left_padding(target, collapsed)
    } else {
        Px::ZERO
    };
    let position_diff = to_i64(target) - to_i64(input.first_visible_position);

    input
        .current_left_offset
        .saturating_add(geometry.item_width().times(position_diff))
        .saturating_sub(extra_padding)
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
