//! Interfaces of the list view and image loader the strip drives.
//!
//! The strip owns no rendering. It tells a virtualized horizontal list view
//! how wide items are and where they should be, and asks an image loader to
//! fill item targets. Both are supplied by the host.
use std::time::Duration;

use crate::{
    config::{BitmapQuality, EagerLoadWindow},
    px::Px,
};

/// Scroll state reported by the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollState {
    /// Not scrolling.
    #[default]
    Idle,
    /// Following a finger.
    Dragging,
    /// Animating towards a final position.
    Settling,
}

/// A timed scroll the list view should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothScroll {
    /// Item the scroll is heading for.
    pub target_position: usize,
    /// Horizontal distance to travel. Positive reveals later items.
    pub dx: Px,
    /// Duration of the scroll.
    pub duration: Duration,
}

/// A virtualized horizontal list of fixed-width items.
///
/// Positions are item indices; left edges are in viewport coordinates.
/// When a [`SmoothScroll`] started with
/// [`smooth_scroll_by`](StripListView::smooth_scroll_by) stops, the host calls
/// [`ExpandableStrip::on_smooth_scroll_stopped`](crate::strip::ExpandableStrip::on_smooth_scroll_stopped).
/// After every layout pass the host calls
/// [`ExpandableStrip::on_layout_complete`](crate::strip::ExpandableStrip::on_layout_complete).
pub trait StripListView {
    /// Current scroll state.
    fn scroll_state(&self) -> ScrollState;

    /// Number of realized item views.
    fn child_count(&self) -> usize;

    /// First item with any part on screen, `None` when nothing is realized.
    fn first_visible_position(&self) -> Option<usize>;

    /// Left edge of `position`, `None` if it is not realized.
    fn item_left(&self, position: usize) -> Option<Px>;

    /// Screens of items to keep realized beyond the viewport.
    fn set_eager_load_window(&mut self, window: EagerLoadWindow);

    /// Resizes every realized item without rebinding it.
    fn set_realized_item_width(&mut self, width: Px);

    /// Moves every realized item by `dx` without rebinding or clamping.
    fn offset_children_horizontal(&mut self, dx: Px);

    /// Starts a timed scroll.
    fn smooth_scroll_by(&mut self, scroll: SmoothScroll);

    /// Stops any scroll in flight.
    fn stop_scroll(&mut self);

    /// Sets the same padding on the left and the right.
    fn set_horizontal_padding(&mut self, padding: Px);

    /// Sets the strip height.
    fn set_height(&mut self, height: Px);

    /// Asks for a layout pass.
    fn request_layout(&mut self);

    /// Rebinds every realized item against `item_count` items.
    fn data_set_changed(&mut self, item_count: usize);

    /// Drops every realized item and scrolls back to the start.
    fn reset_scroll_position(&mut self);
}

/// A load handed to an [`ImageLoader`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest<'a, P> {
    /// Image location.
    pub url: &'a str,
    /// Shown until the image arrives.
    pub placeholder: Option<P>,
    /// Pixel format hint.
    pub quality: BitmapQuality,
}

/// Fills item targets with images.
///
/// Failures are the loader's business; it may forward them through
/// [`ExpandableStrip::report_image_load_failure`](crate::strip::ExpandableStrip::report_image_load_failure).
pub trait ImageLoader {
    /// The item view an image is loaded into.
    type Target;
    /// Placeholder image type.
    type Placeholder;

    /// Starts loading `request` into `target`.
    fn load(&mut self, target: &mut Self::Target, request: LoadRequest<'_, Self::Placeholder>);

    /// Cancels any load for `target` and empties it.
    fn clear(&mut self, target: &mut Self::Target);
}
