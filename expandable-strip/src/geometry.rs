//! Item widths, centering padding and resting offsets.
//!
//! Items are repositioned during an expand/collapse by shifting them a raw
//! number of pixels rather than by scrolling, so the list view never gets a
//! chance to clamp them. Every target offset is therefore computed exactly
//! here, including the corrections for the first and last page.
use crate::{config::StripConfig, px::Px, state::PagerState};

/// Snapshot of the quantities the geometry depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    display_width: Px,
    collapsed_width_fraction: f32,
    current_width_fraction: f32,
    end_pages_centered: bool,
    item_count: usize,
}

impl Geometry {
    /// Reads the geometry inputs out of the configuration and state.
    pub fn new(config: &StripConfig, state: &PagerState) -> Self {
        Self {
            display_width: config.display_width(),
            collapsed_width_fraction: config.collapsed_width_fraction(),
            current_width_fraction: state.current_width_fraction(),
            end_pages_centered: config.end_pages_centered(),
            item_count: state.item_count(),
        }
    }

    /// Display width in pixels.
    pub fn display_width(&self) -> Px {
        self.display_width
    }

    /// Position of the last item, 0 for an empty strip.
    pub fn last_position(&self) -> usize {
        self.item_count.saturating_sub(1)
    }

    /// Current width of every item.
    pub fn item_width(&self) -> Px {
        Px::round_from_f32(self.display_width.to_f32() * self.current_width_fraction)
    }

    /// Width of an item while collapsed.
    pub fn min_item_width(&self) -> Px {
        Px::round_from_f32(self.display_width.to_f32() * self.collapsed_width_fraction)
    }

    /// Right edge of `position` in the coordinates of the unscrolled strip.
    pub fn absolute_right_edge(&self, position: usize) -> Px {
        let count = i64::try_from(position).map_or(i64::MAX, |p| p.saturating_add(1));
        self.item_width().times(count)
    }

    /// Padding that puts the center of the first collapsed item on the center
    /// of the display.
    ///
    /// ```
    /// use expandable_strip::{
    ///     config::{StripArgs, StripConfig},
    ///     geometry::Geometry,
    ///     px::Px,
    ///     state::{PagerState, StripMode},
    /// };
    ///
    /// let config = StripConfig::try_from(
    ///     StripArgs::default().display_width(1000).collapsed_width_fraction(0.4),
    /// )
    /// .expect("valid");
    /// let state = PagerState::new(&config, StripMode::Collapsed);
    /// assert_eq!(Geometry::new(&config, &state).centering_padding(), Px::new(300));
    /// ```
    pub fn centering_padding(&self) -> Px {
        let half_width = self.min_item_width().to_f32() / 2.0;
        if half_width <= 0.0 {
            return Px::ZERO;
        }
        let half_widths_to_center = (self.display_width.to_f32() / half_width) / 2.0;
        Px::round_from_f32((half_widths_to_center - 1.0) * half_width)
    }

    /// Whether the centering padding is on screen while `position` is shown.
    ///
    /// That is the case for the last item and for every item sharing the
    /// screen with the centered first item, even partially.
    pub fn is_padding_visible_for_item(&self, position: usize, collapsed: bool) -> bool {
        if !collapsed || !self.end_pages_centered {
            return false;
        }
        if position == self.last_position() {
            return true;
        }

        let half_width = self.min_item_width().raw() / 2;
        if half_width <= 0 {
            return false;
        }
        let half_widths_to_center = (self.display_width.raw() / half_width) / 2;
        let items_right_of_center = (half_widths_to_center as f32 / 2.0).ceil() as usize;
        position <= items_right_of_center
    }

    /// Padding in front of `position` when it comes to rest.
    pub fn extra_left_padding(&self, position: usize, collapsed: bool) -> Px {
        if self.is_padding_visible_for_item(position, collapsed) {
            self.centering_padding()
        } else {
            Px::ZERO
        }
    }

    /// Offset from the left edge of the display at which `position` rests.
    pub fn extra_left_offset(&self, position: usize, collapsed: bool) -> Px {
        // The final item is right-aligned instead of being shifted past the end,
        // unless it already fits on the first screen.
        if collapsed
            && !self.end_pages_centered
            && position == self.last_position()
            && self.absolute_right_edge(position) > self.display_width
        {
            return self.display_width - self.min_item_width();
        }

        self.extra_left_padding(position, collapsed)
    }

    /// Left edge `position` settles at once collapsed, given its relative
    /// position inside its page.
    pub fn collapsed_resting_left(&self, position: usize, relative_position: usize) -> Px {
        let extra = if position == 0 || position == self.last_position() || relative_position != 0
        {
            self.extra_left_offset(position, true)
        } else {
            // Start of a page other than the first: no padding involved.
            Px::ZERO
        };

        Px::round_from_f32(
            extra.to_f32()
                + relative_position as f32
                    * self.display_width.to_f32()
                    * self.collapsed_width_fraction,
        )
    }
}
