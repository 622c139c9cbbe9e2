//! Grouping of items into pages.
//!
//! Pages are never stored. A page is identified by its first position, its
//! *paging position*, and everything else is derived from the configuration
//! and the current state on demand.
use tracing::error;

use crate::{
    config::StripConfig,
    error::Anomaly,
    state::{PagerState, StripMode},
};

/// Maps positions to pages for one configuration and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingIndex {
    items_per_page: usize,
    items_per_page_current: usize,
    end_pages_centered: bool,
    item_count: usize,
    mode: StripMode,
}

impl PagingIndex {
    /// Reads the paging inputs out of the configuration and state.
    pub fn new(config: &StripConfig, state: &PagerState) -> Self {
        Self {
            items_per_page: config.items_per_page().max(1),
            items_per_page_current: state.current_items_per_page().max(1),
            end_pages_centered: config.end_pages_centered(),
            item_count: state.item_count(),
            mode: state.mode(),
        }
    }

    /// Items grouped into one page right now.
    pub fn items_per_page_current(&self) -> usize {
        self.items_per_page_current
    }

    /// Whether the first item sits on a page of its own.
    pub fn end_pages_centered(&self) -> bool {
        self.end_pages_centered
    }

    /// Mode the index was built for.
    pub fn mode(&self) -> StripMode {
        self.mode
    }

    /// Position of the last item, 0 for an empty strip.
    pub fn last_position(&self) -> usize {
        self.item_count.saturating_sub(1)
    }

    /// With centered end pages the first item owns a page, which shifts every
    /// later page boundary by one.
    pub fn first_page_offset(&self) -> usize {
        usize::from(self.end_pages_centered)
    }

    /// Position of `position` inside its page when the strip is in `mode`.
    pub fn relative_position(&self, position: usize, mode: StripMode) -> usize {
        if position == 0 {
            return 0;
        }
        match mode {
            StripMode::Expanded => 0,
            StripMode::Collapsed => {
                (position - self.first_page_offset()) % self.items_per_page
            }
        }
    }

    /// Position of `position` inside its page in the current mode.
    pub fn current_relative_position(&self, position: usize) -> usize {
        self.relative_position(position, self.mode)
    }

    /// Whether `position` starts a page.
    pub fn is_valid_paging_position(&self, position: usize) -> bool {
        if position == 0 {
            return true;
        }
        (position - self.first_page_offset()) % self.items_per_page_current == 0
    }

    /// First position of the page containing `position`.
    pub fn valid_paging_position_floor(&self, position: usize) -> usize {
        position - self.current_relative_position(position)
    }

    /// Number of items selected when the page starting at `position` is shown.
    ///
    /// Positions that do not start a page produce an
    /// [`Anomaly::InvalidSelectionPosition`]; callers report it and treat the
    /// position as a page of one.
    pub fn selectable_count(&self, position: usize) -> Result<usize, Anomaly> {
        if !self.is_valid_paging_position(position) {
            error!(position, "attempted to get selectable items for invalid paging position");
            return Err(Anomaly::InvalidSelectionPosition(position));
        }

        if position == 0 && self.mode.is_collapsed() && self.end_pages_centered {
            Ok(1)
        } else if position + self.items_per_page_current > self.item_count {
            // Short last page.
            Ok(self.item_count.saturating_sub(position))
        } else {
            Ok(self.items_per_page_current)
        }
    }
}
