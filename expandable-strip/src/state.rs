//! Mutable pager state and its persisted form.
use serde::{Deserialize, Serialize};

use crate::{
    config::{BitmapQuality, EXPANDED_WIDTH_FRACTION, StripConfig},
    error::StripError,
    px::Px,
};

/// Whether the strip shows pages of items or a single fullscreen item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StripMode {
    /// Several items per page at the collapsed width fraction.
    #[default]
    Collapsed,
    /// One item per page spanning the display.
    Expanded,
}

impl StripMode {
    /// Builds a mode from a collapsed flag.
    pub fn from_collapsed(collapsed: bool) -> Self {
        if collapsed {
            StripMode::Collapsed
        } else {
            StripMode::Expanded
        }
    }

    /// Returns true for [`StripMode::Collapsed`].
    pub fn is_collapsed(self) -> bool {
        self == StripMode::Collapsed
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            StripMode::Collapsed => StripMode::Expanded,
            StripMode::Expanded => StripMode::Collapsed,
        }
    }
}

/// The state bag the geometry and paging computations read.
///
/// `current_items_per_page` is always 1 once the mode is expanded, and the
/// width fraction never leaves `[collapsed fraction, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PagerState {
    mode: StripMode,
    current_width_fraction: f32,
    current_items_per_page: usize,
    saved_first_selected_item: Option<usize>,
    item_count: usize,
}

impl PagerState {
    /// Creates the state for a freshly configured strip.
    pub fn new(config: &StripConfig, mode: StripMode) -> Self {
        let mut state = Self {
            mode,
            current_width_fraction: config.collapsed_width_fraction(),
            current_items_per_page: config.items_per_page(),
            saved_first_selected_item: None,
            item_count: 0,
        };
        state.sync_width_fraction(config);
        state.sync_items_per_page(config, mode);
        state
    }

    /// Current mode.
    pub fn mode(&self) -> StripMode {
        self.mode
    }

    /// Current item width as a fraction of the display width.
    pub fn current_width_fraction(&self) -> f32 {
        self.current_width_fraction
    }

    /// Items grouped into one page right now.
    pub fn current_items_per_page(&self) -> usize {
        self.current_items_per_page
    }

    /// Selection restored from a saved state that has not been observed yet.
    pub fn saved_first_selected_item(&self) -> Option<usize> {
        self.saved_first_selected_item
    }

    /// Number of items in the strip.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Switches the mode without animating. The page grouping follows at
    /// once; the width fraction waits for the next refresh.
    pub(crate) fn set_mode(&mut self, mode: StripMode, config: &StripConfig) {
        self.mode = mode;
        self.sync_items_per_page(config, mode);
    }

    pub(crate) fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
    }

    pub(crate) fn take_saved_first_selected_item(&mut self) -> Option<usize> {
        self.saved_first_selected_item.take()
    }

    /// Snaps the width fraction to the one configured for the current mode.
    pub(crate) fn sync_width_fraction(&mut self, config: &StripConfig) {
        self.current_width_fraction = if self.mode.is_collapsed() {
            config.collapsed_width_fraction()
        } else {
            EXPANDED_WIDTH_FRACTION
        };
    }

    /// Recomputes items per page for `mode`. During an animation the
    /// controller passes the mode it is animating from.
    pub(crate) fn sync_items_per_page(&mut self, config: &StripConfig, mode: StripMode) {
        self.current_items_per_page = match mode {
            StripMode::Collapsed => config.items_per_page(),
            StripMode::Expanded => 1,
        };
    }

    /// Sets an interpolated width fraction while keeping the page grouping of
    /// `mode`.
    pub(crate) fn set_width_fraction(
        &mut self,
        fraction: f32,
        config: &StripConfig,
        mode: StripMode,
    ) {
        self.current_width_fraction =
            fraction.clamp(config.collapsed_width_fraction(), EXPANDED_WIDTH_FRACTION);
        self.sync_items_per_page(config, mode);
    }

    /// Applies the end of an expand/collapse.
    pub(crate) fn commit(&mut self, mode: StripMode, config: &StripConfig) {
        self.mode = mode;
        self.sync_width_fraction(config);
        self.sync_items_per_page(config, mode);
    }
}

/// Flags of a [`SavedState`], in persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFlags {
    /// End pages centered.
    pub end_pages_centered: bool,
    /// Expansion disabled.
    pub expansion_disabled: bool,
    /// Collapsed mode.
    pub is_collapsed: bool,
}

/// Width fractions of a [`SavedState`], in persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedFractions {
    /// Width fraction at capture time.
    pub current_width_fraction: f32,
    /// Collapsed width fraction.
    pub min_width_fraction: f32,
}

/// Integer fields of a [`SavedState`], in persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCounts {
    /// First selected item at capture time.
    pub first_selected_item: usize,
    /// Expanded height in pixels.
    pub height_max: i32,
    /// Collapsed height in pixels.
    pub height_min: i32,
    /// Items per page while collapsed.
    pub items_per_page: usize,
    /// Items per page at capture time.
    pub items_per_page_current: usize,
}

/// Snapshot of the strip taken when the host pauses.
///
/// The field order is the persisted layout and is significant for any
/// serialization format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    /// Boolean flags.
    pub flags: SavedFlags,
    /// Width fractions.
    pub fractions: SavedFractions,
    /// Selection, heights and page sizes.
    pub counts: SavedCounts,
    /// Bitmap quality, persisted as an ordinal with -1 meaning the default.
    #[serde(with = "bitmap_quality_ordinal")]
    pub bitmap_quality: Option<BitmapQuality>,
    /// Base item description.
    pub base_content_description: String,
}

impl SavedState {
    pub(crate) fn capture(config: &StripConfig, state: &PagerState, first_selected: usize) -> Self {
        Self {
            flags: SavedFlags {
                end_pages_centered: config.end_pages_centered(),
                expansion_disabled: config.expansion_disabled(),
                is_collapsed: state.mode().is_collapsed(),
            },
            fractions: SavedFractions {
                current_width_fraction: state.current_width_fraction(),
                min_width_fraction: config.collapsed_width_fraction(),
            },
            counts: SavedCounts {
                first_selected_item: first_selected,
                height_max: config.height_expanded().raw(),
                height_min: config.height_collapsed().raw(),
                items_per_page: config.items_per_page(),
                items_per_page_current: state.current_items_per_page(),
            },
            bitmap_quality: Some(config.bitmap_quality()),
            base_content_description: config.base_content_description().to_string(),
        }
    }

    /// Writes the snapshot into `config` and `state`. Nothing is written if
    /// any value is rejected.
    pub(crate) fn apply(
        &self,
        config: &mut StripConfig,
        state: &mut PagerState,
    ) -> Result<(), StripError> {
        let mut restored = config.clone();
        restored.set_end_pages_centered(self.flags.end_pages_centered);
        restored.set_expansion_disabled(self.flags.expansion_disabled);
        restored.set_collapsed_width_fraction(self.fractions.min_width_fraction)?;
        restored.set_height_expanded(Px::new(self.counts.height_max))?;
        restored.set_height_collapsed(Px::new(self.counts.height_min))?;
        restored.set_items_per_page(self.counts.items_per_page)?;
        restored.set_bitmap_quality(self.bitmap_quality.unwrap_or_default());
        restored.set_base_content_description(self.base_content_description.clone());
        *config = restored;

        state.mode = StripMode::from_collapsed(self.flags.is_collapsed);
        state.current_width_fraction = self.fractions.current_width_fraction;
        state.current_items_per_page = self.counts.items_per_page_current.max(1);
        state.saved_first_selected_item = Some(self.counts.first_selected_item);
        Ok(())
    }
}

mod bitmap_quality_ordinal {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use crate::config::BitmapQuality;

    const DEFAULT_SENTINEL: i32 = -1;

    pub fn serialize<S>(quality: &Option<BitmapQuality>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(quality.map_or(DEFAULT_SENTINEL, BitmapQuality::ordinal))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BitmapQuality>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ordinal = i32::deserialize(deserializer)?;
        if ordinal == DEFAULT_SENTINEL {
            return Ok(None);
        }
        BitmapQuality::from_ordinal(ordinal)
            .map(Some)
            .map_err(D::Error::custom)
    }
}
