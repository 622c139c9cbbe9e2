//! Host-facing configuration of the strip.
//!
//! ## Usage
//!
//! Build a [`StripArgs`] with its fluent setters and hand it to
//! [`ExpandableStrip::new`](crate::strip::ExpandableStrip::new), which
//! validates it into a [`StripConfig`].
//!
//! ```
//! use expandable_strip::config::{StripArgs, StripConfig};
//!
//! let config = StripConfig::try_from(
//!     StripArgs::default()
//!         .display_width(1080)
//!         .items_per_page(2)
//!         .collapsed_width_fraction(0.45)
//!         .end_pages_centered(true),
//! )
//! .expect("valid configuration");
//! assert_eq!(config.items_per_page(), 2);
//! ```
use derive_setters::Setters;

use crate::{error::StripError, px::Px};

/// Width fraction of an item while expanded. Expanded items always span the
/// whole display.
pub const EXPANDED_WIDTH_FRACTION: f32 = 1.0;

const DEFAULT_COLLAPSED_WIDTH_FRACTION: f32 = 0.5;
const DEFAULT_EAGER_LOAD_SCREENS: i32 = 1;
const DEFAULT_BASE_CONTENT_DESCRIPTION: &str = "Image";

/// Pixel format hint handed to the image loader with every request.
///
/// The declaration order is persisted as an ordinal and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitmapQuality {
    /// Alpha channel only.
    Alpha8,
    /// 16 bits per pixel, no alpha.
    Rgb565,
    /// 16 bits per pixel with alpha.
    Argb4444,
    /// 32 bits per pixel with alpha.
    #[default]
    Argb8888,
    /// 64 bits per pixel, half floats.
    RgbaF16,
    /// Backed by graphics memory only.
    Hardware,
}

impl BitmapQuality {
    const ALL: [BitmapQuality; 6] = [
        BitmapQuality::Alpha8,
        BitmapQuality::Rgb565,
        BitmapQuality::Argb4444,
        BitmapQuality::Argb8888,
        BitmapQuality::RgbaF16,
        BitmapQuality::Hardware,
    ];

    /// Position of this quality in the declaration order.
    pub fn ordinal(self) -> i32 {
        match self {
            BitmapQuality::Alpha8 => 0,
            BitmapQuality::Rgb565 => 1,
            BitmapQuality::Argb4444 => 2,
            BitmapQuality::Argb8888 => 3,
            BitmapQuality::RgbaF16 => 4,
            BitmapQuality::Hardware => 5,
        }
    }

    /// Looks a quality up by ordinal.
    pub fn from_ordinal(ordinal: i32) -> Result<Self, StripError> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(StripError::UnknownBitmapQuality(ordinal))
    }
}

/// Number of extra viewport widths the list view keeps realized on either
/// side of the visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EagerLoadWindow(usize);

impl EagerLoadWindow {
    /// No eager loading. Used while an expand/collapse animation runs.
    pub const NONE: Self = Self(0);

    /// Returns the number of screens.
    pub fn screens(self) -> usize {
        self.0
    }

    /// Extra layout space the list view should lay out beyond the viewport.
    ///
    /// ```
    /// use expandable_strip::{config::EagerLoadWindow, px::Px};
    ///
    /// let window = EagerLoadWindow::try_from(2).expect("non-negative");
    /// assert_eq!(window.extra_layout_space(Px::new(1080)), Px::new(2160));
    /// ```
    pub fn extra_layout_space(self, viewport: Px) -> Px {
        viewport.times(i64::try_from(self.0).unwrap_or(i64::MAX))
    }
}

impl TryFrom<i32> for EagerLoadWindow {
    type Error = StripError;

    fn try_from(screens: i32) -> Result<Self, Self::Error> {
        usize::try_from(screens)
            .map(EagerLoadWindow)
            .map_err(|_| StripError::NegativeEagerLoadScreens(screens))
    }
}

/// Arguments used to construct an
/// [`ExpandableStrip`](crate::strip::ExpandableStrip).
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct StripArgs {
    /// Width of the display in physical pixels.
    #[setters(into)]
    pub display_width: Px,
    /// Number of items per page while collapsed.
    pub items_per_page: usize,
    /// Fraction of the display width each item takes while collapsed.
    pub collapsed_width_fraction: f32,
    /// Height of the strip while collapsed.
    #[setters(into)]
    pub height_collapsed: Px,
    /// Height of the strip while expanded.
    #[setters(into)]
    pub height_expanded: Px,
    /// Centers the first and last item on pages of their own.
    pub end_pages_centered: bool,
    /// Clicking an item no longer expands the strip.
    pub expansion_disabled: bool,
    /// Screens of items realized beyond the viewport. Must not be negative.
    pub eager_load_screens: i32,
    /// Pixel format hint passed to the image loader.
    pub bitmap_quality: BitmapQuality,
    /// Base text of the per-item description.
    #[setters(into)]
    pub base_content_description: String,
    /// Whether the strip starts collapsed.
    pub collapsed: bool,
}

impl Default for StripArgs {
    fn default() -> Self {
        Self {
            display_width: Px::ZERO,
            items_per_page: 1,
            collapsed_width_fraction: DEFAULT_COLLAPSED_WIDTH_FRACTION,
            height_collapsed: Px::ZERO,
            height_expanded: Px::ZERO,
            end_pages_centered: false,
            expansion_disabled: false,
            eager_load_screens: DEFAULT_EAGER_LOAD_SCREENS,
            bitmap_quality: BitmapQuality::default(),
            base_content_description: DEFAULT_BASE_CONTENT_DESCRIPTION.to_string(),
            collapsed: true,
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StripConfig {
    display_width: Px,
    items_per_page: usize,
    collapsed_width_fraction: f32,
    height_collapsed: Px,
    height_expanded: Px,
    end_pages_centered: bool,
    expansion_disabled: bool,
    eager_load: EagerLoadWindow,
    bitmap_quality: BitmapQuality,
    base_content_description: String,
}

impl StripConfig {
    /// Display width in pixels.
    pub fn display_width(&self) -> Px {
        self.display_width
    }

    /// Items per page while collapsed.
    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Collapsed width fraction.
    pub fn collapsed_width_fraction(&self) -> f32 {
        self.collapsed_width_fraction
    }

    /// Collapsed height.
    pub fn height_collapsed(&self) -> Px {
        self.height_collapsed
    }

    /// Expanded height.
    pub fn height_expanded(&self) -> Px {
        self.height_expanded
    }

    /// Whether the end pages are centered.
    pub fn end_pages_centered(&self) -> bool {
        self.end_pages_centered
    }

    /// Whether clicks are prevented from expanding the strip.
    pub fn expansion_disabled(&self) -> bool {
        self.expansion_disabled
    }

    /// Eager-load window used outside of animations.
    pub fn eager_load(&self) -> EagerLoadWindow {
        self.eager_load
    }

    /// Bitmap quality hint.
    pub fn bitmap_quality(&self) -> BitmapQuality {
        self.bitmap_quality
    }

    /// Base item description.
    pub fn base_content_description(&self) -> &str {
        &self.base_content_description
    }

    pub(crate) fn set_display_width(&mut self, width: Px) -> Result<(), StripError> {
        self.display_width = validate_display_width(width)?;
        Ok(())
    }

    pub(crate) fn set_items_per_page(&mut self, items_per_page: usize) -> Result<(), StripError> {
        self.items_per_page = validate_items_per_page(items_per_page)?;
        Ok(())
    }

    pub(crate) fn set_collapsed_width_fraction(&mut self, fraction: f32) -> Result<(), StripError> {
        self.collapsed_width_fraction = validate_width_fraction(fraction)?;
        Ok(())
    }

    pub(crate) fn set_height_collapsed(&mut self, height: Px) -> Result<(), StripError> {
        self.height_collapsed = validate_height("collapsed", height)?;
        Ok(())
    }

    pub(crate) fn set_height_expanded(&mut self, height: Px) -> Result<(), StripError> {
        self.height_expanded = validate_height("expanded", height)?;
        Ok(())
    }

    pub(crate) fn set_end_pages_centered(&mut self, centered: bool) {
        self.end_pages_centered = centered;
    }

    pub(crate) fn set_expansion_disabled(&mut self, disabled: bool) {
        self.expansion_disabled = disabled;
    }

    pub(crate) fn set_eager_load(&mut self, window: EagerLoadWindow) {
        self.eager_load = window;
    }

    pub(crate) fn set_bitmap_quality(&mut self, quality: BitmapQuality) {
        self.bitmap_quality = quality;
    }

    pub(crate) fn set_base_content_description(&mut self, description: String) {
        self.base_content_description = description;
    }
}

impl TryFrom<StripArgs> for StripConfig {
    type Error = StripError;

    fn try_from(args: StripArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            display_width: validate_display_width(args.display_width)?,
            items_per_page: validate_items_per_page(args.items_per_page)?,
            collapsed_width_fraction: validate_width_fraction(args.collapsed_width_fraction)?,
            height_collapsed: validate_height("collapsed", args.height_collapsed)?,
            height_expanded: validate_height("expanded", args.height_expanded)?,
            end_pages_centered: args.end_pages_centered,
            expansion_disabled: args.expansion_disabled,
            eager_load: EagerLoadWindow::try_from(args.eager_load_screens)?,
            bitmap_quality: args.bitmap_quality,
            base_content_description: args.base_content_description,
        })
    }
}

fn validate_display_width(width: Px) -> Result<Px, StripError> {
    if width <= Px::ZERO {
        return Err(StripError::InvalidDisplayWidth(width.raw()));
    }
    Ok(width)
}

fn validate_items_per_page(items_per_page: usize) -> Result<usize, StripError> {
    if items_per_page == 0 {
        return Err(StripError::InvalidItemsPerPage(items_per_page));
    }
    Ok(items_per_page)
}

fn validate_width_fraction(fraction: f32) -> Result<f32, StripError> {
    if !(fraction > 0.0 && fraction <= EXPANDED_WIDTH_FRACTION) {
        return Err(StripError::InvalidWidthFraction(fraction));
    }
    Ok(fraction)
}

fn validate_height(which: &'static str, height: Px) -> Result<Px, StripError> {
    if height < Px::ZERO {
        return Err(StripError::NegativeHeight {
            which,
            value: height.raw(),
        });
    }
    Ok(height)
}
