//! expandable-strip is the paging, snapping and expand/collapse engine of a
//! horizontal image strip.
//!
//! # Modes
//!
//! While collapsed the strip shows several images per page, each taking a
//! fraction of the display width. Tapping an image expands the strip: the
//! tapped image grows to the full display width while the strip grows to its
//! expanded height. Tapping again collapses it back into its page.
//!
//! # Collaborators
//!
//! The strip does not render anything. It drives a virtualized list view
//! ([`StripListView`]) and an image loader ([`ImageLoader`]) provided by the
//! host, and reports selections through a [`StripListener`].
//!
//! ```
//! use std::time::Instant;
//!
//! use expandable_strip::{
//!     EagerLoadWindow, ExpandableStrip, ImageLoader, LoadRequest, Px, ScrollState,
//!     SmoothScroll, StripArgs, StripItem, StripListView,
//! };
//!
//! #[derive(Default)]
//! struct NoopList;
//!
//! impl StripListView for NoopList {
//!     fn scroll_state(&self) -> ScrollState { ScrollState::Idle }
//!     fn child_count(&self) -> usize { 0 }
//!     fn first_visible_position(&self) -> Option<usize> { None }
//!     fn item_left(&self, _: usize) -> Option<Px> { None }
//!     fn set_eager_load_window(&mut self, _: EagerLoadWindow) {}
//!     fn set_realized_item_width(&mut self, _: Px) {}
//!     fn offset_children_horizontal(&mut self, _: Px) {}
//!     fn smooth_scroll_by(&mut self, _: SmoothScroll) {}
//!     fn stop_scroll(&mut self) {}
//!     fn set_horizontal_padding(&mut self, _: Px) {}
//!     fn set_height(&mut self, _: Px) {}
//!     fn request_layout(&mut self) {}
//!     fn data_set_changed(&mut self, _: usize) {}
//!     fn reset_scroll_position(&mut self) {}
//! }
//!
//! struct NoopLoader;
//!
//! impl ImageLoader for NoopLoader {
//!     type Target = ();
//!     type Placeholder = ();
//!     fn load(&mut self, _: &mut (), _: LoadRequest<'_, ()>) {}
//!     fn clear(&mut self, _: &mut ()) {}
//! }
//!
//! let mut strip = ExpandableStrip::new(
//!     StripArgs::default()
//!         .display_width(1080)
//!         .items_per_page(2)
//!         .collapsed_width_fraction(0.45)
//!         .height_collapsed(300)
//!         .height_expanded(1200),
//!     NoopList,
//!     NoopLoader,
//! )
//! .expect("valid configuration");
//! strip.set_items(vec![StripItem::new("a.png"), StripItem::new("b.png")]);
//! strip.refresh();
//! assert_eq!(strip.item_width(), Px::new(486));
//! assert!(!strip.on_frame(Instant::now()));
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod animation;
pub mod binder;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod geometry;
pub mod paging;
pub mod px;
pub mod scheduler;
pub mod snap;
pub mod state;
pub mod strip;
pub mod transition;

#[cfg(test)]
mod test;

pub use binder::{ItemBinding, StripItem};
pub use collaborator::{ImageLoader, LoadRequest, ScrollState, SmoothScroll, StripListView};
pub use config::{BitmapQuality, EagerLoadWindow, StripArgs, StripConfig};
pub use error::{Anomaly, StripError};
pub use px::Px;
pub use snap::{PageSnap, SnapGesture, SnapStrategy};
pub use state::{PagerState, SavedState, StripMode};
pub use strip::{ExpandableStrip, StripListener};
pub use transition::{ExpandCollapse, TransitionStrategy};
