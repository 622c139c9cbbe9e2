//! Binding items to realized item views.
use tracing::trace;

use crate::{
    collaborator::{ImageLoader, LoadRequest},
    config::BitmapQuality,
    px::Px,
};

/// An image shown by the strip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StripItem {
    /// Image location handed to the loader.
    pub url: String,
    /// Optional per-image description, read before the base description.
    pub alt_text: Option<String>,
}

impl StripItem {
    /// Creates an item without alt text.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt_text: None,
        }
    }

    /// Adds alt text.
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }
}

/// What the host applies to an item view after binding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBinding {
    /// Bound position.
    pub position: usize,
    /// Width to give the view. `None` leaves the current width alone.
    pub width: Option<Px>,
    /// Whether the image may be zoomed. Only expanded items are.
    pub scalable: bool,
    /// Accessibility text, e.g. "Image 3 of 10".
    pub content_description: String,
}

/// Adapter state shared by every bind.
#[derive(Debug)]
pub struct ItemBinder<P> {
    item_width: Px,
    collapsed: bool,
    base_content_description: String,
    hero_placeholder: Option<P>,
}

impl<P> ItemBinder<P> {
    pub(crate) fn new(base_content_description: impl Into<String>) -> Self {
        Self {
            item_width: Px::ZERO,
            collapsed: true,
            base_content_description: base_content_description.into(),
            hero_placeholder: None,
        }
    }

    /// Width given to freshly bound items.
    pub fn item_width(&self) -> Px {
        self.item_width
    }

    /// Whether items are bound for the collapsed mode.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Base accessibility text.
    pub fn base_content_description(&self) -> &str {
        &self.base_content_description
    }

    /// Whether the hero placeholder is still waiting for its bind.
    pub fn has_hero_placeholder(&self) -> bool {
        self.hero_placeholder.is_some()
    }

    pub(crate) fn set_item_width(&mut self, width: Px) {
        self.item_width = width;
    }

    pub(crate) fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub(crate) fn set_base_content_description(&mut self, description: impl Into<String>) {
        self.base_content_description = description.into();
    }

    pub(crate) fn set_hero_placeholder(&mut self, placeholder: Option<P>) {
        self.hero_placeholder = placeholder;
    }

    /// Accessibility text of `position`, `None` if it is out of range.
    pub fn content_description(&self, items: &[StripItem], position: usize) -> Option<String> {
        let item = items.get(position)?;
        let number = position + 1;
        let total = items.len();
        let base = &self.base_content_description;

        Some(match item.alt_text.as_deref().filter(|alt| !alt.is_empty()) {
            Some(alt) => format!("{alt} {base} {number} of {total}"),
            None => format!("{base} {number} of {total}"),
        })
    }

    /// Binds `position` to `target`.
    ///
    /// Out-of-range positions and items without a url clear the target. The
    /// hero placeholder goes with the first bind of position 0 only.
    pub(crate) fn bind<L>(
        &mut self,
        loader: &mut L,
        target: &mut L::Target,
        items: &[StripItem],
        position: usize,
        quality: BitmapQuality,
    ) -> Option<ItemBinding>
    where
        L: ImageLoader<Placeholder = P>,
    {
        let Some(content_description) = self.content_description(items, position) else {
            loader.clear(target);
            return None;
        };

        let binding = ItemBinding {
            position,
            width: (self.item_width > Px::ZERO).then_some(self.item_width),
            scalable: !self.collapsed,
            content_description,
        };

        let url = items.get(position).map_or("", |item| item.url.as_str());
        if url.is_empty() {
            trace!(position, "item has no url, clearing target");
            loader.clear(target);
            return Some(binding);
        }

        let placeholder = if position == 0 {
            self.hero_placeholder.take()
        } else {
            None
        };
        trace!(position, url, "loading item");
        loader.load(
            target,
            LoadRequest {
                url,
                placeholder,
                quality,
            },
        );
        Some(binding)
    }
}
