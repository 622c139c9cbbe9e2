//! An in-memory list view and image loader for driving the strip headlessly.
use std::sync::Arc;

use expandable_strip::{
    Anomaly, EagerLoadWindow, ImageLoader, LoadRequest, Px, ScrollState, SmoothScroll,
    StripListView, StripListener,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Lays items out in a plain row: item `p` starts at
/// `padding + p * item_width - scroll_x`.
pub struct SimulatedList {
    display_width: Px,
    item_width: Px,
    item_count: usize,
    padding: Px,
    height: Px,
    scroll_x: Px,
    attached: bool,
    scroll_state: ScrollState,
    eager_window: EagerLoadWindow,
    pending_scroll: Option<SmoothScroll>,
}

impl SimulatedList {
    pub fn new(display_width: Px) -> Self {
        Self {
            display_width,
            item_width: Px::ZERO,
            item_count: 0,
            padding: Px::ZERO,
            height: Px::ZERO,
            scroll_x: Px::ZERO,
            attached: false,
            scroll_state: ScrollState::Idle,
            eager_window: EagerLoadWindow::default(),
            pending_scroll: None,
        }
    }

    /// Realizes the items at `item_width`, as the first layout pass would.
    pub fn attach(&mut self, item_width: Px) {
        self.item_width = item_width;
        self.attached = true;
    }

    /// Follows a finger by `dx` pixels.
    pub fn drag_by(&mut self, dx: Px) {
        self.scroll_state = ScrollState::Dragging;
        self.scroll_x += dx;
    }

    /// Runs the smooth scroll in flight to completion. Returns whether one
    /// was running.
    pub fn finish_scroll(&mut self) -> bool {
        self.scroll_state = ScrollState::Idle;
        match self.pending_scroll.take() {
            Some(scroll) => {
                self.scroll_x += scroll.dx;
                true
            }
            None => false,
        }
    }

    pub fn height(&self) -> Px {
        self.height
    }

    pub fn padding(&self) -> Px {
        self.padding
    }

    pub fn eager_window(&self) -> EagerLoadWindow {
        self.eager_window
    }

    fn left(&self, position: usize) -> Px {
        let offset = self.item_width.times(i64::try_from(position).unwrap_or(i64::MAX));
        self.padding.saturating_add(offset).saturating_sub(self.scroll_x)
    }
}

impl StripListView for SimulatedList {
    fn scroll_state(&self) -> ScrollState {
        self.scroll_state
    }

    fn child_count(&self) -> usize {
        if self.attached { self.item_count } else { 0 }
    }

    fn first_visible_position(&self) -> Option<usize> {
        if !self.attached {
            return None;
        }
        (0..self.item_count).find(|&position| {
            let left = self.left(position);
            left + self.item_width > Px::ZERO && left < self.display_width
        })
    }

    fn item_left(&self, position: usize) -> Option<Px> {
        (self.attached && position < self.item_count).then(|| self.left(position))
    }

    fn set_eager_load_window(&mut self, window: EagerLoadWindow) {
        debug!(
            screens = window.screens(),
            extra = %window.extra_layout_space(self.display_width),
            "eager load window"
        );
        self.eager_window = window;
    }

    fn set_realized_item_width(&mut self, width: Px) {
        self.item_width = width;
    }

    fn offset_children_horizontal(&mut self, dx: Px) {
        self.scroll_x -= dx;
    }

    fn smooth_scroll_by(&mut self, scroll: SmoothScroll) {
        debug!(target_position = scroll.target_position, dx = %scroll.dx, "smooth scroll");
        self.scroll_state = ScrollState::Settling;
        self.pending_scroll = Some(scroll);
    }

    fn stop_scroll(&mut self) {
        if self.pending_scroll.take().is_some() {
            debug!("smooth scroll stopped");
        }
        if self.scroll_state == ScrollState::Settling {
            self.scroll_state = ScrollState::Idle;
        }
    }

    fn set_horizontal_padding(&mut self, padding: Px) {
        self.padding = padding;
    }

    fn set_height(&mut self, height: Px) {
        self.height = height;
    }

    fn request_layout(&mut self) {}

    fn data_set_changed(&mut self, item_count: usize) {
        self.item_count = item_count;
    }

    fn reset_scroll_position(&mut self) {
        self.scroll_x = Px::ZERO;
    }
}

/// Pretends to load images by remembering the url in the target.
#[derive(Default)]
pub struct LoggingLoader;

impl ImageLoader for LoggingLoader {
    type Target = Option<String>;
    type Placeholder = String;

    fn load(&mut self, target: &mut Self::Target, request: LoadRequest<'_, Self::Placeholder>) {
        debug!(
            url = request.url,
            placeholder = ?request.placeholder,
            quality = ?request.quality,
            "load"
        );
        *target = Some(request.url.to_string());
    }

    fn clear(&mut self, target: &mut Self::Target) {
        *target = None;
    }
}

/// Listener events, shared with `main` for the final report.
#[derive(Debug, Clone, PartialEq)]
pub enum StripEvent {
    Clicked(usize),
    Selected { first: usize, count: usize },
    Anomaly(Anomaly),
}

#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<StripEvent>>>,
}

impl EventLog {
    pub fn snapshot(&self) -> Vec<StripEvent> {
        self.events.lock().clone()
    }
}

impl StripListener for EventLog {
    fn on_image_clicked(&mut self, position: usize) {
        info!(position, "image clicked");
        self.events.lock().push(StripEvent::Clicked(position));
    }

    fn on_images_selected(&mut self, first_position: usize, count: usize) {
        info!(first_position, count, "images selected");
        self.events.lock().push(StripEvent::Selected {
            first: first_position,
            count,
        });
    }

    fn on_anomaly(&mut self, anomaly: Anomaly) {
        warn!(%anomaly, "anomaly");
        self.events.lock().push(StripEvent::Anomaly(anomaly));
    }
}
