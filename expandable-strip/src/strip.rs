//! The paged image strip.
//!
//! ## Usage
//!
//! Show a row of photos that snaps page by page and expands the tapped photo
//! to fill the display.
//!
//! The host wires [`ExpandableStrip`] to its event loop:
//!
//! - touch release and fling events go to [`ExpandableStrip::on_touch_released`]
//!   and [`ExpandableStrip::on_fling`];
//! - item clicks go to [`ExpandableStrip::on_item_clicked`];
//! - every frame calls [`ExpandableStrip::on_frame`], every finished layout
//!   pass calls [`ExpandableStrip::on_layout_complete`];
//! - the list view reports stopped smooth scrolls through
//!   [`ExpandableStrip::on_smooth_scroll_stopped`] and binds items through
//!   [`ExpandableStrip::bind_item`].
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::{
    binder::{ItemBinder, ItemBinding, StripItem},
    collaborator::{ImageLoader, ScrollState, SmoothScroll, StripListView},
    config::{BitmapQuality, EagerLoadWindow, StripArgs, StripConfig},
    error::{Anomaly, StripError},
    geometry::Geometry,
    paging::PagingIndex,
    px::Px,
    scheduler::{DeferredTask, Scheduler},
    snap::{PageSnap, SnapGesture, SnapInput, SnapStrategy, scroll_distance},
    state::{PagerState, SavedState, StripMode},
    transition::{ExpandCollapse, TransitionContext, TransitionController, TransitionStrategy},
};

/// Duration of an expand/collapse.
pub const HEIGHT_ANIMATION_TIME: Duration = Duration::from_millis(300);
/// Duration of the scroll to a snapped page.
pub const PAGING_ANIMATION_TIME: Duration = Duration::from_millis(500);
/// Delay between a paging scroll stopping and the selection being reported.
/// The list view reports the stop slightly before the items are at rest.
pub const PAGING_LISTENER_DELAY: Duration = Duration::from_millis(100);

/// Receives the strip's events.
pub trait StripListener {
    /// An item was clicked.
    fn on_image_clicked(&mut self, position: usize);

    /// The strip settled on the page starting at `first_position`, which
    /// holds `count` items.
    fn on_images_selected(&mut self, first_position: usize, count: usize);

    /// The strip repaired an inconsistency or skipped an operation.
    fn on_anomaly(&mut self, anomaly: Anomaly) {
        let _ = anomaly;
    }

    /// The image loader failed to load `url` for `position`.
    fn on_image_load_failed(&mut self, position: usize, url: &str, reason: &str) {
        let _ = (position, url, reason);
    }
}

/// A horizontal strip of images that pages in groups while collapsed and
/// shows one image across the whole display while expanded.
pub struct ExpandableStrip<L, I>
where
    L: StripListView,
    I: ImageLoader,
{
    config: StripConfig,
    state: PagerState,
    items: Vec<StripItem>,
    binder: ItemBinder<I::Placeholder>,
    list: L,
    loader: I,
    listener: Option<Box<dyn StripListener>>,
    snap_strategy: Box<dyn SnapStrategy>,
    transition_strategy: Box<dyn TransitionStrategy>,
    transition: TransitionController,
    scheduler: Scheduler,
    pending_scroll_target: Option<usize>,
}

impl<L, I> ExpandableStrip<L, I>
where
    L: StripListView,
    I: ImageLoader,
{
    /// Validates `args` and attaches the strip to its collaborators.
    pub fn new(args: StripArgs, mut list: L, loader: I) -> Result<Self, StripError> {
        let mode = StripMode::from_collapsed(args.collapsed);
        let config = StripConfig::try_from(args)?;
        let state = PagerState::new(&config, mode);
        let binder = ItemBinder::new(config.base_content_description());
        list.set_eager_load_window(config.eager_load());

        let mut strip = Self {
            config,
            state,
            items: Vec::new(),
            binder,
            list,
            loader,
            listener: None,
            snap_strategy: Box::new(PageSnap),
            transition_strategy: Box::new(ExpandCollapse),
            transition: TransitionController::new(HEIGHT_ANIMATION_TIME),
            scheduler: Scheduler::new(),
            pending_scroll_target: None,
        };
        strip.update_adapter_state(mode);
        info!(
            display_width = %strip.config.display_width(),
            items_per_page = strip.config.items_per_page(),
            ?mode,
            "expandable strip created"
        );
        Ok(strip)
    }

    // ----- accessors -----

    /// Current configuration.
    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    /// Current pager state.
    pub fn state(&self) -> &PagerState {
        &self.state
    }

    /// Items shown by the strip.
    pub fn items(&self) -> &[StripItem] {
        &self.items
    }

    /// The list view.
    pub fn list(&self) -> &L {
        &self.list
    }

    /// The list view, mutably. Used by hosts that drive it directly.
    pub fn list_mut(&mut self) -> &mut L {
        &mut self.list
    }

    /// The image loader.
    pub fn loader(&self) -> &I {
        &self.loader
    }

    /// The item binder.
    pub fn binder(&self) -> &ItemBinder<I::Placeholder> {
        &self.binder
    }

    /// The expand/collapse controller.
    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    /// Deferred work not run yet.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Geometry for the current configuration and state.
    pub fn geometry(&self) -> Geometry {
        Geometry::new(&self.config, &self.state)
    }

    /// Paging for the current configuration and state.
    pub fn paging(&self) -> PagingIndex {
        PagingIndex::new(&self.config, &self.state)
    }

    /// Current width of every item.
    pub fn item_width(&self) -> Px {
        self.geometry().item_width()
    }

    /// Width of an item while collapsed.
    pub fn min_item_width(&self) -> Px {
        self.geometry().min_item_width()
    }

    /// Whether the strip is collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.state.mode().is_collapsed()
    }

    /// Whether an expand/collapse is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_animating()
    }

    /// Whether the strip takes over touch events, which it does while the
    /// list view settles so a new drag cannot start mid-snap.
    pub fn intercepts_touch(&self) -> bool {
        self.list.scroll_state() == ScrollState::Settling
    }

    // ----- configuration -----
    // Apart from the description and the eager-load window, changes take
    // effect at the next `refresh`.

    /// Sets the display width, e.g. after a rotation.
    pub fn set_display_width(&mut self, width: impl Into<Px>) -> Result<(), StripError> {
        self.config.set_display_width(width.into())
    }

    /// Sets the number of items per page while collapsed.
    ///
    /// The page grouping follows at once.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<(), StripError> {
        self.config.set_items_per_page(items_per_page)?;
        let mode = self.state.mode();
        self.state.sync_items_per_page(&self.config, mode);
        Ok(())
    }

    /// Sets the collapsed item width as a fraction of the display width.
    pub fn set_collapsed_width_fraction(&mut self, fraction: f32) -> Result<(), StripError> {
        self.config.set_collapsed_width_fraction(fraction)
    }

    /// Sets the collapsed height.
    pub fn set_height_collapsed(&mut self, height: impl Into<Px>) -> Result<(), StripError> {
        self.config.set_height_collapsed(height.into())
    }

    /// Sets the expanded height.
    pub fn set_height_expanded(&mut self, height: impl Into<Px>) -> Result<(), StripError> {
        self.config.set_height_expanded(height.into())
    }

    /// Centers the first and last item on pages of their own.
    pub fn set_end_pages_centered(&mut self, centered: bool) {
        self.config.set_end_pages_centered(centered);
    }

    /// Stops clicks from expanding the strip.
    pub fn set_expansion_disabled(&mut self, disabled: bool) {
        self.config.set_expansion_disabled(disabled);
    }

    /// Sets the pixel format hint for future loads.
    pub fn set_bitmap_quality(&mut self, quality: BitmapQuality) {
        self.config.set_bitmap_quality(quality);
    }

    /// Sets the base accessibility text. Applies immediately.
    pub fn set_base_content_description(&mut self, description: impl Into<String>) {
        self.config.set_base_content_description(description.into());
        self.update_content_description();
    }

    /// Sets how many screens of items the list view keeps realized.
    ///
    /// Rejects negative values. During an expand/collapse the window stays
    /// closed and the new value is applied when the transition commits.
    pub fn set_eager_load_screens(&mut self, screens: i32) -> Result<(), StripError> {
        let window = EagerLoadWindow::try_from(screens)?;
        self.config.set_eager_load(window);
        if !self.transition.is_animating() {
            self.list.set_eager_load_window(window);
        }
        Ok(())
    }

    /// Placeholder shown while the first image loads for the first time.
    pub fn set_hero_placeholder(&mut self, placeholder: Option<I::Placeholder>) {
        self.binder.set_hero_placeholder(placeholder);
    }

    /// Installs the event listener.
    pub fn set_listener(&mut self, listener: impl StripListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Replaces the snap rules.
    pub fn set_snap_strategy(&mut self, strategy: impl SnapStrategy + 'static) {
        self.snap_strategy = Box::new(strategy);
    }

    /// Replaces the expand/collapse planning.
    pub fn set_transition_strategy(&mut self, strategy: impl TransitionStrategy + 'static) {
        self.transition_strategy = Box::new(strategy);
    }

    /// Sets the mode directly, without animating. Paging follows the new
    /// mode at once; sizes follow at the next `refresh`.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.state
            .set_mode(StripMode::from_collapsed(collapsed), &self.config);
    }

    /// Replaces every item.
    pub fn set_items(&mut self, items: Vec<StripItem>) {
        self.items = items;
        self.state.set_item_count(self.items.len());
    }

    /// Drops every item and scrolls back to the start.
    pub fn clear_items(&mut self) {
        self.items.clear();
        self.state.set_item_count(0);
        self.pending_scroll_target = None;
        self.list.reset_scroll_position();
        self.list.data_set_changed(0);
    }

    /// Recomputes everything derived from the configuration and mode and
    /// rebinds the realized items. Call it after any configuration change.
    pub fn refresh(&mut self) {
        let mode = self.state.mode();
        self.state.sync_width_fraction(&self.config);
        self.state.sync_items_per_page(&self.config, mode);
        self.update_adapter_state(mode);
        self.update_content_description();
        self.update_padding();
        self.update_height();
        self.list.data_set_changed(self.items.len());
        debug!(?mode, item_width = %self.item_width(), "refreshed");
    }

    fn update_adapter_state(&mut self, mode: StripMode) {
        let width = self.item_width();
        self.binder.set_item_width(width);
        self.binder.set_collapsed(mode.is_collapsed());
    }

    fn update_content_description(&mut self) {
        self.binder
            .set_base_content_description(self.config.base_content_description());
    }

    fn update_padding(&mut self) {
        let padding = if self.is_collapsed() && self.config.end_pages_centered() {
            self.geometry().centering_padding()
        } else {
            Px::ZERO
        };
        self.list.set_horizontal_padding(padding);
    }

    fn update_height(&mut self) {
        let height = match self.state.mode() {
            StripMode::Collapsed => self.config.height_collapsed(),
            StripMode::Expanded => self.config.height_expanded(),
        };
        self.list.set_height(height);
    }

    // ----- selection -----

    /// First item of the selected page.
    ///
    /// Before any item is realized this is the selection restored from a
    /// [`SavedState`] if it fits the items, else 0. Once items are realized
    /// the restored selection is dropped.
    pub fn first_selected_item(&mut self) -> usize {
        if self.list.child_count() == 0 {
            return self
                .state
                .saved_first_selected_item()
                .filter(|&saved| saved < self.items.len())
                .unwrap_or(0);
        }

        self.state.take_saved_first_selected_item();
        self.list.first_visible_position().unwrap_or(0)
    }

    /// Number of items selected with the page starting at `position`.
    ///
    /// A position that does not start a page is reported and counts as one.
    pub fn selectable_items_for_position(&mut self, position: usize) -> usize {
        match self.paging().selectable_count(position) {
            Ok(count) => count,
            Err(anomaly) => {
                self.report(anomaly);
                1
            }
        }
    }

    /// Reports the current selection to the listener.
    pub fn notify_listener(&mut self) {
        let position = self.first_selected_item();
        self.notify_listener_for_position(position);
    }

    fn notify_listener_for_position(&mut self, position: usize) {
        let count = self.selectable_items_for_position(position);
        debug!(position, count, "images selected");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_images_selected(position, count);
        }
    }

    fn report(&mut self, anomaly: Anomaly) {
        warn!(%anomaly, "strip anomaly");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_anomaly(anomaly);
        }
    }

    // ----- gestures -----

    /// Handles a click on `position`: reports it, then expands or collapses
    /// around it unless expansion is disabled.
    pub fn on_item_clicked(&mut self, position: usize, now: Instant) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_image_clicked(position);
        }

        if self.config.expansion_disabled() {
            return;
        }
        self.toggle_expanded(position, now);
    }

    /// Starts an expand/collapse around `position`, ignoring the
    /// expansion-disabled flag.
    ///
    /// Returns `false` if a transition is already in flight or `position` is
    /// not realized.
    #[tracing::instrument(level = "debug", skip(self, now))]
    pub fn toggle_expanded(&mut self, position: usize, now: Instant) -> bool {
        if self.transition.is_animating() {
            return false;
        }

        let Some(anchor_left) = self.list.item_left(position) else {
            self.report(Anomaly::AnchorNotRealized(position));
            return false;
        };

        let geometry = self.geometry();
        let paging = self.paging();
        let plan = self.transition_strategy.plan(&TransitionContext {
            config: &self.config,
            geometry: &geometry,
            paging: &paging,
            from: self.state.mode(),
            anchor_position: position,
            anchor_left,
        });

        if !self.transition.begin(plan, position, now) {
            return false;
        }
        self.list.set_eager_load_window(EagerLoadWindow::NONE);
        true
    }

    /// Handles a released or cancelled touch. Snaps only if the list view was
    /// being dragged.
    pub fn on_touch_released(&mut self) -> Option<usize> {
        if self.list.scroll_state() != ScrollState::Dragging {
            return None;
        }
        self.snap_to_position(SnapGesture::Release)
    }

    /// Handles a fling with horizontal velocity `velocity_x`.
    pub fn on_fling(&mut self, velocity_x: f32) -> Option<usize> {
        self.snap_to_position(SnapGesture::Fling {
            velocity_x: Some(velocity_x),
        })
    }

    /// Stops any scroll and scrolls to the page chosen for `gesture`.
    ///
    /// Returns the target position, or `None` if the snap was aborted. No
    /// scroll is started when the target is already at rest.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn snap_to_position(&mut self, gesture: SnapGesture) -> Option<usize> {
        self.list.stop_scroll();
        self.pending_scroll_target = None;
        let dropped = self
            .scheduler
            .cancel(|task| matches!(task, DeferredTask::NotifySelection { .. }));
        if dropped > 0 {
            debug!(dropped, "dropped stale selection notification");
        }

        let mode = self.state.mode();
        self.state.sync_items_per_page(&self.config, mode);

        let Some((first, left)) = self
            .list
            .first_visible_position()
            .and_then(|first| self.list.item_left(first).map(|left| (first, left)))
        else {
            self.report(Anomaly::FirstVisibleUnresolved);
            return None;
        };

        let input = SnapInput {
            first_visible_position: first,
            current_left_offset: left,
            gesture,
        };
        let geometry = self.geometry();
        let decision = match self.snap_strategy.resolve(&self.paging(), &geometry, &input) {
            Ok(decision) => decision,
            Err(anomaly) => {
                self.report(anomaly);
                return None;
            }
        };
        if let Some(anomaly) = decision.repaired {
            self.report(anomaly);
        }

        let target = decision.target_position;
        let dx = scroll_distance(&geometry, mode.is_collapsed(), &input, target);
        if dx == Px::ZERO {
            return Some(target);
        }

        self.list.smooth_scroll_by(SmoothScroll {
            target_position: target,
            dx,
            duration: PAGING_ANIMATION_TIME,
        });
        self.pending_scroll_target = Some(target);
        Some(target)
    }

    /// Called by the host when a smooth scroll started by a snap stops.
    pub fn on_smooth_scroll_stopped(&mut self, now: Instant) {
        if let Some(position) = self.pending_scroll_target.take() {
            self.scheduler.schedule(
                DeferredTask::NotifySelection { position },
                now,
                PAGING_LISTENER_DELAY,
            );
        }
    }

    // ----- frame and layout hooks -----

    /// Runs due deferred work and advances a transition in flight.
    ///
    /// Returns whether further frames are needed.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        while let Some(task) = self.scheduler.pop_due(now) {
            match task {
                DeferredTask::NotifySelection { position } => {
                    self.notify_listener_for_position(position);
                }
                DeferredTask::RefreshAndNotify => {
                    self.refresh();
                    self.notify_listener();
                }
            }
        }

        if let Some(frame) = self.transition.tick(now) {
            // Page grouping follows the mode being left until the commit.
            let from = self
                .transition
                .session()
                .map_or(self.state.mode(), |session| session.from());
            self.state
                .set_width_fraction(frame.width_fraction, &self.config, from);
            self.update_adapter_state(from);

            self.list.set_height(frame.height);
            self.list.set_realized_item_width(self.item_width());
            if let Some(padding) = frame.padding {
                self.list.set_horizontal_padding(padding);
            }
            if frame.padding.is_none() || frame.finished {
                self.list.request_layout();
            }
        }

        self.transition.is_animating() || !self.scheduler.is_empty()
    }

    /// Called by the host after every layout pass. Moves the anchor to where
    /// the transition wants it and commits a finished transition.
    pub fn on_layout_complete(&mut self, now: Instant) {
        let Some(anchor) = self
            .transition
            .session()
            .map(|session| session.anchor_position())
        else {
            return;
        };
        let anchor_left = self.list.item_left(anchor);

        let Some(reposition) = self.transition.settle(anchor_left) else {
            return;
        };
        self.list.offset_children_horizontal(reposition.shift);

        if let Some(mode) = reposition.committed {
            self.state.commit(mode, &self.config);
            self.list.set_eager_load_window(self.config.eager_load());
            // Not safe to rebind in the middle of a layout pass.
            self.scheduler.post(DeferredTask::RefreshAndNotify, now);
            info!(?mode, "transition committed");
        }
    }

    // ----- binding -----

    /// Binds `position` into `target`.
    pub fn bind_item(&mut self, target: &mut I::Target, position: usize) -> Option<ItemBinding> {
        let quality = self.config.bitmap_quality();
        self.binder
            .bind(&mut self.loader, target, &self.items, position, quality)
    }

    /// Clears a recycled `target`.
    pub fn unbind_item(&mut self, target: &mut I::Target) {
        self.loader.clear(target);
    }

    /// Forwards an image load failure to the listener. The strip does not
    /// retry.
    pub fn report_image_load_failure(&mut self, position: usize, reason: &str) {
        let url = self
            .items
            .get(position)
            .map_or("", |item| item.url.as_str());
        warn!(position, url, reason, "image failed to load");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_image_load_failed(position, url, reason);
        }
    }

    // ----- persistence -----

    /// Snapshots the strip.
    pub fn capture(&mut self) -> SavedState {
        let first_selected = self.first_selected_item();
        SavedState::capture(&self.config, &self.state, first_selected)
    }

    /// Restores a snapshot and refreshes. A rejected snapshot leaves the
    /// strip unchanged.
    pub fn restore(&mut self, saved: &SavedState) -> Result<(), StripError> {
        saved.apply(&mut self.config, &mut self.state)?;
        self.refresh();
        Ok(())
    }
}
