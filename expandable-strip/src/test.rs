use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{
    binder::StripItem,
    collaborator::{ImageLoader, LoadRequest, ScrollState, SmoothScroll, StripListView},
    config::{BitmapQuality, EagerLoadWindow, StripArgs},
    error::{Anomaly, StripError},
    px::Px,
    snap::SnapGesture,
    state::{SavedState, StripMode},
    strip::{ExpandableStrip, PAGING_ANIMATION_TIME, StripListener},
};

const FRAME: Duration = Duration::from_millis(16);

/// A list view laid out as a plain row: item `p` starts at
/// `padding + p * item_width - scroll_x`.
struct FakeListView {
    display_width: Px,
    item_width: Px,
    item_count: usize,
    padding: Px,
    height: Px,
    scroll_x: Px,
    attached: bool,
    scroll_state: ScrollState,
    eager_windows: Vec<EagerLoadWindow>,
    scrolls: Vec<SmoothScroll>,
    stops: usize,
    layout_requests: usize,
    resets: usize,
}

impl FakeListView {
    fn new(display_width: i32) -> Self {
        Self {
            display_width: Px(display_width),
            item_width: Px::ZERO,
            item_count: 0,
            padding: Px::ZERO,
            height: Px::ZERO,
            scroll_x: Px::ZERO,
            attached: false,
            scroll_state: ScrollState::Idle,
            eager_windows: Vec::new(),
            scrolls: Vec::new(),
            stops: 0,
            layout_requests: 0,
            resets: 0,
        }
    }

    fn left(&self, position: usize) -> Px {
        self.padding + self.item_width * position as i32 - self.scroll_x
    }

    /// Runs the last smooth scroll to completion.
    fn finish_scroll(&mut self) {
        if let Some(scroll) = self.scrolls.last() {
            self.scroll_x += scroll.dx;
        }
        self.scroll_state = ScrollState::Idle;
    }
}

impl StripListView for FakeListView {
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
        self.eager_windows.push(window);
    }

    fn set_realized_item_width(&mut self, width: Px) {
        self.item_width = width;
    }

    fn offset_children_horizontal(&mut self, dx: Px) {
        self.scroll_x -= dx;
    }

    fn smooth_scroll_by(&mut self, scroll: SmoothScroll) {
        self.scroll_state = ScrollState::Settling;
        self.scrolls.push(scroll);
    }

    fn stop_scroll(&mut self) {
        self.stops += 1;
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

    fn request_layout(&mut self) {
        self.layout_requests += 1;
    }

    fn data_set_changed(&mut self, item_count: usize) {
        self.item_count = item_count;
    }

    fn reset_scroll_position(&mut self) {
        self.resets += 1;
        self.scroll_x = Px::ZERO;
    }
}

#[derive(Default)]
struct RecordingLoader {
    loads: Vec<(String, Option<&'static str>, BitmapQuality)>,
    clears: usize,
}

impl ImageLoader for RecordingLoader {
    type Target = Option<String>;
    type Placeholder = &'static str;

    fn load(&mut self, target: &mut Self::Target, request: LoadRequest<'_, Self::Placeholder>) {
        *target = Some(request.url.to_string());
        self.loads
            .push((request.url.to_string(), request.placeholder, request.quality));
    }

    fn clear(&mut self, target: &mut Self::Target) {
        *target = None;
        self.clears += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Clicked(usize),
    Selected(usize, usize),
    Anomaly(Anomaly),
    LoadFailed(usize, String),
}

#[derive(Clone, Default)]
struct RecordingListener {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingListener {
    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl StripListener for RecordingListener {
    fn on_image_clicked(&mut self, position: usize) {
        self.events.lock().push(Event::Clicked(position));
    }

    fn on_images_selected(&mut self, first_position: usize, count: usize) {
        self.events.lock().push(Event::Selected(first_position, count));
    }

    fn on_anomaly(&mut self, anomaly: Anomaly) {
        self.events.lock().push(Event::Anomaly(anomaly));
    }

    fn on_image_load_failed(&mut self, position: usize, _url: &str, reason: &str) {
        self.events
            .lock()
            .push(Event::LoadFailed(position, reason.to_string()));
    }
}

type TestStrip = ExpandableStrip<FakeListView, RecordingLoader>;

fn items(count: usize) -> Vec<StripItem> {
    (0..count)
        .map(|i| StripItem::new(format!("https://img.example/{i}.jpg")))
        .collect()
}

/// Builds, refreshes and lays out a strip the way a host would.
fn strip(args: StripArgs, count: usize) -> (TestStrip, RecordingListener) {
    let width = args.display_width.raw();
    let mut strip = ExpandableStrip::new(args, FakeListView::new(width), RecordingLoader::default())
        .expect("valid configuration");
    let listener = RecordingListener::default();
    strip.set_listener(listener.clone());
    strip.set_items(items(count));
    strip.refresh();
    lay_out(&mut strip);
    (strip, listener)
}

fn lay_out(strip: &mut TestStrip) {
    let width = strip.binder().item_width();
    let list = strip.list_mut();
    list.item_width = width;
    list.attached = true;
}

/// Drives frames and layout passes until the strip goes quiet.
fn run_frames(strip: &mut TestStrip, start: Instant) -> Instant {
    let mut now = start;
    for _ in 0..100 {
        let more = strip.on_frame(now);
        strip.on_layout_complete(now);
        if !more {
            return now;
        }
        now += FRAME;
    }
    panic!("strip never went quiet");
}

fn single_page_args() -> StripArgs {
    StripArgs::default()
        .display_width(1000)
        .items_per_page(1)
        .collapsed_width_fraction(0.6)
        .height_collapsed(200)
        .height_expanded(800)
}

#[test]
fn released_drag_past_half_an_item_snaps_to_the_next_page() {
    let (mut strip, listener) = strip(single_page_args(), 4);
    assert_eq!(strip.item_width(), Px(600));
    strip.list_mut().scroll_x = Px(1000);
    strip.list_mut().scroll_state = ScrollState::Dragging;
    assert_eq!(strip.list().item_left(1), Some(Px(-400)));

    assert_eq!(strip.on_touch_released(), Some(2));
    assert_eq!(
        strip.list().scrolls,
        vec![SmoothScroll {
            target_position: 2,
            dx: Px(200),
            duration: PAGING_ANIMATION_TIME,
        }]
    );

    let stopped = Instant::now();
    strip.list_mut().finish_scroll();
    strip.on_smooth_scroll_stopped(stopped);
    strip.on_frame(stopped + Duration::from_millis(99));
    assert!(listener.take().is_empty());
    strip.on_frame(stopped + Duration::from_millis(100));
    assert_eq!(listener.take(), vec![Event::Selected(2, 1)]);
    assert_eq!(strip.list().item_left(2), Some(Px::ZERO));
}

#[test]
fn released_drag_short_of_half_an_item_settles_back() {
    let (mut strip, _) = strip(single_page_args(), 4);
    strip.list_mut().scroll_x = Px(700);
    strip.list_mut().scroll_state = ScrollState::Dragging;

    assert_eq!(strip.on_touch_released(), Some(1));
    assert_eq!(strip.list().scrolls[0].dx, Px(-100));
}

#[test]
fn release_without_a_drag_does_not_snap() {
    let (mut strip, _) = strip(single_page_args(), 4);
    strip.list_mut().scroll_x = Px(1000);
    assert_eq!(strip.on_touch_released(), None);
    assert!(strip.list().scrolls.is_empty());
    assert_eq!(strip.list().stops, 0);
}

#[test]
fn fling_advances_one_page_in_its_direction() {
    let (mut strip, _) = strip(single_page_args(), 4);
    assert_eq!(strip.on_fling(-500.0), Some(1));
    assert_eq!(strip.list().scrolls[0].dx, Px(600));
    assert_eq!(strip.list().stops, 1);
}

#[test]
fn snap_already_at_rest_does_not_scroll() {
    let (mut strip, listener) = strip(single_page_args(), 4);
    strip.list_mut().scroll_x = Px(600);
    assert_eq!(strip.on_fling(500.0), Some(1));
    assert!(strip.list().scrolls.is_empty());
    strip.on_smooth_scroll_stopped(Instant::now());
    assert!(strip.scheduler().is_empty());
    assert!(listener.take().is_empty());
}

#[test]
fn new_snap_cancels_the_scroll_in_flight() {
    let (mut strip, _) = strip(single_page_args(), 4);
    strip.on_fling(-500.0);
    assert!(strip.intercepts_touch());
    strip.list_mut().scroll_x = Px(300);
    strip.on_fling(-500.0);
    assert_eq!(strip.list().stops, 2);
    assert_eq!(strip.list().scrolls.len(), 2);
}

#[test]
fn new_snap_drops_the_queued_notification_of_the_previous_one() {
    let (mut strip, listener) = strip(single_page_args(), 4);
    let start = Instant::now();
    assert_eq!(strip.on_fling(-500.0), Some(1));
    strip.list_mut().finish_scroll();
    strip.on_smooth_scroll_stopped(start);
    assert_eq!(strip.scheduler().len(), 1);

    let second = start + Duration::from_millis(50);
    assert_eq!(strip.on_fling(-500.0), Some(2));
    assert!(strip.scheduler().is_empty());
    strip.list_mut().finish_scroll();
    strip.on_smooth_scroll_stopped(second);

    strip.on_frame(start + Duration::from_millis(100));
    assert!(listener.take().is_empty());
    strip.on_frame(second + Duration::from_millis(100));
    assert_eq!(listener.take(), vec![Event::Selected(2, 1)]);
}

#[test]
fn fling_without_velocity_is_reported_and_aborted() {
    let (mut strip, listener) = strip(single_page_args(), 4);
    assert_eq!(
        strip.snap_to_position(SnapGesture::Fling { velocity_x: None }),
        None
    );
    assert!(strip.list().scrolls.is_empty());
    assert_eq!(
        listener.take(),
        vec![Event::Anomaly(Anomaly::MissingFlingVelocity)]
    );
}

#[test]
fn snap_without_realized_items_is_reported() {
    let (mut strip, listener) = strip(single_page_args(), 0);
    assert_eq!(strip.on_fling(-10.0), None);
    assert_eq!(
        listener.take(),
        vec![Event::Anomaly(Anomaly::FirstVisibleUnresolved)]
    );
}

#[test]
fn clicking_expands_the_tapped_item_to_the_left_edge() {
    let (mut strip, listener) = strip(single_page_args(), 4);
    strip.list_mut().scroll_x = Px(200);
    assert_eq!(strip.list().item_left(1), Some(Px(400)));

    let start = Instant::now();
    strip.on_item_clicked(1, start);
    assert!(strip.is_animating());
    assert_eq!(
        strip.list().eager_windows.last(),
        Some(&EagerLoadWindow::NONE)
    );

    run_frames(&mut strip, start);

    assert!(!strip.is_animating());
    assert_eq!(strip.state().mode(), StripMode::Expanded);
    assert_eq!(strip.state().current_items_per_page(), 1);
    assert_eq!(strip.item_width(), Px(1000));
    assert_eq!(strip.list().item_left(1), Some(Px::ZERO));
    assert_eq!(strip.list().height, Px(800));
    assert_eq!(strip.list().padding, Px::ZERO);
    assert!(strip.list().layout_requests > 0);
    assert!(strip.binder().item_width() == Px(1000) && !strip.binder().is_collapsed());
    assert_eq!(
        strip.list().eager_windows,
        vec![
            EagerLoadWindow::try_from(1).expect("non-negative"),
            EagerLoadWindow::NONE,
            EagerLoadWindow::try_from(1).expect("non-negative"),
        ]
    );
    assert_eq!(
        listener.take(),
        vec![Event::Clicked(1), Event::Selected(1, 1)]
    );
}

#[test]
fn collapsing_returns_the_item_to_its_slot_in_the_page() {
    let (mut strip, listener) = strip(
        StripArgs::default()
            .display_width(1000)
            .items_per_page(3)
            .collapsed_width_fraction(0.3)
            .height_collapsed(200)
            .height_expanded(800)
            .collapsed(false),
        9,
    );
    assert_eq!(strip.item_width(), Px(1000));
    strip.list_mut().scroll_x = Px(4000);

    let start = Instant::now();
    strip.on_item_clicked(4, start);
    run_frames(&mut strip, start);

    assert!(strip.is_collapsed());
    assert_eq!(strip.item_width(), Px(300));
    assert_eq!(strip.list().item_left(4), Some(Px(300)));
    assert_eq!(strip.list().first_visible_position(), Some(3));
    assert_eq!(strip.list().height, Px(200));
    assert_eq!(
        listener.take(),
        vec![Event::Clicked(4), Event::Selected(3, 3)]
    );
}

#[test]
fn centered_first_item_round_trips_through_expansion() {
    let (mut strip, listener) = strip(
        StripArgs::default()
            .display_width(1000)
            .items_per_page(2)
            .collapsed_width_fraction(0.4)
            .end_pages_centered(true)
            .height_collapsed(200)
            .height_expanded(800),
        5,
    );
    assert_eq!(strip.list().padding, Px(300));
    assert_eq!(strip.list().item_left(0), Some(Px(300)));

    let start = Instant::now();
    assert!(strip.toggle_expanded(0, start));
    let now = run_frames(&mut strip, start);
    assert_eq!(strip.list().padding, Px::ZERO);
    assert_eq!(strip.list().item_left(0), Some(Px::ZERO));

    assert!(strip.toggle_expanded(0, now));
    run_frames(&mut strip, now);
    assert!(strip.is_collapsed());
    assert_eq!(strip.list().padding, Px(300));
    assert_eq!(strip.list().item_left(0), Some(Px(300)));
    assert_eq!(strip.list().scroll_x, Px::ZERO);
    assert_eq!(
        listener.take(),
        vec![Event::Selected(0, 1), Event::Selected(0, 1)]
    );
}

#[test]
fn toggling_during_a_transition_changes_nothing() {
    let (mut strip, listener) = strip(single_page_args(), 4);
    let start = Instant::now();
    strip.on_item_clicked(1, start);
    strip.on_frame(start + FRAME);
    strip.on_layout_complete(start + FRAME);

    let session = strip.transition().session().cloned();
    let state = strip.state().clone();
    assert!(!strip.toggle_expanded(2, start + FRAME * 2));
    strip.on_item_clicked(0, start + FRAME * 2);

    assert_eq!(strip.transition().session().cloned(), session);
    assert_eq!(strip.state(), &state);
    assert_eq!(listener.take(), vec![Event::Clicked(1), Event::Clicked(0)]);
}

#[test]
fn disabled_expansion_ignores_clicks_but_not_programmatic_toggles() {
    let (mut strip, listener) = strip(single_page_args().expansion_disabled(true), 4);
    let start = Instant::now();
    strip.on_item_clicked(0, start);
    assert!(!strip.is_animating());
    assert_eq!(listener.take(), vec![Event::Clicked(0)]);

    assert!(strip.toggle_expanded(0, start));
    assert!(strip.is_animating());
}

#[test]
fn toggling_an_unrealized_item_is_reported() {
    let (mut strip, listener) = strip(single_page_args(), 4);
    assert!(!strip.toggle_expanded(50, Instant::now()));
    assert!(!strip.is_animating());
    assert_eq!(
        listener.take(),
        vec![Event::Anomaly(Anomaly::AnchorNotRealized(50))]
    );
}

#[test]
fn eager_load_window_is_validated_and_deferred_during_transitions() {
    let (mut strip, _) = strip(single_page_args(), 4);
    assert_eq!(
        strip.set_eager_load_screens(-1),
        Err(StripError::NegativeEagerLoadScreens(-1))
    );
    assert_eq!(strip.list().eager_windows.len(), 1);

    let start = Instant::now();
    strip.toggle_expanded(0, start);
    strip
        .set_eager_load_screens(2)
        .expect("non-negative window");
    assert_eq!(
        strip.list().eager_windows.last(),
        Some(&EagerLoadWindow::NONE)
    );

    run_frames(&mut strip, start);
    let restored = *strip.list().eager_windows.last().expect("restored");
    assert_eq!(restored.screens(), 2);
    assert_eq!(restored.extra_layout_space(Px(1000)), Px(2000));
}

#[test]
fn saved_state_round_trips_through_json() {
    let args = StripArgs::default()
        .display_width(1000)
        .items_per_page(2)
        .collapsed_width_fraction(0.4)
        .end_pages_centered(true)
        .height_collapsed(250)
        .height_expanded(900)
        .bitmap_quality(BitmapQuality::Rgb565)
        .base_content_description("Photo");
    let (mut original, _) = strip(args, 6);
    original.list_mut().scroll_x = Px(1500);
    assert_eq!(original.list().first_visible_position(), Some(3));

    let saved = original.capture();
    assert_eq!(saved.counts.first_selected_item, 3);
    let json = serde_json::to_string(&saved).expect("serializable");
    let decoded: SavedState = serde_json::from_str(&json).expect("deserializable");

    let mut restored = ExpandableStrip::new(
        StripArgs::default().display_width(1000),
        FakeListView::new(1000),
        RecordingLoader::default(),
    )
    .expect("valid configuration");
    restored.set_items(items(6));
    restored.restore(&decoded).expect("valid snapshot");

    assert_eq!(restored.config(), original.config());
    assert_eq!(restored.item_width(), original.item_width());
    assert_eq!(restored.list().padding, original.list().padding);
    assert_eq!(restored.list().height, Px(250));
    assert_eq!(restored.binder().base_content_description(), "Photo");

    // Nothing laid out yet: the restored selection stands in.
    assert_eq!(restored.first_selected_item(), 3);
    lay_out(&mut restored);
    assert_eq!(restored.first_selected_item(), 0);
    assert_eq!(restored.state().saved_first_selected_item(), None);
}

#[test]
fn restored_selection_beyond_the_items_falls_back_to_the_start() {
    let (mut original, _) = strip(single_page_args(), 4);
    original.list_mut().scroll_x = Px(1800);
    let saved = original.capture();
    assert_eq!(saved.counts.first_selected_item, 3);

    let mut restored = ExpandableStrip::new(
        single_page_args(),
        FakeListView::new(1000),
        RecordingLoader::default(),
    )
    .expect("valid configuration");
    restored.set_items(items(2));
    restored.restore(&saved).expect("valid snapshot");
    assert_eq!(restored.first_selected_item(), 0);
}

#[test]
fn rejected_snapshot_leaves_the_strip_alone() {
    let (mut strip, _) = strip(single_page_args(), 4);
    let mut saved = strip.capture();
    saved.fractions.min_width_fraction = 2.0;
    saved.flags.is_collapsed = false;

    assert_eq!(
        strip.restore(&saved),
        Err(StripError::InvalidWidthFraction(2.0))
    );
    assert!(strip.is_collapsed());
    assert_eq!(strip.config().collapsed_width_fraction(), 0.6);
}

#[test]
fn mid_page_selection_is_reported_and_counts_one() {
    let (mut strip, listener) = strip(single_page_args().items_per_page(3), 7);
    assert_eq!(strip.selectable_items_for_position(3), 3);
    assert_eq!(strip.selectable_items_for_position(4), 1);
    assert_eq!(
        listener.take(),
        vec![Event::Anomaly(Anomaly::InvalidSelectionPosition(4))]
    );
}

#[test]
fn binding_uses_the_hero_placeholder_once() {
    let (mut strip, _) = strip(single_page_args().bitmap_quality(BitmapQuality::Argb4444), 3);
    strip.set_hero_placeholder(Some("hero"));

    let mut first = None;
    let binding = strip.bind_item(&mut first, 0).expect("in range");
    assert_eq!(binding.width, Some(Px(600)));
    assert!(!binding.scalable);
    assert_eq!(binding.content_description, "Image 1 of 3");
    strip.bind_item(&mut first, 0);

    let loads = &strip.loader().loads;
    assert_eq!(loads[0].1, Some("hero"));
    assert_eq!(loads[1].1, None);
    assert_eq!(loads[0].2, BitmapQuality::Argb4444);

    strip.unbind_item(&mut first);
    assert_eq!(first, None);
    assert_eq!(strip.loader().clears, 1);
}

#[test]
fn description_changes_apply_without_refresh() {
    let (mut strip, _) = strip(single_page_args(), 2);
    strip.set_base_content_description("Listing photo");
    let mut target = None;
    let binding = strip.bind_item(&mut target, 1).expect("in range");
    assert_eq!(binding.content_description, "Listing photo 2 of 2");
}

#[test]
fn load_failures_reach_the_listener() {
    let (mut strip, listener) = strip(single_page_args(), 2);
    strip.report_image_load_failure(1, "404");
    assert_eq!(
        listener.take(),
        vec![Event::LoadFailed(1, "404".to_string())]
    );
}

#[test]
fn clearing_items_resets_the_list() {
    let (mut strip, _) = strip(single_page_args(), 4);
    strip.list_mut().scroll_x = Px(900);
    strip.clear_items();
    assert!(strip.items().is_empty());
    assert_eq!(strip.list().scroll_x, Px::ZERO);
    assert_eq!(strip.list().item_count, 0);
    assert_eq!(strip.list().resets, 1);
}

#[test]
fn manual_mode_change_applies_on_refresh() {
    let (mut strip, _) = strip(single_page_args(), 4);
    strip.set_collapsed(false);
    assert_eq!(strip.list().height, Px(200));
    strip.refresh();
    assert_eq!(strip.list().height, Px(800));
    assert_eq!(strip.item_width(), Px(1000));
    assert_eq!(strip.paging().items_per_page_current(), 1);
}

#[test]
fn manual_mode_change_regroups_pages_at_once() {
    let args = single_page_args()
        .items_per_page(3)
        .collapsed_width_fraction(0.3);
    let (mut strip, listener) = strip(args, 7);
    strip.set_collapsed(false);
    assert_eq!(strip.state().mode(), StripMode::Expanded);
    assert_eq!(strip.paging().items_per_page_current(), 1);

    let saved = strip.capture();
    assert!(!saved.flags.is_collapsed);
    assert_eq!(saved.counts.items_per_page_current, 1);

    strip.list_mut().scroll_x = Px(600);
    strip.notify_listener();
    assert_eq!(listener.take(), vec![Event::Selected(2, 1)]);
}

#[test]
fn items_per_page_change_regroups_pages_at_once() {
    let (mut strip, _) = strip(single_page_args().collapsed_width_fraction(0.4), 6);
    strip.set_items_per_page(2).expect("valid");
    assert_eq!(strip.paging().items_per_page_current(), 2);
    assert_eq!(
        strip.set_items_per_page(0),
        Err(StripError::InvalidItemsPerPage(0))
    );
    assert_eq!(strip.paging().items_per_page_current(), 2);
}

#[test]
fn notify_listener_reports_the_visible_page() {
    let (mut strip, listener) = strip(single_page_args().items_per_page(2), 5);
    strip.list_mut().scroll_x = Px(2400);
    strip.notify_listener();
    assert_eq!(listener.take(), vec![Event::Selected(4, 1)]);
}
