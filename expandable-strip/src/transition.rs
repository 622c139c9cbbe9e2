//! The expand/collapse state machine.
//!
//! A transition runs two timelines side by side. The size timeline drives the
//! strip height, the item width fraction and, with centered end pages, the
//! horizontal padding. The left-edge timeline drives where the tapped item
//! (the anchor) should be; after every layout pass the realized items are
//! shifted by raw pixels so the anchor lands there.
//!
//! The new mode is committed from the layout-completion step once the
//! left-edge timeline has finished, never from inside a frame tick.
use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    animation::{self, Tween},
    config::{EXPANDED_WIDTH_FRACTION, StripConfig},
    geometry::Geometry,
    paging::PagingIndex,
    px::Px,
    state::StripMode,
};

/// Start and end value of an interpolated quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span<T> {
    /// Value at progress 0.
    pub start: T,
    /// Value at progress 1.
    pub end: T,
}

impl<T> Span<T> {
    /// Creates a span.
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

/// Everything a [`TransitionStrategy`] may read when planning.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    /// Current configuration.
    pub config: &'a StripConfig,
    /// Geometry at the moment of the toggle.
    pub geometry: &'a Geometry,
    /// Paging at the moment of the toggle.
    pub paging: &'a PagingIndex,
    /// Mode being left.
    pub from: StripMode,
    /// Position of the tapped item.
    pub anchor_position: usize,
    /// Left edge of the tapped item in viewport coordinates.
    pub anchor_left: Px,
}

/// Start and end values of one expand/collapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionPlan {
    /// Mode being left.
    pub from: StripMode,
    /// Mode committed at the end.
    pub to: StripMode,
    /// Strip height.
    pub height: Span<Px>,
    /// Horizontal padding on both sides.
    pub padding: Span<Px>,
    /// Whether the padding is interpolated. Otherwise every frame requests a
    /// plain relayout.
    pub animate_padding: bool,
    /// Item width as a fraction of the display width.
    pub width_fraction: Span<f32>,
    /// Left edge of the anchor.
    pub anchor_left: Span<Px>,
}

/// Plans the interpolated values of an expand/collapse.
pub trait TransitionStrategy {
    /// Builds the plan for a toggle described by `ctx`.
    fn plan(&self, ctx: &TransitionContext<'_>) -> TransitionPlan;
}

/// Expands the anchor to fill the display, or collapses it back into its page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandCollapse;

impl TransitionStrategy for ExpandCollapse {
    fn plan(&self, ctx: &TransitionContext<'_>) -> TransitionPlan {
        let config = ctx.config;
        let centering = ctx.geometry.centering_padding();
        let collapsed_fraction = config.collapsed_width_fraction();
        let to = ctx.from.toggled();

        match ctx.from {
            StripMode::Collapsed => TransitionPlan {
                from: StripMode::Collapsed,
                to,
                height: Span::new(config.height_collapsed(), config.height_expanded()),
                padding: Span::new(centering, Px::ZERO),
                animate_padding: config.end_pages_centered() && centering != Px::ZERO,
                width_fraction: Span::new(collapsed_fraction, EXPANDED_WIDTH_FRACTION),
                anchor_left: Span::new(ctx.anchor_left, Px::ZERO),
            },
            StripMode::Expanded => {
                let relative = ctx
                    .paging
                    .relative_position(ctx.anchor_position, StripMode::Collapsed);
                let resting_left = ctx
                    .geometry
                    .collapsed_resting_left(ctx.anchor_position, relative);
                TransitionPlan {
                    from: StripMode::Expanded,
                    to,
                    height: Span::new(config.height_expanded(), config.height_collapsed()),
                    padding: Span::new(Px::ZERO, centering),
                    animate_padding: config.end_pages_centered() && centering != Px::ZERO,
                    width_fraction: Span::new(EXPANDED_WIDTH_FRACTION, collapsed_fraction),
                    anchor_left: Span::new(Px::ZERO, resting_left),
                }
            }
        }
    }
}

/// An expand/collapse in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSession {
    anchor_position: usize,
    desired_anchor_left: Px,
    plan: TransitionPlan,
    size: Tween,
    left_edge: Tween,
    left_edge_running: bool,
}

impl TransitionSession {
    /// Position of the anchor item.
    pub fn anchor_position(&self) -> usize {
        self.anchor_position
    }

    /// Where the anchor's left edge should be at the last tick.
    pub fn desired_anchor_left(&self) -> Px {
        self.desired_anchor_left
    }

    /// Mode being left.
    pub fn from(&self) -> StripMode {
        self.plan.from
    }

    /// Mode committed at the end.
    pub fn to(&self) -> StripMode {
        self.plan.to
    }

    /// Whether the left-edge timeline still runs.
    pub fn is_left_edge_running(&self) -> bool {
        self.left_edge_running
    }
}

/// Values to apply for one animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    /// Strip height.
    pub height: Px,
    /// Item width fraction.
    pub width_fraction: f32,
    /// Padding, when it is animated.
    pub padding: Option<Px>,
    /// Where the anchor's left edge should be.
    pub desired_anchor_left: Px,
    /// Both timelines have reached their end.
    pub finished: bool,
}

/// Outcome of a layout pass during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reposition {
    /// Pixels to offset every realized item by.
    pub shift: Px,
    /// The mode to commit, once the transition is over.
    pub committed: Option<StripMode>,
}

/// Owns at most one [`TransitionSession`].
#[derive(Debug, Clone)]
pub struct TransitionController {
    session: Option<TransitionSession>,
    duration: Duration,
}

impl TransitionController {
    /// Creates an idle controller whose transitions last `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            session: None,
            duration,
        }
    }

    /// Whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// The transition in flight.
    pub fn session(&self) -> Option<&TransitionSession> {
        self.session.as_ref()
    }

    /// Starts a transition around `anchor_position`.
    ///
    /// Returns `false` and leaves the running session untouched if a
    /// transition is already in flight.
    pub fn begin(&mut self, plan: TransitionPlan, anchor_position: usize, now: Instant) -> bool {
        if self.session.is_some() {
            debug!(anchor_position, "transition in flight, ignoring toggle");
            return false;
        }

        debug!(
            anchor_position,
            from = ?plan.from,
            to = ?plan.to,
            "starting transition"
        );
        self.session = Some(TransitionSession {
            anchor_position,
            desired_anchor_left: plan.anchor_left.start,
            plan,
            size: Tween::new(now, self.duration),
            left_edge: Tween::new(now, self.duration),
            left_edge_running: true,
        });
        true
    }

    /// Advances both timelines to `now`.
    pub fn tick(&mut self, now: Instant) -> Option<TransitionFrame> {
        let session = self.session.as_mut()?;
        let plan = session.plan;

        let size_progress = session.size.progress(now);
        let height =
            animation::lerp_px_truncated(plan.height.start, plan.height.end, size_progress);
        let width_fraction = animation::lerp_f32(
            plan.width_fraction.start,
            plan.width_fraction.end,
            size_progress,
        );
        let padding = plan.animate_padding.then(|| {
            animation::lerp_px_rounded(plan.padding.start, plan.padding.end, size_progress)
        });

        if session.left_edge_running {
            let left_progress = session.left_edge.progress(now);
            session.desired_anchor_left = animation::lerp_px_truncated(
                plan.anchor_left.start,
                plan.anchor_left.end,
                left_progress,
            );
            if session.left_edge.is_finished(now) {
                session.left_edge_running = false;
            }
        }

        Some(TransitionFrame {
            height,
            width_fraction,
            padding,
            desired_anchor_left: session.desired_anchor_left,
            finished: session.size.is_finished(now) && !session.left_edge_running,
        })
    }

    /// Applies a finished layout pass.
    ///
    /// `anchor_left` is the anchor's left edge after layout, `None` if it is
    /// not realized. Returns `None` when no transition is in flight.
    pub fn settle(&mut self, anchor_left: Option<Px>) -> Option<Reposition> {
        let session = self.session.as_ref()?;
        let shift = anchor_left.map_or(Px::ZERO, |left| {
            session.desired_anchor_left.saturating_sub(left)
        });

        if session.left_edge_running {
            return Some(Reposition {
                shift,
                committed: None,
            });
        }

        let to = session.plan.to;
        self.session = None;
        debug!(?to, "transition finished");
        Some(Reposition {
            shift,
            committed: Some(to),
        })
    }
}
