//! Headless driver for the expandable strip.
//!
//! Builds a strip over a simulated list view, replays one gesture, runs the
//! resulting animation and deferred work to completion, then prints the
//! listener events and the saved state as JSON.
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use expandable_strip::{ExpandableStrip, Px, StripArgs, StripItem};
use tracing::info;

mod simulated;
use simulated::{EventLog, LoggingLoader, SimulatedList};

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 600;

#[derive(Parser)]
#[command(name = "example")]
#[command(version, about = "Drive an expandable image strip headlessly", long_about = None)]
struct Cli {
    #[command(flatten)]
    strip: StripOptions,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StripOptions {
    /// Display width in pixels
    #[arg(long, default_value_t = 1080)]
    display_width: i32,
    /// Number of images
    #[arg(long, default_value_t = 12)]
    items: usize,
    /// Images per page while collapsed
    #[arg(long, default_value_t = 2)]
    items_per_page: usize,
    /// Collapsed image width as a fraction of the display width
    #[arg(long, default_value_t = 0.45)]
    collapsed_fraction: f32,
    /// Center the first and last image on pages of their own
    #[arg(long)]
    centered: bool,
    /// Strip height while collapsed
    #[arg(long, default_value_t = 320)]
    height_collapsed: i32,
    /// Strip height while expanded
    #[arg(long, default_value_t = 1280)]
    height_expanded: i32,
    /// Screens of images kept realized beyond the viewport
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    eager_screens: i32,
    /// Start in the expanded mode
    #[arg(long)]
    expanded: bool,
}

impl From<&StripOptions> for StripArgs {
    fn from(options: &StripOptions) -> Self {
        StripArgs::default()
            .display_width(options.display_width)
            .items_per_page(options.items_per_page)
            .collapsed_width_fraction(options.collapsed_fraction)
            .end_pages_centered(options.centered)
            .height_collapsed(options.height_collapsed)
            .height_expanded(options.height_expanded)
            .eager_load_screens(options.eager_screens)
            .collapsed(!options.expanded)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Drag by a number of pixels, release and settle
    Drag {
        /// Pixels to drag; positive reveals later images
        #[arg(allow_hyphen_values = true)]
        dx: i32,
    },
    /// Fling with a horizontal velocity and settle
    Fling {
        /// Velocity in pixels per second; negative advances
        #[arg(allow_hyphen_values = true)]
        velocity: f32,
    },
    /// Tap an image and run the expand/collapse to completion
    Tap {
        /// Position of the tapped image
        position: usize,
    },
}

type Strip = ExpandableStrip<SimulatedList, LoggingLoader>;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut strip = ExpandableStrip::new(
        StripArgs::from(&cli.strip),
        SimulatedList::new(Px::new(cli.strip.display_width)),
        LoggingLoader,
    )
    .context("invalid strip configuration")?;
    let events = EventLog::default();
    strip.set_listener(events.clone());
    strip.set_hero_placeholder(Some("hero-placeholder.jpg".to_string()));
    strip.set_items(
        (0..cli.strip.items)
            .map(|i| {
                StripItem::new(format!("https://images.example.com/{i}.jpg"))
                    .with_alt_text(format!("Room {}", i + 1))
            })
            .collect(),
    );
    strip.refresh();
    bind_visible(&mut strip);

    let start = Instant::now();
    let mut now = start;
    match cli.command {
        Command::Drag { dx } => {
            strip.list_mut().drag_by(Px::new(dx));
            strip.on_touch_released();
            now = settle_scroll(&mut strip, now);
        }
        Command::Fling { velocity } => {
            strip.on_fling(velocity);
            now = settle_scroll(&mut strip, now);
        }
        Command::Tap { position } => {
            strip.on_item_clicked(position, now);
            now = run_frames(&mut strip, now);
        }
    }

    info!(
        collapsed = strip.is_collapsed(),
        item_width = %strip.item_width(),
        height = %strip.list().height(),
        padding = %strip.list().padding(),
        eager_screens = strip.list().eager_window().screens(),
        "settled"
    );

    for event in events.snapshot() {
        println!("{event:?}");
    }
    let saved = strip.capture();
    println!(
        "{}",
        serde_json::to_string_pretty(&saved).context("failed to serialize saved state")?
    );
    info!(simulated_ms = (now - start).as_millis() as u64, "done");
    Ok(())
}

/// Binds what the first layout pass would realize.
fn bind_visible(strip: &mut Strip) {
    let width = strip.binder().item_width();
    strip.list_mut().attach(width);

    let mut targets: Vec<Option<String>> = vec![None; strip.items().len()];
    for (position, target) in targets.iter_mut().enumerate() {
        if let Some(binding) = strip.bind_item(target, position) {
            info!(
                position,
                width = ?binding.width,
                description = %binding.content_description,
                "bound"
            );
        }
    }
}

fn settle_scroll(strip: &mut Strip, now: Instant) -> Instant {
    if strip.list_mut().finish_scroll() {
        strip.on_smooth_scroll_stopped(now);
    }
    run_frames(strip, now)
}

fn run_frames(strip: &mut Strip, start: Instant) -> Instant {
    let mut now = start;
    for _ in 0..MAX_FRAMES {
        let more = strip.on_frame(now);
        strip.on_layout_complete(now);
        if !more {
            break;
        }
        // Idle between deferred tasks: skip ahead instead of spinning frames.
        now = match strip.scheduler().next_due() {
            Some(due) if !strip.is_animating() => due.max(now + FRAME),
            _ => now + FRAME,
        };
    }
    now
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            match tracing_subscriber::EnvFilter::try_new("error,expandable_strip=info,example=info")
            {
                Ok(filter) => filter,
                Err(_) => tracing_subscriber::EnvFilter::new("error"),
            }
        }
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}
