//! Single-writer event loop that owns the configuration store and the field.

use crate::render;
use crate::timer::SpreadTimer;
use anyhow::Result;
use flower_core::{ConfigStorage, ConfigStore, ConfigUpdate};
use flower_world::{FlowerField, Viewport};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Everything that can mutate the field or its configuration
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Periodic spread + respawn
    Tick,
    /// A click on one cell
    Remove { row: usize, col: usize },
    /// The drawing surface changed size
    Resize(Viewport),
    SetConfig(ConfigUpdate),
    ResetConfig,
    /// Rebuild the field at the configured default size
    ResetField,
    ShowConfig,
    Quit,
}

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    RestartTimer(Duration),
    Stop,
}

pub struct FieldDriver<S: ConfigStorage> {
    store: ConfigStore<S>,
    field: FlowerField,
    rng: ChaCha8Rng,
    viewport: Viewport,
    render: bool,
    ticks: u64,
    extinct_ticks: u64,
    max_ticks: Option<u64>,
}

impl<S: ConfigStorage> FieldDriver<S> {
    /// Build the driver and lay the field out for the viewport
    pub fn new(
        store: ConfigStore<S>,
        rng: ChaCha8Rng,
        viewport: Viewport,
        render: bool,
        max_ticks: Option<u64>,
    ) -> Self {
        let mut driver = Self {
            store,
            field: FlowerField::new(),
            rng,
            viewport,
            render,
            ticks: 0,
            extinct_ticks: 0,
            max_ticks,
        };
        driver.relayout();
        driver
    }

    pub fn field(&self) -> &FlowerField {
        &self.field
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks that ended with no flower on the field
    pub fn extinct_ticks(&self) -> u64 {
        self.extinct_ticks
    }

    pub fn spread_interval(&self) -> Duration {
        Duration::from_millis(self.store.get().spread_interval_ms)
    }

    pub fn handle(&mut self, event: FieldEvent) -> Outcome {
        match event {
            FieldEvent::Tick => return self.tick(),

            FieldEvent::Remove { row, col } => {
                if let Some(flower) = self.field.remove(row, col) {
                    debug!(row, col, color = %flower.color, age = flower.age, "Flower removed");
                    self.draw();
                }
            }

            FieldEvent::Resize(viewport) => {
                self.viewport = viewport;
                self.relayout();
            }

            FieldEvent::SetConfig(update) => {
                let before = self.layout_params();
                if let Err(e) = self.store.update(update) {
                    error!("Failed to persist configuration: {}", e);
                }
                return self.apply_layout_change(before);
            }

            FieldEvent::ResetConfig => {
                let before = self.layout_params();
                if let Err(e) = self.store.reset() {
                    error!("Failed to persist configuration: {}", e);
                }
                return self.apply_layout_change(before);
            }

            FieldEvent::ResetField => {
                self.field.reset(self.store.get(), &mut self.rng);
                info!(
                    rows = self.field.grid().rows(),
                    cols = self.field.grid().cols(),
                    "Field reset"
                );
                self.draw();
            }

            FieldEvent::ShowConfig => match serde_json::to_string_pretty(self.store.get()) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!("Failed to format configuration: {}", e),
            },

            FieldEvent::Quit => return Outcome::Stop,
        }

        Outcome::Continue
    }

    /// Cell size and spread interval, the parameters the layout and timer depend on
    fn layout_params(&self) -> (u32, u64) {
        let config = self.store.get();
        (config.flower_size, config.spread_interval_ms)
    }

    /// Relayout or restart the timer only for parameters that actually changed
    fn apply_layout_change(&mut self, (flower_size, spread_interval_ms): (u32, u64)) -> Outcome {
        let (new_flower_size, new_spread_interval_ms) = self.layout_params();

        if new_flower_size != flower_size {
            self.relayout();
        }
        if new_spread_interval_ms != spread_interval_ms {
            return Outcome::RestartTimer(self.spread_interval());
        }
        Outcome::Continue
    }

    fn tick(&mut self) -> Outcome {
        let config = self.store.get();
        let born = self.field.spread_flowers(config, &mut self.rng);
        let respawned = self.field.try_spawn_random_flower(config, &mut self.rng);
        self.ticks += 1;

        let stats = self.field.stats();
        debug!(
            tick = self.ticks,
            born,
            occupied = stats.occupied,
            distinct_colors = stats.distinct_colors,
            oldest_age = ?stats.oldest_age,
            "Tick"
        );

        if let Some(pos) = respawned {
            info!(tick = self.ticks, row = pos.row, col = pos.col, "Field reseeded after extinction");
        } else if stats.is_extinct() {
            self.extinct_ticks += 1;
            debug!(tick = self.ticks, extinct_ticks = self.extinct_ticks, "Field is empty");
        }

        if self.ticks % 100 == 0 {
            let (dominant_color, dominant_count) = match &stats.dominant_color {
                Some((color, count)) => (Some(color.as_str()), *count),
                None => (None, 0),
            };
            info!(
                gauge_name = "field_occupancy",
                gauge_value = stats.occupancy(),
                tick = self.ticks,
                occupied = stats.occupied,
                distinct_colors = stats.distinct_colors,
                dominant_color = ?dominant_color,
                dominant_count,
                "Population metrics"
            );
        }

        self.draw();

        match self.max_ticks {
            Some(max) if self.ticks >= max => {
                info!(ticks = self.ticks, "Tick limit reached");
                Outcome::Stop
            }
            _ => Outcome::Continue,
        }
    }

    /// Re-initialize the field to fill the viewport at the current cell size
    fn relayout(&mut self) {
        let config = self.store.get();
        let (cols, rows) = self.viewport.grid_dimensions(config.flower_size);
        self.field.initialize(Some(cols), Some(rows), config, &mut self.rng);

        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            flower_size = config.flower_size,
            rows = self.field.grid().rows(),
            cols = self.field.grid().cols(),
            "Field laid out"
        );
        self.draw();
    }

    fn draw(&self) {
        if !self.render {
            return;
        }

        let mut stdout = std::io::stdout().lock();
        let drawn = render::render_frame(&mut stdout, self.field.grid(), self.store.get())
            .and_then(|_| stdout.flush());
        if let Err(e) = drawn {
            warn!("Failed to draw frame: {}", e);
        }
    }
}

/// Drive the field until `Quit`, the tick limit, shutdown, or channel close.
///
/// `timer_events` must feed the same channel as `events`; the spread timer
/// sends its ticks through it so every mutation runs on this task.
#[instrument(skip_all)]
pub async fn run<S: ConfigStorage>(
    mut driver: FieldDriver<S>,
    mut events: mpsc::Receiver<FieldEvent>,
    timer_events: mpsc::Sender<FieldEvent>,
    shutdown: CancellationToken,
) -> Result<FieldDriver<S>> {
    let mut timer = SpreadTimer::start(driver.spread_interval(), timer_events.clone());
    info!(period_ms = timer.period().as_millis() as u64, "Event loop started");

    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        match driver.handle(event) {
            Outcome::Continue => {}
            Outcome::RestartTimer(period) => {
                timer.stop();
                timer = SpreadTimer::start(period, timer_events.clone());
            }
            Outcome::Stop => break,
        }
    }

    timer.stop();
    info!(ticks = driver.ticks(), "Event loop stopped");
    Ok(driver)
}
