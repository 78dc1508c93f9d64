// src/app/state.rs
//! Application state management.

use anyhow::{Context, Result, ensure};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use tracing::{debug, info};

use crate::{
    audio::{CaptureBuffer, PlaybackSource, Player},
    config::WaterfallConfig,
    ui::{
        keybindings::{Action, key_to_action},
        layout::compute_layout,
        widgets::{Status, render_status, render_waterfall},
    },
    waterfall::{TickOutcome, WaterfallPipeline},
};

/// Startup options resolved from the command line.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// What the player feeds into the capture tap
    pub source: PlaybackSource,
    /// Samples held by the capture buffer
    pub capture_capacity: usize,
    pub config: WaterfallConfig,
}

/// Main application state.
pub struct App {
    /// Analysis and publish pipeline
    pub pipeline: WaterfallPipeline,
    /// Circular store the pipeline reads frames from
    pub capture: CaptureBuffer,
    /// Playback engine feeding the capture ring
    pub player: Player,
    /// Title of the waterfall panel
    title: String,
}

impl App {
    /// Build the pipeline and start playback.
    pub fn new(options: AppOptions) -> Result<Self> {
        let span = options.config.frame_span();
        ensure!(
            options.capture_capacity >= span,
            "capture capacity {} is smaller than one frame span of {} samples",
            options.capture_capacity,
            span
        );

        let pipeline =
            WaterfallPipeline::new(options.config).context("setting up the waterfall pipeline")?;
        let capture = CaptureBuffer::new(options.capture_capacity);

        let mut player = Player::new(options.capture_capacity);
        let title = match &options.source {
            PlaybackSource::File(path) => format!("Waterfall: {}", path.display()),
            PlaybackSource::Tone(hz) => format!("Waterfall: {hz:.0} Hz tone"),
        };
        player.play(options.source)?;
        info!(capacity = options.capture_capacity, "waterfall started");

        Ok(Self {
            pipeline,
            capture,
            player,
            title,
        })
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(&key) {
            Action::ToggleEnabled => {
                self.pipeline.toggle_enabled();
                false
            }
            Action::Quit => {
                self.player.stop();
                true
            }
            Action::None => false,
        }
    }

    /// Pull newly captured samples and advance the pipeline by one refresh.
    pub fn tick(&mut self) -> TickOutcome {
        let moved = self.capture.drain_from(self.player.consumer_mut());
        let outcome = self.pipeline.tick(&self.capture.view());
        if let TickOutcome::Written { frame_count, .. } = outcome {
            if frame_count % 600 == 0 {
                // Roughly every ten seconds at 60 fps
                let extrema = self.pipeline.extrema();
                debug!(
                    frame_count,
                    moved,
                    min = extrema.min,
                    max = extrema.max,
                    "waterfall progress"
                );
            }
        }
        outcome
    }

    /// Snapshot for the status bar.
    pub fn status(&self) -> Status {
        let peak_hz = match (self.pipeline.analyzer().peak_bin(), self.player.sample_rate()) {
            (Some(bin), Some(rate)) if self.player.is_playing() => Some(self.pipeline.analyzer().bin_frequency(
                bin,
                rate as f32,
                self.pipeline.config().decimation_stride,
            )),
            _ => None,
        };
        Status {
            frame_count: self.pipeline.frame_count(),
            enabled: self.pipeline.is_enabled(),
            extrema: self.pipeline.extrema(),
            peak_hz,
        }
    }

    /// Draw the application UI.
    pub fn draw(&self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area());
        render_waterfall(f, layout.waterfall_area, self.pipeline.surface(), &self.title);
        render_status(f, layout.status_area, &self.status());
    }
}
