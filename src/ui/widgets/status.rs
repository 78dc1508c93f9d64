// src/ui/widgets/status.rs
//! One-line status bar under the waterfall.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::audio::analysis::RunningExtrema;

/// Snapshot of what the status bar shows.
#[derive(Debug, Clone, Copy)]
pub struct Status {
    pub frame_count: u64,
    pub enabled: bool,
    pub extrema: RunningExtrema,
    /// Dominant frequency of the latest spectrum in Hz
    pub peak_hz: Option<f32>,
}

/// Text of the status fields, without key hints.
pub fn status_text(status: &Status) -> String {
    let state = if status.enabled { "running" } else { "paused" };
    let range = if status.extrema.is_initialized() {
        format!(
            "range {:.3e}..{:.3e}",
            status.extrema.min, status.extrema.max
        )
    } else {
        "range -".to_string()
    };
    let peak = match status.peak_hz {
        Some(hz) => format!("peak {hz:.0} Hz"),
        None => "peak -".to_string(),
    };
    format!("{state} | frame {} | {range} | {peak}", status.frame_count)
}

/// Render the status bar.
pub fn render_status(f: &mut Frame<'_>, area: Rect, status: &Status) {
    let color = if status.enabled { Color::Green } else { Color::Yellow };
    let line = Line::from(vec![
        Span::styled(status_text(status), Style::default().fg(color)),
        Span::styled(
            "  space: pause/resume  q: quit",
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_before_first_frame() {
        let status = Status {
            frame_count: 0,
            enabled: true,
            extrema: RunningExtrema::default(),
            peak_hz: None,
        };
        assert_eq!(status_text(&status), "running | frame 0 | range - | peak -");
    }

    #[test]
    fn test_status_while_paused() {
        let status = Status {
            frame_count: 42,
            enabled: false,
            extrema: RunningExtrema { min: 0.0, max: 1500.0 },
            peak_hz: Some(440.4),
        };
        let text = status_text(&status);
        assert!(text.starts_with("paused | frame 42 | range "), "{text}");
        assert!(text.ends_with("| peak 440 Hz"), "{text}");
    }
}
