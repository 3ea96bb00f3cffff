//! Timeline scrubber.
//!
//! A horizontal track mapping pointer position to a time in `[min, max]`.
//! Dragging renders every move but throttles outbound change notifications;
//! releasing (or a keyboard step) near the right edge jumps to live
//! instead of pinning a time. The track can also show an event-density
//! gradient behind the thumb.

use crate::commands::Command;
use crate::config::TimelineConfig;
use crate::input::Modifiers;
use fc_core::PayloadError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The visible time window, as pushed by the authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWindow {
    pub min: f64,
    pub max: f64,
    pub value: f64,
    /// Width of the viewed window as a fraction of the range.
    pub window_ratio: f64,
    #[serde(rename = "live", default)]
    pub is_live: bool,
}

impl TimelineWindow {
    /// Parse an `update-slider` payload.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Value under `client_x` on a track spanning `[left, left + width]`.
    pub fn value_at(&self, client_x: f64, track_left: f64, track_width: f64) -> f64 {
        let frac = if track_width > 0.0 {
            ((client_x - track_left) / track_width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.min + frac * self.range()
    }

    /// Whether `value` is within `snap_ratio` of the live edge. An empty
    /// range has nowhere to scrub to, so it always counts as live.
    pub fn is_near_live(&self, value: f64, snap_ratio: f64) -> bool {
        let range = self.range();
        range <= 0.0 || (value - self.max) / range > -snap_ratio
    }

    /// Thumb and window placement in percent of the track width. `None`
    /// for a degenerate range.
    pub fn layout(&self) -> Option<ScrubberLayout> {
        let range = self.range();
        if range <= 0.0 {
            return None;
        }
        let thumb = (self.value - self.min) / range * 100.0;
        let half = (self.window_ratio * 100.0).min(100.0) / 2.0;
        let left = (thumb - half).max(0.0);
        let right = (thumb + half).min(100.0);
        Some(ScrubberLayout {
            thumb_pct: thumb,
            window_left_pct: left,
            window_width_pct: right - left,
            live: self.is_live,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrubberLayout {
    pub thumb_pct: f64,
    pub window_left_pct: f64,
    pub window_width_pct: f64,
    pub live: bool,
}

// ─── Density ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityStop {
    pub start_pct: f64,
    pub end_pct: f64,
    pub alpha: f64,
}

/// Hard-edged horizontal gradient, one segment per bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGradient {
    pub color: [u8; 3],
    pub stops: Vec<DensityStop>,
}

impl DensityGradient {
    /// Opacity per bucket is `bucket / max(buckets)` scaled to `max_alpha`.
    /// `None` for an empty sequence, which clears the visualization.
    pub fn from_buckets(buckets: &[f64], color: [u8; 3], max_alpha: f64) -> Option<Self> {
        if buckets.is_empty() {
            return None;
        }
        let peak = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let n = buckets.len() as f64;
        let stops = buckets
            .iter()
            .enumerate()
            .map(|(i, &v)| DensityStop {
                start_pct: i as f64 / n * 100.0,
                end_pct: (i + 1) as f64 / n * 100.0,
                alpha: if peak > 0.0 {
                    (v / peak).max(0.0) * max_alpha
                } else {
                    0.0
                },
            })
            .collect();
        Some(Self { color, stops })
    }
}

/// CSS `linear-gradient(to right, …)` value.
impl fmt::Display for DensityGradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.color;
        f.write_str("linear-gradient(to right")?;
        for stop in &self.stops {
            write!(
                f,
                ", rgba({r}, {g}, {b}, {a}) {s}%, rgba({r}, {g}, {b}, {a}) {e}%",
                a = stop.alpha,
                s = stop.start_pct,
                e = stop.end_pct
            )?;
        }
        f.write_str(")")
    }
}

// ─── Scrubber ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrubState {
    #[default]
    Idle,
    Dragging,
}

pub struct Scrubber {
    config: TimelineConfig,
    window: TimelineWindow,
    state: ScrubState,
    last_push_ms: Option<f64>,
    density: Option<DensityGradient>,
}

impl Scrubber {
    pub fn new(config: TimelineConfig, window: TimelineWindow) -> Self {
        Self {
            config,
            window,
            state: ScrubState::Idle,
            last_push_ms: None,
            density: None,
        }
    }

    pub fn window(&self) -> &TimelineWindow {
        &self.window
    }

    pub fn state(&self) -> ScrubState {
        self.state
    }

    pub fn layout(&self) -> Option<ScrubberLayout> {
        self.window.layout()
    }

    pub fn density(&self) -> Option<&DensityGradient> {
        self.density.as_ref()
    }

    /// CSS background for the density strip; `none` when cleared.
    pub fn density_background(&self) -> String {
        self.density
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string)
    }

    /// `update-slider` from the authority.
    pub fn update_slider(&mut self, window: TimelineWindow) {
        self.window = window;
    }

    /// `update-density` from the authority.
    pub fn update_density(&mut self, buckets: &[f64]) {
        self.density = DensityGradient::from_buckets(
            buckets,
            self.config.density_color,
            self.config.density_max_alpha,
        );
    }

    pub fn pointer_down(
        &mut self,
        client_x: f64,
        track_left: f64,
        track_width: f64,
        now_ms: f64,
    ) -> Option<Command> {
        self.state = ScrubState::Dragging;
        log::debug!("scrub start");
        self.scrub_to(client_x, track_left, track_width, now_ms)
    }

    pub fn pointer_move(
        &mut self,
        client_x: f64,
        track_left: f64,
        track_width: f64,
        now_ms: f64,
    ) -> Option<Command> {
        if self.state != ScrubState::Dragging {
            return None;
        }
        self.scrub_to(client_x, track_left, track_width, now_ms)
    }

    /// Finish a drag. Always reports the final position, unthrottled.
    pub fn pointer_up(&mut self, client_x: f64, track_left: f64, track_width: f64) -> Option<Command> {
        if self.state != ScrubState::Dragging {
            return None;
        }
        self.state = ScrubState::Idle;
        self.last_push_ms = None;
        let value = self.window.value_at(client_x, track_left, track_width);
        self.window.value = value;
        Some(self.settle(value))
    }

    /// Keyboard stepping while the track has focus.
    pub fn key_down(&mut self, key: &str, mods: &Modifiers) -> Option<Command> {
        let range = self.window.range();
        let step = |ratio: f64| ratio * range;
        let delta = match key {
            "ArrowLeft" | "ArrowRight" => {
                let ratio = if mods.shift {
                    self.config.arrow_step_coarse
                } else {
                    self.config.arrow_step
                };
                if key == "ArrowLeft" { -step(ratio) } else { step(ratio) }
            }
            "PageUp" => -step(self.window.window_ratio),
            "PageDown" => step(self.window.window_ratio),
            "Home" => {
                self.window.value = self.window.min;
                return Some(Command::TimelineChange {
                    time: self.window.value,
                });
            }
            "End" | " " => return Some(Command::TimelineGoLive {}),
            _ => return None,
        };
        let upper = self.window.max.max(self.window.min);
        let value = (self.window.value + delta).clamp(self.window.min, upper);
        self.window.value = value;
        Some(self.settle(value))
    }

    fn scrub_to(
        &mut self,
        client_x: f64,
        track_left: f64,
        track_width: f64,
        now_ms: f64,
    ) -> Option<Command> {
        let value = self.window.value_at(client_x, track_left, track_width);
        self.window.value = value;
        let due = self
            .last_push_ms
            .is_none_or(|last| now_ms - last >= self.config.throttle_ms);
        if !due {
            log::trace!("scrub {value} (throttled)");
            return None;
        }
        self.last_push_ms = Some(now_ms);
        Some(Command::TimelineChange { time: value })
    }

    fn settle(&self, value: f64) -> Command {
        if self.window.is_near_live(value, self.config.live_snap_ratio) {
            Command::TimelineGoLive {}
        } else {
            Command::TimelineChange { time: value }
        }
    }
}
