//! Continuous power model for the CRT: brightness, iris shutter and the white
//! streak that flashes while the picture collapses.

use crate::constants::{
    COVER_LAMBDA, POWER_LAMBDA, POWER_ON_DELAY_MS, SHUTTER_LAMBDA, STREAK_HOLD_MS, STREAK_LAMBDA,
};
use crate::damp::damp;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerConfig {
    pub activation_delay_ms: f64,
    pub shutter_lambda: f32,
    pub power_lambda: f32,
    pub streak_lambda: f32,
    pub cover_lambda: f32,
    pub streak_hold_ms: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: POWER_ON_DELAY_MS,
            shutter_lambda: SHUTTER_LAMBDA,
            power_lambda: POWER_LAMBDA,
            streak_lambda: STREAK_LAMBDA,
            cover_lambda: COVER_LAMBDA,
            streak_hold_ms: STREAK_HOLD_MS,
        }
    }
}

/// Edge of `effective_active` observed during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerEdge {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerState {
    pub power: f32,
    pub shutter: f32,
    pub streak: f32,
    /// Opacity of the black plane behind the panel, relaxes toward `1 - power`.
    pub cover_opacity: f32,
    pub effective_active: bool,
}

impl Default for PowerState {
    fn default() -> Self {
        Self {
            power: 0.0,
            shutter: 0.0,
            streak: 0.0,
            cover_opacity: 1.0,
            effective_active: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PowerStateMachine {
    config: PowerConfig,
    state: PowerState,
    activated_at: Option<f64>,
    hold_started_at: Option<f64>,
}

impl PowerStateMachine {
    pub fn new(config: PowerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PowerConfig {
        &self.config
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn activated_at(&self) -> Option<f64> {
        self.activated_at
    }

    /// Advance one frame. `active` is the requested state; the picture only
    /// turns on once it has been requested continuously for the activation delay.
    pub fn update(&mut self, active: bool, now_ms: f64, dt_sec: f32) -> Option<PowerEdge> {
        let effective = self.gate(active, now_ms);
        let was = self.state.effective_active;
        let edge = match (was, effective) {
            (false, true) => Some(PowerEdge::On),
            (true, false) => {
                self.hold_started_at = Some(now_ms);
                Some(PowerEdge::Off)
            }
            _ => None,
        };
        self.state.effective_active = effective;

        let cfg = self.config;
        let target = if effective { 1.0 } else { 0.0 };
        let s = &mut self.state;
        s.shutter = damp(s.shutter, target, cfg.shutter_lambda, dt_sec);
        s.power = damp(s.power, target, cfg.power_lambda, dt_sec);
        s.cover_opacity = damp(s.cover_opacity, 1.0 - s.power, cfg.cover_lambda, dt_sec);

        let streak_target = if effective {
            0.0
        } else {
            streak_signal(self.state.shutter, self.hold_decay(now_ms))
        };
        self.state.streak = damp(self.state.streak, streak_target, cfg.streak_lambda, dt_sec);

        if edge.is_some() {
            log::debug!(
                "[power] {:?} at {:.0}ms power={:.3} shutter={:.3}",
                edge,
                now_ms,
                self.state.power,
                self.state.shutter
            );
        }
        edge
    }

    fn gate(&mut self, active: bool, now_ms: f64) -> bool {
        if !active {
            // no debounce on the way down
            self.activated_at = None;
            return false;
        }
        let since = *self.activated_at.get_or_insert(now_ms);
        now_ms - since >= self.config.activation_delay_ms
    }

    /// Linear 1 → 0 over the hold window after the last falling edge.
    pub fn hold_decay(&self, now_ms: f64) -> f32 {
        match self.hold_started_at {
            Some(t0) if self.config.streak_hold_ms > 0.0 => {
                (1.0 - (now_ms - t0) / self.config.streak_hold_ms).clamp(0.0, 1.0) as f32
            }
            _ => 0.0,
        }
    }
}

/// Parabola that is 0 at a fully open or closed shutter and peaks at the midpoint.
#[inline]
pub fn streak_shape(shutter: f32) -> f32 {
    (4.0 * (1.0 - shutter) * shutter).clamp(0.0, 1.0)
}

#[inline]
pub fn streak_signal(shutter: f32, hold_decay: f32) -> f32 {
    streak_shape(shutter).max(hold_decay).clamp(0.0, 1.0)
}
