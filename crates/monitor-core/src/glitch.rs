//! Randomly timed CRT glitches.
//!
//! Each [`GlitchKind`] runs its own loop on a shared [`TimerRegistry`]: wait a
//! uniform random delay, fire if the current power clears the kind's gate,
//! clear after a random duration, repeat. Kinds never coordinate, so several
//! glitches can be on screen at once.

use crate::constants::*;
use crate::timer::{TimerId, TimerRegistry};
use rand::prelude::*;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlitchKind {
    HorizontalLine,
    VerticalTear,
    Degauss,
    StaticBurst,
    VerticalRoll,
}

impl GlitchKind {
    pub const ALL: [GlitchKind; 5] = [
        GlitchKind::HorizontalLine,
        GlitchKind::VerticalTear,
        GlitchKind::Degauss,
        GlitchKind::StaticBurst,
        GlitchKind::VerticalRoll,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlitchEvent {
    HorizontalLine {
        /// 0 = top, 1 = bottom
        y_position: f32,
        duration_ms: f64,
    },
    VerticalTear {
        x_position: f32,
        width_px: f32,
        duration_ms: f64,
    },
    DegaussPulse {
        duration_ms: f64,
    },
    StaticBurst {
        hue_degrees: f32,
        duration_ms: f64,
    },
    VerticalRoll {
        /// Peak upward shift in pixels (positive)
        amplitude_px: f32,
        rise_ms: f64,
        fall_ms: f64,
    },
}

impl GlitchEvent {
    pub fn kind(&self) -> GlitchKind {
        match self {
            GlitchEvent::HorizontalLine { .. } => GlitchKind::HorizontalLine,
            GlitchEvent::VerticalTear { .. } => GlitchKind::VerticalTear,
            GlitchEvent::DegaussPulse { .. } => GlitchKind::Degauss,
            GlitchEvent::StaticBurst { .. } => GlitchKind::StaticBurst,
            GlitchEvent::VerticalRoll { .. } => GlitchKind::VerticalRoll,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        match *self {
            GlitchEvent::HorizontalLine { duration_ms, .. }
            | GlitchEvent::VerticalTear { duration_ms, .. }
            | GlitchEvent::DegaussPulse { duration_ms }
            | GlitchEvent::StaticBurst { duration_ms, .. } => duration_ms,
            GlitchEvent::VerticalRoll {
                rise_ms, fall_ms, ..
            } => rise_ms + fall_ms,
        }
    }
}

/// A glitch currently on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveGlitch {
    pub event: GlitchEvent,
    pub started_ms: f64,
}

impl ActiveGlitch {
    #[inline]
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.started_ms).max(0.0)
    }

    /// Fraction of the event's duration that has passed, in `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f32 {
        let d = self.event.duration_ms();
        if d <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms(now_ms) / d).clamp(0.0, 1.0) as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlitchSchedule {
    pub min_delay_ms: f64,
    pub max_delay_ms: f64,
    /// Fires only when power is strictly above this.
    pub min_power_gate: f32,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
}

impl GlitchSchedule {
    const fn new(delay: (f64, f64), gate: f32, duration: (f64, f64)) -> Self {
        Self {
            min_delay_ms: delay.0,
            max_delay_ms: delay.1,
            min_power_gate: gate,
            min_duration_ms: duration.0,
            max_duration_ms: duration.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlitchConfig {
    pub line: GlitchSchedule,
    pub tear: GlitchSchedule,
    pub degauss: GlitchSchedule,
    pub static_burst: GlitchSchedule,
    /// Durations here are the roll's rise phase.
    pub roll: GlitchSchedule,
    pub roll_fall_ms: (f64, f64),
    pub roll_amplitude_px: (f32, f32),
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            line: GlitchSchedule::new(LINE_DELAY_MS, LOW_POWER_GATE, LINE_DURATION_MS),
            tear: GlitchSchedule::new(TEAR_DELAY_MS, LOW_POWER_GATE, TEAR_DURATION_MS),
            degauss: GlitchSchedule::new(
                DEGAUSS_DELAY_MS,
                HIGH_POWER_GATE,
                (DEGAUSS_DURATION_MS, DEGAUSS_DURATION_MS),
            ),
            static_burst: GlitchSchedule::new(STATIC_DELAY_MS, HIGH_POWER_GATE, STATIC_DURATION_MS),
            roll: GlitchSchedule::new(ROLL_DELAY_MS, HIGH_POWER_GATE, ROLL_UP_MS),
            roll_fall_ms: ROLL_DOWN_MS,
            roll_amplitude_px: ROLL_AMPLITUDE_PX,
            seed: None,
        }
    }
}

impl GlitchConfig {
    pub fn schedule(&self, kind: GlitchKind) -> &GlitchSchedule {
        match kind {
            GlitchKind::HorizontalLine => &self.line,
            GlitchKind::VerticalTear => &self.tear,
            GlitchKind::Degauss => &self.degauss,
            GlitchKind::StaticBurst => &self.static_burst,
            GlitchKind::VerticalRoll => &self.roll,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    Fire(GlitchKind),
    Clear(GlitchKind),
}

/// What a poll or trigger changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlitchChange {
    Started(GlitchEvent),
    Ended(GlitchKind),
    /// Timer elapsed with power below the gate; rescheduled without firing.
    GateMissed(GlitchKind),
}

pub type GlitchChanges = SmallVec<[GlitchChange; 4]>;

pub struct GlitchScheduler {
    config: GlitchConfig,
    rng: StdRng,
    timers: TimerRegistry<Task>,
    active: [Option<ActiveGlitch>; 5],
    clear_timers: [Option<TimerId>; 5],
    started: bool,
}

impl GlitchScheduler {
    pub fn new(config: GlitchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            timers: TimerRegistry::new(),
            active: [None; 5],
            clear_timers: [None; 5],
            started: false,
        }
    }

    pub fn config(&self) -> &GlitchConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Arm every kind's first timer. Later calls are no-ops.
    pub fn start(&mut self, now_ms: f64) {
        if self.started || self.timers.is_disposed() {
            return;
        }
        self.started = true;
        for kind in GlitchKind::ALL {
            self.schedule_fire(kind, now_ms);
        }
        log::debug!("[glitch] armed {} schedulers at {:.0}ms", GlitchKind::ALL.len(), now_ms);
    }

    /// Handle every timer due by `now_ms`, gating fires on `power`.
    pub fn poll(&mut self, now_ms: f64, power: f32) -> GlitchChanges {
        let mut out = GlitchChanges::new();
        while let Some((_, due_ms, task)) = self.timers.pop_due(now_ms) {
            match task {
                Task::Fire(kind) => self.on_fire(kind, due_ms, now_ms, power, &mut out),
                Task::Clear(kind) => self.on_clear(kind, due_ms, now_ms, &mut out),
            }
        }
        out
    }

    fn on_fire(&mut self, kind: GlitchKind, due_ms: f64, now_ms: f64, power: f32, out: &mut GlitchChanges) {
        let gate = self.config.schedule(kind).min_power_gate;
        let rolling = kind == GlitchKind::VerticalRoll && self.active[kind.index()].is_some();
        if power <= gate || rolling {
            out.push(GlitchChange::GateMissed(kind));
            self.schedule_fire(kind, self.catch_up_base(kind, due_ms, now_ms));
            return;
        }
        let event = self.random_event(kind);
        out.extend(self.activate(event, due_ms));
        // a roll re-arms only once it has finished
        if kind != GlitchKind::VerticalRoll {
            self.schedule_fire(kind, self.catch_up_base(kind, due_ms, now_ms));
        }
    }

    fn on_clear(&mut self, kind: GlitchKind, due_ms: f64, now_ms: f64, out: &mut GlitchChanges) {
        let i = kind.index();
        self.clear_timers[i] = None;
        let was_scheduled_roll = matches!(
            self.active[i].map(|a| a.event),
            Some(GlitchEvent::VerticalRoll { .. })
        );
        if self.active[i].take().is_some() {
            out.push(GlitchChange::Ended(kind));
        }
        if was_scheduled_roll {
            self.schedule_fire(kind, self.catch_up_base(kind, due_ms, now_ms));
        }
    }

    // After a long stall (hidden tab) restart the loop from now instead of replaying it.
    fn catch_up_base(&self, kind: GlitchKind, due_ms: f64, now_ms: f64) -> f64 {
        if now_ms - due_ms > self.config.schedule(kind).max_delay_ms {
            now_ms
        } else {
            due_ms
        }
    }

    fn schedule_fire(&mut self, kind: GlitchKind, from_ms: f64) {
        let s = *self.config.schedule(kind);
        let delay = uniform(&mut self.rng, s.min_delay_ms, s.max_delay_ms);
        self.timers.schedule_at(from_ms + delay, Task::Fire(kind));
    }

    /// Put `event` on screen from `at_ms`, replacing any running event of the same kind.
    fn activate(&mut self, event: GlitchEvent, at_ms: f64) -> Option<GlitchChange> {
        if self.timers.is_disposed() {
            return None;
        }
        let kind = event.kind();
        let i = kind.index();
        if let Some(id) = self.clear_timers[i].take() {
            self.timers.cancel(id);
        }
        self.active[i] = Some(ActiveGlitch {
            event,
            started_ms: at_ms,
        });
        self.clear_timers[i] = Some(
            self.timers
                .schedule_at(at_ms + event.duration_ms(), Task::Clear(kind)),
        );
        Some(GlitchChange::Started(event))
    }

    fn random_event(&mut self, kind: GlitchKind) -> GlitchEvent {
        let s = *self.config.schedule(kind);
        let duration_ms = uniform(&mut self.rng, s.min_duration_ms, s.max_duration_ms);
        match kind {
            GlitchKind::HorizontalLine => GlitchEvent::HorizontalLine {
                y_position: self.rng.gen::<f32>(),
                duration_ms,
            },
            GlitchKind::VerticalTear => GlitchEvent::VerticalTear {
                x_position: self.rng.gen::<f32>(),
                width_px: if self.rng.gen_bool(0.5) { 2.0 } else { 1.0 },
                duration_ms,
            },
            GlitchKind::Degauss => GlitchEvent::DegaussPulse { duration_ms },
            GlitchKind::StaticBurst => GlitchEvent::StaticBurst {
                hue_degrees: self.random_hue(),
                duration_ms,
            },
            GlitchKind::VerticalRoll => {
                let (fall_lo, fall_hi) = self.config.roll_fall_ms;
                let (amp_lo, amp_hi) = self.config.roll_amplitude_px;
                GlitchEvent::VerticalRoll {
                    amplitude_px: uniform_f32(&mut self.rng, amp_lo, amp_hi),
                    rise_ms: duration_ms,
                    fall_ms: uniform(&mut self.rng, fall_lo, fall_hi),
                }
            }
        }
    }

    fn random_hue(&mut self) -> f32 {
        *STATIC_HUES.choose(&mut self.rng).unwrap_or(&0.0)
    }

    /// Restart the degauss pulse now, regardless of power.
    pub fn degauss(&mut self, now_ms: f64) -> Option<GlitchChange> {
        self.activate(
            GlitchEvent::DegaussPulse {
                duration_ms: DEGAUSS_DURATION_MS,
            },
            now_ms,
        )
    }

    /// Colored static on demand; duration defaults to 280ms and is clamped to 120..=1000ms.
    pub fn static_burst(&mut self, now_ms: f64, duration_ms: Option<f64>) -> Option<GlitchChange> {
        let duration_ms = duration_ms
            .filter(|d| d.is_finite())
            .unwrap_or(STATIC_BURST_DEFAULT_MS)
            .clamp(STATIC_BURST_MIN_MS, STATIC_BURST_MAX_MS);
        let hue_degrees = self.random_hue();
        self.activate(
            GlitchEvent::StaticBurst {
                hue_degrees,
                duration_ms,
            },
            now_ms,
        )
    }

    pub fn active(&self, kind: GlitchKind) -> Option<&ActiveGlitch> {
        self.active[kind.index()].as_ref()
    }

    pub fn is_active(&self, kind: GlitchKind) -> bool {
        self.active[kind.index()].is_some()
    }

    pub fn active_glitches(&self) -> SmallVec<[ActiveGlitch; 5]> {
        self.active.iter().flatten().copied().collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Drop every pending timer and visible glitch; nothing fires afterwards.
    pub fn dispose(&mut self) {
        self.timers.dispose();
        self.active = [None; 5];
        self.clear_timers = [None; 5];
        log::debug!("[glitch] disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.timers.is_disposed()
    }
}

#[inline]
fn uniform(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

#[inline]
fn uniform_f32(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
