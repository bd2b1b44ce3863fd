//! Per-frame CRT layer parameters.
//!
//! [`render`] is a pure function of the power scalars, the glitches currently
//! on screen, the tuning multipliers and the frame time. Its output is plain
//! data: front-ends turn it into DOM styles or upload [`CrtUniforms`].

use crate::constants::*;
use crate::damp::ease_out_quad;
use crate::glitch::{ActiveGlitch, GlitchEvent};
use glam::Vec2;
use smallvec::SmallVec;

/// Effect strength multipliers settable from the terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub stutter_strength: f32,
    pub green_strength: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            stutter_strength: 1.0,
            green_strength: 1.0,
        }
    }
}

impl Tuning {
    pub fn set_stutter_strength(&mut self, v: f32) {
        self.stutter_strength = clamp_strength(v);
    }

    pub fn set_green_strength(&mut self, v: f32) {
        self.green_strength = clamp_strength(v);
    }
}

#[inline]
fn clamp_strength(v: f32) -> f32 {
    if v.is_nan() {
        return STRENGTH_MIN;
    }
    v.clamp(STRENGTH_MIN, STRENGTH_MAX)
}

#[derive(Clone, Copy, Debug)]
pub struct CompositorInput<'a> {
    pub power: f32,
    pub shutter: f32,
    pub streak: f32,
    pub cover_opacity: f32,
    pub glitches: &'a [ActiveGlitch],
    pub tuning: Tuning,
    pub now_ms: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Iris clip applied to everything except the streak band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShutterClip {
    pub top_bottom_pct: f32,
    pub side_pct: f32,
    pub radius_px: f32,
}

impl ShutterClip {
    pub fn to_css(&self) -> String {
        format!(
            "inset({tb:.3}% {s:.3}% {tb:.3}% {s:.3}% round {r}px)",
            tb = self.top_bottom_pct,
            s = self.side_pct,
            r = self.radius_px
        )
    }
}

/// Vertical iris closing symmetrically toward the center. While the set is
/// off or closing (never while opening) the iris also narrows slightly.
pub fn shutter_clip(power: f32, shutter: f32) -> ShutterClip {
    let shutter = shutter.clamp(0.0, 1.0);
    let closing_or_off = shutter < 0.999 && power < 0.999 && shutter <= power + 0.001;
    ShutterClip {
        top_bottom_pct: (1.0 - shutter) * 50.0,
        side_pct: if closing_or_off {
            (1.0 - shutter) * OFF_NARROW_MAX_PCT
        } else {
            0.0
        },
        radius_px: PANEL_RADIUS_PX,
    }
}

/// Static effect layers, back to front, above the interface content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    SubpixelMask,
    Scanlines,
    DotPitch,
    Vignette,
    Grain,
    FlickerBright,
    FlickerDark,
    Stutter,
    ChromaFringe,
}

impl LayerKind {
    pub const STACK: [LayerKind; 9] = [
        LayerKind::SubpixelMask,
        LayerKind::Scanlines,
        LayerKind::DotPitch,
        LayerKind::Vignette,
        LayerKind::Grain,
        LayerKind::FlickerBright,
        LayerKind::FlickerDark,
        LayerKind::Stutter,
        LayerKind::ChromaFringe,
    ];

    /// Element id of the layer in the overlay markup.
    pub fn dom_id(self) -> &'static str {
        match self {
            LayerKind::SubpixelMask => "crt-subpixel",
            LayerKind::Scanlines => "crt-scanlines",
            LayerKind::DotPitch => "crt-dotpitch",
            LayerKind::Vignette => "crt-vignette",
            LayerKind::Grain => "crt-grain",
            LayerKind::FlickerBright => "crt-flicker-bright",
            LayerKind::FlickerDark => "crt-flicker-dark",
            LayerKind::Stutter => "crt-stutter",
            LayerKind::ChromaFringe => "crt-chroma",
        }
    }

    fn opacity(self, power: f32, tuning: &Tuning) -> f32 {
        let o = match self {
            LayerKind::SubpixelMask => power * 0.4,
            LayerKind::DotPitch => power * 0.9,
            LayerKind::Stutter => power * tuning.stutter_strength,
            _ => power,
        };
        o.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectLayer {
    pub kind: LayerKind,
    pub opacity: f32,
}

/// Transient overlays drawn above the static layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlitchOverlay {
    Line {
        y_pct: f32,
        core_opacity: f32,
        glow_opacity: f32,
    },
    Tear {
        x_pct: f32,
        width_px: f32,
        core_opacity: f32,
        glow_opacity: f32,
    },
    Static {
        hue_degrees: f32,
        noise_opacity: f32,
        stripe_opacity: f32,
    },
    /// One of the two tinted flashes shivering out of register.
    DegaussFlash {
        color: FlashColor,
        offset_px: Vec2,
        opacity: f32,
    },
}

impl GlitchOverlay {
    pub const DOM_IDS: [&'static str; 5] = [
        "crt-glitch-line",
        "crt-glitch-tear",
        "crt-static",
        "crt-degauss-flash-red",
        "crt-degauss-flash-cyan",
    ];

    /// Element id of the overlay in the markup.
    pub fn dom_id(&self) -> &'static str {
        match self {
            GlitchOverlay::Line { .. } => Self::DOM_IDS[0],
            GlitchOverlay::Tear { .. } => Self::DOM_IDS[1],
            GlitchOverlay::Static { .. } => Self::DOM_IDS[2],
            GlitchOverlay::DegaussFlash {
                color: FlashColor::Red,
                ..
            } => Self::DOM_IDS[3],
            GlitchOverlay::DegaussFlash {
                color: FlashColor::Cyan,
                ..
            } => Self::DOM_IDS[4],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlashColor {
    Red,
    Cyan,
}

impl FlashColor {
    pub const BOTH: [FlashColor; 2] = [FlashColor::Red, FlashColor::Cyan];

    /// Screen-blended tint behind the flash.
    pub fn background_css(self) -> &'static str {
        match self {
            FlashColor::Red => "rgba(255,0,0,0.08)",
            FlashColor::Cyan => "rgba(0,255,255,0.06)",
        }
    }
}

/// Whole-panel wobble during a degauss pulse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegaussTransform {
    pub scale: f32,
    pub rotate_deg: f32,
    pub saturate: f32,
    pub contrast: f32,
}

impl Default for DegaussTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotate_deg: 0.0,
            saturate: 1.0,
            contrast: 1.0,
        }
    }
}

impl DegaussTransform {
    pub fn transform_css(&self) -> String {
        format!("scale({:.4}) rotate({:.3}deg)", self.scale, self.rotate_deg)
    }

    pub fn filter_css(&self) -> String {
        format!("saturate({:.3}) contrast({:.3})", self.saturate, self.contrast)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RollFrame {
    /// Vertical content offset in pixels, negative is up.
    pub offset_px: f32,
    /// Paint gradients over the top and bottom seams.
    pub edge_masks: bool,
    pub edge_mask_px: f32,
}

/// White band flashing across the middle while the picture collapses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreakBand {
    pub opacity: f32,
    pub top_px: f32,
    pub height_px: f32,
}

impl StreakBand {
    pub const DOM_ID: &'static str = "crt-streak";
}

/// Seam masks painted while the picture rolls.
pub const ROLL_MASK_DOM_IDS: [&str; 2] = ["crt-roll-mask-top", "crt-roll-mask-bottom"];

/// Every transient element that sits inside the shutter clip. The streak band
/// is the only overlay drawn outside it.
pub const CLIPPED_OVERLAY_IDS: [&str; 7] = [
    GlitchOverlay::DOM_IDS[0],
    GlitchOverlay::DOM_IDS[1],
    GlitchOverlay::DOM_IDS[2],
    GlitchOverlay::DOM_IDS[3],
    GlitchOverlay::DOM_IDS[4],
    ROLL_MASK_DOM_IDS[0],
    ROLL_MASK_DOM_IDS[1],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curvature {
    pub perspective_px: f32,
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
}

impl Default for Curvature {
    fn default() -> Self {
        Self {
            perspective_px: CURVE_PERSPECTIVE_PX,
            rotate_x_deg: CURVE_RX_DEG,
            rotate_y_deg: CURVE_RY_DEG,
        }
    }
}

impl Curvature {
    pub fn to_css(&self) -> String {
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg) translateZ(0)",
            self.perspective_px, self.rotate_x_deg, self.rotate_y_deg
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CrtFrame {
    pub panel_width_px: f32,
    pub panel_height_px: f32,
    pub curvature: Curvature,
    pub clip: ShutterClip,
    /// Power handed to the interface content underneath the effects.
    pub content_power: f32,
    pub cover_opacity: f32,
    pub layers: [EffectLayer; 9],
    /// Opacity at the two dips of each stutter keyframe.
    pub stutter_dips: [f32; 2],
    pub roll: RollFrame,
    pub degauss: Option<DegaussTransform>,
    pub glitches: SmallVec<[GlitchOverlay; 5]>,
    /// Drawn outside the shutter clip.
    pub streak: Option<StreakBand>,
}

impl CrtFrame {
    pub fn layer(&self, kind: LayerKind) -> f32 {
        self.layers
            .iter()
            .find(|l| l.kind == kind)
            .map_or(0.0, |l| l.opacity)
    }

    pub fn uniforms(&self) -> CrtUniforms {
        let mut u = CrtUniforms {
            resolution: [self.panel_width_px, self.panel_height_px],
            power: self.content_power,
            shutter_inset: self.clip.top_bottom_pct / 50.0,
            side_inset: self.clip.side_pct / 100.0,
            streak: self.streak.map_or(0.0, |s| s.opacity),
            roll_offset_px: self.roll.offset_px,
            stutter: self.layer(LayerKind::Stutter),
            degauss_scale: self.degauss.map_or(1.0, |d| d.scale),
            degauss_rotate_deg: self.degauss.map_or(0.0, |d| d.rotate_deg),
            cover_opacity: self.cover_opacity,
            ..<CrtUniforms as bytemuck::Zeroable>::zeroed()
        };
        for g in &self.glitches {
            match *g {
                GlitchOverlay::Line {
                    y_pct, core_opacity, ..
                } => u.line = [y_pct / 100.0, core_opacity],
                GlitchOverlay::Tear {
                    x_pct,
                    width_px,
                    core_opacity,
                    ..
                } => {
                    u.tear = [x_pct / 100.0, core_opacity];
                    u.tear_width_px = width_px;
                }
                GlitchOverlay::Static {
                    hue_degrees,
                    noise_opacity,
                    ..
                } => u.static_hue_opacity = [hue_degrees, noise_opacity],
                GlitchOverlay::DegaussFlash { opacity, .. } => {
                    u.degauss_flash = u.degauss_flash.max(opacity)
                }
            }
        }
        u
    }
}

/// Shader-facing packing of a [`CrtFrame`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CrtUniforms {
    pub resolution: [f32; 2],
    pub power: f32,
    pub shutter_inset: f32,
    pub side_inset: f32,
    pub streak: f32,
    pub roll_offset_px: f32,
    pub stutter: f32,
    pub line: [f32; 2],
    pub tear: [f32; 2],
    pub static_hue_opacity: [f32; 2],
    pub degauss_scale: f32,
    pub degauss_rotate_deg: f32,
    pub degauss_flash: f32,
    pub tear_width_px: f32,
    pub cover_opacity: f32,
    pub _pad: f32,
}

pub fn render(input: &CompositorInput) -> CrtFrame {
    let p = input.power.clamp(0.0, 1.0);
    let tuning = input.tuning;
    let panel_w = input.pixel_width as f32 * PANEL_WIDTH_FRACTION;
    let panel_h = input.pixel_height as f32 * PANEL_HEIGHT_FRACTION;

    let layers = LayerKind::STACK.map(|kind| EffectLayer {
        kind,
        opacity: kind.opacity(p, &tuning),
    });
    let s = tuning.stutter_strength;
    let stutter_dips = [1.0 - 0.06 * s, 1.0 - 0.12 * s];

    let mut glitches = SmallVec::new();
    let mut roll = RollFrame {
        edge_mask_px: ROLL_EDGE_MASK_PX,
        ..Default::default()
    };
    let mut degauss = None;
    for g in input.glitches {
        match g.event {
            GlitchEvent::HorizontalLine { y_position, .. } => glitches.push(GlitchOverlay::Line {
                y_pct: y_position.clamp(0.0, 1.0) * 100.0,
                core_opacity: green_opacity(p, 0.25, tuning.green_strength),
                glow_opacity: green_opacity(p, 0.15, tuning.green_strength),
            }),
            GlitchEvent::VerticalTear {
                x_position,
                width_px,
                ..
            } => glitches.push(GlitchOverlay::Tear {
                x_pct: x_position.clamp(0.0, 1.0) * 100.0,
                width_px,
                core_opacity: green_opacity(p, 0.25, tuning.green_strength),
                glow_opacity: green_opacity(p, 0.15, tuning.green_strength),
            }),
            GlitchEvent::StaticBurst { hue_degrees, .. } => glitches.push(GlitchOverlay::Static {
                hue_degrees,
                noise_opacity: (p + 0.15).min(1.0),
                stripe_opacity: (p * 0.3).min(0.25),
            }),
            GlitchEvent::DegaussPulse { .. } => {
                let t = g.progress(input.now_ms);
                degauss = Some(degauss_keyframe(t));
                let (offset_px, opacity) = shiver_keyframe(t);
                for color in FlashColor::BOTH {
                    glitches.push(GlitchOverlay::DegaussFlash {
                        color,
                        offset_px,
                        opacity,
                    });
                }
            }
            GlitchEvent::VerticalRoll {
                amplitude_px,
                rise_ms,
                fall_ms,
            } => {
                roll.offset_px =
                    roll_offset(amplitude_px, rise_ms, fall_ms, g.elapsed_ms(input.now_ms));
                roll.edge_masks = roll.offset_px.abs() > 0.5;
            }
        }
    }

    let streak = (input.streak > STREAK_VISIBLE_MIN).then(|| {
        let height_px = (panel_h * STREAK_BAND_FRACTION).max(2.0);
        StreakBand {
            opacity: 0.9 * input.streak.min(1.0),
            top_px: panel_h * 0.5 - height_px * 0.5,
            height_px,
        }
    });

    CrtFrame {
        panel_width_px: panel_w,
        panel_height_px: panel_h,
        curvature: Curvature::default(),
        clip: shutter_clip(p, input.shutter),
        content_power: p,
        cover_opacity: input.cover_opacity.clamp(0.0, 1.0),
        layers,
        stutter_dips,
        roll,
        degauss,
        glitches,
        streak,
    }
}

#[inline]
fn green_opacity(power: f32, lift: f32, strength: f32) -> f32 {
    ((power + lift) * strength).clamp(0.0, 1.0)
}

/// Eased rise to `-amplitude` then eased fall back to zero.
pub fn roll_offset(amplitude_px: f32, rise_ms: f64, fall_ms: f64, elapsed_ms: f64) -> f32 {
    let max_shift = -amplitude_px.abs();
    if elapsed_ms <= rise_ms && rise_ms > 0.0 {
        max_shift * ease_out_quad((elapsed_ms / rise_ms) as f32)
    } else if elapsed_ms <= rise_ms + fall_ms && fall_ms > 0.0 {
        let p = ((elapsed_ms - rise_ms) / fall_ms) as f32;
        max_shift * (1.0 - ease_out_quad(p))
    } else {
        0.0
    }
}

// (time, scale, rotate_deg)
const DEGAUSS_TRANSFORM_KEYS: [(f32, f32, f32); 6] = [
    (0.00, 1.00, 0.0),
    (0.12, 1.06, 0.2),
    (0.28, 0.98, -0.15),
    (0.45, 1.03, 0.1),
    (0.62, 0.995, -0.05),
    (1.00, 1.00, 0.0),
];

// (time, saturate, contrast)
const DEGAUSS_FILTER_KEYS: [(f32, f32, f32); 4] = [
    (0.00, 1.0, 1.0),
    (0.12, 0.85, 1.05),
    (0.28, 1.1, 0.95),
    (1.00, 1.0, 1.0),
];

// (time, dx, dy, opacity)
const SHIVER_KEYS: [(f32, f32, f32, f32); 6] = [
    (0.00, 0.0, 0.0, 0.0),
    (0.10, 0.6, -0.4, 0.18),
    (0.22, -0.5, 0.5, 0.14),
    (0.36, 0.4, 0.2, 0.10),
    (0.60, -0.2, -0.2, 0.06),
    (1.00, 0.0, 0.0, 0.0),
];

/// Segment containing `t` and the eased position inside it.
fn segment(times: impl Iterator<Item = f32>, t: f32) -> (usize, f32) {
    let t = t.clamp(0.0, 1.0);
    let times: SmallVec<[f32; 6]> = times.collect();
    for i in 0..times.len().saturating_sub(1) {
        let (a, b) = (times[i], times[i + 1]);
        if t <= b {
            let local = if b > a { (t - a) / (b - a) } else { 1.0 };
            return (i, ease_out_quad(local));
        }
    }
    (times.len().saturating_sub(2), 1.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn degauss_keyframe(progress: f32) -> DegaussTransform {
    let (i, k) = segment(DEGAUSS_TRANSFORM_KEYS.iter().map(|e| e.0), progress);
    let (a, b) = (DEGAUSS_TRANSFORM_KEYS[i], DEGAUSS_TRANSFORM_KEYS[i + 1]);
    let (j, f) = segment(DEGAUSS_FILTER_KEYS.iter().map(|e| e.0), progress);
    let (fa, fb) = (DEGAUSS_FILTER_KEYS[j], DEGAUSS_FILTER_KEYS[j + 1]);
    DegaussTransform {
        scale: lerp(a.1, b.1, k),
        rotate_deg: lerp(a.2, b.2, k),
        saturate: lerp(fa.1, fb.1, f),
        contrast: lerp(fa.2, fb.2, f),
    }
}

pub fn shiver_keyframe(progress: f32) -> (Vec2, f32) {
    let (i, k) = segment(SHIVER_KEYS.iter().map(|e| e.0), progress);
    let (a, b) = (SHIVER_KEYS[i], SHIVER_KEYS[i + 1]);
    (
        Vec2::new(lerp(a.1, b.1, k), lerp(a.2, b.2, k)),
        lerp(a.3, b.3, k),
    )
}
