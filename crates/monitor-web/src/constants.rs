// Overlay markup ids and frame-loop tuning for the browser front-end

// Panel element inside the 3D-embedded HTML; everything else is looked up below it
pub const PANEL_ID: &str = "crt-panel";
// Interface content the iris clips and the roll shifts
pub const CONTENT_ID: &str = "crt-content";
// Wrapper the degauss wobble transforms
pub const DEGAUSS_WRAP_ID: &str = "crt-degauss";

// Class set on the panel while the set is effectively on
pub const ACTIVE_CLASS: &str = "crt-on";

// CSS custom properties consumed by the stylesheet animations
pub const POWER_VAR: &str = "--crt-power";
pub const STUTTER_DIP_VARS: [&str; 2] = ["--crt-stutter-dip-1", "--crt-stutter-dip-2"];
pub const GLOW_OPACITY_VAR: &str = "--crt-glow-opacity";
pub const STRIPE_OPACITY_VAR: &str = "--crt-stripe-opacity";

// Longest frame step fed to the smoothers; a resumed background tab would otherwise jump
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
