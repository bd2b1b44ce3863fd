pub mod anchor;
pub mod camera;
pub mod compositor;
pub mod constants;
pub mod contact;
pub mod damp;
pub mod fitter;
pub mod glitch;
pub mod monitor;
pub mod power;
pub mod scene;
pub mod timer;

pub use anchor::{locate, LocateError, ScreenAnchor, ScreenLocator};
pub use camera::{compute_close_shot, CameraRig, CameraRigConfig, CameraShot};
pub use compositor::{render, CompositorInput, CrtFrame, CrtUniforms, FlashColor, GlitchOverlay, Tuning};
pub use constants::*;
pub use fitter::{fit, PanelFit, PanelFitter, PanelPlacement};
pub use glitch::{ActiveGlitch, GlitchConfig, GlitchEvent, GlitchKind, GlitchScheduler};
pub use monitor::{Monitor, MonitorConfig, MonitorFrame, TerminalApi};
pub use power::{PowerConfig, PowerEdge, PowerState, PowerStateMachine};
pub use scene::{Aabb, Geometry, SceneBuilder, SceneNode, Transform};
