use anyhow::Context;
use glam::{Mat4, Quat, Vec3};
use monitor_core::constants::{CLOSE_SHOT_KEY, SCREEN_MESH_NAME, WIDE_SHOT_KEY};
use monitor_core::glitch::{GlitchConfig, GlitchKind};
use monitor_core::monitor::{Monitor, MonitorConfig, TerminalApi};
use monitor_core::power::PowerEdge;
use monitor_core::scene::{Geometry, SceneNode, Transform};

const FPS: f64 = 60.0;
const DEFAULT_SEED: u64 = 0x5eed;

// Scripted session, in seconds
const POWER_ON_AT: f64 = 2.0;
const DEGAUSS_AT: f64 = 30.0;
const STATIC_AT: f64 = 40.0;
const POWER_OFF_AT: f64 = 182.0;
const END_AT: f64 = 186.0;

/// Stand-in for the loaded PC asset: a case plus a slightly tilted screen.
fn pc_asset() -> SceneNode {
    SceneNode::new("PC")
        .with_child(
            SceneNode::new("Case").with_geometry(Geometry::cuboid(
                Vec3::new(0.0, 0.25, 0.0),
                Vec3::new(0.45, 0.5, 0.45),
            )),
        )
        .with_child(
            SceneNode::new("MonitorBody")
                .with_transform(
                    Transform::from_translation(Vec3::new(0.0, 0.75, 0.0))
                        .with_rotation(Quat::from_rotation_x(-0.08)),
                )
                .with_child(
                    SceneNode::new(SCREEN_MESH_NAME)
                        .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 0.21)))
                        .with_geometry(Geometry::cuboid(Vec3::ZERO, Vec3::new(0.4, 0.3, 0.02))),
                ),
        )
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().context("seed must be an unsigned integer")?,
        None => DEFAULT_SEED,
    };

    let mut monitor = Monitor::new(MonitorConfig {
        glitches: GlitchConfig {
            seed: Some(seed),
            ..GlitchConfig::default()
        },
        ..MonitorConfig::default()
    });

    // PC sits on the desk group, scaled down and turned toward the room
    let desk = Mat4::from_scale_rotation_translation(
        Vec3::splat(0.8),
        Quat::from_rotation_y(0.35),
        Vec3::new(1.2, 0.74, -0.6),
    );
    let anchor = monitor
        .on_asset_loaded(&pc_asset(), desk)
        .context("locating screen")?;
    let fit = monitor.panel_fit();
    log::info!(
        "[native] seed {} screen {:.3}x{:.3} normal ({:.2},{:.2},{:.2}) panel {}x{} scale {:.6}",
        seed,
        anchor.world_width,
        anchor.world_height,
        anchor.world_normal.x,
        anchor.world_normal.y,
        anchor.world_normal.z,
        fit.pixel_width,
        fit.pixel_height,
        fit.uniform_scale
    );

    let dt = (1.0 / FPS) as f32;
    let frames = (END_AT * FPS) as u64;
    let mut starts = [0usize; 5];
    let mut was_active = [false; 5];
    let mut on_at = None;
    let mut off_at = None;
    let mut peak_streak = 0.0_f32;
    let mut last = None;

    for i in 0..=frames {
        let t = i as f64 / FPS;
        let now_ms = t * 1000.0;
        let pc_active = (POWER_ON_AT..POWER_OFF_AT).contains(&t);

        if i == (POWER_ON_AT * FPS) as u64 {
            monitor.select_shot(CLOSE_SHOT_KEY);
        }
        if i == (POWER_OFF_AT * FPS) as u64 {
            monitor.select_shot(WIDE_SHOT_KEY);
        }
        if i == (DEGAUSS_AT * FPS) as u64 {
            monitor.degauss();
        }
        if i == (STATIC_AT * FPS) as u64 {
            monitor.set_stutter_strength(1.5);
            monitor.static_burst(Some(600.0));
        }

        let frame = monitor.frame(now_ms, dt, pc_active);
        match frame.power_edge {
            Some(PowerEdge::On) => on_at = Some(now_ms),
            Some(PowerEdge::Off) => off_at = Some(now_ms),
            None => {}
        }
        if off_at.is_some() {
            peak_streak = peak_streak.max(frame.power.streak);
        }

        for kind in GlitchKind::ALL {
            let active = monitor.glitches().is_active(kind);
            if active && !was_active[kind.index()] {
                starts[kind.index()] += 1;
            }
            was_active[kind.index()] = active;
        }
        last = Some(frame);
    }

    let last = last.context("no frames simulated")?;
    let u = last.crt.uniforms();
    log::info!(
        "[native] power on at {:.0}ms, off at {:.0}ms, peak streak {:.3}",
        on_at.unwrap_or(f64::NAN),
        off_at.unwrap_or(f64::NAN),
        peak_streak
    );
    for kind in GlitchKind::ALL {
        log::info!("[native] {:?}: {} starts", kind, starts[kind.index()]);
    }
    log::info!(
        "[native] final power {:.3} cover {:.3} camera ({:.2},{:.2},{:.2}) uniforms {}x{}",
        u.power,
        u.cover_opacity,
        last.camera.position.x,
        last.camera.position.y,
        last.camera.position.z,
        u.resolution[0],
        u.resolution[1]
    );

    monitor.dispose();
    Ok(())
}
