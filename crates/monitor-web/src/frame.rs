use crate::constants::MAX_FRAME_DT_SEC;
use crate::overlay::Overlay;
use instant::Instant;
use monitor_core::monitor::{Monitor, MonitorFrame};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// State shared between the JS-facing handle and the animation-frame callback.
pub struct FrameContext {
    pub monitor: Rc<RefCell<Monitor>>,
    pub overlay: Option<Overlay>,
    pub pc_active: Rc<Cell<bool>>,
    pub alive: Rc<Cell<bool>>,
    pub on_frame: Rc<RefCell<Option<js_sys::Function>>>,

    pub epoch: Instant,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DT_SEC);
        self.last_instant = now;
        let now_ms = (now - self.epoch).as_secs_f64() * 1000.0;

        let out = self
            .monitor
            .borrow_mut()
            .frame(now_ms, dt_sec, self.pc_active.get());

        if let Some(overlay) = &self.overlay {
            overlay.apply(&out.crt, out.power.effective_active);
        }
        // cloned so the callback may replace itself
        let on_frame = self.on_frame.borrow().clone();
        if let Some(cb) = on_frame {
            if let Err(e) = cb.call1(&JsValue::NULL, &frame_payload(&out).into()) {
                log::warn!("[web] onFrame callback failed: {:?}", e);
            }
        }
    }
}

/// `[camX, camY, camZ, lookX, lookY, lookZ, coverOpacity, power, streak]`
fn frame_payload(out: &MonitorFrame) -> js_sys::Float32Array {
    let p = out.camera.position;
    let l = out.camera.look_at;
    let values = [
        p.x,
        p.y,
        p.z,
        l.x,
        l.y,
        l.z,
        out.power.cover_opacity,
        out.power.power,
        out.power.streak,
    ];
    js_sys::Float32Array::from(&values[..])
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Drive `frame_ctx` from requestAnimationFrame until its `alive` flag drops.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Tick = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !frame_ctx_tick.borrow().alive.get() {
            log::debug!("[web] frame loop stopped");
            // The closure owns `tick_clone`; taking it out breaks the cycle
            if let Some(cb) = tick_clone.borrow_mut().take() {
                release_later(cb);
            }
            return;
        }
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Tick) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drops `cb` from a fresh task, since it may be the closure currently running.
fn release_later(cb: Closure<dyn FnMut()>) {
    let Some(w) = web::window() else {
        return;
    };
    let release = Closure::once_into_js(move || drop(cb));
    if let Err(e) = w.set_timeout_with_callback(release.unchecked_ref()) {
        log::warn!("[web] could not release frame loop: {:?}", e);
    }
}
