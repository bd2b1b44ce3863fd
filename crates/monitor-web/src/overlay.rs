//! Applies a [`CrtFrame`] to the overlay markup embedded on the screen glass.

use crate::constants::*;
use crate::dom::{html_by_id, set_class, set_style, set_visible};
use anyhow::anyhow;
use monitor_core::compositor::{
    CrtFrame, GlitchOverlay, LayerKind, StreakBand, CLIPPED_OVERLAY_IDS, ROLL_MASK_DOM_IDS,
};
use web_sys as web;

pub struct Overlay {
    panel: web::HtmlElement,
    content: Option<web::HtmlElement>,
    degauss_wrap: Option<web::HtmlElement>,
    layers: Vec<(LayerKind, web::HtmlElement)>,
    // Glitch overlays and roll masks, all under the iris
    clipped: Vec<(&'static str, web::HtmlElement)>,
    streak: Option<web::HtmlElement>,
}

impl Overlay {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        let panel = html_by_id(document, PANEL_ID).ok_or_else(|| anyhow!("missing #{PANEL_ID}"))?;
        let layers: Vec<_> = LayerKind::STACK
            .iter()
            .filter_map(|&kind| html_by_id(document, kind.dom_id()).map(|el| (kind, el)))
            .collect();
        if layers.len() < LayerKind::STACK.len() {
            log::warn!(
                "[web] overlay has {} of {} effect layers",
                layers.len(),
                LayerKind::STACK.len()
            );
        }
        let clipped: Vec<_> = CLIPPED_OVERLAY_IDS
            .iter()
            .filter_map(|&id| html_by_id(document, id).map(|el| (id, el)))
            .collect();
        Ok(Self {
            panel,
            content: html_by_id(document, CONTENT_ID),
            degauss_wrap: html_by_id(document, DEGAUSS_WRAP_ID),
            layers,
            clipped,
            streak: html_by_id(document, StreakBand::DOM_ID),
        })
    }

    fn clipped_el(&self, id: &str) -> Option<&web::HtmlElement> {
        self.clipped.iter().find(|(i, _)| *i == id).map(|(_, el)| el)
    }

    pub fn apply(&self, frame: &CrtFrame, effective_active: bool) {
        let panel = &self.panel;
        set_style(panel, "width", &format!("{:.1}px", frame.panel_width_px));
        set_style(panel, "height", &format!("{:.1}px", frame.panel_height_px));
        set_style(panel, "transform", &frame.curvature.to_css());
        set_style(panel, POWER_VAR, &format!("{:.4}", frame.content_power));
        for (var, dip) in STUTTER_DIP_VARS.iter().zip(frame.stutter_dips) {
            set_style(panel, var, &format!("{:.3}", dip));
        }
        set_class(panel, ACTIVE_CLASS, effective_active);

        let clip = frame.clip.to_css();
        for (kind, el) in &self.layers {
            set_style(el, "opacity", &format!("{:.4}", frame.layer(*kind)));
            set_style(el, "clip-path", &clip);
        }
        for (_, el) in &self.clipped {
            set_style(el, "clip-path", &clip);
        }

        if let Some(content) = &self.content {
            set_style(content, "clip-path", &clip);
            set_style(content, "opacity", &format!("{:.4}", frame.content_power));
            set_style(
                content,
                "transform",
                &format!("translateY({:.2}px)", frame.roll.offset_px),
            );
        }
        for mask in ROLL_MASK_DOM_IDS.iter().filter_map(|id| self.clipped_el(id)) {
            set_visible(mask, frame.roll.edge_masks);
            set_style(mask, "height", &format!("{}px", frame.roll.edge_mask_px));
        }

        if let Some(wrap) = &self.degauss_wrap {
            match &frame.degauss {
                Some(d) => {
                    set_style(wrap, "transform", &d.transform_css());
                    set_style(wrap, "filter", &d.filter_css());
                }
                None => {
                    let _ = wrap.style().remove_property("transform");
                    let _ = wrap.style().remove_property("filter");
                }
            }
        }

        self.apply_glitches(frame);

        if let Some(el) = &self.streak {
            match frame.streak {
                Some(band) => {
                    set_visible(el, true);
                    set_style(el, "opacity", &format!("{:.4}", band.opacity));
                    set_style(el, "top", &format!("{:.1}px", band.top_px));
                    set_style(el, "height", &format!("{:.1}px", band.height_px));
                }
                None => set_visible(el, false),
            }
        }
    }

    fn apply_glitches(&self, frame: &CrtFrame) {
        for g in &frame.glitches {
            let Some(el) = self.clipped_el(g.dom_id()) else {
                continue;
            };
            match *g {
                GlitchOverlay::Line {
                    y_pct,
                    core_opacity,
                    glow_opacity,
                } => {
                    set_style(el, "top", &format!("{:.2}%", y_pct));
                    set_style(el, "opacity", &format!("{:.3}", core_opacity));
                    set_style(el, GLOW_OPACITY_VAR, &format!("{:.3}", glow_opacity));
                }
                GlitchOverlay::Tear {
                    x_pct,
                    width_px,
                    core_opacity,
                    glow_opacity,
                } => {
                    set_style(el, "left", &format!("{:.2}%", x_pct));
                    set_style(el, "width", &format!("{}px", width_px));
                    set_style(el, "opacity", &format!("{:.3}", core_opacity));
                    set_style(el, GLOW_OPACITY_VAR, &format!("{:.3}", glow_opacity));
                }
                GlitchOverlay::Static {
                    hue_degrees,
                    noise_opacity,
                    stripe_opacity,
                } => {
                    set_style(el, "filter", &format!("hue-rotate({}deg)", hue_degrees));
                    set_style(el, "opacity", &format!("{:.3}", noise_opacity));
                    set_style(el, STRIPE_OPACITY_VAR, &format!("{:.3}", stripe_opacity));
                }
                GlitchOverlay::DegaussFlash {
                    color,
                    offset_px,
                    opacity,
                } => {
                    set_style(el, "background", color.background_css());
                    set_style(
                        el,
                        "transform",
                        &format!("translate({:.2}px, {:.2}px)", offset_px.x, offset_px.y),
                    );
                    set_style(el, "opacity", &format!("{:.3}", opacity));
                }
            }
        }
        for id in GlitchOverlay::DOM_IDS {
            if let Some(el) = self.clipped_el(id) {
                let on = frame.glitches.iter().any(|g| g.dom_id() == id);
                set_visible(el, on);
            }
        }
    }
}
