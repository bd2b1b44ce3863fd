use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn html_by_id(document: &web::Document, element_id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

#[inline]
pub fn set_style(el: &web::HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

/// Show or hide without touching the element's own display value.
#[inline]
pub fn set_visible(el: &web::HtmlElement, visible: bool) {
    if visible {
        let _ = el.style().remove_property("display");
    } else {
        set_style(el, "display", "none");
    }
}

#[inline]
pub fn set_class(el: &web::HtmlElement, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}
