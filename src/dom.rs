use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Attach a listener that ignores its event argument.
pub fn on(target: &web::EventTarget, event: &str, mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Attach a listener that receives the event cast to `E`.
pub fn on_event<E>(target: &web::EventTarget, event: &str, mut handler: impl FnMut(E) + 'static)
where
    E: JsCast + 'static,
{
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Create `<tag class="class">`.
pub fn element<T: JsCast>(document: &web::Document, tag: &str, class: &str) -> Result<T, JsValue> {
    let el = document.create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    el.dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("<{tag}> has unexpected type")))
}

pub fn text_element(
    document: &web::Document,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<web::HtmlElement, JsValue> {
    let el: web::HtmlElement = element(document, tag, class)?;
    el.set_text_content(Some(text));
    Ok(el)
}

pub fn button(document: &web::Document, label: &str, title: &str) -> Result<web::HtmlButtonElement, JsValue> {
    let b: web::HtmlButtonElement = element(document, "button", "")?;
    b.set_type("button");
    b.set_text_content(Some(label));
    if !title.is_empty() {
        b.set_title(title);
    }
    Ok(b)
}

/// Whether `el` currently has keyboard focus; focused fields are not overwritten on refresh.
pub fn is_focused(el: &web::Element) -> bool {
    window_document()
        .and_then(|d| d.active_element())
        .map(|active| &active == el)
        .unwrap_or(false)
}

pub fn set_class(el: &web::Element, class: &str, on: bool) {
    let cl = el.class_list();
    _ = if on { cl.add_1(class) } else { cl.remove_1(class) };
}

/// Write a one-line status into the element with `id`, flagged as an error or not.
pub fn set_status(id: &str, message: &str, is_error: bool) {
    if let Some(el) = window_document().and_then(|d| d.get_element_by_id(id)) {
        el.set_text_content(Some(message));
        set_class(&el, "error", is_error);
    }
}
