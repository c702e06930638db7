use crate::dom;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Append a collapsible `<section>` to `parent` and return its body element.
/// Clicking the title toggles the `collapsed` class on the section.
pub fn panel(
    document: &web::Document,
    parent: &web::Element,
    title: &str,
    collapsed: bool,
) -> Result<web::HtmlElement, JsValue> {
    let section: web::HtmlElement = dom::element(document, "section", "panel")?;
    let heading = dom::text_element(document, "h2", "panel-title", title)?;
    let body: web::HtmlElement = dom::element(document, "div", "panel-body")?;
    section.append_child(&heading)?;
    section.append_child(&body)?;
    parent.append_child(&section)?;
    dom::set_class(&section, "collapsed", collapsed);

    let toggled = section.clone();
    dom::on(&heading, "click", move || {
        _ = toggled.class_list().toggle("collapsed");
    });
    Ok(body)
}

/// `<label>` wrapping `control` after a caption.
pub fn labelled(
    document: &web::Document,
    caption: &str,
    control: &web::Element,
) -> Result<web::HtmlLabelElement, JsValue> {
    let label: web::HtmlLabelElement = dom::element(document, "label", "field")?;
    label.append_child(&dom::text_element(document, "span", "caption", caption)?)?;
    label.append_child(control)?;
    Ok(label)
}
