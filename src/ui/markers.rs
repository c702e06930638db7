use super::panels;
use crate::app::AppHandles;
use crate::dom;
use fnv::FnvHashMap;
use instant::Instant;
use viewer_core::{Command, Language, Marker, MarkerCollection, MarkerEdits, MarkerId, MarkerPatch};
use wasm_bindgen::JsValue;
use web_sys as web;

struct Row {
    root: web::HtmlElement,
    index: web::HtmlElement,
    titles: [web::HtmlInputElement; 2],
    descriptions: [web::HtmlTextAreaElement; 2],
}

impl Row {
    fn build(document: &web::Document, id: &MarkerId, handles: &AppHandles) -> Result<Self, JsValue> {
        let root: web::HtmlElement = dom::element(document, "li", "marker-row")?;
        _ = root.set_attribute("data-id", id.as_str());

        let header: web::HtmlElement = dom::element(document, "div", "marker-header")?;
        let index = dom::text_element(document, "button", "marker-index", "")?;
        index.set_title("Select marker");
        let down = dom::button(document, "↓", "Move down")?;
        let up = dom::button(document, "↑", "Move up")?;
        let remove = dom::button(document, "✕", "Remove marker")?;
        header.append_child(&index)?;
        header.append_child(&down)?;
        header.append_child(&up)?;
        header.append_child(&remove)?;
        root.append_child(&header)?;

        let h = handles.clone();
        let marker = id.clone();
        dom::on(&index, "click", move || {
            h.dispatch_logged(Command::ToggleActiveMarker(marker.clone()));
        });
        let h = handles.clone();
        let marker = id.clone();
        dom::on(&down, "click", move || {
            let from = h.store.borrow().state().markers.index_of(&marker);
            if let Some(from) = from {
                h.dispatch_logged(Command::MoveMarker { from, to: from + 1 });
            }
        });
        let h = handles.clone();
        let marker = id.clone();
        dom::on(&up, "click", move || {
            let from = h.store.borrow().state().markers.index_of(&marker);
            if let Some((from, to)) = from.and_then(|f| f.checked_sub(1).map(|t| (f, t))) {
                h.dispatch_logged(Command::MoveMarker { from, to });
            }
        });
        let h = handles.clone();
        let marker = id.clone();
        dom::on(&remove, "click", move || {
            h.edits.borrow_mut().cancel(&marker);
            h.dispatch_logged(Command::RemoveMarker(marker.clone()));
        });

        let mut titles = Vec::with_capacity(2);
        let mut descriptions = Vec::with_capacity(2);
        for language in Language::ALL {
            let block: web::HtmlElement = dom::element(document, "div", "marker-lang")?;
            _ = block.set_attribute("lang", language.code());

            let title: web::HtmlInputElement = dom::element(document, "input", "marker-title")?;
            title.set_type("text");
            title.set_placeholder("Title");
            let description: web::HtmlTextAreaElement =
                dom::element(document, "textarea", "marker-description")?;
            description.set_placeholder("Description (HTML)");
            description.set_rows(3);

            block.append_child(&dom::text_element(document, "span", "lang-code", language.code())?)?;
            block.append_child(&title)?;
            block.append_child(&description)?;
            root.append_child(&block)?;

            let t = title.clone();
            wire_text(&title, handles, id, move |p, v| p.set_title(language, v), move || {
                t.value()
            });
            let d = description.clone();
            wire_text(&description, handles, id, move |p, v| p.set_description(language, v), move || {
                d.value()
            });

            titles.push(title);
            descriptions.push(description);
        }

        Ok(Self {
            root,
            index,
            titles: titles
                .try_into()
                .map_err(|_| JsValue::from_str("title inputs"))?,
            descriptions: descriptions
                .try_into()
                .map_err(|_| JsValue::from_str("description inputs"))?,
        })
    }

    fn update(&self, position: usize, marker: &Marker, pending: Option<&MarkerPatch>, active: bool) {
        self.index.set_text_content(Some(&format!("#{}", position + 1)));
        dom::set_class(&self.root, "active", active);
        for (i, language) in Language::ALL.into_iter().enumerate() {
            let text = marker.content.get(language);
            let title = &self.titles[i];
            if !dom::is_focused(title)
                && pending.and_then(|p| p.title(language)).is_none()
                && title.value() != text.title
            {
                title.set_value(&text.title);
            }
            let description = &self.descriptions[i];
            if !dom::is_focused(description)
                && pending.and_then(|p| p.description(language)).is_none()
                && description.value() != text.description
            {
                description.set_value(&text.description);
            }
        }
    }
}

/// Stage keystrokes as a pending edit and commit on blur.
fn wire_text<F, R>(el: &web::HtmlElement, handles: &AppHandles, id: &MarkerId, apply: F, read: R)
where
    F: Fn(&mut MarkerPatch, String) + 'static,
    R: Fn() -> String + 'static,
{
    let h = handles.clone();
    let marker = id.clone();
    dom::on(el, "input", move || {
        let value = read();
        h.edits
            .borrow_mut()
            .stage(&marker, Instant::now(), |p| apply(p, value));
    });
    let h = handles.clone();
    let marker = id.clone();
    dom::on(el, "blur", move || h.flush_marker(&marker));
}

/// Keyed marker list. Rows are reused across refreshes so a field being
/// typed into keeps focus while other markers change.
pub struct MarkerList {
    document: web::Document,
    list: web::HtmlElement,
    label_toggle: web::HtmlButtonElement,
    rows: FnvHashMap<MarkerId, Row>,
    order: Vec<MarkerId>,
    handles: AppHandles,
}

impl MarkerList {
    pub fn build(
        document: &web::Document,
        parent: &web::Element,
        handles: &AppHandles,
    ) -> Result<Self, JsValue> {
        let body = panels::panel(document, parent, "Markers", false)?;
        let list: web::HtmlElement = dom::element(document, "ol", "marker-list")?;
        let add = dom::button(document, "Add marker", "")?;
        let label_toggle = dom::button(document, "", "Language of the labels in the scene")?;
        let actions: web::HtmlElement = dom::element(document, "div", "marker-actions")?;
        actions.append_child(&add)?;
        actions.append_child(&label_toggle)?;
        body.append_child(&list)?;
        body.append_child(&actions)?;

        let h = handles.clone();
        dom::on(&add, "click", move || {
            let marker = Marker::blank();
            log::info!("[markers] add {}", marker.id);
            h.dispatch_logged(Command::AddMarker(marker));
        });
        let h = handles.clone();
        let toggle = label_toggle.clone();
        dom::on(&label_toggle, "click", move || {
            let next = h.label_language.get().other();
            h.label_language.set(next);
            set_label_toggle_text(&toggle, next);
        });
        set_label_toggle_text(&label_toggle, handles.label_language.get());

        Ok(Self {
            document: document.clone(),
            list,
            label_toggle,
            rows: FnvHashMap::default(),
            order: Vec::new(),
            handles: handles.clone(),
        })
    }

    pub fn refresh(&mut self, markers: &MarkerCollection, edits: &MarkerEdits) {
        self.rows.retain(|id, row| {
            let keep = markers.contains(id);
            if !keep {
                row.root.remove();
            }
            keep
        });

        for (position, marker) in markers.iter().enumerate() {
            if !self.rows.contains_key(&marker.id) {
                match Row::build(&self.document, &marker.id, &self.handles) {
                    Ok(row) => {
                        self.rows.insert(marker.id.clone(), row);
                    }
                    Err(e) => {
                        log::error!("[ui] marker row for {}: {:?}", marker.id, e);
                        continue;
                    }
                }
            }
            if let Some(row) = self.rows.get(&marker.id) {
                let active = markers.active() == Some(&marker.id);
                row.update(position, marker, edits.pending(&marker.id), active);
            }
        }

        let order: Vec<MarkerId> = markers.iter().map(|m| m.id.clone()).collect();
        if order != self.order {
            for id in &order {
                if let Some(row) = self.rows.get(id) {
                    _ = self.list.append_child(&row.root);
                }
            }
            self.order = order;
        }
        set_label_toggle_text(&self.label_toggle, self.handles.label_language.get());
    }
}

fn set_label_toggle_text(button: &web::HtmlButtonElement, language: Language) {
    button.set_text_content(Some(&format!("Labels: {}", language.code().to_uppercase())));
}
