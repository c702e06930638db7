use super::panels;
use crate::app::AppHandles;
use crate::dom;
use crate::input::parse_number;
use viewer_core::{
    Axis, Changes, Command, SliderRange, Transform, POSITION_RANGE, ROTATION_RANGE, SCALE_RANGE,
};
use wasm_bindgen::JsValue;
use web_sys as web;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Field {
    Scale,
    Position(Axis),
    Rotation(Axis),
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Scale,
        Field::Position(Axis::X),
        Field::Position(Axis::Y),
        Field::Position(Axis::Z),
        Field::Rotation(Axis::X),
        Field::Rotation(Axis::Y),
        Field::Rotation(Axis::Z),
    ];

    pub fn label(self) -> String {
        match self {
            Field::Scale => "Scale".to_string(),
            Field::Position(a) => format!("Position {}", a.label()),
            Field::Rotation(a) => format!("Rotation {}", a.label()),
        }
    }

    pub fn range(self) -> SliderRange {
        match self {
            Field::Scale => SCALE_RANGE,
            Field::Position(_) => POSITION_RANGE,
            Field::Rotation(_) => ROTATION_RANGE,
        }
    }

    pub fn read(self, t: &Transform) -> f32 {
        match self {
            Field::Scale => t.scale,
            Field::Position(a) => t.position_on(a),
            Field::Rotation(a) => t.rotation_on(a),
        }
    }

    pub fn command(self, value: f32) -> Command {
        match self {
            Field::Scale => Command::SetScale(value),
            Field::Position(a) => Command::SetPosition(a, value),
            Field::Rotation(a) => Command::SetRotation(a, value),
        }
    }
}

struct FieldRow {
    field: Field,
    slider: web::HtmlInputElement,
    text: web::HtmlInputElement,
}

/// Seven slider + text pairs. Sliders clamp to their range; the text box
/// accepts any finite number and the store keeps it verbatim.
pub struct TransformPanel {
    rows: Vec<FieldRow>,
}

impl TransformPanel {
    pub fn build(
        document: &web::Document,
        parent: &web::Element,
        handles: &AppHandles,
    ) -> Result<Self, JsValue> {
        let body = panels::panel(document, parent, "Transform", false)?;
        let mut rows = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let range = field.range();
            let row: web::HtmlElement = dom::element(document, "div", "transform-row")?;

            let slider: web::HtmlInputElement = dom::element(document, "input", "slider")?;
            slider.set_type("range");
            slider.set_min(&range.min.to_string());
            slider.set_max(&range.max.to_string());
            slider.set_step(&range.step.to_string());

            let text: web::HtmlInputElement = dom::element(document, "input", "number")?;
            text.set_type("text");
            _ = text.set_attribute("inputmode", "decimal");

            row.append_child(&panels::labelled(document, &field.label(), &slider)?)?;
            row.append_child(&text)?;
            body.append_child(&row)?;

            let h = handles.clone();
            let s = slider.clone();
            dom::on(&slider, "input", move || {
                if let Some(v) = parse_number(&s.value()) {
                    h.dispatch_logged(field.command(v));
                }
            });

            let h = handles.clone();
            let t = text.clone();
            dom::on(&text, "change", move || match parse_number(&t.value()) {
                Some(v) => {
                    h.dispatch_logged(field.command(v));
                }
                None => {
                    log::debug!("[ui] rejected {:?} for {}", t.value(), field.label());
                    h.mark_dirty(Changes::TRANSFORM);
                }
            });

            rows.push(FieldRow {
                field,
                slider,
                text,
            });
        }
        Ok(Self { rows })
    }

    pub fn refresh(&self, transform: &Transform) {
        for row in &self.rows {
            let v = row.field.read(transform);
            row.slider
                .set_value(&row.field.range().clamp(v).to_string());
            if !dom::is_focused(&row.text) {
                row.text.set_value(&v.to_string());
            }
        }
    }
}
