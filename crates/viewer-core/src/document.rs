//! JSON scene document: export of the full parameter set plus markers, and
//! shallow-merge import.
//!
//! Export shape:
//! `{scale, positionX, positionY, positionZ, rotationX, rotationY, rotationZ, items}`.
//!
//! Import decodes every recognised top-level key into a [`ScenePatch`] before
//! anything is written, so a rejected document never leaves state half-merged.

use crate::error::{ExportError, ImportError};
use crate::marker::{Marker, MarkerId};
use crate::store::{AppState, Changes};
use crate::transform::Axis;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument<'a> {
    pub scale: f32,
    pub position_x: f32,
    pub position_y: f32,
    pub position_z: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub rotation_z: f32,
    pub items: &'a [Marker],
}

impl<'a> From<&'a AppState> for SceneDocument<'a> {
    fn from(state: &'a AppState) -> Self {
        let t = &state.transform;
        Self {
            scale: t.scale,
            position_x: t.position.x,
            position_y: t.position.y,
            position_z: t.position.z,
            rotation_x: t.rotation.x,
            rotation_y: t.rotation.y,
            rotation_z: t.rotation.z,
            items: state.markers.as_slice(),
        }
    }
}

/// Pretty-printed (two-space indent) export of `state`.
///
/// JSON has no spelling for NaN or infinity, so a state holding one is
/// refused rather than written out as `null`.
pub fn export(state: &AppState) -> Result<String, ExportError> {
    let doc = SceneDocument::from(state);
    if let Some(key) = doc.first_non_finite() {
        return Err(ExportError::NonFinite { key });
    }
    Ok(serde_json::to_string_pretty(&doc)?)
}

impl SceneDocument<'_> {
    /// Key path of the first value JSON cannot represent.
    fn first_non_finite(&self) -> Option<String> {
        let fields = [
            ("scale", self.scale),
            ("positionX", self.position_x),
            ("positionY", self.position_y),
            ("positionZ", self.position_z),
            ("rotationX", self.rotation_x),
            ("rotationY", self.rotation_y),
            ("rotationZ", self.rotation_z),
        ];
        if let Some((key, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Some((*key).to_owned());
        }
        self.items
            .iter()
            .position(|m| !m.position.is_finite())
            .map(|i| format!("items[{i}].position"))
    }
}

/// Which keys an import touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub applied: Vec<String>,
    pub ignored: Vec<String>,
}

/// Decoded, not yet applied, import. Every field is optional: only keys
/// present in the document overwrite state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenePatch {
    pub scale: Option<f32>,
    pub position: [Option<f32>; 3],
    pub rotation: [Option<f32>; 3],
    pub model_hidden: Option<bool>,
    pub items: Option<Vec<Marker>>,
    pub active_item_id: Option<Option<MarkerId>>,
    pub report: ImportReport,
}

impl ScenePatch {
    /// Parse import text. Leading/trailing whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ImportError::Empty);
        }
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Self::from_map(map),
            other => Err(ImportError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    fn from_map(map: Map<String, Value>) -> Result<Self, ImportError> {
        let mut patch = ScenePatch::default();
        for (key, value) in map {
            let known = match key.as_str() {
                "scale" => {
                    patch.scale = Some(number_field(&key, &value)?);
                    true
                }
                "positionX" | "positionY" | "positionZ" => {
                    patch.position[axis_suffix(&key).index()] = Some(number_field(&key, &value)?);
                    true
                }
                "rotationX" | "rotationY" | "rotationZ" => {
                    patch.rotation[axis_suffix(&key).index()] = Some(number_field(&key, &value)?);
                    true
                }
                "modelIsHidden" => {
                    patch.model_hidden = Some(bool_field(&key, &value)?);
                    true
                }
                "items" => {
                    let items = serde_json::from_value::<Vec<Marker>>(value)
                        .map_err(|e| field_error(&key, e))?;
                    patch.items = Some(items);
                    true
                }
                "activeItemId" => {
                    let id = serde_json::from_value::<Option<MarkerId>>(value)
                        .map_err(|e| field_error(&key, e))?;
                    patch.active_item_id = Some(id);
                    true
                }
                _ => false,
            };
            if known {
                patch.report.applied.push(key);
            } else {
                patch.report.ignored.push(key);
            }
        }
        Ok(patch)
    }

    /// Overwrite the fields present in the patch.
    pub fn apply(self, state: &mut AppState) -> (Changes, ImportReport) {
        let mut changes = Changes::NONE;
        let t = &mut state.transform;

        if let Some(scale) = self.scale {
            t.set_scale(scale);
            changes |= Changes::TRANSFORM;
        }
        for axis in Axis::ALL {
            if let Some(v) = self.position[axis.index()] {
                t.set_position(axis, v);
                changes |= Changes::TRANSFORM;
            }
            if let Some(v) = self.rotation[axis.index()] {
                t.set_rotation(axis, v);
                changes |= Changes::TRANSFORM;
            }
        }
        if let Some(hidden) = self.model_hidden {
            state.model_hidden = hidden;
            changes |= Changes::VISIBILITY;
        }
        if let Some(items) = self.items {
            let before = state.markers.active().cloned();
            state.markers.set(items);
            changes |= Changes::MARKERS;
            if state.markers.active() != before.as_ref() {
                changes |= Changes::ACTIVE;
            }
        }
        if let Some(active) = self.active_item_id {
            if state.markers.set_active(active) {
                changes |= Changes::ACTIVE;
            }
        }
        (changes, self.report)
    }
}

fn axis_suffix(key: &str) -> Axis {
    match key.as_bytes().last() {
        Some(b'X') => Axis::X,
        Some(b'Y') => Axis::Y,
        _ => Axis::Z,
    }
}

/// Numbers, or numeric strings as written by text-backed sliders.
fn number_field(key: &str, value: &Value) -> Result<f32, ImportError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.map(|v| v as f32) {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(ImportError::Field {
            key: key.to_owned(),
            reason: "number is outside the f32 range".to_owned(),
        }),
        None => Err(ImportError::Field {
            key: key.to_owned(),
            reason: format!("expected a number, found {}", json_kind(value)),
        }),
    }
}

fn bool_field(key: &str, value: &Value) -> Result<bool, ImportError> {
    value.as_bool().ok_or_else(|| ImportError::Field {
        key: key.to_owned(),
        reason: format!("expected a boolean, found {}", json_kind(value)),
    })
}

fn field_error(key: &str, err: serde_json::Error) -> ImportError {
    ImportError::Field {
        key: key.to_owned(),
        reason: err.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_are_accepted() {
        let patch = ScenePatch::parse(r#"{"scale": "2.5", "rotationY": -0.25}"#).unwrap();
        assert_eq!(patch.scale, Some(2.5));
        assert_eq!(patch.rotation, [None, Some(-0.25), None]);
    }

    #[test]
    fn unknown_keys_are_reported_not_rejected() {
        let patch = ScenePatch::parse(r#"{"buffer": null, "scale": 1}"#).unwrap();
        assert_eq!(patch.report.applied, vec!["scale".to_string()]);
        assert_eq!(patch.report.ignored, vec!["buffer".to_string()]);
    }

    #[test]
    fn top_level_must_be_an_object() {
        let err = ScenePatch::parse("[1, 2]").unwrap_err();
        assert!(matches!(err, ImportError::NotAnObject { found: "an array" }));
    }
}
