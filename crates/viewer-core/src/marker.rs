use crate::constants::MARKER_ID_LEN;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const ID_ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Opaque marker identity. Ids coming from an imported document are kept as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh URL-safe random id.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..MARKER_ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MarkerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Marker location in scene space.
///
/// Deserializes from `{x, y, z}` (missing components read as 0) and from the
/// older `[x, y, z]` array form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MarkerPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MarkerPosition {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl<'de> Deserialize<'de> for MarkerPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Array([f32; 3]),
            Object {
                #[serde(default)]
                x: f32,
                #[serde(default)]
                y: f32,
                #[serde(default)]
                z: f32,
            },
        }

        let position = match Repr::deserialize(deserializer)? {
            Repr::Array([x, y, z]) => Self { x, y, z },
            Repr::Object { x, y, z } => Self { x, y, z },
        };
        // Numbers beyond the f32 range arrive here as infinities.
        if !position.is_finite() {
            return Err(D::Error::custom("position component is outside the f32 range"));
        }
        Ok(position)
    }
}

impl From<MarkerPosition> for Vec3 {
    fn from(p: MarkerPosition) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

impl From<Vec3> for MarkerPosition {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::De, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    pub fn other(self) -> Language {
        match self {
            Language::De => Language::En,
            Language::En => Language::De,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Language::De => 0,
            Language::En => 1,
        }
    }
}

/// Title plus rich-text description (an HTML fragment, stored verbatim).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerContent {
    #[serde(default)]
    pub de: LocalizedText,
    #[serde(default)]
    pub en: LocalizedText,
}

impl MarkerContent {
    pub fn get(&self, language: Language) -> &LocalizedText {
        match language {
            Language::De => &self.de,
            Language::En => &self.en,
        }
    }

    pub fn get_mut(&mut self, language: Language) -> &mut LocalizedText {
        match language {
            Language::De => &mut self.de,
            Language::En => &mut self.en,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    #[serde(default)]
    pub position: MarkerPosition,
    #[serde(default)]
    pub content: MarkerContent,
}

impl Marker {
    /// Empty marker at the origin.
    pub fn new(id: MarkerId) -> Self {
        Self {
            id,
            position: MarkerPosition::ORIGIN,
            content: MarkerContent::default(),
        }
    }

    /// Empty marker at the origin with a freshly generated id.
    pub fn blank() -> Self {
        Self::new(MarkerId::generate())
    }

    pub fn with_position(mut self, position: MarkerPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_title(mut self, language: Language, title: impl Into<String>) -> Self {
        self.content.get_mut(language).title = title.into();
        self
    }

    /// Label shown next to the marker in the scene: the title in `language`,
    /// else the title in the other language, else the 1-based list position.
    pub fn display_label(&self, language: Language, index: usize) -> String {
        [language, language.other()]
            .into_iter()
            .map(|l| self.content.get(l).title.trim())
            .find(|t| !t.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| (index + 1).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn generated_ids_are_url_safe_and_fixed_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let id = MarkerId::generate_with(&mut rng);
            assert_eq!(id.as_str().len(), MARKER_ID_LEN);
            assert!(id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }

    #[test]
    fn position_accepts_array_and_partial_object() {
        let p: MarkerPosition = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(p, MarkerPosition::new(1.0, 2.0, 3.0));
        let p: MarkerPosition = serde_json::from_str(r#"{"y": 4}"#).unwrap();
        assert_eq!(p, MarkerPosition::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn position_beyond_f32_range_is_rejected() {
        assert!(serde_json::from_str::<MarkerPosition>(r#"{"x": 1e39}"#).is_err());
        assert!(serde_json::from_str::<MarkerPosition>("[0, -1e39, 0]").is_err());
        let p: MarkerPosition = serde_json::from_str("[3.4028235e38, -0.0, 1e-45]").unwrap();
        assert_eq!(p.x, f32::MAX);
        assert!(p.y == 0.0 && p.y.is_sign_negative());
        assert!(p.z > 0.0);
    }

    #[test]
    fn display_label_falls_back_to_other_language_then_index() {
        let m = Marker::new("a".into());
        assert_eq!(m.display_label(Language::En, 2), "3");
        let m = m.with_title(Language::De, "Tür");
        assert_eq!(m.display_label(Language::En, 2), "Tür");
        let m = m.with_title(Language::En, "Door");
        assert_eq!(m.display_label(Language::En, 2), "Door");
    }
}
