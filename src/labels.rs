use crate::constants::LABEL_OFFSET_PX;
use crate::dom;
use crate::input;
use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use viewer_core::{Camera, Language, MarkerCollection, MarkerId};
use web_sys as web;

/// HTML labels floating next to each marker, repositioned every frame.
pub struct LabelLayer {
    document: web::Document,
    root: web::HtmlElement,
    labels: FnvHashMap<MarkerId, web::HtmlElement>,
}

impl LabelLayer {
    pub fn new(document: &web::Document, root: web::HtmlElement) -> Self {
        Self {
            document: document.clone(),
            root,
            labels: FnvHashMap::default(),
        }
    }

    /// `positions` holds the world position drawn for each marker, in list order.
    pub fn update(
        &mut self,
        markers: &MarkerCollection,
        positions: &[Vec3],
        camera: &Camera,
        language: Language,
    ) {
        self.labels.retain(|id, el| {
            let keep = markers.contains(id);
            if !keep {
                el.remove();
            }
            keep
        });

        let rect = self.root.get_bounding_client_rect();
        let (w, h) = (rect.width() as f32, rect.height() as f32);
        for (i, (marker, world)) in markers.iter().zip(positions).enumerate() {
            if !self.labels.contains_key(&marker.id) {
                let Ok(el) = dom::element::<web::HtmlElement>(&self.document, "p", "marker-label")
                else {
                    continue;
                };
                _ = self.root.append_child(&el);
                self.labels.insert(marker.id.clone(), el);
            }
            let Some(el) = self.labels.get(&marker.id) else {
                continue;
            };

            let text = marker.display_label(language, i);
            if el.text_content().as_deref() != Some(text.as_str()) {
                el.set_text_content(Some(&text));
            }
            dom::set_class(el, "active", markers.active() == Some(&marker.id));

            let style = el.style();
            match camera.world_to_ndc(*world).filter(|ndc| ndc.z <= 1.0) {
                Some(ndc) => {
                    let css = input::ndc_to_css(Vec2::new(ndc.x, ndc.y), w, h);
                    _ = style.set_property("display", "");
                    _ = style.set_property(
                        "transform",
                        &format!(
                            "translate({:.1}px, {:.1}px)",
                            css.x + LABEL_OFFSET_PX[0],
                            css.y + LABEL_OFFSET_PX[1]
                        ),
                    );
                }
                None => {
                    _ = style.set_property("display", "none");
                }
            }
        }
    }
}
