//! `Surface` backed by the page's Plinko markup

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::consts::FADED_OPACITY;
use crate::sim::{BucketColor, Rect};
use crate::surface::{self, Surface, VisualFlag};
use crate::tuning::PlinkoTuning;

/// Plinko elements found in the document
pub struct DomSurface {
    ball: Option<HtmlElement>,
    label: Option<Element>,
    board: Option<Element>,
    pegs: Vec<Element>,
    buckets: Vec<HtmlElement>,
}

impl DomSurface {
    pub fn query(document: &Document) -> Self {
        Self {
            ball: query_one(document, ".data-ball").and_then(|el| el.dyn_into().ok()),
            label: query_one(document, ".data-size"),
            board: query_one(document, ".plinko-board"),
            pegs: query_all(document, ".plinko-peg"),
            buckets: query_all(document, ".plinko-bucket")
                .into_iter()
                .filter_map(|el| el.dyn_into().ok())
                .collect(),
        }
    }

    /// Tuning overrides from the board's `data-tuning` attribute
    pub fn tuning(&self) -> PlinkoTuning {
        self.board
            .as_ref()
            .and_then(|board| board.get_attribute("data-tuning"))
            .map(|json| PlinkoTuning::from_json(&json))
            .unwrap_or_default()
    }

    fn element(&self, element: surface::Element) -> Option<&Element> {
        match element {
            surface::Element::Ball => self.ball.as_deref(),
            surface::Element::Label => self.label.as_ref(),
            surface::Element::Board => self.board.as_ref(),
            surface::Element::Peg(i) => self.pegs.get(i),
            surface::Element::Bucket(i) => self.buckets.get(i).map(|b| &**b),
        }
    }
}

impl Surface for DomSurface {
    fn is_present(&self, element: surface::Element) -> bool {
        self.element(element).is_some()
    }

    fn peg_count(&self) -> usize {
        self.pegs.len()
    }

    fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bounds(&self, element: surface::Element) -> Option<Rect> {
        let rect = self.element(element)?.get_bounding_client_rect();
        Some(Rect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn set_visual_state(&mut self, element: surface::Element, flag: VisualFlag, on: bool) {
        match (element, flag) {
            (surface::Element::Ball, VisualFlag::Faded) => {
                if let Some(ball) = &self.ball {
                    let opacity = if on { FADED_OPACITY.to_string() } else { "1".to_string() };
                    let _ = ball.style().set_property("opacity", &opacity);
                }
            }
            (surface::Element::Bucket(i), VisualFlag::Filled) => {
                if let Some(bucket) = self.buckets.get(i) {
                    let color = if on { BucketColor::Yellow } else { BucketColor::White };
                    let _ = bucket.style().set_property("background-color", color.css());
                }
            }
            (element, flag) => {
                let class = match flag {
                    VisualFlag::Highlight => "highlight",
                    VisualFlag::Active => "active-bucket",
                    VisualFlag::Glow => "bucket-glow",
                    VisualFlag::Faded => "faded",
                    VisualFlag::Filled => "filled",
                };
                if let Some(el) = self.element(element) {
                    let _ = el.class_list().toggle_with_force(class, on);
                }
            }
        }
    }

    fn place_ball(&mut self, offset: Vec2) {
        if let Some(ball) = &self.ball {
            let style = ball.style();
            let _ = style.set_property("transform", &format!("translateX({}px)", offset.x));
            let _ = style.set_property("top", &format!("{}px", offset.y));
        }
    }

    fn set_label(&mut self, text: &str) {
        if let Some(label) = &self.label {
            label.set_text_content(Some(text));
        }
    }
}

pub(crate) fn query_one(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub(crate) fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
