use web_sys::{Document, Element, Window};

use crate::error::{ResolverError, Result};
use crate::geometry::Rect;
use crate::tree::{LayoutHost, LayoutTree, Overflow};

/// [`LayoutHost`] over the live document.
#[derive(Debug, Clone)]
pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(ResolverError::NoWindow)?;
        let document = window.document().ok_or(ResolverError::NoDocument)?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl LayoutTree for DomHost {
    type Node = Element;

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn overflow(&self, node: &Element) -> Overflow {
        match self.window.get_computed_style(node) {
            Ok(Some(style)) => Overflow::new(
                style.get_property_value("overflow-x").unwrap_or_default(),
                style.get_property_value("overflow-y").unwrap_or_default(),
            ),
            _ => Overflow::default(),
        }
    }
}

impl LayoutHost for DomHost {
    fn find(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect::new(r.top(), r.left(), r.width(), r.height())
    }
}
