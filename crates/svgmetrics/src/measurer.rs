//! Query façade over a [`Document`].

use crate::accumulate::walk_to;
use crate::geometry::{BoundingBox, Walker};
use crate::options::MeasureOptions;
use crate::sizing::{Declared, Dimensions, DocumentSize, RootLayout, declared_size, root_layout};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use svgmetrics_core::geom::Rect;
use svgmetrics_core::{Diagnostic, Document, NodeId};

/// Top-left corner of an element's ink rectangle, in document pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Result of a geometry query, in document pixels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub ink: Option<Rect>,
    pub logical: Option<Rect>,
    /// Non-fatal problems met while answering (dangling or cyclic references, duplicate ids).
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Measurer<'a> {
    document: &'a Document,
    options: MeasureOptions,
}

impl<'a> Measurer<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            options: MeasureOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MeasureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MeasureOptions {
        &self.options
    }

    pub fn document_size(&self) -> Result<DocumentSize> {
        let declared = declared_size(self.document, &self.options)?;
        match declared {
            Declared::Known(size) => Ok(size),
            Declared::FromContent { .. } => {
                let layout = root_layout(self.document, &self.options, &declared)?;
                let mut walker = Walker::new(self.document, &self.options);
                let content = self.content(&mut walker, &layout)?;
                Ok(declared.finish(&content))
            }
        }
    }

    pub fn document_dimensions(&self) -> Result<Dimensions> {
        Ok(self.document_size()?.to_pixels())
    }

    /// `"#foo"` and `"foo"` name the same element. Malformed identifiers are simply absent.
    pub fn has_element(&self, id: &str) -> bool {
        normalize_id(id).is_ok_and(|id| self.document.has(id))
    }

    pub fn element_position(&self, id: &str) -> Result<Position> {
        let geometry = self.geometry(Some(id))?;
        Ok(geometry
            .ink
            .map(|r| Position { x: r.x, y: r.y })
            .unwrap_or_default())
    }

    pub fn element_dimensions(&self, id: &str) -> Result<Dimensions> {
        let geometry = self.geometry(Some(id))?;
        Ok(geometry
            .ink
            .map(|r| Dimensions::from_size(r.width, r.height))
            .unwrap_or_default())
    }

    /// Ink and logical rectangles of one element, or of the whole document for `None`.
    pub fn geometry(&self, id: Option<&str>) -> Result<Geometry> {
        let target = match id {
            Some(id) => Some(self.lookup(id)?),
            None => None,
        };

        let declared = declared_size(self.document, &self.options)?;
        let layout = root_layout(self.document, &self.options, &declared)?;
        let mut walker = Walker::new(self.document, &self.options);

        let bbox = match target {
            None => match declared {
                Declared::Known(size) => {
                    BoundingBox::from_rect(Rect::from_size(size.width, size.height))
                }
                Declared::FromContent { .. } => self.content(&mut walker, &layout)?,
            },
            Some(node) if node == self.document.root() => self.content(&mut walker, &layout)?,
            Some(node) => self.element(&mut walker, &layout, node)?,
        };

        let mut diagnostics = self.document.diagnostics().to_vec();
        diagnostics.extend(walker.into_diagnostics());
        Ok(Geometry {
            ink: bbox.ink,
            logical: bbox.logical,
            diagnostics,
        })
    }

    fn lookup(&self, id: &str) -> Result<NodeId> {
        let bare = normalize_id(id)?;
        self.document.find(bare).ok_or_else(|| Error::UnknownElement {
            id: bare.to_string(),
        })
    }

    /// The root's children, mapped to pixels.
    fn content(&self, walker: &mut Walker<'_>, layout: &RootLayout) -> Result<BoundingBox> {
        Ok(walker
            .children(self.document.root(), layout.viewport)?
            .transform(&layout.pixel_transform))
    }

    fn element(
        &self,
        walker: &mut Walker<'_>,
        layout: &RootLayout,
        node: NodeId,
    ) -> Result<BoundingBox> {
        let Some(parent) = self.document.parent(node)? else {
            return self.content(walker, layout);
        };
        let (to_user, viewport) = walk_to(self.document, parent, &self.options, layout.viewport)?;
        let bbox = walker.measure(node, viewport)?;
        Ok(bbox.transform(&to_user.then(&layout.pixel_transform)))
    }
}

fn normalize_id(id: &str) -> Result<&str> {
    let bare = id.strip_prefix('#').unwrap_or(id);
    if bare.is_empty() || bare.contains('#') {
        return Err(Error::InvalidId { id: id.to_string() });
    }
    Ok(bare)
}
