use std::collections::HashMap;

use layout::Rect;

use crate::identifier::ImageIdentifier;
use crate::provider::{GraphicKind, InlineImage};

/// A visual object a renderer draws for one placed image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageObject {
    pub handle: u64,
    pub kind: GraphicKind,
    pub rect: Rect,
    pub alpha: u8,
    pub identifier: Option<ImageIdentifier>,
    pub image: Option<InlineImage>,
}

impl ImageObject {
    pub fn is_visible(&self) -> bool {
        self.alpha > 0
    }
}

/// Free lists of visual objects, one per [`GraphicKind`].
///
/// Released objects are hidden by zeroing alpha; they stay alive so that a
/// layout pass in progress can keep referring to them.
#[derive(Debug, Default)]
pub struct ImagePool {
    free: HashMap<GraphicKind, Vec<ImageObject>>,
    next_handle: u64,
    created: usize,
}

impl ImagePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse a free object of `kind` or create one. The object comes back
    /// hidden.
    pub fn acquire(&mut self, kind: GraphicKind) -> ImageObject {
        if let Some(object) = self.free.get_mut(&kind).and_then(Vec::pop) {
            return object;
        }
        self.next_handle += 1;
        self.created += 1;
        ImageObject {
            handle: self.next_handle,
            kind,
            rect: Rect::default(),
            alpha: 0,
            identifier: None,
            image: None,
        }
    }

    pub fn release(&mut self, mut object: ImageObject) {
        object.alpha = 0;
        self.free.entry(object.kind).or_default().push(object);
    }

    pub fn free_count(&self, kind: GraphicKind) -> usize {
        self.free.get(&kind).map_or(0, Vec::len)
    }

    /// Objects ever created; reuse keeps this flat.
    pub fn created(&self) -> usize {
        self.created
    }
}
