use std::sync::mpsc;

use crate::error::ImageError;
use crate::identifier::ImageIdentifier;

/// Renderable image kinds. Pooled visual objects are kept per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphicKind {
    /// A named region of a shared atlas.
    Sprite,
    /// A whole image file.
    Texture,
}

/// Pixel rectangle inside an atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A loaded inline image, as far as placement cares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineImage {
    pub width: u32,
    pub height: u32,
    pub kind: GraphicKind,
    /// Source region within the atlas for sprites.
    pub region: Option<SpriteRect>,
}

/// Identifies one upstream request. Distinct requests for the same
/// identifier (for example after a cancel) get distinct tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

#[derive(Debug)]
pub(crate) struct Response {
    pub(crate) identifier: ImageIdentifier,
    pub(crate) ticket: Ticket,
    pub(crate) result: Result<InlineImage, ImageError>,
}

/// One-shot answer handle given to a provider.
///
/// `send` and `send_error` consume the responder, so every request is
/// answered at most once. Dropping it unanswered reports
/// [`ImageError::Abandoned`].
#[derive(Debug)]
pub struct Responder {
    identifier: ImageIdentifier,
    ticket: Ticket,
    tx: Option<mpsc::Sender<Response>>,
}

impl Responder {
    pub(crate) fn new(
        identifier: ImageIdentifier,
        ticket: Ticket,
        tx: mpsc::Sender<Response>,
    ) -> Self {
        Self {
            identifier,
            ticket,
            tx: Some(tx),
        }
    }

    pub fn identifier(&self) -> &ImageIdentifier {
        &self.identifier
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn send(mut self, image: InlineImage) {
        self.respond(Ok(image));
    }

    pub fn send_error(mut self, message: impl Into<String>) {
        let error = ImageError::Provider {
            identifier: self.identifier.to_string(),
            message: message.into(),
        };
        self.respond(Err(error));
    }

    fn respond(&mut self, result: Result<InlineImage, ImageError>) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        // The repository may already be gone; nothing is waiting then.
        let _ = tx.send(Response {
            identifier: self.identifier.clone(),
            ticket: self.ticket,
            result,
        });
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if self.tx.is_some() {
            let error = ImageError::Abandoned {
                identifier: self.identifier.to_string(),
            };
            self.respond(Err(error));
        }
    }
}

/// Source of inline images.
///
/// `request` must eventually answer through the responder, synchronously or
/// later. `cancel` may arrive before the answer and must be a no-op when the
/// request has already been answered.
pub trait InlineImageProvider {
    fn request(&mut self, identifier: &ImageIdentifier, responder: Responder);

    fn cancel(&mut self, identifier: &ImageIdentifier, ticket: Ticket);
}
