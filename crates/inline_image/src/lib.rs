//! Inline image loading and placement for text views.
//!
//! Layout produces [`layout::InlineImagePlacement`]s; an [`ImagePlacer`] turns
//! them into requests against a shared [`ImageRepository`], which collapses
//! concurrent requests for one identifier into a single provider call.
//! Providers answer through a one-shot [`Responder`], either inside
//! `request` or on a later frame. Answers are collected by
//! [`ImageRepository::pump`].

mod error;
mod file_provider;
mod identifier;
mod placer;
mod pool;
mod provider;
mod receiver;
mod repository;

pub use error::ImageError;
pub use file_provider::FileImageProvider;
pub use identifier::ImageIdentifier;
pub use placer::ImagePlacer;
pub use pool::{ImageObject, ImagePool};
pub use provider::{GraphicKind, InlineImage, InlineImageProvider, Responder, SpriteRect, Ticket};
pub use receiver::ImageReceiver;
pub use repository::{Delivery, ImageRepository};
