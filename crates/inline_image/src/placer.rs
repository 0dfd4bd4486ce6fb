use std::collections::{HashMap, HashSet};
use std::fmt;

use layout::{InlineImagePlacement, Rect};

use crate::error::ImageError;
use crate::identifier::ImageIdentifier;
use crate::pool::{ImageObject, ImagePool};
use crate::provider::InlineImageProvider;
use crate::receiver::ImageReceiver;
use crate::repository::{Delivery, ImageRepository};

type ErrorHook = Box<dyn FnMut(&ImageError)>;

/// Keeps one view's visible images in step with its latest layout.
///
/// Three sets drive reconciliation: `reserved` (what layout wants now),
/// `requested` (loads in flight) and `placed` (visible). Whenever something
/// requested or placed is no longer reserved, everything is torn down and
/// rebuilt; otherwise only the missing placements are requested.
#[derive(Default)]
pub struct ImagePlacer {
    reserved: Vec<InlineImagePlacement>,
    requested: HashMap<InlineImagePlacement, ImageReceiver>,
    placed: HashMap<InlineImagePlacement, ImageObject>,
    failed: HashSet<InlineImagePlacement>,
    on_error: Option<ErrorHook>,
    teardowns: usize,
}

impl fmt::Debug for ImagePlacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePlacer")
            .field("reserved", &self.reserved.len())
            .field("requested", &self.requested.len())
            .field("placed", &self.placed.len())
            .field("failed", &self.failed.len())
            .field("teardowns", &self.teardowns)
            .finish()
    }
}

impl ImagePlacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for every failed load. Failed slots stay empty until the
    /// next `reserve`.
    pub fn set_error_hook(&mut self, hook: impl FnMut(&ImageError) + 'static) {
        self.on_error = Some(Box::new(hook));
    }

    /// Record what the latest layout wants on screen. Slots that failed
    /// earlier are requested again by the next `place`.
    pub fn reserve(&mut self, placements: &[InlineImagePlacement]) {
        self.reserved.clear();
        self.failed.clear();
        for placement in placements {
            if !self.reserved.contains(placement) {
                self.reserved.push(placement.clone());
            }
        }
    }

    pub fn reserved(&self) -> &[InlineImagePlacement] {
        &self.reserved
    }

    /// Reconcile against the reserved set and request what is missing.
    pub fn place<P: InlineImageProvider>(
        &mut self,
        repo: &mut ImageRepository<P>,
        pool: &mut ImagePool,
    ) {
        let still_wanted = self
            .placed
            .keys()
            .chain(self.requested.keys())
            .all(|p| self.reserved.contains(p));
        if !still_wanted {
            self.teardown(repo, pool);
        }

        for placement in &self.reserved {
            if self.requested.contains_key(placement)
                || self.placed.contains_key(placement)
                || self.failed.contains(placement)
            {
                continue;
            }
            let identifier = ImageIdentifier::from(placement);
            let mut receiver = ImageReceiver::new(repo.allocate_receiver());
            receiver.expect(identifier.clone());
            repo.request(&identifier, receiver.id());
            self.requested.insert(placement.clone(), receiver);
        }
    }

    /// Apply repository deliveries addressed to this placer's receivers.
    /// Returns whether anything became visible or failed.
    pub fn receive(&mut self, deliveries: &[Delivery], pool: &mut ImagePool) -> bool {
        let mut changed = false;
        for delivery in deliveries {
            let Some(placement) = self
                .requested
                .iter()
                .find(|(_, r)| r.id() == delivery.receiver)
                .map(|(p, _)| p.clone())
            else {
                continue;
            };
            let Some(mut receiver) = self.requested.remove(&placement) else {
                continue;
            };
            if !receiver.accept(&delivery.identifier) {
                self.requested.insert(placement, receiver);
                continue;
            }
            changed = true;

            match &delivery.result {
                Ok(image) => {
                    let mut object = pool.acquire(image.kind);
                    object.rect = Rect {
                        x: placement.x,
                        y: placement.y,
                        width: placement.width,
                        height: placement.height,
                    };
                    object.alpha = u8::MAX;
                    object.identifier = Some(delivery.identifier.clone());
                    object.image = Some(image.clone());
                    self.placed.insert(placement, object);
                }
                Err(err) => {
                    log::debug!(target: "inline_image.placer", "omitting image slot: {err}");
                    if let Some(hook) = self.on_error.as_mut() {
                        hook(err);
                    }
                    self.failed.insert(placement);
                }
            }
        }
        changed
    }

    /// Hide every object and cancel every in-flight request.
    pub fn teardown<P: InlineImageProvider>(
        &mut self,
        repo: &mut ImageRepository<P>,
        pool: &mut ImagePool,
    ) {
        log::debug!(
            target: "inline_image.placer",
            "tearing down {} placed and {} requested images",
            self.placed.len(),
            self.requested.len()
        );
        for (_, object) in self.placed.drain() {
            pool.release(object);
        }
        for (_, receiver) in self.requested.drain() {
            if let Some(identifier) = receiver.expected() {
                repo.cancel(identifier, receiver.id());
            }
        }
        self.failed.clear();
        self.teardowns += 1;
    }

    pub fn placed(&self) -> impl Iterator<Item = &ImageObject> {
        self.placed.values()
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn teardown_count(&self) -> usize {
        self.teardowns
    }
}
