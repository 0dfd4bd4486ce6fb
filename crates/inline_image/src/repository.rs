use std::collections::HashMap;
use std::sync::mpsc;

use core_types::ReceiverId;

use crate::error::ImageError;
use crate::identifier::ImageIdentifier;
use crate::provider::{InlineImage, InlineImageProvider, Responder, Response, Ticket};

/// One resolved request, addressed to a single waiting receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub receiver: ReceiverId,
    pub identifier: ImageIdentifier,
    pub result: Result<InlineImage, ImageError>,
}

struct Pending {
    ticket: Ticket,
    waiters: Vec<ReceiverId>,
}

/// De-duplicating layer in front of a provider.
///
/// Concurrent requests for one identifier share a single upstream request;
/// its answer fans out to every receiver still waiting. When the last waiter
/// cancels, the upstream request is cancelled too.
pub struct ImageRepository<P> {
    provider: P,
    pending: HashMap<ImageIdentifier, Pending>,
    next_ticket: u64,
    next_receiver: u64,
    response_rx: mpsc::Receiver<Response>,
    response_tx: mpsc::Sender<Response>,
}

impl<P: InlineImageProvider> ImageRepository<P> {
    pub fn new(provider: P) -> Self {
        let (response_tx, response_rx) = mpsc::channel();
        Self {
            provider,
            pending: HashMap::new(),
            next_ticket: 1,
            next_receiver: 1,
            response_rx,
            response_tx,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Fresh receiver id, unique within this repository.
    pub fn allocate_receiver(&mut self) -> ReceiverId {
        ReceiverId::next(&mut self.next_receiver)
    }

    pub fn is_pending(&self, identifier: &ImageIdentifier) -> bool {
        self.pending.contains_key(identifier)
    }

    pub fn waiter_count(&self, identifier: &ImageIdentifier) -> usize {
        self.pending.get(identifier).map_or(0, |p| p.waiters.len())
    }

    /// Register `receiver` as waiting on `identifier`. Only the first waiter
    /// of an identifier reaches the provider.
    pub fn request(&mut self, identifier: &ImageIdentifier, receiver: ReceiverId) {
        if let Some(pending) = self.pending.get_mut(identifier) {
            if !pending.waiters.contains(&receiver) {
                pending.waiters.push(receiver);
            }
            log::trace!(
                target: "inline_image.repository",
                "joined in-flight request for {identifier} ({} waiters)",
                pending.waiters.len()
            );
            return;
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.pending.insert(
            identifier.clone(),
            Pending {
                ticket,
                waiters: vec![receiver],
            },
        );
        log::debug!(
            target: "inline_image.repository",
            "requesting {identifier} upstream as {ticket:?}"
        );
        let responder = Responder::new(identifier.clone(), ticket, self.response_tx.clone());
        self.provider.request(identifier, responder);
    }

    /// Stop waiting. Cancelling an identifier that already resolved, or a
    /// receiver that never asked, is a no-op.
    pub fn cancel(&mut self, identifier: &ImageIdentifier, receiver: ReceiverId) {
        let Some(pending) = self.pending.get_mut(identifier) else {
            return;
        };
        pending.waiters.retain(|w| *w != receiver);
        if !pending.waiters.is_empty() {
            return;
        }
        let ticket = pending.ticket;
        self.pending.remove(identifier);
        log::debug!(
            target: "inline_image.repository",
            "last waiter left; cancelling {identifier} ({ticket:?})"
        );
        self.provider.cancel(identifier, ticket);
    }

    /// Drain provider answers and fan each out to its waiters. Answers for
    /// cancelled requests are dropped.
    pub fn pump(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        while let Ok(response) = self.response_rx.try_recv() {
            let current = self
                .pending
                .get(&response.identifier)
                .is_some_and(|p| p.ticket == response.ticket);
            if !current {
                log::debug!(
                    target: "inline_image.repository",
                    "dropping answer for {} ({:?}); nobody is waiting",
                    response.identifier,
                    response.ticket
                );
                continue;
            }
            let Some(pending) = self.pending.remove(&response.identifier) else {
                continue;
            };
            if let Err(err) = &response.result {
                log::debug!(target: "inline_image.repository", "{err}");
            }
            deliveries.extend(pending.waiters.into_iter().map(|receiver| Delivery {
                receiver,
                identifier: response.identifier.clone(),
                result: response.result.clone(),
            }));
        }
        deliveries
    }
}

#[cfg(test)]
mod tests;
