use std::collections::HashMap;

use super::*;
use crate::provider::GraphicKind;

/// Records calls and holds responders until the test answers them.
#[derive(Default)]
struct ManualProvider {
    requests: Vec<ImageIdentifier>,
    cancels: Vec<(ImageIdentifier, Ticket)>,
    held: HashMap<ImageIdentifier, Responder>,
}

impl ManualProvider {
    fn answer(&mut self, identifier: &ImageIdentifier, image: InlineImage) {
        let responder = self
            .held
            .remove(identifier)
            .unwrap_or_else(|| panic!("no held request for {identifier}"));
        responder.send(image);
    }
}

impl InlineImageProvider for ManualProvider {
    fn request(&mut self, identifier: &ImageIdentifier, responder: Responder) {
        self.requests.push(identifier.clone());
        self.held.insert(identifier.clone(), responder);
    }

    fn cancel(&mut self, identifier: &ImageIdentifier, ticket: Ticket) {
        self.cancels.push((identifier.clone(), ticket));
        // Keep the responder alive so a late answer can still be sent.
    }
}

fn icon_image() -> InlineImage {
    InlineImage {
        width: 16,
        height: 16,
        kind: GraphicKind::Texture,
        region: None,
    }
}

#[test]
fn concurrent_requests_share_one_upstream_call() {
    let mut repo = ImageRepository::new(ManualProvider::default());
    let icon = ImageIdentifier::new("icon.png");
    let a = repo.allocate_receiver();
    let b = repo.allocate_receiver();
    assert_ne!(a, b);

    repo.request(&icon, a);
    repo.request(&icon, b);
    assert_eq!(repo.provider().requests, vec![icon.clone()]);
    assert_eq!(repo.waiter_count(&icon), 2);
    assert!(repo.pump().is_empty(), "nothing answered yet");

    repo.provider_mut().answer(&icon, icon_image());
    let deliveries = repo.pump();
    assert_eq!(deliveries.len(), 2, "got: {deliveries:?}");
    let receivers: Vec<_> = deliveries.iter().map(|d| d.receiver).collect();
    assert_eq!(receivers, vec![a, b]);
    assert!(deliveries.iter().all(|d| d.result == Ok(icon_image())));
    assert!(!repo.is_pending(&icon));
}

#[test]
fn cancelling_one_waiter_keeps_upstream_alive() {
    let mut repo = ImageRepository::new(ManualProvider::default());
    let icon = ImageIdentifier::new("icon.png");
    let a = repo.allocate_receiver();
    let b = repo.allocate_receiver();
    repo.request(&icon, a);
    repo.request(&icon, b);

    repo.cancel(&icon, a);
    assert!(repo.provider().cancels.is_empty());
    assert!(repo.is_pending(&icon));

    repo.provider_mut().answer(&icon, icon_image());
    let deliveries = repo.pump();
    assert_eq!(deliveries.len(), 1, "got: {deliveries:?}");
    assert_eq!(deliveries[0].receiver, b);
}

#[test]
fn cancelling_every_waiter_cancels_upstream() {
    let mut repo = ImageRepository::new(ManualProvider::default());
    let icon = ImageIdentifier::new("icon.png");
    let a = repo.allocate_receiver();
    let b = repo.allocate_receiver();
    repo.request(&icon, a);
    repo.request(&icon, b);

    repo.cancel(&icon, a);
    repo.cancel(&icon, b);
    assert_eq!(repo.provider().cancels, vec![(icon.clone(), Ticket(1))]);
    assert!(!repo.is_pending(&icon));

    // A late answer for the cancelled ticket goes nowhere.
    repo.provider_mut().answer(&icon, icon_image());
    assert!(repo.pump().is_empty());
}

#[test]
fn late_answer_for_old_ticket_does_not_satisfy_new_request() {
    let mut repo = ImageRepository::new(ManualProvider::default());
    let icon = ImageIdentifier::new("icon.png");
    let a = repo.allocate_receiver();
    repo.request(&icon, a);
    repo.cancel(&icon, a);
    let stale = repo
        .provider_mut()
        .held
        .remove(&icon)
        .expect("first request is held");

    repo.request(&icon, a);
    assert_eq!(repo.provider().requests.len(), 2);
    stale.send(icon_image());
    assert!(repo.pump().is_empty());

    repo.provider_mut().answer(&icon, icon_image());
    assert_eq!(repo.pump().len(), 1);
}

#[test]
fn cancel_after_resolution_is_a_no_op() {
    let mut repo = ImageRepository::new(ManualProvider::default());
    let icon = ImageIdentifier::new("icon.png");
    let a = repo.allocate_receiver();
    repo.request(&icon, a);
    repo.provider_mut().answer(&icon, icon_image());
    assert_eq!(repo.pump().len(), 1);

    repo.cancel(&icon, a);
    assert!(repo.provider().cancels.is_empty());
}

#[test]
fn errors_and_dropped_responders_fan_out_as_errors() {
    let mut repo = ImageRepository::new(ManualProvider::default());
    let broken = ImageIdentifier::new("broken.png");
    let lost = ImageIdentifier::new("lost.png");
    let a = repo.allocate_receiver();
    repo.request(&broken, a);
    repo.request(&lost, a);

    let responder = repo
        .provider_mut()
        .held
        .remove(&broken)
        .expect("broken is held");
    responder.send_error("no such file");
    drop(repo.provider_mut().held.remove(&lost));

    let mut deliveries = repo.pump();
    deliveries.sort_by(|x, y| x.identifier.cmp(&y.identifier));
    assert_eq!(deliveries.len(), 2, "got: {deliveries:?}");
    assert_eq!(
        deliveries[0].result,
        Err(ImageError::Provider {
            identifier: "broken.png".to_string(),
            message: "no such file".to_string(),
        })
    );
    assert_eq!(
        deliveries[1].result,
        Err(ImageError::Abandoned {
            identifier: "lost.png".to_string(),
        })
    );
}
