use core_types::ReceiverId;

use crate::identifier::ImageIdentifier;

/// Per-slot guard that accepts only the first response for the identifier it
/// is currently waiting on.
#[derive(Clone, Debug)]
pub struct ImageReceiver {
    id: ReceiverId,
    expected: Option<ImageIdentifier>,
    answered: bool,
}

impl ImageReceiver {
    pub fn new(id: ReceiverId) -> Self {
        Self {
            id,
            expected: None,
            answered: false,
        }
    }

    pub fn id(&self) -> ReceiverId {
        self.id
    }

    pub fn expected(&self) -> Option<&ImageIdentifier> {
        self.expected.as_ref()
    }

    pub fn is_waiting(&self) -> bool {
        self.expected.is_some() && !self.answered
    }

    /// Start waiting for `identifier`, forgetting any earlier expectation.
    pub fn expect(&mut self, identifier: ImageIdentifier) {
        self.expected = Some(identifier);
        self.answered = false;
    }

    /// Whether a response for `identifier` should be used. Stale and
    /// duplicate responses are logged and refused.
    pub fn accept(&mut self, identifier: &ImageIdentifier) -> bool {
        if self.expected.as_ref() != Some(identifier) {
            log::warn!(
                target: "inline_image.receiver",
                "receiver {:?} ignoring response for {identifier} (expecting {:?})",
                self.id,
                self.expected.as_ref().map(ToString::to_string)
            );
            return false;
        }
        if self.answered {
            log::warn!(
                target: "inline_image.receiver",
                "receiver {:?} ignoring duplicate response for {identifier}",
                self.id
            );
            return false;
        }
        self.answered = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_first_matching_response_only() {
        let mut receiver = ImageReceiver::new(ReceiverId(1));
        let icon = ImageIdentifier::new("icon.png");
        assert!(!receiver.accept(&icon), "nothing expected yet");

        receiver.expect(icon.clone());
        assert!(receiver.is_waiting());
        assert!(!receiver.accept(&ImageIdentifier::new("other.png")));
        assert!(receiver.accept(&icon));
        assert!(!receiver.accept(&icon), "second response must be refused");
        assert!(!receiver.is_waiting());
    }

    #[test]
    fn expect_rearms_the_receiver() {
        let mut receiver = ImageReceiver::new(ReceiverId(7));
        let a = ImageIdentifier::new("a.png");
        let b = ImageIdentifier::new("b.png");
        receiver.expect(a.clone());
        assert!(receiver.accept(&a));
        receiver.expect(b.clone());
        assert!(!receiver.accept(&a), "stale identifier");
        assert!(receiver.accept(&b));
    }
}
