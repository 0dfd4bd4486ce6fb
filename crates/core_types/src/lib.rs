pub type FrameId = u64;

/// Identifies a text view registered with a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

/// Identifies a font (and therefore a glyph atlas) shared by many views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u32);

/// Identifies one party waiting on an inline image response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiverId(pub u64);

impl ReceiverId {
    pub fn next(v: &mut u64) -> Self {
        let id = *v;
        *v = v.wrapping_add(1).max(1);
        Self(id.max(1))
    }
}
