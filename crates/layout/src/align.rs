use crate::options::{Alignment, VerticalAlignment};

/// Horizontal offset for a line and the extra advance given to each inner
/// space when justifying.
///
/// Justification only applies to lines that wrapped automatically and have
/// inner spaces; otherwise such lines stay left aligned.
pub(crate) fn line_offset(
    alignment: Alignment,
    free_space: f32,
    justifiable: bool,
    num_spaces: usize,
) -> (f32, f32) {
    if !free_space.is_finite() || free_space <= 0.0 {
        return (0.0, 0.0);
    }
    match alignment {
        Alignment::Left => (0.0, 0.0),
        Alignment::Center => (free_space * 0.5, 0.0),
        Alignment::Right => (free_space, 0.0),
        Alignment::Justify => {
            if !justifiable || num_spaces == 0 {
                return (0.0, 0.0);
            }
            (0.0, free_space / num_spaces as f32)
        }
    }
}

/// Vertical shift of the whole block inside the available height.
pub(crate) fn block_offset(alignment: VerticalAlignment, available: f32, content: f32) -> f32 {
    if available <= 0.0 {
        return 0.0;
    }
    let free = (available - content).max(0.0);
    match alignment {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Middle => free * 0.5,
        VerticalAlignment::Bottom => free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_offsets() {
        assert_eq!(line_offset(Alignment::Left, 40.0, true, 2), (0.0, 0.0));
        assert_eq!(line_offset(Alignment::Center, 40.0, true, 2), (20.0, 0.0));
        assert_eq!(line_offset(Alignment::Right, 40.0, false, 0), (40.0, 0.0));
        assert_eq!(line_offset(Alignment::Justify, 40.0, true, 4), (0.0, 10.0));
    }

    #[test]
    fn justify_skips_final_lines_and_lines_without_spaces() {
        assert_eq!(line_offset(Alignment::Justify, 40.0, false, 4), (0.0, 0.0));
        assert_eq!(line_offset(Alignment::Justify, 40.0, true, 0), (0.0, 0.0));
    }

    #[test]
    fn overflowing_or_unbounded_lines_are_not_shifted() {
        assert_eq!(line_offset(Alignment::Right, -5.0, true, 1), (0.0, 0.0));
        assert_eq!(line_offset(Alignment::Center, f32::INFINITY, true, 1), (0.0, 0.0));
    }

    #[test]
    fn vertical_alignment_uses_free_space() {
        assert_eq!(block_offset(VerticalAlignment::Top, 100.0, 40.0), 0.0);
        assert_eq!(block_offset(VerticalAlignment::Middle, 100.0, 40.0), 30.0);
        assert_eq!(block_offset(VerticalAlignment::Bottom, 100.0, 40.0), 60.0);
        assert_eq!(block_offset(VerticalAlignment::Bottom, 0.0, 40.0), 0.0);
    }
}
