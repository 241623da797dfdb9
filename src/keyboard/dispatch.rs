//! Key slot activation to buffer edits.

use crate::models::{EditableField, KeyLayout, SlotId};

/// Maps "slot activated on the displayed page" to one multi-tap edit.
///
/// Slots are tracked by [`SlotId`], never by the characters they carry.
#[derive(Debug, Clone, Copy)]
pub struct KeyDispatcher<'a> {
    layout: &'a KeyLayout,
}

impl<'a> KeyDispatcher<'a> {
    /// Creates a dispatcher over `layout`.
    pub const fn new(layout: &'a KeyLayout) -> Self {
        Self { layout }
    }

    /// Applies an activation of `position` on `page` to `field`.
    ///
    /// Returns the activated slot, or `None` when the position does not name
    /// a slot (the field is left alone).
    pub fn dispatch(&self, field: &mut EditableField, page: usize, position: u8) -> Option<SlotId> {
        let id = SlotId::new(page, position);
        let slot = self.layout.slot(id)?;
        field.append_or_cycle(id, slot);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_cycles_multi_tap() {
        let layout = KeyLayout::standard();
        let dispatcher = KeyDispatcher::new(&layout);
        let mut field = EditableField::new();

        for _ in 0..3 {
            dispatcher.dispatch(&mut field, 1, 1);
        }
        assert_eq!(field.text(), "c");
    }

    #[test]
    fn test_same_position_on_other_page_is_a_new_slot() {
        let layout = KeyLayout::standard();
        let dispatcher = KeyDispatcher::new(&layout);
        let mut field = EditableField::new();

        dispatcher.dispatch(&mut field, 1, 9);
        dispatcher.dispatch(&mut field, 2, 9);

        assert_eq!(field.text(), "**");
        assert_eq!(field.pending().map(|p| p.slot), Some(SlotId::new(2, 9)));
    }

    #[test]
    fn test_unknown_slot_is_noop() {
        let layout = KeyLayout::standard();
        let dispatcher = KeyDispatcher::new(&layout);
        let mut field = EditableField::new();

        assert_eq!(dispatcher.dispatch(&mut field, 1, 10), None);
        assert_eq!(dispatcher.dispatch(&mut field, 7, 0), None);
        assert!(field.is_empty());
    }
}
