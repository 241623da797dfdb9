//! Editable passphrase buffer with multi-tap pending state.

use zeroize::Zeroizing;

use super::layout::{KeySlot, SlotId};

/// The slot whose candidate is currently shown as the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    /// Slot that is being cycled
    pub slot: SlotId,
    /// Offset of the shown candidate
    pub index: usize,
}

/// Committed text plus the transient pending character.
///
/// While `pending` is set, the last character of `text` is the candidate at
/// `pending.index` of the pending slot. The buffer is wiped on drop.
#[derive(Debug, Default)]
pub struct EditableField {
    text: Zeroizing<String>,
    pending: Option<Pending>,
}

impl EditableField {
    /// Creates an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents, including a pending character.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The pending slot and candidate, if any.
    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Whether the last character is still open for cycling.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies one activation of `slot`.
    ///
    /// Re-activating the pending slot replaces the last character with the
    /// next candidate. Any other slot appends its first candidate and becomes
    /// pending only if it has more than one.
    pub fn append_or_cycle(&mut self, id: SlotId, slot: &KeySlot) {
        let count = slot.candidate_count();

        match self.pending {
            Some(pending) if pending.slot == id => {
                let index = (pending.index + 1) % count;
                self.text.pop();
                self.text.push(slot.candidate(index));
                self.pending = Some(Pending { slot: id, index });
            }
            _ => {
                self.text.push(slot.candidate(0));
                self.pending = (count > 1).then_some(Pending { slot: id, index: 0 });
            }
        }
    }

    /// Fixes the pending character. The text is left untouched.
    pub fn commit_pending(&mut self) {
        self.pending = None;
    }

    /// Removes the last character.
    ///
    /// Returns `false` on an empty buffer, which callers treat as a request
    /// to cancel.
    pub fn backspace(&mut self) -> bool {
        if self.text.pop().is_some() {
            self.commit_pending();
            true
        } else {
            false
        }
    }

    /// Moves the buffer out, leaving the field empty.
    pub fn take_text(&mut self) -> String {
        self.pending = None;
        std::mem::take(&mut *self.text)
    }
}
