//! Render data handed to the display collaborator.
//!
//! Everything here is derived from the session state; the renderer redraws
//! each dirty widget from these values alone.

use zeroize::Zeroizing;

use super::geometry::{key_area, Area, SCREEN_WIDTH};
use crate::models::Page;

/// Vertical offset of the page indicator strip.
pub const INDICATOR_Y: u16 = 44;
/// Diameter of a page indicator dot.
pub const INDICATOR_DOT_SIZE: u16 = 8;
const INDICATOR_PADDING: u16 = 12;

/// A key slot widget on the displayed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyButton {
    /// Grid position (0-9)
    pub position: u8,
    /// Text on the key face
    pub label: String,
    /// Touch and paint area
    pub area: Area,
}

/// Builds the ten key widgets for `page`.
pub fn key_buttons(page: &Page) -> Vec<KeyButton> {
    page.slots()
        .iter()
        .enumerate()
        .filter_map(|(position, slot)| {
            let position = u8::try_from(position).ok()?;
            Some(KeyButton {
                position,
                label: slot.label(),
                area: key_area(position),
            })
        })
        .collect()
}

/// Visible part of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    /// Buffer tail, prefixed with `<` when truncated; wiped on drop
    pub text: Zeroizing<String>,
    /// Draw the pending marker under the last character instead of a cursor
    pub pending: bool,
}

impl InputView {
    /// Builds the view of `text`, or `None` when the prompt should show.
    pub fn new(text: &str, pending: bool, max_len: usize) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: display_tail(text, max_len),
            pending,
        })
    }
}

/// Right-aligns long input: keeps the last `max_len` characters behind a `<`.
pub fn display_tail(text: &str, max_len: usize) -> Zeroizing<String> {
    let skip = text.chars().count().saturating_sub(max_len);
    // Sized up front so the buffer never reallocates and leaves a copy behind
    let mut tail = Zeroizing::new(String::with_capacity(text.len() + 1));
    if skip > 0 {
        tail.push('<');
    }
    tail.extend(text.chars().skip(skip));
    tail
}

/// Horizontal offsets of the page indicator dots, one per page.
///
/// Dots are spaced 12 apart and centred; if they would not fit the screen
/// the spacing shrinks to `240 / page_count`.
pub fn indicator_dots(page_count: usize) -> Vec<u16> {
    let count = u16::try_from(page_count).unwrap_or(u16::MAX);
    if count == 0 {
        return Vec::new();
    }
    let padding = if count.saturating_mul(INDICATOR_PADDING) > SCREEN_WIDTH {
        SCREEN_WIDTH / count
    } else {
        INDICATOR_PADDING
    };
    let start = (SCREEN_WIDTH / 2).saturating_sub((count / 2) * padding);

    (0..count).map(|i| start + i * padding).collect()
}

/// Snapshot of everything the renderer may draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView<'a> {
    /// Prompt shown in place of an empty buffer
    pub prompt: &'a str,
    /// Buffer view, `None` while the buffer is empty
    pub input: Option<InputView>,
    /// Back button in delete style (`false`: cancel style)
    pub back_enabled: bool,
    /// Displayed page index
    pub page: usize,
    /// Number of pages
    pub page_count: usize,
    /// Key widgets of the displayed page
    pub keys: &'a [KeyButton],
}
