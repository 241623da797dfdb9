//! Dirty-widget tracking between the state machine and the renderer.

use crate::models::SLOTS_PER_PAGE;

/// A displayable element of the passphrase screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// Prompt text shown while the buffer is empty
    Prompt,
    /// Input field showing the buffer tail
    Input,
    /// Back / delete button
    Back,
    /// Confirm button
    Confirm,
    /// Page indicator strip
    PageIndicator,
    /// Key slot at a grid position
    Key(u8),
}

impl Widget {
    const fn bit(self) -> u32 {
        let index = match self {
            Self::Prompt => 0,
            Self::Input => 1,
            Self::Back => 2,
            Self::Confirm => 3,
            Self::PageIndicator => 4,
            Self::Key(position) => 5 + position as u32,
        };
        1 << index
    }

    /// Every widget on a page, in paint order.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Prompt,
            Self::Input,
            Self::Back,
            Self::Confirm,
            Self::PageIndicator,
        ]
        .into_iter()
        .chain(Self::keys())
    }

    /// The ten key widgets.
    pub fn keys() -> impl Iterator<Item = Self> {
        (0..SLOTS_PER_PAGE as u8).map(Self::Key)
    }
}

/// Set of widgets awaiting a redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtySet {
    bits: u32,
}

impl DirtySet {
    /// Empty set.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Set containing every widget, used for the first paint.
    pub fn all() -> Self {
        let mut set = Self::new();
        for widget in Widget::all() {
            set.mark(widget);
        }
        set
    }

    /// Flags `widget` for redraw.
    pub fn mark(&mut self, widget: Widget) {
        self.bits |= widget.bit();
    }

    /// Flags every key widget for redraw.
    pub fn mark_keys(&mut self) {
        for widget in Widget::keys() {
            self.mark(widget);
        }
    }

    /// Whether `widget` awaits a redraw.
    pub const fn contains(&self, widget: Widget) -> bool {
        self.bits & widget.bit() != 0
    }

    /// Whether every key widget awaits a redraw.
    pub fn contains_all_keys(&self) -> bool {
        Widget::keys().all(|widget| self.contains(widget))
    }

    /// Whether nothing needs drawing.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Dirty widgets in paint order.
    pub fn iter(&self) -> impl Iterator<Item = Widget> + '_ {
        Widget::all().filter(|widget| self.contains(*widget))
    }

    /// Returns the current set and leaves this one empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_contains() {
        let mut dirty = DirtySet::new();
        assert!(dirty.is_empty());

        dirty.mark(Widget::Input);
        dirty.mark(Widget::Key(9));

        assert!(dirty.contains(Widget::Input));
        assert!(dirty.contains(Widget::Key(9)));
        assert!(!dirty.contains(Widget::Key(0)));
        assert!(!dirty.contains(Widget::Prompt));
    }

    #[test]
    fn test_mark_keys() {
        let mut dirty = DirtySet::new();
        dirty.mark_keys();
        assert!(dirty.contains_all_keys());
        assert!(!dirty.contains(Widget::Back));
    }

    #[test]
    fn test_all_and_iter() {
        let dirty = DirtySet::all();
        assert_eq!(dirty.iter().count(), 15);
        assert_eq!(dirty.iter().next(), Some(Widget::Prompt));
    }

    #[test]
    fn test_take_clears() {
        let mut dirty = DirtySet::all();
        let taken = dirty.take();
        assert!(dirty.is_empty());
        assert!(!taken.is_empty());
    }
}
