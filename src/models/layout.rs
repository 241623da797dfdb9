//! Keyboard layout data: pages of ten key slots.
//!
//! A [`KeyLayout`] is built once at startup and never changes afterwards.
//! Slot order inside a page is render order, not a lookup key; a slot is
//! identified structurally by its [`SlotId`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Number of key slots on every page.
pub const SLOTS_PER_PAGE: usize = 10;

/// Character appended by a [`KeySlot::Blank`] slot.
pub const SPACE: char = ' ';

/// One grid position on a keyboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeySlot {
    /// Appends a single character.
    Literal(char),
    /// Cycles through the candidates on repeated activation.
    MultiTap(Vec<char>),
    /// Appends a space.
    Blank,
}

impl KeySlot {
    /// Creates a multi-tap slot from the characters of `candidates`.
    pub fn multi_tap(candidates: &str) -> Self {
        Self::MultiTap(candidates.chars().collect())
    }

    /// Number of characters this slot cycles through.
    pub fn candidate_count(&self) -> usize {
        match self {
            Self::Literal(_) | Self::Blank => 1,
            Self::MultiTap(chars) => chars.len(),
        }
    }

    /// Candidate at `index`, wrapping around the candidate count.
    ///
    /// A multi-tap slot without candidates is rejected by [`KeyLayout::new`],
    /// so every slot reachable from a session has at least one.
    pub fn candidate(&self, index: usize) -> char {
        match self {
            Self::Literal(c) => *c,
            Self::Blank => SPACE,
            Self::MultiTap(chars) => chars
                .get(index % chars.len().max(1))
                .copied()
                .unwrap_or(SPACE),
        }
    }

    /// Text shown on the key face.
    pub fn label(&self) -> String {
        match self {
            Self::Literal(c) => c.to_string(),
            Self::MultiTap(chars) => chars.iter().collect(),
            Self::Blank => "␣".to_string(),
        }
    }
}

impl TryFrom<String> for KeySlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let chars: Vec<char> = value.chars().collect();
        match chars.as_slice() {
            [] | [SPACE] => Ok(Self::Blank),
            [c] if c.is_control() => Err(format!("control character {c:?} cannot be a key")),
            [c] => Ok(Self::Literal(*c)),
            many => {
                if let Some(c) = many.iter().find(|c| c.is_control()) {
                    return Err(format!("control character {c:?} cannot be a key"));
                }
                Ok(Self::MultiTap(many.to_vec()))
            }
        }
    }
}

impl From<KeySlot> for String {
    fn from(slot: KeySlot) -> Self {
        match slot {
            KeySlot::Literal(c) => c.to_string(),
            KeySlot::MultiTap(chars) => chars.into_iter().collect(),
            KeySlot::Blank => SPACE.to_string(),
        }
    }
}

/// Ten slots rendered as one keyboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    slots: [KeySlot; SLOTS_PER_PAGE],
}

impl Page {
    /// Creates a page from exactly ten slots.
    pub const fn new(slots: [KeySlot; SLOTS_PER_PAGE]) -> Self {
        Self { slots }
    }

    /// Builds a page from slot strings using the same rules as layout files.
    fn from_labels(labels: [&str; SLOTS_PER_PAGE]) -> Self {
        Self::new(labels.map(|label| {
            KeySlot::try_from(label.to_string()).unwrap_or(KeySlot::Blank)
        }))
    }

    /// Slot at `position`, if the position is on the grid.
    pub fn slot(&self, position: u8) -> Option<&KeySlot> {
        self.slots.get(usize::from(position))
    }

    /// All slots in render order.
    pub fn slots(&self) -> &[KeySlot] {
        &self.slots
    }
}

/// Structural identity of a slot: page index plus grid position.
///
/// Two slots offering the same characters on different pages or positions
/// are different keys for multi-tap purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    /// Page the slot lives on
    pub page: usize,
    /// Grid position within the page (0-9)
    pub position: u8,
}

impl SlotId {
    /// Creates a new slot identity.
    pub const fn new(page: usize, position: u8) -> Self {
        Self { page, position }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page, self.position)
    }
}

/// The ordered set of keyboard pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLayout {
    pages: Vec<Page>,
}

impl KeyLayout {
    /// Creates a validated layout.
    ///
    /// # Errors
    ///
    /// Fails when there are no pages or when a multi-tap slot has no
    /// candidates.
    pub fn new(pages: Vec<Page>) -> Result<Self> {
        let layout = Self { pages };
        layout.validate()?;
        Ok(layout)
    }

    /// The four-page layout used when no layout file is configured:
    /// digits, lowercase, uppercase and symbols.
    pub fn standard() -> Self {
        Self {
            pages: vec![
                Page::from_labels(["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]),
                Page::from_labels([
                    " ", "abc", "def", "ghi", "jkl", "mno", "pqrs", "tuv", "wxyz", "*#",
                ]),
                Page::from_labels([
                    " ", "ABC", "DEF", "GHI", "JKL", "MNO", "PQRS", "TUV", "WXYZ", "*#",
                ]),
                Page::from_labels([
                    "_<>", ".:@", "/|\\", "!()", "+%&", "-[]", "?{}", ",'`", ";\"~", "$^=",
                ]),
            ],
        }
    }

    /// Parses and validates a layout from TOML text.
    ///
    /// ```toml
    /// pages = [
    ///     ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"],
    ///     [" ", "abc", "def", "ghi", "jkl", "mno", "pqrs", "tuv", "wxyz", "*#"],
    /// ]
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let layout: Self = toml::from_str(content)
            .context("Failed to parse keyboard layout (every page needs exactly 10 keys)")?;
        layout.validate()?;
        Ok(layout)
    }

    /// Loads a layout file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read layout file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .context(format!("Invalid layout file: {}", path.display()))
    }

    /// Checks the structural rules every layout must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            anyhow::bail!("Keyboard layout must contain at least one page");
        }

        for (page_index, page) in self.pages.iter().enumerate() {
            for (position, slot) in page.slots.iter().enumerate() {
                if slot.candidate_count() == 0 {
                    anyhow::bail!(
                        "Multi-tap key {position} on page {page_index} has no characters"
                    );
                }
            }
        }

        Ok(())
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page at `index`.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Resolves a slot by its structural identity.
    pub fn slot(&self, id: SlotId) -> Option<&KeySlot> {
        self.page(id.page)?.slot(id.position)
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::standard()
    }
}
