//! Screen grid and touch hit-testing.
//!
//! The device screen is a 240x240 logical surface divided into a 3x5 grid.
//! Row 0 holds the prompt/input field; rows 1-4 hold the ten key slots plus
//! the back and confirm buttons:
//!
//! ```text
//! +---------+---------+---------+
//! |        input / prompt       |
//! +---------+---------+---------+
//! |  key 0  |  key 1  |  key 2  |
//! |  key 3  |  key 4  |  key 5  |
//! |  key 6  |  key 7  |  key 8  |
//! |  back   |  key 9  | confirm |
//! +---------+---------+---------+
//! ```

/// Logical screen width.
pub const SCREEN_WIDTH: u16 = 240;
/// Logical screen height.
pub const SCREEN_HEIGHT: u16 = 240;
/// Grid columns.
pub const GRID_COLS: u16 = 3;
/// Grid rows.
pub const GRID_ROWS: u16 = 5;

const CELL_WIDTH: u16 = SCREEN_WIDTH / GRID_COLS;
const CELL_HEIGHT: u16 = SCREEN_HEIGHT / GRID_ROWS;

const BACK_CELL: u16 = 12;
const CONFIRM_CELL: u16 = 14;

/// A touch coordinate on the logical screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal offset from the left edge
    pub x: u16,
    /// Vertical offset from the top edge
    pub y: u16,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle on the logical screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    /// Left edge
    pub x: u16,
    /// Top edge
    pub y: u16,
    /// Width
    pub width: u16,
    /// Height
    pub height: u16,
}

impl Area {
    /// Whether `point` lies inside this area (right and bottom edges excluded).
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Centre of the area, handy for synthesising touches.
    pub const fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2,
            y: self.y + self.height / 2,
        }
    }
}

/// What a touch landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Key slot at the given grid position
    Key(u8),
    /// Back / delete button
    Back,
    /// Confirm button
    Confirm,
}

/// Area of grid cell `index`, counted row-major from the top left.
pub const fn grid_cell(index: u16) -> Area {
    Area {
        x: (index % GRID_COLS) * CELL_WIDTH,
        y: (index / GRID_COLS) * CELL_HEIGHT,
        width: CELL_WIDTH,
        height: CELL_HEIGHT,
    }
}

/// Area of the input field and prompt (the whole first grid row).
pub const fn input_area() -> Area {
    Area {
        x: 0,
        y: 0,
        width: SCREEN_WIDTH,
        height: CELL_HEIGHT,
    }
}

/// Area of key slot `position`. Slot 9 sits in the middle of the bottom row.
pub const fn key_area(position: u8) -> Area {
    let index = if position == 9 { 10 } else { position as u16 };
    grid_cell(index + 3)
}

/// Area of the back button.
pub const fn back_area() -> Area {
    grid_cell(BACK_CELL)
}

/// Area of the confirm button.
pub const fn confirm_area() -> Area {
    grid_cell(CONFIRM_CELL)
}

/// Resolves a touch to the control under it.
///
/// Touches on the input field or outside the screen hit nothing.
pub fn hit_test(point: Point, slot_count: usize) -> Option<Target> {
    if back_area().contains(point) {
        return Some(Target::Back);
    }
    if confirm_area().contains(point) {
        return Some(Target::Confirm);
    }
    (0..slot_count)
        .filter_map(|position| u8::try_from(position).ok())
        .find(|&position| key_area(position).contains(point))
        .map(Target::Key)
}
