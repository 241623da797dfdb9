//! Placement of the simulated device screen inside the terminal.
//!
//! The 240x240 logical screen is drawn as a 36x15 cell area (each grid
//! cell is 12 columns by 3 rows) framed by a border and centred in the
//! terminal. Terminal coordinates are converted back to logical ones for
//! hit-testing.

use ratatui::layout::Rect;

use crate::keyboard::geometry::{Area, Point, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Inner width of the device area in terminal columns.
pub const DEVICE_COLS: u16 = 36;
/// Inner height of the device area in terminal rows.
pub const DEVICE_ROWS: u16 = 15;

/// Outer rectangle (border included) of the device, centred in `terminal`.
pub fn device_frame(terminal: Rect) -> Rect {
    let width = (DEVICE_COLS + 2).min(terminal.width);
    let height = (DEVICE_ROWS + 2).min(terminal.height);
    Rect {
        x: terminal.x + (terminal.width - width) / 2,
        y: terminal.y + (terminal.height - height) / 2,
        width,
        height,
    }
}

/// Inner rectangle that maps onto the logical screen.
pub fn device_surface(terminal: Rect) -> Rect {
    let frame = device_frame(terminal);
    Rect {
        x: frame.x + 1,
        y: frame.y + 1,
        width: frame.width.saturating_sub(2),
        height: frame.height.saturating_sub(2),
    }
}

/// Converts a terminal cell to a logical point, if it lies on the surface.
pub fn to_logical(surface: Rect, column: u16, row: u16) -> Option<Point> {
    if surface.width == 0 || surface.height == 0 {
        return None;
    }
    if column < surface.x
        || row < surface.y
        || column >= surface.x + surface.width
        || row >= surface.y + surface.height
    {
        return None;
    }
    let x = u32::from(column - surface.x) * u32::from(SCREEN_WIDTH) / u32::from(surface.width);
    let y = u32::from(row - surface.y) * u32::from(SCREEN_HEIGHT) / u32::from(surface.height);
    Some(Point::new(x as u16, y as u16))
}

/// Terminal column for logical `x`, rounded to the nearest cell.
pub fn scale_x(surface: Rect, x: u16) -> u16 {
    let scaled = (u32::from(x) * u32::from(surface.width) + u32::from(SCREEN_WIDTH) / 2)
        / u32::from(SCREEN_WIDTH);
    surface.x + scaled as u16
}

/// Terminal rectangle covering logical `area`.
pub fn to_terminal(surface: Rect, area: Area) -> Rect {
    let scale = |value: u16, cells: u16, logical: u16| {
        (u32::from(value) * u32::from(cells) / u32::from(logical)) as u16
    };
    let x = scale(area.x, surface.width, SCREEN_WIDTH);
    let y = scale(area.y, surface.height, SCREEN_HEIGHT);
    let right = scale(area.x + area.width, surface.width, SCREEN_WIDTH);
    let bottom = scale(area.y + area.height, surface.height, SCREEN_HEIGHT);
    Rect {
        x: surface.x + x,
        y: surface.y + y,
        width: right - x,
        height: bottom - y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::geometry::{confirm_area, hit_test, key_area, Target};

    fn terminal() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_device_is_centered() {
        let frame = device_frame(terminal());
        assert_eq!(frame, Rect::new(21, 3, 38, 17));
        assert_eq!(device_surface(terminal()), Rect::new(22, 4, 36, 15));
    }

    #[test]
    fn test_key_area_maps_to_whole_cells() {
        let surface = device_surface(terminal());
        assert_eq!(to_terminal(surface, key_area(0)), Rect::new(22, 7, 12, 3));
        assert_eq!(to_terminal(surface, confirm_area()), Rect::new(46, 16, 12, 3));
    }

    #[test]
    fn test_every_key_cell_hits_its_key() {
        let surface = device_surface(terminal());
        for position in 0..10u8 {
            let rect = to_terminal(surface, key_area(position));
            for row in rect.y..rect.y + rect.height {
                for column in rect.x..rect.x + rect.width {
                    let point = to_logical(surface, column, row).unwrap();
                    assert_eq!(hit_test(point, 10), Some(Target::Key(position)));
                }
            }
        }
    }

    #[test]
    fn test_outside_surface() {
        let surface = device_surface(terminal());
        assert_eq!(to_logical(surface, 0, 0), None);
        assert_eq!(to_logical(surface, 58, 10), None);
    }

    #[test]
    fn test_scale_x_rounds() {
        let surface = device_surface(terminal());
        assert_eq!(scale_x(surface, 96), 22 + 14);
        assert_eq!(scale_x(surface, 132), 22 + 20);
    }
}
