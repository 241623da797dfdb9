//! Terminal input driver: turns crossterm events into touches and swipes.
//!
//! A mouse click counts as a touch when the button is released, like a
//! button on the device firing on touch-end.
//!
//! The driver runs on its own thread and feeds the keyboard's input
//! channels. It stops when the user quits (dropping the senders, which ends
//! the session as cancelled) or when the session drops the receivers.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

use super::surface::{device_surface, to_logical};
use crate::keyboard::geometry::{back_area, confirm_area, key_area};
use crate::keyboard::{InputSenders, Point, SwipeDirection};

/// Horizontal drag distance, in terminal columns, that completes a swipe.
pub const SWIPE_THRESHOLD: u16 = 6;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What a terminal event means for the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverAction {
    /// Touch at a logical point
    Touch(Point),
    /// Completed swipe
    Swipe(SwipeDirection),
    /// Stop feeding input
    Quit,
}

/// Turns one mouse press-drag-release gesture into a tap or a swipe.
///
/// A press only records where it started. Once a drag crosses the threshold
/// the gesture is latched as a swipe until the button is released, so a long
/// drag never yields a second swipe and a swipe never types. A release
/// without a swipe is a tap at the press point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwipeTracker {
    origin: Option<u16>,
    press_point: Option<Point>,
    fired: bool,
}

impl SwipeTracker {
    /// Starts a gesture at `column`; `point` is the logical press position,
    /// `None` when the press was off the device screen.
    pub fn press(&mut self, column: u16, point: Option<Point>) {
        self.origin = Some(column);
        self.press_point = point;
        self.fired = false;
    }

    /// Reports the drag position; returns a swipe the first time the
    /// threshold is crossed.
    pub fn drag(&mut self, column: u16) -> Option<SwipeDirection> {
        let origin = self.origin?;
        if self.fired {
            return None;
        }
        let direction = if column + SWIPE_THRESHOLD <= origin {
            SwipeDirection::Left
        } else if column >= origin + SWIPE_THRESHOLD {
            SwipeDirection::Right
        } else {
            return None;
        };
        self.fired = true;
        Some(direction)
    }

    /// Ends the gesture. Returns the press point when it was a tap.
    pub fn release(&mut self) -> Option<Point> {
        let tap = if self.fired { None } else { self.press_point };
        *self = Self::default();
        tap
    }
}

/// Keyboard shortcut for a key slot, laid out like a phone keypad.
fn digit_slot(c: char) -> Option<u8> {
    match c {
        '1'..='9' => c.to_digit(10).map(|d| d as u8 - 1),
        '0' => Some(9),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<DriverAction> {
    if key.kind != event::KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(DriverAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(DriverAction::Quit)
        }
        KeyCode::Enter => Some(DriverAction::Touch(confirm_area().center())),
        KeyCode::Backspace => Some(DriverAction::Touch(back_area().center())),
        KeyCode::Left => Some(DriverAction::Swipe(SwipeDirection::Right)),
        KeyCode::Right => Some(DriverAction::Swipe(SwipeDirection::Left)),
        KeyCode::Char(c) => digit_slot(c).map(|slot| DriverAction::Touch(key_area(slot).center())),
        _ => None,
    }
}

/// Maps one terminal event, given the device surface, to a driver action.
pub fn translate(event: &Event, surface: Rect, tracker: &mut SwipeTracker) -> Option<DriverAction> {
    match event {
        Event::Key(key) => translate_key(*key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                tracker.press(mouse.column, to_logical(surface, mouse.column, mouse.row));
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                tracker.drag(mouse.column).map(DriverAction::Swipe)
            }
            MouseEventKind::Up(MouseButton::Left) => tracker.release().map(DriverAction::Touch),
            _ => None,
        },
        _ => None,
    }
}

/// Starts the input thread feeding `senders`.
pub fn spawn_input_driver(senders: InputSenders) -> JoinHandle<Result<()>> {
    thread::spawn(move || run_input_driver(&senders))
}

fn run_input_driver(senders: &InputSenders) -> Result<()> {
    let mut tracker = SwipeTracker::default();

    while !senders.touch.is_closed() {
        if !event::poll(POLL_INTERVAL).context("Failed to poll terminal events")? {
            continue;
        }
        let event = event::read().context("Failed to read terminal event")?;
        let (width, height) = crossterm::terminal::size().context("Failed to query terminal size")?;
        let surface = device_surface(Rect::new(0, 0, width, height));

        let delivered = match translate(&event, surface, &mut tracker) {
            Some(DriverAction::Touch(point)) => senders.touch.blocking_send(point).is_ok(),
            Some(DriverAction::Swipe(direction)) => {
                debug!(?direction, "Swipe recognised");
                senders.swipe.blocking_send(direction).is_ok()
            }
            Some(DriverAction::Quit) => {
                debug!("Quit requested from terminal");
                false
            }
            None => true,
        };

        if !delivered {
            break;
        }
    }

    Ok(())
}
