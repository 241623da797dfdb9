//! Terminal front-end for the passphrase keyboard.
//!
//! The simulated device screen is painted with Ratatui; mouse clicks become
//! touches, horizontal drags and arrow keys become swipes.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

pub mod input;
pub mod screen;
pub mod surface;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::warn;

use crate::constants::INPUT_QUEUE_CAPACITY;
use crate::keyboard::{InputSources, PassphraseKeyboard, SessionOptions};
use crate::models::{KeyLayout, Outcome};

pub use input::{spawn_input_driver, SwipeTracker};
pub use screen::TerminalRenderer;
pub use theme::Theme;

/// Setup terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Shows the passphrase screen in the terminal until the user confirms or
/// cancels.
///
/// The terminal is restored before returning, including on error.
pub fn run_passphrase_screen(
    layout: &KeyLayout,
    options: SessionOptions,
    theme: Theme,
) -> Result<Outcome> {
    let keyboard = PassphraseKeyboard::new(layout, options)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start event loop runtime")?;

    let mut terminal = setup_terminal()?;
    let (senders, mut sources) = InputSources::channel(INPUT_QUEUE_CAPACITY);
    let driver = spawn_input_driver(senders);

    let result = {
        let mut renderer = TerminalRenderer::new(&mut terminal, theme);
        runtime.block_on(keyboard.run(&mut sources, &mut renderer))
    };

    // Closing the receivers stops the input thread.
    drop(sources);
    let restored = restore_terminal(terminal);

    match driver.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Terminal input failed: {e:#}"),
        Err(_) => warn!("Terminal input thread panicked"),
    }

    let outcome = result?;
    restored?;
    Ok(outcome)
}
