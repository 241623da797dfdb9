//! Application-wide constants.
//!
//! This module defines the application name and the defaults used when no
//! configuration file overrides them.

use std::time::Duration;

/// The display name of the application.
pub const APP_NAME: &str = "Passpad";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "passpad";

/// Prompt shown while the buffer is empty.
pub const DEFAULT_PROMPT: &str = "Enter passphrase";

/// Page shown first: the lowercase letters of the standard layout.
pub const DEFAULT_INITIAL_PAGE: usize = 1;

/// How long a multi-tap character stays open for cycling.
pub const DEFAULT_PENDING_TIMEOUT: Duration = Duration::from_millis(1000);

/// Characters of the buffer tail shown in the input field.
pub const DEFAULT_MAX_DISPLAY_LEN: usize = 14;

/// Queued events per input source before the driver blocks.
pub const INPUT_QUEUE_CAPACITY: usize = 16;
