//! Passphrase keyboard screen: editing state machine and event loop.
//!
//! [`PassphraseKeyboard`] owns the edit buffer and page state. Each loop
//! iteration paints dirty widgets, then races three sources (touch, the
//! inactivity timer, swipes) and applies whichever resolves first. At most
//! one input event is consumed per iteration; events still queued in the
//! source channels are picked up by later iterations.

pub mod dirty;
pub mod dispatch;
pub mod geometry;
pub mod navigator;
pub mod timer;
pub mod view;

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::KeyboardConfig;
use crate::constants::{
    DEFAULT_INITIAL_PAGE, DEFAULT_MAX_DISPLAY_LEN, DEFAULT_PENDING_TIMEOUT, DEFAULT_PROMPT,
};
use crate::models::{EditableField, KeyLayout, Outcome, Pending};

pub use dirty::{DirtySet, Widget};
pub use dispatch::KeyDispatcher;
pub use geometry::{hit_test, Area, Point, Target};
pub use navigator::{PageNavigator, SwipeDirection};
pub use timer::InactivityTimer;
pub use view::{key_buttons, InputView, KeyButton, ScreenView};

/// One discrete input consumed by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Touch-down at a logical screen coordinate
    Touch(Point),
    /// The inactivity timer elapsed while a character was pending
    Timeout,
    /// A horizontal swipe completed
    Swipe(SwipeDirection),
}

/// Display collaborator.
///
/// Called once per loop iteration with the widgets that changed; the
/// renderer must redraw those from `view` and must not keep state of its own
/// beyond what it paints.
pub trait Renderer {
    /// Redraws the widgets in `dirty`.
    fn render(&mut self, view: &ScreenView<'_>, dirty: DirtySet) -> Result<()>;
}

/// Sending half of the input sources, held by the device driver.
#[derive(Debug, Clone)]
pub struct InputSenders {
    /// Touch-down events
    pub touch: mpsc::Sender<Point>,
    /// Completed swipes
    pub swipe: mpsc::Sender<SwipeDirection>,
}

/// Receiving half of the input sources, polled by the event loop.
#[derive(Debug)]
pub struct InputSources {
    touch: mpsc::Receiver<Point>,
    swipe: mpsc::Receiver<SwipeDirection>,
    swipe_open: bool,
}

impl InputSources {
    /// Wraps existing receivers.
    pub fn new(touch: mpsc::Receiver<Point>, swipe: mpsc::Receiver<SwipeDirection>) -> Self {
        Self {
            touch,
            swipe,
            swipe_open: true,
        }
    }

    /// Creates connected senders and sources with room for `capacity`
    /// queued events per source.
    pub fn channel(capacity: usize) -> (InputSenders, Self) {
        let (touch_tx, touch_rx) = mpsc::channel(capacity);
        let (swipe_tx, swipe_rx) = mpsc::channel(capacity);
        (
            InputSenders {
                touch: touch_tx,
                swipe: swipe_tx,
            },
            Self::new(touch_rx, swipe_rx),
        )
    }
}

enum Polled {
    Event(InputEvent),
    TouchClosed,
    SwipeClosed,
}

/// Per-session settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Text shown while the buffer is empty
    pub prompt: String,
    /// Page displayed first
    pub initial_page: usize,
    /// How long a pending character stays open for cycling
    pub pending_timeout: Duration,
    /// Characters of the buffer tail shown in the input field
    pub max_display_len: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            initial_page: DEFAULT_INITIAL_PAGE,
            pending_timeout: DEFAULT_PENDING_TIMEOUT,
            max_display_len: DEFAULT_MAX_DISPLAY_LEN,
        }
    }
}

impl From<&KeyboardConfig> for SessionOptions {
    fn from(config: &KeyboardConfig) -> Self {
        Self {
            prompt: config.prompt.clone(),
            initial_page: config.initial_page,
            pending_timeout: Duration::from_millis(config.pending_timeout_ms),
            max_display_len: config.max_display_len,
        }
    }
}

/// The passphrase entry screen.
#[derive(Debug)]
pub struct PassphraseKeyboard<'a> {
    layout: &'a KeyLayout,
    prompt: String,
    field: EditableField,
    navigator: PageNavigator,
    keys: Vec<KeyButton>,
    timer: InactivityTimer,
    max_display_len: usize,
    back_enabled: bool,
    dirty: DirtySet,
}

impl<'a> PassphraseKeyboard<'a> {
    /// Creates a screen showing `options.initial_page` of `layout`.
    ///
    /// # Errors
    ///
    /// Fails when the initial page is not a page of the layout.
    pub fn new(layout: &'a KeyLayout, options: SessionOptions) -> Result<Self> {
        let Some(navigator) = PageNavigator::new(options.initial_page, layout.page_count()) else {
            anyhow::bail!(
                "Initial page {} is out of range (layout has {} pages)",
                options.initial_page,
                layout.page_count()
            );
        };
        let keys = layout
            .page(navigator.page())
            .map(key_buttons)
            .unwrap_or_default();

        Ok(Self {
            layout,
            prompt: options.prompt,
            field: EditableField::new(),
            navigator,
            keys,
            timer: InactivityTimer::new(options.pending_timeout),
            max_display_len: options.max_display_len,
            back_enabled: false,
            dirty: DirtySet::all(),
        })
    }

    /// Current buffer contents.
    pub fn text(&self) -> &str {
        self.field.text()
    }

    /// Pending slot, if a character is still open for cycling.
    pub fn pending(&self) -> Option<Pending> {
        self.field.pending()
    }

    /// Displayed page index.
    pub fn page(&self) -> usize {
        self.navigator.page()
    }

    /// Widgets awaiting a redraw.
    pub fn dirty(&self) -> DirtySet {
        self.dirty
    }

    /// Whether the back button is in delete style.
    pub fn back_enabled(&self) -> bool {
        self.back_enabled
    }

    /// Key widgets of the displayed page.
    pub fn keys(&self) -> &[KeyButton] {
        &self.keys
    }

    /// Render data for the current state.
    pub fn view(&self) -> ScreenView<'_> {
        ScreenView {
            prompt: &self.prompt,
            input: InputView::new(self.field.text(), self.field.is_pending(), self.max_display_len),
            back_enabled: self.back_enabled,
            page: self.navigator.page(),
            page_count: self.navigator.page_count(),
            keys: &self.keys,
        }
    }

    /// Hands dirty widgets to `renderer` and clears them.
    pub fn render<R: Renderer>(&mut self, renderer: &mut R) -> Result<()> {
        if self.dirty.is_empty() {
            return Ok(());
        }
        let dirty = self.dirty.take();
        renderer.render(&self.view(), dirty)
    }

    /// Applies one event. Returns the outcome when the session ends.
    pub fn handle(&mut self, event: InputEvent) -> Option<Outcome> {
        match event {
            InputEvent::Touch(point) => self.on_touch(point),
            InputEvent::Timeout => {
                self.on_timeout();
                None
            }
            InputEvent::Swipe(direction) => {
                self.on_swipe(direction);
                None
            }
        }
    }

    /// Runs the screen until the user confirms or cancels.
    ///
    /// The session also ends `Cancelled` if the touch source closes.
    pub async fn run<R: Renderer>(
        mut self,
        sources: &mut InputSources,
        renderer: &mut R,
    ) -> Result<Outcome> {
        info!(
            page = self.navigator.page(),
            pages = self.navigator.page_count(),
            timeout_ms = self.timer.duration().as_millis(),
            "Passphrase entry started"
        );

        loop {
            self.render(renderer)?;

            let event = match self.next_event(sources).await {
                Polled::Event(event) => event,
                Polled::SwipeClosed => {
                    debug!("Swipe input closed, paging disabled");
                    sources.swipe_open = false;
                    continue;
                }
                Polled::TouchClosed => {
                    warn!("Touch input closed, cancelling passphrase entry");
                    return Ok(Outcome::Cancelled);
                }
            };

            if let Some(outcome) = self.handle(event) {
                info!(outcome = outcome.kind(), "Passphrase entry finished");
                return Ok(outcome);
            }
        }
    }

    async fn next_event(&self, sources: &mut InputSources) -> Polled {
        let armed = self.field.is_pending();

        tokio::select! {
            biased;
            touch = sources.touch.recv() => match touch {
                Some(point) => Polled::Event(InputEvent::Touch(point)),
                None => Polled::TouchClosed,
            },
            () = self.timer.expired(armed) => Polled::Event(InputEvent::Timeout),
            swipe = sources.swipe.recv(), if sources.swipe_open => match swipe {
                Some(direction) => Polled::Event(InputEvent::Swipe(direction)),
                None => Polled::SwipeClosed,
            },
        }
    }

    fn on_touch(&mut self, point: Point) -> Option<Outcome> {
        match hit_test(point, self.keys.len()) {
            Some(Target::Key(position)) => {
                self.on_key(position);
                None
            }
            Some(Target::Back) => self.on_back(),
            Some(Target::Confirm) => Some(self.on_confirm()),
            None => None,
        }
    }

    fn on_key(&mut self, position: u8) {
        let was_empty = self.field.is_empty();
        let page = self.navigator.page();
        if let Some(slot) = KeyDispatcher::new(self.layout).dispatch(&mut self.field, page, position) {
            debug!(%slot, len = self.field.len(), pending = self.field.is_pending(), "Key activated");
            self.after_edit(was_empty);
        }
    }

    fn on_back(&mut self) -> Option<Outcome> {
        let was_empty = self.field.is_empty();
        if self.field.backspace() {
            debug!(len = self.field.len(), "Deleted last character");
            self.after_edit(was_empty);
            None
        } else {
            Some(Outcome::Cancelled)
        }
    }

    fn on_confirm(&mut self) -> Outcome {
        Outcome::confirmed(self.field.take_text())
    }

    fn on_timeout(&mut self) {
        debug!("Pending character committed by timeout");
        self.field.commit_pending();
        self.dirty.mark(Widget::Input);
    }

    fn on_swipe(&mut self, direction: SwipeDirection) {
        let page = self.navigator.swipe(direction);
        debug!(?direction, page, "Page switched");

        self.keys = self.layout.page(page).map(key_buttons).unwrap_or_default();
        self.dirty.mark(Widget::Back);
        self.dirty.mark(Widget::Confirm);
        self.dirty.mark(Widget::Input);
        self.dirty.mark(Widget::Prompt);
        self.dirty.mark(Widget::PageIndicator);
        self.dirty.mark_keys();
    }

    /// Refreshes the input field and affordances after the buffer changed.
    fn after_edit(&mut self, was_empty: bool) {
        self.dirty.mark(Widget::Input);

        let is_empty = self.field.is_empty();
        if was_empty != is_empty {
            self.dirty.mark(Widget::Prompt);
        }

        if self.back_enabled == is_empty {
            self.back_enabled = !is_empty;
            self.dirty.mark(Widget::Back);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::{back_area, confirm_area, input_area, key_area};

    fn keyboard(layout: &KeyLayout) -> PassphraseKeyboard<'_> {
        let mut keyboard = PassphraseKeyboard::new(layout, SessionOptions::default()).unwrap();
        keyboard.dirty.take();
        keyboard
    }

    fn tap(keyboard: &mut PassphraseKeyboard<'_>, position: u8) -> Option<Outcome> {
        keyboard.handle(InputEvent::Touch(key_area(position).center()))
    }

    fn back(keyboard: &mut PassphraseKeyboard<'_>) -> Option<Outcome> {
        keyboard.handle(InputEvent::Touch(back_area().center()))
    }

    #[test]
    fn test_new_starts_on_initial_page_fully_dirty() {
        let layout = KeyLayout::standard();
        let keyboard = PassphraseKeyboard::new(&layout, SessionOptions::default()).unwrap();
        assert_eq!(keyboard.page(), 1);
        assert_eq!(keyboard.text(), "");
        assert!(keyboard.pending().is_none());
        assert!(!keyboard.back_enabled());
        assert_eq!(keyboard.dirty(), DirtySet::all());
        assert_eq!(keyboard.keys()[1].label, "abc");
    }

    #[test]
    fn test_new_rejects_out_of_range_page() {
        let layout = KeyLayout::standard();
        let options = SessionOptions {
            initial_page: 4,
            ..SessionOptions::default()
        };
        assert!(PassphraseKeyboard::new(&layout, options).is_err());
    }

    #[test]
    fn test_first_key_enables_back_and_hides_prompt() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);

        assert_eq!(tap(&mut keyboard, 1), None);

        assert_eq!(keyboard.text(), "a");
        assert!(keyboard.back_enabled());
        let dirty = keyboard.dirty();
        assert!(dirty.contains(Widget::Input));
        assert!(dirty.contains(Widget::Prompt));
        assert!(dirty.contains(Widget::Back));
        assert!(!dirty.contains(Widget::Key(1)));
    }

    #[test]
    fn test_cycling_only_dirties_input() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        tap(&mut keyboard, 1);
        keyboard.dirty.take();

        tap(&mut keyboard, 1);

        assert_eq!(keyboard.text(), "b");
        assert_eq!(keyboard.dirty().iter().collect::<Vec<_>>(), vec![Widget::Input]);
    }

    #[test]
    fn test_timeout_commits_and_dirties_input() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        tap(&mut keyboard, 1);
        keyboard.dirty.take();

        assert_eq!(keyboard.handle(InputEvent::Timeout), None);

        assert_eq!(keyboard.text(), "a");
        assert!(keyboard.pending().is_none());
        assert!(keyboard.dirty().contains(Widget::Input));
    }

    #[test]
    fn test_back_on_empty_cancels() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        assert_eq!(back(&mut keyboard), Some(Outcome::Cancelled));
    }

    #[test]
    fn test_backspace_to_empty_restores_prompt() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        tap(&mut keyboard, 2);
        keyboard.dirty.take();

        assert_eq!(back(&mut keyboard), None);

        assert_eq!(keyboard.text(), "");
        assert!(!keyboard.back_enabled());
        assert!(keyboard.dirty().contains(Widget::Prompt));
        assert!(keyboard.dirty().contains(Widget::Back));
        assert!(keyboard.view().input.is_none());
    }

    #[test]
    fn test_confirm_returns_text_with_pending() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        tap(&mut keyboard, 7);
        tap(&mut keyboard, 7);

        let outcome = keyboard.handle(InputEvent::Touch(confirm_area().center()));
        assert_eq!(outcome, Some(Outcome::confirmed("u")));
    }

    #[test]
    fn test_edits_never_repaint_confirm() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);

        tap(&mut keyboard, 1);
        assert!(!keyboard.dirty().contains(Widget::Confirm));
        keyboard.dirty.take();

        back(&mut keyboard);
        assert!(keyboard.dirty().contains(Widget::Back));
        assert!(!keyboard.dirty().contains(Widget::Confirm));
    }

    #[test]
    fn test_confirm_empty_passphrase() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        let outcome = keyboard.handle(InputEvent::Touch(confirm_area().center()));
        assert_eq!(outcome, Some(Outcome::confirmed("")));
    }

    #[test]
    fn test_touch_on_input_is_noop() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        tap(&mut keyboard, 1);
        keyboard.dirty.take();

        assert_eq!(keyboard.handle(InputEvent::Touch(input_area().center())), None);
        assert_eq!(keyboard.handle(InputEvent::Touch(Point::new(500, 500))), None);

        assert_eq!(keyboard.text(), "a");
        assert!(keyboard.pending().is_some());
        assert!(keyboard.dirty().is_empty());
    }

    #[test]
    fn test_swipe_rebuilds_keys_and_dirties_everything_but_keeps_pending() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        tap(&mut keyboard, 1);
        keyboard.dirty.take();

        keyboard.handle(InputEvent::Swipe(SwipeDirection::Left));

        assert_eq!(keyboard.page(), 2);
        assert_eq!(keyboard.keys()[1].label, "ABC");
        assert_eq!(keyboard.text(), "a");
        assert!(keyboard.pending().is_some());
        let dirty = keyboard.dirty();
        assert!(dirty.contains_all_keys());
        assert!(dirty.contains(Widget::Back));
        assert!(dirty.contains(Widget::Confirm));
        assert!(dirty.contains(Widget::Input));
        assert!(dirty.contains(Widget::PageIndicator));
    }

    #[test]
    fn test_same_position_after_swipe_appends() {
        let layout = KeyLayout::standard();
        let mut keyboard = keyboard(&layout);
        tap(&mut keyboard, 1);
        keyboard.handle(InputEvent::Swipe(SwipeDirection::Left));
        tap(&mut keyboard, 1);

        assert_eq!(keyboard.text(), "aA");
    }

    struct CountingRenderer {
        calls: usize,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, _view: &ScreenView<'_>, dirty: DirtySet) -> Result<()> {
            assert!(!dirty.is_empty());
            self.calls += 1;
            Ok(())
        }
    }

    #[test]
    fn test_render_skips_clean_state() {
        let layout = KeyLayout::standard();
        let mut keyboard = PassphraseKeyboard::new(&layout, SessionOptions::default()).unwrap();
        let mut renderer = CountingRenderer { calls: 0 };

        keyboard.render(&mut renderer).unwrap();
        keyboard.render(&mut renderer).unwrap();

        assert_eq!(renderer.calls, 1);
        assert!(keyboard.dirty().is_empty());
    }
}
