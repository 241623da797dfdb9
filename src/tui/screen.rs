//! Terminal renderer for the passphrase screen.
//!
//! The renderer keeps the last painted content of every widget and refreshes
//! only the widgets reported dirty before repainting the terminal.

use anyhow::{Context, Result};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use super::surface::{device_frame, device_surface, scale_x, to_terminal};
use super::Theme;
use crate::constants::APP_NAME;
use crate::keyboard::geometry::{back_area, confirm_area, input_area};
use crate::keyboard::view::indicator_dots;
use crate::keyboard::{DirtySet, InputView, KeyButton, Renderer, ScreenView, Widget};

/// Last painted content of each widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    /// Prompt text
    pub prompt: String,
    /// Input field content, `None` shows the prompt
    pub input: Option<InputView>,
    /// Back button style
    pub back_enabled: bool,
    /// Highlighted page dot
    pub page: usize,
    /// Number of page dots
    pub page_count: usize,
    /// Key faces by grid position
    pub keys: Vec<KeyButton>,
}

impl Scene {
    /// Copies the dirty widgets of `view` into the scene.
    pub fn update(&mut self, view: &ScreenView<'_>, dirty: DirtySet) {
        for widget in dirty.iter() {
            match widget {
                Widget::Prompt | Widget::Input => {
                    view.prompt.clone_into(&mut self.prompt);
                    self.input.clone_from(&view.input);
                }
                Widget::Back => self.back_enabled = view.back_enabled,
                // The confirm face never changes
                Widget::Confirm => {}
                Widget::PageIndicator => {
                    self.page = view.page;
                    self.page_count = view.page_count;
                }
                Widget::Key(position) => {
                    let index = usize::from(position);
                    if let Some(key) = view.keys.get(index) {
                        if self.keys.len() <= index {
                            self.keys.resize(index + 1, key.clone());
                        }
                        self.keys[index] = key.clone();
                    }
                }
            }
        }
    }
}

/// [`Renderer`] painting onto a ratatui terminal.
pub struct TerminalRenderer<'t, B: Backend> {
    terminal: &'t mut Terminal<B>,
    theme: Theme,
    scene: Scene,
}

impl<'t, B: Backend> TerminalRenderer<'t, B> {
    /// Creates a renderer drawing to `terminal`.
    pub fn new(terminal: &'t mut Terminal<B>, theme: Theme) -> Self {
        Self {
            terminal,
            theme,
            scene: Scene::default(),
        }
    }

    /// Content currently on screen.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl<B: Backend> Renderer for TerminalRenderer<'_, B> {
    fn render(&mut self, view: &ScreenView<'_>, dirty: DirtySet) -> Result<()> {
        self.scene.update(view, dirty);
        let scene = &self.scene;
        let theme = &self.theme;
        self.terminal
            .draw(|f| draw_scene(f, scene, theme))
            .context("Failed to draw passphrase screen")?;
        Ok(())
    }
}

/// Paints the whole scene.
pub fn draw_scene(f: &mut Frame, scene: &Scene, theme: &Theme) {
    let full_bg = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(full_bg, f.area());

    let frame = device_frame(f.area());
    let surface = device_surface(f.area());

    let border = Block::default()
        .title(format!(" {APP_NAME} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary))
        .style(Style::default().bg(theme.background));
    f.render_widget(border, frame);

    draw_header(f, surface, scene, theme);

    for key in &scene.keys {
        let rect = to_terminal(surface, key.area);
        draw_button(f, rect, &key.label, Style::default().fg(theme.text).bg(theme.surface));
    }

    let (back_label, back_style) = if scene.back_enabled {
        ("⌫", Style::default().fg(theme.text).bg(theme.surface))
    } else {
        ("✕", Style::default().fg(theme.error).bg(theme.surface))
    };
    draw_button(f, to_terminal(surface, back_area()), back_label, back_style);

    let confirm_style = Style::default().fg(theme.success).bg(theme.surface);
    draw_button(f, to_terminal(surface, confirm_area()), "✓", confirm_style);

    let help_area = Rect {
        x: frame.x,
        y: frame.y + frame.height,
        width: frame.width,
        height: 1,
    };
    if help_area.bottom() <= f.area().bottom() {
        let help = Paragraph::new("click keys · ←/→ or drag to page · Esc quits")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.text_muted).bg(theme.background));
        f.render_widget(help, help_area);
    }
}

/// Paints the input field (or prompt) and the page indicator strip.
fn draw_header(f: &mut Frame, surface: Rect, scene: &Scene, theme: &Theme) {
    let header = to_terminal(surface, input_area());
    let text_row = Rect {
        height: 1,
        y: header.y + header.height.saturating_sub(2),
        ..header
    };

    let line = match &scene.input {
        Some(input) => input_line(input, theme),
        None => Line::from(Span::styled(
            scene.prompt.clone(),
            Style::default()
                .fg(theme.text_muted)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
    };
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.background)),
        text_row,
    );

    let dots_row = header.y + header.height.saturating_sub(1);
    for (page, x) in indicator_dots(scene.page_count).into_iter().enumerate() {
        let column = scale_x(surface, x);
        if column >= surface.x + surface.width {
            continue;
        }
        let (symbol, color) = if page == scene.page {
            ("●", theme.text)
        } else {
            ("○", theme.text_muted)
        };
        let cell = Rect::new(column, dots_row, 1, 1);
        f.render_widget(
            Paragraph::new(symbol).style(Style::default().fg(color).bg(theme.background)),
            cell,
        );
    }
}

/// Input text with the pending marker or the cursor.
fn input_line(input: &InputView, theme: &Theme) -> Line<'static> {
    let text_style = Style::default().fg(theme.text);
    if input.pending {
        let split = input
            .text
            .char_indices()
            .last()
            .map_or(0, |(index, _)| index);
        let (committed, pending) = input.text.split_at(split);
        Line::from(vec![
            Span::raw(" "),
            Span::styled(committed.to_string(), text_style),
            Span::styled(
                pending.to_string(),
                text_style
                    .fg(theme.accent)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ])
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(input.text.as_str().to_owned(), text_style),
            Span::styled("▏", Style::default().fg(theme.accent)),
        ])
    }
}

fn draw_button(f: &mut Frame, rect: Rect, label: &str, style: Style) {
    let button = Paragraph::new(label.to_string())
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).style(style));
    f.render_widget(button, rect);
}
