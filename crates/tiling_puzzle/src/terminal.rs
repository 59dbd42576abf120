//! Terminal frontend: shows the canvas with half-block cells and feeds mouse
//! and key events back to the session.
//!
//! Each terminal cell covers `pixels_per_cell` canvas columns and twice as
//! many canvas rows; the upper half-block glyph carries the top sample in its
//! foreground colour and the bottom sample in its background colour.

use crate::assets::Texture;
use crate::canvas::Canvas;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::style::Color;
use ratatui::widgets::Widget;
use std::io;
use std::time::{Duration, Instant};
use tiling_core::{InputEvent, Key, Phase, Point, Rect, Renderer, Session, present};
use tracing::{debug, info, instrument, warn};

/// Maps between terminal cells and canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pixels_per_cell: u32,
}

impl Viewport {
    /// Creates a viewport; zero is treated as one pixel per cell.
    pub fn new(pixels_per_cell: u32) -> Self {
        Self {
            pixels_per_cell: pixels_per_cell.max(1),
        }
    }

    /// Canvas pixel under the centre of a terminal cell.
    pub fn to_point(&self, column: u16, row: u16) -> Point {
        let ppc = self.pixels_per_cell as i32;
        Point::new(
            i32::from(column) * ppc + ppc / 2,
            i32::from(row) * 2 * ppc + ppc,
        )
    }

    /// Terminal columns and rows needed to show a canvas.
    pub fn cells_for(&self, width: u32, height: u32) -> (u16, u16) {
        let columns = width.div_ceil(self.pixels_per_cell);
        let rows = height.div_ceil(self.pixels_per_cell * 2);
        (
            columns.min(u32::from(u16::MAX)) as u16,
            rows.min(u32::from(u16::MAX)) as u16,
        )
    }

    /// Canvas pixel sampled for the top (`lower == false`) or bottom half of a cell.
    fn sample_point(&self, column: u16, row: u16, lower: bool) -> (u32, u32) {
        let ppc = self.pixels_per_cell;
        let x = u32::from(column) * ppc + ppc / 2;
        let y = u32::from(row) * 2 * ppc + ppc / 2 + if lower { ppc } else { 0 };
        (x, y)
    }
}

/// Widget drawing a canvas at the top-left of its area.
#[derive(Debug)]
pub struct CanvasView<'a> {
    canvas: &'a Canvas,
    viewport: Viewport,
}

impl<'a> CanvasView<'a> {
    /// Wraps a canvas for drawing.
    pub fn new(canvas: &'a Canvas, viewport: Viewport) -> Self {
        Self { canvas, viewport }
    }

    fn colour_at(&self, x: u32, y: u32) -> Color {
        let (width, height) = self.canvas.dimensions();
        if x >= width || y >= height {
            return Color::Reset;
        }
        let [r, g, b, _] = self.canvas.frame().get_pixel(x, y).0;
        Color::Rgb(r, g, b)
    }
}

impl Widget for CanvasView<'_> {
    fn render(self, area: ratatui::layout::Rect, buf: &mut Buffer) {
        let (width, height) = self.canvas.dimensions();
        let (columns, rows) = self.viewport.cells_for(width, height);

        for row in 0..rows.min(area.height) {
            for column in 0..columns.min(area.width) {
                let (tx, ty) = self.viewport.sample_point(column, row, false);
                let (bx, by) = self.viewport.sample_point(column, row, true);
                let top = self.colour_at(tx, ty);
                let bottom = self.colour_at(bx, by);
                if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
                    cell.set_char('▀').set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Translates a terminal event into a game event.
///
/// Mouse-down maps to clicks at the canvas pixel under the cell; releases,
/// drags and moves are dropped. Terminals only report key presses unless
/// enhancement flags are enabled, so a press stands in for the release.
/// `q`, Esc and Ctrl-C close the game.
pub fn translate(event: &Event, viewport: Viewport) -> Option<InputEvent> {
    match event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            ..
        }) => {
            let point = viewport.to_point(*column, *row);
            Some(match button {
                MouseButton::Left => InputEvent::PrimaryClick(point),
                MouseButton::Right => InputEvent::SecondaryClick(point),
                MouseButton::Middle => InputEvent::TertiaryClick,
            })
        }
        Event::Key(KeyEvent {
            code, modifiers, kind, ..
        }) if *kind != KeyEventKind::Release => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(InputEvent::Quit)
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
            KeyCode::Char(' ') => Some(InputEvent::KeyRelease(Key::Space)),
            KeyCode::Char(c) => Some(InputEvent::KeyRelease(Key::Char(*c))),
            _ => Some(InputEvent::KeyRelease(Key::Other)),
        },
        _ => None,
    }
}

/// Raw mode, alternate screen and mouse capture, undone on drop.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Switches the terminal into game mode.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the terminal cannot be configured.
    #[instrument]
    pub fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        debug!("Terminal acquired");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen) {
            warn!(error = %e, "Failed to leave alternate screen");
        }
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to disable raw mode");
        }
        debug!("Terminal released");
    }
}

/// Renderer that composites into a [`Canvas`] and shows it in a terminal.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    canvas: Canvas,
    viewport: Viewport,
}

impl<B: Backend> TerminalRenderer<B> {
    /// Creates a renderer for a canvas of the given size.
    pub fn new(terminal: Terminal<B>, width: u32, height: u32, viewport: Viewport) -> Self {
        Self {
            terminal,
            canvas: Canvas::new(width, height),
            viewport,
        }
    }

    /// The cell/pixel mapping used for drawing and mouse input.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The most recently composited canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    type Handle = Texture;
    type Error = B::Error;

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn copy(&mut self, handle: &Texture, source: Option<Rect>, dest: Rect) {
        self.canvas.copy(handle, source, dest);
    }

    fn present(&mut self) -> Result<(), B::Error> {
        let Self {
            terminal,
            canvas,
            viewport,
        } = self;
        let Ok(()) = canvas.present();
        terminal.draw(|frame| {
            frame.render_widget(CanvasView::new(canvas, *viewport), frame.area());
        })?;
        Ok(())
    }
}

/// Returns the next pending event that maps to a game event, without blocking.
fn next_event(viewport: Viewport) -> io::Result<Option<InputEvent>> {
    while event::poll(Duration::ZERO)? {
        let raw = event::read()?;
        if let Some(input) = translate(&raw, viewport) {
            return Ok(Some(input));
        }
    }
    Ok(None)
}

/// Runs the frame loop until the session shuts down.
///
/// Each tick dispatches at most one event, renders a frame and sleeps out
/// the remainder of the frame budget.
///
/// # Errors
///
/// Returns an error if terminal input or output fails.
#[instrument(skip_all, fields(fps = fps))]
pub fn run<B>(
    session: &mut Session<Texture>,
    renderer: &mut TerminalRenderer<B>,
    fps: u32,
) -> anyhow::Result<()>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let frame_budget = Duration::from_secs(1) / fps.max(1);
    info!("Entering frame loop");

    while session.phase().is_running() {
        let started = Instant::now();

        if let Some(input) = next_event(renderer.viewport())? {
            let before = session.phase();
            let after = session.step(input);
            if before != after {
                info!(from = %before, to = %after, "Phase changed");
            }
            if after == Phase::Shutdown {
                break;
            }
        }

        present(session, renderer)?;

        let elapsed = started.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    info!("Frame loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use image::{Rgba, RgbaImage};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_viewport_maps_cell_centres() {
        let viewport = Viewport::new(10);
        assert_eq!(viewport.to_point(0, 0), Point::new(5, 10));
        assert_eq!(viewport.to_point(12, 3), Point::new(125, 70));
        assert_eq!(viewport.cells_for(600, 600), (60, 30));
    }

    #[test]
    fn test_mouse_buttons() {
        let viewport = Viewport::new(10);
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 3), viewport),
            Some(InputEvent::PrimaryClick(Point::new(125, 70)))
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Right), 0, 0), viewport),
            Some(InputEvent::SecondaryClick(Point::new(5, 10)))
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Middle), 0, 0), viewport),
            Some(InputEvent::TertiaryClick)
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), viewport),
            None
        );
        assert_eq!(translate(&mouse(MouseEventKind::Moved, 0, 0), viewport), None);
    }

    #[test]
    fn test_keys() {
        let viewport = Viewport::new(10);
        assert_eq!(
            translate(&key(KeyCode::Char(' ')), viewport),
            Some(InputEvent::KeyRelease(Key::Space))
        );
        assert_eq!(
            translate(&key(KeyCode::Char('s')), viewport),
            Some(InputEvent::KeyRelease(Key::Char('s')))
        );
        assert_eq!(translate(&key(KeyCode::Char('q')), viewport), Some(InputEvent::Quit));
        assert_eq!(translate(&key(KeyCode::Esc), viewport), Some(InputEvent::Quit));
        assert_eq!(
            translate(&key(KeyCode::Enter), viewport),
            Some(InputEvent::KeyRelease(Key::Other))
        );

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate(&ctrl_c, viewport), Some(InputEvent::Quit));
    }

    #[test]
    fn test_key_release_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('s'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(translate(&release, Viewport::new(10)), None);
    }

    #[test]
    fn test_canvas_view_uses_half_blocks() {
        let mut canvas = Canvas::new(20, 20);
        let red = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        canvas.blit(&red, None, tiling_core::Rect::new(0, 0, 10, 10));

        let area = ratatui::layout::Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        CanvasView::new(&canvas, Viewport::new(10)).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(255, 255, 255));

        let cell = &buf[(1, 0)];
        assert_eq!(cell.fg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_terminal_renderer_draws_frame() {
        let backend = TestBackend::new(4, 2);
        let terminal = Terminal::new(backend).unwrap();
        let mut renderer = TerminalRenderer::new(terminal, 40, 40, Viewport::new(10));

        let texture = Texture::new("red", RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255])));
        renderer.clear();
        renderer.copy(&texture, None, tiling_core::Rect::new(0, 0, 40, 40));
        renderer.present().unwrap();

        assert_eq!(renderer.canvas().frames_presented(), 1);
        let buffer = renderer.terminal().backend().buffer();
        assert_eq!(buffer[(3, 1)].bg, Color::Rgb(255, 0, 0));
    }
}
