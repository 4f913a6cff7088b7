use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
        KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::{
    config::{self, Settings},
    core::{Lifecycle, Simulation},
    render::FrameBuffer,
    types::Vec2,
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub fn run(settings: &Settings) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, settings);
    shutdown_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Term, settings: &Settings) -> Result<()> {
    let mut ui_state = UiState::new();
    let area = ui_state.layout(terminal.size()?);
    ui_state.ensure_canvas(area);

    let mut sim = Simulation::new(settings, ui_state.framebuf.extent());
    sim.start();

    let frame_interval = Duration::from_secs_f32(1.0 / config::FRAME_HZ);
    let mut last_clock = Instant::now();
    let mut clock_carry = Duration::ZERO;
    let mut last_frame = Instant::now();
    let mut frame_counter = 0_u32;
    let mut last_fps_sample = Instant::now();
    let mut fps = 0.0_f32;

    loop {
        let now = Instant::now();
        clock_carry += now - last_clock;
        last_clock = now;
        let whole_ms = clock_carry.as_millis() as u64;
        clock_carry -= Duration::from_millis(whole_ms);
        sim.advance_clock(whole_ms);

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        sim.stop();
                        return Ok(());
                    }
                    _ => {}
                },
                CrosstermEvent::Mouse(mouse) => ui_state.handle_mouse(&mut sim, mouse),
                CrosstermEvent::Resize(width, height) => {
                    let area = ui_state.layout(Rect::new(0, 0, width, height));
                    ui_state.ensure_canvas(area);
                    sim.resize(ui_state.framebuf.extent());
                }
                _ => {}
            }
        }

        if last_frame.elapsed() >= frame_interval {
            last_frame = Instant::now();
            if sim.tick(&mut ui_state.framebuf) == Lifecycle::Running {
                frame_counter += 1;
            }
            if last_fps_sample.elapsed() >= Duration::from_secs(1) {
                fps = frame_counter as f32 / last_fps_sample.elapsed().as_secs_f32();
                frame_counter = 0;
                last_fps_sample = Instant::now();
            }
            draw(terminal, &sim, &ui_state, fps)?;
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

fn draw(terminal: &mut Term, sim: &Simulation, ui_state: &UiState, fps: f32) -> Result<()> {
    let stats = sim.stats();
    let input = sim.input();
    terminal.draw(|frame| {
        let chunks = UiState::split(frame.size());

        let limit = match sim.frame_limit() {
            Some(limit) => limit.to_string(),
            None => "∞".to_string(),
        };
        let header = Paragraph::new(format!(
            "live: {} | pending: {} | expired: {} | respawn: {} | frame: {}/{} | clock: {:.1}s \
             | mode: {:?} | bias: {:.2} | focal: ({:.0}, {:.0}) {} | {:?} | fps: {:.1}",
            stats.live,
            stats.pending,
            stats.last_expired,
            stats.last_scheduled,
            stats.frame,
            limit,
            stats.clock_ms as f32 / 1000.0,
            sim.mode(),
            input.bias,
            input.focal.x,
            input.focal.y,
            if input.attached { "attached" } else { "centered" },
            sim.state(),
            fps
        ))
        .block(Block::default().borders(Borders::ALL).title("particlefield"));
        frame.render_widget(header, chunks[0]);

        let framebuf = &ui_state.framebuf;
        let (br, bg, bb) = config::FADE_RGB;
        let background = Color::Rgb(br, bg, bb);
        let lines: Vec<Line> = (0..framebuf.height())
            .map(|y| {
                let spans: Vec<Span> = (0..framebuf.width())
                    .map(|x| {
                        let cell = framebuf.get(x, y);
                        let (r, g, b) = cell.rgb();
                        Span::styled(
                            cell.glyph().to_string(),
                            Style::default().fg(Color::Rgb(r, g, b)).bg(background),
                        )
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        let canvas = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(canvas, chunks[1]);

        let footer = Paragraph::new(
            "move: focal point | scroll: attraction | click: attach/center | q: quit",
        )
        .block(Block::default().borders(Borders::ALL).title("Controls"));
        frame.render_widget(footer, chunks[2]);
    })?;
    Ok(())
}

fn shutdown_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

struct UiState {
    framebuf: FrameBuffer,
    /// Inner area of the canvas block, in terminal cells.
    canvas: Rect,
}

impl UiState {
    fn new() -> Self {
        Self {
            framebuf: FrameBuffer::new(0, 0),
            canvas: Rect::default(),
        }
    }

    fn split(area: Rect) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area)
            .to_vec()
    }

    /// Inner canvas rectangle for a terminal of the given size.
    fn layout(&self, area: Rect) -> Rect {
        let chunks = Self::split(area);
        Block::default().borders(Borders::ALL).inner(chunks[1])
    }

    fn ensure_canvas(&mut self, canvas: Rect) {
        if canvas.width == 0 || canvas.height == 0 {
            warn!("terminal too small for a canvas: {}x{}", canvas.width, canvas.height);
        }
        self.canvas = canvas;
        if self.framebuf.width() != canvas.width || self.framebuf.height() != canvas.height {
            self.framebuf.resize(canvas.width, canvas.height);
        }
    }

    /// World position at the centre of the canvas cell nearest the mouse.
    fn to_world(&self, column: u16, row: u16) -> Vec2 {
        let x = column
            .saturating_sub(self.canvas.x)
            .min(self.canvas.width.saturating_sub(1)) as f32;
        let y = row
            .saturating_sub(self.canvas.y)
            .min(self.canvas.height.saturating_sub(1)) as f32;
        Vec2::new(
            (x + 0.5) * config::CELL_WIDTH_PX,
            (y + 0.5) * config::CELL_HEIGHT_PX,
        )
    }

    fn handle_mouse(&self, sim: &mut Simulation, mouse: MouseEvent) {
        let pos = self.to_world(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => sim.pointer_moved(pos),
            MouseEventKind::ScrollUp => sim.scrolled(1.0),
            MouseEventKind::ScrollDown => sim.scrolled(-1.0),
            MouseEventKind::Down(MouseButton::Left) => sim.clicked(pos),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn ui_for(width: u16, height: u16) -> UiState {
        let mut ui_state = UiState::new();
        let area = ui_state.layout(Rect::new(0, 0, width, height));
        ui_state.ensure_canvas(area);
        ui_state
    }

    mod layout {
        use super::*;

        #[test]
        fn canvas_sits_inside_the_middle_block() {
            let ui_state = ui_for(80, 30);
            assert_eq!(ui_state.canvas.x, 1);
            assert_eq!(ui_state.canvas.y, 4);
            assert_eq!(ui_state.canvas.width, 78);
            assert!(ui_state.canvas.height > 0);
            assert_eq!(ui_state.framebuf.width(), ui_state.canvas.width);
            assert_eq!(ui_state.framebuf.height(), ui_state.canvas.height);
        }
    }

    mod to_world {
        use super::*;

        #[test]
        fn maps_cell_to_pixel_center() {
            let ui_state = ui_for(80, 30);
            let pos = ui_state.to_world(1, 4);
            assert_eq!(
                pos,
                Vec2::new(0.5 * config::CELL_WIDTH_PX, 0.5 * config::CELL_HEIGHT_PX)
            );
        }

        #[test]
        fn clamps_positions_left_of_canvas() {
            let ui_state = ui_for(80, 30);
            assert_eq!(ui_state.to_world(0, 0), ui_state.to_world(1, 4));
        }

        #[test]
        fn clamps_positions_right_of_and_below_canvas() {
            let ui_state = ui_for(80, 30);
            let extent = ui_state.framebuf.extent();
            let pos = ui_state.to_world(79, 29);
            assert!(pos.x > 0.0 && pos.x < extent.x);
            assert!(pos.y > 0.0 && pos.y < extent.y);
            let last_col = ui_state.canvas.x + ui_state.canvas.width - 1;
            let last_row = ui_state.canvas.y + ui_state.canvas.height - 1;
            assert_eq!(pos, ui_state.to_world(last_col, last_row));
        }
    }

    mod handle_mouse {
        use super::*;

        fn sim_for(ui_state: &UiState) -> Simulation {
            let settings = Settings {
                seed: Some(1),
                ..Settings::default()
            };
            Simulation::new(&settings, ui_state.framebuf.extent())
        }

        #[test]
        fn movement_updates_focal() {
            let ui_state = ui_for(80, 30);
            let mut sim = sim_for(&ui_state);
            ui_state.handle_mouse(&mut sim, mouse(MouseEventKind::Moved, 11, 6));
            assert_eq!(sim.input().focal, ui_state.to_world(11, 6));
        }

        #[test]
        fn scroll_up_raises_bias() {
            let ui_state = ui_for(80, 30);
            let mut sim = sim_for(&ui_state);
            let before = sim.input().bias;
            ui_state.handle_mouse(&mut sim, mouse(MouseEventKind::ScrollUp, 5, 5));
            assert!(sim.input().bias > before);
            ui_state.handle_mouse(&mut sim, mouse(MouseEventKind::ScrollDown, 5, 5));
            ui_state.handle_mouse(&mut sim, mouse(MouseEventKind::ScrollDown, 5, 5));
            assert!(sim.input().bias < before);
        }

        #[test]
        fn left_click_detaches_to_center() {
            let ui_state = ui_for(80, 30);
            let mut sim = sim_for(&ui_state);
            ui_state.handle_mouse(
                &mut sim,
                mouse(MouseEventKind::Down(MouseButton::Left), 20, 10),
            );
            assert!(!sim.input().attached);
            assert_eq!(sim.input().focal, ui_state.framebuf.extent() / 2.0);
        }

        #[test]
        fn right_click_is_ignored() {
            let ui_state = ui_for(80, 30);
            let mut sim = sim_for(&ui_state);
            ui_state.handle_mouse(
                &mut sim,
                mouse(MouseEventKind::Down(MouseButton::Right), 20, 10),
            );
            assert!(sim.input().attached);
        }
    }
}
