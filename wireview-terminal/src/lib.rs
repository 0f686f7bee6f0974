/// Terminal host for the wireframe viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wireview_core::{FrameStats, LoadStatus, Mesh, Viewer, ViewerConfig};

pub mod config;
pub mod fetch;
pub mod renderer;

pub use fetch::{fetch_source, MeshLoader};
pub use renderer::CellSurface;

/// Cancels a running [`TerminalApp`] loop from anywhere, including other
/// threads. The loop notices before its next frame.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    viewer: Viewer,
    surface: CellSurface,
    loader: MeshLoader,
    handle: LoopHandle,
    frame_time: Duration,
    last_stats: FrameStats,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig, fps: u32) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(config, fps, columns, rows))
    }

    pub fn with_size(config: ViewerConfig, fps: u32, columns: u16, rows: u16) -> Self {
        Self {
            viewer: Viewer::new(config),
            surface: CellSurface::new(columns, rows),
            loader: MeshLoader::new(),
            handle: LoopHandle::default(),
            frame_time: Duration::from_secs(1) / fps.max(1),
            last_stats: FrameStats::default(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Start loading a mesh in the background; the current one stays up
    /// until it arrives.
    pub fn open(&mut self, source: &str) {
        let request = self.viewer.request_load(source);
        self.loader.spawn(request);
    }

    pub fn show_mesh(&mut self, mesh: Mesh) {
        self.viewer.show_mesh(mesh);
    }

    fn reload(&mut self) {
        if let Some(request) = self.viewer.reload() {
            self.loader.spawn(request);
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup
        self.handle.cancel();
        let restored = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        terminal::disable_raw_mode()?;

        result.and(restored)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while !self.handle.is_cancelled() {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(event);
            }
            self.apply_completed_loads();

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            let now = Instant::now();
            let since = now - self.last_fps_sample;
            if since.as_secs() >= 1 {
                self.fps = self.frame_count as f32 / since.as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn apply_completed_loads(&mut self) {
        for completion in self.loader.drain() {
            self.viewer.complete_load(completion);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.handle.cancel(),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.handle.cancel()
                }
                KeyCode::Char('r' | 'R') => self.reload(),
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                let (x, y) = CellSurface::cell_center(column, row);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.viewer.pointer_down(x, y),
                    MouseEventKind::Drag(MouseButton::Left) => self.viewer.pointer_move(x, y),
                    MouseEventKind::Up(_) => self.viewer.pointer_up(),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (columns, rows) = terminal::size()?;
        self.surface.set_container(columns, rows);
        self.last_stats = self.viewer.frame(&mut self.surface);

        let mut stdout = stdout();
        self.surface.draw(&mut stdout)?;

        if let Some(notice) = notice(&self.viewer) {
            let column = columns.saturating_sub(notice.chars().count() as u16) / 2;
            queue!(
                stdout,
                cursor::MoveTo(column, rows / 2),
                SetForegroundColor(Color::DarkGrey),
                Print(notice),
                ResetColor
            )?;
        }

        // Draw UI overlay
        let line: String = status_line(&self.viewer, &self.last_stats, self.fps)
            .chars()
            .take(columns as usize)
            .collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(line),
            ResetColor
        )?;

        stdout.flush()
    }
}

/// Top-row summary of what is on screen
pub fn status_line(viewer: &Viewer, stats: &FrameStats, fps: f32) -> String {
    let mut line = format!("wireview | FPS: {fps:.1}");

    if let Some(mesh) = viewer.mesh() {
        line.push_str(&format!(
            " | {} vertices, {} faces",
            mesh.vertices.len(),
            mesh.faces.len()
        ));
        if stats.faces_skipped > 0 {
            line.push_str(&format!(" ({} not drawable)", stats.faces_skipped));
        }
    }

    let report = viewer.parse_report();
    if report.is_degraded() {
        line.push_str(&format!(
            " | {} malformed lines skipped",
            report.skipped_lines.len()
        ));
    }

    if !viewer.config().auto_rotate {
        line.push_str(" | auto-rotate off");
    }

    match viewer.status() {
        LoadStatus::Loading if viewer.mesh().is_some() => line.push_str(" | loading..."),
        LoadStatus::Failed(_) if viewer.mesh().is_some() => line.push_str(" | reload failed"),
        _ => {}
    }

    line.push_str(" | Drag=Rotate R=Reload Q=Quit");
    line
}

/// Centre-screen message shown while there is no mesh to draw
pub fn notice(viewer: &Viewer) -> Option<String> {
    if viewer.mesh().is_some() {
        return None;
    }
    match viewer.status() {
        LoadStatus::Loading => Some("Loading mesh…".to_string()),
        LoadStatus::Failed(message) => Some(format!("Could not load mesh: {message}")),
        LoadStatus::Idle | LoadStatus::Ready => None,
    }
}
