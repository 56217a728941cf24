//! Terminal capability interface and the crossterm implementation.
//!
//! The controller only sees [`Console`]: the viewport size, the next key
//! press, and a way to draw a frame.  Tests substitute a scripted console.

use std::io::{self, Stdout};
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::layout::Viewport;
use crate::ui::screen::{self, ScreenView};

pub trait Console {
    /// Current terminal dimensions.
    fn viewport(&self) -> io::Result<Viewport>;
    /// Block until the next terminal event.  Returns `None` for anything
    /// that is not a key press (resize, focus, mouse, key release).
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>>;
    fn draw(&mut self, view: &ScreenView<'_>) -> io::Result<()>;
}

/// Raw mode + alternate screen for as long as the guard lives.
///
/// Dropping the guard restores the terminal; while it lives a panic hook
/// does the same before the panic message is printed.
pub struct TerminalGuard {
    _hook: HookScope,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self {
            _hook: HookScope::install(restore),
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Runs `on_panic` ahead of the previous panic hook, and puts the previous
/// hook back on drop.
struct HookScope {
    previous: Arc<PanicHook>,
}

impl HookScope {
    fn install(on_panic: impl Fn() + Sync + Send + 'static) -> Self {
        let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            on_panic();
            chained(info);
        }));
        Self { previous }
    }
}

impl Drop for HookScope {
    fn drop(&mut self) {
        // The hook cannot be swapped while unwinding.
        if std::thread::panicking() {
            return;
        }
        let _ = panic::take_hook();
        let previous = Arc::clone(&self.previous);
        panic::set_hook(Box::new(move |info| previous(info)));
    }
}

fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// The real terminal.
pub struct CrosstermConsole {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    // Dropped after `terminal`, so the last frame is flushed first.
    _guard: TerminalGuard,
}

impl CrosstermConsole {
    pub fn enter() -> io::Result<Self> {
        let guard = TerminalGuard::enter()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            _guard: guard,
        })
    }
}

impl Console for CrosstermConsole {
    fn viewport(&self) -> io::Result<Viewport> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Viewport::new(width, height))
    }

    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, view: &ScreenView<'_>) -> io::Result<()> {
        self.terminal.draw(|frame| screen::draw(frame, view))?;
        Ok(())
    }
}
