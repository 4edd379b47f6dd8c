/// Crossterm-backed render sink

use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use crate::app::{ContainerDashboard, ProcessController, SystemDashboard};

use super::{containers, processes, system, RenderSink, Theme};

/// Owns the terminal for its lifetime; raw mode and the alternate screen
/// are restored on drop.
pub struct TerminalSink {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
}

impl TerminalSink {
    pub fn new(theme: Theme) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self { terminal, theme })
    }

    /// Current terminal size as (width, height)
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let area = self.terminal.size()?;
        Ok((area.width, area.height))
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

impl RenderSink<ProcessController> for TerminalSink {
    fn render(&mut self, model: &ProcessController) -> io::Result<()> {
        let theme = self.theme;
        self.terminal.draw(|f| processes::draw(f, model, &theme))?;
        Ok(())
    }
}

impl RenderSink<ContainerDashboard> for TerminalSink {
    fn render(&mut self, model: &ContainerDashboard) -> io::Result<()> {
        let theme = self.theme;
        self.terminal.draw(|f| containers::draw(f, model, &theme))?;
        Ok(())
    }
}

impl RenderSink<SystemDashboard> for TerminalSink {
    fn render(&mut self, model: &SystemDashboard) -> io::Result<()> {
        let theme = self.theme;
        self.terminal.draw(|f| system::draw(f, model, &theme))?;
        Ok(())
    }
}
