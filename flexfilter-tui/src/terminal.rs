//! Raw-mode terminal handle.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{
        Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal,
};

use crate::render::Frame;

pub struct Terminal {
    stdout: io::Stdout,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        Ok(Self { stdout })
    }

    pub fn width(&self) -> io::Result<u16> {
        Ok(terminal::size()?.0)
    }

    /// Block until the next terminal event.
    pub fn read(&self) -> io::Result<CrosstermEvent> {
        event::read()
    }

    pub fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;

        for (y, line) in frame.rows() {
            queue!(self.stdout, cursor::MoveTo(0, y))?;
            for span in line {
                if let Some(fg) = span.fg {
                    queue!(self.stdout, SetForegroundColor(fg))?;
                }
                if let Some(bg) = span.bg {
                    queue!(self.stdout, SetBackgroundColor(bg))?;
                }
                if span.bold {
                    queue!(self.stdout, SetAttribute(Attribute::Bold))?;
                }
                if span.reverse {
                    queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
                }
                queue!(
                    self.stdout,
                    Print(&span.text),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            }
        }

        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
