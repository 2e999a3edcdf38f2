use crate::runtime::session::{Exit, Session};
use crate::terminal::{Terminal, TerminalEvent};
use std::io;
use std::time::{Duration, Instant};

const IDLE_POLL: Duration = Duration::from_millis(120);

pub struct Runtime {
    session: Session,
    terminal: Terminal,
}

impl Runtime {
    pub fn new(session: Session, terminal: Terminal) -> Self {
        Self { session, terminal }
    }

    /// Drives the session until the user submits or quits. The terminal is
    /// restored before returning, on errors too.
    pub fn run(&mut self) -> io::Result<Exit> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<Exit> {
            self.render()?;

            loop {
                if let Some(exit) = self.session.take_exit() {
                    return Ok(exit);
                }

                let now = Instant::now();
                if self.session.tick(now) {
                    self.render()?;
                }

                let timeout = self.session.poll_timeout(Instant::now(), IDLE_POLL);
                let event = self.terminal.poll_event(timeout)?;
                if let TerminalEvent::Resize(size) = event {
                    self.terminal.set_size(size);
                }
                if self.session.handle_event(event, Instant::now()) {
                    self.render()?;
                }
            }
        })();

        let exit_result = self.terminal.exit();
        let exit = run_result?;
        exit_result?;
        Ok(exit)
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.session.frame(self.terminal.size());
        self.terminal.render_frame(&frame)
    }
}
