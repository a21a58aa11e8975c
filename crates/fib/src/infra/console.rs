//! Console reporting.

use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::style::{Stylize, style};

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Sink for messages addressed to the person running the tool.
pub trait Reporter {
    fn report(&mut self, level: Level, message: &str);
}

/// Line-oriented reporter writing to any [`Write`], red for errors when colors are enabled.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<Stdout> {
    /// Reporter bound to stdout, colored only when stdout is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self { out, color }
    }
}

#[cfg(test)]
impl<W: Write> Console<W> {
    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for Console<W> {
    fn report(&mut self, level: Level, message: &str) {
        let result = match (level, self.color) {
            (Level::Error, true) => writeln!(self.out, "{}", style(message).red()),
            _ => writeln!(self.out, "{message}"),
        };
        if let Err(err) = result.and_then(|()| self.out.flush()) {
            tracing::warn!(error = %err, "failed to write console message");
        }
    }
}

/// Reporter collecting messages in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub messages: Vec<(Level, String)>,
}

#[cfg(test)]
impl Recorder {
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message.as_str())
    }

    pub fn infos(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|(level, _)| *level == Level::Info)
            .map(|(_, message)| message.as_str())
    }
}

#[cfg(test)]
impl Reporter for Recorder {
    fn report(&mut self, level: Level, message: &str) {
        self.messages.push((level, message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_console_writes_one_line_per_message() {
        let mut console = Console::plain(Vec::new());
        console.report(Level::Info, "hello");
        console.report(Level::Error, "Error: boom");
        let written = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(written, "hello\nError: boom\n");
    }

    #[test]
    fn recorder_splits_levels() {
        let mut recorder = Recorder::default();
        recorder.report(Level::Info, "a");
        recorder.report(Level::Error, "b");
        assert_eq!(recorder.infos().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(recorder.errors().collect::<Vec<_>>(), vec!["b"]);
    }
}
