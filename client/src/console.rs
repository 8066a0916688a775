//! Text output captured on the bot thread and shipped with the next intent

use std::fmt::Write;

/// Source of captured console text, drained once per sent intent
pub trait ConsoleCapture: Send {
    fn write_out(&mut self, text: &str);
    fn write_err(&mut self, text: &str);
    /// Take everything written since the last drain as `(stdout, stderr)`
    fn drain(&mut self) -> (Option<String>, Option<String>);
}

/// Keeps everything in memory until the next send
#[derive(Debug, Default)]
pub struct BufferedConsole {
    out: String,
    err: String,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsoleCapture for BufferedConsole {
    fn write_out(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn write_err(&mut self, text: &str) {
        let _ = writeln!(self.err, "{text}");
    }

    fn drain(&mut self) -> (Option<String>, Option<String>) {
        let take = |buffer: &mut String| (!buffer.is_empty()).then(|| std::mem::take(buffer));
        (take(&mut self.out), take(&mut self.err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_takes_lines() {
        let mut console = BufferedConsole::new();
        console.write_out("hello");
        console.write_out("world");
        console.write_err("oops");

        let (out, err) = console.drain();
        assert_eq!(out.as_deref(), Some("hello\nworld\n"));
        assert_eq!(err.as_deref(), Some("oops\n"));
    }

    #[test]
    fn test_drain_empty() {
        let mut console = BufferedConsole::new();
        console.write_out("once");
        console.drain();

        assert_eq!(console.drain(), (None, None));
    }
}
