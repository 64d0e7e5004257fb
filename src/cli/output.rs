//! Colored terminal output for user-facing progress.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes sections, progress and status lines to the terminal.
///
/// Colors are used only when the target stream is a terminal.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
}

#[derive(Clone, Copy)]
enum Target {
    Stdout,
    Stderr,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn stream(target: Target) -> StandardStream {
        match target {
            Target::Stdout => {
                let choice = if io::stdout().is_terminal() {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                };
                StandardStream::stdout(choice)
            }
            Target::Stderr => {
                let choice = if io::stderr().is_terminal() {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                };
                StandardStream::stderr(choice)
            }
        }
    }

    fn write(
        &self,
        target: Target,
        color: Option<Color>,
        bold: bool,
        message: &str,
    ) -> io::Result<()> {
        let mut stream = Self::stream(target);
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        stream.set_color(&spec)?;
        writeln!(stream, "{}", message)?;
        stream.reset()?;
        stream.flush()
    }

    /// Detail line, shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose {
            self.write(Target::Stdout, None, false, message)?;
        }
        Ok(())
    }

    /// Plain progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.write(Target::Stdout, None, false, message)
    }

    /// Blank line followed by a bold section title.
    pub fn section(&self, title: &str) -> io::Result<()> {
        self.write(Target::Stdout, Some(Color::Cyan), true, &format!("\n{}\n", title))
    }

    /// Green status line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.write(Target::Stdout, Some(Color::Green), false, message)
    }

    /// Yellow warning on stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.write(Target::Stderr, Some(Color::Yellow), false, message)
    }

    /// Red error on stderr.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write(Target::Stderr, Some(Color::Red), true, message)
    }
}
