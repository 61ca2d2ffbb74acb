use anyhow::{Context, Result};
use std::io::Write;

/// Surface for short, fire-and-forget status messages.
pub trait Notifier {
    fn emit(&self, title: &str, body: &str) -> Result<()>;
}

/// Prints `title: body` lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn emit(&self, title: &str, body: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}: {}", title, body).context("Failed to write notification")?;
        out.flush().context("Failed to flush notification")
    }
}
