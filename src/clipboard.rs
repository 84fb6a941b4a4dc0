use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    System,
    Terminal,
}

/// System clipboard with an OSC 52 fallback for terminals that are not
/// attached to a desktop session (ssh, containers).
pub struct Clipboard {
    // kept alive: on X11 the selection dies with its owner
    system: Option<arboard::Clipboard>,
}

impl Clipboard {
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(cb) => Some(cb),
            Err(e) => {
                debug!(error = %e, "system clipboard unavailable");
                None
            }
        };
        Self { system }
    }

    pub fn copy(&mut self, text: &str) -> Result<CopyMethod> {
        if let Some(cb) = self.system.as_mut() {
            match cb.set_text(text) {
                Ok(()) => return Ok(CopyMethod::System),
                Err(e) => debug!(error = %e, "system clipboard rejected text, trying OSC 52"),
            }
        }
        write_osc52(&mut io::stdout(), text)?;
        Ok(CopyMethod::Terminal)
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_osc52<W: Write>(out: &mut W, text: &str) -> Result<()> {
    let payload = STANDARD.encode(text);
    write!(out, "\x1b]52;c;{}\x07", payload).context("Could not write clipboard sequence")?;
    out.flush().context("Could not flush clipboard sequence")?;
    Ok(())
}
