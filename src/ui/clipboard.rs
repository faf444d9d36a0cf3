//! # Clipboard
//!
//! Copies text through the OSC 52 escape sequence. The terminal emulator
//! owns the clipboard, so this works over SSH where no display server is
//! reachable. Terminals without OSC 52 support ignore the sequence.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;

fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Copy `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(osc52_sequence(text).as_bytes())
        .context("Failed to write clipboard escape sequence")?;
    stdout.flush().context("Failed to flush clipboard escape sequence")?;
    Ok(())
}
