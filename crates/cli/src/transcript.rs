//! JSON-lines event transcripts.
//!
//! One event object per line, as captured from the device console:
//!
//! ```text
//! {"label": "start", "payload": "1", "timestamp": 0.52}
//! {"label": "format_done"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. `payload` and
//! `timestamp` are optional.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use resilience_core::Event;

/// Read a transcript file.
pub fn read_transcript_file(path: &Path) -> Result<Vec<Event>, String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open transcript '{}': {}", path.display(), e))?;
    read_transcript(BufReader::new(file))
}

/// Parse a transcript from any buffered reader.
pub fn read_transcript<R: BufRead>(reader: R) -> Result<Vec<Event>, String> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| format!("Failed to read line {}: {}", line_no, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event: Event = serde_json::from_str(trimmed)
            .map_err(|e| format!("Invalid event on line {}: {}", line_no, e))?;
        events.push(event);
    }
    Ok(events)
}
