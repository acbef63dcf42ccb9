//! Replays a recorded event log through the engine.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tabstrip_core::StripConfig;
use tabstrip_protocol::{encode_command, parse_event_line, ProtocolError};
use tracing::{debug, warn};

use crate::driver::Driver;

/// Counters reported after a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    pub events: usize,
    pub skipped: usize,
    pub commands: usize,
}

/// Feed every event line of `reader` to a fresh strip, writing the
/// resulting commands to `writer` one JSON line each.
///
/// Blank and malformed lines are skipped.
pub fn replay<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    config: StripConfig,
) -> Result<ReplayStats> {
    let mut driver = Driver::new(config);
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read event line {}", index + 1))?;
        let event = match parse_event_line(&line) {
            Ok(event) => event,
            Err(ProtocolError::EmptyLine) => continue,
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                stats.skipped += 1;
                continue;
            }
        };

        debug!("Event {}: {:?}", index + 1, event);
        stats.events += 1;
        for command in driver.handle(event) {
            writeln!(writer, "{}", encode_command(&command)?)?;
            stats.commands += 1;
        }
    }

    writer.flush()?;
    Ok(stats)
}
