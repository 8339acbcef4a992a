use crate::{error::TraceError, signal::Trace};
use log::{debug, warn};
use std::path::Path;

/// How the loader reacts to a record it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Stop at the first malformed record and keep what was read before it.
    #[default]
    Lenient,
    /// Fail with [`TraceError::Malformed`].
    Strict,
}

struct Record {
    timestamp: f64,
    amplitude: f64,
    is_peak: bool,
}

fn parse_record(line: &str) -> Result<Record, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(format!("expected 3 fields, found {}: {}", fields.len(), line));
    }
    let timestamp: f64 = fields[0]
        .parse()
        .map_err(|_| format!("timestamp is not f64: {}", fields[0]))?;
    let amplitude: f64 = fields[1]
        .parse()
        .map_err(|_| format!("amplitude is not f64: {}", fields[1]))?;
    let is_peak = match fields[2] {
        "0" => false,
        "1" => true,
        other => return Err(format!("peak flag must be 0 or 1: {}", other)),
    };
    Ok(Record {
        timestamp,
        amplitude,
        is_peak,
    })
}

/// Parse `timestamp amplitude isPeak` records, one per line, ignoring blank/comment lines.
pub fn parse_trace(text: &str, mode: LoadMode) -> Result<Trace, TraceError> {
    let mut timestamps = Vec::new();
    let mut amplitudes = Vec::new();
    let mut peaks = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed = parse_record(trimmed).and_then(|rec| match timestamps.last() {
            Some(&prev) if rec.timestamp < prev => Err(format!(
                "timestamp {} is before previous {}",
                rec.timestamp, prev
            )),
            _ => Ok(rec),
        });
        let rec = match parsed {
            Ok(rec) => rec,
            Err(reason) => match mode {
                LoadMode::Strict => {
                    return Err(TraceError::Malformed {
                        line: idx + 1,
                        reason,
                    })
                }
                LoadMode::Lenient => {
                    warn!(
                        "truncating trace at line {} after {} samples: {}",
                        idx + 1,
                        timestamps.len(),
                        reason
                    );
                    break;
                }
            },
        };
        timestamps.push(rec.timestamp);
        amplitudes.push(rec.amplitude);
        peaks.push(rec.is_peak);
    }
    if mode == LoadMode::Strict && timestamps.is_empty() {
        return Err(TraceError::Empty);
    }
    debug!("parsed {} samples", timestamps.len());
    Trace::new(timestamps, amplitudes, peaks)
}

/// Read a trace file from disk.
pub fn read_trace(path: &Path, mode: LoadMode) -> Result<Trace, TraceError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TraceError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TraceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_trace(&text, mode)
}
