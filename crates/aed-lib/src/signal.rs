use crate::error::TraceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded ECG lead as three index-aligned sequences.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    timestamps: Vec<f64>,
    amplitudes: Vec<f64>,
    peaks: Vec<bool>,
}

impl Trace {
    /// Build a trace, rejecting unequal lengths and timestamps that go backwards.
    pub fn new(
        timestamps: Vec<f64>,
        amplitudes: Vec<f64>,
        peaks: Vec<bool>,
    ) -> Result<Self, TraceError> {
        if timestamps.len() != amplitudes.len() || timestamps.len() != peaks.len() {
            return Err(TraceError::LengthMismatch {
                timestamps: timestamps.len(),
                amplitudes: amplitudes.len(),
                peaks: peaks.len(),
            });
        }
        for (i, w) in timestamps.windows(2).enumerate() {
            if w[1] < w[0] {
                return Err(TraceError::NonMonotonic {
                    index: i + 1,
                    previous: w[0],
                    current: w[1],
                });
            }
        }
        Ok(Self {
            timestamps,
            amplitudes,
            peaks,
        })
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn peaks(&self) -> &[bool] {
        &self.peaks
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    pub fn peak_count(&self) -> usize {
        self.peaks.iter().filter(|&&p| p).count()
    }

    /// Seconds between the first and last sample.
    pub fn duration(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Sample indices flagged as R-peaks, in time order.
    pub fn peak_indices(&self) -> Vec<usize> {
        peak_indices(&self.peaks)
    }
}

pub(crate) fn peak_indices(peaks: &[bool]) -> Vec<usize> {
    peaks
        .iter()
        .enumerate()
        .filter_map(|(i, &p)| p.then_some(i))
        .collect()
}

/// A derived scalar that may not be measurable from the available data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Estimate {
    /// Not enough data (e.g. too few peaks) to measure this quantity.
    Undefined,
    Value(f64),
}

impl Estimate {
    pub fn value(self) -> Option<f64> {
        match self {
            Estimate::Undefined => None,
            Estimate::Value(v) => Some(v),
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Estimate::Value(_))
    }

    /// Collapse `Undefined` to a measured zero, the convention of the legacy report.
    pub fn or_zero(self) -> Self {
        Estimate::Value(self.value().unwrap_or(0.0))
    }
}

impl From<Option<f64>> for Estimate {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Estimate::Value(v),
            None => Estimate::Undefined,
        }
    }
}

impl From<Estimate> for Option<f64> {
    fn from(value: Estimate) -> Self {
        value.value()
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Undefined => f.write_str("undefined"),
            Estimate::Value(v) => f.write_str(&crate::report::format_g(*v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        let err = Trace::new(vec![0.0, 1.0], vec![0.5], vec![false, true]).unwrap_err();
        assert!(matches!(
            err,
            TraceError::LengthMismatch {
                timestamps: 2,
                amplitudes: 1,
                peaks: 2
            }
        ));
    }

    #[test]
    fn rejects_backwards_time() {
        let err = Trace::new(vec![0.0, 2.0, 1.0], vec![0.0; 3], vec![false; 3]).unwrap_err();
        assert!(matches!(err, TraceError::NonMonotonic { index: 2, .. }));
    }

    #[test]
    fn repeated_timestamps_are_allowed() {
        let trace = Trace::new(
            vec![0.0, 0.0, 1.0],
            vec![0.0; 3],
            vec![true, false, true],
        )
        .unwrap();
        assert_eq!(trace.peak_indices(), vec![0, 2]);
        assert_eq!(trace.peak_count(), 2);
        assert!((trace.duration() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn estimate_json_uses_null_for_undefined() {
        assert_eq!(serde_json::to_string(&Estimate::Undefined).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Estimate::Value(1.5)).unwrap(), "1.5");
        let back: Estimate = serde_json::from_str("null").unwrap();
        assert_eq!(back, Estimate::Undefined);
    }

    #[test]
    fn or_zero_keeps_values() {
        assert_eq!(Estimate::Undefined.or_zero(), Estimate::Value(0.0));
        assert_eq!(Estimate::Value(3.0).or_zero(), Estimate::Value(3.0));
        assert_eq!(Estimate::Undefined.to_string(), "undefined");
    }
}
