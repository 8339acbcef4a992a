use crate::signal::{peak_indices, Estimate, Trace};
use log::debug;
use serde::{Deserialize, Serialize};

/// The four scalars the shock decision is made from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimates {
    pub baseline: Estimate,
    pub avg_amplitude: Estimate,
    pub bpm: Estimate,
    pub uniformity: Estimate,
}

impl Estimates {
    /// Replace every undefined estimate with 0, as the legacy report did.
    pub fn legacy_sentinels(self) -> Self {
        Self {
            baseline: self.baseline.or_zero(),
            avg_amplitude: self.avg_amplitude.or_zero(),
            bpm: self.bpm.or_zero(),
            uniformity: self.uniformity.or_zero(),
        }
    }
}

/// Median amplitude.
pub fn baseline(amplitudes: &[f64]) -> Estimate {
    if amplitudes.is_empty() {
        return Estimate::Undefined;
    }
    let mut sorted = amplitudes.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };
    Estimate::Value(median)
}

/// Mean absolute deviation of the peak-flagged amplitudes from `baseline`.
pub fn avg_amplitude(amplitudes: &[f64], peaks: &[bool], baseline: f64) -> Estimate {
    let (total, count) = amplitudes
        .iter()
        .zip(peaks)
        .filter(|&(_, &p)| p)
        .fold((0.0, 0usize), |(total, count), (a, _)| {
            (total + (a - baseline).abs(), count + 1)
        });
    if count == 0 {
        return Estimate::Undefined;
    }
    Estimate::Value(total / count as f64)
}

/// Beats per minute from the mean interval between consecutive peaks.
pub fn bpm(timestamps: &[f64], peaks: &[bool]) -> Estimate {
    let times: Vec<f64> = timestamps
        .iter()
        .zip(peaks)
        .filter(|&(_, &p)| p)
        .map(|(&t, _)| t)
        .collect();
    if times.len() < 2 {
        return Estimate::Undefined;
    }
    let intervals = times.len() - 1;
    let mean = times.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / intervals as f64;
    if mean <= 0.0 {
        return Estimate::Undefined;
    }
    Estimate::Value(60.0 / mean)
}

/// Baseline crossings between each pair of consecutive peaks.
///
/// Like the other estimators, flags past the end of `amplitudes` are ignored.
pub fn deflection_counts(amplitudes: &[f64], peaks: &[bool], baseline: f64) -> Vec<usize> {
    let above = |x: f64| x > baseline;
    let peaks = &peaks[..peaks.len().min(amplitudes.len())];
    peak_indices(peaks)
        .windows(2)
        .map(|w| {
            amplitudes[w[0]..=w[1]]
                .windows(2)
                .filter(|pair| above(pair[0]) != above(pair[1]))
                .count()
        })
        .collect()
}

/// Population standard deviation of the deflection counts.
pub fn uniformity(amplitudes: &[f64], peaks: &[bool], baseline: f64) -> Estimate {
    let counts = deflection_counts(amplitudes, peaks, baseline);
    if counts.is_empty() {
        return Estimate::Undefined;
    }
    let n = counts.len() as f64;
    let mean = counts.iter().map(|&c| c as f64).sum::<f64>() / n;
    let var = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    Estimate::Value(var.sqrt())
}

/// Run all four estimators over one trace.
pub fn estimate_trace(trace: &Trace) -> Estimates {
    let baseline = baseline(trace.amplitudes());
    let (avg_amplitude, uniformity) = match baseline.value() {
        Some(level) => (
            avg_amplitude(trace.amplitudes(), trace.peaks(), level),
            uniformity(trace.amplitudes(), trace.peaks(), level),
        ),
        None => (Estimate::Undefined, Estimate::Undefined),
    };
    let bpm = bpm(trace.timestamps(), trace.peaks());
    debug!(
        "baseline={} avg_amplitude={} bpm={} uniformity={}",
        baseline, avg_amplitude, bpm, uniformity
    );
    Estimates {
        baseline,
        avg_amplitude,
        bpm,
        uniformity,
    }
}
