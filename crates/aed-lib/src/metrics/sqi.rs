use serde::{Deserialize, Serialize};

/// Decides whether a trace is usable before any rhythm analysis runs.
pub trait QualityGate {
    fn is_signal_clean(&self, amplitudes: &[f64]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Smallest peak-to-peak range that still counts as a connected lead.
    pub min_dynamic_range: f64,
    /// Largest absolute amplitude before the amplifier is considered railed.
    pub max_abs_amplitude: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_dynamic_range: 1e-9,
            max_abs_amplitude: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalQuality {
    pub sample_count: usize,
    pub non_finite: usize,
    pub dynamic_range: f64,
    pub peak_abs: f64,
}

impl SignalQuality {
    pub fn is_acceptable(&self, thresholds: &QualityThresholds) -> bool {
        self.sample_count > 0
            && self.non_finite == 0
            && self.dynamic_range > thresholds.min_dynamic_range
            && self.peak_abs <= thresholds.max_abs_amplitude
    }
}

pub fn evaluate_sqi(amplitudes: &[f64]) -> SignalQuality {
    let non_finite = amplitudes.iter().filter(|x| !x.is_finite()).count();
    let finite: Vec<f64> = amplitudes.iter().copied().filter(|x| x.is_finite()).collect();
    let (min, max) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let dynamic_range = if finite.is_empty() { 0.0 } else { max - min };
    let peak_abs = finite.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    SignalQuality {
        sample_count: amplitudes.len(),
        non_finite,
        dynamic_range,
        peak_abs,
    }
}

/// Default gate over [`evaluate_sqi`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SqiGate {
    pub thresholds: QualityThresholds,
}

impl QualityGate for SqiGate {
    fn is_signal_clean(&self, amplitudes: &[f64]) -> bool {
        evaluate_sqi(amplitudes).is_acceptable(&self.thresholds)
    }
}

/// Check a trace with the default thresholds.
pub fn is_signal_clean(amplitudes: &[f64]) -> bool {
    SqiGate::default().is_signal_clean(amplitudes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signal_is_not_clean() {
        assert!(!is_signal_clean(&[]));
    }

    #[test]
    fn flatline_is_not_clean() {
        assert!(!is_signal_clean(&[0.4; 50]));
    }

    #[test]
    fn non_finite_sample_is_not_clean() {
        let q = evaluate_sqi(&[0.0, f64::NAN, 1.0]);
        assert_eq!(q.non_finite, 1);
        assert!(!q.is_acceptable(&QualityThresholds::default()));
    }

    #[test]
    fn railed_signal_is_not_clean() {
        assert!(!is_signal_clean(&[0.0, 25.0, 0.0, -25.0]));
    }

    #[test]
    fn ordinary_signal_is_clean() {
        let data: Vec<f64> = (0..100).map(|i| (i as f64 * 0.3).sin()).collect();
        let q = evaluate_sqi(&data);
        assert_eq!(q.sample_count, 100);
        assert!(q.dynamic_range > 1.0);
        assert!(is_signal_clean(&data));
    }

    #[test]
    fn custom_thresholds_apply() {
        let gate = SqiGate {
            thresholds: QualityThresholds {
                max_abs_amplitude: 1.0,
                ..QualityThresholds::default()
            },
        };
        assert!(!gate.is_signal_clean(&[0.0, 2.0]));
        assert!(gate.is_signal_clean(&[0.0, 0.5]));
    }
}
