use crate::{metrics::rhythm::Estimates, signal::Estimate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thresholds of the fixed shock/no-shock rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// Average peak amplitude below this means no discernible R-waves.
    pub min_amplitude: f64,
    /// Baseline above this is treated as drift.
    pub max_baseline: f64,
    /// Uniformity at or above this is a disorganized rhythm.
    pub uniformity_threshold: f64,
    /// A disorganized rhythm must be faster than this to be shockable.
    pub min_bpm_fast: f64,
    /// Rates at or below this are never shocked.
    pub min_bpm_slow: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            min_amplitude: 0.1,
            max_baseline: 1.0,
            uniformity_threshold: 1.0,
            min_bpm_fast: 200.0,
            min_bpm_slow: 150.0,
        }
    }
}

impl DecisionPolicy {
    /// `Some(true)` when the rhythm is organized, `None` when uniformity could not be measured.
    pub fn is_organized(&self, uniformity: Estimate) -> Option<bool> {
        uniformity.value().map(|u| u < self.uniformity_threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Shock,
    NoShock,
}

impl Verdict {
    pub fn is_shock(self) -> bool {
        self == Verdict::Shock
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Shock => f.write_str("YES, SHOCK!"),
            Verdict::NoShock => f.write_str("NO, DO NOT SHOCK"),
        }
    }
}

/// A rule of the decision that vetoed the shock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoShockReason {
    SignalNotClean,
    WeakAmplitude,
    AmplitudeUndefined,
    BaselineDrift,
    BaselineUndefined,
    DisorganizedSlow,
    RateTooLow,
    RateUndefined,
}

impl fmt::Display for NoShockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NoShockReason::SignalNotClean => "signal failed the quality check",
            NoShockReason::WeakAmplitude => "average peak amplitude too weak",
            NoShockReason::AmplitudeUndefined => "no R-peaks to measure amplitude",
            NoShockReason::BaselineDrift => "baseline drift too high",
            NoShockReason::BaselineUndefined => "baseline could not be measured",
            NoShockReason::DisorganizedSlow => "disorganized rhythm below fibrillation rate",
            NoShockReason::RateTooLow => "heart rate too low",
            NoShockReason::RateUndefined => "fewer than two R-peaks to measure rate",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub reasons: Vec<NoShockReason>,
}

impl Decision {
    pub fn not_clean() -> Self {
        Self {
            verdict: Verdict::NoShock,
            reasons: vec![NoShockReason::SignalNotClean],
        }
    }
}

/// Combine the four estimates into a verdict. Any rule firing vetoes the shock.
pub fn decide(estimates: &Estimates, policy: &DecisionPolicy) -> Decision {
    let mut reasons = Vec::new();

    match estimates.avg_amplitude {
        Estimate::Undefined => reasons.push(NoShockReason::AmplitudeUndefined),
        Estimate::Value(a) if a < policy.min_amplitude => {
            reasons.push(NoShockReason::WeakAmplitude)
        }
        Estimate::Value(_) => {}
    }

    match estimates.baseline {
        Estimate::Undefined => reasons.push(NoShockReason::BaselineUndefined),
        Estimate::Value(b) if b > policy.max_baseline => {
            reasons.push(NoShockReason::BaselineDrift)
        }
        Estimate::Value(_) => {}
    }

    if let (Estimate::Value(u), Estimate::Value(r)) = (estimates.uniformity, estimates.bpm) {
        if u >= policy.uniformity_threshold && r < policy.min_bpm_fast {
            reasons.push(NoShockReason::DisorganizedSlow);
        }
    }

    match estimates.bpm {
        Estimate::Undefined => reasons.push(NoShockReason::RateUndefined),
        Estimate::Value(r) if r <= policy.min_bpm_slow => reasons.push(NoShockReason::RateTooLow),
        Estimate::Value(_) => {}
    }

    let verdict = if reasons.is_empty() {
        Verdict::Shock
    } else {
        Verdict::NoShock
    };
    Decision { verdict, reasons }
}
