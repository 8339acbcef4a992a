use crate::{
    decision::{decide, Decision, DecisionPolicy},
    metrics::{
        rhythm::estimate_trace,
        sqi::{evaluate_sqi, QualityGate},
    },
    plot::{figure_from_trace, PlotBackend},
    report::Report,
    signal::Trace,
};
use log::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub policy: DecisionPolicy,
    /// Report undefined estimates as 0 and decide on those zeros.
    pub legacy_sentinels: bool,
    /// Upper bound on line points handed to the plot backend.
    pub max_plot_points: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            policy: DecisionPolicy::default(),
            legacy_sentinels: false,
            max_plot_points: 4096,
        }
    }
}

/// Quality gate, chart, estimators and shock decision over one trace.
///
/// The plot backend is only invoked for clean traces, and its errors are logged rather
/// than returned so a failed chart never blocks the decision.
pub fn run_pipeline<G, B>(
    trace: &Trace,
    gate: &G,
    backend: &mut B,
    opts: &PipelineOptions,
) -> Report
where
    G: QualityGate + ?Sized,
    B: PlotBackend + ?Sized,
{
    let quality = evaluate_sqi(trace.amplitudes());
    let sample_count = trace.len();
    let peak_count = trace.peak_count();

    if !gate.is_signal_clean(trace.amplitudes()) {
        info!("signal rejected by quality gate ({} samples)", sample_count);
        return Report {
            sample_count,
            peak_count,
            quality,
            clean: false,
            estimates: None,
            organized: None,
            decision: Decision::not_clean(),
        };
    }

    let fig = figure_from_trace(trace, opts.max_plot_points);
    if let Err(err) = backend.draw(&fig) {
        warn!("failed to render ECG chart: {:#}", err);
    }

    let mut estimates = estimate_trace(trace);
    if opts.legacy_sentinels {
        estimates = estimates.legacy_sentinels();
    }
    let decision = decide(&estimates, &opts.policy);
    info!(
        "{} samples, {} peaks -> {} {:?}",
        sample_count, peak_count, decision.verdict, decision.reasons
    );
    Report {
        sample_count,
        peak_count,
        quality,
        clean: true,
        estimates: Some(estimates),
        organized: opts.policy.is_organized(estimates.uniformity),
        decision,
    }
}
