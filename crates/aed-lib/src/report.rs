use crate::{
    decision::{Decision, Verdict},
    metrics::{rhythm::Estimates, sqi::SignalQuality},
};
use serde::{Deserialize, Serialize};

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub sample_count: usize,
    pub peak_count: usize,
    pub quality: SignalQuality,
    pub clean: bool,
    /// Absent when the quality gate stopped the run.
    pub estimates: Option<Estimates>,
    pub organized: Option<bool>,
    pub decision: Decision,
}

impl Report {
    pub fn verdict(&self) -> Verdict {
        self.decision.verdict
    }
}

/// Format like a C++ output stream with default settings (`%g`, 6 significant digits).
pub fn format_g(value: f64) -> String {
    format_g_precision(value, 6)
}

pub fn format_g_precision(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".into() } else { "0".into() };
    }
    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= p as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn organized_label(organized: Option<bool>) -> &'static str {
    match organized {
        Some(true) => "YES",
        Some(false) => "NO",
        None => "UNKNOWN",
    }
}

/// Line-oriented console report, in the order the checks run.
pub fn render_text(report: &Report) -> String {
    let mut lines = vec!["** Starting AED Software **".to_string(), String::new()];
    match &report.estimates {
        Some(est) if report.clean => {
            lines.push("Is signal clean? YES".into());
            lines.push(format!("Baseline? {}", est.baseline));
            lines.push(format!("Average amplitude? {}", est.avg_amplitude));
            lines.push(format!("BPM? {}", est.bpm));
            lines.push(format!(
                "Organized? {} ({})",
                organized_label(report.organized),
                est.uniformity
            ));
            lines.push(format!("Shock patient? {}", report.decision.verdict));
        }
        _ => lines.push(format!("Is signal clean? {}", Verdict::NoShock)),
    }
    lines.push(String::new());
    lines.push("** Done **".into());
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string(report)
}
