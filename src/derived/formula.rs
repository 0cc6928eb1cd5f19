// Total metric formulas: every input combination yields a string, never a panic.

pub const NOT_AVAILABLE: &str = "N/A";
pub const ZERO_RATE: &str = "0.00%";

/// `a / b * 100` as "12.34%"; "0.00%" unless both are finite and `b > 0`.
pub fn rate(a: Option<f64>, b: Option<f64>) -> String {
    match (finite(a), finite(b)) {
        (Some(a), Some(b)) if b > 0.0 => match two_dp(a / b * 100.0) {
            Some(pct) => format!("{}%", pct),
            None => ZERO_RATE.to_string(),
        },
        _ => ZERO_RATE.to_string(),
    }
}

/// `won / (won + lost)` as a rate.
pub fn combined_rate(won: Option<f64>, lost: Option<f64>) -> String {
    match (finite(won), finite(lost)) {
        (Some(w), Some(l)) => rate(Some(w), Some(w + l)),
        _ => ZERO_RATE.to_string(),
    }
}

/// `a - b` as "-1.30" / "1.50"; "N/A" unless both are finite.
pub fn differential(a: Option<f64>, b: Option<f64>) -> String {
    match (finite(a), finite(b)) {
        (Some(a), Some(b)) => two_dp(a - b).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn finite(x: Option<f64>) -> Option<f64> {
    x.filter(|v| v.is_finite())
}

// Rounded to two places; never "-0.00". `None` when the arithmetic overflowed.
fn two_dp(x: f64) -> Option<String> {
    if !x.is_finite() {
        return None;
    }
    let s = format!("{:.2}", x);
    Some(if s == "-0.00" { "0.00".to_string() } else { s })
}
