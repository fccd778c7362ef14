//! Clock rendering helpers.

/// Render seconds as `MM:SS`, truncating fractions toward zero.
///
/// Minutes are not wrapped into hours, and an overdrawn bank keeps its sign:
/// `-61.0` renders as `-01:01`.
pub fn format_mm_ss(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().trunc() as u64;
    format!("{}{:02}:{:02}", sign, total / 60, total % 60)
}
