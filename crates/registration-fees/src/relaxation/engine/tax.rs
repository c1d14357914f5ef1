use super::GstTerms;

/// Round a non-negative amount to the nearest whole unit, halves going up.
pub fn round_half_up(value: f64) -> u64 {
    if value <= 0.0 || !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as u64
}

/// `round(amount * percent / 100)`, evaluated in that order.
pub(crate) fn percent_of(amount: u64, percent: f64) -> u64 {
    round_half_up(amount as f64 * percent / 100.0)
}

/// Intra-state split: CGST and SGST each take half the rate, rounded independently.
pub(crate) fn gst_split(subtotal: u64, gst: &GstTerms) -> (u64, u64) {
    if !gst.applicable {
        return (0, 0);
    }
    let half = round_half_up(subtotal as f64 * gst.percent / 2.0 / 100.0);
    (half, half)
}
