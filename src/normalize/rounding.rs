/// Rounds to `places` decimal places, ties away from zero.
///
/// Values too large to scale have no fractional digits left and are returned as is.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
