use ordered_float::OrderedFloat;

/// Candidate leading factors for legend values.
///
/// A leading factor lies in `[1, 10)`, so only `1, 2, 5, 10` can ever be the
/// nearest match; `20` and `50` are there so grid-option windows starting at
/// `5` or `10` can offer coarser squares at the same power of ten.
pub const NICE_NUMBERS: [f64; 6] = [1., 2., 5., 10., 20., 50.];

/// Splits `value` into `(nice, power)` such that `nice · 10^power` is the
/// nice number closest to `value`.
///
/// `power` is `floor(log10(value))`; the leading factor `value / 10^power` is
/// snapped to the nearest entry of [`NICE_NUMBERS`] by absolute difference,
/// the first entry winning ties. Returns `None` for non-positive or
/// non-finite input, which has no logarithm.
pub fn find_nearest_nice_number(value: f64) -> Option<(f64, i32)> {
    if !(value.is_finite() && value > 0.) {
        return None;
    }
    let power = value.log10().floor() as i32;
    let leading = value / 10f64.powi(power);
    let nice = NICE_NUMBERS
        .iter()
        .copied()
        .min_by_key(|n| OrderedFloat((leading - n).abs()))?;
    Some((nice, power))
}

/// Index of `nice` in [`NICE_NUMBERS`].
pub fn nice_index(nice: f64) -> Option<usize> {
    NICE_NUMBERS.iter().position(|n| *n == nice)
}

/// A window of `count` adjacent nice numbers, starting one below `nice` and
/// shifted down as needed to stay inside [`NICE_NUMBERS`].
pub fn nice_window(nice: f64, count: usize) -> Vec<f64> {
    let len = NICE_NUMBERS.len();
    let count = count.min(len);
    let idx = nice_index(nice).unwrap_or(0);
    let begin = idx.saturating_sub(1).min(len - count);
    NICE_NUMBERS[begin..begin + count].to_vec()
}
