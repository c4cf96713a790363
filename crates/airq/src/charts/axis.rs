//! Value axis ticks.

/// Round `x` to 1, 2, 5 or 10 times a power of ten.
///
/// With `round` the closest such number is taken, otherwise the smallest
/// one not below `x`.
fn nice_number(x: f64, round: bool) -> f64 {
    let exponent = x.log10().floor();
    let fraction = x / 10f64.powf(exponent);

    let nice = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * 10f64.powf(exponent)
}

/// Evenly spaced round tick values covering `[min, max]`.
///
/// The first tick is at or below `min` and the last at or above `max`, so
/// the ticks double as the axis range. An empty or degenerate range is
/// widened to one unit above `min`.
pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<f64> {
    let min = if min.is_finite() { min } else { 0.0 };
    let mut max = if max.is_finite() { max } else { min + 1.0 };
    if max <= min {
        max = min + 1.0;
    }

    let range = nice_number(max - min, false);
    let step = nice_number(range / (max_ticks.max(2) - 1) as f64, true);
    let start = (min / step).floor() as i64;
    let end = (max / step).ceil() as i64;

    (start..=end)
        .map(|i| {
            let v = i as f64 * step;
            // strip floating point noise such as 0.30000000000000004
            (v / step).round() * step
        })
        .collect()
}

/// Tick label with as many decimals as the step needs.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{:.*}", decimals, value)
}
