//! Per-indicator scoring rules. Every rule returns a value in [0, 1].
//!
//! | rule       | mapping                                                  |
//! |------------|----------------------------------------------------------|
//! | stochastic | %J linear from [oversold, overbought] to [0, 1], clipped |
//! | bollinger  | position of close inside the band, clipped               |
//! | volume     | 0.5 + 0.5 · tanh(k · (ratio − 1))                        |
//! | ma_cross   | 1 above both MAs, 0 below both, 0.5 otherwise            |
//! | rsi        | RSI linear from [low, high] to [0, 1], clipped           |
//! | macd       | 0.5 + 0.5 · tanh(hist / scale)                           |
//!
//! NaN inputs produce NaN so the caller can drop the day.

/// Band widths at or below this fraction of price count as zero width.
pub const BAND_WIDTH_FLOOR: f64 = 1e-9;

/// Floor on the MACD scale, as a fraction of price.
pub const MACD_SCALE_FLOOR: f64 = 1e-6;

fn linear(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() {
        return f64::NAN;
    }
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}

pub fn stochastic_score(j: f64, oversold: f64, overbought: f64) -> f64 {
    linear(j, oversold, overbought)
}

pub fn bollinger_score(close: f64, upper: f64, lower: f64) -> f64 {
    if close.is_nan() || upper.is_nan() || lower.is_nan() {
        return f64::NAN;
    }
    let width = upper - lower;
    if width <= BAND_WIDTH_FLOOR * close.abs() {
        return 0.5;
    }
    ((close - lower) / width).clamp(0.0, 1.0)
}

pub fn volume_score(ratio: f64, sensitivity: f64) -> f64 {
    0.5 + 0.5 * (sensitivity * (ratio - 1.0)).tanh()
}

pub fn ma_cross_score(close: f64, fast: f64, slow: f64) -> f64 {
    if close.is_nan() || fast.is_nan() || slow.is_nan() {
        f64::NAN
    } else if close > fast && close > slow {
        1.0
    } else if close < fast && close < slow {
        0.0
    } else {
        0.5
    }
}

pub fn rsi_score(rsi: f64, low: f64, high: f64) -> f64 {
    linear(rsi, low, high)
}

pub fn macd_score(hist: f64, scale: f64, close: f64) -> f64 {
    if hist.is_nan() || scale.is_nan() || close.is_nan() {
        return f64::NAN;
    }
    let scale = scale.max(MACD_SCALE_FLOOR * close.abs());
    if scale == 0.0 {
        return 0.5;
    }
    0.5 + 0.5 * (hist / scale).tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn stochastic_thresholds() {
        assert_eq!(stochastic_score(10.0, 20.0, 80.0), 0.0);
        assert_eq!(stochastic_score(95.0, 20.0, 80.0), 1.0);
        assert!((stochastic_score(50.0, 20.0, 80.0) - 0.5).abs() < EPS);
        assert!(stochastic_score(f64::NAN, 20.0, 80.0).is_nan());
    }

    #[test]
    fn bollinger_breaches_and_midpoint() {
        assert_eq!(bollinger_score(111.0, 110.0, 90.0), 1.0);
        assert_eq!(bollinger_score(89.0, 110.0, 90.0), 0.0);
        assert!((bollinger_score(100.0, 110.0, 90.0) - 0.5).abs() < EPS);
        assert!((bollinger_score(105.0, 110.0, 90.0) - 0.75).abs() < EPS);
    }

    #[test]
    fn zero_width_band_is_neutral() {
        assert_eq!(bollinger_score(100.0, 100.0, 100.0), 0.5);
        assert_eq!(bollinger_score(100.0, 100.0 + 1e-12, 100.0 - 1e-12), 0.5);
    }

    #[test]
    fn volume_centered_at_one() {
        assert!((volume_score(1.0, 1.0) - 0.5).abs() < EPS);
        assert!(volume_score(5.0, 1.0) > 0.99);
        assert!(volume_score(0.2, 1.0) < 0.5);
        assert!(volume_score(1000.0, 1.0) <= 1.0);
    }

    #[test]
    fn ma_cross_states() {
        assert_eq!(ma_cross_score(105.0, 100.0, 101.0), 1.0);
        assert_eq!(ma_cross_score(95.0, 100.0, 101.0), 0.0);
        assert_eq!(ma_cross_score(100.5, 100.0, 101.0), 0.5);
        assert_eq!(ma_cross_score(100.0, 100.0, 100.0), 0.5);
    }

    #[test]
    fn rsi_linear_and_clipped() {
        assert_eq!(rsi_score(20.0, 30.0, 70.0), 0.0);
        assert_eq!(rsi_score(80.0, 30.0, 70.0), 1.0);
        assert!((rsi_score(60.0, 30.0, 70.0) - 0.75).abs() < EPS);
    }

    #[test]
    fn macd_sign_and_floor() {
        assert!(macd_score(1.0, 1.0, 100.0) > 0.5);
        assert!(macd_score(-1.0, 1.0, 100.0) < 0.5);
        // float noise on a flat series stays neutral
        assert!((macd_score(1e-14, 1e-14, 100.0) - 0.5).abs() < 1e-6);
        assert_eq!(macd_score(0.0, 0.0, 0.0), 0.5);
    }
}
