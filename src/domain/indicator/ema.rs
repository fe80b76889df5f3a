//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = X[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are undefined.
//!
//! Only MACD consumes EMAs, and it feeds them both closes and its own line,
//! so this works on raw values rather than bars.

/// EMA over an arbitrary slice, one entry per input value.
pub(crate) fn ema_values(input: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(input.len());
    if period == 0 {
        out.resize(input.len(), None);
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &x) in input.iter().enumerate() {
        if i < period - 1 {
            sum += x;
            out.push(None);
        } else if i == period - 1 {
            sum += x;
            ema = sum / period as f64;
            out.push(Some(ema));
        } else {
            ema = x * k + ema * (1.0 - k);
            out.push(Some(ema));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_warmup() {
        let out = ema_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!(out[2..].iter().all(Option::is_some));
    }

    #[test]
    fn ema_period_1_tracks_input() {
        let out = ema_values(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn ema_seed_is_sma() {
        let out = ema_values(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(out[2].unwrap(), 20.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ema_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert_relative_eq!(out[3].unwrap(), ema_3);
        assert_relative_eq!(out[4].unwrap(), ema_4);
    }

    #[test]
    fn ema_equal_prices() {
        let out = ema_values(&[100.0; 5], 3);
        for value in &out[2..] {
            assert_relative_eq!(value.unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_period_0() {
        let out = ema_values(&[10.0, 20.0], 0);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn ema_two_period_on_short_slice() {
        let out = ema_values(&[1.0, 2.0, 3.0], 2);
        assert_eq!(out[0], None);
        assert_relative_eq!(out[1].unwrap(), 1.5);
        // k = 2/3: 3*2/3 + 1.5/3
        assert_relative_eq!(out[2].unwrap(), 2.5);
    }
}
