/// The logistic function `1 / (1 + e^-x)`, applied
/// to every hidden unit.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Normalized exponentials `e^x / Σ e^x`, applied to
/// the output layer as a whole.
///
/// Inputs are shifted by their maximum before
/// exponentiation, which leaves the result unchanged
/// but keeps large inputs from overflowing.
///
/// # Examples
/// ```
/// use bitevo_nn::networks::softmax;
///
/// let p = softmax(&[1.0, 2.0, 3.0]);
/// assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// assert!(p[0] < p[1] && p[1] < p[2]);
/// ```
pub fn softmax(xs: &[f64]) -> Vec<f64> {
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = xs.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-15);
        assert!((sigmoid(3.0) + sigmoid(-3.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn softmax_matches_definition() {
        let xs = [0.5f64, -1.0, 2.0];
        let denominator: f64 = xs.iter().map(|x| x.exp()).sum();
        for (p, x) in softmax(&xs).iter().zip(xs) {
            assert!((p - x.exp() / denominator).abs() < 1e-12);
        }
    }

    #[test]
    fn softmax_survives_large_inputs() {
        let p = softmax(&[1000.0, 1000.0]);
        assert_eq!(p, vec![0.5, 0.5]);
    }
}
