//! SIMD kernels shared by the indicators.
//!
//! These use the `wide` crate for portable SIMD operations.

use wide::f64x4;

/// Split close-to-close changes into gains and losses.
///
/// Both outputs have `data.len() - 1` entries; losses are positive numbers.
pub fn split_deltas(data: &[f64]) -> (Vec<f64>, Vec<f64>) {
    if data.len() < 2 {
        return (vec![], vec![]);
    }

    let n = data.len() - 1;
    let mut gains = Vec::with_capacity(n);
    let mut losses = Vec::with_capacity(n);
    let chunks = n / 4;
    let zero = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let prev = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        let curr = f64x4::new([
            data[idx + 1],
            data[idx + 2],
            data[idx + 3],
            data[idx + 4],
        ]);

        let diff = curr - prev;
        gains.extend(diff.max(zero).to_array());
        losses.extend((-diff).max(zero).to_array());
    }

    for i in (chunks * 4)..n {
        let change = data[i + 1] - data[i];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    (gains, losses)
}

/// Sum of a slice, four lanes at a time.
pub fn sum(data: &[f64]) -> f64 {
    let chunks = data.chunks_exact(4);
    let tail: f64 = chunks.remainder().iter().sum();

    let lanes = chunks.fold(f64x4::splat(0.0), |acc, c| {
        acc + f64x4::new([c[0], c[1], c[2], c[3]])
    });

    lanes.to_array().iter().sum::<f64>() + tail
}

/// Arithmetic mean of a slice, `None` when empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        None
    } else {
        Some(sum(data) / data.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_deltas_matches_scalar() {
        let data = vec![10.0, 11.0, 10.5, 10.5, 12.0, 11.0, 13.0];
        let (gains, losses) = split_deltas(&data);

        assert_eq!(gains.len(), 6);
        for i in 0..6 {
            let change = data[i + 1] - data[i];
            assert!((gains[i] - change.max(0.0)).abs() < 1e-12);
            assert!((losses[i] - (-change).max(0.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_split_deltas_short_input() {
        let (gains, losses) = split_deltas(&[5.0]);
        assert!(gains.is_empty() && losses.is_empty());
    }

    #[test]
    fn test_sum_and_mean() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        assert!((sum(&data) - 55.0).abs() < 1e-12);
        assert!((mean(&data).unwrap() - 5.5).abs() < 1e-12);
        assert!(mean(&[]).is_none());
    }
}
