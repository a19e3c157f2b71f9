use anyhow::{ensure, Result};

/// Linearly interpolate `samples` onto `target_rate`.
///
/// Source positions are tracked in f64: fragment anchors are derived from
/// cumulative sample counts, and f32 indexing drifts by whole samples after a
/// few minutes of narration, which would skew the 40 ms frame clock.
pub fn to_rate(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let output_len = (samples.len() as u64 * u64::from(target_rate))
        .div_ceil(u64::from(source_rate)) as usize;
    let step = f64::from(source_rate) / f64::from(target_rate);
    let last = samples.len() - 1;

    let mut output = Vec::with_capacity(output_len);
    for index in 0..output_len {
        let position = index as f64 * step;
        let base = (position as usize).min(last);
        let next = (base + 1).min(last);
        let fraction = (position - base as f64) as f32;
        output.push(samples[base] + (samples[next] - samples[base]) * fraction);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::to_rate;

    #[test]
    fn identity_when_rates_match() {
        let input = vec![0.1, -0.2, 0.3];
        assert_eq!(to_rate(&input, 22_050, 22_050).unwrap(), input);
    }

    #[test]
    fn downsampling_keeps_a_constant_signal_and_the_expected_length() {
        let input = vec![0.5; 480];
        let resampled = to_rate(&input, 48_000, 16_000).unwrap();
        assert_eq!(resampled.len(), 160);
        assert!(resampled.iter().all(|&sample| (sample - 0.5).abs() < 1e-6));
    }

    #[test]
    fn upsampling_interpolates_between_neighbours() {
        let resampled = to_rate(&[0.0, 1.0], 8_000, 16_000).unwrap();
        assert_eq!(resampled.len(), 4);
        assert!((resampled[0] - 0.0).abs() < 1e-6);
        assert!((resampled[1] - 0.5).abs() < 1e-6);
        assert!((resampled[2] - 1.0).abs() < 1e-6);
        assert!((resampled[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn long_inputs_do_not_accumulate_positional_drift() {
        // A slow ramp over ten minutes of audio; every output sample must sit
        // between its two source neighbours.
        let len = 22_050 * 600;
        let input: Vec<f32> = (0..len).map(|i| (i % 1000) as f32 / 1000.0).collect();
        let resampled = to_rate(&input, 22_050, 16_000).unwrap();
        assert_eq!(
            resampled.len(),
            ((len as u64 * 16_000).div_ceil(22_050)) as usize
        );
        let probe = resampled[resampled.len() - 2];
        assert!((0.0..=1.0).contains(&probe));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(to_rate(&[], 8_000, 16_000).unwrap().is_empty());
    }
}
