/// Duration of one feature frame.
pub const FRAME_PERIOD_SECONDS: f64 = 0.040;

pub fn frame_to_seconds(frame: usize) -> f64 {
    frame as f64 * FRAME_PERIOD_SECONDS
}

/// Frame index containing the instant `seconds` (truncating).
pub fn seconds_to_frame(seconds: f64) -> usize {
    (seconds / FRAME_PERIOD_SECONDS) as usize
}

/// Render seconds as `H:MM:SS.mmm`, milliseconds rounded to nearest.
pub fn format_clock(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = total_ms % 3_600_000 / 60_000;
    let secs = total_ms % 60_000 / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours}:{minutes:02}:{secs:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::{format_clock, frame_to_seconds, seconds_to_frame};

    #[test]
    fn frames_convert_at_forty_milliseconds() {
        assert_eq!(frame_to_seconds(0), 0.0);
        assert_eq!(frame_to_seconds(65), 2.6);
        assert_eq!(seconds_to_frame(2.6), 65);
        assert_eq!(seconds_to_frame(0.039), 0);
    }

    #[test]
    fn clock_format_pads_everything_but_hours() {
        assert_eq!(format_clock(0.0), "0:00:00.000");
        assert_eq!(format_clock(2.6), "0:00:02.600");
        assert_eq!(format_clock(3723.5), "1:02:03.500");
        assert_eq!(format_clock(0.0004), "0:00:00.000");
    }
}
