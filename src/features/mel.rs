use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;

pub const ANALYSIS_SAMPLE_RATE: u32 = 16_000;
pub(crate) const WINDOW_MS: usize = 100;
pub(crate) const HOP_MS: usize = 40;
pub(crate) const MEL_BANDS: usize = 40;
pub(crate) const MFCC_COUNT: usize = 13;
const MIN_FREQ: f64 = 20.0;

/// MFCC frames for one clip at the 40 ms frame clock, one `Vec` per frame.
pub(crate) fn mfcc_frames(samples: &[f32]) -> Vec<Vec<f64>> {
    let audio: Vec<f64> = samples.iter().map(|&s| s as f64).collect();

    let fft_size = (ANALYSIS_SAMPLE_RATE as usize * WINDOW_MS / 1000).max(1);
    let hop_size = (ANALYSIS_SAMPLE_RATE as usize * HOP_MS / 1000).max(1);

    let stft = spectrum::rstft(&audio, fft_size, hop_size, WindowType::Hanning);
    let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
    let power = analysis::make_power_spectrogram(&magnitude);

    let freqs = spectrum::rfftfreq(fft_size, ANALYSIS_SAMPLE_RATE);
    let filterbank = MelFilterbank::new(
        MIN_FREQ,
        (ANALYSIS_SAMPLE_RATE as f64) / 2.0,
        MEL_BANDS,
        &freqs,
        true,
    );
    let mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);

    analysis::mel::mfcc_spectrogram(&mel, MFCC_COUNT, None)
}
