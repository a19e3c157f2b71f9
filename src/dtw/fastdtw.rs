use ndarray::{s, Array2, ArrayView2};

use super::kernel::{dtwbd, PathResult};
use super::window::{self, Window};
use super::AlignmentError;

/// Multi-resolution boundary-detecting alignment.
///
/// Sequences shorter than `2 * (radius + 2)` frames are solved over the full
/// grid. Longer inputs are halved, aligned recursively, and the coarse path
/// is expanded into a radius-wide window constraining the finer solve. When
/// the coarse level finds no match the finer level still runs over the full
/// grid, since a match may only be visible at the finer grain.
pub fn fast_dtwbd(
    s: ArrayView2<'_, f64>,
    t: ArrayView2<'_, f64>,
    skip_penalty: f64,
    radius: usize,
) -> Result<PathResult, AlignmentError> {
    let min_len = 2 * (radius + 2);
    if s.nrows() < min_len || t.nrows() < min_len {
        return dtwbd(s, t, skip_penalty, None);
    }

    let coarse_s = coarsen(s);
    let coarse_t = coarsen(t);
    let coarse = fast_dtwbd(coarse_s.view(), coarse_t.view(), skip_penalty, radius)?;

    let window = if coarse.path.is_empty() {
        Window::full(s.nrows(), t.nrows())
    } else {
        window::from_coarse_path(&coarse.path, radius, s.nrows(), t.nrows())
    };
    dtwbd(s, t, skip_penalty, Some(&window))
}

/// Halve a sequence by averaging consecutive frame pairs.
///
/// An odd trailing frame is dropped at this resolution.
pub(crate) fn coarsen(seq: ArrayView2<'_, f64>) -> Array2<f64> {
    let half = seq.nrows() / 2;
    let even = seq.slice(s![..2 * half;2, ..]);
    let odd = seq.slice(s![1..2 * half;2, ..]);
    (&even + &odd) / 2.0
}
