use std::ops::Range;

use ndarray::ArrayView2;

use super::cost::euclidean;
use super::window::Window;
use super::AlignmentError;

/// Outcome of one boundary-detecting alignment.
///
/// `distance` is the accumulated cost of the best warping path, including the
/// skip penalty paid for frames left outside the match at both ends. An empty
/// `path` means nothing beat the skip-everything baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub distance: f64,
    pub path: Vec<(usize, usize)>,
}

impl PathResult {
    pub fn is_match(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Predecessor of a DP cell, also the traceback code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    Diagonal,
    Vertical,
    Horizontal,
}

/// Dynamic time warping with boundary detection.
///
/// Unlike classic DTW, the warping path may begin and end anywhere in the
/// grid; every frame of either sequence outside the matched region costs
/// `skip_penalty`. Cells outside `window` (full grid when `None`) are never
/// evaluated. Among equal-cost predecessors the order of preference is
/// diagonal, vertical (advance `t`), horizontal (advance `s`), then a fresh
/// start, which makes the result deterministic.
pub fn dtwbd(
    s: ArrayView2<'_, f64>,
    t: ArrayView2<'_, f64>,
    skip_penalty: f64,
    window: Option<&Window>,
) -> Result<PathResult, AlignmentError> {
    check_shapes(&s, &t)?;
    let (n, m) = (s.nrows(), t.nrows());
    let baseline = skip_penalty * (n + m) as f64;
    if n == 0 && m == 0 {
        return Ok(PathResult {
            distance: baseline,
            path: Vec::new(),
        });
    }

    let full_window;
    let window = match window {
        Some(window) => {
            debug_assert_eq!((window.rows(), window.cols()), (n, m));
            window
        }
        None => {
            full_window = Window::full(n, m);
            &full_window
        }
    };

    let mut steps = StepTable::new(window)?;
    let mut previous: Vec<f64> = Vec::new();
    let mut previous_range: Range<usize> = 0..0;
    let mut min_path_distance = baseline;
    let mut path_end: Option<(usize, usize)> = None;

    for i in 0..n {
        let range = window.row(i);
        let mut current = vec![f64::INFINITY; range.len()];
        for j in range.clone() {
            let d = euclidean(s.row(i), t.row(j));

            let diagonal = if i > 0 && j > 0 {
                cost_at(&previous, &previous_range, j - 1)
            } else {
                f64::INFINITY
            };
            let vertical = if j > range.start {
                current[j - 1 - range.start]
            } else {
                f64::INFINITY
            };
            let horizontal = if i > 0 {
                cost_at(&previous, &previous_range, j)
            } else {
                f64::INFINITY
            };
            let fresh_start = skip_penalty * (i + j) as f64;

            let mut best = diagonal;
            let mut step = Step::Diagonal;
            if vertical < best {
                best = vertical;
                step = Step::Vertical;
            }
            if horizontal < best {
                best = horizontal;
                step = Step::Horizontal;
            }
            if fresh_start < best {
                best = fresh_start;
                step = Step::Start;
            }

            let accumulated = d + best;
            current[j - range.start] = accumulated;
            steps.set(i, j, step);

            let tail_skips = ((n - 1 - i) + (m - 1 - j)) as f64;
            let path_distance = accumulated + skip_penalty * tail_skips;
            if path_distance < min_path_distance {
                min_path_distance = path_distance;
                path_end = Some((i, j));
            }
        }
        previous = current;
        previous_range = range;
    }

    let Some((mut i, mut j)) = path_end else {
        return Ok(PathResult {
            distance: baseline,
            path: Vec::new(),
        });
    };

    let mut path = Vec::with_capacity(n + m);
    loop {
        path.push((i, j));
        match steps.get(i, j) {
            Step::Start => break,
            Step::Diagonal => {
                i -= 1;
                j -= 1;
            }
            Step::Vertical => j -= 1,
            Step::Horizontal => i -= 1,
        }
    }
    path.reverse();

    Ok(PathResult {
        distance: min_path_distance,
        path,
    })
}

fn check_shapes(
    s: &ArrayView2<'_, f64>,
    t: &ArrayView2<'_, f64>,
) -> Result<(), AlignmentError> {
    if s.nrows() == 0 || t.nrows() == 0 {
        if s.nrows() != t.nrows() {
            return Err(AlignmentError::InputShape(format!(
                "cannot align an empty sequence against {} frames",
                s.nrows().max(t.nrows())
            )));
        }
        return Ok(());
    }
    if s.ncols() != t.ncols() {
        return Err(AlignmentError::InputShape(format!(
            "feature dimensionality mismatch: {} vs {} coefficients",
            s.ncols(),
            t.ncols()
        )));
    }
    Ok(())
}

fn cost_at(costs: &[f64], range: &Range<usize>, j: usize) -> f64 {
    if range.contains(&j) {
        costs[j - range.start]
    } else {
        f64::INFINITY
    }
}

/// Back-pointer codes for every window cell, addressed by row offsets.
///
/// Accumulated costs are only needed for two rolling rows, so the table holds
/// one byte-sized code per cell and nothing else; traceback walks the codes.
struct StepTable {
    offsets: Vec<usize>,
    lows: Vec<usize>,
    steps: Vec<Step>,
}

impl StepTable {
    fn new(window: &Window) -> Result<Self, AlignmentError> {
        let rows = window.rows();
        let mut offsets = Vec::with_capacity(rows + 1);
        let mut lows = Vec::with_capacity(rows);
        let mut total = 0usize;
        offsets.push(0);
        for i in 0..rows {
            let range = window.row(i);
            lows.push(range.start);
            total += range.len();
            offsets.push(total);
        }
        let mut steps = Vec::new();
        steps
            .try_reserve_exact(total)
            .map_err(|_| AlignmentError::Allocation { cells: total })?;
        steps.resize(total, Step::Start);
        Ok(Self {
            offsets,
            lows,
            steps,
        })
    }

    fn set(&mut self, i: usize, j: usize, step: Step) {
        let index = self.offsets[i] + (j - self.lows[i]);
        self.steps[index] = step;
    }

    fn get(&self, i: usize, j: usize) -> Step {
        self.steps[self.offsets[i] + (j - self.lows[i])]
    }
}
