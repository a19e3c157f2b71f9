use std::ops::Range;

/// Per-row search band over an `n x m` alignment grid.
///
/// Each row `i` carries a half-open column interval `[lo, hi)`. Rows with
/// `lo >= hi` are empty and their cells are never evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    rows: Vec<Span>,
    cols: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    lo: usize,
    hi: usize,
}

impl Window {
    /// A window covering the whole grid.
    pub fn full(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![Span { lo: 0, hi: cols }; rows],
            cols,
        }
    }

    /// A window with every row empty.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![Span { lo: cols, hi: 0 }; rows],
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Column range evaluated for row `i`; empty when the row is unused.
    pub fn row(&self, i: usize) -> Range<usize> {
        let span = self.rows[i];
        if span.lo >= span.hi {
            0..0
        } else {
            span.lo..span.hi
        }
    }

    /// Total number of cells the dynamic program will touch.
    pub fn cell_count(&self) -> usize {
        (0..self.rows.len()).map(|i| self.row(i).len()).sum()
    }

    fn widen(&mut self, i: usize, lo: usize, hi_inclusive: usize) {
        let span = &mut self.rows[i];
        if lo < span.lo {
            span.lo = lo;
        }
        if hi_inclusive + 1 > span.hi {
            span.hi = hi_inclusive + 1;
        }
    }
}

/// Expand a coarse-resolution warping path into a search window at the next
/// finer resolution.
///
/// Every cell within `radius` of the path (a full square neighbourhood) is
/// projected onto the four finer-grid cells it covers; column indices are
/// clamped into the grid, rows outside `[0, rows)` are dropped. The union of
/// the square's projections is a rectangle, so each covered row is widened by
/// one clamped column range. Gaps never occur within a row: the result is a
/// contiguous band, which keeps the dynamic program monotone.
pub fn from_coarse_path(
    path: &[(usize, usize)],
    radius: usize,
    rows: usize,
    cols: usize,
) -> Window {
    let mut window = Window::empty(rows, cols);
    if rows == 0 || cols == 0 {
        return window;
    }
    let r = radius as isize;
    for &(i, j) in path {
        let (i, j) = (i as isize, j as isize);
        let row_first = (2 * (i - r)).max(0);
        let row_last = (2 * (i + r) + 1).min(rows as isize - 1);
        let col_lo = (2 * (j - r)).clamp(0, cols as isize - 1) as usize;
        let col_hi = (2 * (j + r) + 1).clamp(0, cols as isize - 1) as usize;
        for row in row_first..=row_last {
            window.widen(row as usize, col_lo, col_hi);
        }
    }
    window
}
