//! Alignment engine: boundary-detecting dynamic time warping with a
//! multi-resolution driver.
//!
//! The kernel aligns two feature matrices (frames x coefficients) while
//! allowing both sequences to skip leading and trailing frames at a linear
//! per-frame penalty. [`fast_dtwbd`] wraps the kernel in a FastDTW-style
//! coarsen/refine recursion so time and memory stay linear in the total
//! frame count for a fixed radius.

pub mod cost;
mod fastdtw;
mod kernel;
mod window;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use fastdtw::fast_dtwbd;
pub use kernel::{dtwbd, PathResult};
pub use window::{from_coarse_path, Window};

/// Errors surfaced by the alignment kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    /// The two feature sequences cannot be aligned as shaped.
    InputShape(String),
    /// The dynamic-programming table could not be allocated.
    Allocation { cells: usize },
}

impl Display for AlignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentError::InputShape(message) => write!(f, "{message}"),
            AlignmentError::Allocation { cells } => {
                write!(f, "failed to allocate an alignment table of {cells} cells")
            }
        }
    }
}

impl Error for AlignmentError {}
