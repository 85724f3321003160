//! Pipeline execution.
//!
//! This module runs filter chains: sequential stage dispatch, compositing
//! the result onto a destination, and the row-parallel executor both use.

pub mod compositor;
pub mod options;
pub mod parallel;
pub mod pipeline;

pub use compositor::{blend_over, copy_image, Operator};
pub use options::{default_workers, Options, MAX_DEFAULT_WORKERS};
pub use parallel::{parallelize, parallelize_rows, partition};
pub use pipeline::{Pipeline, INTERMEDIATE_FORMAT};
