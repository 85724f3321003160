//! Core types and traits for filterchain.
//!
//! This module contains the building blocks every pipeline works with:
//! - Geometry (points and half-open rectangles)
//! - Pixel formats and the straight-alpha [`Pixel`] used for maths
//! - Rasters and the borrowed views filters read and write
//! - The [`Filter`] trait
//! - Error types

pub mod error;
pub mod filter;
pub mod geometry;
pub mod pixel;
pub mod raster;

// Re-export commonly used types
pub use error::{FilterError, FilterResult, PipelineError, PipelineResult, RasterError, RasterResult};
pub use filter::{Filter, Identity};
pub use geometry::{Point, Rect};
pub use pixel::{Pixel, PixelFormat, PixelReader, PixelWriter};
pub use raster::{Gray16Image, Raster, RasterView, RasterViewMut, Rgba16Image};
