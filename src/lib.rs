//! # filterchain - Composable raster filter pipelines
//!
//! filterchain runs an ordered list of image filters over a source raster
//! and writes the result into a destination raster, either straight into
//! it or composited at an offset.
//!
//! ## Features
//!
//! - **Filter chaining**: stages run in order, each reading the previous
//!   stage's output from a 16-bit intermediate buffer
//! - **Bounds prediction**: ask a pipeline how large its output will be
//!   before allocating anything
//! - **Compositing**: place the output at any point with replace or
//!   alpha-over semantics, clipped to the destination
//! - **Parallel rows**: work is split into row bands across a rayon scope
//! - **image interop**: convert to and from `image` buffers
//!
//! ## Quick Start
//!
//! ```rust
//! use filterchain::prelude::*;
//!
//! let pipeline = Pipeline::new(vec![Box::new(Identity)]);
//!
//! let mut src = Raster::new(PixelFormat::Nrgba8, Rect::from_size(50, 50));
//! src.fill(Pixel::from_rgba8(255, 0, 0, 255));
//!
//! let mut dst = Raster::new(PixelFormat::Rgba8, Rect::from_size(100, 100));
//! dst.fill(Pixel::from_rgba8(0, 0, 255, 255));
//!
//! pipeline
//!     .draw_at(&mut dst.view_mut(), &src.view(), Point::new(10, 10), Operator::Replace)
//!     .unwrap();
//!
//! assert_eq!(dst.pixel(10, 10).to_rgba8(), [255, 0, 0, 255]);
//! assert_eq!(dst.pixel(60, 60).to_rgba8(), [0, 0, 255, 255]);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: geometry, pixel formats, rasters, the [`Filter`](core::Filter)
//!   trait and error types
//! - [`execution`]: the pipeline, compositing and the row-parallel executor
//!
//! ## Writing Filters
//!
//! Implement [`Filter`](core::Filter): predict output bounds from input
//! bounds, then fill the destination anchored at its top-left corner.
//!
//! ```rust
//! use filterchain::prelude::*;
//!
//! struct Invert;
//!
//! impl Filter for Invert {
//!     fn bounds(&self, src: Rect) -> Rect {
//!         Rect::from_size(src.width() as u32, src.height() as u32)
//!     }
//!
//!     fn draw(
//!         &self,
//!         dst: &mut RasterViewMut<'_>,
//!         src: &RasterView<'_>,
//!         options: &Options,
//!     ) -> FilterResult<()> {
//!         let (sb, db) = (src.bounds(), dst.bounds());
//!         let reader = src.reader();
//!         parallelize_rows(options.workers, dst.reborrow(), |band| {
//!             let b = band.bounds();
//!             let mut px = band.into_writer();
//!             for y in b.min.y..b.max.y.min(db.min.y + sb.height()) {
//!                 for x in b.min.x..b.max.x.min(db.min.x + sb.width()) {
//!                     let p = reader.get(x - db.min.x + sb.min.x, y - db.min.y + sb.min.y);
//!                     px.set(x, y, Pixel::new(1.0 - p.r, 1.0 - p.g, 1.0 - p.b, p.a));
//!                 }
//!             }
//!         });
//!         Ok(())
//!     }
//! }
//!
//! let mut pipeline = Pipeline::default();
//! pipeline.add(Invert);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod execution;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use filterchain::prelude::*;
/// ```
pub mod prelude {
    // Geometry and pixels
    pub use crate::core::geometry::{Point, Rect};
    pub use crate::core::pixel::{Pixel, PixelFormat, PixelReader, PixelWriter};

    // Rasters
    pub use crate::core::raster::{Raster, RasterView, RasterViewMut};

    // Filters
    pub use crate::core::filter::{Filter, Identity};

    // Errors
    pub use crate::core::error::{
        FilterError, FilterResult, PipelineError, PipelineResult, RasterError, RasterResult,
    };

    // Execution
    pub use crate::execution::compositor::{blend_over, Operator};
    pub use crate::execution::options::Options;
    pub use crate::execution::parallel::{parallelize, parallelize_rows, partition};
    pub use crate::execution::pipeline::Pipeline;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
