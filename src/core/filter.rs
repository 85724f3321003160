//! The Filter trait.
//!
//! A filter is one stage of a [`Pipeline`](crate::execution::pipeline::Pipeline).
//! It has exactly two capabilities: predicting the bounds of its output from
//! the bounds of its input, and rendering an input raster into an output
//! raster. The pipeline attaches no other state to a filter.

use crate::core::error::FilterResult;
use crate::core::geometry::Rect;
use crate::core::raster::{RasterView, RasterViewMut};
use crate::execution::compositor::copy_image;
use crate::execution::options::Options;
use std::sync::Arc;

/// A raster transformation that can be chained in a pipeline.
///
/// # Contract
///
/// - [`bounds`](Filter::bounds) is pure: the same input always gives the
///   same output.
/// - [`draw`](Filter::draw) populates every pixel of
///   `self.bounds(src.bounds())` intersected with `dst.bounds()`, anchored at
///   `dst.bounds().min`, and touches nothing outside that region.
///
/// Filters may parallelize internally; `options.workers` is the upper bound
/// on concurrent partitions they should use.
///
/// ```rust
/// use filterchain::prelude::*;
///
/// /// Mirrors the image horizontally.
/// struct FlipH;
///
/// impl Filter for FlipH {
///     fn bounds(&self, src: Rect) -> Rect {
///         Rect::from_size(src.width() as u32, src.height() as u32)
///     }
///
///     fn draw(
///         &self,
///         dst: &mut RasterViewMut<'_>,
///         src: &RasterView<'_>,
///         _options: &Options,
///     ) -> FilterResult<()> {
///         let (sb, db) = (src.bounds(), dst.bounds());
///         let w = sb.width().min(db.width());
///         let h = sb.height().min(db.height());
///         for y in 0..h {
///             for x in 0..w {
///                 let px = src.pixel(sb.max.x - 1 - x, sb.min.y + y);
///                 dst.set_pixel(db.min.x + x, db.min.y + y, px);
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    /// Bounds of the output produced from an input with bounds `src`.
    fn bounds(&self, src: Rect) -> Rect;

    /// Render `src` into `dst`.
    fn draw(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        options: &Options,
    ) -> FilterResult<()>;

    /// Name used in diagnostics and stage errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn bounds(&self, src: Rect) -> Rect {
        (**self).bounds(src)
    }

    fn draw(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        options: &Options,
    ) -> FilterResult<()> {
        (**self).draw(dst, src, options)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<F: Filter + ?Sized> Filter for Arc<F> {
    fn bounds(&self, src: Rect) -> Rect {
        (**self).bounds(src)
    }

    fn draw(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        options: &Options,
    ) -> FilterResult<()> {
        (**self).draw(dst, src, options)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<F: Filter + ?Sized> Filter for &F {
    fn bounds(&self, src: Rect) -> Rect {
        (**self).bounds(src)
    }

    fn draw(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        options: &Options,
    ) -> FilterResult<()> {
        (**self).draw(dst, src, options)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Copies its input unchanged, re-anchored at the output origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Filter for Identity {
    fn bounds(&self, src: Rect) -> Rect {
        Rect::from_size(src.width().max(0) as u32, src.height().max(0) as u32)
    }

    fn draw(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        options: &Options,
    ) -> FilterResult<()> {
        copy_image(dst, src, options.workers);
        Ok(())
    }

    fn name(&self) -> &str {
        "identity"
    }
}
