//! Pipeline executor.
//!
//! A [`Pipeline`] is an ordered list of filters plus [`Options`]. Drawing
//! feeds the source through every stage in order: each stage reads the
//! previous stage's output and writes either into a fresh intermediate
//! raster or, for the last stage, straight into the caller's destination.

use crate::core::error::{PipelineError, PipelineResult};
use crate::core::filter::Filter;
use crate::core::geometry::Rect;
use crate::core::pixel::PixelFormat;
use crate::core::raster::{Raster, RasterView, RasterViewMut};
use crate::execution::compositor::copy_image;
use crate::execution::options::Options;
use log::{debug, trace};
use std::fmt;

/// Encoding of intermediate rasters between stages and of compositing
/// temporaries. 16-bit straight alpha keeps every 8-bit input value exact.
pub const INTERMEDIATE_FORMAT: PixelFormat = PixelFormat::Nrgba16;

/// An ordered list of filters.
///
/// ```rust
/// use filterchain::prelude::*;
///
/// let pipeline = Pipeline::new(vec![Box::new(Identity)]);
///
/// let mut src = Raster::new(PixelFormat::Nrgba8, Rect::from_size(4, 3));
/// src.fill(Pixel::from_rgba8(255, 0, 0, 255));
///
/// // Allocate a destination of the right size, then draw into it.
/// let mut dst = Raster::new(PixelFormat::Nrgba8, pipeline.bounds(src.bounds()));
/// pipeline.draw(&mut dst.view_mut(), &src.view()).unwrap();
/// assert_eq!(dst.pixel(3, 2).to_rgba8(), [255, 0, 0, 255]);
/// ```
pub struct Pipeline {
    filters: Vec<Box<dyn Filter>>,
    options: Options,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("options", &self.options)
            .finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Pipeline {
    /// Create a pipeline with default options.
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Self {
        Self::with_options(Options::default(), filters)
    }

    /// Create a pipeline with the given options. An unset worker count is
    /// replaced by the default.
    pub fn with_options(options: Options, filters: Vec<Box<dyn Filter>>) -> Self {
        Self {
            filters,
            options: options.resolved(),
        }
    }

    /// Append a stage.
    pub fn add<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Append a stage, builder style.
    pub fn with_filter<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.add(filter);
        self
    }

    /// Remove every stage.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if there are no stages.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The options handed to every stage.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The stages in order.
    pub fn filters(&self) -> impl Iterator<Item = &dyn Filter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    /// Bounds of the final output for a source with bounds `src`.
    ///
    /// Folds `src` through every stage's [`Filter::bounds`] in order.
    pub fn bounds(&self, src: Rect) -> Rect {
        self.filters.iter().fold(src, |bounds, filter| filter.bounds(bounds))
    }

    /// Run every stage on `src`, writing the final result into `dst`.
    ///
    /// With no stages this is an anchored copy: `src.bounds().min` maps to
    /// `dst.bounds().min` and the overlapping size is copied.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Stage`] for the first stage that fails; later
    /// stages do not run and `dst` may be partially written.
    pub fn draw(&self, dst: &mut RasterViewMut<'_>, src: &RasterView<'_>) -> PipelineResult<()> {
        if self.filters.is_empty() {
            debug!("empty pipeline: copying {} into {}", src.bounds(), dst.bounds());
            copy_image(dst, src, self.options.workers);
            return Ok(());
        }

        debug!(
            "drawing {} stage(s) from {} into {}",
            self.filters.len(),
            src.bounds(),
            dst.bounds()
        );

        let last = self.filters.len() - 1;
        let mut carried: Option<Raster> = None;
        for (index, filter) in self.filters.iter().enumerate() {
            let produced = {
                let input = carried.as_ref().map_or(*src, |r| r.view());
                if index == last {
                    self.run_stage(index, filter.as_ref(), dst, &input)?;
                    None
                } else {
                    let bounds = filter.bounds(input.bounds());
                    trace!("stage {index} ({}): intermediate {bounds}", filter.name());
                    let mut output = Raster::new(INTERMEDIATE_FORMAT, bounds);
                    self.run_stage(index, filter.as_ref(), &mut output.view_mut(), &input)?;
                    Some(output)
                }
            };
            // The previous intermediate has been consumed; drop it now.
            carried = produced;
        }
        Ok(())
    }

    fn run_stage(
        &self,
        index: usize,
        filter: &dyn Filter,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
    ) -> PipelineResult<()> {
        trace!(
            "stage {index} ({}): {} -> {}",
            filter.name(),
            src.bounds(),
            dst.bounds()
        );
        filter.draw(dst, src, &self.options).map_err(|source| {
            debug!("stage {index} ({}) failed: {source}", filter.name());
            PipelineError::Stage {
                index,
                filter: filter.name().to_string(),
                source,
            }
        })
    }
}
