//! Compositing pipeline output onto an existing raster.
//!
//! [`Pipeline::draw_at`] places the pipeline's output with its top-left
//! corner at a point in the destination and combines it with what is
//! already there using an [`Operator`].

use crate::core::error::PipelineResult;
use crate::core::geometry::{Point, Rect};
use crate::core::pixel::Pixel;
use crate::core::raster::{Raster, RasterView, RasterViewMut};
use crate::execution::parallel::parallelize_rows;
use crate::execution::pipeline::{Pipeline, INTERMEDIATE_FORMAT};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// How drawn pixels combine with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Drawn pixels overwrite the destination.
    #[default]
    Replace,
    /// Drawn pixels are alpha-blended over the destination.
    Over,
}

/// Porter-Duff "source over destination" on straight-alpha pixels.
///
/// A fully transparent result is transparent black.
#[inline]
pub fn blend_over(dst: Pixel, src: Pixel) -> Pixel {
    let c1 = src.a;
    let c0 = (1.0 - c1) * dst.a;
    let cs = c0 + c1;
    if cs == 0.0 {
        return Pixel::TRANSPARENT;
    }
    let (w0, w1) = (c0 / cs, c1 / cs);
    Pixel::new(
        dst.r * w0 + src.r * w1,
        dst.g * w0 + src.g * w1,
        dst.b * w0 + src.b * w1,
        dst.a + src.a * (1.0 - dst.a),
    )
}

/// Copy `src` into `dst` with `src.bounds().min` landing on
/// `dst.bounds().min`, over the overlapping width and height.
pub fn copy_image(dst: &mut RasterViewMut<'_>, src: &RasterView<'_>, workers: usize) {
    let (sb, db) = (src.bounds(), dst.bounds());
    let width = sb.width().min(db.width());
    let height = sb.height().min(db.height());
    if width <= 0 || height <= 0 {
        return;
    }
    let region = Rect {
        min: db.min,
        max: db.min + Point::new(width, height),
    };
    copy_translated(workers, dst.sub_view_mut(region), src, sb.min - db.min);
}

/// Set every pixel `p` of `dst` to `src[p + offset]`.
///
/// `dst.bounds().translate(offset)` must lie inside `src.bounds()`.
fn copy_translated(workers: usize, dst: RasterViewMut<'_>, src: &RasterView<'_>, offset: Point) {
    if dst.bounds().is_empty() {
        return;
    }
    let src = src.sub_view(dst.bounds().translate(offset));

    if src.format() == dst.format() {
        parallelize_rows(workers, dst, |mut band| {
            let b = band.bounds();
            for y in b.min.y..b.max.y {
                band.row_mut(y).copy_from_slice(src.row(y + offset.y));
            }
        });
    } else {
        let reader = src.reader();
        parallelize_rows(workers, dst, |band| {
            let b = band.bounds();
            let mut px = band.into_writer();
            for y in b.min.y..b.max.y {
                for x in b.min.x..b.max.x {
                    px.set(x, y, reader.get(x + offset.x, y + offset.y));
                }
            }
        });
    }
}

/// Blend `src` over every pixel of `dst` at the same coordinates.
///
/// `dst.bounds()` must lie inside `src.bounds()`.
fn blend_region(workers: usize, dst: RasterViewMut<'_>, src: &RasterView<'_>) {
    if dst.bounds().is_empty() {
        return;
    }
    let reader = src.reader();
    parallelize_rows(workers, dst, |band| {
        let b = band.bounds();
        let mut px = band.into_writer();
        for y in b.min.y..b.max.y {
            for x in b.min.x..b.max.x {
                let under = px.get(x, y);
                px.set(x, y, blend_over(under, reader.get(x, y)));
            }
        }
    });
}

impl Pipeline {
    /// Run the pipeline on `src` and composite the result into `dst` with
    /// its top-left corner at `pt`.
    ///
    /// Only `dst` pixels inside `self.bounds(src.bounds()).moved_to(pt)` are
    /// written. If that region misses `dst` entirely the call is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the first stage failure. With [`Operator::Over`], and with
    /// [`Operator::Replace`] when `pt` lies outside `dst`, a failure leaves
    /// `dst` untouched.
    pub fn draw_at(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        pt: Point,
        op: Operator,
    ) -> PipelineResult<()> {
        match op {
            Operator::Replace => self.replace_at(dst, src, pt),
            Operator::Over => self.over_at(dst, src, pt),
        }
    }

    fn replace_at(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        pt: Point,
    ) -> PipelineResult<()> {
        let db = dst.bounds();
        if pt == db.min {
            debug!("replace at {pt}: drawing into destination");
            return self.draw(dst, src);
        }
        if db.contains(pt) {
            debug!("replace at {pt}: drawing into destination sub-view");
            let mut sub = dst.sub_view_mut(Rect { min: pt, max: db.max });
            return self.draw(&mut sub, src);
        }

        let tmp = self.render_at(src, pt)?;
        let region = tmp.bounds().intersect(&db);
        debug!("replace at {pt}: copying {region} from temporary");
        copy_translated(
            self.options().workers,
            dst.sub_view_mut(region),
            &tmp.view(),
            Point::ZERO,
        );
        Ok(())
    }

    fn over_at(
        &self,
        dst: &mut RasterViewMut<'_>,
        src: &RasterView<'_>,
        pt: Point,
    ) -> PipelineResult<()> {
        let tmp = self.render_at(src, pt)?;
        let region = tmp.bounds().intersect(&dst.bounds());
        debug!("over at {pt}: blending {region} from temporary");
        blend_region(self.options().workers, dst.sub_view_mut(region), &tmp.view());
        Ok(())
    }

    /// Render the whole pipeline output into a fresh raster placed at `pt`.
    fn render_at(&self, src: &RasterView<'_>, pt: Point) -> PipelineResult<Raster> {
        let bounds = self.bounds(src.bounds()).moved_to(pt);
        trace!("allocating temporary {bounds}");
        let mut tmp = Raster::new(INTERMEDIATE_FORMAT, bounds);
        self.draw(&mut tmp.view_mut(), src)?;
        Ok(tmp)
    }
}
