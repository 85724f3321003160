//! Rasters and borrowed views over them.
//!
//! A [`Raster`] owns its pixel bytes. Processing code works on borrowed views:
//!
//! - [`RasterView`] - immutable, `Copy`, shareable between workers
//! - [`RasterViewMut`] - mutable; can be narrowed to a sub-rectangle sharing
//!   the same storage, or split into row-disjoint bands for parallel writes
//!
//! Views keep the coordinates of their parent: a sub-view of
//! `(0,0)-(100,100)` at `(10,10)` has bounds `(10,10)-(100,100)`, and pixel
//! `(10,10)` of the sub-view is pixel `(10,10)` of the parent.
//!
//! The byte slice of a view starts at the pixel `bounds.min` and may end
//! right after the last pixel of the last row (no trailing stride padding).

use crate::core::error::{RasterError, RasterResult};
use crate::core::geometry::{Point, Rect};
use crate::core::pixel::{Pixel, PixelFormat, PixelReader, PixelWriter};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use std::fmt;
use std::ops::Range;

/// 16-bit grey image buffer from the `image` crate.
pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// 16-bit RGBA image buffer from the `image` crate.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Byte offset of `(x, y)` in a buffer whose first byte is `bounds.min`.
#[inline]
fn offset_in(bounds: Rect, stride: usize, bpp: usize, x: i32, y: i32) -> usize {
    debug_assert!(
        bounds.contains(Point::new(x, y)),
        "pixel ({x},{y}) outside raster bounds {bounds}"
    );
    (y - bounds.min.y) as usize * stride + (x - bounds.min.x) as usize * bpp
}

/// Clip `region` to `bounds` and compute the byte range that holds it.
fn region_bytes(bounds: Rect, stride: usize, bpp: usize, region: Rect) -> (Rect, Range<usize>) {
    let r = region.intersect(&bounds);
    if r.is_empty() {
        return (Rect::ZERO, 0..0);
    }
    let start = offset_in(bounds, stride, bpp, r.min.x, r.min.y);
    let last_row = (r.max.y - 1 - bounds.min.y) as usize * stride;
    let end = last_row + (r.max.x - bounds.min.x) as usize * bpp;
    (r, start..end)
}

/// Byte range of row `y` restricted to the view's columns.
#[inline]
fn row_bytes(bounds: Rect, stride: usize, bpp: usize, y: i32) -> Range<usize> {
    let start = offset_in(bounds, stride, bpp, bounds.min.x, y);
    start..start + bounds.width() as usize * bpp
}

/// An owned 2-D pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    format: PixelFormat,
    bounds: Rect,
    stride: usize,
    pix: Vec<u8>,
}

impl Raster {
    /// Allocate a zeroed (transparent black) raster.
    pub fn new(format: PixelFormat, bounds: Rect) -> Self {
        let width = bounds.width().max(0) as usize;
        let height = bounds.height().max(0) as usize;
        let stride = width * format.bytes_per_pixel();
        Self {
            format,
            bounds,
            stride,
            pix: vec![0; stride * height],
        }
    }

    /// Wrap tightly packed pixel bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::BufferSize`] if `pix` is not exactly
    /// `width * height * bytes_per_pixel` bytes.
    pub fn from_raw(format: PixelFormat, bounds: Rect, pix: Vec<u8>) -> RasterResult<Self> {
        let stride = bounds.width().max(0) as usize * format.bytes_per_pixel();
        let expected = stride * bounds.height().max(0) as usize;
        if pix.len() != expected {
            return Err(RasterError::BufferSize {
                format,
                bounds,
                expected,
                got: pix.len(),
            });
        }
        Ok(Self {
            format,
            bounds,
            stride,
            pix,
        })
    }

    /// Wrap pixel bytes whose rows are `stride` bytes apart.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidStride`] if a row does not fit in
    /// `stride`, or [`RasterError::BufferSize`] if `pix` is too short.
    pub fn from_raw_with_stride(
        format: PixelFormat,
        bounds: Rect,
        stride: usize,
        pix: Vec<u8>,
    ) -> RasterResult<Self> {
        let width = bounds.width().max(0) as usize;
        let row = width * format.bytes_per_pixel();
        if stride < row {
            return Err(RasterError::InvalidStride {
                format,
                width,
                stride,
            });
        }
        let height = bounds.height().max(0) as usize;
        let expected = if height == 0 {
            0
        } else {
            (height - 1) * stride + row
        };
        if pix.len() < expected {
            return Err(RasterError::BufferSize {
                format,
                bounds,
                expected,
                got: pix.len(),
            });
        }
        Ok(Self {
            format,
            bounds,
            stride,
            pix,
        })
    }

    /// Pixel encoding.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Extent in raster space.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The backing bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pix
    }

    /// Give up the backing bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pix
    }

    /// Borrow the whole raster immutably.
    #[inline]
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            format: self.format,
            bounds: self.bounds,
            stride: self.stride,
            pix: &self.pix,
        }
    }

    /// Borrow the whole raster mutably.
    #[inline]
    pub fn view_mut(&mut self) -> RasterViewMut<'_> {
        RasterViewMut {
            format: self.format,
            bounds: self.bounds,
            stride: self.stride,
            pix: &mut self.pix,
        }
    }

    /// Mutable view of `region` clipped to the raster bounds, sharing storage.
    pub fn sub_view_mut(&mut self, region: Rect) -> RasterViewMut<'_> {
        self.view_mut().into_sub_view(region)
    }

    /// Pixel at `(x, y)`. The point must lie inside the bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        self.view().pixel(x, y)
    }

    /// Store `px` at `(x, y)`. The point must lie inside the bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, px: Pixel) {
        self.view_mut().set_pixel(x, y, px)
    }

    /// Set every pixel to `px`.
    pub fn fill(&mut self, px: Pixel) {
        self.view_mut().fill(px)
    }

    /// Convert to an `image` buffer of matching depth.
    ///
    /// Grey rasters become `Luma8`/`Luma16`; colour rasters become
    /// straight-alpha `Rgba8`/`Rgba16`. The result is anchored at `(0, 0)`.
    pub fn to_dynamic_image(&self) -> DynamicImage {
        let width = self.bounds.width().max(0) as u32;
        let height = self.bounds.height().max(0) as u32;
        let reader = self.view().reader();
        let min = self.bounds.min;
        let at = |x: u32, y: u32| reader.get(min.x + x as i32, min.y + y as i32);

        match self.format {
            PixelFormat::Gray8 => DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
                let i = offset_in(self.bounds, self.stride, 1, min.x + x as i32, min.y + y as i32);
                Luma([self.pix[i]])
            })),
            PixelFormat::Gray16 => DynamicImage::ImageLuma16(Gray16Image::from_fn(width, height, |x, y| {
                let i = offset_in(self.bounds, self.stride, 2, min.x + x as i32, min.y + y as i32);
                Luma([u16::from_be_bytes([self.pix[i], self.pix[i + 1]])])
            })),
            PixelFormat::Rgba8 | PixelFormat::Nrgba8 => {
                DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
                    Rgba(at(x, y).to_rgba8())
                }))
            }
            PixelFormat::Rgba16 | PixelFormat::Nrgba16 => {
                DynamicImage::ImageRgba16(Rgba16Image::from_fn(width, height, |x, y| {
                    let px = at(x, y).clamped();
                    let q = |v: f32| (v * 65535.0 + 0.5) as u16;
                    Rgba([q(px.r), q(px.g), q(px.b), q(px.a)])
                }))
            }
        }
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("format", &self.format)
            .field("bounds", &self.bounds)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}

fn widen16(raw: &[u16]) -> Vec<u8> {
    raw.iter().flat_map(|v| v.to_be_bytes()).collect()
}

impl From<GrayImage> for Raster {
    fn from(img: GrayImage) -> Self {
        let (w, h) = img.dimensions();
        Raster {
            format: PixelFormat::Gray8,
            bounds: Rect::from_size(w, h),
            stride: w as usize,
            pix: img.into_raw(),
        }
    }
}

impl From<Gray16Image> for Raster {
    fn from(img: Gray16Image) -> Self {
        let (w, h) = img.dimensions();
        Raster {
            format: PixelFormat::Gray16,
            bounds: Rect::from_size(w, h),
            stride: w as usize * 2,
            pix: widen16(img.as_raw()),
        }
    }
}

impl From<RgbaImage> for Raster {
    fn from(img: RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        Raster {
            format: PixelFormat::Nrgba8,
            bounds: Rect::from_size(w, h),
            stride: w as usize * 4,
            pix: img.into_raw(),
        }
    }
}

impl From<Rgba16Image> for Raster {
    fn from(img: Rgba16Image) -> Self {
        let (w, h) = img.dimensions();
        Raster {
            format: PixelFormat::Nrgba16,
            bounds: Rect::from_size(w, h),
            stride: w as usize * 8,
            pix: widen16(img.as_raw()),
        }
    }
}

impl From<DynamicImage> for Raster {
    /// Grey and RGBA images keep their depth; every other colour type is
    /// expanded to straight-alpha RGBA of the nearest depth.
    fn from(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(i) => i.into(),
            DynamicImage::ImageLuma16(i) => i.into(),
            DynamicImage::ImageRgba8(i) => i.into(),
            DynamicImage::ImageRgba16(i) => i.into(),
            other => {
                let color = other.color();
                if color.bytes_per_pixel() / color.channel_count() > 1 {
                    other.to_rgba16().into()
                } else {
                    other.to_rgba8().into()
                }
            }
        }
    }
}

/// An immutable borrowed view of raster pixels.
#[derive(Clone, Copy)]
pub struct RasterView<'a> {
    format: PixelFormat,
    bounds: Rect,
    stride: usize,
    pix: &'a [u8],
}

impl<'a> RasterView<'a> {
    /// Pixel encoding.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Extent in raster space.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes from the pixel at `bounds.min` onward.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.pix
    }

    #[inline]
    pub(crate) fn pixel_offset(&self, x: i32, y: i32) -> usize {
        offset_in(self.bounds, self.stride, self.format.bytes_per_pixel(), x, y)
    }

    /// Encoded bytes of row `y` within the view's columns.
    #[inline]
    pub fn row(&self, y: i32) -> &'a [u8] {
        &self.pix[row_bytes(self.bounds, self.stride, self.format.bytes_per_pixel(), y)]
    }

    /// Pixel at `(x, y)`. The point must lie inside the bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        let i = self.pixel_offset(x, y);
        self.format.decode(&self.pix[i..])
    }

    /// Bind a [`PixelReader`] to this view.
    #[inline]
    pub fn reader(&self) -> PixelReader<'a> {
        PixelReader::new(*self)
    }

    /// View of `region` clipped to the bounds, sharing storage.
    pub fn sub_view(&self, region: Rect) -> RasterView<'a> {
        let (bounds, range) =
            region_bytes(self.bounds, self.stride, self.format.bytes_per_pixel(), region);
        RasterView {
            format: self.format,
            bounds,
            stride: self.stride,
            pix: &self.pix[range],
        }
    }
}

impl fmt::Debug for RasterView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RasterView({:?} {})", self.format, self.bounds)
    }
}

impl<'a> From<&'a Raster> for RasterView<'a> {
    fn from(raster: &'a Raster) -> Self {
        raster.view()
    }
}

/// A mutable borrowed view of raster pixels.
pub struct RasterViewMut<'a> {
    format: PixelFormat,
    bounds: Rect,
    stride: usize,
    pix: &'a mut [u8],
}

impl<'a> RasterViewMut<'a> {
    /// Pixel encoding.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Extent in raster space.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes from the pixel at `bounds.min` onward.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &*self.pix
    }

    /// Mutable bytes from the pixel at `bounds.min` onward.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.pix
    }

    #[inline]
    pub(crate) fn pixel_offset(&self, x: i32, y: i32) -> usize {
        offset_in(self.bounds, self.stride, self.format.bytes_per_pixel(), x, y)
    }

    /// Mutable encoded bytes of row `y` within the view's columns.
    #[inline]
    pub fn row_mut(&mut self, y: i32) -> &mut [u8] {
        let range = row_bytes(self.bounds, self.stride, self.format.bytes_per_pixel(), y);
        &mut self.pix[range]
    }

    /// Immutable view of the same pixels.
    #[inline]
    pub fn as_view(&self) -> RasterView<'_> {
        RasterView {
            format: self.format,
            bounds: self.bounds,
            stride: self.stride,
            pix: &*self.pix,
        }
    }

    /// A shorter-lived mutable view of the same pixels.
    #[inline]
    pub fn reborrow(&mut self) -> RasterViewMut<'_> {
        RasterViewMut {
            format: self.format,
            bounds: self.bounds,
            stride: self.stride,
            pix: &mut *self.pix,
        }
    }

    /// Pixel at `(x, y)`. The point must lie inside the bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        let i = self.pixel_offset(x, y);
        self.format.decode(&self.pix[i..])
    }

    /// Store `px` at `(x, y)`. The point must lie inside the bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, px: Pixel) {
        let i = self.pixel_offset(x, y);
        self.format.encode(&mut self.pix[i..], px)
    }

    /// Set every pixel in the view to `px`.
    pub fn fill(&mut self, px: Pixel) {
        if self.bounds.is_empty() {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let mut encoded = [0u8; 8];
        self.format.encode(&mut encoded, px);
        let encoded = &encoded[..bpp];
        for y in self.bounds.min.y..self.bounds.max.y {
            for chunk in self.row_mut(y).chunks_exact_mut(bpp) {
                chunk.copy_from_slice(encoded);
            }
        }
    }

    /// Turn this view into a [`PixelWriter`].
    #[inline]
    pub fn into_writer(self) -> PixelWriter<'a> {
        PixelWriter::new(self)
    }

    /// Mutable view of `region` clipped to the bounds, sharing storage.
    pub fn sub_view_mut(&mut self, region: Rect) -> RasterViewMut<'_> {
        self.reborrow().into_sub_view(region)
    }

    /// Narrow this view to `region` clipped to the bounds.
    pub fn into_sub_view(self, region: Rect) -> RasterViewMut<'a> {
        let RasterViewMut {
            format,
            bounds: parent,
            stride,
            pix,
        } = self;
        let (bounds, range) = region_bytes(parent, stride, format.bytes_per_pixel(), region);
        RasterViewMut {
            format,
            bounds,
            stride,
            pix: &mut pix[range],
        }
    }

    /// Split into the rows above `y` and the rows from `y` down.
    ///
    /// `y` is clamped into the view's row range, so one side may be empty.
    pub fn split_at_row(self, y: i32) -> (RasterViewMut<'a>, RasterViewMut<'a>) {
        let RasterViewMut {
            format,
            bounds,
            stride,
            pix,
        } = self;
        let y = y.clamp(bounds.min.y, bounds.max.y);
        let mid = ((y - bounds.min.y) as usize * stride).min(pix.len());
        let (top, bottom) = pix.split_at_mut(mid);
        let top = RasterViewMut {
            format,
            bounds: Rect {
                min: bounds.min,
                max: Point::new(bounds.max.x, y),
            },
            stride,
            pix: top,
        };
        let bottom = RasterViewMut {
            format,
            bounds: Rect {
                min: Point::new(bounds.min.x, y),
                max: bounds.max,
            },
            stride,
            pix: bottom,
        };
        (top, bottom)
    }
}

impl fmt::Debug for RasterViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RasterViewMut({:?} {})", self.format, self.bounds)
    }
}

impl<'a> From<&'a mut Raster> for RasterViewMut<'a> {
    fn from(raster: &'a mut Raster) -> Self {
        raster.view_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(format: PixelFormat, bounds: Rect) -> Raster {
        let mut raster = Raster::new(format, bounds);
        for y in bounds.min.y..bounds.max.y {
            for x in bounds.min.x..bounds.max.x {
                let v = ((x - bounds.min.x) * 10 + (y - bounds.min.y)) as u8;
                raster.set_pixel(x, y, Pixel::from_rgba8(v, v, v, 255));
            }
        }
        raster
    }

    #[test]
    fn test_new_raster_is_transparent() {
        let raster = Raster::new(PixelFormat::Nrgba8, Rect::new(-2, -2, 2, 2));
        assert_eq!(raster.as_bytes().len(), 4 * 4 * 4);
        assert_eq!(raster.stride(), 16);
        assert_eq!(raster.pixel(-2, -2), Pixel::TRANSPARENT);
        assert_eq!(raster.pixel(1, 1), Pixel::TRANSPARENT);
    }

    #[test]
    fn test_set_and_get_with_offset_origin() {
        let mut raster = Raster::new(PixelFormat::Nrgba8, Rect::new(10, 20, 15, 25));
        raster.set_pixel(12, 23, Pixel::from_rgba8(1, 2, 3, 4));
        assert_eq!(raster.pixel(12, 23).to_rgba8(), [1, 2, 3, 4]);
        let i = (23 - 20) * raster.stride() + (12 - 10) * 4;
        assert_eq!(&raster.as_bytes()[i..i + 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_raw_checks_length() {
        let bounds = Rect::from_size(3, 2);
        assert!(Raster::from_raw(PixelFormat::Gray8, bounds, vec![0; 6]).is_ok());
        let err = Raster::from_raw(PixelFormat::Gray8, bounds, vec![0; 5]).unwrap_err();
        assert_eq!(
            err,
            RasterError::BufferSize {
                format: PixelFormat::Gray8,
                bounds,
                expected: 6,
                got: 5
            }
        );
    }

    #[test]
    fn test_from_raw_with_stride() {
        let bounds = Rect::from_size(2, 2);
        let raster =
            Raster::from_raw_with_stride(PixelFormat::Gray8, bounds, 4, vec![1, 2, 0, 0, 3, 4])
                .unwrap();
        assert_eq!(raster.view().row(1), &[3, 4]);

        let err = Raster::from_raw_with_stride(PixelFormat::Gray8, bounds, 1, vec![0; 8]);
        assert!(matches!(err, Err(RasterError::InvalidStride { .. })));
        let err = Raster::from_raw_with_stride(PixelFormat::Gray8, bounds, 4, vec![0; 5]);
        assert!(matches!(err, Err(RasterError::BufferSize { .. })));
    }

    #[test]
    fn test_sub_view_shares_storage() {
        let mut raster = Raster::new(PixelFormat::Nrgba8, Rect::from_size(8, 8));
        let base = raster.as_bytes().as_ptr() as usize;
        {
            let mut sub = raster.sub_view_mut(Rect::new(2, 3, 8, 8));
            assert_eq!(sub.bounds(), Rect::new(2, 3, 8, 8));
            assert_eq!(sub.as_bytes().as_ptr() as usize, base + 3 * 32 + 2 * 4);
            sub.fill(Pixel::new(1.0, 0.0, 0.0, 1.0));
        }
        assert_eq!(raster.pixel(1, 3), Pixel::TRANSPARENT);
        assert_eq!(raster.pixel(2, 2), Pixel::TRANSPARENT);
        assert_eq!(raster.pixel(2, 3).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(raster.pixel(7, 7).to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_sub_view_is_clipped() {
        let mut raster = Raster::new(PixelFormat::Gray8, Rect::from_size(4, 4));
        let sub = raster.sub_view_mut(Rect::new(2, 2, 10, 10));
        assert_eq!(sub.bounds(), Rect::new(2, 2, 4, 4));
        let empty = raster.sub_view_mut(Rect::new(5, 5, 10, 10));
        assert!(empty.bounds().is_empty());
        assert!(empty.as_bytes().is_empty());
    }

    #[test]
    fn test_immutable_sub_view_reads_parent_pixels() {
        let raster = gradient(PixelFormat::Gray8, Rect::from_size(5, 5));
        let sub = raster.view().sub_view(Rect::new(1, 2, 4, 5));
        assert_eq!(sub.pixel(3, 4), raster.pixel(3, 4));
        assert_eq!(sub.row(2), &raster.view().row(2)[1..4]);
    }

    #[test]
    fn test_split_at_row() {
        let mut raster = gradient(PixelFormat::Nrgba16, Rect::new(0, 5, 3, 11));
        let expected = raster.clone();
        let (mut top, mut bottom) = raster.view_mut().split_at_row(8);
        assert_eq!(top.bounds(), Rect::new(0, 5, 3, 8));
        assert_eq!(bottom.bounds(), Rect::new(0, 8, 3, 11));
        assert_eq!(top.pixel(2, 7), expected.pixel(2, 7));
        assert_eq!(bottom.pixel(0, 8), expected.pixel(0, 8));
        top.set_pixel(0, 5, Pixel::TRANSPARENT);
        bottom.set_pixel(2, 10, Pixel::TRANSPARENT);
        assert_eq!(raster.pixel(0, 5), Pixel::TRANSPARENT);
        assert_eq!(raster.pixel(2, 10), Pixel::TRANSPARENT);
    }

    #[test]
    fn test_split_at_row_clamps() {
        let mut raster = Raster::new(PixelFormat::Gray8, Rect::from_size(2, 2));
        let (top, bottom) = raster.view_mut().split_at_row(10);
        assert_eq!(top.bounds(), Rect::from_size(2, 2));
        assert!(bottom.bounds().is_empty());
    }

    #[test]
    fn test_image_interop_rgba8() {
        let img = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 50, y as u8 * 100, 7, 200]));
        let raster = Raster::from(img.clone());
        assert_eq!(raster.format(), PixelFormat::Nrgba8);
        assert_eq!(raster.bounds(), Rect::from_size(3, 2));
        assert_eq!(raster.pixel(2, 1).to_rgba8(), [100, 100, 7, 200]);
        assert_eq!(raster.to_dynamic_image().to_rgba8(), img);
    }

    #[test]
    fn test_image_interop_gray16() {
        let img = Gray16Image::from_fn(2, 2, |x, y| Luma([(x * 1000 + y * 30000) as u16]));
        let raster = Raster::from(DynamicImage::ImageLuma16(img.clone()));
        assert_eq!(raster.format(), PixelFormat::Gray16);
        assert_eq!(&raster.as_bytes()[..2], &[0, 0]);
        match raster.to_dynamic_image() {
            DynamicImage::ImageLuma16(back) => assert_eq!(back, img),
            other => panic!("unexpected {:?}", other.color()),
        }
    }

    #[test]
    fn test_image_interop_expands_rgb() {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([9, 8, 7]));
        let raster = Raster::from(DynamicImage::ImageRgb8(img));
        assert_eq!(raster.format(), PixelFormat::Nrgba8);
        assert_eq!(raster.pixel(1, 1).to_rgba8(), [9, 8, 7, 255]);
    }

    #[test]
    fn test_premultiplied_export_is_straight() {
        let mut raster = Raster::new(PixelFormat::Rgba8, Rect::from_size(1, 1));
        raster.set_pixel(0, 0, Pixel::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(raster.as_bytes(), &[128, 0, 0, 128]);
        let img = raster.to_dynamic_image().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 128]);
    }
}
