//! Pixel access layer.
//!
//! Every raster stores its pixels in one of a closed set of encodings
//! ([`PixelFormat`]). All compositing maths works on [`Pixel`], four `f32`
//! channels in `[0, 1]` with straight (non-premultiplied) alpha.
//!
//! The format is resolved once per raster: [`PixelReader`] and
//! [`PixelWriter`] capture the decode/encode functions for the raster's
//! format up front, so hot loops do not match on the format per pixel.
//!
//! | Format    | Bytes | Read                          | Write                          |
//! |-----------|-------|-------------------------------|--------------------------------|
//! | `Gray8`   | 1     | grey into r,g,b; alpha 1      | Rec.601 luma                   |
//! | `Gray16`  | 2     | as `Gray8`                    | as `Gray8`                     |
//! | `Rgba8`   | 4     | un-premultiplied              | premultiplied                  |
//! | `Rgba16`  | 8     | un-premultiplied              | premultiplied                  |
//! | `Nrgba8`  | 4     | straight                      | straight                       |
//! | `Nrgba16` | 8     | straight                      | straight                       |
//!
//! 16-bit channels are stored big-endian.

use crate::core::raster::{RasterView, RasterViewMut};
use serde::{Deserialize, Serialize};

/// A pixel in normalized straight-alpha space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pixel {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha, 0 transparent to 1 opaque.
    pub a: f32,
}

impl Pixel {
    /// Transparent black.
    pub const TRANSPARENT: Pixel = Pixel::new(0.0, 0.0, 0.0, 0.0);

    /// Create a pixel from straight-alpha channels.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a pixel from 8-bit straight-alpha channels.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / MAX8,
            g as f32 / MAX8,
            b as f32 / MAX8,
            a as f32 / MAX8,
        )
    }

    /// Quantize to 8-bit straight-alpha channels.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize8(self.r),
            quantize8(self.g),
            quantize8(self.b),
            quantize8(self.a),
        ]
    }

    /// Every channel clamped into `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Rec.601 luma of the colour channels.
    #[inline]
    pub fn luma(self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

/// Concrete pixel encodings a [`Raster`](crate::core::raster::Raster) can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 8-bit grey, implicitly opaque.
    Gray8,
    /// 16-bit grey, implicitly opaque.
    Gray16,
    /// 8-bit RGBA, premultiplied alpha.
    Rgba8,
    /// 16-bit RGBA, premultiplied alpha.
    Rgba16,
    /// 8-bit RGBA, straight alpha.
    Nrgba8,
    /// 16-bit RGBA, straight alpha.
    Nrgba16,
}

impl PixelFormat {
    /// Every supported format.
    pub const ALL: [PixelFormat; 6] = [
        PixelFormat::Gray8,
        PixelFormat::Gray16,
        PixelFormat::Rgba8,
        PixelFormat::Rgba16,
        PixelFormat::Nrgba8,
        PixelFormat::Nrgba16,
    ];

    /// Bytes used by a single pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Gray16 => 2,
            PixelFormat::Rgba8 | PixelFormat::Nrgba8 => 4,
            PixelFormat::Rgba16 | PixelFormat::Nrgba16 => 8,
        }
    }

    /// Whether the format stores an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        !matches!(self, PixelFormat::Gray8 | PixelFormat::Gray16)
    }

    /// Whether colour channels are stored premultiplied by alpha.
    #[inline]
    pub const fn is_premultiplied(self) -> bool {
        matches!(self, PixelFormat::Rgba8 | PixelFormat::Rgba16)
    }

    /// Whether channels are 16 bits wide.
    #[inline]
    pub const fn is_16bit(self) -> bool {
        matches!(
            self,
            PixelFormat::Gray16 | PixelFormat::Rgba16 | PixelFormat::Nrgba16
        )
    }

    pub(crate) fn decoder(self) -> Decode {
        match self {
            PixelFormat::Gray8 => decode_gray8,
            PixelFormat::Gray16 => decode_gray16,
            PixelFormat::Rgba8 => decode_rgba8,
            PixelFormat::Rgba16 => decode_rgba16,
            PixelFormat::Nrgba8 => decode_nrgba8,
            PixelFormat::Nrgba16 => decode_nrgba16,
        }
    }

    pub(crate) fn encoder(self) -> Encode {
        match self {
            PixelFormat::Gray8 => encode_gray8,
            PixelFormat::Gray16 => encode_gray16,
            PixelFormat::Rgba8 => encode_rgba8,
            PixelFormat::Rgba16 => encode_rgba16,
            PixelFormat::Nrgba8 => encode_nrgba8,
            PixelFormat::Nrgba16 => encode_nrgba16,
        }
    }

    /// Decode the pixel stored at the start of `bytes`.
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> Pixel {
        (self.decoder())(bytes)
    }

    /// Encode `px` into the start of `bytes`.
    #[inline]
    pub fn encode(self, bytes: &mut [u8], px: Pixel) {
        (self.encoder())(bytes, px)
    }
}

pub(crate) type Decode = fn(&[u8]) -> Pixel;
pub(crate) type Encode = fn(&mut [u8], Pixel);

const MAX8: f32 = 255.0;
const MAX16: f32 = 65535.0;

#[inline]
fn quantize8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * MAX8 + 0.5) as u8
}

#[inline]
fn quantize16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * MAX16 + 0.5) as u16
}

#[inline]
fn read16(bytes: &[u8], channel: usize) -> u16 {
    u16::from_be_bytes([bytes[2 * channel], bytes[2 * channel + 1]])
}

#[inline]
fn write16(bytes: &mut [u8], channel: usize, v: u16) {
    bytes[2 * channel..2 * channel + 2].copy_from_slice(&v.to_be_bytes());
}

fn decode_gray8(bytes: &[u8]) -> Pixel {
    let v = bytes[0] as f32 / MAX8;
    Pixel::new(v, v, v, 1.0)
}

fn encode_gray8(bytes: &mut [u8], px: Pixel) {
    bytes[0] = quantize8(px.luma());
}

fn decode_gray16(bytes: &[u8]) -> Pixel {
    let v = read16(bytes, 0) as f32 / MAX16;
    Pixel::new(v, v, v, 1.0)
}

fn encode_gray16(bytes: &mut [u8], px: Pixel) {
    write16(bytes, 0, quantize16(px.luma()));
}

fn decode_rgba8(bytes: &[u8]) -> Pixel {
    let a = bytes[3];
    if a == 0 {
        return Pixel::TRANSPARENT;
    }
    let af = a as f32;
    Pixel::new(
        (bytes[0] as f32 / af).min(1.0),
        (bytes[1] as f32 / af).min(1.0),
        (bytes[2] as f32 / af).min(1.0),
        af / MAX8,
    )
}

fn encode_rgba8(bytes: &mut [u8], px: Pixel) {
    let px = px.clamped();
    bytes[0] = quantize8(px.r * px.a);
    bytes[1] = quantize8(px.g * px.a);
    bytes[2] = quantize8(px.b * px.a);
    bytes[3] = quantize8(px.a);
}

fn decode_rgba16(bytes: &[u8]) -> Pixel {
    let a = read16(bytes, 3);
    if a == 0 {
        return Pixel::TRANSPARENT;
    }
    let af = a as f32;
    Pixel::new(
        (read16(bytes, 0) as f32 / af).min(1.0),
        (read16(bytes, 1) as f32 / af).min(1.0),
        (read16(bytes, 2) as f32 / af).min(1.0),
        af / MAX16,
    )
}

fn encode_rgba16(bytes: &mut [u8], px: Pixel) {
    let px = px.clamped();
    write16(bytes, 0, quantize16(px.r * px.a));
    write16(bytes, 1, quantize16(px.g * px.a));
    write16(bytes, 2, quantize16(px.b * px.a));
    write16(bytes, 3, quantize16(px.a));
}

fn decode_nrgba8(bytes: &[u8]) -> Pixel {
    Pixel::new(
        bytes[0] as f32 / MAX8,
        bytes[1] as f32 / MAX8,
        bytes[2] as f32 / MAX8,
        bytes[3] as f32 / MAX8,
    )
}

fn encode_nrgba8(bytes: &mut [u8], px: Pixel) {
    bytes[0] = quantize8(px.r);
    bytes[1] = quantize8(px.g);
    bytes[2] = quantize8(px.b);
    bytes[3] = quantize8(px.a);
}

fn decode_nrgba16(bytes: &[u8]) -> Pixel {
    Pixel::new(
        read16(bytes, 0) as f32 / MAX16,
        read16(bytes, 1) as f32 / MAX16,
        read16(bytes, 2) as f32 / MAX16,
        read16(bytes, 3) as f32 / MAX16,
    )
}

fn encode_nrgba16(bytes: &mut [u8], px: Pixel) {
    write16(bytes, 0, quantize16(px.r));
    write16(bytes, 1, quantize16(px.g));
    write16(bytes, 2, quantize16(px.b));
    write16(bytes, 3, quantize16(px.a));
}

/// Reads pixels from a raster view with the decoder bound up front.
///
/// The reader is `Copy + Sync`, so one instance can be shared by every worker
/// of a row-parallel pass.
#[derive(Clone, Copy)]
pub struct PixelReader<'a> {
    view: RasterView<'a>,
    bpp: usize,
    decode: Decode,
}

impl<'a> PixelReader<'a> {
    /// Bind a reader to `view`.
    pub fn new(view: RasterView<'a>) -> Self {
        let format = view.format();
        Self {
            view,
            bpp: format.bytes_per_pixel(),
            decode: format.decoder(),
        }
    }

    /// The view being read.
    #[inline]
    pub fn view(&self) -> &RasterView<'a> {
        &self.view
    }

    /// Pixel at `(x, y)`. The point must lie inside the view bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Pixel {
        let i = self.view.pixel_offset(x, y);
        (self.decode)(&self.view.as_bytes()[i..i + self.bpp])
    }
}

/// Reads and writes pixels of a mutable raster view with the codec bound up front.
pub struct PixelWriter<'a> {
    view: RasterViewMut<'a>,
    bpp: usize,
    decode: Decode,
    encode: Encode,
}

impl<'a> PixelWriter<'a> {
    /// Bind a writer to `view`.
    pub fn new(view: RasterViewMut<'a>) -> Self {
        let format = view.format();
        Self {
            view,
            bpp: format.bytes_per_pixel(),
            decode: format.decoder(),
            encode: format.encoder(),
        }
    }

    /// The view being written.
    #[inline]
    pub fn view(&self) -> &RasterViewMut<'a> {
        &self.view
    }

    /// Pixel at `(x, y)`. The point must lie inside the view bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Pixel {
        let i = self.view.pixel_offset(x, y);
        (self.decode)(&self.view.as_bytes()[i..i + self.bpp])
    }

    /// Store `px` at `(x, y)`. The point must lie inside the view bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, px: Pixel) {
        let i = self.view.pixel_offset(x, y);
        let bpp = self.bpp;
        (self.encode)(&mut self.view.as_bytes_mut()[i..i + bpp], px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(format: PixelFormat, px: Pixel) -> Pixel {
        let mut buf = [0u8; 8];
        format.encode(&mut buf, px);
        format.decode(&buf)
    }

    fn assert_close(a: Pixel, b: Pixel, eps: f32) {
        assert!(
            (a.r - b.r).abs() <= eps
                && (a.g - b.g).abs() <= eps
                && (a.b - b.b).abs() <= eps
                && (a.a - b.a).abs() <= eps,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_bytes_per_pixel() {
        let sizes: Vec<_> = PixelFormat::ALL.iter().map(|f| f.bytes_per_pixel()).collect();
        assert_eq!(sizes, vec![1, 2, 4, 8, 4, 8]);
    }

    #[test]
    fn test_gray_reads_opaque() {
        assert_eq!(PixelFormat::Gray8.decode(&[255]), Pixel::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(PixelFormat::Gray16.decode(&[0, 0]), Pixel::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_gray_writes_luma() {
        let mut buf = [0u8; 1];
        PixelFormat::Gray8.encode(&mut buf, Pixel::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(buf[0], 76); // 0.299 * 255

        let mut buf = [0u8; 2];
        PixelFormat::Gray16.encode(&mut buf, Pixel::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(u16::from_be_bytes(buf), 38469); // 0.587 * 65535
    }

    #[test]
    fn test_premultiplied_read_unpremultiplies() {
        // 50% alpha white, stored premultiplied
        let px = PixelFormat::Rgba8.decode(&[128, 128, 128, 128]);
        assert_close(px, Pixel::new(1.0, 1.0, 1.0, 128.0 / 255.0), 1e-6);

        assert_eq!(PixelFormat::Rgba8.decode(&[10, 20, 30, 0]), Pixel::TRANSPARENT);
        assert_eq!(PixelFormat::Rgba16.decode(&[0; 8]), Pixel::TRANSPARENT);
    }

    #[test]
    fn test_premultiplied_write_premultiplies() {
        let mut buf = [0u8; 4];
        PixelFormat::Rgba8.encode(&mut buf, Pixel::new(1.0, 0.5, 0.0, 0.5));
        assert_eq!(buf, [128, 64, 0, 128]);
    }

    #[test]
    fn test_straight_formats_keep_colour_under_zero_alpha() {
        let mut buf = [0u8; 4];
        PixelFormat::Nrgba8.encode(&mut buf, Pixel::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(buf, [255, 0, 0, 0]);
    }

    #[test]
    fn test_sixteen_bit_is_big_endian() {
        let mut buf = [0u8; 8];
        PixelFormat::Nrgba16.encode(&mut buf, Pixel::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(buf, [0xff, 0xff, 0, 0, 0, 0, 0xff, 0xff]);
    }

    #[test]
    fn test_write_clamps_out_of_range() {
        let mut buf = [0u8; 4];
        PixelFormat::Nrgba8.encode(&mut buf, Pixel::new(2.0, -1.0, 0.5, 1.5));
        assert_eq!(buf, [255, 0, 128, 255]);
    }

    #[test]
    fn test_colour_formats_roundtrip() {
        let px = Pixel::new(0.2, 0.4, 0.6, 0.8);
        for format in [
            PixelFormat::Rgba8,
            PixelFormat::Nrgba8,
            PixelFormat::Rgba16,
            PixelFormat::Nrgba16,
        ] {
            let eps = if format.is_16bit() { 1e-4 } else { 1e-2 };
            assert_close(roundtrip(format, px), px, eps);
        }
    }

    #[test]
    fn test_eight_bit_values_survive_sixteen_bit() {
        for v in 0..=255u8 {
            let px = Pixel::from_rgba8(v, v, v, v);
            let back = roundtrip(PixelFormat::Nrgba16, px);
            assert_eq!(back.to_rgba8(), [v, v, v, v]);
        }
    }

    #[test]
    fn test_format_flags() {
        assert!(PixelFormat::Rgba16.is_premultiplied());
        assert!(!PixelFormat::Nrgba16.is_premultiplied());
        assert!(!PixelFormat::Gray8.has_alpha());
        assert!(PixelFormat::Nrgba8.has_alpha());
    }
}
