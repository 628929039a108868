//! The card raster and its compositing operations.

use aruco_card_core::GrayImage;
use image::{Rgb, RgbImage, RgbaImage};

use crate::{CardError, Element, LogoBlend};

/// The RGB raster every stage draws on.
///
/// Stages take the canvas by value and hand it back, so exactly one stage
/// owns it at any time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Allocate a `width × height` canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    #[inline]
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    /// Check that a `width × height` box at `(x, y)` lies inside the canvas.
    fn check_bounds(
        &self,
        element: Element,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    ) -> Result<(), CardError> {
        let fits = x >= 0
            && y >= 0
            && x + i64::from(width) <= i64::from(self.width())
            && y + i64::from(height) <= i64::from(self.height());
        if fits {
            Ok(())
        } else {
            Err(CardError::OutOfBounds {
                element,
                x,
                y,
                width,
                height,
                canvas_width: self.width(),
                canvas_height: self.height(),
            })
        }
    }

    /// Copy a grayscale raster into the canvas at `(x, y)`, replicating it
    /// into all three channels.
    pub fn blit_gray(
        &mut self,
        element: Element,
        src: &GrayImage,
        x: i64,
        y: i64,
    ) -> Result<(), CardError> {
        self.check_bounds(element, x, y, src.width as u32, src.height as u32)?;
        let (x0, y0) = (x as u32, y as u32);
        for (i, &v) in src.data.iter().enumerate() {
            let sx = (i % src.width) as u32;
            let sy = (i / src.width) as u32;
            self.image.put_pixel(x0 + sx, y0 + sy, Rgb([v, v, v]));
        }
        Ok(())
    }

    /// Write an RGBA raster into the canvas at `(x, y)`.
    pub fn blit_rgba(
        &mut self,
        element: Element,
        src: &RgbaImage,
        x: i64,
        y: i64,
        blend: LogoBlend,
    ) -> Result<(), CardError> {
        self.check_bounds(element, x, y, src.width(), src.height())?;
        let (x0, y0) = (x as u32, y as u32);
        for (sx, sy, px) in src.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            let dst = self.image.get_pixel_mut(x0 + sx, y0 + sy);
            match blend {
                LogoBlend::Overwrite => *dst = Rgb([r, g, b]),
                LogoBlend::Alpha => *dst = over(*dst, Rgb([r, g, b]), f32::from(a) / 255.0),
            }
        }
        Ok(())
    }

    /// Mix `color` into pixel `(x, y)` with the given coverage in `[0, 1]`.
    ///
    /// Pixels outside the canvas are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = over(*dst, color, coverage.clamp(0.0, 1.0));
    }

    /// Luma of a rectangular region, or `None` if it leaves the canvas.
    ///
    /// Uses the integer Rec. 601 weights so pure gray pixels map to
    /// themselves.
    pub fn gray_region(&self, x: u32, y: u32, width: u32, height: u32) -> Option<GrayImage> {
        if u64::from(x) + u64::from(width) > u64::from(self.width())
            || u64::from(y) + u64::from(height) > u64::from(self.height())
        {
            return None;
        }
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for yy in y..y + height {
            for xx in x..x + width {
                let [r, g, b] = self.image.get_pixel(xx, yy).0;
                let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
                data.push(luma as u8);
            }
        }
        GrayImage::from_raw(width as usize, height as usize, data).ok()
    }
}

fn over(dst: Rgb<u8>, src: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    if alpha >= 1.0 {
        return src;
    }
    if alpha <= 0.0 {
        return dst;
    }
    let mix = |d: u8, s: u8| (f32::from(s) * alpha + f32::from(d) * (1.0 - alpha)).round() as u8;
    Rgb([
        mix(dst.0[0], src.0[0]),
        mix(dst.0[1], src.0[1]),
        mix(dst.0[2], src.0[2]),
    ])
}
