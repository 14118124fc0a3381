//! Drawing surfaces
//!
//! [`Surface`] is the small set of 2D primitives the renderer needs from the
//! host (a browser canvas, a window framebuffer, ...). [`Canvas`] implements
//! it over an in-memory `RgbaImage` for headless rendering.

use image::imageops::{self, FilterType};
use image::{Pixel as _, Rgba, RgbaImage};

/// Transparent color left behind by clears and resizes
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A 2D drawing target with canvas-like primitives.
///
/// Coordinates are signed so that sprites can hang off the top or left edge;
/// implementations clip anything outside `0..width` x `0..height`.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Resize the backing store. Like a canvas, this may discard contents.
    fn set_size(&mut self, width: u32, height: u32);

    /// Reset a rectangle to transparent.
    fn clear_rect(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Set the color used by subsequent [`fill_rect`](Surface::fill_rect) calls.
    fn set_fill_color(&mut self, color: Rgba<u8>);

    /// Fill a rectangle with the current fill color, alpha-blended over the
    /// existing contents and clipped to the surface.
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Draw `image` scaled into the destination rectangle.
    fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32, width: u32, height: u32);
}

/// In-memory surface backed by an RGBA image buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    fill: Rgba<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            fill: Rgba([0, 0, 0, 255]),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.image.width() && y < self.image.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Intersect a signed rectangle with the surface bounds.
    fn clip(&self, x: i32, y: i32, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(x).max(0);
        let y0 = i64::from(y).max(0);
        let x1 = (i64::from(x) + i64::from(width)).min(i64::from(self.image.width()));
        let y1 = (i64::from(y) + i64::from(height)).min(i64::from(self.image.height()));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, TRANSPARENT);
            }
        }
    }

    fn set_fill_color(&mut self, color: Rgba<u8>) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        let fill = self.fill;
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.get_pixel_mut(px, py).blend(&fill);
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32, width: u32, height: u32) {
        if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        if image.dimensions() == (width, height) {
            imageops::overlay(&mut self.image, image, i64::from(x), i64::from(y));
        } else {
            // Nearest keeps pixel-art edges crisp when scaling
            let scaled = imageops::resize(image, width, height, FilterType::Nearest);
            imageops::overlay(&mut self.image, &scaled, i64::from(x), i64::from(y));
        }
    }
}
