//! RGBA framebuffer the draw list is composited into.
//!
//! Draws scale with nearest-neighbour sampling and blend by source alpha.
//! Anything outside the canvas is clipped.

use crate::assets::Texture;
use image::{Rgba, RgbaImage};
use std::convert::Infallible;
use tiling_core::{Rect, Renderer};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Software canvas in board pixel coordinates.
#[derive(Debug, Clone)]
pub struct Canvas {
    frame: RgbaImage,
    frames_presented: u64,
}

impl Canvas {
    /// Creates a canvas filled with the background colour.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbaImage::from_pixel(width, height, BACKGROUND),
            frames_presented: 0,
        }
    }

    /// The composited pixels.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Canvas width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    /// Number of completed frames.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Fills the canvas with the background colour.
    pub fn fill_background(&mut self) {
        for pixel in self.frame.pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    /// Scales `source` of `image` (or the whole image) into `dest`.
    pub fn blit(&mut self, image: &RgbaImage, source: Option<Rect>, dest: Rect) {
        let (image_w, image_h) = (image.width() as i32, image.height() as i32);
        let source = source.unwrap_or(Rect::new(0, 0, image_w, image_h));
        if dest.w <= 0 || dest.h <= 0 || source.w <= 0 || source.h <= 0 {
            return;
        }

        let (canvas_w, canvas_h) = (self.frame.width() as i32, self.frame.height() as i32);
        // Only the part of `dest` that lands on the canvas is visited.
        let rows = dest.y.max(0)..dest.y.saturating_add(dest.h).min(canvas_h);
        let columns = dest.x.max(0)..dest.x.saturating_add(dest.w).min(canvas_w);
        for ty in rows {
            let Some(sy) = scale(ty, dest.y, dest.h, source.y, source.h, image_h) else {
                continue;
            };
            for tx in columns.clone() {
                let Some(sx) = scale(tx, dest.x, dest.w, source.x, source.w, image_w) else {
                    continue;
                };
                let src = image.get_pixel(sx, sy);
                let dst = self.frame.get_pixel_mut(tx as u32, ty as u32);
                blend(dst, src);
            }
        }
    }
}

/// Nearest-neighbour source coordinate for canvas coordinate `t`, if it
/// falls inside the image.
fn scale(
    t: i32,
    dest: i32,
    dest_len: i32,
    source: i32,
    source_len: i32,
    limit: i32,
) -> Option<u32> {
    let offset = i64::from(t) - i64::from(dest);
    let s = i64::from(source) + offset * i64::from(source_len) / i64::from(dest_len);
    if s < 0 || s >= i64::from(limit) {
        return None;
    }
    u32::try_from(s).ok()
}

/// Source-over blend onto an opaque destination.
fn blend(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let alpha = u32::from(src.0[3]);
    for channel in 0..3 {
        let s = u32::from(src.0[channel]);
        let d = u32::from(dst.0[channel]);
        dst.0[channel] = ((s * alpha + d * (255 - alpha)) / 255) as u8;
    }
    dst.0[3] = 255;
}

impl Renderer for Canvas {
    type Handle = Texture;
    type Error = Infallible;

    fn clear(&mut self) {
        self.fill_background();
    }

    fn copy(&mut self, handle: &Texture, source: Option<Rect>, dest: Rect) {
        self.blit(handle.image(), source, dest);
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_full_blit_scales_up() {
        let mut canvas = Canvas::new(10, 10);
        let image = RgbaImage::from_pixel(2, 2, RED);
        canvas.blit(&image, None, Rect::new(2, 2, 4, 4));

        assert_eq!(*canvas.frame().get_pixel(2, 2), RED);
        assert_eq!(*canvas.frame().get_pixel(5, 5), RED);
        assert_eq!(*canvas.frame().get_pixel(6, 6), BACKGROUND);
        assert_eq!(*canvas.frame().get_pixel(1, 1), BACKGROUND);
    }

    #[test]
    fn test_source_region_selects_quadrant() {
        let mut image = RgbaImage::from_pixel(4, 4, BACKGROUND);
        for y in 2..4 {
            for x in 2..4 {
                image.put_pixel(x, y, RED);
            }
        }
        let mut canvas = Canvas::new(4, 4);
        canvas.blit(&image, Some(Rect::new(2, 2, 2, 2)), Rect::new(0, 0, 2, 2));

        assert_eq!(*canvas.frame().get_pixel(0, 0), RED);
        assert_eq!(*canvas.frame().get_pixel(1, 1), RED);
        assert_eq!(*canvas.frame().get_pixel(2, 2), BACKGROUND);
    }

    #[test]
    fn test_transparent_pixels_keep_background() {
        let mut canvas = Canvas::new(2, 2);
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        canvas.blit(&image, None, Rect::new(0, 0, 2, 2));
        assert_eq!(*canvas.frame().get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_half_alpha_mixes() {
        let mut canvas = Canvas::new(1, 1);
        let image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        canvas.blit(&image, None, Rect::new(0, 0, 1, 1));
        let pixel = canvas.frame().get_pixel(0, 0);
        assert_eq!(pixel.0[0], 127);
        assert_eq!(pixel.0[3], 255);
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut canvas = Canvas::new(4, 4);
        let image = RgbaImage::from_pixel(4, 4, RED);
        canvas.blit(&image, None, Rect::new(-2, -2, 4, 4));
        canvas.blit(&image, None, Rect::new(3, 3, 4, 4));

        assert_eq!(*canvas.frame().get_pixel(0, 0), RED);
        assert_eq!(*canvas.frame().get_pixel(1, 1), RED);
        assert_eq!(*canvas.frame().get_pixel(2, 2), BACKGROUND);
        assert_eq!(*canvas.frame().get_pixel(3, 3), RED);
    }

    #[test]
    fn test_blit_far_outside_canvas() {
        let mut canvas = Canvas::new(4, 4);
        let image = RgbaImage::from_pixel(4, 4, RED);
        canvas.blit(&image, None, Rect::new(i32::MAX - 1, i32::MAX - 1, 10, 10));
        assert!(canvas.frame().pixels().all(|p| *p == BACKGROUND));

        canvas.blit(&image, None, Rect::new(-1_000_000_000, 0, 2_000_000_000, 4));
        assert_eq!(*canvas.frame().get_pixel(0, 0), RED);
        assert_eq!(*canvas.frame().get_pixel(3, 3), RED);
    }

    #[test]
    fn test_clear_and_present() {
        let mut canvas = Canvas::new(2, 2);
        let texture = Texture::new("red", RgbaImage::from_pixel(1, 1, RED));
        canvas.copy(&texture, None, Rect::new(0, 0, 2, 2));
        canvas.clear();
        assert_eq!(*canvas.frame().get_pixel(1, 1), BACKGROUND);
        canvas.present().unwrap();
        assert_eq!(canvas.frames_presented(), 1);
    }
}
