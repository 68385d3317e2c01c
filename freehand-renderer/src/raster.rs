//! CPU raster buffer: an RGBA8 pixel grid with region-scoped operations.
//!
//! All region operations take surface-coordinate rectangles and clamp them
//! to the raster, expanding fractional edges outward (floor/ceil) so a
//! region never excludes a partially covered pixel.

use freehand_core::{Color, CompositeMode, Rect};

use crate::error::{RenderError, RenderResult};

/// Integer pixel bounds of a clamped region: `[x0, x1) x [y0, y1)`.
type PixelBounds = (u32, u32, u32, u32);

/// A width x height RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a fully transparent raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read-only view of the full RGBA pixel data (the persistence/export
    /// snapshot interface).
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read one pixel; `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Clamp a rectangle to the raster, expanding fractional edges outward.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bounds(&self, rect: &Rect) -> PixelBounds {
        let x0 = rect.x.floor().clamp(0.0, f64::from(self.width)) as u32;
        let y0 = rect.y.floor().clamp(0.0, f64::from(self.height)) as u32;
        let x1 = (rect.x + rect.width)
            .ceil()
            .clamp(0.0, f64::from(self.width)) as u32;
        let y1 = (rect.y + rect.height)
            .ceil()
            .clamp(0.0, f64::from(self.height)) as u32;
        (x0, y0, x0.max(x1), y0.max(y1))
    }

    /// Reset the whole raster to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Reset one region to transparent.
    pub fn clear_region(&mut self, rect: &Rect) {
        let (x0, y0, x1, y1) = self.bounds(rect);
        for y in y0..y1 {
            let start = self.index(x0, y);
            let end = self.index(x0, y) + (x1 - x0) as usize * 4;
            self.pixels[start..end].fill(0);
        }
    }

    /// Reset several regions to transparent.
    pub fn clear_regions<'a>(&mut self, rects: impl IntoIterator<Item = &'a Rect>) {
        for rect in rects {
            self.clear_region(rect);
        }
    }

    /// Copy one region's pixels from another raster of the same size.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SizeMismatch`] if the rasters differ in size.
    pub fn blit_from(&mut self, src: &Self, rect: &Rect) -> RenderResult<()> {
        self.check_same_size(src)?;
        let (x0, y0, x1, y1) = self.bounds(rect);
        for y in y0..y1 {
            let start = self.index(x0, y);
            let end = start + (x1 - x0) as usize * 4;
            self.pixels[start..end].copy_from_slice(&src.pixels[start..end]);
        }
        Ok(())
    }

    fn check_same_size(&self, other: &Self) -> RenderResult<()> {
        if self.width == other.width && self.height == other.height {
            Ok(())
        } else {
            Err(RenderError::SizeMismatch {
                src_width: other.width,
                src_height: other.height,
                dst_width: self.width,
                dst_height: self.height,
            })
        }
    }

    /// Blend one source pixel onto `(x, y)`.
    ///
    /// `SourceOver` is the usual straight-alpha paint blend;
    /// `DestinationOut` removes existing coverage in proportion to the
    /// source alpha (eraser).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color, mode: CompositeMode) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        let sa = f64::from(color.a) / 255.0;
        let da = f64::from(self.pixels[i + 3]) / 255.0;

        match mode {
            CompositeMode::SourceOver => {
                let oa = sa + da * (1.0 - sa);
                if oa <= 0.0 {
                    self.pixels[i..i + 4].fill(0);
                    return;
                }
                let blend = |src: u8, dst: u8| {
                    let s = f64::from(src);
                    let d = f64::from(dst);
                    channel((s * sa + d * da * (1.0 - sa)) / oa)
                };
                self.pixels[i] = blend(color.r, self.pixels[i]);
                self.pixels[i + 1] = blend(color.g, self.pixels[i + 1]);
                self.pixels[i + 2] = blend(color.b, self.pixels[i + 2]);
                self.pixels[i + 3] = channel(oa * 255.0);
            }
            CompositeMode::DestinationOut => {
                self.pixels[i + 3] = channel(da * (1.0 - sa) * 255.0);
            }
        }
    }

    /// Paint a filled round dab centered at `(cx, cy)`.
    ///
    /// Coverage is hard-edged (a pixel is inked iff its center lies within
    /// the radius): repainting the same opaque ink is then exactly
    /// idempotent, which keeps a repeated partition redraw a pixel-level
    /// no-op. A non-positive radius paints nothing.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let x0 = (cx - radius).floor().clamp(0.0, f64::from(self.width)) as u32;
        let y0 = (cy - radius).floor().clamp(0.0, f64::from(self.height)) as u32;
        let x1 = (cx + radius).ceil().clamp(0.0, f64::from(self.width)) as u32;
        let y1 = (cy + radius).ceil().clamp(0.0, f64::from(self.height)) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.blend_pixel(x, y, color, CompositeMode::SourceOver);
                }
            }
        }
    }

    /// Multiply every pixel's alpha by `factor` (clamped to `[0, 1]`).
    ///
    /// This is the opacity mask: it is equivalent to an erase-style
    /// full-surface fill at `1 - factor`, letting committed ink show through
    /// a semi-transparent stroke.
    pub fn scale_alpha(&mut self, factor: f64) {
        let factor = factor.clamp(0.0, 1.0);
        for px in self.pixels.chunks_exact_mut(4) {
            px[3] = channel(f64::from(px[3]) * factor);
        }
    }

    /// Composite another raster's pixels onto this one within the given
    /// regions. Overlapping regions are composited once per pixel (duplicate
    /// coverage is skipped), so a fractional cell boundary never blends
    /// twice.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SizeMismatch`] if the rasters differ in size.
    pub fn composite_from(
        &mut self,
        src: &Self,
        rects: &[Rect],
        mode: CompositeMode,
    ) -> RenderResult<()> {
        self.check_same_size(src)?;
        let bounds: Vec<PixelBounds> = rects.iter().map(|r| self.bounds(r)).collect();
        for (i, &(x0, y0, x1, y1)) in bounds.iter().enumerate() {
            for y in y0..y1 {
                for x in x0..x1 {
                    let seen = bounds[..i]
                        .iter()
                        .any(|&(a, b, c, d)| x >= a && x < c && y >= b && y < d);
                    if seen {
                        continue;
                    }
                    let j = src.index(x, y);
                    let color = Color::new(
                        src.pixels[j],
                        src.pixels[j + 1],
                        src.pixels[j + 2],
                        src.pixels[j + 3],
                    );
                    if color.a > 0 {
                        self.blend_pixel(x, y, color, mode);
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy out one region's pixels, row-major.
    #[must_use]
    pub fn region_pixels(&self, rect: &Rect) -> Vec<u8> {
        let (x0, y0, x1, y1) = self.bounds(rect);
        let mut out = Vec::with_capacity((x1 - x0) as usize * (y1 - y0) as usize * 4);
        for y in y0..y1 {
            let start = self.index(x0, y);
            let end = start + (x1 - x0) as usize * 4;
            out.extend_from_slice(&self.pixels[start..end]);
        }
        out
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Whether every pixel in the region is fully transparent.
    #[must_use]
    pub fn region_is_blank(&self, rect: &Rect) -> bool {
        self.region_pixels(rect).chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// Clamp a float channel value to a `u8`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
