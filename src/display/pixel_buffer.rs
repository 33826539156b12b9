use crate::color::Rgb;

// ============================================================================
// Blend Mode
// ============================================================================

/// Compositing operator for `blend_pixel()`, `fill_disc()` and `composite()`.
/// Colors are stored straight (not premultiplied); each mode converts as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over: the source is painted on top
    Alpha,
    /// Destination-over: the source only shows where the destination is transparent
    Behind,
    /// Additive on premultiplied values, clamped
    Lighter,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Write ABGR pixel with alpha (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel_rgba(dest: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    dest[0] = a; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

#[inline]
fn read_pixel_rgba(src: &[u8]) -> [f32; 4] {
    [
        src[3] as f32 / 255.0,
        src[2] as f32 / 255.0,
        src[1] as f32 / 255.0,
        src[0] as f32 / 255.0,
    ]
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Porter-Duff "over" of straight-alpha colors: `top` painted onto `bottom`
#[inline]
fn over(top: [f32; 4], bottom: [f32; 4]) -> [f32; 4] {
    let ta = top[3];
    let ba = bottom[3] * (1.0 - ta);
    let a = ta + ba;
    if a <= 0.0 {
        return [0.0; 4];
    }
    [
        (top[0] * ta + bottom[0] * ba) / a,
        (top[1] * ta + bottom[1] * ba) / a,
        (top[2] * ta + bottom[2] * ba) / a,
        a,
    ]
}

/// Premultiply, add, clamp, unpremultiply
#[inline]
fn lighter(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let a = (src[3] + dst[3]).min(1.0);
    if a <= 0.0 {
        return [0.0; 4];
    }
    let ch = |i: usize| (src[i] * src[3] + dst[i] * dst[3]).min(1.0) / a;
    [ch(0), ch(1), ch(2), a]
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering.
/// Every render layer draws into one of these before it reaches the window.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    /// A size whose byte length does not fit in `usize` yields an empty 0x0 buffer.
    pub fn with_size(width: u32, height: u32) -> Self {
        match Self::byte_len(width, height) {
            Some(len) => Self {
                pixels: vec![0; len],
                width,
                height,
            },
            None => Self {
                pixels: Vec::new(),
                width: 0,
                height: 0,
            },
        }
    }

    /// Bytes needed for a `width` x `height` buffer, or None on overflow
    pub fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Reallocate to a new size, discarding contents. No-op if unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::with_size(width, height);
    }

    /// Set a single pixel with custom alpha (bounds checked)
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel_rgba(&mut self.pixels[idx..idx + 4], r, g, b, a);
        }
    }

    /// Opaque pixel write
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.set_pixel_rgba(x, y, color.r, color.g, color.b, 255);
    }

    /// Read all 4 channels of a pixel (bounds checked)
    /// Returns (r, g, b, a) or None if out of bounds
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
                self.pixels[idx],     // A
            ))
        } else {
            None
        }
    }

    #[inline]
    pub fn alpha_at(&self, x: i32, y: i32) -> Option<u8> {
        self.get_pixel_rgba(x, y).map(|(_, _, _, a)| a)
    }

    /// Blend one straight-alpha source pixel into (x, y) using `mode`
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, src: (u8, u8, u8, u8), mode: BlendMode) {
        if !self.in_bounds(x, y) || src.3 == 0 {
            return;
        }
        let idx = self.pixel_index(x as u32, y as u32);
        let dst_px = &mut self.pixels[idx..idx + 4];
        let s = [
            src.0 as f32 / 255.0,
            src.1 as f32 / 255.0,
            src.2 as f32 / 255.0,
            src.3 as f32 / 255.0,
        ];
        let d = read_pixel_rgba(dst_px);
        let out = match mode {
            BlendMode::Alpha if src.3 == 255 => {
                write_pixel_rgba(dst_px, src.0, src.1, src.2, 255);
                return;
            },
            BlendMode::Alpha => over(s, d),
            BlendMode::Behind => over(d, s),
            BlendMode::Lighter => lighter(s, d),
        };
        write_pixel_rgba(
            dst_px,
            to_byte(out[0]),
            to_byte(out[1]),
            to_byte(out[2]),
            to_byte(out[3]),
        );
    }

    /// Stamp an opaque filled disc whose `diameter`-pixel bounding square
    /// starts at (x0, y0). Pixel (i, j) of the square is inside when
    /// `((i/d - 0.5) * 2)² + ((j/d - 0.5) * 2)² <= 1`.
    pub fn fill_disc(&mut self, x0: i32, y0: i32, diameter: u32, color: Rgb, mode: BlendMode) {
        if diameter == 0 {
            return;
        }
        let d = diameter as f64;
        for j in 0..diameter {
            let v = (j as f64 / d - 0.5) * 2.0;
            for i in 0..diameter {
                let u = (i as f64 / d - 0.5) * 2.0;
                if u * u + v * v <= 1.0 {
                    self.blend_pixel(
                        x0 + i as i32,
                        y0 + j as i32,
                        (color.r, color.g, color.b, 255),
                        mode,
                    );
                }
            }
        }
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// Composite a source buffer onto this one using per-pixel source alpha.
    /// Skips fully transparent source pixels.
    pub fn composite(&mut self, src: &PixelBuffer, dst_x: i32, dst_y: i32, mode: BlendMode) {
        let src_w = src.width() as i32;
        let src_h = src.height() as i32;
        let dst_w = self.width as i32;
        let dst_h = self.height as i32;

        for sy in 0..src_h {
            let dy = dst_y + sy;
            if dy < 0 || dy >= dst_h {
                continue;
            }

            for sx in 0..src_w {
                let dx = dst_x + sx;
                if dx < 0 || dx >= dst_w {
                    continue;
                }

                let si = src.pixel_index(sx as u32, sy as u32);
                let sa = src.pixels[si]; // alpha channel (ABGR[0])
                if sa == 0 {
                    continue;
                }
                let px = (src.pixels[si + 3], src.pixels[si + 2], src.pixels[si + 1], sa);
                self.blend_pixel(dx, dy, px, mode);
            }
        }
    }

    /// Convenience: composite at (0, 0). Buffers should be the same size.
    pub fn composite_full(&mut self, src: &PixelBuffer, mode: BlendMode) {
        self.composite(src, 0, 0, mode);
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Count of pixels with non-zero alpha
    pub fn coverage(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[0] != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abgr_byte_order() {
        let mut buf = PixelBuffer::with_size(2, 2);
        buf.set_pixel_rgba(1, 0, 10, 20, 30, 40);
        assert_eq!(&buf.as_bytes()[4..8], &[40, 30, 20, 10]);
        assert_eq!(buf.get_pixel_rgba(1, 0), Some((10, 20, 30, 40)));
        assert_eq!(buf.get_pixel_rgba(2, 0), None);
        assert_eq!(buf.get_pixel_rgba(-1, 0), None);
    }

    #[test]
    fn test_byte_len_overflow() {
        assert_eq!(PixelBuffer::byte_len(3, 2), Some(24));
        assert_eq!(PixelBuffer::byte_len(u32::MAX, u32::MAX), None);

        let buf = PixelBuffer::with_size(u32::MAX, u32::MAX);
        assert_eq!((buf.width(), buf.height()), (0, 0));
        assert_eq!(buf.get_pixel_rgba(0, 0), None);
    }

    #[test]
    fn test_new_buffer_is_transparent() {
        let mut buf = PixelBuffer::with_size(3, 3);
        assert_eq!(buf.coverage(), 0);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        buf.set_pixel(1, 1, Rgb::new(1, 2, 3));
        assert_eq!(buf.coverage(), 1);
    }

    #[test]
    fn test_alpha_over_transparent() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.blend_pixel(0, 0, (200, 100, 50, 128), BlendMode::Alpha);
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((200, 100, 50, 128)));
    }

    #[test]
    fn test_behind_keeps_opaque_destination() {
        let mut buf = PixelBuffer::with_size(2, 1);
        buf.set_pixel(0, 0, Rgb::new(1, 2, 3));
        buf.blend_pixel(0, 0, (255, 255, 255, 255), BlendMode::Behind);
        buf.blend_pixel(1, 0, (255, 255, 255, 255), BlendMode::Behind);
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((1, 2, 3, 255)));
        assert_eq!(buf.get_pixel_rgba(1, 0), Some((255, 255, 255, 255)));
    }

    #[test]
    fn test_behind_fills_partial_destination() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.set_pixel_rgba(0, 0, 255, 0, 0, 128);
        buf.blend_pixel(0, 0, (0, 0, 255, 255), BlendMode::Behind);
        let (r, g, b, a) = buf.get_pixel_rgba(0, 0).unwrap();
        assert_eq!(a, 255);
        assert_eq!(g, 0);
        assert!(r > 120 && r < 135, "r = {}", r);
        assert!(b > 120 && b < 135, "b = {}", b);
    }

    #[test]
    fn test_lighter_adds_and_clamps() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.set_pixel(0, 0, Rgb::new(100, 200, 0));
        buf.blend_pixel(0, 0, (100, 100, 255, 255), BlendMode::Lighter);
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((200, 255, 255, 255)));

        let mut half = PixelBuffer::with_size(1, 1);
        half.blend_pixel(0, 0, (255, 0, 0, 51), BlendMode::Lighter);
        assert_eq!(half.get_pixel_rgba(0, 0), Some((255, 0, 0, 51)));
    }

    #[test]
    fn test_fill_disc_shape() {
        let mut buf = PixelBuffer::with_size(8, 8);
        buf.fill_disc(0, 0, 4, Rgb::new(9, 9, 9), BlendMode::Alpha);
        // Corners of the bounding square are outside the disc
        assert_eq!(buf.alpha_at(0, 0), Some(0));
        assert_eq!(buf.alpha_at(3, 3), Some(0));
        assert_eq!(buf.alpha_at(2, 2), Some(255));
        assert_eq!(buf.alpha_at(0, 2), Some(255));
        assert_eq!(buf.alpha_at(4, 2), Some(0));

        let mut one = PixelBuffer::with_size(3, 3);
        one.fill_disc(1, 1, 1, Rgb::new(9, 9, 9), BlendMode::Alpha);
        assert_eq!(one.coverage(), 1);
    }

    #[test]
    fn test_fill_disc_clips_at_edges() {
        let mut buf = PixelBuffer::with_size(4, 4);
        buf.fill_disc(-3, -3, 6, Rgb::new(1, 1, 1), BlendMode::Alpha);
        assert!(buf.coverage() > 0);
        assert!(buf.coverage() < 16);
    }

    #[test]
    fn test_composite_skips_transparent() {
        let mut dst = PixelBuffer::with_size(2, 1);
        dst.set_pixel(0, 0, Rgb::new(5, 5, 5));
        dst.set_pixel(1, 0, Rgb::new(5, 5, 5));
        let mut src = PixelBuffer::with_size(2, 1);
        src.set_pixel(1, 0, Rgb::new(50, 60, 70));
        dst.composite_full(&src, BlendMode::Alpha);
        assert_eq!(dst.get_pixel_rgba(0, 0), Some((5, 5, 5, 255)));
        assert_eq!(dst.get_pixel_rgba(1, 0), Some((50, 60, 70, 255)));
    }

}
