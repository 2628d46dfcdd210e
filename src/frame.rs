use core::fmt;

use bitvec::prelude::*;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
const MEM_LENGTH: usize = WIDTH * HEIGHT / 8;

/// The monochrome framebuffer, one bit per pixel.
///
/// Rows are packed from top to bottom into continuous memory, each bit
/// matching the state of a pixel from left to right. Sprites are
/// composited with [`Frame::draw_sprite`], which also implements the
/// machine's wraparound and collision rules so that
/// [`Context::draw`](crate::Context::draw) implementors can delegate the
/// pixel work here.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame([u8; MEM_LENGTH]);

impl Frame {
    pub fn new() -> Self {
        Self([0; MEM_LENGTH])
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.0 = [0; MEM_LENGTH];
    }

    /// View the raw packed memory of the frame.
    pub fn as_raw(&self) -> &[u8] {
        &self.0
    }

    /// State of a single pixel, `None` outside of the 64x32 grid.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x < WIDTH && y < HEIGHT {
            Some(self.bits()[y * WIDTH + x])
        } else {
            None
        }
    }

    /// Iterate over rows as bit slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BitSlice<Msb0, u8>> {
        self.0.chunks(WIDTH / 8).map(|row| row.view_bits::<Msb0>())
    }

    /// XOR the sprite rows onto the frame at (x, y).
    ///
    /// Each row is 8 pixels wide, most significant bit leftmost. Pixels
    /// falling off an edge wrap around to the opposite one. Returns true
    /// if any lit pixel was turned off, which the machine reports in VF.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, &byte) in rows.iter().enumerate() {
            for dx in 0..8 {
                if byte & (0x80 >> dx) == 0 {
                    continue;
                }
                let px = (x as usize + dx) % WIDTH;
                let py = (y as usize + dy) % HEIGHT;
                collision |= self.flip(px, py);
            }
        }
        collision
    }

    /// Invert one pixel, reporting whether it was lit before.
    fn flip(&mut self, x: usize, y: usize) -> bool {
        let idx = y * WIDTH + x;
        let bits = self.bits_mut();
        let was = bits[idx];
        bits.set(idx, !was);
        was
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, on: bool) {
        self.bits_mut().set(y * WIDTH + x, on);
    }

    fn bits(&self) -> &BitSlice<Msb0, u8> {
        self.0.view_bits::<Msb0>()
    }

    fn bits_mut(&mut self) -> &mut BitSlice<Msb0, u8> {
        self.0.view_bits_mut::<Msb0>()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

/// The state dump format: rows of space-separated 0/1 pixel values.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (x, bit) in row.iter().enumerate() {
                if x > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", if *bit { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A bordered `#`/`.` grid, readable in test failures.
impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for _ in 0..WIDTH + 2 {
            write!(f, "-")?;
        }
        writeln!(f)?;
        for row in self.rows() {
            write!(f, "|")?;
            for bit in row.iter() {
                write!(f, "{}", if *bit { "#" } else { "." })?;
            }
            writeln!(f, "|")?;
        }
        for _ in 0..WIDTH + 2 {
            write!(f, "-")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::ToFrame;

    #[test]
    fn get_and_clear() {
        let mut frame = Frame::new();
        frame.set(0, 0, true);
        frame.set(63, 31, true);

        assert_eq!(frame.get(0, 0), Some(true));
        assert_eq!(frame.get(1, 0), Some(false));
        assert_eq!(frame.get(63, 31), Some(true));
        assert_eq!(frame.get(64, 0), None);
        assert_eq!(frame.get(0, 32), None);

        frame.clear();
        assert_eq!(frame, Frame::new());
    }

    #[test]
    fn draw_sprite_xors_pixels() {
        let mut frame = Frame::new();
        // the 0xA glyph of the builtin font
        let sprite = [0xF0u8, 0x90, 0xF0, 0x90, 0x90];

        assert!(!frame.draw_sprite(1, 2, &sprite));
        assert_eq!(
            frame,
            "................................................................
             ................................................................
             .####...........................................................
             .#..#...........................................................
             .####...........................................................
             .#..#...........................................................
             .#..#..........................................................."
                .to_frame(),
        );

        // drawing the same sprite again erases it and reports collision
        assert!(frame.draw_sprite(1, 2, &sprite));
        assert_eq!(frame, Frame::new());
    }

    #[test]
    fn draw_sprite_wraps_around_edges() {
        let mut frame = Frame::new();
        assert!(!frame.draw_sprite(62, 31, &[0b1100_0011]));

        assert_eq!(frame.get(62, 31), Some(true));
        assert_eq!(frame.get(63, 31), Some(true));
        assert_eq!(frame.get(0, 31), Some(false));
        // the low bits wrap back to the left edge of the same row
        assert_eq!(frame.get(4, 31), Some(true));
        assert_eq!(frame.get(5, 31), Some(true));
    }

    #[test]
    fn collision_only_on_unset() {
        let mut frame = Frame::new();
        assert!(!frame.draw_sprite(0, 0, &[0b1000_0000]));
        // disjoint pixels of the same row do not collide
        assert!(!frame.draw_sprite(1, 0, &[0b1000_0000]));
        assert!(frame.draw_sprite(0, 0, &[0b1100_0000]));
        assert_eq!(frame, Frame::new());
    }
}
