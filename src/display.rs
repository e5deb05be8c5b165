use framebuffer::{Framebuffer, FramebufferError};
use glob::{glob, GlobError, PatternError};

use device::Screen;

use std::fmt;

/// A rgb888 color pixel.
///
/// A pixel on the sensehat LED matrix is actually a hex565.
/// That means a pixel is 16-bit instead of 24-bit.
/// (5 for red, 6 for green, 5 for blue, 5+6+5=16)
pub type Pixel = (u8, u8, u8);

/// An 8x8 block of pixels, indexed `[x][y]`.
pub type Grid = [[Pixel; 8]; 8];

/// Width and height of the LED matrix.
pub const SIZE: usize = 8;

/// Named colors used by the demos.
pub mod colors {
    use super::Pixel;

    pub const BLACK: Pixel = (0, 0, 0);
    pub const RED: Pixel = (255, 0, 0);
    pub const GREEN: Pixel = (0, 255, 0);
    pub const BLUE: Pixel = (0, 0, 255);
    pub const YELLOW: Pixel = (255, 255, 0);
}

/// The image orientation.
/// 0°, 90°, 180°, 270°
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Orientation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// An in-memory copy of the LED matrix.
///
/// Drawing only touches this buffer; nothing reaches the hardware until the
/// owner pushes it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    grid: Grid,
}

impl Frame {
    pub fn new() -> Self {
        Frame { grid: [[colors::BLACK; SIZE]; SIZE] }
    }

    pub fn clear(&mut self) {
        self.fill(colors::BLACK);
    }

    pub fn fill(&mut self, p: Pixel) {
        for column in self.grid.iter_mut() {
            for pixel in column.iter_mut() {
                *pixel = p;
            }
        }
    }

    /// Restores the default image, a diagonal rainbow.
    pub fn reset(&mut self) {
        self.grid = rainbow();
    }

    /// Sets the pixel at (`x`, `y`). Coordinates outside the matrix are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, p: Pixel) {
        if let Some((x, y)) = in_bounds(x, y) {
            self.grid[x][y] = p;
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Pixel> {
        in_bounds(x, y).map(|(x, y)| self.grid[x][y])
    }

    /// Copies `grid` onto the frame, shifted `x_offset` columns to the right.
    /// Columns pushed past either edge wrap around.
    pub fn copy_from_grid(&mut self, grid: &Grid, x_offset: i32) {
        let size = SIZE as i32;
        for (gx, column) in grid.iter().enumerate() {
            let x = (gx as i32 + x_offset).rem_euclid(size) as usize;
            self.grid[x] = *column;
        }
    }

    pub fn copy_to_grid(&self, grid: &mut Grid) {
        *grid = self.grid;
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::new()
    }
}

fn in_bounds(x: i32, y: i32) -> Option<(usize, usize)> {
    let size = SIZE as i32;
    if x < 0 || y < 0 || x >= size || y >= size {
        None
    } else {
        Some((x as usize, y as usize))
    }
}

/// The default image: hue sweeps across the diagonal of the matrix.
pub fn rainbow() -> Grid {
    let mut grid = [[colors::BLACK; SIZE]; SIZE];
    for x in 0..SIZE {
        for y in 0..SIZE {
            let hue = ((x + y) * 360 / (2 * SIZE)) as f64;
            grid[x][y] = hue_to_pixel(hue);
        }
    }
    grid
}

/// Full saturation, full value HSV to RGB.
fn hue_to_pixel(hue: f64) -> Pixel {
    let h = (hue % 360.0) / 60.0;
    let f = h - h.floor();
    let rise = (255.0 * f).round() as u8;
    let fall = 255 - rise;
    match h.floor() as u32 {
        0 => (255, rise, 0),
        1 => (fall, 255, 0),
        2 => (0, 255, rise),
        3 => (0, fall, 255),
        4 => (rise, 0, 255),
        _ => (255, 0, fall),
    }
}

/// Represents the LED matrix.
pub struct Display {
    framebuffer: Framebuffer,
    frame: Frame,
    orientation: Orientation,
}

/// The errors which can occur when using the display.
#[derive(Debug)]
pub enum DisplayError {
    MissingFramebuffer,
    GlobError(GlobError),
    PatternError(PatternError),
    FramebufferError(FramebufferError),
}

impl Display {
    /// Try to create a new Display object.
    ///
    /// Will open the sensehat framebuffer and map it to memory.
    pub fn new() -> Result<Self, DisplayError> {
        // The id of the sensehat framebuffer
        let rpi_sense_fb = b"RPi-Sense FB";

        // Iterator for framebuffers located in /dev
        let path = glob("/dev/fb*")?;

        // Locates the sensehat framebuffer
        let framebuffer = path.filter_map(Result::ok)
            .filter_map(|file| Framebuffer::new(&file).ok())
            .find(|fb| {
                let id = fb.fix_screen_info.id;
                rpi_sense_fb[..] == id[..rpi_sense_fb.len()]
            });
        match framebuffer {
            Some(fb) => {
                info!("found the Sense HAT LED matrix");
                Ok(Self {
                    framebuffer: fb,
                    frame: Frame::new(),
                    orientation: Orientation::Deg0,
                })
            }
            None => Err(DisplayError::MissingFramebuffer),
        }
    }

    /// Sets the orientation of the display. The default orientation is with
    /// the HDMI port facing downwards on the Raspberry Pi 3 model B.
    pub fn set_rotation(&mut self, ori: Orientation, redraw: bool) {
        self.orientation = ori;
        if redraw {
            self.draw();
        }
    }

    /// Writes the frame to the framebuffer, rotated for the current orientation.
    fn draw(&mut self) {
        let bytes = encode_frame(&self.frame, self.orientation);
        self.framebuffer.write_frame(&bytes);
    }
}

impl Screen for Display {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn fill(&mut self, p: Pixel) {
        self.frame.fill(p);
    }

    fn reset(&mut self) {
        self.frame.reset();
    }

    fn set_pixel(&mut self, x: i32, y: i32, p: Pixel) {
        self.frame.set_pixel(x, y, p);
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Pixel> {
        self.frame.pixel(x, y)
    }

    fn copy_grid_to_screen(&mut self, grid: &Grid, x_offset: i32) {
        self.frame.copy_from_grid(grid, x_offset);
    }

    fn copy_screen_to_grid(&self, grid: &mut Grid) {
        self.frame.copy_to_grid(grid);
    }

    fn update(&mut self) {
        self.draw();
    }
}

/// Packs a frame into the 128 bytes the framebuffer expects.
pub fn encode_frame(frame: &Frame, orientation: Orientation) -> [u8; 128] {
    let mut bytes = [0; 128];
    for y in 0..SIZE {
        for x in 0..SIZE {
            let pos = rotation_func(orientation, x, y);
            let (msb, lsb) = convert_pixel(frame.grid[x][y]);
            bytes[pos] = lsb;
            bytes[pos + 1] = msb;
        }
    }
    bytes
}

/// Helper function for mapping a (x, y) coordinate on the
/// 2D LED matrix to a 1D position on the frame.
/// A pixel in the frame is actually 16-bit, but since we can
/// only write to the framebuffer with u8 slices, we have to
/// split up each pixel in two. This function returns the position
/// of the low byte of a pixel.
fn rotation_func(orientation: Orientation, x: usize, y: usize) -> usize {
    use self::Orientation::*;
    match orientation {
        Deg0 => 2 * (x + 8 * y),
        Deg90 => 2 * ((7 - y) + 8 * x),
        Deg180 => 126 - 2 * (x + 8 * y),
        Deg270 => 2 * (y + 8 * (7 - x)),
    }
}

/// Converts a rgb888 pixel into a rgb565 pixel
fn convert_pixel(p: Pixel) -> (u8, u8) {
    let r = p.0 & 0xF8;
    let g = p.1 >> 2;
    let b = p.2 >> 3;
    (r | (g >> 3), (g << 5) | b)
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Display {{ frame: {:?} orientation: {:?} }}",
            self.frame,
            self.orientation)
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DisplayError::MissingFramebuffer => write!(f, "no Sense HAT framebuffer found"),
            DisplayError::GlobError(ref e) => write!(f, "framebuffer lookup failed: {}", e),
            DisplayError::PatternError(ref e) => write!(f, "bad framebuffer pattern: {}", e),
            DisplayError::FramebufferError(ref e) => write!(f, "framebuffer error: {:?}", e),
        }
    }
}

impl From<GlobError> for DisplayError {
    fn from(err: GlobError) -> Self {
        DisplayError::GlobError(err)
    }
}

impl From<PatternError> for DisplayError {
    fn from(err: PatternError) -> Self {
        DisplayError::PatternError(err)
    }
}

impl From<FramebufferError> for DisplayError {
    fn from(err: FramebufferError) -> Self {
        DisplayError::FramebufferError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_pixel_packs_rgb565() {
        assert_eq!(convert_pixel((255, 255, 255)), (0xFF, 0xFF));
        assert_eq!(convert_pixel((255, 0, 0)), (0xF8, 0x00));
        assert_eq!(convert_pixel((0, 255, 0)), (0x07, 0xE0));
        assert_eq!(convert_pixel((0, 0, 255)), (0x00, 0x1F));
    }

    #[test]
    fn rotation_moves_the_top_left_corner() {
        assert_eq!(rotation_func(Orientation::Deg0, 0, 0), 0);
        assert_eq!(rotation_func(Orientation::Deg90, 0, 0), 14);
        assert_eq!(rotation_func(Orientation::Deg180, 0, 0), 126);
        assert_eq!(rotation_func(Orientation::Deg270, 0, 0), 112);
    }

    #[test]
    fn encode_frame_is_little_endian() {
        let mut frame = Frame::new();
        frame.set_pixel(1, 0, colors::RED);
        let bytes = encode_frame(&frame, Orientation::Deg0);
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x00, 0xF8]);
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut frame = Frame::new();
        frame.set_pixel(8, 0, colors::RED);
        frame.set_pixel(-1, 3, colors::RED);
        frame.set_pixel(2, 20, colors::RED);
        assert_eq!(frame, Frame::new());
        assert_eq!(frame.pixel(8, 0), None);
        assert_eq!(frame.pixel(7, 7), Some(colors::BLACK));
    }

    #[test]
    fn copy_from_grid_wraps_columns() {
        let mut grid = [[colors::BLACK; SIZE]; SIZE];
        grid[0] = [colors::RED; SIZE];
        let mut frame = Frame::new();

        frame.copy_from_grid(&grid, -1);
        assert_eq!(frame.pixel(7, 4), Some(colors::RED));
        assert_eq!(frame.pixel(0, 4), Some(colors::BLACK));

        frame.copy_from_grid(&grid, 10);
        assert_eq!(frame.pixel(2, 0), Some(colors::RED));
    }

    #[test]
    fn reset_then_copy_out_gives_the_rainbow() {
        let mut frame = Frame::new();
        frame.reset();
        let mut grid = [[colors::BLACK; SIZE]; SIZE];
        frame.copy_to_grid(&mut grid);
        assert_eq!(grid, rainbow());
        assert_eq!(grid[0][0], (255, 0, 0));
        assert!(grid.iter().all(|c| c.iter().all(|p| *p != colors::BLACK)));
    }
}
