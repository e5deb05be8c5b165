use device::{Clock, Joystick, Screen};
use display::{colors, rainbow, Grid, Pixel, SIZE};
use font::{BwFont, Glyph};

use std::time::Duration;

/// How the text and the background are colored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// Black background, glyphs take the rainbow pinned to the display.
    StaticRainbowOnBlack,
    YellowOnBlue,
    /// Black glyphs cut out of a still rainbow.
    BlackOnStaticRainbow,
    /// Black glyphs cut out of a rainbow that scrolls along with them.
    BlackOnMovingRainbow,
    /// Black background, the rainbow restarts on every glyph.
    MovingRainbowOnBlack,
}

impl RenderMode {
    /// The following mode. The cycle wraps to `YellowOnBlue`; the default
    /// mode is only used until the first switch.
    pub fn next(self) -> Self {
        use self::RenderMode::*;
        match self {
            StaticRainbowOnBlack => YellowOnBlue,
            YellowOnBlue => BlackOnStaticRainbow,
            BlackOnStaticRainbow => BlackOnMovingRainbow,
            BlackOnMovingRainbow => MovingRainbowOnBlack,
            MovingRainbowOnBlack => YellowOnBlue,
        }
    }

    /// Paints the background for this mode.
    fn fill_background<S: Screen + ?Sized>(self, screen: &mut S, rainbow: &Grid, offset: i32) {
        use self::RenderMode::*;
        match self {
            YellowOnBlue => screen.fill(colors::BLUE),
            BlackOnStaticRainbow => screen.reset(),
            BlackOnMovingRainbow => screen.copy_grid_to_screen(rainbow, -offset),
            StaticRainbowOnBlack | MovingRainbowOnBlack => screen.clear(),
        }
    }

    /// The color of one lit glyph pixel.
    fn glyph_color(self, rainbow: &Grid, at: PixelMap) -> Pixel {
        use self::RenderMode::*;
        match self {
            YellowOnBlue => colors::YELLOW,
            BlackOnStaticRainbow | BlackOnMovingRainbow => colors::BLACK,
            StaticRainbowOnBlack => rainbow[at.display_x][at.display_y],
            MovingRainbowOnBlack => rainbow[at.char_x % SIZE][at.char_y],
        }
    }
}

impl Default for RenderMode {
    fn default() -> Self { RenderMode::StaticRainbowOnBlack }
}

/// Where a lit glyph pixel lands, both on the display and inside its glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelMap {
    pub display_x: usize,
    pub display_y: usize,
    pub char_x: usize,
    pub char_y: usize,
}

/// A line of glyphs moving right to left, one pixel per step.
///
/// Glyph column `c` of the line sits at display column `c - offset`.
#[derive(Debug, Clone)]
pub struct TextScroller {
    glyphs: Vec<Glyph>,
    width: i32,
    offset: i32,
}

impl TextScroller {
    pub fn new(glyphs: Vec<Glyph>) -> Self {
        let width = glyphs.iter().map(|g| g.width() as i32).sum();
        TextScroller { glyphs, width, offset: 0 }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Total width of the line in pixels.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Moves one pixel. Returns false once the offset has passed the end of
    /// the line.
    pub fn step(&mut self) -> bool {
        self.offset += 1;
        self.offset <= self.width
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Draws the visible glyph columns. Unlit pixels are left alone.
    pub fn render<S, F>(&self, screen: &mut S, mut color_for: F)
        where S: Screen + ?Sized,
              F: FnMut(PixelMap) -> Pixel
    {
        let mut left = -self.offset;
        for glyph in &self.glyphs {
            for (cx, column) in glyph.columns().iter().enumerate() {
                let x = left + cx as i32;
                if x < 0 || x >= SIZE as i32 || *column == 0 {
                    continue;
                }
                for y in 0..SIZE {
                    if glyph.is_lit(cx, y) {
                        let color = color_for(PixelMap {
                            display_x: x as usize,
                            display_y: y,
                            char_x: cx,
                            char_y: y,
                        });
                        screen.set_pixel(x, y as i32, color);
                    }
                }
            }
            left += glyph.width() as i32;
        }
    }
}

/// Timing and look of the scrolling text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Pause between frames.
    pub interval: Duration,
    /// Mode used until the first switch.
    pub mode: RenderMode,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            interval: Duration::from_millis(50),
            mode: RenderMode::default(),
        }
    }
}

/// Scrolls text across the LED matrix until the middle button is pressed.
pub struct ScrollText<'a, H: 'a> {
    hat: &'a mut H,
    font: &'a BwFont,
    rainbow: Grid,
    mode: RenderMode,
    interval: Duration,
}

impl<'a, H> ScrollText<'a, H>
    where H: Screen + Joystick + Clock
{
    pub fn new(hat: &'a mut H, font: &'a BwFont, config: ScrollConfig) -> Self {
        ScrollText {
            hat,
            font,
            rainbow: rainbow(),
            mode: config.mode,
            interval: config.interval,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switches to the next render mode.
    pub fn next_mode(&mut self) -> RenderMode {
        self.mode = self.mode.next();
        debug!("render mode is now {:?}", self.mode);
        self.mode
    }

    /// Scrolls `text` over and over until the middle button is pressed.
    /// Returns the number of frames shown.
    pub fn run(&mut self, text: &str) -> usize {
        // The rainbow is whatever the screen shows after a reset.
        self.hat.reset();
        self.hat.copy_screen_to_grid(&mut self.rainbow);
        // Only a press made while this text is up ends it.
        self.hat.discard_pending();

        let mut scroller = TextScroller::new(self.font.glyphs_for(text));
        info!("scrolling {:?} ({} px) in {:?}", text, scroller.width(), self.mode);

        let mut frames = 0;
        loop {
            if !scroller.step() {
                scroller.reset();
            }

            let mode = self.mode;
            let rainbow = &self.rainbow;
            mode.fill_background(&mut *self.hat, rainbow, scroller.offset());
            scroller.render(&mut *self.hat, |at| mode.glyph_color(rainbow, at));
            self.hat.update();
            frames += 1;

            if self.hat.poll_enter() {
                return frames;
            }

            self.hat.sleep(self.interval);
        }
    }
}
