use i2cdev::linux::LinuxI2CError;

use display::{Display, DisplayError, Grid, Orientation, Pixel};
use imu::{Imu, Vector3};
use joystick::{JoystickDevice, JoystickError};
use settings::Settings;

use std::fmt;
use std::thread;
use std::time::Duration;

/// Something that shows an 8x8 image.
///
/// Drawing calls only change the pending image; `update` pushes it out.
pub trait Screen {
    /// Turns every pixel off.
    fn clear(&mut self);
    /// Sets every pixel to `p`.
    fn fill(&mut self, p: Pixel);
    /// Restores the default rainbow image.
    fn reset(&mut self);
    /// Sets the pixel at (`x`, `y`). Coordinates outside the matrix are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, p: Pixel);
    fn pixel(&self, x: i32, y: i32) -> Option<Pixel>;
    /// Copies `grid` onto the screen shifted `x_offset` columns, wrapping at the edges.
    fn copy_grid_to_screen(&mut self, grid: &Grid, x_offset: i32);
    fn copy_screen_to_grid(&self, grid: &mut Grid);
    /// Pushes the pending image to the hardware.
    fn update(&mut self);
}

/// The five-way joystick. Only the middle button is used.
pub trait Joystick {
    /// Returns true if the middle button went down since the last poll.
    fn poll_enter(&mut self) -> bool;
    /// Drops any input that arrived before now.
    fn discard_pending(&mut self);
}

/// The motion sensors.
pub trait Sensors {
    /// Latest acceleration in g, or `None` if no fresh sample is available.
    fn acceleration(&mut self) -> Option<Vector3>;
}

/// Where the demo loops go to sleep between ticks.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Represents the SenseHat itself
pub struct SenseHat {
    // The 8x8 LED display
    display: Display,
    // The joystick input device
    joystick: JoystickDevice,
    // LSM9DS1 accelerometer
    imu: Imu,
}

/// Errors that this crate can return
#[derive(Debug)]
pub enum SenseHatError {
    NotReady,
    UnexpectedId(u8),
    I2CError(LinuxI2CError),
    DisplayError(DisplayError),
    JoystickError(JoystickError),
}

/// A shortcut for Results that can return `T` or `SenseHatError`
pub type SenseHatResult<T> = Result<T, SenseHatError>;

impl SenseHat {
    /// Try and create a new SenseHat object.
    ///
    /// Will open the LED matrix framebuffer, the joystick input device and
    /// the accelerometer with the default settings.
    pub fn new() -> SenseHatResult<SenseHat> {
        SenseHat::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> SenseHatResult<SenseHat> {
        let hat = SenseHat {
            display: Display::new()?,
            joystick: JoystickDevice::new()?,
            imu: Imu::new(settings)?,
        };
        info!("Sense HAT ready");
        Ok(hat)
    }

    /// If you're using the Pi upside down or sideways you can use this function
    /// to correct the orientation of the image being shown.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sensehat_demos::{SenseHat, Orientation};
    ///
    /// let mut sense = SenseHat::new().unwrap();
    /// sense.set_rotation(Orientation::Deg180, true);
    /// ```
    pub fn set_rotation(&mut self, ori: Orientation, redraw: bool) {
        self.display.set_rotation(ori, redraw);
    }
}

impl Screen for SenseHat {
    fn clear(&mut self) {
        self.display.clear();
    }

    fn fill(&mut self, p: Pixel) {
        self.display.fill(p);
    }

    fn reset(&mut self) {
        self.display.reset();
    }

    fn set_pixel(&mut self, x: i32, y: i32, p: Pixel) {
        self.display.set_pixel(x, y, p);
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Pixel> {
        self.display.pixel(x, y)
    }

    fn copy_grid_to_screen(&mut self, grid: &Grid, x_offset: i32) {
        self.display.copy_grid_to_screen(grid, x_offset);
    }

    fn copy_screen_to_grid(&self, grid: &mut Grid) {
        self.display.copy_screen_to_grid(grid);
    }

    fn update(&mut self) {
        self.display.update();
    }
}

impl Joystick for SenseHat {
    fn poll_enter(&mut self) -> bool {
        self.joystick.poll_enter()
    }

    fn discard_pending(&mut self) {
        self.joystick.discard_pending();
    }
}

impl Sensors for SenseHat {
    fn acceleration(&mut self) -> Option<Vector3> {
        match self.imu.read_acceleration() {
            Ok(v) => Some(v),
            Err(SenseHatError::NotReady) => None,
            Err(e) => {
                warn!("accelerometer read failed: {}", e);
                None
            }
        }
    }
}

impl Clock for SenseHat {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl fmt::Debug for SenseHat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SenseHat {{ display: {:?} joystick: {:?} }}",
            self.display,
            self.joystick)
    }
}

impl fmt::Display for SenseHatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SenseHatError::NotReady => write!(f, "sensor not ready"),
            SenseHatError::UnexpectedId(id) => write!(f, "unexpected sensor id {:#04x}", id),
            SenseHatError::I2CError(ref e) => write!(f, "I2C error: {:?}", e),
            SenseHatError::DisplayError(ref e) => write!(f, "{}", e),
            SenseHatError::JoystickError(ref e) => write!(f, "{}", e),
        }
    }
}

impl From<LinuxI2CError> for SenseHatError {
    fn from(err: LinuxI2CError) -> Self {
        SenseHatError::I2CError(err)
    }
}

impl From<DisplayError> for SenseHatError {
    fn from(err: DisplayError) -> Self {
        SenseHatError::DisplayError(err)
    }
}

impl From<JoystickError> for SenseHatError {
    fn from(err: JoystickError) -> Self {
        SenseHatError::JoystickError(err)
    }
}
