use device::{SenseHatError, SenseHatResult};
use settings::Settings;

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use byteorder::{ByteOrder, LittleEndian};

/// I2C address to the accel and gyro sensor.
const ACCEL_GYRO_ADDR: u16 = 0x6a;

// Registers for the LSM9DS1 accel/gyro
const WHO_AM_I: u8 = 0x0f;
const CTRL_REG6_XL: u8 = 0x20;
const CTRL_REG7_XL: u8 = 0x21;
const CTRL_REG8: u8 = 0x22;
const STATUS_REG: u8 = 0x27;
const OUT_X_L_XL: u8 = 0x28;

const LSM9DS1_ID: u8 = 0x68;
// CTRL_REG8: IF_ADD_INC | BDU
const CTRL_REG8_VALUE: u8 = 0x44;
// STATUS_REG: accelerometer data available
const XLDA: u8 = 0x01;

/// A three axis reading.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }
}

/// The LSM9DS1 accelerometer.
pub struct Imu {
    imu_dev: LinuxI2CDevice,
    // Settings the sensor was configured with
    settings: Settings,
    /// g per LSB for the configured range
    accel_scale: f64,
}

impl Imu {
    pub fn new(settings: Settings) -> SenseHatResult<Self> {
        let mut imu = Self {
            imu_dev: LinuxI2CDevice::new("/dev/i2c-1", ACCEL_GYRO_ADDR)?,
            settings,
            accel_scale: settings.accel_fsr.scale(),
        };

        imu.imu_init()?;

        Ok(imu)
    }

    /// Checks the chip id and starts the accelerometer.
    fn imu_init(&mut self) -> SenseHatResult<()> {
        let id = self.imu_dev.smbus_read_byte_data(WHO_AM_I)?;
        if id != LSM9DS1_ID {
            return Err(SenseHatError::UnexpectedId(id));
        }
        self.imu_dev.smbus_write_byte_data(CTRL_REG8, CTRL_REG8_VALUE)?;
        self.imu_dev.smbus_write_byte_data(CTRL_REG6_XL, self.settings.ctrl_reg6_xl())?;
        self.imu_dev.smbus_write_byte_data(CTRL_REG7_XL, self.settings.ctrl_reg7_xl())?;
        info!("LSM9DS1 accelerometer started: {:?}", self.settings);
        Ok(())
    }

    /// Returns the acceleration in g. Fails with `NotReady` if the sensor has
    /// no new sample.
    pub fn read_acceleration(&mut self) -> SenseHatResult<Vector3> {
        let status = self.imu_dev.smbus_read_byte_data(STATUS_REG)?;
        if (status & XLDA) == 0 {
            return Err(SenseHatError::NotReady);
        }
        let mut buf = [0u8; 6];
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.imu_dev.smbus_read_byte_data(OUT_X_L_XL + i as u8)?;
        }
        Ok(accel_from_raw(&buf, self.accel_scale))
    }
}

/// Converts the six output registers (X, Y, Z, low byte first) to g.
fn accel_from_raw(buf: &[u8; 6], scale: f64) -> Vector3 {
    Vector3 {
        x: LittleEndian::read_i16(&buf[0..2]) as f64 * scale,
        y: LittleEndian::read_i16(&buf[2..4]) as f64 * scale,
        z: LittleEndian::read_i16(&buf[4..6]) as f64 * scale,
    }
}
