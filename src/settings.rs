/// Accelerometer settings for the LSM9DS1 sensor.
///
/// Only the accelerometer is used, so the gyro and compass are left
/// powered down.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Settings {
    pub accel_sample_rate: AccelSampleRate,
    pub accel_fsr: AccelFullScaleRange,
    pub accel_lpf: AccelLowPassFilter,
}

/// Accelerometer sample rate.
///
/// Represents sample rate in Hz.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AccelSampleRate {
    Hz10,
    Hz50,
    Hz119,
    Hz238,
    Hz476,
    Hz952,
}

/// Accelerometer full scale range.
///
/// ± x g, where x is either 2, 4, 8 or 16
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AccelFullScaleRange {
    G2,
    G4,
    G8,
    G16,
}

/// Accelerometer anti-aliasing filter bandwidth.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AccelLowPassFilter {
    Hz408,
    Hz211,
    Hz105,
    Hz50,
}

// CTRL_REG6_XL: bandwidth comes from BW_XL
const BW_SCAL_ODR: u8 = 0b100;

impl Settings {
    /// Value for CTRL_REG6_XL: ODR_XL in bits 7-5, FS_XL in bits 4-3,
    /// BW_SCAL_ODR in bit 2, BW_XL in bits 1-0.
    ///
    /// BW_SCAL_ODR is always set so the sensor uses the BW_XL bandwidth
    /// instead of deriving it from the sample rate.
    pub fn ctrl_reg6_xl(&self) -> u8 {
        (self.accel_sample_rate.bits() << 5)
            | (self.accel_fsr.bits() << 3)
            | BW_SCAL_ODR
            | self.accel_lpf.bits()
    }

    /// Value for CTRL_REG7_XL. High resolution mode and the internal filter
    /// stay off so the output registers carry the unfiltered samples.
    pub fn ctrl_reg7_xl(&self) -> u8 {
        0x00
    }
}

impl AccelSampleRate {
    fn bits(&self) -> u8 {
        use self::AccelSampleRate::*;
        match *self {
            Hz10 => 0b001,
            Hz50 => 0b010,
            Hz119 => 0b011,
            Hz238 => 0b100,
            Hz476 => 0b101,
            Hz952 => 0b110,
        }
    }
}

impl AccelFullScaleRange {
    fn bits(&self) -> u8 {
        use self::AccelFullScaleRange::*;
        match *self {
            G2 => 0b00,
            G16 => 0b01,
            G4 => 0b10,
            G8 => 0b11,
        }
    }

    /// Sensitivity in g per least significant bit.
    pub fn scale(&self) -> f64 {
        use self::AccelFullScaleRange::*;
        match *self {
            G2 => 0.000061,
            G4 => 0.000122,
            G8 => 0.000244,
            G16 => 0.000732,
        }
    }
}

impl AccelLowPassFilter {
    fn bits(&self) -> u8 {
        use self::AccelLowPassFilter::*;
        match *self {
            Hz408 => 0b00,
            Hz211 => 0b01,
            Hz105 => 0b10,
            Hz50 => 0b11,
        }
    }
}

impl Default for AccelSampleRate {
    fn default() -> Self { AccelSampleRate::Hz119 }
}

impl Default for AccelFullScaleRange {
    fn default() -> Self { AccelFullScaleRange::G8 }
}

impl Default for AccelLowPassFilter {
    fn default() -> Self { AccelLowPassFilter::Hz50 }
}
