//! Demos for the Raspberry Pi Sense HAT: scrolling text and a side scroller
//! steered by tilting the board.

extern crate byteorder;
extern crate i2cdev;
extern crate framebuffer;
extern crate glob;
extern crate libc;
#[macro_use]
extern crate log;
extern crate rand;

#[cfg(test)]
#[macro_use]
extern crate proptest;

pub mod device;
pub mod display;
pub mod font;
pub mod game;
pub mod imu;
pub mod joystick;
pub mod scroll;
pub mod settings;

#[cfg(test)]
mod mock;

pub use device::*;
pub use display::*;
pub use font::{BwFont, FontError, Glyph};
pub use game::{GameConfig, SideScroller};
pub use imu::Vector3;
pub use scroll::{RenderMode, ScrollConfig, ScrollText, TextScroller};
