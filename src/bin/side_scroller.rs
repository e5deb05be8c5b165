//! Tilt the board to dodge the red dots. The middle button pauses.

extern crate env_logger;
#[macro_use]
extern crate log;
extern crate sensehat_demos;

use sensehat_demos::{BwFont, SenseHat, SideScroller};

use std::process;

fn main() {
    env_logger::init();

    let hat = match SenseHat::new() {
        Ok(hat) => hat,
        Err(e) => {
            error!("cannot open the Sense HAT: {}", e);
            process::exit(1);
        }
    };
    let font = match BwFont::builtin() {
        Ok(font) => font,
        Err(e) => {
            error!("cannot load the font: {}", e);
            process::exit(1);
        }
    };

    SideScroller::new(hat, font).run();
}
