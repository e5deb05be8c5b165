//! Scrolls a greeting. Click the joystick to change drawing mode.

extern crate env_logger;
#[macro_use]
extern crate log;
extern crate sensehat_demos;

use sensehat_demos::{BwFont, ScrollConfig, ScrollText, SenseHat};

use std::process;

const TEXT: &str = "Hello World";

fn main() {
    env_logger::init();

    let mut hat = match SenseHat::new() {
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

    let mut text = ScrollText::new(&mut hat, &font, ScrollConfig::default());
    loop {
        text.run(TEXT);
        let mode = text.next_mode();
        info!("switched to {:?}", mode);
    }
}
