//! A scripted stand-in for the board, for tests.

use device::{Clock, Joystick, Screen, Sensors};
use display::{Frame, Grid, Pixel};
use imu::Vector3;

use std::collections::VecDeque;
use std::mem;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockHat {
    /// The pending image.
    pub frame: Frame,
    /// Every image pushed with `update`, oldest first.
    pub frames: Vec<Frame>,
    /// A press made before the current loop started. Cleared by
    /// `discard_pending`, otherwise reported by the next poll.
    pub queued_press: bool,
    /// Joystick answers, one per poll. Runs out to "not pressed".
    pub presses: VecDeque<bool>,
    /// Accelerometer answers, one per read. Runs out to `None`.
    pub tilts: VecDeque<Option<Vector3>>,
    pub sleeps: Vec<Duration>,
    pub polls: usize,
}

impl MockHat {
    pub fn new() -> Self {
        MockHat::default()
    }

    /// Scripts the joystick so the `n`th poll from now sees a press.
    pub fn press_on_poll(&mut self, n: usize) {
        let queued = self.presses.len();
        for _ in queued + 1..n {
            self.presses.push_back(false);
        }
        self.presses.push_back(true);
    }

    pub fn tilt(&mut self, y: f64) {
        self.tilts.push_back(Some(Vector3::new(0.0, y, 1.0)));
    }
}

impl Screen for MockHat {
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
        self.frames.push(self.frame);
    }
}

impl Joystick for MockHat {
    fn poll_enter(&mut self) -> bool {
        self.polls += 1;
        let queued = mem::replace(&mut self.queued_press, false);
        self.presses.pop_front().unwrap_or(false) || queued
    }

    fn discard_pending(&mut self) {
        self.queued_press = false;
    }
}

impl Sensors for MockHat {
    fn acceleration(&mut self) -> Option<Vector3> {
        self.tilts.pop_front().unwrap_or(None)
    }
}

impl Clock for MockHat {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}
