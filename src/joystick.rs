use glob::{glob, GlobError, PatternError};
use byteorder::{ByteOrder, NativeEndian};
use libc;

use device::Joystick;

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::mem;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Name the kernel driver gives the Sense HAT joystick.
const JOYSTICK_NAME: &str = "Raspberry Pi Sense HAT Joystick";

const EV_KEY: u16 = 0x01;
const KEY_ENTER: u16 = 28;
const KEY_PRESSED: i32 = 1;

/// A single decoded input event, without its timestamp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl KeyEvent {
    pub fn is_enter_press(&self) -> bool {
        self.kind == EV_KEY && self.code == KEY_ENTER && self.value == KEY_PRESSED
    }
}

/// The Sense HAT joystick, read through its evdev device.
pub struct JoystickDevice {
    path: PathBuf,
    device: File,
}

/// The errors which can occur when opening the joystick.
#[derive(Debug)]
pub enum JoystickError {
    MissingDevice,
    IoError(io::Error),
    GlobError(GlobError),
    PatternError(PatternError),
}

impl JoystickDevice {
    /// Finds the joystick among the input devices and opens it without
    /// blocking.
    pub fn new() -> Result<Self, JoystickError> {
        let names = glob("/sys/class/input/event*/device/name")?;
        for name_path in names {
            let name_path = name_path?;
            let name = match fs::read_to_string(&name_path) {
                Ok(name) => name,
                Err(_) => continue,
            };
            if name.trim() != JOYSTICK_NAME {
                continue;
            }
            if let Some(path) = event_node(&name_path) {
                let device = OpenOptions::new()
                    .read(true)
                    .custom_flags(libc::O_NONBLOCK)
                    .open(&path)?;
                info!("found the Sense HAT joystick at {}", path.display());
                return Ok(JoystickDevice { path, device });
            }
        }
        Err(JoystickError::MissingDevice)
    }

    /// Reads every event that is already queued.
    fn drain(&mut self) -> io::Result<Vec<KeyEvent>> {
        let size = mem::size_of::<libc::input_event>();
        let mut buf = vec![0u8; size];
        let mut events = Vec::new();
        loop {
            match self.device.read(&mut buf) {
                Ok(n) if n == size => events.push(decode_event(&buf)),
                Ok(_) => return Ok(events),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(events),
                Err(e) => return Err(e),
            }
        }
    }
}

impl Joystick for JoystickDevice {
    fn poll_enter(&mut self) -> bool {
        match self.drain() {
            Ok(events) => events.iter().any(KeyEvent::is_enter_press),
            Err(e) => {
                warn!("joystick read failed: {}", e);
                false
            }
        }
    }

    fn discard_pending(&mut self) {
        match self.drain() {
            Ok(events) => trace!("dropped {} queued joystick events", events.len()),
            Err(e) => warn!("joystick read failed: {}", e),
        }
    }
}

/// Maps `/sys/class/input/eventN/device/name` to `/dev/input/eventN`.
fn event_node(name_path: &Path) -> Option<PathBuf> {
    name_path.ancestors()
        .filter_map(|p| p.file_name())
        .find(|n| n.to_string_lossy().starts_with("event"))
        .map(|n| Path::new("/dev/input").join(n))
}

/// Decodes the tail of a `struct input_event`. The timestamp in front of it
/// is 8 or 16 bytes depending on the platform, so the fields are read from
/// the end.
fn decode_event(buf: &[u8]) -> KeyEvent {
    let n = buf.len();
    KeyEvent {
        kind: NativeEndian::read_u16(&buf[n - 8..n - 6]),
        code: NativeEndian::read_u16(&buf[n - 6..n - 4]),
        value: NativeEndian::read_i32(&buf[n - 4..n]),
    }
}

impl fmt::Debug for JoystickDevice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "JoystickDevice {{ path: {:?} }}", self.path)
    }
}

impl fmt::Display for JoystickError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            JoystickError::MissingDevice => write!(f, "no Sense HAT joystick found"),
            JoystickError::IoError(ref e) => write!(f, "joystick I/O error: {}", e),
            JoystickError::GlobError(ref e) => write!(f, "joystick lookup failed: {}", e),
            JoystickError::PatternError(ref e) => write!(f, "bad joystick pattern: {}", e),
        }
    }
}

impl From<io::Error> for JoystickError {
    fn from(err: io::Error) -> Self {
        JoystickError::IoError(err)
    }
}

impl From<GlobError> for JoystickError {
    fn from(err: GlobError) -> Self {
        JoystickError::GlobError(err)
    }
}

impl From<PatternError> for JoystickError {
    fn from(err: PatternError) -> Self {
        JoystickError::PatternError(err)
    }
}
