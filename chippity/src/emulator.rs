use std::cell::RefCell;
use std::fs;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use chip8_core::{Cpu, CpuError};

use crate::driver::{AudioDevice, DisplayDevice, InputDevice, InputMsg, NullDevice};

/// Default emulator clock rate in Hz.
pub const DEFAULT_CLOCK_FREQ: f32 = 720.0;

// `Default`/`new()` need genuinely `'static` peripherals with no caller to
// borrow from; a one-time leaked allocation is the simplest way to get a
// `'static` trait object out of a `RefCell`, which can't live in a `static`
// (it isn't `Sync`). This path only matters for running with no peripherals
// hooked up at all (e.g. a headless test harness).
fn null_input() -> &'static RefCell<dyn InputDevice> {
    &*Box::leak(Box::new(RefCell::new(NullDevice::Input)))
}

fn null_display() -> &'static RefCell<dyn DisplayDevice> {
    &*Box::leak(Box::new(RefCell::new(NullDevice::Display)))
}

fn null_speaker() -> &'static RefCell<dyn AudioDevice> {
    &*Box::leak(Box::new(RefCell::new(NullDevice::Audio)))
}

/// What happened during a peripheral poll, reported back to the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    None,
    NewInputs,
    ProgramExit,
}

pub struct Emulator<'i, 'd, 'a> {
    // The system we're emulating -- CHIP-8
    system: Cpu,

    input_device: &'i RefCell<dyn InputDevice + 'i>,
    display: &'d RefCell<dyn DisplayDevice + 'd>,
    speaker: &'a RefCell<dyn AudioDevice + 'a>,

    clock_period: Duration,
    // Last input message seen, to turn driver snapshots into individual
    // `on_key_pressed`/`on_key_released` edges.
    prev_keys: InputMsg,
}

impl<'i, 'd, 'a> Emulator<'i, 'd, 'a> {
    pub fn new() -> Emulator<'i, 'd, 'a> {
        Emulator::default()
    }

    pub fn with_peripherals(
        input: &'i RefCell<dyn InputDevice + 'i>,
        display: &'d RefCell<dyn DisplayDevice + 'd>,
        audio: &'a RefCell<dyn AudioDevice + 'a>,
    ) -> Emulator<'i, 'd, 'a> {
        Emulator {
            system: Cpu::new(),
            input_device: input,
            display,
            speaker: audio,
            clock_period: Duration::from_secs_f32(1.0 / DEFAULT_CLOCK_FREQ),
            prev_keys: Default::default(),
        }
    }

    pub fn set_clock_speed(&mut self, hz: f32) {
        self.clock_period = Duration::from_secs_f32(1.0 / hz);
    }

    pub fn load_program(&mut self, path: &str) -> Result<(), LoadError> {
        let rom = fs::read(path).map_err(LoadError::Io)?;
        self.system.boot(&rom).map_err(LoadError::Cpu)
    }

    /// Drives fetch-decode-execute at the configured clock rate until the
    /// active input device signals `ProgramExit` or the CPU halts on error.
    /// Returns `Ok(())` on a clean exit, or the halting [`CpuError`] so the
    /// caller can map it to a process exit code.
    pub fn run(&mut self) -> Result<(), CpuError> {
        loop {
            let cycle_start = Instant::now();

            match self.input_device.borrow_mut().handle_inputs() {
                Signal::ProgramExit => return Ok(()),
                Signal::NewInputs => self.sync_keypad(),
                Signal::None => {}
            }

            if let Err(err) = self.system.step_cycle() {
                log::error!("halting: {err}");
                return Err(err);
            }

            self.display
                .borrow_mut()
                .receive_frame(self.system.frame_buffer())
                .drive_display();
            self.speaker
                .borrow_mut()
                .receive_signal(self.system.should_play_audio())
                .play_sound();

            let elapsed = cycle_start.elapsed();
            if elapsed < self.clock_period {
                thread::sleep(self.clock_period - elapsed);
            }
        }
    }

    fn sync_keypad(&mut self) {
        let Some(keys) = self.input_device.borrow().send_inputs() else {
            return;
        };

        for key in 0..keys.len() {
            if keys[key] != self.prev_keys[key] {
                if keys[key] {
                    self.system.on_key_pressed(key as u8);
                } else {
                    self.system.on_key_released(key as u8);
                }
            }
        }
        self.prev_keys = keys;
    }
}

impl<'i, 'd, 'a> Default for Emulator<'i, 'd, 'a> {
    fn default() -> Emulator<'i, 'd, 'a> {
        Emulator {
            system: Cpu::new(),
            input_device: null_input(),
            display: null_display(),
            speaker: null_speaker(),
            clock_period: Duration::from_secs_f32(1.0 / DEFAULT_CLOCK_FREQ),
            prev_keys: Default::default(),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Cpu(CpuError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "could not read ROM file: {e}"),
            LoadError::Cpu(e) => write!(f, "{e}"),
        }
    }
}
