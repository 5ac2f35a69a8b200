pub mod ansiterm;
pub mod minifb;
pub mod rodio;
pub mod termion;

use std::cell::RefCell;

use bitvec::BitArr;
use chip8_core::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

use crate::emulator::Signal;

pub const NUM_KEYS: usize = 16;

// A 16-bit CHIP-8 input message representing the incoming, updated key states
// where the nth bit corresponds to the (n as hex) key status
//
//   Example: 0b1000_0001_0000_1101
//         => keys 0, 1, 3, 8, and F are in the down state
//            and all other keys in the up state
//
pub type InputMsg = BitArr!(for NUM_KEYS);

pub const KEY_UP: bool = false;
pub const KEY_DOWN: bool = true;

pub const PX_OFF: bool = false;
pub const PX_ON: bool = true;

pub type Frame = [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT];

// Model input device (e.g. keypad, keyboard, touchscreen, etc.) interfacing with our CHIP-8 system
pub trait InputDevice {
    fn device_info(&self) -> InputInfo;

    fn handle_inputs(&mut self) -> Signal;

    fn send_inputs(&self) -> Option<InputMsg>;
}

// Model display device (e.g. UI library window, physical screen, etc.) interfacing with our CHIP-8 system
pub trait DisplayDevice {
    fn device_info(&self) -> DisplayInfo;

    fn receive_frame(&mut self, frame: &Frame) -> &mut dyn DisplayDevice;

    fn drive_display(&mut self);
}

// Model audio device (e.g. audio drivers, beeper, etc.) interfacing with our CHIP-8 system
pub trait AudioDevice {
    fn device_info(&self) -> AudioInfo;

    fn receive_signal(&mut self, data: bool) -> &mut dyn AudioDevice;

    fn play_sound(&mut self);
}

// The three traits above all take `&mut self`, but `Emulator` hands out
// shared references to its peripherals (the same device frequently backs
// more than one trait, e.g. `Termion` is input+display+audio at once).
// Blanket impls over `RefCell` push the mutability down to borrow time.
impl<T: InputDevice + ?Sized> InputDevice for RefCell<T> {
    fn device_info(&self) -> InputInfo {
        self.borrow().device_info()
    }
    fn handle_inputs(&mut self) -> Signal {
        self.get_mut().handle_inputs()
    }
    fn send_inputs(&self) -> Option<InputMsg> {
        self.borrow().send_inputs()
    }
}

impl<T: DisplayDevice + ?Sized> DisplayDevice for RefCell<T> {
    fn device_info(&self) -> DisplayInfo {
        self.borrow().device_info()
    }
    fn receive_frame(&mut self, frame: &Frame) -> &mut dyn DisplayDevice {
        self.get_mut().receive_frame(frame);
        self
    }
    fn drive_display(&mut self) {
        self.get_mut().drive_display()
    }
}

impl<T: AudioDevice + ?Sized> AudioDevice for RefCell<T> {
    fn device_info(&self) -> AudioInfo {
        self.borrow().device_info()
    }
    fn receive_signal(&mut self, data: bool) -> &mut dyn AudioDevice {
        self.get_mut().receive_signal(data);
        self
    }
    fn play_sound(&mut self) {
        self.get_mut().play_sound()
    }
}

// Lets a driver be chosen at runtime (e.g. `-a` picking `Rodio` vs.
// `AnsiTerm`) while still fitting through the same `&dyn AudioDevice` seam.
impl<T: AudioDevice + ?Sized> AudioDevice for Box<T> {
    fn device_info(&self) -> AudioInfo {
        (**self).device_info()
    }
    fn receive_signal(&mut self, data: bool) -> &mut dyn AudioDevice {
        (**self).receive_signal(data);
        self
    }
    fn play_sound(&mut self) {
        (**self).play_sound()
    }
}

#[derive(Clone, Copy)]
pub enum InputInfo {
    Minifb,
    Termion,
    None,
}

#[derive(Clone, Copy)]
pub enum DisplayInfo {
    Minifb,
    Termion,
    None,
}

#[derive(Clone, Copy)]
pub enum AudioInfo {
    Termion,
    AnsiTerm,
    Rodio,
    None,
}

// Model empty device -- puts `/dev/null` into perspective
#[derive(Clone, Copy)]
pub enum NullDevice {
    Input,
    Display,
    Audio,
}

impl InputDevice for NullDevice {
    fn device_info(&self) -> InputInfo {
        InputInfo::None
    }
    fn handle_inputs(&mut self) -> Signal {
        Signal::None
    }
    fn send_inputs(&self) -> Option<InputMsg> {
        None
    }
}

impl DisplayDevice for NullDevice {
    fn device_info(&self) -> DisplayInfo {
        DisplayInfo::None
    }
    fn receive_frame(&mut self, _frame: &Frame) -> &mut dyn DisplayDevice {
        self
    }
    fn drive_display(&mut self) {
        eprintln!("Nothing to display to!");
    }
}

impl AudioDevice for NullDevice {
    fn device_info(&self) -> AudioInfo {
        AudioInfo::None
    }
    fn receive_signal(&mut self, _data: bool) -> &mut dyn AudioDevice {
        self
    }
    fn play_sound(&mut self) {
        eprintln!("Nothing to play audio through!");
    }
}
