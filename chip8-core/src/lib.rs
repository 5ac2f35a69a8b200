//! CHIP-8 interpreter core: bounded memory/stack, opcode decode and
//! dispatch, the 64x32 framebuffer, and the two 60 Hz timers. No rendering,
//! input, or audio backend lives here — see the `chippity` binary crate for
//! the host loop and its drivers.

mod cpu;
mod instruction;
mod opcode;
mod pointer;
mod registers;

pub mod error;
pub mod framebuffer;
pub mod timer;

pub use cpu::Cpu;
pub use error::CpuError;
pub use framebuffer::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use timer::Timer;
