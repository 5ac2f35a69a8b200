use crate::pointer::{memory_register, stack_register, PointerRegister};

pub const NUM_DATA_REGS: usize = 16;
pub const FLAG_REGISTER: usize = 0xF;
pub const PROGRAM_START: u16 = 0x200;

/// The sixteen general 8-bit `V` registers plus the three pointer registers
/// (`I`, `PC`, `SP`). `V[0xF]` is reserved as the carry/borrow/collision flag
/// but remains a plain, program-writable byte like any other `V` register —
/// it is overwritten by arithmetic, shift, subtract, and `DRW` as a side
/// effect of executing those instructions, not by any access guard here.
pub struct Registers {
    pub v: [u8; NUM_DATA_REGS],
    pub i: PointerRegister,
    pub pc: PointerRegister,
    pub sp: PointerRegister,
}

impl Registers {
    pub fn new() -> Self {
        let mut pc = memory_register();
        pc.set(PROGRAM_START).expect("0x200 is a valid memory address");
        Registers {
            v: [0; NUM_DATA_REGS],
            i: memory_register(),
            pc,
            sp: stack_register(),
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
