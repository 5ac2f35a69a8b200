use modular_bitfield::{bitfield, specifiers::B4};

use crate::opcode::{fold_addr, fold_byte};

//    CHIP-8 Instruction Set format:
//
//   <-- msb                                                     lsb -->
//                    |---    x    ---|---    y    ---|
//    +---------------+---------------+---------------+---------------+
//    |      n1       |      n2       |      n3       |      n4       |
//    |  bits 12-15   |   bits 8-11   |   bits 4-7    |   bits 0-3    |
//    +---------------+---------------+---------------+---------------+
//    |---    o    ---|---                   nnn                   ---|
//                                    |---           nn            ---|
//                                                    |---    n    ---|

// Ordering of `bitfield` is from lsb to msb; `n1` is the high nibble of
// the instruction word, `n4` the low nibble.
#[bitfield(bits = 16)]
#[repr(u16)]
struct RawWord {
    #[skip(setters)]
    n4: B4,
    #[skip(setters)]
    n3: B4,
    #[skip(setters)]
    n2: B4,
    #[skip(setters)]
    n1: B4,
}

/// The decoded form of a fetched 16-bit instruction word: one variant per
/// registered opcode pattern, with captured operands already folded into
/// their `nnn`/`kk` forms where the pattern calls for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Sys { addr: u16 },
    Cls,
    Ret,
    Jp { addr: u16 },
    Call { addr: u16 },
    SeByte { x: u8, byte: u8 },
    SneByte { x: u8, byte: u8 },
    SeReg { x: u8, y: u8 },
    LdByte { x: u8, byte: u8 },
    AddByte { x: u8, byte: u8 },
    LdReg { x: u8, y: u8 },
    Or { x: u8, y: u8 },
    And { x: u8, y: u8 },
    Xor { x: u8, y: u8 },
    AddReg { x: u8, y: u8 },
    Sub { x: u8, y: u8 },
    Shr { x: u8, y: u8 },
    Subn { x: u8, y: u8 },
    Shl { x: u8, y: u8 },
    SneReg { x: u8, y: u8 },
    LdI { addr: u16 },
    JpV0 { addr: u16 },
    Rnd { x: u8, byte: u8 },
    Drw { x: u8, y: u8, n: u8 },
    Skp { x: u8 },
    Sknp { x: u8 },
    LdVxDt { x: u8 },
    LdVxK { x: u8 },
    LdDtVx { x: u8 },
    LdStVx { x: u8 },
    AddI { x: u8 },
    LdFVx { x: u8 },
    LdBVx { x: u8 },
    LdIDataVx { x: u8 },
    LdVxIData { x: u8 },
}

/// Decodes the big-endian instruction word `(byte1, byte2)`. More specific
/// patterns (e.g. `00E0`, `00EE`) are listed ahead of their broader siblings
/// (`0nnn`) so they win the match; `None` means the word matched no
/// registered pattern (`UnmatchedInstruction`).
pub fn decode(byte1: u8, byte2: u8) -> Option<Instruction> {
    // RawWord is lsb-first, so the low byte goes first.
    let word = RawWord::from_bytes([byte2, byte1]);
    decode_nibbles(word.n1(), word.n2(), word.n3(), word.n4())
}

fn decode_nibbles(n1: u8, n2: u8, n3: u8, n4: u8) -> Option<Instruction> {
    use Instruction::*;

    Some(match (n1, n2, n3, n4) {
        (0x0, 0x0, 0xE, 0x0) => Cls,
        (0x0, 0x0, 0xE, 0xE) => Ret,
        (0x0, _, _, _) => Sys { addr: fold_addr(n2, n3, n4) },
        (0x1, _, _, _) => Jp { addr: fold_addr(n2, n3, n4) },
        (0x2, _, _, _) => Call { addr: fold_addr(n2, n3, n4) },
        (0x3, x, _, _) => SeByte { x, byte: fold_byte(n3, n4) },
        (0x4, x, _, _) => SneByte { x, byte: fold_byte(n3, n4) },
        (0x5, x, y, 0x0) => SeReg { x, y },
        (0x6, x, _, _) => LdByte { x, byte: fold_byte(n3, n4) },
        (0x7, x, _, _) => AddByte { x, byte: fold_byte(n3, n4) },
        (0x8, x, y, 0x0) => LdReg { x, y },
        (0x8, x, y, 0x1) => Or { x, y },
        (0x8, x, y, 0x2) => And { x, y },
        (0x8, x, y, 0x3) => Xor { x, y },
        (0x8, x, y, 0x4) => AddReg { x, y },
        (0x8, x, y, 0x5) => Sub { x, y },
        (0x8, x, y, 0x6) => Shr { x, y },
        (0x8, x, y, 0x7) => Subn { x, y },
        (0x8, x, y, 0xE) => Shl { x, y },
        (0x9, x, y, 0x0) => SneReg { x, y },
        (0xA, _, _, _) => LdI { addr: fold_addr(n2, n3, n4) },
        (0xB, _, _, _) => JpV0 { addr: fold_addr(n2, n3, n4) },
        (0xC, x, _, _) => Rnd { x, byte: fold_byte(n3, n4) },
        (0xD, x, y, n) => Drw { x, y, n },
        (0xE, x, 0x9, 0xE) => Skp { x },
        (0xE, x, 0xA, 0x1) => Sknp { x },
        (0xF, x, 0x0, 0x7) => LdVxDt { x },
        (0xF, x, 0x0, 0xA) => LdVxK { x },
        (0xF, x, 0x1, 0x5) => LdDtVx { x },
        (0xF, x, 0x1, 0x8) => LdStVx { x },
        (0xF, x, 0x1, 0xE) => AddI { x },
        (0xF, x, 0x2, 0x9) => LdFVx { x },
        (0xF, x, 0x3, 0x3) => LdBVx { x },
        (0xF, x, 0x5, 0x5) => LdIDataVx { x },
        (0xF, x, 0x6, 0x5) => LdVxIData { x },
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cls_wins_over_sys() {
        assert_eq!(decode(0x00, 0xE0), Some(Instruction::Cls));
    }

    #[test]
    fn ret_wins_over_sys() {
        assert_eq!(decode(0x00, 0xEE), Some(Instruction::Ret));
    }

    #[test]
    fn sys_catches_everything_else_in_the_0_family() {
        assert_eq!(decode(0x01, 0x23), Some(Instruction::Sys { addr: 0x123 }));
    }

    #[test]
    fn drw_captures_all_three_operands() {
        assert_eq!(
            decode(0xD1, 0x23),
            Some(Instruction::Drw { x: 0x1, y: 0x2, n: 0x3 })
        );
    }

    #[test]
    fn unmatched_word_returns_none() {
        // E diverges into either 9E or A1; anything else is unmatched.
        assert_eq!(decode(0xE1, 0x00), None);
    }

    #[test]
    fn nnn_and_kk_fold_correctly() {
        assert_eq!(decode(0xA1, 0x23), Some(Instruction::LdI { addr: 0x123 }));
        assert_eq!(
            decode(0x61, 0x23),
            Some(Instruction::LdByte { x: 1, byte: 0x23 })
        );
    }
}
