use rand::RngCore;

use crate::error::{Chip8Error, Result};
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded opcode: which operation to run and the operands it needs.
///
/// Variants are listed in opcode order; the doc on each is the opcode form it is decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `1nnn`
    Jump { nnn: u16 },
    /// `2nnn`
    Call { nnn: u16 },
    /// `3xkk`
    SkipEqualByte { x: u8, kk: u8 },
    /// `4xkk`
    SkipNotEqualByte { x: u8, kk: u8 },
    /// `5xy0`
    SkipEqual { x: u8, y: u8 },
    /// `6xkk`
    LoadByte { x: u8, kk: u8 },
    /// `7xkk`
    AddByte { x: u8, kk: u8 },
    /// `8xy0`
    Move { x: u8, y: u8 },
    /// `8xy1`
    Or { x: u8, y: u8 },
    /// `8xy2`
    And { x: u8, y: u8 },
    /// `8xy3`
    Xor { x: u8, y: u8 },
    /// `8xy4`
    Add { x: u8, y: u8 },
    /// `8xy5`
    Sub { x: u8, y: u8 },
    /// `8xy6`
    ShiftRight { x: u8 },
    /// `8xy7`
    SubNegated { x: u8, y: u8 },
    /// `8xyE`
    ShiftLeft { x: u8 },
    /// `9xy0`
    SkipNotEqual { x: u8, y: u8 },
    /// `Annn`
    LoadIndex { nnn: u16 },
    /// `Bnnn`
    JumpOffset { nnn: u16 },
    /// `Cxkk`
    Random { x: u8, kk: u8 },
    /// `Dxyn`
    Draw { x: u8, y: u8, n: u8 },
    /// `Ex9E`
    SkipPressed { x: u8 },
    /// `ExA1`
    SkipNotPressed { x: u8 },
    /// `Fx07`
    LoadDelay { x: u8 },
    /// `Fx0A`
    WaitKey { x: u8 },
    /// `Fx15`
    SetDelay { x: u8 },
    /// `Fx18`
    SetSound { x: u8 },
    /// `Fx1E`
    AddIndex { x: u8 },
    /// `Fx29`
    LoadGlyph { x: u8 },
    /// `Fx33`
    StoreBcd { x: u8 },
    /// `Fx55`
    StoreRegisters { x: u8 },
    /// `Fx65`
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given opcode
    pub fn decode(op: u16) -> Result<Self> {
        let (x, y, n, kk, nnn) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Clear,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, ..) => Instruction::Jump { nnn },
            (0x2, ..) => Instruction::Call { nnn },
            (0x3, ..) => Instruction::SkipEqualByte { x, kk },
            (0x4, ..) => Instruction::SkipNotEqualByte { x, kk },
            (0x5, ..) => Instruction::SkipEqual { x, y },
            (0x6, ..) => Instruction::LoadByte { x, kk },
            (0x7, ..) => Instruction::AddByte { x, kk },
            (0x8, .., 0x0) => Instruction::Move { x, y },
            (0x8, .., 0x1) => Instruction::Or { x, y },
            (0x8, .., 0x2) => Instruction::And { x, y },
            (0x8, .., 0x3) => Instruction::Xor { x, y },
            (0x8, .., 0x4) => Instruction::Add { x, y },
            (0x8, .., 0x5) => Instruction::Sub { x, y },
            (0x8, .., 0x6) => Instruction::ShiftRight { x },
            (0x8, .., 0x7) => Instruction::SubNegated { x, y },
            (0x8, .., 0xE) => Instruction::ShiftLeft { x },
            (0x9, ..) => Instruction::SkipNotEqual { x, y },
            (0xA, ..) => Instruction::LoadIndex { nnn },
            (0xB, ..) => Instruction::JumpOffset { nnn },
            (0xC, ..) => Instruction::Random { x, kk },
            (0xD, ..) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipPressed { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipNotPressed { x },
            (0xF, _, 0x0, 0x7) => Instruction::LoadDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::LoadGlyph { x },
            (0xF, _, 0x3, 0x3) => Instruction::StoreBcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::StoreRegisters { x },
            (0xF, _, 0x6, 0x5) => Instruction::LoadRegisters { x },
            _ => return Err(Chip8Error::UnknownOpcode { opcode: op }),
        };
        Ok(instruction)
    }

    /// Runs the instruction against `state`, whose pc must already point past it.
    pub fn execute<R: RngCore + ?Sized>(self, state: &mut State, rng: &mut R) -> Result<()> {
        match self {
            Instruction::Clear => clr(state),
            Instruction::Return => rts(state),
            Instruction::Jump { nnn } => jump(state, nnn),
            Instruction::Call { nnn } => call(state, nnn),
            Instruction::SkipEqualByte { x, kk } => ske(state, x, kk),
            Instruction::SkipNotEqualByte { x, kk } => skne(state, x, kk),
            Instruction::SkipEqual { x, y } => skre(state, x, y),
            Instruction::LoadByte { x, kk } => load(state, x, kk),
            Instruction::AddByte { x, kk } => add(state, x, kk),
            Instruction::Move { x, y } => mv(state, x, y),
            Instruction::Or { x, y } => or(state, x, y),
            Instruction::And { x, y } => and(state, x, y),
            Instruction::Xor { x, y } => xor(state, x, y),
            Instruction::Add { x, y } => addr(state, x, y),
            Instruction::Sub { x, y } => sub(state, x, y),
            Instruction::ShiftRight { x } => shr(state, x),
            Instruction::SubNegated { x, y } => subn(state, x, y),
            Instruction::ShiftLeft { x } => shl(state, x),
            Instruction::SkipNotEqual { x, y } => skrne(state, x, y),
            Instruction::LoadIndex { nnn } => loadi(state, nnn),
            Instruction::JumpOffset { nnn } => jumpi(state, nnn),
            Instruction::Random { x, kk } => rnd(state, rng, x, kk),
            Instruction::Draw { x, y, n } => draw(state, x, y, n),
            Instruction::SkipPressed { x } => skpr(state, x),
            Instruction::SkipNotPressed { x } => skup(state, x),
            Instruction::LoadDelay { x } => moved(state, x),
            Instruction::WaitKey { x } => keyd(state, x),
            Instruction::SetDelay { x } => loads(state, x),
            Instruction::SetSound { x } => ld(state, x),
            Instruction::AddIndex { x } => addi(state, x),
            Instruction::LoadGlyph { x } => ldspr(state, x),
            Instruction::StoreBcd { x } => bcd(state, x),
            Instruction::StoreRegisters { x } => stor(state, x),
            Instruction::LoadRegisters { x } => read(state, x),
        }
    }
}
