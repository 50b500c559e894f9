use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// None of these are fatal; the machine stays runnable after any of them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("program is {size} bytes but at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    AddressOutOfBounds { address: usize },

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("key {key:#04X} is not on the keypad")]
    InvalidKey { key: u8 },
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
