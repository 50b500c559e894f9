use std::ops::Range;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, MEMORY_SIZE, PIXEL_OFF, PROGRAM_START,
    SPRITE_SHEET, STACK_SIZE,
};
use crate::error::{Chip8Error, Result};
use crate::opcode::Opcode;

/// The FrameBuffer is indexed as [y][x]; every cell is PIXEL_ON or PIXEL_OFF
pub type FrameBuffer = [[u32; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed status of keys 0..F
pub type Keypad = [bool; 16];

/// The complete Chip-8 machine state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, pointing at the next instruction to fetch
///
/// Pointer
/// - (sp) the number of return addresses on the stack (0..=16)
///
/// Timers
/// - 2 8-bit timers (delay & sound), each decremented once per cycle while nonzero
/// - the sound timer being nonzero is the only audio signal
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved, with the font sprite sheet at 0x050
///     - programs are loaded at 0x200
/// - 64x32 frame buffer
///
/// ## Input
/// - 16 key pressed states, written by whoever drives the machine
#[derive(Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: Keypad,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[PIXEL_OFF; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            keypad: [false; 16],
        }
    }

    /// Reads the opcode at pc and advances pc past it.
    /// On failure pc is left where it was.
    pub fn fetch(&mut self) -> Result<u16> {
        let bytes = self.read(self.pc, 2)?;
        let op = u16::from_bytes(bytes[0], bytes[1]);
        self.pc += 2;
        Ok(op)
    }

    /// The memory range `start..start + len`, or the first address past the end of memory.
    pub fn range(&self, start: u16, len: usize) -> Result<Range<usize>> {
        let start = start as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }

    pub fn read(&self, start: u16, len: usize) -> Result<&[u8]> {
        let range = self.range(start, len)?;
        Ok(&self.memory[range])
    }

    /// Copies `data` into memory at `start`. Nothing is written unless all of it fits.
    pub fn write(&mut self, start: u16, data: &[u8]) -> Result<()> {
        let range = self.range(start, data.len())?;
        self.memory[range].copy_from_slice(data);
        Ok(())
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        let sp = self.sp as usize;
        if sp == STACK_SIZE {
            return Err(Chip8Error::StackOverflow);
        }
        self.stack[sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// Counts both timers down by one, stopping at zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.i, 0);
        assert_eq!(state.sp, 0);
        assert_eq!(state.v, [0; 16]);
        assert!(!state.draw_flag);
        assert!(state
            .frame_buffer
            .iter()
            .all(|row| row.iter().all(|&p| p == PIXEL_OFF)));
    }

    #[test]
    fn test_font_loaded_at_0x050() {
        let state = State::new();
        assert_eq!(state.memory[0x050..0x0A0], SPRITE_SHEET[..]);
        assert!(state.memory[..0x050].iter().all(|&b| b == 0));
        assert!(state.memory[0x0A0..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fetch_advances_pc() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch(), Ok(0xAABB));
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_fetch_last_word() {
        let mut state = State::new();
        state.pc = 0xFFE;
        state.memory[0xFFE..].copy_from_slice(&[0x12, 0x34]);
        assert_eq!(state.fetch(), Ok(0x1234));
        assert_eq!(state.pc, 0x1000);
    }

    #[test]
    fn test_fetch_out_of_bounds() {
        let mut state = State::new();
        state.pc = 0xFFF;
        assert_eq!(
            state.fetch(),
            Err(Chip8Error::AddressOutOfBounds { address: 0x1000 })
        );
        assert_eq!(state.pc, 0xFFF);

        state.pc = 0x1010;
        assert_eq!(
            state.fetch(),
            Err(Chip8Error::AddressOutOfBounds { address: 0x1010 })
        );
    }

    #[test]
    fn test_write_all_or_nothing() {
        let mut state = State::new();
        assert_eq!(
            state.write(0xFFE, &[1, 2, 3]),
            Err(Chip8Error::AddressOutOfBounds { address: 0x1000 })
        );
        assert_eq!(state.memory[0xFFE..], [0, 0]);
        assert_eq!(state.write(0xFFD, &[1, 2, 3]), Ok(()));
        assert_eq!(state.memory[0xFFD..], [1, 2, 3]);
    }

    #[test]
    fn test_stack_push_pop() {
        let mut state = State::new();
        state.push(0x0ABC).unwrap();
        state.push(0x0DEF).unwrap();
        assert_eq!(state.sp, 2);
        assert_eq!(state.pop(), Ok(0x0DEF));
        assert_eq!(state.pop(), Ok(0x0ABC));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_stack_overflow() {
        let mut state = State::new();
        for address in 0..STACK_SIZE as u16 {
            state.push(address).unwrap();
        }
        assert_eq!(state.push(0xFFF), Err(Chip8Error::StackOverflow));
        assert_eq!(state.sp as usize, STACK_SIZE);
        assert_eq!(state.stack[STACK_SIZE - 1], STACK_SIZE as u16 - 1);
    }

    #[test]
    fn test_stack_underflow() {
        let mut state = State::new();
        assert_eq!(state.pop(), Err(Chip8Error::StackUnderflow));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut state = State::new();
        state.delay_timer = 2;
        state.sound_timer = 1;
        state.tick_timers();
        assert_eq!((state.delay_timer, state.sound_timer), (1, 0));
        state.tick_timers();
        state.tick_timers();
        assert_eq!((state.delay_timer, state.sound_timer), (0, 0));
    }
}
