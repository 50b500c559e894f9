use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace, warn};

use crate::constants::{DISPLAY_WIDTH, MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::state::{FrameBuffer, Keypad, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the current `state`
///  - the random source used by `Cxkk`
///
/// Supplies interfaces for:
/// - loading programs
/// - pressing and releasing keys
/// - advancing the machine one cycle at a time
/// - inspecting its frame buffer for rendering by some display
/// - checking whether a tone should be playing
///
/// Nothing here is reentrant; whoever owns the machine calls `step` at their own cadence and
/// touches the keypad or frame buffer only between steps.
pub struct Chip8 {
    state: State,
    rng: Box<dyn RngCore + Send>,
}

impl Chip8 {
    /// A machine whose random numbers come from an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose random numbers are reproducible for a given `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// A machine drawing its random numbers from `rng`
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        debug!("initialising chip-8");
        Chip8 {
            state: State::new(),
            rng: Box::new(rng),
        }
    }

    /// Load a program into memory at 0x200
    ///
    /// # Arguments
    /// * `program` the raw program image; at most 3584 bytes
    ///
    /// Oversized programs are rejected before anything is written.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            warn!(
                size = program.len(),
                max = MAX_PROGRAM_SIZE,
                "program does not fit in memory"
            );
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.state.write(PROGRAM_START, program)?;
        debug!(size = program.len(), "loaded program");
        Ok(())
    }

    /// Advances the machine by a single cycle
    /// - fetches, decodes and executes the opcode at pc
    /// - counts both timers down by one
    ///
    /// The timers tick even when the instruction fails; a failed cycle is reported but the
    /// machine can keep stepping.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.state.pc;
        let result = self.execute_next();
        self.state.tick_timers();
        if let Err(e) = &result {
            warn!(pc, error = %e, "cycle failed");
        }
        result
    }

    fn execute_next(&mut self) -> Result<()> {
        let pc = self.state.pc;
        let op = self.state.fetch()?;
        let instruction = Instruction::decode(op)?;
        trace!(pc, opcode = op, ?instruction, "executing");
        instruction.execute(&mut self.state, &mut *self.rng)
    }

    /// The complete machine state, for debuggers and tests
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The current frame, indexed as [y][x]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Bytes per row of the frame buffer
    pub fn pitch(&self) -> usize {
        DISPLAY_WIDTH * std::mem::size_of::<u32>()
    }

    /// Returns the FrameBuffer if it changed since the last call
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.state.keypad
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed; anything above 0xF is ignored
    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: u8, pressed: bool) {
        match self.state.keypad.get_mut(key as usize) {
            Some(state) => *state = pressed,
            None => debug!(key, "ignoring key outside the keypad"),
        }
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer != 0
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
