/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. The most significant nibble picks an
/// instruction family; families 0x0, 0x8, 0xE and 0xF then look at the low nibble or low byte to
/// pick the exact operation.
///
/// The remaining nibbles carry operands:
/// - `[_nnn]` a 12-bit address
/// - `[__kk]` a byte assigned to or compared with Vx
/// - `[_x__]` the register Vx, or the last register of the range V0..=Vx
/// - `[__y_]` the register Vy
/// - `[___n]` a 4-bit length (sprite height)
pub trait Opcode {
    /// Returns the Opcode's component nibbles.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The instruction family.
    /// `[f___]`
    fn family(&self) -> u8;

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;

    /// Builds an opcode from the two bytes that hold it in memory.
    fn from_bytes(high: u8, low: u8) -> Self;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    fn family(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }

    fn from_bytes(high: u8, low: u8) -> Self {
        u16::from(high) << 8 | u16::from(low)
    }
}
