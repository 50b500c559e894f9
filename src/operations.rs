//! One function per instruction form.
//!
//! Every operation runs after the fetch, so `state.pc` already points at the next instruction.
//! Operations that can fail check everything before touching any state.

use rand::RngCore;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START, PIXEL_OFF, PIXEL_ON,
};
use crate::error::{Chip8Error, Result};
use crate::state::State;

const VF: usize = 0xF;

/// Skips the next instruction when `condition` holds
fn skip_if(state: &mut State, condition: bool) -> Result<()> {
    if condition {
        state.pc += 0x2;
    }
    Ok(())
}

/// Stores a flag and then a result. When x is VF the result wins.
fn set_with_flag(state: &mut State, x: u8, result: u8, flag: bool) -> Result<()> {
    state.v[VF] = u8::from(flag);
    state.v[x as usize] = result;
    Ok(())
}

fn key(state: &State, x: u8) -> Result<bool> {
    let key = state.v[x as usize];
    state
        .keypad
        .get(key as usize)
        .copied()
        .ok_or(Chip8Error::InvalidKey { key })
}

/// clear
pub fn clr(state: &mut State) -> Result<()> {
    state.frame_buffer = [[PIXEL_OFF; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) -> Result<()> {
    state.pc = state.pop()?;
    Ok(())
}

/// PC = addr
pub fn jump(state: &mut State, nnn: u16) -> Result<()> {
    state.pc = nnn;
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, nnn: u16) -> Result<()> {
    state.push(state.pc)?;
    state.pc = nnn;
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(state: &mut State, x: u8, kk: u8) -> Result<()> {
    let condition = state.v[x as usize] == kk;
    skip_if(state, condition)
}

/// if Vx != kk then pc += 2
pub fn skne(state: &mut State, x: u8, kk: u8) -> Result<()> {
    let condition = state.v[x as usize] != kk;
    skip_if(state, condition)
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: u8, y: u8) -> Result<()> {
    let condition = state.v[x as usize] == state.v[y as usize];
    skip_if(state, condition)
}

/// Vx = kk
pub fn load(state: &mut State, x: u8, kk: u8) -> Result<()> {
    state.v[x as usize] = kk;
    Ok(())
}

/// Vx += kk
/// Overflow wraps and VF is left alone
pub fn add(state: &mut State, x: u8, kk: u8) -> Result<()> {
    state.v[x as usize] = state.v[x as usize].wrapping_add(kk);
    Ok(())
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) -> Result<()> {
    state.v[x as usize] = state.v[y as usize];
    Ok(())
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) -> Result<()> {
    state.v[x as usize] |= state.v[y as usize];
    Ok(())
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) -> Result<()> {
    state.v[x as usize] &= state.v[y as usize];
    Ok(())
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) -> Result<()> {
    state.v[x as usize] ^= state.v[y as usize];
    Ok(())
}

/// Vx += Vy; VF = carry
pub fn addr(state: &mut State, x: u8, y: u8) -> Result<()> {
    let (res, carry) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    set_with_flag(state, x, res, carry)
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(state: &mut State, x: u8, y: u8) -> Result<()> {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    set_with_flag(state, x, vx.wrapping_sub(vy), vx > vy)
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &mut State, x: u8) -> Result<()> {
    let vx = state.v[x as usize];
    set_with_flag(state, x, vx >> 1, vx & 0x1 == 0x1)
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(state: &mut State, x: u8, y: u8) -> Result<()> {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    set_with_flag(state, x, vy.wrapping_sub(vx), vy > vx)
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &mut State, x: u8) -> Result<()> {
    let vx = state.v[x as usize];
    set_with_flag(state, x, vx << 1, vx >> 7 == 0x1)
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: u8, y: u8) -> Result<()> {
    let condition = state.v[x as usize] != state.v[y as usize];
    skip_if(state, condition)
}

/// I = addr
pub fn loadi(state: &mut State, nnn: u16) -> Result<()> {
    state.i = nnn;
    Ok(())
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, nnn: u16) -> Result<()> {
    state.pc = u16::from(state.v[0x0]) + nnn;
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rnd<R: RngCore + ?Sized>(state: &mut State, rng: &mut R, x: u8, kk: u8) -> Result<()> {
    let rand_byte = rng.next_u32() as u8;
    state.v[x as usize] = rand_byte & kk;
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the sprite in memory I..I+n onto the FrameBuffer with its top left corner at (Vx, Vy).
/// The corner wraps around the display; the sprite itself is clipped at the right and bottom edges.
/// Sets VF if any pixels were erased
pub fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Result<()> {
    let sprite = state.range(state.i, n as usize)?;
    let left = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let top = state.v[y as usize] as usize % DISPLAY_HEIGHT;
    let mut collision = false;

    for (row, &byte) in state.memory[sprite].iter().enumerate() {
        let y = top + row;
        if y >= DISPLAY_HEIGHT {
            break;
        }
        for bit in 0..8 {
            let x = left + bit;
            if x >= DISPLAY_WIDTH {
                break;
            }
            if byte & (0x80u8 >> bit) != 0 {
                let pixel = &mut state.frame_buffer[y][x];
                collision |= *pixel == PIXEL_ON;
                *pixel ^= PIXEL_ON;
            }
        }
    }

    state.v[VF] = u8::from(collision);
    state.draw_flag = true;
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &mut State, x: u8) -> Result<()> {
    let pressed = key(state, x)?;
    skip_if(state, pressed)
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &mut State, x: u8) -> Result<()> {
    let pressed = key(state, x)?;
    skip_if(state, !pressed)
}

/// Vx = DT
pub fn moved(state: &mut State, x: u8) -> Result<()> {
    state.v[x as usize] = state.delay_timer;
    Ok(())
}

/// Vx = first pressed key, otherwise run this instruction again next cycle
pub fn keyd(state: &mut State, x: u8) -> Result<()> {
    match state.keypad.iter().position(|&pressed| pressed) {
        Some(key) => state.v[x as usize] = key as u8,
        None => state.pc -= 0x2,
    }
    Ok(())
}

/// DT = Vx
pub fn loads(state: &mut State, x: u8) -> Result<()> {
    state.delay_timer = state.v[x as usize];
    Ok(())
}

/// ST = Vx
pub fn ld(state: &mut State, x: u8) -> Result<()> {
    state.sound_timer = state.v[x as usize];
    Ok(())
}

/// I += Vx
/// Wraps at 16 bits; an I past the end of memory is caught when it is next dereferenced
pub fn addi(state: &mut State, x: u8) -> Result<()> {
    state.i = state.i.wrapping_add(u16::from(state.v[x as usize]));
    Ok(())
}

/// I = font + Vx * 5
/// Set I to the memory address of the sprite for the digit in Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: u8) -> Result<()> {
    state.i = FONT_START + u16::from(state.v[x as usize]) * FONT_GLYPH_SIZE;
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: u8) -> Result<()> {
    let vx = state.v[x as usize];
    state.write(state.i, &[vx / 100, vx / 10 % 10, vx % 10])
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &mut State, x: u8) -> Result<()> {
    let registers = state.v;
    state.write(state.i, &registers[..=x as usize])
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &mut State, x: u8) -> Result<()> {
    let range = state.range(state.i, x as usize + 1)?;
    state.v[..=x as usize].copy_from_slice(&state.memory[range]);
    Ok(())
}
