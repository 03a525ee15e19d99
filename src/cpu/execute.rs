//! Primary opcode dispatch. The regular 0x40-0xBF block decodes its source
//! and destination from the opcode bits; everything else is spelled out.

use super::{Cpu, FLAG_C, FLAG_H, FLAG_N, FLAG_Z};
use crate::memory::Memory;

impl Cpu {
    /// Reads the 8-bit operand encoded by bits 2..0 of an opcode
    /// (B, C, D, E, H, L, (HL), A).
    pub(super) fn read_r8(&mut self, memory: &mut Memory, index: u8) -> u8 {
        match index & 0x7 {
            0 => self.bc.high(),
            1 => self.bc.low(),
            2 => self.de.high(),
            3 => self.de.low(),
            4 => self.hl.high(),
            5 => self.hl.low(),
            6 => self.read_cycle(memory, self.hl.get()),
            _ => self.af.high(),
        }
    }

    pub(super) fn write_r8(&mut self, memory: &mut Memory, index: u8, n: u8) {
        match index & 0x7 {
            0 => self.bc.set_high(n),
            1 => self.bc.set_low(n),
            2 => self.de.set_high(n),
            3 => self.de.set_low(n),
            4 => self.hl.set_high(n),
            5 => self.hl.set_low(n),
            6 => self.write_cycle(memory, self.hl.get(), n),
            _ => self.af.set_high(n),
        }
    }

    pub(super) fn execute(&mut self, memory: &mut Memory) {
        match self.opcode {
            // --- 8-bit loads, regular block (0x76 is HALT, not LD (HL),(HL)) ---
            0x40..=0x75 | 0x77..=0x7F => {
                let n = self.read_r8(memory, self.opcode);
                self.write_r8(memory, self.opcode >> 3, n);
            }

            // --- 8-bit ALU, regular block ---
            0x80..=0xBF => {
                let n = self.read_r8(memory, self.opcode);
                match (self.opcode >> 3) & 0x7 {
                    0 => self.add_a(n, false),
                    1 => self.add_a(n, true),
                    2 => self.sub_a(n, false),
                    3 => self.sub_a(n, true),
                    4 => self.and_a(n),
                    5 => self.xor_a(n),
                    6 => self.or_a(n),
                    _ => self.cp_a(n),
                }
            }

            // --- LD r, d8 ---
            0x06 => {
                let n = self.fetch(memory);
                self.bc.set_high(n);
            }
            0x0E => {
                let n = self.fetch(memory);
                self.bc.set_low(n);
            }
            0x16 => {
                let n = self.fetch(memory);
                self.de.set_high(n);
            }
            0x1E => {
                let n = self.fetch(memory);
                self.de.set_low(n);
            }
            0x26 => {
                let n = self.fetch(memory);
                self.hl.set_high(n);
            }
            0x2E => {
                let n = self.fetch(memory);
                self.hl.set_low(n);
            }
            0x3E => {
                let n = self.fetch(memory);
                self.af.set_high(n);
            }
            0x36 => {
                let n = self.fetch(memory);
                self.write_cycle(memory, self.hl.get(), n);
            }

            // --- Loads through register pairs ---
            0x02 => self.write_cycle(memory, self.bc.get(), self.af.high()),
            0x12 => self.write_cycle(memory, self.de.get(), self.af.high()),
            0x0A => {
                let n = self.read_cycle(memory, self.bc.get());
                self.af.set_high(n);
            }
            0x1A => {
                let n = self.read_cycle(memory, self.de.get());
                self.af.set_high(n);
            }
            0x22 => {
                self.write_cycle(memory, self.hl.get(), self.af.high());
                self.hl.set(self.hl.get().wrapping_add(1));
            }
            0x32 => {
                self.write_cycle(memory, self.hl.get(), self.af.high());
                self.hl.set(self.hl.get().wrapping_sub(1));
            }
            0x2A => {
                let n = self.read_cycle(memory, self.hl.get());
                self.af.set_high(n);
                self.hl.set(self.hl.get().wrapping_add(1));
            }
            0x3A => {
                let n = self.read_cycle(memory, self.hl.get());
                self.af.set_high(n);
                self.hl.set(self.hl.get().wrapping_sub(1));
            }

            // --- High-page and absolute loads ---
            0xE0 => {
                let n = self.fetch(memory);
                self.write_cycle(memory, 0xFF00 | n as u16, self.af.high());
            }
            0xF0 => {
                let address = 0xFF00 | self.fetch(memory) as u16;
                let n = self.read_cycle(memory, address);
                self.af.set_high(n);
            }
            0xE2 => self.write_cycle(memory, 0xFF00 | self.bc.low() as u16, self.af.high()),
            0xF2 => {
                let n = self.read_cycle(memory, 0xFF00 | self.bc.low() as u16);
                self.af.set_high(n);
            }
            0xEA => {
                let address = self.fetch_word(memory);
                self.write_cycle(memory, address, self.af.high());
            }
            0xFA => {
                let address = self.fetch_word(memory);
                let n = self.read_cycle(memory, address);
                self.af.set_high(n);
            }

            // --- 16-bit loads ---
            0x01 => {
                let nn = self.fetch_word(memory);
                self.bc.set(nn);
            }
            0x11 => {
                let nn = self.fetch_word(memory);
                self.de.set(nn);
            }
            0x21 => {
                let nn = self.fetch_word(memory);
                self.hl.set(nn);
            }
            0x31 => self.sp = self.fetch_word(memory),
            0x08 => {
                let address = self.fetch_word(memory);
                self.write_cycle(memory, address, self.sp as u8);
                self.write_cycle(memory, address.wrapping_add(1), (self.sp >> 8) as u8);
            }
            0xF9 => {
                self.sp = self.hl.get();
                self.tick(memory);
            }
            0xF8 => {
                let e = self.fetch(memory);
                let result = self.sp_plus_e(e);
                self.hl.set(result);
                self.tick(memory);
            }

            // --- Stack ---
            0xC5 => self.push_word(memory, self.bc.get()),
            0xD5 => self.push_word(memory, self.de.get()),
            0xE5 => self.push_word(memory, self.hl.get()),
            0xF5 => self.push_word(memory, self.af.get()),
            0xC1 => {
                let nn = self.pop_word(memory);
                self.bc.set(nn);
            }
            0xD1 => {
                let nn = self.pop_word(memory);
                self.de.set(nn);
            }
            0xE1 => {
                let nn = self.pop_word(memory);
                self.hl.set(nn);
            }
            0xF1 => {
                // The flag register has no low nibble to pop into.
                let nn = self.pop_word(memory);
                self.af.set(nn & 0xFFF0);
            }

            // --- ALU with immediate ---
            0xC6 => {
                let n = self.fetch(memory);
                self.add_a(n, false);
            }
            0xCE => {
                let n = self.fetch(memory);
                self.add_a(n, true);
            }
            0xD6 => {
                let n = self.fetch(memory);
                self.sub_a(n, false);
            }
            0xDE => {
                let n = self.fetch(memory);
                self.sub_a(n, true);
            }
            0xE6 => {
                let n = self.fetch(memory);
                self.and_a(n);
            }
            0xEE => {
                let n = self.fetch(memory);
                self.xor_a(n);
            }
            0xF6 => {
                let n = self.fetch(memory);
                self.or_a(n);
            }
            0xFE => {
                let n = self.fetch(memory);
                self.cp_a(n);
            }

            // --- 8-bit INC/DEC ---
            0x04 => {
                let n = self.inc8(self.bc.high());
                self.bc.set_high(n);
            }
            0x0C => {
                let n = self.inc8(self.bc.low());
                self.bc.set_low(n);
            }
            0x14 => {
                let n = self.inc8(self.de.high());
                self.de.set_high(n);
            }
            0x1C => {
                let n = self.inc8(self.de.low());
                self.de.set_low(n);
            }
            0x24 => {
                let n = self.inc8(self.hl.high());
                self.hl.set_high(n);
            }
            0x2C => {
                let n = self.inc8(self.hl.low());
                self.hl.set_low(n);
            }
            0x3C => {
                let n = self.inc8(self.af.high());
                self.af.set_high(n);
            }
            0x34 => {
                let n = self.read_cycle(memory, self.hl.get());
                let n = self.inc8(n);
                self.write_cycle(memory, self.hl.get(), n);
            }
            0x05 => {
                let n = self.dec8(self.bc.high());
                self.bc.set_high(n);
            }
            0x0D => {
                let n = self.dec8(self.bc.low());
                self.bc.set_low(n);
            }
            0x15 => {
                let n = self.dec8(self.de.high());
                self.de.set_high(n);
            }
            0x1D => {
                let n = self.dec8(self.de.low());
                self.de.set_low(n);
            }
            0x25 => {
                let n = self.dec8(self.hl.high());
                self.hl.set_high(n);
            }
            0x2D => {
                let n = self.dec8(self.hl.low());
                self.hl.set_low(n);
            }
            0x3D => {
                let n = self.dec8(self.af.high());
                self.af.set_high(n);
            }
            0x35 => {
                let n = self.read_cycle(memory, self.hl.get());
                let n = self.dec8(n);
                self.write_cycle(memory, self.hl.get(), n);
            }

            // --- 16-bit arithmetic (one internal cycle each) ---
            0x03 => {
                self.bc.set(self.bc.get().wrapping_add(1));
                self.tick(memory);
            }
            0x13 => {
                self.de.set(self.de.get().wrapping_add(1));
                self.tick(memory);
            }
            0x23 => {
                self.hl.set(self.hl.get().wrapping_add(1));
                self.tick(memory);
            }
            0x33 => {
                self.sp = self.sp.wrapping_add(1);
                self.tick(memory);
            }
            0x0B => {
                self.bc.set(self.bc.get().wrapping_sub(1));
                self.tick(memory);
            }
            0x1B => {
                self.de.set(self.de.get().wrapping_sub(1));
                self.tick(memory);
            }
            0x2B => {
                self.hl.set(self.hl.get().wrapping_sub(1));
                self.tick(memory);
            }
            0x3B => {
                self.sp = self.sp.wrapping_sub(1);
                self.tick(memory);
            }
            0x09 => {
                self.add_hl(self.bc.get());
                self.tick(memory);
            }
            0x19 => {
                self.add_hl(self.de.get());
                self.tick(memory);
            }
            0x29 => {
                self.add_hl(self.hl.get());
                self.tick(memory);
            }
            0x39 => {
                self.add_hl(self.sp);
                self.tick(memory);
            }
            0xE8 => {
                let e = self.fetch(memory);
                self.sp = self.sp_plus_e(e);
                self.tick(memory);
                self.tick(memory);
            }

            // --- Accumulator rotates (Z is always cleared) ---
            0x07 => {
                let n = self.rlc(self.af.high());
                self.af.set_high(n);
                self.set_flag(FLAG_Z, false);
            }
            0x17 => {
                let n = self.rl(self.af.high());
                self.af.set_high(n);
                self.set_flag(FLAG_Z, false);
            }
            0x0F => {
                let n = self.rrc(self.af.high());
                self.af.set_high(n);
                self.set_flag(FLAG_Z, false);
            }
            0x1F => {
                let n = self.rr(self.af.high());
                self.af.set_high(n);
                self.set_flag(FLAG_Z, false);
            }

            // --- Jumps, calls, returns ---
            0xC3 => self.jp(memory, true),
            0xC2 => self.jp(memory, !self.flag(FLAG_Z)),
            0xCA => self.jp(memory, self.flag(FLAG_Z)),
            0xD2 => self.jp(memory, !self.flag(FLAG_C)),
            0xDA => self.jp(memory, self.flag(FLAG_C)),
            0xE9 => self.pc = self.hl.get(),
            0x18 => self.jr(memory, true),
            0x20 => self.jr(memory, !self.flag(FLAG_Z)),
            0x28 => self.jr(memory, self.flag(FLAG_Z)),
            0x30 => self.jr(memory, !self.flag(FLAG_C)),
            0x38 => self.jr(memory, self.flag(FLAG_C)),
            0xCD => self.call(memory, true),
            0xC4 => self.call(memory, !self.flag(FLAG_Z)),
            0xCC => self.call(memory, self.flag(FLAG_Z)),
            0xD4 => self.call(memory, !self.flag(FLAG_C)),
            0xDC => self.call(memory, self.flag(FLAG_C)),
            0xC9 => {
                self.pc = self.pop_word(memory);
                self.tick(memory);
            }
            0xD9 => {
                self.pc = self.pop_word(memory);
                self.tick(memory);
                self.ime = true;
                self.ime_delay = 0;
            }
            0xC0 => self.ret(memory, !self.flag(FLAG_Z)),
            0xC8 => self.ret(memory, self.flag(FLAG_Z)),
            0xD0 => self.ret(memory, !self.flag(FLAG_C)),
            0xD8 => self.ret(memory, self.flag(FLAG_C)),
            0xC7 => self.rst(memory, 0x0000),
            0xCF => self.rst(memory, 0x0008),
            0xD7 => self.rst(memory, 0x0010),
            0xDF => self.rst(memory, 0x0018),
            0xE7 => self.rst(memory, 0x0020),
            0xEF => self.rst(memory, 0x0028),
            0xF7 => self.rst(memory, 0x0030),
            0xFF => self.rst(memory, 0x0038),

            // --- Misc control ---
            0x00 => {}
            0x10 => {} // STOP: modeled as a one-byte no-op
            0x76 => self.halt(memory),
            0xF3 => {
                self.ime = false;
                self.ime_delay = 0;
            }
            0xFB => self.ime_delay = 2,
            0x27 => self.daa(),
            0x2F => {
                self.af.set_high(!self.af.high());
                self.set_flag(FLAG_N, true);
                self.set_flag(FLAG_H, true);
            }
            0x37 => {
                self.set_flag(FLAG_N, false);
                self.set_flag(FLAG_H, false);
                self.set_flag(FLAG_C, true);
            }
            0x3F => {
                let carry = self.flag(FLAG_C);
                self.set_flag(FLAG_N, false);
                self.set_flag(FLAG_H, false);
                self.set_flag(FLAG_C, !carry);
            }

            // --- CB prefix ---
            0xCB => {
                let opcode = self.fetch(memory);
                self.execute_cb(memory, opcode);
            }

            // Undefined opcodes lock up real hardware; here they fall
            // through as NOPs so execution can continue.
            _ => log::warn!(
                "invalid opcode {:#04X} at {:#06X}",
                self.opcode,
                self.pc.wrapping_sub(1)
            ),
        }
    }

    fn halt(&mut self, memory: &mut Memory) {
        let pending = memory.read_internal(crate::memory_map::IE_ADDR)
            & memory.read_internal(crate::memory_map::IF_ADDR)
            & 0x1F;
        if self.ime || pending == 0 {
            self.halted = true;
        } else {
            // HALT with IME off and an interrupt already pending: the next
            // opcode runs twice because PC fails to advance past it.
            self.halt_bug = true;
        }
    }
}
