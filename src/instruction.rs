//! Static instruction metadata: mnemonic and byte length per opcode.
//!
//! Execution never consults this table; it backs the trace log and the
//! disassembler only.

use lazy_static::lazy_static;

#[derive(Clone, Copy)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub length: u8,
}

const fn instr(mnemonic: &'static str, length: u8) -> Instruction {
    Instruction { mnemonic, length }
}

lazy_static! {
    pub static ref INSTRUCTIONS: [Instruction; 256] = {
        let mut table = [instr("DB ??", 1); 256];
        let entries: &[(u8, &'static str, u8)] = &[
            (0x00, "NOP", 1),
            (0x01, "LD BC, d16", 3),
            (0x02, "LD (BC), A", 1),
            (0x03, "INC BC", 1),
            (0x04, "INC B", 1),
            (0x05, "DEC B", 1),
            (0x06, "LD B, d8", 2),
            (0x07, "RLCA", 1),
            (0x08, "LD (a16), SP", 3),
            (0x09, "ADD HL, BC", 1),
            (0x0A, "LD A, (BC)", 1),
            (0x0B, "DEC BC", 1),
            (0x0C, "INC C", 1),
            (0x0D, "DEC C", 1),
            (0x0E, "LD C, d8", 2),
            (0x0F, "RRCA", 1),
            (0x10, "STOP", 1),
            (0x11, "LD DE, d16", 3),
            (0x12, "LD (DE), A", 1),
            (0x13, "INC DE", 1),
            (0x14, "INC D", 1),
            (0x15, "DEC D", 1),
            (0x16, "LD D, d8", 2),
            (0x17, "RLA", 1),
            (0x18, "JR r8", 2),
            (0x19, "ADD HL, DE", 1),
            (0x1A, "LD A, (DE)", 1),
            (0x1B, "DEC DE", 1),
            (0x1C, "INC E", 1),
            (0x1D, "DEC E", 1),
            (0x1E, "LD E, d8", 2),
            (0x1F, "RRA", 1),
            (0x20, "JR NZ, r8", 2),
            (0x21, "LD HL, d16", 3),
            (0x22, "LD (HL+), A", 1),
            (0x23, "INC HL", 1),
            (0x24, "INC H", 1),
            (0x25, "DEC H", 1),
            (0x26, "LD H, d8", 2),
            (0x27, "DAA", 1),
            (0x28, "JR Z, r8", 2),
            (0x29, "ADD HL, HL", 1),
            (0x2A, "LD A, (HL+)", 1),
            (0x2B, "DEC HL", 1),
            (0x2C, "INC L", 1),
            (0x2D, "DEC L", 1),
            (0x2E, "LD L, d8", 2),
            (0x2F, "CPL", 1),
            (0x30, "JR NC, r8", 2),
            (0x31, "LD SP, d16", 3),
            (0x32, "LD (HL-), A", 1),
            (0x33, "INC SP", 1),
            (0x34, "INC (HL)", 1),
            (0x35, "DEC (HL)", 1),
            (0x36, "LD (HL), d8", 2),
            (0x37, "SCF", 1),
            (0x38, "JR C, r8", 2),
            (0x39, "ADD HL, SP", 1),
            (0x3A, "LD A, (HL-)", 1),
            (0x3B, "DEC SP", 1),
            (0x3C, "INC A", 1),
            (0x3D, "DEC A", 1),
            (0x3E, "LD A, d8", 2),
            (0x3F, "CCF", 1),
            (0x76, "HALT", 1),
            (0xC0, "RET NZ", 1),
            (0xC1, "POP BC", 1),
            (0xC2, "JP NZ, a16", 3),
            (0xC3, "JP a16", 3),
            (0xC4, "CALL NZ, a16", 3),
            (0xC5, "PUSH BC", 1),
            (0xC6, "ADD A, d8", 2),
            (0xC7, "RST 00H", 1),
            (0xC8, "RET Z", 1),
            (0xC9, "RET", 1),
            (0xCA, "JP Z, a16", 3),
            (0xCB, "PREFIX CB", 2),
            (0xCC, "CALL Z, a16", 3),
            (0xCD, "CALL a16", 3),
            (0xCE, "ADC A, d8", 2),
            (0xCF, "RST 08H", 1),
            (0xD0, "RET NC", 1),
            (0xD1, "POP DE", 1),
            (0xD2, "JP NC, a16", 3),
            (0xD4, "CALL NC, a16", 3),
            (0xD5, "PUSH DE", 1),
            (0xD6, "SUB d8", 2),
            (0xD7, "RST 10H", 1),
            (0xD8, "RET C", 1),
            (0xD9, "RETI", 1),
            (0xDA, "JP C, a16", 3),
            (0xDC, "CALL C, a16", 3),
            (0xDE, "SBC A, d8", 2),
            (0xDF, "RST 18H", 1),
            (0xE0, "LDH (a8), A", 2),
            (0xE1, "POP HL", 1),
            (0xE2, "LD (C), A", 1),
            (0xE5, "PUSH HL", 1),
            (0xE6, "AND d8", 2),
            (0xE7, "RST 20H", 1),
            (0xE8, "ADD SP, r8", 2),
            (0xE9, "JP HL", 1),
            (0xEA, "LD (a16), A", 3),
            (0xEE, "XOR d8", 2),
            (0xEF, "RST 28H", 1),
            (0xF0, "LDH A, (a8)", 2),
            (0xF1, "POP AF", 1),
            (0xF2, "LD A, (C)", 1),
            (0xF3, "DI", 1),
            (0xF5, "PUSH AF", 1),
            (0xF6, "OR d8", 2),
            (0xF7, "RST 30H", 1),
            (0xF8, "LD HL, SP+r8", 2),
            (0xF9, "LD SP, HL", 1),
            (0xFA, "LD A, (a16)", 3),
            (0xFB, "EI", 1),
            (0xFE, "CP d8", 2),
            (0xFF, "RST 38H", 1),
        ];
        for &(opcode, mnemonic, length) in entries {
            table[opcode as usize] = instr(mnemonic, length);
        }
        // The 0x40-0xBF block is fully regular; generate it.
        const TARGETS: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
        const ALU: [&str; 8] = ["ADD A,", "ADC A,", "SUB", "SBC A,", "AND", "XOR", "OR", "CP"];
        for opcode in 0x40..=0xBFu16 {
            let opcode = opcode as u8;
            if opcode == 0x76 {
                continue; // HALT
            }
            let target = TARGETS[(opcode & 0x07) as usize];
            let mnemonic: String = if opcode < 0x80 {
                format!("LD {}, {}", TARGETS[((opcode >> 3) & 0x07) as usize], target)
            } else {
                format!("{} {}", ALU[((opcode >> 3) & 0x07) as usize], target)
            };
            table[opcode as usize] = instr(Box::leak(mnemonic.into_boxed_str()), 1);
        }
        table
    };
}

/// Mnemonic for a CB-prefixed opcode; the encoding is fully regular.
pub fn cb_mnemonic(opcode: u8) -> String {
    const TARGETS: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
    const ROTATES: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];
    let target = TARGETS[(opcode & 0x07) as usize];
    match opcode >> 6 {
        0 => format!("{} {}", ROTATES[((opcode >> 3) & 0x07) as usize], target),
        1 => format!("BIT {}, {}", (opcode >> 3) & 0x07, target),
        2 => format!("RES {}, {}", (opcode >> 3) & 0x07, target),
        _ => format!("SET {}, {}", (opcode >> 3) & 0x07, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_block_covers_loads_and_alu() {
        assert_eq!(INSTRUCTIONS[0x41].mnemonic, "LD B, C");
        assert_eq!(INSTRUCTIONS[0x7E].mnemonic, "LD A, (HL)");
        assert_eq!(INSTRUCTIONS[0x97].mnemonic, "SUB A");
        assert_eq!(INSTRUCTIONS[0xBE].mnemonic, "CP (HL)");
        assert_eq!(INSTRUCTIONS[0x76].mnemonic, "HALT");
    }

    #[test]
    fn lengths_match_operand_widths() {
        assert_eq!(INSTRUCTIONS[0x00].length, 1);
        assert_eq!(INSTRUCTIONS[0x06].length, 2);
        assert_eq!(INSTRUCTIONS[0xC3].length, 3);
    }

    #[test]
    fn cb_mnemonics_decode() {
        assert_eq!(cb_mnemonic(0x00), "RLC B");
        assert_eq!(cb_mnemonic(0x37), "SWAP A");
        assert_eq!(cb_mnemonic(0x46), "BIT 0, (HL)");
        assert_eq!(cb_mnemonic(0xFF), "SET 7, A");
    }
}
