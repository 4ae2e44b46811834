//! The MAC-1 microprogram.
//!
//! Row 0-2 fetch the instruction at PC and dispatch through the decode table. Every routine
//! starts at its table entry and ends with a jump back to row 0. Conditional rows continue at
//! `addr` when the flag is clear and at `addr | 0x80` when it is set, so each branch owns a pair
//! of rows 128 apart. The pairs live in the rows that the short routines leave free:
//!
//! | rows       | use                                         |
//! |------------|---------------------------------------------|
//! | 3 / 131    | shared: return / PC := address               |
//! | 4 / 132    | shared: PC := address / return               |
//! | 5-7, 133-135 | extended group, bits 10 and 9 of IR       |
//! | 8-9, 13-14, 136-137, 141-142 | extended group leaves     |
//! | 170..      | continuation rows of the extended group      |

use super::alu::Op::{Add, And, Identity, Not};
use super::control_unit::{CONTROL_STORE_SIZE, DECODE_TABLE};
use super::micro_code::{Condition, Signals};
use super::register::{Register, BUS_AMASK, BUS_MINUS_ONE, BUS_ONE, BUS_SMASK};
use super::shifter::Op::Left;

const PC: u8 = Register::PC as u8;
const SP: u8 = Register::SP as u8;
const AC: u8 = Register::AC as u8;
const IR: u8 = Register::IR as u8;
const TIR: u8 = Register::TIR as u8;

/// Rows a conditional jump lands on. `JUMP_IF_SET` returns when the flag is clear and loads
/// PC when it is set. `JUMP_IF_CLEAR` does the opposite.
const JUMP_IF_SET: u8 = 3;
const JUMP_IF_CLEAR: u8 = 4;

// Extended group decode rows, named after the bits of IR (from bit 11 down) decoded so far.
const EXT_0: u8 = 5;
const EXT_00: u8 = 6;
const EXT_10: u8 = 7;
const PSHI: u8 = 8;
const PUSH: u8 = 9;
const RETN: u8 = 13;
const INSP: u8 = 14;

struct Builder(Vec<Option<Signals>>);

impl Builder {
    fn new() -> Builder {
        Builder(vec![None; CONTROL_STORE_SIZE])
    }

    fn row(&mut self, address: u8, signals: Signals) {
        let slot = &mut self.0[address as usize];
        assert!(slot.is_none(), "Microcode row {} assigned twice", address);
        *slot = Some(signals);
    }

    /// The first row of the routine for `opcode`.
    fn entry(&mut self, opcode: usize, signals: Signals) {
        self.row(DECODE_TABLE[opcode], signals);
    }
}

fn goto(addr: u8) -> Signals {
    Signals { addr, ..Default::default() }
}

/// C := A & AMASK. Any address taken from IR or TIR goes through this.
fn masked(a: u8, c: u8, addr: u8) -> Signals {
    Signals { a, b: BUS_AMASK, alu: And, enc: true, c, addr, ..Default::default() }
}

/// MAR := A & AMASK; rd.
fn read_masked(a: u8, addr: u8) -> Signals {
    Signals { a, b: BUS_AMASK, alu: And, mar: true, rd: true, addr, ..Default::default() }
}

/// C := MBR.
fn from_mbr(c: u8, addr: u8) -> Signals {
    Signals { amux: true, alu: Identity, enc: true, c, addr, ..Default::default() }
}

fn copy(a: u8, c: u8, addr: u8) -> Signals {
    Signals { a, alu: Identity, enc: true, c, addr, ..Default::default() }
}

fn add(a: u8, b: u8, c: u8, addr: u8) -> Signals {
    Signals { a, b, alu: Add, enc: true, c, addr, ..Default::default() }
}

/// Latches AC into the ALU so the flags reflect it.
fn sense_ac(cond: Condition, addr: u8) -> Signals {
    Signals { a: AC, alu: Identity, cond, addr, ..Default::default() }
}

/// TIR := TIR << 1, branching on the bit shifted out.
fn shift_tir(addr: u8) -> Signals {
    Signals {
        a: TIR,
        alu: Identity,
        shift: Left,
        enc: true,
        c: TIR,
        cond: Condition::Negative,
        addr,
        ..Default::default()
    }
}

fn sense_tir(addr: u8) -> Signals {
    Signals { a: TIR, alu: Identity, cond: Condition::Negative, addr, ..Default::default() }
}

/// MAR := SP; rd.
fn read_stack_top(addr: u8) -> Signals {
    Signals { a: SP, alu: Identity, mar: true, rd: true, addr, ..Default::default() }
}

/// SP := MAR := SP - 1.
fn grow_stack(addr: u8) -> Signals {
    Signals { mar: true, ..add(SP, BUS_MINUS_ONE, SP, addr) }
}

/// SP := SP + 1 while the read started by the previous row completes.
fn shrink_stack(addr: u8) -> Signals {
    Signals { rd: true, ..add(SP, BUS_ONE, SP, addr) }
}

/// TIR := IR + SP, the unmasked local address.
fn local_address(addr: u8) -> Signals {
    add(IR, SP, TIR, addr)
}

fn fetch(b: &mut Builder) {
    b.row(0, Signals { a: PC, alu: Identity, mar: true, rd: true, addr: 1, ..Default::default() });
    b.row(1, Signals { rd: true, ..add(PC, BUS_ONE, PC, 2) });
    b.row(2, Signals { cond: Condition::Decode, ..from_mbr(IR, 0) });
}

fn jump_pads(b: &mut Builder) {
    b.row(JUMP_IF_SET, goto(0));
    b.row(JUMP_IF_SET | 0x80, masked(IR, PC, 0));
    b.row(JUMP_IF_CLEAR, masked(IR, PC, 0));
    b.row(JUMP_IF_CLEAR | 0x80, goto(0));
}

fn direct(b: &mut Builder) {
    // LODD
    b.entry(0x0, read_masked(IR, 11));
    b.row(11, Signals { rd: true, ..goto(12) });
    b.row(12, from_mbr(AC, 0));

    // STOD
    b.entry(
        0x1,
        Signals { a: IR, b: BUS_AMASK, alu: And, mar: true, addr: 21, ..Default::default() },
    );
    b.row(
        21,
        Signals { a: AC, alu: Identity, mbr: true, wr: true, addr: 22, ..Default::default() },
    );
    b.row(22, Signals { wr: true, ..goto(0) });

    // ADDD
    b.entry(0x2, read_masked(IR, 31));
    b.row(31, Signals { rd: true, ..goto(32) });
    b.row(32, Signals { amux: true, ..add(0, AC, AC, 0) });

    // SUBD: AC + 1 + !m == AC - m.
    b.entry(0x3, read_masked(IR, 41));
    b.row(41, Signals { rd: true, ..add(AC, BUS_ONE, AC, 42) });
    b.row(42, Signals { amux: true, alu: Not, enc: true, c: TIR, addr: 43, ..Default::default() });
    b.row(43, add(TIR, AC, AC, 0));
}

fn control_flow(b: &mut Builder) {
    // JPOS
    b.entry(0x4, sense_ac(Condition::Negative, JUMP_IF_CLEAR));
    // JZER
    b.entry(0x5, sense_ac(Condition::Zero, JUMP_IF_SET));
    // JUMP
    b.entry(0x6, masked(IR, PC, 0));
    // LOCO
    b.entry(0x7, masked(IR, AC, 0));
    // JNEG
    b.entry(0xC, sense_ac(Condition::Negative, JUMP_IF_SET));
    // JNZE
    b.entry(0xD, sense_ac(Condition::Zero, JUMP_IF_CLEAR));

    // CALL
    b.entry(0xE, grow_stack(151));
    b.row(
        151,
        Signals { a: PC, alu: Identity, mbr: true, wr: true, addr: 152, ..Default::default() },
    );
    b.row(152, Signals { wr: true, ..masked(IR, PC, 0) });
}

fn local(b: &mut Builder) {
    // LODL
    b.entry(0x8, local_address(91));
    b.row(91, read_masked(TIR, 92));
    b.row(92, Signals { rd: true, ..goto(93) });
    b.row(93, from_mbr(AC, 0));

    // STOL
    b.entry(0x9, local_address(101));
    b.row(
        101,
        Signals { a: TIR, b: BUS_AMASK, alu: And, mar: true, addr: 102, ..Default::default() },
    );
    b.row(
        102,
        Signals { a: AC, alu: Identity, mbr: true, wr: true, addr: 103, ..Default::default() },
    );
    b.row(103, Signals { wr: true, ..goto(0) });

    // ADDL
    b.entry(0xA, local_address(111));
    b.row(111, read_masked(TIR, 112));
    b.row(112, Signals { rd: true, ..goto(113) });
    b.row(113, Signals { amux: true, ..add(0, AC, AC, 0) });

    // SUBL
    b.entry(0xB, local_address(121));
    b.row(121, read_masked(TIR, 122));
    b.row(122, Signals { rd: true, ..add(AC, BUS_ONE, AC, 123) });
    b.row(
        123,
        Signals { amux: true, alu: Not, enc: true, c: TIR, addr: 124, ..Default::default() },
    );
    b.row(124, add(TIR, AC, AC, 0));
}

/// Opcode 0xF. Bits 11-9 of IR select one of eight routines: IR is shifted into TIR until the
/// bit under test sits at bit 15, where the N flag sees it.
fn extended(b: &mut Builder) {
    b.entry(0xF, Signals { shift: Left, ..add(IR, IR, TIR, 161) });
    b.row(161, Signals { shift: Left, ..add(TIR, TIR, TIR, 162) });
    // Bit 11.
    b.row(162, shift_tir(EXT_0));
    // Bit 10.
    b.row(EXT_0, shift_tir(EXT_00));
    b.row(EXT_0 | 0x80, shift_tir(EXT_10));
    // Bit 9.
    b.row(EXT_00, sense_tir(PSHI));
    b.row(EXT_00 | 0x80, sense_tir(PUSH));
    b.row(EXT_10, sense_tir(RETN));
    b.row(EXT_10 | 0x80, sense_tir(INSP));

    // PSHI: push m[AC].
    b.row(
        PSHI,
        Signals { a: AC, alu: Identity, mar: true, rd: true, addr: 170, ..Default::default() },
    );
    b.row(170, Signals { wr: true, ..grow_stack(171) });
    b.row(171, Signals { wr: true, ..goto(0) });

    // POPI: pop into m[AC].
    b.row(PSHI | 0x80, read_stack_top(172));
    b.row(172, shrink_stack(173));
    b.row(
        173,
        Signals { a: AC, alu: Identity, mar: true, wr: true, addr: 174, ..Default::default() },
    );
    b.row(174, Signals { wr: true, ..goto(0) });

    // PUSH
    b.row(PUSH, grow_stack(175));
    b.row(
        175,
        Signals { a: AC, alu: Identity, mbr: true, wr: true, addr: 176, ..Default::default() },
    );
    b.row(176, Signals { wr: true, ..goto(0) });

    // POP
    b.row(PUSH | 0x80, read_stack_top(177));
    b.row(177, shrink_stack(178));
    b.row(178, from_mbr(AC, 0));

    // RETN
    b.row(RETN, read_stack_top(179));
    b.row(179, shrink_stack(180));
    b.row(180, from_mbr(PC, 0));

    // SWAP
    b.row(RETN | 0x80, copy(AC, TIR, 181));
    b.row(181, copy(SP, AC, 182));
    b.row(182, copy(TIR, SP, 0));

    // INSP
    b.row(
        INSP,
        Signals {
            a: IR,
            b: BUS_SMASK,
            alu: And,
            enc: true,
            c: TIR,
            addr: 183,
            ..Default::default()
        },
    );
    b.row(183, add(TIR, SP, SP, 0));

    // DESP: SP + !y + 1 == SP - y.
    b.row(
        INSP | 0x80,
        Signals {
            a: IR,
            b: BUS_SMASK,
            alu: And,
            enc: true,
            c: TIR,
            addr: 184,
            ..Default::default()
        },
    );
    b.row(184, Signals { a: TIR, alu: Not, enc: true, c: TIR, addr: 185, ..Default::default() });
    b.row(185, add(TIR, SP, SP, 186));
    b.row(186, add(SP, BUS_ONE, SP, 0));
}

fn layout() -> Vec<Option<Signals>> {
    let mut builder = Builder::new();
    fetch(&mut builder);
    jump_pads(&mut builder);
    direct(&mut builder);
    control_flow(&mut builder);
    local(&mut builder);
    extended(&mut builder);
    builder.0
}

/// The complete control store image for the MAC-1 instruction set. Unused rows are zero.
pub fn mac1_microprogram() -> Vec<u32> {
    layout()
        .into_iter()
        .map(|row| row.map_or(0, Signals::encode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_control_store() {
        assert_eq!(mac1_microprogram().len(), CONTROL_STORE_SIZE);
    }

    #[test]
    fn test_fetch_rows() {
        let program = mac1_microprogram();
        assert_eq!(program[0], 0x10C0_0201);
        let decode = Signals::from(crate::cpu::micro_code::MicroInstruction::from(program[2]));
        assert_eq!(decode.cond, Condition::Decode);
        assert!(decode.amux);
        assert_eq!(decode.c, IR);
    }

    #[test]
    fn test_every_opcode_has_a_routine() {
        let rows = layout();
        for &entry in DECODE_TABLE.iter() {
            assert!(rows[entry as usize].is_some(), "No routine at {}", entry);
        }
    }

    #[test]
    fn test_every_successor_is_defined() {
        let rows = layout();
        for (address, row) in rows.iter().enumerate() {
            let signals = match row {
                Some(signals) => signals,
                None => continue,
            };
            let successors = match signals.cond {
                Condition::Decode => continue,
                Condition::Never => vec![signals.addr],
                Condition::Negative | Condition::Zero => vec![signals.addr, signals.addr | 0x80],
            };
            for next in successors {
                assert!(
                    rows[next as usize].is_some(),
                    "Row {} continues at undefined row {}",
                    address,
                    next
                );
            }
        }
    }

    #[test]
    fn test_branch_rows_are_in_lower_half() {
        for signals in layout().iter().flatten() {
            if let Condition::Negative | Condition::Zero = signals.cond {
                assert_lt!(signals.addr, 0x80);
            }
        }
    }

    #[test]
    fn test_addresses_fit_bus_fields() {
        for signals in layout().iter().flatten() {
            assert_le!(signals.a, 0xF);
            assert_le!(signals.b, 0xF);
            assert_le!(signals.c, 0xF);
        }
    }
}
