use bitfield::bitfield;
use num_derive::FromPrimitive;

use super::alu;
use super::shifter;

/// How the control unit picks the next microinstruction.
#[derive(FromPrimitive, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Continue at the next address field.
    Never = 0,
    /// Branch if the ALU result was negative.
    Negative = 1,
    /// Branch if the ALU result was zero.
    Zero = 2,
    /// Jump to the routine of the MAC-1 opcode held in IR. The next address field is ignored.
    Decode = 3,
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Never
    }
}

from_u8!(Condition);

bitfield! {
    /// One 32-bit control store word, laid out from bit 31 down:
    /// AMUX | COND(2) | ALU(2) | SH(2) | MBR | MAR | RD | WR | ENC | C(4) | B(4) | A(4) | ADDR(8)
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    pub struct MicroInstruction(u32);
    impl Debug;
    u8;
    pub amux, set_amux: 31;
    pub into Condition, cond, set_cond: 30, 29;
    pub into alu::Op, alu_op, set_alu_op: 28, 27;
    pub into shifter::Op, shift_op, set_shift_op: 26, 25;
    pub mbr_write, set_mbr_write: 24;
    pub mar_write, set_mar_write: 23;
    pub mem_read, set_mem_read: 22;
    pub mem_write, set_mem_write: 21;
    pub enable_c, set_enable_c: 20;
    pub c_addr, set_c_addr: 19, 16;
    pub b_addr, set_b_addr: 15, 12;
    pub a_addr, set_a_addr: 11, 8;
    pub next_addr, set_next_addr: 7, 0;
}

impl MicroInstruction {
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl From<u32> for MicroInstruction {
    fn from(word: u32) -> Self {
        MicroInstruction(word)
    }
}

/// A decoded microinstruction: the control lines driven for one cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Signals {
    /// Feed MBR into the ALU's A input instead of bus A.
    pub amux: bool,
    pub cond: Condition,
    pub alu: alu::Op,
    pub shift: shifter::Op,

    // Dedicated write lines into MAR and MBR. Independent of the C bus enable.
    pub mbr: bool,
    pub mar: bool,

    // These two drive the RD and WR lines of the memory manager.
    pub rd: bool,
    pub wr: bool,

    /// Latch the shifter output into the register addressed by `c`.
    pub enc: bool,
    pub c: u8,
    pub b: u8,
    pub a: u8,
    pub addr: u8,
}

impl From<MicroInstruction> for Signals {
    fn from(mir: MicroInstruction) -> Signals {
        Signals {
            amux: mir.amux(),
            cond: mir.cond(),
            alu: mir.alu_op(),
            shift: mir.shift_op(),
            mbr: mir.mbr_write(),
            mar: mir.mar_write(),
            rd: mir.mem_read(),
            wr: mir.mem_write(),
            enc: mir.enable_c(),
            c: mir.c_addr(),
            b: mir.b_addr(),
            a: mir.a_addr(),
            addr: mir.next_addr(),
        }
    }
}

impl From<Signals> for MicroInstruction {
    fn from(signals: Signals) -> MicroInstruction {
        debug_assert_le!(signals.a, 0xF);
        debug_assert_le!(signals.b, 0xF);
        debug_assert_le!(signals.c, 0xF);
        let mut mir = MicroInstruction(0);
        mir.set_amux(signals.amux);
        mir.set_cond(signals.cond as u8);
        mir.set_alu_op(signals.alu as u8);
        mir.set_shift_op(signals.shift as u8);
        mir.set_mbr_write(signals.mbr);
        mir.set_mar_write(signals.mar);
        mir.set_mem_read(signals.rd);
        mir.set_mem_write(signals.wr);
        mir.set_enable_c(signals.enc);
        mir.set_c_addr(signals.c);
        mir.set_b_addr(signals.b);
        mir.set_a_addr(signals.a);
        mir.set_next_addr(signals.addr);
        mir
    }
}

impl Signals {
    pub fn encode(self) -> u32 {
        MicroInstruction::from(self).bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_positions() {
        let mir = MicroInstruction(0x8000_0000);
        assert!(mir.amux());
        assert_eq!(mir.cond(), Condition::Never);

        let mir = MicroInstruction(0b0110_0000_0000_0000_0000_0000_0000_0000);
        assert_eq!(mir.cond(), Condition::Decode);
        assert!(!mir.amux());

        let mir = MicroInstruction(0x0012_3456);
        assert!(mir.enable_c());
        assert_eq!(mir.c_addr(), 0x2);
        assert_eq!(mir.b_addr(), 0x3);
        assert_eq!(mir.a_addr(), 0x4);
        assert_eq!(mir.next_addr(), 0x56);
    }

    #[test]
    fn test_encode_fetch_row() {
        // MAR := PC; rd; goto 1.
        let signals = Signals {
            mar: true,
            rd: true,
            a: 2,
            alu: alu::Op::Identity,
            addr: 1,
            ..Default::default()
        };
        assert_eq!(signals.encode(), 0x10C0_0201);
        assert_eq!(Signals::from(MicroInstruction(0x10C0_0201)), signals);
    }

    #[test]
    fn test_decode_every_flag() {
        let signals = Signals::from(MicroInstruction(0xFFFF_FFFF));
        assert!(signals.amux && signals.mbr && signals.mar && signals.rd && signals.wr);
        assert!(signals.enc);
        assert_eq!(signals.cond, Condition::Decode);
        assert_eq!(signals.alu, alu::Op::Not);
        assert_eq!(signals.shift, shifter::Op::Unassigned);
        assert_eq!((signals.c, signals.b, signals.a, signals.addr), (0xF, 0xF, 0xF, 0xFF));
    }
}
