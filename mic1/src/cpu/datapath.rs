use super::alu::Flags;
use super::micro_code::Signals;
use super::register::{self, Register, Selector};

/// Buses A, B and C around the register file, ALU and shifter.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Datapath {
    pub registers: register::File,
    /// Flags of the last ALU invocation.
    flags: Flags,
}

impl Datapath {
    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn reset(&mut self) {
        self.registers.clear();
        self.flags = Flags::empty();
    }

    /// Moves data for one micro-cycle and returns the value driven on bus C.
    pub fn run_cycle(&mut self, signals: &Signals) -> u16 {
        // AMUX takes priority over whatever bus A addresses.
        let a = if signals.amux {
            self.registers.get(Register::MBR)
        } else {
            self.read_bus_a(signals.a)
        };
        let b = self.read_bus_b(signals.b);

        let (alu_result, flags) = signals.alu.execute(a, b);
        self.flags = flags;
        let c = signals.shift.apply(alu_result);

        if signals.mar {
            self.registers.set(Register::MAR, i32::from(c));
        }
        if signals.mbr {
            self.registers.set(Register::MBR, i32::from(c));
        }
        if signals.enc {
            self.write_bus_c(signals.c, c);
        }
        c
    }

    /// Bus A only reaches the register file. Anything else reads as zero.
    fn read_bus_a(&self, address: u8) -> u16 {
        match Selector::from_bus_address(address) {
            Selector::Register(register) => self.registers.get(register),
            Selector::Constant(_) | Selector::Unmapped => 0,
        }
    }

    fn read_bus_b(&self, address: u8) -> u16 {
        match Selector::from_bus_address(address) {
            Selector::Register(register) => self.registers.get(register),
            Selector::Constant(value) => value,
            Selector::Unmapped => 0,
        }
    }

    fn write_bus_c(&mut self, address: u8, value: u16) {
        match Selector::from_bus_address(address) {
            Selector::Register(register) => self.registers.set(register, i32::from(value)),
            selector => trace!(target: "mpc", "Dropped C bus write to {:?}", selector),
        }
    }
}
