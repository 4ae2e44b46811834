use std::collections::BTreeMap;

use crate::error::{self, Result};
use crate::mmu::{Cache, MemoryManager};

pub mod alu;
pub mod control_unit;
mod datapath;
pub mod firmware;
pub mod micro_code;
pub mod register;
pub mod shifter;

#[cfg(test)]
mod test;

use alu::Flags;
use control_unit::ControlUnit;
use datapath::Datapath;
use micro_code::MicroInstruction;
use register::Register;

/// Machine geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    pub memory_words: usize,
    pub cache_lines: usize,
    /// Words per cache line.
    pub block_size: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            memory_words: 4096,
            cache_lines: 16,
            block_size: 4,
        }
    }
}

/// A MIC-1 machine: control unit, datapath and memory hierarchy stepped one micro-cycle at a
/// time. A new machine boots with the MAC-1 microprogram in its control store.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Cpu {
    control_unit: ControlUnit,
    datapath: Datapath,
    memory: MemoryManager,
    cycles: u64,
}

impl Cpu {
    pub fn new(config: Config) -> Result<Cpu> {
        if config.memory_words == 0 {
            return Err(error::Type::InvalidConfig("main memory needs at least one word".into()));
        }
        let mut cpu = Cpu {
            control_unit: ControlUnit::default(),
            datapath: Datapath::default(),
            memory: MemoryManager::new(config.memory_words, config.cache_lines, config.block_size)?,
            cycles: 0,
        };
        cpu.load_firmware(&firmware::mac1_microprogram())?;
        Ok(cpu)
    }

    /// Replaces the microprogram. Rows past the end of `firmware` are zeroed.
    pub fn load_firmware(&mut self, firmware: &[u32]) -> Result<()> {
        self.control_unit.load_firmware(firmware)
    }

    pub fn load_program(&mut self, program: &[u16], start: usize) -> Result<()> {
        self.memory.load(program, start)
    }

    /// Executes one microinstruction. On error the machine keeps whatever the datapath already
    /// latched this cycle, and neither the MPC nor the cycle count advance.
    pub fn step(&mut self) -> Result<()> {
        let mpc = self.control_unit.mpc();
        let mir = self.control_unit.fetch();
        let signals = self.control_unit.decode();
        trace!(target: "mpc", "{:3}: {:08X} {:?}", mpc, mir.bits(), signals);

        self.datapath.run_cycle(&signals);

        let registers = &mut self.datapath.registers;
        let address = registers.get(Register::MAR) as usize;
        if signals.rd {
            let value = self.memory.read(address)?;
            registers.set(Register::MBR, i32::from(value));
        }
        if signals.wr {
            self.memory.write(address, registers.get(Register::MBR))?;
        }

        let ir = registers.get(Register::IR);
        #[cfg(feature = "disas")]
        {
            if signals.cond == micro_code::Condition::Decode {
                trace!(target: "disas", "{:04X}: {}", ir, mac1_asm::disassemble(ir));
            }
        }
        let next = ControlUnit::next_address(&signals, self.datapath.flags(), ir);
        self.control_unit.update_mpc(next);
        self.cycles += 1;
        Ok(())
    }

    /// Steps `cycles` times, stopping at the first error.
    pub fn run(&mut self, cycles: u64) -> Result<()> {
        for _ in 0..cycles {
            self.step()?;
        }
        Ok(())
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    /// Clears registers, flags and sequencing state. Firmware, memory and cache are kept.
    pub fn reset(&mut self) {
        self.datapath.reset();
        self.control_unit.reset();
        self.cycles = 0;
    }

    /// Reads a word through the cache, as the datapath would.
    pub fn read_memory(&mut self, address: usize) -> Result<u16> {
        self.memory.read(address)
    }

    pub fn write_memory(&mut self, address: usize, value: u16) -> Result<()> {
        self.memory.write(address, value)
    }

    /// Main memory contents, without going through the cache.
    pub fn dump_memory(&self, start: usize, len: usize) -> Result<&[u16]> {
        self.memory.dump(start, len)
    }

    pub fn register(&self, register: Register) -> u16 {
        self.datapath.registers.get(register)
    }

    pub fn set_register(&mut self, register: Register, value: u16) {
        self.datapath.registers.set(register, i32::from(value));
    }

    pub fn register_snapshot(&self) -> BTreeMap<&'static str, u16> {
        self.datapath.registers.snapshot()
    }

    /// (hits, misses)
    pub fn cache_stats(&self) -> (u64, u64) {
        let stats = self.memory.cache().stats();
        (stats.hits, stats.misses)
    }

    pub fn reset_cache_stats(&mut self) {
        self.memory.cache_mut().reset_stats();
    }

    pub fn cache(&self) -> &Cache {
        self.memory.cache()
    }

    pub fn mpc(&self) -> u8 {
        self.control_unit.mpc()
    }

    /// The microinstruction executed by the last step.
    pub fn mir(&self) -> MicroInstruction {
        self.control_unit.mir()
    }

    pub fn flags(&self) -> Flags {
        self.datapath.flags()
    }
}

impl Default for Cpu {
    fn default() -> Cpu {
        // The default geometry is valid and the built-in microprogram fits the control store.
        Cpu::new(Config::default()).unwrap()
    }
}
