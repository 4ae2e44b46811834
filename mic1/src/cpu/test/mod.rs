use crate::cpu::register::Register;
use crate::cpu::*;

mod test_machine;

/// Upper bound on micro-cycles for a single test program.
const MAX_CYCLES: u64 = 10_000;

pub struct TestContext {
    cpu: Cpu,
}

pub fn with_default() -> TestContext {
    TestContext::with_default()
}

impl TestContext {
    fn with_default() -> TestContext {
        TestContext { cpu: Cpu::default() }
    }

    pub fn set_mem(mut self, address: usize, value: u16) -> TestContext {
        self.cpu.write_memory(address, value).unwrap();
        self
    }

    pub fn set_reg(mut self, register: Register, value: u16) -> TestContext {
        self.cpu.set_register(register, value);
        self
    }

    /// Assembles `source`, loads it at 0 followed by a jump to itself, and runs until the machine
    /// is about to fetch that jump.
    pub fn execute_program(self, source: &str) -> TestContext {
        let words = mac1_asm::assemble(source).unwrap();
        self.execute_words(&words)
    }

    pub fn execute_words(mut self, words: &[u16]) -> TestContext {
        let halt = words.len();
        let mut program = words.to_vec();
        program.push(0x6000 | halt as u16);
        self.cpu.load_program(&program, 0).unwrap();

        while !(self.cpu.mpc() == 0 && self.cpu.register(Register::PC) as usize == halt) {
            assert_lt!(self.cpu.cycle_count(), MAX_CYCLES, "Program never reached {}", halt);
            self.cpu.step().unwrap();
        }
        self
    }

    pub fn assert_reg_eq(self, register: Register, value: u16) -> TestContext {
        assert_eq!(
            self.cpu.register(register),
            value,
            "{:?}: {:?}",
            register,
            self.cpu.register_snapshot()
        );
        self
    }

    pub fn assert_mem_eq(self, address: usize, value: u16) -> TestContext {
        assert_eq!(self.cpu.dump_memory(address, 1).unwrap(), &[value]);
        self
    }

    pub fn assert_cycles(self, cycles: u64) -> TestContext {
        assert_eq!(self.cpu.cycle_count(), cycles);
        self
    }
}
