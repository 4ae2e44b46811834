use super::*;
use crate::cpu::micro_code::Signals;
use crate::cpu::register::BUS_ONE;
use crate::error;

use Register::*;

#[test]
fn test_program_loop() {
    // LODD 100 / ADDD 101 / STOD 102 / JUMP 0
    let mut cpu = Cpu::default();
    cpu.load_program(&[0x0064, 0x2065, 0x1066, 0x6000], 0).unwrap();
    cpu.write_memory(100, 15).unwrap();
    cpu.write_memory(101, 25).unwrap();
    cpu.reset_cache_stats();
    cpu.run(18).unwrap();
    assert_eq!(cpu.dump_memory(102, 1).unwrap(), &[40]);
    assert_eq!(cpu.cycle_count(), 18);
    assert_eq!(cpu.mpc(), 0);
    // Ten reads, two of them misses: each of the three fetches and the two operand loads hold
    // rd for two cycles. The misses fill the program block and the operand block.
    assert_eq!(cpu.cache_stats(), (8, 2));
}

#[test]
fn test_fault_stops_run() {
    let mut cpu = Cpu::default();
    cpu.load_program(&[0xF400], 0).unwrap();
    cpu.set_register(SP, 0);
    assert_eq!(
        cpu.run(100),
        Err(error::Type::InvalidAddress { address: 0xFFFF, size: 4096 })
    );
    // Fetch, five decode rows and the SP decrement completed. The failing write did not.
    assert_eq!(cpu.cycle_count(), 9);
    assert_eq!(cpu.mpc(), 175);
    assert_eq!(cpu.register(SP), 0xFFFF);
    assert!(cpu.mir().mem_write());
}

#[test]
fn test_reset_keeps_memory() {
    let mut cpu = Cpu::default();
    cpu.load_program(&[0x7005, 0x1010], 0).unwrap();
    cpu.run(10).unwrap();
    assert_eq!(cpu.dump_memory(0x10, 1).unwrap(), &[5]);

    cpu.reset();
    assert_eq!(cpu.cycle_count(), 0);
    assert_eq!(cpu.mpc(), 0);
    assert!(cpu.register_snapshot().values().all(|&value| value == 0));
    assert_eq!(cpu.dump_memory(0, 2).unwrap(), &[0x7005, 0x1010]);

    // Firmware survives as well.
    cpu.run(4).unwrap();
    assert_eq!(cpu.register(AC), 5);
}

#[test]
fn test_custom_firmware() {
    let increment = Signals {
        a: AC as u8,
        b: BUS_ONE,
        enc: true,
        c: AC as u8,
        ..Default::default()
    };
    let mut cpu = Cpu::default();
    cpu.load_firmware(&[increment.encode()]).unwrap();
    cpu.run(5).unwrap();
    assert_eq!(cpu.register(AC), 5);
    assert_eq!(cpu.mpc(), 0);
    assert!(!cpu.flags().z());
}

#[test]
fn test_firmware_overflow() {
    let mut cpu = Cpu::default();
    assert_eq!(
        cpu.load_firmware(&[0; 257]),
        Err(error::Type::FirmwareOverflow { len: 257, capacity: 256 })
    );
}

#[test]
fn test_program_too_large() {
    let mut cpu = Cpu::default();
    assert_eq!(
        cpu.load_program(&[0; 4], 4094),
        Err(error::Type::ProgramTooLarge { start: 4094, len: 4, size: 4096 })
    );
}

#[test]
fn test_invalid_config() {
    for &config in &[
        Config { memory_words: 0, ..Default::default() },
        Config { cache_lines: 0, ..Default::default() },
        Config { block_size: 0, ..Default::default() },
    ] {
        assert!(matches!(Cpu::new(config), Err(error::Type::InvalidConfig(_))));
    }
}

#[test]
fn test_small_machine() {
    let config = Config { memory_words: 64, cache_lines: 2, block_size: 8 };
    let mut cpu = Cpu::new(config).unwrap();
    cpu.load_program(&[0x003F, 0x1000 | 62], 0).unwrap();
    cpu.write_memory(63, 0xAAAA).unwrap();
    cpu.run(12).unwrap();
    assert_eq!(cpu.dump_memory(62, 2).unwrap(), &[0xAAAA, 0xAAAA]);
    assert_eq!(cpu.cache().lines().len(), 2);
    // Addresses past the end of a small memory fault instead of wrapping.
    cpu.reset();
    cpu.load_program(&[0x0040], 0).unwrap();
    assert!(cpu.run(6).is_err());
}

#[test]
fn test_register_snapshot_names() {
    let cpu = with_default().set_reg(TIR, 0xABCD).cpu;
    let snapshot = cpu.register_snapshot();
    assert_eq!(
        snapshot.keys().copied().collect::<Vec<_>>(),
        ["AC", "IR", "MAR", "MBR", "PC", "SP", "TIR"]
    );
    assert_eq!(snapshot["TIR"], 0xABCD);
}
