use std::error::Error;
use std::fs;
use std::process;

use mic1::log::{setup_logging, LogSettings};
use mic1::{Config, Cpu, Register};

const HELP: &str = "\
Assembles a MAC-1 program and runs it on the MIC-1 microarchitecture.

USAGE:
    mic1_emu [OPTIONS] FILE.asm

OPTIONS:
    --cycles N          Micro-cycles to run [default: 1000]
    --dump START:LEN    Print LEN words of main memory from START
    --trace             Log sequencing, memory and cache activity
    --listing           Print the assembled program before running it
    -h, --help          Print this message
";

struct Args {
    cycles: u64,
    dump: Option<(usize, usize)>,
    trace: bool,
    listing: bool,
    source: String,
}

fn parse_number(text: &str) -> Result<usize, String> {
    match mac1_asm::codegen::parse_literal(text) {
        Ok(value) if value >= 0 => Ok(value as usize),
        _ => Err(format!("'{}' is not a valid address", text)),
    }
}

/// START:LEN, each decimal or 0x hex.
fn parse_range(text: &str) -> Result<(usize, usize), String> {
    let colon = text.find(':').ok_or_else(|| format!("expected START:LEN, got '{}'", text))?;
    Ok((parse_number(&text[..colon])?, parse_number(&text[colon + 1..])?))
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }
    let cycles = args.opt_value_from_str("--cycles")?.unwrap_or(1000);
    let dump = args.opt_value_from_fn("--dump", parse_range)?;
    let trace = args.contains("--trace");
    let listing = args.contains("--listing");
    let mut free = args.free()?;
    if free.len() != 1 {
        eprint!("{}", HELP);
        process::exit(2);
    }
    Ok(Args { cycles, dump, trace, listing, source: free.remove(0) })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.trace {
        setup_logging(LogSettings {
            sequencing: true,
            memory: true,
            cache: true,
            disassembly: cfg!(feature = "disas"),
            assembler: true,
        })?;
    }

    let source = fs::read_to_string(&args.source)?;
    let assembly = mac1_asm::assemble_listing(&source)?;
    if args.listing {
        print!("{}", assembly);
        println!();
    }

    let mut cpu = Cpu::new(Config::default())?;
    cpu.load_program(&assembly.words, 0)?;
    // Print the machine state even when the run faults.
    let outcome = cpu.run(args.cycles);

    println!("Ran {} cycles, MPC at {}", cpu.cycle_count(), cpu.mpc());
    let pc = cpu.register(Register::PC) as usize;
    if let Some(line) = assembly.lines.get(pc) {
        println!("PC at source line {}", line);
    }
    for (name, value) in cpu.register_snapshot() {
        println!("{:>4}: {:#06X} ({})", name, value, value as i16);
    }
    let (hits, misses) = cpu.cache_stats();
    println!("Cache: {} hits, {} misses", hits, misses);

    if let Some((start, len)) = args.dump {
        for (offset, word) in cpu.dump_memory(start, len)?.iter().enumerate() {
            println!("{:04X}: {:#06X}", start + offset, word);
        }
    }
    outcome?;
    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(2);
        }
    };
    if let Err(error) = run(args) {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}
