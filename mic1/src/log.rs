/// Selects which trace targets reach the output. Each flag maps to one `target:` used by the
/// engine's `trace!` calls.
#[derive(Default)]
pub struct LogSettings {
    /// "mpc": control store row, microinstruction and next address of every cycle.
    pub sequencing: bool,
    /// "mem": memory manager reads, writes and block fills.
    pub memory: bool,
    /// "cache": hits, misses and evictions.
    pub cache: bool,
    /// "disas": every MAC-1 instruction latched on decode. Needs the `disas` feature.
    pub disassembly: bool,
    /// "asm": symbol bindings and totals from the assembler.
    pub assembler: bool,
}

impl LogSettings {
    fn any(&self) -> bool {
        self.sequencing || self.memory || self.cache || self.disassembly || self.assembler
    }
}

pub fn setup_logging(settings: LogSettings) -> Result<(), fern::InitError> {
    if settings.any() {
        fern::Dispatch::new()
            .filter(move |metadata| match metadata.target() {
                "mpc" => settings.sequencing,
                "mem" => settings.memory,
                "cache" => settings.cache,
                "disas" => settings.disassembly,
                "asm" => settings.assembler,
                _ => true,
            })
            .format(|out, message, record| {
                out.finish(format_args!("[{}]: {}", record.target(), message))
            })
            .level(log::LevelFilter::Trace)
            .chain(std::io::stdout())
            .apply()?;
    }
    Ok(())
}
