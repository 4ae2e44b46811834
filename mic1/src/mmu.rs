use crate::error::Result;

pub mod cache;
pub mod ram;

pub use cache::{Cache, Stats};
pub use ram::MainMemory;

/// Unified word interface over the cache and main memory. Reads fill whole blocks on a miss;
/// writes go through to memory and never allocate a line.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryManager {
    ram: MainMemory,
    cache: Cache,
}

impl MemoryManager {
    pub fn new(
        memory_words: usize,
        cache_lines: usize,
        block_size: usize,
    ) -> Result<MemoryManager> {
        Ok(MemoryManager {
            ram: MainMemory::new(memory_words),
            cache: Cache::new(cache_lines, block_size)?,
        })
    }

    pub fn read(&mut self, address: usize) -> Result<u16> {
        // Out of range addresses must not reach the cache, where they would alias a valid line.
        self.ram.check_address(address)?;
        if let Some(word) = self.cache.read(address) {
            return Ok(word);
        }
        let base = self.cache.block_base(address);
        let block = self.ram.read_block(base, self.cache.block_size())?;
        self.cache.load_block(address, &block)?;
        trace!(target: "mem", "Filled block {:#06X}..{:#06X}", base, base + block.len());
        Ok(block[address - base])
    }

    pub fn write(&mut self, address: usize, value: u16) -> Result<()> {
        self.ram.write(address, value)?;
        let cached = self.cache.write_word(address, value);
        trace!(
            target: "mem",
            "Wrote {:#06X} to {:#06X}{}",
            value,
            address,
            if cached { " (cached)" } else { "" }
        );
        Ok(())
    }

    /// Copies a program straight into main memory, bypassing the cache.
    pub fn load(&mut self, program: &[u16], start: usize) -> Result<()> {
        self.ram.load(program, start)?;
        // Lines holding the overwritten range would go stale otherwise.
        for (offset, &word) in program.iter().enumerate() {
            self.cache.write_word(start + offset, word);
        }
        Ok(())
    }

    /// Main memory contents. Does not touch the cache or its statistics.
    pub fn dump(&self, start: usize, len: usize) -> Result<&[u16]> {
        self.ram.dump(start, len)
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut Cache {
        &mut self.cache
    }

    pub fn ram(&self) -> &MainMemory {
        &self.ram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error;

    fn manager() -> MemoryManager {
        MemoryManager::new(4096, 16, 4).unwrap()
    }

    #[test]
    fn test_spatial_locality() {
        let mut memory = manager();
        for address in 16..20 {
            memory.write(address, address as u16 * 10).unwrap();
        }
        assert_eq!(memory.read(16), Ok(160));
        assert_eq!(memory.read(17), Ok(170));
        assert_eq!(memory.cache().stats(), Stats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_write_through() {
        let mut memory = manager();
        memory.read(0).unwrap();
        memory.write(1, 0xBEEF).unwrap();
        assert_eq!(memory.dump(1, 1).unwrap(), &[0xBEEF]);
        assert_eq!(memory.cache().lines()[0].data[1], 0xBEEF);
        assert_eq!(memory.read(1), Ok(0xBEEF));
        assert_eq!(memory.cache().stats(), Stats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_write_does_not_allocate() {
        let mut memory = manager();
        memory.write(100, 7).unwrap();
        assert!(memory.cache().lines().iter().all(|line| !line.valid));
        assert_eq!(memory.read(100), Ok(7));
        assert_eq!(memory.cache().stats().misses, 1);
    }

    #[test]
    fn test_out_of_range_skips_cache() {
        let mut memory = manager();
        assert_eq!(
            memory.read(4096),
            Err(error::Type::InvalidAddress { address: 4096, size: 4096 })
        );
        assert!(memory.write(4096, 1).is_err());
        assert_eq!(memory.cache().stats(), Stats::default());
    }

    #[test]
    fn test_partial_last_block() {
        let mut memory = MemoryManager::new(10, 2, 4).unwrap();
        memory.write(9, 3).unwrap();
        assert_eq!(memory.read(9), Ok(3));
        assert_eq!(memory.cache().lines()[0].data, vec![0, 3, 0, 0]);
    }

    #[test]
    fn test_load_refreshes_cached_lines() {
        let mut memory = manager();
        memory.read(0).unwrap();
        memory.load(&[5, 6], 0).unwrap();
        assert_eq!(memory.read(1), Ok(6));
    }
}
