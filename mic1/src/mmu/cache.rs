use crate::error::{self, Result};

/// One direct mapped line. A line holds a whole block and is replaced as a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub valid: bool,
    pub tag: usize,
    pub data: Vec<u16>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hits: u64,
    pub misses: u64,
}

/// Where an address lands in the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    index: usize,
    tag: usize,
    offset: usize,
}

/// Direct mapped cache with no dirty state. Writes go through to main memory, so eviction never
/// writes back.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Cache {
    lines: Vec<Line>,
    block_size: usize,
    stats: Stats,
}

impl Cache {
    pub fn new(num_lines: usize, block_size: usize) -> Result<Cache> {
        if num_lines == 0 || block_size == 0 {
            return Err(error::Type::InvalidConfig(format!(
                "cache needs at least one line and one word per block, got {} x {}",
                num_lines, block_size
            )));
        }
        let line = Line { valid: false, tag: 0, data: vec![0; block_size] };
        Ok(Cache {
            lines: vec![line; num_lines],
            block_size,
            stats: Stats::default(),
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    /// First address of the block containing `address`.
    pub fn block_base(&self, address: usize) -> usize {
        address - address % self.block_size
    }

    fn slot(&self, address: usize) -> Slot {
        Slot {
            offset: address % self.block_size,
            index: (address / self.block_size) % self.lines.len(),
            tag: address / (self.block_size * self.lines.len()),
        }
    }

    fn line_for(&self, address: usize) -> Option<(&Line, Slot)> {
        let slot = self.slot(address);
        let line = &self.lines[slot.index];
        if line.valid && line.tag == slot.tag {
            Some((line, slot))
        } else {
            None
        }
    }

    /// Looks up `address`, counting a hit or a miss.
    pub fn read(&mut self, address: usize) -> Option<u16> {
        let word = self.line_for(address).map(|(line, slot)| line.data[slot.offset]);
        match word {
            Some(word) => {
                self.stats.hits += 1;
                trace!(target: "cache", "Hit {:#06X} = {:#06X}", address, word);
            }
            None => {
                self.stats.misses += 1;
                trace!(target: "cache", "Miss {:#06X}", address);
            }
        }
        word
    }

    /// Fills the line mapped to `address` with `block`, evicting whatever was there.
    pub fn load_block(&mut self, address: usize, block: &[u16]) -> Result<()> {
        if block.len() != self.block_size {
            return Err(error::Type::InvalidBlock {
                expected: self.block_size,
                actual: block.len(),
            });
        }
        let slot = self.slot(address);
        let line = &mut self.lines[slot.index];
        if line.valid && line.tag != slot.tag {
            trace!(target: "cache", "Evicting tag {} from line {}", line.tag, slot.index);
        }
        line.valid = true;
        line.tag = slot.tag;
        line.data.copy_from_slice(block);
        Ok(())
    }

    /// Updates the cached copy of `address` if present. Returns whether it was.
    pub fn write_word(&mut self, address: usize, value: u16) -> bool {
        let slot = self.slot(address);
        let line = &mut self.lines[slot.index];
        if line.valid && line.tag == slot.tag {
            line.data[slot.offset] = value;
            true
        } else {
            false
        }
    }
}
