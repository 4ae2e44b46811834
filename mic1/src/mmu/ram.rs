use crate::error::{self, Result};

/// Flat, word addressed main memory. Starts zeroed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct MainMemory {
    words: Vec<u16>,
}

impl MainMemory {
    pub fn new(size: usize) -> MainMemory {
        MainMemory { words: vec![0; size] }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn check_address(&self, address: usize) -> Result<()> {
        if address < self.words.len() {
            Ok(())
        } else {
            Err(error::Type::InvalidAddress {
                address,
                size: self.words.len(),
            })
        }
    }

    pub fn read(&self, address: usize) -> Result<u16> {
        self.check_address(address)?;
        Ok(self.words[address])
    }

    pub fn write(&mut self, address: usize, value: u16) -> Result<()> {
        self.check_address(address)?;
        self.words[address] = value;
        Ok(())
    }

    /// Reads `len` words starting at `start`. Words past the end of memory read as zero, so the
    /// last block stays fillable when the memory size is not a multiple of the block size.
    pub fn read_block(&self, start: usize, len: usize) -> Result<Vec<u16>> {
        self.check_address(start)?;
        let end = usize::min(start + len, self.words.len());
        let mut block = self.words[start..end].to_vec();
        block.resize(len, 0);
        Ok(block)
    }

    /// Copies `program` into memory starting at `start`.
    pub fn load(&mut self, program: &[u16], start: usize) -> Result<()> {
        let end = start.checked_add(program.len());
        match end {
            Some(end) if end <= self.words.len() => {
                self.words[start..end].copy_from_slice(program);
                Ok(())
            }
            _ => Err(error::Type::ProgramTooLarge {
                start,
                len: program.len(),
                size: self.words.len(),
            }),
        }
    }

    pub fn dump(&self, start: usize, len: usize) -> Result<&[u16]> {
        match start.checked_add(len) {
            Some(end) if end <= self.words.len() => Ok(&self.words[start..end]),
            _ => Err(error::Type::InvalidAddress {
                address: start.saturating_add(len).saturating_sub(1),
                size: self.words.len(),
            }),
        }
    }
}
