//! Program memory.
//!
//! Operand access grows memory on demand; instruction fetch never does.

use crate::error::{VmError, VmResult};

/// The VM address space: a zero-indexed, growable vector of words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<i64>,
}

impl Memory {
    /// Copies `program` into a fresh address space.
    pub fn new(program: &[i64]) -> Self {
        Self {
            cells: program.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    /// Peek at a word without growing memory.
    #[inline]
    pub fn get(&self, addr: usize) -> Option<i64> {
        self.cells.get(addr).copied()
    }

    /// Instruction fetch: hard bounds check, no growth.
    #[inline]
    pub fn fetch(&self, addr: usize) -> VmResult<i64> {
        self.get(addr).ok_or(VmError::OutOfBoundsFetch {
            addr: addr as i64,
            len: self.cells.len(),
        })
    }

    /// Operand read. Addresses past the end are zero-filled first.
    pub fn load(&mut self, addr: usize) -> VmResult<i64> {
        self.ensure(addr)?;
        Ok(self.cells[addr])
    }

    /// Operand write. Addresses past the end are zero-filled first.
    pub fn store(&mut self, addr: usize, val: i64) -> VmResult<()> {
        self.ensure(addr)?;
        self.cells[addr] = val;
        Ok(())
    }

    /// Grows to cover `addr`, reporting an allocation failure instead of aborting.
    fn ensure(&mut self, addr: usize) -> VmResult<()> {
        if addr < self.cells.len() {
            return Ok(());
        }
        let new_len = addr
            .checked_add(1)
            .ok_or(VmError::MemoryExhausted { addr })?;
        self.cells
            .try_reserve_exact(new_len - self.cells.len())
            .map_err(|_| VmError::MemoryExhausted { addr })?;
        self.cells.resize(new_len, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_does_not_grow() {
        let mem = Memory::new(&[1, 2, 3]);
        assert!(matches!(
            mem.fetch(3),
            Err(VmError::OutOfBoundsFetch { addr: 3, len: 3 })
        ));
        assert_eq!(mem.len(), 3);
    }

    #[test]
    fn test_store_grows_with_zeros() {
        let mut mem = Memory::new(&[7, 8]);
        mem.store(5, 42).unwrap();
        assert_eq!(mem.as_slice(), &[7, 8, 0, 0, 0, 42]);
    }

    #[test]
    fn test_load_grows_inclusive() {
        let mut mem = Memory::new(&[]);
        assert_eq!(mem.load(2).unwrap(), 0);
        assert_eq!(mem.len(), 3);
    }

    #[test]
    fn test_copy_semantics() {
        let program = vec![1, 2, 3];
        let mut mem = Memory::new(&program);
        mem.store(0, 99).unwrap();
        assert_eq!(program, vec![1, 2, 3]);
        assert_eq!(mem.get(0), Some(99));
    }

    #[test]
    fn test_unallocatable_address_is_an_error() {
        let mut mem = Memory::new(&[1, 2]);
        assert!(matches!(
            mem.store(1 << 60, 5),
            Err(VmError::MemoryExhausted { addr }) if addr == 1 << 60
        ));
        assert!(matches!(
            mem.load(usize::MAX),
            Err(VmError::MemoryExhausted { .. })
        ));
        assert_eq!(mem.as_slice(), &[1, 2]);
    }
}
