//! ### Directory index
//!
//! Sector 1 is a table of 128 FIB sector numbers kept in ascending order of file name.
//! Empty slots are zero and only appear after the last file.
//! The index does not store names, so operations that need them take a lookup function
//! that reads the name out of the FIB at a given sector.

use binrw::{BinRead,BinWrite};
use log::debug;
use std::io::Cursor;
use super::types::*;
use crate::DYNERR;

#[derive(BinRead,BinWrite,Debug,Clone)]
#[brw(big)]
pub struct DirectoryIndex {
    pub entries: [u16;MAX_FILES]
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self {
            entries: [0;MAX_FILES]
        }
    }
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        Ok(Self::read(&mut Cursor::new(dat))?)
    }
    pub fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        let mut curs = Cursor::new(Vec::new());
        self.write(&mut curs)?;
        Ok(curs.into_inner())
    }
    /// FIB sectors of every occupied slot, in slot order
    pub fn fib_sectors(&self) -> Vec<usize> {
        self.entries.iter().filter(|e| **e != 0).map(|e| *e as usize).collect()
    }
    pub fn is_full(&self) -> bool {
        self.entries[MAX_FILES-1] != 0
    }
    /// Scan every slot for a FIB whose name matches exactly
    pub fn find<F>(&self,name: &FileName,lookup: F) -> Result<Option<usize>,DYNERR>
    where F: Fn(usize) -> Result<FileName,DYNERR> {
        for sec in self.fib_sectors() {
            if lookup(sec)? == *name {
                return Ok(Some(sec));
            }
        }
        Ok(None)
    }
    /// Put `fib_sec` in front of the first entry whose name sorts after `name`,
    /// or in the first empty slot, shifting the rest toward the tail.
    pub fn insert<F>(&mut self,name: &FileName,fib_sec: usize,lookup: F) -> Result<(),DYNERR>
    where F: Fn(usize) -> Result<FileName,DYNERR> {
        if self.is_full() {
            return Err(Box::new(Error::DirectoryFull));
        }
        let mut slot = MAX_FILES-1;
        for i in 0..MAX_FILES {
            if self.entries[i]==0 || lookup(self.entries[i] as usize)? > *name {
                slot = i;
                break;
            }
        }
        debug!("directory slot {} for {}",slot,name);
        for j in (slot+1..MAX_FILES).rev() {
            self.entries[j] = self.entries[j-1];
        }
        self.entries[slot] = fib_sec as u16;
        Ok(())
    }
    /// Take out the slot holding `fib_sec`, shifting the rest toward the head.
    pub fn remove(&mut self,fib_sec: usize) -> Result<(),Error> {
        let slot = match self.entries.iter().position(|e| *e as usize == fib_sec && fib_sec != 0) {
            Some(i) => i,
            None => return Err(Error::NotFound)
        };
        debug!("directory slot {} removed",slot);
        for j in slot..MAX_FILES-1 {
            self.entries[j] = self.entries[j+1];
        }
        self.entries[MAX_FILES-1] = 0;
        Ok(())
    }
}
