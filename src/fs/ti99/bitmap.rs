//! ### Allocation bitmap
//!
//! One bit per sector, set means allocated.  The table lives in the VIB, so these are methods on `Vib`.
//! Sectors that fall outside the 200 byte table read as allocated and are never handed out.

use log::{debug,trace};
use super::types::*;
use super::vib::Vib;

impl Vib {
    pub fn is_used(&self,sec: usize) -> bool {
        match self.abm.get(sec/8) {
            Some(byte) => byte & (1 << (sec%8)) != 0,
            None => true
        }
    }
    /// Set or clear the bit for `sec`, ignored if the sector is outside the table.
    pub fn mark(&mut self,sec: usize,used: bool) {
        trace!("mark sector {} {}",sec,match used { true => "used", false => "free" });
        if let Some(byte) = self.abm.get_mut(sec/8) {
            match used {
                true => *byte |= 1 << (sec%8),
                false => *byte &= !(1 << (sec%8))
            }
        }
    }
    /// First fit scan from sector 2 up to `total`.  The sector found is marked used.
    pub fn allocate(&mut self,total: usize) -> Option<usize> {
        for sec in FIRST_DATA_SECTOR..total {
            if !self.is_used(sec) {
                self.mark(sec,true);
                debug!("allocate sector {}",sec);
                return Some(sec);
            }
        }
        debug!("no free sectors");
        None
    }
    /// Count of free sectors in the range [2,total)
    pub fn free_count(&self,total: usize) -> usize {
        (FIRST_DATA_SECTOR..total).filter(|sec| !self.is_used(*sec)).count()
    }
}
