//! ## Support for V9T9 sector dumps
//!
//! A V9T9 image is nothing more than the disk's sectors laid end to end, 256 bytes each,
//! starting from sector 0.  There is no header, the geometry lives in the volume header
//! that the file system keeps in sector 0.

use log::{trace,warn};
use super::DiskImage;
use crate::DYNERR;

pub const SECTOR_SIZE: usize = 256;

pub fn file_extensions() -> Vec<String> {
    vec!["dsk".to_string(),"v9t9".to_string()]
}

/// Flat sector dump used as storage by the TI file system.
pub struct V9t9 {
    data: Vec<u8>
}

impl V9t9 {
    /// Create a zero-filled image with the given number of sectors
    pub fn create(sectors: usize) -> Self {
        Self {
            data: vec![0;sectors*SECTOR_SIZE]
        }
    }
    /// Take the buffer as it was read from the host.  Lengths that are not a multiple of the
    /// sector size are accepted, the trailing bytes are carried along untouched.
    /// Buffers too small to hold the volume header and directory are refused.
    pub fn from_bytes(data: &[u8]) -> Result<Self,DYNERR> {
        if data.len() < 2*SECTOR_SIZE {
            warn!("image has only {} bytes",data.len());
            return Err(Box::new(super::Error::ImageSizeMismatch));
        }
        if data.len() % SECTOR_SIZE != 0 {
            warn!("image length {} is not a multiple of {}",data.len(),SECTOR_SIZE);
        }
        Ok(Self {
            data: data.to_vec()
        })
    }
    fn range(&self,sec: usize) -> Result<std::ops::Range<usize>,DYNERR> {
        if sec >= self.sector_count() {
            warn!("sector {} is beyond the end of the image",sec);
            return Err(Box::new(super::Error::SectorAccess));
        }
        Ok(sec*SECTOR_SIZE..(sec+1)*SECTOR_SIZE)
    }
}

impl DiskImage for V9t9 {
    fn sector_count(&self) -> usize {
        self.data.len() / SECTOR_SIZE
    }
    fn byte_capacity(&self) -> usize {
        self.data.len()
    }
    fn read_sector(&self,sec: usize) -> Result<Vec<u8>,DYNERR> {
        trace!("read sector {}",sec);
        let rng = self.range(sec)?;
        Ok(self.data[rng].to_vec())
    }
    fn write_sector(&mut self,sec: usize,dat: &[u8]) -> Result<(),DYNERR> {
        trace!("write sector {}",sec);
        if dat.len() > SECTOR_SIZE {
            return Err(Box::new(super::Error::SectorAccess));
        }
        let rng = self.range(sec)?;
        self.data[rng.start..rng.start+dat.len()].copy_from_slice(dat);
        Ok(())
    }
    fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }
}

#[test]
fn sector_bounds() {
    let mut img = V9t9::create(4);
    assert_eq!(img.sector_count(),4);
    assert!(img.read_sector(3).is_ok());
    assert!(img.read_sector(4).is_err());
    assert!(img.write_sector(4,&[1]).is_err());
    assert!(img.write_sector(0,&[0;257]).is_err());
}

#[test]
fn partial_write_keeps_tail() {
    let mut img = V9t9::create(3);
    img.write_sector(2,&[0xaa;SECTOR_SIZE]).expect("write failed");
    img.write_sector(2,&[0x55;10]).expect("write failed");
    let sec = img.read_sector(2).expect("read failed");
    assert_eq!(sec[0..10],[0x55;10]);
    assert_eq!(sec[10..],[0xaa;SECTOR_SIZE-10]);
}

#[test]
fn odd_length_is_preserved() {
    let buf = vec![7;2*SECTOR_SIZE+5];
    let img = V9t9::from_bytes(&buf).expect("could not load");
    assert_eq!(img.sector_count(),2);
    assert_eq!(img.byte_capacity(),2*SECTOR_SIZE+5);
    assert_eq!(img.to_bytes(),buf);
    assert!(V9t9::from_bytes(&[0;300]).is_err());
}
