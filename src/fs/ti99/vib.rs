//! ### Volume Information Block
//!
//! Sector 0 of every disk.  Holds the disk name, geometry, protection, and the allocation bitmap.
//! The structure is read and written with `binrw`, multi-byte fields are big endian.

use binrw::{BinRead,BinWrite};
use num_traits::FromPrimitive;
use std::io::Cursor;
use super::types::*;
use crate::DYNERR;

/// offset of the format tag in sector 0
pub const TAG_OFFSET: usize = 13;

/// Look for the format tag in a raw image buffer, false if the buffer is too short to hold it.
pub fn buffer_is_tagged(dat: &[u8]) -> bool {
    dat.get(TAG_OFFSET..TAG_OFFSET+FORMAT_TAG.len()) == Some(&FORMAT_TAG[..])
}

#[derive(BinRead,BinWrite,Debug,Clone)]
#[brw(big)]
pub struct Vib {
    pub name: [u8;NAME_LEN],
    /// total sectors on the disk
    pub physrecs: u16,
    pub secs_per_track: u8,
    pub tag: [u8;3],
    pub protection: u8,
    pub tracks: u8,
    pub heads: u8,
    pub density: u8,
    reserved: [u8;36],
    pub abm: [u8;BITMAP_BYTES]
}

impl Vib {
    /// Header of a blank single sided single density disk.  Every sector is free except 0 and 1.
    pub fn new() -> Self {
        let mut ans = Self {
            name: FileName::new("").raw(),
            physrecs: NEW_DISK_SECTORS as u16,
            secs_per_track: NEW_DISK_SECS_PER_TRACK,
            tag: FORMAT_TAG,
            protection: 0,
            tracks: NEW_DISK_TRACKS,
            heads: 1,
            density: Density::SingleFM as u8,
            reserved: [0;36],
            abm: [0xff;BITMAP_BYTES]
        };
        for sec in FIRST_DATA_SECTOR..NEW_DISK_SECTORS {
            ans.mark(sec,false);
        }
        ans
    }
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        Ok(Self::read(&mut Cursor::new(dat))?)
    }
    pub fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        let mut curs = Cursor::new(Vec::new());
        self.write(&mut curs)?;
        Ok(curs.into_inner())
    }
    pub fn is_tagged(&self) -> bool {
        self.tag == FORMAT_TAG
    }
    pub fn disk_name(&self) -> FileName {
        FileName::from_raw(self.name)
    }
    pub fn is_protected(&self) -> bool {
        self.protection == PROTECTED
    }
    pub fn density_class(&self) -> Option<Density> {
        Density::from_u8(self.density)
    }
}

#[test]
fn layout() {
    let vib = Vib::new();
    let buf = vib.to_bytes().expect("serialize");
    assert_eq!(buf.len(),SECTOR_SIZE);
    assert_eq!(buf[0..10],[b' ';10]);
    // sector count is big endian
    assert_eq!(buf[10..12],[0x01,0x68]);
    assert_eq!(buf[12],9);
    assert_eq!(buf[TAG_OFFSET..TAG_OFFSET+3],*b"DSK");
    assert!(buffer_is_tagged(&buf[0..16]));
    assert!(!buffer_is_tagged(&buf[0..15]));
    assert_eq!(buf[16],0);
    assert_eq!(buf[17..20],[40,1,1]);
    assert_eq!(buf[56],0x03);
    assert_eq!(buf[57..101],[0;44]);
    // sectors past 360 stay marked
    assert_eq!(buf[101..256],[0xff;155]);
    let copy = Vib::from_bytes(&buf).expect("parse");
    assert_eq!(copy.physrecs,360);
    assert!(copy.is_tagged());
}
