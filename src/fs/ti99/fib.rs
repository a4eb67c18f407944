//! ### File Information Block
//!
//! Every file has one FIB sector holding its name, organization, sizes, and the cluster table
//! that locates its data.  Multi-byte fields are big endian.

use binrw::{BinRead,BinWrite};
use log::debug;
use std::io::Cursor;
use super::types::*;
use super::cluster::{self,Span};
use crate::DYNERR;

#[derive(BinRead,BinWrite,Debug,Clone)]
#[brw(big)]
pub struct Fib {
    pub name: [u8;NAME_LEN],
    reserved: [u8;2],
    pub flags: u8,
    pub recs_per_physrec: u8,
    /// sectors of data plus one
    pub physrecs: u16,
    /// bytes used in the last sector
    pub eof: u8,
    pub reclen: u8,
    pub fixrecs: u16,
    reserved2: [u8;8],
    pub clusters: [[u8;3];MAX_SPANS]
}

impl Fib {
    /// Blank FIB for a program file
    pub fn new(name: &FileName) -> Self {
        Self {
            name: name.raw(),
            reserved: [0;2],
            flags: FLAG_PROGRAM,
            recs_per_physrec: 0,
            physrecs: 0,
            eof: 0,
            reclen: 0,
            fixrecs: 0,
            reserved2: [0;8],
            clusters: [[0;3];MAX_SPANS]
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
    pub fn file_name(&self) -> FileName {
        FileName::from_raw(self.name)
    }
    /// Record where the data lives and how long it is.
    pub fn set_data(&mut self,spans: &[Span],total_bytes: usize) -> Result<(),Error> {
        let physrecs = total_bytes / SECTOR_SIZE + 1;
        if physrecs > u16::MAX as usize {
            return Err(Error::Range);
        }
        self.clusters = cluster::pack_table(spans)?;
        self.physrecs = physrecs as u16;
        self.eof = (total_bytes % SECTOR_SIZE) as u8;
        Ok(())
    }
    pub fn spans(&self) -> Vec<Span> {
        cluster::unpack_table(&self.clusters)
    }
    /// Length of the file in bytes, the inverse of `set_data`
    pub fn byte_len(&self) -> usize {
        (self.physrecs as usize).saturating_sub(1) * SECTOR_SIZE + self.eof as usize
    }
    pub fn is_protected(&self) -> bool {
        self.flags & FLAG_WRITE_PROTECT != 0
    }
    pub fn organization(&self) -> Organization {
        if self.flags & FLAG_PROGRAM != 0 {
            return Organization::Program;
        }
        Organization::Data {
            encoding: match self.flags & FLAG_BINARY {
                0 => Encoding::Display,
                _ => Encoding::Internal
            },
            layout: match self.flags & FLAG_VARIABLE {
                0 => Layout::Fixed(self.reclen),
                _ => Layout::Variable(self.reclen)
            }
        }
    }
    /// Change organization and protection.  Program and data organizations exclude each other,
    /// as do the two encodings and the two layouts.  A layout change recomputes the record
    /// fields from the cluster table already in place.
    pub fn apply_attributes(&mut self,attr: &Attributes) {
        match attr.write_protect {
            Some(true) => self.flags |= FLAG_WRITE_PROTECT,
            Some(false) => self.flags &= !FLAG_WRITE_PROTECT,
            None => {}
        }
        match attr.encoding {
            Some(Encoding::Internal) => self.flags |= FLAG_BINARY,
            Some(Encoding::Display) => self.flags &= !FLAG_BINARY,
            None => {}
        }
        match attr.layout {
            Some(Layout::Variable(_)) => self.flags |= FLAG_VARIABLE,
            Some(Layout::Fixed(_)) => self.flags &= !FLAG_VARIABLE,
            None => {}
        }
        if attr.program {
            self.flags |= FLAG_PROGRAM;
            self.flags &= !(FLAG_BINARY | FLAG_VARIABLE);
            self.reclen = 0;
        }
        if attr.encoding.is_none() && attr.layout.is_none() {
            return;
        }
        self.flags &= !FLAG_PROGRAM;
        let spans = self.spans();
        let sector_count: usize = spans.iter().map(|s| s.count as usize).sum();
        let sector_max = spans.last().map_or(0,|s| s.end());
        match attr.layout {
            Some(Layout::Variable(max)) => {
                if max != VAR_RECORD_LEN {
                    debug!("variable record length {} stored as {}",max,VAR_RECORD_LEN);
                }
                self.reclen = VAR_RECORD_LEN;
                self.recs_per_physrec = VAR_RECORD_LEN / self.reclen;
                self.fixrecs = sector_max.min(u16::MAX as usize) as u16;
            },
            Some(Layout::Fixed(len)) => {
                let len = len.max(1) as usize;
                self.reclen = len as u8;
                self.recs_per_physrec = (SECTOR_SIZE / len).min(u8::MAX as usize) as u8;
                self.fixrecs = (sector_count * SECTOR_SIZE / len).min(u16::MAX as usize) as u16;
            },
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_fib(spans: &[Span],len: usize) -> Fib {
        let mut fib = Fib::new(&FileName::new("test"));
        fib.set_data(spans,len).expect("set data");
        fib
    }

    #[test]
    fn layout() {
        let fib = data_fib(&[Span { first: 0x123, count: 2 }],300);
        let buf = fib.to_bytes().expect("serialize");
        assert_eq!(buf.len(),SECTOR_SIZE);
        assert_eq!(buf[0..10],*b"TEST      ");
        assert_eq!(buf[12],FLAG_PROGRAM);
        assert_eq!(buf[14..16],[0,2]);
        assert_eq!(buf[16],44);
        assert_eq!(buf[28..31],[0x23,0x21,0x00]);
        assert_eq!(Fib::from_bytes(&buf).expect("parse").byte_len(),300);
    }

    #[test]
    fn sizes() {
        assert_eq!(data_fib(&[],0).byte_len(),0);
        assert_eq!(data_fib(&[],0).physrecs,1);
        let fib = data_fib(&[Span { first: 2, count: 1 }],256);
        assert_eq!((fib.physrecs,fib.eof),(2,0));
        let fib = data_fib(&[Span { first: 2, count: 2 }],257);
        assert_eq!((fib.physrecs,fib.eof),(2,1));
        assert_eq!(fib.byte_len(),257);
    }

    #[test]
    fn fixed_80() {
        let mut fib = data_fib(&[Span { first: 3, count: 4 },Span { first: 10, count: 2 }],1500);
        fib.apply_attributes(&Attributes::from_type("dis/fix",Some(80)).expect("parse"));
        assert_eq!(fib.organization().to_string(),"dis/fix 80");
        assert_eq!(fib.reclen,80);
        assert_eq!(fib.recs_per_physrec,3);
        assert_eq!(fib.fixrecs,6*256/80);
    }

    #[test]
    fn variable() {
        let mut fib = data_fib(&[Span { first: 3, count: 4 },Span { first: 10, count: 2 }],1500);
        fib.apply_attributes(&Attributes::from_type("int/var",Some(80)).expect("parse"));
        assert_eq!(fib.organization().to_string(),"int/var 254");
        assert_eq!(fib.recs_per_physrec,1);
        assert_eq!(fib.fixrecs,12);
    }

    #[test]
    fn back_to_program() {
        let mut fib = data_fib(&[Span { first: 3, count: 4 }],1000);
        fib.apply_attributes(&Attributes::from_type("int/var",Some(80)).expect("parse"));
        fib.apply_attributes(&Attributes::protect(true));
        fib.apply_attributes(&Attributes::program());
        assert_eq!(fib.organization(),Organization::Program);
        assert_eq!(fib.reclen,0);
        assert_eq!(fib.flags,FLAG_PROGRAM | FLAG_WRITE_PROTECT);
        fib.apply_attributes(&Attributes::protect(false));
        assert!(!fib.is_protected());
    }

    #[test]
    fn encoding_only() {
        let mut fib = data_fib(&[Span { first: 3, count: 1 }],10);
        fib.apply_attributes(&Attributes::from_type("int",None).expect("parse"));
        assert_eq!(fib.flags,FLAG_BINARY);
        fib.apply_attributes(&Attributes::from_type("dis",None).expect("parse"));
        assert_eq!(fib.flags,0);
    }
}
