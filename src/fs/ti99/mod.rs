//! # TI-99/4A file system module
//! This manipulates V9T9 disk images holding one TI disk controller volume.
//!
//! * Sector 0 is the VIB, with the allocation bitmap
//! * Sector 1 is the directory index, FIB sectors sorted by file name
//! * Every file is a FIB sector plus data sectors located by the FIB's cluster table
//!
//! New disks are always single sided single density, 360 sectors.  Existing images of
//! other sizes can be loaded, the sector count is taken from the buffer length.
//!
//! Nothing is checked on load beyond the format tag.  A damaged bitmap or directory
//! will be used as found.  Operations that fail part way (a full disk in the middle of
//! `add`) leave the sectors allocated so far in place, the VIB is still written so the
//! image stays self-consistent as far as the bitmap is concerned.

pub mod types;
pub mod vib;
mod bitmap;
pub mod cluster;
pub mod directory;
pub mod fib;
pub mod display;

use log::{debug,info,error};
use std::path::Path;

use types::*;
use vib::Vib;
use fib::Fib;
use directory::DirectoryIndex;
use cluster::SpanBuilder;
use display::{Catalog,CatalogEntry};
use crate::img;
use crate::{DYNERR,STDRESULT};

/// The primary interface for disk operations.
pub struct Disk {
    vib: Vib,
    img: Box<dyn img::DiskImage>
}

impl Disk {
    /// Blank single sided single density disk, 360 sectors, no name, not protected.
    pub fn create() -> Result<Self,DYNERR> {
        let img = img::v9t9::V9t9::create(NEW_DISK_SECTORS);
        let mut ans = Self {
            vib: Vib::new(),
            img: Box::new(img)
        };
        ans.flush_vib()?;
        Ok(ans)
    }
    /// Create a disk file system using the given image as storage.
    /// The file system takes ownership of the image.
    pub fn from_img(img: Box<dyn img::DiskImage>) -> Result<Self,DYNERR> {
        let vib = Vib::from_bytes(&img.read_sector(VIB_SECTOR)?)?;
        if !vib.is_tagged() {
            error!("format tag is {:?}",String::from_utf8_lossy(&vib.tag));
            return Err(Box::new(Error::BadMagic));
        }
        if vib.physrecs as usize != img.sector_count() {
            debug!("VIB says {} sectors, image has {}",vib.physrecs,img.sector_count());
        }
        Ok(Self {
            vib,
            img
        })
    }
    /// Load from a buffer read from the host.  The format tag is checked before the size,
    /// so any short buffer without the tag is refused as not being a disk image.
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        if !vib::buffer_is_tagged(dat) {
            error!("format tag not found in {} byte buffer",dat.len());
            return Err(Box::new(Error::BadMagic));
        }
        let img = img::v9t9::V9t9::from_bytes(dat)?;
        Self::from_img(Box::new(img))
    }
    pub fn get_img(&mut self) -> &mut Box<dyn img::DiskImage> {
        &mut self.img
    }
    /// The whole image as it should be saved
    pub fn to_bytes(&self) -> Vec<u8> {
        self.img.to_bytes()
    }
    fn total_sectors(&self) -> usize {
        self.img.sector_count()
    }
    fn flush_vib(&mut self) -> STDRESULT {
        let dat = self.vib.to_bytes()?;
        self.img.write_sector(VIB_SECTOR,&dat)
    }
    fn read_dir(&self) -> Result<DirectoryIndex,DYNERR> {
        DirectoryIndex::from_bytes(&self.img.read_sector(DIRECTORY_SECTOR)?)
    }
    fn write_dir(&mut self,dir: &DirectoryIndex) -> STDRESULT {
        let dat = dir.to_bytes()?;
        self.img.write_sector(DIRECTORY_SECTOR,&dat)
    }
    fn read_fib(&self,sec: usize) -> Result<Fib,DYNERR> {
        Fib::from_bytes(&self.img.read_sector(sec)?)
    }
    fn write_fib(&mut self,sec: usize,fib: &Fib) -> STDRESULT {
        let dat = fib.to_bytes()?;
        self.img.write_sector(sec,&dat)
    }
    fn name_at(&self,sec: usize) -> Result<FileName,DYNERR> {
        Ok(self.read_fib(sec)?.file_name())
    }
    /// sector of the FIB for `name`, if it exists
    fn locate(&self,name: &FileName) -> Result<Option<usize>,DYNERR> {
        self.read_dir()?.find(name,|sec| self.name_at(sec))
    }
    fn locate_or_fail(&self,name: &FileName) -> Result<usize,DYNERR> {
        match self.locate(name)? {
            Some(sec) => Ok(sec),
            None => {
                debug!("{} is not in the directory",name);
                Err(Box::new(Error::NotFound))
            }
        }
    }
    pub fn free_count(&self) -> usize {
        self.vib.free_count(self.total_sectors())
    }
    pub fn find(&self,name: &FileName) -> Result<Option<Fib>,DYNERR> {
        match self.locate(name)? {
            Some(sec) => Ok(Some(self.read_fib(sec)?)),
            None => Ok(None)
        }
    }
    /// Names in directory order
    pub fn file_names(&self) -> Result<Vec<FileName>,DYNERR> {
        let mut ans = Vec::new();
        for sec in self.read_dir()?.fib_sectors() {
            ans.push(self.name_at(sec)?);
        }
        Ok(ans)
    }
    /// Add a file as a program.  Use `apply_attributes` afterwards to make it a data file.
    pub fn add(&mut self,name: &FileName,dat: &[u8]) -> STDRESULT {
        info!("adding {} ({} bytes)",name,dat.len());
        if self.locate(name)?.is_some() {
            return Err(Box::new(Error::AlreadyExists));
        }
        let dir = self.read_dir()?;
        if dir.is_full() {
            return Err(Box::new(Error::DirectoryFull));
        }
        let needed = dat.len().div_ceil(SECTOR_SIZE) + 1;
        if self.free_count() < needed {
            debug!("need {} sectors, have {}",needed,self.free_count());
            return Err(Box::new(Error::DiskFull));
        }
        let res = self.write_new_file(name,dat,dir);
        // the bitmap goes out even on failure, sectors already taken stay taken
        self.flush_vib()?;
        res
    }
    fn write_new_file(&mut self,name: &FileName,dat: &[u8],mut dir: DirectoryIndex) -> STDRESULT {
        let total = self.total_sectors();
        let fib_sec = match self.vib.allocate(total) {
            Some(sec) => sec,
            None => return Err(Box::new(Error::DiskFull))
        };
        let mut fib = Fib::new(name);
        let mut spans = SpanBuilder::new();
        for chunk in dat.chunks(SECTOR_SIZE) {
            let sec = match self.vib.allocate(total) {
                Some(sec) => sec,
                None => return Err(Box::new(Error::DiskFull))
            };
            spans.push(sec)?;
            self.img.write_sector(sec,chunk)?;
        }
        let spans = spans.finish();
        debug!("{} uses FIB {} and {} spans",name,fib_sec,spans.len());
        fib.set_data(&spans,dat.len())?;
        self.write_fib(fib_sec,&fib)?;
        dir.insert(name,fib_sec,|sec| self.name_at(sec))?;
        self.write_dir(&dir)
    }
    /// Free the data sectors and the FIB, zeroing each, then drop the directory entry.
    /// Nothing is changed if any span runs past the end of the image.
    pub fn remove(&mut self,name: &FileName) -> STDRESULT {
        info!("removing {}",name);
        let fib_sec = self.locate_or_fail(name)?;
        let fib = self.read_fib(fib_sec)?;
        let total = self.total_sectors();
        if let Some(span) = fib.spans().iter().find(|s| s.end() > total) {
            error!("{} has span {}+{} beyond sector {}",name,span.first,span.count,total);
            return Err(Box::new(Error::Range));
        }
        for span in fib.spans() {
            for sec in span.first as usize..span.end() {
                self.img.zap_sector(sec)?;
                self.vib.mark(sec,false);
            }
        }
        self.img.zap_sector(fib_sec)?;
        self.vib.mark(fib_sec,false);
        let mut dir = self.read_dir()?;
        dir.remove(fib_sec)?;
        self.write_dir(&dir)?;
        self.flush_vib()
    }
    /// Gather the data of a file.  Each span is read through its count plus one sectors,
    /// stopping as soon as the file length is reached.
    pub fn read_fib_data(&self,fib: &Fib) -> Result<Vec<u8>,DYNERR> {
        let mut remaining = fib.byte_len();
        let mut ans = Vec::with_capacity(remaining);
        for span in fib.spans() {
            for sec in span.first as usize..=span.end() {
                if remaining==0 {
                    break;
                }
                let buf = self.img.read_sector(sec)?;
                let n = remaining.min(SECTOR_SIZE);
                ans.extend_from_slice(&buf[0..n]);
                remaining -= n;
            }
        }
        if remaining > 0 {
            debug!("cluster table ended {} bytes short",remaining);
        }
        Ok(ans)
    }
    pub fn read_file(&self,name: &FileName) -> Result<Vec<u8>,DYNERR> {
        let fib = self.read_fib(self.locate_or_fail(name)?)?;
        self.read_fib_data(&fib)
    }
    /// Write a file's data to the host
    pub fn extract(&self,name: &FileName,dest: &Path) -> STDRESULT {
        info!("extracting {} to {}",name,dest.display());
        let dat = self.read_file(name)?;
        std::fs::write(dest,dat)?;
        Ok(())
    }
    /// Write every file to `dir` using the disk name with trailing spaces removed and `/` replaced.
    /// A failure is logged and the rest of the files are still written.
    pub fn extract_all(&self,dir: &Path) -> STDRESULT {
        let mut ans: STDRESULT = Ok(());
        for name in self.file_names()? {
            let dest = dir.join(name.host_name());
            if let Err(e) = self.extract(&name,&dest) {
                error!("could not extract {}: {}",name,e);
                ans = Err(e);
            }
        }
        ans
    }
    pub fn apply_attributes(&mut self,name: &FileName,attr: &Attributes) -> STDRESULT {
        let fib_sec = self.locate_or_fail(name)?;
        let mut fib = self.read_fib(fib_sec)?;
        fib.apply_attributes(attr);
        info!("{} is {}{}",name,fib.organization(),match fib.is_protected() { true => ", protected", false => "" });
        self.write_fib(fib_sec,&fib)
    }
    pub fn lock(&mut self,name: &FileName) -> STDRESULT {
        self.apply_attributes(name,&Attributes::protect(true))
    }
    pub fn unlock(&mut self,name: &FileName) -> STDRESULT {
        self.apply_attributes(name,&Attributes::protect(false))
    }
    pub fn set_disk_name(&mut self,name: &str) -> STDRESULT {
        let name = FileName::new(name);
        info!("disk name {}",name);
        self.vib.name = name.raw();
        self.flush_vib()
    }
    pub fn set_protection(&mut self,protect: bool) -> STDRESULT {
        info!("{} disk protection",match protect { true => "setting", false => "clearing" });
        self.vib.protection = match protect {
            true => PROTECTED,
            false => 0
        };
        self.flush_vib()
    }
    /// Build the listing report
    pub fn list(&self) -> Result<Catalog,DYNERR> {
        let mut files = Vec::new();
        for sec in self.read_dir()?.fib_sectors() {
            let fib = self.read_fib(sec)?;
            files.push(CatalogEntry {
                name: fib.file_name().to_string(),
                organization: fib.organization(),
                write_protect: fib.is_protected(),
                size: fib.byte_len(),
                spans: fib.spans()
            });
        }
        Ok(Catalog {
            disk_name: self.vib.disk_name().to_string(),
            sectors: self.vib.physrecs as usize,
            size: self.vib.physrecs as usize * SECTOR_SIZE,
            protected: self.vib.is_protected(),
            cylinders: self.vib.tracks,
            heads: self.vib.heads,
            density: match self.vib.density_class() {
                Some(d) => d.to_string(),
                None => "Unknown".to_string()
            },
            free_sectors: self.free_count(),
            files
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn blank_disk() {
        let disk = Disk::create().expect("create");
        let buf = disk.to_bytes();
        assert_eq!(buf.len(),NEW_DISK_SECTORS*SECTOR_SIZE);
        assert_eq!(disk.free_count(),358);
        assert_eq!(buf[256..512],[0;256]);
        assert!(Disk::from_bytes(&buf).is_ok());
    }

    #[test]
    fn bad_magic() {
        let mut buf = Disk::create().expect("create").to_bytes();
        buf[13] = b'X';
        match Disk::from_bytes(&buf) {
            Err(e) => assert!(matches!(e.downcast_ref::<Error>(),Some(Error::BadMagic))),
            Ok(_) => panic!("tag was not checked")
        }
    }

    #[test]
    fn layout_of_first_file() {
        let mut disk = Disk::create().expect("create");
        disk.add(&FileName::new("hello"),&pattern(600)).expect("add");
        let fib = disk.find(&FileName::new("HELLO")).expect("find").expect("missing");
        // FIB takes sector 2, data follows
        assert_eq!(fib.spans(),vec![cluster::Span { first: 3, count: 3 }]);
        assert_eq!(disk.read_dir().expect("dir").entries[0],2);
        assert_eq!(disk.free_count(),354);
    }

    #[test]
    fn forced_fragmentation() {
        let mut disk = Disk::create().expect("create");
        // every other sector taken from 3 up
        for sec in (3..NEW_DISK_SECTORS).step_by(2) {
            disk.vib.mark(sec,true);
        }
        let free_before = disk.free_count();
        let res = disk.add(&FileName::new("big"),&pattern(100*SECTOR_SIZE));
        match res {
            Err(e) => assert!(matches!(e.downcast_ref::<Error>(),Some(Error::TooFragmented))),
            Ok(()) => panic!("add should fail")
        }
        assert!(disk.find(&FileName::new("big")).expect("find").is_none());
        // sectors taken before the failure are not given back
        assert!(disk.free_count() < free_before);
    }

    #[test]
    fn many_spans_fit() {
        let mut disk = Disk::create().expect("create");
        for sec in (3..NEW_DISK_SECTORS).step_by(2) {
            disk.vib.mark(sec,true);
        }
        // FIB lands on 2, data on 4,6,8,...
        disk.add(&FileName::new("frag"),&pattern(MAX_SPANS*SECTOR_SIZE)).expect("add");
        let fib = disk.find(&FileName::new("frag")).expect("find").expect("missing");
        assert_eq!(fib.spans().len(),MAX_SPANS);
        assert_eq!(fib.byte_len(),MAX_SPANS*SECTOR_SIZE);
    }

    #[test]
    fn remove_zeroes_sectors() {
        let mut disk = Disk::create().expect("create");
        disk.add(&FileName::new("a"),&[0xff;700]).expect("add");
        disk.remove(&FileName::new("a")).expect("remove");
        let buf = disk.to_bytes();
        assert!(buf[2*SECTOR_SIZE..].iter().all(|b| *b==0));
        assert_eq!(disk.free_count(),358);
    }

    #[test]
    fn short_buffers() {
        match Disk::from_bytes(&[0;100]) {
            Err(e) => assert!(matches!(e.downcast_ref::<Error>(),Some(Error::BadMagic))),
            Ok(_) => panic!("untagged buffer was loaded")
        }
        match Disk::from_bytes(&[0;5]) {
            Err(e) => assert_eq!(e.to_string(),"not a V9T9 disk image"),
            Ok(_) => panic!("5 byte buffer was loaded")
        }
        // tagged but too small to hold the directory
        let mut buf = vec![0;100];
        buf[13..16].copy_from_slice(b"DSK");
        match Disk::from_bytes(&buf) {
            Err(e) => assert!(matches!(e.downcast_ref::<img::Error>(),Some(img::Error::ImageSizeMismatch))),
            Ok(_) => panic!("short buffer was loaded")
        }
    }

    #[test]
    fn remove_leaves_bad_file_alone() {
        let mut disk = Disk::create().expect("create");
        let name = FileName::new("broken");
        disk.add(&name,&[0x5a;600]).expect("add");
        let fib_sec = disk.locate_or_fail(&name).expect("locate");
        let mut fib = disk.read_fib(fib_sec).expect("read FIB");
        // second span runs off the end of a 360 sector image
        fib.clusters[1] = cluster::encode(350,20);
        disk.write_fib(fib_sec,&fib).expect("write FIB");
        let free_before = disk.free_count();
        match disk.remove(&name) {
            Err(e) => assert!(matches!(e.downcast_ref::<Error>(),Some(Error::Range))),
            Ok(()) => panic!("remove should fail")
        }
        assert_eq!(disk.free_count(),free_before);
        assert!(disk.find(&name).expect("find").is_some());
        assert!(disk.vib.is_used(fib_sec));
        assert_eq!(disk.to_bytes()[3*SECTOR_SIZE],0x5a);
    }

    #[test]
    fn disk_name_and_protection() {
        let mut disk = Disk::create().expect("create");
        disk.set_disk_name("my.disk").expect("name");
        disk.set_protection(true).expect("protect");
        let cat = Disk::from_bytes(&disk.to_bytes()).expect("load").list().expect("list");
        assert_eq!(cat.disk_name,"MY_DISK");
        assert!(cat.protected);
        assert_eq!(cat.density,"FM SD");
        assert_eq!(cat.size,92160);
        disk.set_protection(false).expect("unprotect");
        assert!(!disk.list().expect("list").protected);
    }
}
