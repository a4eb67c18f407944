//! # `ti99kit` main library
//!
//! This library manipulates TI-99/4A floppy disk images in the V9T9 sector dump format.
//! A caller can create a blank image, list its contents, and add, remove, or extract files,
//! while the allocation bitmap, directory order, and per-file cluster tables stay consistent.
//!
//! ## Architecture
//!
//! Disk image operations are built around two layers:
//! * `img::DiskImage` maps sector numbers onto the image buffer, does not try to interpret a file system
//! * `fs::ti99::Disk` imposes the TI file system on the sectors
//!
//! When a `Disk` object is created it takes ownership of some `DiskImage`.
//! It then uses this owned image as storage.  Any changes are not permanent until the
//! image is saved to whatever file system is hosting ti99kit.
//!
//! ## File System
//!
//! The TI disk controller format has a volume header in sector 0, a sorted directory index
//! in sector 1, and one file information block (FIB) per file.  See `fs::ti99`.
//!
//! ## Command Line
//!
//! The `commands` module holds the run driver used by the `ti99kit` binary.  It takes an
//! explicit list of operations and applies them to one image.

pub mod fs;
pub mod img;
pub mod commands;

use std::path::Path;
use log::{warn,info};
use fs::ti99;

pub type DYNERR = Box<dyn std::error::Error>;
pub type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Save the image file (make changes permanent)
pub fn save_img(disk: &mut ti99::Disk,img_path: &str) -> STDRESULT {
    std::fs::write(img_path,disk.get_img().to_bytes())?;
    Ok(())
}

/// Given a bytestream return the file system, or Err if the bytestream cannot be interpreted.
/// The file system takes ownership of the disk image.
pub fn create_fs_from_bytestream(disk_img_data: &[u8]) -> Result<ti99::Disk,DYNERR> {
    if !ti99::vib::buffer_is_tagged(disk_img_data) {
        warn!("cannot match the TI file system");
        return Err(Box::new(ti99::types::Error::BadMagic));
    }
    info!("identified TI file system");
    ti99::Disk::from_bytes(disk_img_data)
}

/// Calls `create_fs_from_bytestream` getting the bytes from a file.
pub fn create_fs_from_file(img_path: &str) -> Result<ti99::Disk,DYNERR> {
    let ext = Path::new(img_path).extension().map(|x| x.to_string_lossy().to_lowercase());
    match ext {
        Some(x) if !img::v9t9::file_extensions().contains(&x) => info!("unexpected extension {}",x),
        _ => {}
    }
    match std::fs::read(img_path) {
        Ok(disk_img_data) => create_fs_from_bytestream(&disk_img_data),
        Err(e) => Err(Box::new(e))
    }
}
