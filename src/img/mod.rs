//! # Disk Image Module
//!
//! Disk images are represented by objects implementing the `DiskImage` trait.
//! The object type is named for the disk image type that it handles, e.g., `V9t9`.
//!
//! ## Relation to File Systems
//!
//! The `DiskImage` trait object serves as the underlying storage for `fs` modules.
//! The `fs` modules work by reading sectors from, or writing sectors to, the disk image.
//! The image knows nothing about volume headers, directories, or files; it only
//! maps a sector number to a region of the buffer and refuses anything out of range.
//!
//! The whole buffer is the unit of persistence.  There is no incremental I/O, changes
//! become permanent only when the caller writes `to_bytes` somewhere.

pub mod v9t9;

use crate::DYNERR;

/// Errors pertaining to sector storage
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("image size did not match the request")]
    ImageSizeMismatch,
    #[error("unable to access sector")]
    SectorAccess
}

/// The main trait for working with any kind of disk image.
/// The corresponding trait object serves as storage for `fs::ti99::Disk`.
pub trait DiskImage {
    /// Number of whole sectors in the image
    fn sector_count(&self) -> usize;
    /// Size of the image in bytes, including any partial trailing sector
    fn byte_capacity(&self) -> usize;
    /// Get a copy of one sector
    fn read_sector(&self,sec: usize) -> Result<Vec<u8>,DYNERR>;
    /// Write into one sector.  If `dat` is shorter than a sector, only the leading
    /// bytes are replaced, the tail of the sector is left as it was.
    fn write_sector(&mut self,sec: usize,dat: &[u8]) -> Result<(),DYNERR>;
    /// Fill one sector with zeros
    fn zap_sector(&mut self,sec: usize) -> Result<(),DYNERR> {
        self.write_sector(sec,&[0;v9t9::SECTOR_SIZE])
    }
    /// Get the image as it would be saved to the host
    fn to_bytes(&self) -> Vec<u8>;
}
