//! # File System Module
//!
//! File system modules handle interactions with directories and files.
//! At present there is one: `ti99`, the TI-99/4A disk controller format.
//!
//! The file system object takes ownership of some disk image, which it uses as storage.
//! Any changes are not permanent until the image is saved to the host.

pub mod ti99;
