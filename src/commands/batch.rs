//! ## Run driver
//!
//! Applies a list of file operations to one image.  The order of events is fixed:
//! create or load, extract everything if asked, disk name, disk protection, then for each
//! file extract, remove, add, and attributes.  The image is saved only if something changed,
//! and the listing comes last so it shows the result.
//!
//! A failed file operation is logged and the run moves on to the next one.
//! Failing to load or save the image ends the run.

use log::{info,error};
use std::path::{Path,PathBuf};
use crate::fs::ti99::{self,types::{Attributes,FileName}};
use crate::STDRESULT;
use super::CommandError;

#[derive(Clone,Copy,PartialEq,Debug)]
pub enum ListFormat {
    Table,
    /// JSON, with indentation if given
    Json(Option<u16>)
}

/// What to do with the image as a whole
#[derive(Clone,PartialEq,Debug,Default)]
pub struct ImageOptions {
    pub path: String,
    /// start from a blank image instead of loading `path`
    pub create: bool,
    pub disk_name: Option<String>,
    pub protect: Option<bool>,
    /// directory to receive every file
    pub extract_all: Option<PathBuf>,
    pub list: Option<ListFormat>
}

#[derive(Clone,Copy,PartialEq,Debug)]
pub enum Action {
    Add,
    Remove,
    Extract
}

/// One file, with at most one of add, remove, extract, and any attribute changes.
#[derive(Clone,PartialEq,Debug)]
pub struct FileOperation {
    /// host path for add, disk name otherwise
    pub name: String,
    /// disk name for add, host path for extract
    pub output: Option<String>,
    pub action: Option<Action>,
    pub attributes: Attributes
}

impl FileOperation {
    pub fn new(name: &str,action: Option<Action>) -> Self {
        Self {
            name: name.to_string(),
            output: None,
            action,
            attributes: Attributes::default()
        }
    }
    pub fn with_output(mut self,output: Option<&String>) -> Self {
        self.output = output.cloned();
        self
    }
    pub fn with_attributes(mut self,attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
    /// Name the file has, or will have, on the disk
    fn disk_name(&self) -> FileName {
        match (self.action,&self.output) {
            (Some(Action::Add),Some(out)) => FileName::new(out),
            (Some(Action::Add),None) => {
                let host = Path::new(&self.name);
                match host.file_name() {
                    Some(s) => FileName::new(&s.to_string_lossy()),
                    None => FileName::new(&self.name)
                }
            },
            _ => FileName::new(&self.name)
        }
    }
}

/// Carry out one file operation, setting `modified` if the image changed.
fn run_one(disk: &mut ti99::Disk,op: &FileOperation,modified: &mut bool) -> STDRESULT {
    let name = op.disk_name();
    match op.action {
        Some(Action::Extract) => {
            let dest = match &op.output {
                Some(out) => out.to_string(),
                None => op.name.clone()
            };
            disk.extract(&name,Path::new(&dest))?;
        },
        Some(Action::Remove) => {
            disk.remove(&name)?;
            *modified = true;
        },
        Some(Action::Add) => {
            let dat = match std::fs::read(&op.name) {
                Ok(dat) => dat,
                Err(e) => {
                    error!("cannot read {}",op.name);
                    return Err(Box::new(e));
                }
            };
            disk.add(&name,&dat)?;
            *modified = true;
        },
        None => {}
    }
    if !op.attributes.is_empty() {
        disk.apply_attributes(&name,&op.attributes)?;
        *modified = true;
    }
    Ok(())
}

/// Run the operations against the image described by `opts`.
pub fn run(opts: &ImageOptions,ops: &[FileOperation]) -> STDRESULT {
    let mut modified = false;
    let mut failures = 0;
    let mut disk = match opts.create {
        true => {
            info!("creating new disk image {}",opts.path);
            modified = true;
            ti99::Disk::create()?
        },
        false => {
            info!("using disk image {}",opts.path);
            match crate::create_fs_from_file(&opts.path) {
                Ok(disk) => disk,
                Err(e) => {
                    error!("{}: {}",opts.path,e);
                    return Err(e);
                }
            }
        }
    };
    if let Some(dir) = &opts.extract_all {
        if disk.extract_all(dir).is_err() {
            failures += 1;
        }
    }
    if let Some(name) = &opts.disk_name {
        disk.set_disk_name(name)?;
        modified = true;
    }
    if let Some(protect) = opts.protect {
        disk.set_protection(protect)?;
        modified = true;
    }
    for op in ops {
        if let Err(e) = run_one(&mut disk,op,&mut modified) {
            error!("{}: {}",op.name,e);
            failures += 1;
        }
    }
    if modified {
        info!("saving disk image {}",opts.path);
        crate::save_img(&mut disk,&opts.path)?;
    }
    match opts.list {
        Some(ListFormat::Table) => print!("{}",disk.list()?),
        Some(ListFormat::Json(indent)) => println!("{}",disk.list()?.to_json(indent)?),
        None => {}
    }
    match failures {
        0 => Ok(()),
        n => Err(Box::new(CommandError::Incomplete(n)))
    }
}
