//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.
//! Every subcommand is turned into an `ImageOptions` plus a list of `FileOperation`,
//! which `batch::run` applies to the image.

pub mod batch;
pub mod mkdsk;
pub mod put;
pub mod get;
pub mod modify;

use crate::fs::ti99::types::Attributes;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("File not found")]
    FileNotFound,
    #[error("{0} file operation(s) failed")]
    Incomplete(usize)
}

/// Parse `--type` and `--len` into attributes
fn get_attributes(cmd: &clap::ArgMatches) -> Result<Attributes,CommandError> {
    let len = cmd.get_one::<u8>("len").copied();
    match cmd.get_one::<String>("type") {
        Some(typ) => match Attributes::from_type(typ,len) {
            Ok(attr) => Ok(attr),
            Err(_) => {
                log::error!("type `{}` needs a record length from 1 to 254",typ);
                Err(CommandError::OutOfRange)
            }
        },
        None => Ok(Attributes::default())
    }
}
