use clap;
use log::error;
use std::path::PathBuf;
use crate::STDRESULT;
use super::CommandError;
use super::batch::{self,Action,FileOperation,ImageOptions};

const RCH: &str = "unreachable was reached";

pub fn get(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let output = cmd.get_one::<String>("output");
    if cmd.get_flag("all") {
        let dir = match output {
            Some(d) => PathBuf::from(d),
            None => PathBuf::from(".")
        };
        if !dir.is_dir() {
            error!("{} is not a directory",dir.display());
            return Err(Box::new(CommandError::FileNotFound));
        }
        let opts = ImageOptions {
            path: path_to_img.to_string(),
            extract_all: Some(dir),
            ..Default::default()
        };
        return batch::run(&opts,&[]);
    }
    let names: Vec<&String> = cmd.get_many::<String>("names").expect(RCH).collect();
    if output.is_some() && names.len() > 1 {
        error!("`--output` can only be used with one file");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let ops: Vec<FileOperation> = names.iter().map(|n| {
        FileOperation::new(n,Some(Action::Extract)).with_output(output)
    }).collect();
    let opts = ImageOptions {
        path: path_to_img.to_string(),
        ..Default::default()
    };
    batch::run(&opts,&ops)
}
