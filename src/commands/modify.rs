use clap;
use crate::STDRESULT;
use crate::fs::ti99::types::Attributes;
use super::batch::{self,Action,FileOperation,ImageOptions};

const RCH: &str = "unreachable was reached";

fn image_options(cmd: &clap::ArgMatches) -> ImageOptions {
    ImageOptions {
        path: cmd.get_one::<String>("dimg").expect(RCH).to_string(),
        ..Default::default()
    }
}

/// one operation per name, same action and attributes for all
fn file_operations(cmd: &clap::ArgMatches,action: Option<Action>,attributes: Attributes) -> Vec<FileOperation> {
    cmd.get_many::<String>("names").expect(RCH).map(|n| {
        FileOperation::new(n,action).with_attributes(attributes)
    }).collect()
}

pub fn delete(cmd: &clap::ArgMatches) -> STDRESULT {
    let ops = file_operations(cmd,Some(Action::Remove),Attributes::default());
    batch::run(&image_options(cmd),&ops)
}

pub fn retype(cmd: &clap::ArgMatches) -> STDRESULT {
    let attributes = super::get_attributes(cmd)?;
    let ops = file_operations(cmd,None,attributes);
    batch::run(&image_options(cmd),&ops)
}

pub fn lock(cmd: &clap::ArgMatches) -> STDRESULT {
    let ops = file_operations(cmd,None,Attributes::protect(true));
    batch::run(&image_options(cmd),&ops)
}

pub fn unlock(cmd: &clap::ArgMatches) -> STDRESULT {
    let ops = file_operations(cmd,None,Attributes::protect(false));
    batch::run(&image_options(cmd),&ops)
}

pub fn volume(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut opts = image_options(cmd);
    opts.disk_name = cmd.get_one::<String>("name").cloned();
    if cmd.get_flag("protect") {
        opts.protect = Some(true);
    }
    if cmd.get_flag("unprotect") {
        opts.protect = Some(false);
    }
    batch::run(&opts,&[])
}

pub fn catalog(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut opts = image_options(cmd);
    opts.list = match cmd.get_flag("json") {
        true => Some(batch::ListFormat::Json(cmd.get_one::<u16>("indent").copied())),
        false => Some(batch::ListFormat::Table)
    };
    batch::run(&opts,&[])
}
