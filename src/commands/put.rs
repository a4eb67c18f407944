use clap;
use log::error;
use crate::STDRESULT;
use super::CommandError;
use super::batch::{self,Action,FileOperation,ImageOptions};

const RCH: &str = "unreachable was reached";

pub fn put(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let files: Vec<&String> = cmd.get_many::<String>("names").expect(RCH).collect();
    let output = cmd.get_one::<String>("output");
    if output.is_some() && files.len() > 1 {
        error!("`--output` can only be used with one file");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut attributes = super::get_attributes(cmd)?;
    if cmd.get_flag("lock") {
        attributes.write_protect = Some(true);
    }
    let ops: Vec<FileOperation> = files.iter().map(|f| {
        FileOperation::new(f,Some(Action::Add))
            .with_output(output)
            .with_attributes(attributes)
    }).collect();
    let opts = ImageOptions {
        path: path_to_img.to_string(),
        create: cmd.get_flag("create"),
        ..Default::default()
    };
    batch::run(&opts,&ops)
}
