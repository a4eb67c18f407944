use clap;
use log::error;
use crate::STDRESULT;
use super::CommandError;
use super::batch::{self,ImageOptions};

const RCH: &str = "unreachable was reached";

pub fn mkdsk(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    if std::path::Path::new(path_to_img).exists() {
        error!("refusing to overwrite {}",path_to_img);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let opts = ImageOptions {
        path: path_to_img.to_string(),
        create: true,
        disk_name: cmd.get_one::<String>("name").cloned(),
        protect: cmd.get_flag("protect").then_some(true),
        ..Default::default()
    };
    batch::run(&opts,&[])
}
