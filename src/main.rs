//! # Command Line Interface
//!
//! The command tree is in `cli.rs`, which is shared with the build script.
//! The subcommands are run by the `commands` module.

mod cli;

use env_logger;
use ti99kit::commands;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let matches = cli::build_cli().get_matches();

    match matches.subcommand() {
        Some(("mkdsk",cmd)) => commands::mkdsk::mkdsk(cmd),
        Some(("catalog",cmd)) => commands::modify::catalog(cmd),
        Some(("put",cmd)) => commands::put::put(cmd),
        Some(("get",cmd)) => commands::get::get(cmd),
        Some(("delete",cmd)) => commands::modify::delete(cmd),
        Some(("retype",cmd)) => commands::modify::retype(cmd),
        Some(("lock",cmd)) => commands::modify::lock(cmd),
        Some(("unlock",cmd)) => commands::modify::unlock(cmd),
        Some(("volume",cmd)) => commands::modify::volume(cmd),
        _ => {
            eprintln!("No subcommand was found, try `ti99kit --help`");
            Err(Box::new(commands::CommandError::InvalidCommand))
        }
    }
}
