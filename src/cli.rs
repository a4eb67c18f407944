use clap::{value_parser, crate_version, Arg, ArgAction, ArgGroup, Command, ValueHint};

const TYPE_LONG_HELP: &str = "`prog` is a memory image program.
Data files combine an encoding, `dis` (ASCII) or `int` (binary), with a record layout,
`fix` (fixed length) or `var` (variable length), e.g. `dis/var`.
Either half can be given alone to change just that half of an existing file.
Layouts need a record length, see `--len`.";
const LEN_LONG_HELP: &str = "Record length in bytes, 1 to 254.
For fixed records this is the record size.
Variable length files are always written with a maximum of 254.";
const NAME_HELP: &str = "names are upper cased, `.` and space become `_`, and only 10 characters are kept";

const FILE_TYPES: [&str;9] = ["prog","dis","int","fix","var","dis/fix","dis/var","int/fix","int/var"];

fn dimg_arg() -> Arg {
    Arg::new("dimg").short('d').long("dimg").help("path to disk image itself")
        .value_name("PATH")
        .value_hint(ValueHint::FilePath)
        .required(true)
}

fn names_arg(help: &'static str, req: bool) -> Arg {
    Arg::new("names").value_name("NAMES").help(help)
        .num_args(1..)
        .required(req)
}

fn type_arg(req: bool) -> Arg {
    Arg::new("type").short('t').long("type").help("file organization")
        .value_name("TYPE")
        .value_parser(FILE_TYPES)
        .long_help(TYPE_LONG_HELP)
        .required(req)
}

fn len_arg() -> Arg {
    Arg::new("len").short('l').long("len").help("record length")
        .value_name("LENGTH")
        .value_parser(value_parser!(u8))
        .long_help(LEN_LONG_HELP)
        .required(false)
}

pub fn build_cli() -> Command {
    let long_help = "ti99kit is always invoked with exactly one of several subcommands.
Each subcommand loads (or creates) one V9T9 disk image, applies the changes,
and saves the image if anything changed.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
create image:          `ti99kit mkdsk -d work.dsk -n work`
list contents:         `ti99kit catalog -d work.dsk`
add a program:         `ti99kit put -d work.dsk game.bin`
add a data file:       `ti99kit put -d work.dsk -t dis/fix -l 80 -o notes notes.txt`
extract everything:    `ti99kit get -d work.dsk --all -o ./out`
write protect:         `ti99kit lock -d work.dsk GAME_BIN`";

    let mut main_cmd = Command::new("ti99kit")
        .about("Manipulates TI-99/4A disk images in V9T9 format.")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("mkdsk")
            .arg(dimg_arg().help("disk image path to create"))
            .arg(Arg::new("name").short('n').long("name").value_name("NAME").help("disk name").required(false))
            .arg(Arg::new("protect").long("protect").help("set disk protection").action(ArgAction::SetTrue))
            .about("write a blank 360 sector disk image to the given path")
            .after_help(NAME_HELP)
    );
    main_cmd = main_cmd.subcommand(
        Command::new("catalog")
            .arg(dimg_arg())
            .arg(Arg::new("json").long("json").help("write the listing as JSON").action(ArgAction::SetTrue))
            .arg(Arg::new("indent").long("indent").help("JSON indentation, omit to minify")
                .value_name("SPACES")
                .value_parser(value_parser!(u16).range(0..16))
                .requires("json")
                .required(false))
            .visible_alias("ls")
            .visible_alias("dir")
            .visible_alias("cat")
            .about("write disk image catalog to stdout")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("put")
            .arg(dimg_arg())
            .arg(names_arg("host files to add",true).value_hint(ValueHint::FilePath))
            .arg(type_arg(false))
            .arg(len_arg())
            .arg(Arg::new("output").short('o').long("output").value_name("NAME")
                .help("name on the disk, only with a single file").required(false))
            .arg(Arg::new("lock").long("lock").help("write protect the new files").action(ArgAction::SetTrue))
            .arg(Arg::new("create").long("create").help("start from a blank image").action(ArgAction::SetTrue))
            .about("copy host files into the disk image")
            .after_help(NAME_HELP)
    );
    main_cmd = main_cmd.subcommand(
        Command::new("get")
            .arg(dimg_arg())
            .arg(names_arg("files on the disk",false))
            .arg(Arg::new("output").short('o').long("output").value_name("PATH")
                .help("host path, or directory with `--all`")
                .value_hint(ValueHint::AnyPath)
                .required(false))
            .arg(Arg::new("all").long("all").help("extract every file").action(ArgAction::SetTrue))
            .group(ArgGroup::new("what").args(["names","all"]).required(true))
            .about("copy files out of the disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("delete")
            .arg(dimg_arg())
            .arg(names_arg("files on the disk",true))
            .visible_alias("del")
            .visible_alias("era")
            .about("delete files inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("retype")
            .arg(dimg_arg())
            .arg(names_arg("files on the disk",true))
            .arg(type_arg(true))
            .arg(len_arg())
            .about("change file organization inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("lock")
            .arg(dimg_arg())
            .arg(names_arg("files on the disk",true))
            .about("write protect files inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("unlock")
            .arg(dimg_arg())
            .arg(names_arg("files on the disk",true))
            .about("remove write protection from files inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("volume")
            .arg(dimg_arg())
            .arg(Arg::new("name").short('n').long("name").value_name("NAME").help("new disk name").required(false))
            .arg(Arg::new("protect").long("protect").help("set disk protection").action(ArgAction::SetTrue)
                .conflicts_with("unprotect"))
            .arg(Arg::new("unprotect").long("unprotect").help("clear disk protection").action(ArgAction::SetTrue))
            .group(ArgGroup::new("change").args(["name","protect","unprotect"]).multiple(true).required(true))
            .about("change disk name or protection")
            .after_help(NAME_HELP)
    );
    main_cmd
}
