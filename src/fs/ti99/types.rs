use num_derive::FromPrimitive;
use std::str::FromStr;
use std::fmt;
use serde::Serialize;

pub const SECTOR_SIZE: usize = 256;
/// sectors in a newly created single sided single density disk
pub const NEW_DISK_SECTORS: usize = 360;
pub const NEW_DISK_SECS_PER_TRACK: u8 = 9;
pub const NEW_DISK_TRACKS: u8 = 40;
pub const VIB_SECTOR: usize = 0;
pub const DIRECTORY_SECTOR: usize = 1;
/// first sector available to the allocator
pub const FIRST_DATA_SECTOR: usize = 2;
pub const FORMAT_TAG: [u8;3] = *b"DSK";
pub const PROTECTED: u8 = b'P';
pub const NAME_LEN: usize = 10;
pub const MAX_FILES: usize = 128;
pub const MAX_SPANS: usize = 76;
/// largest value either 12 bit field of a cluster span can hold
pub const MAX_SPAN_FIELD: usize = 0xfff;
/// bytes in the allocation bitmap stored in the volume header
pub const BITMAP_BYTES: usize = 200;
pub const MAX_RECORD_LEN: u8 = 254;
/// record length that is always written for variable length files
pub const VAR_RECORD_LEN: u8 = 254;

pub const FLAG_PROGRAM: u8 = 0x01;
pub const FLAG_BINARY: u8 = 0x02;
pub const FLAG_WRITE_PROTECT: u8 = 0x08;
pub const FLAG_VARIABLE: u8 = 0x80;

/// Enumerates TI disk errors.  The `Display` trait gives the message shown to the user.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("not a V9T9 disk image")]
    BadMagic,
    #[error("disk full")]
    DiskFull,
    #[error("file already exists")]
    AlreadyExists,
    #[error("file not found")]
    NotFound,
    #[error("directory full")]
    DirectoryFull,
    #[error("file too fragmented")]
    TooFragmented,
    #[error("range error")]
    Range
}

/// Density class stored in the volume header
#[derive(FromPrimitive,Debug,Clone,Copy,PartialEq)]
pub enum Density {
    SingleFM = 1,
    DoubleMFM = 2,
    HighMFM = 3
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleFM => write!(f,"FM SD"),
            Self::DoubleMFM => write!(f,"MFM DD"),
            Self::HighMFM => write!(f,"MFM HD")
        }
    }
}

/// A 10 character name as it is stored on disk, upper case and space padded.
/// Ordering is the byte ordering of the padded name, which is the directory order.
#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Debug)]
pub struct FileName([u8;NAME_LEN]);

impl FileName {
    /// Normalize a host string: upper case, `.` and space become `_`, truncate or pad with spaces.
    pub fn new(s: &str) -> Self {
        let mut ans = [b' ';NAME_LEN];
        for (i,c) in s.bytes().take(NAME_LEN).enumerate() {
            ans[i] = match c.to_ascii_uppercase() {
                b'.' | b' ' => b'_',
                x => x
            };
        }
        Self(ans)
    }
    pub fn from_raw(raw: [u8;NAME_LEN]) -> Self {
        Self(raw)
    }
    pub fn raw(&self) -> [u8;NAME_LEN] {
        self.0
    }
    /// Name suitable for the host file system, trailing spaces removed and `/` replaced.
    pub fn host_name(&self) -> String {
        self.to_string().replace('/',"_")
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",String::from_utf8_lossy(&self.0).trim_end())
    }
}

#[derive(Clone,Copy,PartialEq,Debug,Serialize)]
pub enum Encoding {
    /// ASCII data, `DISPLAY` in TI BASIC
    Display,
    /// binary data, `INTERNAL` in TI BASIC
    Internal
}

/// Record layout, the value is the record length for fixed files, or the maximum record length for variable files.
#[derive(Clone,Copy,PartialEq,Debug,Serialize)]
pub enum Layout {
    Fixed(u8),
    Variable(u8)
}

/// How the file is organized, as recorded in the FIB flags
#[derive(Clone,Copy,PartialEq,Debug,Serialize)]
pub enum Organization {
    Program,
    Data {
        encoding: Encoding,
        layout: Layout
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program => write!(f,"program"),
            Self::Data { encoding, layout } => {
                let enc = match encoding {
                    Encoding::Display => "dis",
                    Encoding::Internal => "int"
                };
                let (lay,len) = match layout {
                    Layout::Fixed(l) => ("fix",l),
                    Layout::Variable(l) => ("var",l)
                };
                write!(f,"{}/{} {}",enc,lay,len)
            }
        }
    }
}

/// Requested changes to a file's organization and protection.
/// Fields that are `None` or `false` leave the corresponding part of the FIB alone.
#[derive(Clone,Copy,PartialEq,Debug,Default)]
pub struct Attributes {
    pub program: bool,
    pub encoding: Option<Encoding>,
    pub layout: Option<Layout>,
    pub write_protect: Option<bool>
}

impl Attributes {
    pub fn program() -> Self {
        Self { program: true, ..Default::default() }
    }
    pub fn protect(wp: bool) -> Self {
        Self { write_protect: Some(wp), ..Default::default() }
    }
    /// Parse a type mnemonic, `len` is needed for any type that names a record layout.
    /// Mnemonics are `prog`, `dis`, `int`, `fix`, `var`, or `dis/fix` etc.
    pub fn from_type(typ: &str,len: Option<u8>) -> Result<Self,Error> {
        let mut ans = Self::default();
        let layout = |fixed: bool| -> Result<Layout,Error> {
            match len {
                Some(l) if l>0 && l<=MAX_RECORD_LEN => Ok(match fixed {
                    true => Layout::Fixed(l),
                    false => Layout::Variable(l)
                }),
                _ => Err(Error::Range)
            }
        };
        if typ=="prog" {
            ans.program = true;
            return Ok(ans);
        }
        for part in typ.split('/') {
            match part {
                "dis" if ans.encoding.is_none() => ans.encoding = Some(Encoding::Display),
                "int" if ans.encoding.is_none() => ans.encoding = Some(Encoding::Internal),
                "fix" if ans.layout.is_none() => ans.layout = Some(layout(true)?),
                "var" if ans.layout.is_none() => ans.layout = Some(layout(false)?),
                _ => return Err(Error::Range)
            }
        }
        Ok(ans)
    }
    /// true if nothing would be changed
    pub fn is_empty(&self) -> bool {
        !self.program && self.encoding.is_none() && self.layout.is_none() && self.write_protect.is_none()
    }
}

impl FromStr for Attributes {
    type Err = Error;
    /// Parse a type that needs no record length
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        Self::from_type(s,None)
    }
}

#[test]
fn name_normalization() {
    assert_eq!(FileName::new("hello.txt").raw(),*b"HELLO_TXT ");
    assert_eq!(FileName::new("my file").raw(),*b"MY_FILE   ");
    assert_eq!(FileName::new("averylongfilename").raw(),*b"AVERYLONGF");
    assert_eq!(FileName::new("").raw(),[b' ';10]);
    assert_eq!(FileName::new("a/b").host_name(),"A_B");
    assert!(FileName::new("A") < FileName::new("AB"));
}

#[test]
fn type_mnemonics() {
    assert_eq!(Attributes::from_type("prog",None).expect("parse"),Attributes::program());
    let attr = Attributes::from_type("int/fix",Some(80)).expect("parse");
    assert_eq!(attr.encoding,Some(Encoding::Internal));
    assert_eq!(attr.layout,Some(Layout::Fixed(80)));
    let attr = Attributes::from_str("dis").expect("parse");
    assert_eq!(attr.layout,None);
    assert!(Attributes::from_type("fix",None).is_err());
    assert!(Attributes::from_type("var",Some(0)).is_err());
    assert!(Attributes::from_type("var",Some(255)).is_err());
    assert!(Attributes::from_type("dis/int",None).is_err());
    assert!(Attributes::from_type("bin",None).is_err());
}
