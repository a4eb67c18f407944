//! ### Listing report
//!
//! `Catalog` is what `Disk::list` returns.  It prints as the familiar table
//! and serializes to JSON for other tools.

use serde::Serialize;
use std::fmt;
use super::types::*;
use super::cluster::Span;

#[derive(Serialize,Debug,Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub organization: Organization,
    pub write_protect: bool,
    /// size in bytes
    pub size: usize,
    pub spans: Vec<Span>
}

#[derive(Serialize,Debug,Clone)]
pub struct Catalog {
    pub disk_name: String,
    pub sectors: usize,
    /// size in bytes
    pub size: usize,
    pub protected: bool,
    pub cylinders: u8,
    pub heads: u8,
    pub density: String,
    pub free_sectors: usize,
    pub files: Vec<CatalogEntry>
}

impl Catalog {
    pub fn to_json(&self,indent: Option<u16>) -> Result<String,serde_json::Error> {
        match indent {
            Some(spaces) => {
                let ind = vec![b' ';spaces as usize];
                let fmt = serde_json::ser::PrettyFormatter::with_indent(&ind);
                let mut buf = Vec::new();
                let mut ser = serde_json::Serializer::with_formatter(&mut buf,fmt);
                self.serialize(&mut ser)?;
                Ok(String::from_utf8_lossy(&buf).to_string())
            },
            None => serde_json::to_string(self)
        }
    }
}

/// Runs longer than 2 sectors show as `first-(first+count)`, others as the first sector.
/// The upper bound is the same one `Disk::read_fib_data` reads through.
fn span_str(span: &Span) -> String {
    match span.count {
        c if c > 2 => format!("{}-{}",span.first,span.end()),
        _ => format!("{}",span.first)
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f,"Disk Name : {}",self.disk_name)?;
        writeln!(f,"Disk Size : {}",self.size)?;
        writeln!(f,"Protected?: {}",match self.protected { true => "Yes", false => "No" })?;
        writeln!(f,"Cylinders : {}",self.cylinders)?;
        writeln!(f,"Heads     : {}",self.heads)?;
        writeln!(f,"Density   : {}",self.density)?;
        writeln!(f,"Free      : {} sectors",self.free_sectors)?;
        writeln!(f)?;
        writeln!(f,"Name        Type         WP  Size   Sectors")?;
        writeln!(f,"----------  -----------  --  -----  ------")?;
        for entry in &self.files {
            let spans: Vec<String> = entry.spans.iter().map(span_str).collect();
            writeln!(f,"{:<10}  {:<11}  {:<2}  {:>5}  {}",
                entry.name,
                entry.organization.to_string(),
                match entry.write_protect { true => "wp", false => "" },
                entry.size,
                spans.join("  ")
            )?;
        }
        Ok(())
    }
}

#[test]
fn table_rows() {
    let cat = Catalog {
        disk_name: "WORK".to_string(),
        sectors: 360,
        size: 92160,
        protected: false,
        cylinders: 40,
        heads: 1,
        density: Density::SingleFM.to_string(),
        free_sectors: 350,
        files: vec![
            CatalogEntry {
                name: "HELLO".to_string(),
                organization: Organization::Program,
                write_protect: true,
                size: 1000,
                spans: vec![Span { first: 3, count: 4 }]
            },
            CatalogEntry {
                name: "DATA".to_string(),
                organization: Organization::Data { encoding: Encoding::Display, layout: Layout::Fixed(80) },
                write_protect: false,
                size: 300,
                spans: vec![Span { first: 7, count: 2 },Span { first: 20, count: 1 }]
            }
        ]
    };
    let txt = cat.to_string();
    assert!(txt.contains("Disk Size : 92160\n"));
    assert!(txt.contains("Density   : FM SD\n"));
    assert!(txt.contains("HELLO       program      wp   1000  3-7\n"));
    assert!(txt.contains("DATA        dis/fix 80         300  7  20\n"));
    assert_eq!(span_str(&Span { first: 30, count: 3 }),"30-33");
    assert_eq!(span_str(&Span { first: 30, count: 2 }),"30");
    let json = cat.to_json(None).expect("json");
    assert!(json.contains("\"disk_name\":\"WORK\""));
}
