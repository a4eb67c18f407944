// test of the TI file system working on whole images
use ti99kit::fs::ti99::{Disk,types::*};
use ti99kit::fs::ti99::cluster::Span;

const BITMAP_OFFSET: usize = 56;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 7 + i / 256) % 256) as u8).collect()
}

fn downcast(e: &Box<dyn std::error::Error>) -> Option<&Error> {
    e.downcast_ref::<Error>()
}

fn sorted_names(disk: &Disk) -> Vec<String> {
    disk.file_names().expect("directory").iter().map(|n| n.to_string()).collect()
}

#[test]
fn blank_image() {
    let disk = Disk::create().expect("create");
    assert_eq!(disk.free_count(),358);
    let cat = disk.list().expect("list");
    assert_eq!(cat.disk_name,"");
    assert_eq!(cat.sectors,360);
    assert_eq!(cat.cylinders,40);
    assert_eq!(cat.heads,1);
    assert!(!cat.protected);
    assert!(cat.files.is_empty());
}

#[test]
fn round_trip_single_span() {
    for len in [0,1,255,256,257,256*MAX_SPANS] {
        let mut disk = Disk::create().expect("create");
        let name = FileName::new("round");
        let dat = pattern(len);
        disk.add(&name,&dat).expect("add");
        // reload so nothing cached can help
        let disk = Disk::from_bytes(&disk.to_bytes()).expect("reload");
        assert_eq!(disk.read_file(&name).expect("read"),dat,"length {}",len);
        let fib = disk.find(&name).expect("find").expect("missing");
        assert_eq!(fib.byte_len(),len);
        assert!(fib.spans().len() <= 1);
    }
}

#[test]
fn extract_to_host() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut disk = Disk::create().expect("create");
    let dat = pattern(1000);
    disk.add(&FileName::new("prog"),&dat).expect("add");
    let dest = dir.path().join("prog.bin");
    disk.extract(&FileName::new("PROG"),&dest).expect("extract");
    assert_eq!(std::fs::read(&dest).expect("read back"),dat);
}

#[test]
fn extract_all_names() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut disk = Disk::create().expect("create");
    disk.add(&FileName::new("a/b"),&pattern(10)).expect("add");
    disk.add(&FileName::new("load"),&pattern(300)).expect("add");
    disk.extract_all(dir.path()).expect("extract all");
    assert_eq!(std::fs::read(dir.path().join("A_B")).expect("A_B"),pattern(10));
    assert_eq!(std::fs::read(dir.path().join("LOAD")).expect("LOAD"),pattern(300));
}

#[test]
fn add_remove_inverse() {
    let mut disk = Disk::create().expect("create");
    disk.add(&FileName::new("keep"),&pattern(512)).expect("add");
    let before = disk.free_count();
    let name = FileName::new("temp");
    disk.add(&name,&pattern(5000)).expect("add");
    assert_eq!(disk.free_count(),before - 21);
    disk.remove(&name).expect("remove");
    assert_eq!(disk.free_count(),before);
    assert!(disk.find(&name).expect("find").is_none());
    assert_eq!(sorted_names(&disk),vec!["KEEP"]);
    match disk.remove(&name) {
        Err(e) => assert!(matches!(downcast(&e),Some(Error::NotFound))),
        Ok(()) => panic!("second remove should fail")
    }
}

#[test]
fn duplicate_name() {
    let mut disk = Disk::create().expect("create");
    disk.add(&FileName::new("same"),&pattern(10)).expect("add");
    let before = disk.free_count();
    match disk.add(&FileName::new("SAME"),&pattern(10)) {
        Err(e) => assert!(matches!(downcast(&e),Some(Error::AlreadyExists))),
        Ok(()) => panic!("duplicate was accepted")
    }
    assert_eq!(disk.free_count(),before);
}

#[test]
fn listing_order() {
    let mut disk = Disk::create().expect("create");
    for name in ["B","A","C"] {
        disk.add(&FileName::new(name),&pattern(100)).expect("add");
    }
    let cat = disk.list().expect("list");
    let names: Vec<&str> = cat.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names,vec!["A","B","C"]);
    assert!(cat.files.iter().all(|f| f.organization==Organization::Program));
}

#[test]
fn directory_stays_sorted() {
    let mut disk = Disk::create().expect("create");
    for name in ["m","d","x","a","q","b"] {
        disk.add(&FileName::new(name),&pattern(20)).expect("add");
    }
    disk.remove(&FileName::new("d")).expect("remove");
    disk.remove(&FileName::new("x")).expect("remove");
    disk.add(&FileName::new("c"),&pattern(20)).expect("add");
    assert_eq!(sorted_names(&disk),vec!["A","B","C","M","Q"]);
    // no gaps before the unused tail
    let buf = disk.to_bytes();
    let entries: Vec<u16> = buf[256..512].chunks(2).map(|c| u16::from_be_bytes([c[0],c[1]])).collect();
    assert!(entries[0..5].iter().all(|e| *e != 0));
    assert!(entries[5..].iter().all(|e| *e == 0));
}

#[test]
fn directory_full() {
    let mut disk = Disk::create().expect("create");
    for i in 0..MAX_FILES {
        disk.add(&FileName::new(&format!("F{:03}",i)),&[]).expect("add");
    }
    let before = disk.free_count();
    match disk.add(&FileName::new("ONEMORE"),&[]) {
        Err(e) => assert!(matches!(downcast(&e),Some(Error::DirectoryFull))),
        Ok(()) => panic!("directory overflowed")
    }
    assert_eq!(disk.free_count(),before);
}

#[test]
fn full_disk() {
    let mut disk = Disk::create().expect("create");
    let before = disk.free_count();
    match disk.add(&FileName::new("huge"),&pattern(before * 256 + 1)) {
        Err(e) => assert!(matches!(downcast(&e),Some(Error::DiskFull))),
        Ok(()) => panic!("file should not fit")
    }
    assert_eq!(disk.free_count(),before);
    // largest file that fits leaves the disk with nothing free
    disk.add(&FileName::new("fits"),&pattern((before-1) * 256)).expect("add");
    assert_eq!(disk.free_count(),0);
}

#[test]
fn forced_fragmentation_fails() {
    let mut buf = Disk::create().expect("create").to_bytes();
    // mark every odd sector from 3 up as used
    for sec in (3..360).step_by(2) {
        buf[BITMAP_OFFSET + sec/8] |= 1 << (sec%8);
    }
    let mut disk = Disk::from_bytes(&buf).expect("load");
    assert_eq!(disk.free_count(),179);
    match disk.add(&FileName::new("frag"),&pattern(100*256)) {
        Err(e) => assert!(matches!(downcast(&e),Some(Error::TooFragmented))),
        Ok(()) => panic!("file should be too fragmented")
    }
    assert!(disk.find(&FileName::new("frag")).expect("find").is_none());
    // no rollback: FIB and 77 data sectors stay allocated
    assert_eq!(disk.free_count(),179 - 78);
}

#[test]
fn reclassify_fixed_80() {
    let mut disk = Disk::create().expect("create");
    let name = FileName::new("records");
    disk.add(&name,&pattern(2000)).expect("add");
    disk.apply_attributes(&name,&Attributes::from_type("dis/fix",Some(80)).expect("type")).expect("attributes");
    let fib = disk.find(&name).expect("find").expect("missing");
    assert_eq!(fib.reclen,80);
    assert_eq!(fib.recs_per_physrec,3);
    assert_eq!(fib.fixrecs,(8*256/80) as u16);
    assert_eq!(fib.spans(),vec![Span { first: 3, count: 8 }]);
    // data is untouched
    assert_eq!(disk.read_file(&name).expect("read"),pattern(2000));
    let cat = disk.list().expect("list");
    assert_eq!(cat.files[0].organization.to_string(),"dis/fix 80");
}

#[test]
fn lock_and_unlock() {
    let mut disk = Disk::create().expect("create");
    let name = FileName::new("guarded");
    disk.add(&name,&pattern(50)).expect("add");
    disk.lock(&name).expect("lock");
    assert!(disk.list().expect("list").files[0].write_protect);
    disk.unlock(&name).expect("unlock");
    assert!(!disk.list().expect("list").files[0].write_protect);
    match disk.lock(&FileName::new("absent")) {
        Err(e) => assert!(matches!(downcast(&e),Some(Error::NotFound))),
        Ok(()) => panic!("absent file was locked")
    }
}

#[test]
fn larger_geometry_loads() {
    // 720 sector double sided image made by hand
    let mut buf = Disk::create().expect("create").to_bytes();
    buf.resize(720*256,0);
    buf[10..12].copy_from_slice(&720u16.to_be_bytes());
    buf[18] = 2;
    let mut disk = Disk::from_bytes(&buf).expect("load");
    // the bitmap still marks everything past sector 360 as used
    for i in 45..90 {
        assert_eq!(buf[BITMAP_OFFSET+i],0xff);
    }
    assert_eq!(disk.free_count(),358);
    let cat = disk.list().expect("list");
    assert_eq!(cat.sectors,720);
    assert_eq!(cat.heads,2);
    disk.add(&FileName::new("x"),&pattern(10)).expect("add");
    assert_eq!(disk.to_bytes().len(),720*256);
}

#[test]
fn tiny_file_is_not_a_disk() {
    match ti99kit::create_fs_from_bytestream(&[0;100]) {
        Err(e) => assert!(matches!(downcast(&e),Some(Error::BadMagic))),
        Ok(_) => panic!("100 zero bytes were accepted")
    }
}
