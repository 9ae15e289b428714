use anyhow::Result;
use meagerdb::{AbortHook, Db, MdbConfig, OsRandomSource};

#[test]
fn three_hundred_byte_value_spans_two_pages() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("multipage.mdb");
    let cfg = MdbConfig::default(); // 256-byte pages, per the worked example

    Db::create(&path, b"pw", &cfg, &OsRandomSource, &AbortHook)?;

    let value = vec![0x42u8; 300];
    let rowid = {
        let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;
        db.insert(2, &value)?
    };

    let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;
    db.select_by_rowid(2, rowid)?;
    let page = db.get_page()?;
    assert!(page >= 2);
    assert_eq!(db.get_page_count()?, 2, "300-byte value at 256-byte page size must span exactly 2 pages");

    let len = db.get_value(None, 0)?;
    assert_eq!(len, 300);
    let mut buf = vec![0u8; 300];
    db.get_value(Some(&mut buf), len)?;
    assert_eq!(buf, value);

    Ok(())
}
