use anyhow::Result;
use meagerdb::{AbortHook, Db, MdbConfig, OsRandomSource};

#[test]
fn insert_survives_close_and_reopen() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("roundtrip.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"s3cret", &cfg, &OsRandomSource, &AbortHook)?;

    let rowid = {
        let mut db = Db::open(&path, b"s3cret", &cfg, Box::new(AbortHook))?;
        db.insert(1, b"hello")?
    };
    assert_eq!(rowid, 1);

    let mut db = Db::open(&path, b"s3cret", &cfg, Box::new(AbortHook))?;
    db.select_by_rowid(1, rowid)?;
    let len = db.get_value(None, 0)?;
    let mut buf = vec![0u8; len as usize];
    db.get_value(Some(&mut buf), len)?;
    assert_eq!(&buf, b"hello");

    Ok(())
}
