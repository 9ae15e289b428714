use anyhow::Result;
use meagerdb::{AbortHook, Db, MdbConfig, OsRandomSource};

#[test]
fn empty_database_walk_returns_end_immediately() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("empty.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"hunter2", &cfg, &OsRandomSource, &AbortHook)?;

    let mut db = Db::open(&path, b"hunter2", &cfg, Box::new(AbortHook))?;
    assert!(!db.walk(0, true)?, "empty database must report end-of-table on the first walk");

    Ok(())
}
