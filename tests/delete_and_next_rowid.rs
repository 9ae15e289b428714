use anyhow::Result;
use meagerdb::{AbortHook, Db, MdbConfig, OsRandomSource};

#[test]
fn delete_leaves_walk_order_intact_and_advances_next_rowid() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("delete.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"pw", &cfg, &OsRandomSource, &AbortHook)?;
    let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;

    let r1 = db.insert(1, b"one")?;
    let r2 = db.insert(1, b"two")?;
    let r3 = db.insert(1, b"three")?;
    assert_eq!((r1, r2, r3), (1, 2, 3));

    db.select_by_rowid(1, r2)?;
    db.delete()?;

    let mut seen = Vec::new();
    let mut restart = true;
    loop {
        if !db.walk(1, restart)? {
            break;
        }
        restart = false;
        let (_, rowid) = db.get_rowid()?;
        seen.push(rowid);
    }
    assert_eq!(seen, vec![r1, r3]);

    assert_eq!(db.next_rowid(1)?, 4);

    Ok(())
}
