use anyhow::Result;
use meagerdb::{AbortHook, Db, MdbConfig, OsRandomSource};

#[test]
fn opening_twice_with_no_writes_between_yields_identical_walk_output() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("idempotent.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"pw", &cfg, &OsRandomSource, &AbortHook)?;
    {
        let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;
        db.insert(1, b"a")?;
        db.insert(1, b"bb")?;
    }

    let walk_once = |db: &mut Db| -> Result<Vec<(u32, u32)>> {
        let mut out = Vec::new();
        let mut restart = true;
        loop {
            if !db.walk(1, restart)? {
                break;
            }
            restart = false;
            let (_, rowid) = db.get_rowid()?;
            let len = db.get_value(None, 0)?;
            out.push((rowid, len));
        }
        Ok(out)
    };

    let mut db1 = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;
    let first = walk_once(&mut db1)?;
    drop(db1);

    let mut db2 = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;
    let second = walk_once(&mut db2)?;

    assert_eq!(first, second);
    assert_eq!(first, vec![(1, 1), (2, 2)]);

    Ok(())
}
