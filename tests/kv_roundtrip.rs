use anyhow::Result;
use meagerdb::{AbortHook, Db, KvUpdate, MdbConfig, OsRandomSource};

fn key(s: &[u8; 8]) -> [u8; 8] {
    *s
}

#[test]
fn kv_update_set_then_clear_a_key_leaves_the_other_intact() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("kv.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"pw", &cfg, &OsRandomSource, &AbortHook)?;
    let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;

    let rowid = db.insert(5, b"")?;
    db.select_by_rowid(5, rowid)?;

    let a = key(b"AAAAAAAA");
    let b = key(b"BBBBBBBB");

    db.kv_update(&[
        KvUpdate { key: a, value: Some(b"x") },
        KvUpdate { key: b, value: Some(b"yy") },
    ])?;

    let len = db.kv_get_value(&a, None, 0)?;
    let mut buf = vec![0u8; len as usize];
    db.kv_get_value(&a, Some(&mut buf), len)?;
    assert_eq!(buf, b"x");

    db.kv_update(&[KvUpdate { key: a, value: None }])?;
    assert_eq!(db.kv_get_value(&a, None, 0)?, 0);

    let len = db.kv_get_value(&b, None, 0)?;
    let mut buf = vec![0u8; len as usize];
    db.kv_get_value(&b, Some(&mut buf), len)?;
    assert_eq!(buf, b"yy");

    Ok(())
}

#[test]
fn kv_get_uint32_round_trips_and_rejects_wrong_length() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("kv_uint32.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"pw", &cfg, &OsRandomSource, &AbortHook)?;
    let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;

    let rowid = db.insert(6, b"")?;
    db.select_by_rowid(6, rowid)?;

    let k = key(b"COUNTERR");
    db.kv_update(&[KvUpdate { key: k, value: Some(&42u32.to_le_bytes()) }])?;
    assert_eq!(db.kv_get_uint32(&k)?, 42);

    let short = key(b"SHORTKEY");
    db.kv_update(&[KvUpdate { key: short, value: Some(b"ab") }])?;
    assert!(db.kv_get_uint32(&short).is_err());

    Ok(())
}
