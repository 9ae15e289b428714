use meagerdb::{AbortHook, Db, MdbConfig, MdbError, OsRandomSource};

#[test]
fn opening_with_the_wrong_password_fails_with_bad_password() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("wrongpw.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"correct horse", &cfg, &OsRandomSource, &AbortHook).unwrap();

    let err = Db::open(&path, b"incorrect horse", &cfg, Box::new(AbortHook)).unwrap_err();
    assert!(matches!(err, MdbError::BadPassword), "expected BadPassword, got {err:?}");
}
