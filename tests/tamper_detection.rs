use anyhow::Result;
use meagerdb::{AbortHook, Db, MdbConfig, MdbError, OsRandomSource};
use std::io::{Seek, SeekFrom, Write};

#[test]
fn flipping_a_header_byte_is_detected_as_corrupt_on_open() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("tamper.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"pw", &cfg, &OsRandomSource, &AbortHook)?;

    // Flip a byte inside the database-id field (offset 20), well within the
    // header's own hashed range [0, 78) and outside anything password-derived.
    {
        let mut file = std::fs::OpenOptions::new().read(true).write(true).open(&path)?;
        file.seek(SeekFrom::Start(20))?;
        let mut byte = [0u8; 1];
        std::io::Read::read_exact(&mut file, &mut byte)?;
        file.seek(SeekFrom::Start(20))?;
        file.write_all(&[byte[0] ^ 0xFF])?;
    }

    let err = Db::open(&path, b"pw", &cfg, Box::new(AbortHook)).unwrap_err();
    assert!(matches!(err, MdbError::Corrupt), "expected Corrupt, got {err:?}");

    Ok(())
}
