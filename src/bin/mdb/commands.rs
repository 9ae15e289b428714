//! Command handlers, one function per `Command` variant.

use crate::cli::Command;
use anyhow::{bail, Context, Result};
use meagerdb::{AbortHook, Db, KvUpdate, MdbConfig, OsRandomSource};
use std::io::Write;

fn parse_value(raw: &str) -> Result<Vec<u8>> {
    if let Some(path) = raw.strip_prefix('@') {
        std::fs::read(path).with_context(|| format!("reading value from {path}"))
    } else {
        Ok(raw.as_bytes().to_vec())
    }
}

fn parse_key(raw: &str) -> Result<[u8; 8]> {
    let bytes = raw.as_bytes();
    if bytes.len() != 8 {
        bail!("key must be exactly 8 bytes, got {}", bytes.len());
    }
    let mut key = [0u8; 8];
    key.copy_from_slice(bytes);
    Ok(key)
}

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Create { path, password, iterations, page_size } => {
            let mut cfg = MdbConfig::default().with_iterations(iterations);
            if let Some(ps) = page_size {
                cfg = cfg.with_page_size(ps);
            }
            Db::create(&path, password.as_bytes(), &cfg, &OsRandomSource, &AbortHook).context("create failed")?;
            println!("created {}", path.display());
            Ok(())
        }

        Command::Insert { path, password, table, value } => {
            let value = parse_value(&value)?;
            let cfg = MdbConfig::default();
            let mut db = Db::open(&path, password.as_bytes(), &cfg, Box::new(AbortHook)).context("open failed")?;
            let rowid = db.insert(table, &value).context("insert failed")?;
            println!("{rowid}");
            Ok(())
        }

        Command::Get { path, password, table, rowid } => {
            let cfg = MdbConfig::default();
            let mut db = Db::open(&path, password.as_bytes(), &cfg, Box::new(AbortHook)).context("open failed")?;
            db.select_by_rowid(table, rowid).context("select failed")?;
            let len = db.get_value(None, 0).context("get_value failed")?;
            let mut buf = vec![0u8; len as usize];
            db.get_value(Some(&mut buf), len).context("get_value failed")?;
            std::io::stdout().write_all(&buf)?;
            Ok(())
        }

        Command::Walk { path, password, table } => {
            let cfg = MdbConfig::default();
            let mut db = Db::open(&path, password.as_bytes(), &cfg, Box::new(AbortHook)).context("open failed")?;
            let mut restart = true;
            loop {
                if !db.walk(table, restart).context("walk failed")? {
                    break;
                }
                restart = false;
                let (_, rowid) = db.get_rowid().context("get_rowid failed")?;
                let len = db.get_value(None, 0).context("get_value failed")?;
                println!("{rowid}\t{len}");
            }
            Ok(())
        }

        Command::Delete { path, password, table, rowid } => {
            let cfg = MdbConfig::default();
            let mut db = Db::open(&path, password.as_bytes(), &cfg, Box::new(AbortHook)).context("open failed")?;
            db.select_by_rowid(table, rowid).context("select failed")?;
            db.delete().context("delete failed")?;
            Ok(())
        }

        Command::KvSet { path, password, table, rowid, key, value } => {
            let key = parse_key(&key)?;
            let value = value.map(|v| parse_value(&v)).transpose()?;
            let cfg = MdbConfig::default();
            let mut db = Db::open(&path, password.as_bytes(), &cfg, Box::new(AbortHook)).context("open failed")?;
            db.select_by_rowid(table, rowid).context("select failed")?;
            let update = KvUpdate { key, value: value.as_deref() };
            db.kv_update(std::slice::from_ref(&update)).context("kv_update failed")?;
            Ok(())
        }

        Command::KvGet { path, password, table, rowid, key } => {
            let key = parse_key(&key)?;
            let cfg = MdbConfig::default();
            let mut db = Db::open(&path, password.as_bytes(), &cfg, Box::new(AbortHook)).context("open failed")?;
            db.select_by_rowid(table, rowid).context("select failed")?;
            let len = db.kv_get_value(&key, None, 0).context("kv_get_value failed")?;
            if len == 0 {
                eprintln!("not found");
                std::process::exit(1);
            }
            let mut buf = vec![0u8; len as usize];
            db.kv_get_value(&key, Some(&mut buf), len).context("kv_get_value failed")?;
            std::io::stdout().write_all(&buf)?;
            Ok(())
        }
    }
}
