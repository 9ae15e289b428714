//! Centralized configuration and builder, mirroring the teacher's
//! `QuiverConfig`/`DbBuilder` (`examples/artemonad-QuiverDB/src/config.rs`):
//! a `Default` impl, `from_env()`, and a fluent builder.

use crate::consts::DEFAULT_PAGE_SIZE;

/// Creation-time tunables. `page_size` only matters to `create()` — once a
/// database exists its page size is fixed (spec Non-goals: "variable page
/// sizes after creation").
#[derive(Clone, Debug)]
pub struct MdbConfig {
    /// Physical page size used by `create()`. Env: MDB_PAGE_SIZE.
    pub page_size: u32,

    /// PBKDF2 iteration count used by `create()`. Env: MDB_PBKDF2_ITERATIONS.
    pub iterations: u64,

    /// Upper bound enforced on `open()` for a stored page_size value.
    /// Env: MDB_MAX_PAGE_SIZE.
    pub max_page_size: u32,
}

impl Default for MdbConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            iterations: 100_000,
            max_page_size: crate::consts::MAX_PAGE_SIZE,
        }
    }
}

impl MdbConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("MDB_PAGE_SIZE") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.page_size = n;
            }
        }

        if let Ok(v) = std::env::var("MDB_PBKDF2_ITERATIONS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.iterations = n;
            }
        }

        if let Ok(v) = std::env::var("MDB_MAX_PAGE_SIZE") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.max_page_size = n;
            }
        }

        cfg
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Fluent builder producing an `MdbConfig`.
#[derive(Clone, Debug, Default)]
pub struct MdbConfigBuilder {
    cfg: MdbConfig,
}

impl MdbConfigBuilder {
    pub fn new() -> Self {
        Self { cfg: MdbConfig::default() }
    }

    pub fn from_env() -> Self {
        Self { cfg: MdbConfig::from_env() }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.cfg.page_size = page_size;
        self
    }

    pub fn iterations(mut self, iterations: u64) -> Self {
        self.cfg.iterations = iterations;
        self
    }

    pub fn max_page_size(mut self, max_page_size: u32) -> Self {
        self.cfg.max_page_size = max_page_size;
        self
    }

    pub fn build(self) -> MdbConfig {
        self.cfg
    }
}
