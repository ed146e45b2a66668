use ahash::AHashSet;
use anyhow::{Context, Result};
use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Replace `dest` with `tmp`, falling back to copy+remove when a plain
/// rename fails (e.g. across filesystems).
pub fn replace_file_atomic(tmp: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        fs::remove_file(dest).with_context(|| format!("remove {}", dest.display()))?;
    }
    match fs::rename(tmp, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(tmp, dest)
                .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
            fs::remove_file(tmp).with_context(|| format!("remove {}", tmp.display()))?;
            Ok(())
        }
    }
}

/// Load a newline-separated word list (stopwords), lowercased, with
/// blank lines skipped.
pub fn load_word_list(path: &Path) -> Result<AHashSet<String>> {
    let f = File::open(path).with_context(|| format!("open word list {}", path.display()))?;
    let r = BufReader::new(f);
    let mut out = AHashSet::new();
    for line in r.lines() {
        let line = line.with_context(|| format!("read word list {}", path.display()))?;
        let w = line.trim().to_lowercase();
        if !w.is_empty() {
            out.insert(w);
        }
    }
    Ok(out)
}
