use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn get_fixture_dir() -> PathBuf {
    env::var("INSIDER_FIXDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

pub(crate) fn record_fixture(
    endpoint: &str,
    key: &str,
    ext: &str,
    body: &str,
) -> Result<(), std::io::Error> {
    let dir = get_fixture_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    let safe_key: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let path = dir.join(format!("{endpoint}_{safe_key}.{ext}"));

    let mut file = fs::File::create(&path)?;
    file.write_all(body.as_bytes())?;

    if env::var("INSIDER_DEBUG").ok().as_deref() == Some("1") {
        eprintln!("INSIDER_RECORD: wrote fixture to {}", path.display());
    }
    Ok(())
}
