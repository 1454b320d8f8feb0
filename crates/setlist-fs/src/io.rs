use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Escribe `contents` en `path` de forma atómica: primero a un `.tmp`
/// hermano, `fsync`, y luego `rename` sobre el destino.
///
/// Si algún paso falla, el `.tmp` se borra y el destino queda como estaba.
pub fn atomic_write_bytes(path: &Path, contents: &[u8]) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  let result = write_synced(&tmp_path, contents).and_then(|()| fs::rename(&tmp_path, path));
  if result.is_err() {
    let _ = fs::remove_file(&tmp_path);
  }
  result
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
  let mut file = fs::File::create(path)?;
  file.write_all(contents)?;
  file.sync_all()
}

pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  atomic_write_bytes(path, contents.as_bytes())
}
