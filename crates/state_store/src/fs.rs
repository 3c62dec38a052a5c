//! File helpers shared by both stores

use std::fs;
use std::path::Path;

use contracts::ContractError;

/// Write `contents` to `path` via a sibling temp file and rename
///
/// Readers never observe a half-written file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ContractError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ContractError::storage("create_dir", parent, e.to_string()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, contents).map_err(|e| ContractError::storage("write", tmp, e.to_string()))?;
    fs::rename(tmp, path).map_err(|e| {
        let _ = fs::remove_file(tmp);
        ContractError::storage("rename", path, e.to_string())
    })
}
