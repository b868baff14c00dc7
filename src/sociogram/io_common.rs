use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::sociogram::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Resolves a path of the configuration relative to the directory of the configuration file.
pub fn resolve_path(root: &Path, path: &str) -> String {
    let p: PathBuf = root.join(path);
    p.as_path().display().to_string()
}

/// Given the header of a file (names of each of the columns), and the names of the
/// requested columns, finds the mapping from each requested column to a column index position.
pub fn get_col_index_mapping(
    req_col_names: &[String],
    header: &[Option<String>],
) -> SgResult<Vec<usize>> {
    let col_names: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .filter_map(|(idx, x)| x.as_ref().map(|s| (s.trim().to_string(), idx)))
        .collect();

    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut col_indexes: Vec<usize> = Vec::new();
    for cname in req_col_names {
        let idx = col_names
            .get(cname)
            .context(MissingRosterColumnSnafu { column: cname })?;
        col_indexes.push(*idx);
    }
    Ok(col_indexes)
}
