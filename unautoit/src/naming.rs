use crate::Error;
use crate::Resource;
use std::path::Path;
use std::path::PathBuf;

/// The prefix of a category resource's name.
pub const CATEGORY_PREFIX: &str = ">>>";

/// The extension given to script output files.
pub const SCRIPT_EXTENSION: &str = "au3";

/// Returns `true` if `name` is a `>>>CATEGORY<<<` marker rather than a file name.
pub fn is_category(name: &str) -> bool {
    name.starts_with(CATEGORY_PREFIX)
}

/// Build the file name of a category resource.
///
/// Marker characters are removed and spaces become hyphens,
/// so `>>>AUTOIT SCRIPT<<<` with id 3 becomes `AUTOIT-SCRIPT_3.au3`.
pub fn category_file_name(name: &str, id: usize) -> String {
    let category: String = name
        .chars()
        .filter(|c| !matches!(c, '>' | '<'))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();
    let category = sanitize_filename::sanitize(category);

    format!("{category}_{id}.{SCRIPT_EXTENSION}")
}

/// Build the file name of a script found during batch extraction.
pub fn script_file_name(id: usize) -> String {
    format!("script_{id}.{SCRIPT_EXTENSION}")
}

/// Get the file name a resource is written to, unless it is renamed as a script.
///
/// Declared names are cut down to their last path component and sanitized,
/// so the file always lands directly inside the output directory.
pub fn file_name(resource: &Resource) -> String {
    let id = resource.id();
    if is_category(&resource.name) {
        return category_file_name(&resource.name, id);
    }

    let base = resource
        .name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let base = sanitize_filename::sanitize(base);
    if base.is_empty() || base == "." || base == ".." {
        return format!("resource_{id}.bin");
    }

    base
}

/// Create the output directory and its parents.
///
/// An existing directory is not an error.
pub fn create_output_dir(path: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(path).map_err(|error| Error::CreateDir {
        path: path.to_path_buf(),
        error,
    })
}

/// Write `data` to `file_name` inside `output_dir`.
///
/// An existing file is replaced.
pub fn write_output(output_dir: &Path, file_name: &str, data: &[u8]) -> Result<PathBuf, Error> {
    let path = output_dir.join(file_name);
    std::fs::write(&path, data).map_err(|error| Error::Write {
        path: path.clone(),
        error,
    })?;

    Ok(path)
}
