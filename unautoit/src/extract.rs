use crate::naming;
use crate::text;
use crate::Catalog;
use crate::DecompiledState;
use crate::Decompiler;
use crate::Error;
use crate::NoProgress;
use crate::Progress;
use crate::StyleOptions;
use chrono::Utc;
use std::path::PathBuf;

/// Settings shared by every resource of one extraction command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// The directory files are written to.
    pub output_dir: PathBuf,

    /// The tidy style for scripts.
    pub style: StyleOptions,
}

impl ExtractOptions {
    /// The output directory used when none is given.
    pub const DEFAULT_OUTPUT_DIR: &'static str = "dump";

    /// Make new options.
    pub fn new(output_dir: impl Into<PathBuf>, style: StyleOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            style,
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OUTPUT_DIR, StyleOptions::default())
    }
}

/// A file written for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// The path of the written file.
    pub path: PathBuf,

    /// The number of bytes written.
    pub len: usize,
}

/// Extract one resource by id.
///
/// Category resources are tidied with `options.style`,
/// reporting tidy progress to `progress`,
/// and written under a name built from their category.
/// Other resources are written as stored, after decompression.
pub fn extract_resource<D>(
    decompiler: &D,
    catalog: &mut Catalog,
    id: usize,
    options: &ExtractOptions,
    progress: &dyn Progress,
) -> Result<Extracted, Error>
where
    D: Decompiler,
{
    let resource = catalog.get_mut(id)?;
    naming::create_output_dir(&options.output_dir)?;
    resource.decompress_in_place(decompiler, &NoProgress)?;

    let file_name = if naming::is_category(&resource.name) {
        let source = {
            let tokens = decompiler.tokenize(&resource.data);
            decompiler.tidy(tokens, &options.style, progress)
        };

        let mut data = text::banner(Utc::now()).into_bytes();
        data.extend_from_slice(source.as_bytes());
        resource.data = data;
        resource.state = DecompiledState::Decompiled;

        naming::category_file_name(&resource.name, id)
    } else {
        naming::file_name(resource)
    };

    let path = naming::write_output(&options.output_dir, &file_name, &resource.data)?;
    tracing::debug!("wrote resource {id} to \"{}\"", path.display());

    Ok(Extracted {
        path,
        len: resource.data.len(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::*;
    use crate::Resource;
    use std::path::Path;
    use std::sync::Mutex;

    fn fixture() -> FakeDecompiler {
        FakeDecompiler::new(vec![
            Resource::new(">>>AUTOIT SCRIPT<<<", compressed(SCRIPT.as_bytes())).with_compression(0),
            Resource::new(r"C:\Users\dev\logo.bmp", b"BM\x00\x01".to_vec()),
            Resource::new("broken.dat", b"garbage".to_vec()).with_compression(64),
        ])
    }

    fn dir_entries(path: &Path) -> Vec<String> {
        let mut entries: Vec<String> = std::fs::read_dir(path)
            .expect("failed to read dir")
            .map(|entry| {
                entry
                    .expect("failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn extract_category_script() {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let style = StyleOptions::parse("spaces=2");
        let options = ExtractOptions::new(temp.path().join("dump"), style);
        let decompiler = fixture();
        let mut catalog = decompiler.catalog();

        let reports = Mutex::new(Vec::new());
        let progress = |consumed: usize, total: usize| {
            reports.lock().unwrap().push((consumed, total));
        };
        let extracted = extract_resource(&decompiler, &mut catalog, 0, &options, &progress)
            .expect("failed to extract");

        assert!(extracted.path == options.output_dir.join("AUTOIT-SCRIPT_0.au3"));
        let written = std::fs::read_to_string(&extracted.path).expect("failed to read output");
        assert!(written.len() == extracted.len);
        let stamp = written
            .lines()
            .find(|line| line.contains("Generated on: "))
            .expect("missing timestamp");
        assert!(stamp.ends_with(" UTC"));
        assert!(written.contains("\n  Func Main()\n"));

        let resource = catalog.get(0).expect("missing resource");
        assert!(resource.state == DecompiledState::Decompiled);

        let reports = reports.into_inner().unwrap();
        assert!(!reports.is_empty());
        assert!(reports.windows(2).all(|pair| pair[0].0 <= pair[1].0));
        assert!(reports.iter().all(|(consumed, total)| consumed <= total));
    }

    #[test]
    fn extract_plain_resource() {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let options = ExtractOptions::new(temp.path(), StyleOptions::default());
        let decompiler = fixture();
        let mut catalog = decompiler.catalog();

        let extracted = extract_resource(&decompiler, &mut catalog, 1, &options, &NoProgress)
            .expect("failed to extract");

        assert!(extracted.len == 4);
        assert!(dir_entries(temp.path()) == ["logo.bmp"]);
        assert!(std::fs::read(&extracted.path).expect("failed to read") == b"BM\x00\x01");
        assert!(catalog.get(1).unwrap().state == DecompiledState::Raw);
    }

    #[test]
    fn category_name_uses_id() {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let options = ExtractOptions::new(temp.path(), StyleOptions::default());
        let mut resources: Vec<Resource> = (0..7)
            .map(|i| Resource::new(format!("{i}.txt"), Vec::new()))
            .collect();
        resources.push(Resource::new(">>>Foo<<<", SCRIPT.as_bytes().to_vec()));
        let decompiler = FakeDecompiler::new(resources);
        let mut catalog = decompiler.catalog();

        let extracted = extract_resource(&decompiler, &mut catalog, 7, &options, &NoProgress)
            .expect("failed to extract");
        assert!(extracted.path == temp.path().join("Foo_7.au3"));
    }

    #[test]
    fn missing_id_writes_nothing() {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let options = ExtractOptions::new(temp.path().join("dump"), StyleOptions::default());
        let decompiler = fixture();
        let mut catalog = decompiler.catalog();

        let error = extract_resource(&decompiler, &mut catalog, 3, &options, &NoProgress)
            .expect_err("id 3 should not exist");

        assert!(matches!(error, Error::NoSuchResource { id: 3, count: 3 }));
        assert!(!options.output_dir.exists());
    }

    #[test]
    fn corrupt_payload_writes_nothing() {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let options = ExtractOptions::new(temp.path(), StyleOptions::default());
        let decompiler = fixture();
        let mut catalog = decompiler.catalog();

        let error = extract_resource(&decompiler, &mut catalog, 2, &options, &NoProgress)
            .expect_err("corrupt payload should fail");

        assert!(matches!(error, Error::Decompress { id: 2 }));
        assert!(dir_entries(temp.path()).is_empty());
    }

    #[test]
    fn default_output_dir() {
        let options = ExtractOptions::default();
        assert!(options.output_dir == Path::new("dump"));
        assert!(options.style == StyleOptions::default());
    }
}
