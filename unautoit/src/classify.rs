use crate::Decompiler;
use crate::NoProgress;
use crate::Resource;
use crate::SCRIPT_CONFIDENCE;

/// The detected type of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// The payload is empty.
    Empty,

    /// The sniffer recognized the payload.
    Mime(&'static str),

    /// The payload looks like script source.
    Script,

    /// Nothing recognized the payload, or it could not be decompressed.
    Unknown,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty File"),
            Self::Mime(mime) => write!(f, "{mime}"),
            Self::Script => write!(f, "AutoIt Script"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl serde::Serialize for FileType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Detect the MIME type of a payload from its leading bytes.
pub fn sniff(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

/// Classify a resource.
///
/// The checks run in a fixed order: empty payload, then the sniffer, then the script heuristic.
/// The sniffer is more specific, so it wins over the script heuristic.
pub fn classify<D>(decompiler: &D, resource: &Resource) -> FileType
where
    D: Decompiler,
{
    if resource.data.is_empty() {
        return FileType::Empty;
    }

    let data = match resource.payload(decompiler, &NoProgress) {
        Ok(data) => data,
        Err(error) => {
            tracing::debug!("failed to classify resource {}: {error}", resource.id());
            return FileType::Unknown;
        }
    };

    if let Some(mime) = sniff(&data) {
        return FileType::Mime(mime);
    }

    if decompiler.is_script(&data, SCRIPT_CONFIDENCE) {
        return FileType::Script;
    }

    FileType::Unknown
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::*;
    use crate::Catalog;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01\x00\x00\x00\x01";

    #[test]
    fn fallback_chain() {
        let decompiler = FakeDecompiler::new(vec![
            Resource::new("empty.png", Vec::new()).with_compression(0),
            Resource::new("logo.png", PNG.to_vec()),
            Resource::new("packed.png", compressed(PNG)).with_compression(24),
            Resource::new(">>>AUTOIT SCRIPT<<<", compressed(SCRIPT.as_bytes()))
                .with_compression(0),
            Resource::new("notes.txt", b"just some plain notes".to_vec()),
            Resource::new("broken.bin", b"not compressed".to_vec()).with_compression(99),
            Resource::new("readme.txt", b"Click Next to continue.\r\n".to_vec()),
        ]);
        let catalog = decompiler.catalog();
        let types: Vec<FileType> = catalog
            .iter()
            .map(|resource| classify(&decompiler, resource))
            .collect();

        assert!(
            types
                == [
                    FileType::Empty,
                    FileType::Mime("image/png"),
                    FileType::Mime("image/png"),
                    FileType::Script,
                    FileType::Unknown,
                    FileType::Unknown,
                    FileType::Unknown,
                ]
        );
    }

    #[test]
    fn sniffer_wins_over_script_heuristic() {
        // A zip whose body is full of script keywords.
        let mut data = b"PK\x03\x04".to_vec();
        data.extend_from_slice(SCRIPT.as_bytes());
        let catalog = Catalog::from_resources(vec![Resource::new("payload", data)]);
        let decompiler = FakeDecompiler::new(Vec::new());

        let resource = catalog.get(0).expect("missing resource");
        assert!(decompiler.is_script(&resource.data, SCRIPT_CONFIDENCE));
        assert!(classify(&decompiler, resource) == FileType::Mime("application/zip"));
    }

    #[test]
    fn labels() {
        assert!(FileType::Empty.to_string() == "Empty File");
        assert!(FileType::Script.to_string() == "AutoIt Script");
        assert!(FileType::Unknown.to_string() == "unknown");
        assert!(FileType::Mime("image/bmp").to_string() == "image/bmp");
    }
}
