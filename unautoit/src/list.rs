use crate::classify::classify;
use crate::Catalog;
use crate::Decompiler;
use crate::FileType;
use chrono::DateTime;
use chrono::Utc;

/// A listing entry for one resource.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResourceInfo {
    /// The resource id
    pub id: usize,
    /// The display name
    pub name: String,
    /// The origin path
    pub path: String,
    /// The detected type
    pub file_type: FileType,
    /// Whether the stored payload is compressed
    pub is_compressed: bool,
    /// The stored payload size
    pub compressed_size: u32,
    /// The payload size after decompression
    pub decompressed_size: u32,
    /// The creation time
    pub creation_time: DateTime<Utc>,
    /// The last modified time
    pub modified_time: DateTime<Utc>,
}

/// Classify every resource in the catalog, in id order.
///
/// Resources are not modified.
pub fn list<D>(decompiler: &D, catalog: &Catalog) -> Vec<ResourceInfo>
where
    D: Decompiler,
{
    catalog
        .iter()
        .map(|resource| ResourceInfo {
            id: resource.id(),
            name: resource.name.clone(),
            path: resource.path.clone(),
            file_type: classify(decompiler, resource),
            is_compressed: resource.is_compressed,
            compressed_size: resource.compressed_size,
            decompressed_size: resource.decompressed_size,
            creation_time: resource.creation_time,
            modified_time: resource.modified_time,
        })
        .collect()
}
