use crate::Decompiler;
use crate::Error;
use crate::Progress;
use chrono::DateTime;
use chrono::Utc;
use std::borrow::Cow;

/// Whether a resource's payload has been reformatted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum DecompiledState {
    /// The payload is as stored in the container, possibly decompressed.
    #[default]
    Raw,

    /// The payload is tidied script source.
    Decompiled,
}

/// A resource embedded in a compiled container.
#[derive(Debug, Clone)]
pub struct Resource {
    id: usize,
    inflated: bool,

    /// The display name.
    ///
    /// Category resources carry a `>>>NAME<<<` marker instead of a file name.
    pub name: String,

    /// The origin path or tag recorded in the container.
    pub path: String,

    /// The payload.
    pub data: Vec<u8>,

    /// Whether the stored payload is compressed.
    pub is_compressed: bool,

    /// The stored payload size.
    pub compressed_size: u32,

    /// The payload size after decompression.
    pub decompressed_size: u32,

    /// The creation time recorded in the container.
    pub creation_time: DateTime<Utc>,

    /// The last modified time recorded in the container.
    pub modified_time: DateTime<Utc>,

    /// Whether the payload has been reformatted.
    pub state: DecompiledState,
}

impl Resource {
    /// Make a new uncompressed resource.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let size = u32::try_from(data.len()).unwrap_or(u32::MAX);

        Self {
            id: 0,
            inflated: false,

            name: name.into(),
            path: String::new(),
            data,
            is_compressed: false,
            compressed_size: size,
            decompressed_size: size,
            creation_time: DateTime::default(),
            modified_time: DateTime::default(),
            state: DecompiledState::Raw,
        }
    }

    /// Set the origin path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Mark the payload as compressed, with the given decompressed size.
    pub fn with_compression(mut self, decompressed_size: u32) -> Self {
        self.is_compressed = true;
        self.decompressed_size = decompressed_size;
        self
    }

    /// Set the creation and modified times.
    pub fn with_times(
        mut self,
        creation_time: DateTime<Utc>,
        modified_time: DateTime<Utc>,
    ) -> Self {
        self.creation_time = creation_time;
        self.modified_time = modified_time;
        self
    }

    /// The position of this resource in its catalog.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns `true` if the payload still needs decompressing.
    pub fn needs_decompression(&self) -> bool {
        self.is_compressed && !self.inflated
    }

    /// Get the decompressed payload without modifying this resource.
    pub fn payload<D>(
        &self,
        decompiler: &D,
        progress: &dyn Progress,
    ) -> Result<Cow<'_, [u8]>, Error>
    where
        D: Decompiler,
    {
        if !self.needs_decompression() {
            return Ok(Cow::Borrowed(&self.data));
        }

        decompiler
            .decompress(self, progress)
            .map(Cow::Owned)
            .ok_or(Error::Decompress { id: self.id })
    }

    /// Replace the payload with its decompressed form.
    ///
    /// This is a NOP if the payload is not compressed or was already decompressed.
    pub fn decompress_in_place<D>(
        &mut self,
        decompiler: &D,
        progress: &dyn Progress,
    ) -> Result<(), Error>
    where
        D: Decompiler,
    {
        if !self.needs_decompression() {
            return Ok(());
        }

        let data = decompiler
            .decompress(self, progress)
            .ok_or(Error::Decompress { id: self.id })?;
        self.data = data;
        self.inflated = true;

        Ok(())
    }
}

/// The ordered resources of one container.
///
/// A resource's id is its position in the catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Vec<Resource>,
}

impl Catalog {
    /// Parse a container with the given backend.
    pub fn load<D>(decompiler: &D, bytes: &[u8]) -> Result<Self, Error>
    where
        D: Decompiler,
    {
        let resources = decompiler
            .load(bytes)
            .map_err(|error| Error::InvalidContainer { error })?;

        Ok(Self::from_resources(resources))
    }

    /// Make a catalog from resources in container order.
    pub fn from_resources(mut resources: Vec<Resource>) -> Self {
        for (id, resource) in resources.iter_mut().enumerate() {
            resource.id = id;
        }

        Self { resources }
    }

    /// The number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if there are no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Get a resource by id.
    pub fn get(&self, id: usize) -> Result<&Resource, Error> {
        let count = self.resources.len();
        self.resources
            .get(id)
            .ok_or(Error::NoSuchResource { id, count })
    }

    /// Get a mutable reference to a resource by id.
    pub fn get_mut(&mut self, id: usize) -> Result<&mut Resource, Error> {
        let count = self.resources.len();
        self.resources
            .get_mut(id)
            .ok_or(Error::NoSuchResource { id, count })
    }

    /// Iterate over the resources in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    /// Iterate mutably over the resources in id order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Resource> {
        self.resources.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
