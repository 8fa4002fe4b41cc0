use crate::Resource;
use crate::StyleOptions;

/// A boxed error produced by a backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An observer for incremental progress of a long running pass.
///
/// Reports are monotonic and `consumed <= total`.
/// A pass may report zero or more times,
/// and the final report is not guaranteed to have `consumed == total`.
pub trait Progress: Sync {
    /// Report that `consumed` of `total` units are done.
    fn report(&self, consumed: usize, total: usize);
}

impl<F> Progress for F
where
    F: Fn(usize, usize) + Sync,
{
    fn report(&self, consumed: usize, total: usize) {
        self(consumed, total)
    }
}

/// A [`Progress`] that ignores every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _consumed: usize, _total: usize) {}
}

/// A backend that understands the compiled container format.
///
/// Backends are shared by reference across all batch workers, so every method takes `&self`.
pub trait Decompiler: Sync {
    /// A script token.
    type Token;

    /// A lazy token sequence over a script payload.
    type Tokens<'a>: Iterator<Item = Self::Token>
    where
        Self: 'a;

    /// Parse a container into its resources, in container order.
    fn load(&self, bytes: &[u8]) -> Result<Vec<Resource>, BoxError>;

    /// Decompress a compressed resource's payload.
    ///
    /// Returns `None` if the payload is corrupt or uses an unsupported scheme.
    fn decompress(&self, resource: &Resource, progress: &dyn Progress) -> Option<Vec<u8>>;

    /// Returns `true` if `data` looks like script source.
    ///
    /// `confidence` bounds how many keyword hits are required.
    fn is_script(&self, data: &[u8], confidence: usize) -> bool {
        crate::text::looks_like_script(data, confidence)
    }

    /// Tokenize a script payload.
    fn tokenize<'a>(&'a self, data: &'a [u8]) -> Self::Tokens<'a>;

    /// Render a token sequence as formatted source.
    fn tidy(
        &self,
        tokens: Self::Tokens<'_>,
        style: &StyleOptions,
        progress: &dyn Progress,
    ) -> String;
}

/// The backend used when no container backend is compiled in.
///
/// Every container is rejected, so no other method is ever reached.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlinked;

impl Decompiler for Unlinked {
    type Token = std::convert::Infallible;
    type Tokens<'a>
        = std::iter::Empty<std::convert::Infallible>
    where
        Self: 'a;

    fn load(&self, _bytes: &[u8]) -> Result<Vec<Resource>, BoxError> {
        Err("no container backend is linked into this build".into())
    }

    fn decompress(&self, _resource: &Resource, _progress: &dyn Progress) -> Option<Vec<u8>> {
        None
    }

    fn tokenize<'a>(&'a self, _data: &'a [u8]) -> Self::Tokens<'a> {
        std::iter::empty()
    }

    fn tidy(
        &self,
        _tokens: Self::Tokens<'_>,
        _style: &StyleOptions,
        _progress: &dyn Progress,
    ) -> String {
        String::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Catalog;
    use crate::Error;
    use std::sync::Mutex;

    #[test]
    fn closure_progress() {
        let reports = Mutex::new(Vec::new());
        let progress = |consumed: usize, total: usize| {
            reports.lock().unwrap().push((consumed, total));
        };
        progress.report(1, 4);
        progress.report(4, 4);

        assert!(*reports.lock().unwrap() == [(1, 4), (4, 4)]);
    }

    #[test]
    fn unlinked_rejects_containers() {
        let error = Catalog::load(&Unlinked, b"AU3!EA06").expect_err("load should fail");
        assert!(matches!(error, Error::InvalidContainer { .. }));
    }
}
