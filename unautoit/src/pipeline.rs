use crate::naming;
use crate::text;
use crate::Catalog;
use crate::DecompiledState;
use crate::Decompiler;
use crate::Error;
use crate::ExtractOptions;
use crate::Extracted;
use crate::Resource;
use crate::SCRIPT_CONFIDENCE;

/// The stage a batch worker is in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtractionState {
    /// The worker has not started.
    Pending,
    /// The payload is being decompressed.
    Decompressing,
    /// The payload is decompressed.
    Decompressed,
    /// The script is being tidied.
    Decompiling,
    /// The script is tidied.
    Indented,
    /// The payload is being written.
    Dumping,
    /// The payload was written.
    Complete,
    /// The resource failed and was skipped.
    Failed,
}

impl ExtractionState {
    /// Returns `true` for `Complete` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl std::fmt::Display for ExtractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Decompressing => "Decompressing",
            Self::Decompressed => "Decompressed",
            Self::Decompiling => "Decompiling",
            Self::Indented => "Indented",
            Self::Dumping => "Dumping",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Receives updates from batch workers.
///
/// Workers call in concurrently and in no particular order across resources.
/// Updates for a single resource arrive in order.
pub trait PipelineObserver: Sync {
    /// A worker for `id` is about to be spawned, in the `Pending` state.
    ///
    /// This is called on the calling thread, in id order.
    fn started(&self, _id: usize, _name: &str) {}

    /// A worker entered a new state.
    fn state_changed(&self, _id: usize, _state: ExtractionState) {}

    /// Decompression or tidy progress for a worker.
    fn progress(&self, _id: usize, _consumed: usize, _total: usize) {}

    /// Every worker has reached a terminal state.
    ///
    /// This is called exactly once, after all workers have been joined.
    fn finished(&self, _report: &BatchReport) {}
}

impl PipelineObserver for () {}

/// The result of one batch worker.
#[derive(Debug)]
pub struct ResourceOutcome {
    /// The resource id
    pub id: usize,

    /// The written file, or why the resource was skipped.
    pub result: Result<Extracted, Error>,
}

/// The results of a batch extraction, in id order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per resource
    pub outcomes: Vec<ResourceOutcome>,
}

impl BatchReport {
    /// The number of resources that were written.
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    /// Iterate over the resources that failed.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.outcomes.iter().filter_map(|outcome| {
            let error = outcome.result.as_ref().err()?;
            Some((outcome.id, error))
        })
    }
}

/// Extract every resource in the catalog, with one thread per resource.
///
/// All workers are spawned before any is joined,
/// and this returns only once every worker has reached a terminal state.
/// A failed resource does not stop the others.
/// Scripts are tidied and renamed to `script_<id>.au3`.
///
/// # Errors
/// Only fails if the output directory cannot be created.
/// Per-resource failures are recorded in the report.
pub fn extract_all<D, O>(
    decompiler: &D,
    catalog: &mut Catalog,
    options: &ExtractOptions,
    observer: &O,
) -> Result<BatchReport, Error>
where
    D: Decompiler,
    O: PipelineObserver,
{
    naming::create_output_dir(&options.output_dir)?;

    let outcomes: Vec<ResourceOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = catalog
            .iter_mut()
            .map(|resource| {
                let id = resource.id();
                observer.started(id, &resource.name);
                let worker = Worker {
                    decompiler,
                    resource,
                    options,
                    observer,
                };
                std::thread::Builder::new()
                    .name(format!("resource-{id}"))
                    .spawn_scoped(scope, move || worker.run())
                    .map_err(|error| spawn_failed(observer, id, error))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle {
                Ok(handle) => handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload)),
                Err(outcome) => outcome,
            })
            .collect()
    });

    let report = BatchReport { outcomes };
    observer.finished(&report);

    Ok(report)
}

/// Fail a resource whose worker thread could not be started.
fn spawn_failed<O>(observer: &O, id: usize, error: std::io::Error) -> ResourceOutcome
where
    O: PipelineObserver,
{
    let error = Error::Spawn { id, error };
    tracing::warn!("failed to extract resource {id}: {error}");
    observer.state_changed(id, ExtractionState::Failed);

    ResourceOutcome {
        id,
        result: Err(error),
    }
}

/// The per-resource state machine.
struct Worker<'a, D, O> {
    decompiler: &'a D,
    resource: &'a mut Resource,
    options: &'a ExtractOptions,
    observer: &'a O,
}

impl<D, O> Worker<'_, D, O>
where
    D: Decompiler,
    O: PipelineObserver,
{
    fn run(mut self) -> ResourceOutcome {
        let id = self.resource.id();
        let result = self.process();
        match result.as_ref() {
            Ok(_) => self.transition(ExtractionState::Complete),
            Err(error) => {
                tracing::warn!("failed to extract resource {id}: {error}");
                self.transition(ExtractionState::Failed);
            }
        }

        ResourceOutcome { id, result }
    }

    fn transition(&self, state: ExtractionState) {
        let id = self.resource.id();
        tracing::debug!("resource {id}: {state}");
        self.observer.state_changed(id, state);
    }

    fn process(&mut self) -> Result<Extracted, Error> {
        let id = self.resource.id();
        let observer = self.observer;
        let progress = move |consumed: usize, total: usize| observer.progress(id, consumed, total);

        self.transition(ExtractionState::Decompressing);
        self.resource.decompress_in_place(self.decompiler, &progress)?;
        self.transition(ExtractionState::Decompressed);

        if !text::is_printable(&self.resource.data) {
            let text = text::from_utf16(&self.resource.data);
            if text::is_printable(text.as_bytes()) {
                self.resource.data = text.into_bytes();
            }
        }

        let file_name = if self
            .decompiler
            .is_script(&self.resource.data, SCRIPT_CONFIDENCE)
        {
            self.transition(ExtractionState::Decompiling);
            let source = {
                let tokens = self.decompiler.tokenize(&self.resource.data);
                self.decompiler.tidy(tokens, &self.options.style, &progress)
            };
            self.transition(ExtractionState::Indented);
            self.resource.data = source.into_bytes();
            self.resource.state = DecompiledState::Decompiled;

            naming::script_file_name(id)
        } else {
            naming::file_name(self.resource)
        };

        self.transition(ExtractionState::Dumping);
        let output_dir = &self.options.output_dir;
        let path = naming::write_output(output_dir, &file_name, &self.resource.data)?;

        Ok(Extracted {
            path,
            len: self.resource.data.len(),
        })
    }
}
