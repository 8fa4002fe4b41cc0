use indicatif::MultiProgress;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::PoisonError;
use unautoit::BatchReport;
use unautoit::ExtractionState;
use unautoit::PipelineObserver;
use unautoit::Progress;

/// Convert a progress report to a percentage.
fn percent(consumed: usize, total: usize) -> u64 {
    if total == 0 {
        return 100;
    }

    let percent = consumed.min(total).saturating_mul(100) / total;
    u64::try_from(percent).unwrap_or(100)
}

/// A progress bar for the tidy pass of a single extraction.
///
/// Nothing is drawn unless the resource is tidied.
pub struct TidyBar {
    bar: ProgressBar,
}

impl TidyBar {
    pub fn new(name: &str) -> anyhow::Result<Self> {
        let bar = ProgressBar::new(100);
        bar.set_style(ProgressStyle::with_template(
            "{prefix} [{bar:30}] {percent:>3}%",
        )?);
        bar.set_prefix(format!("Indenting {name}"));

        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Progress for TidyBar {
    fn report(&self, consumed: usize, total: usize) {
        self.bar.set_position(percent(consumed, total));
    }
}

/// One progress bar per resource of a batch extraction.
///
/// The bar's message is the worker's state.
pub struct BatchBars {
    multi: MultiProgress,
    style: ProgressStyle,
    bars: Mutex<HashMap<usize, ProgressBar>>,
}

impl BatchBars {
    pub fn new() -> anyhow::Result<Self> {
        let style = ProgressStyle::with_template("{prefix:<24} [{bar:20}] {percent:>3}% {msg}")?;

        Ok(Self {
            multi: MultiProgress::new(),
            style,
            bars: Mutex::new(HashMap::new()),
        })
    }

    fn bar(&self, id: usize) -> Option<ProgressBar> {
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

impl PipelineObserver for BatchBars {
    fn started(&self, id: usize, name: &str) {
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(self.style.clone());
        bar.set_prefix(name.to_string());
        bar.set_message(ExtractionState::Pending.to_string());

        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, bar);
    }

    fn state_changed(&self, id: usize, state: ExtractionState) {
        let Some(bar) = self.bar(id) else {
            return;
        };

        match state {
            ExtractionState::Complete => {
                bar.set_position(100);
                bar.finish_with_message(state.to_string());
            }
            ExtractionState::Failed => {
                bar.abandon_with_message(state.to_string());
            }
            _ => {
                bar.set_message(state.to_string());
            }
        }
    }

    fn progress(&self, id: usize, consumed: usize, total: usize) {
        if let Some(bar) = self.bar(id) {
            bar.set_position(percent(consumed, total));
        }
    }

    fn finished(&self, _report: &BatchReport) {
        if let Err(error) = self.multi.clear() {
            tracing::debug!("failed to clear progress bars: {error}");
        }
    }
}
