use std::path::PathBuf;

use crate::caption::compositor::{CaptionCompositor, CaptionOutcome};
use crate::fetch::record::RETRACTED_COMIC;
use crate::fetch::source::ComicSource;
use crate::fetch::store::ImageStore;
use crate::foundation::error::CaptionResult;
use crate::foundation::math::IdSampler;
use crate::text::font::{ParleyFont, TextPainter};

/// Which comics a run downloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Explicit comic numbers, in the given order. `0` is the latest comic.
    Ids(Vec<u32>),
    /// Every comic in `low..=high`.
    Range { low: u32, high: u32 },
    /// Every comic from 1 to the latest.
    All,
    /// `iterations` comics drawn uniformly from 1 to the latest.
    Random { iterations: u32 },
}

/// What happened to one requested comic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComicOutcome {
    Captioned {
        path: PathBuf,
        title_lines: usize,
        alt_lines: usize,
    },
    DownloadedOnly {
        path: PathBuf,
    },
    /// Animated GIFs are stored as downloaded.
    SkippedGif {
        path: PathBuf,
    },
    /// The downloaded file did not decode as an image and was left as is.
    SkippedCorruptImage {
        path: PathBuf,
    },
    /// Comic 404 does not exist upstream; nothing was fetched.
    SkippedRetracted,
    /// Metadata or image could not be retrieved.
    FetchFailed {
        reason: String,
    },
}

/// Per-run record of every processed comic, in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub outcomes: Vec<(u32, ComicOutcome)>,
}

impl RunStats {
    /// Numbers that reached the image store, in order.
    pub fn downloaded_ids(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|(_, o)| {
                !matches!(
                    o,
                    ComicOutcome::SkippedRetracted | ComicOutcome::FetchFailed { .. }
                )
            })
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&ComicOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Fetches, stores and captions comics one at a time.
///
/// Without a compositor the session only downloads.
pub struct DownloadSession<S, F = ParleyFont> {
    source: S,
    store: ImageStore,
    compositor: Option<CaptionCompositor<F>>,
}

impl<S: ComicSource, F: TextPainter> DownloadSession<S, F> {
    pub fn new(source: S, store: ImageStore, compositor: Option<CaptionCompositor<F>>) -> Self {
        Self {
            source,
            store,
            compositor,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Process every comic named by `selection`.
    ///
    /// Per-comic fetch failures are recorded and the run continues. Failing to look up the latest
    /// comic for [`Selection::All`] or [`Selection::Random`] aborts the run.
    pub fn run(&mut self, selection: &Selection, sampler: &mut IdSampler) -> CaptionResult<RunStats> {
        let mut stats = RunStats::default();
        match selection {
            Selection::Ids(ids) => {
                for &id in ids {
                    self.process_into(id, &mut stats)?;
                }
            }
            Selection::Range { low, high } => {
                for id in *low..=*high {
                    self.process_into(id, &mut stats)?;
                }
            }
            Selection::All => {
                let latest = self.latest()?;
                for id in 1..=latest {
                    self.process_into(id, &mut stats)?;
                }
            }
            Selection::Random { iterations } => {
                let latest = self.latest()?;
                if latest == 0 {
                    return Ok(stats);
                }
                for _ in 0..*iterations {
                    let id = loop {
                        let id = sampler.sample_inclusive(1, latest);
                        if id != RETRACTED_COMIC {
                            break id;
                        }
                    };
                    self.process_into(id, &mut stats)?;
                }
            }
        }

        tracing::info!(
            requested = stats.outcomes.len(),
            captioned = stats.count(|o| matches!(o, ComicOutcome::Captioned { .. })),
            failed = stats.count(|o| matches!(o, ComicOutcome::FetchFailed { .. })),
            "run finished"
        );
        Ok(stats)
    }

    fn latest(&self) -> CaptionResult<u32> {
        Ok(self.source.fetch_record(0)?.id)
    }

    fn process_into(&mut self, id: u32, stats: &mut RunStats) -> CaptionResult<()> {
        let outcome = self.process(id)?;
        stats.outcomes.push((id, outcome));
        Ok(())
    }

    /// Fetch, store and caption a single comic. `0` is the latest comic.
    #[tracing::instrument(skip_all, fields(comic = number))]
    pub fn process(&mut self, number: u32) -> CaptionResult<ComicOutcome> {
        if number == RETRACTED_COMIC {
            return Ok(ComicOutcome::SkippedRetracted);
        }
        if number == 0 {
            tracing::info!("Fetching comic -> Latest");
        } else {
            tracing::info!("Fetching comic -> {number}");
        }

        let record = match self.source.fetch_record(number) {
            Ok(r) => r,
            Err(e) if e.is_per_comic() => {
                tracing::warn!(error = %e, "URL could not be retrieved");
                return Ok(ComicOutcome::FetchFailed {
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let stored = match self.store.download(&self.source, &record) {
            Ok(s) => s,
            Err(e) if e.is_per_comic() => {
                tracing::warn!(error = %e, "image could not be retrieved");
                return Ok(ComicOutcome::FetchFailed {
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let Some(compositor) = self.compositor.as_mut() else {
            return Ok(ComicOutcome::DownloadedOnly { path: stored.path });
        };
        if record.is_gif {
            tracing::debug!("gif comics are not captioned");
            return Ok(ComicOutcome::SkippedGif { path: stored.path });
        }

        tracing::info!("Processing comic -> {}", record.id);
        let outcome = compositor.apply_to_file(
            &stored.path,
            &record.title,
            &record.alt_text,
            stored.scaling,
        )?;
        Ok(match outcome {
            CaptionOutcome::Applied {
                title_lines,
                alt_lines,
                ..
            } => ComicOutcome::Captioned {
                path: stored.path,
                title_lines,
                alt_lines,
            },
            CaptionOutcome::SkippedCorruptImage => {
                tracing::warn!(path = %stored.path.display(), "downloaded file is not a readable image");
                ComicOutcome::SkippedCorruptImage { path: stored.path }
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/download_session.rs"]
mod tests;
