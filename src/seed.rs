use crate::config::SelectionBounds;
use crate::core::CurationEngine;
use crate::source::fetch::Fetcher;
use crate::source::manifest::ProductJob;
use crate::store::{ProductStore, SeedRecord, SeedStatus};
use log::{info, warn};

/// Drives one product at a time: fetch candidates, curate, persist.
///
/// Nothing here is shared mutably between products, so a batch can run
/// products on separate threads.
pub struct Seeder {
    pub engine: CurationEngine,
    pub store: ProductStore,
    pub bounds: SelectionBounds,
    /// Most candidates downloaded per product.
    pub limit: usize,
    pub dry_run: bool,
}

impl Seeder {
    /// Process a manifest job end to end. Failures are folded into the
    /// returned record instead of aborting the batch.
    pub fn seed_job(&self, fetcher: &Fetcher, job: &ProductJob) -> SeedRecord {
        let label = job.label();
        let urls = match fetcher.candidate_urls(job) {
            Ok(urls) => urls,
            Err(err) => {
                warn!("[{}] {}", label, err);
                return self.record(job, SeedStatus::Failed);
            }
        };
        if urls.is_empty() {
            warn!("[{}] no candidate image URLs found", label);
            return self.record(job, SeedStatus::NoCandidates);
        }

        let candidates = fetcher.collect_candidates(&urls, self.limit);
        if candidates.is_empty() {
            warn!("[{}] failed to download any images", label);
            return self.record(job, SeedStatus::NoCandidates);
        }
        self.seed_candidates(job, &candidates)
    }

    /// Curate already-fetched candidates for a product and persist them.
    pub fn seed_candidates<B: AsRef<[u8]>>(&self, job: &ProductJob, candidates: &[B]) -> SeedRecord {
        let label = job.label();
        let mut record = self.record(job, SeedStatus::Failed);
        record.candidates = candidates.len();

        let curation = match self.engine.curate(candidates, self.bounds) {
            Ok(curation) => curation,
            Err(err) => {
                warn!("[{}] curation failed: {}", label, err);
                return record;
            }
        };
        record.rejected = curation.rejections.len();

        if curation.is_empty() {
            warn!(
                "[{}] no usable images among {} candidate(s)",
                label,
                candidates.len()
            );
            record.status = SeedStatus::NothingSelected;
            return record;
        }
        if curation.len() < self.bounds.min {
            warn!(
                "[{}] only {} image(s) survived, wanted at least {}",
                label,
                curation.len(),
                self.bounds.min
            );
        }

        if self.dry_run {
            info!("[{}] would write {} image(s)", label, curation.len());
            record.written = curation.len();
            record.status = SeedStatus::DryRun;
            return record;
        }

        match self
            .store
            .write_selection(&job.category, &job.index, &curation.selected)
        {
            Ok(paths) => {
                info!(
                    "[{}] wrote {} image(s) to {}",
                    label,
                    paths.len(),
                    self.store.product_dir(&job.category, &job.index).display()
                );
                record.written = paths.len();
                record.status = SeedStatus::Written;
            }
            Err(err) => warn!("[{}] {}", label, err),
        }
        record
    }

    fn record(&self, job: &ProductJob, status: SeedStatus) -> SeedRecord {
        SeedRecord::now(&job.category, &job.index, &job.name, status)
    }
}
