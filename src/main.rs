use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use photoseed::source::{DEFAULT_CANDIDATE_LIMIT, Fetcher, read_manifest};
use photoseed::store::write_numbered;
use photoseed::{
    CurationConfig, CurationEngine, ProductStore, SeedRecord, SeedStatus, Seeder, SelectionBounds,
};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

const DEFAULT_OUT_ROOT: &str = "electronics-store/src/main/resources/seed/products";

#[derive(Parser, Debug)]
#[command(name = "photoseed", version, about = "Curate consistent product photo sets")]
struct Cli {
    /// Log per-candidate decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, curate and write photos for every product in a CSV manifest
    Seed {
        /// CSV with mode,category,index,product_name,image_urls,product_page_url
        #[arg(long, value_name = "FILE")]
        csv: PathBuf,
        /// Root directory for `{category}/{index}/{k}.jpg`
        #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_ROOT)]
        out: PathBuf,
        /// Most candidates downloaded per product
        #[arg(long, default_value_t = DEFAULT_CANDIDATE_LIMIT)]
        limit: usize,
        /// Products processed in parallel (default: one per core)
        #[arg(long)]
        jobs: Option<usize>,
        /// Curate but write nothing
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        curation: CurationArgs,
    },

    /// Curate local candidate files into `<out>/1.jpg..`
    Curate {
        /// Directory holding candidate images
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,
        /// Directory to write the selection into
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
        #[command(flatten)]
        curation: CurationArgs,
    },

    /// List seed history records
    History {
        /// Root directory the seeder wrote to
        #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_ROOT)]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CurationArgs {
    /// Minimum photos per product
    #[arg(long, default_value_t = 3)]
    min: usize,
    /// Maximum photos per product
    #[arg(long, default_value_t = 5)]
    max: usize,
    /// JSON file with curation settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Largest median fingerprint distance kept in the pool
    #[arg(long)]
    threshold: Option<u32>,
    /// Shortest acceptable image side in pixels
    #[arg(long)]
    min_side: Option<u32>,
    /// JPEG quality of written photos (1-100)
    #[arg(long)]
    quality: Option<u8>,
}

impl CurationArgs {
    fn engine(&self) -> Result<CurationEngine> {
        let mut config = match &self.config {
            Some(path) => CurationConfig::from_json_file(path)?,
            None => CurationConfig::default(),
        };
        if let Some(threshold) = self.threshold {
            config.cluster_threshold = threshold;
        }
        if let Some(min_side) = self.min_side {
            config.min_short_side = min_side;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        Ok(CurationEngine::new(config)?)
    }

    fn bounds(&self) -> Result<SelectionBounds> {
        Ok(SelectionBounds::new(self.min, self.max)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Seed {
            csv,
            out,
            limit,
            jobs,
            dry_run,
            curation,
        } => {
            let seeder = Seeder {
                engine: curation.engine()?,
                store: ProductStore::new(&out),
                bounds: curation.bounds()?,
                limit,
                dry_run,
            };
            run_seed(&seeder, &csv, jobs)?;
        }

        Commands::Curate {
            input,
            out,
            curation,
        } => {
            let engine = curation.engine()?;
            let bounds = curation.bounds()?;

            println!("▶ Curating candidates in: {}", input.display());
            let files = scan_directory(&input)?;
            let candidates = files
                .iter()
                .map(|path| fs::read(path).with_context(|| format!("Failed to read {:?}", path)))
                .collect::<Result<Vec<_>>>()?;

            let result = benchmark("curation", || engine.curate(&candidates, bounds))?;
            for rejection in &result.rejections {
                println!(
                    "   🗑️  Dropped {} ({:?})",
                    files[rejection.source_index].display(),
                    rejection.reason
                );
            }
            if result.is_empty() {
                println!("No usable images found.");
                return Ok(());
            }

            let paths = write_numbered(&out, &result.selected)?;
            for (path, image) in paths.iter().zip(&result.selected) {
                println!(
                    "   🏆 {} ← {} ({}x{})",
                    path.display(),
                    files[image.source_index].display(),
                    image.width,
                    image.height
                );
            }
            println!("\n✅ Wrote {} image(s) to {}", paths.len(), out.display());
        }

        Commands::History { out } => {
            let store = ProductStore::new(&out);
            let records = store.read_history().with_context(|| {
                format!("Could not read history in {}", out.display())
            })?;

            println!("🗂️  Seed History:");
            for (i, rec) in records.iter().enumerate() {
                println!(
                    "[{}] {} {}/{} {}\n     status: {:?}\n     candidates: {}, rejected: {}, written: {}\n",
                    i,
                    rec.timestamp,
                    rec.category,
                    rec.index,
                    rec.product_name,
                    rec.status,
                    rec.candidates,
                    rec.rejected,
                    rec.written
                );
            }
        }
    }

    Ok(())
}

fn run_seed(seeder: &Seeder, csv: &Path, jobs: Option<usize>) -> Result<()> {
    let rows = read_manifest(csv).with_context(|| format!("Failed to read manifest {:?}", csv))?;
    let fetcher = Fetcher::new()?;

    let mut planned = Vec::new();
    for row in rows {
        match row {
            Ok(job) => planned.push(job),
            Err(err) => log::warn!("[SKIP] {}", err),
        }
    }
    println!(
        "▶ Seeding {} product(s) into {}",
        planned.len(),
        seeder.store.root().display()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .context("Failed to build worker pool")?;

    let progress = ProgressBar::new(planned.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )?);
    progress.enable_steady_tick(Duration::from_millis(100));

    let records: Vec<SeedRecord> = benchmark("seeding all products", || {
        pool.install(|| {
            planned
                .par_iter()
                .map(|job| {
                    progress.set_message(job.label());
                    let record = seeder.seed_job(&fetcher, job);
                    progress.inc(1);
                    record
                })
                .collect()
        })
    });
    progress.finish_with_message("done");

    if !seeder.dry_run {
        for record in &records {
            seeder.store.append_history(record)?;
        }
    }

    let count = |status: SeedStatus| records.iter().filter(|r| r.status == status).count();
    let written: usize = records.iter().map(|r| r.written).sum();
    println!(
        "\n✅ {} product(s) written ({} image(s)), {} dry-run, {} without usable images, {} without candidates, {} failed",
        count(SeedStatus::Written),
        written,
        count(SeedStatus::DryRun),
        count(SeedStatus::NothingSelected),
        count(SeedStatus::NoCandidates),
        count(SeedStatus::Failed),
    );
    if !seeder.dry_run {
        println!("   Recorded seed history in {}", seeder.store.history_path().display());
    }
    Ok(())
}

/// Recursively walk `dir`, returning image file paths in a stable order.
fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Scanning for images…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let allowed_exts = ["jpg", "jpeg", "png", "webp", "avif", "gif", "bmp", "tiff"];
    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if allowed_exts.contains(&ext.to_lowercase().as_str()) {
                    images.push(path.to_path_buf());
                }
            }
        }
        spinner.tick();
    }
    spinner.finish_with_message(format!("Found {} candidate(s)", images.len()));
    Ok(images)
}

/// Run `f()`, print how long it took (with `label`), and return its result.
fn benchmark<T, F: FnOnce() -> T>(label: &str, f: F) -> T {
    let start = Instant::now();
    let result = f();
    println!("⏱ {} took {:.2?}", label, start.elapsed());
    result
}
