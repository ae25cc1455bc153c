use crate::flatten::flatten_project;
use crate::store::DatasetStore;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use unitmap_scraper::{
    CrawlSummary, Crawler, Driver, ProgressCallback, ProjectFilter, ProjectSink, SiteSpec,
};

/// Options for configuring a crawl run.
pub struct CrawlOptions {
    pub dataset_dir: PathBuf,
    pub regions: Vec<String>,
    pub show_progress_bar: bool,
}

/// One artifact written during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    pub region: String,
    pub project: String,
    pub rows: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub summary: CrawlSummary,
    pub artifacts: Vec<ArtifactRecord>,
}

/// Execute a crawl with the given options: wire the dataset store into the
/// crawler as resume filter and persistence sink, run it, and collect what
/// was written.
pub async fn execute_crawl(
    driver: Arc<dyn Driver>,
    site: SiteSpec,
    options: CrawlOptions,
) -> Result<CrawlOutcome, String> {
    let CrawlOptions {
        dataset_dir,
        regions,
        show_progress_bar,
    } = options;

    let store = Arc::new(DatasetStore::new(dataset_dir));
    info!("dataset root: {}", store.root().display());

    let progress_bar = if show_progress_bar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    // Resume checkpoint: a persisted artifact means the whole subtree is
    // skipped before any driver interaction happens for it.
    let filter_store = store.clone();
    let project_filter: ProjectFilter =
        Arc::new(move |region, project| !filter_store.has_artifact(region, project));

    let artifacts: Arc<Mutex<Vec<ArtifactRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_store = store.clone();
    let sink_records = artifacts.clone();
    let project_sink: ProjectSink = Arc::new(move |region, project| {
        let rows = flatten_project(project);
        let path = sink_store
            .persist(region, &project.name, &rows)
            .map_err(|e| e.to_string())?;
        sink_records.lock().unwrap().push(ArtifactRecord {
            region: region.to_string(),
            project: project.name.clone(),
            rows: rows.len(),
            path,
        });
        Ok(())
    });

    let progress_callback: ProgressCallback = if let Some(pb) = progress_bar.clone() {
        Arc::new(move |level: &str, label: &str| {
            pb.set_message(format!("Crawling {}: {}", level, label));
            pb.tick();
        })
    } else {
        Arc::new(|_level: &str, _label: &str| {})
    };

    let crawler = Crawler::new(driver, site)
        .with_regions(regions)
        .with_project_filter(project_filter)
        .with_project_sink(project_sink)
        .with_progress_callback(progress_callback);

    let summary = crawler.crawl().await.map_err(|e| e.to_string())?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "Crawl complete! {} projects crawled, {} skipped",
            summary.projects_crawled, summary.projects_skipped
        ));
    }

    let artifacts = artifacts.lock().unwrap().clone();
    Ok(CrawlOutcome { summary, artifacts })
}
