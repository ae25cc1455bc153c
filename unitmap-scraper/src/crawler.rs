use crate::catalog::{Node, Project};
use crate::driver::Driver;
use crate::error::{Result, ScrapeError};
use crate::extract::{self, LIST_WAIT};
use crate::levels::SiteSpec;
use crate::select::LevelSelector;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decides whether a (region, project) subtree should be traversed at all.
/// Returning false skips the project with zero driver interaction.
pub type ProjectFilter = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Receives each completed project subtree, keyed by region, before the
/// traversal moves on. Failing here aborts the run.
pub type ProjectSink =
    Arc<dyn Fn(&str, &Project) -> std::result::Result<(), String> + Send + Sync>;

/// Callback for reporting the (level, label) currently being attempted.
pub type ProgressCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

const REGION: usize = 0;
const PROJECT: usize = 1;
const BUILDING: usize = 2;
const FLOOR: usize = 3;

/// Counters returned by a crawl. The trees themselves are handed to the
/// project sink and dropped; nothing larger than one project subtree is
/// retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub regions: usize,
    pub projects_crawled: usize,
    pub projects_skipped: usize,
    pub buildings: usize,
    pub floors: usize,
    pub units: usize,
    pub timeouts: usize,
}

pub struct Crawler {
    driver: Arc<dyn Driver>,
    site: SiteSpec,
    regions: Vec<String>,
    project_filter: Option<ProjectFilter>,
    project_sink: Option<ProjectSink>,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(driver: Arc<dyn Driver>, site: SiteSpec) -> Self {
        Self {
            driver,
            site,
            regions: Vec::new(),
            project_filter: None,
            project_sink: None,
            progress_callback: None,
        }
    }

    /// Restrict the region loop to a fixed set of labels instead of
    /// enumerating them from the page. An empty list means full enumeration.
    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_project_filter(mut self, filter: ProjectFilter) -> Self {
        self.project_filter = Some(filter);
        self
    }

    pub fn with_project_sink(mut self, sink: ProjectSink) -> Self {
        self.project_sink = Some(sink);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Run the full crawl: navigate to the site, open the region box and walk
    /// every level depth-first, one sibling at a time.
    pub async fn crawl(&self) -> Result<CrawlSummary> {
        info!("starting crawl of {}", self.site.url);
        self.driver.goto(&self.site.url).await?;

        // The region box is the only level whose list needs an explicit
        // opening click; committing a parent opens every deeper panel.
        let region_spec = self.site.level(REGION);
        self.driver.wait_for(&region_spec.trigger, LIST_WAIT).await?;
        self.driver.click_nth(&region_spec.trigger, 0).await?;

        let mut summary = CrawlSummary::default();
        self.descend(REGION, "", &mut summary).await?;

        info!(
            "crawl complete: {} regions, {} projects crawled, {} skipped, {} units",
            summary.regions, summary.projects_crawled, summary.projects_skipped, summary.units
        );
        Ok(summary)
    }

    /// One level of the traversal. Identical shape at every depth: gather
    /// candidate labels, then per label commit the selection, recurse, and
    /// always reset the widget before the next sibling. The leaf level only
    /// extracts.
    fn descend<'a>(
        &'a self,
        depth: usize,
        region: &'a str,
        summary: &'a mut CrawlSummary,
    ) -> BoxFuture<'a, Result<Vec<Node>>> {
        Box::pin(async move {
            let spec = self.site.level(depth);

            if spec.is_leaf {
                let labels = extract::extract_options(self.driver.as_ref(), spec).await?;
                summary.units += labels.len();
                return Ok(labels.into_iter().map(Node::leaf).collect());
            }

            let labels = if depth == REGION && !self.regions.is_empty() {
                self.regions
                    .iter()
                    .map(|label| label.trim().to_string())
                    .filter(|label| !label.is_empty())
                    .collect()
            } else {
                extract::extract_options(self.driver.as_ref(), spec).await?
            };
            debug!("{} candidates: {:?}", spec.name, labels);

            let mut nodes = Vec::new();
            for label in labels {
                if depth == PROJECT
                    && let Some(filter) = &self.project_filter
                    && !filter(region, &label)
                {
                    info!("skipping project '{}': already persisted", label);
                    summary.projects_skipped += 1;
                    continue;
                }

                self.report_progress(spec.name, &label);
                match self.visit(depth, region, &label, summary).await {
                    Ok(children) => nodes.push(self.complete(depth, region, label, children, summary)?),
                    Err(e) if e.is_timeout() => {
                        warn!("{}, skipping {} '{}'", e, spec.name, label);
                        summary.timeouts += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(nodes)
        })
    }

    /// Scoped attempt on one sibling: commit the selection, traverse its
    /// subtree, and reset the shared widget no matter how that went.
    async fn visit(
        &self,
        depth: usize,
        region: &str,
        label: &str,
        summary: &mut CrawlSummary,
    ) -> Result<Vec<Node>> {
        let spec = self.site.level(depth);
        let selector = LevelSelector::new(self.driver.as_ref(), spec);
        let child_region = if depth == REGION { label } else { region };

        let attempt = async {
            selector.commit(label).await?;
            self.descend(depth + 1, child_region, summary).await
        }
        .await;

        selector.reset().await;
        attempt
    }

    /// Book-keeping for a successfully traversed sibling. Projects are
    /// converted, handed to the sink and replaced by a bare label so no
    /// region retains its full tree in memory.
    fn complete(
        &self,
        depth: usize,
        region: &str,
        label: String,
        children: Vec<Node>,
        summary: &mut CrawlSummary,
    ) -> Result<Node> {
        match depth {
            REGION => {
                summary.regions += 1;
                Ok(Node::leaf(label))
            }
            PROJECT => {
                let project = Project::from(Node::branch(label.clone(), children));
                if let Some(sink) = &self.project_sink {
                    sink(region, &project).map_err(ScrapeError::Persist)?;
                }
                summary.projects_crawled += 1;
                Ok(Node::leaf(label))
            }
            BUILDING => {
                summary.buildings += 1;
                Ok(Node::branch(label, children))
            }
            FLOOR => {
                summary.floors += 1;
                Ok(Node::branch(label, children))
            }
            _ => Ok(Node::branch(label, children)),
        }
    }

    fn report_progress(&self, level: &str, label: &str) {
        if let Some(callback) = &self.progress_callback {
            callback(level, label);
        }
    }
}
