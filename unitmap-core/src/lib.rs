pub mod crawl;
pub mod flatten;
pub mod report;
pub mod store;

pub use crawl::{ArtifactRecord, CrawlOptions, CrawlOutcome, execute_crawl};
pub use flatten::{UnitRow, flatten_project};
pub use report::{ReportFormat, generate_crawl_report};
pub use store::{DatasetStore, StoreError};

pub fn print_banner() {
    println!(
        r#"
              _ _
  _   _ _ __ (_) |_ _ __ ___   __ _ _ __
 | | | | '_ \| | __| '_ ` _ \ / _` | '_ \
 | |_| | | | | | |_| | | | | | (_| | |_) |
  \__,_|_| |_|_|\__|_| |_| |_|\__,_| .__/
                                   |_|
        every unit, one row at a time
"#
    );
}
