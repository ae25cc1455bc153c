pub mod catalog;
pub mod crawler;
pub mod driver;
pub mod error;
pub mod extract;
pub mod levels;
pub mod select;

pub use catalog::{Apartment, Building, Floor, Node, Project, Region};
pub use crawler::{CrawlSummary, Crawler, ProgressCallback, ProjectFilter, ProjectSink};
pub use driver::{Driver, ScrollMetrics, WebDriverSession};
pub use error::ScrapeError;
pub use extract::ExtractStrategy;
pub use levels::{LevelSpec, Selector, SiteSpec};
pub use select::LevelSelector;
