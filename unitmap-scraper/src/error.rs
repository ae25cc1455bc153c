use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("webdriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("webdriver session error: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("persistence failed: {0}")]
    Persist(String),

    #[error("{0}")]
    Other(String),
}

impl ScrapeError {
    /// The one error family the traversal recovers from: the page did not
    /// reach an expected state in time. Everything else aborts the run.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
