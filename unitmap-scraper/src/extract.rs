use crate::driver::Driver;
use crate::error::Result;
use crate::levels::{LevelSpec, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Bound on waiting for an option-list container to appear.
pub const LIST_WAIT: Duration = Duration::from_secs(20);

/// Settle delay after each viewport scroll, giving virtualized rows time to
/// mount.
pub const SCROLL_SETTLE: Duration = Duration::from_millis(100);

/// How a level's option list is rendered, and therefore how it must be read.
///
/// `Virtualized` carries the selector of the scrollable viewport and of the
/// rendered row texts inside it; only a window of rows exists in the DOM at
/// any moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractStrategy {
    Static,
    Virtualized { viewport: Selector, rows: Selector },
}

/// Read the currently offered option labels for `level` using its configured
/// strategy.
pub async fn extract_options(driver: &dyn Driver, level: &LevelSpec) -> Result<Vec<String>> {
    match &level.strategy {
        ExtractStrategy::Static => extract_static(driver, &level.options).await,
        ExtractStrategy::Virtualized { viewport, rows } => {
            extract_virtualized(driver, &level.options, viewport, rows).await
        }
    }
}

/// Every option is already in the DOM: one pass, rendered order preserved.
/// A missing container is a `Timeout` and propagates to the caller.
pub async fn extract_static(driver: &dyn Driver, options: &Selector) -> Result<Vec<String>> {
    driver.wait_for(options, LIST_WAIT).await?;
    let items = driver.texts(options).await?;
    Ok(items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

/// Only a scroll window of options exists at a time. Accumulate rendered row
/// texts into a set while scrolling one viewport height per step; stop once
/// the bottom is reached and the total scrollable height did not change since
/// the previous step. A vanished or absent viewport yields an empty list, not
/// an error: the list may be legitimately empty in that state.
pub async fn extract_virtualized(
    driver: &dyn Driver,
    options: &Selector,
    viewport: &Selector,
    rows: &Selector,
) -> Result<Vec<String>> {
    driver.wait_for(options, LIST_WAIT).await?;
    if driver.scroll_metrics(viewport).await?.is_none() {
        return Ok(Vec::new());
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut previous_total = -1.0_f64;

    loop {
        for text in driver.texts(rows).await? {
            let text = text.trim();
            if !text.is_empty() {
                seen.insert(text.to_string());
            }
        }

        let Some(metrics) = driver.scroll_metrics(viewport).await? else {
            break;
        };
        #[allow(clippy::float_cmp)]
        if metrics.at_bottom() && metrics.total == previous_total {
            debug!("reached stable end of scrollable content");
            break;
        }
        // Reaching the bottom while the height still grows means rows are
        // streaming in at the boundary; the extra lap picks them up.
        driver.scroll_by(viewport, metrics.viewport).await?;
        previous_total = metrics.total;
        driver.pause(SCROLL_SETTLE).await;
    }

    Ok(seen.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ScrollMetrics;
    use crate::error::ScrapeError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted list widget: `windows[i]` and `metrics[i]` describe what the
    /// page renders after `i` scroll steps.
    struct ScrollingList {
        present: bool,
        has_viewport: bool,
        windows: Vec<Vec<&'static str>>,
        metrics: Vec<ScrollMetrics>,
        step: Mutex<usize>,
    }

    impl ScrollingList {
        fn step(&self) -> usize {
            *self.step.lock().unwrap()
        }
    }

    #[async_trait]
    impl Driver for ScrollingList {
        async fn goto(&self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn wait_for(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
            if self.present {
                Ok(())
            } else {
                Err(ScrapeError::Timeout(selector.to_string()))
            }
        }

        async fn texts(&self, _selector: &Selector) -> Result<Vec<String>> {
            let window = &self.windows[self.step().min(self.windows.len() - 1)];
            Ok(window.iter().map(|s| s.to_string()).collect())
        }

        async fn fill_by_label(&self, _label: &str, _value: &str) -> Result<()> {
            unreachable!("extraction never fills")
        }

        async fn click_nth(&self, _selector: &Selector, _index: usize) -> Result<()> {
            unreachable!("extraction never clicks")
        }

        async fn scroll_by(&self, _selector: &Selector, _delta: f64) -> Result<()> {
            *self.step.lock().unwrap() += 1;
            Ok(())
        }

        async fn scroll_metrics(&self, _selector: &Selector) -> Result<Option<ScrollMetrics>> {
            if !self.has_viewport {
                return Ok(None);
            }
            Ok(Some(self.metrics[self.step().min(self.metrics.len() - 1)]))
        }

        async fn send_escape(&self) -> Result<()> {
            unreachable!("extraction never sends keys")
        }

        async fn pause(&self, _duration: Duration) {}
    }

    fn list(windows: Vec<Vec<&'static str>>, metrics: Vec<ScrollMetrics>) -> ScrollingList {
        ScrollingList {
            present: true,
            has_viewport: true,
            windows,
            metrics,
            step: Mutex::new(0),
        }
    }

    fn m(top: f64, viewport: f64, total: f64) -> ScrollMetrics {
        ScrollMetrics {
            top,
            viewport,
            total,
        }
    }

    fn options() -> Selector {
        Selector::css("ul.options li")
    }

    fn viewport() -> Selector {
        Selector::css("[data-test-id=scroller]")
    }

    fn rows() -> Selector {
        Selector::css("li[role=option]")
    }

    #[tokio::test]
    async fn static_trims_drops_empties_and_keeps_order() {
        let driver = list(vec![vec!["  T1 ", "", "T2", "   ", "T10"]], vec![]);
        let items = extract_static(&driver, &options()).await.unwrap();
        assert_eq!(items, vec!["T1", "T2", "T10"]);
    }

    #[tokio::test]
    async fn static_timeout_propagates() {
        let mut driver = list(vec![vec![]], vec![]);
        driver.present = false;
        let err = extract_static(&driver, &options()).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn virtualized_collects_across_windows_and_dedups() {
        let driver = list(
            vec![
                vec!["Alpha", "Beta"],
                vec!["Beta", "Gamma"],
                vec!["Gamma"],
            ],
            vec![m(0.0, 100.0, 300.0), m(100.0, 100.0, 300.0), m(200.0, 100.0, 300.0)],
        );
        let mut items = extract_virtualized(&driver, &options(), &viewport(), &rows())
            .await
            .unwrap();
        items.sort();
        assert_eq!(items, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(driver.step(), 2);
    }

    #[tokio::test]
    async fn virtualized_keeps_going_while_height_grows_at_bottom() {
        // The window hits the bottom twice while content is still streaming
        // in; only a repeated total height stops the loop.
        let driver = list(
            vec![vec!["A"], vec!["B"], vec!["C"]],
            vec![m(0.0, 100.0, 100.0), m(100.0, 100.0, 200.0), m(100.0, 100.0, 200.0)],
        );
        let mut items = extract_virtualized(&driver, &options(), &viewport(), &rows())
            .await
            .unwrap();
        items.sort();
        assert_eq!(items, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn virtualized_without_viewport_is_empty_not_an_error() {
        let mut driver = list(vec![vec!["never read"]], vec![]);
        driver.has_viewport = false;
        let items = extract_virtualized(&driver, &options(), &viewport(), &rows())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn virtualized_missing_container_times_out() {
        let mut driver = list(vec![vec![]], vec![]);
        driver.present = false;
        let err = extract_virtualized(&driver, &options(), &viewport(), &rows())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
