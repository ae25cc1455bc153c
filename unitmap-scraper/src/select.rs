use crate::driver::Driver;
use crate::error::Result;
use crate::extract::LIST_WAIT;
use crate::levels::LevelSpec;
use tracing::debug;

/// Commits a label on one level of the shared cascading widget.
///
/// The widget is a single stateful DOM surface reused for every sibling at a
/// level, so every attempt must end with `reset` before the next sibling is
/// tried. The crawler scopes that: commit, recurse into the subtree, then
/// reset unconditionally.
pub struct LevelSelector<'a> {
    driver: &'a dyn Driver,
    spec: &'a LevelSpec,
}

impl<'a> LevelSelector<'a> {
    pub fn new(driver: &'a dyn Driver, spec: &'a LevelSpec) -> Self {
        LevelSelector { driver, spec }
    }

    /// Narrow the option list to `label` through the level's filter field and
    /// click the first entry. Any timeout along the way surfaces to the
    /// caller, which treats it as "this sibling produced nothing".
    pub async fn commit(&self, label: &str) -> Result<()> {
        self.driver.wait_for(&self.spec.options, LIST_WAIT).await?;
        self.driver
            .fill_by_label(&self.spec.filter_label, label)
            .await?;
        self.driver.click_nth(&self.spec.options, 0).await
    }

    /// Return the widget to its closed, reusable state: two Escapes to
    /// dismiss any open popover, then one click on the level's box control.
    /// Never fails; problems are logged and swallowed.
    pub async fn reset(&self) {
        for _ in 0..2 {
            if let Err(e) = self.driver.send_escape().await {
                debug!("escape during {} reset failed: {}", self.spec.name, e);
            }
        }
        if let Err(e) = self.driver.click_nth(&self.spec.trigger, 0).await {
            debug!("{} box click during reset failed: {}", self.spec.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::extract::ExtractStrategy;
    use crate::levels::Selector;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every driver interaction; optionally fails a chosen call.
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn new(fail_on: Option<&'static str>) -> Self {
            Recorder {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn record(&self, call: impl Into<String>) -> Result<()> {
            let call = call.into();
            let op = call.split(':').next().unwrap().to_string();
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(op.as_str()) {
                Err(ScrapeError::Timeout(op))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Driver for Recorder {
        async fn goto(&self, url: &str) -> Result<()> {
            self.record(format!("goto:{url}"))
        }

        async fn wait_for(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
            self.record(format!("wait:{selector}"))
        }

        async fn texts(&self, _selector: &Selector) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn fill_by_label(&self, label: &str, value: &str) -> Result<()> {
            self.record(format!("fill:{label}={value}"))
        }

        async fn click_nth(&self, selector: &Selector, index: usize) -> Result<()> {
            self.record(format!("click:{selector}[{index}]"))
        }

        async fn scroll_by(&self, _selector: &Selector, _delta: f64) -> Result<()> {
            Ok(())
        }

        async fn scroll_metrics(
            &self,
            _selector: &Selector,
        ) -> Result<Option<crate::driver::ScrollMetrics>> {
            Ok(None)
        }

        async fn send_escape(&self) -> Result<()> {
            self.record("escape")
        }

        async fn pause(&self, _duration: Duration) {}
    }

    fn floor_spec() -> LevelSpec {
        LevelSpec {
            name: "floor",
            trigger: Selector::xpath("//div[4]/div/div"),
            options: Selector::xpath("//div[4]//ul/li"),
            filter_label: "Floor".to_string(),
            strategy: ExtractStrategy::Static,
            is_leaf: false,
        }
    }

    #[tokio::test]
    async fn commit_waits_fills_then_clicks_first_entry() {
        let driver = Recorder::new(None);
        let spec = floor_spec();
        LevelSelector::new(&driver, &spec).commit("03").await.unwrap();

        assert_eq!(
            driver.calls(),
            vec![
                "wait:xpath=//div[4]//ul/li",
                "fill:Floor=03",
                "click:xpath=//div[4]//ul/li[0]",
            ]
        );
    }

    #[tokio::test]
    async fn commit_timeout_surfaces_to_caller() {
        let driver = Recorder::new(Some("fill"));
        let spec = floor_spec();
        let err = LevelSelector::new(&driver, &spec)
            .commit("03")
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn reset_sends_two_escapes_then_reopens_the_box() {
        let driver = Recorder::new(None);
        let spec = floor_spec();
        LevelSelector::new(&driver, &spec).reset().await;

        assert_eq!(
            driver.calls(),
            vec!["escape", "escape", "click:xpath=//div[4]/div/div[0]"]
        );
    }

    #[tokio::test]
    async fn reset_swallows_driver_failures() {
        let driver = Recorder::new(Some("escape"));
        let spec = floor_spec();
        LevelSelector::new(&driver, &spec).reset().await;

        // Both escapes attempted, box still clicked.
        assert_eq!(
            driver.calls(),
            vec!["escape", "escape", "click:xpath=//div[4]/div/div[0]"]
        );
    }
}
