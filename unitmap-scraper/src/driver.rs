use crate::error::{Result, ScrapeError};
use crate::levels::Selector;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default bound on interactive waits (fill, click).
const INTERACT_TIMEOUT: Duration = Duration::from_secs(30);

/// Scroll geometry of a scrollable element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub top: f64,
    pub viewport: f64,
    pub total: f64,
}

impl ScrollMetrics {
    /// Whether the visible window currently touches the end of the content.
    pub fn at_bottom(&self) -> bool {
        self.top + self.viewport >= self.total
    }
}

/// The capability set the traversal engine needs from a UI-automation
/// session. Everything above this trait is driver-agnostic; tests implement
/// it with scripted in-memory fakes.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate the session to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Wait until at least one element matches `selector`, failing with
    /// `ScrapeError::Timeout` after `timeout`.
    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Rendered text of every element matching `selector`, in document order.
    async fn texts(&self, selector: &Selector) -> Result<Vec<String>>;

    /// Replace the contents of the text input whose accessible label is
    /// `label` with `value`.
    async fn fill_by_label(&self, label: &str, value: &str) -> Result<()>;

    /// Click the `index`-th element matching `selector`, waiting for the
    /// match to exist first.
    async fn click_nth(&self, selector: &Selector, index: usize) -> Result<()>;

    /// Scroll the matching element forward by `delta` pixels.
    async fn scroll_by(&self, selector: &Selector, delta: f64) -> Result<()>;

    /// Scroll geometry of the matching element, or `None` when nothing
    /// matches `selector`.
    async fn scroll_metrics(&self, selector: &Selector) -> Result<Option<ScrollMetrics>>;

    /// Send one Escape key event to the focused element.
    async fn send_escape(&self) -> Result<()>;

    /// Fixed-duration settle wait.
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// WebDriver-backed session. The reference deployment runs against
/// geckodriver.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let mut caps = serde_json::map::Map::new();
        if headless {
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;
        Ok(Self { client })
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    fn locator<'a>(selector: &'a Selector) -> Locator<'a> {
        match selector {
            Selector::XPath(s) => Locator::XPath(s.as_str()),
            Selector::Css(s) => Locator::Css(s.as_str()),
        }
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<Element>> {
        Ok(self.client.find_all(Self::locator(selector)).await?)
    }

    async fn wait_element(&self, selector: &Selector, timeout: Duration) -> Result<Element> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Self::locator(selector))
            .await
        {
            Ok(element) => Ok(element),
            Err(CmdError::WaitTimeout) => Err(ScrapeError::Timeout(selector.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn script_arg(element: &Element) -> Result<serde_json::Value> {
        serde_json::to_value(element)
            .map_err(|e| ScrapeError::Other(format!("element not scriptable: {}", e)))
    }
}

#[async_trait]
impl Driver for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        self.wait_element(selector, timeout).await?;
        Ok(())
    }

    async fn texts(&self, selector: &Selector) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for element in self.find_all(selector).await? {
            texts.push(element.text().await?);
        }
        Ok(texts)
    }

    async fn fill_by_label(&self, label: &str, value: &str) -> Result<()> {
        let field = Selector::xpath(format!(
            "//input[@aria-label='{label}' or @placeholder='{label}']"
        ));
        let element = self.wait_element(&field, INTERACT_TIMEOUT).await?;
        element.clear().await?;
        element.send_keys(value).await?;
        Ok(())
    }

    async fn click_nth(&self, selector: &Selector, index: usize) -> Result<()> {
        self.wait_element(selector, INTERACT_TIMEOUT).await?;
        let elements = self.find_all(selector).await?;
        let element = elements
            .get(index)
            .ok_or_else(|| ScrapeError::Timeout(format!("{}[{}]", selector, index)))?;
        element.click().await?;
        Ok(())
    }

    async fn scroll_by(&self, selector: &Selector, delta: f64) -> Result<()> {
        let elements = self.find_all(selector).await?;
        if let Some(element) = elements.first() {
            self.client
                .execute(
                    "arguments[0].scrollBy(0, arguments[1]);",
                    vec![Self::script_arg(element)?, json!(delta)],
                )
                .await?;
        }
        Ok(())
    }

    async fn scroll_metrics(&self, selector: &Selector) -> Result<Option<ScrollMetrics>> {
        let elements = self.find_all(selector).await?;
        let Some(element) = elements.first() else {
            return Ok(None);
        };
        let value = self
            .client
            .execute(
                "const el = arguments[0]; \
                 return [el.scrollTop, el.clientHeight, el.scrollHeight];",
                vec![Self::script_arg(element)?],
            )
            .await?;
        let nums: Vec<f64> = value
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_f64()).collect())
            .unwrap_or_default();
        match nums.as_slice() {
            [top, viewport, total] => Ok(Some(ScrollMetrics {
                top: *top,
                viewport: *viewport,
                total: *total,
            })),
            _ => Err(ScrapeError::Other(format!(
                "unexpected scroll metrics payload: {}",
                value
            ))),
        }
    }

    async fn send_escape(&self) -> Result<()> {
        let escape = char::from(Key::Escape).to_string();
        self.client.active_element().await?.send_keys(&escape).await?;
        Ok(())
    }
}
