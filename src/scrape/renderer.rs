//! Headless-browser page rendering over the W3C WebDriver protocol.
//!
//! Yahoo Finance news listings are rendered client-side and lazy-load more
//! articles as the page scrolls, so a plain HTTP GET returns almost nothing
//! useful. This module drives a real headless Chrome through a chromedriver
//! endpoint: create an isolated session, navigate, wait for the page to
//! settle, best-effort dismiss the consent interstitial, scroll to the bottom
//! a bounded number of times to trigger lazy loading, and capture the final
//! document markup.
//!
//! The protocol is plain JSON over HTTP, spoken directly with `reqwest` —
//! one POST/GET per WebDriver command. The session is deleted on every exit
//! path so no browser process outlives a render call.
//!
//! # Failure model
//!
//! A single attempt, no retry: if the session cannot be created or navigation
//! fails, the render fails with [`Error::Fetch`] and the caller decides what
//! to do with that ticker. The consent overlay is the one exception — its
//! absence is normal and never an error.

use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::errors::{Error, Result};

/// W3C identifier key under which element references are returned.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// XPath of the accept button on the Yahoo consent interstitial.
const CONSENT_BUTTON_XPATH: &str =
    "//*[@id=\"consent-page\"]/div/div/div/form/div[2]/div[2]/button[2]";

/// A capability that turns a URL into fully rendered document markup.
///
/// The one production implementation is [`WebDriverRenderer`]; tests supply
/// canned HTML through their own implementations so the extraction pipeline
/// can run without a browser.
pub trait PageRenderer {
    /// Render `url` and return the final document markup.
    async fn render(&self, url: &str) -> Result<String>;
}

/// Tunable waits and endpoint for [`WebDriverRenderer`].
///
/// The defaults mirror the page behavior this scraper was built against:
/// a 3 second settle after navigation, then 5 scroll passes with 2 seconds
/// each for lazy-loaded content to arrive.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Base URL of the chromedriver endpoint.
    pub webdriver_url: String,
    /// Wait after initial navigation before touching the page.
    pub settle: Duration,
    /// Number of scroll-to-bottom passes.
    pub scroll_passes: u32,
    /// Wait after each scroll pass.
    pub scroll_wait: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            settle: Duration::from_secs(3),
            scroll_passes: 5,
            scroll_wait: Duration::from_secs(2),
        }
    }
}

/// Drives a headless Chrome session through a chromedriver endpoint.
pub struct WebDriverRenderer {
    http: reqwest::Client,
    config: RendererConfig,
}

impl WebDriverRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Issue one WebDriver command and unwrap the `value` payload.
    ///
    /// WebDriver errors come back as `{"value": {"error": ..., "message":
    /// ...}}`; those are surfaced as [`Error::Fetch`] with the remote
    /// message attached.
    async fn command(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.config.webdriver_url.trim_end_matches('/'), path);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;

        let value = payload.get("value").cloned().unwrap_or(Value::Null);
        if !status.is_success() {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("webdriver command failed");
            return Err(Error::Fetch(format!("{path}: {message}")));
        }
        Ok(value)
    }

    /// Create a fresh headless Chrome session and return its id.
    async fn new_session(&self) -> Result<String> {
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            "--headless=new",
                            "--disable-gpu",
                            "--window-size=1920,1080",
                        ]
                    }
                }
            }
        });
        let value = self
            .command(reqwest::Method::POST, "/session", Some(capabilities))
            .await?;
        value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Fetch("webdriver did not return a session id".to_string()))
    }

    async fn delete_session(&self, session: &str) {
        let path = format!("/session/{session}");
        if let Err(e) = self.command(reqwest::Method::DELETE, &path, None).await {
            warn!(error = %e, "Failed to tear down webdriver session");
        } else {
            debug!(session, "Webdriver session closed");
        }
    }

    async fn navigate(&self, session: &str, url: &str) -> Result<()> {
        let path = format!("/session/{session}/url");
        self.command(reqwest::Method::POST, &path, Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn execute_script(&self, session: &str, script: &str) -> Result<Value> {
        let path = format!("/session/{session}/execute/sync");
        self.command(
            reqwest::Method::POST,
            &path,
            Some(json!({ "script": script, "args": [] })),
        )
        .await
    }

    async fn page_source(&self, session: &str) -> Result<String> {
        let path = format!("/session/{session}/source");
        let value = self.command(reqwest::Method::GET, &path, None).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Fetch("page source was not a string".to_string()))
    }

    /// Best-effort dismissal of the cookie/consent interstitial.
    ///
    /// Returns `true` if the known consent button was found and clicked.
    /// The overlay only appears for some regions and sessions, so failure to
    /// locate or click it is expected and never an error.
    async fn try_dismiss_consent(&self, session: &str) -> bool {
        let find = json!({ "using": "xpath", "value": CONSENT_BUTTON_XPATH });
        let path = format!("/session/{session}/element");
        let element = match self.command(reqwest::Method::POST, &path, Some(find)).await {
            Ok(value) => value
                .get(ELEMENT_KEY)
                .and_then(Value::as_str)
                .map(str::to_string),
            Err(_) => None,
        };

        match element {
            Some(element_id) => {
                let click = format!("/session/{session}/element/{element_id}/click");
                match self.command(reqwest::Method::POST, &click, Some(json!({}))).await {
                    Ok(_) => {
                        info!("Dismissed consent interstitial");
                        true
                    }
                    Err(e) => {
                        debug!(error = %e, "Consent button found but click failed");
                        false
                    }
                }
            }
            None => {
                debug!("No consent interstitial present");
                false
            }
        }
    }

    /// Everything that happens inside a live session. Split out so the
    /// caller can guarantee teardown around it regardless of outcome.
    async fn render_in_session(&self, session: &str, url: &str) -> Result<String> {
        self.navigate(session, url).await?;
        sleep(self.config.settle).await;

        self.try_dismiss_consent(session).await;

        for pass in 0..self.config.scroll_passes {
            self.execute_script(session, "window.scrollTo(0, document.body.scrollHeight);")
                .await?;
            debug!(pass = pass + 1, "Scrolled to bottom");
            sleep(self.config.scroll_wait).await;
        }

        self.page_source(session).await
    }
}

impl PageRenderer for WebDriverRenderer {
    #[instrument(level = "info", skip(self))]
    async fn render(&self, url: &str) -> Result<String> {
        let session = self.new_session().await.map_err(|e| match e {
            Error::Http(inner) => Error::Fetch(format!(
                "webdriver endpoint {} unreachable: {inner}",
                self.config.webdriver_url
            )),
            other => other,
        })?;
        debug!(session = %session, "Webdriver session created");

        // Teardown must run on the error path too.
        let result = self.render_in_session(&session, url).await;
        self.delete_session(&session).await;

        let html = result?;
        info!(bytes = html.len(), "Captured rendered page");
        Ok(html)
    }
}
