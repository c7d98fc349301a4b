//! Minimal W3C WebDriver client: just the commands the page flow needs.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::cli::Browser;
use crate::error::{Error, Result};
use crate::navigator::{ElementHandle, Locator, PageNavigator, Session};

/// Key under which the protocol serialises element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const REMOVE_SCRIPT: &str = "var el = arguments[0]; el.parentNode.removeChild(el);";

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

pub struct WebDriverSession {
    client: Client,
    base_url: String,
    session_id: String,
}

impl WebDriverSession {
    /// Opens a new browser session on the driver at `base_url`.
    pub async fn start(base_url: &str, browser: Browser, headless: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("atlas-dl/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        let base_url = base_url.trim_end_matches('/').to_string();

        let body = json!({ "capabilities": { "alwaysMatch": capabilities(browser, headless) } });
        let value = send(&client, Method::POST, &format!("{base_url}/session"), Some(body))
            .await?
            .map_err(|e| Error::navigation(format!("could not start browser session: {}: {}", e.error, e.message)))?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::navigation("new session reply has no sessionId"))?
            .to_string();
        debug!(%session_id, browser = browser.capability_name(), "browser session started");

        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    async fn call(&self, method: Method, tail: &str, body: Option<Value>) -> Result<std::result::Result<Value, WireError>> {
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, tail);
        send(&self.client, method, &url, body).await
    }

    async fn command(&self, method: Method, tail: &str, body: Option<Value>) -> Result<Value> {
        self.call(method, tail, body)
            .await?
            .map_err(|e| Error::navigation(format!("{tail}: {}: {}", e.error, e.message)))
    }
}

#[async_trait]
impl PageNavigator for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!(url, "navigate");
        self.command(Method::POST, "/url", Some(json!({ "url": url }))).await?;
        Ok(())
    }

    async fn find_element(&mut self, locator: &Locator) -> Result<Option<ElementHandle>> {
        match self.call(Method::POST, "/element", Some(locator_body(locator))).await? {
            Ok(value) => element_ref(&value).map(Some),
            Err(e) if e.error == "no such element" => Ok(None),
            Err(e) => Err(Error::navigation(format!("find {locator}: {}: {}", e.error, e.message))),
        }
    }

    async fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let value = self
            .command(Method::POST, "/elements", Some(locator_body(locator)))
            .await?;
        element_refs(&value)
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<()> {
        debug!(element = %element.0, "click");
        self.command(Method::POST, &format!("/element/{}/click", element.0), Some(json!({})))
            .await?;
        Ok(())
    }

    async fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        let value = self
            .command(Method::GET, &format!("/element/{}/attribute/{name}", element.0), None)
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn select_options(&mut self, element: &ElementHandle) -> Result<Vec<ElementHandle>> {
        let body = json!({ "using": "css selector", "value": "option" });
        let value = self
            .command(Method::POST, &format!("/element/{}/elements", element.0), Some(body))
            .await?;
        element_refs(&value)
    }

    async fn remove(&mut self, element: &ElementHandle) -> Result<()> {
        let body = json!({ "script": REMOVE_SCRIPT, "args": [{ ELEMENT_KEY: element.0 }] });
        self.command(Method::POST, "/execute/sync", Some(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl Session for WebDriverSession {
    /// Ends the session and shuts the browser window.
    async fn close(self) -> Result<()> {
        self.command(Method::DELETE, "", None).await?;
        debug!(session_id = %self.session_id, "browser session closed");
        Ok(())
    }
}

async fn send(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<std::result::Result<Value, WireError>> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request
        .send()
        .await
        .map_err(|e| Error::navigation(format!("webdriver unreachable at {url}: {e}")))?;
    let status = response.status();
    let mut reply: Value = response
        .json()
        .await
        .map_err(|e| Error::navigation(format!("unreadable webdriver reply from {url}: {e}")))?;
    let value = reply.get_mut("value").map(Value::take).unwrap_or(Value::Null);

    if status.is_success() {
        Ok(Ok(value))
    } else {
        let wire = serde_json::from_value(value).unwrap_or_else(|_| WireError {
            error: status.to_string(),
            message: String::new(),
        });
        Ok(Err(wire))
    }
}

pub fn capabilities(browser: Browser, headless: bool) -> Value {
    let mut caps = json!({ "browserName": browser.capability_name() });
    if headless {
        let (key, arg) = match browser {
            Browser::Edge => ("ms:edgeOptions", "--headless=new"),
            Browser::Chrome => ("goog:chromeOptions", "--headless=new"),
            Browser::Firefox => ("moz:firefoxOptions", "-headless"),
        };
        caps[key] = json!({ "args": [arg] });
    }
    caps
}

/// The protocol has no id strategy; an attribute selector stands in for it.
pub fn locator_body(locator: &Locator) -> Value {
    let escaped = locator.as_id().replace('\\', "\\\\").replace('"', "\\\"");
    json!({ "using": "css selector", "value": format!("[id=\"{escaped}\"]") })
}

fn element_ref(value: &Value) -> Result<ElementHandle> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get("ELEMENT"))
        .and_then(Value::as_str)
        .map(|id| ElementHandle(id.to_string()))
        .ok_or_else(|| Error::navigation(format!("not an element reference: {value}")))
}

fn element_refs(value: &Value) -> Result<Vec<ElementHandle>> {
    value
        .as_array()
        .ok_or_else(|| Error::navigation(format!("expected element list, got {value}")))?
        .iter()
        .map(element_ref)
        .collect()
}
