//! Atlassian download pages: from a product URL to the list of releases it offers.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::catalog::Product;
use crate::error::{Error, Result};
use crate::navigator::{ElementHandle, Locator, PageNavigator};
use crate::sync::VersionSource;
use crate::version::{latest_index, VersionEntry};

const COOKIE_PANEL_ID: &str = "onetrust-consent-sdk";
const GET_STARTED_ID: &str = "get-started";
const DOWNLOADS_BUTTON_ID: &str = "downloads-button";
const VERSION_SELECT_IDS: [&str; 2] = ["select-product-version", "select-product-standard-version"];

pub struct AtlassianPages<N> {
    navigator: N,
    settle_delay: Duration,
}

impl<N: PageNavigator> AtlassianPages<N> {
    pub fn new(navigator: N, settle_delay: Duration) -> Self {
        Self {
            navigator,
            settle_delay,
        }
    }

    pub fn into_inner(self) -> N {
        self.navigator
    }

    pub async fn list_versions(&mut self, url: &str) -> Result<Vec<VersionEntry>> {
        self.navigator.navigate(url).await?;
        tokio::time::sleep(self.settle_delay).await;

        self.dismiss_cookie_panel().await?;
        self.open_download_section().await?;

        let select = self.version_select().await?;
        let options = self.navigator.select_options(&select).await?;
        debug!(count = options.len(), "version options found");

        let mut entries = Vec::with_capacity(options.len());
        for option in &options {
            let description = self.required_attribute(option, "data-file-description").await?;
            let released = self.required_attribute(option, "data-product-release-date").await?;
            let href = self.required_attribute(option, "value").await?;
            entries.push(VersionEntry::from_attributes(&description, &released, &href)?);
        }
        Ok(entries)
    }

    async fn dismiss_cookie_panel(&mut self) -> Result<()> {
        let panel = self.require(&Locator::id(COOKIE_PANEL_ID)).await?;
        self.navigator.remove(&panel).await
    }

    /// Clicks the newest "get started" button, or the generic downloads button when there is none.
    async fn open_download_section(&mut self) -> Result<()> {
        let buttons = self.navigator.find_elements(&Locator::id(GET_STARTED_ID)).await?;
        let mut tagged = Vec::with_capacity(buttons.len());
        for button in buttons {
            if let Some(tag) = self.navigator.attribute(&button, "data-version").await? {
                tagged.push((button, tag));
            }
        }

        let tags: Vec<&str> = tagged.iter().map(|(_, tag)| tag.as_str()).collect();
        if let Some(i) = latest_index(&tags) {
            let (button, tag) = &tagged[i];
            info!(version = %tag, "opening latest release");
            return self.navigator.click(button).await;
        }

        let fallback = self.require(&Locator::id(DOWNLOADS_BUTTON_ID)).await?;
        self.navigator.click(&fallback).await
    }

    async fn version_select(&mut self) -> Result<ElementHandle> {
        for id in VERSION_SELECT_IDS {
            if let Some(select) = self.navigator.find_element(&Locator::id(id)).await? {
                return Ok(select);
            }
        }
        Err(Error::navigation(format!(
            "no version dropdown (tried #{})",
            VERSION_SELECT_IDS.join(", #")
        )))
    }

    async fn require(&mut self, locator: &Locator) -> Result<ElementHandle> {
        self.navigator
            .find_element(locator)
            .await?
            .ok_or_else(|| Error::navigation(format!("element {locator} not found")))
    }

    async fn required_attribute(&mut self, element: &ElementHandle, name: &str) -> Result<String> {
        self.navigator
            .attribute(element, name)
            .await?
            .ok_or_else(|| Error::navigation(format!("version option without {name}")))
    }
}

#[async_trait]
impl<N: PageNavigator> VersionSource for AtlassianPages<N> {
    async fn versions(&mut self, product: &Product) -> Result<Vec<VersionEntry>> {
        self.list_versions(&product.url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scripted page: elements per locator and attributes per element.
    #[derive(Default)]
    struct FakePage {
        elements: HashMap<Locator, Vec<ElementHandle>>,
        children: HashMap<ElementHandle, Vec<ElementHandle>>,
        attributes: HashMap<(ElementHandle, String), String>,
        visited: Vec<String>,
        clicked: Vec<ElementHandle>,
        removed: Vec<ElementHandle>,
    }

    impl FakePage {
        fn element(&mut self, locator: Locator, id: &str) -> ElementHandle {
            let handle = ElementHandle(id.to_string());
            self.elements.entry(locator).or_default().push(handle.clone());
            handle
        }

        fn attr(&mut self, element: &ElementHandle, name: &str, value: &str) {
            self.attributes
                .insert((element.clone(), name.to_string()), value.to_string());
        }

        fn option(&mut self, select: &ElementHandle, id: &str, desc: &str, date: &str, url: &str) {
            let option = ElementHandle(id.to_string());
            self.children.entry(select.clone()).or_default().push(option.clone());
            self.attr(&option, "data-file-description", desc);
            self.attr(&option, "data-product-release-date", date);
            self.attr(&option, "value", url);
        }

        fn with_cookie_panel() -> Self {
            let mut page = FakePage::default();
            page.element(Locator::id(COOKIE_PANEL_ID), "cookies");
            page
        }
    }

    #[async_trait]
    impl PageNavigator for FakePage {
        async fn navigate(&mut self, url: &str) -> Result<()> {
            self.visited.push(url.to_string());
            Ok(())
        }

        async fn find_element(&mut self, locator: &Locator) -> Result<Option<ElementHandle>> {
            Ok(self.elements.get(locator).and_then(|e| e.first().cloned()))
        }

        async fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
            Ok(self.elements.get(locator).cloned().unwrap_or_default())
        }

        async fn click(&mut self, element: &ElementHandle) -> Result<()> {
            self.clicked.push(element.clone());
            Ok(())
        }

        async fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
            Ok(self.attributes.get(&(element.clone(), name.to_string())).cloned())
        }

        async fn select_options(&mut self, element: &ElementHandle) -> Result<Vec<ElementHandle>> {
            Ok(self.children.get(element).cloned().unwrap_or_default())
        }

        async fn remove(&mut self, element: &ElementHandle) -> Result<()> {
            self.removed.push(element.clone());
            Ok(())
        }
    }

    fn pages(page: FakePage) -> AtlassianPages<FakePage> {
        AtlassianPages::new(page, Duration::ZERO)
    }

    #[tokio::test]
    async fn clicks_highest_get_started_button() {
        let mut page = FakePage::with_cookie_panel();
        let old = page.element(Locator::id(GET_STARTED_ID), "btn-old");
        page.attr(&old, "data-version", "5.2.0");
        let new = page.element(Locator::id(GET_STARTED_ID), "btn-new");
        page.attr(&new, "data-version", "5.10.0");
        let select = page.element(Locator::id("select-product-version"), "select");
        page.option(&select, "o1", "Crowd 5.10.0", "12-Feb-2024", "https://example.com/crowd-5.10.0.zip");

        let mut pages = pages(page);
        let entries = pages.list_versions("https://example.com/crowd").await.unwrap();
        let page = pages.into_inner();

        assert_eq!(page.clicked, vec![new]);
        assert_eq!(page.removed, vec![ElementHandle("cookies".into())]);
        assert_eq!(page.visited, vec!["https://example.com/crowd".to_string()]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].directory_name(), "Crowd 5.10.0 (2024-02)");
    }

    #[tokio::test]
    async fn falls_back_to_downloads_button_and_standard_select() {
        let mut page = FakePage::with_cookie_panel();
        let downloads = page.element(Locator::id(DOWNLOADS_BUTTON_ID), "downloads");
        let select = page.element(Locator::id("select-product-standard-version"), "select");
        page.option(&select, "o1", "Jira Software 9.4", "01-Dec-2022", "https://example.com/jira-9.4.tar.gz");
        page.option(&select, "o2", "Jira Software 9.3", "03-Oct-2022", "https://example.com/jira-9.3.tar.gz");

        let mut pages = pages(page);
        let entries = pages.list_versions("https://example.com/jira").await.unwrap();

        assert_eq!(pages.into_inner().clicked, vec![downloads]);
        let names: Vec<_> = entries.iter().map(|e| e.directory_name()).collect();
        assert_eq!(names, ["Jira Software 9.4 (2022-12)", "Jira Software 9.3 (2022-10)"]);
    }

    #[tokio::test]
    async fn missing_downloads_button_is_fatal() {
        let page = FakePage::with_cookie_panel();
        let err = pages(page).list_versions("https://example.com/x").await.unwrap_err();
        assert!(matches!(err, Error::Navigation(ref m) if m.contains(DOWNLOADS_BUTTON_ID)));
    }

    #[tokio::test]
    async fn missing_dropdown_is_fatal() {
        let mut page = FakePage::with_cookie_panel();
        page.element(Locator::id(DOWNLOADS_BUTTON_ID), "downloads");
        let err = pages(page).list_versions("https://example.com/x").await.unwrap_err();
        assert!(matches!(err, Error::Navigation(_)));
    }

    #[tokio::test]
    async fn option_without_url_is_fatal() {
        let mut page = FakePage::with_cookie_panel();
        page.element(Locator::id(DOWNLOADS_BUTTON_ID), "downloads");
        let select = page.element(Locator::id("select-product-version"), "select");
        let option = ElementHandle("o1".into());
        page.children.insert(select, vec![option.clone()]);
        page.attr(&option, "data-file-description", "Bamboo 9.2");
        page.attr(&option, "data-product-release-date", "10-Jan-2023");

        let err = pages(page).list_versions("https://example.com/x").await.unwrap_err();
        assert!(err.to_string().contains("value"));
    }
}
