//! Browser capabilities the page flow relies on.
//!
//! Element handles are opaque ids issued by the navigator that produced them
//! and are only meaningful until the next navigation.

use async_trait::async_trait;
use std::fmt;

use crate::error::Result;

/// Element located by its `id` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator(id.into())
    }

    pub fn as_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub String);

#[async_trait]
pub trait PageNavigator: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// First match, or None when nothing matches.
    async fn find_element(&mut self, locator: &Locator) -> Result<Option<ElementHandle>>;

    async fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>>;

    async fn click(&mut self, element: &ElementHandle) -> Result<()>;

    async fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>>;

    /// `<option>` children of a native `<select>`, in document order.
    async fn select_options(&mut self, element: &ElementHandle) -> Result<Vec<ElementHandle>>;

    /// Detaches the element from the DOM.
    async fn remove(&mut self, element: &ElementHandle) -> Result<()>;
}

/// A navigator holding a browser that must be released when the run ends.
#[async_trait]
pub trait Session: PageNavigator + Sized {
    async fn close(self) -> Result<()>;
}
