use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub url: String,
}

impl Product {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Products to sync, in run order. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

const ATLASSIAN_PRODUCTS: &[(&str, &str)] = &[
    ("Bamboo", "https://www.atlassian.com/software/bamboo/download"),
    ("Bitbucket Server", "https://www.atlassian.com/software/bitbucket/download-archives"),
    ("Confluence", "https://www.atlassian.com/software/confluence/download-archives"),
    ("Crowd", "https://www.atlassian.com/software/crowd/download-archive"),
    ("Crucible", "https://www.atlassian.com/software/crucible/download"),
    ("Fisheye", "https://www.atlassian.com/software/fisheye/download"),
    ("Jira Core Server", "https://www.atlassian.com/software/jira/core/download"),
    (
        "Jira Service Management Server",
        "https://www.atlassian.com/software/jira/service-management/download-archives",
    ),
    ("Jira Software", "https://www.atlassian.com/software/jira/update"),
];

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            if product.name.trim().is_empty() {
                return Err(Error::config("product name must not be empty"));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate product name {:?}",
                    product.name
                )));
            }
            url::Url::parse(&product.url).map_err(|e| {
                Error::config(format!("invalid url for {:?}: {e}", product.name))
            })?;
        }
        Ok(Self { products })
    }

    pub fn atlassian() -> Self {
        Self {
            products: ATLASSIAN_PRODUCTS
                .iter()
                .map(|(name, url)| Product::new(*name, *url))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Keeps only the named products, in catalog order.
    pub fn restrict(&self, names: &[String]) -> Result<Self> {
        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(Error::config(format!("unknown product {unknown:?}")));
        }
        Ok(Self {
            products: self
                .products
                .iter()
                .filter(|p| names.contains(&p.name))
                .cloned()
                .collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::atlassian()
    }
}

impl<'de> Deserialize<'de> for ProductCatalog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let products = Vec::<Product>::deserialize(deserializer)?;
        ProductCatalog::new(products).map_err(serde::de::Error::custom)
    }
}
