//! Two-level index of guides: product -> problem category -> guide ids.
//!
//! Guides are referenced by id only; the catalog never embeds them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{timestamp, CategoryId, GuideId, ProductId};

pub const DEFAULT_MANUFACTURER: &str = "Generic Corp";
pub const DEFAULT_PRODUCT_VERSION: &str = "1.0";

fn default_manufacturer() -> String {
    DEFAULT_MANUFACTURER.to_string()
}

fn default_product_version() -> String {
    DEFAULT_PRODUCT_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemCategory {
    pub category_id: CategoryId,
    pub category_name: String,
    pub description: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub guide_ids: Vec<GuideId>,
}

impl ProblemCategory {
    pub fn new(
        category_id: impl Into<CategoryId>,
        category_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            category_name: category_name.into(),
            description: description.into(),
            icon_name: None,
            guide_ids: Vec::new(),
        }
    }

    /// Append a guide id; ids already listed are ignored.
    pub fn add_guide(&mut self, guide_id: impl Into<GuideId>) {
        let guide_id = guide_id.into();
        if !self.guide_ids.contains(&guide_id) {
            debug!("added guide {} to category {}", guide_id, self.category_name);
            self.guide_ids.push(guide_id);
        }
    }

    pub fn remove_guide(&mut self, guide_id: &str) -> bool {
        match self.guide_ids.iter().position(|g| g == guide_id) {
            Some(pos) => {
                self.guide_ids.remove(pos);
                debug!("removed guide {} from category {}", guide_id, self.category_name);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, guide_id: &str) -> bool {
        self.guide_ids.iter().any(|g| g == guide_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    pub description: String,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default = "default_product_version")]
    pub version: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub problem_categories: BTreeMap<CategoryId, ProblemCategory>,
}

impl Product {
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            description: description.into(),
            manufacturer: default_manufacturer(),
            version: default_product_version(),
            icon_name: None,
            problem_categories: BTreeMap::new(),
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Insert or replace a category under its own id.
    pub fn add_category(&mut self, category: ProblemCategory) {
        debug!(
            "added category {} to product {}",
            category.category_name, self.product_name
        );
        self.problem_categories
            .insert(category.category_id.clone(), category);
    }

    pub fn remove_category(&mut self, category_id: &str) -> bool {
        let removed = self.problem_categories.remove(category_id).is_some();
        if removed {
            debug!("removed category {} from product {}", category_id, self.product_name);
        }
        removed
    }

    pub fn category(&self, category_id: &str) -> Option<&ProblemCategory> {
        self.problem_categories.get(category_id)
    }

    pub fn category_mut(&mut self, category_id: &str) -> Option<&mut ProblemCategory> {
        self.problem_categories.get_mut(category_id)
    }

    /// Guide ids of every category, in category order.
    pub fn all_guide_ids(&self) -> Vec<&GuideId> {
        self.problem_categories
            .values()
            .flat_map(|c| c.guide_ids.iter())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStatistics {
    pub total_products: usize,
    pub total_categories: usize,
    pub total_guides: usize,
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: BTreeMap<ProductId, Product>,
    #[serde(default = "Utc::now", with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            products: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }

    /// Insert or replace a product under its own id.
    pub fn add_product(&mut self, product: Product) {
        info!("added product {} to catalog", product.product_name);
        self.products.insert(product.product_id.clone(), product);
        self.touch();
    }

    pub fn remove_product(&mut self, product_id: &str) -> bool {
        if self.products.remove(product_id).is_none() {
            return false;
        }
        info!("removed product {} from catalog", product_id);
        self.touch();
        true
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Mutable access; call [`Catalog::touch`] after editing.
    pub fn product_mut(&mut self, product_id: &str) -> Option<&mut Product> {
        self.products.get_mut(product_id)
    }

    /// Case-insensitive lookup by display name.
    pub fn product_by_name(&self, name: &str) -> Option<&Product> {
        let name = name.to_lowercase();
        self.products
            .values()
            .find(|p| p.product_name.to_lowercase() == name)
    }

    /// First product/category (in id order) listing the guide.
    pub fn find_guide_location(&self, guide_id: &str) -> Option<(ProductId, CategoryId)> {
        self.products.values().find_map(|product| {
            product
                .problem_categories
                .values()
                .find(|c| c.contains(guide_id))
                .map(|c| (product.product_id.clone(), c.category_id.clone()))
        })
    }

    pub fn statistics(&self) -> CatalogStatistics {
        CatalogStatistics {
            total_products: self.products.len(),
            total_categories: self
                .products
                .values()
                .map(|p| p.problem_categories.len())
                .sum(),
            total_guides: self.products.values().map(|p| p.all_guide_ids().len()).sum(),
            last_updated: self.last_updated,
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Small sample catalog used when no catalog file is available.
    pub fn default_catalog() -> Self {
        let mut catalog = Self::new();

        let mut toaster = Product::new(
            "smart-toaster-3000",
            "Smart Toaster 3000",
            "Connected toaster with opinions about your breakfast",
        )
        .with_manufacturer("ToastTech Industries")
        .with_version("3.0.1");

        let mut toast = ProblemCategory::new(
            "toast-problems",
            "Toast Malfunctions",
            "Toast comes out wrong",
        );
        toast.add_guide("toast-too-dark");
        toast.add_guide("toast-too-light");
        toast.add_guide("toast-uneven");
        toaster.add_category(toast);

        let mut connectivity = ProblemCategory::new(
            "connectivity",
            "WiFi & Bluetooth",
            "The toaster cannot reach the network",
        );
        connectivity.add_guide("toaster-wont-connect");
        toaster.add_category(connectivity);
        catalog.add_product(toaster);

        let mut coffee = Product::new(
            "quantum-coffee",
            "Quantum Coffee Maker",
            "Brews in several states at once",
        )
        .with_manufacturer("Superposition Cafe")
        .with_version("4.2.0");

        let mut quantum = ProblemCategory::new(
            "quantum-issues",
            "Quantum Anomalies",
            "Coffee that is hot and cold at the same time",
        );
        quantum.add_guide("coffee-both-hot-and-cold");
        quantum.add_guide("coffee-exists-doesnt-exist");
        coffee.add_category(quantum);
        catalog.add_product(coffee);

        catalog
    }
}
