//! Rendered catalog of endpoint cards.
//!
//! `CatalogView` is built from a `SettingsDocument` and carries one
//! visibility flag per card and per category. The search filter operates
//! on this typed view instead of on rendered text.

use crate::document::{Category, Endpoint, EndpointStatus, SettingsDocument};

/// One endpoint card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Index of the owning category.
    pub category: usize,
    /// Index of the endpoint within its category.
    pub endpoint: usize,
    /// Card title (endpoint name).
    pub title: String,
    /// Card description.
    pub description: String,
    /// Endpoint status, drives the badge.
    pub status: EndpointStatus,
    /// Whether the card matches the current search.
    pub visible: bool,
}

/// A category group of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    /// Category title.
    pub title: String,
    /// Subtitle line under the title.
    pub subtitle: String,
    /// Cards in display order.
    pub cards: Vec<CardView>,
    /// Whether any card of the category is visible.
    pub visible: bool,
}

/// The whole rendered catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogView {
    categories: Vec<CategoryView>,
    endpoint_count: usize,
}

impl CardView {
    fn new(category: usize, endpoint: usize, item: &Endpoint) -> Self {
        Self {
            category,
            endpoint,
            title: item.name.clone(),
            description: item.desc.clone(),
            status: item.status.clone(),
            visible: true,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

impl CategoryView {
    fn new(index: usize, category: &Category) -> Self {
        Self {
            title: category.name.clone(),
            subtitle: format!("Explore {} endpoints", category.name.to_lowercase()),
            cards: category
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| CardView::new(index, i, item))
                .collect(),
            visible: true,
        }
    }
}

impl CatalogView {
    /// Renders the catalog for a document. All cards start visible.
    #[must_use]
    pub fn render(document: &SettingsDocument) -> Self {
        let categories: Vec<CategoryView> = document
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| CategoryView::new(i, c))
            .collect();
        let endpoint_count = categories.iter().map(|c| c.cards.len()).sum();

        Self {
            categories,
            endpoint_count,
        }
    }

    /// Category groups in display order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryView] {
        &self.categories
    }

    /// Total number of endpoint cards.
    #[must_use]
    pub const fn endpoint_count(&self) -> usize {
        self.endpoint_count
    }

    /// Number of cards currently visible.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.cards)
            .filter(|card| card.visible)
            .count()
    }

    /// Applies a search query.
    ///
    /// Matching is a case-insensitive substring test on card title and
    /// description. A blank query shows everything. A category stays
    /// visible while at least one of its cards matches.
    pub fn apply_filter(&mut self, query: &str) {
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            for category in &mut self.categories {
                category.visible = true;
                for card in &mut category.cards {
                    card.visible = true;
                }
            }
            return;
        }

        for category in &mut self.categories {
            let mut any = false;
            for card in &mut category.cards {
                card.visible = card.matches(&needle);
                any |= card.visible;
            }
            category.visible = any;
        }
    }
}
