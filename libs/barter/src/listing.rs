//! Offer feed and own-offers view models
//!
//! The feed holds the raw offer collection fetched from the gateway and
//! derives the visible collection on demand from three inputs: the raw
//! collection, a free-text search string and a category filter. The
//! derivation is [`visible_offers`], a pure function, so it can be tested
//! without a gateway.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::gateway::OfferGateway;
use crate::models::{Category, Offer, ParseEnumError};
use crate::session::Session;

/// Category selection for the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseEnumError;

    /// `all`, or a category name spelled exactly as stored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Search string and category filter applied to the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl ListingQuery {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    /// Lowercased search needle, or `None` when the search is blank.
    ///
    /// Only the emptiness check trims; the needle keeps its whitespace.
    fn needle(&self) -> Option<String> {
        if self.search.trim().is_empty() {
            None
        } else {
            Some(self.search.to_lowercase())
        }
    }
}

fn matches_needle(offer: &Offer, needle: &str) -> bool {
    offer.title.to_lowercase().contains(needle)
        || offer.description.to_lowercase().contains(needle)
        || offer
            .tag_list()
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Offers the viewer should see in the feed, in their original order
///
/// Drops the viewer's own offers, then offers not matching a non-blank
/// search in title, description or any tag (case-insensitive substring),
/// then offers outside the selected category.
pub fn visible_offers<'a>(
    offers: &'a [Offer],
    viewer: Option<Uuid>,
    query: &ListingQuery,
) -> Vec<&'a Offer> {
    let needle = query.needle();

    offers
        .iter()
        .filter(|offer| viewer != Some(offer.user_id))
        .filter(|offer| needle.as_deref().is_none_or(|n| matches_needle(offer, n)))
        .filter(|offer| query.category.matches(offer.category))
        .collect()
}

/// Feed of everyone else's offers
pub struct OfferListing {
    gateway: Arc<dyn OfferGateway>,
    session: Option<Session>,
    offers: Vec<Offer>,
    query: ListingQuery,
}

impl OfferListing {
    pub fn new(gateway: Arc<dyn OfferGateway>, session: Option<Session>) -> Self {
        Self {
            gateway,
            session,
            offers: Vec::new(),
            query: ListingQuery::default(),
        }
    }

    /// Fetch the full offer collection, replacing whatever was held
    ///
    /// A failed fetch is logged and leaves the collection empty.
    pub async fn activate(&mut self) {
        match self.gateway.list_offers(None).await {
            Ok(offers) => {
                info!("Fetched {} offers for the feed", offers.len());
                self.offers = offers;
            }
            Err(e) => {
                error!("Error fetching offers: {}", e);
                self.offers.clear();
            }
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
    }

    pub fn set_query(&mut self, query: ListingQuery) {
        self.query = query;
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    /// Raw collection as fetched
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn visible(&self) -> Vec<&Offer> {
        let viewer = self.session.as_ref().map(Session::user_id);
        visible_offers(&self.offers, viewer, &self.query)
    }

    /// Look up an offer among those already fetched
    pub fn find(&self, id: Uuid) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.id == id)
    }
}

/// The viewer's own offers, most recent first
pub struct OwnOffers {
    gateway: Arc<dyn OfferGateway>,
    session: Option<Session>,
    offers: Vec<Offer>,
}

impl OwnOffers {
    pub fn new(gateway: Arc<dyn OfferGateway>, session: Option<Session>) -> Self {
        Self {
            gateway,
            session,
            offers: Vec::new(),
        }
    }

    /// Fetch the viewer's offers; without a session nothing is read
    pub async fn activate(&mut self) {
        let Some(session) = &self.session else {
            return;
        };

        match self.gateway.list_offers(Some(session.user_id())).await {
            Ok(offers) => self.offers = offers,
            Err(e) => {
                error!("Error fetching my offers: {}", e);
                self.offers.clear();
            }
        }
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MockOfferGateway};
    use crate::models::{OfferKind, OfferOwner};
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    fn offer(owner: Uuid, category: Category, title: &str, tags: Option<&[&str]>) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            user_id: owner,
            title: title.to_string(),
            description: format!("{title} in good condition"),
            category,
            kind: OfferKind::Offer,
            tags: tags.map(|t| t.iter().map(|s| s.to_string()).collect()),
            created_at: Utc::now(),
            owner: Some(OfferOwner::default()),
        }
    }

    #[test]
    fn test_search_excludes_viewer_and_matches_case_insensitively() {
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let a = offer(u1, Category::Tools, "Hammer", None);
        let b = offer(u2, Category::Books, "Hammer guide", None);
        let offers = vec![a, b.clone()];

        let query = ListingQuery::new("hammer", CategoryFilter::All);
        let visible = visible_offers(&offers, Some(u1), &query);

        assert_eq!(visible, vec![&b]);
    }

    #[test]
    fn test_viewer_offers_never_visible() {
        let viewer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let offers = vec![
            offer(viewer, Category::Tools, "Drill", None),
            offer(other, Category::Tools, "Saw", None),
            offer(viewer, Category::Books, "Atlas", None),
        ];

        let visible = visible_offers(&offers, Some(viewer), &ListingQuery::default());

        assert_eq!(visible.len(), 1);
        assert!(visible.iter().all(|o| o.user_id != viewer));
    }

    #[test]
    fn test_without_viewer_everything_is_visible() {
        let offers = vec![
            offer(Uuid::new_v4(), Category::Tools, "Drill", None),
            offer(Uuid::new_v4(), Category::Books, "Atlas", None),
        ];

        assert_eq!(
            visible_offers(&offers, None, &ListingQuery::default()).len(),
            2
        );
    }

    #[test]
    fn test_search_matches_description_and_tags() {
        let owner = Uuid::new_v4();
        let by_tag = offer(owner, Category::Others, "Box", Some(&["Vintage", "wood"]));
        let mut by_description = offer(owner, Category::Others, "Crate", None);
        by_description.description = "Some VINTAGE crates".to_string();
        let neither = offer(owner, Category::Others, "Lamp", Some(&["modern"]));
        let offers = vec![by_tag.clone(), by_description.clone(), neither];

        let query = ListingQuery::new("vintage", CategoryFilter::All);
        let visible = visible_offers(&offers, None, &query);

        assert_eq!(visible, vec![&by_tag, &by_description]);
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        let offers = vec![
            offer(Uuid::new_v4(), Category::Tools, "Drill", None),
            offer(Uuid::new_v4(), Category::Books, "Atlas", None),
        ];

        let query = ListingQuery::new("   ", CategoryFilter::All);
        assert_eq!(visible_offers(&offers, None, &query).len(), 2);
    }

    #[test]
    fn test_search_needle_keeps_surrounding_whitespace() {
        let offers = vec![offer(Uuid::new_v4(), Category::Tools, "Hammer", None)];

        let padded = ListingQuery::new(" hammer", CategoryFilter::All);
        assert!(visible_offers(&offers, None, &padded).is_empty());

        let inner = ListingQuery::new("ham", CategoryFilter::All);
        assert_eq!(visible_offers(&offers, None, &inner).len(), 1);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let owner = Uuid::new_v4();
        let tools = offer(owner, Category::Tools, "Drill", None);
        let books = offer(owner, Category::Books, "Atlas", None);
        let offers = vec![tools.clone(), books];

        let query = ListingQuery::new("", CategoryFilter::Only(Category::Tools));
        let visible = visible_offers(&offers, None, &query);

        assert_eq!(visible, vec![&tools]);
        assert!(visible.iter().all(|o| o.category == Category::Tools));
    }

    #[test]
    fn test_filtering_is_stable_and_idempotent() {
        let owner = Uuid::new_v4();
        let base = Utc::now();
        let offers: Vec<Offer> = (0..6)
            .map(|i| {
                let mut o = offer(owner, Category::Services, &format!("Lesson {i}"), None);
                o.created_at = base - Duration::minutes(i);
                o
            })
            .collect();

        let query = ListingQuery::new("lesson", CategoryFilter::Only(Category::Services));
        let first = visible_offers(&offers, None, &query);
        let second = visible_offers(&offers, None, &query);

        assert_eq!(first, second);
        let titles: Vec<&str> = first.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Lesson 0", "Lesson 1", "Lesson 2", "Lesson 3", "Lesson 4", "Lesson 5"]
        );
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Services".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Services))
        );
        assert!("All".parse::<CategoryFilter>().is_err());
        assert!("tools".parse::<CategoryFilter>().is_err());
    }

    #[tokio::test]
    async fn test_activate_then_filter() {
        let viewer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mine = offer(viewer, Category::Tools, "Hammer", None);
        let theirs = offer(other, Category::Tools, "Hammer drill", Some(&["power"]));
        let fetched = vec![mine, theirs.clone()];

        let mut gateway = MockOfferGateway::new();
        gateway
            .expect_list_offers()
            .with(eq(None))
            .times(1)
            .returning(move |_| Ok(fetched.clone()));

        let mut listing = OfferListing::new(Arc::new(gateway), Some(Session::new(viewer)));
        listing.activate().await;
        listing.set_search("POWER");

        assert_eq!(listing.offers().len(), 2);
        assert_eq!(listing.visible(), vec![&theirs]);
        assert_eq!(listing.find(theirs.id), Some(&theirs));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_empty_collection() {
        let mut gateway = MockOfferGateway::new();
        gateway
            .expect_list_offers()
            .times(1)
            .returning(|_| Err(GatewayError::unavailable("connection refused")));

        let mut listing = OfferListing::new(Arc::new(gateway), None);
        listing.activate().await;

        assert!(listing.offers().is_empty());
        assert!(listing.visible().is_empty());
    }

    #[tokio::test]
    async fn test_own_offers_reads_by_owner() {
        let viewer = Uuid::new_v4();
        let mine = vec![offer(viewer, Category::Books, "Atlas", None)];
        let expected = mine.clone();

        let mut gateway = MockOfferGateway::new();
        gateway
            .expect_list_offers()
            .with(eq(Some(viewer)))
            .times(1)
            .returning(move |_| Ok(mine.clone()));

        let mut own = OwnOffers::new(Arc::new(gateway), Some(Session::new(viewer)));
        own.activate().await;

        assert_eq!(own.offers(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_own_offers_without_session_reads_nothing() {
        let mut gateway = MockOfferGateway::new();
        gateway.expect_list_offers().never();

        let mut own = OwnOffers::new(Arc::new(gateway), None);
        own.activate().await;

        assert!(own.offers().is_empty());
    }
}
