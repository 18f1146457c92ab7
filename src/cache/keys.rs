//! Cache key definitions.
//!
//! A [`CacheKey`] is `{resource, id?, variant?}` derived from a read request.
//! A [`KeyFamily`] names a base key together with all of its variants and is the
//! unit of invalidation.

use std::fmt;

/// Cacheable read resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Restaurants,
    RestaurantSearch,
    Restaurant,
    RestaurantStats,
    RestaurantReviews,
    Foods,
    FoodsByRestaurant,
    Food,
    FoodReviews,
    FoodReviewDetails,
    FoodReviewsByFood,
    FoodReviewStats,
    FoodReviewsByRestaurant,
    FoodReviewStatsByRestaurant,
    FoodReview,
    GeneralReviews,
    GeneralReviewsByRestaurant,
    GeneralReviewStats,
    GeneralReview,
    Profiles,
    Profile,
}

/// TTL bucket a resource falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlClass {
    /// Collections of rows.
    Listing,
    /// A single entity.
    Detail,
    /// Rating and value aggregates, kept fresh by invalidation.
    Aggregate,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurants => "restaurants",
            Self::RestaurantSearch => "restaurant-search",
            Self::Restaurant => "restaurant",
            Self::RestaurantStats => "restaurant-stats",
            Self::RestaurantReviews => "restaurant-reviews",
            Self::Foods => "foods",
            Self::FoodsByRestaurant => "foods-by-restaurant",
            Self::Food => "food",
            Self::FoodReviews => "food-reviews",
            Self::FoodReviewDetails => "food-review-details",
            Self::FoodReviewsByFood => "food-reviews-by-food",
            Self::FoodReviewStats => "food-review-stats",
            Self::FoodReviewsByRestaurant => "food-reviews-by-restaurant",
            Self::FoodReviewStatsByRestaurant => "food-review-stats-by-restaurant",
            Self::FoodReview => "food-review",
            Self::GeneralReviews => "general-reviews",
            Self::GeneralReviewsByRestaurant => "general-reviews-by-restaurant",
            Self::GeneralReviewStats => "general-review-stats",
            Self::GeneralReview => "general-review",
            Self::Profiles => "profiles",
            Self::Profile => "profile",
        }
    }

    pub fn ttl_class(&self) -> TtlClass {
        match self {
            Self::Restaurants
            | Self::RestaurantSearch
            | Self::RestaurantReviews
            | Self::Foods
            | Self::FoodsByRestaurant
            | Self::FoodReviews
            | Self::FoodReviewsByFood
            | Self::FoodReviewsByRestaurant
            | Self::GeneralReviews
            | Self::GeneralReviewsByRestaurant
            | Self::Profiles => TtlClass::Listing,
            Self::Restaurant
            | Self::Food
            | Self::FoodReview
            | Self::GeneralReview
            | Self::Profile => TtlClass::Detail,
            Self::RestaurantStats
            | Self::FoodReviewDetails
            | Self::FoodReviewStats
            | Self::FoodReviewStatsByRestaurant
            | Self::GeneralReviewStats => TtlClass::Aggregate,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one cached response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: Resource,
    pub id: Option<i64>,
    /// Sub-route qualifier and/or raw query string, e.g. `search?q=taco`.
    pub variant: Option<String>,
}

impl CacheKey {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            id: None,
            variant: None,
        }
    }

    pub fn with_id(resource: Resource, id: i64) -> Self {
        Self {
            resource,
            id: Some(id),
            variant: None,
        }
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn family(&self) -> KeyFamily {
        KeyFamily {
            resource: self.resource,
            id: self.id,
        }
    }

    pub fn ttl_class(&self) -> TtlClass {
        self.resource.ttl_class()
    }

    /// Derive the key of a cacheable read route.
    ///
    /// `path` is the request path, `query` the raw query string exactly as sent.
    /// Query order is kept, so `?a=1&b=2` and `?b=2&a=1` are distinct entries.
    /// Returns `None` for anything that must not be cached: routes outside `/api`,
    /// per-user listings, like lookups, identity lookups, messages and the cache
    /// admin surface.
    pub fn from_request(path: &str, query: Option<&str>) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let (head, rest) = segments.split_first()?;
        if *head != "api" {
            return None;
        }
        if rest.iter().any(|segment| is_personal_segment(segment)) {
            return None;
        }

        let (resource, id, qualifier) = classify(rest)?;
        let query = query.filter(|query| !query.is_empty());
        let variant = match (qualifier, query) {
            (None, None) => None,
            (Some(qualifier), None) => Some(qualifier.to_string()),
            (None, Some(query)) => Some(format!("?{query}")),
            (Some(qualifier), Some(query)) => Some(format!("{qualifier}?{query}")),
        };

        Some(Self {
            resource,
            id,
            variant,
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        if let Some(id) = self.id {
            write!(f, "({id})")?;
        }
        if let Some(variant) = self.variant.as_deref() {
            write!(f, "{variant}")?;
        }
        Ok(())
    }
}

/// A base key plus every variant of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyFamily {
    pub resource: Resource,
    pub id: Option<i64>,
}

impl KeyFamily {
    pub fn all(resource: Resource) -> Self {
        Self { resource, id: None }
    }

    pub fn of(resource: Resource, id: i64) -> Self {
        Self {
            resource,
            id: Some(id),
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.resource == key.resource && self.id == key.id
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}({id})*", self.resource),
            None => write!(f, "{}*", self.resource),
        }
    }
}

fn is_personal_segment(segment: &str) -> bool {
    matches!(
        segment,
        "user" | "likes" | "like" | "toggle-like" | "auth" | "check-user" | "messages" | "cache"
    )
}

fn parse_id(segment: &str) -> Option<i64> {
    segment.parse::<i64>().ok()
}

/// Map the path segments after `/api` to `(resource, id, qualifier)`.
fn classify<'a>(rest: &[&'a str]) -> Option<(Resource, Option<i64>, Option<&'a str>)> {
    use Resource::*;

    match rest {
        ["restaurants"] => Some((Restaurants, None, None)),
        ["restaurants", "search"] => Some((RestaurantSearch, None, None)),
        ["restaurants", id] => Some((Restaurant, Some(parse_id(id)?), None)),
        ["restaurants", id, "stats"] => Some((RestaurantStats, Some(parse_id(id)?), None)),
        ["restaurant-reviews"] => Some((RestaurantReviews, None, None)),

        ["foods"] => Some((Foods, None, None)),
        ["foods", "restaurant", id] => Some((FoodsByRestaurant, Some(parse_id(id)?), None)),
        ["foods", "restaurant", id, "search"] => {
            Some((FoodsByRestaurant, Some(parse_id(id)?), Some("search")))
        }
        ["foods", id] => Some((Food, Some(parse_id(id)?), None)),

        ["food-reviews"] => Some((FoodReviews, None, None)),
        ["food-reviews", "food-review-details"] => Some((FoodReviewDetails, None, None)),
        ["food-reviews", "food", id] => Some((FoodReviewsByFood, Some(parse_id(id)?), None)),
        ["food-reviews", "food", id, "stats"] => {
            Some((FoodReviewStats, Some(parse_id(id)?), None))
        }
        ["food-reviews", "restaurant", id] => {
            Some((FoodReviewsByRestaurant, Some(parse_id(id)?), None))
        }
        ["food-reviews", "restaurant", id, "stats"] => {
            Some((FoodReviewStatsByRestaurant, Some(parse_id(id)?), None))
        }
        ["food-reviews", id] => Some((FoodReview, Some(parse_id(id)?), None)),

        ["general-reviews"] => Some((GeneralReviews, None, None)),
        ["general-reviews", "restaurant", id] => {
            Some((GeneralReviewsByRestaurant, Some(parse_id(id)?), None))
        }
        ["general-reviews", "restaurant", id, "stats"] => {
            Some((GeneralReviewStats, Some(parse_id(id)?), None))
        }
        ["general-reviews", id] => Some((GeneralReview, Some(parse_id(id)?), None)),

        ["profiles"] => Some((Profiles, None, None)),
        ["profiles", id] => Some((Profile, Some(parse_id(id)?), None)),

        _ => None,
    }
}
