//! Sort orders selected through `?sort=` query parameters.

/// Catalog and wishlist ordering by book price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceOrder {
    /// Cheapest first.
    #[default]
    Ascending,
    /// Most expensive first.
    Descending,
}

impl PriceOrder {
    /// Home page selector: `1` (the default) is ascending, anything else descending.
    #[must_use]
    pub const fn from_catalog_param(sort: Option<i32>) -> Self {
        match sort {
            None | Some(1) => Self::Ascending,
            Some(_) => Self::Descending,
        }
    }

    /// Wishlist selector: `0` (the default) is descending, anything else ascending.
    #[must_use]
    pub const fn from_wishlist_param(sort: Option<i32>) -> Self {
        match sort {
            None | Some(0) => Self::Descending,
            Some(_) => Self::Ascending,
        }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Review ordering on the book detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReviewOrder {
    /// Most recently posted first (`sort=0` and unknown values).
    #[default]
    Newest,
    /// First posted first (`sort=1`).
    Oldest,
    /// Highest rating first (`sort=2`).
    HighestRated,
    /// Lowest rating first (`sort=3`).
    LowestRated,
}

impl ReviewOrder {
    /// Map the `sort` query parameter.
    #[must_use]
    pub const fn from_param(sort: Option<i32>) -> Self {
        match sort {
            Some(1) => Self::Oldest,
            Some(2) => Self::HighestRated,
            Some(3) => Self::LowestRated,
            _ => Self::Newest,
        }
    }

    /// The query parameter value that selects this order.
    #[must_use]
    pub const fn as_param(self) -> i32 {
        match self {
            Self::Newest => 0,
            Self::Oldest => 1,
            Self::HighestRated => 2,
            Self::LowestRated => 3,
        }
    }

    /// SQL `ORDER BY` clause over the `review` table aliased as `r`.
    ///
    /// Ties fall back to recency so the listing is stable.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Newest => "r.timestamp DESC",
            Self::Oldest => "r.timestamp ASC",
            Self::HighestRated => "r.star_rating DESC, r.timestamp DESC",
            Self::LowestRated => "r.star_rating ASC, r.timestamp DESC",
        }
    }
}
