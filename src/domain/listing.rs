#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns uppercase SQL keyword for ORDER BY clauses.
    pub const fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn from_query(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Some(SortDirection::Asc),
            "desc" | "descending" | "-1" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Limit {
    Limited(u64),
    #[default]
    All,
}

impl Limit {
    /// A limit of zero means "no limit", as in document-store cursors.
    pub fn limited(size: u64) -> Self {
        if size == 0 {
            Limit::All
        } else {
            Limit::Limited(size)
        }
    }

    pub const fn as_option(self) -> Option<u64> {
        match self {
            Limit::Limited(value) => Some(value),
            Limit::All => None,
        }
    }
}

/// Offset pagination over the id-ordered book collection.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct ListRequest {
    pub skip: u64,
    pub limit: Limit,
    pub direction: SortDirection,
}

impl ListRequest {
    pub fn new(skip: u64, limit: Limit, direction: SortDirection) -> Self {
        Self {
            skip,
            limit,
            direction,
        }
    }

    pub fn show_all(direction: SortDirection) -> Self {
        Self::new(0, Limit::All, direction)
    }

    /// Builds a request from raw query-string values.
    ///
    /// Missing or unparseable numbers fall back to "no skip" and "no limit";
    /// an unknown order falls back to ascending.
    pub fn from_params(skip: Option<&str>, limit: Option<&str>, order: Option<&str>) -> Self {
        let skip = skip.and_then(parse_count).unwrap_or(0);
        let limit = limit.and_then(parse_count).map_or(Limit::All, Limit::limited);
        let direction = order
            .and_then(SortDirection::from_query)
            .unwrap_or_default();

        Self::new(skip, limit, direction)
    }

    pub const fn skip(&self) -> u64 {
        self.skip
    }

    pub const fn limit(&self) -> Limit {
        self.limit
    }

    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

fn parse_count(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
