//! Recommended TTLs, in seconds, per kind of cached upstream data.
//!
//! The cache does not know about these categories; callers pick one when
//! calling `set`.

pub struct CacheTtl;

impl CacheTtl {
    pub const OAUTH_TOKENS: u64 = 1800;
    pub const CATEGORIES: u64 = 86_400;
    pub const SHIPPING_RATES: u64 = 86_400;
    pub const MARKET_TRENDS: u64 = 21_600;
    pub const SEARCH_RESULTS: u64 = 300;
    pub const BUSINESS_POLICIES: u64 = 86_400;
    pub const SELLER_STANDARDS: u64 = 3600;
    pub const RATE_TABLES: u64 = 86_400;
}
