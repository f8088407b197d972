/// Hard upper bound for any listing `LIMIT`/page size to protect DB and memory usage.
pub const MAX_LISTING_ELEMENTS: i32 = 200;

pub const API_PREFIX: &str = "/api";
