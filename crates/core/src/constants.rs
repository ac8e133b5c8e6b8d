/// Currency all aggregates are reported in unless configured otherwise
pub const DEFAULT_BASE_CURRENCY: &str = "KRW";

/// Market timezone used for report timestamps and the weekend guard
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

/// Decimal precision for amounts stored in the snapshot
pub const SNAPSHOT_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for percentages in the report
pub const DISPLAY_PERCENT_PRECISION: u32 = 2;

/// Decimal precision for weights in the report
pub const DISPLAY_WEIGHT_PRECISION: u32 = 1;

/// Telegram rejects messages above 4096 UTF-16 code units; stay clear of it
pub const DEFAULT_CHUNK_LIMIT: usize = 4000;

/// Telegram caption limit for photos, in UTF-16 code units
pub const PHOTO_CAPTION_LIMIT: usize = 1024;
