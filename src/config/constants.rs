// * Configuration Constants
// * Compile-time limits and defaults for extraction and enrichment

// * Product names longer than this are truncated before matching
pub const MAX_NAME_CHARS: usize = 1000;

// * Specification values longer than this are truncated before matching
pub const MAX_SPEC_CHARS: usize = 500;

// * Longest letter run from a specification value that can still be a unit
pub const MAX_SPEC_TOKEN_CHARS: usize = 20;

// * Detail page fetch timeout in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 60;

// * Detail pages fetched concurrently per batch
pub const MAX_CONCURRENT_FETCHES: usize = 4;

// * Vendor politeness budget
pub const REQUESTS_PER_MINUTE: u32 = 60;

// * Retries after a connection-level failure
pub const MAX_RETRIES: u32 = 3;

// * Pause between retries in milliseconds
pub const RETRY_DELAY_MS: u64 = 1_000;

// * Bodies shorter than this are treated as empty
pub const MIN_BODY_BYTES: usize = 1;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
