pub const BATCH_CHUNK_SIZE: usize = 100;

/// Length of the url-safe token embedded in customer share links.
pub const PUBLIC_TOKEN_LENGTH: usize = 22;
