/// Locale tag handed to the provider when the user hasn't picked one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

pub const EXPORT_FILE_PREFIX: &str = "transcript_";
pub const EXPORT_FILE_EXTENSION: &str = ".txt";

/// Export timestamp layout: the ISO-8601 UTC stamp with `:` and `T`
/// flattened to `-` so the name is valid on every filesystem.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
