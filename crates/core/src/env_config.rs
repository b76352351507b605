//! Environment variable parsing with warn-level logging for invalid values.

/// Parse a value from a lookup source with a default fallback.
///
/// - If the key is absent: returns `default` silently (expected case).
/// - If the key is present but cannot be parsed: logs a warning and returns `default`.
pub fn parse_with_default<T, F>(lookup: F, var: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// [`parse_with_default`] against the process environment.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_with_default(|k| std::env::var(k).ok(), var, default)
}
