//! Version stamp for JSON payloads and config files.

/// Version written into every JSON envelope and expected in config files.
///
/// Bump the major component when a field is removed or changes type.
pub const SCHEMA_VERSION: &str = "1.0.0";

fn major(version: &str) -> Option<u32> {
    version.split('.').next()?.trim().parse().ok()
}

/// A document is readable when its major version matches ours.
pub fn is_compatible(version: &str) -> bool {
    match (major(version), major(SCHEMA_VERSION)) {
        (Some(theirs), Some(ours)) => theirs == ours,
        _ => false,
    }
}
