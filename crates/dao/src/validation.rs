/// Windows reserved names that cannot be used as filenames.
/// These names are reserved by the Windows operating system and will cause
/// filesystem errors if used as directory or file names.
pub const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9", "LPT1", "LPT2",
    "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Checks if a name contains only valid filesystem-safe characters.
///
/// Valid characters are: alphanumeric, underscore (_), hyphen (-), and dot (.).
pub fn is_valid_name_chars(name: &str) -> bool {
    name.chars()
        .all(|ch| matches!(ch, 'a' ..= 'z' | 'A' ..= 'Z' | '0' ..= '9' | '_' | '-' | '.'))
}

/// Checks if a name is a Windows reserved name (case-insensitive).
///
/// Also checks the base name before any extension.
pub fn is_reserved_name(name: &str) -> bool {
    let name_upper = name.to_uppercase();
    let base_name = name_upper.split('.').next().unwrap_or(&name_upper);
    WINDOWS_RESERVED_NAMES.contains(&name_upper.as_str()) || WINDOWS_RESERVED_NAMES.contains(&base_name)
}

/// Checks whether a collection name can be bound by a DAO.
///
/// Names must be non-empty, filesystem-safe, not reserved, and must not start
/// with a dot (dot-prefixed directories are internal to the store).
pub fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && is_valid_name_chars(name) && !is_reserved_name(name)
}

/// Minimal syntactic check for an email address: it must contain an `@`.
pub fn looks_like_email(email: &str) -> bool { email.contains('@') }
