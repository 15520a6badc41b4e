//! Log level names.

use tracing::Level;

/// Level returned for names that are not recognized.
pub const NEUTRAL_LEVEL: Level = Level::INFO;

/// Look up a log level by name, ignoring case.
///
/// Recognizes `DEBUG`, `INFO`, `WARN` and `ERROR`. Anything else, including the
/// empty string, yields [`NEUTRAL_LEVEL`].
///
/// # Example
/// ```
/// use tracing_httplog::level_by_name;
/// use tracing::Level;
///
/// assert_eq!(level_by_name("warn"), Level::WARN);
/// assert_eq!(level_by_name("Error"), Level::ERROR);
/// assert_eq!(level_by_name("bogus"), Level::INFO);
/// ```
pub fn level_by_name(name: &str) -> Level {
    match name.to_ascii_uppercase().as_str() {
        "DEBUG" => Level::DEBUG,
        "INFO" => Level::INFO,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => NEUTRAL_LEVEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_by_name_is_case_insensitive() {
        assert_eq!(level_by_name("warn"), Level::WARN);
        assert_eq!(level_by_name("WARN"), Level::WARN);
        assert_eq!(level_by_name("Warn"), Level::WARN);
        assert_eq!(level_by_name("debug"), Level::DEBUG);
        assert_eq!(level_by_name("Info"), Level::INFO);
        assert_eq!(level_by_name("eRRoR"), Level::ERROR);
    }

    #[test]
    fn test_unknown_names_are_neutral() {
        assert_eq!(level_by_name("bogus"), NEUTRAL_LEVEL);
        assert_eq!(level_by_name(""), NEUTRAL_LEVEL);
        // TRACE is not part of the recognized set
        assert_eq!(level_by_name("trace"), NEUTRAL_LEVEL);
        assert_eq!(level_by_name(" warn "), NEUTRAL_LEVEL);
    }
}
