//! Configuration access port trait.

/// Raw INI lookups. Typed parsing and range checks live in
/// `domain::config_validation`, so a malformed value surfaces as an error.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
