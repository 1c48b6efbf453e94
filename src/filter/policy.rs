use std::collections::HashSet;

use crate::ruuvi::raw_fields;

/// Which optional fields of a measurement get stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterPolicy {
    #[default]
    AllowAll,
    Whitelist(HashSet<String>),
    Blacklist(HashSet<String>),
}

impl FilterPolicy {
    pub fn whitelist<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterPolicy::Whitelist(fields.into_iter().map(Into::into).collect())
    }

    pub fn blacklist<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterPolicy::Blacklist(fields.into_iter().map(Into::into).collect())
    }

    /// Whitelist of every directly measured field.
    pub fn raw() -> Self {
        Self::whitelist(raw_fields().map(|f| f.name))
    }

    pub fn allows(&self, field: &str) -> bool {
        match self {
            FilterPolicy::AllowAll => true,
            FilterPolicy::Whitelist(fields) => fields.contains(field),
            FilterPolicy::Blacklist(fields) => !fields.contains(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_all_allows_anything() {
        let policy = FilterPolicy::AllowAll;
        assert!(policy.allows("temperature"));
        assert!(policy.allows("dewPoint"));
        assert!(policy.allows(""));
    }

    #[test]
    fn whitelist_allows_listed_only() {
        let policy = FilterPolicy::whitelist(["temperature", "humidity"]);
        assert!(policy.allows("temperature"));
        assert!(policy.allows("humidity"));
        assert!(!policy.allows("pressure"));
    }

    #[test]
    fn blacklist_allows_unlisted_only() {
        let policy = FilterPolicy::blacklist(["accelerationX"]);
        assert!(!policy.allows("accelerationX"));
        assert!(policy.allows("accelerationY"));
    }

    #[test]
    fn empty_lists() {
        let whitelist = FilterPolicy::whitelist(Vec::<String>::new());
        let blacklist = FilterPolicy::blacklist(Vec::<String>::new());
        assert!(!whitelist.allows("temperature"));
        assert!(blacklist.allows("temperature"));
    }

    #[test]
    fn raw_policy_excludes_derived_fields() {
        let policy = FilterPolicy::raw();
        assert!(policy.allows("temperature"));
        assert!(policy.allows("measurementSequenceNumber"));
        assert!(!policy.allows("accelerationTotal"));
        assert!(!policy.allows("airDensity"));
    }
}
