use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use tracing::debug;

use crate::filter::FilterPolicy;

/// Global policy plus per-device overrides, keyed by exact device tag.
///
/// An override replaces the global policy for its device; the two are never
/// merged. Tags without an override fall back to the global policy.
#[derive(Debug, Clone, Default)]
pub struct FilterResolver {
    global: FilterPolicy,

    overrides: HashMap<String, FilterPolicy>,
}

impl FilterResolver {
    pub fn new(global: FilterPolicy) -> Self {
        Self {
            global,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, device_tag: impl Into<String>, policy: FilterPolicy) -> Self {
        self.overrides.insert(device_tag.into(), policy);
        self
    }

    pub fn global(&self) -> &FilterPolicy {
        &self.global
    }

    pub fn overrides(&self) -> &HashMap<String, FilterPolicy> {
        &self.overrides
    }

    pub fn policy_for(&self, device_tag: &str) -> &FilterPolicy {
        match self.overrides.get(device_tag) {
            Some(policy) => {
                debug!(device_tag, ?policy, "using per-device storage filter");
                policy
            }
            None => {
                debug!(device_tag, policy = ?self.global, "using global storage filter");
                &self.global
            }
        }
    }

    pub fn allowed<'a>(&'a self, device_tag: &str) -> impl Fn(&str) -> bool + use<'a> {
        let policy = self.policy_for(device_tag);
        move |field| policy.allows(field)
    }
}

/// The active [`FilterResolver`], replaceable as a whole while conversions
/// are running. Each conversion works on one snapshot.
#[derive(Debug)]
pub struct SharedFilterResolver {
    current: ArcSwap<FilterResolver>,
}

impl SharedFilterResolver {
    pub fn new(resolver: FilterResolver) -> Self {
        Self {
            current: ArcSwap::from_pointee(resolver),
        }
    }

    pub fn snapshot(&self) -> Arc<FilterResolver> {
        self.current.load_full()
    }

    pub fn replace(&self, resolver: FilterResolver) {
        self.current.store(Arc::new(resolver));
    }
}

impl Default for SharedFilterResolver {
    fn default() -> Self {
        Self::new(FilterResolver::default())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{
        influx::{Point, to_point_for},
        ruuvi::Measurement,
    };

    fn assert_send_sync<T: Send + Sync>() {}

    fn resolver() -> FilterResolver {
        FilterResolver::new(FilterPolicy::whitelist(["pressure"]))
            .with_override(
                "BBBBBBBBBBBB",
                FilterPolicy::blacklist(["accelerationX", "accelerationY", "accelerationZ"]),
            )
            .with_override(
                "CCCCCCCCCCCC",
                FilterPolicy::whitelist(["temperature", "humidity"]),
            )
    }

    #[test]
    fn default_allows_everything() {
        let resolver = FilterResolver::default();
        assert_eq!(resolver.policy_for("AAAAAAAAAAAA"), &FilterPolicy::AllowAll);
        assert!(resolver.allowed("")("dewPoint"));
    }

    #[test]
    fn override_replaces_global() {
        let resolver = resolver();
        let allowed = resolver.allowed("BBBBBBBBBBBB");
        assert!(!allowed("accelerationX"));
        assert!(allowed("temperature"));
        // global whitelist is not merged in
        assert!(allowed("humidity"));

        let allowed = resolver.allowed("CCCCCCCCCCCC");
        assert!(allowed("temperature"));
        assert!(!allowed("pressure"));
    }

    #[test]
    fn unknown_tag_falls_back_to_global() {
        let resolver = resolver();
        let allowed = resolver.allowed("AAAAAAAAAAAA");
        assert!(allowed("pressure"));
        assert!(!allowed("temperature"));
        assert_eq!(resolver.policy_for(""), resolver.global());
    }

    #[test]
    fn tag_lookup_is_exact() {
        let resolver = resolver();
        assert_eq!(resolver.policy_for("bbbbbbbbbbbb"), resolver.global());
        assert_eq!(resolver.policy_for("BBBBBBBBBBB"), resolver.global());
        assert_eq!(resolver.policy_for("BBBBBBBBBBBB*"), resolver.global());
    }

    #[test]
    fn snapshot_survives_replace() {
        let shared = SharedFilterResolver::new(resolver());
        let before = shared.snapshot();

        shared.replace(FilterResolver::default());

        assert!(!before.allowed("AAAAAAAAAAAA")("temperature"));
        assert!(shared.snapshot().allowed("AAAAAAAAAAAA")("temperature"));
    }

    #[test]
    fn resolvers_and_points_cross_threads() {
        assert_send_sync::<FilterResolver>();
        assert_send_sync::<SharedFilterResolver>();
        assert_send_sync::<Point>();
    }

    #[test]
    fn concurrent_conversions_see_whole_snapshots() {
        let pressure_only = FilterResolver::new(FilterPolicy::whitelist(["pressure"]));
        let temperature_only = FilterResolver::new(FilterPolicy::whitelist(["temperature"]));

        let m = Measurement {
            temperature: Some(21.5),
            humidity: Some(40.0),
            pressure: Some(100_000.0),
            ..Measurement::new("AAAAAAAAAAAA", 5, 1_700_000_000_000)
        };
        let expected = [
            to_point_for(&m, &pressure_only),
            to_point_for(&m, &temperature_only),
        ];

        let shared = SharedFilterResolver::new(pressure_only.clone());

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..1_000 {
                    let next = if i % 2 == 0 {
                        temperature_only.clone()
                    } else {
                        pressure_only.clone()
                    };
                    shared.replace(next);
                }
            });

            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        let point = to_point_for(&m, &shared.snapshot());
                        assert!(expected.contains(&point), "{point:?}");
                    }
                });
            }
        });
    }
}
