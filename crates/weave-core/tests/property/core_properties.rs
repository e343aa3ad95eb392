use chrono::{Duration, Utc};
use proptest::prelude::*;

use weave_core::models::{ContextEntry, Relevance};

proptest! {
    #[test]
    fn relevance_always_within_unit_interval(raw in proptest::num::f64::ANY) {
        let r = Relevance::new(raw).value();
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn expiry_flips_exactly_at_ttl(ttl_secs in 1i64..86_400, offset in -86_400i64..86_400) {
        let created = Utc::now();
        let entry = ContextEntry::new("s", "x", 0.5)
            .with_created_at(created)
            .with_ttl(Duration::seconds(ttl_secs));
        let now = created + Duration::seconds(offset);
        prop_assert_eq!(entry.is_expired_at(now), offset >= ttl_secs);
    }

    #[test]
    fn rollback_restores_original(original in "[a-z ]{1,60}", replacement in "[a-z]{1,10}") {
        let mut entry = ContextEntry::new("s", original.as_str(), 0.5);
        let before = entry.content.clone();
        entry.apply_compression(replacement.as_str().into());
        prop_assert!(entry.rollback());
        prop_assert_eq!(entry.content, before);
    }
}
