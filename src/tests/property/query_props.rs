//! Property-based tests for the Query Engine
//!
//! Tests invariants:
//! - Same parameters return the same page, in the same order
//! - Pagination partitions the result set: no duplicates, no omissions
//! - hasMore is exactly `page * limit < total`
//! - Limit clamps at the ceiling and never below 1

use proptest::prelude::*;

use crate::core::query::{self, QueryParams, MAX_LIMIT};
use crate::tests::common::numbered_registry;

proptest! {
    #[test]
    fn prop_search_is_idempotent(
        count in 0usize..120,
        page in 1u64..20,
        limit in 1u32..150,
    ) {
        let registry = numbered_registry(count);
        let params = QueryParams::default()
            .with_page(page.to_string())
            .with_limit(limit.to_string());

        let a = query::search(&registry, "test", "items", &params).unwrap();
        let b = query::search(&registry, "test", "items", &params).unwrap();

        prop_assert_eq!(&a.entries, &b.entries);
        prop_assert_eq!(a.total, b.total);
        prop_assert_eq!(a.has_more, b.has_more);
    }

    #[test]
    fn prop_pages_partition_the_result_set(
        count in 0usize..120,
        limit in 1u32..40,
    ) {
        let registry = numbered_registry(count);

        let mut collected: Vec<String> = Vec::new();
        let mut page = 1u64;
        loop {
            let params = QueryParams::default()
                .with_page(page.to_string())
                .with_limit(limit.to_string());
            let result = query::search(&registry, "test", "items", &params).unwrap();

            prop_assert_eq!(result.total, count);
            for entry in &result.entries {
                collected.push(entry["id"].as_str().unwrap().to_string());
            }
            if !result.has_more {
                break;
            }
            page += 1;
        }

        // Every entry exactly once, in id order
        let expected: Vec<String> = (0..count).map(|i| format!("item-{i:04}")).collect();
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn prop_has_more_formula(
        count in 0usize..120,
        page in 1u64..30,
        limit in 1u32..150,
    ) {
        let registry = numbered_registry(count);
        let params = QueryParams::default()
            .with_page(page.to_string())
            .with_limit(limit.to_string());

        let result = query::search(&registry, "test", "items", &params).unwrap();

        let effective_limit = limit.min(MAX_LIMIT);
        prop_assert_eq!(result.limit, effective_limit);
        prop_assert_eq!(
            result.has_more,
            page * u64::from(effective_limit) < count as u64
        );

        // Entry count matches the slice arithmetic
        let start = ((page - 1) * u64::from(effective_limit)).min(count as u64) as usize;
        let expected_len = (count - start).min(effective_limit as usize);
        prop_assert_eq!(result.entries.len(), expected_len);
    }

    #[test]
    fn prop_limit_clamped_high_side(raw_limit in 101u32..10_000) {
        let registry = numbered_registry(5);
        let params = QueryParams::default().with_limit(raw_limit.to_string());
        let result = query::search(&registry, "test", "items", &params).unwrap();
        prop_assert_eq!(result.limit, MAX_LIMIT);
    }
}
