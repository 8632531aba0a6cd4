//! Skip yields old_max + 1 and passing features cannot be skipped

use backlog::error::ApiError;
use proptest::prelude::*;

use super::{fresh_api, named_items};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn skips_strictly_increase(count in 1usize..8, picks in prop::collection::vec(any::<usize>(), 1..10)) {
        let (_dir, api) = fresh_api(0);
        api.create_bulk(&named_items(count, "f")).unwrap();
        let ids: Vec<u64> = api.queue().list().unwrap().iter().map(|f| f.id).collect();

        let mut last = 0;
        for pick in picks {
            let id = ids[pick % ids.len()];
            let old_max = api.queue().store().max_priority().unwrap().unwrap();
            let outcome = api.skip(id).unwrap();
            prop_assert_eq!(outcome.new_priority, old_max + 1);
            prop_assert!(outcome.new_priority > last);
            last = outcome.new_priority;

            let others_max = api
                .queue()
                .list()
                .unwrap()
                .iter()
                .filter(|f| f.id != id)
                .map(|f| f.priority)
                .max();
            if let Some(max) = others_max {
                prop_assert!(outcome.new_priority > max);
            }
        }
    }

    #[test]
    fn passing_feature_keeps_its_priority(count in 1usize..6, pick in any::<usize>()) {
        let (_dir, api) = fresh_api(0);
        api.create_bulk(&named_items(count, "f")).unwrap();
        let ids: Vec<u64> = api.queue().list().unwrap().iter().map(|f| f.id).collect();
        let id = ids[pick % ids.len()];

        api.mark_passing(id).unwrap();
        let before = api.get(id).unwrap().priority;
        let rejected = matches!(api.skip(id), Err(ApiError::AlreadyPassing(x)) if x == id);
        prop_assert!(rejected);
        prop_assert_eq!(api.get(id).unwrap().priority, before);
    }

    #[test]
    fn claim_release_claim(count in 1usize..5, pick in any::<usize>()) {
        let (_dir, api) = fresh_api(0);
        api.create_bulk(&named_items(count, "f")).unwrap();
        let ids: Vec<u64> = api.queue().list().unwrap().iter().map(|f| f.id).collect();
        let id = ids[pick % ids.len()];

        prop_assert!(api.mark_in_progress(id).is_ok());
        let second = matches!(api.mark_in_progress(id), Err(ApiError::AlreadyInProgress(_)));
        prop_assert!(second);
        api.clear_in_progress(id).unwrap();
        prop_assert!(api.mark_in_progress(id).is_ok());
    }
}

#[test]
fn test_regression_sample_is_distinct_passing_subset() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(32));
    runner
        .run(
            &(0usize..8, 0usize..8, prop::option::of(0usize..15), any::<u64>()),
            |(total, passing, limit, seed)| {
                let passing = passing.min(total);
                let (_dir, api) = fresh_api(seed);
                if total > 0 {
                    api.create_bulk(&named_items(total, "f")).unwrap();
                }
                let ids: Vec<u64> = api.queue().list().unwrap().iter().map(|f| f.id).collect();
                for id in ids.iter().take(passing) {
                    api.mark_passing(*id).unwrap();
                }

                let sample = api.get_regression(limit).unwrap();
                let cap = limit.unwrap_or(3).clamp(1, 10);
                prop_assert_eq!(sample.len(), cap.min(passing));
                prop_assert!(sample.iter().all(|f| f.passes));

                let mut seen: Vec<u64> = sample.iter().map(|f| f.id).collect();
                seen.sort_unstable();
                seen.dedup();
                prop_assert_eq!(seen.len(), sample.len());
                Ok(())
            },
        )
        .unwrap();
}
