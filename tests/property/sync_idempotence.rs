//! Re-syncing an unchanged directory changes nothing, and declared status
//! never overrides stored progress

use backlog::types::FeatureStatus;
use proptest::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use super::fresh_api;

#[derive(Debug, Clone)]
struct Descriptor {
    priority: i64,
    status: &'static str,
    description: String,
    steps: Vec<String>,
}

fn descriptor_strategy() -> impl Strategy<Value = Descriptor> {
    (
        0i64..50,
        prop_oneof![Just("pending"), Just("in_progress"), Just("passing")],
        "[a-z]{1,12}( [a-z]{1,8}){0,4}",
        prop::collection::vec("[a-z]{1,10}", 1..4),
    )
        .prop_map(|(priority, status, description, steps)| Descriptor {
            priority,
            status,
            description,
            steps,
        })
}

fn write_descriptors(dir: &Path, descriptors: &[Descriptor]) {
    std::fs::create_dir_all(dir).unwrap();
    for (i, d) in descriptors.iter().enumerate() {
        let mut content = format!(
            "---\npriority: {}\nstatus: {}\n---\n# Feature {}\n\n{}\n\n## Test Steps\n",
            d.priority, d.status, i, d.description
        );
        for step in &d.steps {
            content.push_str(&format!("- {}\n", step));
        }
        std::fs::write(dir.join(format!("feature-{:02}.md", i)), content).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn second_sync_reports_all_unchanged(descriptors in prop::collection::vec(descriptor_strategy(), 0..8)) {
        let (dir, api) = fresh_api(0);
        write_descriptors(&dir.path().join("specs"), &descriptors);

        let first = api.sync_from_specs().unwrap();
        prop_assert_eq!(first.added, descriptors.len());
        prop_assert_eq!(first.total, descriptors.len());

        let second = api.sync_from_specs().unwrap();
        prop_assert_eq!(second.added, 0);
        prop_assert_eq!(second.updated, 0);
        prop_assert_eq!(second.unchanged, second.total);
        prop_assert_eq!(api.stats().unwrap().total, descriptors.len());
        for feature in api.queue().list().unwrap() {
            prop_assert!(!feature.steps.is_empty());
        }
    }

    #[test]
    fn resync_preserves_status(
        descriptors in prop::collection::vec(descriptor_strategy(), 1..6),
        rewrites in prop::collection::vec(descriptor_strategy(), 6),
        progress in prop::collection::vec(0u8..3, 6),
    ) {
        let (dir, api) = fresh_api(0);
        let specs = dir.path().join("specs");
        write_descriptors(&specs, &descriptors);
        api.sync_from_specs().unwrap();

        for (feature, p) in api.queue().list().unwrap().into_iter().zip(progress) {
            match p {
                0 => {}
                1 => {
                    let _ = api.mark_in_progress(feature.id);
                }
                _ => {
                    api.mark_passing(feature.id).unwrap();
                }
            }
        }
        let expected: HashMap<u64, FeatureStatus> = api
            .queue()
            .list()
            .unwrap()
            .into_iter()
            .map(|f| (f.id, f.status))
            .collect();

        write_descriptors(&specs, &rewrites[..descriptors.len()]);
        let report = api.sync_from_specs().unwrap();
        prop_assert_eq!(report.added, 0);
        prop_assert_eq!(report.updated + report.unchanged, descriptors.len());

        for (id, status) in expected {
            prop_assert_eq!(api.get(id).unwrap().status(), status);
        }
    }
}
