use proptest::prelude::*;
use tagguard_core::{CompliancePolicy, ResourceDescriptor, ResourceType, TagSet};
use tagguard_engine::evaluate;

const KEYS: [&str; 6] = ["Environment", "Owner", "CostCenter", "Application", "Team", "Tier"];

fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z0-9-]{1,12}"]
}

fn arb_tags() -> impl Strategy<Value = TagSet> {
    prop::collection::btree_map(prop::sample::select(KEYS.to_vec()), arb_value(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

fn arb_policy() -> impl Strategy<Value = CompliancePolicy> {
    prop::sample::subsequence(KEYS.to_vec(), 1..=4).prop_map(|keys| CompliancePolicy::new(keys, true))
}

fn resource() -> ResourceDescriptor {
    ResourceDescriptor::new(ResourceType::Cluster, "c", "arn:test:c")
}

proptest! {
    #[test]
    fn compliant_iff_every_required_key_is_non_empty(tags in arb_tags(), policy in arb_policy()) {
        let expected = policy
            .required_keys()
            .iter()
            .all(|k| tags.get(k).is_some_and(|v| !v.trim().is_empty()));
        let result = evaluate(&resource(), tags, &policy);
        prop_assert_eq!(result.compliant, expected);
        prop_assert_eq!(result.compliant, result.missing_tags.is_empty());
    }

    #[test]
    fn missing_tags_are_required_keys(tags in arb_tags(), policy in arb_policy()) {
        let result = evaluate(&resource(), tags, &policy);
        for key in &result.missing_tags {
            prop_assert!(policy.is_required(key));
        }
        prop_assert!(result.missing_tags.len() <= policy.required_keys().len());
    }

    #[test]
    fn score_is_fraction_of_satisfied_keys(tags in arb_tags(), policy in arb_policy()) {
        let result = evaluate(&resource(), tags, &policy);
        let score = result.compliance_score();
        prop_assert!((0.0..=1.0).contains(&score));
        if result.compliant {
            prop_assert_eq!(score, 1.0);
        }
    }

    #[test]
    fn evaluation_never_changes_tags(tags in arb_tags(), policy in arb_policy()) {
        let result = evaluate(&resource(), tags.clone(), &policy);
        prop_assert_eq!(result.existing_tags, tags);
    }
}
