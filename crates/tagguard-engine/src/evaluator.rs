//! Pure compliance evaluation.

use tagguard_core::{CompliancePolicy, ComplianceResult, ResourceDescriptor, TagSet};

/// Evaluate `tags` against `policy`.
///
/// `missing_tags` lists, in policy order, every required key that is absent
/// or (when the policy treats empty as missing) present with a blank value.
pub fn evaluate(resource: &ResourceDescriptor, tags: TagSet, policy: &CompliancePolicy) -> ComplianceResult {
    let missing_tags: Vec<String> = policy
        .required_keys()
        .iter()
        .filter(|key| !policy.is_satisfied(&tags, key.as_str()))
        .cloned()
        .collect();
    ComplianceResult {
        resource: resource.clone(),
        compliant: missing_tags.is_empty(),
        missing_tags,
        existing_tags: tags,
        required_count: policy.required_keys().len(),
    }
}
