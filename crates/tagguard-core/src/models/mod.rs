mod compliance_result;
mod policy;
mod remediation_outcome;
mod resource;
mod tag_payload;
mod tag_set;

pub use compliance_result::ComplianceResult;
pub use policy::CompliancePolicy;
pub use remediation_outcome::{BatchState, RemediationError, RemediationOutcome};
pub use resource::{ResourceDescriptor, ResourcePage, ResourceType};
pub use tag_payload::{LowerTagPair, TagDescription, TagPayload, TagShape, UpperTagPair};
pub use tag_set::TagSet;
