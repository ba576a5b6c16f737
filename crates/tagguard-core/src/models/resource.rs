use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TagShape;
use crate::errors::EnumerationError;

/// The resource types the engine knows how to enumerate and tag.
///
/// Declaration order is the report's sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Cluster,
    Service,
    LogGroup,
    NatGateway,
    LoadBalancer,
    TargetGroup,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        Self::Cluster,
        Self::Service,
        Self::LogGroup,
        Self::NatGateway,
        Self::LoadBalancer,
        Self::TargetGroup,
    ];

    /// Snake-case name used on the wire, in config, and in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Service => "service",
            Self::LogGroup => "log_group",
            Self::NatGateway => "nat_gateway",
            Self::LoadBalancer => "load_balancer",
            Self::TargetGroup => "target_group",
        }
    }

    /// Provider-style label shown in the printed summary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cluster => "ECS::Cluster",
            Self::Service => "ECS::Service",
            Self::LogGroup => "Logs::LogGroup",
            Self::NatGateway => "EC2::NatGateway",
            Self::LoadBalancer => "ElasticLoadBalancingV2::LoadBalancer",
            Self::TargetGroup => "ElasticLoadBalancingV2::TargetGroup",
        }
    }

    /// Shape the provider's tagging API returns for this type.
    pub fn tag_shape(self) -> TagShape {
        match self {
            Self::Cluster | Self::Service => TagShape::LowerPairs,
            Self::LogGroup => TagShape::Map,
            Self::NatGateway | Self::TargetGroup => TagShape::UpperPairs,
            Self::LoadBalancer => TagShape::Descriptions,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = EnumerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| EnumerationError::Unsupported {
                resource_type: s.trim().to_string(),
            })
    }
}

/// Identifies one cloud resource within one region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub resource_type: ResourceType,
    pub resource_id: String,
    /// Globally unique.
    pub resource_arn: String,
}

impl ResourceDescriptor {
    pub fn new(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        resource_arn: impl Into<String>,
    ) -> Self {
        Self {
            resource_type,
            resource_id: resource_id.into(),
            resource_arn: resource_arn.into(),
        }
    }

    /// Report ordering key: resource type, then resource id.
    pub fn sort_key(&self) -> (ResourceType, &str) {
        (self.resource_type, self.resource_id.as_str())
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

/// One page of a paginated resource listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePage {
    pub resources: Vec<ResourceDescriptor>,
    /// Opaque continuation token; `None` on the last page.
    pub next_token: Option<String>,
}
