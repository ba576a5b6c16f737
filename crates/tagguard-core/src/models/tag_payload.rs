use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TagSet;

/// `{"key": "...", "value": "..."}`, as container services return tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowerTagPair {
    pub key: String,
    pub value: String,
}

/// `{"Key": "...", "Value": "..."}`, as compute and target group APIs return tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpperTagPair {
    pub key: String,
    pub value: String,
}

/// Tags grouped per ARN, as the load balancer API returns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagDescription {
    pub resource_arn: String,
    #[serde(default)]
    pub tags: Vec<UpperTagPair>,
}

/// Discriminant of [`TagPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagShape {
    LowerPairs,
    UpperPairs,
    Map,
    Descriptions,
}

impl TagShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowerPairs => "lower_pairs",
            Self::UpperPairs => "upper_pairs",
            Self::Map => "map",
            Self::Descriptions => "descriptions",
        }
    }
}

/// Tags in the native shape of the API that returned them.
///
/// Tagging APIs are not uniform; each resource type's handler knows which
/// shape to expect and normalizes it into a [`TagSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "tags", rename_all = "snake_case")]
pub enum TagPayload {
    LowerPairs(Vec<LowerTagPair>),
    UpperPairs(Vec<UpperTagPair>),
    Map(BTreeMap<String, String>),
    Descriptions(Vec<TagDescription>),
}

impl TagPayload {
    pub fn shape(&self) -> TagShape {
        match self {
            Self::LowerPairs(_) => TagShape::LowerPairs,
            Self::UpperPairs(_) => TagShape::UpperPairs,
            Self::Map(_) => TagShape::Map,
            Self::Descriptions(_) => TagShape::Descriptions,
        }
    }

    /// Normalize into a tag set. Descriptions only contribute the tags of
    /// `resource_arn`; later duplicates of a key win.
    pub fn into_tag_set(self, resource_arn: &str) -> TagSet {
        match self {
            Self::LowerPairs(pairs) => pairs.into_iter().map(|p| (p.key, p.value)).collect(),
            Self::UpperPairs(pairs) => pairs.into_iter().map(|p| (p.key, p.value)).collect(),
            Self::Map(map) => TagSet::from(map),
            Self::Descriptions(descriptions) => descriptions
                .into_iter()
                .filter(|d| d.resource_arn == resource_arn)
                .flat_map(|d| d.tags)
                .map(|p| (p.key, p.value))
                .collect(),
        }
    }

    /// Render a tag set in the given shape.
    pub fn from_tag_set(shape: TagShape, resource_arn: &str, tags: &TagSet) -> Self {
        let upper = || -> Vec<UpperTagPair> {
            tags.iter()
                .map(|(k, v)| UpperTagPair {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect()
        };
        match shape {
            TagShape::LowerPairs => Self::LowerPairs(
                tags.iter()
                    .map(|(k, v)| LowerTagPair {
                        key: k.to_string(),
                        value: v.to_string(),
                    })
                    .collect(),
            ),
            TagShape::UpperPairs => Self::UpperPairs(upper()),
            TagShape::Map => Self::Map(tags.clone().into_inner()),
            TagShape::Descriptions => Self::Descriptions(vec![TagDescription {
                resource_arn: resource_arn.to_string(),
                tags: upper(),
            }]),
        }
    }
}
