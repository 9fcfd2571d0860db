//! Aspects shared by several entity kinds: ownership, status, tags, glossary
//! terms, institutional memory, deprecation, and audit stamps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// When and by whom a resource moved into a lifecycle stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStamp {
    /// Milliseconds since the epoch.
    pub time: i64,
    /// Actor URN credited with the change.
    pub actor: String,
    /// Service URN acting on behalf of `actor`.
    pub impersonator: Option<String>,
}

impl AuditStamp {
    /// An audit stamp for `actor` at the current wall-clock time.
    pub fn now(actor: impl Into<String>) -> Self {
        Self {
            time: chrono::Utc::now().timestamp_millis(),
            actor: actor.into(),
            impersonator: None,
        }
    }
}

/// Created / last-modified / deleted stamps for a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAuditStamps {
    pub created: AuditStamp,
    pub last_modified: AuditStamp,
    pub deleted: Option<AuditStamp>,
}

/// Access level of a chart or dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    #[serde(rename = "PUBLIC")]
    Public,
    #[serde(rename = "PRIVATE")]
    Private,
}

/// Owner category or role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnershipType {
    /// In charge of developing the code.
    #[default]
    #[serde(rename = "DEVELOPER")]
    Developer,
    /// Owns the data.
    #[serde(rename = "DATAOWNER")]
    DataOwner,
    /// Oversees the operation, e.g. a DBA or SRE.
    #[serde(rename = "DELEGATE")]
    Delegate,
    /// Produces or generates the data.
    #[serde(rename = "PRODUCER")]
    Producer,
    /// Consumes the data.
    #[serde(rename = "CONSUMER")]
    Consumer,
    /// Has direct business interest.
    #[serde(rename = "STAKEHOLDER")]
    Stakeholder,
}

/// Where a piece of ownership information came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnershipSourceType {
    #[default]
    #[serde(rename = "AUDIT")]
    Audit,
    #[serde(rename = "DATABASE")]
    Database,
    #[serde(rename = "FILE_SYSTEM")]
    FileSystem,
    #[serde(rename = "ISSUE_TRACKING_SYSTEM")]
    IssueTrackingSystem,
    #[serde(rename = "MANUAL")]
    Manual,
    #[serde(rename = "SERVICE")]
    Service,
    #[serde(rename = "SOURCE_CONTROL")]
    SourceControl,
    #[serde(rename = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipSource {
    #[serde(rename = "type")]
    pub source_type: OwnershipSourceType,
    pub url: Option<String>,
}

/// A single owner of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Owner URN, e.g. `urn:li:corpuser:jdoe` or `urn:li:corpGroup:data-eng`.
    pub owner: String,
    #[serde(rename = "type")]
    pub owner_type: OwnershipType,
    pub source: Option<OwnershipSource>,
}

impl Owner {
    pub fn new(owner: impl Into<String>, owner_type: OwnershipType) -> Self {
        Self {
            owner: owner.into(),
            owner_type,
            source: None,
        }
    }
}

/// Ownership aspect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ownership {
    pub owners: Vec<Owner>,
    pub last_modified: AuditStamp,
}

/// Whether the entity has been soft-deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub removed: bool,
}

/// An applied tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAssociation {
    /// Tag URN, e.g. `urn:li:tag:pii`.
    pub tag: String,
}

impl TagAssociation {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

/// Tags applied to an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalTags {
    pub tags: Vec<TagAssociation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTermAssociation {
    pub urn: String,
}

/// Business glossary terms applied to an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerms {
    pub terms: Vec<GlossaryTermAssociation>,
    pub audit_stamp: AuditStamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalMemoryMetadata {
    pub url: String,
    pub description: String,
    pub create_stamp: AuditStamp,
}

/// Links to documentation relevant to an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalMemory {
    pub elements: Vec<InstitutionalMemoryMetadata>,
}

/// Deprecation status of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deprecation {
    pub deprecated: bool,
    pub decommission_time: Option<i64>,
    pub note: String,
    pub actor: String,
}

/// Resource-defined version string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionTag {
    pub version_tag: Option<String>,
}

/// Free-form string properties carried by several aspects.
pub type CustomProperties = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_schema_defaults() {
        assert_eq!(Owner::default().owner_type, OwnershipType::Developer);
        assert_eq!(
            OwnershipSource::default().source_type,
            OwnershipSourceType::Audit
        );
        assert!(!Status::default().removed);
        assert!(GlobalTags::default().tags.is_empty());
    }

    #[test]
    fn test_owner_serializes_type_field() {
        let owner = Owner::new("urn:li:corpuser:jdoe", OwnershipType::DataOwner);
        let json = serde_json::to_value(&owner).unwrap();
        assert_eq!(json["type"], "DATAOWNER");
        assert_eq!(json["owner"], "urn:li:corpuser:jdoe");
        assert!(json["source"].is_null());
    }

    #[test]
    fn test_status_removed_defaults_when_missing() {
        let status: Status = serde_json::from_str("{}").unwrap();
        assert!(!status.removed);
    }

    #[test]
    fn test_unknown_ownership_type_rejected() {
        let result = serde_json::from_str::<OwnershipType>("\"JANITOR\"");
        assert!(result.is_err());
    }
}
