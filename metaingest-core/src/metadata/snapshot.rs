//! Entity snapshots and their closed aspect unions.
//!
//! Each entity kind gets a snapshot struct (`urn` + ordered aspects) and an
//! aspect enum listing exactly the aspect kinds legal for that entity. Putting
//! an aspect on the wrong entity kind is a compile error, and typed access
//! (`aspect::<GlobalTags>()`) goes through [`AspectUnion`].

use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

use super::chart::{ChartInfo, ChartQuery, DashboardInfo};
use super::common::{
    Deprecation, GlobalTags, GlossaryTerms, InstitutionalMemory, Ownership, Status,
};
use super::datajob::{DataFlowInfo, DataJobInfo, DataJobInputOutput, DataProcessInfo};
use super::dataset::{DatasetDeprecation, DatasetProperties, UpstreamLineage};
use super::glossary::{GlossaryNodeInfo, GlossaryTermInfo, TagProperties};
use super::identity::{CorpGroupInfo, CorpUserEditableInfo, CorpUserInfo};
use super::ml::{MlFeatureProperties, MlModelProperties};
use super::schema::{EditableSchemaMetadata, SchemaMetadata};

/// A typed sub-record attachable to entity snapshots.
pub trait Aspect: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug {
    /// Fully qualified schema name, used as the union key on the wire.
    const SCHEMA_NAME: &'static str;
    /// Short aspect name, e.g. `globalTags`.
    const ASPECT_NAME: &'static str;
}

/// Implemented by an entity's aspect enum for every aspect kind it accepts.
pub trait AspectUnion<A: Aspect>: Sized {
    fn wrap(aspect: A) -> Self;
    fn get(&self) -> Option<&A>;
    fn get_mut(&mut self) -> Option<&mut A>;
}

/// Implemented by each concrete snapshot type so callers can check the
/// discriminant of a [`Snapshot`] and borrow the matching variant.
pub trait SnapshotVariant: Sized {
    const KIND: SnapshotKind;
    fn from_snapshot(snapshot: &Snapshot) -> Option<&Self>;
    fn from_snapshot_mut(snapshot: &mut Snapshot) -> Option<&mut Self>;
}

macro_rules! aspects {
    ($($ty:ty => $schema:literal, $name:literal;)+) => {
        $(
            impl Aspect for $ty {
                const SCHEMA_NAME: &'static str = $schema;
                const ASPECT_NAME: &'static str = $name;
            }
        )+
    };
}

aspects! {
    Ownership => "com.linkedin.pegasus2avro.common.Ownership", "ownership";
    Status => "com.linkedin.pegasus2avro.common.Status", "status";
    GlobalTags => "com.linkedin.pegasus2avro.common.GlobalTags", "globalTags";
    GlossaryTerms => "com.linkedin.pegasus2avro.common.GlossaryTerms", "glossaryTerms";
    InstitutionalMemory => "com.linkedin.pegasus2avro.common.InstitutionalMemory", "institutionalMemory";
    Deprecation => "com.linkedin.pegasus2avro.common.Deprecation", "deprecation";
    ChartInfo => "com.linkedin.pegasus2avro.chart.ChartInfo", "chartInfo";
    ChartQuery => "com.linkedin.pegasus2avro.chart.ChartQuery", "chartQuery";
    DashboardInfo => "com.linkedin.pegasus2avro.dashboard.DashboardInfo", "dashboardInfo";
    DataFlowInfo => "com.linkedin.pegasus2avro.datajob.DataFlowInfo", "dataFlowInfo";
    DataJobInfo => "com.linkedin.pegasus2avro.datajob.DataJobInfo", "dataJobInfo";
    DataJobInputOutput => "com.linkedin.pegasus2avro.datajob.DataJobInputOutput", "dataJobInputOutput";
    DataProcessInfo => "com.linkedin.pegasus2avro.dataprocess.DataProcessInfo", "dataProcessInfo";
    DatasetProperties => "com.linkedin.pegasus2avro.dataset.DatasetProperties", "datasetProperties";
    DatasetDeprecation => "com.linkedin.pegasus2avro.dataset.DatasetDeprecation", "datasetDeprecation";
    UpstreamLineage => "com.linkedin.pegasus2avro.dataset.UpstreamLineage", "upstreamLineage";
    SchemaMetadata => "com.linkedin.pegasus2avro.schema.SchemaMetadata", "schemaMetadata";
    EditableSchemaMetadata => "com.linkedin.pegasus2avro.schema.EditableSchemaMetadata", "editableSchemaMetadata";
    CorpUserInfo => "com.linkedin.pegasus2avro.identity.CorpUserInfo", "corpUserInfo";
    CorpUserEditableInfo => "com.linkedin.pegasus2avro.identity.CorpUserEditableInfo", "corpUserEditableInfo";
    CorpGroupInfo => "com.linkedin.pegasus2avro.identity.CorpGroupInfo", "corpGroupInfo";
    GlossaryTermInfo => "com.linkedin.pegasus2avro.glossary.GlossaryTermInfo", "glossaryTermInfo";
    GlossaryNodeInfo => "com.linkedin.pegasus2avro.glossary.GlossaryNodeInfo", "glossaryNodeInfo";
    MlFeatureProperties => "com.linkedin.pegasus2avro.ml.metadata.MLFeatureProperties", "mlFeatureProperties";
    MlModelProperties => "com.linkedin.pegasus2avro.ml.metadata.MLModelProperties", "mlModelProperties";
    TagProperties => "com.linkedin.pegasus2avro.tag.TagProperties", "tagProperties";
}

/// Decoding hook shared by all generated aspect unions.
trait DecodeUnion: Sized {
    const EXPECTING: &'static str;
    const MEMBERS: &'static [&'static str];

    fn decode_member<'de, M: MapAccess<'de>>(
        name: &str,
        map: &mut M,
    ) -> Result<Option<Self>, M::Error>;
}

struct UnionVisitor<U>(PhantomData<U>);

impl<'de, U: DecodeUnion> Visitor<'de> for UnionVisitor<U> {
    type Value = U;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(U::EXPECTING)
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<U, M::Error> {
        let name: String = map
            .next_key()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let value = U::decode_member(&name, &mut map)?
            .ok_or_else(|| de::Error::unknown_variant(&name, U::MEMBERS))?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }
        Ok(value)
    }
}

macro_rules! snapshots {
    ($(
        $(#[$meta:meta])*
        $kind:ident($snapshot:ident, $union:ident, $entity:literal, $schema:literal) {
            $($aspect:ident),+ $(,)?
        }
    )+) => {
        /// Discriminant of a [`Snapshot`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum SnapshotKind {
            $($kind),+
        }

        impl SnapshotKind {
            /// Entity type as it appears in URNs, e.g. `dataset` or `corpuser`.
            pub fn entity_type(&self) -> &'static str {
                match self {
                    $(Self::$kind => $entity),+
                }
            }

            pub fn schema_name(&self) -> &'static str {
                match self {
                    $(Self::$kind => $schema),+
                }
            }
        }

        impl fmt::Display for SnapshotKind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.entity_type())
            }
        }

        /// The proposed snapshot of a change event. Exactly one variant is
        /// populated; the variant decides which aspect union is legal.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub enum Snapshot {
            $(
                #[serde(rename = $schema)]
                $kind($snapshot),
            )+
        }

        impl Snapshot {
            pub fn kind(&self) -> SnapshotKind {
                match self {
                    $(Self::$kind(_) => SnapshotKind::$kind),+
                }
            }

            pub fn urn(&self) -> &str {
                match self {
                    $(Self::$kind(s) => &s.urn),+
                }
            }

            /// Aspect names in list order.
            pub fn aspect_names(&self) -> Vec<&'static str> {
                match self {
                    $(Self::$kind(s) => s.aspects.iter().map(|a| a.aspect_name()).collect()),+
                }
            }

            /// Borrow the snapshot as a concrete kind, if it is one.
            pub fn as_kind<S: SnapshotVariant>(&self) -> Option<&S> {
                S::from_snapshot(self)
            }

            pub fn as_kind_mut<S: SnapshotVariant>(&mut self) -> Option<&mut S> {
                S::from_snapshot_mut(self)
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
            pub struct $snapshot {
                /// URN of the entity this snapshot describes.
                pub urn: String,
                pub aspects: Vec<$union>,
            }

            impl $snapshot {
                pub fn new(urn: impl Into<String>) -> Self {
                    Self {
                        urn: urn.into(),
                        aspects: Vec::new(),
                    }
                }

                /// Builder-style append.
                pub fn with_aspect<A: Aspect>(mut self, aspect: A) -> Self
                where
                    $union: AspectUnion<A>,
                {
                    self.aspects.push($union::wrap(aspect));
                    self
                }

                /// First aspect of kind `A`, if any.
                pub fn aspect<A: Aspect>(&self) -> Option<&A>
                where
                    $union: AspectUnion<A>,
                {
                    self.aspects.iter().find_map(|a| AspectUnion::<A>::get(a))
                }

                pub fn aspect_mut<A: Aspect>(&mut self) -> Option<&mut A>
                where
                    $union: AspectUnion<A>,
                {
                    self.aspects.iter_mut().find_map(|a| AspectUnion::<A>::get_mut(a))
                }

                /// Number of aspects of kind `A`.
                pub fn count_aspects<A: Aspect>(&self) -> usize
                where
                    $union: AspectUnion<A>,
                {
                    self.aspects
                        .iter()
                        .filter(|a| AspectUnion::<A>::get(*a).is_some())
                        .count()
                }

                /// Return the first aspect of kind `A`, appending `default`
                /// first when none exists.
                pub fn get_or_add_aspect<A: Aspect>(&mut self, default: A) -> &mut A
                where
                    $union: AspectUnion<A>,
                {
                    if self.aspect::<A>().is_none() {
                        self.aspects.push($union::wrap(default));
                    }
                    self.aspect_mut::<A>()
                        .unwrap_or_else(|| unreachable!("aspect present after insertion"))
                }
            }

            impl From<$snapshot> for Snapshot {
                fn from(snapshot: $snapshot) -> Self {
                    Self::$kind(snapshot)
                }
            }

            impl SnapshotVariant for $snapshot {
                const KIND: SnapshotKind = SnapshotKind::$kind;

                fn from_snapshot(snapshot: &Snapshot) -> Option<&Self> {
                    match snapshot {
                        Snapshot::$kind(s) => Some(s),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_snapshot_mut(snapshot: &mut Snapshot) -> Option<&mut Self> {
                    match snapshot {
                        Snapshot::$kind(s) => Some(s),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            #[doc = concat!("Aspects legal on a `", stringify!($snapshot), "`.")]
            #[derive(Debug, Clone, PartialEq)]
            pub enum $union {
                $($aspect($aspect)),+
            }

            impl $union {
                pub fn aspect_name(&self) -> &'static str {
                    match self {
                        $(Self::$aspect(_) => <$aspect as Aspect>::ASPECT_NAME),+
                    }
                }

                pub fn schema_name(&self) -> &'static str {
                    match self {
                        $(Self::$aspect(_) => <$aspect as Aspect>::SCHEMA_NAME),+
                    }
                }
            }

            $(
                impl AspectUnion<$aspect> for $union {
                    fn wrap(aspect: $aspect) -> Self {
                        Self::$aspect(aspect)
                    }

                    fn get(&self) -> Option<&$aspect> {
                        match self {
                            Self::$aspect(a) => Some(a),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }

                    fn get_mut(&mut self) -> Option<&mut $aspect> {
                        match self {
                            Self::$aspect(a) => Some(a),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }
                }

                impl From<$aspect> for $union {
                    fn from(aspect: $aspect) -> Self {
                        Self::$aspect(aspect)
                    }
                }
            )+

            impl Serialize for $union {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    let mut map = serializer.serialize_map(Some(1))?;
                    match self {
                        $(Self::$aspect(a) => map.serialize_entry(<$aspect as Aspect>::SCHEMA_NAME, a)?),+
                    }
                    map.end()
                }
            }

            impl DecodeUnion for $union {
                const EXPECTING: &'static str =
                    concat!("a single-key map holding one ", stringify!($union));
                const MEMBERS: &'static [&'static str] = &[$(<$aspect as Aspect>::SCHEMA_NAME),+];

                fn decode_member<'de, M: MapAccess<'de>>(
                    name: &str,
                    map: &mut M,
                ) -> Result<Option<Self>, M::Error> {
                    $(
                        if name == <$aspect as Aspect>::SCHEMA_NAME {
                            return Ok(Some(Self::$aspect(map.next_value()?)));
                        }
                    )+
                    Ok(None)
                }
            }

            impl<'de> Deserialize<'de> for $union {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    deserializer.deserialize_map(UnionVisitor::<Self>(PhantomData))
                }
            }
        )+
    };
}

snapshots! {
    Chart(ChartSnapshot, ChartAspect, "chart", "com.linkedin.pegasus2avro.metadata.snapshot.ChartSnapshot") {
        ChartInfo, ChartQuery, Ownership, Status, GlobalTags,
    }
    CorpGroup(CorpGroupSnapshot, CorpGroupAspect, "corpGroup", "com.linkedin.pegasus2avro.metadata.snapshot.CorpGroupSnapshot") {
        CorpGroupInfo, GlobalTags,
    }
    CorpUser(CorpUserSnapshot, CorpUserAspect, "corpuser", "com.linkedin.pegasus2avro.metadata.snapshot.CorpUserSnapshot") {
        CorpUserInfo, CorpUserEditableInfo, GlobalTags,
    }
    Dashboard(DashboardSnapshot, DashboardAspect, "dashboard", "com.linkedin.pegasus2avro.metadata.snapshot.DashboardSnapshot") {
        DashboardInfo, Ownership, Status, GlobalTags,
    }
    DataFlow(DataFlowSnapshot, DataFlowAspect, "dataFlow", "com.linkedin.pegasus2avro.metadata.snapshot.DataFlowSnapshot") {
        DataFlowInfo, Ownership, Status, GlobalTags,
    }
    DataJob(DataJobSnapshot, DataJobAspect, "dataJob", "com.linkedin.pegasus2avro.metadata.snapshot.DataJobSnapshot") {
        DataJobInfo, DataJobInputOutput, Ownership, Status, GlobalTags,
    }
    DataProcess(DataProcessSnapshot, DataProcessAspect, "dataProcess", "com.linkedin.pegasus2avro.metadata.snapshot.DataProcessSnapshot") {
        Ownership, DataProcessInfo,
    }
    /// A metadata snapshot for a dataset entity.
    Dataset(DatasetSnapshot, DatasetAspect, "dataset", "com.linkedin.pegasus2avro.metadata.snapshot.DatasetSnapshot") {
        DatasetProperties, DatasetDeprecation, UpstreamLineage, InstitutionalMemory,
        Ownership, Status, SchemaMetadata, EditableSchemaMetadata, GlobalTags, GlossaryTerms,
    }
    GlossaryNode(GlossaryNodeSnapshot, GlossaryNodeAspect, "glossaryNode", "com.linkedin.pegasus2avro.metadata.snapshot.GlossaryNodeSnapshot") {
        GlossaryNodeInfo, Ownership,
    }
    GlossaryTerm(GlossaryTermSnapshot, GlossaryTermAspect, "glossaryTerm", "com.linkedin.pegasus2avro.metadata.snapshot.GlossaryTermSnapshot") {
        GlossaryTermInfo, Ownership,
    }
    MlFeature(MlFeatureSnapshot, MlFeatureAspect, "mlFeature", "com.linkedin.pegasus2avro.metadata.snapshot.MLFeatureSnapshot") {
        Ownership, MlFeatureProperties, InstitutionalMemory, Status, Deprecation,
    }
    MlModel(MlModelSnapshot, MlModelAspect, "mlModel", "com.linkedin.pegasus2avro.metadata.snapshot.MLModelSnapshot") {
        Ownership, MlModelProperties, InstitutionalMemory, Status, Deprecation,
    }
    Tag(TagSnapshot, TagAspect, "tag", "com.linkedin.pegasus2avro.metadata.snapshot.TagSnapshot") {
        Ownership, TagProperties,
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::Chart(ChartSnapshot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::common::TagAssociation;
    use pretty_assertions::assert_eq;

    fn dataset() -> DatasetSnapshot {
        DatasetSnapshot::new("urn:li:dataset:(urn:li:dataPlatform:hive,db.table,PROD)")
    }

    #[test]
    fn test_get_or_add_aspect_inserts_once() {
        let mut snapshot = dataset();
        snapshot
            .get_or_add_aspect(GlobalTags::default())
            .tags
            .push(TagAssociation::new("urn:li:tag:a"));
        snapshot
            .get_or_add_aspect(GlobalTags::default())
            .tags
            .push(TagAssociation::new("urn:li:tag:b"));

        assert_eq!(snapshot.count_aspects::<GlobalTags>(), 1);
        let tags = snapshot.aspect::<GlobalTags>().unwrap();
        assert_eq!(tags.tags.len(), 2);
    }

    #[test]
    fn test_get_or_add_aspect_returns_first_existing() {
        let mut snapshot = dataset()
            .with_aspect(Status::default())
            .with_aspect(GlobalTags {
                tags: vec![TagAssociation::new("urn:li:tag:first")],
            })
            .with_aspect(GlobalTags {
                tags: vec![TagAssociation::new("urn:li:tag:second")],
            });

        let tags = snapshot.get_or_add_aspect(GlobalTags::default());
        assert_eq!(tags.tags[0].tag, "urn:li:tag:first");
        assert_eq!(snapshot.aspects.len(), 3);
    }

    #[test]
    fn test_aspect_union_serializes_with_schema_name() {
        let snapshot = dataset().with_aspect(Status { removed: true });
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json["aspects"][0],
            serde_json::json!({"com.linkedin.pegasus2avro.common.Status": {"removed": true}})
        );
    }

    #[test]
    fn test_aspect_union_rejects_foreign_aspect() {
        // TagProperties is not legal on a dataset.
        let json = r#"{
            "urn": "urn:li:dataset:(urn:li:dataPlatform:hive,t,PROD)",
            "aspects": [{"com.linkedin.pegasus2avro.tag.TagProperties": {"name": "pii"}}]
        }"#;
        let err = serde_json::from_str::<DatasetSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("unknown variant"), "{err}");
    }

    #[test]
    fn test_aspect_union_rejects_multi_key_map() {
        let json = r#"{
            "com.linkedin.pegasus2avro.common.Status": {"removed": false},
            "com.linkedin.pegasus2avro.common.GlobalTags": {"tags": []}
        }"#;
        assert!(serde_json::from_str::<DatasetAspect>(json).is_err());
    }

    #[test]
    fn test_snapshot_kind_and_downcast() {
        let mut snapshot = Snapshot::from(dataset());
        assert_eq!(snapshot.kind(), SnapshotKind::Dataset);
        assert_eq!(snapshot.kind().entity_type(), "dataset");
        assert!(snapshot.as_kind::<DatasetSnapshot>().is_some());
        assert!(snapshot.as_kind::<ChartSnapshot>().is_none());
        assert!(snapshot.as_kind_mut::<DatasetSnapshot>().is_some());
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_aspect_order() {
        let snapshot = Snapshot::from(
            dataset()
                .with_aspect(Status::default())
                .with_aspect(DatasetProperties::default())
                .with_aspect(GlobalTags::default()),
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(
            restored.aspect_names(),
            vec!["status", "datasetProperties", "globalTags"]
        );
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_default_snapshot_is_structurally_valid() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.kind(), SnapshotKind::Chart);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
