//! Dataset schema aspects.
//!
//! Field types and platform schemas are closed unions; each member serializes
//! keyed by its fully qualified schema name, matching the wire layout of the
//! metadata service.

use serde::{Deserialize, Serialize};

use super::common::{AuditStamp, GlobalTags, GlossaryTerms};

macro_rules! empty_types {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            pub struct $name {}
        )+
    };
}

empty_types!(
    BooleanType,
    FixedType,
    StringType,
    BytesType,
    NumberType,
    DateType,
    TimeType,
    EnumType,
    NullType,
    RecordType,
    Schemaless,
);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapType {
    pub key_type: Option<String>,
    pub value_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayType {
    pub nested_type: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionType {
    pub nested_types: Option<Vec<String>>,
}

/// The logical type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "com.linkedin.pegasus2avro.schema.BooleanType")]
    Boolean(BooleanType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.FixedType")]
    Fixed(FixedType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.StringType")]
    String(StringType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.BytesType")]
    Bytes(BytesType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.NumberType")]
    Number(NumberType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.DateType")]
    Date(DateType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.TimeType")]
    Time(TimeType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.EnumType")]
    Enum(EnumType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.NullType")]
    Null(NullType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.MapType")]
    Map(MapType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.ArrayType")]
    Array(ArrayType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.UnionType")]
    Union(UnionType),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.RecordType")]
    Record(RecordType),
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Boolean(BooleanType {})
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFieldDataType {
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl From<FieldType> for SchemaFieldDataType {
    fn from(field_type: FieldType) -> Self {
        Self { field_type }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub field_path: String,
    pub json_path: Option<String>,
    #[serde(default)]
    pub nullable: bool,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub field_type: SchemaFieldDataType,
    pub native_data_type: String,
    #[serde(default)]
    pub recursive: bool,
    pub global_tags: Option<GlobalTags>,
    pub glossary_terms: Option<GlossaryTerms>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspressoSchema {
    pub document_schema: String,
    pub table_schema: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchemaDdl {
    pub table_schema: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    pub raw_schema: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KafkaSchema {
    pub document_schema: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSchema {
    pub schema: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueSchema {
    pub key_schema: String,
    pub value_schema: String,
}

/// The native schema representation of the platform the dataset lives on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformSchema {
    #[serde(rename = "com.linkedin.pegasus2avro.schema.EspressoSchema")]
    Espresso(EspressoSchema),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.OracleDDL")]
    OracleDdl(TableSchemaDdl),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.MySqlDDL")]
    MySqlDdl(TableSchemaDdl),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.PrestoDDL")]
    PrestoDdl(RawSchema),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.KafkaSchema")]
    Kafka(KafkaSchema),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.BinaryJsonSchema")]
    BinaryJson(DocumentSchema),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.OrcSchema")]
    Orc(DocumentSchema),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.Schemaless")]
    Schemaless(Schemaless),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.KeyValueSchema")]
    KeyValue(KeyValueSchema),
    #[serde(rename = "com.linkedin.pegasus2avro.schema.OtherSchema")]
    Other(RawSchema),
}

impl Default for PlatformSchema {
    fn default() -> Self {
        Self::Espresso(EspressoSchema::default())
    }
}

/// Schema of a dataset as seen by its platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    pub schema_name: String,
    /// Data platform URN, e.g. `urn:li:dataPlatform:mysql`.
    pub platform: String,
    pub version: i64,
    pub created: AuditStamp,
    pub last_modified: AuditStamp,
    pub deleted: Option<AuditStamp>,
    pub dataset: Option<String>,
    pub cluster: Option<String>,
    pub hash: String,
    pub platform_schema: PlatformSchema,
    pub fields: Vec<SchemaField>,
    pub primary_keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableSchemaFieldInfo {
    pub field_path: String,
    pub description: Option<String>,
    pub global_tags: Option<GlobalTags>,
}

/// Schema edits made outside ingestion, kept apart so pipelines never
/// overwrite them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableSchemaMetadata {
    pub created: AuditStamp,
    pub last_modified: AuditStamp,
    pub deleted: Option<AuditStamp>,
    pub editable_schema_field_info: Vec<EditableSchemaFieldInfo>,
}
