//! Index layout used by the adapter and introspection of existing indexes.

use azure_search_api_rs::models::{
    HnswParameters, SearchField, SearchIndex, SemanticConfiguration, SemanticField,
    SemanticPrioritizedFields, SemanticSearch, VectorSearch, VectorSearchAlgorithm,
    VectorSearchProfile, EDM_STRING,
};
use serde::Deserialize;

use crate::store::Metric;

/// Vector field name used when an index exposes none that can be detected.
pub const DEFAULT_VECTOR_FIELD: &str = "content_vector";

pub const KEY_FIELD: &str = "id";
pub const CONTENT_FIELD: &str = "content";
/// Holds the metadata object serialized as a JSON string.
pub const METADATA_FIELD: &str = "metadata";

pub const ALGORITHM_NAME: &str = "hnsw-config";
pub const PROFILE_NAME: &str = "vector-profile";
pub const SEMANTIC_CONFIGURATION_NAME: &str = "default-semantic";

/// EDM type of a caller-declared filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    String,
    Int32,
    Int64,
    Double,
    Boolean,
    DateTimeOffset,
    StringCollection,
}

impl FieldType {
    pub fn edm_type(self) -> &'static str {
        match self {
            FieldType::String => EDM_STRING,
            FieldType::Int32 => "Edm.Int32",
            FieldType::Int64 => "Edm.Int64",
            FieldType::Double => "Edm.Double",
            FieldType::Boolean => "Edm.Boolean",
            FieldType::DateTimeOffset => "Edm.DateTimeOffset",
            FieldType::StringCollection => "Collection(Edm.String)",
        }
    }
}

/// A top-level field whose value is copied from the metadata key of the same
/// name at upsert, so filters can target it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// HNSW tuning knobs. Unset values use the service defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswOptions {
    pub m: Option<u32>,
    pub ef_construction: Option<u32>,
    pub ef_search: Option<u32>,
}

/// Options accepted by `create_index` on the Azure store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureIndexOptions {
    /// Name of the vector field; the store's configured name when unset.
    pub vector_field: Option<String>,
    pub filterable_fields: Vec<FieldSpec>,
    pub hnsw: HnswOptions,
    /// Adds a semantic configuration prioritizing the `content` field.
    pub semantic: bool,
}

/// What the adapter needs to know about an index.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IndexSchema {
    pub vector_field: String,
    /// `None` when the index has no detectable vector field.
    pub dimension: Option<usize>,
    pub metric: Metric,
    /// Filterable fields populated from metadata at upsert.
    pub projected_fields: Vec<String>,
}

impl IndexSchema {
    /// Reads the layout of an existing index definition.
    ///
    /// `preferred_vector_field` wins when the index has a vector field of that
    /// name; otherwise the first vector field is used.
    pub fn from_definition(index: &SearchIndex, preferred_vector_field: Option<&str>) -> Self {
        let vector = preferred_vector_field
            .and_then(|name| index.field(name))
            .filter(|f| f.is_vector())
            .or_else(|| detect_vector_field(index));

        let metric = vector
            .and_then(|f| f.vector_search_profile.as_deref())
            .and_then(|profile| index.algorithm_for_profile(profile))
            .and_then(|algorithm| algorithm.metric())
            .and_then(Metric::from_service_name)
            .unwrap_or_default();

        let projected_fields = index
            .fields
            .iter()
            .filter(|f| f.filterable == Some(true))
            .filter(|f| !is_reserved(&f.name) && !f.is_vector())
            .map(|f| f.name.clone())
            .collect();

        Self {
            vector_field: vector
                .map(|f| f.name.clone())
                .or_else(|| preferred_vector_field.map(str::to_string))
                .unwrap_or_else(|| DEFAULT_VECTOR_FIELD.to_string()),
            dimension: vector.and_then(|f| f.dimensions),
            metric,
            projected_fields,
        }
    }
}

/// Finds the field that holds vectors: the first field with a vector
/// collection type and a `dimensions` attribute.
pub fn detect_vector_field(index: &SearchIndex) -> Option<&SearchField> {
    index.first_vector_field()
}

fn is_reserved(name: &str) -> bool {
    matches!(name, KEY_FIELD | CONTENT_FIELD | METADATA_FIELD)
}

/// Builds the definition `create_index` sends.
pub fn index_definition(
    name: &str,
    dimension: usize,
    metric: Metric,
    vector_field: &str,
    options: &AzureIndexOptions,
) -> SearchIndex {
    let mut fields = vec![
        SearchField::new(KEY_FIELD, EDM_STRING)
            .key()
            .filterable(true)
            .retrievable(true),
        SearchField::new(CONTENT_FIELD, EDM_STRING)
            .searchable(true)
            .retrievable(true),
        SearchField::new(METADATA_FIELD, EDM_STRING)
            .searchable(false)
            .filterable(false)
            .retrievable(true),
        SearchField::vector(vector_field, dimension, PROFILE_NAME),
    ];
    fields.extend(options.filterable_fields.iter().map(|spec| {
        SearchField::new(&spec.name, spec.field_type.edm_type())
            .filterable(true)
            .retrievable(true)
    }));

    let parameters = HnswParameters {
        m: options.hnsw.m,
        ef_construction: options.hnsw.ef_construction,
        ef_search: options.hnsw.ef_search,
        metric: Some(metric.service_name().to_string()),
    };

    let mut index = SearchIndex::new(name, fields);
    index.vector_search = Some(VectorSearch {
        algorithms: vec![VectorSearchAlgorithm::hnsw(ALGORITHM_NAME, parameters)],
        profiles: vec![VectorSearchProfile {
            name: PROFILE_NAME.to_string(),
            algorithm: ALGORITHM_NAME.to_string(),
        }],
    });

    if options.semantic {
        index.semantic = Some(SemanticSearch {
            default_configuration: Some(SEMANTIC_CONFIGURATION_NAME.to_string()),
            configurations: vec![SemanticConfiguration {
                name: SEMANTIC_CONFIGURATION_NAME.to_string(),
                prioritized_fields: SemanticPrioritizedFields {
                    prioritized_content_fields: vec![SemanticField::new(CONTENT_FIELD)],
                    ..Default::default()
                },
            }],
        });
    }

    index
}
