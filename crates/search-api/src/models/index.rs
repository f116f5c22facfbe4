//! Index definition models.
//!
//! These mirror the JSON shape of an index definition as accepted by
//! `POST /indexes` and returned by `GET /indexes/{name}`.

use serde::{Deserialize, Serialize};

/// EDM type for string fields.
pub const EDM_STRING: &str = "Edm.String";

/// EDM type for 32-bit float vector fields.
pub const EDM_SINGLE_COLLECTION: &str = "Collection(Edm.Single)";

/// Element types the service accepts for vector fields.
const VECTOR_ELEMENT_TYPES: [&str; 5] = [
    "Collection(Edm.Single)",
    "Collection(Edm.Half)",
    "Collection(Edm.Int16)",
    "Collection(Edm.SByte)",
    "Collection(Edm.Byte)",
];

/// Returns true if `field_type` is one of the vector collection types.
pub fn is_vector_type(field_type: &str) -> bool {
    VECTOR_ELEMENT_TYPES.contains(&field_type)
}

/// A search index definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    /// Index name (lowercase letters, digits, dashes).
    pub name: String,

    /// Field definitions.
    pub fields: Vec<SearchField>,

    /// Vector search algorithms and profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_search: Option<VectorSearch>,

    /// Semantic ranking configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticSearch>,

    /// ETag returned by the service.
    #[serde(
        rename = "@odata.etag",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub etag: Option<String>,
}

impl SearchIndex {
    /// Creates an index definition with the given fields.
    pub fn new(name: impl Into<String>, fields: Vec<SearchField>) -> Self {
        Self {
            name: name.into(),
            fields,
            vector_search: None,
            semantic: None,
            etag: None,
        }
    }

    /// Returns the field with the given name.
    pub fn field(&self, name: &str) -> Option<&SearchField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the key field.
    pub fn key_field(&self) -> Option<&SearchField> {
        self.fields.iter().find(|f| f.key == Some(true))
    }

    /// Returns the first field that holds vector data.
    pub fn first_vector_field(&self) -> Option<&SearchField> {
        self.fields.iter().find(|f| f.is_vector())
    }

    /// Returns the algorithm configuration bound to a vector search profile.
    pub fn algorithm_for_profile(&self, profile: &str) -> Option<&VectorSearchAlgorithm> {
        let vector_search = self.vector_search.as_ref()?;
        let profile = vector_search.profiles.iter().find(|p| p.name == profile)?;
        vector_search
            .algorithms
            .iter()
            .find(|a| a.name == profile.algorithm)
    }
}

/// A single field of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchField {
    /// Field name.
    pub name: String,

    /// EDM type, e.g. `Edm.String` or `Collection(Edm.Single)`.
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrievable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facetable: Option<bool>,

    /// Vector dimensionality, only set on vector fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    /// Vector search profile name, only set on vector fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_search_profile: Option<String>,
}

impl SearchField {
    /// Creates a field with no attributes set; the service applies its defaults.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            key: None,
            searchable: None,
            filterable: None,
            retrievable: None,
            sortable: None,
            facetable: None,
            dimensions: None,
            vector_search_profile: None,
        }
    }

    /// Creates a `Collection(Edm.Single)` vector field bound to a profile.
    pub fn vector(name: impl Into<String>, dimensions: usize, profile: impl Into<String>) -> Self {
        Self {
            searchable: Some(true),
            retrievable: Some(false),
            dimensions: Some(dimensions),
            vector_search_profile: Some(profile.into()),
            ..Self::new(name, EDM_SINGLE_COLLECTION)
        }
    }

    /// Marks the field as the document key.
    pub fn key(mut self) -> Self {
        self.key = Some(true);
        self
    }

    pub fn searchable(mut self, value: bool) -> Self {
        self.searchable = Some(value);
        self
    }

    pub fn filterable(mut self, value: bool) -> Self {
        self.filterable = Some(value);
        self
    }

    pub fn retrievable(mut self, value: bool) -> Self {
        self.retrievable = Some(value);
        self
    }

    pub fn sortable(mut self, value: bool) -> Self {
        self.sortable = Some(value);
        self
    }

    pub fn facetable(mut self, value: bool) -> Self {
        self.facetable = Some(value);
        self
    }

    /// Returns true if the field holds vector data: a vector collection type
    /// with a dimensionality attribute.
    pub fn is_vector(&self) -> bool {
        self.dimensions.is_some() && is_vector_type(&self.field_type)
    }
}

/// Vector search configuration of an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearch {
    #[serde(default)]
    pub algorithms: Vec<VectorSearchAlgorithm>,

    #[serde(default)]
    pub profiles: Vec<VectorSearchProfile>,
}

/// A named vector search algorithm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchAlgorithm {
    pub name: String,

    /// `hnsw` or `exhaustiveKnn`.
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hnsw_parameters: Option<HnswParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhaustive_knn_parameters: Option<ExhaustiveKnnParameters>,
}

impl VectorSearchAlgorithm {
    /// Creates an HNSW algorithm configuration.
    pub fn hnsw(name: impl Into<String>, parameters: HnswParameters) -> Self {
        Self {
            name: name.into(),
            kind: "hnsw".to_string(),
            hnsw_parameters: Some(parameters),
            exhaustive_knn_parameters: None,
        }
    }

    /// Returns the similarity metric, whichever parameter block carries it.
    pub fn metric(&self) -> Option<&str> {
        self.hnsw_parameters
            .as_ref()
            .and_then(|p| p.metric.as_deref())
            .or_else(|| {
                self.exhaustive_knn_parameters
                    .as_ref()
                    .and_then(|p| p.metric.as_deref())
            })
    }
}

/// HNSW tuning parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_construction: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_search: Option<u32>,

    /// `cosine`, `euclidean`, `dotProduct`, or `hamming`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

/// Exhaustive KNN parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhaustiveKnnParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

/// Binds vector fields to an algorithm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchProfile {
    pub name: String,
    /// Name of the algorithm configuration.
    pub algorithm: String,
}

/// Semantic ranking settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<String>,

    #[serde(default)]
    pub configurations: Vec<SemanticConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticConfiguration {
    pub name: String,
    pub prioritized_fields: SemanticPrioritizedFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticPrioritizedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field: Option<SemanticField>,

    #[serde(default)]
    pub prioritized_content_fields: Vec<SemanticField>,

    #[serde(default)]
    pub prioritized_keywords_fields: Vec<SemanticField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticField {
    pub field_name: String,
}

impl SemanticField {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

/// Response of `GET /indexes?$select=name`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IndexNameList {
    pub value: Vec<IndexName>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IndexName {
    pub name: String,
}
