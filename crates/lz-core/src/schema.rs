//! Versioned schema registry.
//!
//! Untyped JSON enters the system at three boundaries (declaration files,
//! directory responses, receipt files). Each boundary asks the registry to
//! turn a `serde_json::Value` into a typed record. The registry holds an
//! ordered list of validators per record kind; the first version that
//! accepts the document wins and the decoded record carries that version.
//!
//! Validators are compiled once by [`SchemaRegistry::new`] and never change
//! afterwards. Share the registry through an `Arc`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::artifact::ArtifactDeclaration;
use crate::error::{CoreError, SchemaError};
use crate::offer::OfferDocument;
use crate::receipt::Receipt;
use crate::validation::VerifiedReceipt;

/// Base URI of every embedded schema.
pub const SCHEMA_BASE: &str = "https://schemas.licensezero.com/1.0.0-pre/";

/// At most this many validation messages are kept in an error.
const MAX_REPORTED_ERRORS: usize = 5;

/// Shared sub-schemas referenced by the record schemas.
const SUBSCHEMAS: &[(&str, &str)] = &[
    ("currency.json", include_str!("../schemas/1.0.0-pre/currency.json")),
    ("jurisdiction.json", include_str!("../schemas/1.0.0-pre/jurisdiction.json")),
    ("key.json", include_str!("../schemas/1.0.0-pre/key.json")),
    ("name.json", include_str!("../schemas/1.0.0-pre/name.json")),
    ("price.json", include_str!("../schemas/1.0.0-pre/price.json")),
    ("signature.json", include_str!("../schemas/1.0.0-pre/signature.json")),
    ("time.json", include_str!("../schemas/1.0.0-pre/time.json")),
    ("url.json", include_str!("../schemas/1.0.0-pre/url.json")),
];

const OFFER_SCHEMA: &str = include_str!("../schemas/1.0.0-pre/offer.json");
const RECEIPT_SCHEMA: &str = include_str!("../schemas/1.0.0-pre/receipt.json");
const ARTIFACT_SCHEMA: &str = include_str!("../schemas/1.0.0-pre/artifact.json");

// ─────────────────────────────────────────────────────────────────────────────
// Kinds and versions
// ─────────────────────────────────────────────────────────────────────────────

/// The three record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Offer,
    Receipt,
    Artifact,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Offer => "offer",
            RecordKind::Receipt => "receipt",
            RecordKind::Artifact => "artifact declaration",
        })
    }
}

/// A schema version identifier, e.g. `1.0.0-pre`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaVersion(Cow<'static, str>);

impl SchemaVersion {
    /// The first published schema family.
    pub const V1_0_0_PRE: SchemaVersion = SchemaVersion(Cow::Borrowed("1.0.0-pre"));

    pub fn new(version: impl Into<String>) -> Self {
        Self(Cow::Owned(version.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded record tagged with the schema version that accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: SchemaVersion,
    pub record: T,
}

impl<T> Versioned<T> {
    pub fn into_inner(self) -> T {
        self.record
    }
}

/// Any decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Offer(Versioned<OfferDocument>),
    Receipt(Versioned<Receipt>),
    Artifact(Versioned<ArtifactDeclaration>),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Offer(_) => RecordKind::Offer,
            Record::Receipt(_) => RecordKind::Receipt,
            Record::Artifact(_) => RecordKind::Artifact,
        }
    }

    pub fn version(&self) -> &SchemaVersion {
        match self {
            Record::Offer(v) => &v.version,
            Record::Receipt(v) => &v.version,
            Record::Artifact(v) => &v.version,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validators
// ─────────────────────────────────────────────────────────────────────────────

/// Structural check of an untyped document against one schema version.
pub trait RecordValidator: Send + Sync {
    /// Returns the reasons the document was rejected, if any.
    fn validate(&self, value: &Value) -> Result<(), Vec<String>>;
}

/// Resolves `$ref`s between the embedded schemas without touching the network.
struct EmbeddedRetriever {
    schemas: HashMap<String, Value>,
}

impl jsonschema::Retrieve for EmbeddedRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str().trim_end_matches('#');
        self.schemas
            .get(uri_str)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

/// A JSON Schema (draft 2020-12) validator with format assertions on.
pub struct JsonSchemaValidator {
    schema_id: String,
    validator: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compile `schema`, resolving references against `resources`
    /// (a map from `$id` to schema document).
    pub fn new(schema: &Value, resources: HashMap<String, Value>) -> Result<Self, SchemaError> {
        let schema_id = schema
            .get("$id")
            .and_then(Value::as_str)
            .unwrap_or("<anonymous>")
            .to_string();

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .should_validate_formats(true)
            .with_retriever(EmbeddedRetriever { schemas: resources })
            .build(schema)
            .map_err(|e| SchemaError::Build {
                schema_id: schema_id.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            schema_id,
            validator,
        })
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }
}

impl RecordValidator for JsonSchemaValidator {
    fn validate(&self, value: &Value) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(value)
            .take(MAX_REPORTED_ERRORS)
            .map(|err| {
                let at = err.instance_path.to_string();
                if at.is_empty() {
                    err.to_string()
                } else {
                    format!("{at}: {err}")
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("schema_id", &self.schema_id)
            .finish()
    }
}

/// Rewrites a document of an older or newer shape into the shape the typed
/// records decode from.
pub type Upgrade = fn(Value) -> Value;

/// One accepted schema version for one record kind.
pub struct SchemaEntry {
    pub kind: RecordKind,
    pub version: SchemaVersion,
    validator: Box<dyn RecordValidator>,
    upgrade: Option<Upgrade>,
}

impl SchemaEntry {
    pub fn new(kind: RecordKind, version: SchemaVersion, validator: Box<dyn RecordValidator>) -> Self {
        Self {
            kind,
            version,
            validator,
            upgrade: None,
        }
    }

    /// Rewrite accepted documents before decoding.
    pub fn with_upgrade(mut self, upgrade: Upgrade) -> Self {
        self.upgrade = Some(upgrade);
        self
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("upgrade", &self.upgrade.is_some())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered validators for every record kind.
#[derive(Debug)]
pub struct SchemaRegistry {
    entries: Vec<SchemaEntry>,
}

impl SchemaRegistry {
    /// Compile the embedded `1.0.0-pre` schemas.
    pub fn new() -> Result<Self, SchemaError> {
        let mut resources = HashMap::new();
        for (file, text) in SUBSCHEMAS {
            resources.insert(format!("{SCHEMA_BASE}{file}"), load_embedded(file, text)?);
        }

        let mut entries = Vec::with_capacity(3);
        for (kind, file, text) in [
            (RecordKind::Offer, "offer.json", OFFER_SCHEMA),
            (RecordKind::Receipt, "receipt.json", RECEIPT_SCHEMA),
            (RecordKind::Artifact, "artifact.json", ARTIFACT_SCHEMA),
        ] {
            let schema = load_embedded(file, text)?;
            let validator = JsonSchemaValidator::new(&schema, resources.clone())?;
            entries.push(SchemaEntry::new(
                kind,
                SchemaVersion::V1_0_0_PRE,
                Box::new(validator),
            ));
        }

        Ok(Self { entries })
    }

    /// A registry with no versions at all; everything is unrecognized.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a version. It is tried before every version already registered
    /// for its kind.
    pub fn register(&mut self, entry: SchemaEntry) {
        let at = self
            .entries
            .iter()
            .position(|e| e.kind == entry.kind)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, entry);
    }

    /// Versions accepted for `kind`, in the order they are tried.
    pub fn versions(&self, kind: RecordKind) -> Vec<&SchemaVersion> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| &e.version)
            .collect()
    }

    /// Parse any record kind.
    pub fn parse(&self, kind: RecordKind, value: &Value) -> Result<Record, SchemaError> {
        Ok(match kind {
            RecordKind::Offer => Record::Offer(self.decode(kind, value)?),
            RecordKind::Receipt => Record::Receipt(self.decode(kind, value)?),
            RecordKind::Artifact => Record::Artifact(self.decode(kind, value)?),
        })
    }

    pub fn parse_offer(&self, value: &Value) -> Result<Versioned<OfferDocument>, SchemaError> {
        self.decode(RecordKind::Offer, value)
    }

    pub fn parse_receipt(&self, value: &Value) -> Result<Versioned<Receipt>, SchemaError> {
        self.decode(RecordKind::Receipt, value)
    }

    pub fn parse_artifact(
        &self,
        value: &Value,
    ) -> Result<Versioned<ArtifactDeclaration>, SchemaError> {
        self.decode(RecordKind::Artifact, value)
    }

    /// Parse raw bytes; anything that is not JSON is `Malformed`.
    pub fn parse_bytes(&self, kind: RecordKind, bytes: &[u8]) -> Result<Record, SchemaError> {
        let value = parse_json(kind, bytes)?;
        self.parse(kind, &value)
    }

    pub fn parse_offer_bytes(&self, bytes: &[u8]) -> Result<Versioned<OfferDocument>, SchemaError> {
        let value = parse_json(RecordKind::Offer, bytes)?;
        self.parse_offer(&value)
    }

    pub fn parse_artifact_bytes(
        &self,
        bytes: &[u8],
    ) -> Result<Versioned<ArtifactDeclaration>, SchemaError> {
        let value = parse_json(RecordKind::Artifact, bytes)?;
        self.parse_artifact(&value)
    }

    /// Parse a receipt and check its signature.
    pub fn ingest_receipt(&self, value: &Value) -> Result<VerifiedReceipt, CoreError> {
        let receipt = self.parse_receipt(value)?.into_inner();
        VerifiedReceipt::verify(receipt)
    }

    pub fn ingest_receipt_bytes(&self, bytes: &[u8]) -> Result<VerifiedReceipt, CoreError> {
        let value = parse_json(RecordKind::Receipt, bytes)?;
        self.ingest_receipt(&value)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        value: &Value,
    ) -> Result<Versioned<T>, SchemaError> {
        let mut rejected = Vec::new();

        for entry in self.entries.iter().filter(|e| e.kind == kind) {
            match entry.validator.validate(value) {
                Ok(()) => {
                    let decoded = match entry.upgrade {
                        Some(upgrade) => T::deserialize(&upgrade(value.clone())),
                        None => T::deserialize(value),
                    };
                    let record = decoded.map_err(|e| SchemaError::Decode {
                        kind,
                        reason: e.to_string(),
                    })?;
                    return Ok(Versioned {
                        version: entry.version.clone(),
                        record,
                    });
                }
                Err(reasons) => {
                    rejected.push(format!("{}: {}", entry.version, reasons.join("; ")));
                }
            }
        }

        let reason = if rejected.is_empty() {
            "no schema registered".to_string()
        } else {
            rejected.join(" | ")
        };
        Err(SchemaError::Unrecognized { kind, reason })
    }
}

fn parse_json(kind: RecordKind, bytes: &[u8]) -> Result<Value, SchemaError> {
    serde_json::from_slice(bytes).map_err(|e| SchemaError::Malformed {
        kind,
        reason: e.to_string(),
    })
}

fn load_embedded(file: &str, text: &str) -> Result<Value, SchemaError> {
    serde_json::from_str(text).map_err(|e| SchemaError::Build {
        schema_id: format!("{SCHEMA_BASE}{file}"),
        reason: e.to_string(),
    })
}
