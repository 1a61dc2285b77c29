use dg_core::{DgError, ErrorInfo, SchemaVersion, Signature};
use dg_sym::Symbol;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::indexed::IndexedObject;
use crate::manifold::Manifold;
use crate::riemann::RiemannTensor;
use crate::serde::to_canonical_json_bytes;
use crate::tensor::Tensor;

/// One nonzero component of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    /// Integer index tuple.
    pub index: Vec<usize>,
    /// The same tuple spelled with coordinate names.
    pub coords: Vec<String>,
    /// Rendered component value.
    pub value: String,
}

/// Deterministic, hash-stamped listing of a tensor's nonzero components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorReport {
    /// Report schema version.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Index-position signature.
    pub signature: Signature,
    /// Coordinate names in canonical order.
    pub coords: Vec<String>,
    /// Manifold dimension.
    pub dims: usize,
    /// Number of slots.
    pub rank: usize,
    /// Nonzero components in index order.
    pub components: Vec<ComponentEntry>,
    /// SHA256 over the canonical JSON of the report with an empty hash.
    #[serde(default)]
    pub hash: String,
}

impl TensorReport {
    /// Report for a tensor.
    pub fn from_tensor(tensor: &Tensor) -> Result<Self, DgError> {
        Self::build(tensor.signature().clone(), tensor.coords(), tensor.values())
    }

    /// Report for a curvature tensor.
    pub fn from_riemann(riemann: &RiemannTensor) -> Result<Self, DgError> {
        Self::from_tensor(riemann.as_tensor())
    }

    /// Report for the connection coefficients of `manifold`.
    pub fn from_connection(manifold: &Manifold) -> Result<Self, DgError> {
        let gammas = manifold.christoffel();
        Self::build(gammas.signature(), manifold.coords(), gammas.values())
    }

    fn build(signature: Signature, coords: &[Symbol], values: &IndexedObject) -> Result<Self, DgError> {
        let components = values
            .entries()
            .map(|(index, value)| ComponentEntry {
                index: index.to_vec(),
                coords: index.iter().map(|k| coords[*k].name().to_string()).collect(),
                value: value.to_string(),
            })
            .collect();
        let mut report = Self {
            schema_version: SchemaVersion::default(),
            rank: signature.rank(),
            signature,
            coords: coords.iter().map(|sym| sym.name().to_string()).collect(),
            dims: coords.len(),
            components,
            hash: String::new(),
        };
        report.hash = report.compute_hash()?;
        Ok(report)
    }

    fn compute_hash(&self) -> Result<String, DgError> {
        let mut unhashed = self.clone();
        unhashed.hash.clear();
        let digest = Sha256::digest(to_canonical_json_bytes(&unhashed)?);
        Ok(format!("{digest:x}"))
    }

    /// Recomputes the hash and fails if it differs from the stored one.
    pub fn verify(&self) -> Result<(), DgError> {
        let expected = self.compute_hash()?;
        if expected != self.hash {
            return Err(DgError::Serde(
                ErrorInfo::new("hash-mismatch", "report contents do not match their hash")
                    .with_context("expected", expected)
                    .with_context("found", &self.hash),
            ));
        }
        Ok(())
    }
}
