use std::ops::Mul;

use dg_core::{DgError, ErrorInfo, IndexPosition, Signature};
use dg_sym::{Expr, Symbol};

use crate::dispatch::evaluate_cells;
use crate::index::{all_tuples, IntoMultiIndex};
use crate::indexed::IndexedObject;
use crate::manifold::Manifold;

/// Sparse symbolic tensor bound to a manifold, with a fixed signature.
///
/// Every operation returns a new tensor; operands are never mutated.
#[derive(Debug, Clone)]
pub struct Tensor {
    manifold: Manifold,
    signature: Signature,
    values: IndexedObject,
}

impl Tensor {
    /// Builds a tensor from a signature string over `u`/`l` (`d` is accepted
    /// for `l`) and initial components. Zero components are not stored.
    pub fn new<K, V>(
        manifold: &Manifold,
        signature: &str,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, DgError>
    where
        K: IntoMultiIndex,
        V: Into<Expr>,
    {
        let mut tensor = Self::zeros(manifold, signature.parse()?);
        for (index, value) in values {
            tensor.values.set(index, value)?;
        }
        Ok(tensor)
    }

    /// Tensor of the given signature with every component zero.
    pub fn zeros(manifold: &Manifold, signature: Signature) -> Self {
        let values = IndexedObject::new(manifold.names().clone(), signature.rank());
        Self::from_parts(manifold.clone(), signature, values)
    }

    /// Contravariant vector from one component per coordinate.
    pub fn vector(manifold: &Manifold, components: Vec<Expr>) -> Result<Self, DgError> {
        Self::rank_one(manifold, IndexPosition::Up, components)
    }

    /// Covariant vector from one component per coordinate.
    pub fn one_form(manifold: &Manifold, components: Vec<Expr>) -> Result<Self, DgError> {
        Self::rank_one(manifold, IndexPosition::Down, components)
    }

    fn rank_one(
        manifold: &Manifold,
        position: IndexPosition,
        components: Vec<Expr>,
    ) -> Result<Self, DgError> {
        if components.len() != manifold.dims() {
            return Err(DgError::Shape(
                ErrorInfo::new("component-count", "need one component per coordinate")
                    .with_context("dims", manifold.dims())
                    .with_context("found", components.len()),
            ));
        }
        let mut tensor = Self::zeros(manifold, Signature::new(vec![position]));
        for (k, value) in components.into_iter().enumerate() {
            tensor.values.put(vec![k], value);
        }
        Ok(tensor)
    }

    pub(crate) fn from_parts(manifold: Manifold, signature: Signature, values: IndexedObject) -> Self {
        Self {
            manifold,
            signature,
            values,
        }
    }

    /// Owning manifold.
    pub fn manifold(&self) -> &Manifold {
        &self.manifold
    }

    /// Per-slot index positions.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Number of slots.
    pub fn rank(&self) -> usize {
        self.signature.rank()
    }

    /// Dimension of the owning manifold.
    pub fn dims(&self) -> usize {
        self.manifold.dims()
    }

    /// Coordinates of the owning manifold.
    pub fn coords(&self) -> &[Symbol] {
        self.manifold.coords()
    }

    /// Component at `index`; names and positions may be mixed freely.
    pub fn get(&self, index: impl IntoMultiIndex) -> Result<Expr, DgError> {
        self.values.get(index)
    }

    /// Overwrites the component at `index`; zero removes it.
    pub fn set(&mut self, index: impl IntoMultiIndex, value: impl Into<Expr>) -> Result<(), DgError> {
        self.values.set(index, value)
    }

    /// Number of nonzero components.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when every component is zero.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Nonzero components in index order.
    pub fn entries(&self) -> impl Iterator<Item = (&[usize], &Expr)> + '_ {
        self.values.entries()
    }

    /// Underlying sparse storage.
    pub fn values(&self) -> &IndexedObject {
        &self.values
    }

    /// Copy with every component re-normalized.
    pub fn simplify(&self) -> Tensor {
        let mut out = self.clone();
        out.values.simplify();
        out
    }

    fn check_compatible(&self, other: &Tensor, op: &str) -> Result<(), DgError> {
        if !self.manifold.same_as(&other.manifold) {
            return Err(DgError::Signature(
                ErrorInfo::new("manifold-mismatch", "operands belong to different manifolds")
                    .with_context("op", op),
            ));
        }
        if self.signature != other.signature {
            return Err(DgError::Signature(
                ErrorInfo::new("signature-mismatch", "operand index positions differ")
                    .with_context("op", op)
                    .with_context("left", &self.signature)
                    .with_context("right", &other.signature),
            ));
        }
        Ok(())
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Tensor) -> Result<Tensor, DgError> {
        self.check_compatible(other, "add")?;
        let mut out = self.clone();
        for (key, value) in other.entries() {
            out.values.accumulate(key.to_vec(), value);
        }
        Ok(out)
    }

    /// Component-wise difference.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, DgError> {
        self.check_compatible(other, "sub")?;
        let mut out = self.clone();
        for (key, value) in other.entries() {
            out.values.accumulate(key.to_vec(), &-value);
        }
        Ok(out)
    }

    /// Every component multiplied by `scalar`.
    pub fn scale(&self, scalar: &Expr) -> Tensor {
        let mut values = IndexedObject::new(self.manifold.names().clone(), self.rank());
        for (key, value) in self.entries() {
            values.put(key.to_vec(), value * scalar);
        }
        Self::from_parts(self.manifold.clone(), self.signature.clone(), values)
    }

    /// Outer product; the signature is the concatenation of both operands.
    pub fn product(&self, other: &Tensor) -> Result<Tensor, DgError> {
        if !self.manifold.same_as(&other.manifold) {
            return Err(DgError::Signature(
                ErrorInfo::new("manifold-mismatch", "operands belong to different manifolds")
                    .with_context("op", "product"),
            ));
        }
        let signature = self.signature.concat(&other.signature);
        let mut values = IndexedObject::new(self.manifold.names().clone(), signature.rank());
        for (left_key, left) in self.entries() {
            for (right_key, right) in other.entries() {
                let mut key = left_key.to_vec();
                key.extend_from_slice(right_key);
                values.put(key, left * right);
            }
        }
        Ok(Self::from_parts(self.manifold.clone(), signature, values))
    }

    fn check_slot(&self, slot: usize) -> Result<IndexPosition, DgError> {
        self.signature.get(slot).ok_or_else(|| {
            DgError::Lookup(
                ErrorInfo::new("slot-out-of-range", "tensor has no such slot")
                    .with_context("slot", slot)
                    .with_context("rank", self.rank()),
            )
        })
    }

    /// Sums over slots `i` and `j` forced to a common index. The positions of
    /// the two slots are not checked against each other.
    pub fn contract(&self, i: usize, j: usize) -> Result<Tensor, DgError> {
        self.check_slot(i)?;
        self.check_slot(j)?;
        if i == j {
            return Err(DgError::Lookup(
                ErrorInfo::new("repeated-slot", "contraction needs two distinct slots")
                    .with_context("slot", i),
            ));
        }
        let signature = self.signature.without(&[i, j]);
        let mut values = IndexedObject::new(self.manifold.names().clone(), signature.rank());
        for (key, value) in self.entries().filter(|(key, _)| key[i] == key[j]) {
            let reduced = key
                .iter()
                .enumerate()
                .filter(|(slot, _)| *slot != i && *slot != j)
                .map(|(_, k)| *k)
                .collect();
            values.accumulate(reduced, value);
        }
        Ok(Self::from_parts(self.manifold.clone(), signature, values))
    }

    /// Raises `slot` with the inverse metric.
    pub fn raise_index(&self, slot: usize) -> Result<Tensor, DgError> {
        self.shift_index(slot, IndexPosition::Up)
    }

    /// Lowers `slot` with the metric.
    pub fn lower_index(&self, slot: usize) -> Result<Tensor, DgError> {
        self.shift_index(slot, IndexPosition::Down)
    }

    // result[.., σ, ..] = Σ_τ g[σ, τ] self[.., τ, ..] with g the metric or its inverse.
    fn shift_index(&self, slot: usize, target: IndexPosition) -> Result<Tensor, DgError> {
        let current = self.check_slot(slot)?;
        if current == target {
            let code = match target {
                IndexPosition::Up => "already-upper",
                IndexPosition::Down => "already-lower",
            };
            return Err(DgError::Position(
                ErrorInfo::new(code, "slot is already in the requested position")
                    .with_context("slot", slot)
                    .with_context("signature", &self.signature),
            ));
        }
        let matrix = match target {
            IndexPosition::Up => self.manifold.metric_inv_matrix(),
            IndexPosition::Down => self.manifold.metric_matrix(),
        };
        let signature = self.signature.with_position(slot, target);
        let mut values = IndexedObject::new(self.manifold.names().clone(), signature.rank());
        for (key, value) in self.entries() {
            let tau = key[slot];
            for sigma in 0..self.dims() {
                let Some(g) = matrix.get(sigma, tau).filter(|g| !g.is_zero()) else {
                    continue;
                };
                let mut shifted = key.to_vec();
                shifted[slot] = sigma;
                values.accumulate(shifted, &(g * value));
            }
        }
        Ok(Self::from_parts(self.manifold.clone(), signature, values))
    }

    /// Covariant derivative: appends a lower slot `σ` holding
    /// `∂_σ T^{..}_{..} + Σ_up Γ^{m}_{ασ} T^{..α..} - Σ_down Γ^{α}_{mσ} T_{..α..}`.
    pub fn diff(&self) -> Result<Tensor, DgError> {
        let rank = self.rank();
        let n = self.dims();
        let coords = self.coords();
        let gammas = self.manifold.christoffel().values();
        let positions = self.signature.positions();

        let cells = evaluate_cells(all_tuples(n, rank + 1), self.manifold.opts(), |key| {
            let (m, sigma) = (&key[..rank], key[rank]);
            let mut value = self.values.at(m).diff(&coords[sigma]);
            let mut shifted = m.to_vec();
            for (slot, position) in positions.iter().enumerate() {
                for alpha in 0..n {
                    shifted[slot] = alpha;
                    let Some(component) = self.values.stored(&shifted) else {
                        continue;
                    };
                    let gamma = match position {
                        IndexPosition::Up => gammas.stored(&[m[slot], alpha, sigma]),
                        IndexPosition::Down => gammas.stored(&[alpha, m[slot], sigma]),
                    };
                    let Some(gamma) = gamma else {
                        continue;
                    };
                    let term = component * gamma;
                    value = match position {
                        IndexPosition::Up => &value + &term,
                        IndexPosition::Down => &value - &term,
                    };
                }
                shifted[slot] = m[slot];
            }
            value
        })?;

        let signature = self.signature.pushed(IndexPosition::Down);
        let mut values = IndexedObject::new(self.manifold.names().clone(), signature.rank());
        for (key, value) in cells {
            values.put(key, value);
        }
        tracing::debug!(rank, dims = n, nonzero = values.len(), "covariant derivative");
        Ok(Self::from_parts(self.manifold.clone(), signature, values))
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.manifold.same_as(&other.manifold)
            && self.signature == other.signature
            && self.values == other.values
    }
}

impl Mul<&Expr> for &Tensor {
    type Output = Tensor;

    fn mul(self, rhs: &Expr) -> Tensor {
        self.scale(rhs)
    }
}

impl Mul<Expr> for Tensor {
    type Output = Tensor;

    fn mul(self, rhs: Expr) -> Tensor {
        self.scale(&rhs)
    }
}

impl Mul<&Tensor> for &Expr {
    type Output = Tensor;

    fn mul(self, rhs: &Tensor) -> Tensor {
        rhs.scale(self)
    }
}

impl Mul<Tensor> for Expr {
    type Output = Tensor;

    fn mul(self, rhs: Tensor) -> Tensor {
        rhs.scale(&self)
    }
}
