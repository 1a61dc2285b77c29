use std::collections::BTreeMap;
use std::sync::Arc;

use dg_core::{DgError, IndexPosition, Signature};
use dg_sym::{Expr, Matrix, Symbol};

use crate::dispatch::evaluate_cells;
use crate::index::{all_tuples, IntoMultiIndex};
use crate::indexed::IndexedObject;
use crate::opts::EngineOpts;

/// Levi-Civita connection coefficients `Γ^μ_{αβ}` of a metric.
///
/// Stored sparsely with signature `ull`; vanishing coefficients are dropped,
/// so an empty connection means the metric is constant in its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Christoffel {
    values: IndexedObject,
}

impl Christoffel {
    /// Computes
    /// `Γ^μ_{αβ} = ½ Σ_ν g^{μν} (∂_β g_{αν} + ∂_α g_{νβ} - ∂_ν g_{αβ})`.
    pub(crate) fn compute(
        metric: &Matrix,
        metric_inv: &Matrix,
        coords: &[Symbol],
        names: Arc<BTreeMap<Symbol, usize>>,
        opts: &EngineOpts,
    ) -> Result<Self, DgError> {
        let n = coords.len();
        // partials[a][b][c] = ∂g_{ab}/∂x^c
        let partials: Vec<Vec<Vec<Expr>>> = (0..n)
            .map(|a| {
                (0..n)
                    .map(|b| {
                        let g_ab = metric.get(a, b).cloned().unwrap_or_default();
                        coords.iter().map(|x| g_ab.diff(x)).collect()
                    })
                    .collect()
            })
            .collect();
        let half = Expr::ratio(1, 2)?;

        let cells = evaluate_cells(all_tuples(n, 3), opts, |key| {
            let (mu, alpha, beta) = (key[0], key[1], key[2]);
            let sum: Expr = (0..n)
                .filter_map(|nu| {
                    let inv = metric_inv.get(mu, nu).filter(|g| !g.is_zero())?;
                    let bracket = &(&partials[alpha][nu][beta] + &partials[nu][beta][alpha])
                        - &partials[alpha][beta][nu];
                    Some(inv * &bracket)
                })
                .sum();
            &sum * &half
        })?;

        let mut values = IndexedObject::new(names, 3);
        for (key, value) in cells {
            values.put(key, value);
        }
        tracing::debug!(dims = n, nonzero = values.len(), "christoffel connection computed");
        Ok(Self { values })
    }

    /// Always `ull`.
    pub fn signature(&self) -> Signature {
        Signature::new(vec![
            IndexPosition::Up,
            IndexPosition::Down,
            IndexPosition::Down,
        ])
    }

    /// Coefficient at `index`, addressed by position or coordinate name.
    pub fn get(&self, index: impl IntoMultiIndex) -> Result<Expr, DgError> {
        self.values.get(index)
    }

    /// Number of nonzero coefficients.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when every coefficient vanishes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Underlying sparse storage.
    pub fn values(&self) -> &IndexedObject {
        &self.values
    }

    pub(crate) fn at(&self, mu: usize, alpha: usize, beta: usize) -> Expr {
        self.values.at(&[mu, alpha, beta])
    }
}
