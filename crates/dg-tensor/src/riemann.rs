use dg_core::{DgError, IndexPosition, Signature};
use dg_sym::Expr;

use crate::dispatch::evaluate_cells;
use crate::index::{all_tuples, IntoMultiIndex};
use crate::indexed::IndexedObject;
use crate::manifold::Manifold;
use crate::opts::EngineOpts;
use crate::tensor::Tensor;

/// Riemann curvature `R^α_{βμν}` of a manifold, signature `ulll`.
///
/// Owns its storage; nothing is cached on the manifold.
#[derive(Debug, Clone, PartialEq)]
pub struct RiemannTensor {
    tensor: Tensor,
}

impl RiemannTensor {
    /// Computes the curvature with the manifold's own options.
    pub fn new(manifold: &Manifold) -> Result<Self, DgError> {
        Self::with_opts(manifold, manifold.opts())
    }

    /// Computes
    /// `R^α_{βμν} = ∂_μ Γ^α_{βν} - ∂_ν Γ^α_{βμ} + Σ_σ (Γ^α_{σμ} Γ^σ_{βν} - Γ^α_{σν} Γ^σ_{βμ})`.
    pub fn with_opts(manifold: &Manifold, opts: &EngineOpts) -> Result<Self, DgError> {
        let n = manifold.dims();
        let coords = manifold.coords();
        let gammas = manifold.christoffel();
        let simplify = opts.simplify_curvature;

        let cells = evaluate_cells(all_tuples(n, 4), opts, |key| {
            let (alpha, beta, mu, nu) = (key[0], key[1], key[2], key[3]);
            let mut value = &gammas.at(alpha, beta, nu).diff(&coords[mu])
                - &gammas.at(alpha, beta, mu).diff(&coords[nu]);
            for sigma in 0..n {
                let forward = &gammas.at(alpha, sigma, mu) * &gammas.at(sigma, beta, nu);
                let backward = &gammas.at(alpha, sigma, nu) * &gammas.at(sigma, beta, mu);
                value = &value + &(&forward - &backward);
            }
            if simplify {
                value.simplify()
            } else {
                value
            }
        })?;

        let signature = Signature::new(vec![
            IndexPosition::Up,
            IndexPosition::Down,
            IndexPosition::Down,
            IndexPosition::Down,
        ]);
        let mut values = IndexedObject::new(manifold.names().clone(), 4);
        for (key, value) in cells {
            values.put(key, value);
        }
        tracing::debug!(dims = n, nonzero = values.len(), "riemann tensor computed");
        Ok(Self {
            tensor: Tensor::from_parts(manifold.clone(), signature, values),
        })
    }

    /// Component at `index`.
    pub fn get(&self, index: impl IntoMultiIndex) -> Result<Expr, DgError> {
        self.tensor.get(index)
    }

    /// Number of nonzero components.
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    /// True for a flat metric.
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Copy with every component re-normalized.
    pub fn simplify(&self) -> RiemannTensor {
        Self {
            tensor: self.tensor.simplify(),
        }
    }

    /// Ricci tensor `R_{βν} = R^α_{βαν}`.
    pub fn ricci(&self) -> Result<Tensor, DgError> {
        self.tensor.contract(0, 2)
    }

    /// Ricci scalar `g^{βν} R_{βν}`.
    pub fn ricci_scalar(&self) -> Result<Expr, DgError> {
        let mixed = self.ricci()?.raise_index(0)?;
        Ok(mixed.contract(0, 1)?.get(())?.simplify())
    }

    /// Borrow as a plain tensor.
    pub fn as_tensor(&self) -> &Tensor {
        &self.tensor
    }
}
