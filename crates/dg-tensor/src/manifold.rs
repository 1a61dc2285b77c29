use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use dg_core::{DgError, ErrorInfo, IndexPosition, Signature};
use dg_sym::{Equation, Expr, Matrix, Symbol};

use crate::christoffel::Christoffel;
use crate::index::names_map;
use crate::indexed::IndexedObject;
use crate::opts::EngineOpts;
use crate::tensor::Tensor;

/// Curve parameter used by [`Manifold::four_velocity`].
pub const DEFAULT_CURVE_PARAMETER: &str = "tau";

#[derive(Debug)]
struct ManifoldInner {
    metric: Matrix,
    metric_inv: Matrix,
    coords: Vec<Symbol>,
    names: Arc<BTreeMap<Symbol, usize>>,
    gammas: Christoffel,
    opts: EngineOpts,
}

/// Coordinate system with a symmetric metric and its Levi-Civita connection.
///
/// Cloning is cheap and clones share identity: tensors only combine when
/// they belong to the same manifold instance.
#[derive(Debug, Clone)]
pub struct Manifold {
    inner: Arc<ManifoldInner>,
}

impl Manifold {
    /// Builds a manifold with default options.
    pub fn new(metric: Matrix, coords: Vec<Symbol>) -> Result<Self, DgError> {
        Self::with_opts(metric, coords, &EngineOpts::default())
    }

    /// Builds a manifold, inverting the metric and computing the connection
    /// eagerly under `opts`.
    pub fn with_opts(
        metric: Matrix,
        coords: Vec<Symbol>,
        opts: &EngineOpts,
    ) -> Result<Self, DgError> {
        opts.validate()?;
        validate_coords(&coords)?;
        if !metric.is_square() || metric.rows() != coords.len() {
            return Err(DgError::Shape(
                ErrorInfo::new("metric-shape", "metric must be n x n for n coordinates")
                    .with_context("metric", format!("{}x{}", metric.rows(), metric.cols()))
                    .with_context("coords", coords.len()),
            ));
        }
        if !metric.is_symmetric() {
            return Err(DgError::shape("asymmetric-metric", "metric must be symmetric"));
        }
        let metric_inv = metric.inverse()?;
        let names = Arc::new(names_map(&coords));
        let gammas = Christoffel::compute(&metric, &metric_inv, &coords, names.clone(), opts)?;
        Ok(Self {
            inner: Arc::new(ManifoldInner {
                metric,
                metric_inv,
                coords,
                names,
                gammas,
                opts: opts.clone(),
            }),
        })
    }

    /// True when both handles refer to the same manifold instance.
    pub fn same_as(&self, other: &Manifold) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of coordinates.
    pub fn dims(&self) -> usize {
        self.inner.coords.len()
    }

    /// Ordered coordinate symbols.
    pub fn coords(&self) -> &[Symbol] {
        &self.inner.coords
    }

    /// Options the manifold was built with.
    pub fn opts(&self) -> &EngineOpts {
        &self.inner.opts
    }

    /// Raw metric matrix.
    pub fn metric_matrix(&self) -> &Matrix {
        &self.inner.metric
    }

    /// Raw inverse metric matrix.
    pub fn metric_inv_matrix(&self) -> &Matrix {
        &self.inner.metric_inv
    }

    /// Metric as a fresh `ll` tensor.
    pub fn metric(&self) -> Tensor {
        self.matrix_tensor(&self.inner.metric, IndexPosition::Down)
    }

    /// Inverse metric as a fresh `uu` tensor.
    ///
    /// Construction already rejects singular metrics, so the inverse always
    /// exists here.
    pub fn metric_inv(&self) -> Tensor {
        self.matrix_tensor(&self.inner.metric_inv, IndexPosition::Up)
    }

    /// Connection coefficients.
    pub fn christoffel(&self) -> &Christoffel {
        &self.inner.gammas
    }

    pub(crate) fn names(&self) -> &Arc<BTreeMap<Symbol, usize>> {
        &self.inner.names
    }

    fn matrix_tensor(&self, matrix: &Matrix, position: IndexPosition) -> Tensor {
        let n = self.dims();
        let mut values = IndexedObject::new(self.names().clone(), 2);
        for i in 0..n {
            for j in 0..n {
                if let Some(value) = matrix.get(i, j) {
                    values.put(vec![i, j], value.clone());
                }
            }
        }
        Tensor::from_parts(self.clone(), Signature::new(vec![position; 2]), values)
    }

    /// Re-expresses the metric in `new_coords`, where `map` gives every old
    /// coordinate as an expression of the new ones:
    /// `g'_{ij} = Σ_{kl} g_{kl}(x(y)) ∂x^k/∂y^i ∂x^l/∂y^j`.
    pub fn transform(
        &self,
        new_coords: Vec<Symbol>,
        map: &BTreeMap<Symbol, Expr>,
    ) -> Result<Manifold, DgError> {
        validate_coords(&new_coords)?;
        if new_coords.len() != self.dims() {
            return Err(DgError::Shape(
                ErrorInfo::new("coordinate-count", "transform must keep the dimension")
                    .with_context("old", self.dims())
                    .with_context("new", new_coords.len()),
            ));
        }
        if let Some(extra) = map.keys().find(|sym| !self.inner.names.contains_key(*sym)) {
            return Err(DgError::Lookup(
                ErrorInfo::new("unknown-coordinate", "transform maps a name that is not a coordinate")
                    .with_context("name", extra),
            ));
        }
        let old_exprs = self
            .coords()
            .iter()
            .map(|old| {
                map.get(old).ok_or_else(|| {
                    DgError::Lookup(
                        ErrorInfo::new("missing-coordinate", "transform leaves a coordinate unmapped")
                            .with_context("name", old),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let jacobian_rows: Vec<Vec<Expr>> = old_exprs
            .iter()
            .map(|old| new_coords.iter().map(|y| old.diff(y)).collect())
            .collect();
        let jacobian = Matrix::from_rows(jacobian_rows)?;
        let substituted = self.inner.metric.subs(map)?;
        let metric = jacobian
            .transpose()
            .mul(&substituted)?
            .mul(&jacobian)?
            .map(Expr::simplify);
        tracing::debug!(
            dims = self.dims(),
            from = ?self.coords(),
            to = ?new_coords,
            "coordinate transform"
        );
        Manifold::with_opts(metric, new_coords, self.opts())
    }

    /// Geodesic equations `d²x^i/ds² = Σ_{jk} Γ^i_{jk} dx^j/ds dx^k/ds` in
    /// curve parameter `parameter`, returned with the parameter symbol.
    pub fn geodesic_equations(&self, parameter: &str) -> Result<(Vec<Equation>, Symbol), DgError> {
        let param = self.curve_parameter(parameter)?;
        let n = self.dims();
        let velocities: Vec<Expr> = self
            .coords()
            .iter()
            .map(|x| Expr::derivative(x, &param, 1))
            .collect();
        let gammas = self.christoffel();
        let equations = self
            .coords()
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let rhs: Expr = (0..n)
                    .flat_map(|j| (0..n).map(move |k| (j, k)))
                    .filter_map(|(j, k)| {
                        let gamma = gammas.values().stored(&[i, j, k])?;
                        Some(gamma * &(&velocities[j] * &velocities[k]))
                    })
                    .sum();
                Equation::new(Expr::derivative(x, &param, 2), rhs)
            })
            .collect();
        Ok((equations, param))
    }

    /// Contravariant vector `dx^k/dτ` along a curve with parameter
    /// [`DEFAULT_CURVE_PARAMETER`].
    pub fn four_velocity(&self) -> Result<Tensor, DgError> {
        let param = self.curve_parameter(DEFAULT_CURVE_PARAMETER)?;
        let components = self
            .coords()
            .iter()
            .map(|x| Expr::derivative(x, &param, 1))
            .collect();
        Tensor::vector(self, components)
    }

    fn curve_parameter(&self, name: &str) -> Result<Symbol, DgError> {
        let param = Symbol::new(name);
        if self.inner.names.contains_key(&param) {
            return Err(DgError::NameCollision(
                ErrorInfo::new("parameter-collision", "curve parameter clashes with a coordinate")
                    .with_context("name", name)
                    .with_hint("pick a parameter name that is not a coordinate"),
            ));
        }
        Ok(param)
    }
}

fn validate_coords(coords: &[Symbol]) -> Result<(), DgError> {
    if coords.is_empty() {
        return Err(DgError::shape("no-coordinates", "a manifold needs at least one coordinate"));
    }
    let mut seen = BTreeSet::new();
    for sym in coords {
        if !seen.insert(sym) {
            return Err(DgError::Shape(
                ErrorInfo::new("duplicate-coordinate", "coordinates must be distinct")
                    .with_context("name", sym),
            ));
        }
    }
    Ok(())
}
