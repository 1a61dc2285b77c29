#![deny(missing_docs)]
#![doc = "Sparse symbolic tensors bound to a metric manifold: index raising and lowering, contraction, covariant differentiation, Christoffel connections, Riemann curvature and geodesic equations."]

/// Levi-Civita connection coefficients.
pub mod christoffel;
/// Cell evaluation on an optional worker pool.
mod dispatch;
/// Slot addressing by coordinate name or position.
pub mod index;
/// Sparse storage shared by every tensor-like object.
pub mod indexed;
/// Coordinate systems with a metric.
pub mod manifold;
/// Engine options.
pub mod opts;
/// Deterministic component reports.
pub mod report;
/// Riemann curvature and its contractions.
pub mod riemann;
/// JSON and YAML helpers.
pub mod serde;
/// Tensors with an index-position signature.
pub mod tensor;

pub use christoffel::Christoffel;
pub use index::{Index, IntoMultiIndex};
pub use indexed::IndexedObject;
pub use manifold::{Manifold, DEFAULT_CURVE_PARAMETER};
pub use opts::EngineOpts;
pub use report::{ComponentEntry, TensorReport};
pub use riemann::RiemannTensor;
pub use crate::serde::{
    opts_from_json, opts_from_yaml, report_from_json, report_from_yaml, report_to_json,
    report_to_yaml,
};
pub use tensor::Tensor;

pub use dg_core::{DgError, ErrorInfo, IndexPosition, Signature};
pub use dg_sym::{symbols, Equation, Expr, Matrix, Symbol};
