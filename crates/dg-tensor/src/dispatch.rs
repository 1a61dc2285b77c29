use dg_core::{DgError, ErrorInfo};
use dg_sym::Expr;
use rayon::prelude::*;

use crate::opts::EngineOpts;

/// Evaluates `cell` for every key, returning the nonzero results in key order.
///
/// With `concurrency > 1` the cells run on a dedicated pool; cells are
/// independent so the output matches the inline evaluation exactly.
pub(crate) fn evaluate_cells<F>(
    keys: Vec<Vec<usize>>,
    opts: &EngineOpts,
    cell: F,
) -> Result<Vec<(Vec<usize>, Expr)>, DgError>
where
    F: Fn(&[usize]) -> Expr + Send + Sync,
{
    opts.validate()?;
    let mut results: Vec<(usize, Vec<usize>, Expr)> = if opts.concurrency == 1 {
        keys.into_iter()
            .enumerate()
            .map(|(order, key)| {
                let value = cell(&key);
                (order, key, value)
            })
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.concurrency)
            .build()
            .map_err(|err| DgError::Config(ErrorInfo::new("thread-pool", err.to_string())))?;
        pool.install(|| {
            keys.into_par_iter()
                .enumerate()
                .map(|(order, key)| {
                    let value = cell(&key);
                    (order, key, value)
                })
                .collect()
        })
    };
    results.sort_by_key(|(order, _, _)| *order);
    Ok(results
        .into_iter()
        .filter(|(_, _, value)| !value.is_zero())
        .map(|(_, key, value)| (key, value))
        .collect())
}
