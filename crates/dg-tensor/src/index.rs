use std::collections::BTreeMap;
use std::fmt;

use dg_core::{DgError, ErrorInfo};
use dg_sym::Symbol;

/// Value of one index slot: a coordinate position or a coordinate name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Index {
    /// Canonical integer position of a coordinate.
    Pos(usize),
    /// Coordinate symbol, resolved through the owning manifold.
    Name(Symbol),
}

impl Index {
    /// Resolves the slot to a position in `[0, n)` using `names`.
    pub fn resolve(&self, names: &BTreeMap<Symbol, usize>) -> Result<usize, DgError> {
        match self {
            Index::Pos(pos) if *pos < names.len() => Ok(*pos),
            Index::Pos(pos) => Err(DgError::Lookup(
                ErrorInfo::new("index-out-of-range", "integer index outside the coordinate range")
                    .with_context("index", pos)
                    .with_context("dims", names.len()),
            )),
            Index::Name(sym) => names.get(sym).copied().ok_or_else(|| {
                DgError::Lookup(
                    ErrorInfo::new("unknown-coordinate", "name is not a manifold coordinate")
                        .with_context("name", sym),
                )
            }),
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Pos(pos) => write!(f, "{pos}"),
            Index::Name(sym) => write!(f, "{sym}"),
        }
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index::Pos(value)
    }
}

impl From<i32> for Index {
    fn from(value: i32) -> Self {
        // Negative literals map past any valid range so lookup reports them.
        Index::Pos(usize::try_from(value).unwrap_or(usize::MAX))
    }
}

impl From<Symbol> for Index {
    fn from(value: Symbol) -> Self {
        Index::Name(value)
    }
}

impl From<&Symbol> for Index {
    fn from(value: &Symbol) -> Self {
        Index::Name(value.clone())
    }
}

impl From<&str> for Index {
    fn from(value: &str) -> Self {
        Index::Name(Symbol::new(value))
    }
}

/// Anything usable as a full index tuple: a single slot value for rank-1
/// access, a tuple or array of slot values, or `()` for rank-0 access.
pub trait IntoMultiIndex {
    /// Converts into one [`Index`] per slot.
    fn into_indices(self) -> Vec<Index>;
}

macro_rules! single_index {
    ($($ty:ty),*) => {
        $(
            impl IntoMultiIndex for $ty {
                fn into_indices(self) -> Vec<Index> {
                    vec![Index::from(self)]
                }
            }
        )*
    };
}

single_index!(usize, i32, Symbol, &Symbol, &str, Index);

macro_rules! tuple_index {
    ($($name:ident),+) => {
        impl<$($name: Into<Index>),+> IntoMultiIndex for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_indices(self) -> Vec<Index> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_index!(A);
tuple_index!(A, B);
tuple_index!(A, B, C);
tuple_index!(A, B, C, D);
tuple_index!(A, B, C, D, E);
tuple_index!(A, B, C, D, E, F);

impl IntoMultiIndex for () {
    fn into_indices(self) -> Vec<Index> {
        Vec::new()
    }
}

impl<T: Into<Index>, const N: usize> IntoMultiIndex for [T; N] {
    fn into_indices(self) -> Vec<Index> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Index>> IntoMultiIndex for Vec<T> {
    fn into_indices(self) -> Vec<Index> {
        self.into_iter().map(Into::into).collect()
    }
}

impl IntoMultiIndex for &[usize] {
    fn into_indices(self) -> Vec<Index> {
        self.iter().copied().map(Index::Pos).collect()
    }
}

/// Builds the coordinate name to position map for an ordered coordinate list.
pub(crate) fn names_map(coords: &[Symbol]) -> BTreeMap<Symbol, usize> {
    coords
        .iter()
        .enumerate()
        .map(|(pos, sym)| (sym.clone(), pos))
        .collect()
}

/// Enumerates every index tuple of the given rank over `[0, dims)` in
/// lexicographic order.
pub(crate) fn all_tuples(dims: usize, rank: usize) -> Vec<Vec<usize>> {
    let mut tuples = vec![Vec::with_capacity(rank)];
    for _ in 0..rank {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                (0..dims).map(move |k| {
                    let mut next = prefix.clone();
                    next.push(k);
                    next
                })
            })
            .collect();
    }
    tuples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuples_enumerate_in_order() {
        let tuples = all_tuples(2, 2);
        assert_eq!(tuples, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        assert_eq!(all_tuples(3, 0), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn negative_literal_is_out_of_range() {
        let names = names_map(&[Symbol::new("x")]);
        assert!(Index::from(-1).resolve(&names).is_err());
        assert_eq!(Index::from("x").resolve(&names).expect("known name"), 0);
    }
}
