//! Index-position vocabulary: upper (contravariant) and lower (covariant) slots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DgError, ErrorInfo};

/// Position of a single tensor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndexPosition {
    /// Contravariant slot, written `u`.
    Up,
    /// Covariant slot, written `l`.
    Down,
}

impl IndexPosition {
    /// Single letter code used in signature strings.
    pub fn letter(self) -> char {
        match self {
            IndexPosition::Up => 'u',
            IndexPosition::Down => 'l',
        }
    }

    /// Parses a single signature letter. `d` is accepted as a synonym for `l`.
    pub fn from_letter(letter: char) -> Result<Self, DgError> {
        match letter {
            'u' | 'U' => Ok(IndexPosition::Up),
            'l' | 'L' | 'd' | 'D' => Ok(IndexPosition::Down),
            other => Err(DgError::Position(
                ErrorInfo::new("unknown-position", "index position must be `u` or `l`")
                    .with_context("letter", other),
            )),
        }
    }
}

/// Fixed per-slot position sequence of a tensor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Signature(Vec<IndexPosition>);

impl Signature {
    /// Creates a signature from explicit positions.
    pub fn new(positions: Vec<IndexPosition>) -> Self {
        Self(positions)
    }

    /// Number of slots.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Position at `slot`, if in range.
    pub fn get(&self, slot: usize) -> Option<IndexPosition> {
        self.0.get(slot).copied()
    }

    /// Borrow the slot positions.
    pub fn positions(&self) -> &[IndexPosition] {
        &self.0
    }

    /// Concatenates two signatures (tensor product ordering).
    pub fn concat(&self, other: &Signature) -> Signature {
        let mut positions = self.0.clone();
        positions.extend_from_slice(&other.0);
        Signature(positions)
    }

    /// Returns a copy with `slot` set to `position`.
    pub fn with_position(&self, slot: usize, position: IndexPosition) -> Signature {
        let mut positions = self.0.clone();
        if let Some(entry) = positions.get_mut(slot) {
            *entry = position;
        }
        Signature(positions)
    }

    /// Returns a copy with the listed slots removed, preserving the order of the rest.
    pub fn without(&self, slots: &[usize]) -> Signature {
        Signature(
            self.0
                .iter()
                .enumerate()
                .filter(|(idx, _)| !slots.contains(idx))
                .map(|(_, pos)| *pos)
                .collect(),
        )
    }

    /// Returns a copy with `position` appended as a new trailing slot.
    pub fn pushed(&self, position: IndexPosition) -> Signature {
        let mut positions = self.0.clone();
        positions.push(position);
        Signature(positions)
    }
}

impl FromStr for Signature {
    type Err = DgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(IndexPosition::from_letter)
            .collect::<Result<Vec<_>, _>>()
            .map(Signature)
    }
}

impl TryFrom<String> for Signature {
    type Error = DgError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in &self.0 {
            write!(f, "{}", pos.letter())?;
        }
        Ok(())
    }
}
