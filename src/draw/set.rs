//! Validated draw sets

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::DrawError;
use crate::consts::{NUMBERS_PER_DRAW, TOTAL_NUMBERS};

/// One ordered sequence of six distinct numbers in 1..=45.
///
/// Order is reveal order; it is kept exactly as supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DrawSet([u8; NUMBERS_PER_DRAW]);

impl DrawSet {
    pub fn new(numbers: &[u8]) -> Result<Self, DrawError> {
        if numbers.len() != NUMBERS_PER_DRAW {
            return Err(DrawError::WrongLength(numbers.len()));
        }

        let mut seen = HashSet::with_capacity(NUMBERS_PER_DRAW);
        let mut out = [0u8; NUMBERS_PER_DRAW];
        for (slot, &num) in out.iter_mut().zip(numbers) {
            if num == 0 || num > TOTAL_NUMBERS {
                return Err(DrawError::OutOfRange(num));
            }
            if !seen.insert(num) {
                return Err(DrawError::Duplicate(num));
            }
            *slot = num;
        }
        Ok(Self(out))
    }

    /// Pick six distinct numbers uniformly, in pick order
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut out = [0u8; NUMBERS_PER_DRAW];
        let picks = index::sample(rng, TOTAL_NUMBERS as usize, NUMBERS_PER_DRAW);
        for (slot, i) in out.iter_mut().zip(picks.iter()) {
            *slot = i as u8 + 1;
        }
        Self(out)
    }

    #[inline]
    pub fn numbers(&self) -> &[u8; NUMBERS_PER_DRAW] {
        &self.0
    }

    pub fn contains(&self, num: u8) -> bool {
        self.0.contains(&num)
    }

    /// Numbers in ascending order, for display after the reveal
    pub fn sorted(&self) -> [u8; NUMBERS_PER_DRAW] {
        let mut sorted = self.0;
        sorted.sort_unstable();
        sorted
    }
}

impl TryFrom<Vec<u8>> for DrawSet {
    type Error = DrawError;

    fn try_from(numbers: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&numbers)
    }
}

impl From<DrawSet> for Vec<u8> {
    fn from(set: DrawSet) -> Self {
        set.0.to_vec()
    }
}

impl fmt::Display for DrawSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u8::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
