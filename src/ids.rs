//! Journal record IDs: a fixed prefix plus a 3-digit suffix in 100..=999.
//! Suffixes are drawn at random and checked against every ID already seen.

use crate::error::{HrError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const SUFFIX_MIN: u32 = 100;
const SUFFIX_MAX: u32 = 999;
const ID_SPACE: usize = (SUFFIX_MAX - SUFFIX_MIN + 1) as usize;

pub struct IdGenerator {
    prefix: String,
    issued: HashSet<String>,
    /// Issued IDs in canonical `{prefix}{suffix:03}` form within range
    owned: usize,
    rng: StdRng,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_rng(prefix, StdRng::from_entropy())
    }

    pub fn with_seed(prefix: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(prefix, StdRng::seed_from_u64(seed))
    }

    fn with_rng(prefix: impl Into<String>, rng: StdRng) -> Self {
        Self {
            prefix: prefix.into(),
            issued: HashSet::new(),
            owned: 0,
            rng,
        }
    }

    /// Record IDs that already exist, e.g. from a journal on disk
    pub fn reserve<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.insert(id.into());
        }
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.issued.contains(id)
    }

    pub fn next_id(&mut self) -> Result<String> {
        if self.owned >= ID_SPACE {
            return Err(HrError::IdSpaceExhausted(self.prefix.clone()));
        }

        loop {
            let suffix = self.rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX);
            let id = format!("{}{:03}", self.prefix, suffix);
            if self.insert(id.clone()) {
                return Ok(id);
            }
        }
    }

    fn insert(&mut self, id: String) -> bool {
        let canonical = self.owns(&id);
        let fresh = self.issued.insert(id);
        if fresh && canonical {
            self.owned += 1;
        }
        fresh
    }

    fn owns(&self, id: &str) -> bool {
        id.strip_prefix(self.prefix.as_str())
            .filter(|suffix| suffix.len() == 3)
            .and_then(|suffix| suffix.parse::<u32>().ok())
            .map_or(false, |n| (SUFFIX_MIN..=SUFFIX_MAX).contains(&n))
    }
}
