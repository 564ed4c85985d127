//! Random destination selection.
//!
//! [`DestinationPicker`] owns a fixed catalog of place names and remembers the
//! last one it returned, so two consecutive picks never repeat unless the
//! catalog holds a single entry.

use std::sync::{Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::constants::DEFAULT_DESTINATIONS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("destination catalog must contain at least one entry")]
    Empty,
}

/// Mutable half of the picker. Lives behind a mutex because tools are
/// invoked through `&self`.
struct PickerState {
    /// Index into the catalog of the previous pick.
    last: Option<usize>,
    rng: StdRng,
}

/// Picks destinations uniformly at random, skipping the previous pick.
pub struct DestinationPicker {
    catalog: Vec<String>,
    state: Mutex<PickerState>,
}

impl DestinationPicker {
    /// Creates a picker seeded from the operating system.
    ///
    /// Duplicate names are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] if `catalog` has no entries.
    pub fn new<I, S>(catalog: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(catalog, StdRng::from_os_rng())
    }

    /// Creates a picker whose sequence of picks is reproducible.
    pub fn with_seed<I, S>(catalog: I, seed: u64) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    /// Creates a picker over the built-in catalog.
    pub fn with_default_catalog() -> Self {
        Self {
            catalog: DEFAULT_DESTINATIONS.iter().map(|d| d.to_string()).collect(),
            state: Mutex::new(PickerState {
                last: None,
                rng: StdRng::from_os_rng(),
            }),
        }
    }

    fn with_rng<I, S>(catalog: I, rng: StdRng) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in catalog {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        if unique.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            catalog: unique,
            state: Mutex::new(PickerState { last: None, rng }),
        })
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// The value returned by the previous [`pick_next`](Self::pick_next), if any.
    pub fn last_pick(&self) -> Option<&str> {
        let last = self.lock().last;
        last.map(|i| self.catalog[i].as_str())
    }

    /// Returns a random catalog entry different from the previous pick.
    ///
    /// A single-entry catalog returns that entry on every call.
    pub fn pick_next(&self) -> &str {
        let len = self.catalog.len();
        let mut state = self.lock();
        let previous = state.last;
        let index = match previous {
            Some(last) if len > 1 => {
                // Draw from len - 1 slots and shift past the excluded one.
                let slot = state.rng.random_range(0..len - 1);
                if slot >= last {
                    slot + 1
                } else {
                    slot
                }
            }
            _ => state.rng.random_range(0..len),
        };
        state.last = Some(index);
        tracing::debug!(destination = %self.catalog[index], "picked destination");
        &self.catalog[index]
    }

    /// Forgets the previous pick. The next call may return any entry.
    #[cfg(test)]
    pub fn reset(&self) {
        self.lock().last = None;
    }

    fn lock(&self) -> MutexGuard<'_, PickerState> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
