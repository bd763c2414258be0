//! Location Provider
//!
//! Source of panorama locations for round generation. The engine calls
//! the provider exactly N times at session start and never again; it
//! treats the provider as side-effect-free. Uniqueness across a session
//! is not required - a small catalog may repeat.

use thiserror::Error;

use crate::core::geo::Location;
use crate::core::rng::SessionRng;

/// Curated locations with street-level imagery coverage.
pub const WORLD_LANDMARKS: &[Location] = &[
    Location::new(40.7580, -73.9855),  // Times Square, New York
    Location::new(51.5007, -0.1246),   // Big Ben, London
    Location::new(35.6586, 139.7454),  // Shibuya Crossing, Tokyo
    Location::new(-33.8568, 151.2153), // Sydney Opera House
    Location::new(48.8584, 2.2945),    // Eiffel Tower, Paris
    Location::new(40.4319, 116.5704),  // Great Wall of China
    Location::new(41.8902, 12.4922),   // Colosseum, Rome
    Location::new(37.8199, -122.4783), // Golden Gate Bridge
    Location::new(-22.9519, -43.2105), // Christ the Redeemer, Rio
    Location::new(27.1751, 78.0421),   // Taj Mahal, India
];

/// External source of candidate locations for rounds.
pub trait LocationProvider {
    /// Yield the location to show for the next round.
    fn next_location(&mut self) -> Location;
}

/// Error building a catalog provider.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The supplied catalog has no locations to pick from.
    #[error("location catalog is empty")]
    EmptyCatalog,
}

/// Provider that picks pseudo-randomly from a fixed catalog.
///
/// Selection is driven by a seeded [`SessionRng`], so the same seed
/// reproduces the same sequence of rounds.
#[derive(Clone, Debug)]
pub struct CatalogProvider {
    catalog: Vec<Location>,
    rng: SessionRng,
}

impl CatalogProvider {
    /// Create a provider over a custom catalog.
    pub fn new(catalog: Vec<Location>, seed: u64) -> Result<Self, CatalogError> {
        if catalog.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        Ok(Self {
            catalog,
            rng: SessionRng::new(seed),
        })
    }

    /// Create a provider over the built-in landmark catalog.
    pub fn world_landmarks(seed: u64) -> Self {
        Self {
            catalog: WORLD_LANDMARKS.to_vec(),
            rng: SessionRng::new(seed),
        }
    }

    /// Number of locations in the catalog.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the catalog is empty (never true for a constructed
    /// provider).
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

impl LocationProvider for CatalogProvider {
    fn next_location(&mut self) -> Location {
        self.catalog[self.rng.next_index(self.catalog.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_landmarks_catalog() {
        let provider = CatalogProvider::world_landmarks(1);
        assert_eq!(provider.len(), 10);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(
            CatalogProvider::new(Vec::new(), 1).unwrap_err(),
            CatalogError::EmptyCatalog
        );
    }

    #[test]
    fn test_picks_are_catalog_members() {
        let mut provider = CatalogProvider::world_landmarks(7);
        for _ in 0..100 {
            let loc = provider.next_location();
            assert!(WORLD_LANDMARKS.contains(&loc));
        }
    }

    #[test]
    fn test_same_seed_same_rounds() {
        let mut a = CatalogProvider::world_landmarks(12345);
        let mut b = CatalogProvider::world_landmarks(12345);
        for _ in 0..20 {
            assert_eq!(a.next_location(), b.next_location());
        }
    }

    #[test]
    fn test_single_entry_catalog_repeats() {
        let loc = Location::new(48.8584, 2.2945);
        let mut provider = CatalogProvider::new(vec![loc], 3).unwrap();
        for _ in 0..5 {
            assert_eq!(provider.next_location(), loc);
        }
    }
}
