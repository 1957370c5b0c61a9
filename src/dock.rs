//! The three-slot dock and its shape generator
//!
//! Each shape in a triple independently draws a template and a color, so
//! repeats within a triple are allowed. The generator takes an explicit seed
//! so a whole session can be replayed.

use crate::shape::{ColorTag, Shape, ShapeId, ShapeKind};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Number of slots in the dock
pub const DOCK_SIZE: usize = 3;

/// Random shape source
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: ChaCha8Rng,
    next_id: ShapeId,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeGenerator {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Draw one shape
    pub fn next_shape(&mut self) -> Shape {
        let kind = ShapeKind::ALL[self.rng.gen_range(0..ShapeKind::ALL.len())];
        let color = ColorTag::ALL[self.rng.gen_range(0..ColorTag::ALL.len())];
        let id = self.next_id;
        self.next_id += 1;
        Shape::from_kind(id, kind, color)
    }

    /// Draw a fresh dock triple
    pub fn generate_triple(&mut self) -> [Shape; DOCK_SIZE] {
        [self.next_shape(), self.next_shape(), self.next_shape()]
    }
}

/// Shapes currently offered to the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dock {
    slots: [Option<Shape>; DOCK_SIZE],
}

impl Dock {
    /// An empty dock
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: [Shape; DOCK_SIZE]) -> Self {
        Self {
            slots: shapes.map(Some),
        }
    }

    /// Build a dock with arbitrary slots filled
    #[cfg(test)]
    pub fn from_slots(slots: [Option<Shape>; DOCK_SIZE]) -> Self {
        Self { slots }
    }

    pub fn get(&self, slot: usize) -> Option<&Shape> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Remove and return the shape in a slot
    pub fn take(&mut self, slot: usize) -> Option<Shape> {
        self.slots.get_mut(slot).and_then(|s| s.take())
    }

    /// Shapes still waiting to be placed
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Replace with a new triple, but only once every slot is used up.
    /// Returns true if the dock was refilled.
    pub fn refill_if_empty(&mut self, generator: &mut ShapeGenerator) -> bool {
        if !self.is_empty() {
            return false;
        }
        *self = Self::from_shapes(generator.generate_triple());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_shapes() {
        let mut a = ShapeGenerator::with_seed(42);
        let mut b = ShapeGenerator::with_seed(42);
        for _ in 0..20 {
            assert_eq!(a.generate_triple(), b.generate_triple());
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut generator = ShapeGenerator::with_seed(7);
        let mut ids = HashSet::new();
        for _ in 0..50 {
            for shape in generator.generate_triple() {
                assert!(ids.insert(shape.id));
            }
        }
    }

    #[test]
    fn test_draws_cover_catalog() {
        let mut generator = ShapeGenerator::with_seed(3);
        let mut kinds = HashSet::new();
        let mut colors = HashSet::new();
        for _ in 0..1000 {
            let shape = generator.next_shape();
            kinds.insert(shape.kind);
            colors.insert(shape.color);
        }
        assert_eq!(kinds.len(), ShapeKind::ALL.len());
        assert_eq!(colors.len(), ColorTag::ALL.len());
    }

    #[test]
    fn test_refill_only_when_empty() {
        let mut generator = ShapeGenerator::with_seed(1);
        let mut dock = Dock::from_shapes(generator.generate_triple());

        assert!(dock.take(0).is_some());
        assert!(dock.take(0).is_none());
        assert!(!dock.refill_if_empty(&mut generator));
        assert!(dock.get(0).is_none());

        dock.take(1);
        dock.take(2);
        assert!(dock.is_empty());
        assert!(dock.refill_if_empty(&mut generator));
        assert_eq!(dock.shapes().count(), DOCK_SIZE);
    }

    #[test]
    fn test_out_of_range_slot() {
        let mut dock = Dock::new();
        assert!(dock.get(DOCK_SIZE).is_none());
        assert!(dock.take(DOCK_SIZE).is_none());
    }
}
