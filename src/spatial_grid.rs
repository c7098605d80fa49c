use std::collections::HashMap;

use crate::particle::Particle;

pub type CellKey = (i32, i32);

/// Uniform grid over particle indices, rebuilt from scratch each frame.
/// Unbounded: cells outside the viewport (overshoot, shrunk window) are valid.
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> SpatialGrid {
        SpatialGrid {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_of(&self, x: f64, y: f64) -> CellKey {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.cells.clear();
        for (index, p) in particles.iter().enumerate() {
            let key = self.cell_of(p.x, p.y);
            self.cells.entry(key).or_default().push(index);
        }
    }

    pub fn bucket(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Indices in the 3x3 block of cells around `particle`, including the
    /// particle's own index.
    pub fn query(&self, particle: &Particle) -> Vec<usize> {
        let mut neighbors = Vec::new();
        self.query_into(particle, &mut neighbors);
        neighbors
    }

    pub fn query_into(&self, particle: &Particle, out: &mut Vec<usize>) {
        out.clear();
        let (cx, cy) = self.cell_of(particle.x, particle.y);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx.saturating_add(dx), cy.saturating_add(dy))) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }
}
