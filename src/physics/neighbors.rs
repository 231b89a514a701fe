// src/physics/neighbors.rs

use crate::error::ConfigError;
use crate::model::elements::get_atom_cov;
use crate::model::structure::{Cell, Structure};
use crate::utils::linalg::{cart_to_frac, reciprocal_lengths};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Radius used for symbols missing from the element catalog (Å).
pub const FALLBACK_COVALENT_RADIUS: f64 = 1.5;

/// Upper bound accepted for `CutoffOptions::skin` (Å).
pub const MAX_SKIN: f64 = 5.0;
/// Upper bound accepted for `CutoffOptions::multiplier`.
pub const MAX_MULTIPLIER: f64 = 5.0;
/// Image search stops this many cells away along any axis.
pub const MAX_IMAGE_SHELLS: i32 = 16;

/// Integer lattice translation of a periodic image.
pub type Offset = [i32; 3];

/// One directed bond record: the atom at `index`, shifted by `offset` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: usize,
    pub offset: Offset,
}

/// Natural-cutoff bonding policy.
///
/// Each atom gets the cutoff `multiplier * covalent_radius + skin`; two atoms
/// are bonded when their distance is below the sum of both cutoffs, so the
/// skin counts once per atom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutoffOptions {
    pub multiplier: f64,
    pub skin: f64,
}

impl Default for CutoffOptions {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            skin: 0.3,
        }
    }
}

impl CutoffOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.multiplier.is_finite() && self.multiplier > 0.0 && self.multiplier <= MAX_MULTIPLIER) {
            return Err(ConfigError::InvalidParameter(format!(
                "cutoff multiplier {} must be in (0, {}]",
                self.multiplier, MAX_MULTIPLIER
            )));
        }
        if !(self.skin.is_finite() && self.skin >= 0.0 && self.skin <= MAX_SKIN) {
            return Err(ConfigError::InvalidParameter(format!(
                "cutoff skin {} must be in [0, {}]",
                self.skin, MAX_SKIN
            )));
        }
        Ok(())
    }
}

/// Per-atom bonded neighbors, computed once per build.
#[derive(Clone, Debug, Default)]
pub struct NeighborList {
    neighbors: Vec<Vec<Neighbor>>,
    periodic: bool,
}

impl NeighborList {
    /// Resolves every bonded pair of `structure`.
    ///
    /// Both directions of a bond are stored: `(i -> j, S)` and `(j -> i, -S)`.
    /// Periodic images of an atom itself count as neighbors; only the
    /// untranslated atom `(i -> i, 0)` is left out. When the cell is flagged
    /// periodic but its lattice is singular, the structure is treated as an
    /// isolated molecule.
    pub fn compute(structure: &Structure, options: &CutoffOptions) -> Self {
        let n = structure.atoms.len();
        let cutoffs = atom_cutoffs(structure, options);
        let frame = PeriodicFrame::new(&structure.cell, structure);

        let max_cutoff = cutoffs.iter().copied().fold(0.0, f64::max);
        frame.warn_if_truncated(2.0 * max_cutoff);

        let mut neighbors: Vec<Vec<Neighbor>> = vec![Vec::new(); n];

        for i in 0..n {
            let p_i = structure.atoms[i].position;
            for j in i..n {
                let p_j = structure.atoms[j].position;
                let rc = cutoffs[i] + cutoffs[j];

                for offset in frame.candidate_offsets(i, j, rc) {
                    if i == j && offset == [0, 0, 0] {
                        continue;
                    }
                    let q = structure.cell.image_of(p_j, offset);
                    let d2 = (q[0] - p_i[0]).powi(2) + (q[1] - p_i[1]).powi(2) + (q[2] - p_i[2]).powi(2);
                    if d2 >= rc * rc {
                        continue;
                    }
                    neighbors[i].push(Neighbor { index: j, offset });
                    // Self images: -S is visited by this same loop.
                    if i != j {
                        neighbors[j].push(Neighbor {
                            index: i,
                            offset: [-offset[0], -offset[1], -offset[2]],
                        });
                    }
                }
            }
        }

        for list in &mut neighbors {
            list.sort();
        }

        debug!(
            "Neighbor list: {} atoms, {} directed records ({})",
            n,
            neighbors.iter().map(Vec::len).sum::<usize>(),
            if frame.is_periodic() { "periodic" } else { "isolated" }
        );

        Self {
            neighbors,
            periodic: frame.is_periodic(),
        }
    }

    /// Neighbors of atom `idx`, sorted by `(index, offset)`. Empty for out-of-range indices.
    pub fn get_neighbors(&self, idx: usize) -> &[Neighbor] {
        self.neighbors.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether periodic images were searched (false after a degenerate-cell fallback).
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Number of directed records, i.e. twice the number of bonds.
    pub fn directed_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Neighbor)> {
        self.neighbors
            .iter()
            .enumerate()
            .flat_map(|(i, list)| list.iter().map(move |nb| (i, nb)))
    }
}

fn atom_cutoffs(structure: &Structure, options: &CutoffOptions) -> Vec<f64> {
    let mut reported: HashSet<&str> = HashSet::new();
    structure
        .atoms
        .iter()
        .map(|atom| {
            let r = get_atom_cov(&atom.element).unwrap_or_else(|| {
                if reported.insert(atom.element.as_str()) {
                    warn!(
                        "No covalent radius for '{}', using {:.2} Å",
                        atom.element, FALLBACK_COVALENT_RADIUS
                    );
                }
                FALLBACK_COVALENT_RADIUS
            });
            r * options.multiplier + options.skin
        })
        .collect()
}

// Fractional coordinates and plane spacings for image search. `None` fields
// mean the structure is handled as an isolated molecule.
struct PeriodicFrame {
    pbc: [bool; 3],
    recip: Option<[f64; 3]>,
    frac: Vec<[f64; 3]>,
}

impl PeriodicFrame {
    fn new(cell: &Cell, structure: &Structure) -> Self {
        let isolated = Self {
            pbc: [false; 3],
            recip: None,
            frac: Vec::new(),
        };
        if !cell.is_periodic() {
            return isolated;
        }

        let recip = match reciprocal_lengths(cell.lattice) {
            Some(r) => r,
            None => {
                warn!("Cell is periodic but its lattice is singular; treating structure as isolated");
                return isolated;
            }
        };

        let mut frac = Vec::with_capacity(structure.atoms.len());
        for atom in &structure.atoms {
            match cart_to_frac(atom.position, cell.lattice) {
                Some(f) => frac.push(f),
                None => {
                    warn!("Cannot express atoms in fractional coordinates; treating structure as isolated");
                    return isolated;
                }
            }
        }

        Self {
            pbc: cell.pbc,
            recip: Some(recip),
            frac,
        }
    }

    fn is_periodic(&self) -> bool {
        self.recip.is_some()
    }

    fn warn_if_truncated(&self, rc: f64) {
        let recip = match self.recip {
            Some(r) => r,
            None => return,
        };
        for k in 0..3 {
            if self.pbc[k] && rc * recip[k] > MAX_IMAGE_SHELLS as f64 {
                warn!(
                    "Cell is too thin along axis {} for a {:.2} Å cutoff; image search limited to {} cells",
                    k, rc, MAX_IMAGE_SHELLS
                );
            }
        }
    }

    // Every translation S for which the image of j could lie within `rc` of i.
    // Along axis k the image is at least |df_k + S_k| / |b_k| away from i.
    // Ranges are clamped to MAX_IMAGE_SHELLS around the nearest cell.
    fn candidate_offsets(&self, i: usize, j: usize, rc: f64) -> Vec<Offset> {
        let recip = match self.recip {
            Some(r) => r,
            None => return vec![[0, 0, 0]],
        };

        let mut ranges = [(0i32, 0i32); 3];
        for k in 0..3 {
            if !self.pbc[k] {
                continue;
            }
            let df = self.frac[j][k] - self.frac[i][k];
            let reach = rc * recip[k];
            let shells = MAX_IMAGE_SHELLS as f64;
            let center = (-df).round();
            let lo = (-df - reach).ceil().max(center - shells);
            let hi = (-df + reach).floor().min(center + shells);
            ranges[k] = (lo as i32, hi as i32);
        }

        let mut out = Vec::new();
        for a in ranges[0].0..=ranges[0].1 {
            for b in ranges[1].0..=ranges[1].1 {
                for c in ranges[2].0..=ranges[2].1 {
                    out.push([a, b, c]);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2() -> Structure {
        Structure::from_atoms(Cell::isolated(), vec![("H", [0.0, 0.0, 0.0]), ("H", [0.0, 0.0, 0.74])])
    }

    fn assert_symmetric(nl: &NeighborList) {
        for (i, nb) in nl.iter() {
            let back = Neighbor {
                index: i,
                offset: [-nb.offset[0], -nb.offset[1], -nb.offset[2]],
            };
            assert!(
                nl.get_neighbors(nb.index).contains(&back),
                "missing reverse of {} -> {:?}",
                i,
                nb
            );
        }
    }

    fn assert_no_untranslated_self(nl: &NeighborList) {
        for (i, nb) in nl.iter() {
            assert!(!(i == nb.index && nb.offset == [0, 0, 0]), "atom {} lists itself", i);
        }
    }

    #[test]
    fn test_h2_bonded_both_ways() {
        let nl = NeighborList::compute(&h2(), &CutoffOptions::default());
        assert_eq!(nl.get_neighbors(0), &[Neighbor { index: 1, offset: [0, 0, 0] }]);
        assert_eq!(nl.get_neighbors(1), &[Neighbor { index: 0, offset: [0, 0, 0] }]);
        assert_eq!(nl.directed_count(), 2);
        assert!(!nl.is_periodic());
    }

    #[test]
    fn test_far_atoms_not_bonded() {
        let s = Structure::from_atoms(Cell::isolated(), vec![("H", [0.0; 3]), ("H", [0.0, 0.0, 3.0])]);
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        assert_eq!(nl.directed_count(), 0);
    }

    #[test]
    fn test_water() {
        let s = Structure::from_atoms(
            Cell::isolated(),
            vec![("O", [0.0, 0.0, 0.0]), ("H", [0.9572, 0.0, 0.0]), ("H", [-0.2400, 0.9266, 0.0])],
        );
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        let o: Vec<usize> = nl.get_neighbors(0).iter().map(|n| n.index).collect();
        assert_eq!(o, vec![1, 2]);
        // H-H is 1.51 Å, above (0.31 + 0.3) * 2
        assert_eq!(nl.get_neighbors(1).len(), 1);
        assert_symmetric(&nl);
        assert_no_untranslated_self(&nl);
    }

    #[test]
    fn test_degenerate_cell_gives_zero_offsets() {
        let mut s = h2();
        s.cell = Cell {
            lattice: [[0.0; 3]; 3],
            pbc: [true; 3],
        };
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        assert!(!nl.is_periodic());
        assert_eq!(nl.directed_count(), 2);
        for (_, nb) in nl.iter() {
            assert_eq!(nb.offset, [0, 0, 0]);
        }
    }

    #[test]
    fn test_chain_across_boundary() {
        // 1D carbon chain, 1.4 Å spacing, two atoms per 2.8 Å cell along x
        let cell = Cell {
            lattice: [[2.8, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]],
            pbc: [true, false, false],
        };
        let s = Structure::from_atoms(cell, vec![("C", [0.0, 0.0, 0.0]), ("C", [1.4, 0.0, 0.0])]);
        let nl = NeighborList::compute(&s, &CutoffOptions::default());

        assert!(nl.is_periodic());
        assert_eq!(
            nl.get_neighbors(0),
            &[
                Neighbor { index: 1, offset: [-1, 0, 0] },
                Neighbor { index: 1, offset: [0, 0, 0] },
            ]
        );
        assert_eq!(
            nl.get_neighbors(1),
            &[
                Neighbor { index: 0, offset: [0, 0, 0] },
                Neighbor { index: 0, offset: [1, 0, 0] },
            ]
        );
        assert_symmetric(&nl);
    }

    #[test]
    fn test_fcc_primitive_cell_bonds_to_own_images() {
        // One Cu in the fcc primitive cell: 12 nearest images at 2.556 Å,
        // the next shell at 3.615 Å is beyond (1.32 + 0.3) * 2.
        let h = 3.615 / 2.0;
        let s = Structure::from_atoms(
            Cell::periodic([[0.0, h, h], [h, 0.0, h], [h, h, 0.0]]),
            vec![("Cu", [0.0, 0.0, 0.0])],
        );
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        assert_eq!(nl.directed_count(), 12);
        assert!(nl.get_neighbors(0).iter().all(|nb| nb.index == 0 && nb.offset != [0, 0, 0]));
        assert_symmetric(&nl);
        assert_no_untranslated_self(&nl);
    }

    #[test]
    fn test_skin_applies_per_atom() {
        // C-C cutoff is (0.76 + 0.3) * 2 = 2.12 Å.
        let pair = |d: f64| Structure::from_atoms(Cell::isolated(), vec![("C", [0.0; 3]), ("C", [d, 0.0, 0.0])]);
        let opts = CutoffOptions::default();
        assert_eq!(NeighborList::compute(&pair(2.0), &opts).directed_count(), 2);
        assert_eq!(NeighborList::compute(&pair(2.1), &opts).directed_count(), 2);
        assert_eq!(NeighborList::compute(&pair(2.15), &opts).directed_count(), 0);
    }

    #[test]
    fn test_thin_cell_search_is_bounded() {
        let cell = Cell {
            lattice: [[0.01, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]],
            pbc: [true, false, false],
        };
        let s = Structure::from_atoms(cell, vec![("H", [0.0; 3])]);
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        assert_eq!(nl.directed_count(), 2 * MAX_IMAGE_SHELLS as usize);
        assert_symmetric(&nl);
    }

    #[test]
    fn test_cutoff_options_validation() {
        assert!(CutoffOptions::default().validate().is_ok());
        let bad = [
            CutoffOptions { multiplier: 0.0, skin: 0.3 },
            CutoffOptions { multiplier: f64::NAN, skin: 0.3 },
            CutoffOptions { multiplier: 1.0, skin: -0.1 },
            CutoffOptions { multiplier: 1.0, skin: 1e6 },
        ];
        for opts in bad {
            assert!(matches!(opts.validate(), Err(ConfigError::InvalidParameter(_))), "{:?}", opts);
        }
    }

    #[test]
    fn test_unwrapped_coordinates() {
        // Second atom stored three cells away; its nearest image is bonded.
        let cell = Cell::periodic([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let s = Structure::from_atoms(cell, vec![("C", [0.2, 2.0, 2.0]), ("C", [12.0 + 1.6, 2.0, 2.0])]);
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        assert_eq!(nl.get_neighbors(0), &[Neighbor { index: 1, offset: [-3, 0, 0] }]);
        assert_eq!(nl.get_neighbors(1), &[Neighbor { index: 0, offset: [3, 0, 0] }]);
    }

    #[test]
    fn test_rocksalt_symmetry_and_determinism() {
        let a = 5.64;
        let cell = Cell::periodic([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]);
        let h = a / 2.0;
        let atoms = vec![
            ("Na", [0.0, 0.0, 0.0]),
            ("Na", [0.0, h, h]),
            ("Na", [h, 0.0, h]),
            ("Na", [h, h, 0.0]),
            ("Cl", [h, 0.0, 0.0]),
            ("Cl", [0.0, h, 0.0]),
            ("Cl", [0.0, 0.0, h]),
            ("Cl", [h, h, h]),
        ];
        let s = Structure::from_atoms(cell, atoms);
        let opts = CutoffOptions::default();
        let first = NeighborList::compute(&s, &opts);
        let second = NeighborList::compute(&s, &opts);

        // Octahedral coordination, Na-Cl 2.82 Å < 1.66 + 1.02 + 0.6;
        // Na-Na 3.99 Å stays above (1.66 + 0.3) * 2
        for i in 0..8 {
            assert_eq!(first.get_neighbors(i).len(), 6, "atom {}", i);
            assert_eq!(first.get_neighbors(i), second.get_neighbors(i));
        }
        assert_symmetric(&first);
        assert_no_untranslated_self(&first);
    }

    #[test]
    fn test_unknown_symbol_uses_fallback_radius() {
        let s = Structure::from_atoms(Cell::isolated(), vec![("Xx", [0.0; 3]), ("Xx", [0.0, 0.0, 3.0])]);
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        assert_eq!(nl.directed_count(), 2);
    }

    #[test]
    fn test_coincident_atoms_are_listed() {
        let s = Structure::from_atoms(Cell::isolated(), vec![("C", [1.0; 3]), ("C", [1.0; 3])]);
        let nl = NeighborList::compute(&s, &CutoffOptions::default());
        assert_eq!(nl.get_neighbors(0).len(), 1);
    }
}
