// src/model/structure.rs

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    pub position: [f64; 3],
    // Position in the loaded sequence. Stable; used as the neighbor-list key
    // and for the one-based index in bond names.
    pub index: usize,
}

/// Periodic lattice of a structure.
///
/// `lattice` rows are the lattice vectors a, b, c. Isolated molecules carry an
/// all-zero lattice with no periodic axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub lattice: [[f64; 3]; 3],
    pub pbc: [bool; 3],
}

impl Cell {
    /// No lattice, no periodicity.
    pub fn isolated() -> Self {
        Self {
            lattice: [[0.0; 3]; 3],
            pbc: [false; 3],
        }
    }

    /// Fully periodic cell.
    pub fn periodic(lattice: [[f64; 3]; 3]) -> Self {
        Self {
            lattice,
            pbc: [true; 3],
        }
    }

    /// Lattice stored for reference (e.g. an extended-XYZ box) but not wrapped.
    pub fn boxed(lattice: [[f64; 3]; 3]) -> Self {
        Self {
            lattice,
            pbc: [false; 3],
        }
    }

    pub fn is_periodic(&self) -> bool {
        self.pbc.iter().any(|&p| p)
    }

    /// Cartesian position of `position` shifted by `offset` lattice vectors.
    pub fn image_of(&self, position: [f64; 3], offset: [i32; 3]) -> [f64; 3] {
        let mut out = position;
        for (k, &n) in offset.iter().enumerate() {
            if n == 0 {
                continue;
            }
            let n = n as f64;
            out[0] += n * self.lattice[k][0];
            out[1] += n * self.lattice[k][1];
            out[2] += n * self.lattice[k][2];
        }
        out
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::isolated()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Structure {
    pub cell: Cell,
    pub atoms: Vec<Atom>,
    // Free-form label from the source file (title line, data block, ...)
    #[serde(skip)]
    pub title: String,
}

impl Structure {
    /// Builds a structure from `(symbol, position)` pairs, assigning indices in order.
    pub fn from_atoms<S: Into<String>>(cell: Cell, atoms: impl IntoIterator<Item = (S, [f64; 3])>) -> Self {
        let atoms = atoms
            .into_iter()
            .enumerate()
            .map(|(index, (element, position))| Atom {
                element: element.into(),
                position,
                index,
            })
            .collect();
        Self {
            cell,
            atoms,
            title: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.atoms.iter().map(|a| a.element.as_str()).collect()
    }

    /// Hill-ordered formula, e.g. "C2H6O".
    pub fn formula(&self) -> String {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for atom in &self.atoms {
            match counts.iter_mut().find(|(el, _)| *el == atom.element) {
                Some((_, n)) => *n += 1,
                None => counts.push((atom.element.clone(), 1)),
            }
        }
        let has_carbon = counts.iter().any(|(el, _)| el == "C");
        counts.sort_by(|a, b| {
            let rank = |el: &str| match (has_carbon, el) {
                (true, "C") => 0,
                (true, "H") => 1,
                _ => 2,
            };
            rank(&a.0).cmp(&rank(&b.0)).then_with(|| a.0.cmp(&b.0))
        });
        counts
            .iter()
            .map(|(el, n)| if *n == 1 { el.clone() } else { format!("{}{}", el, n) })
            .collect()
    }
}
