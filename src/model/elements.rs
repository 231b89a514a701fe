// src/model/elements.rs
// Element catalog shared by the preset loader and the neighbor resolver.
// Covalent radii are the single-bond values of Cordero et al. (2008),
// Dalton Trans. 2832-2838, in Angstroms.

pub const ALL_ELEMENTS: [&str; 118] = [
    // --- Period 1-3 ---
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    // --- Period 4 ---
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    // --- Period 5 ---
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe",
    // --- Period 6 ---
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu",
    "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    // --- Period 7 ---
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf",
    "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

// Index = Z - 1. Elements past Cm have no tabulated value.
const COVALENT_RADII: [f64; 96] = [
    0.31, 0.28, 1.28, 0.96, 0.84, 0.76, 0.71, 0.66, 0.57, 0.58, // H  - Ne
    1.66, 1.41, 1.21, 1.11, 1.07, 1.05, 1.02, 1.06, // Na - Ar
    2.03, 1.76, 1.70, 1.60, 1.53, 1.39, 1.39, 1.32, 1.26, 1.24, 1.32, 1.22, // K - Zn
    1.22, 1.20, 1.19, 1.20, 1.20, 1.16, // Ga - Kr
    2.20, 1.95, 1.90, 1.75, 1.64, 1.54, 1.47, 1.46, 1.42, 1.39, 1.45, 1.44, // Rb - Cd
    1.42, 1.39, 1.39, 1.38, 1.39, 1.40, // In - Xe
    2.44, 2.15, 2.07, 2.04, 2.03, 2.01, 1.99, 1.98, 1.98, 1.96, 1.94, 1.92, 1.92, 1.89, 1.90,
    1.87, 1.87, // Cs - Lu
    1.75, 1.70, 1.62, 1.51, 1.44, 1.41, 1.36, 1.36, 1.32, // Hf - Hg
    1.45, 1.46, 1.48, 1.40, 1.50, 1.50, // Tl - Rn
    2.60, 2.21, 2.15, 2.06, 2.00, 1.96, 1.90, 1.87, 1.80, 1.69, // Fr - Cm
];

/// Placeholder radius for elements without a tabulated covalent radius.
pub const MISSING_COVALENT_RADIUS: f64 = 0.2;

/// Returns the atomic number (Z) for an element symbol, `None` if unknown.
pub fn get_atomic_number(element: &str) -> Option<usize> {
    ALL_ELEMENTS.iter().position(|&el| el == element).map(|i| i + 1)
}

pub fn is_known(element: &str) -> bool {
    get_atomic_number(element).is_some()
}

/// Covalent radius in Angstroms, `None` for symbols outside the catalog.
pub fn get_atom_cov(element: &str) -> Option<f64> {
    let z = get_atomic_number(element)?;
    Some(COVALENT_RADII.get(z - 1).copied().unwrap_or(MISSING_COVALENT_RADIUS))
}

/// Normalizes labels such as "FE", "c12" or "Ca2+" to a catalog symbol.
pub fn normalize_symbol(label: &str) -> Option<String> {
    let letters: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }

    // Prefer the two-letter reading ("Ca" over "C" for "CA1").
    let mut chars = letters.chars();
    let first = chars.next()?.to_ascii_uppercase();
    if let Some(second) = chars.next() {
        let two = format!("{}{}", first, second.to_ascii_lowercase());
        if is_known(&two) {
            return Some(two);
        }
    }
    let one = first.to_string();
    if is_known(&one) {
        Some(one)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(ALL_ELEMENTS.len(), 118);
        assert_eq!(get_atomic_number("H"), Some(1));
        assert_eq!(get_atomic_number("C"), Some(6));
        assert_eq!(get_atomic_number("Og"), Some(118));
        assert_eq!(get_atomic_number("Xx"), None);
    }

    #[test]
    fn test_covalent_radii() {
        assert_eq!(get_atom_cov("H"), Some(0.31));
        assert_eq!(get_atom_cov("C"), Some(0.76));
        assert_eq!(get_atom_cov("Fe"), Some(1.32));
        assert_eq!(get_atom_cov("Cm"), Some(1.69));
        assert_eq!(get_atom_cov("Og"), Some(MISSING_COVALENT_RADIUS));
        assert_eq!(get_atom_cov("Q"), None);
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("FE").as_deref(), Some("Fe"));
        assert_eq!(normalize_symbol("c12").as_deref(), Some("C"));
        assert_eq!(normalize_symbol("Ca2+").as_deref(), Some("Ca"));
        assert_eq!(normalize_symbol("O1").as_deref(), Some("O"));
        assert_eq!(normalize_symbol("123"), None);
    }
}
