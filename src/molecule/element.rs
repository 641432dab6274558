//! Element table: symbol → radii and display color.
//!
//! Van der Waals radii follow Bondi (Alvarez for the metals Bondi omits),
//! covalent radii follow Cordero et al., and colors follow the Jmol CPK
//! palette.

use rustc_hash::FxHashMap;

use crate::color::Rgba8;
use crate::error::MolmeshError;
use crate::options::ElementOptions;

/// Radius used for both radii when a symbol is not in the table.
pub const FALLBACK_RADIUS: f32 = 1.0;

/// Radius and color data for one chemical element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInfo {
    /// Element symbol in canonical case (`"Cl"`).
    pub symbol: &'static str,
    /// English element name.
    pub name: &'static str,
    /// Atomic number (0 for the fallback entry).
    pub number: u8,
    /// Van der Waals radius in angstroms.
    pub van_der_waals_radius: f32,
    /// Covalent radius in angstroms.
    pub covalent_radius: f32,
    /// Display color.
    pub color: Rgba8,
}

/// (symbol, name, number, vdW, covalent, 0xRRGGBB)
type ElementRow = (&'static str, &'static str, u8, f32, f32, u32);

#[rustfmt::skip]
const STANDARD_ELEMENTS: &[ElementRow] = &[
    ("H",  "Hydrogen",   1,  1.20, 0.31, 0xFF_FF_FF),
    ("He", "Helium",     2,  1.40, 0.28, 0xD9_FF_FF),
    ("Li", "Lithium",    3,  1.82, 1.28, 0xCC_80_FF),
    ("Be", "Beryllium",  4,  1.53, 0.96, 0xC2_FF_00),
    ("B",  "Boron",      5,  1.92, 0.84, 0xFF_B5_B5),
    ("C",  "Carbon",     6,  1.70, 0.76, 0x90_90_90),
    ("N",  "Nitrogen",   7,  1.55, 0.71, 0x30_50_F8),
    ("O",  "Oxygen",     8,  1.52, 0.66, 0xFF_0D_0D),
    ("F",  "Fluorine",   9,  1.47, 0.57, 0x90_E0_50),
    ("Ne", "Neon",       10, 1.54, 0.58, 0xB3_E3_F5),
    ("Na", "Sodium",     11, 2.27, 1.66, 0xAB_5C_F2),
    ("Mg", "Magnesium",  12, 1.73, 1.41, 0x8A_FF_00),
    ("Al", "Aluminium",  13, 1.84, 1.21, 0xBF_A6_A6),
    ("Si", "Silicon",    14, 2.10, 1.11, 0xF0_C8_A0),
    ("P",  "Phosphorus", 15, 1.80, 1.07, 0xFF_80_00),
    ("S",  "Sulfur",     16, 1.80, 1.05, 0xFF_FF_30),
    ("Cl", "Chlorine",   17, 1.75, 1.02, 0x1F_F0_1F),
    ("Ar", "Argon",      18, 1.88, 1.06, 0x80_D1_E3),
    ("K",  "Potassium",  19, 2.75, 2.03, 0x8F_40_D4),
    ("Ca", "Calcium",    20, 2.31, 1.76, 0x3D_FF_00),
    ("Sc", "Scandium",   21, 2.11, 1.70, 0xE6_E6_E6),
    ("Ti", "Titanium",   22, 1.87, 1.60, 0xBF_C2_C7),
    ("V",  "Vanadium",   23, 1.79, 1.53, 0xA6_A6_AB),
    ("Cr", "Chromium",   24, 1.89, 1.39, 0x8A_99_C7),
    ("Mn", "Manganese",  25, 1.97, 1.39, 0x9C_7A_C7),
    ("Fe", "Iron",       26, 1.94, 1.32, 0xE0_66_33),
    ("Co", "Cobalt",     27, 1.92, 1.26, 0xF0_90_A0),
    ("Ni", "Nickel",     28, 1.63, 1.24, 0x50_D0_50),
    ("Cu", "Copper",     29, 1.40, 1.32, 0xC8_80_33),
    ("Zn", "Zinc",       30, 1.39, 1.22, 0x7D_80_B0),
    ("Ga", "Gallium",    31, 1.87, 1.22, 0xC2_8F_8F),
    ("Ge", "Germanium",  32, 2.11, 1.20, 0x66_8F_8F),
    ("As", "Arsenic",    33, 1.85, 1.19, 0xBD_80_E3),
    ("Se", "Selenium",   34, 1.90, 1.20, 0xFF_A1_00),
    ("Br", "Bromine",    35, 1.85, 1.20, 0xA6_29_29),
    ("Kr", "Krypton",    36, 2.02, 1.16, 0x5C_B8_D1),
    ("Rb", "Rubidium",   37, 3.03, 2.20, 0x70_2E_B0),
    ("Sr", "Strontium",  38, 2.49, 1.95, 0x00_FF_00),
    ("Ag", "Silver",     47, 1.72, 1.45, 0xC0_C0_C0),
    ("Cd", "Cadmium",    48, 1.58, 1.44, 0xFF_D9_8F),
    ("I",  "Iodine",     53, 1.98, 1.39, 0x94_00_94),
    ("Xe", "Xenon",      54, 2.16, 1.40, 0x42_9E_B0),
    ("Cs", "Caesium",    55, 3.43, 2.44, 0x57_17_8F),
    ("Ba", "Barium",     56, 2.68, 2.15, 0x00_C9_00),
    ("Pt", "Platinum",   78, 1.75, 1.36, 0xD0_D0_E0),
    ("Au", "Gold",       79, 1.66, 1.36, 0xFF_D1_23),
    ("Hg", "Mercury",    80, 1.55, 1.32, 0xB8_B8_D0),
    ("Pb", "Lead",       82, 2.02, 1.46, 0x57_59_61),
];

/// Symbol-keyed element lookup with a fallback entry for unknown symbols.
#[derive(Debug, Clone)]
pub struct ElementTable {
    elements: Vec<ElementInfo>,
    by_symbol: FxHashMap<SymbolKey, usize>,
    fallback: ElementInfo,
}

impl Default for ElementTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ElementTable {
    /// The built-in table with the default fallback (radius 1.0, gray).
    #[must_use]
    pub fn standard() -> Self {
        let elements: Vec<ElementInfo> = STANDARD_ELEMENTS
            .iter()
            .map(|&(symbol, name, number, vdw, cov, rgb)| ElementInfo {
                symbol,
                name,
                number,
                van_der_waals_radius: vdw,
                covalent_radius: cov,
                color: Rgba8::from_hex(rgb),
            })
            .collect();
        let by_symbol = elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| symbol_key(e.symbol).map(|key| (key, i)))
            .collect();
        Self {
            elements,
            by_symbol,
            fallback: ElementInfo {
                symbol: "?",
                name: "Unknown",
                number: 0,
                van_der_waals_radius: FALLBACK_RADIUS,
                covalent_radius: FALLBACK_RADIUS,
                color: Rgba8::NEUTRAL_GRAY,
            },
        }
    }

    /// The built-in table with fallback and color overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::InvalidOptions`] if an override names a
    /// symbol the table does not know.
    pub fn configured(options: &ElementOptions) -> Result<Self, MolmeshError> {
        let mut table = Self::standard();
        table.fallback.van_der_waals_radius = options.fallback_radius;
        table.fallback.covalent_radius = options.fallback_radius;
        table.fallback.color = Rgba8::from(options.fallback_color);
        for (symbol, rgb) in &options.color_overrides {
            table.set_color(symbol, Rgba8::from(*rgb)).map_err(|_| {
                MolmeshError::InvalidOptions(format!(
                    "color override for unknown element '{symbol}'"
                ))
            })?;
        }
        Ok(table)
    }

    /// Look up an element by symbol. Case and surrounding whitespace are
    /// ignored, so PDB-style `"CL"` resolves to chlorine.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::UnknownElement`] when the symbol is absent.
    /// Callers are expected to continue with [`Self::fallback`].
    pub fn lookup(&self, symbol: &str) -> Result<&ElementInfo, MolmeshError> {
        symbol_key(symbol)
            .and_then(|key| self.by_symbol.get(&key))
            .map(|&i| &self.elements[i])
            .ok_or_else(|| MolmeshError::UnknownElement(symbol.to_owned()))
    }

    /// Entry used in place of unknown elements.
    #[must_use]
    pub fn fallback(&self) -> &ElementInfo {
        &self.fallback
    }

    /// Replace the display color of a known element.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::UnknownElement`] when the symbol is absent.
    pub fn set_color(
        &mut self,
        symbol: &str,
        color: Rgba8,
    ) -> Result<(), MolmeshError> {
        let i = *symbol_key(symbol)
            .and_then(|key| self.by_symbol.get(&key))
            .ok_or_else(|| MolmeshError::UnknownElement(symbol.to_owned()))?;
        self.elements[i].color = color;
        Ok(())
    }

    /// Number of known elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the table has no known elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Upper-cased symbol, space padded. Element symbols are one or two ASCII
/// letters, so lookups never allocate.
type SymbolKey = [u8; 2];

fn symbol_key(symbol: &str) -> Option<SymbolKey> {
    let mut key = [b' '; 2];
    let bytes = symbol.trim().as_bytes();
    if bytes.is_empty() || bytes.len() > key.len() {
        return None;
    }
    for (slot, byte) in key.iter_mut().zip(bytes) {
        if !byte.is_ascii_alphabetic() {
            return None;
        }
        *slot = byte.to_ascii_uppercase();
    }
    Some(key)
}
