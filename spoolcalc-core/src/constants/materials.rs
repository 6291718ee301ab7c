//! Typical Filament Densities
//!
//! Used to suggest a density when the user picks a material. Values are
//! manufacturer datasheet typicals in g/cm³; a real spool may differ by a few
//! percent, which is why the suggestion is only applied on a material change
//! and the user can always override it.

/// Material name (upper case) and density in g/cm³.
pub const MATERIAL_DENSITIES: &[(&str, f64)] = &[
    ("PLA", 1.24),
    ("PLA+", 1.24),
    ("PETG", 1.27),
    ("PET", 1.38),
    ("ABS", 1.04),
    ("ASA", 1.07),
    ("HIPS", 1.04),
    ("TPU", 1.21),
    ("TPE", 1.20),
    ("PA", 1.14),
    ("NYLON", 1.14),
    ("PC", 1.20),
    ("PVA", 1.23),
    ("PP", 0.90),
    ("CPE", 1.25),
    ("PVB", 1.08),
    ("PEEK", 1.30),
];

/// Look up the density for a material name, ignoring case and surrounding whitespace
pub fn density_for_material(material: &str) -> Option<f64> {
    let material = material.trim();
    MATERIAL_DENSITIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(material))
        .map(|&(_, density)| density)
}
