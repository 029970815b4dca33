//! Residue code tables
//!
//! Maps 3-letter amino acid names to 1-letter codes for the single-letter
//! annotation the visualization engine carries per atom.

use phf::phf_map;

/// Sentinel code substituted when a residue name cannot be resolved
pub const UNKNOWN_RESIDUE_CODE: char = 'X';

/// 3-letter to 1-letter amino acid codes (canonical 20 plus common variants)
static THREE_TO_ONE: phf::Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    // Non-canonical amino acids with accepted one-letter codes
    "SEC" => 'U', "PYL" => 'O', "ASX" => 'B', "GLX" => 'Z',
    // Histidine protonation variants
    "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
};

/// Convert a 3-letter amino acid name to its 1-letter code
pub fn three_to_one(resn: &str) -> Option<char> {
    THREE_TO_ONE.get(resn).copied()
}

/// Best-effort single-letter code for a residue name
///
/// Length-1 names pass through unchanged; otherwise the 3-letter table is
/// consulted and unresolvable names yield [`UNKNOWN_RESIDUE_CODE`].
pub fn residue_code(resn: &str) -> char {
    let mut chars = resn.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => three_to_one(resn).unwrap_or(UNKNOWN_RESIDUE_CODE),
    }
}
