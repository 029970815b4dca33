//! Bidirectional structure conversion
//!
//! Maps the column-oriented atom table onto the engine's indexed model and
//! back. Both directions preserve atom order exactly; the engine-facing
//! direction applies the field-presence policy (absent annotation columns
//! get engine defaults), the table-facing direction applies the altloc
//! resolution policy and materializes only the requested annotations.

use std::str::FromStr;

use ahash::AHashMap;
use lin_alg::f32::Vec3;

use ammolite_mol::{residue_code, AtomArray, BondList, BondType};

use crate::chempy::{IndexedModel, ModelAtom, ModelBond};
use crate::error::{BridgeError, BridgeResult};

/// Altloc id treated as "no alternate location"
const NO_ALTLOC: char = ' ';

/// How alternate-location variants are resolved when importing a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AltlocPolicy {
    /// Keep every atom and add the `altloc_id` annotation column
    #[default]
    All,
    /// Keep, per residue, the atoms bearing the first altloc id encountered
    First,
    /// Keep, per residue, the atoms bearing the altloc id with the highest
    /// occupancy (ties broken by first encountered)
    Occupancy,
}

impl FromStr for AltlocPolicy {
    type Err = BridgeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "all" => Ok(AltlocPolicy::All),
            "first" => Ok(AltlocPolicy::First),
            "occupancy" => Ok(AltlocPolicy::Occupancy),
            _ => Err(BridgeError::InvalidAltloc(name.to_string())),
        }
    }
}

/// Optional annotation columns that can be materialized on import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraField {
    /// The `b_factor` column
    BFactor,
    /// The `occupancy` column
    Occupancy,
    /// The `charge` column
    Charge,
}

impl FromStr for ExtraField {
    type Err = BridgeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "b_factor" => Ok(ExtraField::BFactor),
            "occupancy" => Ok(ExtraField::Occupancy),
            "charge" => Ok(ExtraField::Charge),
            _ => Err(BridgeError::InvalidField(name.to_string())),
        }
    }
}

/// Options for the model-to-table direction
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Altloc resolution policy
    pub altloc: AltlocPolicy,
    /// Optional annotation columns to materialize
    pub extra_fields: Vec<ExtraField>,
    /// Whether to reconstruct the bond list
    pub include_bonds: bool,
}

impl ConvertOptions {
    /// Options keeping every atom and every optional annotation
    pub fn everything() -> Self {
        ConvertOptions {
            altloc: AltlocPolicy::All,
            extra_fields: vec![ExtraField::BFactor, ExtraField::Occupancy, ExtraField::Charge],
            include_bonds: true,
        }
    }
}

/// Convert an atom array into the engine's indexed model
///
/// The model's atom sequence has exactly the table's length and order.
/// Absent annotation columns fall back to the engine defaults (b = 0,
/// q = 1, charge = 0, no altloc). A table without bond information
/// converts fine but logs an advisory warning.
pub fn convert_to_model(array: &AtomArray) -> BridgeResult<IndexedModel> {
    array.validate()?;
    let n = array.array_length();

    let mut model = IndexedModel::new();
    model.atom.reserve(n);

    for i in 0..n {
        let resn = &array.res_name[i];
        let coord = array.coord[i];
        model.atom.push(ModelAtom {
            chain: array.chain_id[i].clone(),
            // The engine keeps a separate segment id; mirror the chain
            segi: array.chain_id[i].clone(),
            resi_number: array.res_id[i],
            ins_code: array.ins_code[i],
            resn: resn.clone(),
            resn_code: residue_code(resn),
            hetatm: array.hetero[i] as u8,
            name: array.atom_name[i].clone(),
            symbol: array.element[i].clone(),
            b: array.b_factor.as_ref().map_or(0.0, |col| col[i]),
            q: array.occupancy.as_ref().map_or(1.0, |col| col[i]),
            formal_charge: array.charge.as_ref().map_or(0, |col| col[i]),
            alt: array.altloc_id.as_ref().map_or(NO_ALTLOC, |col| col[i]),
            coord: [coord.x, coord.y, coord.z],
            index: (i + 1) as u32,
        });
    }

    match &array.bonds {
        Some(bonds) => {
            model.bond.reserve(bonds.len());
            for entry in bonds.iter() {
                model.bond.push(ModelBond {
                    index: [entry.atom1, entry.atom2],
                    order: entry.bond_type.order(),
                });
            }
        }
        None => {
            log::warn!("The given atom array has no associated bond information");
        }
    }

    Ok(model)
}

/// Convert an indexed model into an atom array
///
/// The inverse field mapping, followed by altloc resolution and annotation
/// selection according to `options`.
pub fn convert_to_atom_array(
    model: &IndexedModel,
    options: &ConvertOptions,
) -> BridgeResult<AtomArray> {
    let full = model_to_full_array(model, options.include_bonds)?;
    let mut array = match options.altloc {
        AltlocPolicy::All => full,
        policy => {
            let keep = altloc_keep(&full, policy);
            full.filtered(&keep)?
        }
    };
    apply_field_selection(&mut array, options);
    Ok(array)
}

/// Inverse field mapping with every annotation column materialized
///
/// No altloc filtering and no annotation selection; used as the shared
/// template for both single-state and stack imports.
pub(crate) fn model_to_full_array(
    model: &IndexedModel,
    include_bonds: bool,
) -> BridgeResult<AtomArray> {
    let atoms = &model.atom;
    let n = atoms.len();

    let mut array = AtomArray {
        chain_id: atoms.iter().map(|a| a.chain.clone()).collect(),
        res_id: atoms.iter().map(|a| a.resi_number).collect(),
        ins_code: atoms.iter().map(|a| a.ins_code).collect(),
        res_name: atoms.iter().map(|a| a.resn.clone()).collect(),
        atom_name: atoms.iter().map(|a| a.name.clone()).collect(),
        element: atoms.iter().map(|a| a.symbol.clone()).collect(),
        hetero: atoms.iter().map(|a| a.hetatm != 0).collect(),
        coord: atoms
            .iter()
            .map(|a| Vec3::new(a.coord[0], a.coord[1], a.coord[2]))
            .collect(),
        b_factor: Some(atoms.iter().map(|a| a.b).collect()),
        occupancy: Some(atoms.iter().map(|a| a.q).collect()),
        charge: Some(atoms.iter().map(|a| a.formal_charge).collect()),
        altloc_id: Some(atoms.iter().map(|a| a.alt).collect()),
        bonds: None,
    };

    if include_bonds {
        let bonds = BondList::from_bonds(
            n,
            model
                .bond
                .iter()
                .map(|b| (b.index[0], b.index[1], BondType::from_order(b.order))),
        )?;
        array.bonds = Some(bonds);
    }

    Ok(array)
}

/// Per-atom keep mask implementing an altloc policy
///
/// Atoms without an altloc id are always kept. Residue identity is
/// (chain, residue number, insertion code).
pub(crate) fn altloc_keep(array: &AtomArray, policy: AltlocPolicy) -> Vec<bool> {
    let n = array.array_length();
    if policy == AltlocPolicy::All {
        return vec![true; n];
    }
    let altloc = match &array.altloc_id {
        Some(col) => col,
        None => return vec![true; n],
    };
    let occupancy = array.occupancy.as_deref();

    type ResidueKey = (String, i32, char);
    let key = |i: usize| -> ResidueKey {
        (
            array.chain_id[i].clone(),
            array.res_id[i],
            array.ins_code[i],
        )
    };

    // Per residue, the altloc id the policy elects
    let mut elected: AHashMap<ResidueKey, (char, f32)> = AHashMap::new();
    for i in 0..n {
        let alt = altloc[i];
        if alt == NO_ALTLOC {
            continue;
        }
        let q = occupancy.map_or(1.0, |col| col[i]);
        match policy {
            AltlocPolicy::All => unreachable!(),
            AltlocPolicy::First => {
                elected.entry(key(i)).or_insert((alt, q));
            }
            AltlocPolicy::Occupancy => {
                let entry = elected.entry(key(i)).or_insert((alt, q));
                // Strictly greater keeps ties on the first-encountered id
                if alt == entry.0 {
                    entry.1 = entry.1.max(q);
                } else if q > entry.1 {
                    *entry = (alt, q);
                }
            }
        }
    }

    (0..n)
        .map(|i| {
            let alt = altloc[i];
            alt == NO_ALTLOC || elected.get(&key(i)).map(|(id, _)| *id) == Some(alt)
        })
        .collect()
}

/// Drop annotation columns that were not requested
pub(crate) fn apply_field_selection(array: &mut AtomArray, options: &ConvertOptions) {
    if !options.extra_fields.contains(&ExtraField::BFactor) {
        array.b_factor = None;
    }
    if !options.extra_fields.contains(&ExtraField::Occupancy) {
        array.occupancy = None;
    }
    if !options.extra_fields.contains(&ExtraField::Charge) {
        array.charge = None;
    }
    if options.altloc != AltlocPolicy::All {
        array.altloc_id = None;
    }
}
