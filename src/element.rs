use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Type tag of an atom. `Charge` marks a massless point charge used to build dipoles.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum AtomType {
    Hydrogen,
    Oxygen,
    Carbon,
    Sulfur,
    Natrium,
    Chlorine,
    Charge,
}

#[derive(Clone, Copy, Debug)]
pub struct ElementProps {
    /// g/mol
    pub molar_weight: f32,
    pub vdw_radius: f32,
    pub color: [u8; 4],
}

pub static ELEMENT_PROPERTIES: Lazy<HashMap<AtomType, ElementProps>> = Lazy::new(|| {
    use AtomType::*;
    let mut m = HashMap::new();
    m.insert(
        Hydrogen,
        ElementProps { molar_weight: 1.008, vdw_radius: 1.20, color: [255, 255, 255, 255] },
    );
    m.insert(
        Oxygen,
        ElementProps { molar_weight: 15.999, vdw_radius: 1.52, color: [255, 13, 13, 255] },
    );
    m.insert(
        Carbon,
        ElementProps { molar_weight: 12.011, vdw_radius: 1.70, color: [144, 144, 144, 255] },
    );
    m.insert(
        Sulfur,
        ElementProps { molar_weight: 32.06, vdw_radius: 1.80, color: [255, 255, 48, 255] },
    );
    m.insert(
        Natrium,
        ElementProps { molar_weight: 22.990, vdw_radius: 2.27, color: [171, 92, 242, 255] },
    );
    m.insert(
        Chlorine,
        ElementProps { molar_weight: 35.45, vdw_radius: 1.75, color: [31, 240, 31, 255] },
    );
    m.insert(
        Charge,
        ElementProps { molar_weight: 0.0, vdw_radius: 0.3, color: [0, 128, 255, 255] },
    );
    m
});

impl AtomType {
    pub fn props(&self) -> &'static ElementProps {
        // Every variant is inserted above.
        &ELEMENT_PROPERTIES[self]
    }

    pub fn molar_weight(&self) -> f32 {
        self.props().molar_weight
    }

    pub fn vdw_radius(&self) -> f32 {
        self.props().vdw_radius
    }

    pub fn color(&self) -> [u8; 4] {
        self.props().color
    }

    pub fn is_charge_marker(&self) -> bool {
        matches!(self, AtomType::Charge)
    }
}
