use serde::{Deserialize, Serialize};

use crate::catalog::MaterialEntry;
use crate::input::PanelSize;

/// Position in the fixed dialogue order. Used for logging and for picking
/// re-prompt choices; the data itself lives on [`SessionState`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Material,
    Size,
    Quantity,
    Finishing,
}

/// One active dialogue. Each variant carries exactly the fields committed by
/// the transitions already passed, so "not yet set" is unrepresentable and a
/// committed field cannot be rewritten by a later stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    SelectingMaterial,
    EnteringSize {
        material: MaterialEntry,
    },
    EnteringQuantity {
        material: MaterialEntry,
        size: PanelSize,
    },
    ChoosingFinishing {
        material: MaterialEntry,
        size: PanelSize,
        quantity: u32,
    },
}

impl SessionState {
    pub fn stage(&self) -> Stage {
        match self {
            Self::SelectingMaterial => Stage::Material,
            Self::EnteringSize { .. } => Stage::Size,
            Self::EnteringQuantity { .. } => Stage::Quantity,
            Self::ChoosingFinishing { .. } => Stage::Finishing,
        }
    }
}
