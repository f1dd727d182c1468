use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

/// Eyelets are punched four to a piece regardless of quantity. Business
/// assumption inherited from the shop's price list, not user input.
pub const EYELETS_PER_PIECE: u32 = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub label: String,
    pub price_per_sqm: Decimal,
}

/// How a finishing option's cost scales with the order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishingRule {
    /// The explicit "no finishing" entry. Costs nothing.
    None,
    /// Priced per counted unit, `units_per_piece` units on every piece.
    FlatPerUnit { unit_price: Decimal, units_per_piece: u32 },
    /// Flat fee per printed piece.
    FlatPerPiece { unit_price: Decimal },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishingEntry {
    pub label: String,
    pub rule: FinishingRule,
}

/// Ordered material price list. Order is preserved so menus render the way
/// the price list reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialCatalog {
    entries: Vec<MaterialEntry>,
}

impl MaterialCatalog {
    pub fn new(entries: Vec<MaterialEntry>) -> Self {
        Self { entries }
    }

    pub fn find(&self, label: &str) -> Option<&MaterialEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.label.clone()).collect()
    }

    pub fn entries(&self) -> &[MaterialEntry] {
        &self.entries
    }

    fn set_price(&mut self, label: &str, price: Decimal) -> Result<(), CatalogError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.label == label)
            .ok_or_else(|| CatalogError::UnknownOverrideLabel(label.to_owned()))?;
        entry.price_per_sqm = price;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinishingCatalog {
    entries: Vec<FinishingEntry>,
}

impl FinishingCatalog {
    pub fn new(entries: Vec<FinishingEntry>) -> Self {
        Self { entries }
    }

    pub fn find(&self, label: &str) -> Option<&FinishingEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.label.clone()).collect()
    }

    pub fn entries(&self) -> &[FinishingEntry] {
        &self.entries
    }

    fn set_price(&mut self, label: &str, price: Decimal) -> Result<(), CatalogError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.label == label)
            .ok_or_else(|| CatalogError::UnknownOverrideLabel(label.to_owned()))?;
        match &mut entry.rule {
            FinishingRule::None => Err(CatalogError::UnpricedOverride(label.to_owned())),
            FinishingRule::FlatPerUnit { unit_price, .. }
            | FinishingRule::FlatPerPiece { unit_price } => {
                *unit_price = price;
                Ok(())
            }
        }
    }
}

/// Config-supplied price adjustments, applied once before the catalogs are
/// frozen for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverride {
    pub label: String,
    pub price: Decimal,
}

/// The two disjoint read-only price lists every session quotes against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalogs {
    pub materials: MaterialCatalog,
    pub finishing: FinishingCatalog,
}

impl Catalogs {
    pub fn new(materials: MaterialCatalog, finishing: FinishingCatalog) -> Self {
        Self { materials, finishing }
    }

    /// The shop's reference price list, prices in rubles.
    pub fn reference() -> Self {
        let materials = MaterialCatalog::new(vec![
            material("📄 Бумага (плакатная)", 150),
            material("🖼 Фотобумага глянцевая", 350),
            material("🎨 Холст", 500),
            material("💎 Баннер (440 г/м²)", 400),
            material("✨ Баннер (510 г/м²)", 450),
            material("🪟 Пленка (самоклеющаяся)", 600),
            material("🏢 Пленка (оракал)", 800),
        ]);
        let finishing = FinishingCatalog::new(vec![
            FinishingEntry { label: "Без отделки".to_owned(), rule: FinishingRule::None },
            per_piece("Ламинирование", 200),
            FinishingEntry {
                label: "Люверсы (за шт)".to_owned(),
                rule: FinishingRule::FlatPerUnit {
                    unit_price: Decimal::from(50),
                    units_per_piece: EYELETS_PER_PIECE,
                },
            },
            per_piece("Натяжка на подрамник", 500),
        ]);
        Self { materials, finishing }
    }

    pub fn apply_price_overrides(
        &mut self,
        materials: &[PriceOverride],
        finishing: &[PriceOverride],
    ) -> Result<(), CatalogError> {
        for over in materials {
            self.materials.set_price(&over.label, over.price)?;
        }
        for over in finishing {
            self.finishing.set_price(&over.label, over.price)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.materials.entries.is_empty() {
            return Err(CatalogError::EmptyCatalog("material"));
        }
        if self.finishing.entries.is_empty() {
            return Err(CatalogError::EmptyCatalog("finishing"));
        }

        let mut seen = std::collections::BTreeSet::new();
        for entry in &self.materials.entries {
            if !seen.insert(entry.label.as_str()) {
                return Err(CatalogError::DuplicateLabel(entry.label.clone()));
            }
            if entry.price_per_sqm <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice(entry.label.clone()));
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for entry in &self.finishing.entries {
            if !seen.insert(entry.label.as_str()) {
                return Err(CatalogError::DuplicateLabel(entry.label.clone()));
            }
            match &entry.rule {
                FinishingRule::None => {}
                FinishingRule::FlatPerUnit { unit_price, units_per_piece } => {
                    if *unit_price <= Decimal::ZERO {
                        return Err(CatalogError::NonPositivePrice(entry.label.clone()));
                    }
                    if *units_per_piece == 0 {
                        return Err(CatalogError::ZeroUnitsPerPiece(entry.label.clone()));
                    }
                }
                FinishingRule::FlatPerPiece { unit_price } => {
                    if *unit_price <= Decimal::ZERO {
                        return Err(CatalogError::NonPositivePrice(entry.label.clone()));
                    }
                }
            }
        }

        Ok(())
    }
}

fn material(label: &str, price: i64) -> MaterialEntry {
    MaterialEntry { label: label.to_owned(), price_per_sqm: Decimal::from(price) }
}

fn per_piece(label: &str, price: i64) -> FinishingEntry {
    FinishingEntry {
        label: label.to_owned(),
        rule: FinishingRule::FlatPerPiece { unit_price: Decimal::from(price) },
    }
}
