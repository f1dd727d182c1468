use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{FinishingEntry, FinishingRule, MaterialEntry};
use crate::input::PanelSize;

/// A fully-populated order, produced only by the final stage transition.
/// Every field was validated by the stage that committed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedOrder {
    pub material: MaterialEntry,
    pub size: PanelSize,
    pub quantity: u32,
    pub finishing: FinishingEntry,
}

/// Itemized quote handed to the transport shell for rendering. Costs are
/// exact decimals; display rounding is the renderer's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub material: String,
    pub width: Decimal,
    pub height: Decimal,
    pub area: Decimal,
    pub quantity: u32,
    pub price_per_sqm: Decimal,
    pub printing_cost: Decimal,
    pub finishing: String,
    pub finishing_cost: Decimal,
    pub finishing_details: String,
    pub total_cost: Decimal,
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, order: &CompletedOrder) -> Quote;
}

#[derive(Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, order: &CompletedOrder) -> Quote {
        price_order(order)
    }
}

pub fn price_order(order: &CompletedOrder) -> Quote {
    let area = order.size.area();
    let quantity = Decimal::from(order.quantity);
    let printing_cost = order.material.price_per_sqm * area * quantity;

    let (finishing_cost, finishing_details) = match &order.finishing.rule {
        FinishingRule::None => (Decimal::ZERO, "0 руб".to_owned()),
        FinishingRule::FlatPerUnit { unit_price, units_per_piece } => {
            let units = Decimal::from(*units_per_piece) * quantity;
            (*unit_price * units, format!("{units} шт x {unit_price} руб"))
        }
        FinishingRule::FlatPerPiece { unit_price } => (
            *unit_price * quantity,
            format!("{} шт x {unit_price} руб", order.quantity),
        ),
    };

    Quote {
        material: order.material.label.clone(),
        width: order.size.width,
        height: order.size.height,
        area,
        quantity: order.quantity,
        price_per_sqm: order.material.price_per_sqm,
        printing_cost,
        finishing: order.finishing.label.clone(),
        finishing_cost,
        finishing_details,
        total_cost: printing_cost + finishing_cost,
    }
}
