use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// Largest printable side in meters. Matches the shop's widest press.
pub const MAX_DIMENSION_METERS: u32 = 10;
/// Largest accepted order size in pieces.
pub const MAX_QUANTITY: i64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSize {
    pub width: Decimal,
    pub height: Decimal,
}

impl PanelSize {
    pub fn area(&self) -> Decimal {
        self.width * self.height
    }
}

/// Parses free-form "width x height" text in meters.
///
/// Tolerates decimal commas, uppercase, internal whitespace and the Cyrillic
/// "х" as the delimiter, since users type dimensions in either layout.
pub fn parse_dimensions(text: &str) -> Result<PanelSize, InputError> {
    let malformed = || InputError::MalformedSize(text.trim().to_owned());

    let normalized: String = text
        .to_lowercase()
        .replace(',', ".")
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
    let canonical = normalized.replace('х', "x");

    if !canonical.contains('x') {
        return Err(malformed());
    }

    let segments: Vec<&str> = canonical.split('x').collect();
    if segments.len() != 2 {
        return Err(malformed());
    }

    let width = Decimal::from_str(segments[0]).map_err(|_| malformed())?;
    let height = Decimal::from_str(segments[1]).map_err(|_| malformed())?;

    let max = Decimal::from(MAX_DIMENSION_METERS);
    if width <= Decimal::ZERO || height <= Decimal::ZERO || width > max || height > max {
        return Err(InputError::SizeOutOfRange { width, height });
    }

    Ok(PanelSize { width, height })
}

/// Parses the number of pieces, accepting `1..=1000`.
pub fn parse_quantity(text: &str) -> Result<u32, InputError> {
    let trimmed = text.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| InputError::MalformedQuantity(trimmed.to_owned()))?;

    if value <= 0 || value > MAX_QUANTITY {
        return Err(InputError::QuantityOutOfRange(value));
    }

    Ok(value as u32)
}
