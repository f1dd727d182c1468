use rust_decimal::Decimal;
use thiserror::Error;

/// Recoverable per-stage input failures. None of these terminate a dialogue;
/// the state machine answers with a re-prompt and stays on the same stage.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("material `{0}` is not in the catalog")]
    UnknownMaterial(String),
    #[error("finishing option `{0}` is not in the catalog")]
    UnknownFinishing(String),
    #[error("could not parse dimensions from `{0}`")]
    MalformedSize(String),
    #[error("dimensions out of range: {width} x {height}")]
    SizeOutOfRange { width: Decimal, height: Decimal },
    #[error("quantity is not an integer: `{0}`")]
    MalformedQuantity(String),
    #[error("quantity out of range: {0}")]
    QuantityOutOfRange(i64),
}

impl InputError {
    /// Text shown to the user as the re-prompt for the failed stage.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownMaterial(_) => {
                "Пожалуйста, выберите материал из предложенного списка."
            }
            Self::UnknownFinishing(_) => "Пожалуйста, выберите опцию из списка.",
            Self::MalformedSize(_) => {
                "Неверный формат!\n\
                 Введите размеры в формате: ширина x высота\n\
                 Например: 2.5x1.8"
            }
            Self::SizeOutOfRange { .. } => {
                "Неверные размеры!\n\
                 Размеры должны быть положительными и не более 10 метров.\n\
                 Попробуйте еще раз:"
            }
            Self::MalformedQuantity(_) => "Пожалуйста, введите целое число:",
            Self::QuantityOutOfRange(_) => {
                "Неверное количество!\n\
                 Введите число от 1 до 1000:"
            }
        }
    }
}

/// Catalog problems detected at startup. These are fatal: the process refuses
/// to serve dialogues over a price list it cannot trust.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("the {0} catalog has no entries")]
    EmptyCatalog(&'static str),
    #[error("duplicate catalog label `{0}`")]
    DuplicateLabel(String),
    #[error("non-positive price for catalog entry `{0}`")]
    NonPositivePrice(String),
    #[error("finishing entry `{0}` counts zero units per piece")]
    ZeroUnitsPerPiece(String),
    #[error("price override refers to unknown catalog label `{0}`")]
    UnknownOverrideLabel(String),
    #[error("price override targets unpriced finishing entry `{0}`")]
    UnpricedOverride(String),
}
