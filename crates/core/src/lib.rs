//! Core of the wide-format printing quote bot: the read-only price catalogs,
//! the per-session ordering dialogue state machine, and the deterministic
//! pricing engine. No I/O lives here; the chat shell drives it.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod input;
pub mod pricing;
pub mod session;

pub use catalog::{
    Catalogs, FinishingCatalog, FinishingEntry, FinishingRule, MaterialCatalog, MaterialEntry,
    PriceOverride, EYELETS_PER_PIECE,
};
pub use config::{AppConfig, BotConfig, ConfigError, LoadOptions, LogFormat, LoggingConfig};
pub use errors::{CatalogError, InputError};
pub use input::{parse_dimensions, parse_quantity, PanelSize, MAX_DIMENSION_METERS, MAX_QUANTITY};
pub use pricing::{price_order, CompletedOrder, DeterministicPricingEngine, PricingEngine, Quote};
pub use session::{Prompt, SessionMachine, SessionState, Stage, StepOutcome};
