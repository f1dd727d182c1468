use std::sync::Arc;

use anyhow::{Context, Result};

use printquote_chat::{ChatTransport, Dispatcher};
use printquote_core::{AppConfig, Catalogs, SessionMachine};

pub struct App<T> {
    pub config: AppConfig,
    pub dispatcher: Dispatcher<T>,
}

/// Builds the frozen catalogs and wires the dispatcher. Catalog overrides
/// from the config are applied and re-validated before any session can see
/// them.
pub fn bootstrap_with_config<T>(config: AppConfig, transport: T) -> Result<App<T>>
where
    T: ChatTransport,
{
    let mut catalogs = Catalogs::reference();
    catalogs
        .apply_price_overrides(&config.catalog.materials, &config.catalog.finishing)
        .context("applying catalog price overrides")?;
    catalogs.validate().context("validating catalogs")?;

    tracing::info!(
        materials = catalogs.materials.labels().len(),
        finishing = catalogs.finishing.labels().len(),
        "catalogs loaded"
    );

    let machine = SessionMachine::new(Arc::new(catalogs));
    Ok(App { config, dispatcher: Dispatcher::new(machine, transport) })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use printquote_core::{AppConfig, PriceOverride};

    use super::bootstrap_with_config;
    use crate::console::ConsoleTransport;

    #[test]
    fn bootstrap_succeeds_with_defaults() {
        let app = bootstrap_with_config(AppConfig::default(), ConsoleTransport::default())
            .expect("bootstrap");
        assert_eq!(app.dispatcher.registry().active_count(), 0);
    }

    #[test]
    fn bootstrap_applies_catalog_overrides() {
        let mut config = AppConfig::default();
        config.catalog.materials.push(PriceOverride {
            label: "🎨 Холст".to_owned(),
            price: Decimal::from(650),
        });
        assert!(bootstrap_with_config(config, ConsoleTransport::default()).is_ok());
    }

    #[test]
    fn bootstrap_rejects_unknown_override_labels() {
        let mut config = AppConfig::default();
        config.catalog.materials.push(PriceOverride {
            label: "Мрамор".to_owned(),
            price: Decimal::from(100),
        });
        assert!(bootstrap_with_config(config, ConsoleTransport::default()).is_err());
    }
}
