//! Environment-derived service configuration

use anyhow::Context;

use crate::domain::totals::ShippingFees;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Outbound order-notification webhook. Absent means notifications are off.
    pub webhook_url: Option<String>,
    pub shipping: ShippingFees,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
            Err(_) => 8083,
        };
        let webhook_url = std::env::var("ORDER_WEBHOOK_URL").ok().filter(|u| !u.is_empty());
        let shipping = ShippingFees {
            local: env_fee("SHIPPING_FEE_LOCAL", 400)?,
            national: env_fee("SHIPPING_FEE_NATIONAL", 800)?,
        };
        Ok(Self { database_url, port, webhook_url, shipping })
    }
}

fn env_fee(key: &str, default: i64) -> anyhow::Result<i64> {
    match std::env::var(key) {
        Ok(v) => v.parse::<i64>().with_context(|| format!("{key} must be an integer amount")),
        Err(_) => Ok(default),
    }
}
