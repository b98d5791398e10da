//! Currency conversion backed by an injected exchange-rate table.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::invocation::{Arguments, OperationId};
use crate::tool::{Plugin, Tool, ToolContext, ToolDefinition, ToolError};

pub const NAMESPACE: &str = "CurrencyConverterPlugin";

/// Exchange rates keyed by `FROM-TO` currency pair (e.g. `USD-EUR`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRateTable {
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    pub fn rate(&self, from: &str, to: &str) -> Option<f64> {
        self.rates.get(&format!("{}-{}", from, to)).copied()
    }

    /// Add or replace entries from `other`.
    pub fn merge(&mut self, other: &HashMap<String, f64>) {
        self.rates
            .extend(other.iter().map(|(pair, rate)| (pair.clone(), *rate)));
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        let rates = [
            ("USD-EUR", 0.85),
            ("EUR-USD", 1.18),
            ("USD-GBP", 0.75),
            ("GBP-USD", 1.33),
            ("USD-JPY", 110.50),
            ("JPY-USD", 1.0 / 110.50),
            ("USD-HKD", 7.77),
            ("HKD-USD", 1.0 / 7.77),
        ]
        .into_iter()
        .map(|(pair, rate)| (pair.to_string(), rate))
        .collect();
        Self { rates }
    }
}

pub struct CurrencyConverterPlugin {
    rates: Arc<ExchangeRateTable>,
}

impl CurrencyConverterPlugin {
    pub fn new(rates: ExchangeRateTable) -> Self {
        Self {
            rates: Arc::new(rates),
        }
    }
}

impl Plugin for CurrencyConverterPlugin {
    fn name(&self) -> &'static str {
        NAMESPACE
    }

    fn functions(&self) -> Vec<Arc<dyn Tool>> {
        vec![Arc::new(GetExchangeRate {
            rates: self.rates.clone(),
        })]
    }
}

/// Look up the rate for converting one currency into another.
pub struct GetExchangeRate {
    rates: Arc<ExchangeRateTable>,
}

#[async_trait]
impl Tool for GetExchangeRate {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            OperationId::new(NAMESPACE, "GetExchangeRate"),
            "Get the exchange rate from one currency to another.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "fromCurrency": {
                        "type": "string",
                        "description": "ISO code of the source currency, e.g. USD"
                    },
                    "toCurrency": {
                        "type": "string",
                        "description": "ISO code of the target currency, e.g. EUR"
                    }
                },
                "required": ["fromCurrency", "toCurrency"]
            }),
        )
    }

    async fn execute(&self, args: &Arguments, _context: &ToolContext) -> Result<String, ToolError> {
        let from = args.required_str("fromCurrency")?;
        let to = args.required_str("toCurrency")?;
        self.rates
            .rate(from, to)
            .map(|rate| rate.to_string())
            .ok_or_else(|| {
                ToolError::ExecutionFailed(
                    "Exchange rate not available for this currency pair.".to_string(),
                )
            })
    }
}
