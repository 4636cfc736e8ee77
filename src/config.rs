//! Deployment configuration

use serde::{Deserialize, Serialize};

use crate::traits::*;
use crate::types::*;
use crate::utils::units::parse_units;
use crate::utils::validation::{validate_decimals, validate_positive_amount};

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Description of a token to deploy
///
/// ```json
/// { "name": "DLToken", "symbol": "DLT", "initial_supply": "1000000" }
/// ```
///
/// `initial_supply` is given in whole tokens and may carry up to `decimals`
/// fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    pub initial_supply: String,
}

impl TokenConfig {
    /// Create a config with the default number of decimals
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
            initial_supply: initial_supply.into(),
        }
    }

    /// Parse a config from JSON
    pub fn from_json_str(json: &str) -> TokenResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| TokenError::InvalidArgument(format!("Invalid token config: {e}")))
    }

    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.name.clone(), self.symbol.clone()).with_decimals(self.decimals)
    }

    /// Initial supply converted to base units
    pub fn initial_supply_units(&self) -> TokenResult<Amount> {
        validate_decimals(self.decimals)?;
        parse_units(&self.initial_supply, self.decimals)
    }

    /// Check the config without deploying anything
    pub fn validate(&self) -> TokenResult<()> {
        DefaultTokenValidator.validate_metadata(&self.metadata())?;
        validate_positive_amount(self.initial_supply_units()?)
    }
}
