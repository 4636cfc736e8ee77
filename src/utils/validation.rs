//! Validation utilities

use crate::traits::*;
use crate::types::*;

/// Largest number of decimals for which `10^decimals` fits in an [`Amount`]
pub const MAX_DECIMALS: u8 = 38;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: Amount) -> TokenResult<()> {
    if amount == 0 {
        Err(TokenError::InvalidArgument(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that the number of decimals can be represented in base units
pub fn validate_decimals(decimals: u8) -> TokenResult<()> {
    if decimals > MAX_DECIMALS {
        return Err(TokenError::InvalidArgument(format!(
            "Decimals cannot exceed {MAX_DECIMALS}"
        )));
    }

    Ok(())
}

/// Validate that a token name is valid
pub fn validate_token_name(name: &str) -> TokenResult<()> {
    if name.trim().is_empty() {
        return Err(TokenError::InvalidArgument(
            "Token name cannot be empty".to_string(),
        ));
    }

    if name.len() > 64 {
        return Err(TokenError::InvalidArgument(
            "Token name cannot exceed 64 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a token symbol is valid
pub fn validate_symbol(symbol: &str) -> TokenResult<()> {
    if symbol.trim().is_empty() {
        return Err(TokenError::InvalidArgument(
            "Token symbol cannot be empty".to_string(),
        ));
    }

    if symbol.len() > 11 {
        return Err(TokenError::InvalidArgument(
            "Token symbol cannot exceed 11 characters".to_string(),
        ));
    }

    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TokenError::InvalidArgument(
            "Token symbol can only contain ASCII letters and digits".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an address is well formed
pub fn validate_address(address: &Address) -> TokenResult<()> {
    if address.is_blank() {
        return Err(TokenError::InvalidArgument(
            "Address cannot be empty".to_string(),
        ));
    }

    if address.as_str().len() > 128 {
        return Err(TokenError::InvalidArgument(
            "Address cannot exceed 128 characters".to_string(),
        ));
    }

    if address.as_str().chars().any(char::is_whitespace) {
        return Err(TokenError::InvalidArgument(
            "Address cannot contain whitespace".to_string(),
        ));
    }

    Ok(())
}

/// Stricter validator enforcing length and character limits
pub struct StrictTokenValidator;

impl TokenValidator for StrictTokenValidator {
    fn validate_metadata(&self, metadata: &TokenMetadata) -> TokenResult<()> {
        DefaultTokenValidator.validate_metadata(metadata)?;

        validate_token_name(&metadata.name)?;
        validate_symbol(&metadata.symbol)?;
        validate_decimals(metadata.decimals)?;

        Ok(())
    }

    fn validate_address(&self, address: &Address) -> TokenResult<()> {
        validate_address(address)
    }
}
