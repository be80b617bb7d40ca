use rust_decimal::{Decimal, RoundingStrategy};

/// Errors raised when converting stored decimal strings back into numbers
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Invalid decimal string '{0}'")]
    InvalidDecimal(String),
}

/// Converts monetary values between their numeric form and the fixed-precision
/// string representation used at the storage boundary
///
/// Storing prices as strings with a fixed number of decimal places avoids
/// floating-point drift in the database column.
#[derive(Debug, Clone, Copy)]
pub struct DecimalTransformer {
    decimals: u32,
}

impl Default for DecimalTransformer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl DecimalTransformer {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    /// Format a value as a fixed-precision string, rounding half away from zero
    pub fn format(&self, value: Decimal) -> String {
        let rounded = value.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", self.decimals as usize, rounded)
    }

    /// Convert an optional value into its storage string; absent input stays absent
    pub fn to_storage(&self, value: Option<Decimal>) -> Option<String> {
        value.map(|v| self.format(v))
    }

    /// Parse a storage string back into a numeric value
    ///
    /// Absent input decodes to zero; a non-numeric string is an error.
    pub fn from_storage(&self, value: Option<&str>) -> Result<Decimal, TransformError> {
        match value {
            Some(raw) => raw
                .trim()
                .parse::<Decimal>()
                .map_err(|_| TransformError::InvalidDecimal(raw.to_string())),
            None => Ok(Decimal::ZERO),
        }
    }
}
