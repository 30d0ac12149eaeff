//! Write-side value encoding.
//!
//! Values are converted to their wire text on encode only; reply payloads
//! stay raw bytes until a driver explicitly converts them.

use crate::constants::NUMERIC_WIDTH;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::DataType;

/// A value to be written to a window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowValue {
    /// Boolean flag for logic windows.
    Logic(bool),
    /// Integer for numeric windows.
    Integer(i64),
    /// Pre-formatted or free-form text.
    Text(String),
}

impl WindowValue {
    /// Encode this value for a window of the given type.
    ///
    /// - `Logic` windows accept `Logic` and the integers 0/1 (other
    ///   integers are out of range, text is a type error);
    /// - `Numeric` windows accept integers (zero-padded to six characters)
    ///   and pass text through verbatim for pre-formatted values;
    /// - `Alphanumeric` windows accept anything, stringified.
    pub fn encode_for(&self, datatype: DataType) -> ProtocolResult<Vec<u8>> {
        match datatype {
            DataType::Logic => self.logic_str(),
            DataType::Numeric => self.num_str(),
            DataType::Alphanumeric => Ok(self.text_str().into_bytes()),
        }
    }

    fn logic_str(&self) -> ProtocolResult<Vec<u8>> {
        match self {
            WindowValue::Logic(true) | WindowValue::Integer(1) => Ok(b"1".to_vec()),
            WindowValue::Logic(false) | WindowValue::Integer(0) => Ok(b"0".to_vec()),
            WindowValue::Integer(other) => Err(ProtocolError::OutOfRange(format!(
                "logic value must be 0 or 1, got {other}"
            ))),
            WindowValue::Text(text) => Err(ProtocolError::DataType(format!(
                "logic window cannot take text {text:?}"
            ))),
        }
    }

    fn num_str(&self) -> ProtocolResult<Vec<u8>> {
        match self {
            WindowValue::Integer(value) => {
                Ok(format!("{value:0width$}", width = NUMERIC_WIDTH).into_bytes())
            }
            // Pre-formatted numbers (exponent notation, fixed point) pass
            // through untouched.
            WindowValue::Text(text) => Ok(text.clone().into_bytes()),
            WindowValue::Logic(value) => Err(ProtocolError::DataType(format!(
                "numeric window cannot take logic value {value}"
            ))),
        }
    }

    fn text_str(&self) -> String {
        match self {
            WindowValue::Logic(true) => "1".to_string(),
            WindowValue::Logic(false) => "0".to_string(),
            WindowValue::Integer(value) => value.to_string(),
            WindowValue::Text(text) => text.clone(),
        }
    }
}

impl From<bool> for WindowValue {
    fn from(value: bool) -> Self {
        WindowValue::Logic(value)
    }
}

impl From<i64> for WindowValue {
    fn from(value: i64) -> Self {
        WindowValue::Integer(value)
    }
}

impl From<i32> for WindowValue {
    fn from(value: i32) -> Self {
        WindowValue::Integer(value as i64)
    }
}

impl From<u16> for WindowValue {
    fn from(value: u16) -> Self {
        WindowValue::Integer(value as i64)
    }
}

impl From<&str> for WindowValue {
    fn from(value: &str) -> Self {
        WindowValue::Text(value.to_string())
    }
}

impl From<String> for WindowValue {
    fn from(value: String) -> Self {
        WindowValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logic_encoding() {
        assert_eq!(
            WindowValue::Logic(true).encode_for(DataType::Logic).unwrap(),
            b"1"
        );
        assert_eq!(
            WindowValue::Logic(false)
                .encode_for(DataType::Logic)
                .unwrap(),
            b"0"
        );
        assert_eq!(
            WindowValue::Integer(1).encode_for(DataType::Logic).unwrap(),
            b"1"
        );
        assert_eq!(
            WindowValue::Integer(0).encode_for(DataType::Logic).unwrap(),
            b"0"
        );
    }

    #[test]
    fn test_logic_rejects_other_integers() {
        let err = WindowValue::Integer(2)
            .encode_for(DataType::Logic)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::OutOfRange(_)));

        let err = WindowValue::Integer(-1)
            .encode_for(DataType::Logic)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::OutOfRange(_)));
    }

    #[test]
    fn test_logic_rejects_text() {
        let err = WindowValue::from("on").encode_for(DataType::Logic).unwrap_err();
        assert!(matches!(err, ProtocolError::DataType(_)));
    }

    #[test]
    fn test_numeric_zero_pads_to_six() {
        assert_eq!(
            WindowValue::Integer(867)
                .encode_for(DataType::Numeric)
                .unwrap(),
            b"000867"
        );
        assert_eq!(
            WindowValue::Integer(0)
                .encode_for(DataType::Numeric)
                .unwrap(),
            b"000000"
        );
        // Sign counts toward the width.
        assert_eq!(
            WindowValue::Integer(-5)
                .encode_for(DataType::Numeric)
                .unwrap(),
            b"-00005"
        );
    }

    #[test]
    fn test_numeric_passes_text_through() {
        assert_eq!(
            WindowValue::from("1.0E-03")
                .encode_for(DataType::Numeric)
                .unwrap(),
            b"1.0E-03"
        );
    }

    #[test]
    fn test_numeric_rejects_logic() {
        let err = WindowValue::Logic(true)
            .encode_for(DataType::Numeric)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::DataType(_)));
    }

    #[test]
    fn test_alphanumeric_takes_anything() {
        assert_eq!(
            WindowValue::from("TT-74").encode_for(DataType::Alphanumeric).unwrap(),
            b"TT-74"
        );
        assert_eq!(
            WindowValue::Integer(42)
                .encode_for(DataType::Alphanumeric)
                .unwrap(),
            b"42"
        );
        assert_eq!(
            WindowValue::Logic(true)
                .encode_for(DataType::Alphanumeric)
                .unwrap(),
            b"1"
        );
    }
}
