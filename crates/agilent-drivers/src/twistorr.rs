//! TwisTorr 74 FS turbo pump rack controller.

use std::fmt;

use async_trait::async_trait;
use tracing::info;

use agilent_client::WindowClient;
use window_protocol::{DataType, WindowDescriptor, WindowValue};

use crate::driver::VacuumController;
use crate::error::{DriverError, DriverResult};
use crate::reading;
use crate::units::{PressureUnit, UnitTable};
use crate::windows::{ERROR_CODE, STATUS};

// ============================================================================
// Window catalog
// ============================================================================

/// Start/stop command word (1 starts the pump, 0 stops it).
pub const START_STOP: WindowDescriptor =
    WindowDescriptor::new(0, true, DataType::Numeric, "Start/Stop");

/// Serial remote mode enable.
pub const REMOTE: WindowDescriptor = WindowDescriptor::new(8, true, DataType::Logic, "Remote");

/// Soft start enable for the next run-up.
pub const SOFT_START: WindowDescriptor =
    WindowDescriptor::new(100, true, DataType::Logic, "Soft start");

/// Set point R1 signal type.
pub const R1_SET_POINT_TYPE: WindowDescriptor =
    WindowDescriptor::new(101, true, DataType::Numeric, "R1 set point type");

/// Set point R1 threshold value.
pub const R1_SET_POINT: WindowDescriptor =
    WindowDescriptor::new(102, true, DataType::Numeric, "R1 set point");

/// External fan configuration (off, on, automatic).
pub const EXTERNAL_FAN_CONFIG: WindowDescriptor =
    WindowDescriptor::new(143, true, DataType::Numeric, "External fan config");

/// External fan activation.
pub const EXTERNAL_FAN_ACTIVATION: WindowDescriptor =
    WindowDescriptor::new(144, true, DataType::Logic, "External fan activation");

/// Unit the gauge reports pressure in.
pub const PRESSURE_UNIT: WindowDescriptor =
    WindowDescriptor::new(163, true, DataType::Numeric, "Pressure unit");

/// Gauge pressure reading.
pub const GAUGE_READ: WindowDescriptor =
    WindowDescriptor::new(224, false, DataType::Numeric, "Gauge read");

/// Gauge health word.
pub const GAUGE_STATUS: WindowDescriptor =
    WindowDescriptor::new(257, false, DataType::Numeric, "Gauge status");

/// Gauge power setting.
pub const GAUGE_POWER: WindowDescriptor =
    WindowDescriptor::new(267, true, DataType::Numeric, "Gauge power");

/// Unit encodings for window 163.
const UNITS: UnitTable = UnitTable([PressureUnit::MBar, PressureUnit::Pa, PressureUnit::Torr]);

// ============================================================================
// Status and error words
// ============================================================================

/// Pump status word (window 205).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwisTorrStatus {
    /// Pump stopped.
    Stop,
    /// Waiting for interlock.
    Waiting,
    /// Ramping up.
    Starting,
    /// Auto-tuning the drive frequency.
    AutoTuning,
    /// Braking down to stop.
    Braking,
    /// At speed.
    Normal,
    /// Fault; see the error flags.
    Fail,
}

impl TryFrom<i64> for TwisTorrStatus {
    type Error = DriverError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TwisTorrStatus::Stop),
            1 => Ok(TwisTorrStatus::Waiting),
            2 => Ok(TwisTorrStatus::Starting),
            3 => Ok(TwisTorrStatus::AutoTuning),
            4 => Ok(TwisTorrStatus::Braking),
            5 => Ok(TwisTorrStatus::Normal),
            6 => Ok(TwisTorrStatus::Fail),
            other => Err(DriverError::UnknownStatus(other)),
        }
    }
}

/// Error flags (window 206), a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TwisTorrError(u16);

impl TwisTorrError {
    /// No connection between controller and pump.
    pub const NO_CONNECTION: TwisTorrError = TwisTorrError(0x01);
    /// Pump overtemperature.
    pub const PUMP_OVERTEMP: TwisTorrError = TwisTorrError(0x02);
    /// Controller overtemperature.
    pub const CONTROLLER_OVERTEMP: TwisTorrError = TwisTorrError(0x04);
    /// Mains power failure.
    pub const POWER_FAIL: TwisTorrError = TwisTorrError(0x08);
    /// Auxiliary supply failure.
    pub const AUX_FAIL: TwisTorrError = TwisTorrError(0x10);
    /// Overvoltage on the drive.
    pub const OVERVOLTAGE: TwisTorrError = TwisTorrError(0x20);
    /// Short circuit on the drive output.
    pub const SHORT_CIRCUIT: TwisTorrError = TwisTorrError(0x40);
    /// Load too high for the drive.
    pub const TOO_HIGH_LOAD: TwisTorrError = TwisTorrError(0x80);

    const NAMES: [(TwisTorrError, &'static str); 8] = [
        (Self::NO_CONNECTION, "no connection"),
        (Self::PUMP_OVERTEMP, "pump overtemperature"),
        (Self::CONTROLLER_OVERTEMP, "controller overtemperature"),
        (Self::POWER_FAIL, "power fail"),
        (Self::AUX_FAIL, "aux fail"),
        (Self::OVERVOLTAGE, "overvoltage"),
        (Self::SHORT_CIRCUIT, "short circuit"),
        (Self::TOO_HIGH_LOAD, "too high load"),
    ];

    /// Raw error word as reported by the controller.
    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub fn contains(&self, other: TwisTorrError) -> bool {
        self.0 & other.0 == other.0
    }

    /// No error flags set.
    pub fn is_clear(&self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for TwisTorrError {
    fn from(bits: u16) -> Self {
        TwisTorrError(bits)
    }
}

impl fmt::Display for TwisTorrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clear() {
            return write!(f, "no errors");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        let known = Self::NAMES.iter().fold(0, |mask, (flag, _)| mask | flag.0);
        let unknown = self.0 & !known;
        if unknown != 0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "unknown flags 0x{:02X}", unknown)?;
        }
        Ok(())
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Driver for the TwisTorr 74 FS rack controller.
///
/// Windows without a dedicated method here (set points, fan control,
/// gauge power) are reachable through [`client`](Self::client) and the
/// catalog constants.
pub struct TwisTorrDriver {
    client: WindowClient,
}

impl TwisTorrDriver {
    /// Drive the controller `client` dials.
    pub fn new(client: WindowClient) -> Self {
        TwisTorrDriver { client }
    }

    /// The underlying window client, for catalog windows this driver
    /// does not wrap.
    pub fn client(&self) -> &WindowClient {
        &self.client
    }

    /// Verify the link by reading the status and error windows.
    pub async fn connect(&mut self) -> DriverResult<()> {
        let status = self.status().await?;
        let errors = self.error_flags().await?;
        info!(addr = self.client.addr(), ?status, %errors, "TwisTorr 74 FS link verified");
        Ok(())
    }

    /// Pump status word.
    pub async fn status(&self) -> DriverResult<TwisTorrStatus> {
        TwisTorrStatus::try_from(reading::read_integer(&self.client, &STATUS).await?)
    }

    /// Active error flags.
    pub async fn error_flags(&self) -> DriverResult<TwisTorrError> {
        let word = reading::read_integer(&self.client, &ERROR_CODE).await?;
        let bits = u16::try_from(word).map_err(|_| DriverError::BadReading {
            window: ERROR_CODE.win,
            text: word.to_string(),
        })?;
        Ok(TwisTorrError::from(bits))
    }

    /// Start the pump.
    pub async fn start(&self) -> DriverResult<()> {
        reading::write_value(&self.client, &START_STOP, WindowValue::Integer(1)).await
    }

    /// Stop the pump.
    pub async fn stop(&self) -> DriverResult<()> {
        reading::write_value(&self.client, &START_STOP, WindowValue::Integer(0)).await
    }

    /// Whether serial remote mode is enabled.
    pub async fn remote_mode(&self) -> DriverResult<bool> {
        reading::read_logic(&self.client, &REMOTE).await
    }

    /// Enable or disable serial remote mode.
    pub async fn set_remote_mode(&self, enabled: bool) -> DriverResult<()> {
        reading::write_value(&self.client, &REMOTE, WindowValue::Logic(enabled)).await
    }

    /// Whether soft start is enabled.
    pub async fn soft_start(&self) -> DriverResult<bool> {
        reading::read_logic(&self.client, &SOFT_START).await
    }

    /// Enable or disable soft start for the next run-up.
    pub async fn set_soft_start(&self, enabled: bool) -> DriverResult<()> {
        reading::write_value(&self.client, &SOFT_START, WindowValue::Logic(enabled)).await
    }

    /// Gauge pressure in the configured unit.
    pub async fn pressure(&self) -> DriverResult<f64> {
        reading::read_float(&self.client, &GAUGE_READ).await
    }

    /// Unit the gauge reports pressure in.
    pub async fn pressure_unit(&self) -> DriverResult<PressureUnit> {
        UNITS.unit(reading::read_integer(&self.client, &PRESSURE_UNIT).await?)
    }

    /// Select the unit the gauge reports pressure in.
    pub async fn set_pressure_unit(&self, unit: PressureUnit) -> DriverResult<()> {
        let value = WindowValue::Integer(UNITS.code(unit));
        reading::write_value(&self.client, &PRESSURE_UNIT, value).await
    }
}

#[async_trait]
impl VacuumController for TwisTorrDriver {
    async fn connect(&mut self) -> DriverResult<()> {
        TwisTorrDriver::connect(self).await
    }

    async fn pressure(&self) -> DriverResult<f64> {
        TwisTorrDriver::pressure(self).await
    }

    async fn pressure_unit(&self) -> DriverResult<PressureUnit> {
        TwisTorrDriver::pressure_unit(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_word_mapping() {
        assert_eq!(TwisTorrStatus::try_from(0).unwrap(), TwisTorrStatus::Stop);
        assert_eq!(
            TwisTorrStatus::try_from(3).unwrap(),
            TwisTorrStatus::AutoTuning
        );
        assert_eq!(TwisTorrStatus::try_from(5).unwrap(), TwisTorrStatus::Normal);
        assert_eq!(TwisTorrStatus::try_from(6).unwrap(), TwisTorrStatus::Fail);
        assert!(matches!(
            TwisTorrStatus::try_from(7),
            Err(DriverError::UnknownStatus(7))
        ));
    }

    #[test]
    fn test_error_flags_contains() {
        let flags = TwisTorrError::from(0x41);
        assert!(flags.contains(TwisTorrError::NO_CONNECTION));
        assert!(flags.contains(TwisTorrError::SHORT_CIRCUIT));
        assert!(!flags.contains(TwisTorrError::OVERVOLTAGE));
        assert!(!flags.is_clear());
        assert!(TwisTorrError::default().is_clear());
    }

    #[test]
    fn test_error_flags_display() {
        assert_eq!(TwisTorrError::default().to_string(), "no errors");
        assert_eq!(
            TwisTorrError::from(0x41).to_string(),
            "no connection, short circuit"
        );
        assert_eq!(
            TwisTorrError::from(0x100).to_string(),
            "unknown flags 0x100"
        );
    }

    #[test]
    fn test_unit_table_ordering() {
        assert_eq!(UNITS.unit(0).unwrap(), PressureUnit::MBar);
        assert_eq!(UNITS.unit(1).unwrap(), PressureUnit::Pa);
        assert_eq!(UNITS.unit(2).unwrap(), PressureUnit::Torr);
        assert_eq!(UNITS.code(PressureUnit::Torr), 2);
    }

    #[test]
    fn test_catalog_marks_gauge_windows_read_only() {
        assert!(!GAUGE_READ.writable);
        assert!(!GAUGE_STATUS.writable);
        assert!(START_STOP.writable);
        assert!(PRESSURE_UNIT.writable);
    }
}
