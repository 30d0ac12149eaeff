//! IPC Mini ion pump controller.

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

/// Operating mode (serial, remote, local).
pub const MODE: WindowDescriptor = WindowDescriptor::new(8, true, DataType::Numeric, "Mode");

/// High voltage on/off.
pub const HV_ONOFF: WindowDescriptor =
    WindowDescriptor::new(11, true, DataType::Logic, "HV on/off");

/// Controller model string.
pub const CONTROLLER_MODEL: WindowDescriptor =
    WindowDescriptor::new(319, false, DataType::Alphanumeric, "Controller model");

/// Controller serial number.
pub const CONTROLLER_SERIAL_NO: WindowDescriptor =
    WindowDescriptor::new(323, false, DataType::Alphanumeric, "Controller serial number");

/// RS-485 device address.
pub const SERIAL_ADDRESS: WindowDescriptor =
    WindowDescriptor::new(503, true, DataType::Numeric, "Serial address");

/// Serial line type (RS-232 or RS-485).
pub const SERIAL_TYPE: WindowDescriptor =
    WindowDescriptor::new(504, true, DataType::Numeric, "Serial type");

/// Unit pressure is reported in.
pub const UNIT_PRESSURE: WindowDescriptor =
    WindowDescriptor::new(600, true, DataType::Numeric, "Unit pressure");

/// Start the pump when power is applied.
pub const AUTOSTART: WindowDescriptor =
    WindowDescriptor::new(601, true, DataType::Logic, "Autostart");

/// Protect mode enable.
pub const PROTECT: WindowDescriptor = WindowDescriptor::new(602, true, DataType::Logic, "Protect");

/// Step mode enable.
pub const STEP: WindowDescriptor = WindowDescriptor::new(603, true, DataType::Logic, "Step");

/// Pump device number (sets voltage/current profiles).
pub const DEVICE_NUMBER: WindowDescriptor =
    WindowDescriptor::new(610, true, DataType::Numeric, "Device number");

/// Maximum output power, watts.
pub const MAX_POWER: WindowDescriptor =
    WindowDescriptor::new(612, true, DataType::Numeric, "Max power");

/// Target output voltage, volts.
pub const V_TARGET: WindowDescriptor =
    WindowDescriptor::new(613, true, DataType::Numeric, "V target");

/// Protect mode current threshold, mA.
pub const I_PROTECT: WindowDescriptor =
    WindowDescriptor::new(614, true, DataType::Numeric, "I protect");

/// Pressure set point threshold.
pub const SET_POINT: WindowDescriptor =
    WindowDescriptor::new(615, true, DataType::Numeric, "Set point");

/// Power section temperature, Celsius.
pub const TEMPERATURE_POWER: WindowDescriptor =
    WindowDescriptor::new(801, false, DataType::Numeric, "Temperature power");

/// Controller internal temperature, Celsius.
pub const TEMPERATURE_CONTROLLER: WindowDescriptor =
    WindowDescriptor::new(802, false, DataType::Numeric, "Temperature controller");

/// Whether the set point threshold is currently crossed.
pub const STATUS_SET_POINT: WindowDescriptor =
    WindowDescriptor::new(804, false, DataType::Logic, "Status set point");

/// Measured output voltage, volts.
pub const V_MEASURED: WindowDescriptor =
    WindowDescriptor::new(810, false, DataType::Numeric, "V measured");

/// Measured output current, amps.
pub const I_MEASURED: WindowDescriptor =
    WindowDescriptor::new(811, false, DataType::Numeric, "I measured");

/// Pressure derived from the pump current.
pub const PRESSURE: WindowDescriptor =
    WindowDescriptor::new(812, false, DataType::Numeric, "Pressure");

/// Free-text channel label.
pub const LABEL: WindowDescriptor =
    WindowDescriptor::new(890, true, DataType::Alphanumeric, "Label");

/// Unit encodings for window 600. The ordering differs from the
/// TwisTorr family table.
const UNITS: UnitTable = UnitTable([PressureUnit::Torr, PressureUnit::MBar, PressureUnit::Pa]);

// ============================================================================
// Status and error words
// ============================================================================

/// Pump status word (window 205).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpcMiniStatus {
    /// High voltage off.
    Stop,
    /// High voltage on, pump running.
    Normal,
    /// Fault; see the error flags.
    Fail,
}

impl TryFrom<i64> for IpcMiniStatus {
    type Error = DriverError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(IpcMiniStatus::Stop),
            5 => Ok(IpcMiniStatus::Normal),
            6 => Ok(IpcMiniStatus::Fail),
            other => Err(DriverError::UnknownStatus(other)),
        }
    }
}

/// Error flags (window 206), a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IpcMiniError(u16);

impl IpcMiniError {
    /// Controller overtemperature.
    pub const OVER_TEMPERATURE: IpcMiniError = IpcMiniError(0x04);
    /// Interlock cable missing or open.
    pub const INTERLOCK_CABLE: IpcMiniError = IpcMiniError(0x20);
    /// Short circuit on the HV output.
    pub const SHORT_CIRCUIT: IpcMiniError = IpcMiniError(0x40);
    /// Protect mode intervention.
    pub const PROTECT: IpcMiniError = IpcMiniError(0x80);

    const NAMES: [(IpcMiniError, &'static str); 4] = [
        (Self::OVER_TEMPERATURE, "over temperature"),
        (Self::INTERLOCK_CABLE, "interlock cable"),
        (Self::SHORT_CIRCUIT, "short circuit"),
        (Self::PROTECT, "protect"),
    ];

    /// Raw error word as reported by the controller.
    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub fn contains(&self, other: IpcMiniError) -> bool {
        self.0 & other.0 == other.0
    }

    /// No error flags set.
    pub fn is_clear(&self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for IpcMiniError {
    fn from(bits: u16) -> Self {
        IpcMiniError(bits)
    }
}

impl fmt::Display for IpcMiniError {
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

/// Driver for the IPC Mini ion pump controller.
///
/// Windows without a dedicated method (mode, serial setup, set point)
/// are reachable through [`client`](Self::client) and the catalog
/// constants.
pub struct IpcMiniDriver {
    client: WindowClient,
}

impl IpcMiniDriver {
    /// Drive the controller `client` dials.
    pub fn new(client: WindowClient) -> Self {
        IpcMiniDriver { client }
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
        info!(addr = self.client.addr(), ?status, %errors, "IPC Mini link verified");
        Ok(())
    }

    /// Pump status word.
    pub async fn status(&self) -> DriverResult<IpcMiniStatus> {
        IpcMiniStatus::try_from(reading::read_integer(&self.client, &STATUS).await?)
    }

    /// Active error flags.
    pub async fn error_flags(&self) -> DriverResult<IpcMiniError> {
        let word = reading::read_integer(&self.client, &ERROR_CODE).await?;
        let bits = u16::try_from(word).map_err(|_| DriverError::BadReading {
            window: ERROR_CODE.win,
            text: word.to_string(),
        })?;
        Ok(IpcMiniError::from(bits))
    }

    /// Switch the high voltage on.
    pub async fn start(&self) -> DriverResult<()> {
        reading::write_value(&self.client, &HV_ONOFF, WindowValue::Logic(true)).await
    }

    /// Switch the high voltage off.
    pub async fn stop(&self) -> DriverResult<()> {
        reading::write_value(&self.client, &HV_ONOFF, WindowValue::Logic(false)).await
    }

    /// Whether the pump starts when power is applied.
    pub async fn autostart(&self) -> DriverResult<bool> {
        reading::read_logic(&self.client, &AUTOSTART).await
    }

    /// Enable or disable autostart.
    pub async fn set_autostart(&self, enabled: bool) -> DriverResult<()> {
        reading::write_value(&self.client, &AUTOSTART, WindowValue::Logic(enabled)).await
    }

    /// Whether protect mode is enabled.
    pub async fn protect(&self) -> DriverResult<bool> {
        reading::read_logic(&self.client, &PROTECT).await
    }

    /// Enable or disable protect mode.
    pub async fn set_protect(&self, enabled: bool) -> DriverResult<()> {
        reading::write_value(&self.client, &PROTECT, WindowValue::Logic(enabled)).await
    }

    /// Whether step mode is enabled.
    pub async fn step_mode(&self) -> DriverResult<bool> {
        reading::read_logic(&self.client, &STEP).await
    }

    /// Enable or disable step mode.
    pub async fn set_step_mode(&self, enabled: bool) -> DriverResult<()> {
        reading::write_value(&self.client, &STEP, WindowValue::Logic(enabled)).await
    }

    /// Configured pump device number.
    pub async fn device_number(&self) -> DriverResult<i64> {
        reading::read_integer(&self.client, &DEVICE_NUMBER).await
    }

    /// Select the pump device number.
    pub async fn set_device_number(&self, number: i64) -> DriverResult<()> {
        reading::write_value(&self.client, &DEVICE_NUMBER, WindowValue::Integer(number)).await
    }

    /// Maximum output power, watts.
    pub async fn max_power(&self) -> DriverResult<i64> {
        reading::read_integer(&self.client, &MAX_POWER).await
    }

    /// Set the maximum output power, watts.
    pub async fn set_max_power(&self, watts: i64) -> DriverResult<()> {
        reading::write_value(&self.client, &MAX_POWER, WindowValue::Integer(watts)).await
    }

    /// Target output voltage, volts.
    pub async fn target_voltage(&self) -> DriverResult<i64> {
        reading::read_integer(&self.client, &V_TARGET).await
    }

    /// Set the target output voltage, volts.
    pub async fn set_target_voltage(&self, volts: i64) -> DriverResult<()> {
        reading::write_value(&self.client, &V_TARGET, WindowValue::Integer(volts)).await
    }

    /// Protect mode current threshold, mA.
    pub async fn protect_current(&self) -> DriverResult<i64> {
        reading::read_integer(&self.client, &I_PROTECT).await
    }

    /// Set the protect mode current threshold, mA.
    pub async fn set_protect_current(&self, milliamps: i64) -> DriverResult<()> {
        reading::write_value(&self.client, &I_PROTECT, WindowValue::Integer(milliamps)).await
    }

    /// Measured output voltage, volts.
    pub async fn voltage(&self) -> DriverResult<i64> {
        reading::read_integer(&self.client, &V_MEASURED).await
    }

    /// Measured output current, amps.
    pub async fn current(&self) -> DriverResult<f64> {
        reading::read_float(&self.client, &I_MEASURED).await
    }

    /// Pressure derived from the pump current, in the configured unit.
    pub async fn pressure(&self) -> DriverResult<f64> {
        reading::read_float(&self.client, &PRESSURE).await
    }

    /// Unit the controller reports pressure in.
    pub async fn pressure_unit(&self) -> DriverResult<PressureUnit> {
        UNITS.unit(reading::read_integer(&self.client, &UNIT_PRESSURE).await?)
    }

    /// Select the unit the controller reports pressure in.
    pub async fn set_pressure_unit(&self, unit: PressureUnit) -> DriverResult<()> {
        let value = WindowValue::Integer(UNITS.code(unit));
        reading::write_value(&self.client, &UNIT_PRESSURE, value).await
    }

    /// Controller model string.
    pub async fn model(&self) -> DriverResult<String> {
        reading::read_text(&self.client, &CONTROLLER_MODEL).await
    }

    /// Controller serial number.
    pub async fn serial_number(&self) -> DriverResult<String> {
        reading::read_text(&self.client, &CONTROLLER_SERIAL_NO).await
    }

    /// Free-text channel label.
    pub async fn label(&self) -> DriverResult<String> {
        reading::read_text(&self.client, &LABEL).await
    }

    /// Set the free-text channel label.
    pub async fn set_label(&self, label: &str) -> DriverResult<()> {
        let value = WindowValue::Text(label.to_string());
        reading::write_value(&self.client, &LABEL, value).await
    }
}

#[async_trait]
impl VacuumController for IpcMiniDriver {
    async fn connect(&mut self) -> DriverResult<()> {
        IpcMiniDriver::connect(self).await
    }

    async fn pressure(&self) -> DriverResult<f64> {
        IpcMiniDriver::pressure(self).await
    }

    async fn pressure_unit(&self) -> DriverResult<PressureUnit> {
        IpcMiniDriver::pressure_unit(self).await
    }
}
