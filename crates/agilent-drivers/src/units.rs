//! Pressure units and their per-family wire encodings.
//!
//! Controllers report the configured unit as a small integer. The two
//! supported families number the same three units differently, so the
//! mapping is an ordered table owned by each driver rather than part of
//! the protocol.

use crate::error::{DriverError, DriverResult};

/// Unit a controller reports pressure in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    /// Millibar.
    MBar,
    /// Pascal.
    Pa,
    /// Torr.
    Torr,
}

impl std::fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PressureUnit::MBar => write!(f, "mBar"),
            PressureUnit::Pa => write!(f, "Pa"),
            PressureUnit::Torr => write!(f, "Torr"),
        }
    }
}

/// Ordered unit table for one controller family. A unit's wire encoding
/// is its position in the table; every family table lists each unit
/// exactly once.
#[derive(Debug, Clone, Copy)]
pub struct UnitTable(pub [PressureUnit; 3]);

impl UnitTable {
    /// Unit for a wire encoding.
    pub fn unit(&self, code: i64) -> DriverResult<PressureUnit> {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.0.get(index).copied())
            .ok_or(DriverError::UnknownUnit(code))
    }

    /// Wire encoding for a unit.
    ///
    /// Panics if the table violates its completeness invariant; a table
    /// missing a unit must never silently encode position zero.
    pub fn code(&self, unit: PressureUnit) -> i64 {
        self.0
            .iter()
            .position(|&entry| entry == unit)
            .map(|index| index as i64)
            .expect("unit table lists each unit exactly once")
    }
}
