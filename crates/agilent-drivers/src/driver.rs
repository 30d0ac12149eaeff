//! Capability surface shared by the concrete device drivers.

use async_trait::async_trait;

use crate::error::DriverResult;
use crate::units::PressureUnit;

/// What every supported vacuum controller can do, whatever its family.
///
/// The drivers are plain structs composing a `WindowClient`; there is no
/// device base type. This trait is the seam to program against when the
/// family does not matter, e.g. a monitor polling a mixed rack.
#[async_trait]
pub trait VacuumController: Send + Sync {
    /// Verify the link by reading the status and error windows, logging
    /// both. No tasks are spawned and no callbacks are registered;
    /// callers sequence their own post-connect steps.
    async fn connect(&mut self) -> DriverResult<()>;

    /// Current pressure reading, in the controller's configured unit.
    async fn pressure(&self) -> DriverResult<f64>;

    /// Unit the controller reports pressure in.
    async fn pressure_unit(&self) -> DriverResult<PressureUnit>;
}
