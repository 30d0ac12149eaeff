//! Windows every supported controller family answers.

use window_protocol::{DataType, WindowDescriptor};

/// Pump status word, decoded per family (`TwisTorrStatus`, `IpcMiniStatus`).
pub const STATUS: WindowDescriptor =
    WindowDescriptor::new(205, false, DataType::Numeric, "Status");

/// Active error flags, a bit set decoded per family.
pub const ERROR_CODE: WindowDescriptor =
    WindowDescriptor::new(206, false, DataType::Numeric, "Error code");
