//! Integration tests running the device drivers against a scripted fake
//! controller on the far end of a loopback channel.
//!
//! The fake serves reads from a window/value table and stores writes
//! back into it, so set-then-get flows round-trip through the same
//! frames a real controller would exchange.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use agilent_client::{Channel, ClientError, Session, WindowClient};
use agilent_drivers::{
    twistorr, DriverError, IpcMiniDriver, IpcMiniError, IpcMiniStatus, PressureUnit,
    TwisTorrDriver, TwisTorrError, TwisTorrStatus, VacuumController,
};
use window_protocol::{
    encode_control_reply, encode_data_reply, ProtocolError, ResultCode, ETX, STX,
};

// ============================================================================
// Fake controller
// ============================================================================

/// One parsed request, as the fake controller sees it.
struct FakeRequest {
    win: u16,
    write: bool,
    data: Vec<u8>,
}

/// Read one request frame; `None` when the client hung up.
async fn next_request(far: &mut DuplexStream) -> Option<FakeRequest> {
    let mut raw = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = far.read(&mut byte).await.expect("request read");
        if n == 0 {
            assert!(raw.is_empty(), "client hung up mid-frame");
            return None;
        }
        raw.push(byte[0]);
        if byte[0] == ETX {
            break;
        }
    }
    let mut digits = [0u8; 2];
    far.read_exact(&mut digits).await.expect("checksum read");

    assert_eq!(raw[0], STX);
    let win: u16 = std::str::from_utf8(&raw[2..5])
        .expect("window digits")
        .parse()
        .expect("window number");
    Some(FakeRequest {
        win,
        write: raw[5] == b'1',
        data: raw[6..raw.len() - 1].to_vec(),
    })
}

/// Serve requests from a window/value table until the client hangs up.
/// Writes are ACKed and stored; reads of unknown windows get the
/// UnknownWindow control reply.
async fn serve_windows(mut far: DuplexStream, mut table: HashMap<u16, Vec<u8>>) {
    while let Some(FakeRequest { win, write, data }) = next_request(&mut far).await {
        let reply = if write {
            table.insert(win, data);
            encode_control_reply(0, ResultCode::Ack).expect("control reply")
        } else {
            match table.get(&win) {
                Some(value) => encode_data_reply(0, win, false, value).expect("data reply"),
                None => encode_control_reply(0, ResultCode::UnknownWindow).expect("control reply"),
            }
        };
        far.write_all(&reply).await.expect("reply write");
    }
}

/// Client wired to a fake controller preloaded with `table`.
fn fake_controller(table: &[(u16, &[u8])]) -> (WindowClient, JoinHandle<()>) {
    let (channel, far) = Channel::loopback(1024);
    let session = Arc::new(Session::new(channel, Duration::from_secs(2)));
    let client = WindowClient::new(session, 0);
    let map: HashMap<u16, Vec<u8>> = table
        .iter()
        .map(|(win, value)| (*win, value.to_vec()))
        .collect();
    (client, tokio::spawn(serve_windows(far, map)))
}

// ============================================================================
// TwisTorr 74 FS
// ============================================================================

#[tokio::test]
async fn test_twistorr_connect_reads_status_and_errors() {
    let (client, controller) = fake_controller(&[(205, b"000005"), (206, b"000000")]);
    let mut pump = TwisTorrDriver::new(client);

    pump.connect().await.expect("connect");
    assert_eq!(pump.status().await.unwrap(), TwisTorrStatus::Normal);
    assert!(pump.error_flags().await.unwrap().is_clear());

    drop(pump);
    controller.await.unwrap();
}

#[tokio::test]
async fn test_twistorr_pressure_and_unit_round_trip() {
    let (client, controller) = fake_controller(&[(224, b"1.5E-05"), (163, b"000000")]);
    let pump = TwisTorrDriver::new(client);

    let pressure = pump.pressure().await.expect("pressure");
    assert!((pressure - 1.5e-5).abs() < 1e-12);
    assert_eq!(pump.pressure_unit().await.unwrap(), PressureUnit::MBar);

    // The new unit is stored by the fake and served back on the next read.
    pump.set_pressure_unit(PressureUnit::Torr)
        .await
        .expect("set unit");
    assert_eq!(pump.pressure_unit().await.unwrap(), PressureUnit::Torr);

    drop(pump);
    controller.await.unwrap();
}

#[tokio::test]
async fn test_twistorr_start_writes_the_command_word() {
    let (client, controller) = fake_controller(&[]);
    let pump = TwisTorrDriver::new(client);

    pump.start().await.expect("start");

    // The command word landed in the fake's table as a padded numeric.
    let echoed = pump
        .client()
        .read(&twistorr::START_STOP)
        .await
        .expect("read back");
    assert_eq!(echoed.data().unwrap(), b"000001");

    pump.stop().await.expect("stop");
    let echoed = pump
        .client()
        .read(&twistorr::START_STOP)
        .await
        .expect("read back");
    assert_eq!(echoed.data().unwrap(), b"000000");

    drop(pump);
    controller.await.unwrap();
}

#[tokio::test]
async fn test_twistorr_fault_reporting() {
    let (client, controller) = fake_controller(&[(205, b"000006"), (206, b"000066")]);
    let pump = TwisTorrDriver::new(client);

    assert_eq!(pump.status().await.unwrap(), TwisTorrStatus::Fail);
    let flags = pump.error_flags().await.unwrap();
    assert!(flags.contains(TwisTorrError::PUMP_OVERTEMP));
    assert!(flags.contains(TwisTorrError::SHORT_CIRCUIT));
    assert_eq!(flags.to_string(), "pump overtemperature, short circuit");

    drop(pump);
    controller.await.unwrap();
}

#[tokio::test]
async fn test_unknown_window_passes_through_the_layers() {
    let (client, controller) = fake_controller(&[]);
    let pump = TwisTorrDriver::new(client);

    let err = pump.pressure().await.unwrap_err();
    assert!(matches!(
        err,
        DriverError::Client(ClientError::Protocol(ProtocolError::UnknownWindow))
    ));

    drop(pump);
    controller.await.unwrap();
}

// ============================================================================
// IPC Mini
// ============================================================================

#[tokio::test]
async fn test_ipc_mini_readings() {
    let (client, controller) = fake_controller(&[
        (205, b"000000"),
        (206, b"000032"),
        (810, b"005000"),
        (811, b"1.2E-06"),
        (812, b"7.5E-09"),
        (600, b"000000"),
        (319, b"IPCMINI"),
        (323, b"123456"),
    ]);
    let pump = IpcMiniDriver::new(client);

    assert_eq!(pump.status().await.unwrap(), IpcMiniStatus::Stop);
    let flags = pump.error_flags().await.unwrap();
    assert!(flags.contains(IpcMiniError::INTERLOCK_CABLE));

    assert_eq!(pump.voltage().await.unwrap(), 5000);
    assert!((pump.current().await.unwrap() - 1.2e-6).abs() < 1e-12);
    assert!((pump.pressure().await.unwrap() - 7.5e-9).abs() < 1e-15);

    // IPC Mini numbers its units Torr first, unlike the TwisTorr family.
    assert_eq!(pump.pressure_unit().await.unwrap(), PressureUnit::Torr);

    assert_eq!(pump.model().await.unwrap(), "IPCMINI");
    assert_eq!(pump.serial_number().await.unwrap(), "123456");

    drop(pump);
    controller.await.unwrap();
}

#[tokio::test]
async fn test_ipc_mini_settings_round_trip() {
    let (client, controller) = fake_controller(&[(601, b"0"), (613, b"005000")]);
    let pump = IpcMiniDriver::new(client);

    assert!(!pump.autostart().await.unwrap());
    pump.set_autostart(true).await.expect("set autostart");
    assert!(pump.autostart().await.unwrap());

    assert_eq!(pump.target_voltage().await.unwrap(), 5000);
    pump.set_target_voltage(3000).await.expect("set v target");
    assert_eq!(pump.target_voltage().await.unwrap(), 3000);

    // Unit set/get goes through this family's own encoding (Pa = 2 here).
    pump.set_pressure_unit(PressureUnit::Pa)
        .await
        .expect("set unit");
    assert_eq!(pump.pressure_unit().await.unwrap(), PressureUnit::Pa);

    pump.set_label("PUMP A").await.expect("set label");
    assert_eq!(pump.label().await.unwrap(), "PUMP A");

    drop(pump);
    controller.await.unwrap();
}

// ============================================================================
// Capability trait
// ============================================================================

#[tokio::test]
async fn test_trait_object_polls_a_mixed_rack() {
    let (turbo_client, turbo_task) = fake_controller(&[
        (205, b"000005"),
        (206, b"000000"),
        (224, b"4.0E-07"),
        (163, b"000001"),
    ]);
    let (ion_client, ion_task) = fake_controller(&[
        (205, b"000005"),
        (206, b"000000"),
        (812, b"9.9E-10"),
        (600, b"000002"),
    ]);

    let mut rack: Vec<Box<dyn VacuumController>> = vec![
        Box::new(TwisTorrDriver::new(turbo_client)),
        Box::new(IpcMiniDriver::new(ion_client)),
    ];

    for pump in rack.iter_mut() {
        pump.connect().await.expect("connect");
        let pressure = pump.pressure().await.expect("pressure");
        assert!(pressure > 0.0);
        // Both fakes are configured for Pascal, each through its own table.
        assert_eq!(pump.pressure_unit().await.unwrap(), PressureUnit::Pa);
    }

    drop(rack);
    turbo_task.await.unwrap();
    ion_task.await.unwrap();
}
