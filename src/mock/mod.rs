pub mod mock_rig;
pub mod mock_telemetry_source;
