pub const NUM_DEFAULT_ACTUATOR: usize = 4;
pub const MAX_NUM_ACTUATOR: usize = 64;

pub const NUM_AXIS: usize = 6;

// Unit conversion of the angular axes (rad) into the height unit (mm).
pub const DEFAULT_GAIN_PITCH: f64 = 100.0;
pub const DEFAULT_GAIN_ROLL: f64 = 100.0;
pub const DEFAULT_GAIN_YAW: f64 = 50.0;

pub const DEFAULT_BAUD_RATE: u32 = 115200;
pub const SUPPORTED_BAUD_RATES: [u32; 5] = [9600, 19200, 38400, 57600, 115200];

// Bounded wait of the telemetry source in milliseconds.
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;
// Sleep of the control loop when there is no telemetry in milliseconds.
pub const DEFAULT_IDLE_BACKOFF_MS: u64 = 5;

pub const DEFAULT_SMOOTHING_HISTORY: usize = 10;
pub const DEFAULT_FAILURE_WARNING_THRESHOLD: u64 = 100;

pub const PORT_ASSETTO_CORSA: u16 = 9996;
pub const PORT_ASSETTO_CORSA_COMPETIZIONE: u16 = 9000;
pub const PORT_RFACTOR2: u16 = 5397;
pub const PORT_SIMTOOLS: u16 = 4123;

pub const LOCAL_HOST: &str = "127.0.0.1";
pub const ALL_HOST: &str = "0.0.0.0";
pub const TERMINATOR: &[u8; 1] = b"\n";

pub const SIZE_UDP_BUFFER: usize = 2048;
// Normalization of the signed 16-bit telemetry channels.
pub const SCALE_INT16: f64 = 32767.0;

// Keep the last bytes written to the mock rig.
pub const MOCK_RIG_CAPACITY: usize = 65536;
