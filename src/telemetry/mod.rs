pub mod assetto_corsa;
pub mod assetto_corsa_competizione;
pub mod payload;
pub mod rfactor2;
pub mod simtools;
pub mod telemetry_frame;
pub mod telemetry_source;
pub mod udp_receiver;
