pub mod actuator_profile;
pub mod profile_loader;
