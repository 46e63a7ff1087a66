pub mod actuator_link;
