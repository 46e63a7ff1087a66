pub mod control_loop;
pub mod frame_smoother;
pub mod motion_mapper;
