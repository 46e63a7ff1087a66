// This file is part of motion_hub.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Motion Hub
//!
//! This library streams the vehicle-dynamics telemetry of the racing
//! simulators to the actuators of a motion rig. The telemetry frame is
//! mapped into the clamped target heights and sent over the serial link.
pub mod application;
pub mod config;
pub mod constants;
pub mod control;
pub mod enums;
pub mod error;
pub mod interface;
pub mod mock;
pub mod profile;
pub mod telemetry;
pub mod utility;
