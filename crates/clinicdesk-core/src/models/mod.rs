//! Domain models for the clinicdesk system.

mod appointment;
mod client;
mod consultation;
mod reporting;
mod staff;
mod timestamp;

pub use appointment::*;
pub use client::*;
pub use consultation::*;
pub use reporting::*;
pub use staff::*;
pub use timestamp::*;
