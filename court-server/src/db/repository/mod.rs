//! Repository Module
//!
//! Typed access to the redb tables declared in [`crate::db`].

pub mod admin;
pub mod day_config;
pub mod reservation;

pub use admin::AdminRepository;
pub use day_config::DayConfigRepository;
pub use reservation::ReservationRepository;
