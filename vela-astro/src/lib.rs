//! Sky coordinate handling for the Vela gamma-ray analysis crates.
//!
//! - **Coordinates** — [`Equatorial`] and [`Galactic`] positions with
//!   exact J2000 rotation between the two frames

pub mod coords;

pub use coords::{Equatorial, Galactic};
