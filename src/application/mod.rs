//! Application layer - Use cases over the domain
//!
//! This layer contains:
//! - Ports: persistence, clock and randomness interfaces
//! - Services: battles, energy, progression, quests and players

pub mod ports;
pub mod services;
