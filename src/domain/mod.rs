//! Domain layer - Core game rules with no external dependencies
//!
//! This layer contains:
//! - Entities: Player, Song, BattleSession, Quest, Achievement
//! - Value Objects: arrows, timing accuracy, grades, ids
//! - Domain Services: pattern generation, scoring, energy, rewards

pub mod entities;
pub mod services;
pub mod value_objects;
