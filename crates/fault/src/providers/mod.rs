//! This module contains trace providers for the fault dispute game.

mod alphabet;
pub use self::alphabet::AlphabetTraceProvider;
