pub mod artifact;
pub mod commands;
pub mod engine;
pub mod error;
pub mod hints;
pub mod outcome;
pub mod reconcile;
pub mod runtime;
pub mod selection;
pub mod technology;
