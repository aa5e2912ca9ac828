//! Business logic services

pub mod duel_service;
pub mod link_service;
pub mod problem_service;
pub mod registry;
pub mod resolver;
pub mod selector;

pub use duel_service::{DuelService, DuelSnapshot, RoundOutcome, RoundResolution};
pub use link_service::LinkService;
pub use problem_service::ProblemService;
