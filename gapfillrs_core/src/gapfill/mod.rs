//! Module implementing homology based gap filling of metabolic models

pub mod bridge;
pub mod objective;
pub mod orchestrator;
pub mod solver;
