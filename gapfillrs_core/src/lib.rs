//! Core rust implementation of gapfillrs, a crate for homology based gap filling of
//! genome scale metabolic models.
#![allow(unused)]

pub mod gapfill;
pub mod io;
pub mod metabolic_model;
mod configuration;
