//! Report module - summarizing model preparation

pub mod summary;

pub use summary::*;
