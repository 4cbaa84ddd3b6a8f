//! Mail handlers

pub mod send;
