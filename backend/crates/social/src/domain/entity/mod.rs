//! Entity Module

pub mod account;
pub mod feed;
pub mod follow_edge;
pub mod recipe;
