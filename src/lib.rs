//! Core library functions for the face cluster analyzer

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod cluster;
pub mod recognition;
pub mod storage;
pub mod viz;

pub use anyhow::{Result, anyhow};
pub use error::ClusterError;
