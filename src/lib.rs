//! Scaffold Wizard Library
//!
//! Layered wizard configuration, question evaluation, and translation of
//! answers into a single generator command line.

pub mod actions;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod prompt;
pub mod questions;
pub mod runner;
