//! Web Routes
//!
//! Route handlers organized by functionality.

pub mod admin;
pub mod catalog;
pub mod forms;
pub mod health;
pub mod public;
pub mod upload;
