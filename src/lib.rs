//! Ruen - Russian/English offline translator
//!
//! Picks up text from a file or the clipboard, decides whether it is Russian
//! or English and translates it to the other language with Argos Translate.

pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod setup;
pub mod source;
pub mod translate;
pub mod workflow;
