//! CLI operation mode handlers.
//!
//! This module contains the implementations for the operation modes:
//! - [`rewrite`]: Rewrite a single piece of feedback given with `--text`
//! - [`batch`]: Rewrite every item of an `--input-file`
//!
//! Both modes drive a [`session::Session`], which records history and
//! writes the optional log and export. Output formatting utilities are in
//! [`output`].

pub mod batch;
pub mod export;
pub mod output;
pub mod rewrite;
pub mod session;
