//! Citymap CLI library.
//!
//! Output formatting shared by the `citymap` subcommands.

pub mod output;
