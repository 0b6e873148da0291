//! Output formatting for command results.
//!
//! Results are printed either as a human-readable line or as the JSON resource returned
//! by the API. The entry point is the [`Formattable`] trait.
use std::fmt::Display;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Format of the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Trait for types that can be printed as text or JSON.
///
/// Types implementing both [`Display`] and [`Serialize`] get it for free.
pub trait Formattable {
    fn format(&self, format: Format) -> Result<String>;
}

/// Text uses [`Display`], JSON is pretty-printed with two-space indentation.
impl<T> Formattable for T
where
    T: Display + Serialize,
{
    fn format(&self, format: Format) -> Result<String> {
        Ok(match format {
            Format::Text => self.to_string(),
            Format::Json => serde_json::to_string_pretty(self).context("serializing to json")?,
        })
    }
}
