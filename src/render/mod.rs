//! Renderers: turn the display list into output.

mod json;
mod table;

pub use json::JsonRenderer;
pub use table::TableRenderer;

use crate::catalog::MergedRecord;
use clap::ValueEnum;
use std::io;

/// Consumes the display list produced by the query engine.
///
/// `total` is the size of the merged set the list was filtered from.
pub trait Renderer: Send {
    fn render(&mut self, display: &[&MergedRecord], total: usize) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
