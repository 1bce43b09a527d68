use super::Renderer;
use crate::catalog::{classify_value, MergedRecord, ValuationConfig};
use std::io::{self, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const COLUMNS: [(&str, usize); 8] = [
    ("ARTIST", 24),
    ("TITLE", 30),
    ("LABEL", 16),
    ("CAT NO", 12),
    ("YEAR", 4),
    ("FORMAT", 6),
    ("VALUE", 5),
    ("SOURCE", 8),
];

/// Fits `text` into exactly `width` terminal columns, truncating with an
/// ellipsis when needed.
fn fit(text: &str, width: usize) -> String {
    let text_width = text.width();
    let mut out = String::with_capacity(width);
    let used = if text_width <= width {
        out.push_str(text);
        text_width
    } else {
        let mut used = 0;
        for grapheme in text.graphemes(true) {
            let w = grapheme.width();
            if used + w + 1 > width {
                break;
            }
            out.push_str(grapheme);
            used += w;
        }
        out.push('…');
        used + 1
    };
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

/// Plain text table, one row per record.
pub struct TableRenderer<W: Write + Send> {
    out: W,
    valuation: ValuationConfig,
}

impl<W: Write + Send> TableRenderer<W> {
    pub fn new(out: W, valuation: ValuationConfig) -> Self {
        Self { out, valuation }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_row(&mut self, cells: &[String]) -> io::Result<()> {
        let line: Vec<String> = cells
            .iter()
            .zip(COLUMNS.iter())
            .map(|(cell, (_, width))| fit(cell, *width))
            .collect();
        writeln!(self.out, "{}", line.join(" ").trim_end())
    }
}

impl<W: Write + Send> Renderer for TableRenderer<W> {
    fn render(&mut self, display: &[&MergedRecord], total: usize) -> io::Result<()> {
        let header: Vec<String> = COLUMNS.iter().map(|(name, _)| name.to_string()).collect();
        self.write_row(&header)?;
        let rule_width = COLUMNS.iter().map(|(_, w)| w + 1).sum::<usize>() - 1;
        writeln!(self.out, "{}", "-".repeat(rule_width))?;

        if display.is_empty() {
            writeln!(self.out, "No records match the current filter.")?;
        }

        for entry in display {
            let record = entry.record();
            let cells = [
                record.artist().into_owned(),
                record.title().into_owned(),
                record.label().into_owned(),
                record
                    .catalog_number()
                    .map(|c| c.into_owned())
                    .unwrap_or_default(),
                record
                    .release_year()
                    .map(|y| y.to_string())
                    .unwrap_or_default(),
                record.format().map(|f| f.into_owned()).unwrap_or_default(),
                classify_value(record, &self.valuation).to_string(),
                entry.origin().as_str().to_string(),
            ];
            self.write_row(&cells)?;
        }

        writeln!(self.out, "{} of {} records", display.len(), total)?;
        self.out.flush()
    }
}
