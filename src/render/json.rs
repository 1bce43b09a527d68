use super::Renderer;
use crate::catalog::{MergedRecord, Record};
use std::io::{self, Write};

/// Writes the displayed records as a JSON array, in their original shape:
/// each field under the key it arrived with, unknown fields included.
pub struct JsonRenderer<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for JsonRenderer<W> {
    fn render(&mut self, display: &[&MergedRecord], _total: usize) -> io::Result<()> {
        let records: Vec<&Record> = display.iter().map(|e| e.record()).collect();
        serde_json::to_writer_pretty(&mut self.out, &records)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{reconcile, run_query, FilterState, FilterUpdate};
    use crate::sources::parse_records_json;

    #[test]
    fn writes_displayed_records_only() {
        let seed = parse_records_json(
            r#"[{"id":1,"artist":"Nina Simone","notes":"mono"},{"id":2,"artist":"Bill Evans"}]"#,
        )
        .unwrap();
        let set = reconcile(&seed, &[]);
        let mut filter = FilterState::new();
        filter.apply(FilterUpdate::search("nina"));
        let display = run_query(&set, &filter);

        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&display, set.len()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&renderer.into_inner()).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["artist"], "Nina Simone");
        assert_eq!(items[0]["notes"], "mono");
        assert_eq!(items[0]["id"], 1);
    }

    #[test]
    fn keeps_the_keys_records_arrived_with() {
        let input = r#"[{"id":"doc1","catalogNumber":"X-1","originalReleaseYear":1971,"estimatedValueLow":5,"artist":null}]"#;
        let live = parse_records_json(input).unwrap();
        let set = reconcile(&[], &live);
        let display = run_query(&set, &FilterState::new());

        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&display, set.len()).unwrap();

        let rendered: serde_json::Value = serde_json::from_slice(&renderer.into_inner()).unwrap();
        let original: serde_json::Value = serde_json::from_str(input).unwrap();
        assert_eq!(rendered, original);
    }
}
