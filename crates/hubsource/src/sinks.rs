//! Hosts that persist nodes outside the process

use std::io::Write;
use std::path::{Path, PathBuf};

use hubsource_core::host::{derive_node_id, Host};
use hubsource_core::node::Node;

/// Streams every node as one line of JSON.
///
/// [`Host::create_node`] cannot fail, so the first write error is kept and
/// reported by [`JsonLinesHost::finish`]; later nodes are skipped.
pub struct JsonLinesHost<W: Write> {
    namespace: String,
    writer: W,
    written: usize,
    error: Option<std::io::Error>,
}

impl<W: Write> JsonLinesHost<W> {
    pub fn new(namespace: impl Into<String>, writer: W) -> Self {
        Self {
            namespace: namespace.into(),
            writer,
            written: 0,
            error: None,
        }
    }

    fn write_node(&mut self, node: &Node) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, node)?;
        self.writer.write_all(b"\n")
    }

    /// Flush the writer and return it with the number of nodes written
    pub fn finish(mut self) -> std::io::Result<(W, usize)> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok((self.writer, self.written))
    }
}

impl<W: Write> Host for JsonLinesHost<W> {
    fn create_node_id(&self, seed: &str) -> String {
        derive_node_id(&self.namespace, seed)
    }

    fn create_node(&mut self, node: Node) {
        if self.error.is_some() {
            return;
        }
        match self.write_node(&node) {
            Ok(()) => self.written += 1,
            Err(err) => self.error = Some(err),
        }
    }
}

/// Writes every node to `<root>/<type>/<id>.json`.
pub struct DirectoryHost {
    namespace: String,
    root: PathBuf,
    written: Vec<PathBuf>,
    error: Option<std::io::Error>,
}

impl DirectoryHost {
    pub fn new(namespace: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            root: root.into(),
            written: Vec::new(),
            error: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_node(&self, node: &Node) -> std::io::Result<PathBuf> {
        let dir = self.root.join(node.internal.node_type.type_tag());
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.json", node.id));
        let contents = serde_json::to_vec_pretty(node)?;
        std::fs::write(&path, contents)?;

        Ok(path)
    }

    /// Paths written so far, or the first error encountered
    pub fn finish(self) -> std::io::Result<Vec<PathBuf>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.written),
        }
    }
}

impl Host for DirectoryHost {
    fn create_node_id(&self, seed: &str) -> String {
        derive_node_id(&self.namespace, seed)
    }

    fn create_node(&mut self, node: Node) {
        if self.error.is_some() {
            return;
        }
        match self.write_node(&node) {
            Ok(path) => {
                log::debug!("Wrote {}", path.display());
                self.written.push(path);
            }
            Err(err) => self.error = Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubsource_core::node::{prepare_node, register_nodes};
    use hubsource_core::topics::{normalize_topic, RawTopic, Topic};
    use serde_json::json;

    fn topics() -> Vec<Topic> {
        let raw: Vec<RawTopic> = serde_json::from_value(json!([
            {"id": 1, "name": "One"},
            {"id": 2, "name": "Two"}
        ]))
        .unwrap();
        raw.into_iter().map(normalize_topic).collect()
    }

    #[test]
    fn json_lines_host_writes_one_line_per_node() {
        let mut host = JsonLinesHost::new("test", Vec::new());
        register_nodes(&mut host, &[], &topics()).unwrap();

        let (buffer, written) = host.finish().unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(written, 2);
        assert_eq!(lines.len(), 2);

        let node: Node = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(node.id, derive_node_id("test", "hubspot-topic-1"));
        assert_eq!(node.fields["name"], json!("One"));
    }

    #[test]
    fn json_lines_host_reports_write_errors() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut host = JsonLinesHost::new("test", Broken);
        register_nodes(&mut host, &[], &topics()).unwrap();

        assert!(host.finish().is_err());
    }

    #[test]
    fn directory_host_writes_files_by_type() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = DirectoryHost::new("test", dir.path());

        let topic = &topics()[0];
        let node = prepare_node(&host, topic).unwrap();
        let expected = dir
            .path()
            .join("HubspotTopic")
            .join(format!("{}.json", node.id));
        host.create_node(node.clone());

        let written = host.finish().unwrap();
        assert_eq!(written, vec![expected.clone()]);

        let stored: Node =
            serde_json::from_str(&std::fs::read_to_string(expected).unwrap()).unwrap();
        assert_eq!(stored, node);
    }
}
