//! Serialization of catalog documents.
//!
//! Generic catalogs are written as YAML so that section markers and
//! provenance comments survive as real comments. JSON catalogs carry entries
//! only.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use super::document::{Document, Item, Node, Section};

const INDENT: &str = "  ";
const BANNER_WIDTH: usize = 86;

/// Render a document as a commented YAML catalog.
///
/// Scalars go through `serde_yaml`; the layout (markers, comments, nesting)
/// is written here so comments stay next to their entries.
pub fn render_generic(document: &Document, header: Option<&str>) -> Result<String, serde_yaml::Error> {
    let mut out = String::new();

    if let Some(header) = header {
        let rule = "-".repeat(header.chars().count() + 2);
        out.push_str(&format!("# {rule}\n#  {header}\n# {rule}\n\n"));
    }

    write_nodes(&mut out, document.nodes(), 0)?;

    if !document.has_entries() {
        out.push_str("{}\n");
    }
    Ok(out)
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) -> Result<(), serde_yaml::Error> {
    let indent = INDENT.repeat(depth);
    for node in nodes {
        match node {
            Node::Marker(section) => out.push_str(&banner(*section)),
            Node::Comment(text) => {
                for line in text.lines() {
                    out.push_str(&format!("{indent}# {line}\n"));
                }
            }
            Node::Entry(key, Item::Leaf(value)) => {
                let value = match value {
                    Some(text) => scalar(text, &indent)?,
                    None => "null".to_string(),
                };
                out.push_str(&format!("{} {value}\n", mapping_key(key, &indent)?));
            }
            Node::Entry(key, Item::Branch(children)) => {
                let key = mapping_key(key, &indent)?;
                if children.iter().any(|child| matches!(child, Node::Entry(..))) {
                    out.push_str(&format!("{key}\n"));
                    write_nodes(out, children, depth + 1)?;
                } else {
                    out.push_str(&format!("{key} {{}}\n"));
                }
            }
        }
    }
    Ok(())
}

/// `key:` at `indent`, or the explicit `? key` form for multi-line keys.
fn mapping_key(key: &str, indent: &str) -> Result<String, serde_yaml::Error> {
    let key = scalar(key, indent)?;
    if key.contains('\n') {
        Ok(format!("{indent}? {key}\n{indent}:"))
    } else {
        Ok(format!("{indent}{key}:"))
    }
}

/// A YAML scalar whose continuation lines are shifted to `indent`.
fn scalar(text: &str, indent: &str) -> Result<String, serde_yaml::Error> {
    let rendered = serde_yaml::to_string(text)?;
    let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);
    Ok(rendered.replace('\n', &format!("\n{indent}")))
}

fn banner(section: Section) -> String {
    format!(
        "# {:=^width$}\n",
        format!(" {} ", section.title()),
        width = BANNER_WIDTH
    )
}

/// Render the entries of a document as pretty-printed JSON.
///
/// With `escape_unicode`, every non-ASCII character is written as a
/// `\uXXXX` escape (surrogate pairs above the BMP).
pub fn render_json(document: &Document, escape_unicode: bool) -> Result<String, serde_json::Error> {
    let value = document.to_value();
    let mut buf = Vec::new();
    if escape_unicode {
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter::default());
        value.serialize(&mut ser)?;
    } else {
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::new());
        value.serialize(&mut ser)?;
    }
    buf.push(b'\n');
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Pretty formatter that escapes non-ASCII characters.
#[derive(Default)]
struct AsciiFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_object_value(writer)
    }
}
