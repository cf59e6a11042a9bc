use super::properties::{self, Line};
use crate::inject::Error;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Exceptions and parameter names stored for one method
///
/// The three states of `parameters` are all meaningful: `None` comes from old mapping files
/// which only ever listed exceptions, `Some("")` asks for a local variable table with nothing
/// but `this` in it, and anything else is a comma-separated list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Comma-separated internal class names (empty meaning "no exceptions")
    pub exceptions: String,

    /// Comma-separated parameter names, excluding `this`
    pub parameters: Option<String>,
}

impl MappingEntry {
    pub fn new(exceptions: impl Into<String>, parameters: Option<String>) -> MappingEntry {
        MappingEntry {
            exceptions: exceptions.into(),
            parameters,
        }
    }

    /// Parse a mapping value of the form `exceptions` or `exceptions|parameters`
    pub fn parse(value: &str) -> Result<MappingEntry, String> {
        let mut fields = value.split('|');
        let exceptions = fields.next().unwrap_or_default().to_owned();
        let parameters = fields.next().map(str::to_owned);
        if fields.next().is_some() {
            return Err(format!(
                "Expected at most two '|'-separated fields in '{}'",
                value
            ));
        }
        Ok(MappingEntry {
            exceptions,
            parameters,
        })
    }
}

impl fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exceptions)?;
        if let Some(parameters) = &self.parameters {
            write!(f, "|{}", parameters)?;
        }
        Ok(())
    }
}

/// Mapping from signature keys (in their textual form) to [`MappingEntry`]
///
/// Entries are unordered in memory, but always written out sorted by key so that the output of a
/// run is reproducible.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, MappingEntry>,

    /// Value of a `#max index=<N>` comment, if one was read
    max_index: Option<u32>,
}

impl MappingTable {
    const MAX_INDEX_PREFIX: &'static str = "max index=";

    pub fn new() -> MappingTable {
        MappingTable::default()
    }

    /// Read a mapping file
    pub fn load(path: impl AsRef<Path>) -> Result<MappingTable, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::io(format!("Could not open map file: {}", path.display()), err)
        })?;
        let table = MappingTable::parse(&text)?;
        log::debug!("Loaded {} mappings from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse the contents of a mapping file
    ///
    /// When a key shows up more than once, the last value wins.
    pub fn parse(text: &str) -> Result<MappingTable, Error> {
        let mut table = MappingTable::new();
        for (line, parsed) in properties::parse(text)? {
            match parsed {
                Line::Comment(comment) => {
                    if let Some(index) = comment.trim().strip_prefix(Self::MAX_INDEX_PREFIX) {
                        if let Ok(index) = index.trim().parse() {
                            table.max_index = Some(index);
                        }
                    }
                }
                Line::Entry { key, value } => {
                    let entry = MappingEntry::parse(&value)
                        .map_err(|message| Error::Format { line, message })?;
                    table.entries.insert(key, entry);
                }
            }
        }
        Ok(table)
    }

    /// Final counter value recorded by the run that wrote this file
    pub fn max_index(&self) -> Option<u32> {
        self.max_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MappingEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: MappingEntry) -> Option<MappingEntry> {
        self.entries.insert(key.into(), entry)
    }

    /// Entries in lexicographic key order
    pub fn sorted(&self) -> Vec<(&str, &MappingEntry)> {
        let mut entries: Vec<(&str, &MappingEntry)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
            .collect();
        entries.sort_unstable_by_key(|(key, _)| *key);
        entries
    }

    /// Render the table in the format read by [`Self::parse`], with an optional header comment
    pub fn render(&self, header: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(header) = header {
            out.push('#');
            out.push_str(header);
            out.push('\n');
        }
        for (key, entry) in self.sorted() {
            out.push_str(&properties::escape(key, true));
            out.push('=');
            out.push_str(&properties::escape(&entry.to_string(), false));
            out.push('\n');
        }
        out
    }

    /// Header comment recording the final constructor counter
    pub fn max_index_header(index: u32) -> String {
        format!("{}{}", Self::MAX_INDEX_PREFIX, index)
    }

    /// Write the table out to a file
    pub fn save(&self, path: impl AsRef<Path>, header: Option<&str>) -> Result<(), Error> {
        let path = path.as_ref();
        fs::write(path, self.render(header)).map_err(|err| {
            Error::io(format!("Could not write map file: {}", path.display()), err)
        })?;
        log::debug!("Saved {} mappings to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entry_formats() {
        assert_eq!(
            MappingEntry::parse("java/lang/Exception").unwrap(),
            MappingEntry::new("java/lang/Exception", None)
        );
        assert_eq!(
            MappingEntry::parse("|").unwrap(),
            MappingEntry::new("", Some(String::new()))
        );
        assert_eq!(
            MappingEntry::parse("java/lang/Exception,java/io/IOException|a,b").unwrap(),
            MappingEntry::new(
                "java/lang/Exception,java/io/IOException",
                Some(String::from("a,b"))
            )
        );
        assert!(MappingEntry::parse("a|b|c").is_err());
    }

    #[test]
    fn entry_display() {
        assert_eq!(MappingEntry::new("", None).to_string(), "");
        assert_eq!(MappingEntry::new("", Some(String::new())).to_string(), "|");
        assert_eq!(
            MappingEntry::new("java/lang/Exception", Some(String::from("value"))).to_string(),
            "java/lang/Exception|value"
        );
    }

    #[test]
    fn parse_table() {
        let text = "\
#max index=12
#Sat Jan 01 00:00:00 UTC 2000
net/minecraft/Foo.func_123_a(I)V=java/lang/Exception|value
net/minecraft/Foo.func_124_b()V=
net/minecraft/Foo.<init>(II)V=|p_i1_1_,p_i1_2_
";
        let table = MappingTable::parse(text).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.max_index(), Some(12));
        assert_eq!(
            table.get("net/minecraft/Foo.func_123_a(I)V"),
            Some(&MappingEntry::new("java/lang/Exception", Some(String::from("value"))))
        );
        assert_eq!(
            table.get("net/minecraft/Foo.func_124_b()V"),
            Some(&MappingEntry::new("", None))
        );
        assert_eq!(
            table.get("net/minecraft/Foo.<init>(II)V").unwrap().parameters.as_deref(),
            Some("p_i1_1_,p_i1_2_")
        );
    }

    #[test]
    fn too_many_fields() {
        let err = MappingTable::parse("a=1\nb=x|y|z\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn render_is_sorted() {
        let mut table = MappingTable::new();
        table.insert("net/minecraft/B.b()V", MappingEntry::new("", Some(String::new())));
        table.insert(
            "net/minecraft/A.a(I)V",
            MappingEntry::new("", Some(String::from("p_1_1_"))),
        );
        table.insert(
            "net/minecraft/A.<init>(I)V",
            MappingEntry::new("java/lang/Exception", Some(String::from("x"))),
        );

        let rendered = table.render(Some(&MappingTable::max_index_header(3)));
        assert_eq!(
            rendered,
            "\
#max index=3
net/minecraft/A.<init>(I)V=java/lang/Exception|x
net/minecraft/A.a(I)V=|p_1_1_
net/minecraft/B.b()V=|
"
        );

        let reparsed = MappingTable::parse(&rendered).unwrap();
        assert_eq!(reparsed.max_index(), Some(3));
        assert_eq!(reparsed.sorted(), table.sorted());
    }

    #[test]
    fn render_without_header() {
        let mut table = MappingTable::new();
        table.insert("a b", MappingEntry::new("x=y", None));
        assert_eq!(table.render(None), "a\\ b=x\\=y\n");
    }

    #[test]
    fn load_missing_file() {
        let err = MappingTable::load("/nonexistent/mappings.csv").unwrap_err();
        assert!(err.to_string().starts_with("Could not open map file"));
    }
}
