//! Gene-name annotation of Newick text.
//!
//! Identifiers from a two-column mapping file are matched as free
//! substrings of the tree text (no word-boundary requirement) and
//! `<name>` is inserted directly after each occurrence that is not
//! already annotated, so re-running the annotation is a no-op.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;

use crate::types::ToolResult;

/// Identifier to display-name mapping, in file order.
///
/// Duplicate identifiers keep their first position and take the last
/// name seen, matching the semantics of loading the file into an
/// insertion-ordered dictionary.
#[derive(Debug, Clone, Default)]
pub struct GeneMap {
    entries: IndexMap<String, String>,
}

impl GeneMap {
    /// Loads a whitespace-delimited two-column file. Blank lines, `#`
    /// comment lines, and lines with fewer than two columns are skipped.
    pub fn load(path: &Path) -> ToolResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = IndexMap::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            if let (Some(id), Some(name)) = (fields.next(), fields.next()) {
                entries.insert(id.to_string(), name.to_string());
            }
        }
        Ok(Self { entries })
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

/// Appends `<name>` after every mapped identifier occurrence in `tree`
/// that is not already followed by `<`. Identifiers are processed in map
/// order, each pass running over the output of the previous one.
pub fn annotate_tree(tree: &str, genes: &GeneMap) -> String {
    let mut text = tree.to_string();
    for (id, name) in genes.iter() {
        text = annotate_one(&text, id, name);
    }
    text
}

fn annotate_one(text: &str, id: &str, name: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(id) {
        let end = pos + id.len();
        out.push_str(&rest[..end]);
        if !rest[end..].starts_with('<') {
            out.push('<');
            out.push_str(name);
            out.push('>');
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn annotates_each_occurrence() {
        let genes = GeneMap::from_pairs([("AT1G01010", "ABC1")]);
        let tree = "(AT1G01010:0.1,AT1G01020:0.2);";
        assert_eq!(
            annotate_tree(tree, &genes),
            "(AT1G01010<ABC1>:0.1,AT1G01020:0.2);"
        );
    }

    #[test]
    fn annotation_is_idempotent() {
        let genes = GeneMap::from_pairs([("AT1G01010", "ABC1")]);
        let once = annotate_tree("(AT1G01010:0.1,AT1G01010:0.3);", &genes);
        assert_eq!(once, "(AT1G01010<ABC1>:0.1,AT1G01010<ABC1>:0.3);");
        assert_eq!(annotate_tree(&once, &genes), once);
    }

    #[test]
    fn matches_free_substrings() {
        // Deliberately no word-boundary requirement: an identifier that is
        // a prefix of a longer label still matches.
        let genes = GeneMap::from_pairs([("AT1G0101", "SHORT")]);
        assert_eq!(
            annotate_tree("(AT1G01010:0.1);", &genes),
            "(AT1G0101<SHORT>0:0.1);"
        );
    }

    #[test]
    fn unmapped_identifiers_are_untouched() {
        let genes = GeneMap::from_pairs([("AT5G99999", "NOPE")]);
        let tree = "(AT1G01010:0.1,AT1G01020:0.2);";
        assert_eq!(annotate_tree(tree, &genes), tree);
    }

    #[test]
    fn load_skips_comments_blanks_and_short_lines() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "# identifier\tname").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "AT1G01010\tNAC001 extra column ignored").unwrap();
        writeln!(f, "LONESOME").unwrap();
        writeln!(f, "AT1G01020  ARV1").unwrap();
        f.as_file().sync_all().unwrap();

        let genes = GeneMap::load(f.path()).unwrap();
        assert_eq!(genes.len(), 2);
        assert_eq!(genes.get("AT1G01010"), Some("NAC001"));
        assert_eq!(genes.get("AT1G01020"), Some("ARV1"));
    }

    #[test]
    fn duplicate_identifier_takes_last_name_keeps_first_position() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "AT1G01010 FIRST").unwrap();
        writeln!(f, "AT1G01020 OTHER").unwrap();
        writeln!(f, "AT1G01010 LAST").unwrap();
        f.as_file().sync_all().unwrap();

        let genes = GeneMap::load(f.path()).unwrap();
        assert_eq!(genes.len(), 2);
        assert_eq!(genes.get("AT1G01010"), Some("LAST"));
        let order: Vec<&str> = genes.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["AT1G01010", "AT1G01020"]);
    }

    #[test]
    fn missing_mapping_file_is_an_error() {
        assert!(GeneMap::load(Path::new("/nonexistent/genes.txt")).is_err());
    }
}
