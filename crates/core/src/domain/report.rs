// Report Domain Model

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Text from a block marker up to (not including) the next error marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionBlock(String);

impl ExecutionBlock {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used in the Result Mapping (surrounding whitespace removed)
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }
}

/// Text from an error marker up to (not including) the end of its line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLine(String);

impl ErrorLine {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }
}

/// Ordered association from trimmed Execution Block to trimmed Error Line
///
/// Pairing is strictly positional: the i-th block goes with the i-th error
/// line, and whichever side is longer loses its surplus. A block text seen
/// twice keeps its first position and takes the later error line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMapping(IndexMap<String, String>);

impl ResultMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip blocks and error lines in discovery order
    pub fn pair(blocks: &[ExecutionBlock], errors: &[ErrorLine]) -> Self {
        let mut mapping = Self::new();
        for (block, error) in blocks.iter().zip(errors) {
            mapping.insert(block.trimmed(), error.trimmed());
        }
        mapping
    }

    pub fn insert(&mut self, block: impl Into<String>, error: impl Into<String>) {
        self.0.insert(block.into(), error.into());
    }

    pub fn get(&self, block: &str) -> Option<&str> {
        self.0.get(block).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as one `For test case '...' the error is: '...'` line per pair
    pub fn render(&self) -> RenderedReport {
        let lines: Vec<String> = self
            .iter()
            .map(|(test, error)| format!("For test case '{}' the error is: '{}'", test, error))
            .collect();
        RenderedReport(lines.join("\n"))
    }
}

/// Human-readable serialization of a Result Mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedReport(String);

impl RenderedReport {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RenderedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(items: &[&str]) -> Vec<ExecutionBlock> {
        items.iter().map(|s| ExecutionBlock::new(*s)).collect()
    }

    fn errors(items: &[&str]) -> Vec<ErrorLine> {
        items.iter().map(|s| ErrorLine::new(*s)).collect()
    }

    #[test]
    fn test_pair_trims_both_sides() {
        let mapping = ResultMapping::pair(
            &blocks(&["Executed testA\nfoo\n"]),
            &errors(&["Error: bad thing  "]),
        );

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("Executed testA\nfoo"), Some("Error: bad thing"));
    }

    #[test]
    fn test_pair_drops_surplus_blocks() {
        let mapping = ResultMapping::pair(
            &blocks(&["Executed a", "Executed b", "Executed c"]),
            &errors(&["Error: 1"]),
        );

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("Executed a"), Some("Error: 1"));
    }

    #[test]
    fn test_pair_drops_surplus_errors() {
        let mapping = ResultMapping::pair(
            &blocks(&["Executed a"]),
            &errors(&["Error: 1", "Error: 2"]),
        );

        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_duplicate_block_keeps_first_position_and_last_error() {
        let mapping = ResultMapping::pair(
            &blocks(&["Executed a", "Executed b", "Executed a"]),
            &errors(&["Error: 1", "Error: 2", "Error: 3"]),
        );

        let pairs: Vec<_> = mapping.iter().collect();
        assert_eq!(
            pairs,
            vec![("Executed a", "Error: 3"), ("Executed b", "Error: 2")]
        );
    }

    #[test]
    fn test_render_format() {
        let mut mapping = ResultMapping::new();
        mapping.insert("Executed testA", "Error: bad");
        mapping.insert("Executed testB", "Error: worse");

        assert_eq!(
            mapping.render().as_str(),
            "For test case 'Executed testA' the error is: 'Error: bad'\n\
             For test case 'Executed testB' the error is: 'Error: worse'"
        );
    }

    #[test]
    fn test_render_empty_mapping() {
        let report = ResultMapping::new().render();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn test_mapping_serializes_as_object() {
        let mut mapping = ResultMapping::new();
        mapping.insert("Executed a", "Error: 1");

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"Executed a":"Error: 1"}"#);
    }
}
