// Paired-Marker Extractor
//
// Two independent scans over the same buffer: one collects Execution Blocks,
// the other Error Lines. The results are zipped positionally into a
// ResultMapping. Pure function of the input; no I/O.

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::domain::error::Result;
use crate::domain::{ErrorLine, ExecutionBlock, MarkerSet, ResultMapping};

/// Everything one extraction pass produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub blocks: Vec<ExecutionBlock>,
    pub error_lines: Vec<ErrorLine>,
    pub mapping: ResultMapping,
}

impl Extraction {
    /// Number of blocks or error lines left without a partner
    pub fn unpaired(&self) -> usize {
        self.blocks.len().abs_diff(self.error_lines.len())
    }
}

/// Scans text for `<block marker> ... <error marker>` spans and
/// `<error marker> ... <newline>` lines
#[derive(Debug, Clone)]
pub struct PairedMarkerExtractor {
    markers: MarkerSet,
    block_pattern: Regex,
    error_pattern: Regex,
}

impl PairedMarkerExtractor {
    /// Compile the scan patterns for a marker set
    ///
    /// Markers are matched literally; regex metacharacters in them are escaped.
    pub fn new(markers: MarkerSet) -> Result<Self> {
        let block = regex::escape(markers.block());
        let error = regex::escape(markers.error());

        // (?s): a block may span several lines; `.*?` stops at the first delimiter
        let block_pattern = Regex::new(&format!("(?s){}.*?{}", block, error))?;
        let error_pattern = Regex::new(&format!("(?s){}.*?\n", error))?;

        Ok(Self {
            markers,
            block_pattern,
            error_pattern,
        })
    }

    /// Collect every Execution Block in discovery order
    ///
    /// A block marker with no error marker anywhere after it yields nothing.
    /// The delimiter is not consumed: scanning resumes at the error marker.
    pub fn extract_blocks(&self, text: &str) -> Vec<ExecutionBlock> {
        let delimiter_len = self.markers.error().len();
        let mut blocks = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.block_pattern.find_at(text, pos) {
            let end = m.end() - delimiter_len;
            blocks.push(ExecutionBlock::new(&text[m.start()..end]));
            pos = end;
        }

        blocks
    }

    /// Collect every Error Line in discovery order
    ///
    /// An error marker on the final, unterminated line yields nothing.
    pub fn extract_error_lines(&self, text: &str) -> Vec<ErrorLine> {
        let mut lines = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.error_pattern.find_at(text, pos) {
            let end = m.end() - 1;
            lines.push(ErrorLine::new(&text[m.start()..end]));
            pos = end;
        }

        lines
    }

    /// Run both scans and pair the results
    pub fn extract(&self, text: &str) -> Extraction {
        let blocks = self.extract_blocks(text);
        let error_lines = self.extract_error_lines(text);
        let mapping = ResultMapping::pair(&blocks, &error_lines);

        debug!(
            blocks = blocks.len(),
            error_lines = error_lines.len(),
            pairs = mapping.len(),
            "Extraction completed"
        );

        Extraction {
            blocks,
            error_lines,
            mapping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FAILURES: &str =
        "Executed testA\nfoo\nError: bad thing\n\nExecuted testB\nbar\nError: worse thing\n";

    fn extractor() -> PairedMarkerExtractor {
        PairedMarkerExtractor::new(MarkerSet::default()).unwrap()
    }

    #[test]
    fn test_two_failures_pair_in_order() {
        let extraction = extractor().extract(TWO_FAILURES);

        let pairs: Vec<_> = extraction.mapping.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Executed testA\nfoo", "Error: bad thing"),
                ("Executed testB\nbar", "Error: worse thing"),
            ]
        );
    }

    #[test]
    fn test_two_failures_rendered_report() {
        let report = extractor().extract(TWO_FAILURES).mapping.render();

        assert_eq!(
            report.as_str(),
            "For test case 'Executed testA\nfoo' the error is: 'Error: bad thing'\n\
             For test case 'Executed testB\nbar' the error is: 'Error: worse thing'"
        );
    }

    #[test]
    fn test_raw_block_keeps_trailing_whitespace() {
        let blocks = extractor().extract_blocks(TWO_FAILURES);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].as_str(), "Executed testA\nfoo\n");
        assert_eq!(blocks[1].as_str(), "Executed testB\nbar\n");
    }

    #[test]
    fn test_empty_buffer() {
        let extraction = extractor().extract("");

        assert!(extraction.blocks.is_empty());
        assert!(extraction.error_lines.is_empty());
        assert!(extraction.mapping.is_empty());
        assert_eq!(extraction.mapping.render().as_str(), "");
    }

    #[test]
    fn test_no_markers() {
        let extraction = extractor().extract("Chrome Headless: 10 SUCCESS\nall good\n");
        assert!(extraction.mapping.is_empty());
    }

    #[test]
    fn test_block_without_following_error_is_dropped() {
        let text = "Executed a\nError: one\nExecuted b\nno failure here\n";
        let extraction = extractor().extract(text);

        assert_eq!(extraction.blocks.len(), 1);
        assert_eq!(extraction.error_lines.len(), 1);
        assert_eq!(extraction.mapping.len(), 1);
    }

    #[test]
    fn test_more_errors_than_blocks() {
        let text = "Executed a\nError: one\nError: two\nError: three\n";
        let extraction = extractor().extract(text);

        assert_eq!(extraction.blocks.len(), 1);
        assert_eq!(extraction.error_lines.len(), 3);
        assert_eq!(extraction.mapping.len(), 1);
        assert_eq!(extraction.unpaired(), 2);
        assert_eq!(extraction.mapping.get("Executed a"), Some("Error: one"));
    }

    #[test]
    fn test_repeated_block_marker_extends_block() {
        // Non-greedy match runs from the first marker to the first delimiter
        let text = "Executed a\nExecuted b\nError: boom\n";
        let blocks = extractor().extract_blocks(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].trimmed(), "Executed a\nExecuted b");
    }

    #[test]
    fn test_error_on_unterminated_last_line_is_not_captured() {
        let text = "Executed a\nError: one\nExecuted b\nError: two";
        let extraction = extractor().extract(text);

        assert_eq!(extraction.blocks.len(), 2);
        assert_eq!(extraction.error_lines.len(), 1);
        assert_eq!(extraction.mapping.len(), 1);
    }

    #[test]
    fn test_crlf_line_endings_are_trimmed() {
        let text = "Executed a\r\nError: one\r\n";
        let extraction = extractor().extract(text);

        assert_eq!(extraction.mapping.get("Executed a"), Some("Error: one"));
    }

    #[test]
    fn test_n_well_formed_pairs() {
        let text: String = (0..25)
            .map(|i| format!("Executed spec {i}\n  at line {i}\nError: failure {i}\n"))
            .collect();
        let extraction = extractor().extract(&text);

        assert_eq!(extraction.mapping.len(), 25);
        assert_eq!(
            extraction.mapping.get("Executed spec 7\n  at line 7"),
            Some("Error: failure 7")
        );
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let first = extractor().extract(TWO_FAILURES);
        let second = extractor().extract(TWO_FAILURES);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_markers_with_regex_metacharacters() {
        let markers = MarkerSet::new("FAILED (", "Reason?").unwrap();
        let extractor = PairedMarkerExtractor::new(markers).unwrap();

        let text = "FAILED (login)\nReason? timeout\n";
        let extraction = extractor.extract(text);

        assert_eq!(extraction.mapping.get("FAILED (login)"), Some("Reason? timeout"));
    }

    #[test]
    fn test_karma_style_output() {
        let text = "\
Chrome Headless 120.0 (Linux x86_64): Executed 3 of 10 (1 FAILED)
Chrome Headless 120.0 (Linux x86_64) NgbAccordion should toggle FAILED
\tError: Expected false to be true.
\t    at UserContext.<anonymous> (src/accordion/accordion.spec.ts:42:15)
Chrome Headless 120.0 (Linux x86_64): Executed 10 of 10 (1 FAILED) (0.2 secs)
";
        let extraction = extractor().extract(text);

        assert_eq!(extraction.mapping.len(), 1);
        let (block, error) = extraction.mapping.iter().next().unwrap();
        assert!(block.starts_with("Executed 3 of 10 (1 FAILED)"));
        assert!(block.ends_with("should toggle FAILED"));
        assert_eq!(error, "Error: Expected false to be true.");
    }
}
