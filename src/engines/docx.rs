use crate::error::{AppError, Result};
use docx_rs::{BreakType, Docx, Paragraph, Run};
use regex::Regex;
use std::fs::File;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Split extracted text into pages on form feed (pdftotext page separator),
/// dropping pages with no usable text.
pub fn split_pages(text: &str) -> Vec<Vec<String>> {
    text.split('\u{0C}')
        .map(clean_paragraphs)
        .filter(|page| !page.is_empty())
        .collect()
}

/// Normalize one page of raw extracted text into display paragraphs.
///
/// Applies compatibility normalization (ligatures like ﬁ become fi), strips
/// control characters left behind by PDF text runs, splits paragraphs at
/// blank lines, and collapses intra-paragraph whitespace.
pub fn clean_paragraphs(page: &str) -> Vec<String> {
    let normalized: String = page.nfkc().collect();

    let re_control = Regex::new(r"[\x00-\x08\x0B-\x1F\x7F]").unwrap();
    let cleaned = re_control.replace_all(&normalized, " ");

    let re_blank_lines = Regex::new(r"\n[ \t]*\n").unwrap();
    let re_spaces = Regex::new(r"[ \t]+").unwrap();

    re_blank_lines
        .split(&cleaned)
        .map(|block| {
            let block = block.replace('\n', " ");
            re_spaces.replace_all(&block, " ").trim().to_string()
        })
        .filter(|p| !p.is_empty())
        .collect()
}

/// Write pages of paragraphs as a DOCX file, one page break between pages.
pub fn write_docx(pages: &[Vec<String>], output: &Path) -> Result<()> {
    let mut docx = Docx::new();

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            docx =
                docx.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
        for para in page {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(para.as_str())));
        }
    }

    let file = File::create(output)?;
    docx.build()
        .pack(file)
        .map_err(|e| AppError::ConversionFailed(format!("failed to write DOCX: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_paragraphs_splits_on_blank_lines() {
        let paras = clean_paragraphs("first line\nsame paragraph\n\nsecond paragraph\n");
        assert_eq!(paras, vec!["first line same paragraph", "second paragraph"]);
    }

    #[test]
    fn test_clean_paragraphs_strips_controls_and_collapses_whitespace() {
        let paras = clean_paragraphs("a\x02b\t\t  c");
        assert_eq!(paras, vec!["a b c"]);
    }

    #[test]
    fn test_clean_paragraphs_normalizes_ligatures() {
        let paras = clean_paragraphs("con\u{FB01}guration");
        assert_eq!(paras, vec!["configuration"]);
    }

    #[test]
    fn test_split_pages_on_form_feed() {
        let pages = split_pages("page one\u{0C}page two\u{0C}\u{0C}");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], vec!["page one"]);
        assert_eq!(pages[1], vec!["page two"]);
    }

    #[test]
    fn test_split_pages_empty_input() {
        assert!(split_pages("").is_empty());
        assert!(split_pages(" \n \u{0C} \n").is_empty());
    }

    #[test]
    fn test_write_docx_produces_nonempty_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.docx");
        let pages = vec![vec!["hello".to_string()], vec!["world".to_string()]];

        write_docx(&pages, &output).unwrap();

        let meta = std::fs::metadata(&output).unwrap();
        assert!(meta.len() > 0);
    }
}
