use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use super::VocabItem;

/// A run of body text with uniform styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub bold: bool,
    /// index into the slide's vocabulary when this run is a glossary term
    pub term: Option<usize>,
}

impl<'a> Span<'a> {
    fn plain(text: &'a str, bold: bool) -> Self {
        Self {
            text,
            bold,
            term: None,
        }
    }
}

fn bold_regex() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold marker pattern is valid"))
}

// longest terms first so "economic scale" wins over "scale"
fn vocab_regex(vocab: &[VocabItem]) -> Option<Regex> {
    let mut terms: Vec<&str> = vocab
        .iter()
        .map(|v| v.term.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

    let pattern = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<String>>()
        .join("|");

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("vocabulary pattern rejected, terms will not be highlighted: {}", e);
            None
        }
    }
}

/// Splits one body line into styled runs. `**bold**` markers are consumed;
/// vocabulary terms are matched case-insensitively inside a single plain or
/// bold run, so a term split by a bold marker is not matched.
pub fn spans<'a>(line: &'a str, vocab: &[VocabItem]) -> Vec<Span<'a>> {
    let mut runs = Vec::new();
    let mut last = 0;

    for caps in bold_regex().captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            runs.push(Span::plain(&line[last..whole.start()], false));
        }
        runs.push(Span::plain(inner.as_str(), true));
        last = whole.end();
    }
    if last < line.len() {
        runs.push(Span::plain(&line[last..], false));
    }

    let Some(terms) = vocab_regex(vocab) else {
        return runs;
    };

    runs.into_iter()
        .flat_map(|run| split_terms(run, &terms, vocab))
        .collect()
}

fn split_terms<'a>(run: Span<'a>, terms: &Regex, vocab: &[VocabItem]) -> Vec<Span<'a>> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in terms.find_iter(run.text) {
        if m.start() > last {
            out.push(Span::plain(&run.text[last..m.start()], run.bold));
        }
        out.push(Span {
            text: m.as_str(),
            bold: run.bold,
            term: term_index(vocab, m.as_str()),
        });
        last = m.end();
    }
    if last < run.text.len() {
        out.push(Span::plain(&run.text[last..], run.bold));
    }

    out
}

/// The line with its bold markers removed.
pub fn plain_text(line: &str) -> String {
    bold_regex().replace_all(line, "$1").into_owned()
}

fn term_index(vocab: &[VocabItem], matched: &str) -> Option<usize> {
    let matched = matched.to_lowercase();
    vocab.iter().position(|v| v.term.to_lowercase() == matched)
}

/// For each vocabulary item, whether [`spans`] marks it somewhere in `lines`.
/// An item that is never marked cannot be shown to a learner.
pub fn reachable_terms(lines: &[String], vocab: &[VocabItem]) -> Vec<bool> {
    let mut reachable = vec![false; vocab.len()];
    for line in lines {
        for span in spans(line, vocab) {
            if let Some(index) = span.term {
                reachable[index] = true;
            }
        }
    }
    reachable
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vec<VocabItem> {
        vec![
            VocabItem::new("scale", "масштаб", "miqyos"),
            VocabItem::new("economic scale", "экономический масштаб", "iqtisodiy miqyos"),
        ]
    }

    #[test]
    fn bold_markers_become_bold_runs() {
        let runs = spans("a **paradox** of connectivity", &[]);
        let texts: Vec<(&str, bool)> = runs.iter().map(|s| (s.text, s.bold)).collect();
        assert_eq!(
            texts,
            vec![("a ", false), ("paradox", true), (" of connectivity", false)]
        );
    }

    #[test]
    fn longest_term_is_matched_first() {
        let vocab = vocab();
        let runs = spans("Their economic scale is huge.", &vocab);
        let term = runs.iter().find(|s| s.term.is_some()).expect("a term run");
        assert_eq!(term.text, "economic scale");
        assert_eq!(term.term, Some(1));
    }

    #[test]
    fn terms_inside_bold_keep_bold() {
        let vocab = vocab();
        let runs = spans("**scale** matters", &vocab);
        assert_eq!(
            runs[0],
            Span {
                text: "scale",
                bold: true,
                term: Some(0)
            }
        );
    }

    #[test]
    fn unterminated_marker_is_left_alone() {
        let runs = spans("half **open", &[]);
        assert_eq!(runs, vec![Span::plain("half **open", false)]);
    }

    #[test]
    fn plain_text_strips_markers() {
        assert_eq!(plain_text("**Key Concept:** Global Reach."), "Key Concept: Global Reach.");
    }

    #[test]
    fn terms_match_regardless_of_case() {
        let vocab = vec![VocabItem::new("standardized", "стандартизированный", "standartlashtirilgan")];
        let runs = spans("**Global**: **Standardized**, efficient.", &vocab);
        let term = runs.iter().find(|s| s.term.is_some()).expect("a term run");
        assert_eq!(term.text, "Standardized");
        assert!(term.bold);
        assert_eq!(term.term, Some(0));
    }

    #[test]
    fn reachability_follows_the_span_splitter() {
        let vocab = vec![
            VocabItem::new("economic scale", "экономический масштаб", "iqtisodiy miqyos"),
            VocabItem::new("isolated", "изолированный", "yakkalangan"),
            VocabItem::new("intimacy", "близость", "yaqinlik"),
        ];
        let lines = vec![
            "Their **economic** scale is huge.".to_string(),
            "we are **isolated**".to_string(),
        ];

        // "economic scale" survives in the plain text but is cut by the bold marker
        assert!(plain_text(&lines[0]).contains("economic scale"));
        assert!(spans(&lines[0], &vocab).iter().all(|s| s.term.is_none()));
        assert_eq!(reachable_terms(&lines, &vocab), vec![false, true, false]);
    }
}
