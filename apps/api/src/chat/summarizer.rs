//! CV summarization.
//!
//! Cheap and fully deterministic: no model call, same input always yields the
//! same summary. The summary keeps the lines an admissions officer would scan
//! for (education, test scores, languages, employment) and falls back to a
//! plain prefix of the CV when nothing matches.

/// Admissions-relevance vocabulary. Substring match, so "certificat" also
/// catches "certificate" and "certification".
const KEYWORDS: &[&str] = &[
    "education",
    "university",
    "bachelor",
    "master",
    "msc",
    "bsc",
    "mba",
    "phd",
    "degree",
    "diploma",
    "gpa",
    "gmat",
    "gre",
    "toefl",
    "ielts",
    "english",
    "german",
    "french",
    "language",
    "internship",
    "employment",
    "experience",
    "work",
    "certificat",
];

/// At most this many matching lines make it into the summary.
const MAX_SUMMARY_LINES: usize = 30;

/// Fallback prefix length when no line matches any keyword.
const FALLBACK_CHARS: usize = 1200;

/// Reduces a full CV to the lines relevant for admissions questions.
///
/// Keeps up to [`MAX_SUMMARY_LINES`] non-blank lines containing a keyword
/// (case-insensitive), in document order. When no line matches, returns the
/// first [`FALLBACK_CHARS`] characters of the raw text instead so the prompt
/// is never left without CV context.
pub fn summarize(cv_text: &str) -> String {
    let matching: Vec<&str> = cv_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| line_matches(line))
        .take(MAX_SUMMARY_LINES)
        .collect();

    if !matching.is_empty() {
        return matching.join("\n");
    }

    cv_text.chars().take(FALLBACK_CHARS).collect()
}

fn line_matches(line: &str) -> bool {
    let lower = line.to_lowercase();
    KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
