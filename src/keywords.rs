//! Batch TF-IDF keyword extraction
//!
//! Keywords are computed per batch: each record is a document and document
//! frequencies come from the batch alone. Scores use the smoothed idf
//! `ln((1 + N) / (1 + df)) + 1` multiplied by the raw term count.

use crate::storage::NewsRecord;
use std::collections::{HashMap, HashSet};

/// Keywords kept per record
pub const TOP_KEYWORDS: usize = 10;

/// Documents shorter than this (in characters) get no keywords
pub const MIN_TEXT_CHARS: usize = 10;

const STOPWORDS: &[&str] = &[
    "و", "در", "به", "از", "که", "این", "را", "با", "است", "برای", "آن", "یک", "خود", "تا",
    "بر", "هم", "نیز", "شد", "شده", "می", "ها", "های", "هایی", "کرد", "کرده", "کند", "کنند",
    "شود", "شوند", "بود", "بوده", "باشد", "دارد", "داشت", "اند", "ای", "او", "ما", "من", "شما",
    "آنها", "ایشان", "اما", "یا", "اگر", "چه", "چون", "همه", "هر", "دیگر", "بین", "پیش",
    "پس", "روی", "زیر", "بی", "نه", "وی", "همین", "چنین", "آنان", "اینکه", "آنکه", "کنید",
    "کنیم", "گفت", "گوید", "خواهد", "باید", "توان", "تواند", "بیش", "کم", "حتی", "ولی", "هیچ",
    "مورد", "طور", "سوی", "درباره", "علیه", "همچنین", "اینجا", "آنجا", "داده", "دهد", "ترین",
    "تر", "اینها", "وجود", "دو", "سه",
];

/// Computes keywords for every record of a batch in place
pub fn annotate_batch(records: &mut [NewsRecord]) {
    let texts: Vec<String> = records.iter().map(document_text).collect();
    let keywords = extract_keywords(&texts);
    for (record, words) in records.iter_mut().zip(keywords) {
        record.keywords = if words.is_empty() {
            None
        } else {
            Some(words.join(", "))
        };
    }
}

/// Text a record contributes as a document
///
/// The body is preferred; otherwise title and description are joined.
pub fn document_text(record: &NewsRecord) -> String {
    match record.full_text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => {
            let title = record.title.as_deref().unwrap_or("");
            let description = record.description.as_deref().unwrap_or("");
            format!("{} {}", title, description).trim().to_string()
        }
    }
}

/// Top keywords for each document, in input order
pub fn extract_keywords(texts: &[String]) -> Vec<Vec<String>> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();

    let documents: Vec<Option<Vec<String>>> = texts
        .iter()
        .map(|text| {
            (text.trim().chars().count() >= MIN_TEXT_CHARS).then(|| tokenize(text, &stopwords))
        })
        .collect();

    let n_docs = documents.iter().flatten().count() as f64;
    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for tokens in documents.iter().flatten() {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *document_frequency.entry(term).or_default() += 1;
        }
    }

    documents
        .iter()
        .map(|tokens| match tokens {
            Some(tokens) => top_terms(tokens, &document_frequency, n_docs),
            None => Vec::new(),
        })
        .collect()
}

fn tokenize(text: &str, stopwords: &HashSet<&str>) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|token| token.chars().count() > 1)
        .map(str::to_lowercase)
        .filter(|token| !stopwords.contains(token.as_str()))
        .collect()
}

fn top_terms(tokens: &[String], df: &HashMap<&str, usize>, n_docs: f64) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_default() += 1;
    }

    let mut scored: Vec<(&str, f64)> = counts
        .into_iter()
        .map(|(term, tf)| {
            let doc_freq = df.get(term).copied().unwrap_or(0) as f64;
            let idf = ((1.0 + n_docs) / (1.0 + doc_freq)).ln() + 1.0;
            (term, tf as f64 * idf)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(TOP_KEYWORDS)
        .map(|(term, _)| term.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_documents_get_nothing() {
        let keywords = extract_keywords(&["کوتاه".to_string()]);
        assert_eq!(keywords, vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_stopwords_and_single_chars_dropped() {
        let keywords = extract_keywords(&["این خبر و آن خبر در تهران x".to_string()]);
        assert_eq!(keywords[0], vec!["خبر".to_string(), "تهران".to_string()]);
    }

    #[test]
    fn test_rare_terms_outrank_common_ones() {
        let texts = vec![
            "اقتصاد بورس بورس تهران".to_string(),
            "اقتصاد ورزش فوتبال تهران".to_string(),
            "اقتصاد سیاست مجلس تهران".to_string(),
        ];
        let keywords = extract_keywords(&texts);
        assert_eq!(keywords[0][0], "بورس");
        // Terms shared by every document tie and fall back to alphabetical order
        assert_eq!(&keywords[0][1..], &["اقتصاد".to_string(), "تهران".to_string()]);
    }

    #[test]
    fn test_at_most_ten_keywords() {
        let text = (0..30)
            .map(|i| format!("واژه{}", "ا".repeat(i + 1)))
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = extract_keywords(&[text]);
        assert_eq!(keywords[0].len(), TOP_KEYWORDS);
    }

    #[test]
    fn test_annotate_batch_uses_title_and_description() {
        let mut records = vec![
            NewsRecord {
                title: Some("انتخابات مجلس".to_string()),
                description: Some("نتایج انتخابات اعلام شد".to_string()),
                ..Default::default()
            },
            NewsRecord {
                title: Some("کوتاه".to_string()),
                ..Default::default()
            },
        ];
        annotate_batch(&mut records);

        let first = records[0].keywords.as_deref().unwrap();
        assert!(first.starts_with("انتخابات"));
        assert!(first.contains(", "));
        assert_eq!(records[1].keywords, None);
    }

    #[test]
    fn test_document_text_prefers_body() {
        let record = NewsRecord {
            title: Some("عنوان".to_string()),
            full_text: Some("متن کامل خبر".to_string()),
            ..Default::default()
        };
        assert_eq!(document_text(&record), "متن کامل خبر");
    }
}
