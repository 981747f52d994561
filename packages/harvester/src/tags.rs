//! Tag generation shared by the normalizers.
//!
//! Tags come from three places: product keyword matches in title+content,
//! topic keyword groups, and extra per-source tags (source name, competitor
//! flag, study type). Normalization and the 10-tag cap are applied by the
//! pool's tag rules.

use research_pool::normalize_tags;

/// Product keyword to tag token.
const PRODUCT_TAGS: [(&str, &str); 8] = [
    ("lion's mane", "lions_mane"),
    ("lions mane", "lions_mane"),
    ("chaga", "chaga"),
    ("reishi", "reishi"),
    ("cordyceps", "cordyceps"),
    ("shiitake", "shiitake"),
    ("maitake", "maitake"),
    ("turkey tail", "turkey_tail"),
];

/// Topic tag to the keywords that trigger it.
const TOPIC_TAGS: [(&str, &[&str]); 6] = [
    ("cognitive", &["brain", "focus", "memory", "cognitive", "mental"]),
    ("immune", &["immune", "immunity", "cold", "flu"]),
    ("energy", &["energy", "fatigue", "stamina", "endurance"]),
    ("sleep", &["sleep", "insomnia", "rest"]),
    ("stress", &["stress", "anxiety", "calm", "cortisol"]),
    ("supplement", &["supplement", "stack", "nootropic", "extract"]),
];

/// Generate the normalized tag set for an item.
pub fn generate_tags<'a>(
    title: &str,
    content: &str,
    extra: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let text = format!("{title} {content}").to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for (keyword, tag) in PRODUCT_TAGS {
        if text.contains(keyword) {
            tags.push(tag.to_string());
        }
    }
    for (tag, keywords) in TOPIC_TAGS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            tags.push(tag.to_string());
        }
    }
    tags.extend(extra.into_iter().map(String::from));

    normalize_tags(tags)
}
