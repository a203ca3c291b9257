//! Static catalogue of maritime chokepoints and security zones.

/// Chokepoints recognized in route news.
pub const CHOKEPOINTS: &[&str] = &[
    "Suez Canal",
    "Strait of Hormuz",
    "Strait of Malacca",
    "Panama Canal",
    "Danish Straits",
    "Bab el-Mandeb",
    "South China Sea",
];

/// Security zones recognized in route news.
pub const SECURITY_ZONES: &[&str] = &[
    "Gulf of Guinea",
    "Somalia Coast",
    "Persian Gulf",
    "Black Sea",
    "Taiwan Strait",
];

/// Catalogue names mentioned in `texts`, in first-mention order.
///
/// Texts are scanned in order; within one text, names are ordered by the
/// position of their first occurrence. Matching ignores ASCII case.
pub fn detect_mentions(catalogue: &[&str], texts: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for text in texts {
        let haystack = text.to_ascii_lowercase();
        let mut hits: Vec<(usize, &str)> = catalogue
            .iter()
            .filter_map(|name| {
                haystack
                    .find(&name.to_ascii_lowercase())
                    .map(|pos| (pos, *name))
            })
            .collect();
        hits.sort_by_key(|(pos, _)| *pos);

        for (_, name) in hits {
            if !found.iter().any(|f| f == name) {
                found.push(name.to_string());
            }
        }
    }

    found
}
