//! Duplicate-looking file name detection.
//!
//! Operating systems and file managers name copies predictably:
//! `report (1).txt`, `report copy.txt`, `report - Copy (2).txt`,
//! `报告 - 副本.txt`. [`NameClassifier`] recognizes those names from the
//! file name alone. The result is only a scheduling hint for the
//! deduplicator; content equality is what decides deletion.
//!
//! # Example
//!
//! ```
//! use dirdedup::scanner::NameClassifier;
//!
//! let classifier = NameClassifier::default();
//! assert!(classifier.is_duplicate_name("photo (1).jpg"));
//! assert!(classifier.is_duplicate_name("notes copy.md"));
//! assert!(!classifier.is_duplicate_name("photo.jpg"));
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// A single duplicate-name rule, matched against the stem.
#[derive(Debug, Clone)]
pub struct DuplicatePattern {
    label: String,
    regex: Regex,
}

impl DuplicatePattern {
    fn new(label: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.into(),
            regex: Regex::new(pattern)?,
        })
    }

    /// Short description of what this rule matches.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    fn matches(&self, stem: &str) -> bool {
        self.regex.is_match(stem)
    }
}

/// Built-in rules, in evaluation order.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("numeric suffix", r"\(\d+\)$"),
    ("副本", r"副本$"),
    ("copy", r"(?i)copy$"),
    ("复制", r"复制$"),
    ("副本 (N)", r"副本\s*\(\d+\)$"),
    ("copy (N)", r"(?i)copy\s*\(\d+\)$"),
];

static BUILTIN: LazyLock<Vec<DuplicatePattern>> = LazyLock::new(|| {
    BUILTIN_PATTERNS
        .iter()
        .filter_map(|(label, pattern)| match DuplicatePattern::new(*label, pattern) {
            Ok(p) => Some(p),
            Err(e) => {
                log::error!("Invalid built-in pattern {pattern}: {e}");
                None
            }
        })
        .collect()
});

/// Ordered set of duplicate-name rules.
///
/// Pure: classification never touches the filesystem.
#[derive(Debug, Clone)]
pub struct NameClassifier {
    patterns: Vec<DuplicatePattern>,
}

impl Default for NameClassifier {
    fn default() -> Self {
        Self {
            patterns: BUILTIN.clone(),
        }
    }
}

impl NameClassifier {
    /// Create a classifier with the built-in rules plus extra copy markers.
    ///
    /// Each marker adds two rules after the built-ins: the marker at the end
    /// of the stem, and the marker followed by a numeric parenthetical.
    /// Markers are matched literally; blank markers are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use dirdedup::scanner::NameClassifier;
    ///
    /// let classifier = NameClassifier::with_markers(&["Kopie".to_string()]);
    /// assert!(classifier.is_duplicate_name("Bericht - Kopie.pdf"));
    /// assert!(classifier.is_duplicate_name("Bericht - Kopie (3).pdf"));
    /// ```
    #[must_use]
    pub fn with_markers(markers: &[String]) -> Self {
        let mut classifier = Self::default();
        for marker in markers.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
            let escaped = regex::escape(marker);
            for (label, pattern) in [
                (marker.to_string(), format!("{escaped}$")),
                (format!("{marker} (N)"), format!(r"{escaped}\s*\(\d+\)$")),
            ] {
                match DuplicatePattern::new(label, &pattern) {
                    Ok(p) => classifier.patterns.push(p),
                    Err(e) => log::warn!("Ignoring copy marker '{marker}': {e}"),
                }
            }
        }
        classifier
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn patterns(&self) -> &[DuplicatePattern] {
        &self.patterns
    }

    /// Return the first rule the file name matches, if any.
    ///
    /// The extension is stripped before matching, so `copy.txt` has stem
    /// `copy` and `.bashrc` keeps its whole name as the stem.
    #[must_use]
    pub fn classify(&self, file_name: &str) -> Option<&DuplicatePattern> {
        let stem = file_stem(file_name);
        self.patterns.iter().find(|p| p.matches(stem))
    }

    /// Whether the file name looks like a generated copy.
    #[must_use]
    pub fn is_duplicate_name(&self, file_name: &str) -> bool {
        self.classify(file_name).is_some()
    }
}

/// File name without its final extension.
fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Check a name against the built-in rules only.
#[must_use]
pub fn is_duplicate_name(file_name: &str) -> bool {
    let stem = file_stem(file_name);
    BUILTIN.iter().any(|p| p.matches(stem))
}
