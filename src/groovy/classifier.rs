//! Static classification of Groovy script files

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Vendor tree whose Groovy files are logging configuration, not application code.
const LOGBACK_TREE: &str = "ch/qos/logback/";
const LOGBACK_SCRIPTS: [&str; 2] = ["logback.groovy", "logback-test.groovy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroovyFileKind {
    /// Never an entry point; excluded from the launch list
    Ignore,
    /// Declares a class
    Pogo,
    /// Declares a `beans { }` configuration block
    Config,
    /// Matches nothing; launched only alongside qualifying files
    Invalid,
}

impl GroovyFileKind {
    /// Whether a file of this kind makes the application a Spring Boot CLI application.
    pub fn qualifies(&self) -> bool {
        matches!(self, GroovyFileKind::Pogo | GroovyFileKind::Config)
    }

    /// Whether a file of this kind is passed to the launcher.
    pub fn launched(&self) -> bool {
        !matches!(self, GroovyFileKind::Ignore)
    }
}

/// Classifies a file from its root-relative path and its content. Rules are
/// tried in order: ignore, POGO, configuration, invalid.
pub fn classify(relative: &Path, content: &str) -> GroovyFileKind {
    if is_ignored(relative) {
        GroovyFileKind::Ignore
    } else if pogo_regex().is_match(content) {
        GroovyFileKind::Pogo
    } else if config_regex().is_match(content) {
        GroovyFileKind::Config
    } else {
        GroovyFileKind::Invalid
    }
}

fn is_ignored(relative: &Path) -> bool {
    let normalized = format!("/{}", relative.to_string_lossy().replace('\\', "/"));
    if normalized.contains(&format!("/{}", LOGBACK_TREE)) {
        return true;
    }

    relative
        .file_name()
        .and_then(|n| n.to_str())
        .map(|name| LOGBACK_SCRIPTS.contains(&name))
        .unwrap_or(false)
}

fn pogo_regex() -> &'static Regex {
    static POGO_REGEX: OnceLock<Regex> = OnceLock::new();
    POGO_REGEX.get_or_init(|| {
        Regex::new(r"\bclass\s+\w+[\s\w.,<>]*\{").expect("Invalid POGO regex")
    })
}

fn config_regex() -> &'static Regex {
    static CONFIG_REGEX: OnceLock<Regex> = OnceLock::new();
    CONFIG_REGEX.get_or_init(|| Regex::new(r"\bbeans\s*\{").expect("Invalid config regex"))
}
