//! Marker table: the TFVC vocabulary as data.
//!
//! Each rule maps a name pattern for one entry kind to an action.
//! Classification walks the rules in order and the first match wins.

use crate::domain::{ContentRule, DomainError, Entry, EntryKind};

/// How a rule matches an entry's file name. Matching is ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatcher {
    /// Whole file name, e.g. `$tf`, `vssver2.scc`
    Exact(String),
    /// Last extension, e.g. `vspscc` matches `App.csproj.vspscc`
    Extension(String),
    /// Last extension ends with, e.g. `proj` matches `csproj` and `vcxproj`
    ExtensionSuffix(String),
}

impl NameMatcher {
    pub fn exact(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyPattern("name"));
        }
        Ok(Self::Exact(name.to_ascii_lowercase()))
    }

    /// Accepts `ext`, `.ext` or `*.ext`.
    pub fn extension(ext: &str) -> Result<Self, DomainError> {
        Ok(Self::Extension(normalize_extension(ext)?))
    }

    pub fn extension_suffix(suffix: &str) -> Result<Self, DomainError> {
        Ok(Self::ExtensionSuffix(normalize_extension(suffix)?))
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match self {
            NameMatcher::Exact(expected) => name == *expected,
            NameMatcher::Extension(expected) => extension_of(&name) == Some(expected.as_str()),
            NameMatcher::ExtensionSuffix(suffix) => {
                extension_of(&name).is_some_and(|ext| ext.ends_with(suffix.as_str()))
            }
        }
    }
}

fn normalize_extension(ext: &str) -> Result<String, DomainError> {
    let ext = ext.trim();
    let ext = ext.strip_prefix("*.").or_else(|| ext.strip_prefix('.')).unwrap_or(ext);
    if ext.is_empty() {
        return Err(DomainError::EmptyPattern("extension"));
    }
    Ok(ext.to_ascii_lowercase())
}

/// Extension after the last dot; dot files like `.tfignore` have none.
fn extension_of(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Exclude,
    Rewrite(ContentRule),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRule {
    pub matcher: NameMatcher,
    pub applies_to: EntryKind,
    pub action: RuleAction,
}

impl MarkerRule {
    pub fn matches(&self, entry: &Entry) -> bool {
        self.applies_to == entry.kind && self.matcher.matches(&entry.name())
    }
}

/// Ordered rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerTable {
    rules: Vec<MarkerRule>,
}

impl MarkerTable {
    pub fn new(rules: Vec<MarkerRule>) -> Self {
        Self { rules }
    }

    pub fn builder() -> MarkerTableBuilder {
        MarkerTableBuilder::default()
    }

    /// First matching rule's action, `None` for a plain pass-through entry.
    pub fn classify(&self, entry: &Entry) -> Option<RuleAction> {
        self.rules
            .iter()
            .find(|rule| rule.matches(entry))
            .map(|rule| rule.action)
    }

    pub fn rules(&self) -> &[MarkerRule] {
        &self.rules
    }
}

/// Builds a table with exclusions ahead of rewrites, whatever the call order.
#[derive(Debug, Default)]
pub struct MarkerTableBuilder {
    exclusions: Vec<MarkerRule>,
    rewrites: Vec<MarkerRule>,
}

impl MarkerTableBuilder {
    pub fn exclude_dirs<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, DomainError> {
        for name in names {
            self.exclusions.push(MarkerRule {
                matcher: NameMatcher::exact(name.as_ref())?,
                applies_to: EntryKind::Directory,
                action: RuleAction::Exclude,
            });
        }
        Ok(self)
    }

    pub fn exclude_file_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, DomainError> {
        for name in names {
            self.exclusions.push(MarkerRule {
                matcher: NameMatcher::exact(name.as_ref())?,
                applies_to: EntryKind::File,
                action: RuleAction::Exclude,
            });
        }
        Ok(self)
    }

    pub fn exclude_extensions<S: AsRef<str>>(mut self, exts: &[S]) -> Result<Self, DomainError> {
        for ext in exts {
            self.exclusions.push(MarkerRule {
                matcher: NameMatcher::extension(ext.as_ref())?,
                applies_to: EntryKind::File,
                action: RuleAction::Exclude,
            });
        }
        Ok(self)
    }

    pub fn rewrite_extensions<S: AsRef<str>>(
        mut self,
        exts: &[S],
        rule: ContentRule,
    ) -> Result<Self, DomainError> {
        for ext in exts {
            self.rewrites.push(MarkerRule {
                matcher: NameMatcher::extension(ext.as_ref())?,
                applies_to: EntryKind::File,
                action: RuleAction::Rewrite(rule),
            });
        }
        Ok(self)
    }

    pub fn rewrite_extension_suffixes<S: AsRef<str>>(
        mut self,
        suffixes: &[S],
        rule: ContentRule,
    ) -> Result<Self, DomainError> {
        for suffix in suffixes {
            self.rewrites.push(MarkerRule {
                matcher: NameMatcher::extension_suffix(suffix.as_ref())?,
                applies_to: EntryKind::File,
                action: RuleAction::Rewrite(rule),
            });
        }
        Ok(self)
    }

    pub fn build(self) -> MarkerTable {
        let mut rules = self.exclusions;
        rules.extend(self.rewrites);
        MarkerTable::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MarkerTable {
        MarkerTable::builder()
            .rewrite_extension_suffixes(&["proj"], ContentRule::Project)
            .unwrap()
            .rewrite_extensions(&["sln"], ContentRule::Solution)
            .unwrap()
            .exclude_dirs(&["$tf", "Debug"])
            .unwrap()
            .exclude_extensions(&["*.vspscc", ".user"])
            .unwrap()
            .exclude_file_names(&["vssver2.scc", ".tfignore"])
            .unwrap()
            .build()
    }

    #[test]
    fn given_bookkeeping_dir_when_classify_then_excluded() {
        let table = sample_table();
        assert_eq!(
            table.classify(&Entry::directory("$tf")),
            Some(RuleAction::Exclude)
        );
        assert_eq!(
            table.classify(&Entry::directory("src/bin/DEBUG")),
            Some(RuleAction::Exclude)
        );
    }

    #[test]
    fn given_dir_rule_when_file_has_same_name_then_not_excluded() {
        let table = sample_table();
        assert_eq!(table.classify(&Entry::file("Debug")), None);
    }

    #[test]
    fn given_binding_sidecar_when_classify_then_excluded() {
        let table = sample_table();
        assert_eq!(
            table.classify(&Entry::file("App/App.csproj.vspscc")),
            Some(RuleAction::Exclude)
        );
        assert_eq!(
            table.classify(&Entry::file("App/App.csproj.user")),
            Some(RuleAction::Exclude)
        );
        assert_eq!(
            table.classify(&Entry::file(".tfignore")),
            Some(RuleAction::Exclude)
        );
        assert_eq!(
            table.classify(&Entry::file("VSSVER2.SCC")),
            Some(RuleAction::Exclude)
        );
    }

    #[test]
    fn given_project_files_when_classify_then_project_rewrite() {
        let table = sample_table();
        for name in ["App.csproj", "Lib.vbproj", "Native.VCXPROJ"] {
            assert_eq!(
                table.classify(&Entry::file(name)),
                Some(RuleAction::Rewrite(ContentRule::Project)),
                "{name}"
            );
        }
    }

    #[test]
    fn given_solution_file_when_classify_then_solution_rewrite() {
        let table = sample_table();
        assert_eq!(
            table.classify(&Entry::file("Solution.sln")),
            Some(RuleAction::Rewrite(ContentRule::Solution))
        );
    }

    #[test]
    fn given_builder_order_when_build_then_exclusions_first() {
        let table = sample_table();
        assert!(matches!(table.rules()[0].action, RuleAction::Exclude));
        assert!(matches!(
            table.rules().last().map(|r| r.action),
            Some(RuleAction::Rewrite(_))
        ));
    }

    #[test]
    fn given_plain_file_when_classify_then_none() {
        let table = sample_table();
        assert_eq!(table.classify(&Entry::file("Program.cs")), None);
        assert_eq!(table.classify(&Entry::file("proj")), None);
    }

    #[test]
    fn given_empty_pattern_when_building_then_error() {
        let result = MarkerTable::builder().exclude_extensions(&["*."]);
        assert!(matches!(result, Err(DomainError::EmptyPattern("extension"))));

        let result = MarkerTable::builder().exclude_dirs(&["  "]);
        assert!(matches!(result, Err(DomainError::EmptyPattern("name"))));
    }
}
