//! Content rules that strip TFVC binding references from solution and project files.
//!
//! Rules operate on raw bytes, one line at a time. Lines that carry a binding
//! are dropped whole; every other byte, line terminators and a leading BOM
//! included, is kept.

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const SECTION_START: &[u8] = b"GlobalSection";
const SECTION_END: &[u8] = b"EndGlobalSection";
const VERSION_CONTROL: &[u8] = b"VersionControl";
const SOLUTION_SCC_PREFIX: &[u8] = b"Scc";
const PROJECT_SCC_PREFIX: &[u8] = b"<Scc";

/// Transform applied to files matched by a rewrite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRule {
    /// `.sln`: drop `GlobalSection(*VersionControl*)` blocks and stray `Scc*` lines
    Solution,
    /// `*proj`: drop `<Scc...>` elements
    Project,
}

/// Result of applying a [`ContentRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub content: Vec<u8>,
    pub removed_lines: usize,
}

impl RewriteOutcome {
    pub fn is_rewritten(&self) -> bool {
        self.removed_lines > 0
    }
}

impl ContentRule {
    pub fn apply(&self, content: &[u8]) -> RewriteOutcome {
        match self {
            ContentRule::Solution => strip_solution(content),
            ContentRule::Project => strip_project(content),
        }
    }
}

fn strip_solution(content: &[u8]) -> RewriteOutcome {
    let (mut out, body) = start_output(content);
    let mut removed_lines = 0;
    let mut in_vcs_section = false;

    for line in body.split_inclusive(|b| *b == b'\n') {
        let key = line.trim_ascii();

        if !in_vcs_section && key.starts_with(SECTION_START) && contains(key, VERSION_CONTROL) {
            in_vcs_section = true;
        }

        if in_vcs_section {
            removed_lines += 1;
            if key.starts_with(SECTION_END) {
                in_vcs_section = false;
            }
            continue;
        }

        if key.starts_with(SOLUTION_SCC_PREFIX) {
            removed_lines += 1;
            continue;
        }

        out.extend_from_slice(line);
    }

    RewriteOutcome {
        content: out,
        removed_lines,
    }
}

fn strip_project(content: &[u8]) -> RewriteOutcome {
    let (mut out, body) = start_output(content);
    let mut removed_lines = 0;

    for line in body.split_inclusive(|b| *b == b'\n') {
        if line.trim_ascii().starts_with(PROJECT_SCC_PREFIX) {
            removed_lines += 1;
        } else {
            out.extend_from_slice(line);
        }
    }

    RewriteOutcome {
        content: out,
        removed_lines,
    }
}

/// Output buffer seeded with the BOM, if any, and the content after it.
///
/// The BOM belongs to the file, not to its first line, so it survives even
/// when that line is dropped.
fn start_output(content: &[u8]) -> (Vec<u8>, &[u8]) {
    let mut out = Vec::with_capacity(content.len());
    match content.strip_prefix(UTF8_BOM) {
        Some(body) => {
            out.extend_from_slice(UTF8_BOM);
            (out, body)
        }
        None => (out, content),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUND_SLN: &str = "\r\n\
Microsoft Visual Studio Solution File, Format Version 12.00\r\n\
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{1A2B}\"\r\n\
EndProject\r\n\
Global\r\n\
\tGlobalSection(TeamFoundationVersionControl) = preSolution\r\n\
\t\tSccNumberOfProjects = 2\r\n\
\t\tSccEnterpriseProvider = {4CA58AB2-18FA-4F8D-95D4-32DDF27D184C}\r\n\
\t\tSccTeamFoundationServer = http://tfs.example.com/tfs\r\n\
\tEndGlobalSection\r\n\
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution\r\n\
\t\tDebug|Any CPU = Debug|Any CPU\r\n\
\tEndGlobalSection\r\n\
EndGlobal\r\n";

    const UNBOUND_SLN: &str = "\r\n\
Microsoft Visual Studio Solution File, Format Version 12.00\r\n\
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{1A2B}\"\r\n\
EndProject\r\n\
Global\r\n\
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution\r\n\
\t\tDebug|Any CPU = Debug|Any CPU\r\n\
\tEndGlobalSection\r\n\
EndGlobal\r\n";

    #[test]
    fn given_vcs_section_when_solution_rule_then_section_removed() {
        let outcome = ContentRule::Solution.apply(BOUND_SLN.as_bytes());

        assert!(outcome.is_rewritten());
        assert_eq!(outcome.removed_lines, 5);
        assert_eq!(String::from_utf8(outcome.content).unwrap(), UNBOUND_SLN);
    }

    #[test]
    fn given_stray_scc_line_when_solution_rule_then_line_removed() {
        let input = "Global\nSccTeamFoundationServer = http://tfs.example.com/tfs\nEndGlobal\n";
        let outcome = ContentRule::Solution.apply(input.as_bytes());

        assert_eq!(outcome.content, b"Global\nEndGlobal\n");
        assert_eq!(outcome.removed_lines, 1);
    }

    #[test]
    fn given_clean_solution_when_solution_rule_then_unchanged() {
        let outcome = ContentRule::Solution.apply(UNBOUND_SLN.as_bytes());

        assert!(!outcome.is_rewritten());
        assert_eq!(outcome.content, UNBOUND_SLN.as_bytes());
    }

    #[test]
    fn given_scc_elements_when_project_rule_then_elements_removed() {
        let input = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<Project>\n\
  <PropertyGroup>\n\
    <SccProjectName>SAK</SccProjectName>\n\
    <SccLocalPath>SAK</SccLocalPath>\n\
    <SccAuxPath>SAK</SccAuxPath>\n\
    <SccProvider>SAK</SccProvider>\n\
    <OutputType>Exe</OutputType>\n\
  </PropertyGroup>\n\
</Project>";
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<Project>\n\
  <PropertyGroup>\n\
    <OutputType>Exe</OutputType>\n\
  </PropertyGroup>\n\
</Project>";

        let outcome = ContentRule::Project.apply(input.as_bytes());

        assert_eq!(outcome.removed_lines, 4);
        assert_eq!(String::from_utf8(outcome.content).unwrap(), expected);
    }

    #[test]
    fn given_bom_prefixed_first_line_when_project_rule_then_line_dropped_and_bom_kept() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(b"<SccProvider>SAK</SccProvider>\n<Keep/>\n");

        let outcome = ContentRule::Project.apply(&input);

        assert_eq!(outcome.removed_lines, 1);
        assert_eq!(outcome.content, b"\xEF\xBB\xBF<Keep/>\n");
    }

    #[test]
    fn given_bom_prefixed_scc_first_line_when_solution_rule_then_bom_kept() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(b"SccProjectName = x\r\nGlobal\r\n");

        let outcome = ContentRule::Solution.apply(&input);

        assert_eq!(outcome.content, b"\xEF\xBB\xBFGlobal\r\n");
    }

    #[test]
    fn given_non_utf8_bytes_when_project_rule_then_bytes_preserved() {
        let input = b"<Name>\xFF\xFE</Name>\r\n<SccAuxPath>x</SccAuxPath>\r\n";

        let outcome = ContentRule::Project.apply(input);

        assert_eq!(outcome.content, b"<Name>\xFF\xFE</Name>\r\n");
    }

    #[test]
    fn given_unterminated_vcs_section_when_solution_rule_then_drops_to_end() {
        let input = "Global\n\tGlobalSection(TeamFoundationVersionControl) = preSolution\n\t\tSccNumberOfProjects = 1\n";
        let outcome = ContentRule::Solution.apply(input.as_bytes());

        assert_eq!(outcome.content, b"Global\n");
    }

    #[test]
    fn given_empty_content_when_any_rule_then_not_rewritten() {
        assert!(!ContentRule::Solution.apply(b"").is_rewritten());
        assert!(!ContentRule::Project.apply(b"").is_rewritten());
    }
}
