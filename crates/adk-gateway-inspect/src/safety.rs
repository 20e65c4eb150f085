//! Heuristic safety scanning of agent sources.
//!
//! One pass over the text: a substring check per dangerous call and a single
//! regex for likely hardcoded secrets. Expect false positives (patterns in
//! comments or strings) and false negatives (aliased calls, split literals).

use std::{path::Path, sync::OnceLock};

use adk_gateway_core::GatewayError;
use regex::Regex;
use serde::Serialize;

use crate::source::{agent_file, read_agent_source};

/// Call patterns reported wherever they first appear.
pub const DANGEROUS_CALLS: [&str; 3] = ["eval(", "exec(", "os.system("];

const SECRET_PATTERN: &str = r#"(?i)(api_key|password|secret)['"\s=:]+['"\w-]{16,}"#;

/// Line number used when a finding cannot be located.
pub const UNKNOWN_LINE: i64 = -1;

/// One scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: String,
    /// 1-based, or [`UNKNOWN_LINE`].
    pub line: i64,
    pub issue: String,
}

fn secret_regex() -> Option<&'static Regex> {
    static SECRET: OnceLock<Option<Regex>> = OnceLock::new();
    SECRET
        .get_or_init(|| match Regex::new(SECRET_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("Secret pattern failed to compile: {e}");
                None
            }
        })
        .as_ref()
}

/// Scan source text. `file` labels each finding.
#[must_use]
pub fn scan_safety(file: &str, source: &str) -> Vec<Finding> {
    let mut findings: Vec<Finding> = DANGEROUS_CALLS
        .iter()
        .filter_map(|call| {
            source.find(call).map(|offset| Finding {
                file: file.to_string(),
                line: line_of(source, offset),
                issue: format!("Use of dangerous function: {call}"),
            })
        })
        .collect();

    if secret_regex().is_some_and(|re| re.is_match(source)) {
        findings.push(Finding {
            file: file.to_string(),
            line: UNKNOWN_LINE,
            issue: "Potential hardcoded secret found.".to_string(),
        });
    }
    findings
}

/// Scan `<agent_dir>/agent.py`.
///
/// # Errors
/// Returns error if `agent.py` cannot be read.
pub fn scan_agent_safety(agent_dir: &Path) -> Result<Vec<Finding>, GatewayError> {
    let source = read_agent_source(agent_dir)?;
    Ok(scan_safety(
        &agent_file(agent_dir).display().to_string(),
        &source,
    ))
}

fn line_of(source: &str, offset: usize) -> i64 {
    let newlines = source[..offset].bytes().filter(|b| *b == b'\n').count();
    i64::try_from(newlines).map_or(UNKNOWN_LINE, |n| n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_system_reported_on_its_line() {
        let source = "import os\n\ndef run(cmd):\n    os.system(cmd)\n";
        let findings = scan_safety("agent.py", source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 4);
        assert!(findings[0].issue.contains("os.system("));
        assert_eq!(findings[0].file, "agent.py");
    }

    #[test]
    fn test_first_occurrence_line() {
        let source = "x = eval('1')\ny = eval('2')\nexec(code)\n";
        let findings = scan_safety("a.py", source);
        assert_eq!(findings.len(), 2);
        assert_eq!((findings[0].issue.as_str(), findings[0].line), ("Use of dangerous function: eval(", 1));
        assert_eq!(findings[1].line, 3);
    }

    #[test]
    fn test_secret_pattern_compiles() {
        let re = secret_regex().unwrap();
        assert!(re.is_match("Secret: 'abcdefghijklmnopqr'"));
    }

    #[test]
    fn test_hardcoded_secret() {
        let source = "API_KEY = \"sk-abcdefghijklmnop1234\"\n";
        let findings = scan_safety("a.py", source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, UNKNOWN_LINE);
        assert_eq!(findings[0].issue, "Potential hardcoded secret found.");
    }

    #[test]
    fn test_short_or_env_secret_not_flagged() {
        assert!(scan_safety("a.py", "password = 'short'\n").is_empty());
        assert!(scan_safety("a.py", "api_key = os.environ['KEY']\n").is_empty());
    }

    #[test]
    fn test_clean_source() {
        let source = "root_agent = Agent(tools=[google_search])\n";
        assert!(scan_safety("a.py", source).is_empty());
    }

    #[test]
    fn test_finding_serializes() {
        let finding = Finding {
            file: "a.py".to_string(),
            line: -1,
            issue: "x".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&finding).unwrap(),
            serde_json::json!({"file": "a.py", "line": -1, "issue": "x"})
        );
    }

    #[test]
    fn test_scan_agent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("agent.py"), "exec(payload)\n").unwrap();
        let findings = scan_agent_safety(dir.path()).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].file.ends_with("agent.py"));
    }
}
