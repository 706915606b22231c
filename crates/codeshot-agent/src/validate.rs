use regex::Regex;
use std::sync::LazyLock;

use codeshot_core::{CodeShotError, Result};

/// Names accepted inside `Func[..]`, and for explicitly named registrations.
pub static FUNC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("func name pattern"));

/// Agent handles may be qualified (`user/handle`) and contain dashes.
static AGENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_/-]+$").expect("agent name pattern"));

/// A line that refers to a Func or another agent: `Ask Func[x]: ...`,
/// `Func[x] says: ...`, `Ask Agent[x]: ...`, `Agent[x] says: ...`.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Ask )?(Func|Agent)\[([^\]]*)\](.*)$").expect("reference pattern")
});

/// What a single few-shot line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Query,
    Response,
    AskFunc,
    FuncSays,
    AskAgent,
    AgentSays,
    /// Anything else: continuation text, free-form notes.
    Text,
}

/// Classify one line, checking the name inside any Func/Agent reference.
///
/// Lines that only look like a reference (`Func[x] is flaky`) are free text.
pub fn classify_line(line: &str) -> std::result::Result<LineKind, String> {
    if line.starts_with("Q:") {
        return Ok(LineKind::Query);
    }
    if line.starts_with("A:") {
        return Ok(LineKind::Response);
    }

    let Some(caps) = REFERENCE.captures(line) else {
        return Ok(LineKind::Text);
    };
    let asks = caps.get(1).is_some();
    let target = &caps[2];
    let name = &caps[3];
    let rest = &caps[4];

    let kind = match (target, asks) {
        ("Func", true) if rest.starts_with(':') => LineKind::AskFunc,
        ("Func", false) if rest.starts_with(" says:") => LineKind::FuncSays,
        ("Agent", true) if rest.starts_with(':') => LineKind::AskAgent,
        ("Agent", false) if rest.starts_with(" says:") => LineKind::AgentSays,
        _ => return Ok(LineKind::Text),
    };

    let name_ok = match target {
        "Func" => FUNC_NAME.is_match(name),
        _ => AGENT_NAME.is_match(name),
    };
    if !name_ok {
        return Err(format!("invalid {target} name {name:?} in line {line:?}"));
    }
    Ok(kind)
}

/// Check the structure of one (already stripped) few-shot example.
fn check_few_shot(few_shot: &str) -> std::result::Result<(), String> {
    if few_shot.is_empty() {
        return Err("few-shot is empty".into());
    }

    let kinds = few_shot
        .lines()
        .map(classify_line)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if kinds.first() != Some(&LineKind::Query) {
        return Err("few-shot must start with a 'Q:' line".into());
    }

    for (i, kind) in kinds.iter().enumerate() {
        let next = kinds.get(i + 1);
        match kind {
            LineKind::AskFunc if next != Some(&LineKind::FuncSays) => {
                return Err("each 'Ask Func' line must be followed by a 'Func says' line".into());
            }
            LineKind::AskAgent if next != Some(&LineKind::AgentSays) => {
                return Err(
                    "each 'Ask Agent' line must be followed by an 'Agent says' line".into(),
                );
            }
            _ => {}
        }
    }

    let last = kinds
        .iter()
        .rev()
        .find(|k| **k != LineKind::Text)
        .copied()
        .unwrap_or(LineKind::Query);
    if last != LineKind::Response {
        return Err(format!(
            "few-shot must end with an 'A:' line, but it ends with {last:?}"
        ));
    }

    let mut expect_query = true;
    for kind in &kinds {
        match kind {
            LineKind::Query if expect_query => expect_query = false,
            LineKind::Response if !expect_query => expect_query = true,
            LineKind::Query | LineKind::Response => {
                return Err("'Q:' and 'A:' lines must alternate".into());
            }
            _ => {}
        }
    }

    Ok(())
}

/// Validate a base prompt and its few-shots; the first problem found is
/// returned as a configuration error naming the offending example.
pub fn validate_agent_spec(base_prompt: &str, few_shots: &[String]) -> Result<()> {
    if base_prompt.trim().is_empty() {
        return Err(CodeShotError::Config("base prompt must not be empty".into()));
    }
    for (index, few_shot) in few_shots.iter().enumerate() {
        check_few_shot(few_shot).map_err(|reason| {
            CodeShotError::Config(format!("few-shot #{index}: {reason}: {few_shot:?}"))
        })?;
    }
    Ok(())
}
