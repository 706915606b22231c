use codeshot_config::FewShotsValue;

/// Separator between two examples in a few-shot block: a blank line followed
/// by the next query.
const SEPARATOR: &str = "\n\nQ:";
const QUERY_MARKER: &str = "Q:";

/// Few-shots as an agent author supplies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FewShots {
    /// One block of examples separated by blank lines.
    Block(String),
    /// Examples already split, one per element.
    List(Vec<String>),
}

impl FewShots {
    /// The ordered list of examples. A block is split with
    /// [`split_few_shots`]; a list passes through untouched.
    pub fn into_list(self) -> Vec<String> {
        match self {
            FewShots::Block(text) => split_few_shots(&text),
            FewShots::List(list) => list,
        }
    }
}

/// Split a block of few-shots into individual examples.
///
/// Every line is trimmed first, then the text is cut at each blank line that
/// precedes a `Q:`. The marker is put back on every piece except the first,
/// which keeps whatever the block started with. Never fails: text without a
/// separator comes back as a single example.
pub fn split_few_shots(text: &str) -> Vec<String> {
    let normalized = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    let mut pieces = normalized.split(SEPARATOR);
    let mut out: Vec<String> = pieces.next().map(str::to_string).into_iter().collect();
    out.extend(pieces.map(|piece| format!("{QUERY_MARKER}{piece}")));
    out
}

/// Trim one example as a whole, then each of its lines.
pub fn strip_few_shot(few_shot: &str) -> String {
    few_shot
        .trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<&str> for FewShots {
    fn from(text: &str) -> Self {
        FewShots::Block(text.to_string())
    }
}

impl From<String> for FewShots {
    fn from(text: String) -> Self {
        FewShots::Block(text)
    }
}

impl From<Vec<String>> for FewShots {
    fn from(list: Vec<String>) -> Self {
        FewShots::List(list)
    }
}

impl From<Vec<&str>> for FewShots {
    fn from(list: Vec<&str>) -> Self {
        FewShots::List(list.into_iter().map(str::to_string).collect())
    }
}

impl From<FewShotsValue> for FewShots {
    fn from(value: FewShotsValue) -> Self {
        match value {
            FewShotsValue::Text(text) => FewShots::Block(text),
            FewShotsValue::List(list) => FewShots::List(list),
        }
    }
}
