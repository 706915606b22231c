use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use codeshot_agent::{
    CodeShotAgent, FewShots, Func, FuncContext, StorageSettings, func_fn, split_few_shots,
};
use codeshot_config::{CodeShotConfig, FewShotsValue};
use codeshot_core::{AgentQuery, AgentResponse, CodeShotError, FuncOutput, Message};
use serde_json::json;

const BASE_PROMPT: &str = "I am a simple dummy agent.";
const FEW_SHOTS: &str = "
Q: Sample query 1
Ask Func[simple1]: Simple argument
Func[simple1] says: Simple response
A: Simple final response

Q: Sample query 2
Ask Func[simple2]: Simple argument
Func[simple2] says: Simple response
A: Simple final response
";

fn query(text: &str) -> AgentQuery {
    AgentQuery::new(Message::new(text)).with_access_token("fake-token")
}

/// A Func implemented as a struct, counting its invocations.
struct Counting {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Func for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    async fn call(&self, _ctx: FuncContext) -> codeshot_core::Result<FuncOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("counted".into())
    }
}

async fn boom(_ctx: FuncContext) -> codeshot_core::Result<FuncOutput> {
    Err(anyhow::anyhow!("handler exploded").into())
}

async fn whoami(ctx: FuncContext) -> codeshot_core::Result<FuncOutput> {
    let storage = ctx.user_storage()?;
    let token = ctx.query().access_token.clone().unwrap_or_default();
    Ok(format!("{} {}", storage.agent_id(), token).into())
}

fn dummy_agent() -> CodeShotAgent {
    let mut agent = CodeShotAgent::new(BASE_PROMPT, FEW_SHOTS).unwrap();
    agent
        .register(func_fn("simple1", |_ctx: FuncContext| async {
            Ok(FuncOutput::from("Simple response 1"))
        }))
        .unwrap();
    agent
        .register(func_fn("simple2", |_ctx: FuncContext| async {
            Ok(FuncOutput::from(Message::new("Simple response 2")))
        }))
        .unwrap();
    agent
        .register_as(
            "custom",
            func_fn("simple3", |ctx: FuncContext| async move {
                Ok(FuncOutput::from(AgentResponse::text(format!(
                    "custom got {}",
                    ctx.text()
                ))))
            }),
        )
        .unwrap();
    agent
}

// ── Few-shot parsing ───────────────────────────────────────────

#[test]
fn test_split_few_shots_keeps_leading_newline_drops_trailing() {
    assert_eq!(
        split_few_shots(FEW_SHOTS),
        vec![
            "\nQ: Sample query 1\nAsk Func[simple1]: Simple argument\nFunc[simple1] says: Simple response\nA: Simple final response",
            "Q: Sample query 2\nAsk Func[simple2]: Simple argument\nFunc[simple2] says: Simple response\nA: Simple final response",
        ]
    );
}

#[test]
fn test_metadata_strips_examples() {
    let agent = dummy_agent();
    let shots = agent.metadata().few_shots();
    assert_eq!(shots.len(), 2);
    assert!(shots[0].starts_with("Q: Sample query 1"));
    assert!(shots[1].ends_with("A: Simple final response"));
    assert_eq!(agent.metadata().base_prompt(), BASE_PROMPT);
}

#[test]
fn test_list_few_shots_are_used_as_given() {
    let agent = CodeShotAgent::new("p", vec!["Q: a\nA: b", "Q: c\nA: d"]).unwrap();
    assert_eq!(agent.metadata().few_shots(), ["Q: a\nA: b", "Q: c\nA: d"]);
}

#[test]
fn test_invalid_few_shot_rejects_agent() {
    let err = CodeShotAgent::new("p", "Q: a\nAsk Func[f]: x\nA: b").err().unwrap();
    assert!(err.is_configuration());
    assert!(CodeShotAgent::new("", "Q: a\nA: b").is_err());
}

// ── Dispatch ───────────────────────────────────────────────────

#[tokio::test]
async fn test_text_output_is_wrapped() {
    let resp = dummy_agent().dispatch("simple1", query("Howdy")).await.unwrap();
    assert_eq!(resp, AgentResponse::new(Message::new("Simple response 1")));
}

#[tokio::test]
async fn test_message_output_is_wrapped() {
    let resp = dummy_agent().dispatch("simple2", query("Howdy")).await.unwrap();
    assert_eq!(resp.message.text, "Simple response 2");
}

#[tokio::test]
async fn test_custom_name_and_response_passthrough() {
    let agent = dummy_agent();
    let resp = agent.dispatch("custom", query("Howdy")).await.unwrap();
    assert_eq!(resp, AgentResponse::text("custom got Howdy"));
    assert!(matches!(
        agent.dispatch("simple3", query("Howdy")).await,
        Err(CodeShotError::FuncNotFound(_))
    ));
}

#[tokio::test]
async fn test_unknown_func_invokes_nothing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut agent = dummy_agent();
    agent
        .register(Counting {
            calls: calls.clone(),
        })
        .unwrap();

    let err = agent
        .dispatch("does_not_exist", query("x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Func[does_not_exist] doesn't exist");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    agent.dispatch("counting", query("x")).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_hidden_func_is_forbidden_and_not_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut agent = dummy_agent();
    agent
        .register_hidden(
            "_oauth",
            Counting {
                calls: calls.clone(),
            },
        )
        .unwrap();

    let err = agent.dispatch("_oauth", query("x")).await.unwrap_err();
    assert!(matches!(err, CodeShotError::FuncForbidden(ref n) if n == "_oauth"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_int_output_is_type_mismatch() {
    let mut agent = dummy_agent();
    agent
        .register(func_fn("answer", |_ctx: FuncContext| async {
            Ok(FuncOutput::from(json!(42)))
        }))
        .unwrap();

    let err = agent.dispatch("answer", query("x")).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Func[answer] returned unexpected output of type int"
    );
}

#[tokio::test]
async fn test_func_errors_propagate_unchanged() {
    let mut agent = dummy_agent();
    agent
        .register(func_fn("boom", boom))
        .unwrap();

    let err = agent.dispatch("boom", query("x")).await.unwrap_err();
    assert!(matches!(err, CodeShotError::Other(_)));
    assert_eq!(err.to_string(), "handler exploded");
}

#[tokio::test]
async fn test_func_sees_agent_id_and_token() {
    let mut agent = CodeShotAgent::new("p", "Q: a\nA: b")
        .unwrap()
        .with_agent_id(Some("alice/notes".into()))
        .with_storage(StorageSettings::default());
    agent
        .register(func_fn("whoami", whoami))
        .unwrap();

    let resp = agent.dispatch("whoami", query("x")).await.unwrap();
    assert_eq!(resp.message.text, "alice/notes fake-token");
}

// ── Config ─────────────────────────────────────────────────────

#[test]
fn test_agent_from_config() {
    let mut config = CodeShotConfig::default();
    config.agent.agent_id = Some("alice/coin".into());
    config.agent.base_prompt = "I toss coins.".into();
    config.agent.few_shots = Some(FewShotsValue::Text(
        "Q: Toss\nAsk Func[coin]: toss\nFunc[coin] says: heads\nA: Heads!".into(),
    ));
    config.agent.conversational = true;

    let agent = CodeShotAgent::from_config(&config).unwrap();
    assert_eq!(agent.agent_id(), Some("alice/coin"));
    assert!(agent.metadata().conversational());
    assert_eq!(agent.metadata().few_shots().len(), 1);
}

#[test]
fn test_config_few_shots_convert() {
    let list = FewShots::from(FewShotsValue::List(vec!["Q: a\nA: b".into()]));
    assert_eq!(list, FewShots::List(vec!["Q: a\nA: b".into()]));
}
