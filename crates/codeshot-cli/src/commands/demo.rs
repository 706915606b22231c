//! Funcs registered by `codeshot serve`, matching the few-shots in
//! `demos/codeshot.toml`.

use anyhow::anyhow;
use tracing::debug;

use codeshot_agent::{CodeShotAgent, FuncContext, func_fn};
use codeshot_core::{CodeShotError, FuncOutput, Result};
use codeshot_storage::{StorageValue, to_json_string};

pub fn register_demo_funcs(agent: &mut CodeShotAgent) -> Result<()> {
    agent.register(func_fn("coin", coin))?;
    agent.register(func_fn("genrand", genrand))?;
    agent.register(func_fn("remember", remember))?;
    agent.register(func_fn("recall", recall))?;
    Ok(())
}

async fn coin(_ctx: FuncContext) -> Result<FuncOutput> {
    let side = if rand::random::<bool>() { "heads" } else { "tails" };
    Ok(side.into())
}

/// `"low, high"` → a random integer in `[low, high]`.
async fn genrand(ctx: FuncContext) -> Result<FuncOutput> {
    let (low, high) = parse_range(ctx.text())?;
    Ok(pick_in_range(low, high, rand::random::<u64>()).to_string().into())
}

/// `"key: value"` → store `value` under `key` in the caller's storage.
async fn remember(ctx: FuncContext) -> Result<FuncOutput> {
    let (key, value) = ctx
        .text()
        .split_once(':')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| anyhow!("expected \"key: value\", got {:?}", ctx.text()))?;
    let storage = ctx.user_storage()?;
    storage.set(key, &StorageValue::from(value)).await?;
    debug!(key, "remembered");
    Ok(format!("Remembered {key}.").into())
}

/// `"key"` → what was stored under it, if anything.
async fn recall(ctx: FuncContext) -> Result<FuncOutput> {
    let key = ctx.text().trim();
    let storage = ctx.user_storage()?;
    match storage.get(key).await {
        Ok(StorageValue::String(text)) => Ok(text.into()),
        Ok(other) => Ok(to_json_string(&other)?.into()),
        Err(CodeShotError::KeyNotFound(_)) => Ok(format!("I don't remember {key}.").into()),
        Err(e) => Err(e),
    }
}

fn parse_range(text: &str) -> Result<(i64, i64)> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let (low, high) = compact
        .split_once(',')
        .ok_or_else(|| anyhow!("expected \"low, high\", got {text:?}"))?;
    let low: i64 = low.parse().map_err(|e| anyhow!("bad lower bound {low:?}: {e}"))?;
    let high: i64 = high.parse().map_err(|e| anyhow!("bad upper bound {high:?}: {e}"))?;
    if low > high {
        return Err(anyhow!("empty range {low}..={high}").into());
    }
    Ok((low, high))
}

/// Map a random word onto `[low, high]`.
fn pick_in_range(low: i64, high: i64, random: u64) -> i64 {
    let span = (i128::from(high) - i128::from(low) + 1) as u128;
    let offset = u128::from(random) % span;
    (i128::from(low) + offset as i128) as i64
}
