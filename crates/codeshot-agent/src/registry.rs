use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use codeshot_core::{CodeShotError, FuncOutput, Result};

use crate::context::FuncContext;
use crate::validate::FUNC_NAME;

/// A function an agent exposes for invocation by name.
#[async_trait]
pub trait Func: Send + Sync {
    /// Name the Func registers under when no explicit name is given.
    fn name(&self) -> &str;

    /// Run once for one query. Errors are returned to the caller unchanged.
    async fn call(&self, ctx: FuncContext) -> Result<FuncOutput>;
}

/// A [`Func`] backed by an async closure. Build one with [`func_fn`].
pub struct FnFunc<F, Fut> {
    name: String,
    f: F,
    _fut: PhantomData<fn() -> Fut>,
}

/// Wrap an async closure as a [`Func`].
///
/// ```ignore
/// agent.register(func_fn("coin", |_ctx| async { Ok("heads".into()) }))?;
/// ```
pub fn func_fn<F, Fut>(name: impl Into<String>, f: F) -> FnFunc<F, Fut>
where
    F: Fn(FuncContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FuncOutput>> + Send,
{
    FnFunc {
        name: name.into(),
        f,
        _fut: PhantomData,
    }
}

#[async_trait]
impl<F, Fut> Func for FnFunc<F, Fut>
where
    F: Fn(FuncContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FuncOutput>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: FuncContext) -> Result<FuncOutput> {
        (self.f)(ctx).await
    }
}

/// A registered name → Func binding.
#[derive(Clone)]
pub struct FuncEntry {
    func: Arc<dyn Func>,
    /// Whether the entry may be invoked through the API. Hidden entries are
    /// bound (the name is taken) but dispatching them is forbidden.
    exposed: bool,
}

impl FuncEntry {
    pub fn func(&self) -> &Arc<dyn Func> {
        &self.func
    }

    pub fn is_exposed(&self) -> bool {
        self.exposed
    }
}

/// Name → Func table. Append-only: there is no way to unregister.
#[derive(Default)]
pub struct FuncRegistry {
    entries: HashMap<String, FuncEntry>,
}

impl FuncRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the Func's own name. The name is taken as declared,
    /// without a syntax check.
    pub fn register(&mut self, func: impl Func + 'static) -> Result<()> {
        let name = func.name().to_string();
        self.insert(name, Arc::new(func), true)
    }

    /// Register under an explicit name, which must match `^[A-Za-z0-9_]+$`.
    pub fn register_as(&mut self, name: &str, func: impl Func + 'static) -> Result<()> {
        check_name(name)?;
        self.insert(name.to_string(), Arc::new(func), true)
    }

    /// Bind `name` without exposing it over the API.
    pub fn register_hidden(&mut self, name: &str, func: impl Func + 'static) -> Result<()> {
        check_name(name)?;
        self.insert(name.to_string(), Arc::new(func), false)
    }

    fn insert(&mut self, name: String, func: Arc<dyn Func>, exposed: bool) -> Result<()> {
        if self.entries.contains_key(&name) {
            return Err(CodeShotError::DuplicateFunc(name));
        }
        debug!(func = %name, exposed, "registered func");
        self.entries.insert(name, FuncEntry { func, exposed });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&FuncEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| CodeShotError::FuncNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of exposed Funcs, sorted.
    pub fn exposed_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, e)| e.exposed)
            .map(|(n, _)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_name(name: &str) -> Result<()> {
    if FUNC_NAME.is_match(name) {
        Ok(())
    } else {
        Err(CodeShotError::InvalidFuncName(name.to_string()))
    }
}
