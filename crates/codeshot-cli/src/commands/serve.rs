use std::sync::Arc;

use codeshot_agent::CodeShotAgent;
use codeshot_config::CodeShotConfig;
use codeshot_core::Result;

use super::demo::register_demo_funcs;

pub(super) async fn cmd_serve(mut config: CodeShotConfig, listen: Option<String>) -> Result<()> {
    if let Some(listen) = listen {
        config.server.listen = listen;
    }

    let mut agent = CodeShotAgent::from_config(&config)?;
    register_demo_funcs(&mut agent)?;

    println!("CodeShot v{}", env!("CARGO_PKG_VERSION"));
    println!("   Agent: {}", agent.agent_id().unwrap_or("(local)"));
    println!("   Funcs: {}", agent.registry().exposed_names().join(", "));
    println!("   Listening on http://{}", config.server.listen);
    println!();

    let refresh_url = Some(config.platform.refresh_url());
    codeshot_server::start_server(Arc::new(agent), config.server, refresh_url).await
}
