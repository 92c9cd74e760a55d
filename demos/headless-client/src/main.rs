use lumen::prelude::*;

// ---------------------------------------------------------------------------
// Headless client: connects, applies server replies, logs what it saw.
//
//   headless-client [config.json]
// ---------------------------------------------------------------------------

fn load_config() -> Result<ClientConfig, LumenError> {
    match std::env::args().nth(1) {
        Some(path) => ClientConfig::load(path),
        None => Ok(ClientConfig::default()),
    }
}

fn summarize(world: &GameWorld) {
    tracing::info!(
        player = ?world.player_id(),
        location = ?world.player().location(),
        characters = world.characters.len(),
        tiles = world.map.len(),
        map_complete = world.map.is_complete(),
        chat_lines = world.interface.chat().count(),
        "world summary"
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    lumen::logging::init(&config.log_filter);

    let mut world = GameWorld::new();
    // No GUI here: let interface replies through straight away.
    world.interface.set_ready(true);

    let mut client = ClientRuntime::connect(&config, world).await?;

    tokio::select! {
        _ = client.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
        }
    }
    client.shutdown().await;

    let stats = client.dispatcher().stats();
    tracing::info!(
        reason = client.disconnect_reason().unwrap_or("unknown"),
        succeeded = stats.succeeded,
        failed = stats.failed,
        abandoned = stats.abandoned,
        "session ended"
    );
    summarize(client.world());
    Ok(())
}
