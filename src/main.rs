use std::sync::Arc;

use atelier::{capabilities, config::read_app_config, ui, VoiceAgent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Loading configuration...");
    let app_config = read_app_config();

    println!("Probing speech capabilities...");
    let caps = capabilities::probe(&app_config);
    log::info!(
        "Speech support: recognition={}, synthesis={}",
        caps.stt_ready(),
        caps.tts_ready()
    );

    let mut agent = VoiceAgent::new(caps, &app_config)?;
    agent.start();
    let agent = Arc::new(agent);

    // Journal completed replies while the UI owns the screen
    let mut reply_rx = agent.get_reply_rx();
    tokio::spawn(async move {
        while let Ok(reply) = reply_rx.recv().await {
            log::info!("Reply: {}", reply.replace('\n', " / "));
        }
    });

    // Blocks until the user quits
    let agent_for_ui = agent.clone();
    tokio::task::spawn_blocking(move || ui::run(agent_for_ui)).await??;

    Ok(())
}
