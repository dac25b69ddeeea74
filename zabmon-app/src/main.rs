/**
 * ZABMON - Point d'entrée du moniteur console Zabbix
 *
 * RÔLE : Assemblage des modules : préférences fichier, scheduler de refresh,
 * rendu console. La boucle d'affichage consomme le canal d'updates du
 * scheduler, Ctrl-C déclenche l'arrêt propre.
 *
 * ARCHITECTURE : Pipeline async (zabmon-core) + front console (owo-colors).
 * UTILITÉ : Suivre les problèmes actifs d'un serveur Zabbix depuis un terminal.
 */
mod file_prefs;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use zabmon_core::prefs::{self, PrefStore};
use zabmon_core::scheduler::Monitor;

use crate::file_prefs::FilePrefs;
use crate::render::Renderer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    info!("📡 Zabmon starting...");

    let store = FilePrefs::load()
        .await
        .context("failed to load preferences")?;
    let store: Arc<dyn PrefStore> = Arc::new(store);

    let renderer = Renderer::new(prefs::theme(store.as_ref()));

    let (monitor, handle, mut updates) = Monitor::new(Arc::clone(&store));
    let scheduler = tokio::spawn(monitor.run());

    // first cycle right away instead of waiting out a full interval
    handle.request_refresh();

    loop {
        tokio::select! {
            maybe_update = updates.recv() => {
                let Some(update) = maybe_update else { break };
                renderer.render(&update);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                handle.shutdown();
                break;
            }
        }
    }

    scheduler.await.context("scheduler task failed")?;
    Ok(())
}
