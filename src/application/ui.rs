#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::sync::mpsc;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::help_text;
use crate::domain::models::Event;
use crate::domain::services::Controller;
use crate::domain::services::EventsService;
use crate::domain::services::SessionStore;
use crate::domain::services::Timings;
use crate::infrastructure::catalog::http::HttpCatalog;
use crate::infrastructure::pages::DocumentPage;
use crate::infrastructure::storage::FileStorage;

async fn write_page(page_file: &path::Path, page: &DocumentPage) -> Result<()> {
    if let Some(parent) = page_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(page_file, page.to_html()).await?;
    return Ok(());
}

async fn start_loop(
    controller: &mut Controller<DocumentPage>,
    events: &mut EventsService<tokio::io::BufReader<tokio::io::Stdin>>,
    page_file: &path::Path,
) -> Result<()> {
    loop {
        match events.next().await? {
            Event::Quit() => {
                break;
            }
            Event::Help() => {
                println!("{}", help_text());
                continue;
            }
            event => {
                // A failed handler leaves the page as it was, the loop keeps going.
                if let Err(err) = controller.handle(event).await {
                    tracing::error!(error = ?err, "failed to handle event");
                    eprintln!("{}", Paint::red(format!("Error: {err}")));
                }
            }
        }

        write_page(page_file, controller.page()).await?;
    }

    return Ok(());
}

pub async fn start() -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let page_file = path::PathBuf::from(Config::get(ConfigKey::PageFile));
    let storage = FileStorage::open(path::PathBuf::from(Config::get(ConfigKey::StoreFile)))?;

    let mut controller = Controller::new(
        Box::<HttpCatalog>::default(),
        SessionStore::new(Box::new(storage)),
        DocumentPage::with_echo(),
        tx,
        Timings::default(),
    );
    let mut events = EventsService::new(rx);

    println!(
        "{} {}\n{}",
        Paint::new("Marquee").bold(),
        Config::get(ConfigKey::ApiURL),
        Paint::new(format!(
            "Page: {}. Type /help for commands.",
            page_file.to_string_lossy()
        ))
        .dimmed()
    );

    controller.start().await?;
    write_page(&page_file, controller.page()).await?;
    start_loop(&mut controller, &mut events, &page_file).await?;

    return Ok(());
}
