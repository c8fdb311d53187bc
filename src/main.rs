use anyhow::{Context, Result};
use std::sync::Arc;
use tactile_quiz::catalog::Catalog;
use tactile_quiz::config::Config;
use tactile_quiz::constants::{ERROR_NO_CATALOG, MSG_MENU_HELP};
use tactile_quiz::device::{ConsoleDevice, ConsoleSpeech};
use tactile_quiz::logger::Logger;
use tactile_quiz::quiz::SessionController;
use tactile_quiz::runtime::{QuizRuntime, RuntimeEvent, UiCommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("--init-config") {
        Config::generate_default_config(Config::get_default_config_path()?)?;
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(path) = args.first() {
        config.catalog.path = Some(path.into());
    }

    let logger = Logger::from_config(&config.logging)?;
    logger.install(config.logging.level_filter()?)?;

    let Some(catalog_path) = config.catalog.path.clone() else {
        eprintln!("{}", ERROR_NO_CATALOG);
        eprintln!("\n💡 Pass a catalog JSON file as the first argument or set catalog.path in tactile-quiz.toml");
        return Ok(());
    };
    let catalog = Catalog::load_from_file(&catalog_path)?;
    log::info!("Loaded {} catalog entries from {}", catalog.len(), catalog_path.display());

    let device = Arc::new(ConsoleDevice::new());
    let controller = SessionController::new(Arc::new(catalog), &config);
    let mut runtime = QuizRuntime::new(controller, device.clone(), Arc::new(ConsoleSpeech), &config);

    println!("{}", MSG_MENU_HELP);
    let tx = runtime.sender();
    let categories = runtime.controller().catalog().categories();
    tokio::spawn(async move {
        if let Err(e) = read_commands(tx.clone(), device, categories).await {
            eprintln!("Input error: {e:#}");
        }
        let _ = tx.send(RuntimeEvent::Shutdown);
    });

    runtime.run().await?;
    logger.flush();
    Ok(())
}

/// Read stdin lines: digits are device key codes, words are host commands
async fn read_commands(
    tx: UnboundedSender<RuntimeEvent>,
    device: Arc<ConsoleDevice>,
    categories: Vec<String>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some("quit") | Some("q") => return Ok(()),
            Some("start") => {
                let rest = words.collect::<Vec<_>>().join(" ");
                UiCommand::StartQuiz((!rest.is_empty()).then_some(rest))
            }
            Some("browse") => UiCommand::StartBrowse,
            Some("menu") => UiCommand::EndSession,
            Some("next") => UiCommand::Next,
            Some("prev") => UiCommand::Previous,
            Some("repeat") => UiCommand::RepeatSpeech,
            Some("connect") => UiCommand::Connect,
            Some("disconnect") => UiCommand::Disconnect,
            Some("answer") => UiCommand::Answer(words.collect::<Vec<_>>().join(" ")),
            Some("rate") => match words.next().and_then(|r| r.parse::<f32>().ok()) {
                Some(rate) => UiCommand::SetPlaybackRate(rate),
                None => {
                    println!("Usage: rate <1|2|4>");
                    continue;
                }
            },
            Some("categories") => {
                println!("{}", categories.join(", "));
                continue;
            }
            Some("help") => {
                println!("{}", MSG_MENU_HELP);
                continue;
            }
            Some(_) => {
                if let Err(e) = device.press(line) {
                    println!("{}", e);
                }
                continue;
            }
            None => continue,
        };
        if tx.send(RuntimeEvent::Ui(command)).is_err() {
            break;
        }
    }

    Ok(())
}
