use std::path::PathBuf;

use clap::Parser;
use log::info;

use tao::app::App;
use tao::config::Config;
use tao::dictionary::Dictionary;
use tao::error::AppResult;
use tao::logging;
use tao::text::Text;

#[derive(Parser, Debug)]
#[command(
    name = "tao",
    version,
    about = "Read the 道德經 one character at a time"
)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Chapter text to read instead of the bundled one"
    )]
    text: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE", help = "Config file (TOML)")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    logging::init(&config.log)?;

    let text = match &cli.text {
        Some(path) => Text::load(path)?,
        None => Text::bundled()?,
    };
    let dictionary = Dictionary::bundled()?;
    info!(
        "loaded {} chapters and {} dictionary entries",
        text.chapter_count(),
        dictionary.len()
    );

    let mut app = App::new(config, text, Box::new(dictionary))?;
    app.run().await
}
