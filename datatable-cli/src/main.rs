mod args;
mod config;
mod paths;
mod render;
mod repl;

use std::error::Error;
use std::fs::File;

use clap::Parser;
use datatable_lib::ListClient;
use datatable_lib::TableController;
use datatable_lib::fetch::DataFetcher;
use datatable_lib::view::Table;
use datatable_lib::view::TableHandlers;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::args::Cli;
use crate::config::CliConfig;
use crate::render::TextView;
use crate::repl::Command;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = CliConfig::load(cli.config.as_deref())?.overlay(&cli);
    let client = config.client()?;
    let table_config = config.table()?;
    let query = cli.initial_query(table_config.page_size);

    if let Some(format) = &cli.download {
        let url = DataFetcher::new(client, table_config).export_url(&query, format)?;
        println!("{}", url);
        return Ok(());
    }

    let controller = TableController::with_query(client, table_config, query);
    let mut table = Table::new(controller.clone(), config.layout()?)
        .with_capabilities(config.capabilities())
        .with_handlers(handlers(&controller));

    controller.load();
    run(&mut table).await
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let level = cli.log_level();
    match &cli.log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

/// Row and table callbacks. Forms and deletion live outside this tool, so
/// the handlers only report what a full application would open; delete
/// hides the record locally until the next refresh.
fn handlers(controller: &TableController<ListClient>) -> TableHandlers {
    let remover = controller.clone();
    TableHandlers::new()
        .on_row_click(|record| println!("Open record {}", record.id()))
        .on_edit(|record| println!("Edit record {}", record.id()))
        .on_delete(move |record| {
            if remover.remove_record_optimistically(record.id()).is_some() {
                println!("Removed record {} from view; `refresh` restores the server list", record.id());
            }
        })
        .on_add(|| println!("Create a new record"))
        .on_delete_selected(|ids| {
            let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
            println!("Delete records {}", ids.join(", "));
        })
}

async fn run(table: &mut Table<ListClient>) -> Result<(), Box<dyn Error>> {
    let mut view = TextView::new();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    table.controller().settled().await;
    loop {
        table.render_into(&mut view);
        stdout.write_all(view.take().as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match repl::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", repl::HELP),
            Command::Download(format) => match table.controller().download_url(&format) {
                Ok(url) => println!("{}", url),
                Err(err) => println!("{}", err),
            },
            Command::Intent(intent) => {
                if table.dispatch(intent).is_some() {
                    table.controller().settled().await;
                }
            }
        }
    }

    Ok(())
}
