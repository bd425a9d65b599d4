use clap::{Arg, ArgMatches, Command};
use moozi::configuration::{create_config, ConfigFolder};
use moozi::startup::{extract, run, set_language, RunOptions};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let url_arg = || {
        Arg::new("url")
            .long("url")
            .required(true)
            .help("Address of the lyrics page")
    };
    let page_arg = || {
        Arg::new("page")
            .long("page")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Read the page from this HTML file instead of downloading it")
    };

    let args = Command::new("moozi")
        .about("🎵 Understand the lyrics you are reading, line by line 🎵")
        .subcommand(
            Command::new("run")
                .about("🚀 Translate a highlighted passage of a lyrics page")
                .arg(url_arg())
                .arg(page_arg())
                .arg(
                    Arg::new("selection")
                        .long("selection")
                        .required(true)
                        .help("The highlighted lyrics"),
                )
                .arg(
                    Arg::new("language")
                        .long("language")
                        .help("Target language code, remembered for next time"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("🔎 Show the song info found on a page")
                .arg(url_arg())
                .arg(page_arg()),
        )
        .subcommand(
            Command::new("language")
                .about("🌐 Set the language translations are shown in")
                .arg(Arg::new("code").required(true)),
        )
        .subcommand(
            Command::new("config").about("🛠️ Create or update configuration file for moozi"),
        )
        .get_matches();

    match args.subcommand() {
        Some(("run", matches)) => {
            println!("\x1b[1m\x1b[34mReading the selection...\x1b[0m");
            run(ConfigFolder::new()?, run_options(matches)).await?;
        }
        Some(("extract", matches)) => {
            extract(string_arg(matches, "url"), matches.get_one::<PathBuf>("page")).await?;
        }
        Some(("language", matches)) => {
            set_language(ConfigFolder::new()?, string_arg(matches, "code"))?;
        }
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring moozi...\x1b[0m");
            create_config(ConfigFolder::new()?)?;
        }
        _ => print_usage(),
    }

    Ok(())
}

fn string_arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn run_options(matches: &ArgMatches) -> RunOptions {
    RunOptions {
        url: string_arg(matches, "url").to_string(),
        page_file: matches.get_one::<PathBuf>("page").cloned(),
        selection: string_arg(matches, "selection").to_string(),
        language: matches.get_one::<String>("language").cloned(),
    }
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mmoozi run --url <URL> --selection <TEXT>\x1b[0m - 🚀 Translate a selection");
    println!("  \x1b[1m\x1b[32mmoozi extract --url <URL>\x1b[0m                 - 🔎 Show song info");
    println!("  \x1b[1m\x1b[32mmoozi language <CODE>\x1b[0m                     - 🌐 Set target language");
    println!("  \x1b[1m\x1b[32mmoozi config\x1b[0m                              - 🛠️  Create or update configuration file");
    println!("\x1b[33mHighlight, pick a language, read along!\x1b[0m\n");
}
