use anyhow::{bail, Context};
use clap::Parser;
use inquire::{error::InquireError, Select};
use serde_json::json;

mod catalog;
mod cli;
mod config;
mod recommender;
mod similarity;
mod storage;
#[cfg(test)]
mod tests;

use catalog::Catalog;
use config::Config;
use recommender::{Recommendation, Recommender};

const BY_TITLE: &str = "By Book Title";
const BY_CATEGORY: &str = "By Category";

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_recommendation(recommendation: &Recommendation) -> anyhow::Result<()> {
    match recommendation {
        Recommendation::Found(items) => println!("{}", serde_json::to_string_pretty(items)?),
        Recommendation::NotFound { message } => {
            println!("{}", json!({ "error": message }))
        }
    }
    Ok(())
}

fn print_heading(recommendation: &Recommendation, heading: String) {
    match recommendation {
        Recommendation::Found(items) => {
            println!("{heading}");
            for item in items {
                println!("  {} ({})", item.book.title, item.book.authors);
            }
        }
        Recommendation::NotFound { message } => println!("{message}"),
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn run_interactive(recommender: &Recommender, top_n: usize) -> anyhow::Result<()> {
    let titles = recommender.titles();
    let categories = recommender.categories();

    loop {
        let mode = match Select::new("Select recommendation type:", vec![BY_TITLE, BY_CATEGORY])
            .prompt()
        {
            Ok(mode) => mode,
            Err(err) if is_cancel(&err) => return Ok(()),
            Err(err) => bail!("An error occurred: {}", err),
        };

        if mode == BY_TITLE {
            let title = match Select::new("Search for a book:", titles.clone()).prompt() {
                Ok(title) => title,
                Err(err) if is_cancel(&err) => continue,
                Err(err) => bail!("An error occurred: {}", err),
            };
            let recommendation = recommender.by_title(title);
            print_heading(&recommendation, format!("Books similar to '{title}':"));
        } else {
            let category = match Select::new("Search for a category:", categories.clone()).prompt()
            {
                Ok(category) => category,
                Err(err) if is_cancel(&err) => continue,
                Err(err) => bail!("An error occurred: {}", err),
            };
            let recommendation = recommender.by_category(category, top_n);
            print_heading(
                &recommendation,
                format!("Top {top_n} books in '{category}' category:"),
            );
        }
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_logging();

    #[cfg(feature = "markdown-docs")]
    if let cli::Command::MarkdownDocs {} = args.command {
        clap_markdown::print_help_markdown::<cli::Args>();
        return Ok(());
    }

    let config = Config::load().context("failed to load config")?;
    let catalog_path = args.catalog.clone().unwrap_or_else(|| config.catalog_path());

    let catalog = Catalog::load(&catalog_path, &config.load_options())
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
    let recommender = Recommender::build(catalog, &config.recommender_options());

    match args.command {
        #[cfg(feature = "markdown-docs")]
        cli::Command::MarkdownDocs {} => Ok(()),

        cli::Command::Title { title } => print_recommendation(&recommender.by_title(&title)),

        cli::Command::Category { category, top_n } => {
            let top_n = top_n.map(usize::from).unwrap_or(config.category_top_n);
            print_recommendation(&recommender.by_category(&category, top_n))
        }

        cli::Command::Titles {} => {
            println!("{}", serde_json::to_string_pretty(&recommender.titles())?);
            Ok(())
        }

        cli::Command::Categories {} => {
            println!("{}", serde_json::to_string_pretty(&recommender.categories())?);
            Ok(())
        }

        cli::Command::Interactive {} => run_interactive(&recommender, config.category_top_n),
    }
}
