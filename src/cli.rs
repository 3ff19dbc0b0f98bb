use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Catalog CSV to load instead of the configured one
    #[clap(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate api docs in markdown format
    #[cfg(feature = "markdown-docs")]
    #[clap(hide = true)]
    MarkdownDocs {},

    /// Books similar to a title
    Title {
        /// Exact title, case-insensitive
        title: String,
    },
    /// Top rated books in a category
    Category {
        /// Matched as a case-insensitive substring of the categories field
        category: String,

        /// Number of books to return (config default when omitted)
        #[clap(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..))]
        top_n: Option<u16>,
    },
    /// List every title in the catalog
    Titles {},
    /// List every category in the catalog
    Categories {},
    /// Pick a title or category interactively
    Interactive {},
}
