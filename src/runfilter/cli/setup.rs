use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "runfilter", bin_name = "runfilter", version)]
#[command(
    about = "Inspect and edit test-result filter URLs",
    long_about = "Every command takes the view's current query string (the part of the URL \
                  after '?') and prints what the dashboard would do with it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding config.json
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub config_dir: Option<PathBuf>,

    /// Scope the view to a project
    #[arg(short, long, global = true, value_name = "ID", help_heading = "Options")]
    pub project: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the active filters and pagination
    Show {
        query: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the backend request parameters
    Api {
        query: String,

        /// Send filters as one comma-joined parameter
        #[arg(long)]
        joined: bool,
    },

    /// Set a filter and print the new query
    ///
    /// Several values are joined for `in`. No value removes the filter.
    Set {
        query: String,
        field: String,
        operator: String,
        values: Vec<String>,
    },

    /// Remove a filter and print the new query
    #[command(alias = "rm")]
    Remove { query: String, field: String },

    /// Remove all filters except pinned ones
    Clear { query: String },

    /// Go to a page and print the new query
    Page {
        query: String,
        page: u32,

        /// Change the page size (goes back to page 1 first)
        #[arg(long)]
        size: Option<u32>,
    },

    /// List the operators, or those legal for one field
    #[command(alias = "ops")]
    Operators { field: Option<String> },

    /// Print the effective configuration
    Config {
        /// Write it to config.json
        #[arg(long)]
        save: bool,
    },
}
