//! CLI argument definitions using clap
//!
//! Commands:
//! - trunkdb register --data <dir> --site <id>
//! - trunkdb store    --data <dir> --site <id> [--brand B] [--product P] [--option O] --on-site <bool>
//! - trunkdb fetch    --data <dir> --site <id> --brand B --product P --option O
//! - trunkdb publish  --data <dir> --site <id>
//! - trunkdb rollback --data <dir> --site <id> --to <version>
//! - trunkdb demo

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// trunkdb - A versioned site-option store
#[derive(Parser, Debug)]
#[command(name = "trunkdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new site
    Register {
        /// Data directory holding the journal
        #[arg(long, default_value = "./trunkdb-data")]
        data: PathBuf,
        /// Site identifier
        #[arg(long)]
        site: u64,
    },

    /// Store a value or fill into the site's draft
    Store {
        #[arg(long, default_value = "./trunkdb-data")]
        data: PathBuf,
        #[arg(long)]
        site: u64,
        /// Brand; omit for a fill over all brands
        #[arg(long)]
        brand: Option<String>,
        /// Product number; omit for a fill over all products
        #[arg(long)]
        product: Option<String>,
        /// Option id; omit for a fill over all options
        #[arg(long)]
        option: Option<u64>,
        /// The on_site setting to store (true or false)
        #[arg(long, action = clap::ArgAction::Set)]
        on_site: bool,
    },

    /// Resolve one concrete key against the published version
    Fetch {
        #[arg(long, default_value = "./trunkdb-data")]
        data: PathBuf,
        #[arg(long)]
        site: u64,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        option: u64,
    },

    /// Publish the site's draft
    Publish {
        #[arg(long, default_value = "./trunkdb-data")]
        data: PathBuf,
        #[arg(long)]
        site: u64,
    },

    /// Roll the site back to a prior published version
    Rollback {
        #[arg(long, default_value = "./trunkdb-data")]
        data: PathBuf,
        #[arg(long)]
        site: u64,
        /// Target version (1 ..= published)
        #[arg(long)]
        to: u64,
    },

    /// Run the reference sequence against an in-memory store
    Demo,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_site_accepts_explicit_true_and_false() {
        for (raw, expected) in [("true", true), ("false", false)] {
            let cli = Cli::try_parse_from([
                "trunkdb", "store", "--site", "1", "--brand", "A", "--product", "P",
                "--option", "1", "--on-site", raw,
            ])
            .unwrap();
            match cli.command {
                Command::Store { on_site, .. } => assert_eq!(on_site, expected),
                other => panic!("expected store command, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_on_site_value_is_required() {
        // A bare flag is not a valid boolean.
        assert!(Cli::try_parse_from([
            "trunkdb", "store", "--site", "1", "--brand", "A", "--product", "P",
            "--option", "1", "--on-site",
        ])
        .is_err());
    }

    #[test]
    fn test_omitted_scope_fields_parse_as_fills() {
        let cli = Cli::try_parse_from([
            "trunkdb", "store", "--site", "8080", "--brand", "ASHLEY", "--on-site", "false",
        ])
        .unwrap();
        match cli.command {
            Command::Store {
                brand,
                product,
                option,
                on_site,
                ..
            } => {
                assert_eq!(brand.as_deref(), Some("ASHLEY"));
                assert_eq!(product, None);
                assert_eq!(option, None);
                assert!(!on_site);
            }
            other => panic!("expected store command, got {:?}", other),
        }
    }
}
