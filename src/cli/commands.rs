//! CLI command implementations
//!
//! Each command opens the store under the data directory, performs one
//! operation, and prints the outcome. `demo` runs the reference
//! sequence (three published versions, a rollback, a republish, a
//! second rollback) against an in-memory store.

use std::path::Path;

use crate::changelog::MemoryChangelog;
use crate::engine::OptionStore;
use crate::ledger::{SiteId, VersionId};
use crate::resolver::Resolved;

use super::args::Command;
use super::errors::CliResult;

/// Dispatches one parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Register { data, site } => register(&data, SiteId::new(site)),
        Command::Store {
            data,
            site,
            brand,
            product,
            option,
            on_site,
        } => store(
            &data,
            SiteId::new(site),
            brand.as_deref(),
            product.as_deref(),
            option,
            on_site,
        ),
        Command::Fetch {
            data,
            site,
            brand,
            product,
            option,
        } => fetch(&data, SiteId::new(site), &brand, &product, option),
        Command::Publish { data, site } => publish(&data, SiteId::new(site)),
        Command::Rollback { data, site, to } => {
            rollback(&data, SiteId::new(site), VersionId::new(to))
        }
        Command::Demo => demo(),
    }
}

fn register(data: &Path, site: SiteId) -> CliResult<()> {
    let mut store = OptionStore::open(data)?;
    store.register(site)?;
    println!("registered site {}", site);
    Ok(())
}

fn store(
    data: &Path,
    site: SiteId,
    brand: Option<&str>,
    product: Option<&str>,
    option: Option<u64>,
    on_site: bool,
) -> CliResult<()> {
    let mut store = OptionStore::open(data)?;
    let version = store.store(site, brand, product, option, on_site)?;
    println!("stored into site {} draft {}", site, version);
    Ok(())
}

fn fetch(data: &Path, site: SiteId, brand: &str, product: &str, option: u64) -> CliResult<()> {
    let store = OptionStore::open(data)?;
    let resolved = store.fetch(site, brand, product, option)?;
    println!("{}", describe(&resolved));
    Ok(())
}

fn publish(data: &Path, site: SiteId) -> CliResult<()> {
    let mut store = OptionStore::open(data)?;
    let version = store.publish(site)?;
    println!("published site {} {}", site, version);
    Ok(())
}

fn rollback(data: &Path, site: SiteId, target: VersionId) -> CliResult<()> {
    let mut store = OptionStore::open(data)?;
    let version = store.rollback(site, target)?;
    println!("rolled site {} back to {} as {}", site, target, version);
    Ok(())
}

fn describe(resolved: &Resolved) -> String {
    if resolved.is_fallback() {
        format!("on_site = {} (fallback, no fact)", resolved.on_site)
    } else {
        format!(
            "on_site = {} (from {})",
            resolved.on_site,
            resolved.effective_version()
        )
    }
}

fn demo() -> CliResult<()> {
    let changelog = MemoryChangelog::new();
    let mut store = OptionStore::in_memory_with_sink(Box::new(changelog.clone()));
    let site = SiteId::new(8080);

    println!("create the site");
    store.register(site)?;

    println!("store version 1");
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000001), true)?;
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000002), true)?;
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000003), true)?;
    store.publish(site)?;

    println!("store version 2");
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000002), false)?;
    store.publish(site)?;

    println!("store version 3");
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000001), false)?;
    store.publish(site)?;

    println!("current version (version 3):");
    for option in [1000001, 1000002, 1000003] {
        let resolved = store.fetch(site, "ASHLEY", "000111", option)?;
        println!("  option {}: {}", option, describe(&resolved));
    }

    println!("rollback to version 2");
    store.rollback(site, VersionId::new(2))?;
    for option in [1000001, 1000002, 1000003] {
        let resolved = store.fetch(site, "ASHLEY", "000111", option)?;
        println!("  option {}: {}", option, describe(&resolved));
    }

    println!("store version 5");
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000001), true)?;
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000002), true)?;
    store.store(site, Some("ASHLEY"), Some("000111"), Some(1000003), true)?;
    store.publish(site)?;

    println!("rollback to version 3");
    store.rollback(site, VersionId::new(3))?;
    for option in [1000001, 1000002, 1000003] {
        let resolved = store.fetch(site, "ASHLEY", "000111", option)?;
        println!("  option {}: {}", option, describe(&resolved));
    }

    println!("changelog:");
    for line in changelog.describe_all() {
        println!("  {}", line);
    }
    Ok(())
}
