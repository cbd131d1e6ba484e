use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::recovery;
use crate::io::{JsonFileStore, LoadSource, SyncCoordinator};
use crate::model::config::BoardConfig;
use crate::model::group::Collection;
use crate::ops::check::{self, CheckError, CheckWarning};
use crate::ops::quick_add::{self, GroupTarget};
use crate::ops::{Change, LinkOrganizer, OpError, search};
use crate::util::logging;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    logging::init_stderr();

    let json = cli.json;
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref());

    let Some(cmd) = cli.command else {
        return Err("no command given (run `lb` without arguments for the panel)".into());
    };

    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(&data_dir, args, json),
        Commands::Groups => cmd_groups(&data_dir, json),
        Commands::Find(args) => cmd_find(&data_dir, args, json),
        Commands::Check(args) => cmd_check(&data_dir, args, json),
        Commands::Recovery(args) => cmd_recovery(&data_dir, args, json),

        // Write commands
        Commands::Add(args) => cmd_add(&data_dir, args, json),
        Commands::Group(group_cmd) => cmd_group(&data_dir, group_cmd.action),
        Commands::Rm(args) => cmd_edit(&data_dir, |board| {
            board.remove_link(args.group, args.link)
        }),
        Commands::Mv(args) => cmd_edit(&data_dir, |board| {
            board.reorder_links(args.group, args.from, args.to)
        }),

        Commands::Config(config_cmd) => cmd_config(&data_dir, config_cmd.action),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A board loaded from the configured store, ready to be written back.
struct Session {
    sync: SyncCoordinator<JsonFileStore>,
    collection: Collection,
    source: LoadSource,
}

fn open_session(data_dir: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    Ok(open_with_config(data_dir, &config))
}

fn open_with_config(data_dir: &Path, config: &BoardConfig) -> Session {
    let sync = SyncCoordinator::new(
        JsonFileStore::new(store_path(data_dir, config)),
        config.store.key.clone(),
        config.defaults.clone(),
    )
    .with_recovery_dir(data_dir);
    let loaded = sync.load();
    if loaded.source == LoadSource::Malformed {
        eprintln!("warning: stored board unreadable, starting from defaults (see `lb recovery`)");
    }
    Session {
        sync,
        collection: loaded.collection,
        source: loaded.source,
    }
}

fn store_path(data_dir: &Path, config: &BoardConfig) -> PathBuf {
    data_dir.join(&config.store.file)
}

/// Edits the user asked for that would change nothing are reported, not
/// treated as failures.
fn report_op_error(e: OpError) -> CmdResult {
    match e {
        OpError::Unchanged | OpError::AtEdge { .. } => {
            println!("no change: {}", e);
            Ok(())
        }
        other => Err(other.into()),
    }
}

/// Load, apply one board operation, write back.
fn cmd_edit<F>(data_dir: &Path, op: F) -> CmdResult
where
    F: FnOnce(&mut LinkOrganizer) -> Result<Change, OpError>,
{
    let mut session = open_session(data_dir)?;
    let mut board = LinkOrganizer::new(session.collection);
    match op(&mut board) {
        Ok(change) => {
            session.sync.commit(board.collection())?;
            if let Change::LinkRemoved {
                group,
                group_removed: true,
                ..
            } = change
            {
                println!("removed empty group {}", group);
            }
            Ok(())
        }
        Err(e) => report_op_error(e),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(data_dir: &Path, args: ListArgs, json: bool) -> CmdResult {
    let session = open_session(data_dir)?;
    let collection = &session.collection;

    let indices: Vec<usize> = match args.group {
        Some(g) if g >= collection.len() => return Err(OpError::NoSuchGroup(g).into()),
        Some(g) => vec![g],
        None => (0..collection.len()).collect(),
    };

    if json {
        let groups: Vec<GroupJson> = indices
            .iter()
            .map(|&i| group_to_json(i, &collection.groups[i]))
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if indices.is_empty() {
        println!("no groups");
        return Ok(());
    }
    for i in indices {
        for line in format_group_listing(i, &collection.groups[i]) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_groups(data_dir: &Path, json: bool) -> CmdResult {
    let session = open_session(data_dir)?;
    let groups = &session.collection.groups;

    if json {
        let summaries: Vec<GroupSummaryJson> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| group_summary_json(i, g))
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for (i, g) in groups.iter().enumerate() {
            println!("{}", format_group_line(i, g));
        }
    }
    Ok(())
}

fn cmd_find(data_dir: &Path, args: FindArgs, json: bool) -> CmdResult {
    let session = open_session(data_dir)?;
    let re = search::build_search_regex(&args.pattern)
        .ok_or_else(|| format!("invalid search pattern: {}", args.pattern))?;
    let hits = find_hits_to_json(
        &session.collection,
        &search::search_links(&session.collection, &re),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        for hit in &hits {
            println!(
                "[{}] {} / {}. {}  {}",
                hit.group, hit.group_title, hit.link, hit.name, hit.url
            );
        }
    }
    Ok(())
}

fn cmd_check(data_dir: &Path, args: CheckArgs, json: bool) -> CmdResult {
    let mut session = open_session(data_dir)?;

    if args.fix {
        let summary = check::fix_collection(&mut session.collection);
        if session.source == LoadSource::Stored {
            session.sync.commit(&session.collection)?;
        }
        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "removed {} groups and {} links",
                summary.groups_removed, summary.links_removed
            );
        }
        return Ok(());
    }

    let result = check::check_collection(&session.collection);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    CheckError::BlankTitle { group } => {
                        println!("  group {} has a blank title", group);
                    }
                    CheckError::BlankName { group, link } => {
                        println!("  [{}] link {} has a blank name", group, link);
                    }
                    CheckError::BlankUrl { group, link } => {
                        println!("  [{}] link {} has a blank url", group, link);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    CheckWarning::EmptyGroup { group, title } => {
                        println!("  group {} \"{}\" has no links", group, title);
                    }
                    CheckWarning::DuplicateUrl { group, link, url } => {
                        println!("  [{}] link {} repeats {}", group, link, url);
                    }
                    CheckWarning::Untrimmed { group, link: None } => {
                        println!("  group {} title has surrounding whitespace", group);
                    }
                    CheckWarning::Untrimmed {
                        group,
                        link: Some(link),
                    } => {
                        println!("  [{}] link {} has surrounding whitespace", group, link);
                    }
                }
            }
        }
        if result.valid && result.warnings.is_empty() {
            println!("board ok");
        }
    }

    if !result.valid {
        return Err(format!("check found {} error(s)", result.errors.len()).into());
    }
    Ok(())
}

fn cmd_recovery(data_dir: &Path, args: RecoveryArgs, json: bool) -> CmdResult {
    if args.clear {
        if recovery::clear_recovery(data_dir)? {
            println!("recovery log cleared");
        } else {
            println!("no recovery log");
        }
        return Ok(());
    }

    let limit = args.limit.unwrap_or(10);
    let entries = recovery::read_recovery_entries(data_dir);

    if json {
        let items: Vec<serde_json::Value> = entries
            .iter()
            .take(limit)
            .map(|e| {
                serde_json::json!({
                    "timestamp": e.timestamp.to_rfc3339(),
                    "category": e.category.to_string(),
                    "description": e.description,
                    "fields": e.fields.iter().cloned().collect::<indexmap::IndexMap<_, _>>(),
                    "body": e.body,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("no recovery entries");
        return Ok(());
    }
    for entry in entries.iter().take(limit) {
        println!(
            "{}  {}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.category,
            entry.description
        );
        for (key, value) in &entry.fields {
            println!("  {}: {}", key, value);
        }
        if !entry.body.is_empty() {
            for line in entry.body.lines() {
                println!("    {}", line);
            }
        }
    }
    if entries.len() > limit {
        println!("({} older entries not shown)", entries.len() - limit);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(data_dir: &Path, args: AddArgs, json: bool) -> CmdResult {
    let config = config_io::read_config(data_dir)?;
    let mut session = open_with_config(data_dir, &config);

    let target = if let Some(title) = args.new_group {
        Some(GroupTarget::New(title))
    } else if let Some(title) = args.group_title {
        Some(GroupTarget::Title(title))
    } else {
        args.group.map(GroupTarget::Index)
    };

    let outcome = quick_add::quick_add(
        &mut session.collection,
        &args.name,
        &args.url,
        target.as_ref(),
        &config.defaults.quick_add_group,
    )?;
    session.sync.commit(&session.collection)?;

    let group = &session.collection.groups[outcome.group];
    if json {
        println!("{}", serde_json::to_string_pretty(&group_to_json(outcome.group, group))?);
    } else if outcome.created_group {
        println!("added to new group [{}] {}", outcome.group, group.title);
    } else {
        println!("added to [{}] {}", outcome.group, group.title);
    }
    Ok(())
}

fn cmd_group(data_dir: &Path, action: GroupAction) -> CmdResult {
    match action {
        GroupAction::Add { title } => cmd_edit(data_dir, |board| board.add_group(&title)),
        GroupAction::Rename { index, title } => {
            cmd_edit(data_dir, |board| board.rename_group(index, &title))
        }
        GroupAction::Rm { index } => cmd_edit(data_dir, |board| board.remove_group(index)),
        GroupAction::Mv { index, direction } => {
            cmd_edit(data_dir, |board| board.move_group(index, direction))
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(data_dir: &Path, action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Show => {
            let config = config_io::read_config(data_dir)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut doc = config_io::read_config_doc(data_dir)?;
            config_io::set_config_value(&mut doc, &key, &value)?;
            config_io::write_config(data_dir, &doc)?;
            println!("{} = {}", key, value);
        }
        ConfigAction::Path => {
            println!("{}", config_io::config_path(data_dir).display());
        }
    }
    Ok(())
}
