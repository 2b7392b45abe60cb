// src/cli.rs
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};

use crate::config::consts::*;
use crate::config::options::PassOptions;
use crate::core::sanitize::excerpt;
use crate::error::Result;
use crate::mapping::TerritoryEntry;
use crate::merge::Change;
use crate::progress::Progress;
use crate::runner::{self, Pass, PassReport};
use crate::store::load_corrections;

#[derive(Debug, Parser)]
#[command(name = "lichen")]
#[command(about = "Build and maintain the photo → First Nation territory mapping")]
pub struct Args {
    /// Mapping document (JSON)
    #[arg(long, global = true, default_value = DEFAULT_MAPPING_FILE)]
    mapping: PathBuf,

    /// Record source (.csv, .tsv or .json)
    #[arg(long, global = true, default_value = DEFAULT_RECORDS_FILE)]
    records: PathBuf,

    /// Extra extraction rules (TOML) layered on the built-in set
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Compute and report without writing the mapping
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print every record as it is examined
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true, default_value = LOG_FILE)]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty mapping document if none exists
    Init,
    /// Extract territories for records not yet mapped
    Extract,
    /// Apply manual corrections (overwrites existing entries)
    Fix {
        /// JSON document: photo_id → {first_nation, full_acknowledgement?}
        #[arg(long, conflicts_with_all = ["id", "nation", "ack"])]
        file: Option<PathBuf>,
        #[arg(long, requires = "nation")]
        id: Option<String>,
        #[arg(long, requires = "id")]
        nation: Option<String>,
        /// Acknowledgement text; synthesized from the nation when omitted
        #[arg(long, requires = "id")]
        ack: Option<String>,
    },
    /// Delete entries by photo id
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Replace whole first_nation values, e.g. theKlahoose=Klahoose
    Rename {
        #[arg(required = true, value_parser = parse_rename)]
        pairs: Vec<(String, String)>,
    },
    /// Re-run stored names through the normalization table
    Normalize,
    /// Report records the mapping does not cover
    Audit {
        /// How many unmapped records to print
        #[arg(long, default_value_t = AUDIT_SAMPLE)]
        limit: usize,
        /// Write the full unmapped list here (.csv or .tsv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Frequency of each first_nation value
    Tally,
}

fn parse_rename(s: &str) -> std::result::Result<(String, String), String> {
    let (old, new) = s.split_once('=').ok_or_else(|| format!("expected OLD=NEW, got {s:?}"))?;
    let (old, new) = (old.trim(), new.trim());
    if old.is_empty() || new.is_empty() {
        return Err(format!("both sides of {s:?} must be non-empty"));
    }
    Ok((s!(old), s!(new)))
}

impl Args {
    fn options(&self) -> PassOptions {
        PassOptions {
            mapping: self.mapping.clone(),
            records: self.records.clone(),
            rules: self.rules.clone(),
            dry_run: self.dry_run,
            log_file: self.log_file.clone(),
        }
    }
}

/// Prints per-record lines when verbose, status lines always.
pub struct ConsoleProgress {
    verbose: bool,
    seen: usize,
    total: usize,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose, seen: 0, total: 0 }
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        if self.verbose { println!("Examining {total} item(s)"); }
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, photo_id: &str, nations: &[String]) {
        self.seen += 1;
        if !self.verbose { return; }
        if nations.is_empty() {
            println!("[{}/{}] {photo_id}: no match", self.seen, self.total);
        } else {
            println!("[{}/{}] {photo_id}: {}", self.seen, self.total, nations.join(NATION_SEP));
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(&args.log_file);
    let opts = args.options();

    let (pass, audit_limit) = match args.command {
        Command::Init => (Pass::Init, 0),
        Command::Extract => (Pass::Extract, 0),
        Command::Fix { file, id, nation, ack } => {
            let corrections = match (file, id, nation) {
                (Some(path), _, _) => load_corrections(&path)?,
                (None, Some(id), Some(nation)) => {
                    let entry = TerritoryEntry { first_nation: nation, full_acknowledgement: ack.unwrap_or_default() };
                    vec![(id, entry)]
                }
                _ => Args::command()
                    .error(ErrorKind::MissingRequiredArgument, "fix needs --file or --id with --nation")
                    .exit(),
            };
            (Pass::Fix(corrections), 0)
        }
        Command::Remove { ids } => (Pass::Remove(ids), 0),
        Command::Rename { pairs } => (Pass::Rename(pairs.into_iter().collect::<BTreeMap<_, _>>()), 0),
        Command::Normalize => (Pass::Renormalize, 0),
        Command::Audit { limit, out } => (Pass::Audit { out }, limit),
        Command::Tally => (Pass::Tally, 0),
    };

    let mut progress = ConsoleProgress::new(args.verbose);
    let report = runner::run(pass, &opts, &mut progress)?;
    print_report(&report, &opts, audit_limit);
    Ok(())
}

fn print_report(report: &PassReport, opts: &PassOptions, audit_limit: usize) {
    print!("{}", render_report(report, opts, audit_limit));
}

fn render_report(report: &PassReport, opts: &PassOptions, audit_limit: usize) -> String {
    let mut out = String::new();
    // fmt::Write into a String cannot fail
    let _ = write_report(&mut out, report, opts, audit_limit);
    out
}

fn write_report(out: &mut String, report: &PassReport, opts: &PassOptions, audit_limit: usize) -> fmt::Result {
    for c in &report.changes {
        match c {
            Change::Added { photo_id, entry } => writeln!(out, "+ {photo_id}: {}", entry.first_nation)?,
            Change::Replaced { photo_id, old, new } => {
                writeln!(out, "~ {photo_id}: {} -> {}", old.first_nation, new.first_nation)?
            }
            Change::Removed { photo_id, old } => writeln!(out, "- {photo_id}: {}", old.first_nation)?,
        }
    }

    if let Some(audit) = &report.audit {
        for (i, u) in audit.unmapped.iter().take(audit_limit).enumerate() {
            writeln!(out, "=== {}: {} ===", i + 1, u.photo_id)?;
            writeln!(out, "  {}", excerpt(&u.description, EXCERPT_CHARS))?;
            writeln!(out, "  hint: {}", u.hint.label())?;
            if !u.would_extract.is_empty() {
                writeln!(out, "  would extract: {}", u.would_extract.join(NATION_SEP))?;
            }
        }
        if audit.unmapped.len() > audit_limit {
            writeln!(out, "... and {} more unmapped records", audit.unmapped.len() - audit_limit)?;
        }
        writeln!(out)?;
        write!(out, "{audit}")?;
    }

    if !report.tally.0.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", report.tally)?;
    }

    if !report.not_found.is_empty() {
        writeln!(out, "not in the mapping: {}", report.not_found.join(", "))?;
    }
    if !report.invalid.is_empty() {
        writeln!(out, "entries with no nation name (fix or remove before writing): {}", report.invalid.join(", "))?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}: {} added, {} replaced, {} removed; {} already mapped, {} unmatched; {} entries",
        report.pass,
        report.count_added(),
        report.count_replaced(),
        report.count_removed(),
        report.skipped_existing,
        report.unmatched,
        report.entries,
    )?;
    if opts.dry_run && !report.changes.is_empty() {
        writeln!(out, "dry run: {} left unchanged", opts.mapping.display())?;
    } else if report.persisted {
        writeln!(out, "wrote {}", opts.mapping.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TerritorialMapping;

    #[test]
    fn rename_pairs_parse() {
        assert_eq!(parse_rename("theKlahoose=Klahoose").unwrap(), (s!("theKlahoose"), s!("Klahoose")));
        assert!(parse_rename("Klahoose").is_err());
        assert!(parse_rename("=Klahoose").is_err());
    }

    #[test]
    fn args_parse_global_options_after_subcommand() {
        let args = Args::try_parse_from(["lichen", "audit", "--limit", "3", "--dry-run", "--mapping", "m.json"]).unwrap();
        assert!(args.dry_run);
        assert_eq!(args.mapping, PathBuf::from("m.json"));
        assert!(matches!(args.command, Command::Audit { limit: 3, out: None }));
    }

    #[test]
    fn fix_file_conflicts_with_inline_entry() {
        assert!(Args::try_parse_from(["lichen", "fix", "--file", "f.json", "--id", "DSC1", "--nation", "Tahltan"]).is_err());
        assert!(Args::try_parse_from(["lichen", "fix", "--id", "DSC1"]).is_err());
        assert!(Args::try_parse_from(["lichen", "fix", "--id", "DSC1", "--nation", "Tahltan"]).is_ok());
    }

    #[test]
    fn every_pass_reports_the_tally() {
        let opts = PassOptions::with_paths("m.json", "r.csv");
        let mapping: TerritorialMapping = [
            (s!("DSC1"), TerritoryEntry::new("Gitxsan")),
            (s!("DSC2"), TerritoryEntry::new("Gitxsan")),
        ]
        .into_iter()
        .collect();

        for pass in ["fix", "remove", "rename", "init"] {
            let report = PassReport { pass, entries: 2, tally: mapping.tally(), ..PassReport::default() };
            let text = render_report(&report, &opts, 0);
            assert!(text.contains(&mapping.tally().to_string()), "{pass}: {text}");
            assert!(text.contains("total"), "{pass}");
        }
    }

    #[test]
    fn report_lists_absent_and_invalid_ids() {
        let opts = PassOptions::with_paths("m.json", "r.csv");
        let report = PassReport {
            pass: "remove",
            not_found: vec![s!("DSC9")],
            invalid: vec![s!("BAD")],
            ..PassReport::default()
        };
        let text = render_report(&report, &opts, 0);
        assert!(text.contains("not in the mapping: DSC9"));
        assert!(text.contains("no nation name (fix or remove before writing): BAD"));
    }

    #[test]
    fn args_definition_is_consistent() {
        Args::command().debug_assert();
    }
}
