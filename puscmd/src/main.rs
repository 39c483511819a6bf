//! PUS command client (puscmd)
//!
//! Resolves command paths against the command tree and prints the queued
//! log messages and packed telecommands.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::{error, info};
use puslib::{Clock, CmdError, CmdResult, DefaultQueueHelper, Dispatcher, QueueEntry};
use serde::Serialize;

mod config;

#[derive(Parser, Debug)]
#[command(name = "puscmd", version, about = "Send PUS telecommands by command path")]
struct Args {
    /// Configuration file (defaults to ./puscmd.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the command tree and exit
    #[arg(short, long)]
    list: bool,

    /// Show node descriptions in the tree listing
    #[arg(short, long)]
    describe: bool,

    /// Deepest tree level shown in the listing
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print the queue as JSON
    #[arg(long)]
    json: bool,

    /// Command paths, e.g. /test/ping
    paths: Vec<String>,
}

/// Queue contents as printed with `--json`
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReportEntry {
    Log {
        message: String,
    },
    Telecommand {
        apid: u16,
        service: u8,
        subservice: u8,
        packet: String,
    },
}

/// Pair queue entries with their packed form
fn build_report(queue: &DefaultQueueHelper) -> CmdResult<Vec<ReportEntry>> {
    let mut packets = queue.packed()?.into_iter();
    let mut report = Vec::with_capacity(queue.len());
    for entry in queue.entries() {
        match entry {
            QueueEntry::Log(message) => report.push(ReportEntry::Log {
                message: message.clone(),
            }),
            QueueEntry::PusTc(tc) => {
                let packet = packets.next().map(hex::encode).unwrap_or_default();
                report.push(ReportEntry::Telecommand {
                    apid: tc.apid.value(),
                    service: tc.service,
                    subservice: tc.subservice,
                    packet,
                });
            }
        }
    }
    Ok(report)
}

/// Queue every path, returning the number which failed. Empty paths are
/// skipped.
fn dispatch_paths<C: Clock>(
    dispatcher: &Dispatcher<C>,
    queue: &mut DefaultQueueHelper,
    paths: &[String],
) -> usize {
    let mut failures = 0;
    for path in paths {
        match dispatcher.pack_pus_telecommands(queue, path) {
            // Already warned about by the resolver
            Ok(()) | Err(CmdError::EmptyPath) => {}
            Err(e) => {
                error!("{}: {}", path, e);
                failures += 1;
            }
        }
    }
    failures
}

fn run(args: &Args) -> CmdResult<usize> {
    let config = config::load(args.config.as_deref())?;
    let dispatcher = Dispatcher::from_config(&config)?;

    if args.list || args.paths.is_empty() {
        print!(
            "{}",
            dispatcher.tree().str_for_tree(args.describe, args.max_depth)
        );
        return Ok(0);
    }

    let mut queue = DefaultQueueHelper::new(config.source_id);
    let failures = dispatch_paths(&dispatcher, &mut queue, &args.paths);

    let report = build_report(&queue)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &report {
            match entry {
                ReportEntry::Log { message } => info!("{}", message),
                ReportEntry::Telecommand { packet, .. } => println!("{}", packet),
            }
        }
    }
    Ok(failures)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(0) => {}
        Ok(failures) => {
            error!("{} command(s) failed", failures);
            exit(1);
        }
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puslib::{ClientConfig, QueueEmitter};

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["puscmd", "--json", "/test/ping", "/test/trigger_event"]);
        assert!(args.json);
        assert!(!args.list);
        assert_eq!(args.paths, vec!["/test/ping", "/test/trigger_event"]);
    }

    #[test]
    fn test_report_pairs_packets() {
        let dispatcher = Dispatcher::from_config(&ClientConfig::default()).unwrap();
        let mut queue = DefaultQueueHelper::new(0);
        dispatcher
            .pack_pus_telecommands(&mut queue, "/test/ping")
            .unwrap();

        let report = build_report(&queue).unwrap();
        assert_eq!(
            report,
            vec![
                ReportEntry::Log {
                    message: "Sending PUS ping telecommand".to_string()
                },
                ReportEntry::Telecommand {
                    apid: 2,
                    service: 17,
                    subservice: 1,
                    packet: "1802c00000062f11010000a7d2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_paths_are_not_failures() {
        let dispatcher = Dispatcher::from_config(&ClientConfig::default()).unwrap();
        let mut queue = DefaultQueueHelper::new(0);
        let paths: Vec<String> = ["", "/", "/test/ping"].iter().map(|p| p.to_string()).collect();
        assert_eq!(dispatch_paths(&dispatcher, &mut queue, &paths), 0);
        assert_eq!(queue.telecommands().count(), 1);

        let paths = vec!["/test/pong".to_string(), "/acs".to_string()];
        assert_eq!(dispatch_paths(&dispatcher, &mut queue, &paths), 2);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_report_log_only() {
        let mut queue = DefaultQueueHelper::new(0);
        queue.add_log_cmd("note");
        let json = serde_json::to_string(&build_report(&queue).unwrap()).unwrap();
        assert_eq!(json, r#"[{"kind":"log","message":"note"}]"#);
    }
}
