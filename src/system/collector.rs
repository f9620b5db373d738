use std::process::{Command, Stdio};

use sysinfo::System;

use super::aggregate::{IgnoreSet, aggregate, apply_cutoffs};
use super::memory::TotalMemory;
use super::platform;
use super::process::parse_process_table;
use super::project::resolve_projects;
use super::snapshot::{Snapshot, build_rows, capture_timestamp};
use crate::error::{SnapshotError, SourceError};

/// Raw `pid user pcpu pmem command` listing of every process on the host.
pub trait ProcessTableSource {
    fn process_table(&self) -> Result<String, SourceError>;
}

/// Raw `project,user` lines for jobs the scheduler has placed on `host`.
pub trait ProjectSource {
    fn project_listing(&self, host: &str) -> Result<String, SourceError>;
}

/// Physical memory in bytes, `None` when the host cannot tell.
pub trait MemorySizeSource {
    fn total_memory_bytes(&self) -> Option<u64>;
}

#[derive(Debug, Default)]
pub struct PsCommand;

impl ProcessTableSource for PsCommand {
    fn process_table(&self) -> Result<String, SourceError> {
        let cmd = platform::process_table_command().ok_or(SourceError::Unsupported)?;
        run_command(cmd.program, cmd.args.iter().copied(), &cmd.display())
    }
}

/// Queries Slurm's `squeue` for accounts with jobs on a node.
#[derive(Debug, Default)]
pub struct SqueueCommand;

impl ProjectSource for SqueueCommand {
    fn project_listing(&self, host: &str) -> Result<String, SourceError> {
        // %a account (project), %u user
        let nodelist = format!("--nodelist={host}");
        let args = ["--noheader", nodelist.as_str(), "--format=%a,%u"];
        let label = format!("squeue {}", args.join(" "));
        run_command("squeue", args, &label)
    }
}

#[derive(Debug, Default)]
pub struct SysinfoMemory;

impl MemorySizeSource for SysinfoMemory {
    fn total_memory_bytes(&self) -> Option<u64> {
        let mut sys = System::new();
        sys.refresh_memory();
        match sys.total_memory() {
            0 => None,
            bytes => Some(bytes),
        }
    }
}

pub fn system_host_name() -> Option<String> {
    System::host_name()
}

fn run_command<'a, I>(program: &str, args: I, label: &str) -> Result<String, SourceError>
where
    I: IntoIterator<Item = &'a str>,
{
    tracing::debug!(command = %label, "running provider command");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| SourceError::Spawn {
            command: label.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(SourceError::Exit {
            command: label.to_string(),
            status: output.status,
        });
    }

    String::from_utf8(output.stdout).map_err(|_| SourceError::Utf8 {
        command: label.to_string(),
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotSettings {
    pub cpu_cutoff: f64,
    pub mem_cutoff: f64,
    pub ignored_users: IgnoreSet,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        SnapshotSettings {
            cpu_cutoff: 0.5,
            mem_cutoff: 0.0,
            ignored_users: IgnoreSet::builtin(),
        }
    }
}

/// Runs the snapshot pipeline against a set of providers.
pub struct Collector {
    process_table: Box<dyn ProcessTableSource>,
    projects: Box<dyn ProjectSource>,
    memory: Box<dyn MemorySizeSource>,
}

impl Collector {
    pub fn new(
        process_table: Box<dyn ProcessTableSource>,
        projects: Box<dyn ProjectSource>,
        memory: Box<dyn MemorySizeSource>,
    ) -> Self {
        Collector {
            process_table,
            projects,
            memory,
        }
    }

    pub fn system() -> Self {
        Self::new(
            Box::new(PsCommand),
            Box::new(SqueueCommand),
            Box::new(SysinfoMemory),
        )
    }

    pub fn take_snapshot(
        &self,
        host: &str,
        settings: &SnapshotSettings,
    ) -> Result<Snapshot, SnapshotError> {
        self.take_snapshot_with(host, settings, capture_timestamp)
    }

    /// Like [`Collector::take_snapshot`], with the clock supplied by the caller.
    /// The clock is read exactly once, after the process table is in hand.
    pub fn take_snapshot_with<F>(
        &self,
        host: &str,
        settings: &SnapshotSettings,
        clock: F,
    ) -> Result<Snapshot, SnapshotError>
    where
        F: FnOnce() -> String,
    {
        let _span = tracing::debug_span!("collector.take_snapshot", host).entered();

        let raw = self.process_table.process_table()?;
        let timestamp = clock();

        let projects = resolve_projects(self.projects.as_ref(), host);

        let total_memory = TotalMemory::from_reported(self.memory.total_memory_bytes());
        if total_memory == TotalMemory::Unknown {
            tracing::warn!("total memory unknown; memory columns will read 0");
        }

        let records = parse_process_table(&raw)?;
        let totals = aggregate(&records, &settings.ignored_users);
        let groups = totals.len();
        let kept = apply_cutoffs(totals, settings.cpu_cutoff, settings.mem_cutoff);
        tracing::debug!(
            records = records.len(),
            groups,
            kept = kept.len(),
            "aggregated process table"
        );

        let rows = build_rows(&timestamp, host, &kept, &projects, total_memory);
        Ok(Snapshot {
            timestamp,
            host: host.to_string(),
            rows,
        })
    }
}
