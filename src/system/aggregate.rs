use std::collections::{BTreeMap, BTreeSet};

use super::process::ProcessRecord;

/// System and daemon accounts left out of every snapshot unless overridden.
pub const DEFAULT_IGNORED_USERS: [&str; 7] = [
    "avahi", "colord", "dbus", "haveged", "polkitd", "root", "rtkit",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    users: BTreeSet<String>,
}

impl IgnoreSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        DEFAULT_IGNORED_USERS.iter().copied().collect()
    }

    pub fn contains(&self, user: &str) -> bool {
        self.users.contains(user)
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        IgnoreSet {
            users: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AggregateKey {
    pub user: String,
    pub command: String,
}

impl AggregateKey {
    pub fn new(user: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            command: command.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Usage {
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

// ordered so output is stable across runs
pub type AggregateTotals = BTreeMap<AggregateKey, Usage>;

/// Sum cpu% and mem% of all non-ignored records sharing a (user, command).
pub fn aggregate<'a, I>(records: I, ignored: &IgnoreSet) -> AggregateTotals
where
    I: IntoIterator<Item = &'a ProcessRecord>,
{
    let mut totals = AggregateTotals::new();
    for record in records {
        if ignored.contains(&record.user) {
            continue;
        }
        let usage = totals
            .entry(AggregateKey::new(&record.user, &record.command))
            .or_default();
        usage.cpu_percent += record.cpu_percent;
        usage.mem_percent += record.mem_percent;
    }
    totals
}

/// Keep groups whose sums are strictly above both cutoffs.
pub fn apply_cutoffs(totals: AggregateTotals, cpu_cutoff: f64, mem_cutoff: f64) -> AggregateTotals {
    totals
        .into_iter()
        .filter(|(_, usage)| usage.passes(cpu_cutoff, mem_cutoff))
        .collect()
}

impl Usage {
    pub fn passes(&self, cpu_cutoff: f64, mem_cutoff: f64) -> bool {
        let cpu_ok = self.cpu_percent > cpu_cutoff;
        let mem_ok = self.mem_percent > mem_cutoff;
        cpu_ok && mem_ok
    }
}
