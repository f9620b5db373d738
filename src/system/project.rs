use std::collections::HashMap;

use super::collector::ProjectSource;

/// Project reported for users without a scheduler job on this host.
pub const UNKNOWN_PROJECT: &str = "-";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectTable {
    projects: HashMap<String, String>,
}

impl ProjectTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut projects = HashMap::new();
        for (user, project) in pairs {
            // last listing for a user wins
            projects.insert(user, project);
        }
        ProjectTable { projects }
    }

    pub fn project_for(&self, user: &str) -> &str {
        self.projects
            .get(user)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PROJECT)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Parse `project,user` lines from the scheduler into `(user, project)` pairs.
/// Lines that are not exactly two comma-separated fields are skipped.
pub fn parse_project_listing(raw: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(project), Some(user), None) => {
                pairs.push((user.to_string(), project.to_string()));
            }
            _ => tracing::debug!(line, "skipping malformed scheduler line"),
        }
    }
    pairs
}

/// Ask the scheduler which projects have jobs on `host`. An unavailable
/// scheduler gives an empty table, so every lookup yields [`UNKNOWN_PROJECT`].
pub fn resolve_projects(source: &dyn ProjectSource, host: &str) -> ProjectTable {
    let _span = tracing::debug_span!("collector.resolve_projects", host).entered();

    match source.project_listing(host) {
        Ok(raw) => {
            let table = ProjectTable::from_pairs(parse_project_listing(&raw));
            tracing::debug!(users = table.len(), "resolved scheduler projects");
            table
        }
        Err(err) => {
            tracing::warn!(error = %err, "scheduler query failed; projects reported as `-`");
            ProjectTable::empty()
        }
    }
}
