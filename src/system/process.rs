use crate::error::ParseError;

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub user: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub command: String,
}

const FIELD_COUNT: usize = 5;

/// Parse `pid user pcpu pmem command` lines.
///
/// The command is everything after the fourth field, so it may contain
/// whitespace. Lines that do not yield exactly five fields, or whose pid is
/// not a number, are dropped without an error. A bad cpu or mem value is fatal.
pub fn parse_process_table(raw: &str) -> Result<Vec<ProcessRecord>, ParseError> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(line, FIELD_COUNT);
        let [pid, user, cpu, mem, command] = fields.as_slice() else {
            tracing::trace!(line = idx + 1, "dropping short process table line");
            dropped += 1;
            continue;
        };

        let Ok(pid) = pid.parse::<u32>() else {
            tracing::trace!(line = idx + 1, "dropping line without a numeric pid");
            dropped += 1;
            continue;
        };

        let line_no = idx + 1;
        records.push(ProcessRecord {
            pid,
            user: (*user).to_string(),
            cpu_percent: parse_percent(line_no, "cpu", cpu)?,
            mem_percent: parse_percent(line_no, "mem", mem)?,
            command: (*command).to_string(),
        });
    }

    tracing::debug!(records = records.len(), dropped, "parsed process table");
    Ok(records)
}

/// Split on runs of whitespace into at most `max` fields; the last field keeps
/// its inner whitespace.
fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(max);
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest);
            break;
        }
        match rest.split_once(char::is_whitespace) {
            Some((head, tail)) => {
                fields.push(head);
                rest = tail.trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

fn parse_percent(line: usize, field: &'static str, raw: &str) -> Result<f64, ParseError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(invalid(line, field, raw)),
    }
}

fn invalid(line: usize, field: &'static str, raw: &str) -> ParseError {
    ParseError {
        line,
        field,
        value: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32, user: &str, cpu: f64, mem: f64, command: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            user: user.into(),
            cpu_percent: cpu,
            mem_percent: mem,
            command: command.into(),
        }
    }

    #[test]
    fn parses_aligned_ps_output() {
        let text = "
 2011 bob                    10.0  20.0   slack
 2022 bob                    10.0  15.0   chromium
12057 bob                    10.0  15.0   chromium
 2084 alice                  10.0   5.0   slack
";
        let records = parse_process_table(text).unwrap();
        assert_eq!(
            records,
            vec![
                record(2011, "bob", 10.0, 20.0, "slack"),
                record(2022, "bob", 10.0, 15.0, "chromium"),
                record(12057, "bob", 10.0, 15.0, "chromium"),
                record(2084, "alice", 10.0, 5.0, "slack"),
            ]
        );
    }

    #[test]
    fn command_keeps_inner_whitespace() {
        let records = parse_process_table("42213 alice 10.0 5.0 some  app\n").unwrap();
        assert_eq!(records[0].command, "some  app");
    }

    #[test]
    fn short_lines_are_dropped() {
        let text = "1 root 0.0 0.0\n2 bob 1.0 2.0 vim\ngarbage\n";
        let records = parse_process_table(text).unwrap();
        assert_eq!(records, vec![record(2, "bob", 1.0, 2.0, "vim")]);
    }

    #[test]
    fn blank_and_empty_input_yield_nothing() {
        assert!(parse_process_table("").unwrap().is_empty());
        assert!(parse_process_table("\n   \n\t\n").unwrap().is_empty());
    }

    #[test]
    fn non_numeric_cpu_is_fatal() {
        let text = "1 bob 1.0 1.0 ok\n2 bob abc 1.0 broken\n";
        let err = parse_process_table(text).unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 2,
                field: "cpu",
                value: "abc".into(),
            }
        );
    }

    #[test]
    fn non_numeric_mem_is_fatal() {
        let err = parse_process_table("1 bob 1.0 x% cmd").unwrap_err();
        assert_eq!(err.field, "mem");
    }

    #[test]
    fn non_numeric_pid_drops_the_line() {
        let text = "PID USER %CPU %MEM COMMAND\nx bob 1.0 1.0 vim\n7 bob 1.0 1.0 vim\n";
        let records = parse_process_table(text).unwrap();
        assert_eq!(records, vec![record(7, "bob", 1.0, 1.0, "vim")]);
    }

    #[test]
    fn command_keeps_trailing_whitespace() {
        let records = parse_process_table("1 bob 1.0 1.0 cmd   \n2 bob 1.0 1.0 cmd\n").unwrap();
        assert_eq!(records[0].command, "cmd   ");
        assert_eq!(records[1].command, "cmd");
    }

    #[test]
    fn four_fields_with_trailing_space_are_dropped() {
        assert!(parse_process_table("1 root 0.0 0.0   \n").unwrap().is_empty());
    }

    #[test]
    fn nan_and_negative_percentages_are_rejected() {
        assert!(parse_process_table("1 bob nan 1.0 cmd").is_err());
        assert!(parse_process_table("1 bob 1.0 -2.0 cmd").is_err());
    }

    #[test]
    fn split_fields_caps_field_count() {
        assert_eq!(split_fields("  a b  c ", 5), vec!["a", "b", "c"]);
        assert_eq!(split_fields("a b c d e  ", 5), vec!["a", "b", "c", "d", "e  "]);
        assert_eq!(split_fields("a b c d e f", 5), vec!["a", "b", "c", "d", "e f"]);
        assert!(split_fields("   ", 5).is_empty());
    }
}
