use super::{ListingCommand, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_table_command() -> Option<ListingCommand> {
        // BSD ps has no --no-header; empty column titles suppress the header line
        Some(ListingCommand {
            program: "ps",
            args: &["-A", "-o", "pid=,user=,pcpu=,pmem=,comm="],
        })
    }
}
