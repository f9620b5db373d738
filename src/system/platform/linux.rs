use super::{ListingCommand, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_table_command() -> Option<ListingCommand> {
        // procps: user:30 keeps long usernames from being truncated to a uid
        Some(ListingCommand {
            program: "ps",
            args: &["-e", "--no-header", "-o", "pid,user:30,pcpu,pmem,comm"],
        })
    }
}
