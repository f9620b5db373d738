use super::{ListingCommand, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_table_command() -> Option<ListingCommand> {
        None
    }
}
