/// A process listing command: program plus arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListingCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl ListingCommand {
    pub fn display(&self) -> String {
        let mut out = self.program.to_string();
        for arg in self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

pub trait PlatformExtensions {
    /// Command printing `pid user pcpu pmem comm` per line, without a header.
    fn process_table_command() -> Option<ListingCommand>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use unsupported as platform_impl;

pub fn process_table_command() -> Option<ListingCommand> {
    platform_impl::Platform::process_table_command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let cmd = ListingCommand {
            program: "ps",
            args: &["-e", "-o", "pid"],
        };
        assert_eq!(cmd.display(), "ps -e -o pid");
    }

    #[test]
    fn wrapper_does_not_panic() {
        let _ = process_table_command();
    }
}
