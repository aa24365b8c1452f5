//! Type-safe arguments for host inspection tools.

use crate::tool_traits::ToolArgs;

/// `stat -f %Su /dev/console`: prints the user owning the console.
#[derive(Debug, Clone, Default)]
pub struct ConsoleUserArgs;

impl ToolArgs for ConsoleUserArgs {
    fn program(&self) -> String {
        super::STAT.to_string()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["-f".to_string(), "%Su".to_string(), "/dev/console".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_user_args() {
        let args = ConsoleUserArgs;
        assert_eq!(args.program(), "/usr/bin/stat");
        assert_eq!(args.to_cli_args(), vec!["-f", "%Su", "/dev/console"]);
    }
}
