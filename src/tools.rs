//! Runtime tool path resolution
//!
//! External tools are resolved through the derivation-to-environment-variable
//! pattern: check `{TOOL}_BIN` first, fall back to PATH-based invocation.
//! Nix wrappers export exact derivation paths via the envvar; development and
//! test environments simply rely on PATH, and tests can point the envvar at a
//! stub.

use std::env;

/// Get the path to an external tool
///
/// Checks the `{TOOL}_BIN` environment variable (uppercase tool name +
/// `_BIN`) and falls back to the tool name itself, which relies on PATH.
pub fn get_tool_path(tool: &str) -> String {
    let env_var = format!("{}_BIN", tool.to_uppercase());
    env::var(&env_var).unwrap_or_else(|_| tool.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tool_path_from_env() {
        env::set_var("REPREPRO_BIN", "/nix/store/abc/bin/reprepro");
        assert_eq!(get_tool_path("reprepro"), "/nix/store/abc/bin/reprepro");
        env::remove_var("REPREPRO_BIN");
    }

    #[test]
    fn test_get_tool_path_fallback() {
        env::remove_var("MISSINGTOOL_BIN");
        assert_eq!(get_tool_path("missingtool"), "missingtool");
    }
}
