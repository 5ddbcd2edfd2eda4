//! External tool settings for the harness

use std::path::PathBuf;

/// Default build-configuration tool
pub const DEFAULT_CONFIGURE_TOOL: &str = "cmake";
/// Default build tool, run with no arguments in the configured directory
pub const DEFAULT_BUILD_TOOL: &str = "make";
/// Default test executable, relative to the build directory
pub const DEFAULT_TEST_EXECUTABLE: &str = "./test/test";
/// Default `CMAKE_BUILD_TYPE`
pub const DEFAULT_BUILD_TYPE: &str = "DEBUG";

/// Which external tools the pipeline invokes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Build-configuration tool (receives the project path and `-D` settings)
    pub configure_tool: String,
    /// Build tool
    pub build_tool: String,
    /// Test executable; relative paths are resolved against the build directory
    pub test_executable: PathBuf,
    /// Value passed as `CMAKE_BUILD_TYPE`
    pub build_type: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            configure_tool: DEFAULT_CONFIGURE_TOOL.to_string(),
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            test_executable: PathBuf::from(DEFAULT_TEST_EXECUTABLE),
            build_type: DEFAULT_BUILD_TYPE.to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configure_tool(mut self, tool: impl Into<String>) -> Self {
        self.configure_tool = tool.into();
        self
    }

    pub fn with_build_tool(mut self, tool: impl Into<String>) -> Self {
        self.build_tool = tool.into();
        self
    }

    pub fn with_test_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_executable = path.into();
        self
    }

    pub fn with_build_type(mut self, build_type: impl Into<String>) -> Self {
        self.build_type = build_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cmake_make_flow() {
        let config = HarnessConfig::default();
        assert_eq!(config.configure_tool, "cmake");
        assert_eq!(config.build_tool, "make");
        assert_eq!(config.test_executable, PathBuf::from("./test/test"));
        assert_eq!(config.build_type, "DEBUG");
    }

    #[test]
    fn test_builder_overrides() {
        let config = HarnessConfig::new()
            .with_configure_tool("/opt/cmake/bin/cmake")
            .with_build_tool("ninja")
            .with_test_executable("bin/unit_tests")
            .with_build_type("RelWithDebInfo");
        assert_eq!(config.configure_tool, "/opt/cmake/bin/cmake");
        assert_eq!(config.build_tool, "ninja");
        assert_eq!(config.test_executable, PathBuf::from("bin/unit_tests"));
        assert_eq!(config.build_type, "RelWithDebInfo");
    }
}
