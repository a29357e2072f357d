//! Common constants used throughout postgen.

/// Feature flags the built-in template understands.
pub const FLAG_NAMES: [&str; 9] = [
    "docker",
    "sentry",
    "cli",
    "web",
    "api",
    "api_auth",
    "api_lambda",
    "api_versioning",
    "github_actions",
];

/// Context key holding the package name used to build dynamic paths.
pub const PACKAGE_NAME_KEY: &str = "package_name";

/// Manifest schema version this build understands.
pub const MANIFEST_VERSION: u32 = 1;

/// Name pattern of placeholder paths the templating engine materializes for
/// disabled features.
pub const SENTINEL_PATTERN: &str = "_*_disabled";
