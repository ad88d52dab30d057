//! Built-in publish profiles used by `--embedded`.

const PROFILE_TEMPLATE: &str = include_str!("../../templates/publish-profile.pubxml");

/// One built-in profile: a runtime identifier and a deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedProfile {
    pub name: &'static str,
    pub runtime: &'static str,
    pub self_contained: bool,
}

const fn profile(
    name: &'static str,
    runtime: &'static str,
    self_contained: bool,
) -> EmbeddedProfile {
    EmbeddedProfile {
        name,
        runtime,
        self_contained,
    }
}

/// Windows, macOS and Linux on x64 and ARM64, each self-contained and framework-dependent.
pub const EMBEDDED_PROFILES: [EmbeddedProfile; 12] = [
    profile("win-x64", "win-x64", true),
    profile("win-x64-framework-dependent", "win-x64", false),
    profile("win-arm64", "win-arm64", true),
    profile("win-arm64-framework-dependent", "win-arm64", false),
    profile("linux-x64", "linux-x64", true),
    profile("linux-x64-framework-dependent", "linux-x64", false),
    profile("linux-arm64", "linux-arm64", true),
    profile("linux-arm64-framework-dependent", "linux-arm64", false),
    profile("osx-x64", "osx-x64", true),
    profile("osx-x64-framework-dependent", "osx-x64", false),
    profile("osx-arm64", "osx-arm64", true),
    profile("osx-arm64-framework-dependent", "osx-arm64", false),
];

impl EmbeddedProfile {
    /// File name of the descriptor, e.g. `linux-x64.pubxml`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, super::locator::PROFILE_EXTENSION)
    }

    /// Render the descriptor XML.
    pub fn render(&self) -> String {
        PROFILE_TEMPLATE
            .replace("{{NAME}}", self.name)
            .replace("{{RUNTIME}}", self.runtime)
            .replace(
                "{{SELF_CONTAINED}}",
                if self.self_contained { "true" } else { "false" },
            )
    }
}
