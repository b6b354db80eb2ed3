//! Go toolchain backend.
//!
//! Installs Go binaries with `go get`, tracks them in an index of
//! `url`/`version` pairs and removes them by deleting the binary from
//! `$GOPATH/bin`. This backend is the reference for the batching discipline:
//! parse every specifier, act on every package even when earlier ones fail,
//! and always hand the complete serialized index back to the controller.

use crate::collection::ErrorCollection;
use crate::error::{PakkError, Result};
use crate::exec::{CommandRunner, ExecOptions, SystemRunner};
use crate::handlers::traits::{Outcome, PackageHandler};
use crate::project_identity;
use crate::ui;
use crate::utils::paths;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

pub const NAME: &str = "goget";

/// Floating tags track upstream and are eligible for automatic upgrade.
const LATEST: &str = "latest";
const MASTER: &str = "master";

/// Taken from https://github.com/semver/semver/issues/232 with leading 'v'.
static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-(0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(\.(0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*)?(\+[0-9a-zA-Z-]+(\.[0-9a-zA-Z-]+)*)?$",
    )
    .expect("Invalid regex pattern")
});

/// Version confirmation line in `go get` output.
static EXTRACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^go: extracting (\S+) (\S+)$").expect("Invalid regex pattern"));

/// Major-version suffix in a module URL (`.../v2`).
static MAJOR_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v[0-9]+$").expect("Invalid regex pattern"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoGetConfig {
    /// Directory the `go get` commands run in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// Pass `-u` to update dependencies of installed packages.
    pub update_dependencies: bool,
    /// Echo the `go get` output.
    pub print_command_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoPackage {
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Version observed after the last install or upgrade action. A `~`
    /// prefix marks it as unconfirmed by tool output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<String>,
}

impl Default for GoPackage {
    fn default() -> Self {
        Self {
            url: String::new(),
            version: LATEST.to_string(),
            installed_version: None,
        }
    }
}

impl GoPackage {
    pub fn new(url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            version: version.into(),
            installed_version: None,
        }
    }

    /// Whether the desired version tracks upstream instead of a pin.
    pub fn floating(&self) -> bool {
        self.version == LATEST || self.version == MASTER
    }
}

impl fmt::Display for GoPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        if !self.version.is_empty() {
            write!(f, "@{}", self.version)?;
        }
        Ok(())
    }
}

/// Parse an `identity@version` specifier. Splits on the last `@`; a missing
/// version defaults to `latest`.
pub fn parse(spec: &str) -> Result<GoPackage> {
    if spec.matches('@').count() > 1 {
        return Err(PakkError::InvalidSpecifier {
            spec: spec.to_string(),
            reason: "more than one '@'".to_string(),
        });
    }

    let (url, version) = match spec.rsplit_once('@') {
        None => (spec, LATEST),
        Some((_, "")) => {
            return Err(PakkError::InvalidSpecifier {
                spec: spec.to_string(),
                reason: "empty version".to_string(),
            });
        }
        Some((url, version)) => (url, version),
    };

    if url.is_empty() {
        return Err(PakkError::InvalidSpecifier {
            spec: spec.to_string(),
            reason: "missing package identity".to_string(),
        });
    }

    let pkg = GoPackage::new(url, version);
    if !pkg.floating() && !SEMVER_RE.is_match(&pkg.version) {
        ui::debug(&format!(
            "goget: version {} of {} does not look like a semver tag",
            pkg.version, pkg.url
        ));
    }
    Ok(pkg)
}

/// Determine the installed version from `go get` output. The `extracting`
/// marker line is authoritative; empty output means the requested version
/// was already cached; anything else leaves the version unconfirmed.
fn determine_version(output: &str, pkg: &GoPackage) -> String {
    if output.trim().is_empty() {
        return pkg.version.clone();
    }
    for cap in EXTRACT_RE.captures_iter(output) {
        if &cap[1] == pkg.url {
            return cap[2].to_string();
        }
    }
    format!("~{}", pkg.version)
}

/// Binary name for a module URL, with any major-version suffix stripped.
fn binary_name(url: &str) -> String {
    let url = url.trim_end_matches('/');
    let url = MAJOR_VERSION_RE.replace(url, "");
    match url.rsplit('/').next() {
        Some(name) => name.to_string(),
        None => url.into_owned(),
    }
}

enum Op {
    Install,
    Remove,
    Upgrade,
}

pub struct GoGet {
    config: GoGetConfig,
    packages: Vec<GoPackage>,
    runner: Box<dyn CommandRunner>,
}

impl GoGet {
    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemRunner))
    }

    pub(crate) fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self {
            config: GoGetConfig::default(),
            packages: Vec::new(),
            runner,
        }
    }

    pub fn packages(&self) -> &[GoPackage] {
        &self.packages
    }

    /// Parsed specifiers, or a copy of the whole index when none are given.
    fn resolve(&self, specs: &[String]) -> (Vec<GoPackage>, ErrorCollection) {
        if specs.is_empty() {
            return (self.packages.clone(), ErrorCollection::new());
        }

        let mut failures = ErrorCollection::new();
        let mut packages = Vec::new();
        for spec in specs {
            match parse(spec) {
                Ok(pkg) => packages.push(pkg),
                Err(err) => failures.add(spec.clone(), err),
            }
        }
        (packages, failures)
    }

    fn run_batch(&mut self, op: Op, specs: &[String]) -> Result<Outcome> {
        let explicit = !specs.is_empty();
        let (packages, mut failures) = self.resolve(specs);

        for pkg in packages {
            if ui::interrupted() {
                failures.add(pkg.to_string(), PakkError::Interrupted);
                continue;
            }

            let step = match op {
                Op::Install => self.install_one(&pkg, explicit),
                Op::Remove => self.remove_one(&pkg),
                Op::Upgrade => self.upgrade_one(&pkg, explicit),
            };

            match step {
                // the index only changes once the action reported success
                Ok(Some(processed)) => match op {
                    Op::Install => self.add_to_index(processed),
                    Op::Remove => self.remove_from_index(&processed),
                    Op::Upgrade => self.upgrade_index(processed),
                },
                Ok(None) => {}
                Err(err) => failures.add(pkg.to_string(), err),
            }
        }

        let index = serde_json::to_value(&self.packages)?;
        Ok(Outcome::new(index, failures))
    }

    fn working_dir(&self) -> Result<PathBuf> {
        match &self.config.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_working_dir(),
        }
    }

    fn go_get(&self, pkg: &GoPackage) -> Result<String> {
        let mut argv = vec!["go".to_string(), "get".to_string()];
        if self.config.update_dependencies {
            argv.push("-u".to_string());
        }
        argv.push(pkg.to_string());

        let opts = ExecOptions {
            working_dir: Some(self.working_dir()?),
            echo: self.config.print_command_output || ui::is_verbose(),
        };
        self.runner.run(&argv, &opts)
    }

    /// Install one package. Returns the package to merge into the index, or
    /// `None` when there was nothing to do.
    fn install_one(&self, pkg: &GoPackage, explicit: bool) -> Result<Option<GoPackage>> {
        if explicit && self.has_exact(pkg) {
            ui::info(&format!("Package {} already installed, nothing to do", pkg));
            return Ok(None);
        }

        ui::info(&format!("📦 GoGet\tInstalling package {}", pkg));
        let output = self.go_get(pkg)?;

        let mut installed = pkg.clone();
        installed.installed_version = Some(determine_version(&output, pkg));
        ui::success(&format!("📦 GoGet\tInstalled package {}", pkg));
        Ok(Some(installed))
    }

    /// Remove the binary belonging to one package. Deriving the binary name
    /// from the URL is guesswork, so the deletion asks for confirmation.
    fn remove_one(&self, pkg: &GoPackage) -> Result<Option<GoPackage>> {
        ui::info(&format!("📦 GoGet\tRemoving package {}", pkg));
        let binary = binary_name(&pkg.url);

        let gopath = self.runner.run(
            &["go".to_string(), "env".to_string(), "GOPATH".to_string()],
            &ExecOptions::default(),
        )?;
        let bin_path = PathBuf::from(gopath.trim()).join("bin").join(&binary);

        if !ui::confirm(&format!("Remove binary {} ({})?", binary, bin_path.display())) {
            ui::info(&format!("Skipped removal of {}", pkg));
            return Ok(None);
        }

        fs::remove_file(&bin_path).map_err(|e| PakkError::IoError {
            path: bin_path.clone(),
            source: e,
        })?;
        ui::success(&format!("📦 GoGet\tRemoved package {}", pkg));
        Ok(Some(pkg.clone()))
    }

    /// Upgrade one package, honouring the pinning policy: floating entries
    /// always upgrade, pinned entries only when explicitly retargeted to a
    /// different version.
    fn upgrade_one(&self, pkg: &GoPackage, explicit: bool) -> Result<Option<GoPackage>> {
        let Some(current) = self.find(&pkg.url) else {
            return Err(PakkError::NotInIndex(pkg.to_string()));
        };

        if !current.floating() && (!explicit || pkg.version == current.version) {
            ui::info(&format!(
                "Not upgrading {}: version pinned to {}",
                pkg.url, current.version
            ));
            return Ok(None);
        }

        ui::info(&format!("📦 GoGet\tUpgrading package {}", pkg));
        let output = self.go_get(pkg)?;

        let mut upgraded = pkg.clone();
        upgraded.installed_version = Some(determine_version(&output, pkg));
        ui::success(&format!("📦 GoGet\tUpgraded package {}", pkg));
        Ok(Some(upgraded))
    }

    fn find(&self, url: &str) -> Option<&GoPackage> {
        self.packages.iter().find(|p| p.url == url)
    }

    /// Index entry with the same identity and desired version.
    fn has_exact(&self, pkg: &GoPackage) -> bool {
        self.packages
            .iter()
            .any(|p| p.url == pkg.url && p.version == pkg.version)
    }

    /// Merge by identity: overwrite an existing entry's version, append
    /// otherwise.
    fn add_to_index(&mut self, pkg: GoPackage) {
        match self.packages.iter_mut().find(|p| p.url == pkg.url) {
            Some(existing) => *existing = pkg,
            None => self.packages.push(pkg),
        }
    }

    /// Delete by identity, preserving the order of the other entries.
    /// Unknown identities are a no-op at the index level.
    fn remove_from_index(&mut self, pkg: &GoPackage) {
        if let Some(idx) = self.packages.iter().position(|p| p.url == pkg.url) {
            self.packages.remove(idx);
        }
    }

    /// Update the index only for packages that are already in it.
    fn upgrade_index(&mut self, pkg: GoPackage) {
        if self.find(&pkg.url).is_some() {
            self.add_to_index(pkg);
        }
    }
}

impl Default for GoGet {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageHandler for GoGet {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init(&mut self, settings: Option<&Value>, packages: Option<&Value>) -> Result<()> {
        if let Some(settings) = settings {
            self.config = serde_json::from_value(settings.clone()).map_err(|e| {
                PakkError::ConfigError(format!("could not parse goget settings: {}", e))
            })?;
            ui::debug(&format!("goget: loaded settings {:?}", self.config));
        }

        match packages {
            None => {
                ui::debug("goget: no package index yet, seeding bootstrap package");
                self.packages = vec![GoPackage::new(
                    project_identity::BOOTSTRAP_PACKAGE_URL,
                    LATEST,
                )];
            }
            Some(packages) => {
                self.packages = serde_json::from_value(packages.clone()).map_err(|e| {
                    PakkError::ConfigError(format!("could not parse goget package index: {}", e))
                })?;
                ui::debug(&format!("goget: loaded {} packages", self.packages.len()));
            }
        }
        Ok(())
    }

    fn install(&mut self, specs: &[String]) -> Result<Outcome> {
        self.run_batch(Op::Install, specs)
    }

    fn remove(&mut self, specs: &[String]) -> Result<Outcome> {
        self.run_batch(Op::Remove, specs)
    }

    fn upgrade(&mut self, specs: &[String]) -> Result<Outcome> {
        self.run_batch(Op::Upgrade, specs)
    }

    fn available(&self) -> bool {
        which::which("go").is_ok()
    }
}
