//! Homebrew backend.
//!
//! Formulae are addressed as `[tap/]name[@version]`. A configured tap list
//! is synced on init, pinned versions are enforced with `brew pin`, and a
//! "already installed" complaint from brew counts as success.

use crate::collection::ErrorCollection;
use crate::error::{PakkError, Result};
use crate::exec::{CommandRunner, ExecOptions, SystemRunner};
use crate::handlers::traits::{Outcome, PackageHandler};
use crate::ui;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

pub const NAME: &str = "brew";

static ALREADY_INSTALLED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Error: (.*?) already installed").expect("Invalid regex pattern"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrewConfig {
    /// Additional taps to make available before any formula operation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taps: Vec<String>,
    /// Echo the brew output.
    pub print_command_output: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrewPackage {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl BrewPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tap: None,
            version: None,
        }
    }

    /// Identity for index lookups is the tap-qualified name.
    fn same_formula(&self, other: &BrewPackage) -> bool {
        self.name == other.name && self.tap == other.tap
    }

    /// An unversioned formula (or one on `latest`) tracks upstream.
    fn floating(&self) -> bool {
        match self.version.as_deref() {
            None | Some("latest") => true,
            Some(_) => false,
        }
    }

    /// The argument brew expects: `[tap/]name[@version]`.
    fn formula_arg(&self) -> String {
        let mut arg = String::new();
        if let Some(tap) = &self.tap {
            arg.push_str(tap);
            arg.push('/');
        }
        arg.push_str(&self.name);
        if let Some(version) = &self.version {
            arg.push('@');
            arg.push_str(version);
        }
        arg
    }

    /// Like [`formula_arg`] without the version, for remove/upgrade.
    ///
    /// [`formula_arg`]: BrewPackage::formula_arg
    fn qualified_name(&self) -> String {
        match &self.tap {
            Some(tap) => format!("{}/{}", tap, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for BrewPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula_arg())
    }
}

/// Parse a `[tap/]name[@version]` specifier.
pub fn parse(spec: &str) -> Result<BrewPackage> {
    if spec.matches('@').count() > 1 {
        return Err(PakkError::InvalidSpecifier {
            spec: spec.to_string(),
            reason: "more than one '@'".to_string(),
        });
    }

    let (rest, version) = match spec.rsplit_once('@') {
        None => (spec, None),
        Some((_, "")) => {
            return Err(PakkError::InvalidSpecifier {
                spec: spec.to_string(),
                reason: "empty version".to_string(),
            });
        }
        Some((rest, version)) => (rest, Some(version.to_string())),
    };

    let (tap, name) = match rest.rsplit_once('/') {
        None => (None, rest),
        Some((tap, name)) => (Some(tap.to_string()), name),
    };

    if name.is_empty() {
        return Err(PakkError::InvalidSpecifier {
            spec: spec.to_string(),
            reason: "missing formula name".to_string(),
        });
    }

    Ok(BrewPackage {
        name: name.to_string(),
        tap,
        version,
    })
}

enum Op {
    Install,
    Remove,
    Upgrade,
}

pub struct Brew {
    config: BrewConfig,
    packages: Vec<BrewPackage>,
    runner: Box<dyn CommandRunner>,
}

impl Brew {
    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemRunner))
    }

    pub(crate) fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self {
            config: BrewConfig::default(),
            packages: Vec::new(),
            runner,
        }
    }

    pub fn packages(&self) -> &[BrewPackage] {
        &self.packages
    }

    fn exec_opts(&self) -> ExecOptions {
        ExecOptions {
            working_dir: None,
            echo: self.config.print_command_output || ui::is_verbose(),
        }
    }

    fn brew(&self, args: &[&str]) -> Result<String> {
        let mut argv = vec!["brew".to_string()];
        argv.extend(args.iter().map(|s| s.to_string()));
        self.runner.run(&argv, &self.exec_opts())
    }

    /// Make every configured tap available. Failures here are fatal for
    /// this backend's initialisation.
    fn sync_taps(&self) -> Result<()> {
        for tap in &self.config.taps {
            ui::debug(&format!("brew: ensuring tap {}", tap));
            self.brew(&["tap", tap])?;
        }
        Ok(())
    }

    fn resolve(&self, specs: &[String]) -> (Vec<BrewPackage>, ErrorCollection) {
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

    fn install_one(&self, pkg: &BrewPackage, explicit: bool) -> Result<Option<BrewPackage>> {
        if explicit && self.packages.iter().any(|p| p == pkg) {
            ui::info(&format!("Package {} already installed, nothing to do", pkg));
            return Ok(None);
        }

        ui::info(&format!("📦 Brew\t\tInstalling package {}", pkg));
        match self.brew(&["install", &pkg.formula_arg()]) {
            Ok(_) => {}
            Err(PakkError::CommandFailed { output, .. })
                if ALREADY_INSTALLED_RE.is_match(&output) =>
            {
                ui::info(&format!("Package {} already installed", pkg));
            }
            Err(err) => return Err(err),
        }

        // enforce pins so `brew upgrade` leaves the formula alone
        if pkg.version.is_some() {
            self.brew(&["pin", &pkg.formula_arg()])?;
            ui::success(&format!("📦 Brew\t\tPinned package {}", pkg));
        }

        ui::success(&format!("📦 Brew\t\tInstalled package {}", pkg));
        Ok(Some(pkg.clone()))
    }

    fn remove_one(&self, pkg: &BrewPackage) -> Result<Option<BrewPackage>> {
        ui::info(&format!("📦 Brew\t\tRemoving package {}", pkg));
        self.brew(&["remove", &pkg.qualified_name()])?;
        ui::success(&format!("📦 Brew\t\tRemoved package {}", pkg));
        Ok(Some(pkg.clone()))
    }

    fn upgrade_one(&self, pkg: &BrewPackage, explicit: bool) -> Result<Option<BrewPackage>> {
        let Some(current) = self.packages.iter().find(|p| p.same_formula(pkg)) else {
            return Err(PakkError::NotInIndex(pkg.to_string()));
        };

        if !current.floating() && (!explicit || pkg.version == current.version) {
            ui::info(&format!(
                "Not upgrading {}: version pinned to {}",
                pkg.qualified_name(),
                current.version.as_deref().unwrap_or_default()
            ));
            return Ok(None);
        }

        ui::info(&format!("📦 Brew\t\tUpgrading package {}", pkg));
        if pkg.version.is_some() {
            // retargeting a pin means installing the new versioned formula
            self.brew(&["install", &pkg.formula_arg()])?;
            self.brew(&["pin", &pkg.formula_arg()])?;
        } else {
            self.brew(&["upgrade", &pkg.qualified_name()])?;
        }
        ui::success(&format!("📦 Brew\t\tUpgraded package {}", pkg));
        Ok(Some(pkg.clone()))
    }

    fn add_to_index(&mut self, pkg: BrewPackage) {
        match self.packages.iter_mut().find(|p| p.same_formula(&pkg)) {
            Some(existing) => *existing = pkg,
            None => self.packages.push(pkg),
        }
    }

    fn remove_from_index(&mut self, pkg: &BrewPackage) {
        if let Some(idx) = self.packages.iter().position(|p| p.same_formula(pkg)) {
            self.packages.remove(idx);
        }
    }

    fn upgrade_index(&mut self, pkg: BrewPackage) {
        if self.packages.iter().any(|p| p.same_formula(&pkg)) {
            self.add_to_index(pkg);
        }
    }
}

impl Default for Brew {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageHandler for Brew {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init(&mut self, settings: Option<&Value>, packages: Option<&Value>) -> Result<()> {
        if let Some(settings) = settings {
            self.config = serde_json::from_value(settings.clone()).map_err(|e| {
                PakkError::ConfigError(format!("could not parse brew settings: {}", e))
            })?;
            ui::debug(&format!("brew: loaded settings {:?}", self.config));
        }

        if let Some(packages) = packages {
            self.packages = serde_json::from_value(packages.clone()).map_err(|e| {
                PakkError::ConfigError(format!("could not parse brew package index: {}", e))
            })?;
            ui::debug(&format!("brew: loaded {} packages", self.packages.len()));
        }

        self.sync_taps()
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
        which::which("brew").is_ok()
    }
}
