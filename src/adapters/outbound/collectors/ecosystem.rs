use crate::inventory::domain::ProjectRoot;
use crate::inventory::services::RootReduction;

/// External step that materializes lock data for a project root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapStep {
    pub program: &'static str,
    pub args: &'static [&'static str],
    /// The manifest the step resolves; nothing is done without it
    pub manifest: &'static str,
    /// Lock files whose presence makes the step unnecessary
    pub satisfied_by: &'static [&'static str],
    /// The file the step is expected to create
    pub produces: &'static str,
}

impl BootstrapStep {
    /// Whether `root` has a manifest but none of the lock files
    pub fn is_needed(&self, root: &ProjectRoot) -> bool {
        root.has_marker(self.manifest) && !root.has_any_marker(self.satisfied_by)
    }
}

/// Static description of one per-project ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ecosystem {
    /// Collector name used in logs, config and `--collector`
    pub name: &'static str,
    /// Identifier handed to the external generator
    pub ecosystem_id: &'static str,
    pub markers: &'static [&'static str],
    pub reduction: RootReduction,
    pub bootstrap: Option<BootstrapStep>,
}

impl Ecosystem {
    pub fn is_marker(&self, file_name: &str) -> bool {
        self.markers.contains(&file_name)
    }
}

pub const CARGO: Ecosystem = Ecosystem {
    name: "cargo",
    ecosystem_id: "rust",
    markers: &["Cargo.toml", "Cargo.lock"],
    reduction: RootReduction::Squash,
    bootstrap: Some(BootstrapStep {
        program: "cargo",
        args: &["generate-lockfile"],
        manifest: "Cargo.toml",
        satisfied_by: &["Cargo.lock"],
        produces: "Cargo.lock",
    }),
};

pub const NPM: Ecosystem = Ecosystem {
    name: "npm",
    ecosystem_id: "npm",
    markers: &["package.json", "package-lock.json", "yarn.lock", "pnpm-lock.yaml"],
    reduction: RootReduction::Preferred {
        file: "package-lock.json",
        manifest: "package.json",
    },
    bootstrap: Some(BootstrapStep {
        program: "npm",
        args: &["install", "--package-lock-only", "--ignore-scripts"],
        manifest: "package.json",
        satisfied_by: &["package-lock.json", "yarn.lock", "pnpm-lock.yaml"],
        produces: "package-lock.json",
    }),
};

pub const GEM: Ecosystem = Ecosystem {
    name: "gem",
    ecosystem_id: "ruby",
    markers: &["Gemfile", "Gemfile.lock"],
    reduction: RootReduction::Preferred {
        file: "Gemfile.lock",
        manifest: "Gemfile",
    },
    bootstrap: Some(BootstrapStep {
        program: "bundle",
        args: &["lock"],
        manifest: "Gemfile",
        satisfied_by: &["Gemfile.lock"],
        produces: "Gemfile.lock",
    }),
};

pub const GO_MODULES: Ecosystem = Ecosystem {
    name: "gomod",
    ecosystem_id: "go",
    markers: &["go.mod", "go.sum"],
    reduction: RootReduction::Squash,
    bootstrap: None,
};

pub const PYTHON: Ecosystem = Ecosystem {
    name: "python",
    ecosystem_id: "python",
    markers: &[
        "pyproject.toml",
        "uv.lock",
        "poetry.lock",
        "Pipfile.lock",
        "requirements.txt",
    ],
    reduction: RootReduction::Squash,
    bootstrap: Some(BootstrapStep {
        program: "uv",
        args: &["lock"],
        manifest: "pyproject.toml",
        satisfied_by: &["uv.lock", "poetry.lock", "Pipfile.lock", "requirements.txt"],
        produces: "uv.lock",
    }),
};

/// Every per-project ecosystem, in registration order
pub const PROJECT_ECOSYSTEMS: &[Ecosystem] = &[CARGO, NPM, GEM, GO_MODULES, PYTHON];
