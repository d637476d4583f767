/// Built-in collectors
mod ecosystem;
mod github_actions;
mod tool_collector;

pub use ecosystem::{
    BootstrapStep, Ecosystem, CARGO, GEM, GO_MODULES, NPM, PROJECT_ECOSYSTEMS, PYTHON,
};
pub use github_actions::GithubActionsCollector;
pub use tool_collector::ToolCollector;
