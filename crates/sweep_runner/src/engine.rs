use std::time::Instant;

use anyhow::{Context, Result};
use sweep_collector::{match_affected, resolve_suite};
use sweep_logging::time::format_duration;
use sweep_metadata::SuiteConfig;
use sweep_report::{ReportParser, TestResult};
use sweep_system::System;

use crate::{Invocation, RunContext, aggregate, dispatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// Results of every test file, in discovery order.
    Completed(Vec<TestResult>),

    /// The suite description selects no test files.
    NoTests,
}

pub trait TestEngine {
    fn run(&self) -> Result<EngineOutcome>;
}

/// Runs every test file a suite description selects, one runner process per file.
#[derive(Debug)]
pub struct SuiteEngine<S, P> {
    system: S,
    context: RunContext,
    parser: P,
}

impl<S: System, P: ReportParser> SuiteEngine<S, P> {
    pub fn new(system: S, context: RunContext, parser: P) -> Self {
        Self {
            system,
            context,
            parser,
        }
    }

    pub const fn context(&self) -> &RunContext {
        &self.context
    }

    fn suite_config(&self) -> Result<SuiteConfig> {
        let Some(suite_file) = self.context.suite_file() else {
            return Ok(SuiteConfig::default());
        };

        SuiteConfig::from_path(suite_file, &self.system)
            .with_context(|| format!("Failed to load the suite description `{suite_file}`"))
    }
}

impl<S: System, P: ReportParser> TestEngine for SuiteEngine<S, P> {
    fn run(&self) -> Result<EngineOutcome> {
        let start_time = Instant::now();
        let project_root = self.context.project_root();

        let config = self.suite_config()?;
        let suite = resolve_suite(&config, project_root);
        let affected = match_affected(&suite.whitelist, self.context.changed_paths(), project_root);

        tracing::debug!(
            tests = suite.tests.len(),
            whitelisted = suite.whitelist.len(),
            affected = affected.len(),
            "Collected files"
        );

        if suite.tests.is_empty() {
            tracing::info!("No test files to run");
            return Ok(EngineOutcome::NoTests);
        }

        let invocation = Invocation {
            binary: self.context.runner_binary(),
            options_file: self.context.runner_options_file(),
            project_root,
        };

        let outcomes = dispatch(suite.tests.as_slice(), &invocation, self.context.coverage())?;
        let results = aggregate(&outcomes, &self.parser, project_root, &affected);

        tracing::info!(
            "Ran {} test files in {}",
            outcomes.len(),
            format_duration(start_time.elapsed())
        );

        Ok(EngineOutcome::Completed(results))
    }
}
