//! Rules command implementation

use std::io::Write;

use miette::{IntoDiagnostic, Result};
use tsgate_engine::BuiltinEngine;
use tsgate_engine::presets::{self, PRESET_PREFIX};

pub fn run_rules() -> Result<()> {
    let engine = BuiltinEngine::new();
    let rules = engine.rule_descriptions();
    let width = rules.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Built-in rules:").into_diagnostic()?;
    for (name, description) in &rules {
        writeln!(stdout, "  {:width$}  {}", name, description, width = width).into_diagnostic()?;
    }

    writeln!(stdout).into_diagnostic()?;
    writeln!(stdout, "Presets:").into_diagnostic()?;
    for preset in presets::PRESET_NAMES {
        writeln!(stdout, "  {}{}", PRESET_PREFIX, preset).into_diagnostic()?;
    }

    Ok(())
}
