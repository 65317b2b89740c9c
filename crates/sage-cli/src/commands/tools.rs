//! `sage tools`: print the tool definitions handed to the model.

use anyhow::Result;
use sage_tools::ToolRegistry;

pub(crate) fn print_definitions() -> Result<()> {
    let definitions = ToolRegistry::with_defaults().all_definitions();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}
