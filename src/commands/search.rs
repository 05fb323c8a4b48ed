use anyhow::Result;

use crate::core::search;
use crate::ui::search_display;

pub struct SearchOptions {
    pub pattern: String,
    pub file: String,
    pub case_sensitive: bool,
    pub context: usize,
    pub json: bool,
}

pub fn run(options: SearchOptions) -> Result<()> {
    let engine_options = search::SearchOptions {
        case_sensitive: options.case_sensitive,
        context_lines: options.context,
    };

    let result = search::search(&options.file, &options.pattern, &engine_options)?;

    if options.json {
        // Same payload the MCP tool returns
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    search_display::display_result(&result);

    Ok(())
}
