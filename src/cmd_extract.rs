//! `abfirst extract` command.

use tracing::info;

use abfirst_config::Config;
use abfirst_core::extract_from_content;

use crate::cli::PageArgs;
use crate::{print_json, read_page};

pub(crate) fn run(config: &Config, args: &PageArgs, blocks: Vec<String>) -> anyhow::Result<()> {
    let page = read_page(args)?;

    let mut extra = config.content.extra_block_names.clone();
    extra.extend(blocks);

    let declared = extract_from_content(&page, &extra);
    info!(tests = declared.len(), "Extracted declared tests");

    print_json(&serde_json::to_value(&declared)?, args.pretty)
}
