use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use ods_cli::config::RunConfig;
use ods_cli::pipeline::{RunReport, run};
use ods_cli::prompt::prompt_role_filter;
use ods_model::RoleFilter;
use ods_search::HttpSearchClient;

use crate::cli::Cli;
use crate::summary::apply_table_style;

/// Build the run configuration, prompting for the role filter if no flag chose one.
pub fn build_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = if cli.legacy {
        RunConfig::legacy()
    } else {
        RunConfig::default()
    };
    if !cli.postcodes.is_empty() {
        config = config.with_postcodes(cli.postcodes.iter().cloned());
    }
    if let Some(url) = &cli.api_url {
        config.api_url.clone_from(url);
    }
    config = config
        .with_output_path(cli.output.clone())
        .with_request_delay(Duration::from_millis(cli.delay_ms));

    if cli.legacy || cli.list_postcodes {
        return Ok(config);
    }
    let filter = if cli.all {
        RoleFilter::None
    } else if let Some(role) = &cli.role {
        RoleFilter::from_input(role)
    } else {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        prompt_role_filter(&mut input, &mut output).context("read role filter")?
    };
    Ok(config.with_role_filter(filter))
}

pub fn run_search(config: &RunConfig) -> Result<RunReport> {
    let client = HttpSearchClient::new(config.api_url.clone()).context("create search client")?;
    info!(url = %client.api_url(), output = %config.output_path.display(), "starting search");
    run(&client, config)
}

pub fn run_list_postcodes(config: &RunConfig) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Postcode prefix"]);
    apply_table_style(&mut table);
    for (index, postcode) in config.postcodes.iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), postcode.clone()]);
    }
    println!("{table}");
}
