use azure_topology_diagram::azure::read_topology_cache;
use azure_topology_diagram::config::{OutputFormat, Settings};
use azure_topology_diagram::output::{print_summary, vm_print};
use azure_topology_diagram::render_topology_with_columns;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let settings = Settings::from_env();
    let raw = read_topology_cache(settings.cache_file.as_deref()).await?;
    let result = render_topology_with_columns(&raw, settings.columns);

    match settings.output_format {
        OutputFormat::Summary => print_summary(&result.topology),
        OutputFormat::Csv => vm_print(&result.topology),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Svg => print!("{}", result.diagram.svg),
    }

    Ok(())
}
