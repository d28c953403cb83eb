use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use demostat::args::validate_args;
use demostat::{collect_stats, ids, logging, Args, EsClient};

fn main() -> Result<()> {
    let args = Args::parse();
    validate_args(&args)?;
    logging::init(args.verbose)?;

    let ids = ids::read_ids(&args.source)?;
    if ids.is_empty() {
        info!("The input id list is empty");
        println!("The input id list is empty");
        return Ok(());
    }

    info!(
        action = "start",
        component = "pipeline",
        id_count = ids.len(),
        "Starting search"
    );

    let result = EsClient::new(&args.host, args.port, &args.index)
        .and_then(|client| collect_stats(|chunk| client.search_ids(chunk), &ids, args.chunk_size));

    match result {
        Ok(dist) => {
            println!("Soc-demo statistics:\n");
            println!("{}", dist.render()?);
        }
        Err(err) => {
            error!(error = %err, "Error while communicating with the search backend");
            println!("Error while retrieving data from ES");
        }
    }

    Ok(())
}
