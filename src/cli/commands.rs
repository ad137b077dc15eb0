use crate::cli::args::Args;
use crate::cli::output::{ConsoleWriter, OutputWriter, VersionReport};
use crate::core::communication::Connector;
use crate::core::query::VersionQuery;
use crate::core::scan::scan_addresses_with;
use crate::domain::config::{BusAddress, ConnectionConfig, QueryOptions};
use crate::domain::error::{Sys8x00Error, Sys8x00Result};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::SerialConnector;
use crate::infrastructure::tcp::TcpConnector;
use std::path::Path;
use tracing::debug;

/// Execute CLI command
pub async fn execute_command(args: Args) -> Sys8x00Result<()> {
    let writer = ConsoleWriter::new(args.output);

    let config_manager = ConfigManager::new();
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(Path::new(config_path))?
    } else {
        config_manager.load_config()?
    };

    if !args.quiet {
        init_logging(&config.defaults.log_level, args.verbose)?;
    }
    if let Some(path) = config_manager.get_project_config_path() {
        debug!("Project configuration found at {}", path.display());
    }

    if args.list_ports {
        return execute_list_ports(&writer);
    }

    let connection = args.connection(&config.defaults)?;
    let options = config.defaults.query_options(args.timeout)?;

    match &connection {
        ConnectionConfig::Serial { .. } => {
            let connector = SerialConnector::from_config(&connection)?;
            execute_with(connector, &connection, &args, options, &writer).await
        }
        ConnectionConfig::Tcp { .. } => {
            let connector = TcpConnector::from_config(&connection)?;
            execute_with(connector, &connection, &args, options, &writer).await
        }
    }
}

async fn execute_with<C: Connector>(
    connector: C,
    connection: &ConnectionConfig,
    args: &Args,
    options: QueryOptions,
    writer: &ConsoleWriter,
) -> Sys8x00Result<()> {
    let query = VersionQuery::new(connector, options);

    if args.scan {
        execute_scan(&query, connection, writer).await
    } else {
        execute_query(&query, connection, args.address()?, writer).await
    }
}

async fn execute_query<C: Connector>(
    query: &VersionQuery<C>,
    connection: &ConnectionConfig,
    address: Option<BusAddress>,
    writer: &ConsoleWriter,
) -> Sys8x00Result<()> {
    writer.write_message(&format!("Querying version via {}", connection))?;
    if let Some(address) = address {
        writer.write_message(&format!("Addressing power supply: {}", address.value()))?;
    }

    match query.try_query(address).await {
        Ok(response) => {
            writer.write_version(&VersionReport::new(connection, address, response))?;
            Ok(())
        }
        Err(e) => {
            let label = query.connector().transport_type().label();
            debug!("Query failed: {:?}", e);
            writer.write_error(&format!("{} communication error: {}", label, e))?;
            Err(Sys8x00Error::QueryFailed)
        }
    }
}

async fn execute_scan<C: Connector>(
    query: &VersionQuery<C>,
    connection: &ConnectionConfig,
    writer: &ConsoleWriter,
) -> Sys8x00Result<()> {
    writer.write_message(&format!("Scanning all addresses via {}", connection))?;

    let mut progress_error = None;
    let report = scan_addresses_with(query, |event| {
        if let Err(e) = writer.write_scan_progress(&event) {
            progress_error.get_or_insert(e);
        }
    })
    .await;

    if let Some(e) = progress_error {
        return Err(e.into());
    }

    writer.write_scan(&report)?;

    if report.is_empty() {
        return Err(Sys8x00Error::NoUnitsFound);
    }
    Ok(())
}

fn execute_list_ports(writer: &ConsoleWriter) -> Sys8x00Result<()> {
    let ports: Vec<String> = serialport::available_ports()?
        .into_iter()
        .map(|port| port.port_name)
        .collect();

    writer.write_ports(&ports)?;
    Ok(())
}
