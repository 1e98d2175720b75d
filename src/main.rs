use gridcarbon::engine::IntensityEngine;
use gridcarbon::records::csv_file::CsvRecordSource;
use gridcarbon::server;
use gridcarbon::settings;
use gridcarbon::utilities::UtilityRegistry;
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::init();
    let environment_variables = settings::map_from_environment_variables();
    let settings_file_path = settings::make_settings_file_path();
    let settings = match settings::make_settings(&environment_variables, &settings_file_path) {
        Ok(settings) => settings,
        Err(error) => {
            error!("failed to read settings: {}", error);
            return;
        }
    };
    let socket_address = match settings.socket_address() {
        Ok(address) => address,
        Err(error) => {
            error!("bad listen address in settings: {}", error);
            return;
        }
    };
    let registry = match UtilityRegistry::try_new() {
        Ok(registry) => registry,
        Err(error) => {
            error!("broken operator configuration: {}", error);
            return;
        }
    };
    info!("serving harvested records from {}", settings.data_dir);
    let records = Arc::new(CsvRecordSource::new(&settings.data_dir, registry.clone()));
    let engine = Arc::new(IntensityEngine::new(
        registry,
        records,
        settings.factor_feed_url.clone(),
    ));
    let routes = server::api(engine);
    let (address, serving) =
        warp::serve(routes).bind_with_graceful_shutdown(socket_address, async {
            if tokio::signal::ctrl_c().await.is_err() {
                error!("failed to listen for the shutdown signal");
            }
        });
    info!("server started at {}", address);
    serving.await;
    info!("server has been shut down");
}
