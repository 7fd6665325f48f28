use actix_web::{App, HttpServer};
use payout_env::logger;
use payout_router::{configs::settings::Settings, routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let conf = Settings::new().expect("failed to load the configuration");
    conf.validate().expect("invalid configuration");

    let _guard = payout_env::setup(&conf.log);

    let server = conf.server.clone();
    let state = AppState::new(conf);

    logger::info!(host = %server.host, port = server.port, "starting payout router");

    HttpServer::new(move || {
        App::new()
            .service(routes::app::Health::server(state.clone()))
            .service(routes::app::PayoutAccounts::server(state.clone()))
            .service(routes::app::Payouts::server(state.clone()))
            .service(routes::app::Webhooks::server(state.clone()))
    })
    .bind((server.host.as_str(), server.port))?
    .workers(server.workers)
    .run()
    .await
}
