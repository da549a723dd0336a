use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{
    web,
    App,
    HttpServer,
};
use tracing_actix_web::TracingLogger;
use url::Url;

use crate::app::configuration::{
    ApplicationSettings,
    Settings,
    SubscriberApiSettings,
};
use crate::domain::AppBaseUrl;
use crate::l10n::Localizer;
use crate::routes::*;
use crate::subscriber_client::SubscriberClient;

pub struct PreferenceCenterApp {
    pub server: Result<Server, std::io::Error>,
    pub port: u16,
}

impl PreferenceCenterApp {
    pub async fn from(configuration: Settings) -> Result<PreferenceCenterApp, std::io::Error> {
        let tcp_listener = TcpListener::bind(configuration.application.binding_address())?;
        let port = tcp_listener.local_addr()?.port();
        let subscriber_client = web::Data::new(PreferenceCenterApp::subscriber_client(
            configuration.subscriber_api,
        ));
        let localizer = web::Data::new(PreferenceCenterApp::localizer(&configuration.application));
        let base_url = web::Data::new(AppBaseUrl(configuration.application.base_url.clone()));

        // HttpServer handles all transport level concerns
        let server = HttpServer::new(move || {
            // App is where all the application logic lives: routing, middlewares, request
            // handlers, etc.
            App::new()
                .wrap(TracingLogger::default())
                .route("/health_check", web::get().to(health_check))
                .route("/newsletter/confirm/{token}", web::get().to(confirm))
                // the manage page is only addressable through a tokened link
                .route(
                    "/newsletter/existing",
                    web::get().to(existing_without_token),
                )
                .route("/newsletter/existing/{token}", web::get().to(existing))
                .route("/newsletter/existing/{token}", web::post().to(existing))
                .route("/newsletter/updated", web::get().to(updated))
                .route("/newsletter/updated", web::post().to(updated))
                .route("/newsletter/signup", web::get().to(signup))
                .route("/newsletter/signup", web::post().to(signup))
                .route("/newsletter/recovery", web::get().to(recovery))
                .route("/newsletter/recovery", web::post().to(recovery))
                .app_data(subscriber_client.clone())
                .app_data(localizer.clone())
                .app_data(base_url.clone())
        })
        .backlog(configuration.application.max_pending_connections)
        .listen(tcp_listener)
        .map(HttpServer::run);
        Ok(PreferenceCenterApp { port, server })
    }

    fn subscriber_client(client_config: SubscriberApiSettings) -> SubscriberClient {
        let base_url = Url::parse(&client_config.base_url).unwrap_or_else(|e| {
            panic!(
                "invalid base url: {} for subscriber client: {}",
                client_config.base_url, e
            )
        });

        SubscriberClient::new(base_url, client_config.api_key, client_config.timeout_secs)
            .unwrap_or_else(|e| panic!("error creating subscriber client: {}", e))
    }

    fn localizer(application: &ApplicationSettings) -> Localizer {
        match &application.l10n_dir {
            Some(dir) => Localizer::from_dir(dir)
                .unwrap_or_else(|e| panic!("error loading l10n catalogs from {}: {}", dir, e)),
            None => Localizer::builtin(),
        }
    }
}
