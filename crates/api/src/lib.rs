mod doctor;
mod error;
mod intervention;
mod job_schedulers;
mod notification;
mod person;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, rt::task::JoinHandle, web, App, HttpServer};
use job_schedulers::start_dispatch_job;
use std::net::TcpListener;
use tapp_plus_infra::TappContext;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub use shared::auth::API_KEY_HEADER;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    doctor::configure_routes(cfg);
    intervention::configure_routes(cfg);
    notification::configure_routes(cfg);
    person::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    shutdown: CancellationToken,
    dispatch_job: JoinHandle<()>,
}

impl Application {
    pub async fn new(context: TappContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let shutdown = CancellationToken::new();
        let dispatch_job = start_dispatch_job(context, shutdown.clone());

        Ok(Self {
            server,
            port,
            shutdown,
            dispatch_job,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: TappContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        info!("Listening on port {}", port);

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves until the server is stopped, then lets the dispatch job finish
    /// its current cycle
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        self.shutdown.cancel();
        if let Err(e) = self.dispatch_job.await {
            warn!("The dispatch job did not stop cleanly: {:?}", e);
        }
        res
    }
}
