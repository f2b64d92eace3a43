use tapp_plus_api::Application;
use tapp_plus_infra::TappContext;
use tapp_plus_sdk::TappPlusSDK;

pub const API_KEY: &str = "integration-test-key";

pub struct TestApp {
    pub address: String,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, TappPlusSDK) {
    let mut ctx = TappContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.api_key = API_KEY.into();
    ctx.config.poll_interval_secs = 1;

    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = TappPlusSDK::new(address.clone(), API_KEY);
    (TestApp { address }, sdk)
}
