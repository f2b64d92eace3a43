use crate::error::TappError;
use actix_web::HttpRequest;
use tapp_plus_infra::TappContext;

pub const API_KEY_HEADER: &str = "tapp-api-key";

/// Only clients knowing the configured api key are allowed through
pub fn protect_route(http_req: &HttpRequest, ctx: &TappContext) -> Result<(), TappError> {
    let api_key = match http_req.headers().get(API_KEY_HEADER) {
        Some(key) => key.to_str().map_err(|_| {
            TappError::Unauthorized(format!("Malformed `{}` header", API_KEY_HEADER))
        })?,
        None => {
            return Err(TappError::Unauthorized(format!(
                "Missing the `{}` header",
                API_KEY_HEADER
            )))
        }
    };
    if api_key != ctx.config.api_key {
        return Err(TappError::Unauthorized(format!(
            "Invalid `{}` header",
            API_KEY_HEADER
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::main]
    #[test]
    async fn requires_the_configured_api_key() {
        let mut ctx = TappContext::create_inmemory();
        ctx.config.api_key = "secret".into();

        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            protect_route(&req, &ctx),
            Err(TappError::Unauthorized(_))
        ));

        let req = TestRequest::default()
            .insert_header((API_KEY_HEADER, "guess"))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_err());

        let req = TestRequest::default()
            .insert_header((API_KEY_HEADER, "secret"))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_ok());
    }
}
