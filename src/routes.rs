use crate::{
    api::{fingerlog, notes},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

// Per-IP limiter; returns None when the config cannot be built.
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let scope = web::scope(&config.api_prefix);

    match build_limiter(config.rate_per_min) {
        Some(limiter) => cfg.service(scope.wrap(limiter).configure(api_routes)),
        None => {
            tracing::warn!(rate_per_min = config.rate_per_min, "Rate limiter disabled");
            cfg.service(scope.configure(api_routes))
        }
    };
}

/// Routes relative to the API prefix.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fingerlog")
            // /fingerlog
            .service(
                web::resource("")
                    .route(web::get().to(fingerlog::get_finger_log))
                    .route(web::post().to(fingerlog::add_finger_log))
                    .route(web::delete().to(fingerlog::delete_finger_log)),
            )
            // /fingerlog/manual
            .service(
                web::resource("/manual").route(web::post().to(fingerlog::add_manual_finger_log)),
            ),
    )
    .service(
        web::scope("/notes")
            // /notes
            .service(
                web::resource("")
                    .route(web::get().to(notes::get_notes))
                    .route(web::post().to(notes::save_note)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_builds_for_any_budget() {
        assert!(build_limiter(1000).is_some());
        assert!(build_limiter(0).is_some());
        assert!(build_limiter(120_000).is_some());
    }
}
