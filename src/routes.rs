use crate::{api::leave, config::Config};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let check_limiter = build_limiter(config.rate_check_per_min);
    let apply_limiter = build_limiter(config.rate_apply_per_min);
    let read_limiter = build_limiter(config.rate_read_per_min);

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/leave")
                // /leave
                .service(
                    web::resource("")
                        .wrap(Governor::new(&apply_limiter))
                        .route(web::post().to(leave::apply_leave)),
                )
                // /leave/check-balance
                .service(
                    web::resource("/check-balance")
                        .wrap(Governor::new(&check_limiter))
                        .route(web::post().to(leave::check_balance)),
                )
                // /leave/entitlements/{employee_id}
                .service(
                    web::resource("/entitlements/{employee_id}")
                        .wrap(Governor::new(&read_limiter))
                        .route(web::get().to(leave::entitlement_summary)),
                )
                // /leave/{id}/decision
                .service(
                    web::resource("/{id}/decision")
                        .wrap(Governor::new(&apply_limiter))
                        .route(web::put().to(leave::decide_leave)),
                )
                // /leave/{user_id}
                .service(
                    web::resource("/{user_id}")
                        .wrap(Governor::new(&read_limiter))
                        .route(web::get().to(leave::leave_history)),
                ),
        ),
    );
}
