pub mod health;
pub mod itinerary;
pub mod tour_guide;

use actix_web::web;

/// All application routes. Shared between the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::home))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/itinerary")
                .app_data(itinerary::json_config())
                .route("/generate", web::post().to(itinerary::generate)),
        )
        .service(
            web::scope("/tour")
                .route("/guides", web::get().to(tour_guide::get_guides))
                .route("/apply", web::post().to(tour_guide::apply)),
        );
}
