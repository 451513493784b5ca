//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};
pub use state_builders::{build_token_issuer, provision_admin};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use persona::Trace;
#[cfg(debug_assertions)]
use persona::doc::ApiDoc;
use persona::inbound::http::health::{HealthState, live, ready};
use persona::inbound::http::person_information::{
    create_person_information, delete_person_information, get_person_information,
    list_person_information, update_person_information,
};
use persona::inbound::http::profile_photos::{
    create_profile_photo, delete_profile_photo, get_profile_photo, list_profile_photos,
};
use persona::inbound::http::state::HttpState;
use persona::inbound::http::users::{delete_user, get_user, list_users, login, register};
use persona::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(list_users)
        .service(get_user)
        .service(delete_user)
        .service(list_person_information)
        .service(get_person_information)
        .service(create_person_information)
        .service(update_person_information)
        .service(delete_person_information)
        .service(list_profile_photos)
        .service(get_profile_photo)
        .service(create_profile_photo)
        .service(delete_profile_photo);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
