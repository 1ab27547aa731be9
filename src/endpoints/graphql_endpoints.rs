use actix_web::{web, HttpResponse};
use juniper::http::graphiql::graphiql_source;

use super::handlers::{
    configs::schema::create_schema,
    graphql::{
        audit::{AuditMutation, AuditQuery},
        billing::{BillingMutation, BillingQuery},
        client::{ClientMutation, ClientQuery},
        credit::{CreditMutation, CreditQuery},
        graphql,
        payment::{PaymentMutation, PaymentQuery},
        user::{UserMutation, UserQuery},
        wizard::{WizardMutation, WizardQuery},
    },
};

//One schema per domain, each one mounted on its own path

pub fn graphql_config(config: &mut web::ServiceConfig) {
    config
        .app_data(create_schema(CreditQuery, CreditMutation))
        .app_data(create_schema(PaymentQuery, PaymentMutation))
        .app_data(create_schema(ClientQuery, ClientMutation))
        .app_data(create_schema(UserQuery, UserMutation))
        .app_data(create_schema(WizardQuery, WizardMutation))
        .app_data(create_schema(BillingQuery, BillingMutation::new()))
        .app_data(create_schema(AuditQuery, AuditMutation::new()))
        .service(
            web::resource("/graphql/credit")
                .route(web::post().to(graphql::<CreditQuery, CreditMutation>)),
        )
        .service(
            web::resource("/graphql/payment")
                .route(web::post().to(graphql::<PaymentQuery, PaymentMutation>)),
        )
        .service(
            web::resource("/graphql/client")
                .route(web::post().to(graphql::<ClientQuery, ClientMutation>)),
        )
        .service(
            web::resource("/graphql/user").route(web::post().to(graphql::<UserQuery, UserMutation>)),
        )
        .service(
            web::resource("/graphql/wizard")
                .route(web::post().to(graphql::<WizardQuery, WizardMutation>)),
        )
        .service(
            web::resource("/graphql/billing")
                .route(web::post().to(graphql::<BillingQuery, BillingMutation>)),
        )
        .service(
            web::resource("/graphql/audit")
                .route(web::post().to(graphql::<AuditQuery, AuditMutation>)),
        )
        .service(web::resource("/graphiql/{domain}").route(web::get().to(graphiql)));
}

//For trying queries by hand against one of the schemas
async fn graphiql(domain: web::Path<String>) -> HttpResponse {
    let html = graphiql_source(&format!("/graphql/{}", domain.into_inner()), None);

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
