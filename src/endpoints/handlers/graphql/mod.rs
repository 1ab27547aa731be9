pub mod audit;
pub mod billing;
pub mod client;
pub mod credit;
pub mod payment;
pub mod user;
pub mod wizard;

use actix_web::{
    web::{Data, Json},
    HttpRequest, HttpResponse,
};
use juniper::{http::GraphQLRequest, GraphQLType, GraphQLTypeAsync};
use r2d2::Pool;
use redis::Client;

use crate::{config::Env, repos::api::ApiClient};

use super::{
    configs::schema::{GeneralContext, GeneralSchema},
    fetch_handler::session_from_request,
};

/// Runs one GraphQL request against any of the per domain schemas
pub async fn graphql<Query, Mutation>(
    req: HttpRequest,
    pool: Data<Pool<Client>>,
    api: Data<ApiClient>,
    env: Data<Env>,
    data: Json<GraphQLRequest>,
    schema: Data<GeneralSchema<Query, Mutation>>,
) -> HttpResponse
where
    Query: GraphQLTypeAsync<Context = GeneralContext, TypeInfo = ()>
        + GraphQLType<Context = GeneralContext>
        + Send
        + Sync
        + 'static,
    Mutation: GraphQLTypeAsync<Context = GeneralContext, TypeInfo = ()>
        + GraphQLType<Context = GeneralContext>
        + Send
        + Sync
        + 'static,
{
    let session = session_from_request(&req, &api, &pool);
    let context = GeneralContext {
        pool,
        api,
        env,
        session,
    };

    let res = data.execute(&schema, &context).await;

    HttpResponse::Ok().json(res)
}
