use r2d2::Pool;
use redis::Client;

use crate::repos::{api::ApiError, store::utils::store_error};

/// Opening the client does not touch the network, the pool does on its first
/// connections, so a dead redis is reported here at boot.
pub fn get_pool_connection(redis_url: &str) -> Result<Pool<Client>, ApiError> {
    let client = Client::open(redis_url).map_err(store_error)?;

    Pool::builder().build(client).map_err(store_error)
}
