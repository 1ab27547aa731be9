use std::fmt::Display;

use redis::{from_redis_value, Commands, JsonCommands, RedisResult, Value as RedisValue};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::from_str;
use sha2::{Digest, Sha256};

use crate::repos::api::ApiError;

/// function that giving n reference to arguments, returns the hasked key in string format
pub fn hashing_composite_key(args: &[&str]) -> String {
    let string_acc: String = args.concat();

    let hashed_args = Sha256::digest(string_acc);

    //X is for hexadecimal
    format!("{:X}", hashed_args)
}

pub fn store_error(err: impl Display) -> ApiError {
    ApiError::Store(err.to_string())
}

/// Reads a RedisJSON document stored at the root path. Missing keys are `None`.
pub fn get_json_model<T: DeserializeOwned>(
    con: &mut redis::Connection,
    key: &str,
) -> Result<Option<T>, ApiError> {
    let raw = con
        .json_get::<&str, &str, RedisValue>(key, "$")
        .map_err(store_error)?;

    // RedisJSON answers root queries as a one element array, serialized
    let nested = match from_redis_value::<Option<String>>(&raw).map_err(store_error)? {
        Some(nested) => nested,
        None => return Ok(None),
    };

    let mut models = from_str::<Vec<T>>(&nested).map_err(store_error)?;
    if models.is_empty() {
        return Ok(None);
    }
    Ok(Some(models.swap_remove(0)))
}

pub fn set_json_model<T: Serialize>(
    con: &mut redis::Connection,
    key: &str,
    model: &T,
    ttl_secs: Option<u64>,
) -> Result<(), ApiError> {
    con.json_set::<&str, &str, T, ()>(key, "$", model)
        .map_err(store_error)?;

    if let Some(ttl) = ttl_secs {
        con.expire::<&str, ()>(key, ttl as i64).map_err(store_error)?;
    }
    Ok(())
}

/// Elimina todas las claves que coinciden con un patrón
pub fn delete_keys_by_pattern(con: &mut redis::Connection, pattern: String) -> RedisResult<usize> {
    let keys: Vec<String> = con.scan_match::<String, String>(pattern)?.collect();

    for key in &keys {
        con.del::<&str, ()>(key)?;
    }
    Ok(keys.len())
}

pub fn keys_by_pattern(con: &mut redis::Connection, pattern: String) -> Result<Vec<String>, ApiError> {
    let keys = con
        .scan_match::<String, String>(pattern)
        .map_err(store_error)?
        .collect();
    Ok(keys)
}
