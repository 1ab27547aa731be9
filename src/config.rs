use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Env {
    #[envconfig(from = "HOST", default = "127.0.0.1")]
    pub host: String,

    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    #[envconfig(from = "REDIS_URL")]
    pub redis_url: String,

    /// Root of the upstream REST backend, e.g. `https://creditos.example.com`
    #[envconfig(from = "BACKEND_URL")]
    pub backend_url: String,

    /// Header the upstream reads the company scope from
    #[envconfig(from = "TENANT_HEADER", default = "X-Tenant-ID")]
    pub tenant_header: String,

    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,

    #[envconfig(from = "SESSION_TTL_SECS", default = "28800")]
    pub session_ttl_secs: u64,

    #[envconfig(from = "BILLING_CACHE_TTL_SECS", default = "86400")]
    pub billing_cache_ttl_secs: u64,
}

impl Env {
    pub fn env_init() -> Result<Env, envconfig::Error> {
        Env::init_from_env()
    }
}
