use clap::Parser;
use std::fmt::Debug;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Parser)]
#[clap(
    author = "Alex Markov",
    version,
    about = "Relays LINE messages to Gemini and replies with its answer"
)]
pub struct Args {
    #[clap(long, env = "LINE_CHANNEL_ACCESS_TOKEN", hide_env_values = true)]
    pub channel_access_token: String,
    #[clap(long, env = "LINE_CHANNEL_SECRET", hide_env_values = true)]
    pub channel_secret: String,
    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,
    #[clap(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[clap(short, long, env = "PORT", default_value = "5001")]
    pub port: u16,
    #[clap(long, env = "GEMINI_MODEL", default_value = gemini_client::DEFAULT_MODEL)]
    pub model: String,
    #[clap(long, env = "GEMINI_BASE_URL", default_value = gemini_client::DEFAULT_BASE_URL)]
    pub gemini_base_url: String,
    #[clap(long, env = "LINE_API_BASE_URL", default_value = line_client::DEFAULT_BASE_URL)]
    pub line_api_base_url: String,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("channel_access_token", &"<redacted>")
            .field("channel_secret", &"<redacted>")
            .field("gemini_api_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("line_api_base_url", &self.line_api_base_url)
            .finish()
    }
}
