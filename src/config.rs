use crate::domain::timestamp::ReportTimeZone;
use clap::Args;
use std::net::SocketAddr;
use std::time::Duration;

/// Settings for the `serve` command. Every flag can also come from the
/// environment.
#[derive(Args, Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to
    #[arg(long, env = "INTEGRA_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Base URL of the upstream POS API
    #[arg(long, env = "INTEGRA_UPSTREAM_URL", default_value = "https://api.test.hipalz.com")]
    pub upstream_url: String,

    /// Business whose payments are exported
    #[arg(long, env = "INTEGRA_BUSINESS_ID")]
    pub business_id: String,

    /// Shared secret callers must pass as `token`
    #[arg(long, env = "INTEGRA_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Seconds to wait for the upstream API before giving up
    #[arg(long, env = "INTEGRA_UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,

    #[command(flatten)]
    pub zone: ZoneConfig,
}

impl ServiceConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ZoneConfig {
    /// Fixed UTC offset (e.g. +05:30) for receipt dates; process local zone if unset
    #[arg(long, env = "INTEGRA_UTC_OFFSET", value_parser = parse_zone, allow_hyphen_values = true)]
    pub utc_offset: Option<ReportTimeZone>,
}

impl ZoneConfig {
    pub fn report_zone(&self) -> ReportTimeZone {
        self.utc_offset.unwrap_or_default()
    }
}

fn parse_zone(raw: &str) -> Result<ReportTimeZone, String> {
    ReportTimeZone::parse_offset(raw)
        .ok_or_else(|| format!("'{}' is not a UTC offset like +05:30", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: ServiceConfig,
    }

    #[test]
    fn test_defaults() {
        let harness = Harness::try_parse_from([
            "test",
            "--business-id",
            "biz",
            "--access-token",
            "secret",
        ])
        .unwrap();
        let config = harness.config;
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(config.zone.report_zone(), ReportTimeZone::Local);
    }

    #[test]
    fn test_utc_offset_is_validated() {
        let parsed = Harness::try_parse_from([
            "test",
            "--business-id",
            "biz",
            "--access-token",
            "secret",
            "--utc-offset",
            "+05:30",
        ])
        .unwrap();
        assert_eq!(
            parsed.config.zone.report_zone(),
            ReportTimeZone::parse_offset("+05:30").unwrap()
        );

        let bad = Harness::try_parse_from([
            "test",
            "--business-id",
            "biz",
            "--access-token",
            "secret",
            "--utc-offset",
            "IST",
        ]);
        assert!(bad.is_err());
    }
}
