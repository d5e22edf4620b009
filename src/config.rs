use std::path::PathBuf;

use crate::commission::CommissionRates;
use crate::model::StaffRole;
use crate::store::StoreSpec;

const ENV_PREFIX: &str = "XSTUDIO_";

/// 설정 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("잘못된 설정 값 {key}={value}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// 서버 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_port: u16,
    pub store: StoreSpec,
    pub seed_path: PathBuf,
    pub rates: CommissionRates,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_port: 7000,
            store: StoreSpec::JsonFile(PathBuf::from("data/studio.json")),
            seed_path: PathBuf::from("data/seed.json"),
            rates: CommissionRates::default(),
        }
    }
}

impl ServerConfig {
    /// 프로세스 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 조회 함수로 설정 로드 (값이 없으면 기본값)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("REST_PORT") {
            config.rest_port = value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(&key, &value, e.to_string()))?;
        }

        if let Some((key, value)) = var("STORE") {
            config.store = value
                .parse()
                .map_err(|reason: String| invalid(&key, &value, reason))?;
        }

        if let Some((_, value)) = var("SEED_PATH") {
            config.seed_path = PathBuf::from(value);
        }

        for role in StaffRole::ALL {
            if let Some((key, value)) = var(&format!("RATE_{}", role.env_suffix())) {
                let rate = parse_rate(&key, &value)?;
                config.rates = config.rates.with_rate(role, rate);
            }
        }

        if let Some((key, value)) = var("DEFAULT_RATE") {
            let rate = parse_rate(&key, &value)?;
            config.rates = config.rates.with_default_rate(rate);
        }

        Ok(config)
    }
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 커미션 요율은 0.0 ~ 1.0
fn parse_rate(key: &str, value: &str) -> Result<f64, ConfigError> {
    let rate: f64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseFloatError| invalid(key, value, e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(invalid(key, value, "요율은 0.0 이상 1.0 이하여야 합니다"));
    }
    Ok(rate)
}
