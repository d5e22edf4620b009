use dotenv::dotenv;
use log::info;

use xstudio::config::ServerConfig;
use xstudio::server::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    info!(
        "설정 로드 완료: 포트 {}, 저장소 {:?}, 명부 {}",
        config.rest_port,
        config.store,
        config.seed_path.display()
    );

    start_server(config).await
}
