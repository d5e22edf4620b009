use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::create_api_router;
use crate::clock::SystemClock;
use crate::config::ServerConfig;
use crate::data::DataLoader;
use crate::store::{open_store, StateStore};
use crate::studio::{SharedStudio, Studio};

/// 서버 상태
#[derive(Clone)]
pub struct ServerState {
    pub studio: SharedStudio,
}

/// 미들웨어가 적용된 앱 라우터
pub fn app(studio: SharedStudio) -> Router {
    create_api_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState { studio })
}

/// 저장소를 열고 스튜디오를 준비합니다.
///
/// 저장된 스냅샷이 없으면 명부 파일로 초기화한 뒤 바로 저장합니다.
pub async fn load_studio(config: &ServerConfig) -> anyhow::Result<Studio> {
    let store: Arc<dyn StateStore> = open_store(&config.store)
        .await
        .context("저장소 열기 실패")?;

    let state = match store.load().await.context("스냅샷 로드 실패")? {
        Some(state) => {
            info!("저장된 스튜디오 상태 로드 완료");
            state
        }
        None => {
            let state = DataLoader::initial_state(&config.seed_path)
                .with_context(|| format!("명부 로드 실패: {}", config.seed_path.display()))?;
            store.save(&state).await.context("초기 상태 저장 실패")?;
            state
        }
    };

    Ok(Studio::with_state(
        state,
        store,
        Arc::new(SystemClock),
        config.rates.clone(),
    ))
}

/// 서버 시작
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("xStudio 서버 시작 중...");

    let studio = load_studio(&config).await?.into_shared();
    let router = app(studio);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.rest_port))
        .await
        .with_context(|| format!("REST 포트 바인딩 실패: {}", config.rest_port))?;

    info!("서버가 성공적으로 시작되었습니다!");
    info!("REST API: http://localhost:{}", config.rest_port);

    axum::serve(listener, router).await.context("REST 서버 오류")?;

    Ok(())
}
