use std::io::Error;
use std::sync::Arc;
use std::time::Duration;

use poem::{EndpointExt, Server, listener::TcpListener, middleware::Tracing};
use tokio::main;
use tracing_subscriber::EnvFilter;

use crate::{
    application::{
        handlers::message_dispatcher::MessageDispatchHandler,
        services::{analyzer::AnalysisService, event_bus::TaskQueue},
        usecases::{
            deliver_analysis::DeliverAnalysisUseCase, handle_callback::HandleCallbackUseCase,
            notify_unsupported::NotifyUnsupportedUseCase,
        },
    },
    config::Config,
    infrastructure::{
        analysis::vibrato::VibratoAnalyzer,
        messaging::{
            jetstream::JetstreamTaskQueue, line::LineClientFactory, local_queue::LocalTaskQueue,
            task_delivery::HttpTaskDelivery,
        },
    },
    presentation::http::{endpoints::root::ApiState, routes},
};

mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod testing;

const LOCAL_RETRY_DELAY: Duration = Duration::from_secs(2);

#[main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "linebot=info,poem=info".into()),
        )
        .init();

    let config = Config::try_parse().map_err(Error::other)?;
    let server_url = config.server_url();

    tracing::info!(
        url = %server_url,
        reply_mode = config.reply_mode.as_str(),
        "Starting server"
    );

    let analyzer = Arc::new(VibratoAnalyzer::new(config.dictionary_path.clone()));
    if config.dictionary_preload {
        let preloading = analyzer.clone();
        tokio::task::spawn_blocking(move || preloading.preload())
            .await
            .map_err(Error::other)?
            .map_err(Error::other)?;
    }
    let analysis = AnalysisService::new(analyzer);

    let bots = Arc::new(LineClientFactory::new(
        config.line_api_base_url.clone(),
        config.channel_secret.clone(),
        config.channel_token.clone(),
    ));

    let delivery = HttpTaskDelivery::new(&config.task_base_url).map_err(Error::other)?;
    let queue: Arc<dyn TaskQueue> = match &config.jetstream {
        Some(jetstream) => {
            let (queue, worker) = JetstreamTaskQueue::new(jetstream)
                .await
                .map_err(Error::other)?;
            worker.spawn(delivery, queue.clone());
            tracing::info!(url = %jetstream.url, "using jetstream task queue");
            queue
        }
        None => {
            tracing::info!("using in-process task queue");
            Arc::new(LocalTaskQueue::new(
                delivery,
                config.task_max_attempts,
                LOCAL_RETRY_DELAY,
            ))
        }
    };

    let dispatcher = Arc::new(MessageDispatchHandler::new(
        config.reply_mode,
        analysis.clone(),
    ));

    let state = Arc::new(ApiState {
        handle_callback_usecase: Arc::new(HandleCallbackUseCase::new(
            bots.clone(),
            dispatcher,
            queue,
        )),
        deliver_analysis_usecase: Arc::new(DeliverAnalysisUseCase::new(bots.clone(), analysis)),
        notify_unsupported_usecase: Arc::new(NotifyUnsupportedUseCase::new(bots)),
        qr_code_url: config.qr_code_url.clone(),
    });

    let app = routes(state, &server_url).with(Tracing);

    Server::new(TcpListener::bind(format!("0.0.0.0:{}", config.port)))
        .run(app)
        .await
}
