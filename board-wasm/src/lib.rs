mod api;
mod app;
mod components;
mod dialogs;
mod services;
mod storage;

use api::ApiClient;
use app::{App, AppProps};
use board_client::{ClientConfig, QueryCache};
use dialogs::BrowserDialogs;
use services::Services;
use std::rc::Rc;
use storage::{LocalStorageTokens, WebStoragePersister};
use wasm_bindgen::prelude::*;

fn config() -> ClientConfig {
    match option_env!("BOARD_API_URL") {
        Some(api_base) => ClientConfig::new(api_base),
        None => ClientConfig::default(),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Устанавливаем обработчик паники
    console_error_panic_hook::set_once();

    // Инициализируем логирование
    #[cfg(debug_assertions)]
    console_log::init_with_level(log::Level::Debug).unwrap_or_else(|e| {
        web_sys::console::log_1(&format!("Failed to init logger: {}", e).into());
    });

    let config = config();
    log::info!("Board starting against {}", config.api_base);

    // Единственный кэш на всё время жизни страницы
    let cache = QueryCache::new(&config)
        .with_persister(Rc::new(WebStoragePersister::new(config.cache_key.clone())));
    cache.restore(chrono::Utc::now());

    let services = Services::new(
        Rc::new(ApiClient::new(config.api_base.clone())),
        Rc::new(BrowserDialogs),
        cache,
        Rc::new(LocalStorageTokens::new(config.token_key.clone())),
    );

    // Запускаем Yew приложение
    yew::Renderer::<App>::with_props(AppProps { services }).render();

    Ok(())
}
