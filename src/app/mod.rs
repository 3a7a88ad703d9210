//! Dioxus front end: router, shared controller context, browser [`Ui`].

mod pages;

use crate::api::HttpBackend;
use crate::config::Config;
use crate::controller::{Page, PageState, Ui, ViewController};
use crate::session::{LocalStorage, Session};
use dioxus::prelude::*;
use pages::{Buy, Home, Legacy, Login, Profile, Sell};
use std::sync::OnceLock;
use tracing::{error, warn};

/// Controller as wired in the browser.
pub type Controller = ViewController<HttpBackend, LocalStorage>;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Login {},
    #[route("/home")]
    Home {},
    #[route("/buy")]
    Buy {},
    #[route("/sell")]
    Sell {},
    #[route("/profile")]
    Profile {},
    // Old `home.html`-style links and anything else unknown.
    #[route("/:..segments")]
    Legacy { segments: Vec<String> },
}

impl From<Page> for Route {
    fn from(page: Page) -> Self {
        match page {
            Page::Login => Route::Login {},
            Page::Home => Route::Home {},
            Page::Buy => Route::Buy {},
            Page::Sell => Route::Sell {},
            Page::Profile => Route::Profile {},
        }
    }
}

struct LoadedConfig {
    config: Config,
    rejected: Option<String>,
}

fn loaded() -> &'static LoadedConfig {
    static CONFIG: OnceLock<LoadedConfig> = OnceLock::new();
    CONFIG.get_or_init(|| match Config::try_load() {
        Ok(config) => LoadedConfig {
            config,
            rejected: None,
        },
        Err(e) => LoadedConfig {
            config: Config::default(),
            rejected: Some(e.to_string()),
        },
    })
}

/// Config shared by `main` and the app, loaded once. A rejected config
/// is replaced by the defaults.
pub fn config() -> &'static Config {
    &loaded().config
}

/// Why the shipped config was replaced by the defaults, if it was. Logged
/// by `main` once the logger is up.
pub fn config_error() -> Option<&'static str> {
    loaded().rejected.as_deref()
}

/// Alerts through `window.alert`, navigates through the router.
#[derive(Clone, Copy)]
pub struct WebUi {
    nav: Navigator,
}

impl WebUi {
    /// Must be called while a component is rendering.
    pub fn new() -> Self {
        Self { nav: navigator() }
    }
}

impl Ui for WebUi {
    fn alert(&self, message: &str) {
        match web_sys::window() {
            Some(window) => {
                if window.alert_with_message(message).is_err() {
                    warn!(message, "alert failed");
                }
            }
            None => warn!(message, "no window to alert in"),
        }
    }

    fn navigate(&self, page: Page) {
        let _ = self.nav.push(Route::from(page));
    }
}

/// Run the page's loader once on mount. The returned signal stays `None`
/// until the backend answers; failures are logged and leave it untouched.
pub(crate) fn use_page_state(page: Page) -> Signal<Option<PageState>> {
    let ctl = use_context::<Controller>();
    let ui = WebUi::new();
    let mut state = use_signal(|| None);
    use_future(move || {
        let ctl = ctl.clone();
        async move {
            match ctl.bootstrap(&ui, page).await {
                Ok(s) => state.set(Some(s)),
                Err(e) => error!(error = %e, ?page, "page load failed"),
            }
        }
    });
    state
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| {
        let config = config().clone();
        let backend = HttpBackend::new(config.api.base_url.clone());
        Controller::new(backend, Session::new(LocalStorage), config)
    });

    rsx! {
        Router::<Route> {}
    }
}
