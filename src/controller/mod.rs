//! Page handlers: read input, call the backend, build the view-model.
//!
//! Every handler takes the [`Ui`] it reports to. Validation failures are
//! alerted and abort before any request is sent (`Ok(None)`). Transport and
//! decoding failures come back as [`ClientError`] and the page keeps showing
//! whatever it showed before.

use crate::api::{Backend, BuyRequest, ClientError, SellRequest, SuggestionsPayload};
use crate::config::{Config, SellLayout};
use crate::session::{Session, SessionStore};
use crate::view::{clamp_quantity, BuyView, PortfolioView, SellView};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MSG_MISSING_CREDENTIALS: &str = "Enter username and password";
pub const MSG_MISSING_AMOUNT: &str = "Enter amount";
pub const MSG_LOGIN_FIRST: &str = "Please login first";

/// Buys are always for a single share; the computed quantity is display only.
pub const BUY_QUANTITY: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Home,
    Buy,
    Sell,
    Profile,
}

impl Page {
    /// Match a URL path by substring, the way the legacy `*.html` pages were
    /// told apart. Sell is checked first so `/sell.html?from=home` stays Sell.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.to_ascii_lowercase();
        if path.contains("sell") {
            Some(Page::Sell)
        } else if path.contains("profile") {
            Some(Page::Profile)
        } else if path.contains("buy") {
            Some(Page::Buy)
        } else if path.contains("home") {
            Some(Page::Home)
        } else if path.contains("login") || path.contains("index") {
            Some(Page::Login)
        } else {
            None
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Login => "/",
            Page::Home => "/home",
            Page::Buy => "/buy",
            Page::Sell => "/sell",
            Page::Profile => "/profile",
        }
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, Page::Login)
    }
}

/// Side effects the handlers need from the page.
pub trait Ui {
    /// Blocking, user-facing message.
    fn alert(&self, message: &str);
    fn navigate(&self, page: Page);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("username is required")]
    MissingUsername,
    #[error("password is required")]
    MissingPassword,
}

/// What a page shows right after it loads.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Home { user: Option<String> },
    Sell(SellView),
    Profile(PortfolioView),
    Idle,
}

#[derive(Debug, Clone)]
pub struct ViewController<B, S> {
    backend: B,
    session: Session<S>,
    config: Config,
}

impl<B: Backend, S: SessionStore> ViewController<B, S> {
    pub fn new(backend: B, session: Session<S>, config: Config) -> Self {
        Self {
            backend,
            session,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn current_user(&self) -> Option<String> {
        self.session.current_user()
    }

    /// Store the username and go home. The password is only checked for
    /// presence and never leaves this function.
    pub fn login(&self, ui: &impl Ui, username: &str, password: &str) -> Result<(), LoginError> {
        let user = username.trim();
        let pass = password.trim();

        let check = if user.is_empty() {
            Err(LoginError::MissingUsername)
        } else if pass.is_empty() && self.config.session.require_password {
            Err(LoginError::MissingPassword)
        } else {
            Ok(())
        };
        if let Err(e) = check {
            warn!(error = %e, "login rejected");
            ui.alert(MSG_MISSING_CREDENTIALS);
            return Err(e);
        }

        self.session.set_user(user);
        info!(user, "logged in");
        ui.navigate(Page::Home);
        Ok(())
    }

    /// Go to `page`. Returns false if the page guard refused.
    pub fn navigate(&self, ui: &impl Ui, page: Page) -> bool {
        if self.config.session.guard_pages && page.is_protected() && !self.session.is_logged_in()
        {
            warn!(?page, "navigation refused, no session");
            ui.alert(MSG_LOGIN_FIRST);
            return false;
        }
        ui.navigate(page);
        true
    }

    fn require_user(&self, ui: &impl Ui) -> Option<String> {
        let user = self.session.current_user();
        if user.is_none() {
            warn!("no stored user");
            ui.alert(MSG_LOGIN_FIRST);
        }
        user
    }

    pub async fn get_buy_suggestions(
        &self,
        ui: &impl Ui,
        amount_input: &str,
    ) -> Result<Option<BuyView>, ClientError> {
        let amount = match parse_amount(amount_input) {
            Some(a) => a,
            None => {
                warn!(input = amount_input, "invalid amount");
                ui.alert(MSG_MISSING_AMOUNT);
                return Ok(None);
            }
        };

        let view = match self.backend.buy_suggestions(amount).await? {
            SuggestionsPayload::Failed { error } => {
                warn!(%error, "buy suggestions refused");
                BuyView::Error(error)
            }
            SuggestionsPayload::Items(items) => {
                debug!(amount, count = items.len(), "ranking buy suggestions");
                BuyView::build(
                    amount,
                    items,
                    self.config.display.buy_layout,
                    self.config.display.top_picks,
                )
            }
        };
        Ok(Some(view))
    }

    /// Buy one share of `symbol` at `price` and alert the backend's answer.
    pub async fn buy_stock(
        &self,
        ui: &impl Ui,
        symbol: &str,
        price: f64,
    ) -> Result<Option<String>, ClientError> {
        let Some(user_id) = self.require_user(ui) else {
            return Ok(None);
        };
        let req = BuyRequest {
            user_id,
            symbol: symbol.to_string(),
            price,
            quantity: BUY_QUANTITY,
        };
        let resp = self.backend.buy_stock(&req).await?;
        info!(symbol, price, message = %resp.message, "buy submitted");
        ui.alert(&resp.message);
        Ok(Some(resp.message))
    }

    async fn fetch_stocks(
        &self,
        user_id: &str,
    ) -> Result<Vec<crate::api::PortfolioStock>, ClientError> {
        let stocks = self.backend.portfolio(user_id).await?.into_stocks();
        debug!(user_id, count = stocks.len(), "portfolio fetched");
        Ok(stocks)
    }

    pub async fn load_sell(&self, ui: &impl Ui) -> Result<Option<SellView>, ClientError> {
        let Some(user_id) = self.require_user(ui) else {
            return Ok(None);
        };
        let stocks = self.fetch_stocks(&user_id).await?;
        Ok(Some(SellView::build(
            &stocks,
            self.config.display.sell_layout,
            self.config.display.top_picks,
        )))
    }

    /// Sell `quantity` shares, alert the backend's answer and reload the sell
    /// view. When `owned` is known the quantity is clamped to `[1, owned]`;
    /// the flat layout always sells one share.
    pub async fn sell_stock(
        &self,
        ui: &impl Ui,
        symbol: &str,
        quantity: u32,
        owned: Option<u32>,
    ) -> Result<Option<SellView>, ClientError> {
        let Some(user_id) = self.require_user(ui) else {
            return Ok(None);
        };
        let quantity = match (self.config.display.sell_layout, owned) {
            (SellLayout::Flat, _) => 1,
            (SellLayout::Ranked, Some(owned)) => clamp_quantity(quantity, owned),
            (SellLayout::Ranked, None) => quantity.max(1),
        };
        let req = SellRequest {
            user_id,
            symbol: symbol.to_string(),
            quantity,
        };
        let resp = self.backend.sell_stock(&req).await?;
        info!(symbol, quantity, message = %resp.message, "sell submitted");
        ui.alert(&resp.message);

        self.load_sell(ui).await
    }

    pub async fn load_portfolio_read_only(
        &self,
        ui: &impl Ui,
    ) -> Result<Option<PortfolioView>, ClientError> {
        let Some(user_id) = self.require_user(ui) else {
            return Ok(None);
        };
        let stocks = self.fetch_stocks(&user_id).await?;
        Ok(Some(PortfolioView::build(&stocks)))
    }

    /// Run the loader that belongs to `page`.
    pub async fn bootstrap(&self, ui: &impl Ui, page: Page) -> Result<PageState, ClientError> {
        debug!(?page, "bootstrapping page");
        let state = match page {
            Page::Sell => self.load_sell(ui).await?.map(PageState::Sell),
            Page::Profile => self
                .load_portfolio_read_only(ui)
                .await?
                .map(PageState::Profile),
            Page::Home => Some(PageState::Home {
                user: self.current_user(),
            }),
            Page::Login | Page::Buy => None,
        };
        Ok(state.unwrap_or(PageState::Idle))
    }
}

/// Positive, finite amount, or nothing.
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a > 0.0)
}
