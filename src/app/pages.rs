use super::{use_page_state, Controller, Route, WebUi};
use crate::config::SellLayout;
use crate::controller::{Page, PageState, MSG_LOGIN_FIRST};
use crate::view::{
    money, parse_quantity, BuyPick, BuyView, HoldingCard, PortfolioView, SellView,
    EMPTY_HOLDINGS, EMPTY_PORTFOLIO, EMPTY_SUGGESTIONS,
};
use dioxus::prelude::*;
use tracing::{error, info, warn};

#[component]
fn NavBar() -> Element {
    let ctl = use_context::<Controller>();
    let ui = WebUi::new();
    let go = move |page: Page| {
        ctl.navigate(&ui, page);
    };
    let go_home = go.clone();
    let go_buy = go.clone();
    let go_sell = go.clone();
    let go_profile = go;

    rsx! {
        nav { class: "nav",
            button { onclick: move |_| go_home(Page::Home), "Home" }
            button { onclick: move |_| go_buy(Page::Buy), "Buy" }
            button { onclick: move |_| go_sell(Page::Sell), "Sell" }
            button { onclick: move |_| go_profile(Page::Profile), "Profile" }
        }
    }
}

#[component]
pub fn Login() -> Element {
    let ctl = use_context::<Controller>();
    let ui = WebUi::new();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);

    rsx! {
        div { class: "container",
            h2 { "Login" }
            input {
                id: "username",
                placeholder: "Username",
                value: "{username}",
                oninput: move |e| username.set(e.value()),
            }
            input {
                id: "password",
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                oninput: move |e| password.set(e.value()),
            }
            button {
                onclick: move |_| {
                    let _ = ctl.login(&ui, &username(), &password());
                },
                "Login"
            }
        }
    }
}

#[component]
pub fn Home() -> Element {
    let state = use_page_state(Page::Home);
    let user = match state() {
        Some(PageState::Home { user }) => user.unwrap_or_default(),
        _ => String::new(),
    };

    rsx! {
        div { class: "container",
            h2 { id: "username-display", "Welcome {user}" }
            NavBar {}
        }
    }
}

#[component]
fn PickCard(pick: BuyPick) -> Element {
    let ctl = use_context::<Controller>();
    let ui = WebUi::new();
    let symbol = pick.symbol.clone();
    let price = pick.price;
    let price_label = pick.price_label();
    let qty = pick.qty;

    rsx! {
        div { class: "card",
            p { b { "{symbol}" } }
            p { "Price: {price_label}" }
            p { "Qty: {qty}" }
            button {
                onclick: move |_| {
                    let ctl = ctl.clone();
                    let symbol = pick.symbol.clone();
                    spawn(async move {
                        if let Err(e) = ctl.buy_stock(&ui, &symbol, price).await {
                            error!(error = %e, %symbol, "buy failed");
                        }
                    });
                },
                "Buy"
            }
        }
    }
}

#[component]
pub fn Buy() -> Element {
    let ctl = use_context::<Controller>();
    let ui = WebUi::new();
    let mut amount = use_signal(String::new);
    let mut view = use_signal(|| None::<BuyView>);

    let results = match view() {
        None => rsx! {},
        Some(BuyView::Error(message)) => rsx! {
            p { class: "error", "{message}" }
        },
        Some(BuyView::Empty) => rsx! {
            p { "{EMPTY_SUGGESTIONS}" }
        },
        Some(BuyView::Split { top_picks, suggestions }) => rsx! {
            h3 { "Top Picks" }
            div { id: "top-picks",
                for pick in top_picks {
                    PickCard { key: "{pick.symbol}", pick: pick.clone() }
                }
            }
            h3 { "More Suggestions" }
            div { id: "suggestions",
                for pick in suggestions {
                    PickCard { key: "{pick.symbol}", pick: pick.clone() }
                }
            }
        },
        Some(BuyView::Flat(picks)) => rsx! {
            div { id: "suggestions",
                for pick in picks {
                    PickCard { key: "{pick.symbol}", pick: pick.clone() }
                }
            }
        },
    };

    rsx! {
        div { class: "container",
            h2 { "Buy Stocks" }
            input {
                id: "amount",
                r#type: "number",
                placeholder: "Amount to invest",
                value: "{amount}",
                oninput: move |e| amount.set(e.value()),
            }
            button {
                onclick: move |_| {
                    let ctl = ctl.clone();
                    let input = amount();
                    spawn(async move {
                        match ctl.get_buy_suggestions(&ui, &input).await {
                            Ok(Some(v)) => view.set(Some(v)),
                            Ok(None) => {}
                            Err(e) => error!(error = %e, "buy suggestions failed"),
                        }
                    });
                },
                "Get Suggestions"
            }
            {results}
            NavBar {}
        }
    }
}

/// Sell and put the refreshed holdings back into the page state.
fn submit_sell(
    ctl: Controller,
    ui: WebUi,
    mut state: Signal<Option<PageState>>,
    symbol: String,
    quantity: u32,
    owned: u32,
) {
    spawn(async move {
        match ctl.sell_stock(&ui, &symbol, quantity, Some(owned)).await {
            Ok(Some(v)) => state.set(Some(PageState::Sell(v))),
            Ok(None) => {}
            Err(e) => error!(error = %e, %symbol, "sell failed"),
        }
    });
}

#[component]
fn SellCard(card: HoldingCard, state: Signal<Option<PageState>>) -> Element {
    let ctl = use_context::<Controller>();
    let ui = WebUi::new();
    let mut qty = use_signal(|| card.default_sell_quantity().to_string());
    let (min, max) = card.sell_bounds();
    let symbol = card.symbol.clone();
    let owned = card.quantity;
    let buy_price = card.buy_price_label();
    let current_price = money(card.current_price());
    let profit = money(card.profit);
    let input_id = format!("sell-{symbol}");
    let sell_symbol = symbol.clone();

    rsx! {
        div { class: "card",
            p { b { "{symbol}" } }
            p { "Qty Owned: {owned}" }
            p { "Buy Price: {buy_price}" }
            p { "Current Price: {current_price}" }
            p { "Profit: {profit}" }
            input {
                id: "{input_id}",
                r#type: "number",
                min: "{min}",
                max: "{max}",
                value: "{qty}",
                oninput: move |e| qty.set(e.value()),
            }
            button {
                onclick: move |_| {
                    let quantity = parse_quantity(&qty(), owned);
                    submit_sell(ctl.clone(), ui, state, sell_symbol.clone(), quantity, owned);
                },
                "Sell"
            }
        }
    }
}

#[component]
fn SellRow(card: HoldingCard, state: Signal<Option<PageState>>) -> Element {
    let ctl = use_context::<Controller>();
    let ui = WebUi::new();
    let symbol = card.symbol.clone();
    let owned = card.quantity;
    let buy_price = card.buy_price_label();
    let sell_symbol = symbol.clone();

    rsx! {
        div { class: "card",
            p { b { "{symbol}" } " · Qty: {owned} · Price: {buy_price}" }
            button {
                onclick: move |_| submit_sell(ctl.clone(), ui, state, sell_symbol.clone(), 1, owned),
                "Sell"
            }
        }
    }
}

#[component]
pub fn Sell() -> Element {
    let state = use_page_state(Page::Sell);

    let body = match state() {
        None => rsx! { p { "Loading..." } },
        Some(PageState::Sell(SellView::Empty(SellLayout::Ranked))) => rsx! {
            div { id: "top-picks", p { "{EMPTY_PORTFOLIO}" } }
            div { id: "portfolio" }
        },
        Some(PageState::Sell(SellView::Empty(SellLayout::Flat))) => rsx! {
            div { id: "portfolio", p { "{EMPTY_PORTFOLIO}" } }
        },
        Some(PageState::Sell(SellView::Ranked { top_picks, portfolio })) => rsx! {
            h3 { "Top Picks to Sell" }
            div { id: "top-picks",
                for card in top_picks {
                    SellCard { key: "{card.symbol}", card: card.clone(), state: state }
                }
            }
            h3 { "Your Portfolio" }
            div { id: "portfolio",
                for card in portfolio {
                    SellCard { key: "{card.symbol}", card: card.clone(), state: state }
                }
            }
        },
        Some(PageState::Sell(SellView::Flat(cards))) => rsx! {
            div { id: "portfolio",
                for card in cards {
                    SellRow { key: "{card.symbol}", card: card.clone(), state: state }
                }
            }
        },
        Some(PageState::Idle) => rsx! { p { "{MSG_LOGIN_FIRST}" } },
        Some(other) => {
            warn!(?other, "unexpected state on sell page");
            rsx! {}
        }
    };

    rsx! {
        div { class: "container",
            h2 { "Sell Stocks" }
            {body}
            NavBar {}
        }
    }
}

fn portfolio_body(view: PortfolioView) -> Element {
    let PortfolioView { summary, cards } = view;
    let invested = format!("{:.2}", summary.invested);
    let current = format!("{:.2}", summary.current);
    let profit = format!("{:.2}", summary.profit);
    let arrow = summary.direction.arrow();
    let empty = cards.is_empty();

    rsx! {
        div { class: "summary",
            p { "Total Invested: ₹" span { id: "total-invested", "{invested}" } }
            p { "Current Value: ₹" span { id: "current-value", "{current}" } }
            p {
                "Profit / Loss: ₹"
                span { id: "profit-loss", "{profit}" }
                " "
                span { id: "direction", "{arrow}" }
            }
        }
        div { id: "portfolio",
            if empty {
                p { "{EMPTY_HOLDINGS}" }
            }
            for card in cards {
                ProfileCard { key: "{card.symbol}", card: card.clone() }
            }
        }
    }
}

#[component]
fn ProfileCard(card: HoldingCard) -> Element {
    let symbol = card.symbol.clone();
    let quantity = card.quantity;
    let invested = money(card.invested);
    let current = money(card.current_value);
    let profit = money(card.profit);
    let percent = format!("{:.2}%", card.profit_percent());

    rsx! {
        div { class: "card",
            p { b { "{symbol}" } }
            p { "Qty: {quantity}" }
            p { "Invested: {invested}" }
            p { "Current: {current}" }
            p { "Profit: {profit} ({percent})" }
        }
    }
}

#[component]
pub fn Profile() -> Element {
    let state = use_page_state(Page::Profile);

    let body = match state() {
        Some(PageState::Profile(view)) => portfolio_body(view),
        Some(PageState::Idle) => rsx! { p { "{MSG_LOGIN_FIRST}" } },
        Some(other) => {
            warn!(?other, "unexpected state on profile page");
            rsx! {}
        }
        None => rsx! { p { "Loading..." } },
    };

    rsx! {
        div { class: "container",
            h2 { "Portfolio" }
            {body}
            NavBar {}
        }
    }
}

/// Catch-all route. Maps old `*.html` paths onto the matching page.
#[component]
pub fn Legacy(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    let target = Page::from_path(&path);
    let nav = navigator();

    use_effect(move || {
        let page = target.unwrap_or(Page::Login);
        info!(?page, "redirecting legacy path");
        let _ = nav.replace(Route::from(page));
    });

    if target.is_none() {
        warn!(%path, "unknown path");
    }

    rsx! {
        p { "Redirecting..." }
    }
}
