// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View routing: maps request paths to pages, gated on session presence.

pub mod gate;

pub use gate::RouteGate;

use serde::Serialize;

/// Where unauthenticated visitors to a gated page are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated visitors to login/signup are sent.
pub const HOME_PATH: &str = "/home";
/// Fallback for unknown paths.
pub const LANDING_PATH: &str = "/";

/// A page of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Landing,
    Login,
    SignUp,
    Home,
    MyLog,
    Search,
    Profile,
    Map,
    UserProfile { username: String },
    CityDetail { city_id: u64 },
}

impl Page {
    /// Whether the page requires a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Page::Landing | Page::Login | Page::SignUp)
    }

    /// Canonical path for the page.
    pub fn path(&self) -> String {
        match self {
            Page::Landing => LANDING_PATH.to_string(),
            Page::Login => LOGIN_PATH.to_string(),
            Page::SignUp => "/signup".to_string(),
            Page::Home => HOME_PATH.to_string(),
            Page::MyLog => "/mylog".to_string(),
            Page::Search => "/search".to_string(),
            Page::Profile => "/profile".to_string(),
            Page::Map => "/map".to_string(),
            Page::UserProfile { username } => {
                format!("/user/{}", urlencoding::encode(username))
            }
            Page::CityDetail { city_id } => format!("/cities/{}", city_id),
        }
    }
}

/// Outcome of routing a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Render(Page),
    Redirect { to: &'static str },
}

/// Parse a path into a page, ignoring query string, fragment and trailing slash.
pub fn parse_path(path: &str) -> Option<Page> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

    match segments.as_slice() {
        [] => Some(Page::Landing),
        ["login"] => Some(Page::Login),
        ["signup"] => Some(Page::SignUp),
        ["home"] => Some(Page::Home),
        ["mylog"] => Some(Page::MyLog),
        ["search"] => Some(Page::Search),
        ["profile"] => Some(Page::Profile),
        ["map"] => Some(Page::Map),
        ["user", username] if !username.is_empty() => {
            let username = urlencoding::decode(username).ok()?.into_owned();
            Some(Page::UserProfile { username })
        }
        ["cities", id] => id.parse().ok().map(|city_id| Page::CityDetail { city_id }),
        _ => None,
    }
}

/// Route `path` given whether a session is present.
///
/// This is a pure function; `RouteGate` re-runs it on session changes.
pub fn resolve(path: &str, session_present: bool) -> Resolution {
    let Some(page) = parse_path(path) else {
        return Resolution::Redirect { to: LANDING_PATH };
    };

    match page {
        Page::Login | Page::SignUp if session_present => Resolution::Redirect { to: HOME_PATH },
        page if page.requires_session() && !session_present => {
            Resolution::Redirect { to: LOGIN_PATH }
        }
        page => Resolution::Render(page),
    }
}
