// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page data loaders.
//!
//! Each page fetches its own data when it is shown. Loads run inside the
//! page's [`ViewScope`], so a page that goes away never sees its responses.

pub mod auth;
pub mod city;
pub mod home;
pub mod mylog;
pub mod profile;
pub mod search;

pub use city::CityView;
pub use profile::ProfileView;

use crate::error::Result;
use crate::models::User;
use crate::routes::Page;
use crate::services::{FollowView, TripBoard, ViewScope};
use crate::AppState;

/// Data a page renders.
pub enum PageData {
    Landing { users: Vec<User> },
    Login,
    SignUp,
    Home { trips: TripBoard },
    MyLog { trips: TripBoard },
    Search { recent: Vec<String> },
    Profile(ProfileView),
    Map,
    UserProfile(FollowView),
    CityDetail(CityView),
}

/// Load what `page` needs.
pub async fn load(state: &AppState, scope: &ViewScope, page: &Page) -> Result<PageData> {
    Ok(match page {
        Page::Landing => PageData::Landing {
            users: home::load_landing(state, scope).await?,
        },
        Page::Login => PageData::Login,
        Page::SignUp => PageData::SignUp,
        Page::Home => PageData::Home {
            trips: home::load_home(state, scope).await?,
        },
        Page::MyLog => PageData::MyLog {
            trips: mylog::load_mylog(state, scope).await?,
        },
        Page::Search => PageData::Search {
            recent: state.searches.list(),
        },
        Page::Profile => PageData::Profile(profile::load_profile(state)?),
        Page::Map => PageData::Map,
        Page::UserProfile { username } => {
            PageData::UserProfile(profile::load_user_profile(state, scope, username).await?)
        }
        Page::CityDetail { city_id } => {
            PageData::CityDetail(city::load_city(state, scope, *city_id).await?)
        }
    })
}
