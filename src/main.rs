// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Travelog command-line client
//!
//! Drives the client data layer against a Travelog backend: log in, read
//! the feed, log trips, like and comment, follow people, search cities.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use travelog::{
    config::Config,
    error::{AppError, Presentation},
    models::{CommentId, NewTrip},
    pages::{auth, city, home, mylog, profile, search},
    routes::{resolve, Resolution},
    services::{LoginRequest, SignupRequest, TripBoard, ViewScope},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "travelog")]
#[command(about = "Travelog travel journal client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Trips from the people you follow
    Feed {
        /// Ignore the cached feed
        #[arg(long)]
        refresh: bool,
    },

    /// Your own trips
    Log,

    /// Log a new trip
    AddTrip {
        #[arg(long)]
        city: String,
        #[arg(long)]
        country: String,
        /// First day, YYYY-MM-DD
        #[arg(long, value_name = "DATE")]
        start: NaiveDate,
        /// Last day, YYYY-MM-DD
        #[arg(long, value_name = "DATE")]
        end: NaiveDate,
        #[arg(long, default_value = "")]
        accommodation: String,
        #[arg(long, default_value = "")]
        restaurants: String,
        #[arg(long, default_value = "")]
        attractions: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Photo to attach (repeatable)
        #[arg(long, value_name = "PATH")]
        media: Vec<PathBuf>,
    },

    /// Delete one of your trips
    DeleteTrip {
        trip_id: u64,
        /// Skip the confirmation step
        #[arg(long)]
        yes: bool,
    },

    /// Like or unlike a trip
    Like { trip_id: u64 },

    /// Comment on a trip, or delete one of your comments
    Comment {
        trip_id: u64,
        /// Comment text
        text: Option<String>,
        /// Delete this comment instead of posting
        #[arg(long, value_name = "COMMENT_ID", conflicts_with = "text")]
        delete: Option<u64>,
    },

    /// Follow or unfollow a user
    Follow { username: String },

    /// Show a profile (yours when no username is given)
    Profile { username: Option<String> },

    /// Show a city with its trips and visitors
    City { city_id: u64 },

    /// Search cities; without a query, list recent searches
    Search {
        query: Option<String>,
        /// Forget recent searches
        #[arg(long)]
        clear: bool,
    },

    /// Show what a path resolves to
    Route { path: String },
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    if let Err((e, what)) = run(&state, cli.command).await {
        match e.presentation(what) {
            Presentation::Blocking(msg) | Presentation::Inline(msg) => eprintln!("{}", msg),
            Presentation::Silent => {}
        }
        process::exit(1);
    }
}

type CommandResult = std::result::Result<(), (AppError, &'static str)>;

trait Context<T> {
    fn what(self, what: &'static str) -> std::result::Result<T, (AppError, &'static str)>;
}

impl<T> Context<T> for travelog::error::Result<T> {
    fn what(self, what: &'static str) -> std::result::Result<T, (AppError, &'static str)> {
        self.map_err(|e| (e, what))
    }
}

async fn run(state: &AppState, command: Commands) -> CommandResult {
    let scope = ViewScope::new();

    match command {
        Commands::Signup {
            username,
            email,
            password,
        } => {
            let request = SignupRequest {
                username,
                email,
                password,
            };
            let session = auth::signup(state, &request).await.what("account")?;
            println!("Welcome, {}!", session.username);
        }

        Commands::Login { username, password } => {
            let request = LoginRequest { username, password };
            let session = auth::login(state, &request).await.what("session")?;
            println!("Logged in as {}", session.username);
        }

        Commands::Logout => {
            auth::sign_out(state).what("session")?;
            println!("Signed out");
        }

        Commands::Whoami => {
            let view = profile::load_profile(state).what("profile")?;
            print_json(&view);
        }

        Commands::Feed { refresh } => {
            if refresh {
                let session = state.require_session().what("feed")?;
                state.feed.invalidate(session.id);
            }
            let board = home::load_home(state, &scope).await.what("feed")?;
            print_json(&board.snapshot());
        }

        Commands::Log => {
            let board = mylog::load_mylog(state, &scope).await.what("trips")?;
            print_json(&board.snapshot());
        }

        Commands::AddTrip {
            city,
            country,
            start,
            end,
            accommodation,
            restaurants,
            attractions,
            notes,
            media,
        } => {
            let trip = NewTrip {
                city,
                country,
                start_date: Some(start),
                end_date: Some(end),
                accommodation,
                favorite_restaurants: restaurants,
                favorite_attractions: attractions,
                other_notes: notes,
                media,
            };
            let board = TripBoard::default();
            mylog::add_trip(state, &board, &trip).await.what("trip")?;
            print_json(&board.snapshot());
        }

        Commands::DeleteTrip { trip_id, yes } => {
            let board = mylog::load_mylog(state, &scope).await.what("trips")?;
            let mut detail = state.trip_detail(board).what("trip")?;
            detail.open(trip_id).what("trip")?;
            detail.request_delete().what("trip")?;
            if !yes {
                eprintln!("Pass --yes to delete trip {}", trip_id);
                detail.cancel_delete();
                return Ok(());
            }
            detail.confirm_delete().await.what("trip")?;
            println!("Deleted trip {}", trip_id);
        }

        Commands::Like { trip_id } => {
            let board = board_with_trip(state, &scope, trip_id).await?;
            let mut detail = state.trip_detail(board).what("trip")?;
            detail.open(trip_id).what("trip")?;
            let liked = detail.toggle_like().await.what("trip")?;
            println!("{} trip {}", if liked { "Liked" } else { "Unliked" }, trip_id);
        }

        Commands::Comment {
            trip_id,
            text,
            delete,
        } => {
            let board = board_with_trip(state, &scope, trip_id).await?;
            let mut detail = state.trip_detail(board).what("trip")?;
            detail.open(trip_id).what("trip")?;
            detail.load_comments().await.what("comments")?;
            match (delete, text) {
                (Some(comment_id), _) => {
                    detail
                        .remove_comment(CommentId::Confirmed(comment_id))
                        .await
                        .what("comment")?;
                    println!("Deleted comment {}", comment_id);
                }
                (None, Some(text)) => {
                    let comment = detail.add_comment(&text).await.what("comment")?;
                    print_json(&comment);
                }
                (None, None) => {
                    if let Some(trip) = detail.trip() {
                        print_json(&trip.comments);
                    }
                }
            }
        }

        Commands::Follow { username } => {
            let view = profile::load_user_profile(state, &scope, &username)
                .await
                .what("profile")?;
            let following = profile::toggle_follow(state, &view).await.what("profile")?;
            println!(
                "{} {}",
                if following { "Following" } else { "Unfollowed" },
                username
            );
        }

        Commands::Profile { username: None } => {
            let view = profile::refresh_profile(state, &scope)
                .await
                .what("profile")?;
            print_json(&view);
        }

        Commands::Profile {
            username: Some(username),
        } => {
            let view = profile::load_user_profile(state, &scope, &username)
                .await
                .what("profile")?;
            let follow = view.snapshot();
            print_json(&serde_json::json!({
                "user": view.target(),
                "avatar_url": profile::avatar_url(state, view.target()),
                "is_following": follow.is_following,
                "followers": follow.followers,
                "following": follow.following,
            }));
        }

        Commands::City { city_id } => {
            let view = city::load_city(state, &scope, city_id).await.what("city data")?;
            print_json(&serde_json::json!({
                "city": view.city,
                "trips": view.trips.snapshot(),
                "users": view.visitors,
            }));
        }

        Commands::Search { query, clear } => {
            if clear {
                state.searches.clear().what("recent searches")?;
            }
            match query {
                Some(query) => {
                    let cities = search::search(state, &scope, &query).await.what("cities")?;
                    print_json(&cities);
                }
                None if !clear => print_json(&state.searches.list()),
                None => {}
            }
        }

        Commands::Route { path } => match resolve(&path, state.session.is_present()) {
            Resolution::Render(page) => println!("{}", page.path()),
            Resolution::Redirect { to } => println!("{} -> {}", path, to),
        },
    }

    Ok(())
}

/// Load whichever list holds `trip_id`: the feed first, then your own log.
async fn board_with_trip(
    state: &AppState,
    scope: &ViewScope,
    trip_id: u64,
) -> std::result::Result<TripBoard, (AppError, &'static str)> {
    let feed = home::load_home(state, scope).await.what("feed")?;
    if feed.get(trip_id).is_some() {
        return Ok(feed);
    }
    mylog::load_mylog(state, scope).await.what("trips")
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render output: {}", e),
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("travelog=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
