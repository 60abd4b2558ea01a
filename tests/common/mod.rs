// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the Travelog backend.

#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use travelog::config::Config;
use travelog::models::{City, Comment, CommentId, Photo, Trip, User};
use travelog::AppState;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CAROL: u64 = 3;
pub const PRAGUE_TRIP: u64 = 10;
pub const LISBON_TRIP: u64 = 11;
pub const PASSWORD: &str = "password";

#[derive(Default)]
pub struct MockData {
    pub users: Vec<User>,
    /// (follower, followee)
    pub follows: HashSet<(u64, u64)>,
    pub trips: Vec<Trip>,
    pub cities: Vec<City>,
    pub next_id: u64,
    /// Whether signup responds with the created user
    pub echo_signup_user: bool,
}

/// Shared mock state: data, per-endpoint call counts, injected failures
/// and response delays.
#[derive(Default)]
pub struct MockBackend {
    pub data: Mutex<MockData>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
}

impl MockBackend {
    /// Number of requests served for `endpoint`.
    pub fn calls(&self, endpoint: &'static str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    /// Make `endpoint` answer 500 until `recover` is called.
    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().remove(endpoint);
    }

    /// Hold every response from `endpoint` for `delay` before answering.
    pub fn delay(&self, endpoint: &'static str, delay: Duration) {
        self.delays.lock().unwrap().insert(endpoint, delay);
    }

    pub fn trip(&self, trip_id: u64) -> Option<Trip> {
        let data = self.data.lock().unwrap();
        data.trips.iter().find(|t| t.id == trip_id).cloned()
    }

    pub fn follows(&self, follower: u64, followee: u64) -> bool {
        self.data.lock().unwrap().follows.contains(&(follower, followee))
    }

    /// Count the call, wait out any injected delay, and report whether it
    /// should fail.
    async fn hit(&self, endpoint: &'static str) -> Result<(), Response> {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
        let delay = self.delays.lock().unwrap().get(endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(endpoint) {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "injected failure" })),
            )
                .into_response());
        }
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn trip(id: u64, owner: &User, city: &str, country: &str) -> Trip {
    Trip {
        id,
        user_id: owner.id,
        username: Some(owner.username.clone()),
        city: city.to_string(),
        country: country.to_string(),
        start_date: date(2024, 5, 1),
        end_date: date(2024, 5, 6),
        accommodation: None,
        favorite_restaurants: None,
        favorite_attractions: None,
        other_notes: None,
        photos: vec![],
        likes: Default::default(),
        comments: vec![],
    }
}

fn user(id: u64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: Some(format!("{}@example.com", username)),
        avatar: None,
    }
}

/// Alice follows Bob. Bob has a Prague trip, Carol a Lisbon trip.
fn seed() -> MockData {
    let alice = user(ALICE, "alice");
    let bob = user(BOB, "bob");
    let carol = user(CAROL, "carol");
    MockData {
        trips: vec![
            trip(PRAGUE_TRIP, &bob, "Prague", "Czechia"),
            trip(LISBON_TRIP, &carol, "Lisbon", "Portugal"),
        ],
        cities: vec![
            City {
                id: 100,
                name: "Prague".to_string(),
                country: "Czechia".to_string(),
                trip_count: Some(1),
            },
            City {
                id: 101,
                name: "Lisbon".to_string(),
                country: "Portugal".to_string(),
                trip_count: Some(1),
            },
        ],
        users: vec![alice, bob, carol],
        follows: HashSet::from([(ALICE, BOB)]),
        next_id: 1000,
        echo_signup_user: true,
    }
}

type Shared = State<Arc<MockBackend>>;

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
    #[serde(default)]
    email: Option<String>,
}

async fn login(State(mock): Shared, Json(body): Json<Credentials>) -> Response {
    if let Err(r) = mock.hit("login").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    match data.users.iter().find(|u| u.username == body.username) {
        Some(user) if body.password == PASSWORD => Json(json!({ "user": user })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn signup(State(mock): Shared, Json(body): Json<Credentials>) -> Response {
    if let Err(r) = mock.hit("signup").await {
        return r;
    }
    let mut data = mock.data.lock().unwrap();
    if data.users.iter().any(|u| u.username == body.username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Username already taken" })),
        )
            .into_response();
    }
    if body.password != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Mock only accepts the test password" })),
        )
            .into_response();
    }
    data.next_id += 1;
    let created = User {
        id: data.next_id,
        username: body.username,
        email: body.email,
        avatar: None,
    };
    data.users.push(created.clone());
    if data.echo_signup_user {
        (StatusCode::CREATED, Json(json!({ "user": created }))).into_response()
    } else {
        (
            StatusCode::CREATED,
            Json(json!({ "message": "User created successfully" })),
        )
            .into_response()
    }
}

async fn list_users(State(mock): Shared) -> Response {
    if let Err(r) = mock.hit("users").await {
        return r;
    }
    Json(mock.data.lock().unwrap().users.clone()).into_response()
}

async fn get_user(State(mock): Shared, Path(id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("user").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    match data.users.iter().find(|u| u.id == id) {
        Some(user) => Json(user.clone()).into_response(),
        None => not_found(),
    }
}

async fn followers(State(mock): Shared, Path(id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("followers").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    let users: Vec<User> = data
        .users
        .iter()
        .filter(|u| data.follows.contains(&(u.id, id)))
        .cloned()
        .collect();
    Json(users).into_response()
}

async fn following(State(mock): Shared, Path(id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("following").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    let users: Vec<User> = data
        .users
        .iter()
        .filter(|u| data.follows.contains(&(id, u.id)))
        .cloned()
        .collect();
    Json(users).into_response()
}

#[derive(Deserialize)]
struct FollowBody {
    target_user_id: u64,
}

async fn follow(State(mock): Shared, Path(id): Path<u64>, Json(body): Json<FollowBody>) -> Response {
    if let Err(r) = mock.hit("follow").await {
        return r;
    }
    mock.data
        .lock()
        .unwrap()
        .follows
        .insert((id, body.target_user_id));
    Json(json!({ "message": "Followed" })).into_response()
}

async fn unfollow(
    State(mock): Shared,
    Path(id): Path<u64>,
    Json(body): Json<FollowBody>,
) -> Response {
    if let Err(r) = mock.hit("unfollow").await {
        return r;
    }
    mock.data
        .lock()
        .unwrap()
        .follows
        .remove(&(id, body.target_user_id));
    Json(json!({ "message": "Unfollowed" })).into_response()
}

async fn user_trips(State(mock): Shared, Path(user_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("user_trips").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    let trips: Vec<Trip> = data
        .trips
        .iter()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect();
    Json(trips).into_response()
}

async fn feed(State(mock): Shared, Path(user_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("feed").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    let trips: Vec<Trip> = data
        .trips
        .iter()
        .filter(|t| data.follows.contains(&(user_id, t.user_id)))
        .cloned()
        .collect();
    Json(trips).into_response()
}

async fn create_trip(State(mock): Shared, mut multipart: Multipart) -> Response {
    if let Err(r) = mock.hit("create_trip").await {
        return r;
    }
    let mut fields = HashMap::new();
    let mut photos = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "media" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let _ = field.bytes().await;
            photos.push(Photo {
                url: format!("/uploads/{}", file_name),
            });
        } else if let Ok(text) = field.text().await {
            fields.insert(name, text);
        }
    }

    let mut data = mock.data.lock().unwrap();
    let Some(owner) = fields
        .get("user_id")
        .and_then(|v| v.parse::<u64>().ok())
        .and_then(|id| data.users.iter().find(|u| u.id == id).cloned())
    else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Unknown user" }))).into_response();
    };
    let parse = |key: &str| {
        fields
            .get(key)
            .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
    };
    let (Some(start), Some(end)) = (parse("start_date"), parse("end_date")) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad dates" }))).into_response();
    };

    data.next_id += 1;
    let mut created = trip(
        data.next_id,
        &owner,
        fields.get("city").map(String::as_str).unwrap_or_default(),
        fields.get("country").map(String::as_str).unwrap_or_default(),
    );
    created.start_date = start;
    created.end_date = end;
    created.accommodation = fields.get("accommodation").cloned().filter(|s| !s.is_empty());
    created.photos = photos;
    data.trips.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn delete_trip(State(mock): Shared, Path(trip_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("delete_trip").await {
        return r;
    }
    let mut data = mock.data.lock().unwrap();
    let before = data.trips.len();
    data.trips.retain(|t| t.id != trip_id);
    if data.trips.len() == before {
        return not_found();
    }
    Json(json!({ "message": "Trip deleted" })).into_response()
}

#[derive(Deserialize)]
struct LikeBody {
    user_id: u64,
}

async fn like(State(mock): Shared, Path(trip_id): Path<u64>, Json(body): Json<LikeBody>) -> Response {
    if let Err(r) = mock.hit("like").await {
        return r;
    }
    let mut data = mock.data.lock().unwrap();
    let Some(trip) = data.trips.iter_mut().find(|t| t.id == trip_id) else {
        return not_found();
    };
    if !trip.is_liked_by(body.user_id) {
        trip.likes.toggle(body.user_id);
    }
    Json(json!({ "message": "Liked" })).into_response()
}

async fn unlike(
    State(mock): Shared,
    Path(trip_id): Path<u64>,
    Json(body): Json<LikeBody>,
) -> Response {
    if let Err(r) = mock.hit("unlike").await {
        return r;
    }
    let mut data = mock.data.lock().unwrap();
    let Some(trip) = data.trips.iter_mut().find(|t| t.id == trip_id) else {
        return not_found();
    };
    if trip.is_liked_by(body.user_id) {
        trip.likes.toggle(body.user_id);
    }
    Json(json!({ "message": "Unliked" })).into_response()
}

async fn comments(State(mock): Shared, Path(trip_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("comments").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    match data.trips.iter().find(|t| t.id == trip_id) {
        Some(trip) => Json(trip.comments.clone()).into_response(),
        None => not_found(),
    }
}

#[derive(Deserialize)]
struct CommentBody {
    user_id: u64,
    content: String,
}

async fn add_comment(
    State(mock): Shared,
    Path(trip_id): Path<u64>,
    Json(body): Json<CommentBody>,
) -> Response {
    if let Err(r) = mock.hit("add_comment").await {
        return r;
    }
    let mut data = mock.data.lock().unwrap();
    data.next_id += 1;
    let id = data.next_id;
    let username = data
        .users
        .iter()
        .find(|u| u.id == body.user_id)
        .map(|u| u.username.clone())
        .unwrap_or_default();
    let Some(trip) = data.trips.iter_mut().find(|t| t.id == trip_id) else {
        return not_found();
    };
    let comment = Comment {
        id: CommentId::Confirmed(id),
        trip_id,
        user_id: body.user_id,
        username,
        content: body.content,
        created_at: Utc::now(),
    };
    trip.comments.push(comment.clone());
    (StatusCode::CREATED, Json(comment)).into_response()
}

async fn delete_comment(State(mock): Shared, Path(comment_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("delete_comment").await {
        return r;
    }
    let mut data = mock.data.lock().unwrap();
    let mut found = false;
    for trip in data.trips.iter_mut() {
        let before = trip.comments.len();
        trip.comments
            .retain(|c| c.id != CommentId::Confirmed(comment_id));
        found |= trip.comments.len() != before;
    }
    if !found {
        return not_found();
    }
    Json(json!({ "message": "Comment deleted" })).into_response()
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search_cities(State(mock): Shared, Query(query): Query<SearchQuery>) -> Response {
    if let Err(r) = mock.hit("search").await {
        return r;
    }
    let needle = query.q.to_lowercase();
    let data = mock.data.lock().unwrap();
    let cities: Vec<City> = data
        .cities
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(cities).into_response()
}

async fn city(State(mock): Shared, Path(city_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("city").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    match data.cities.iter().find(|c| c.id == city_id) {
        Some(city) => Json(city.clone()).into_response(),
        None => not_found(),
    }
}

async fn city_trips(State(mock): Shared, Path(city_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("city_trips").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    let Some(city) = data.cities.iter().find(|c| c.id == city_id) else {
        return not_found();
    };
    let trips: Vec<Trip> = data
        .trips
        .iter()
        .filter(|t| t.city == city.name)
        .cloned()
        .collect();
    Json(trips).into_response()
}

async fn city_users(State(mock): Shared, Path(city_id): Path<u64>) -> Response {
    if let Err(r) = mock.hit("city_users").await {
        return r;
    }
    let data = mock.data.lock().unwrap();
    let Some(city) = data.cities.iter().find(|c| c.id == city_id) else {
        return not_found();
    };
    let visitors: Vec<User> = data
        .users
        .iter()
        .filter(|u| data.trips.iter().any(|t| t.user_id == u.id && t.city == city.name))
        .cloned()
        .collect();
    Json(visitors).into_response()
}

fn router(mock: Arc<MockBackend>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/followers", get(followers))
        .route("/users/{id}/following", get(following))
        .route("/users/{id}/follow", post(follow))
        .route("/users/{id}/unfollow", post(unfollow))
        .route("/trips", post(create_trip))
        .route("/trips/{id}", get(user_trips).delete(delete_trip))
        .route("/trips/{id}/like", post(like))
        .route("/trips/{id}/unlike", post(unlike))
        .route("/trips/{id}/comments", get(comments))
        .route("/trips/{id}/comment", post(add_comment))
        .route("/comments/{id}", delete(delete_comment))
        .route("/feed/{id}", get(feed))
        .route("/cities/search", get(search_cities))
        .route("/cities/{id}", get(city))
        .route("/cities/{id}/trips", get(city_trips))
        .route("/cities/{id}/users", get(city_users))
        .with_state(mock)
}

/// A running mock backend plus client state wired to it.
pub struct TestApp {
    pub state: AppState,
    pub mock: Arc<MockBackend>,
    pub config: Config,
    _state_dir: TempDir,
}

/// Start the mock backend on an ephemeral port and build client state for it.
pub async fn spawn_app() -> TestApp {
    let mock = Arc::new(MockBackend {
        data: Mutex::new(seed()),
        ..Default::default()
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(mock.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let state_dir = tempfile::tempdir().unwrap();
    let config = Config::test_default(&format!("http://{}", addr), state_dir.path());
    let state = AppState::new(config.clone()).unwrap();

    TestApp {
        state,
        mock,
        config,
        _state_dir: state_dir,
    }
}

impl TestApp {
    /// Log in as one of the seeded users.
    pub async fn login_as(&self, username: &str) {
        let request = travelog::services::LoginRequest {
            username: username.to_string(),
            password: PASSWORD.to_string(),
        };
        travelog::pages::auth::login(&self.state, &request)
            .await
            .unwrap();
    }

    pub fn state_dir(&self) -> &std::path::Path {
        self.config.state_dir.as_path()
    }
}
