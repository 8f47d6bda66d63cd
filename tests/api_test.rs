use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use league_scorer::api::server::build_router;
use league_scorer::db::queries;
use league_scorer::models::api::{EventType, NewLeague, NewMatch, NewTeam, UpdateMatch};
use league_scorer::{create_match, delete_match, update_match};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

/// Lazy pool that never connects; enough for routes that do not touch the
/// database (health, payload validation rejections).
fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .expect("lazy pool")
}

async fn setup_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

fn test_league() -> NewLeague {
    NewLeague {
        name: "Test League".to_string(),
        competition: "Soccer".to_string(),
        description: None,
        max_teams: None,
        first_place_points: 3,
        second_place_points: 1,
        draw_points: Some(1),
    }
}

fn test_team(name: &str) -> NewTeam {
    NewTeam {
        name: name.to_string(),
        city: None,
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = build_router(lazy_pool());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_create_match_same_team_rejected() {
    let app = build_router(lazy_pool());

    let payload = serde_json::json!({
        "team1_id": 1,
        "team2_id": 1,
        "team1_score": 2,
        "team2_score": 1,
        "event_type": "League",
        "event_location": "Stadium"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/leagues/1/matches")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(error["error"], "validation_error");
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("cannot play against itself"));
}

#[tokio::test]
async fn test_create_match_negative_score_rejected() {
    let app = build_router(lazy_pool());

    let payload = serde_json::json!({
        "team1_id": 1,
        "team2_id": 2,
        "team1_score": -1,
        "team2_score": 0,
        "event_type": "Friendly",
        "event_location": "Stadium"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/leagues/1/matches")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Full lifecycle against Postgres: create a win, correct it to a draw,
/// delete it, and check the standings at every step.
#[tokio::test]
async fn test_match_lifecycle_updates_standings() {
    let Some(pool) = setup_test_pool().await else {
        return;
    };

    let league = queries::insert_league(&pool, &test_league()).await.unwrap();
    let team1 = queries::insert_team(&pool, &test_team("Rovers")).await.unwrap();
    let team2 = queries::insert_team(&pool, &test_team("Wanderers")).await.unwrap();

    // Match created as 2:1 - team1 takes the win and 3 points
    let stored = create_match(
        &pool,
        league.id,
        &NewMatch {
            team1_id: team1.id,
            team2_id: team2.id,
            team1_score: 2,
            team2_score: 1,
            event_type: EventType::League,
            event_location: "Stadium".to_string(),
        },
    )
    .await
    .unwrap();

    let standings = queries::list_standings(&pool, league.id).await.unwrap();
    assert_eq!(standings.len(), 2);

    let s1 = standings.iter().find(|s| s.team_id == team1.id).unwrap();
    let s2 = standings.iter().find(|s| s.team_id == team2.id).unwrap();
    assert_eq!((s1.wins, s1.losses, s1.draws, s1.points), (1, 0, 0, 3));
    assert_eq!((s2.wins, s2.losses, s2.draws, s2.points), (0, 1, 0, 1));

    // Corrected to 1:1 - the win is reversed, both sides get a draw
    update_match(
        &pool,
        league.id,
        stored.id,
        &UpdateMatch {
            team1_id: team1.id,
            team2_id: team2.id,
            team1_score: 1,
            team2_score: 1,
            event_type: EventType::League,
            event_location: "Stadium".to_string(),
        },
    )
    .await
    .unwrap();

    let standings = queries::list_standings(&pool, league.id).await.unwrap();
    let s1 = standings.iter().find(|s| s.team_id == team1.id).unwrap();
    let s2 = standings.iter().find(|s| s.team_id == team2.id).unwrap();
    assert_eq!((s1.wins, s1.losses, s1.draws, s1.points), (0, 0, 1, 1));
    assert_eq!((s2.wins, s2.losses, s2.draws, s2.points), (0, 0, 1, 1));

    // Deleted - both standings return to zero
    delete_match(&pool, league.id, stored.id).await.unwrap();

    let standings = queries::list_standings(&pool, league.id).await.unwrap();
    for standing in &standings {
        assert_eq!(
            (standing.wins, standing.losses, standing.draws, standing.points),
            (0, 0, 0, 0)
        );
    }

    // Deleting again must 404 and leave standings untouched
    let err = delete_match(&pool, league.id, stored.id).await.unwrap_err();
    assert!(matches!(err, league_scorer::DomainError::NotFound(_)));
}

/// One win and one draw for the same team accumulate to 1/0/1 and 4 points.
#[tokio::test]
async fn test_outcomes_accumulate_across_matches() {
    let Some(pool) = setup_test_pool().await else {
        return;
    };

    let league = queries::insert_league(&pool, &test_league()).await.unwrap();
    let team1 = queries::insert_team(&pool, &test_team("United")).await.unwrap();
    let team2 = queries::insert_team(&pool, &test_team("City")).await.unwrap();
    let team3 = queries::insert_team(&pool, &test_team("Athletic")).await.unwrap();

    create_match(
        &pool,
        league.id,
        &NewMatch {
            team1_id: team1.id,
            team2_id: team2.id,
            team1_score: 3,
            team2_score: 0,
            event_type: EventType::League,
            event_location: "Home".to_string(),
        },
    )
    .await
    .unwrap();

    create_match(
        &pool,
        league.id,
        &NewMatch {
            team1_id: team3.id,
            team2_id: team1.id,
            team1_score: 2,
            team2_score: 2,
            event_type: EventType::League,
            event_location: "Away".to_string(),
        },
    )
    .await
    .unwrap();

    let standings = queries::list_standings(&pool, league.id).await.unwrap();
    let s1 = standings.iter().find(|s| s.team_id == team1.id).unwrap();
    assert_eq!((s1.wins, s1.losses, s1.draws, s1.points), (1, 0, 1, 4));

    // Best record first
    assert_eq!(standings[0].team_id, team1.id);
}

/// Joining a league creates a zeroed standing so the table lists the team
/// before it has played.
#[tokio::test]
async fn test_join_league_creates_zeroed_standing() {
    let Some(pool) = setup_test_pool().await else {
        return;
    };

    let league = queries::insert_league(&pool, &test_league()).await.unwrap();
    let team = queries::insert_team(&pool, &test_team("Albion")).await.unwrap();

    let app = build_router(pool.clone());

    let payload = serde_json::to_string(&serde_json::json!({ "team_id": team.id })).unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/leagues/{}/teams", league.id))
                .header("content-type", "application/json")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let standings = queries::list_standings(&pool, league.id).await.unwrap();
    assert_eq!(standings.len(), 1);
    assert_eq!(
        (standings[0].wins, standings[0].losses, standings[0].draws, standings[0].points),
        (0, 0, 0, 0)
    );

    // A second join is a conflict
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/leagues/{}/teams", league.id))
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Leaving a league is refused while the team has recorded matches there;
/// once the matches are deleted the leave goes through and the standing
/// is dropped. A leave that slipped through would strand the matches with
/// outcomes that can never be reversed.
#[tokio::test]
async fn test_leave_league_blocked_while_matches_recorded() {
    let Some(pool) = setup_test_pool().await else {
        return;
    };

    let league = queries::insert_league(&pool, &test_league()).await.unwrap();
    let team1 = queries::insert_team(&pool, &test_team("Harriers")).await.unwrap();
    let team2 = queries::insert_team(&pool, &test_team("Corinthians")).await.unwrap();

    let app = build_router(pool.clone());

    for team in [&team1, &team2] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/leagues/{}/teams", league.id))
                    .header("content-type", "application/json")
                    .body(Body::from(format!("{{\"team_id\": {}}}", team.id)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let stored = create_match(
        &pool,
        league.id,
        &NewMatch {
            team1_id: team1.id,
            team2_id: team2.id,
            team1_score: 2,
            team2_score: 1,
            event_type: EventType::League,
            event_location: "Stadium".to_string(),
        },
    )
    .await
    .unwrap();

    let leave_uri = format!("/leagues/{}/teams/{}", league.id, team1.id);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&leave_uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The match is still fully reversible after the refused leave
    delete_match(&pool, league.id, stored.id).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&leave_uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let standings = queries::list_standings(&pool, league.id).await.unwrap();
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].team_id, team2.id);
}

/// PUT /teams/{id} changes only the supplied fields.
#[tokio::test]
async fn test_update_team_partial_fields() {
    let Some(pool) = setup_test_pool().await else {
        return;
    };

    let team = queries::insert_team(&pool, &test_team("Olympic")).await.unwrap();

    let app = build_router(pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/teams/{}", team.id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"city": "Lyon"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let updated: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated["name"], "Olympic");
    assert_eq!(updated["city"], "Lyon");
}

#[tokio::test]
async fn test_update_team_blank_name_rejected() {
    let app = build_router(lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/teams/1")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name": "  "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Standings for an unknown league are a 404, not an empty table.
#[tokio::test]
async fn test_standings_unknown_league() {
    let Some(pool) = setup_test_pool().await else {
        return;
    };

    let app = build_router(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/leagues/999999999/standings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
