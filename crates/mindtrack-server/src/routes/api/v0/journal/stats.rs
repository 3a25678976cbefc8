use crate::routes::api::v0::journal::error::JournalError;
use crate::routes::api::v0::local_time::LocalTime;
use crate::user::ExtractUserId;
use axum::extract::Query;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use mindtrack_core::journal::load_user_entries;
use mindtrack_core::stats::compute_mood_stats;
use mindtrack_db::sea_orm::DatabaseConnection;
use mindtrack_model::stats::MoodStats;

#[utoipa::path(
    get,
    path = "/api/v0/journal/stats",
    params(LocalTime),
    responses(
        (status = OK, description = "Mood analytics over all entries of the user", body = MoodStats),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn get_stats(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Query(local_time): Query<LocalTime>,
) -> Result<impl IntoResponse, JournalError> {
    let entries = load_user_entries(&conn, user).await?;
    Ok(Json(compute_mood_stats(&entries, local_time.now())))
}

#[cfg(test)]
mod tests {
    use crate::test_app::{TestApp, body_json};
    use chrono::{Duration, Utc};
    use http::StatusCode;
    use mindtrack_core::test_utils::StaticCompletion;
    use mindtrack_db::journal::journal_entry;
    use mindtrack_model::stats::MoodStats;
    use test_log::test;

    #[test(tokio::test)]
    async fn test_stats() {
        let app = TestApp::new(StaticCompletion::failing()).await;

        let stats: MoodStats = body_json(app.request(app.get("/api/v0/journal/stats")).await).await;
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.average_mood, 0.0);
        assert_eq!(stats.current_streak, 0);

        let now = Utc::now().fixed_offset();
        for (days_ago, mood) in [(0, Some(5)), (1, Some(3)), (1, None), (2, Some(4))] {
            journal_entry::Mutation::create_journal_entry(
                &app.conn,
                app.user_id,
                format!("{days_ago} days ago"),
                mood,
                now - Duration::days(days_ago),
            )
            .await
            .unwrap();
        }

        let response = app.request(app.get("/api/v0/journal/stats?utc_offset_minutes=0")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let stats: MoodStats = body_json(response).await;
        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.entries_with_mood, 3);
        assert_eq!(stats.average_mood, 4.0);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.trend.len(), 3);
        assert_eq!(stats.distribution.len(), 5);
    }
}
