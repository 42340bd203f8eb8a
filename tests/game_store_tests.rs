// tests/game_store_tests.rs

mod common;

use common::{T, seed_game, test_pool};
use quiz_arena::{
    db,
    error::AppError,
    models::game::{NewGameSession, Permission},
};

#[tokio::test]
async fn create_rejects_missing_pieces() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    let empty_name = NewGameSession {
        quiz_id: fx.quiz_id,
        name: "   ".to_string(),
        duration: 600,
    };
    assert!(matches!(
        db::game::create(&pool, &empty_name).await,
        Err(AppError::InvalidInput(_))
    ));

    let no_duration = NewGameSession {
        quiz_id: fx.quiz_id,
        name: "g".to_string(),
        duration: 0,
    };
    assert!(matches!(
        db::game::create(&pool, &no_duration).await,
        Err(AppError::InvalidInput(_))
    ));

    let unknown_quiz = NewGameSession {
        quiz_id: 9999,
        name: "g".to_string(),
        duration: 600,
    };
    assert!(matches!(
        db::game::create(&pool, &unknown_quiz).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn permission_is_tri_state() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    assert_eq!(
        db::game::has_permission(&pool, fx.owner, fx.game_id).await.unwrap(),
        Permission::Granted
    );
    assert_eq!(
        db::game::has_permission(&pool, fx.alice, fx.game_id).await.unwrap(),
        Permission::Denied
    );
    assert_eq!(
        db::game::has_permission(&pool, fx.owner, 9999).await.unwrap(),
        Permission::Unknown
    );
}

#[tokio::test]
async fn start_is_write_once() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    assert!(!db::game::has_started(&pool, fx.game_id).await.unwrap());

    let first = db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();
    assert_eq!(first, None);

    let second = db::game::start(&pool, fx.owner, fx.game_id, T + 50).await.unwrap();
    assert_eq!(second, Some(T));

    let session = db::game::get(&pool, fx.game_id).await.unwrap();
    assert_eq!(session.starttime, Some(T));
    assert!(db::game::has_started(&pool, fx.game_id).await.unwrap());
}

#[tokio::test]
async fn only_the_host_may_start() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    assert!(matches!(
        db::game::start(&pool, fx.alice, fx.game_id, T).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        db::game::start(&pool, fx.owner, 9999, T).await,
        Err(AppError::NotFound(_))
    ));

    let session = db::game::get(&pool, fx.game_id).await.unwrap();
    assert_eq!(session.starttime, None);
}

#[tokio::test]
async fn stop_caps_endtime_at_duration_and_is_write_once() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    db::game::join(&pool, fx.alice, fx.game_id, T).await.unwrap();
    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();

    let first = db::game::stop(&pool, fx.alice, fx.game_id, T + 5000).await.unwrap();
    assert_eq!(first, None);

    let session = db::game::get(&pool, fx.game_id).await.unwrap();
    assert_eq!(session.endtime, Some(T + 600));

    let second = db::game::stop(&pool, fx.alice, fx.game_id, T + 6000).await.unwrap();
    assert_eq!(second, Some(T + 600));
}

#[tokio::test]
async fn stop_before_deadline_uses_now() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    db::game::join(&pool, fx.bob, fx.game_id, T).await.unwrap();
    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();
    db::game::stop(&pool, fx.bob, fx.game_id, T + 120).await.unwrap();

    let session = db::game::get(&pool, fx.game_id).await.unwrap();
    assert_eq!(session.endtime, Some(T + 120));
    assert!(session.endtime <= session.calc_endtime());
}

#[tokio::test]
async fn stop_requires_membership_and_a_started_game() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    db::game::join(&pool, fx.alice, fx.game_id, T).await.unwrap();
    assert!(matches!(
        db::game::stop(&pool, fx.alice, fx.game_id, T).await,
        Err(AppError::InvalidInput(_))
    ));

    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();
    assert!(matches!(
        db::game::stop(&pool, fx.bob, fx.game_id, T + 10).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        db::game::stop(&pool, fx.alice, 9999, T + 10).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn join_is_idempotent_and_leave_reports_removal() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    assert!(db::game::join(&pool, fx.alice, fx.game_id, T).await.unwrap());
    assert!(!db::game::join(&pool, fx.alice, fx.game_id, T).await.unwrap());
    assert_eq!(db::game::members(&pool, fx.game_id).await.unwrap().len(), 1);
    assert!(db::game::is_member(&pool, fx.alice, fx.game_id).await.unwrap());

    assert!(db::game::leave(&pool, fx.alice, fx.game_id).await.unwrap());
    assert!(!db::game::leave(&pool, fx.alice, fx.game_id).await.unwrap());
    assert!(db::game::members(&pool, fx.game_id).await.unwrap().is_empty());

    assert!(matches!(
        db::game::join(&pool, fx.alice, 9999, T).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        db::game::leave(&pool, fx.alice, 9999).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn finished_games_cannot_be_joined() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();
    assert!(matches!(
        db::game::join(&pool, fx.alice, fx.game_id, T + 601).await,
        Err(AppError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn remove_is_host_only_and_cascades() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    db::game::join(&pool, fx.alice, fx.game_id, T).await.unwrap();
    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();
    db::performance::record_answer(&pool, fx.alice, fx.game_id, fx.questions[0], "a0", T + 5)
        .await
        .unwrap();

    assert!(matches!(
        db::game::remove(&pool, fx.alice, fx.game_id).await,
        Err(AppError::Unauthorized(_))
    ));

    db::game::remove(&pool, fx.owner, fx.game_id).await.unwrap();

    assert!(db::game::find(&pool, fx.game_id).await.unwrap().is_none());
    let members = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM game_member WHERE gamesession_id = ?")
        .bind(fx.game_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(members, 0);
    let answers =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM question_performance WHERE gamesession_id = ?")
            .bind(fx.game_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(answers, 0);

    assert!(matches!(
        db::game::remove(&pool, fx.owner, fx.game_id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn answers_are_checked_and_recorded_once() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    db::game::join(&pool, fx.alice, fx.game_id, T).await.unwrap();

    // Not started yet.
    assert!(matches!(
        db::performance::record_answer(&pool, fx.alice, fx.game_id, fx.questions[0], "a0", T).await,
        Err(AppError::InvalidInput(_))
    ));

    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();

    let right = db::performance::record_answer(&pool, fx.alice, fx.game_id, fx.questions[0], " a0 ", T + 1)
        .await
        .unwrap();
    assert!(right.correct);
    assert_eq!(right.gamecounter, 1);
    assert_eq!(right.total_questions, 5);

    let wrong = db::performance::record_answer(&pool, fx.alice, fx.game_id, fx.questions[1], "nope", T + 2)
        .await
        .unwrap();
    assert!(!wrong.correct);
    assert_eq!(wrong.gamecounter, 2);

    assert!(matches!(
        db::performance::record_answer(&pool, fx.alice, fx.game_id, fx.questions[0], "a0", T + 3).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        db::performance::record_answer(&pool, fx.bob, fx.game_id, fx.questions[2], "a2", T + 3).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        db::performance::record_answer(&pool, fx.alice, fx.game_id, 9999, "a2", T + 3).await,
        Err(AppError::InvalidInput(_))
    ));

    // Past the deadline.
    assert!(matches!(
        db::performance::record_answer(&pool, fx.alice, fx.game_id, fx.questions[2], "a2", T + 600).await,
        Err(AppError::InvalidInput(_))
    ));

    assert_eq!(db::performance::correct_answer_count(&pool, fx.alice).await.unwrap(), 1);
}

#[tokio::test]
async fn report_ranks_accuracy_before_speed() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    for user in [fx.alice, fx.bob, fx.carol] {
        db::game::join(&pool, user, fx.game_id, T).await.unwrap();
    }
    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();

    // Alice: 5/5 correct, last answer at T+4:00.
    for (i, q) in fx.questions.iter().enumerate() {
        let at = T + 48 * (i as i64 + 1);
        db::performance::record_answer(&pool, fx.alice, fx.game_id, *q, &format!("a{}", i), at)
            .await
            .unwrap();
    }
    // Bob: 3/5 correct, last answer at T+6:00.
    for (i, q) in fx.questions.iter().enumerate() {
        let answer = if i < 3 { format!("a{}", i) } else { "wrong".to_string() };
        let at = T + 72 * (i as i64 + 1);
        db::performance::record_answer(&pool, fx.bob, fx.game_id, *q, &answer, at)
            .await
            .unwrap();
    }
    // Carol never answers.

    let report = db::report::game_report(&pool, fx.game_id, T + 400).await.unwrap();
    assert_eq!(report.len(), 3);

    assert_eq!(report[0].user_id, fx.alice);
    assert_eq!(report[0].rank, 1);
    assert_eq!(report[0].question_answered_correct, Some(5));
    assert_eq!(report[0].total_time_in_sec, Some(240));

    assert_eq!(report[1].user_id, fx.bob);
    assert_eq!(report[1].rank, 2);
    assert_eq!(report[1].question_answered_correct, Some(3));
    assert_eq!(report[1].total_time_in_sec, Some(360));

    let carol = &report[2];
    assert_eq!(carol.user_id, fx.carol);
    assert_eq!(carol.rank, 3);
    assert_eq!(carol.answered_count, 0);
    assert_eq!(carol.question_answered, None);
    assert_eq!(carol.question_answered_correct, None);
    assert_eq!(carol.time_per_question, None);
    assert_eq!(carol.total_time_in_sec, None);
}

#[tokio::test]
async fn report_of_unknown_game_is_not_found() {
    let pool = test_pool().await;
    assert!(matches!(
        db::report::game_report(&pool, 42, T).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn question_details_and_session_data() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    for user in [fx.alice, fx.bob] {
        db::game::join(&pool, user, fx.game_id, T).await.unwrap();
    }
    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();

    let q0 = fx.questions[0];
    db::performance::record_answer(&pool, fx.alice, fx.game_id, q0, "a0", T + 1).await.unwrap();
    db::performance::record_answer(&pool, fx.bob, fx.game_id, q0, "x", T + 2).await.unwrap();

    let details = db::game::question_details(&pool, fx.game_id).await.unwrap();
    assert_eq!(details.len(), 5);
    let first = details.iter().find(|d| d.question_id == q0).unwrap();
    assert_eq!(first.answered_total, 2);
    assert_eq!(first.answered_correct, 1);
    assert_eq!(first.answered_wrong, 1);
    assert_eq!(first.weight, 1);
    assert!(details.iter().filter(|d| d.question_id != q0).all(|d| d.answered_total == 0));

    let data = db::game::session_data(&pool, fx.alice, fx.game_id).await.unwrap();
    assert_eq!(data.gamecounter, 1);
    assert_eq!(data.gamequestions, fx.questions);
}

#[tokio::test]
async fn listings_follow_the_lifecycle() {
    let pool = test_pool().await;
    let fx = seed_game(&pool).await;

    db::game::join(&pool, fx.alice, fx.game_id, T).await.unwrap();

    let open = db::game::open_games(&pool).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].owner, "owner");
    assert_eq!(open[0].members, 1);

    assert_eq!(db::game::hosted_by(&pool, fx.owner).await.unwrap().len(), 1);
    assert!(db::game::hosted_by(&pool, fx.alice).await.unwrap().is_empty());
    assert_eq!(db::game::participated_by(&pool, fx.alice).await.unwrap().len(), 1);
    assert!(db::game::active_games(&pool, fx.alice, T).await.unwrap().is_empty());

    db::game::start(&pool, fx.owner, fx.game_id, T).await.unwrap();

    assert!(db::game::open_games(&pool).await.unwrap().is_empty());
    let active = db::game::active_games(&pool, fx.alice, T + 10).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].calc_endtime, Some(T + 600));
    assert!(db::game::active_games(&pool, fx.alice, T + 600).await.unwrap().is_empty());

    let info = db::game::info(&pool, fx.game_id).await.unwrap();
    assert_eq!(info.owner_id, fx.owner);
    assert_eq!(info.quizname, "Physics basics");
    assert_eq!(info.calc_endtime, Some(T + 600));
}
