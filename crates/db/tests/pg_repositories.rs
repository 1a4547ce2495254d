//! Repository contracts against a real PostgreSQL database.
//!
//! Ignored by default; run with `DATABASE_URL` set and `--ignored`.

use agenda_core::domain::{
    PasswordValidationInfo, SelectionType, TimeSlotKind, Token, TokenValidationInfo, User,
};
use agenda_db::repositories::Repository;
use agenda_db::{
    PgTransactionManager, TransactionManager, PARTICIPANTS_USER_SLOT_CONSTRAINT,
    USERS_EMAIL_CONSTRAINT,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn pvi() -> PasswordValidationInfo {
    PasswordValidationInfo::new("$argon2id$stub")
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn user_round_trip_and_token_eviction(pool: PgPool) {
    let trx = PgTransactionManager::new(pool);
    let mut tx = trx.begin().await.unwrap();

    let alice = tx
        .users()
        .create_user("Alice", "alice@example.com", &pvi())
        .await
        .unwrap();
    assert_eq!(
        tx.users().find_by_email("alice@example.com").await.unwrap(),
        Some(alice.clone())
    );

    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for (value, minutes) in [("a", 30), ("b", 10), ("c", 20), ("d", 40)] {
        let token = Token {
            validation_info: TokenValidationInfo::new(value),
            user_id: alice.id,
            created_at: t0,
            last_used_at: t0 + Duration::minutes(minutes),
        };
        tx.users().create_token(token, 3).await.unwrap();
    }

    let evicted = tx
        .users()
        .get_token_by_validation_info(&TokenValidationInfo::new("b"))
        .await
        .unwrap();
    assert!(evicted.is_none());

    let (owner, _) = tx
        .users()
        .get_token_by_validation_info(&TokenValidationInfo::new("d"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner, alice);

    let removed = tx
        .users()
        .remove_token_by_validation_info(&TokenValidationInfo::new("d"))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    tx.commit().await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn rollback_discards_user(pool: PgPool) {
    let trx = PgTransactionManager::new(pool);

    let mut tx = trx.begin().await.unwrap();
    tx.users()
        .create_user("Alice", "alice@example.com", &pvi())
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    let mut tx = trx.begin().await.unwrap();
    assert!(tx.users().find_all().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn duplicate_email_names_its_constraint(pool: PgPool) {
    let trx = PgTransactionManager::new(pool);
    let mut tx = trx.begin().await.unwrap();

    tx.users()
        .create_user("Alice", "alice@example.com", &pvi())
        .await
        .unwrap();
    let err = tx
        .users()
        .create_user("Other Alice", "alice@example.com", &pvi())
        .await
        .unwrap_err();

    assert_eq!(err.unique_violation(), Some(USERS_EMAIL_CONSTRAINT));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn saving_an_explicit_id_advances_the_sequence(pool: PgPool) {
    let trx = PgTransactionManager::new(pool);
    let mut tx = trx.begin().await.unwrap();

    let imported = User {
        id: 100,
        name: "Imported".into(),
        email: "imported@example.com".into(),
        password_validation: pvi(),
    };
    tx.users().save(&imported).await.unwrap();
    let created = tx
        .users()
        .create_user("Alice", "alice@example.com", &pvi())
        .await
        .unwrap();
    assert_eq!(created.id, 101);

    // Saving a lower id leaves the sequence where it is.
    let earlier = User {
        id: 5,
        email: "earlier@example.com".into(),
        ..imported
    };
    tx.users().save(&earlier).await.unwrap();
    let next = tx
        .users()
        .create_user("Bob", "bob@example.com", &pvi())
        .await
        .unwrap();
    assert_eq!(next.id, 102);
    tx.commit().await.unwrap();
}

// ---------------------------------------------------------------------------
// Events, slots and participants
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn slot_owner_and_participants_survive_reload(pool: PgPool) {
    let trx = PgTransactionManager::new(pool);
    let mut tx = trx.begin().await.unwrap();

    let alice = tx.users().create_user("Alice", "alice@example.com", &pvi()).await.unwrap();
    let bob = tx.users().create_user("Bob", "bob@example.com", &pvi()).await.unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 9, 30)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();

    let single = tx
        .events()
        .create_event("Interview", Some("1:1"), &alice, SelectionType::Single)
        .await
        .unwrap();
    let slot = tx
        .slots()
        .create_time_slot_single(start, 30, &single)
        .await
        .unwrap();
    let owned = slot.add_owner(bob.clone()).unwrap();
    tx.slots().save(&owned).await.unwrap();

    let reloaded = tx.slots().find_by_id(owned.id).await.unwrap().unwrap();
    assert_eq!(reloaded.kind, TimeSlotKind::Single { owner: Some(bob.clone()) });
    assert_eq!(reloaded.event, single);

    let multiple = tx
        .events()
        .create_event("Workshop", None, &alice, SelectionType::Multiple)
        .await
        .unwrap();
    let group = tx
        .slots()
        .create_time_slot_multiple(start, 120, &multiple)
        .await
        .unwrap();
    let p1 = tx.participants().create_participant(&bob, &group).await.unwrap();
    let p2 = tx.participants().create_participant(&alice, &group).await.unwrap();

    assert_eq!(
        tx.participants().find_all_by_time_slot(group.id).await.unwrap(),
        vec![p1.clone(), p2]
    );
    assert_eq!(
        tx.participants()
            .find_by_email("bob@example.com", group.id)
            .await
            .unwrap(),
        Some(p1)
    );
    assert_eq!(
        tx.slots().find_all_by_event(multiple.id).await.unwrap(),
        vec![group]
    );
    tx.commit().await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn locked_slot_lookup_and_duplicate_participant(pool: PgPool) {
    let trx = PgTransactionManager::new(pool);
    let mut tx = trx.begin().await.unwrap();

    let alice = tx.users().create_user("Alice", "alice@example.com", &pvi()).await.unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 9, 30)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let workshop = tx
        .events()
        .create_event("Workshop", None, &alice, SelectionType::Multiple)
        .await
        .unwrap();
    let group = tx
        .slots()
        .create_time_slot_multiple(start, 60, &workshop)
        .await
        .unwrap();

    assert_eq!(
        tx.slots().find_by_id_for_update(group.id).await.unwrap(),
        Some(group.clone())
    );
    assert_eq!(tx.slots().find_by_id_for_update(group.id + 1).await.unwrap(), None);

    tx.participants().create_participant(&alice, &group).await.unwrap();
    let err = tx
        .participants()
        .create_participant(&alice, &group)
        .await
        .unwrap_err();
    assert!(err.violates(PARTICIPANTS_USER_SLOT_CONSTRAINT));
}
