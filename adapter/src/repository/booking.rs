use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use sqlx::{Postgres, QueryBuilder};

use kernel::model::{
    booking::{
        event::{BookingListFilter, CreateBooking, DeleteBooking, UpdateBooking},
        Booking,
    },
    id::BookingId,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::booking::{BookingRow, BookingSpaceRow},
    ConnectionPool,
};

const BOOKING_SELECT: &str = r#"
    SELECT
        b.booking_id,
        b.booking_date,
        b.num_of_rooms,
        b.user_id,
        b.created_at,
        s.space_id,
        s.name AS space_name,
        s.address AS space_address,
        s.tel AS space_tel
    FROM bookings AS b
    INNER JOIN spaces AS s ON b.space_id = s.space_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        let space: Option<BookingSpaceRow> =
            sqlx::query_as("SELECT space_id, name, address, tel FROM spaces WHERE space_id = $1")
                .bind(event.space_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        let Some(space) = space else {
            return Err(AppError::EntityNotFound(format!(
                "No co-working space with the id of {}",
                event.space_id
            )));
        };

        let booking_id = BookingId::new();
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
                INSERT INTO bookings (booking_id, booking_date, num_of_rooms, user_id, space_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING created_at
            "#,
        )
        .bind(booking_id)
        .bind(event.booking_date)
        .bind(event.num_of_rooms)
        .bind(event.user_id)
        .bind(event.space_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Booking {
            id: booking_id,
            booking_date: event.booking_date,
            num_of_rooms: event.num_of_rooms,
            user_id: event.user_id,
            created_at,
            space: space.into(),
        })
    }

    async fn find_all(&self, filter: BookingListFilter) -> AppResult<Vec<Booking>> {
        let mut builder = QueryBuilder::<Postgres>::new(BOOKING_SELECT);
        let mut has_where = false;
        if let Some(user_id) = filter.user_id {
            builder.push(" WHERE b.user_id = ");
            builder.push_bind(user_id);
            has_where = true;
        }
        if let Some(space_id) = filter.space_id {
            builder.push(if has_where { " AND " } else { " WHERE " });
            builder.push("b.space_id = ");
            builder.push_bind(space_id);
        }
        builder.push(" ORDER BY b.created_at DESC");

        let rows: Vec<BookingRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{BOOKING_SELECT} WHERE b.booking_id = $1"))
                .bind(booking_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Booking::from))
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<Booking> {
        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET booking_date = COALESCE($2, booking_date),
                    num_of_rooms = COALESCE($3, num_of_rooms)
                WHERE booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .bind(event.booking_date)
        .bind(event.num_of_rooms)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "No booking with the id of {}",
                event.booking_id
            )));
        }

        self.find_by_id(event.booking_id).await?.ok_or_else(|| {
            AppError::EntityNotFound(format!("No booking with the id of {}", event.booking_id))
        })
    }

    async fn delete(&self, event: DeleteBooking) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(event.booking_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "No booking with the id of {}",
                event.booking_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kernel::model::id::{SpaceId, UserId};

    async fn seed_user(pool: &sqlx::PgPool, name: &str) -> UserId {
        let id = UserId::new();
        sqlx::query("INSERT INTO users (user_id, name, email, role) VALUES ($1, $2, $3, 'user')")
            .bind(id)
            .bind(name)
            .bind(format!("{id}@example.com"))
            .execute(pool)
            .await
            .unwrap();
        id
    }

    async fn seed_space(pool: &sqlx::PgPool, name: &str) -> SpaceId {
        let id = SpaceId::new();
        sqlx::query(
            r#"
                INSERT INTO spaces
                (space_id, name, operating_hours, address, province, postalcode, tel, picture)
                VALUES ($1, $2, '9:00-18:00', '1 Main Rd', 'Bangkok', '10110', '02-000-0000',
                        'https://example.com/p.png')
            "#,
        )
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn create_returns_the_joined_record(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool, "Somchai").await;
        let space_id = seed_space(&pool, "Hub1").await;

        let booking = repo
            .create(CreateBooking::new(space_id, user_id, date(1), 2))
            .await?;

        assert_eq!(booking.user_id, user_id);
        assert_eq!(booking.num_of_rooms, 2);
        assert_eq!(booking.space.name, "Hub1");
        assert_eq!(booking.space.tel.as_deref(), Some("02-000-0000"));

        let fetched = repo.find_by_id(booking.id).await?;
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().booking_date, date(1));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn create_against_missing_space_is_not_found(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool, "Somchai").await;

        let res = repo
            .create(CreateBooking::new(SpaceId::new(), user_id, date(1), 1))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn find_all_scopes_to_user_and_space(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let somchai = seed_user(&pool, "Somchai").await;
        let malee = seed_user(&pool, "Malee").await;
        let hub1 = seed_space(&pool, "Hub1").await;
        let hub2 = seed_space(&pool, "Hub2").await;

        repo.create(CreateBooking::new(hub1, somchai, date(1), 1))
            .await?;
        repo.create(CreateBooking::new(hub2, somchai, date(2), 1))
            .await?;
        repo.create(CreateBooking::new(hub1, malee, date(3), 1))
            .await?;

        let all = repo.find_all(BookingListFilter::default()).await?;
        assert_eq!(all.len(), 3);

        let somchais = repo
            .find_all(BookingListFilter::new(Some(somchai), None))
            .await?;
        assert_eq!(somchais.len(), 2);
        assert!(somchais.iter().all(|b| b.user_id == somchai));

        let somchai_hub1 = repo
            .find_all(BookingListFilter::new(Some(somchai), Some(hub1)))
            .await?;
        assert_eq!(somchai_hub1.len(), 1);
        assert_eq!(somchai_hub1[0].space.id, hub1);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn update_retains_rooms_when_omitted(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool, "Somchai").await;
        let space_id = seed_space(&pool, "Hub1").await;

        let booking = repo
            .create(CreateBooking::new(space_id, user_id, date(1), 3))
            .await?;

        let updated = repo
            .update(UpdateBooking::new(booking.id, Some(date(5)), None))
            .await?;
        assert_eq!(updated.booking_date, date(5));
        assert_eq!(updated.num_of_rooms, 3);

        let updated = repo
            .update(UpdateBooking::new(booking.id, None, Some(1)))
            .await?;
        assert_eq!(updated.booking_date, date(5));
        assert_eq!(updated.num_of_rooms, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn delete_removes_the_booking(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool, "Somchai").await;
        let space_id = seed_space(&pool, "Hub1").await;

        let booking = repo
            .create(CreateBooking::new(space_id, user_id, date(1), 1))
            .await?;

        repo.delete(DeleteBooking::new(booking.id)).await?;
        assert!(repo.find_by_id(booking.id).await?.is_none());

        let res = repo.delete(DeleteBooking::new(booking.id)).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }
}
