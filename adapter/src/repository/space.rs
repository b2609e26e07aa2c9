use async_trait::async_trait;
use derive_new::new;
use sqlx::{Postgres, QueryBuilder};

use kernel::model::{
    id::SpaceId,
    list::{CompareOp, FilterValue, PaginatedList, SpaceAttr, SpaceListQuery},
    space::{
        event::{CreateSpace, DeleteSpace, UpdateSpace},
        Space,
    },
};
use kernel::repository::space::SpaceRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::space::SpaceRow, ConnectionPool};

const SPACE_COLUMNS: &str =
    "space_id, name, operating_hours, address, province, postalcode, tel, picture, created_at";

#[derive(new)]
pub struct SpaceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SpaceRepository for SpaceRepositoryImpl {
    async fn create(&self, event: CreateSpace) -> AppResult<Space> {
        let row: SpaceRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO spaces
                (space_id, name, operating_hours, address, province, postalcode, tel, picture)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(SpaceId::new())
        .bind(&event.name)
        .bind(&event.operating_hours)
        .bind(&event.address)
        .bind(&event.province)
        .bind(&event.postalcode)
        .bind(&event.tel)
        .bind(&event.picture)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(map_space_write_error)?;

        Ok(row.into())
    }

    async fn find_all(&self, query: SpaceListQuery) -> AppResult<PaginatedList<Space>> {
        // The total deliberately counts the whole collection, not the
        // filtered set; pagination descriptors are derived from it.
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM spaces")
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SPACE_COLUMNS} FROM spaces"
        ));
        for (i, filter) in query.filters.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            builder.push(column(filter.attr));
            match &filter.value {
                // only ever produced for the `in` operator
                FilterValue::TextList(values) => {
                    builder.push(" = ANY(");
                    builder.push_bind(values.clone());
                    builder.push(")");
                }
                FilterValue::Text(value) => {
                    builder.push(comparison(filter.op));
                    builder.push_bind(value.clone());
                }
                FilterValue::Timestamp(ts) => {
                    builder.push(comparison(filter.op));
                    builder.push_bind(*ts);
                }
            }
        }
        builder.push(" ORDER BY ");
        for (i, sort) in query.sort.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(column(sort.attr));
            builder.push(if sort.descending { " DESC" } else { " ASC" });
        }
        builder.push(" LIMIT ");
        builder.push_bind(query.limit);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let rows: Vec<SpaceRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(PaginatedList {
            total,
            page: query.page,
            limit: query.limit,
            items: rows.into_iter().map(Space::from).collect(),
        })
    }

    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>> {
        let row: Option<SpaceRow> = sqlx::query_as(&format!(
            "SELECT {SPACE_COLUMNS} FROM spaces WHERE space_id = $1"
        ))
        .bind(space_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Space::from))
    }

    async fn update(&self, event: UpdateSpace) -> AppResult<Space> {
        let row: Option<SpaceRow> = sqlx::query_as(&format!(
            r#"
                UPDATE spaces
                SET name = COALESCE($2, name),
                    operating_hours = COALESCE($3, operating_hours),
                    address = COALESCE($4, address),
                    province = COALESCE($5, province),
                    postalcode = COALESCE($6, postalcode),
                    tel = COALESCE($7, tel),
                    picture = COALESCE($8, picture)
                WHERE space_id = $1
                RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(event.space_id)
        .bind(&event.name)
        .bind(&event.operating_hours)
        .bind(&event.address)
        .bind(&event.province)
        .bind(&event.postalcode)
        .bind(&event.tel)
        .bind(&event.picture)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(map_space_write_error)?;

        row.map(Space::from).ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "No co-working space with the id of {}",
                event.space_id
            ))
        })
    }

    async fn delete(&self, event: DeleteSpace) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Dependent bookings go first so the space is never gone while
        // bookings still reference it; the transaction makes the pair one
        // unit of work.
        let cascaded = sqlx::query("DELETE FROM bookings WHERE space_id = $1")
            .bind(event.space_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM spaces WHERE space_id = $1")
            .bind(event.space_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "No co-working space with the id of {}",
                event.space_id
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::debug!(
            space_id = %event.space_id,
            bookings_removed = cascaded.rows_affected(),
            "removed space and its bookings"
        );
        Ok(())
    }
}

fn column(attr: SpaceAttr) -> &'static str {
    match attr {
        SpaceAttr::Name => "name",
        SpaceAttr::OperatingHours => "operating_hours",
        SpaceAttr::Address => "address",
        SpaceAttr::Province => "province",
        SpaceAttr::Postalcode => "postalcode",
        SpaceAttr::Tel => "tel",
        SpaceAttr::Picture => "picture",
        SpaceAttr::CreatedAt => "created_at",
    }
}

fn comparison(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq | CompareOp::In => " = ",
        CompareOp::Gt => " > ",
        CompareOp::Gte => " >= ",
        CompareOp::Lt => " < ",
        CompareOp::Lte => " <= ",
    }
}

fn map_space_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::UnprocessableEntity(
            "a co-working space with this name already exists".into(),
        ),
        _ => AppError::SpecificOperationError(e),
    }
}
