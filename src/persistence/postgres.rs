//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};

use super::TicketingStore;
use super::models::{EventAdminRow, EventRow, TicketRow, UserRow};
use crate::config::TicketingConfig;
use crate::domain::{
    Event, EventAdmin, EventId, EventPage, NewEvent, NewTicket, NewUser, Ticket, TicketId, TicketStatus,
    User, UserId,
};
use crate::error::TicketingError;

const EVENT_COLUMNS: &str = "id, title, description, location, start_datetime, end_datetime, \
                             capacity, price, created_at, updated_at";

const TICKET_COLUMNS: &str = "id, event_id, buyer_id, quantity, total, status, purchased_at";

/// Row lock taken when reading a parent row inside a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowLock {
    None,
    /// Blocks deletes of the row, not other readers or inserts of children.
    KeyShare,
    /// Exclusive: serializes purchases and cascading deletes.
    Update,
}

impl RowLock {
    const fn clause(self) -> &'static str {
        match self {
            Self::None => "",
            Self::KeyShare => " FOR KEY SHARE",
            Self::Update => " FOR UPDATE",
        }
    }
}

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Cascading deletes and the capacity check run inside explicit
/// transactions rather than relying on `ON DELETE CASCADE`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`TicketingError::PersistenceError`] if the database is
    /// unreachable within the connect timeout.
    pub async fn connect(config: &TicketingConfig) -> Result<Self, TicketingError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`TicketingError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), TicketingError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TicketingError::PersistenceError(format!("migration failed: {e}")))
    }
}

async fn fetch_user(
    conn: &mut PgConnection,
    user_id: UserId,
    lock: RowLock,
) -> Result<User, TicketingError> {
    let sql = format!("SELECT id, username FROM users WHERE id = $1{}", lock.clause());
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(user_id.get())
        .fetch_optional(conn)
        .await?
        .map(User::from)
        .ok_or(TicketingError::UserNotFound(user_id))
}

async fn fetch_event(
    conn: &mut PgConnection,
    event_id: EventId,
    lock: RowLock,
) -> Result<Event, TicketingError> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1{}",
        lock.clause()
    );
    sqlx::query_as::<_, EventRow>(&sql)
        .bind(event_id.get())
        .fetch_optional(conn)
        .await?
        .ok_or(TicketingError::EventNotFound(event_id))?
        .try_into()
}

async fn sum_quantity(conn: &mut PgConnection, event_id: EventId) -> Result<u64, TicketingError> {
    let sold = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM tickets WHERE event_id = $1",
    )
    .bind(event_id.get())
    .fetch_one(conn)
    .await?;

    u64::try_from(sold)
        .map_err(|_| TicketingError::Internal(format!("negative ticket sum for event {event_id}")))
}

fn capacity_column(capacity: Option<u32>) -> Result<Option<i32>, TicketingError> {
    capacity
        .map(i32::try_from)
        .transpose()
        .map_err(|_| TicketingError::InvalidRequest("capacity is too large".to_string()))
}

fn into_tickets(rows: Vec<TicketRow>) -> Result<Vec<Ticket>, TicketingError> {
    rows.into_iter().map(Ticket::try_from).collect()
}

#[async_trait]
impl TicketingStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), TicketingError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, TicketingError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username) VALUES ($1) RETURNING id, username",
        )
        .bind(&user.username)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, TicketingError> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, user_id, RowLock::None).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), TicketingError> {
        let mut tx = self.pool.begin().await?;
        // Purchases and grants hold KEY SHARE on the user; wait them out.
        fetch_user(&mut tx, user_id, RowLock::Update).await?;

        sqlx::query("DELETE FROM tickets WHERE buyer_id = $1")
            .bind(user_id.get())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM event_admins WHERE user_id = $1")
            .bind(user_id.get())
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.get())
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(TicketingError::UserNotFound(user_id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event, TicketingError> {
        event.validate()?;
        let sql = format!(
            "INSERT INTO events (title, description, location, start_datetime, end_datetime, \
             capacity, price) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.start_datetime)
            .bind(event.end_datetime)
            .bind(capacity_column(event.capacity)?)
            .bind(event.price)
            .fetch_one(&self.pool)
            .await?
            .try_into()
    }

    async fn get_event(&self, event_id: EventId) -> Result<Event, TicketingError> {
        let mut conn = self.pool.acquire().await?;
        fetch_event(&mut conn, event_id, RowLock::None).await
    }

    async fn list_events(&self, offset: u64, limit: u64) -> Result<EventPage, TicketingError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_datetime, id LIMIT $1 OFFSET $2"
        );
        let events = sqlx::query_as::<_, EventRow>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(EventPage {
            events,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update_event(
        &self,
        event_id: EventId,
        event: NewEvent,
    ) -> Result<Event, TicketingError> {
        event.validate()?;
        let sql = format!(
            "UPDATE events SET title = $2, description = $3, location = $4, \
             start_datetime = $5, end_datetime = $6, capacity = $7, price = $8, \
             updated_at = NOW() WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id.get())
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.start_datetime)
            .bind(event.end_datetime)
            .bind(capacity_column(event.capacity)?)
            .bind(event.price)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TicketingError::EventNotFound(event_id))?
            .try_into()
    }

    async fn delete_event(&self, event_id: EventId) -> Result<(), TicketingError> {
        let mut tx = self.pool.begin().await?;
        fetch_event(&mut tx, event_id, RowLock::Update).await?;

        sqlx::query("DELETE FROM tickets WHERE event_id = $1")
            .bind(event_id.get())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM event_admins WHERE event_id = $1")
            .bind(event_id.get())
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id.get())
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(TicketingError::EventNotFound(event_id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn tickets_sold(&self, event_id: EventId) -> Result<u64, TicketingError> {
        let mut conn = self.pool.acquire().await?;
        fetch_event(&mut conn, event_id, RowLock::None).await?;
        sum_quantity(&mut conn, event_id).await
    }

    async fn assign_admin(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<EventAdmin, TicketingError> {
        let mut tx = self.pool.begin().await?;
        fetch_user(&mut tx, user_id, RowLock::KeyShare).await?;
        fetch_event(&mut tx, event_id, RowLock::KeyShare).await?;

        let row = sqlx::query_as::<_, EventAdminRow>(
            "INSERT INTO event_admins (user_id, event_id) VALUES ($1, $2) \
             RETURNING id, user_id, event_id, assigned_at",
        )
        .bind(user_id.get())
        .bind(event_id.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match TicketingError::from(e) {
            TicketingError::Conflict(_) => TicketingError::DuplicateAdmin { user_id, event_id },
            other => other,
        })?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn list_admins(&self, event_id: EventId) -> Result<Vec<EventAdmin>, TicketingError> {
        let mut conn = self.pool.acquire().await?;
        fetch_event(&mut conn, event_id, RowLock::None).await?;

        let rows = sqlx::query_as::<_, EventAdminRow>(
            "SELECT id, user_id, event_id, assigned_at FROM event_admins \
             WHERE event_id = $1 ORDER BY assigned_at, id",
        )
        .bind(event_id.get())
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(EventAdmin::from).collect())
    }

    async fn list_admin_events(
        &self,
        user_id: UserId,
    ) -> Result<Vec<EventAdmin>, TicketingError> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, user_id, RowLock::None).await?;

        let rows = sqlx::query_as::<_, EventAdminRow>(
            "SELECT id, user_id, event_id, assigned_at FROM event_admins \
             WHERE user_id = $1 ORDER BY assigned_at, id",
        )
        .bind(user_id.get())
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(EventAdmin::from).collect())
    }

    async fn revoke_admin(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), TicketingError> {
        let result = sqlx::query("DELETE FROM event_admins WHERE user_id = $1 AND event_id = $2")
            .bind(user_id.get())
            .bind(event_id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TicketingError::AdminNotFound { user_id, event_id });
        }
        Ok(())
    }

    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket, TicketingError> {
        ticket.validate()?;
        let mut tx = self.pool.begin().await?;
        fetch_user(&mut tx, ticket.buyer_id, RowLock::KeyShare).await?;

        // Row lock serializes concurrent purchases of the same event.
        let event = fetch_event(&mut tx, ticket.event_id, RowLock::Update).await?;
        let sold = sum_quantity(&mut tx, ticket.event_id).await?;
        if let Some(available) = event.seats_available(sold)
            && u64::from(ticket.quantity) > available
        {
            return Err(TicketingError::InsufficientCapacity {
                requested: ticket.quantity,
                available,
            });
        }

        let quantity = i32::try_from(ticket.quantity)
            .map_err(|_| TicketingError::InvalidRequest("quantity is too large".to_string()))?;
        let sql = format!(
            "INSERT INTO tickets (event_id, buyer_id, quantity, total, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TICKET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(ticket.event_id.get())
            .bind(ticket.buyer_id.get())
            .bind(quantity)
            .bind(ticket.total)
            .bind(TicketStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket, TicketingError> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, TicketRow>(&sql)
            .bind(ticket_id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TicketingError::TicketNotFound(ticket_id))?
            .try_into()
    }

    async fn list_tickets_by_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Ticket>, TicketingError> {
        let mut conn = self.pool.acquire().await?;
        fetch_event(&mut conn, event_id, RowLock::None).await?;

        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE event_id = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(event_id.get())
            .fetch_all(&mut *conn)
            .await?;
        into_tickets(rows)
    }

    async fn list_tickets_by_buyer(
        &self,
        buyer_id: UserId,
    ) -> Result<Vec<Ticket>, TicketingError> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, buyer_id, RowLock::None).await?;

        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE buyer_id = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(buyer_id.get())
            .fetch_all(&mut *conn)
            .await?;
        into_tickets(rows)
    }

    async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, TicketingError> {
        let mut tx = self.pool.begin().await?;

        let current: TicketStatus =
            sqlx::query_scalar::<_, String>("SELECT status FROM tickets WHERE id = $1 FOR UPDATE")
                .bind(ticket_id.get())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(TicketingError::TicketNotFound(ticket_id))?
                .parse()?;
        let next = current.transition(status)?;

        let sql = format!("UPDATE tickets SET status = $2 WHERE id = $1 RETURNING {TICKET_COLUMNS}");
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(ticket_id.get())
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn delete_ticket(&self, ticket_id: TicketId) -> Result<(), TicketingError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(ticket_id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TicketingError::TicketNotFound(ticket_id));
        }
        Ok(())
    }
}
