use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::connection::Connection as _;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::*;

pub type ConnManager = ConnectionManager<PgConnection>;
pub type ConnPool = Pool<ConnManager>;
pub type Connection = PooledConnection<ConnManager>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn connect(database_url: &str) -> Result<PgConnection> {
    PgConnection::establish(database_url).chain_err(|| "Error connecting to database!")
}

pub fn pool(database_url: &str) -> Result<ConnPool> {
    Pool::builder()
        .build(ConnManager::new(database_url))
        .chain_err(|| "Couldn't create a connection pool!")
}

pub fn run_migrations(conn: &mut PgConnection) -> Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| ErrorKind::Msg(format!("Couldn't run the migrations: {}", e)))?;
    info!("Migrations checked.");
    Ok(())
}

/// Runs pending migrations and tells whether the database holds any users yet.
pub fn check(conn: &mut PgConnection) -> Result<bool> {
    run_migrations(conn).chain_err(|| "Couldn't run the migrations.")?;
    is_installed(conn)
}

pub fn is_installed(conn: &mut PgConnection) -> Result<bool> {
    use crate::schema::users;

    let count: i64 = users::table.count().get_result(conn)?;

    Ok(count > 0)
}
