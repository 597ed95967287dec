pub(crate) mod ledger_tx;
pub mod postgres_connection;
pub mod repositories;
pub mod schema;

use std::sync::Arc;

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use crate::domain::errors::{PayoutError, PayoutResult};
use postgres_connection::PgPoolSquad;

pub(crate) fn get_conn(
    db_pool: &Arc<PgPoolSquad>,
) -> PayoutResult<PooledConnection<ConnectionManager<PgConnection>>> {
    db_pool
        .get()
        .map_err(|err| PayoutError::Internal(err.into()))
}
