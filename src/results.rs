use super::*;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::table;

/// Inserts or overwrites the single outcome row keyed by
/// (owner, table, verb). The write is routed through the unique
/// constraint's conflict handling, so concurrent submissions of the same
/// triple converge on one row holding the latest outcome.
pub fn record_result(conn: &mut PgConnection,
                     profile: &Profile,
                     table_id: i32,
                     verb_id: i32,
                     is_success: bool)
                     -> Result<TrainingResult> {
    use crate::schema::{results, table_verbs};
    use diesel::dsl::{exists, select};

    let table = table::get_table(conn, table_id)?;

    if let Some(owner) = table.owner_id {
        if owner != profile.id {
            bail!(ErrorKind::AccessDenied);
        }
    }

    let is_member: bool = select(exists(table_verbs::table
            .filter(table_verbs::table_id.eq(table_id))
            .filter(table_verbs::verb_id.eq(verb_id))))
        .get_result(conn)?;
    if !is_member {
        bail!(ErrorKind::VerbNotInTable);
    }

    let new_result = NewResult {
        owner_id: profile.id,
        table_id,
        verb_id,
        is_success,
    };

    let result: TrainingResult = diesel::insert_into(results::table)
        .values(&new_result)
        .on_conflict((results::owner_id, results::table_id, results::verb_id))
        .do_update()
        .set((results::is_success.eq(is_success),
              results::updated_at.eq(Utc::now())))
        .get_result(conn)
        .chain_err(|| "Couldn't record the outcome!")?;

    debug!("Recorded outcome {:?}.", &result);

    Ok(result)
}

/// Wipes every outcome the profile owns, over all tables. Nobody else's
/// rows are touched, shared default tables included.
pub fn reset_all(conn: &mut PgConnection, profile: &Profile) -> Result<usize> {
    use crate::schema::results;

    let deleted = diesel::delete(results::table
            .filter(results::owner_id.eq(profile.id)))
        .execute(conn)?;

    info!("Reset all results of profile {} ({} rows).", profile.id, deleted);
    Ok(deleted)
}

/// Wipes the profile's outcomes for one table.
pub fn reset_table(conn: &mut PgConnection, profile: &Profile, table_id: i32) -> Result<usize> {
    use crate::schema::results;

    let table = table::get_table(conn, table_id)?;

    if let Some(owner) = table.owner_id {
        if owner != profile.id {
            bail!(ErrorKind::AccessDenied);
        }
    }

    let deleted = diesel::delete(results::table
            .filter(results::owner_id.eq(profile.id))
            .filter(results::table_id.eq(table.id)))
        .execute(conn)?;

    info!("Reset results of profile {} on table {} ({} rows).", profile.id, table.id, deleted);
    Ok(deleted)
}
