use super::*;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::result::Error as DieselError;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::models::Table;

pub const KIND_DEFAULT: &str = "default";
pub const KIND_USER: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Default,
    User,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Default => KIND_DEFAULT,
            TableKind::User => KIND_USER,
        }
    }
}

impl Table {
    pub fn is_user_table(&self) -> bool {
        self.kind == KIND_USER
    }

    pub fn is_default_table(&self) -> bool {
        self.kind == KIND_DEFAULT
    }
}

/// Policy values travel as explicit parameters; there is no global
/// configuration registry.
#[derive(Debug, Clone, Copy)]
pub struct TablePolicy {
    pub min_verbs: usize,
    pub max_user_tables: i64,
}

impl Default for TablePolicy {
    fn default() -> Self {
        TablePolicy {
            min_verbs: 10,
            max_user_tables: 10,
        }
    }
}

#[derive(Debug)]
pub struct NewTableSpec<'a> {
    pub kind: TableKind,
    pub name: &'a str,
    pub owner: Option<i32>,
    pub verb_ids: &'a [i32],
}

/// Lowercases and collapses the name into a URL-ready slug. Two names
/// differing only in case or punctuation end up with the same slug, which is
/// what the per-scope uniqueness is declared on.
pub fn slugify(name: &str) -> String {
    lazy_static! {
        static ref NON_ALNUM: Regex = Regex::new("[^a-z0-9]+").unwrap();
    }
    let lowered = name.trim().nfc().collect::<String>().to_lowercase();
    NON_ALNUM.replace_all(&lowered, "-").trim_matches('-').to_string()
}

fn validate_spec(kind: TableKind,
                 has_owner: bool,
                 distinct_verbs: usize,
                 existing_user_tables: i64,
                 policy: &TablePolicy)
                 -> Result<()> {
    match (kind, has_owner) {
        (TableKind::User, false) | (TableKind::Default, true) => {
            bail!(ErrorKind::OwnershipMismatch)
        }
        _ => {}
    }
    if distinct_verbs < policy.min_verbs {
        bail!(ErrorKind::TableTooSmall(policy.min_verbs));
    }
    if kind == TableKind::User && existing_user_tables >= policy.max_user_tables {
        bail!(ErrorKind::QuotaExceeded(policy.max_user_tables));
    }
    Ok(())
}

fn slug_taken(conn: &mut PgConnection,
              kind: TableKind,
              owner: Option<i32>,
              slug: &str,
              exclude_id: Option<i32>)
              -> Result<bool> {
    use crate::schema::tables;

    // No table ever has the id -1, so None excludes nothing.
    let exclude = exclude_id.unwrap_or(-1);

    let found: i64 = match kind {
        TableKind::Default => {
            tables::table
                .filter(tables::kind.eq(KIND_DEFAULT))
                .filter(tables::slug.eq(slug))
                .filter(tables::id.ne(exclude))
                .count()
                .get_result(conn)?
        }
        TableKind::User => {
            let owner = owner.ok_or_else(|| Error::from(ErrorKind::OwnershipMismatch))?;
            tables::table
                .filter(tables::kind.eq(KIND_USER))
                .filter(tables::owner_id.eq(owner))
                .filter(tables::slug.eq(slug))
                .filter(tables::id.ne(exclude))
                .count()
                .get_result(conn)?
        }
    };

    Ok(found > 0)
}

fn distinct_verb_ids(verb_ids: &[i32]) -> Vec<i32> {
    let mut ids = verb_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub fn create_table(conn: &mut PgConnection,
                    spec: NewTableSpec,
                    policy: &TablePolicy)
                    -> Result<Table> {
    use crate::schema::{table_verbs, tables, verbs};

    let ids = distinct_verb_ids(spec.verb_ids);

    let slug = slugify(spec.name);
    if slug.is_empty() || spec.name.len() > 30 {
        bail!(ErrorKind::InvalidInput);
    }

    let table = conn.transaction::<Table, Error, _>(|conn| {
        let existing_user_tables = match spec.owner {
            Some(owner) => {
                tables::table
                    .filter(tables::kind.eq(KIND_USER))
                    .filter(tables::owner_id.eq(owner))
                    .count()
                    .get_result(conn)?
            }
            None => 0,
        };

        validate_spec(spec.kind, spec.owner.is_some(), ids.len(), existing_user_tables, policy)?;

        if slug_taken(conn, spec.kind, spec.owner, &slug, None)? {
            bail!(ErrorKind::NameCollision(spec.name.into()));
        }

        let known: i64 = verbs::table
            .filter(verbs::id.eq_any(&ids))
            .count()
            .get_result(conn)?;
        if known as usize != ids.len() {
            bail!(ErrorKind::InvalidInput);
        }

        let new_table = NewTable {
            kind: spec.kind.as_str(),
            name: spec.name,
            slug: &slug,
            owner_id: spec.owner,
        };

        // A concurrent creation with the same name loses the race on the
        // per-scope unique index; report it as the same collision.
        let table: Table = diesel::insert_into(tables::table)
            .values(&new_table)
            .get_result(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ErrorKind::NameCollision(spec.name.into()).into()
                }
                e => Error::with_chain(e, "Couldn't create a new table!"),
            })?;

        let memberships: Vec<TableVerb> = ids.iter()
            .map(|&verb_id| TableVerb { table_id: table.id, verb_id })
            .collect();
        diesel::insert_into(table_verbs::table)
            .values(&memberships)
            .execute(conn)?;

        Ok(table)
    })?;

    info!("Created a {} table {:?} with {} verbs.", table.kind, table.name, ids.len());
    Ok(table)
}

pub fn rename_table(conn: &mut PgConnection, table_id: i32, new_name: &str) -> Result<Table> {
    use crate::schema::tables;

    let slug = slugify(new_name);
    if slug.is_empty() || new_name.len() > 30 {
        bail!(ErrorKind::InvalidInput);
    }

    conn.transaction::<Table, Error, _>(|conn| {
        let table = get_table(conn, table_id)?;

        let kind = if table.is_user_table() { TableKind::User } else { TableKind::Default };
        if slug_taken(conn, kind, table.owner_id, &slug, Some(table.id))? {
            bail!(ErrorKind::NameCollision(new_name.into()));
        }

        let table: Table = diesel::update(tables::table.filter(tables::id.eq(table_id)))
            .set((tables::name.eq(new_name),
                  tables::slug.eq(&slug),
                  tables::updated_at.eq(Utc::now())))
            .get_result(conn)?;

        Ok(table)
    })
}

/// Replaces the table's membership. The results of every removed
/// (table, verb) pair are deleted for all owners, so no outcome ever
/// outlives its verb's membership.
pub fn set_verbs(conn: &mut PgConnection,
                 table_id: i32,
                 verb_ids: &[i32],
                 policy: &TablePolicy)
                 -> Result<Table> {
    use crate::schema::{results, table_verbs, tables, verbs};

    let ids = distinct_verb_ids(verb_ids);
    if ids.len() < policy.min_verbs {
        bail!(ErrorKind::TableTooSmall(policy.min_verbs));
    }

    conn.transaction::<Table, Error, _>(|conn| {
        let table = get_table(conn, table_id)?;

        let known: i64 = verbs::table
            .filter(verbs::id.eq_any(&ids))
            .count()
            .get_result(conn)?;
        if known as usize != ids.len() {
            bail!(ErrorKind::InvalidInput);
        }

        let current: Vec<i32> = table_verbs::table
            .filter(table_verbs::table_id.eq(table.id))
            .select(table_verbs::verb_id)
            .load(conn)?;

        let (removed, added) = membership_diff(&current, &ids);

        if !removed.is_empty() {
            let stale = diesel::delete(results::table
                    .filter(results::table_id.eq(table.id))
                    .filter(results::verb_id.eq_any(&removed)))
                .execute(conn)?;
            debug!("Membership change dropped {} recorded outcomes.", stale);

            diesel::delete(table_verbs::table
                    .filter(table_verbs::table_id.eq(table.id))
                    .filter(table_verbs::verb_id.eq_any(&removed)))
                .execute(conn)?;
        }

        if !added.is_empty() {
            let memberships: Vec<TableVerb> = added.iter()
                .map(|&verb_id| TableVerb { table_id: table.id, verb_id })
                .collect();
            diesel::insert_into(table_verbs::table)
                .values(&memberships)
                .execute(conn)?;
        }

        let table: Table = diesel::update(tables::table.filter(tables::id.eq(table.id)))
            .set(tables::updated_at.eq(Utc::now()))
            .get_result(conn)?;

        Ok(table)
    })
}

/// Which members leave and which arrive, given the current and the wanted
/// sets. Both inputs are distinct id lists.
fn membership_diff(current: &[i32], wanted: &[i32]) -> (Vec<i32>, Vec<i32>) {
    let removed = current.iter()
        .filter(|id| !wanted.contains(id))
        .cloned()
        .collect();
    let added = wanted.iter()
        .filter(|id| !current.contains(id))
        .cloned()
        .collect();
    (removed, added)
}

pub fn set_available(conn: &mut PgConnection, table_id: i32, available: bool) -> Result<Table> {
    use crate::schema::tables;

    diesel::update(tables::table.filter(tables::id.eq(table_id)))
        .set((tables::is_available.eq(available), tables::updated_at.eq(Utc::now())))
        .get_result(conn)
        .map_err(|e| match e {
            DieselError::NotFound => ErrorKind::NoSuchTable(table_id.to_string()).into(),
            e => Error::with_chain(e, "Couldn't update the table!"),
        })
}

pub fn delete_table(conn: &mut PgConnection, table_id: i32) -> Result<Option<Table>> {
    use crate::schema::tables;

    let table = diesel::delete(tables::table.filter(tables::id.eq(table_id)))
        .get_result(conn)
        .optional()
        .chain_err(|| "Couldn't remove the table!")?;
    Ok(table)
}

pub fn get_table(conn: &mut PgConnection, table_id: i32) -> Result<Table> {
    use crate::schema::tables;
    use diesel::result::Error::NotFound;

    tables::table
        .filter(tables::id.eq(table_id))
        .first(conn)
        .map_err(|e| match e {
            NotFound => ErrorKind::NoSuchTable(table_id.to_string()).into(),
            e => Error::with_chain(e, "Error when trying to retrieve the table!"),
        })
}

/// Resolves a slug the way a profile sees the world: its own user tables
/// first, shared default tables second.
pub fn get_table_by_slug(conn: &mut PgConnection, profile: &Profile, slug: &str) -> Result<Table> {
    use crate::schema::tables;

    let own: Option<Table> = tables::table
        .filter(tables::kind.eq(KIND_USER))
        .filter(tables::owner_id.eq(profile.id))
        .filter(tables::slug.eq(slug))
        .get_result(conn)
        .optional()?;

    if let Some(table) = own {
        return Ok(table);
    }

    let shared: Option<Table> = tables::table
        .filter(tables::kind.eq(KIND_DEFAULT))
        .filter(tables::slug.eq(slug))
        .get_result(conn)
        .optional()?;

    shared.ok_or_else(|| ErrorKind::NoSuchTable(slug.into()).into())
}

/// The tables a profile can see: available default tables and its own user
/// tables, newest first.
pub fn tables_for_profile(conn: &mut PgConnection,
                          profile: &Profile)
                          -> Result<(Vec<Table>, Vec<Table>)> {
    use crate::schema::tables;

    let default_tables: Vec<Table> = tables::table
        .filter(tables::kind.eq(KIND_DEFAULT))
        .filter(tables::is_available.eq(true))
        .order(tables::created_at.desc())
        .load(conn)?;

    let user_tables: Vec<Table> = tables::table
        .filter(tables::kind.eq(KIND_USER))
        .filter(tables::owner_id.eq(profile.id))
        .order(tables::created_at.desc())
        .load(conn)?;

    Ok((default_tables, user_tables))
}

/// A profile may use an available default table or a user table it owns.
pub fn check_access(table: &Table, profile: &Profile) -> Result<()> {
    match table.owner_id {
        Some(owner) if owner == profile.id => Ok(()),
        Some(_) => bail!(ErrorKind::AccessDenied),
        None if table.is_available => Ok(()),
        None => bail!(ErrorKind::AccessDenied),
    }
}

pub fn member_verbs(conn: &mut PgConnection, table: &Table) -> Result<Vec<Verb>> {
    use crate::schema::{table_verbs, verbs};

    table_verbs::table
        .inner_join(verbs::table)
        .filter(table_verbs::table_id.eq(table.id))
        .select(verbs::all_columns)
        .order(verbs::infinitive.asc())
        .load(conn)
        .chain_err(|| "Can't load the table's verbs!")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> TablePolicy {
        TablePolicy { min_verbs: 3, max_user_tables: 2 }
    }

    #[test]
    fn test_slugify_lowercases_and_collapses() {
        assert_eq!(slugify("50 Verbs"), "50-verbs");
        assert_eq!(slugify("  Les Bases !! "), "les-bases");
        assert_eq!(slugify("a___b"), "a-b");
    }

    #[test]
    fn test_slugify_makes_case_collisions_literal() {
        assert_eq!(slugify("Basics"), slugify("BASICS"));
        assert_eq!(slugify("my table"), slugify("My-Table"));
    }

    #[test]
    fn test_slugify_rejects_empty_names_by_construction() {
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_user_table_needs_owner() {
        match validate_spec(TableKind::User, false, 5, 0, &policy()) {
            Err(Error(ErrorKind::OwnershipMismatch, _)) => (),
            _ => panic!("An ownerless user table should be rejected!"),
        }
    }

    #[test]
    fn test_default_table_must_not_have_owner() {
        match validate_spec(TableKind::Default, true, 5, 0, &policy()) {
            Err(Error(ErrorKind::OwnershipMismatch, _)) => (),
            _ => panic!("An owned default table should be rejected!"),
        }
    }

    #[test]
    fn test_too_few_verbs() {
        match validate_spec(TableKind::Default, false, 2, 0, &policy()) {
            Err(Error(ErrorKind::TableTooSmall(3), _)) => (),
            _ => panic!("A 2-verb table should be rejected!"),
        }
    }

    #[test]
    fn test_quota_binds_only_user_tables() {
        match validate_spec(TableKind::User, true, 5, 2, &policy()) {
            Err(Error(ErrorKind::QuotaExceeded(2), _)) => (),
            _ => panic!("The 3rd user table should be rejected!"),
        }
        validate_spec(TableKind::Default, false, 5, 2, &policy())
            .expect("Default tables are not subject to the quota!");
    }

    #[test]
    fn test_valid_specs_pass() {
        validate_spec(TableKind::User, true, 3, 1, &policy()).unwrap();
        validate_spec(TableKind::Default, false, 3, 0, &policy()).unwrap();
    }

    #[test]
    fn test_membership_diff() {
        let (removed, added) = membership_diff(&[1, 2, 3], &[2, 3, 4]);
        assert_eq!(removed, vec![1]);
        assert_eq!(added, vec![4]);

        let (removed, added) = membership_diff(&[1, 2], &[1, 2]);
        assert!(removed.is_empty());
        assert!(added.is_empty());
    }
}
