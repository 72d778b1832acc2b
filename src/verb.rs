use super::*;

use std::collections::HashMap;

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::models::Table;
use crate::table;

#[derive(Debug, Default)]
pub struct NewVerbFields<'a> {
    pub infinitive: &'a str,
    pub simple_past: &'a str,
    pub past_participle: &'a str,
    pub translation: &'a str,
    pub similarity: Option<&'a str>,
}

pub fn get_create_similarity_by_name(conn: &mut PgConnection, name: &str) -> Result<Similarity> {
    use crate::schema::similarities;

    let similarity: Option<Similarity> = similarities::table
        .filter(similarities::name.eq(name))
        .get_result(conn)
        .optional()
        .chain_err(|| "Database error with similarities!")?;

    Ok(match similarity {
        Some(similarity) => similarity,
        None => {
            diesel::insert_into(similarities::table)
                .values(&NewSimilarity { name })
                .get_result(conn)
                .chain_err(|| "Database error!")?
        }
    })
}

/// All four form fields are required; the verb catalog never holds
/// half-filled rows.
pub fn create_verb(conn: &mut PgConnection, fields: NewVerbFields) -> Result<Verb> {
    use crate::schema::verbs;

    let forms = [fields.infinitive,
                 fields.simple_past,
                 fields.past_participle,
                 fields.translation];
    if forms.iter().any(|f| f.trim().is_empty()) {
        bail!(ErrorKind::InvalidInput);
    }

    let similarity_id = match fields.similarity {
        Some(name) if !name.trim().is_empty() => {
            Some(get_create_similarity_by_name(conn, name.trim())?.id)
        }
        _ => None,
    };

    let new_verb = NewVerb {
        infinitive: fields.infinitive.trim(),
        simple_past: fields.simple_past.trim(),
        past_participle: fields.past_participle.trim(),
        translation: fields.translation.trim(),
        similarity_id,
    };

    let verb: Verb = diesel::insert_into(verbs::table)
        .values(&new_verb)
        .get_result(conn)
        .chain_err(|| "Can't insert a new verb!")?;

    debug!("{:?}", &verb);

    Ok(verb)
}

pub fn update_verb(conn: &mut PgConnection, id: i32, item: UpdateVerb) -> Result<Option<Verb>> {
    use crate::schema::verbs;

    let item = diesel::update(verbs::table.filter(verbs::id.eq(id)))
        .set(&item)
        .get_result(conn)
        .optional()?;
    Ok(item)
}

pub fn delete_verb(conn: &mut PgConnection, id: i32) -> Result<Option<Verb>> {
    use crate::schema::verbs;

    let verb = diesel::delete(verbs::table.filter(verbs::id.eq(id)))
        .get_result(conn)
        .optional()
        .chain_err(|| "Couldn't remove the verb!")?;
    Ok(verb)
}

pub fn add_info(conn: &mut PgConnection, verb_id: i32, content: &str) -> Result<VerbInfo> {
    use crate::schema::verb_infos;

    diesel::insert_into(verb_infos::table)
        .values(&NewVerbInfo { verb_id, content })
        .get_result(conn)
        .chain_err(|| "Can't insert verb info!")
}

pub fn add_example(conn: &mut PgConnection,
                   verb_id: i32,
                   english: &str,
                   translation: &str)
                   -> Result<VerbExample> {
    use crate::schema::verb_examples;

    diesel::insert_into(verb_examples::table)
        .values(&NewVerbExample { verb_id, english, translation })
        .get_result(conn)
        .chain_err(|| "Can't insert a verb example!")
}

pub fn get_verb(conn: &mut PgConnection,
                id: i32)
                -> Result<Option<(Verb, Vec<VerbInfo>, Vec<VerbExample>)>> {
    use crate::schema::verbs;

    let verb: Option<Verb> = verbs::table
        .filter(verbs::id.eq(id))
        .get_result(conn)
        .optional()?;

    let verb = match verb {
        Some(v) => v,
        None => return Ok(None),
    };

    let infos = VerbInfo::belonging_to(&verb).load(conn)?;
    let examples = VerbExample::belonging_to(&verb).load(conn)?;

    Ok(Some((verb, infos, examples)))
}

pub fn all_verbs(conn: &mut PgConnection) -> Result<Vec<Verb>> {
    use crate::schema::verbs;

    verbs::table
        .order(verbs::infinitive.asc())
        .load(conn)
        .chain_err(|| "Can't load verbs!")
}

/// Every verb in the catalog, annotated with the profile's most recent
/// outcome for it across all tables. None = never trained.
pub fn all_verbs_with_results(conn: &mut PgConnection,
                              profile: &Profile)
                              -> Result<Vec<(Verb, Option<bool>)>> {
    use crate::schema::results;

    let verbs = all_verbs(conn)?;

    let rows: Vec<TrainingResult> = results::table
        .filter(results::owner_id.eq(profile.id))
        .order(results::updated_at.asc())
        .load(conn)?;

    // Ascending update order, so the last write per verb wins.
    let mut latest: HashMap<i32, bool> = HashMap::new();
    for row in rows {
        latest.insert(row.verb_id, row.is_success);
    }

    Ok(verbs.into_iter()
        .map(|v| {
            let outcome = latest.get(&v.id).cloned();
            (v, outcome)
        })
        .collect())
}

/// A table's member verbs, each annotated with the profile's outcome in
/// that table. The ledger holds at most one row per (owner, table, verb),
/// so the join yields at most one annotation per verb.
pub fn table_verbs_with_results(conn: &mut PgConnection,
                                profile: &Profile,
                                table: &Table)
                                -> Result<Vec<(Verb, Option<bool>)>> {
    use crate::schema::{results, table_verbs, verbs};

    table::check_access(table, profile)?;

    let rows: Vec<(Verb, Option<bool>)> = table_verbs::table
        .inner_join(verbs::table)
        .left_join(results::table.on(results::verb_id
            .eq(table_verbs::verb_id)
            .and(results::table_id.eq(table_verbs::table_id))
            .and(results::owner_id.eq(profile.id))))
        .filter(table_verbs::table_id.eq(table.id))
        .select((verbs::all_columns, results::is_success.nullable()))
        .order(verbs::infinitive.asc())
        .load(conn)
        .chain_err(|| "Can't load the table's verbs!")?;

    Ok(rows)
}
