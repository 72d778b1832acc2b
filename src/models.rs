use super::schema::*;
use diesel::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
}

#[derive(Identifiable, Queryable, Clone, Debug, AsChangeset, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub joined: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Identifiable, Queryable, Insertable, Associations, Debug, AsChangeset)]
#[diesel(table_name = passwords, belongs_to(User, foreign_key = id))]
pub struct Password {
    pub id: i32,
    pub password_hash: Vec<u8>,
    pub salt: Vec<u8>,
    pub initial_rounds: i16,
    pub extra_rounds: i16,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = sessions)]
pub struct NewSession<'a> {
    pub user_id: i32,
    pub sess_token: &'a [u8],
}

#[derive(Identifiable, Queryable, Associations, Debug, AsChangeset)]
#[diesel(table_name = sessions, belongs_to(User))]
pub struct Session {
    pub id: i32,
    pub user_id: i32,
    pub sess_token: Vec<u8>,
    pub started: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub user_id: i32,
}

#[derive(Identifiable, Queryable, Associations, Clone, Debug, AsChangeset, Serialize)]
#[diesel(table_name = profiles, belongs_to(User))]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = similarities)]
pub struct NewSimilarity<'a> {
    pub name: &'a str,
}

#[derive(Identifiable, Queryable, Clone, Debug, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = similarities)]
pub struct Similarity {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = verbs)]
pub struct NewVerb<'a> {
    pub infinitive: &'a str,
    pub simple_past: &'a str,
    pub past_participle: &'a str,
    pub translation: &'a str,
    pub similarity_id: Option<i32>,
}

#[derive(Identifiable, Queryable, Associations, Clone, Debug, AsChangeset, Serialize)]
#[diesel(table_name = verbs, belongs_to(Similarity))]
pub struct Verb {
    pub id: i32,
    pub infinitive: String,
    pub simple_past: String,
    pub past_participle: String,
    pub translation: String,
    pub similarity_id: Option<i32>,
}

#[derive(AsChangeset, Debug, Default, Deserialize)]
#[diesel(table_name = verbs)]
#[serde(default)]
pub struct UpdateVerb {
    pub infinitive: Option<String>,
    pub simple_past: Option<String>,
    pub past_participle: Option<String>,
    pub translation: Option<String>,
    pub similarity_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = verb_infos)]
pub struct NewVerbInfo<'a> {
    pub verb_id: i32,
    pub content: &'a str,
}

#[derive(Identifiable, Queryable, Associations, Clone, Debug, Serialize)]
#[diesel(table_name = verb_infos, belongs_to(Verb))]
pub struct VerbInfo {
    pub id: i32,
    pub verb_id: i32,
    pub content: String,
}

#[derive(Insertable)]
#[diesel(table_name = verb_examples)]
pub struct NewVerbExample<'a> {
    pub verb_id: i32,
    pub english: &'a str,
    pub translation: &'a str,
}

#[derive(Identifiable, Queryable, Associations, Clone, Debug, Serialize)]
#[diesel(table_name = verb_examples, belongs_to(Verb))]
pub struct VerbExample {
    pub id: i32,
    pub verb_id: i32,
    pub english: String,
    pub translation: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = tables)]
pub struct NewTable<'a> {
    pub kind: &'a str,
    pub name: &'a str,
    pub slug: &'a str,
    pub owner_id: Option<i32>,
}

#[derive(Identifiable, Queryable, Associations, Clone, Debug, AsChangeset, Serialize)]
#[diesel(table_name = tables, belongs_to(Profile, foreign_key = owner_id))]
pub struct Table {
    pub id: i32,
    pub kind: String,
    pub name: String,
    pub slug: String,
    pub owner_id: Option<i32>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Identifiable, Queryable, Insertable, Associations, Clone, Debug)]
#[diesel(table_name = table_verbs, primary_key(table_id, verb_id))]
#[diesel(belongs_to(Table), belongs_to(Verb))]
pub struct TableVerb {
    pub table_id: i32,
    pub verb_id: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = results)]
pub struct NewResult {
    pub owner_id: i32,
    pub table_id: i32,
    pub verb_id: i32,
    pub is_success: bool,
}

#[derive(Identifiable, Queryable, Associations, Clone, Debug, AsChangeset, Serialize)]
#[diesel(table_name = results)]
#[diesel(belongs_to(Profile, foreign_key = owner_id), belongs_to(Table), belongs_to(Verb))]
pub struct TrainingResult {
    pub id: i32,
    pub owner_id: i32,
    pub table_id: i32,
    pub verb_id: i32,
    pub is_success: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
