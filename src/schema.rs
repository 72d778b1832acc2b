diesel::table! {
    users (id) {
        id -> Int4,
        #[max_length = 254]
        email -> Varchar,
        joined -> Timestamptz,
        last_seen -> Timestamptz,
    }
}

diesel::table! {
    passwords (id) {
        id -> Int4,
        password_hash -> Bytea,
        salt -> Bytea,
        initial_rounds -> Int2,
        extra_rounds -> Int2,
    }
}

diesel::table! {
    sessions (id) {
        id -> Int4,
        user_id -> Int4,
        sess_token -> Bytea,
        started -> Timestamptz,
        last_seen -> Timestamptz,
    }
}

diesel::table! {
    profiles (id) {
        id -> Int4,
        user_id -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    similarities (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    verbs (id) {
        id -> Int4,
        #[max_length = 70]
        infinitive -> Varchar,
        #[max_length = 70]
        simple_past -> Varchar,
        #[max_length = 70]
        past_participle -> Varchar,
        #[max_length = 70]
        translation -> Varchar,
        similarity_id -> Nullable<Int4>,
    }
}

diesel::table! {
    verb_infos (id) {
        id -> Int4,
        verb_id -> Int4,
        #[max_length = 255]
        content -> Varchar,
    }
}

diesel::table! {
    verb_examples (id) {
        id -> Int4,
        verb_id -> Int4,
        #[max_length = 255]
        english -> Varchar,
        #[max_length = 255]
        translation -> Varchar,
    }
}

diesel::table! {
    tables (id) {
        id -> Int4,
        #[max_length = 12]
        kind -> Varchar,
        #[max_length = 30]
        name -> Varchar,
        #[max_length = 30]
        slug -> Varchar,
        owner_id -> Nullable<Int4>,
        is_available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    table_verbs (table_id, verb_id) {
        table_id -> Int4,
        verb_id -> Int4,
    }
}

diesel::table! {
    results (id) {
        id -> Int4,
        owner_id -> Int4,
        table_id -> Int4,
        verb_id -> Int4,
        is_success -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(passwords -> users (id));
diesel::joinable!(sessions -> users (user_id));
diesel::joinable!(profiles -> users (user_id));
diesel::joinable!(verbs -> similarities (similarity_id));
diesel::joinable!(verb_infos -> verbs (verb_id));
diesel::joinable!(verb_examples -> verbs (verb_id));
diesel::joinable!(tables -> profiles (owner_id));
diesel::joinable!(table_verbs -> tables (table_id));
diesel::joinable!(table_verbs -> verbs (verb_id));
diesel::joinable!(results -> profiles (owner_id));
diesel::joinable!(results -> tables (table_id));
diesel::joinable!(results -> verbs (verb_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    passwords,
    sessions,
    profiles,
    similarities,
    verbs,
    verb_infos,
    verb_examples,
    tables,
    table_verbs,
    results,
);
