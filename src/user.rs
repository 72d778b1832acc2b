use super::*;

use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::password;

pub fn get_user_by_email(conn: &mut PgConnection, user_email: &str) -> Result<User> {
    use crate::schema::users::dsl::*;
    use diesel::result::Error::NotFound;

    users
        .filter(email.eq(user_email))
        .first(conn)
        .map_err(|e| match e {
            NotFound => ErrorKind::NoSuchUser(user_email.into()).into(),
            e => Error::with_chain(e, "Error when trying to retrieve user!"),
        })
}

fn get_user_pass_by_email(conn: &mut PgConnection, user_email: &str) -> Result<(User, Password)> {
    use crate::schema::{passwords, users};
    use diesel::result::Error::NotFound;

    users::table
        .inner_join(passwords::table)
        .filter(users::email.eq(user_email))
        .first(conn)
        .map_err(|e| match e {
            NotFound => ErrorKind::NoSuchUser(user_email.into()).into(),
            e => Error::with_chain(e, "Error when trying to retrieve user!"),
        })
}

pub fn auth_user(conn: &mut PgConnection,
                 email: &str,
                 plaintext_pw: &str,
                 pepper: &[u8])
                 -> Result<Option<User>> {
    let (user, pw_from_db) = match get_user_pass_by_email(conn, email) {
        Err(err) => match *err.kind() {
            ErrorKind::NoSuchUser(_) => return Ok(None),
            _ => Err(err),
        },
        ok => ok,
    }?;

    match password::check_password(plaintext_pw, pw_from_db.into(), pepper) {
        Err(err) => match *err.kind() {
            ErrorKind::PasswordDoesntMatch => return Ok(None),
            _ => Err(err),
        },
        ok => ok,
    }?;

    Ok(Some(user))
}

/// Inserts the user, the password and the 1:1 training profile in one
/// transaction. A user row never exists without its profile row.
pub fn add_user(conn: &mut PgConnection,
                email: &str,
                plaintext_pw: &str,
                pepper: &[u8],
                stretch_time: Duration)
                -> Result<(User, Profile)> {
    use crate::schema::{passwords, profiles, users};

    if email.len() > 254 {
        return Err(ErrorKind::EmailAddressTooLong.into());
    };
    if !email.contains('@') {
        return Err(ErrorKind::EmailAddressNotValid.into());
    };

    let pw = password::set_password(plaintext_pw, pepper, stretch_time)?;

    let (user, profile) = conn.transaction::<_, Error, _>(|conn| {
        let user: User = diesel::insert_into(users::table)
            .values(&NewUser { email })
            .get_result(conn)
            .chain_err(|| "Couldn't create a new user!")?;

        diesel::insert_into(passwords::table)
            .values(&pw.into_db(user.id))
            .execute(conn)
            .chain_err(|| "Couldn't insert the new password into database!")?;

        let profile: Profile = diesel::insert_into(profiles::table)
            .values(&NewProfile { user_id: user.id })
            .get_result(conn)
            .chain_err(|| "Couldn't create a profile for the new user!")?;

        Ok((user, profile))
    })?;

    info!("Created a new user, with email {:?}.", email);
    Ok((user, profile))
}

pub fn remove_user_by_email(conn: &mut PgConnection, rm_email: &str) -> Result<User> {
    use crate::schema::users::dsl::*;
    use diesel::result::Error::NotFound;

    diesel::delete(users.filter(email.eq(rm_email)))
        .get_result(conn)
        .map_err(|e| match e {
            NotFound => ErrorKind::NoSuchUser(rm_email.into()).into(),
            e => Error::with_chain(e, "Couldn't remove the user!"),
        })
}

pub fn change_password(conn: &mut PgConnection,
                       user_id: i32,
                       new_password: &str,
                       pepper: &[u8],
                       stretch_time: Duration)
                       -> Result<()> {
    use crate::schema::passwords;

    let pw = password::set_password(new_password, pepper, stretch_time)
        .chain_err(|| "Setting password didn't succeed!")?;

    diesel::update(passwords::table.filter(passwords::id.eq(user_id)))
        .set(&pw.into_db(user_id))
        .execute(conn)
        .chain_err(|| "Couldn't update the password!")?;

    Ok(())
}

pub fn list_users(conn: &mut PgConnection) -> Result<Vec<User>> {
    use crate::schema::users::dsl::*;

    users.order(email.asc())
        .load(conn)
        .chain_err(|| "Can't load users")
}

/// The 1:1 profile of an existing user. A missing row means the store is
/// inconsistent, since profiles are created with the user.
pub fn profile_of(conn: &mut PgConnection, user: &User) -> Result<Profile> {
    use crate::schema::profiles;

    let profile: Option<Profile> = profiles::table
        .filter(profiles::user_id.eq(user.id))
        .get_result(conn)
        .optional()?;

    profile.ok_or_else(|| ErrorKind::DatabaseOdd("a user exists without a profile").into())
}
